//! Output generation for species directories and the manifest.
//!
//! # Submodules
//!
//! - [`record_files`]: Writes one species' text files and images, builds its manifest entry
//! - [`manifest`]: Accumulates entries and rewrites `manifest.json` after each species
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── manifest.json
//! ├── Wood_Duck/
//! │   ├── basic_description.txt
//! │   ├── cool_facts.txt
//! │   ├── find_this_bird.txt
//! │   ├── image_0.jpg
//! │   └── video1.mp4
//! └── Barrows_Goldeneye/
//!     └── ...
//! ```

pub mod manifest;
pub mod record_files;
