//! Named DOM predicates for the detail and listing pages.
//!
//! Each predicate answers "where is fragment X?" and returns an optional
//! match. When the site's markup changes, the fix belongs here and the
//! rules built on top stay untouched.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

static SPECIES_INFO: Lazy<Selector> = Lazy::new(|| selector("div.species-info"));
static SPECIES_NAME: Lazy<Selector> = Lazy::new(|| selector("span.species-name"));
static EMPHASIS: Lazy<Selector> = Lazy::new(|| selector("em"));
static ADDITIONAL_INFO: Lazy<Selector> = Lazy::new(|| selector("ul.additional-info"));
static LIST_ITEM: Lazy<Selector> = Lazy::new(|| selector("li"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
static HERO: Lazy<Selector> = Lazy::new(|| selector("div.hero"));
static IMG: Lazy<Selector> = Lazy::new(|| selector("img"));
static OVERVIEW_HEADER: Lazy<Selector> = Lazy::new(|| selector("h2.overview"));
static H2: Lazy<Selector> = Lazy::new(|| selector("h2"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static ACCORDION: Lazy<Selector> = Lazy::new(|| selector("ul.accordion"));
static NESTED_LIST: Lazy<Selector> = Lazy::new(|| selector("ul"));
static SPECIES_CARD: Lazy<Selector> = Lazy::new(|| selector("div.species-card"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));

pub const FIND_THIS_BIRD_HEADER: &str = "Find This Bird";

pub fn species_info(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&SPECIES_INFO).next()
}

pub fn species_name(info: ElementRef<'_>) -> Option<ElementRef<'_>> {
    info.select(&SPECIES_NAME).next()
}

/// The scientific name is the first italic run in the species-info block.
pub fn scientific_name(info: ElementRef<'_>) -> Option<ElementRef<'_>> {
    info.select(&EMPHASIS).next()
}

pub fn additional_info_items(info: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    info.select(&ADDITIONAL_INFO)
        .next()
        .map(|list| list.select(&LIST_ITEM).collect())
        .unwrap_or_default()
}

/// The `<span>` holding an additional-info entry's label, e.g. "Order:".
pub fn item_label(item: ElementRef<'_>) -> Option<ElementRef<'_>> {
    item.select(&SPAN).next()
}

pub fn hero(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&HERO).next()
}

pub fn images(hero: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    hero.select(&IMG).collect()
}

/// The section wrapping the "Overview" header.
pub fn overview_section(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&OVERVIEW_HEADER)
        .next()
        .and_then(parent_element)
}

/// The section wrapping the header whose trimmed text is "Find This Bird".
pub fn find_this_bird_section(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&H2)
        .find(|h2| h2.text().collect::<String>().trim() == FIND_THIS_BIRD_HEADER)
        .and_then(parent_element)
}

pub fn first_paragraph(section: ElementRef<'_>) -> Option<ElementRef<'_>> {
    section.select(&PARAGRAPH).next()
}

pub fn accordion(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&ACCORDION).next()
}

/// First list nested inside the accordion.
pub fn accordion_list(accordion: ElementRef<'_>) -> Option<ElementRef<'_>> {
    accordion.select(&NESTED_LIST).next()
}

pub fn list_items(list: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    list.select(&LIST_ITEM).collect()
}

pub fn species_cards(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&SPECIES_CARD).collect()
}

pub fn card_anchor(card: ElementRef<'_>) -> Option<ElementRef<'_>> {
    card.select(&ANCHOR).next()
}

fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="species-info">
            <span class="species-name">Wood Duck</span>
            <em>Aix sponsa</em>
            <ul class="additional-info">
              <li><span>Order:</span> Anseriformes</li>
              <li><span>Family:</span> Anatidae</li>
            </ul>
          </div>
          <section><h2 class="overview">Overview</h2><p>First.</p><p>Second.</p></section>
          <section><h2> Find This Bird </h2><p>Look in swamps.</p></section>
          <ul class="accordion"><li><ul><li>a</li><li>b</li></ul></li></ul>
        </body></html>"#;

    #[test]
    fn test_species_info_predicates() {
        let doc = Html::parse_document(PAGE);
        let info = species_info(&doc).unwrap();
        assert!(species_name(info).is_some());
        assert!(scientific_name(info).is_some());
        assert_eq!(additional_info_items(info).len(), 2);
        assert!(item_label(additional_info_items(info)[0]).is_some());
    }

    #[test]
    fn test_section_predicates_climb_to_header_parent() {
        let doc = Html::parse_document(PAGE);
        let overview = overview_section(&doc).unwrap();
        assert_eq!(overview.value().name(), "section");
        let p = first_paragraph(overview).unwrap();
        assert_eq!(p.text().collect::<String>(), "First.");
        assert!(find_this_bird_section(&doc).is_some());
    }

    #[test]
    fn test_accordion_predicates() {
        let doc = Html::parse_document(PAGE);
        let list = accordion_list(accordion(&doc).unwrap()).unwrap();
        assert_eq!(list_items(list).len(), 2);
    }

    #[test]
    fn test_missing_fragments_return_none() {
        let doc = Html::parse_document("<html><body><p>nothing</p></body></html>");
        assert!(species_info(&doc).is_none());
        assert!(hero(&doc).is_none());
        assert!(overview_section(&doc).is_none());
        assert!(find_this_bird_section(&doc).is_none());
        assert!(accordion(&doc).is_none());
        assert!(species_cards(&doc).is_empty());
    }
}
