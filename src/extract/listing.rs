//! Product link extraction from category listing pages

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts product review-page links from a category listing page.
///
/// An anchor counts as a product link when its `href` starts with the
/// review-page prefix (e.g. `/reviews/`) or carries a `#reviews` fragment.
/// Relative hrefs are resolved against the site origin. Duplicates are
/// dropped, first occurrence wins, and DOM order is preserved.
pub fn extract_product_links(html: &str, origin: &Url, reviews_prefix: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        if !(href.starts_with(reviews_prefix) || href.contains("#reviews")) {
            continue;
        }

        let Ok(absolute) = origin.join(href) else {
            continue;
        };

        let absolute = absolute.to_string();
        if seen.insert(absolute.clone()) {
            links.push(absolute);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://www.capterra.ch").unwrap()
    }

    #[test]
    fn test_extract_prefix_links() {
        let html = r#"
            <html><body>
                <a href="/reviews/12345/toolname">Tool</a>
                <a href="/kategorie/crm">Category</a>
            </body></html>
        "#;
        let links = extract_product_links(html, &origin(), "/reviews/");
        assert_eq!(links, vec!["https://www.capterra.ch/reviews/12345/toolname"]);
    }

    #[test]
    fn test_extract_fragment_links() {
        let html = r##"
            <html><body>
                <a href="/p/98765/toolname/#reviews">Bewertungen</a>
            </body></html>
        "##;
        let links = extract_product_links(html, &origin(), "/reviews/");
        assert_eq!(
            links,
            vec!["https://www.capterra.ch/p/98765/toolname/#reviews"]
        );
    }

    #[test]
    fn test_deduplicates_preserving_order() {
        let html = r#"
            <html><body>
                <a href="/reviews/1/alpha">Alpha</a>
                <a href="/reviews/2/beta">Beta</a>
                <a href="/reviews/1/alpha">Alpha again</a>
            </body></html>
        "#;
        let links = extract_product_links(html, &origin(), "/reviews/");
        assert_eq!(
            links,
            vec![
                "https://www.capterra.ch/reviews/1/alpha",
                "https://www.capterra.ch/reviews/2/beta",
            ]
        );
    }

    #[test]
    fn test_ignores_unrelated_links() {
        let html = r#"
            <html><body>
                <a href="/about">About</a>
                <a href="https://other.example/reviews-of-things">Other</a>
            </body></html>
        "#;
        let links = extract_product_links(html, &origin(), "/reviews/");
        assert!(links.is_empty());
    }

    #[test]
    fn test_empty_page() {
        assert!(extract_product_links("", &origin(), "/reviews/").is_empty());
    }
}
