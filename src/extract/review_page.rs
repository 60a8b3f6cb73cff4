//! Review extraction from product review pages
//!
//! The site renders each review as a direct child of `div#reviews`. Fields
//! hang off structural anchors inside that card:
//! - reviewer name in a `.h5.fw-bold.mb-2` heading
//! - the "role in country" line in `.text-ash.mb-2`
//! - industry and use-duration lines in the first `div.text-ash.pt-3` block
//! - rating and relative date as `span.ms-1` siblings of the two
//!   `span.stars-wrapper` markers
//! - comment, pros and cons in labeled paragraphs ("Kommentare:",
//!   "Vorteile:", "Nachteile:")
//!
//! Absent anchors produce empty fields; a card that matches nothing still
//! yields a (mostly empty) record rather than an error.

use crate::extract::normalize::{parse_industry_employee, parse_role, sanitize};
use scraper::{ElementRef, Html, Selector};

const DURATION_LABEL: &str = "Verwendete die Software für:";
const COMMENT_LABEL: &str = "Kommentare:";
const PROS_LABEL: &str = "Vorteile:";
const CONS_LABEL: &str = "Nachteile:";
const TOOL_NAME_SUFFIX: &str = "Erfahrungen";

/// One normalized review, ready to be written as a CSV row.
///
/// The extractor fills everything the page carries; `category` and
/// `product_link` come from the crawled product and are stamped by the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewRecord {
    pub tool: String,
    pub category: String,
    pub product_link: String,
    pub reviewer: String,
    pub role: String,
    pub country: String,
    pub industry: String,
    pub employees: String,
    pub duration: String,
    pub rating: String,
    pub date: String,
    pub comment: String,
    pub pros: String,
    pub cons: String,
}

impl ReviewRecord {
    /// Column names for the review CSV, in row order.
    pub const HEADER: [&'static str; 14] = [
        "Tool",
        "Category",
        "Product Link",
        "Reviewer",
        "Role",
        "Country",
        "Industry",
        "Employees",
        "Usage Duration",
        "Rating",
        "Review Date",
        "Comment",
        "Pros",
        "Cons",
    ];

    /// The record as CSV fields, matching [`ReviewRecord::HEADER`].
    pub fn as_fields(&self) -> [&str; 14] {
        [
            &self.tool,
            &self.category,
            &self.product_link,
            &self.reviewer,
            &self.role,
            &self.country,
            &self.industry,
            &self.employees,
            &self.duration,
            &self.rating,
            &self.date,
            &self.comment,
            &self.pros,
            &self.cons,
        ]
    }
}

/// Extracts the tool name from the page heading.
///
/// The heading reads "<Tool> Erfahrungen"; the localized suffix word is
/// stripped. No heading yields an empty string.
pub fn extract_tool_name(html: &str) -> String {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("h1") else {
        return String::new();
    };

    let heading = document
        .select(&selector)
        .next()
        .map(|h| sanitize(&h.text().collect::<String>()))
        .unwrap_or_default();

    heading
        .strip_suffix(TOOL_NAME_SUFFIX)
        .map(|s| s.trim().to_string())
        .unwrap_or(heading)
}

/// Extracts all reviews from a product review page, in DOM order.
///
/// `tool` is stamped onto every record; the page heading is resolved once
/// per product by the caller, not per page.
pub fn extract_reviews(html: &str, tool: &str) -> Vec<ReviewRecord> {
    let document = Html::parse_document(html);

    let Ok(container_selector) = Selector::parse("div#reviews") else {
        return Vec::new();
    };

    let Some(container) = document.select(&container_selector).next() else {
        return Vec::new();
    };

    container
        .children()
        .filter_map(ElementRef::wrap)
        .map(|card| extract_review_card(card, tool))
        .collect()
}

/// Pulls every field out of a single review card.
fn extract_review_card(card: ElementRef, tool: &str) -> ReviewRecord {
    let reviewer = select_text(card, ".h5.fw-bold.mb-2");
    let (role, country) = parse_role(&select_text(card, ".text-ash.mb-2"));

    let (industry_raw, duration_raw) = extract_info_block(card);
    let (industry, employees) = parse_industry_employee(&industry_raw);
    let (rating, date) = extract_star_siblings(card);
    let (comment, pros, cons) = extract_labeled_paragraphs(card);

    ReviewRecord {
        tool: tool.to_string(),
        reviewer,
        role,
        country,
        industry,
        employees,
        duration: strip_label(&duration_raw, DURATION_LABEL),
        rating,
        date,
        comment,
        pros,
        cons,
        ..ReviewRecord::default()
    }
}

/// Text of the first descendant matching the selector, sanitized.
fn select_text(card: ElementRef, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };
    card.select(&selector)
        .next()
        .map(|el| sanitize(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// Reads the reviewer info block: first `div.text-ash.pt-3`, whose first two
/// populated child elements are the industry line and the use-duration line.
fn extract_info_block(card: ElementRef) -> (String, String) {
    let Ok(selector) = Selector::parse("div.text-ash.pt-3") else {
        return (String::new(), String::new());
    };

    let Some(block) = card.select(&selector).next() else {
        return (String::new(), String::new());
    };

    let mut lines = block
        .children()
        .filter_map(ElementRef::wrap)
        .map(|el| sanitize(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty());

    let industry = lines.next().unwrap_or_default();
    let duration = lines.next().unwrap_or_default();
    (industry, duration)
}

/// Reads rating and review date from the star-rating markers.
///
/// Each `span.stars-wrapper` is followed by a `span.ms-1` text sibling. The
/// first marker carries the numeric rating, the second the relative date.
fn extract_star_siblings(card: ElementRef) -> (String, String) {
    let Ok(selector) = Selector::parse("span.stars-wrapper") else {
        return (String::new(), String::new());
    };

    let mut values = card.select(&selector).map(|marker| {
        marker
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sibling| sibling.value().classes().any(|c| c == "ms-1"))
            .map(|sibling| sanitize(&sibling.text().collect::<String>()))
            .unwrap_or_default()
    });

    let rating = values.next().unwrap_or_default();
    let date = values.next().unwrap_or_default();
    (rating, date)
}

/// Scans the card's paragraphs for the labeled comment/pros/cons sections.
///
/// "Kommentare:" carries its value inline; "Vorteile:" and "Nachteile:" are
/// label-only paragraphs whose value is the immediately following paragraph.
fn extract_labeled_paragraphs(card: ElementRef) -> (String, String, String) {
    let Ok(selector) = Selector::parse("p") else {
        return (String::new(), String::new(), String::new());
    };

    let paragraphs: Vec<String> = card
        .select(&selector)
        .map(|p| sanitize(&p.text().collect::<String>()))
        .collect();

    let mut comment = String::new();
    let mut pros = String::new();
    let mut cons = String::new();

    for (i, text) in paragraphs.iter().enumerate() {
        if let Some(rest) = text.strip_prefix(COMMENT_LABEL) {
            if comment.is_empty() {
                comment = rest.trim().to_string();
            }
        } else if text.starts_with(PROS_LABEL) && pros.is_empty() {
            pros = paragraphs.get(i + 1).cloned().unwrap_or_default();
        } else if text.starts_with(CONS_LABEL) && cons.is_empty() {
            cons = paragraphs.get(i + 1).cloned().unwrap_or_default();
        }
    }

    (comment, pros, cons)
}

/// Strips a leading label (e.g. "Verwendete die Software für:") from a
/// sanitized line.
fn strip_label(text: &str, label: &str) -> String {
    text.strip_prefix(label)
        .map(|rest| rest.trim().to_string())
        .unwrap_or_else(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_card(body: &str) -> String {
        format!(r#"<html><body><div id="reviews">{}</div></body></html>"#, body)
    }

    const FULL_CARD: &str = r#"
        <div class="review">
            <div class="h5 fw-bold mb-2">Anna M.</div>
            <div class="text-ash mb-2">Manager in Deutschland</div>
            <div class="col-12 text-ash pt-3">
                <div>Marketing &amp; Werbung, 51-200 Mitarbeiter</div>
                <div>Verwendete die Software für: Mehr als 2 Jahre</div>
            </div>
            <span class="stars-wrapper"></span><span class="ms-1">4,5</span>
            <span class="stars-wrapper"></span><span class="ms-1">vor 3 Monaten</span>
            <p>Kommentare: Insgesamt sehr zufrieden.</p>
            <p>Vorteile:</p>
            <p>Einfache Bedienung und guter Support.</p>
            <p>Nachteile:</p>
            <p>Der Preis ist hoch.</p>
        </div>
    "#;

    #[test]
    fn test_extract_full_review() {
        let html = review_card(FULL_CARD);
        let reviews = extract_reviews(&html, "TestTool");

        assert_eq!(reviews.len(), 1);
        let review = &reviews[0];
        assert_eq!(review.tool, "TestTool");
        assert_eq!(review.reviewer, "Anna M.");
        assert_eq!(review.role, "Manager");
        assert_eq!(review.country, "Deutschland");
        assert_eq!(review.industry, "Marketing & Werbung");
        assert_eq!(review.employees, "51-200");
        assert_eq!(review.duration, "Mehr als 2 Jahre");
        assert_eq!(review.rating, "4,5");
        assert_eq!(review.date, "vor 3 Monaten");
        assert_eq!(review.comment, "Insgesamt sehr zufrieden.");
        assert_eq!(review.pros, "Einfache Bedienung und guter Support.");
        assert_eq!(review.cons, "Der Preis ist hoch.");
    }

    #[test]
    fn test_multiple_reviews_in_dom_order() {
        let html = review_card(
            r#"
            <div><div class="h5 fw-bold mb-2">Erste</div></div>
            <div><div class="h5 fw-bold mb-2">Zweite</div></div>
            <div><div class="h5 fw-bold mb-2">Dritte</div></div>
            "#,
        );
        let reviews = extract_reviews(&html, "T");
        let names: Vec<&str> = reviews.iter().map(|r| r.reviewer.as_str()).collect();
        assert_eq!(names, vec!["Erste", "Zweite", "Dritte"]);
    }

    #[test]
    fn test_missing_anchors_yield_empty_fields() {
        let html = review_card(r#"<div><p>Nur Text.</p></div>"#);
        let reviews = extract_reviews(&html, "T");

        assert_eq!(reviews.len(), 1);
        let review = &reviews[0];
        assert_eq!(review.reviewer, "");
        assert_eq!(review.rating, "");
        assert_eq!(review.comment, "");
    }

    #[test]
    fn test_role_line_without_country() {
        let html = review_card(
            r#"<div><div class="text-ash mb-2">Verifizierter Rezensent</div></div>"#,
        );
        let reviews = extract_reviews(&html, "T");
        assert_eq!(reviews[0].role, "Verifizierter Rezensent");
        assert_eq!(reviews[0].country, "");
    }

    #[test]
    fn test_fields_follow_header_order() {
        let record = ReviewRecord {
            tool: "Alphatool".to_string(),
            category: "CRM".to_string(),
            product_link: "https://example.test/reviews/1/alpha".to_string(),
            country: "Schweiz".to_string(),
            ..ReviewRecord::default()
        };
        let fields = record.as_fields();
        assert_eq!(fields.len(), ReviewRecord::HEADER.len());

        let column = |name: &str| {
            let idx = ReviewRecord::HEADER
                .iter()
                .position(|h| *h == name)
                .unwrap_or_else(|| panic!("no {} column: {:?}", name, ReviewRecord::HEADER));
            fields[idx]
        };
        assert_eq!(column("Category"), "CRM");
        assert_eq!(column("Product Link"), "https://example.test/reviews/1/alpha");
        assert_eq!(column("Country"), "Schweiz");
    }

    #[test]
    fn test_no_container_no_reviews() {
        assert!(extract_reviews("<html><body></body></html>", "T").is_empty());
    }

    #[test]
    fn test_extract_tool_name_strips_suffix() {
        let html = "<html><body><h1>Asana Erfahrungen</h1></body></html>";
        assert_eq!(extract_tool_name(html), "Asana");
    }

    #[test]
    fn test_extract_tool_name_without_suffix() {
        let html = "<html><body><h1>Asana</h1></body></html>";
        assert_eq!(extract_tool_name(html), "Asana");
    }

    #[test]
    fn test_extract_tool_name_missing_heading() {
        assert_eq!(extract_tool_name("<html></html>"), "");
    }
}
