//! Pager resolution for paginated listing and review pages
//!
//! Two strategies, matching the two pager shapes the site renders:
//! - review pages carry a `ul.pagination` whose second-to-last `<li>` is the
//!   last page number (the final entry is the "next" arrow)
//! - category listing pages number their pages through `page=` query
//!   parameters on the pager anchors
//!
//! Both fall back to a single page on missing or malformed markup.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

fn page_param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"page=(\d+)").unwrap())
}

/// Reads the total page count from the numbered pager list.
///
/// The second-to-last `<li>` of `ul.pagination` holds the highest page
/// number. Fewer than two entries, or a non-numeric entry, means a single
/// page.
pub fn page_count_from_pager(html: &str) -> usize {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("ul.pagination li") else {
        return 1;
    };

    let items: Vec<String> = document
        .select(&selector)
        .map(|li| li.text().collect::<String>().trim().to_string())
        .collect();

    if items.len() < 2 {
        return 1;
    }

    items[items.len() - 2].parse().unwrap_or(1)
}

/// Reads the total page count from `page=` parameters on pager anchors.
///
/// Scans every anchor inside `ul.pagination` and takes the maximum `page=`
/// value found. No pager, or no numbered anchors, means a single page.
pub fn page_count_from_hrefs(html: &str) -> usize {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("ul.pagination a[href]") else {
        return 1;
    };

    let re = page_param_regex();

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .flat_map(|href| re.captures_iter(href))
        .filter_map(|caps| caps[1].parse::<usize>().ok())
        .max()
        .unwrap_or(1)
}
