//! Extraction layer: turning rendered HTML into structured data
//!
//! Each page shape the crawl encounters has its own extractor:
//! - `listing` handles category listing pages (product review-page links)
//! - `review_page` handles product review pages (review records)
//! - `pagination` resolves how many pages a listing or review page spans
//! - `normalize` cleans the raw field texts into CSV-ready values
//!
//! Extractors are lenient by design: missing markup yields empty fields or
//! a page count of 1, never an error. Page markup drifts; partial rows beat
//! aborted crawls.

pub mod listing;
pub mod normalize;
pub mod pagination;
pub mod review_page;

pub use listing::extract_product_links;
pub use normalize::{is_older_than_threshold, parse_industry_employee, parse_role, sanitize};
pub use pagination::{page_count_from_hrefs, page_count_from_pager};
pub use review_page::{extract_reviews, extract_tool_name, ReviewRecord};
