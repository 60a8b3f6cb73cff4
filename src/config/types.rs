use serde::Deserialize;

/// Main configuration structure for Review-Trawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub browser: BrowserConfig,
    pub fetch: FetchConfig,
    pub discovery: DiscoveryConfig,
    pub reviews: ReviewsConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin against which relative links are resolved
    /// (e.g., "https://www.capterra.ch")
    pub origin: String,

    /// Path prefix identifying product review pages
    #[serde(rename = "reviews-path-prefix", default = "default_reviews_prefix")]
    pub reviews_path_prefix: String,
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Per-navigation timeout in seconds
    #[serde(rename = "navigation-timeout-secs", default = "default_nav_timeout")]
    pub navigation_timeout_secs: u64,

    /// Run the browser without a visible window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// User agent string sent by the browser session
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,
}

/// Resilient fetch behavior: backoff bases and ceilings
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Backoff base after an HTTP 403/429 or rate-limit phrase (seconds)
    #[serde(rename = "rate-limit-base-secs", default = "default_rate_limit_base")]
    pub rate_limit_base_secs: u64,

    /// Backoff base after a CAPTCHA challenge (seconds)
    #[serde(rename = "captcha-base-secs", default = "default_captcha_base")]
    pub captcha_base_secs: u64,

    /// Backoff base after a navigation error or timeout (seconds)
    #[serde(rename = "error-base-secs", default = "default_error_base")]
    pub error_base_secs: u64,

    /// Cap on any single backoff delay (seconds)
    #[serde(rename = "per-wait-ceiling-secs", default = "default_per_wait_ceiling")]
    pub per_wait_ceiling_secs: u64,

    /// Cumulative wait budget per URL before the fetch is abandoned (seconds)
    #[serde(rename = "max-total-wait-secs", default = "default_max_total_wait")]
    pub max_total_wait_secs: u64,

    /// How long to wait for a cookie-consent banner before assuming
    /// there is none (seconds)
    #[serde(
        rename = "cookie-banner-timeout-secs",
        default = "default_banner_timeout"
    )]
    pub cookie_banner_timeout_secs: u64,
}

/// Discovery crawl (categories -> product links) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// JSON file with the category list
    #[serde(rename = "categories-path")]
    pub categories_path: String,

    /// CSV file receiving (category, product link) rows
    #[serde(rename = "output-path")]
    pub output_path: String,

    /// Checkpoint file holding the last fully processed category index
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,

    /// Heartbeat file overwritten on every attempt
    #[serde(rename = "heartbeat-path")]
    pub heartbeat_path: String,

    /// Retry backoff base for a failed category attempt (seconds)
    #[serde(rename = "retry-base-secs", default = "default_category_retry_base")]
    pub retry_base_secs: u64,

    /// Retry backoff cap for a failed category attempt (seconds)
    #[serde(rename = "retry-max-secs", default = "default_category_retry_max")]
    pub retry_max_secs: u64,
}

/// Review crawl (product links -> review records) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsConfig {
    /// CSV file with the product list (discovery crawl output)
    #[serde(rename = "products-path")]
    pub products_path: String,

    /// CSV file receiving normalized review rows
    #[serde(rename = "output-path")]
    pub output_path: String,

    /// Checkpoint file holding the last attempted product index
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,

    /// Heartbeat file overwritten on every attempt
    #[serde(rename = "heartbeat-path")]
    pub heartbeat_path: String,

    /// Reviews older than this many years stop the per-product scan
    #[serde(rename = "max-age-years", default = "default_max_age_years")]
    pub max_age_years: u32,
}

impl ReviewsConfig {
    /// Age cutoff expressed in months, for relative dates given in months.
    pub fn max_age_months(&self) -> u32 {
        self.max_age_years * 12
    }
}

fn default_reviews_prefix() -> String {
    "/reviews/".to_string()
}

fn default_nav_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_rate_limit_base() -> u64 {
    60
}

fn default_captcha_base() -> u64 {
    15
}

fn default_error_base() -> u64 {
    5
}

fn default_per_wait_ceiling() -> u64 {
    900
}

fn default_max_total_wait() -> u64 {
    36_000
}

fn default_banner_timeout() -> u64 {
    5
}

fn default_category_retry_base() -> u64 {
    5
}

fn default_category_retry_max() -> u64 {
    60
}

fn default_max_age_years() -> u32 {
    2
}
