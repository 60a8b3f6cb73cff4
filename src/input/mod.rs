//! Input loaders for the crawl work lists
//!
//! The discovery crawl starts from a JSON category list (produced by a
//! one-off scrape of the directory's category index); the review crawl
//! starts from the discovery crawl's CSV output. Both loaders are fatal on
//! unreadable input: a crawl over the wrong list is worse than no crawl.

use crate::{Result, TrawlError};
use serde::Deserialize;
use std::path::Path;

/// One category from the directory's category index.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Display name, carried into the output CSV
    pub text: String,

    /// Absolute URL of the category listing page
    pub href: String,
}

/// One product to crawl reviews for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub category: String,
    pub link: String,
}

/// Loads the category list from a JSON array of `{text, href}` objects.
pub fn load_categories(path: &Path) -> Result<Vec<Category>> {
    let content = std::fs::read_to_string(path).map_err(|_| TrawlError::InputMissing {
        path: path.display().to_string(),
    })?;

    let categories: Vec<Category> =
        serde_json::from_str(&content).map_err(|e| TrawlError::InputParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    tracing::info!("Loaded {} categories from {}", categories.len(), path.display());
    Ok(categories)
}

/// Loads the product list from the discovery crawl's CSV output.
///
/// Expects a header row followed by `category,link` rows.
pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    if !path.exists() {
        return Err(TrawlError::InputMissing {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut products = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.len() < 2 {
            return Err(TrawlError::InputParse {
                path: path.display().to_string(),
                message: format!("expected 2 columns, got {}", record.len()),
            });
        }
        products.push(Product {
            category: record[0].to_string(),
            link: record[1].to_string(),
        });
    }

    tracing::info!("Loaded {} products from {}", products.len(), path.display());
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_categories() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"text": "CRM Software", "href": "https://www.capterra.ch/directory/30072/crm"},
                {"text": "Projektmanagement", "href": "https://www.capterra.ch/directory/30136/pm"}
            ]"#,
        )
        .unwrap();
        file.flush().unwrap();

        let categories = load_categories(file.path()).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].text, "CRM Software");
        assert_eq!(
            categories[1].href,
            "https://www.capterra.ch/directory/30136/pm"
        );
    }

    #[test]
    fn test_load_categories_missing_file() {
        let result = load_categories(Path::new("/nonexistent/categories.json"));
        assert!(matches!(result, Err(TrawlError::InputMissing { .. })));
    }

    #[test]
    fn test_load_categories_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        file.flush().unwrap();

        let result = load_categories(file.path());
        assert!(matches!(result, Err(TrawlError::InputParse { .. })));
    }

    #[test]
    fn test_load_products() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"Category,Product Link\nCRM,https://example.com/reviews/1/a\nCRM,https://example.com/reviews/2/b\n",
        )
        .unwrap();
        file.flush().unwrap();

        let products = load_products(file.path()).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].category, "CRM");
        assert_eq!(products[1].link, "https://example.com/reviews/2/b");
    }

    #[test]
    fn test_load_products_missing_file() {
        let result = load_products(Path::new("/nonexistent/products.csv"));
        assert!(matches!(result, Err(TrawlError::InputMissing { .. })));
    }
}
