//! Field normalization for extracted review text
//!
//! The site renders German-locale text with erratic whitespace and compound
//! fields ("Manager in Deutschland", "Industry, 51-200 Mitarbeiter"). These helpers
//! split and clean those into the flat columns the CSV output expects.

/// Collapses all whitespace runs to single spaces and trims the ends.
///
/// Applied to every extracted field before it is written out, so cell text
/// assembled from multiple DOM text nodes reads as one line.
pub fn sanitize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a raw role line into (role, country).
///
/// The site renders "Manager in Deutschland"; the split is the first
/// " in ". Without a separator the whole string is the role and the
/// country is empty.
pub fn parse_role(raw: &str) -> (String, String) {
    let raw = sanitize(raw);
    match raw.find(" in ") {
        Some(idx) => {
            let role = raw[..idx].trim().to_string();
            let country = raw[idx + 4..].trim().to_string();
            (role, country)
        }
        None => (raw, String::new()),
    }
}

/// Splits a raw industry line into (industry, employee count).
///
/// The site renders "Marketing & Werbung, 51-200 Mitarbeiter"; the split is
/// the first ", " and the trailing employee-count word is stripped from the
/// right side. Without a comma the whole string is the industry.
pub fn parse_industry_employee(raw: &str) -> (String, String) {
    let raw = sanitize(raw);
    match raw.find(", ") {
        Some(idx) => {
            let industry = raw[..idx].trim().to_string();
            let employees = strip_employee_suffix(raw[idx + 2..].trim());
            (industry, employees)
        }
        None => (raw, String::new()),
    }
}

/// Drops the localized "employees" word from the end of an employee-count
/// phrase, leaving just the range ("51-200 Mitarbeiter" -> "51-200").
fn strip_employee_suffix(text: &str) -> String {
    for suffix in ["Mitarbeiter", "employees", "Angestellte"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            return stripped.trim().to_string();
        }
    }
    text.to_string()
}

/// Decides whether a relative review date is past the age cutoff.
///
/// The site shows relative dates like "vor 3 Jahren" or "vor 18 Monaten".
/// The first integer in the text, converted to months for year phrasings,
/// is compared against `max_months`. Absolute dates and anything
/// unparseable are kept.
pub fn is_older_than_threshold(date_text: &str, max_months: u32) -> bool {
    let text = sanitize(date_text);

    let Some(amount) = first_integer(&text) else {
        return false;
    };

    if text.contains("Jahr") {
        amount.saturating_mul(12) > max_months
    } else if text.contains("Monat") {
        amount > max_months
    } else {
        false
    }
}

/// Returns the first run of ASCII digits in the text, if any.
fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
