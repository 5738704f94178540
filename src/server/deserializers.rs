use serde::Deserialize;

/// A 1-based page number taken from the query string.
///
/// Values that are not integers fall back to the first page instead of
/// rejecting the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct Page(pub i64);

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

impl From<String> for Page {
    fn from(value: String) -> Self {
        value.trim().parse().map(Page).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers() {
        let page: Page = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(page, Page(3));
    }

    #[test]
    fn garbage_falls_back_to_first_page() {
        let page: Page = serde_json::from_str("\"three\"").unwrap();
        assert_eq!(page, Page(1));
    }
}
