use serde::Deserialize;

use super::deserializers::Page;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=N` query parameters accepted by the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Page,
}

/// Returns the records belonging to `page`, counting pages from 1.
///
/// Pages past the end of `records` (and pages below 1) are empty.
pub fn paginate<T: Clone>(page: Page, records: &[T]) -> Vec<T> {
    let Some(index) = page.0.checked_sub(1).and_then(|p| usize::try_from(p).ok()) else {
        return vec![];
    };
    records
        .iter()
        .skip(index.saturating_mul(QUESTIONS_PER_PAGE))
        .take(QUESTIONS_PER_PAGE)
        .cloned()
        .collect()
}
