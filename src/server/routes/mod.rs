mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::Category;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

/// Successful response body: the payload's fields next to `"success": true`.
#[derive(Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

impl<T> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

fn category_types(categories: &[Category]) -> Vec<String> {
    categories.iter().map(|c| c.kind.clone()).collect()
}

fn category_map(categories: &[Category]) -> BTreeMap<i64, String> {
    categories.iter().map(|c| (c.id, c.kind.clone())).collect()
}
