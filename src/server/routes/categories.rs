use std::collections::BTreeMap;

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse, OrApiError},
        pagination::{paginate, PageQuery},
    },
};

use super::{category_map, category_types, Success};

#[derive(Serialize)]
struct CategoriesPage {
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsPage {
    questions: Vec<Question>,
    total_questions: usize,
    categories: Vec<String>,
    current_category: String,
}

async fn get_categories(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<Success<CategoriesPage>>> {
    let categories = categories::get_all_categories(&pool)
        .await
        .or_api_error(ApiError::Internal)?;
    if paginate(page, &categories).is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(Success::new(CategoriesPage {
        categories: category_map(&categories),
        total_categories: categories.len(),
    })))
}

// The path id is shifted by one before the lookup.
async fn questions_for_category(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<Success<CategoryQuestionsPage>>> {
    let Path(id) = path.or_api_error(ApiError::NotFound)?;
    let category_id = id.checked_add(1).ok_or(ApiError::NotFound)?;

    let category = categories::get_category(&pool, category_id)
        .await
        .or_api_error(ApiError::BadRequest)?
        .ok_or(ApiError::NotFound)?;

    let selection = questions::get_questions_for_category(&pool, category.id)
        .await
        .or_api_error(ApiError::BadRequest)?;
    let total_questions = questions::get_all_questions(&pool)
        .await
        .or_api_error(ApiError::BadRequest)?
        .len();
    let all_categories = categories::get_all_categories(&pool)
        .await
        .or_api_error(ApiError::BadRequest)?;

    Ok(Json(Success::new(CategoryQuestionsPage {
        questions: paginate(page, &selection),
        total_questions,
        categories: category_types(&all_categories),
        current_category: category.kind,
    })))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
