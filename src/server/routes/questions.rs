use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::Page,
        error::{ApiError, ApiResponse, OrApiError},
        pagination::{paginate, PageQuery},
    },
    telemetry::QUESTION_CHANGES_CNTR,
};

use super::{category_map, category_types, Success};

/// Body of `POST /questions`: a search when `searchTerm` is non-empty,
/// otherwise the fields of a question to create.
#[derive(Debug, Deserialize)]
struct QuestionsBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

#[derive(Serialize)]
struct QuestionsPage {
    list_of_questions: Vec<Question>,
    total_questions: usize,
    current_category: Vec<String>,
    categories: Vec<String>,
}

#[derive(Serialize)]
struct SearchResults {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CreatedQuestion {
    created: i64,
    questions: Vec<Question>,
    question_created: String,
    total_questions: usize,
}

#[derive(Serialize)]
#[serde(untagged)]
enum SearchOrCreate {
    Search(SearchResults),
    Create(CreatedQuestion),
}

#[derive(Serialize)]
struct DeletedQuestion {
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<Success<QuestionsPage>>> {
    let selection = questions::get_all_questions(&pool)
        .await
        .or_api_error(ApiError::Unprocessable)?;
    let current = paginate(page, &selection);
    if current.is_empty() {
        return Err(ApiError::Unprocessable);
    }
    let categories = categories::get_all_categories(&pool)
        .await
        .or_api_error(ApiError::Unprocessable)?;

    Ok(Json(Success::new(QuestionsPage {
        list_of_questions: current,
        total_questions: selection.len(),
        current_category: vec![],
        categories: category_types(&categories),
    })))
}

async fn search_or_create_question(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
    body: Result<Json<QuestionsBody>, JsonRejection>,
) -> ApiResponse<Json<Success<SearchOrCreate>>> {
    let Json(body) = body.or_api_error(ApiError::Unprocessable)?;

    let response = match body.search_term.as_deref() {
        Some(term) if !term.is_empty() => {
            SearchOrCreate::Search(search_questions(&pool, term, page).await?)
        }
        _ => SearchOrCreate::Create(create_question(&pool, &body, page).await?),
    };
    Ok(Json(Success::new(response)))
}

async fn search_questions(
    pool: &SqlitePool,
    term: &str,
    page: Page,
) -> ApiResponse<SearchResults> {
    let selection = questions::search_questions(pool, term)
        .await
        .or_api_error(ApiError::Unprocessable)?;
    let categories = categories::get_all_categories(pool)
        .await
        .or_api_error(ApiError::Unprocessable)?;
    tracing::debug!(term, matches = selection.len(), "searched questions");

    Ok(SearchResults {
        questions: paginate(page, &selection),
        total_questions: selection.len(),
        current_category: category_map(&categories),
    })
}

async fn create_question(
    pool: &SqlitePool,
    body: &QuestionsBody,
    page: Page,
) -> ApiResponse<CreatedQuestion> {
    let id = questions::create_question(
        pool,
        NewQuestion {
            question: body.question.as_deref(),
            answer: body.answer.as_deref(),
            category: body.category,
            difficulty: body.difficulty,
        },
    )
    .await
    .or_api_error(ApiError::Unprocessable)?;
    QUESTION_CHANGES_CNTR.with_label_values(&["create"]).inc();
    tracing::info!(id, "created question");

    let selection = questions::get_all_questions(pool)
        .await
        .or_api_error(ApiError::Unprocessable)?;

    Ok(CreatedQuestion {
        created: id,
        questions: paginate(page, &selection),
        question_created: body.question.clone().unwrap_or_default(),
        total_questions: selection.len(),
    })
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<Success<DeletedQuestion>>> {
    let Path(id) = path.or_api_error(ApiError::NotFound)?;

    let question = questions::get_question_by_id(&pool, id)
        .await
        .or_api_error(ApiError::Unprocessable)?
        .ok_or(ApiError::NotFound)?;
    questions::delete_question(&pool, question.id)
        .await
        .or_api_error(ApiError::Unprocessable)?;
    QUESTION_CHANGES_CNTR.with_label_values(&["delete"]).inc();
    tracing::info!(id = question.id, "deleted question");

    let selection = questions::get_all_questions(&pool)
        .await
        .or_api_error(ApiError::Unprocessable)?;

    Ok(Json(Success::new(DeletedQuestion {
        deleted: question.id,
        questions: paginate(page, &selection),
        total_questions: selection.len(),
    })))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/questions",
            get(list_questions).post(search_or_create_question),
        )
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
