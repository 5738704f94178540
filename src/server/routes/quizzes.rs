use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse, OrApiError},
    },
    telemetry::QUIZ_QUESTIONS_CNTR,
};

use super::Success;

/// Category id meaning "draw from every category".
const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, Deserialize)]
struct QuizRequest {
    previous_questions: Option<Vec<i64>>,
    quiz_category: Option<QuizCategory>,
}

#[derive(Debug, Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct QuizQuestion {
    question: Option<Question>,
    total_questions: usize,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<Success<QuizQuestion>>> {
    let Json(request) = body.or_api_error(ApiError::BadRequest)?;
    let (Some(previous), Some(QuizCategory { id: category_id })) =
        (request.previous_questions, request.quiz_category)
    else {
        return Err(ApiError::BadRequest);
    };

    let category_filter = if category_id == ALL_CATEGORIES {
        None
    } else {
        let category = categories::get_category(&pool, category_id)
            .await
            .or_api_error(ApiError::BadRequest)?
            .ok_or(ApiError::NotFound)?;
        Some(category.id)
    };

    let candidates = questions::get_quiz_candidates(&pool, &previous, category_filter)
        .await
        .or_api_error(ApiError::BadRequest)?;
    let question = candidates.choose(&mut rand::thread_rng()).cloned();

    if let Some(question) = &question {
        let label = category_filter.map_or_else(|| "all".to_string(), |id| id.to_string());
        QUIZ_QUESTIONS_CNTR.with_label_values(&[label.as_str()]).inc();
        tracing::debug!(id = question.id, remaining = candidates.len(), "served quiz question");
    }

    Ok(Json(Success::new(QuizQuestion {
        question,
        total_questions: candidates.len(),
    })))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_quiz_question))
        .with_state(state)
}
