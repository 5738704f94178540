#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use trivia_api::db::queries::categories::import_categories;
use trivia_api::db::queries::questions::import_questions;
use trivia_api::db::{self, Category, Question};
use trivia_api::server::app::{build_router, AppState};

pub const CATEGORIES: [&str; 6] = [
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

pub const QUESTIONS: [(&str, &str, i64, i64); 12] = [
    ("Who discovered penicillin?", "Alexander Fleming", 1, 3),
    ("What is the heaviest organ in the human body?", "The Liver", 1, 4),
    ("Hematology is a branch of medicine involving the study of what?", "Blood", 1, 4),
    ("Which Dutch graphic artist, initials M C, was a creator of optical illusions?", "Escher", 2, 1),
    ("La Giaconda is better known as what?", "Mona Lisa", 2, 3),
    ("What is the largest lake in Africa?", "Lake Victoria", 3, 2),
    ("The Taj Mahal is located in which Indian city?", "Agra", 3, 2),
    ("Whose autobiography carries the Title 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 4, 2),
    ("Who invented Peanut Butter?", "George Washington Carver", 4, 2),
    ("What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 5, 4),
    ("What actor did author Anne Rice first denounce, then praise in the role of Lestat?", "Tom Cruise", 5, 4),
    ("Which is the only team to play in every soccer World Cup tournament?", "Brazil", 6, 3),
];

pub struct TestApp {
    pub pool: SqlitePool,
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    /// A migrated database in a temporary directory, seeded with
    /// [`CATEGORIES`] (ids 1..=6) and [`QUESTIONS`] (ids 1..=12).
    pub async fn seeded() -> Self {
        let app = Self::empty().await;
        let categories = CATEGORIES
            .iter()
            .zip(1..)
            .map(|(kind, id)| Category {
                id,
                kind: kind.to_string(),
            })
            .collect();
        import_categories(&app.pool, categories).await.unwrap();
        let questions = QUESTIONS
            .iter()
            .zip(1..)
            .map(|((question, answer, category, difficulty), id)| Question {
                id,
                question: question.to_string(),
                answer: answer.to_string(),
                category: *category,
                difficulty: *difficulty,
            })
            .collect();
        import_questions(&app.pool, questions).await.unwrap();
        app
    }

    pub async fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trivia.db");
        let pool = db::establish_connection(path.to_str().unwrap())
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        let router = build_router(AppState::new(pool.clone()));
        Self {
            pool,
            router,
            _dir: dir,
        }
    }

    pub async fn raw(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        let response = self.raw(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }
}

pub fn ids(questions: &Value) -> Vec<i64> {
    questions
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}
