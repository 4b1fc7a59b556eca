//! Trivia quiz JSON API.

use std::collections::HashSet;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN};
use axum::http::HeaderValue;
use axum::middleware::map_response;
use axum::response::Response;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::info;

use super::error::{success, ApiError, ApiResult, DEFAULT_BAD_REQUEST};
use super::AppState;
use crate::entity::{Category, Question, QuestionDraft};
use crate::selector::{self, QuizPick, ANY_CATEGORY};

pub fn trivia_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/questions/search", post(search_questions))
        .route("/quiz", post(quiz_question))
        .fallback(endpoint_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(ServiceBuilder::new().layer(map_response(allow_any_origin)))
        .with_state(state)
}

async fn allow_any_origin(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, DELETE"),
    );
    response
}

async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn bad_body(rejection: impl std::fmt::Display) -> ApiError {
    tracing::debug!(%rejection, "unreadable request");
    ApiError::bad_request(DEFAULT_BAD_REQUEST)
}

// ============================================================================
// Categories
// ============================================================================

async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let db = state.db.lock().await;
    let categories = db.list_categories()?;
    if categories.is_empty() {
        return Err(ApiError::bad_request("No categories found."));
    }
    Ok(success(categories))
}

#[derive(Debug, Serialize)]
pub struct CategoryQuestions {
    pub current_category: String,
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

async fn category_questions(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<CategoryQuestions> {
    let Path(id) = id.map_err(bad_body)?;

    let db = state.db.lock().await;
    let category = db
        .get_category(id)?
        .ok_or_else(|| ApiError::bad_request("Invalid category #ID is provided."))?;

    let all = db.list_questions()?;
    let questions: Vec<Question> = selector::in_category(&all, id)
        .into_iter()
        .cloned()
        .collect();
    if questions.is_empty() {
        return Err(ApiError::bad_request(
            "No questions were found inside this category.",
        ));
    }

    Ok(success(CategoryQuestions {
        current_category: category.kind,
        total_questions: questions.len(),
        questions,
    }))
}

// ============================================================================
// Questions
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsPage {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: Vec<Category>,
    pub current_category: i64,
}

async fn list_questions(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<QuestionsPage> {
    let Query(params) = params.map_err(bad_body)?;
    let page_number = params.page.unwrap_or(1);
    if page_number == 0 {
        return Err(ApiError::bad_request("Page numbers start at 1."));
    }

    let db = state.db.lock().await;
    let all = db.list_questions()?;
    let page = selector::paginate(&all, page_number, state.questions_per_page);

    // An empty page has no current category
    let current_category = page
        .current_category()
        .ok_or_else(|| ApiError::bad_request(format!("Page {} is out of range.", page_number)))?;

    Ok(success(QuestionsPage {
        questions: page.questions.to_vec(),
        total_questions: page.total,
        categories: db.list_categories()?,
        current_category,
    }))
}

async fn create_question(
    State(state): State<AppState>,
    payload: Result<Json<QuestionDraft>, JsonRejection>,
) -> ApiResult<Question> {
    let Json(draft) = payload.map_err(bad_body)?;
    let new = draft.validate()?;

    let db = state.db.lock().await;
    let question = db.insert_question(&new)?;
    info!(id = question.id, category = question.category, "question created");

    Ok(success(question))
}

async fn delete_question(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Question> {
    let Path(id) = id.map_err(bad_body)?;

    let db = state.db.lock().await;
    let question = db.delete_question(id)?;
    info!(id, "question deleted");

    Ok(success(question))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub search_term: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

async fn search_questions(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<SearchResults> {
    let Json(request) = payload.map_err(bad_body)?;
    let term = request
        .search_term
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Empty search query."))?;

    let db = state.db.lock().await;
    let all = db.list_questions()?;
    let questions: Vec<Question> = selector::search(&all, &term).into_iter().cloned().collect();

    Ok(success(SearchResults {
        total_questions: questions.len(),
        questions,
    }))
}

// ============================================================================
// Quiz
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub category_id: Option<i64>,
    pub previous_questions: Option<Vec<i64>>,
}

/// Answers with a random unseen question, or `data: null` once the
/// category is exhausted.
async fn quiz_question(
    State(state): State<AppState>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResult<Option<Question>> {
    let Json(request) = payload.map_err(bad_body)?;
    let (Some(category), Some(previous)) = (request.category_id, request.previous_questions)
    else {
        return Err(ApiError::bad_request(
            "Category #ID and previous questions must be provided.",
        ));
    };
    if category < ANY_CATEGORY {
        return Err(ApiError::bad_request("Invalid category #ID is provided."));
    }

    let previous: HashSet<i64> = previous.into_iter().collect();

    let db = state.db.lock().await;
    let all = db.list_questions()?;
    let picked = match selector::pick_quiz_question(&all, category, &previous, &mut rand::thread_rng()) {
        QuizPick::Question(question) => Some(question.clone()),
        QuizPick::Exhausted => None,
    };

    Ok(success(picked))
}
