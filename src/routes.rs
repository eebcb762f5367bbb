//! Thin handlers: extract, delegate to the service modules, wrap in JSON.
//! Status-code mapping lives in [`crate::error`].
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::{
    books::{self, BookFilters, ListQuery, PageParams, SortBy},
    chat::{self, ChatRequest},
    error::AppError,
    models::BookPayload,
    state::AppState,
    users,
};

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "bookie is up")
}

pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pages = PageParams::new(query.page, query.limit)?;
    let filters = BookFilters::new(query.search, query.category, query.status);
    let sort = SortBy::parse(query.sort_by.as_deref());

    let page = books::list_books(&state.db, &uid, pages, &filters, sort).await?;

    Ok(Json(page))
}

#[derive(Deserialize)]
pub struct CountQuery {
    pub limit: Option<u32>,
}

pub async fn page_count_handler(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Query(query): Query<CountQuery>,
) -> Result<impl IntoResponse, AppError> {
    let total_pages = books::count_pages(&state.db, &uid, query.limit).await?;

    Ok(Json(json!({ "totalPages": total_pages })))
}

pub async fn book_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let book = books::get_book(&state.db, id).await?;

    Ok(Json(book))
}

pub async fn add_handler(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(payload): Json<BookPayload>,
) -> Result<impl IntoResponse, AppError> {
    let book = books::add_book(&state.db, &uid, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Book added successfully", "data": book })),
    ))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path((uid, id)): Path<(String, i64)>,
    Json(payload): Json<BookPayload>,
) -> Result<impl IntoResponse, AppError> {
    let book = books::update_book(&state.db, &uid, id, &payload).await?;

    Ok(Json(
        json!({ "message": "Book updated successfully", "updatedBook": book }),
    ))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path((uid, id)): Path<(String, i64)>,
) -> Result<impl IntoResponse, AppError> {
    books::delete_book(&state.db, &uid, id).await?;

    Ok(Json(json!({ "message": "Book deleted successfully" })))
}

#[derive(Deserialize)]
pub struct UserPayload {
    pub uid: String,
    pub email: String,
}

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserPayload>,
) -> Result<impl IntoResponse, AppError> {
    users::register(&state.db, &payload.uid, &payload.email).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User added successfully" })),
    ))
}

pub async fn email_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserPayload>,
) -> Result<impl IntoResponse, AppError> {
    users::update_email(&state.db, &payload.uid, &payload.email).await?;

    Ok(Json(json!({ "message": "Email updated successfully" })))
}

#[derive(Deserialize)]
pub struct DeleteUserPayload {
    pub uid: String,
}

pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeleteUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    users::delete_user(&state.db, &payload.uid).await?;

    Ok(Json(json!({ "message": "User deleted successfully" })))
}

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reply = chat::recommend(&state.http, &state.config, &request).await?;

    Ok(Json(reply))
}
