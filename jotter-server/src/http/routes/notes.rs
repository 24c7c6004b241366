//! Notes CRUD endpoints
//!
//! Everything here runs behind `AuthUser`; the session user scopes
//! every query, so cross-user access surfaces as 404.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Note, NoteRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidUuid};
use crate::http::server::AppState;
use crate::models::{NoteBody, NoteTitle, Paginated, Pagination, PaginationParams};

/// Create/update note request
#[derive(Deserialize)]
pub struct NotePayload {
    pub title: String,
    pub body: String,
}

/// Note response
#[derive(Serialize)]
pub struct NoteResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Note> for NoteResponse {
    fn from(n: Note) -> Self {
        Self {
            id: n.id.to_string(),
            title: n.title,
            body: n.body,
            created_at: n.created_at.to_rfc3339(),
            updated_at: n.updated_at.to_rfc3339(),
        }
    }
}

/// GET /notes - list the user's notes, newest update first
async fn list_notes(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<NoteResponse>>, ApiError> {
    let page = Pagination::from(params);
    let result = NoteRepo::new(&state.pool).list(auth.user.id, page).await?;

    Ok(Json(result.map(NoteResponse::from)))
}

/// POST /notes - create a note
async fn create_note(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<NotePayload>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let title = NoteTitle::new(&req.title)?;
    let body = NoteBody::new(&req.body)?;

    let note = NoteRepo::new(&state.pool)
        .create(auth.user.id, &title, &body)
        .await?;

    Ok((StatusCode::CREATED, Json(NoteResponse::from(note))))
}

/// GET /notes/{id} - fetch a single note
async fn get_note(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = NoteRepo::new(&state.pool).get(auth.user.id, id).await?;
    Ok(Json(NoteResponse::from(note)))
}

/// PUT /notes/{id} - replace title and body
async fn update_note(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
    Json(req): Json<NotePayload>,
) -> Result<Json<NoteResponse>, ApiError> {
    let title = NoteTitle::new(&req.title)?;
    let body = NoteBody::new(&req.body)?;

    let note = NoteRepo::new(&state.pool)
        .update(auth.user.id, id, &title, &body)
        .await?;

    Ok(Json(NoteResponse::from(note)))
}

/// DELETE /notes/{id} - delete a note
async fn delete_note(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    NoteRepo::new(&state.pool).delete(auth.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Notes routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
}
