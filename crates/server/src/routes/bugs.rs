//! CRUD routes for bug records.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::bug::{Bug, CreateBug, UpdateBug};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// GET /api/bugs
/// All bugs, newest-created first.
pub async fn list_bugs(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Bug>>>, ApiError> {
    let bugs = Bug::find_all(&state.db().bugs()).await?;
    Ok(ResponseJson(ApiResponse::success(bugs)))
}

/// GET /api/bugs/{id}
pub async fn get_bug(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Bug>>, ApiError> {
    let bug = Bug::find_by_id(&state.db().bugs(), id)
        .await?
        .ok_or(db::BugStoreError::NotFound(id))?;
    Ok(ResponseJson(ApiResponse::success(bug)))
}

/// POST /api/bugs
/// Create a bug; title and description are required, status defaults to open.
pub async fn create_bug(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateBug>,
) -> Result<ResponseJson<ApiResponse<Bug>>, ApiError> {
    let bug = Bug::create(&state.db().bugs(), &payload).await?;
    tracing::info!(bug_id = %bug.id, "bug created");
    Ok(ResponseJson(ApiResponse::success(bug)))
}

/// PUT /api/bugs/{id}
/// Apply any subset of title/description/status to an existing bug.
pub async fn update_bug(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateBug>,
) -> Result<ResponseJson<ApiResponse<Bug>>, ApiError> {
    let bug = Bug::update(&state.db().bugs(), id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(bug)))
}

/// DELETE /api/bugs/{id}
pub async fn delete_bug(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Bug::delete(&state.db().bugs(), id).await?;
    tracing::info!(bug_id = %id, "bug deleted");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/bugs",
        Router::new()
            .route("/", get(list_bugs).post(create_bug))
            .route("/{id}", get(get_bug).put(update_bug).delete(delete_bug)),
    )
}
