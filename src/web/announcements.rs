use crate::db::NewAnnouncement;
use crate::domain::models::Priority;
use crate::domain::uploads::{accept_document, SelectedFile};
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::{AdminUser, CurrentUser};
use crate::web::views::AnnouncementView;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub attachment: Option<SelectedFile>,
}

/// Board visible to every signed-in user.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list_announcements))
        .with_state(state)
}

/// Authoring routes, nested under `/admin/announcements`.
pub fn admin_router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(create_announcement))
        .route("/:id", delete(delete_announcement))
        .with_state(state)
}

async fn list_announcements(
    CurrentUser(_session): CurrentUser,
    State(state): State<SharedState>,
) -> Json<Vec<AnnouncementView>> {
    let items = state.announcements.list().await;
    Json(items.into_iter().map(AnnouncementView::from).collect())
}

async fn create_announcement(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Json(payload): Json<CreateAnnouncementPayload>,
) -> Result<(StatusCode, Json<AnnouncementView>), ApiError> {
    let title = payload.title.trim();
    let description = payload.description.trim();
    if title.is_empty() || description.is_empty() {
        return Err(ApiError::BadRequest("Please fill in all required fields".to_string()));
    }
    if let Some(file) = &payload.attachment {
        accept_document(file)?;
    }

    let created = state
        .announcements
        .create(NewAnnouncement {
            title: title.to_string(),
            description: description.to_string(),
            priority: payload.priority,
            attachment: payload.attachment.map(|f| f.name.trim().to_string()),
        })
        .await;
    tracing::info!("Announcement {} created by {}", created.id, admin.user_id);

    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn delete_announcement(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state
        .announcements
        .delete(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Announcement {id} not found")))?;
    tracing::info!("Announcement {} deleted by {}", id, admin.user_id);
    Ok(StatusCode::NO_CONTENT)
}
