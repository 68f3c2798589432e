use crate::domain::uploads::{DocumentCategory, DocumentType, DocumentUploadState, SelectedFile};
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::AdminUser;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct ChecklistItem {
    pub name: &'static str,
    pub category: DocumentCategory,
    pub selected: Option<SelectedFile>,
}

#[derive(Serialize)]
pub struct UploadOverview {
    pub checklist: Vec<ChecklistItem>,
    pub selected_count: usize,
}

#[derive(Deserialize)]
pub struct SubmitPayload {
    #[serde(default)]
    pub employee_id: String,
    /// Single-document upload when set; otherwise every selected file is
    /// submitted.
    pub doc_type: Option<String>,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub employee_id: String,
    pub employee_name: String,
    pub documents: Vec<&'static str>,
    pub message: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(overview))
        .route("/submit", post(submit))
        .route("/:doc_type", put(select_file).delete(remove_file))
        .with_state(state)
}

fn parse_doc_type(raw: &str) -> Result<DocumentType, ApiError> {
    DocumentType::parse(raw).ok_or_else(|| ApiError::BadRequest(format!("Unknown document type: {raw}")))
}

fn checklist(files: &BTreeMap<DocumentType, SelectedFile>) -> UploadOverview {
    let checklist = DocumentType::ALL
        .into_iter()
        .map(|t| ChecklistItem {
            name: t.label(),
            category: t.category(),
            selected: files.get(&t).cloned(),
        })
        .collect();
    UploadOverview {
        checklist,
        selected_count: files.len(),
    }
}

async fn overview(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
) -> Json<UploadOverview> {
    let uploads = state.uploads.read().await;
    let empty = BTreeMap::new();
    let files = uploads.get(&admin.user_id).map(|s| &s.files).unwrap_or(&empty);
    Json(checklist(files))
}

async fn select_file(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(doc_type): Path<String>,
    Json(file): Json<SelectedFile>,
) -> Result<Json<UploadOverview>, ApiError> {
    let doc_type = parse_doc_type(&doc_type)?;
    let mut uploads = state.uploads.write().await;
    let selections = uploads.entry(admin.user_id.clone()).or_default();
    selections.select(doc_type, file.clone()).map_err(|e| {
        tracing::warn!("Rejected {} for {}: {}", file.name, doc_type.label(), e);
        e
    })?;
    tracing::info!("{} selected for {}", file.name, doc_type.label());
    Ok(Json(checklist(&selections.files)))
}

async fn remove_file(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(doc_type): Path<String>,
) -> Result<Json<UploadOverview>, ApiError> {
    let doc_type = parse_doc_type(&doc_type)?;
    let mut uploads = state.uploads.write().await;
    let selections = uploads.entry(admin.user_id.clone()).or_default();
    selections
        .remove(doc_type)
        .ok_or_else(|| ApiError::NotFound(format!("No file selected for {}", doc_type.label())))?;
    Ok(Json(checklist(&selections.files)))
}

/// Reports the submission. Files are not transmitted anywhere.
async fn submit(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Json(payload): Json<SubmitPayload>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let employee_id = payload.employee_id.trim();
    if employee_id.is_empty() {
        return Err(ApiError::BadRequest(match payload.doc_type {
            Some(_) => "Please select employee and document type".to_string(),
            None => "Please select an employee".to_string(),
        }));
    }
    let doc_type = payload.doc_type.as_deref().map(parse_doc_type).transpose()?;
    let employee = state
        .employees
        .get(employee_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Employee {employee_id} not found")))?;

    let mut uploads = state.uploads.write().await;
    let selections: &mut DocumentUploadState = uploads.entry(admin.user_id.clone()).or_default();
    let documents: Vec<&'static str> = match doc_type {
        Some(t) => {
            selections.remove(t);
            vec![t.label()]
        }
        None => {
            let labels = selections.files.keys().map(DocumentType::label).collect();
            selections.clear();
            labels
        }
    };

    let message = match doc_type {
        Some(_) => format!("Document uploaded for {}", employee.name),
        None => format!("{} documents uploaded for {}", documents.len(), employee.name),
    };
    tracing::info!("{} (by {})", message, admin.user_id);

    Ok(Json(SubmitResponse {
        employee_id: employee.id,
        employee_name: employee.name,
        documents,
        message,
    }))
}
