use crate::domain::uploads::DocumentType;
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::CurrentUser;
use crate::web::views::EmployeeDetail;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct DocumentLinks {
    pub downloadable: Vec<&'static str>,
    pub view_only: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub detail: EmployeeDetail,
    pub documents: DocumentLinks,
}

pub fn router(state: SharedState) -> Router {
    Router::new().route("/", get(get_profile)).with_state(state)
}

fn document_links() -> DocumentLinks {
    let (downloadable, view_only): (Vec<DocumentType>, Vec<DocumentType>) = DocumentType::ALL
        .into_iter()
        .filter(|t| !matches!(t, DocumentType::Payslip | DocumentType::BankPassbook | DocumentType::TwelfthMarksheet))
        .partition(DocumentType::downloadable);
    DocumentLinks {
        downloadable: downloadable.iter().map(DocumentType::label).collect(),
        view_only: view_only.iter().map(DocumentType::label).collect(),
    }
}

async fn get_profile(
    CurrentUser(session): CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let employee = state
        .employees
        .find_by_login(&session.user_id)
        .await
        .ok_or_else(|| ApiError::NotFound("No employee record is linked to this account".to_string()))?;

    Ok(Json(ProfileResponse {
        detail: EmployeeDetail::from(employee),
        documents: document_links(),
    }))
}
