use crate::domain::password_reset::{ResetFlow, ResetIdentity, ResetStep};
use crate::state::{PendingReset, SharedState};
use crate::web::error::ApiError;
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct StartPayload {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyPayload {
    #[serde(default)]
    pub code: String,
}

#[derive(Deserialize)]
pub struct CompletePayload {
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub flow_id: Uuid,
    pub step: ResetStep,
    pub message: &'static str,
    /// Present only when the service echoes codes (no mail transport).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_code: Option<String>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(start))
        .route("/:flow_id/verify", post(verify))
        .route("/:flow_id/resend", post(resend))
        .route("/:flow_id/back", post(back))
        .route("/:flow_id/complete", post(complete))
        .with_state(state)
}

async fn deliver(state: &SharedState, email: &str, code: String) -> Result<Option<String>, ApiError> {
    state.delivery.send_code(email, &code).await?;
    Ok(state.config.echo_reset_codes.then_some(code))
}

/// Runs `f` against a live flow under the write lock. Expired flows are
/// removed and reported as not found.
async fn with_flow<T>(
    state: &SharedState,
    flow_id: Uuid,
    f: impl FnOnce(&mut ResetFlow) -> Result<T, ApiError>,
) -> Result<(T, ResetStep), ApiError> {
    let ttl = state.reset_flow_ttl();
    let mut flows = state.reset_flows.write().await;
    let expired = match flows.get(&flow_id) {
        None => return Err(ApiError::NotFound("Reset request not found. Please start again.".to_string())),
        Some(pending) => pending.is_expired(ttl),
    };
    if expired {
        flows.remove(&flow_id);
        tracing::info!("Reset flow {} expired", flow_id);
        return Err(ApiError::NotFound("Reset request expired. Please start again.".to_string()));
    }
    let pending = flows
        .get_mut(&flow_id)
        .ok_or_else(|| ApiError::NotFound("Reset request not found. Please start again.".to_string()))?;
    let out = f(&mut pending.flow)?;
    Ok((out, pending.flow.step()))
}

async fn start(
    State(state): State<SharedState>,
    Json(payload): Json<StartPayload>,
) -> Result<Json<ResetResponse>, ApiError> {
    let mut flow = ResetFlow::new();
    let code = flow.submit_identity(&payload.employee_id, &payload.email, &mut rand::thread_rng())?;
    let email = payload.email.trim().to_string();

    let demo_code = deliver(&state, &email, code).await?;

    let flow_id = Uuid::new_v4();
    let step = flow.step();
    state.reset_flows.write().await.insert(
        flow_id,
        PendingReset {
            flow,
            started_at: Utc::now(),
        },
    );
    tracing::info!("Reset flow {} started for {}", flow_id, payload.employee_id.trim());

    Ok(Json(ResetResponse {
        flow_id,
        step,
        message: "Verification code sent to your email.",
        demo_code,
    }))
}

async fn verify(
    State(state): State<SharedState>,
    Path(flow_id): Path<Uuid>,
    Json(payload): Json<VerifyPayload>,
) -> Result<Json<ResetResponse>, ApiError> {
    let result = with_flow(&state, flow_id, |flow| Ok(flow.verify_code(&payload.code)?)).await;
    let ((), step) = result.map_err(|e| {
        tracing::warn!("Reset flow {} code rejected: {}", flow_id, e);
        e
    })?;

    Ok(Json(ResetResponse {
        flow_id,
        step,
        message: "Verification successful. Please enter your new password.",
        demo_code: None,
    }))
}

async fn resend(
    State(state): State<SharedState>,
    Path(flow_id): Path<Uuid>,
) -> Result<Json<ResetResponse>, ApiError> {
    let ((code, email), step) = with_flow(&state, flow_id, |flow| {
        let code = flow.resend(&mut rand::thread_rng())?;
        let email = flow.identity().map(|i| i.email.clone()).unwrap_or_default();
        Ok((code, email))
    })
    .await?;

    let demo_code = deliver(&state, &email, code).await?;
    tracing::info!("Reset flow {} code resent", flow_id);

    Ok(Json(ResetResponse {
        flow_id,
        step,
        message: "New verification code sent to your email.",
        demo_code,
    }))
}

async fn back(
    State(state): State<SharedState>,
    Path(flow_id): Path<Uuid>,
) -> Result<Json<ResetResponse>, ApiError> {
    let (_, step) = with_flow(&state, flow_id, |flow| Ok(flow.back()?)).await?;
    Ok(Json(ResetResponse {
        flow_id,
        step,
        message: "Returned to the previous step.",
        demo_code: None,
    }))
}

async fn complete(
    State(state): State<SharedState>,
    Path(flow_id): Path<Uuid>,
    Json(payload): Json<CompletePayload>,
) -> Result<Json<ResetResponse>, ApiError> {
    let (finished, step) = with_flow(&state, flow_id, |flow| {
        let mut finished: Option<(ResetIdentity, String)> = None;
        flow.complete(&payload.new_password, &payload.confirm_password, |identity, password| {
            finished = Some((identity.clone(), password.to_string()));
        })?;
        Ok(finished)
    })
    .await?;

    state.reset_flows.write().await.remove(&flow_id);

    if let Some((identity, password)) = finished {
        let applied = state
            .directory
            .reset_password(&identity.user_id, &identity.email, &password)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        if applied {
            tracing::info!("Password reset for {}", identity.user_id);
        } else {
            tracing::warn!("Reset flow {} finished for unknown account {}", flow_id, identity.user_id);
        }
    }

    Ok(Json(ResetResponse {
        flow_id,
        step,
        message: "Your password has been reset successfully. You can now login with your new password.",
        demo_code: None,
    }))
}
