use crate::domain::models::UserRole;
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::{self, AuthSession, CurrentUser};
use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: AuthSession,
    pub token: String,
    /// Landing page for the role.
    pub home: &'static str,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(state)
}

fn home_for(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/admin/dashboard",
        UserRole::Employee => "/employee/profile",
    }
}

fn session_cookie(value: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!("session={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}{secure_flag}")
        .parse()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("bad cookie header: {e}")))
}

async fn login(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ip = addr.ip().to_string();
    if let Err(wait) = state.login_limiter.check(&ip).await {
        tracing::warn!("Login rate limit exceeded for IP: {} (retry in {:?})", ip, wait);
        return Err(ApiError::RateLimited);
    }

    let id = payload.id.trim();
    if id.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("Please fill in all fields".to_string()));
    }

    let principal = state
        .directory
        .authenticate(id, &payload.password)
        .await
        .ok_or_else(|| {
            tracing::warn!("Failed login for {}", id);
            ApiError::InvalidCredentials
        })?;

    let ttl = Duration::hours(state.config.session_ttl_hours);
    let session = state.sessions.open(principal, ttl).await;
    let token = session::sign_session(&session, &state.config.session_key).map_err(|e| {
        ApiError::Internal(anyhow::anyhow!("failed to sign session: {e}"))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&token, ttl.num_seconds(), state.config.secure_cookies)?,
    );

    tracing::info!("User {} logged in as {}", session.user_id, session.role.as_str());
    let resp = LoginResponse {
        home: home_for(session.role),
        user: session,
        token,
    };
    Ok((headers, Json(resp)))
}

async fn logout(
    CurrentUser(session): CurrentUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    state.sessions.close(session.session_id).await;
    tracing::info!("User {} logged out", session.user_id);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie("", 0, state.config.secure_cookies)?,
    );
    Ok((StatusCode::NO_CONTENT, headers))
}

async fn me(CurrentUser(session): CurrentUser) -> Json<AuthSession> {
    Json(session)
}
