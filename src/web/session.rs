use crate::domain::models::UserRole;
use crate::identity::{Principal, ProfileUpdate};
use crate::state::SharedState;
use crate::web::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub session_id: Uuid,
    pub role: UserRole,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid token format")]
    Invalid,
    #[error("signature mismatch")]
    Signature,
    #[error("expired")]
    Expired,
    #[error("bad role")]
    Role,
}

/// Signed-in user. Lives in the [`SessionStore`] until logout or expiry.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    #[serde(skip)]
    pub session_id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub photo: Option<String>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, AuthSession>>>,
}

impl SessionStore {
    pub async fn open(&self, principal: Principal, ttl: Duration) -> AuthSession {
        let session = AuthSession {
            session_id: Uuid::new_v4(),
            user_id: principal.user_id,
            name: principal.name,
            email: principal.email,
            role: principal.role,
            photo: principal.photo,
            expires_at: Utc::now() + ttl,
        };
        self.sessions
            .write()
            .await
            .insert(session.session_id, session.clone());
        session
    }

    pub async fn get(&self, session_id: Uuid) -> Option<AuthSession> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .filter(|s| s.expires_at > Utc::now())
            .cloned()
    }

    pub async fn close(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }

    /// Ends every session of a user, e.g. when the employee is deleted.
    pub async fn close_user(&self, user_id: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.user_id.eq_ignore_ascii_case(user_id));
        before - sessions.len()
    }

    /// Copies edited display fields into the user's open sessions.
    pub async fn refresh_user(&self, user_id: &str, profile: &ProfileUpdate) -> usize {
        let mut sessions = self.sessions.write().await;
        let mut refreshed = 0;
        for session in sessions.values_mut().filter(|s| s.user_id.eq_ignore_ascii_case(user_id)) {
            session.name = profile.name.clone();
            session.email = profile.email.clone();
            session.photo = profile.photo.clone();
            refreshed += 1;
        }
        refreshed
    }

    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }
}

pub fn sign_session(session: &AuthSession, key: &[u8]) -> Result<String, SessionError> {
    let payload = format!(
        "{}|{}|{}",
        session.session_id,
        session.role.as_str(),
        session.expires_at.timestamp()
    );
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(payload.as_bytes());
    let sig = mac.finalize().into_bytes();
    Ok(format!(
        "{}.{}",
        general_purpose::STANDARD.encode(payload.as_bytes()),
        general_purpose::STANDARD.encode(sig)
    ))
}

pub fn verify_session(token: &str, key: &[u8]) -> Result<SessionClaims, SessionError> {
    let (payload_b64, sig_b64) = token.split_once('.').ok_or(SessionError::Invalid)?;
    let payload_bytes = general_purpose::STANDARD
        .decode(payload_b64)
        .map_err(|_| SessionError::Invalid)?;
    let sig_bytes = general_purpose::STANDARD
        .decode(sig_b64)
        .map_err(|_| SessionError::Invalid)?;

    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(&payload_bytes);
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SessionError::Signature)?;

    let payload = String::from_utf8(payload_bytes).map_err(|_| SessionError::Invalid)?;
    let pieces: Vec<&str> = payload.split('|').collect();
    let [id, role, exp] = pieces.as_slice() else {
        return Err(SessionError::Invalid);
    };
    let session_id = Uuid::parse_str(id).map_err(|_| SessionError::Invalid)?;
    let role = UserRole::parse(role).ok_or(SessionError::Role)?;
    let exp: i64 = exp.parse().map_err(|_| SessionError::Invalid)?;
    if Utc::now().timestamp() > exp {
        return Err(SessionError::Expired);
    }
    Ok(SessionClaims { session_id, role, exp })
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(val) = auth.to_str() {
            if let Some(bearer) = val.strip_prefix("Bearer ") {
                return Some(bearer.trim().to_string());
            }
        }
    }
    if let Some(cookie) = headers.get(axum::http::header::COOKIE) {
        if let Ok(val) = cookie.to_str() {
            for pair in val.split(';') {
                if let Some(rest) = pair.trim().strip_prefix("session=") {
                    return Some(rest.to_string());
                }
            }
        }
    }
    None
}

// ============================================
// Axum extractors
// ============================================

/// Any signed-in user.
pub struct CurrentUser(pub AuthSession);

/// Signed-in user with the admin role; other roles get 403.
pub struct AdminUser(pub AuthSession);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let shared_state = SharedState::from_ref(state);
        let token = extract_token(&parts.headers).ok_or(ApiError::Unauthorized)?;

        let claims = verify_session(&token, &shared_state.config.session_key).map_err(|e| {
            tracing::warn!("Session verification failed: {}", e);
            ApiError::Unauthorized
        })?;

        let session = shared_state
            .sessions
            .get(claims.session_id)
            .await
            .ok_or(ApiError::Unauthorized)?;

        if session.role != claims.role {
            tracing::warn!("Session {} role does not match token", claims.session_id);
            return Err(ApiError::Unauthorized);
        }

        Ok(CurrentUser(session))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(session) = CurrentUser::from_request_parts(parts, state).await?;
        if session.role != UserRole::Admin {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: UserRole) -> Principal {
        Principal {
            user_id: "emp001".to_string(),
            name: "John Doe".to_string(),
            email: "john.doe@confidencefs.com".to_string(),
            role,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_token_round_trip_and_tamper() {
        let store = SessionStore::default();
        let session = store.open(principal(UserRole::Employee), Duration::hours(1)).await;
        let key = b"0123456789abcdef0123456789abcdef";

        let token = sign_session(&session, key).unwrap();
        let claims = verify_session(&token, key).unwrap();
        assert_eq!(claims.session_id, session.session_id);
        assert_eq!(claims.role, UserRole::Employee);

        assert!(matches!(
            verify_session(&token, b"another key of some length......"),
            Err(SessionError::Signature)
        ));
        assert!(matches!(verify_session("garbage", key), Err(SessionError::Invalid)));
    }

    #[tokio::test]
    async fn test_expired_sessions_are_purged() {
        let store = SessionStore::default();
        let live = store.open(principal(UserRole::Admin), Duration::hours(1)).await;
        let dead = store.open(principal(UserRole::Admin), Duration::seconds(-1)).await;

        assert!(store.get(dead.session_id).await.is_none());
        assert_eq!(store.purge_expired().await, 1);
        assert!(store.get(live.session_id).await.is_some());
        assert!(store.close(live.session_id).await);
        assert!(store.get(live.session_id).await.is_none());
    }

    #[test]
    fn test_extract_token_from_cookie_or_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::COOKIE, "theme=dark; session=abc.def".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(axum::http::header::AUTHORIZATION, "Bearer xyz.123".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz.123"));
    }
}
