//! The current user, resolved once per request.
//!
//! The bearer token is forwarded to the backend untouched; its payload is
//! only read to learn the user id. Verifying the signature is the backend's
//! job.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::Value;

use crate::error::GatewayError;

/// Claims that may carry the user id, in order of preference.
const USER_ID_CLAIMS: [&str; 4] = ["id", "userId", "uid", "sub"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: u64,
    pub token: String,
}

impl Session {
    /// Builds a session from a JWT-shaped token (`header.payload.signature`).
    pub fn from_token(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;
        let payload = payload.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .ok()?;
        let claims: Value = serde_json::from_slice(&bytes).ok()?;

        let user_id = USER_ID_CLAIMS
            .iter()
            .filter_map(|claim| claims.get(*claim))
            .find_map(user_id_from_claim)?;

        Some(Self {
            user_id,
            token: token.to_string(),
        })
    }
}

fn user_id_from_claim(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|id| *id > 0)
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(GatewayError::Unauthorized)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(GatewayError::Unauthorized)?;

        Session::from_token(token).ok_or(GatewayError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn reads_numeric_id() {
        let token = token_with(serde_json::json!({"id": 42, "email": "a@b.co"}));
        let session = Session::from_token(&token).unwrap();
        assert_eq!(session.user_id, 42);
        assert_eq!(session.token, token);
    }

    #[test]
    fn falls_back_through_claims() {
        let token = token_with(serde_json::json!({"uid": "17", "sub": "99"}));
        assert_eq!(Session::from_token(&token).unwrap().user_id, 17);

        let token = token_with(serde_json::json!({"id": null, "sub": "99"}));
        assert_eq!(Session::from_token(&token).unwrap().user_id, 99);
    }

    #[test]
    fn rejects_tokens_without_a_user() {
        assert!(Session::from_token("not-a-jwt").is_none());
        assert!(Session::from_token("a.%%%.c").is_none());
        let token = token_with(serde_json::json!({"sub": "auth0|abc"}));
        assert!(Session::from_token(&token).is_none());
    }

    #[test]
    fn accepts_padded_payloads() {
        let payload = base64::engine::general_purpose::STANDARD.encode(br#"{"userId":5}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(Session::from_token(&token).unwrap().user_id, 5);
    }
}
