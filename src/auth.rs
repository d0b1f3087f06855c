// src/auth.rs
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::core::token_store::TokenStore;
use crate::error::{ApiError, Result};

/// Claims read from the gateway-issued JWT. Only `exp` drives behavior;
/// signatures are the gateway's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// `id`, falling back to `user_id`
    pub fn user_id(&self) -> Option<String> {
        [&self.id, &self.user_id]
            .into_iter()
            .flatten()
            .find_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// A token without an expiry claim never expires locally.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let now_secs = now.timestamp_millis() as f64 / 1000.0;
        matches!(self.exp, Some(exp) if exp < now_secs)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp as i64, 0))
    }

    pub fn role(&self) -> Option<&str> {
        self.extra.get("role").and_then(Value::as_str)
    }

    /// Admin views open for an explicit `is_admin: true` or an admin role.
    pub fn is_admin(&self) -> bool {
        self.extra.get("is_admin") == Some(&Value::Bool(true))
            || matches!(self.role(), Some("admin" | "super_admin"))
    }
}

pub fn decode_claims(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| ApiError::InvalidInput(format!("Malformed session token: {}", e)))
}

pub fn user_id_from_token(token: &str) -> Option<String> {
    decode_claims(token).ok().and_then(|claims| claims.user_id())
}

#[derive(Debug, Clone)]
pub enum TokenCheck {
    Missing,
    Valid(Claims),
    Expired,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Expired { redirect_to: String },
}

/// Fan-out of session lifecycle events to whoever renders the login view.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }
}

#[derive(Clone)]
pub struct AuthGuard {
    store: Arc<dyn TokenStore>,
    events: SessionEvents,
    login_path: String,
}

impl AuthGuard {
    pub fn new(store: Arc<dyn TokenStore>, events: SessionEvents, login_path: &str) -> Self {
        Self {
            store,
            events,
            login_path: login_path.to_string(),
        }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn check_token_expiration(&self) -> Result<TokenCheck> {
        self.check_token_expiration_at(Utc::now())
    }

    pub fn check_token_expiration_at(&self, now: DateTime<Utc>) -> Result<TokenCheck> {
        let Some(token) = self.store.get()? else {
            return Ok(TokenCheck::Missing);
        };

        match decode_claims(&token) {
            Ok(claims) if claims.is_expired_at(now) => {
                info!("Session token expired at {:?}", claims.expires_at());
                self.end_session()?;
                Ok(TokenCheck::Expired)
            }
            Ok(claims) => Ok(TokenCheck::Valid(claims)),
            Err(e) => {
                warn!("Discarding unreadable session token: {}", e);
                self.end_session()?;
                Ok(TokenCheck::Invalid)
            }
        }
    }

    /// Token for a protected call, or a redirect to the login view.
    pub fn require_session(&self) -> Result<String> {
        match self.check_token_expiration()? {
            TokenCheck::Valid(_) => match self.store.get()? {
                Some(token) => Ok(token),
                None => Err(self.redirect()),
            },
            TokenCheck::Missing | TokenCheck::Expired | TokenCheck::Invalid => {
                Err(self.redirect())
            }
        }
    }

    /// Clear storage and tell subscribers to show the login view.
    pub fn end_session(&self) -> Result<()> {
        self.store.clear()?;
        self.events.publish(SessionEvent::Expired {
            redirect_to: self.login_path.clone(),
        });
        Ok(())
    }

    pub fn redirect(&self) -> ApiError {
        ApiError::SessionExpired {
            redirect_to: self.login_path.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::token_store::MemoryTokenStore;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    pub(crate) fn make_token(claims: Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"gateway-secret"),
        )
        .unwrap()
    }

    fn guard_with(token: Option<&str>) -> (AuthGuard, Arc<MemoryTokenStore>) {
        let store = Arc::new(match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        });
        let guard = AuthGuard::new(store.clone(), SessionEvents::new(), "/login");
        (guard, store)
    }

    #[test]
    fn test_decode_reads_claims_without_key() {
        let token = make_token(json!({"exp": 4_000_000_000u64, "id": "u-1", "email": "a@b.c"}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.user_id().as_deref(), Some("u-1"));
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_user_id_fallbacks() {
        let token = make_token(json!({"exp": 4_000_000_000u64, "user_id": 99}));
        assert_eq!(user_id_from_token(&token).as_deref(), Some("99"));
        assert_eq!(user_id_from_token("garbage"), None);
    }

    #[test]
    fn test_expired_token_clears_and_redirects() {
        let token = make_token(json!({"exp": 1_000, "id": "u-1"}));
        let (guard, store) = guard_with(Some(&token));
        let mut events = guard.events().subscribe();

        let check = guard.check_token_expiration().unwrap();
        assert!(matches!(check, TokenCheck::Expired));
        assert_eq!(store.get().unwrap(), None);
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Expired {
                redirect_to: "/login".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_token_clears_and_redirects() {
        let (guard, store) = guard_with(Some("not-a-jwt"));
        let mut events = guard.events().subscribe();

        assert!(matches!(
            guard.check_token_expiration().unwrap(),
            TokenCheck::Invalid
        ));
        assert_eq!(store.get().unwrap(), None);
        assert!(events.try_recv().is_ok());
    }

    #[test]
    fn test_missing_token_leaves_storage_alone() {
        let (guard, _) = guard_with(None);
        let mut events = guard.events().subscribe();
        assert!(matches!(
            guard.check_token_expiration().unwrap(),
            TokenCheck::Missing
        ));
        assert!(events.try_recv().is_err());
        assert!(guard.require_session().unwrap_err().is_session_expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let token = make_token(json!({"exp": 2_000_000_000u64}));
        let (guard, _) = guard_with(Some(&token));
        let just_before = DateTime::<Utc>::from_timestamp(1_999_999_999, 0).unwrap();
        assert!(matches!(
            guard.check_token_expiration_at(just_before).unwrap(),
            TokenCheck::Valid(_)
        ));
        let after = DateTime::<Utc>::from_timestamp(2_000_000_001, 0).unwrap();
        assert!(matches!(
            guard.check_token_expiration_at(after).unwrap(),
            TokenCheck::Expired
        ));
    }

    #[test]
    fn test_require_session_returns_live_token() {
        let token = make_token(json!({"exp": 4_000_000_000u64}));
        let (guard, _) = guard_with(Some(&token));
        assert_eq!(guard.require_session().unwrap(), token);
    }

    #[test]
    fn test_token_without_exp_is_valid() {
        let token = make_token(json!({"id": "u-2"}));
        let (guard, _) = guard_with(Some(&token));
        assert!(matches!(
            guard.check_token_expiration().unwrap(),
            TokenCheck::Valid(_)
        ));
    }

    #[test]
    fn test_admin_by_flag_or_role() {
        let claims = |body: Value| decode_claims(&make_token(body)).unwrap();
        assert!(claims(json!({"id": "u-1", "is_admin": true})).is_admin());
        assert!(claims(json!({"id": "u-1", "role": "super_admin"})).is_admin());
        assert!(claims(json!({"id": "u-1", "role": "admin"})).is_admin());

        let member = claims(json!({"id": "u-1", "role": "member", "is_admin": "true"}));
        assert_eq!(member.role(), Some("member"));
        assert!(!member.is_admin());
    }
}
