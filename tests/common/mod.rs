// Shared fixtures for the gateway integration tests
#![allow(dead_code)]

use std::sync::Arc;

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::MockServer;

use cv_tailor::core::{MemoryTokenStore, TokenStore};
use cv_tailor::{ApiClient, ClientConfig, SessionEvents};

pub fn make_token(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"gateway-secret"),
    )
    .unwrap()
}

pub fn valid_token() -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    make_token(json!({"id": "user-42", "email": "ada@example.com", "exp": exp}))
}

pub fn expired_token() -> String {
    let exp = chrono::Utc::now().timestamp() - 60;
    make_token(json!({"id": "user-42", "exp": exp}))
}

pub struct Harness {
    pub client: ApiClient,
    pub store: Arc<MemoryTokenStore>,
    pub events: SessionEvents,
}

pub fn harness(server: &MockServer, token: Option<String>) -> Harness {
    let store = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let events = SessionEvents::new();
    let client = ApiClient::new(
        ClientConfig::for_base_url(&server.uri()),
        store.clone(),
        events.clone(),
    )
    .unwrap();

    Harness {
        client,
        store,
        events,
    }
}

impl Harness {
    pub fn stored_token(&self) -> Option<String> {
        self.store.get().unwrap()
    }
}
