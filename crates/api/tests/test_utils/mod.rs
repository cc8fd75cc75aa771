use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::http::HeaderValue;
use axum_test::TestServer;
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name},
    Fake,
};
use slotbook_api::{build_router, middleware::auth::AuthProvider, ApiState};
use slotbook_core::{
    errors::{BookingError, BookingResult},
    models::user::Identity,
    repository::Store,
};
use slotbook_db::MemoryStore;
use uuid::Uuid;

pub const EXPERT_TOKEN: &str = "expert-token";
pub const CLIENT_TOKEN: &str = "client-token";
pub const OTHER_TOKEN: &str = "other-token";

/// Token table standing in for the external auth provider.
pub struct StaticAuth {
    identities: HashMap<String, Identity>,
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn verify(&self, token: &str) -> BookingResult<Identity> {
        self.identities
            .get(token)
            .cloned()
            .ok_or_else(|| BookingError::Authentication("Invalid session".to_string()))
    }
}

pub fn fake_identity() -> Identity {
    Identity {
        id: Uuid::new_v4(),
        email: SafeEmail().fake(),
        name: Some(Name().fake()),
    }
}

pub struct TestContext {
    pub server: TestServer,
    pub expert: Identity,
    pub client: Identity,
    pub other: Identity,
}

impl TestContext {
    /// Router backed by a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Router backed by `store`, for mocks or a store the test inspects.
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        let expert = fake_identity();
        let client = fake_identity();
        let other = fake_identity();

        let identities = HashMap::from([
            (EXPERT_TOKEN.to_string(), expert.clone()),
            (CLIENT_TOKEN.to_string(), client.clone()),
            (OTHER_TOKEN.to_string(), other.clone()),
        ]);
        let auth = Arc::new(StaticAuth { identities });

        let state = Arc::new(ApiState::new(store, auth));
        let server = TestServer::new(build_router(state)).expect("test server should start");

        Self {
            server,
            expert,
            client,
            other,
        }
    }
}

/// `Authorization` header value for one of the test tokens.
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value")
}
