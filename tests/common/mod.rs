use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use orders_pack_backend::{
    handlers,
    models::{
        order::{Order, OrderDraft},
        orders_pack::OrdersPack,
        user::User,
    },
    repositories::{memory::MemoryStore, Repositories},
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection, DbErr};
use serde_json::Value;
use std::env;
use tower::ServiceExt;

/// In-memory backed application for workflow and HTTP tests.
pub struct TestApp {
    pub store: MemoryStore,
    pub repos: Repositories,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let repos = store.repositories();
        let state = AppState::new(repos.clone());
        Self {
            store,
            repos,
            state,
        }
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    pub async fn user(&self, name: &str) -> User {
        let email = format!("{}@example.com", name.to_lowercase());
        self.repos
            .users
            .save(User::new(name, email, "opaque-credential", Utc::now()))
            .await
            .expect("Failed to seed user")
    }

    /// Pack owned by `owner` that expires `expires_in` from now (negative = already expired).
    pub async fn pack(&self, owner: &User, expires_in: Duration) -> OrdersPack {
        let now = Utc::now();
        self.repos
            .orders_packs
            .save(OrdersPack::new(owner.id, now + expires_in, now))
            .await
            .expect("Failed to seed orders pack")
    }

    /// Order wired into both reference lists, bypassing eligibility.
    pub async fn placed_order(&self, user: &User, pack: &OrdersPack, price: Decimal) -> Order {
        let order = self
            .repos
            .orders
            .save(Order::create(
                OrderDraft::new("seeded order", price, user.id),
                Utc::now(),
            ))
            .await
            .expect("Failed to seed order");
        self.repos
            .orders_packs
            .add_order(pack.id, order.id)
            .await
            .expect("Failed to link order to pack");
        self.repos
            .users
            .add_order(user.id, order.id)
            .await
            .expect("Failed to link order to user");
        order
    }

    pub async fn user_orders(&self, user: &User) -> Vec<uuid::Uuid> {
        self.repos
            .users
            .find_by_id(user.id)
            .await
            .unwrap()
            .expect("user vanished")
            .orders
    }

    pub async fn pack_orders(&self, pack: &OrdersPack) -> Vec<uuid::Uuid> {
        self.repos
            .orders_packs
            .find_by_id(pack.id)
            .await
            .unwrap()
            .expect("pack vanished")
            .order_ids()
            .collect()
    }
}

/// Send a request through the router and return status plus raw body.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

#[allow(dead_code)]
pub fn body_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("response body is not JSON")
}

/// Set up test database connection
/// Uses TEST_DATABASE_URL environment variable or falls back to default
#[allow(dead_code)]
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("TEST_DATABASE_URL").unwrap_or_else(|_| {
        "postgresql://orders_user@localhost:5432/orders_pack_test".to_string()
    });

    Database::connect(&database_url).await
}
