//! Persistence ports for users, orders packs and orders.
//!
//! Lookups return `Ok(None)` for missing records; only storage faults are errors.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{order::Order, orders_pack::OrdersPack, user::User};

pub mod memory;
pub mod postgres;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("stored {entity} {id} is malformed: {reason}")]
    Corrupt {
        entity: &'static str,
        id: Uuid,
        reason: String,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Load a user with its order references and the ids of the packs it owns.
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;
    async fn save(&self, user: User) -> RepoResult<User>;
    /// Append `order_id` to the user's order list. Appending twice is a no-op.
    async fn add_order(&self, user_id: Uuid, order_id: Uuid) -> RepoResult<()>;
    async fn delete_order(&self, user_id: Uuid, order_id: Uuid) -> RepoResult<()>;
    async fn all_ids(&self) -> RepoResult<Vec<Uuid>>;
}

#[async_trait]
pub trait OrdersPackRepository: Send + Sync {
    /// Load a pack with its order references populated with owner ids.
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<OrdersPack>>;
    async fn save(&self, orders_pack: OrdersPack) -> RepoResult<OrdersPack>;
    /// Append `order_id` to the pack's order list. Appending twice is a no-op.
    async fn add_order(&self, orders_pack_id: Uuid, order_id: Uuid) -> RepoResult<()>;
    async fn delete_order(&self, orders_pack_id: Uuid, order_id: Uuid) -> RepoResult<()>;
    async fn all_ids(&self) -> RepoResult<Vec<Uuid>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Order>>;
    async fn save(&self, order: Order) -> RepoResult<Order>;
    /// Persist edited fields of an existing order.
    async fn update(&self, order: Order) -> RepoResult<Order>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> RepoResult<bool>;
    async fn ids_created_before(&self, cutoff: DateTime<Utc>) -> RepoResult<Vec<Uuid>>;
}

/// The three repositories the order workflow coordinates.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub orders_packs: Arc<dyn OrdersPackRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    pub fn postgres(db: sea_orm::DatabaseConnection) -> Self {
        Self {
            users: Arc::new(postgres::PgUserRepository::new(db.clone())),
            orders_packs: Arc::new(postgres::PgOrdersPackRepository::new(db.clone())),
            orders: Arc::new(postgres::PgOrderRepository::new(db)),
        }
    }
}
