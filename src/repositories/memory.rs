//! In-process store backing the repository traits.
//!
//! Mirrors the document layout of the persisted data: each record keeps its own
//! reference list and nothing cascades. Used by the test suites, which can arm a
//! one-shot failure on any write to simulate a storage fault mid-sequence.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use super::{
    OrderRepository, OrdersPackRepository, RepoResult, Repositories, RepositoryError,
    UserRepository,
};
use crate::models::{
    order::Order,
    orders_pack::{OrderRef, OrdersPack},
    user::User,
};

/// Write operations that can be armed to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    UserSave,
    UserAddOrder,
    UserDeleteOrder,
    OrdersPackSave,
    OrdersPackAddOrder,
    OrdersPackDeleteOrder,
    OrderSave,
    OrderUpdate,
    OrderDelete,
}

#[derive(Debug, Clone)]
struct PackRecord {
    owner_id: Uuid,
    expiration_date: DateTime<Utc>,
    orders: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    packs: HashMap<Uuid, PackRecord>,
    orders: HashMap<Uuid, Order>,
}

#[derive(Default)]
struct Shared {
    collections: RwLock<Collections>,
    faults: Mutex<HashSet<StoreOp>>,
}

impl Shared {
    fn check(&self, op: StoreOp) -> RepoResult<()> {
        if self.faults.lock().remove(&op) {
            return Err(RepositoryError::Unavailable(format!(
                "injected failure on {:?}",
                op
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(MemoryUserRepository {
                shared: self.shared.clone(),
            }),
            orders_packs: Arc::new(MemoryOrdersPackRepository {
                shared: self.shared.clone(),
            }),
            orders: Arc::new(MemoryOrderRepository {
                shared: self.shared.clone(),
            }),
        }
    }

    /// Make the next call of `op` fail with [`RepositoryError::Unavailable`].
    pub fn fail_next(&self, op: StoreOp) {
        self.shared.faults.lock().insert(op);
    }

    pub fn order_count(&self) -> usize {
        self.shared.collections.read().orders.len()
    }
}

pub struct MemoryUserRepository {
    shared: Arc<Shared>,
}

pub struct MemoryOrdersPackRepository {
    shared: Arc<Shared>,
}

pub struct MemoryOrderRepository {
    shared: Arc<Shared>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let collections = self.shared.collections.read();
        let Some(user) = collections.users.get(&id) else {
            return Ok(None);
        };

        let mut owned: Vec<(&Uuid, &PackRecord)> = collections
            .packs
            .iter()
            .filter(|(_, pack)| pack.owner_id == id)
            .collect();
        owned.sort_by_key(|(pack_id, pack)| (pack.created_at, **pack_id));

        let mut user = user.clone();
        user.orders_packs = owned.into_iter().map(|(pack_id, _)| *pack_id).collect();
        Ok(Some(user))
    }

    async fn save(&self, user: User) -> RepoResult<User> {
        self.shared.check(StoreOp::UserSave)?;
        let mut stored = user.clone();
        stored.orders_packs.clear();
        self.shared.collections.write().users.insert(user.id, stored);
        Ok(user)
    }

    async fn add_order(&self, user_id: Uuid, order_id: Uuid) -> RepoResult<()> {
        self.shared.check(StoreOp::UserAddOrder)?;
        let mut collections = self.shared.collections.write();
        if let Some(user) = collections.users.get_mut(&user_id) {
            if !user.orders.contains(&order_id) {
                user.orders.push(order_id);
            }
        }
        Ok(())
    }

    async fn delete_order(&self, user_id: Uuid, order_id: Uuid) -> RepoResult<()> {
        self.shared.check(StoreOp::UserDeleteOrder)?;
        let mut collections = self.shared.collections.write();
        if let Some(user) = collections.users.get_mut(&user_id) {
            user.orders.retain(|id| *id != order_id);
        }
        Ok(())
    }

    async fn all_ids(&self) -> RepoResult<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self.shared.collections.read().users.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl OrdersPackRepository for MemoryOrdersPackRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<OrdersPack>> {
        let collections = self.shared.collections.read();
        let Some(record) = collections.packs.get(&id) else {
            return Ok(None);
        };

        let orders = record
            .orders
            .iter()
            .map(|order_id| OrderRef {
                id: *order_id,
                user_id: collections.orders.get(order_id).map(|o| o.user_id),
            })
            .collect();

        Ok(Some(OrdersPack {
            id,
            owner_id: record.owner_id,
            expiration_date: record.expiration_date,
            orders,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }))
    }

    async fn save(&self, orders_pack: OrdersPack) -> RepoResult<OrdersPack> {
        self.shared.check(StoreOp::OrdersPackSave)?;
        let record = PackRecord {
            owner_id: orders_pack.owner_id,
            expiration_date: orders_pack.expiration_date,
            orders: orders_pack.order_ids().collect(),
            created_at: orders_pack.created_at,
            updated_at: orders_pack.updated_at,
        };
        self.shared
            .collections
            .write()
            .packs
            .insert(orders_pack.id, record);
        Ok(orders_pack)
    }

    async fn add_order(&self, orders_pack_id: Uuid, order_id: Uuid) -> RepoResult<()> {
        self.shared.check(StoreOp::OrdersPackAddOrder)?;
        let mut collections = self.shared.collections.write();
        if let Some(pack) = collections.packs.get_mut(&orders_pack_id) {
            if !pack.orders.contains(&order_id) {
                pack.orders.push(order_id);
            }
        }
        Ok(())
    }

    async fn delete_order(&self, orders_pack_id: Uuid, order_id: Uuid) -> RepoResult<()> {
        self.shared.check(StoreOp::OrdersPackDeleteOrder)?;
        let mut collections = self.shared.collections.write();
        if let Some(pack) = collections.packs.get_mut(&orders_pack_id) {
            pack.orders.retain(|id| *id != order_id);
        }
        Ok(())
    }

    async fn all_ids(&self) -> RepoResult<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self.shared.collections.read().packs.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Order>> {
        Ok(self.shared.collections.read().orders.get(&id).cloned())
    }

    async fn save(&self, order: Order) -> RepoResult<Order> {
        self.shared.check(StoreOp::OrderSave)?;
        self.shared
            .collections
            .write()
            .orders
            .insert(order.id, order.clone());
        Ok(order)
    }

    async fn update(&self, order: Order) -> RepoResult<Order> {
        self.shared.check(StoreOp::OrderUpdate)?;
        let mut collections = self.shared.collections.write();
        match collections.orders.get_mut(&order.id) {
            Some(stored) => {
                *stored = order.clone();
                Ok(order)
            }
            None => Err(RepositoryError::Unavailable(format!(
                "order {} vanished before update",
                order.id
            ))),
        }
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        self.shared.check(StoreOp::OrderDelete)?;
        Ok(self.shared.collections.write().orders.remove(&id).is_some())
    }

    async fn ids_created_before(&self, cutoff: DateTime<Utc>) -> RepoResult<Vec<Uuid>> {
        let collections = self.shared.collections.read();
        let mut ids: Vec<Uuid> = collections
            .orders
            .values()
            .filter(|order| order.created_at < cutoff)
            .map(|order| order.id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}
