use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to an order held in a pack's list, populated with the owner id.
///
/// `user_id` is `None` when the referenced order record no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRef {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
}

/// Time-bounded container of orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersPack {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(rename = "expirationDate")]
    pub expiration_date: DateTime<Utc>,
    pub orders: Vec<OrderRef>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl OrdersPack {
    pub fn new(owner_id: Uuid, expiration_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            expiration_date,
            orders: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Open packs accept new and edited orders; the cutoff itself is closed.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date > now
    }

    pub fn order_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.orders.iter().map(|r| r.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrdersPackRequest {
    pub owner_id: Uuid,
    #[serde(rename = "expirationDate")]
    pub expiration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersPackResponse {
    pub orders_pack: OrdersPack,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_open_strictly_before_expiration() {
        let now = Utc::now();
        let pack = OrdersPack::new(Uuid::new_v4(), now, now - Duration::hours(1));

        assert!(pack.is_open_at(now - Duration::seconds(1)));
        assert!(!pack.is_open_at(now));
        assert!(!pack.is_open_at(now + Duration::seconds(1)));
    }
}
