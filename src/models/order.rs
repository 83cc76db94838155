use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an order is paid for. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Card,
    #[default]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Cash => "CASH",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CARD" => Ok(PaymentMethod::Card),
            "CASH" => Ok(PaymentMethod::Cash),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// A single purchase placed by one user inside one orders pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub payed: bool,
    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethod,
    pub user_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to construct an [`Order`].
///
/// `payed` defaults to `false` and `payment_method` to [`PaymentMethod::Cash`].
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub description: String,
    pub price: Decimal,
    pub user_id: Uuid,
    pub payed: Option<bool>,
    pub payment_method: Option<PaymentMethod>,
}

impl OrderDraft {
    pub fn new(description: impl Into<String>, price: Decimal, user_id: Uuid) -> Self {
        Self {
            description: description.into(),
            price,
            user_id,
            payed: None,
            payment_method: None,
        }
    }
}

/// Field updates accepted by the edit path. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub payed: Option<bool>,
    pub payment_method: Option<PaymentMethod>,
}

impl Order {
    pub fn create(draft: OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: draft.description,
            price: draft.price,
            payed: draft.payed.unwrap_or(false),
            payment_method: draft.payment_method.unwrap_or_default(),
            user_id: draft.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: OrderChanges, now: DateTime<Utc>) {
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(payed) = changes.payed {
            self.payed = payed;
        }
        if let Some(payment_method) = changes.payment_method {
            self.payment_method = payment_method;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(rename = "ordersPack_id")]
    pub orders_pack_id: Uuid,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub user_id: Uuid,
    #[serde(rename = "paymentMethod", default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order: Order,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOrderRequest {
    pub order_id: Uuid,
    #[serde(rename = "ordersPack_id")]
    pub orders_pack_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payed: Option<bool>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub price: Option<Decimal>,
    #[serde(rename = "paymentMethod", default)]
    pub payment_method: Option<PaymentMethod>,
}

impl EditOrderRequest {
    pub fn changes(&self) -> OrderChanges {
        OrderChanges {
            description: self.description.clone(),
            price: self.price,
            payed: self.payed,
            payment_method: self.payment_method,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOrderRequest {
    pub order_id: Uuid,
    #[serde(rename = "ordersPack_id")]
    pub orders_pack_id: Uuid,
    pub user_id: Uuid,
}
