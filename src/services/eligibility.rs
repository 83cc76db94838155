//! Who may place, edit or delete an order.
//!
//! The `check_*` functions report why an operation is refused; the boolean
//! predicates wrap them. Ownership is compared by id value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{order::Order, orders_pack::OrdersPack, user::User};

/// Internal reason an operation was refused. Logged, never sent to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCause {
    UserNotFound,
    OrdersPackNotFound,
    OrderNotFound,
    OrderNotInPack,
    PackExpired,
    DuplicateOrder,
    NotOrderOwner,
    NegativePrice,
    UnsupportedPrice,
}

pub fn check_place_order(
    user: Option<&User>,
    orders_pack: Option<&OrdersPack>,
    actor_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), RejectionCause> {
    if user.is_none() {
        return Err(RejectionCause::UserNotFound);
    }
    let orders_pack = orders_pack.ok_or(RejectionCause::OrdersPackNotFound)?;
    if !orders_pack.is_open_at(now) {
        return Err(RejectionCause::PackExpired);
    }
    if has_placed_order(actor_id, orders_pack) {
        return Err(RejectionCause::DuplicateOrder);
    }
    Ok(())
}

pub fn can_place_order(
    user: Option<&User>,
    orders_pack: Option<&OrdersPack>,
    actor_id: Uuid,
    now: DateTime<Utc>,
) -> bool {
    check_place_order(user, orders_pack, actor_id, now).is_ok()
}

/// Whether any order referenced by the pack belongs to `actor_id`.
pub fn has_placed_order(actor_id: Uuid, orders_pack: &OrdersPack) -> bool {
    orders_pack
        .orders
        .iter()
        .any(|reference| reference.user_id == Some(actor_id))
}

/// Shared by the edit and delete paths. The order must be listed by the named pack.
pub fn check_edit_order(
    order: Option<&Order>,
    orders_pack: Option<&OrdersPack>,
    actor_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), RejectionCause> {
    let orders_pack = orders_pack.ok_or(RejectionCause::OrdersPackNotFound)?;
    if !orders_pack.is_open_at(now) {
        return Err(RejectionCause::PackExpired);
    }
    let order = order.ok_or(RejectionCause::OrderNotFound)?;
    if !orders_pack.order_ids().any(|id| id == order.id) {
        return Err(RejectionCause::OrderNotInPack);
    }
    if order.user_id != actor_id {
        return Err(RejectionCause::NotOrderOwner);
    }
    Ok(())
}

pub fn can_edit_order(
    order: Option<&Order>,
    orders_pack: Option<&OrdersPack>,
    actor_id: Uuid,
    now: DateTime<Utc>,
) -> bool {
    check_edit_order(order, orders_pack, actor_id, now).is_ok()
}

/// Prices are persisted as NUMERIC(12, 2).
const PRICE_SCALE: u32 = 2;
const PRICE_INTEGER_DIGITS: u32 = 10;

/// A price must be non-negative and fit the stored precision exactly; nothing
/// is rounded on the way in.
pub fn check_price(price: &Decimal) -> Result<(), RejectionCause> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(RejectionCause::NegativePrice);
    }
    let ceiling = Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS));
    if price.normalize().scale() > PRICE_SCALE || price.trunc() >= ceiling {
        return Err(RejectionCause::UnsupportedPrice);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderDraft;
    use crate::models::orders_pack::OrderRef;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn user(now: DateTime<Utc>) -> User {
        User::new("Ana", "ana@example.com", "x", now)
    }

    fn pack_expiring(owner: Uuid, expiration: DateTime<Utc>, now: DateTime<Utc>) -> OrdersPack {
        OrdersPack::new(owner, expiration, now)
    }

    fn order_of(user_id: Uuid, now: DateTime<Utc>) -> Order {
        Order::create(OrderDraft::new("ramen", dec!(11), user_id), now)
    }

    fn listing(pack: &mut OrdersPack, order: &Order) {
        pack.orders.push(OrderRef {
            id: order.id,
            user_id: Some(order.user_id),
        });
    }

    #[test]
    fn test_place_allowed_on_open_pack_without_prior_order() {
        let now = Utc::now();
        let actor = user(now);
        let pack = pack_expiring(actor.id, now + Duration::hours(1), now);

        assert!(can_place_order(Some(&actor), Some(&pack), actor.id, now));
    }

    #[test]
    fn test_place_refused_once_expired() {
        let now = Utc::now();
        let actor = user(now);

        for offset in [Duration::zero(), Duration::seconds(-1), Duration::days(-30)] {
            let pack = pack_expiring(actor.id, now + offset, now);
            assert_eq!(
                check_place_order(Some(&actor), Some(&pack), actor.id, now),
                Err(RejectionCause::PackExpired)
            );
        }
    }

    #[test]
    fn test_place_flips_across_expiration_boundary() {
        let now = Utc::now();
        let actor = user(now);
        let pack = pack_expiring(actor.id, now + Duration::minutes(1), now);

        assert!(can_place_order(Some(&actor), Some(&pack), actor.id, now));
        assert!(!can_place_order(
            Some(&actor),
            Some(&pack),
            actor.id,
            now + Duration::minutes(1)
        ));
    }

    #[test]
    fn test_place_refused_for_missing_entities() {
        let now = Utc::now();
        let actor = user(now);
        let pack = pack_expiring(actor.id, now + Duration::hours(1), now);

        assert_eq!(
            check_place_order(None, Some(&pack), actor.id, now),
            Err(RejectionCause::UserNotFound)
        );
        assert_eq!(
            check_place_order(Some(&actor), None, actor.id, now),
            Err(RejectionCause::OrdersPackNotFound)
        );
    }

    #[test]
    fn test_second_order_in_same_pack_refused() {
        let now = Utc::now();
        let actor = user(now);
        let mut pack = pack_expiring(actor.id, now + Duration::hours(1), now);
        let existing = order_of(actor.id, now);
        pack.orders.push(OrderRef {
            id: existing.id,
            user_id: Some(actor.id),
        });

        assert!(has_placed_order(actor.id, &pack));
        assert_eq!(
            check_place_order(Some(&actor), Some(&pack), actor.id, now),
            Err(RejectionCause::DuplicateOrder)
        );
        // Repeatable, nothing mutated
        assert!(has_placed_order(actor.id, &pack));
        assert_eq!(pack.orders.len(), 1);
    }

    #[test]
    fn test_other_users_orders_do_not_block() {
        let now = Utc::now();
        let actor = user(now);
        let mut pack = pack_expiring(actor.id, now + Duration::hours(1), now);
        pack.orders.push(OrderRef {
            id: Uuid::new_v4(),
            user_id: Some(Uuid::new_v4()),
        });
        pack.orders.push(OrderRef {
            id: Uuid::new_v4(),
            user_id: None,
        });

        assert!(!has_placed_order(actor.id, &pack));
        assert!(can_place_order(Some(&actor), Some(&pack), actor.id, now));
    }

    #[test]
    fn test_edit_requires_ownership() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let mut pack = pack_expiring(owner, now + Duration::hours(1), now);
        let order = order_of(owner, now);
        listing(&mut pack, &order);

        assert!(can_edit_order(Some(&order), Some(&pack), owner, now));
        assert_eq!(
            check_edit_order(Some(&order), Some(&pack), intruder, now),
            Err(RejectionCause::NotOrderOwner)
        );
    }

    #[test]
    fn test_edit_refused_on_expired_pack_even_for_owner() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let mut pack = pack_expiring(owner, now - Duration::minutes(5), now - Duration::hours(1));
        let order = order_of(owner, now - Duration::hours(1));
        listing(&mut pack, &order);

        assert_eq!(
            check_edit_order(Some(&order), Some(&pack), owner, now),
            Err(RejectionCause::PackExpired)
        );
    }

    #[test]
    fn test_edit_refused_for_missing_entities() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let pack = pack_expiring(owner, now + Duration::hours(1), now);
        let order = order_of(owner, now);

        assert_eq!(
            check_edit_order(None, Some(&pack), owner, now),
            Err(RejectionCause::OrderNotFound)
        );
        assert_eq!(
            check_edit_order(Some(&order), None, owner, now),
            Err(RejectionCause::OrdersPackNotFound)
        );
    }

    #[test]
    fn test_edit_refused_when_order_belongs_to_another_pack() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let mut closed = pack_expiring(owner, now - Duration::seconds(30), now - Duration::hours(1));
        let open = pack_expiring(owner, now + Duration::hours(1), now);
        let order = order_of(owner, now - Duration::hours(1));
        listing(&mut closed, &order);

        assert_eq!(
            check_edit_order(Some(&order), Some(&open), owner, now),
            Err(RejectionCause::OrderNotInPack)
        );
        assert!(!can_edit_order(Some(&order), Some(&closed), owner, now));
    }

    #[test]
    fn test_price_must_fit_stored_precision() {
        assert_eq!(check_price(&dec!(0)), Ok(()));
        assert_eq!(check_price(&dec!(12.50)), Ok(()));
        assert_eq!(check_price(&dec!(9999999999.99)), Ok(()));

        assert_eq!(check_price(&dec!(-0.01)), Err(RejectionCause::NegativePrice));
        assert_eq!(check_price(&dec!(12.345)), Err(RejectionCause::UnsupportedPrice));
        assert_eq!(
            check_price(&dec!(10000000000)),
            Err(RejectionCause::UnsupportedPrice)
        );
    }
}
