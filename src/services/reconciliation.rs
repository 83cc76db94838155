//! Repair for reference lists left dangling by an interrupted write sequence,
//! and for order records that no reference list points at any more.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::repositories::{RepoResult, Repositories};

/// Orders younger than this may still be mid-placement and are left alone.
pub const ORPHAN_GRACE_MINUTES: i64 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub orders_checked: usize,
    pub orders_packs_checked: usize,
    pub users_checked: usize,
    /// Pack id -> order ids removed from its list.
    pub removed_from_orders_packs: HashMap<Uuid, Vec<Uuid>>,
    /// User id -> order ids removed from its list.
    pub removed_from_users: HashMap<Uuid, Vec<Uuid>>,
    /// Order records deleted because their owner no longer lists them.
    pub removed_orders: Vec<Uuid>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.removed_from_orders_packs.is_empty()
            && self.removed_from_users.is_empty()
            && self.removed_orders.is_empty()
    }
}

pub struct Reconciler {
    repositories: Repositories,
}

impl Reconciler {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    /// Delete orders created before `cutoff` that their owner does not list.
    /// Returns the ids removed and how many orders were inspected.
    pub async fn remove_orphaned_orders(
        &self,
        cutoff: DateTime<Utc>,
    ) -> RepoResult<(Vec<Uuid>, usize)> {
        let candidates = self.repositories.orders.ids_created_before(cutoff).await?;
        let checked = candidates.len();

        let mut removed = Vec::new();
        for order_id in candidates {
            let Some(order) = self.repositories.orders.find_by_id(order_id).await? else {
                continue;
            };
            let listed = self
                .repositories
                .users
                .find_by_id(order.user_id)
                .await?
                .is_some_and(|owner| owner.orders.contains(&order_id));
            if listed {
                continue;
            }
            warn!(
                order_id = %order_id,
                user_id = %order.user_id,
                "Removing order record no user references"
            );
            if self.repositories.orders.delete(order_id).await? {
                removed.push(order_id);
            }
        }
        Ok((removed, checked))
    }

    /// Drop references to orders that no longer exist from one pack.
    pub async fn reconcile_orders_pack(&self, orders_pack_id: Uuid) -> RepoResult<Vec<Uuid>> {
        let Some(orders_pack) = self
            .repositories
            .orders_packs
            .find_by_id(orders_pack_id)
            .await?
        else {
            return Ok(Vec::new());
        };

        let mut removed = Vec::new();
        for reference in orders_pack.orders.iter().filter(|r| r.user_id.is_none()) {
            warn!(
                orders_pack_id = %orders_pack_id,
                order_id = %reference.id,
                "Removing dangling order reference from pack"
            );
            self.repositories
                .orders_packs
                .delete_order(orders_pack_id, reference.id)
                .await?;
            removed.push(reference.id);
        }
        Ok(removed)
    }

    /// Drop references to orders that no longer exist from one user.
    pub async fn reconcile_user(&self, user_id: Uuid) -> RepoResult<Vec<Uuid>> {
        let Some(user) = self.repositories.users.find_by_id(user_id).await? else {
            return Ok(Vec::new());
        };

        let mut removed = Vec::new();
        for order_id in user.orders {
            if self.repositories.orders.find_by_id(order_id).await?.is_some() {
                continue;
            }
            warn!(
                user_id = %user_id,
                order_id = %order_id,
                "Removing dangling order reference from user"
            );
            self.repositories.users.delete_order(user_id, order_id).await?;
            removed.push(order_id);
        }
        Ok(removed)
    }

    pub async fn reconcile_all(&self) -> RepoResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        // Orphans first so the pack pass drops any reference they leave behind
        let cutoff = Utc::now() - Duration::minutes(ORPHAN_GRACE_MINUTES);
        let (removed_orders, orders_checked) = self.remove_orphaned_orders(cutoff).await?;
        report.removed_orders = removed_orders;
        report.orders_checked = orders_checked;

        for orders_pack_id in self.repositories.orders_packs.all_ids().await? {
            report.orders_packs_checked += 1;
            let removed = self.reconcile_orders_pack(orders_pack_id).await?;
            if !removed.is_empty() {
                report.removed_from_orders_packs.insert(orders_pack_id, removed);
            }
        }

        for user_id in self.repositories.users.all_ids().await? {
            report.users_checked += 1;
            let removed = self.reconcile_user(user_id).await?;
            if !removed.is_empty() {
                report.removed_from_users.insert(user_id, removed);
            }
        }

        info!(
            orders_checked = report.orders_checked,
            orders_removed = report.removed_orders.len(),
            orders_packs_checked = report.orders_packs_checked,
            users_checked = report.users_checked,
            packs_repaired = report.removed_from_orders_packs.len(),
            users_repaired = report.removed_from_users.len(),
            "Reference reconciliation finished"
        );
        Ok(report)
    }
}
