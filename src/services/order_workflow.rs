//! Create, edit and delete orders inside an orders pack.
//!
//! Each operation loads the entities it needs, checks eligibility, then performs
//! its writes in order. An order's id lives in three places (the order record,
//! its pack's list and its owner's list); when a later write fails, the earlier
//! ones are undone on a best-effort basis before the storage error is returned.

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::order::{
    CreateOrderRequest, DeleteOrderRequest, EditOrderRequest, Order, OrderDraft,
};
use crate::repositories::{Repositories, RepositoryError};
use crate::services::eligibility::{
    check_edit_order, check_place_order, check_price, RejectionCause,
};
use crate::services::pack_locks::PackLocks;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("order placement rejected: {cause:?}")]
    PlacementRejected { cause: RejectionCause },

    #[error("order update rejected: {cause:?}")]
    UpdateRejected { cause: RejectionCause },

    #[error("order deletion rejected: {cause:?}")]
    DeletionRejected { cause: RejectionCause },

    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}

impl WorkflowError {
    pub fn cause(&self) -> Option<RejectionCause> {
        match self {
            WorkflowError::PlacementRejected { cause }
            | WorkflowError::UpdateRejected { cause }
            | WorkflowError::DeletionRejected { cause } => Some(*cause),
            WorkflowError::Persistence(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct OrderWorkflow {
    repositories: Repositories,
    locks: PackLocks,
}

impl OrderWorkflow {
    pub fn new(repositories: Repositories) -> Self {
        Self {
            repositories,
            locks: PackLocks::new(),
        }
    }

    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, WorkflowError> {
        let _guard = self.locks.acquire(request.orders_pack_id).await;
        let repos = &self.repositories;

        let user = repos.users.find_by_id(request.user_id).await?;
        let orders_pack = repos.orders_packs.find_by_id(request.orders_pack_id).await?;
        debug!(
            user_id = %request.user_id,
            orders_pack_id = %request.orders_pack_id,
            user_found = user.is_some(),
            orders_pack_found = orders_pack.is_some(),
            "Loaded entities for order placement"
        );

        let now = Utc::now();
        let verdict = check_place_order(user.as_ref(), orders_pack.as_ref(), request.user_id, now)
            .and_then(|_| check_price(&request.price));
        if let Err(cause) = verdict {
            warn!(
                user_id = %request.user_id,
                orders_pack_id = %request.orders_pack_id,
                ?cause,
                "Order placement rejected"
            );
            return Err(WorkflowError::PlacementRejected { cause });
        }

        let order = Order::create(
            OrderDraft {
                description: request.description,
                price: request.price,
                user_id: request.user_id,
                payed: request.payed,
                payment_method: request.payment_method,
            },
            now,
        );

        let saved = repos.orders.save(order).await?;

        if let Err(e) = repos
            .orders_packs
            .add_order(request.orders_pack_id, saved.id)
            .await
        {
            self.undo_order_record(saved.id).await;
            return Err(e.into());
        }

        if let Err(e) = repos.users.add_order(request.user_id, saved.id).await {
            if let Err(undo) = repos
                .orders_packs
                .delete_order(request.orders_pack_id, saved.id)
                .await
            {
                error!(
                    order_id = %saved.id,
                    orders_pack_id = %request.orders_pack_id,
                    "Failed to withdraw order reference from pack: {}",
                    undo
                );
            }
            self.undo_order_record(saved.id).await;
            return Err(e.into());
        }

        info!(
            order_id = %saved.id,
            user_id = %saved.user_id,
            orders_pack_id = %request.orders_pack_id,
            "Order placed"
        );
        Ok(saved)
    }

    pub async fn edit_order(&self, request: EditOrderRequest) -> Result<Order, WorkflowError> {
        let _guard = self.locks.acquire(request.orders_pack_id).await;
        let repos = &self.repositories;

        let orders_pack = repos.orders_packs.find_by_id(request.orders_pack_id).await?;
        let order = repos.orders.find_by_id(request.order_id).await?;

        let now = Utc::now();
        let verdict = check_edit_order(order.as_ref(), orders_pack.as_ref(), request.user_id, now)
            .and_then(|_| match &request.price {
                Some(price) => check_price(price),
                None => Ok(()),
            });
        let mut order = match (verdict, order) {
            (Ok(()), Some(order)) => order,
            (verdict, _) => {
                let cause = verdict.err().unwrap_or(RejectionCause::OrderNotFound);
                warn!(
                    order_id = %request.order_id,
                    user_id = %request.user_id,
                    ?cause,
                    "Order update rejected"
                );
                return Err(WorkflowError::UpdateRejected { cause });
            }
        };

        order.apply(request.changes(), now);
        let updated = repos.orders.update(order).await?;

        info!(order_id = %updated.id, user_id = %request.user_id, "Order updated");
        Ok(updated)
    }

    pub async fn delete_order(&self, request: DeleteOrderRequest) -> Result<(), WorkflowError> {
        let _guard = self.locks.acquire(request.orders_pack_id).await;
        let repos = &self.repositories;

        let orders_pack = repos.orders_packs.find_by_id(request.orders_pack_id).await?;
        let order = repos.orders.find_by_id(request.order_id).await?;

        if let Err(cause) =
            check_edit_order(order.as_ref(), orders_pack.as_ref(), request.user_id, Utc::now())
        {
            warn!(
                order_id = %request.order_id,
                user_id = %request.user_id,
                ?cause,
                "Order deletion rejected"
            );
            return Err(WorkflowError::DeletionRejected { cause });
        }

        repos
            .users
            .delete_order(request.user_id, request.order_id)
            .await?;

        if let Err(e) = repos
            .orders_packs
            .delete_order(request.orders_pack_id, request.order_id)
            .await
        {
            self.restore_user_reference(request.user_id, request.order_id)
                .await;
            return Err(e.into());
        }

        if let Err(e) = repos.orders.delete(request.order_id).await {
            if let Err(undo) = repos
                .orders_packs
                .add_order(request.orders_pack_id, request.order_id)
                .await
            {
                error!(
                    order_id = %request.order_id,
                    orders_pack_id = %request.orders_pack_id,
                    "Failed to restore order reference in pack: {}",
                    undo
                );
            }
            self.restore_user_reference(request.user_id, request.order_id)
                .await;
            return Err(e.into());
        }

        info!(
            order_id = %request.order_id,
            orders_pack_id = %request.orders_pack_id,
            "Order deleted"
        );
        Ok(())
    }

    async fn undo_order_record(&self, order_id: Uuid) {
        if let Err(e) = self.repositories.orders.delete(order_id).await {
            error!(order_id = %order_id, "Failed to remove orphaned order record: {}", e);
        }
    }

    async fn restore_user_reference(&self, user_id: Uuid, order_id: Uuid) {
        if let Err(e) = self.repositories.users.add_order(user_id, order_id).await {
            error!(
                order_id = %order_id,
                user_id = %user_id,
                "Failed to restore order reference for user: {}",
                e
            );
        }
    }
}
