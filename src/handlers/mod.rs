use axum::{
    routing::{get, post},
    Router,
};
use tracing::error;

use crate::models::error::ApiError;
use crate::repositories::RepositoryError;
use crate::services::order_workflow::WorkflowError;
use crate::AppState;

pub mod extract;
pub mod order;
pub mod orders_pack;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/orders",
            post(order::create_order)
                .put(order::edit_order)
                .delete(order::delete_order),
        )
        .route("/orders/{order_id}", get(order::get_order))
        .route("/orders-packs", post(orders_pack::create_orders_pack))
        .route(
            "/orders-packs/{orders_pack_id}",
            get(orders_pack::get_orders_pack),
        )
}

async fn health() -> &'static str {
    "ok"
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        error!("Persistence failure: {}", e);
        ApiError::internal()
    }
}

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        match e {
            WorkflowError::PlacementRejected { .. } => ApiError::placement(),
            WorkflowError::UpdateRejected { .. } => ApiError::update(),
            WorkflowError::DeletionRejected { .. } => ApiError::deletion(),
            WorkflowError::Persistence(e) => e.into(),
        }
    }
}
