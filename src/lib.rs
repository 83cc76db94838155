// src/lib.rs

use repositories::Repositories;
use services::order_workflow::OrderWorkflow;

#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub workflow: OrderWorkflow,
}

impl AppState {
    pub fn new(repositories: Repositories) -> Self {
        Self {
            workflow: OrderWorkflow::new(repositories.clone()),
            repositories,
        }
    }
}

pub mod entities {
    pub mod prelude;
    pub mod orders;
    pub mod orders_pack_orders;
    pub mod orders_packs;
    pub mod user_orders;
    pub mod users;
}

pub mod services {
    pub mod eligibility;
    pub mod order_workflow;
    pub mod pack_locks;
    pub mod reconciliation;
}

pub mod config;
pub mod repositories;
pub mod models;
pub mod handlers;
