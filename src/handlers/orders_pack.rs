use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::handlers::extract::AppJson;
use crate::models::error::ApiError;
use crate::models::orders_pack::{CreateOrdersPackRequest, OrdersPack, OrdersPackResponse};
use crate::AppState;

pub async fn create_orders_pack(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOrdersPackRequest>,
) -> Result<(StatusCode, Json<OrdersPackResponse>), ApiError> {
    if state
        .repositories
        .users
        .find_by_id(payload.owner_id)
        .await?
        .is_none()
    {
        warn!(owner_id = %payload.owner_id, "Orders pack owner not found");
        return Err(ApiError::not_found());
    }

    let orders_pack = state
        .repositories
        .orders_packs
        .save(OrdersPack::new(
            payload.owner_id,
            payload.expiration_date,
            Utc::now(),
        ))
        .await?;

    info!(
        orders_pack_id = %orders_pack.id,
        owner_id = %orders_pack.owner_id,
        expiration_date = %orders_pack.expiration_date,
        "Orders pack created"
    );
    Ok((StatusCode::CREATED, Json(OrdersPackResponse { orders_pack })))
}

pub async fn get_orders_pack(
    State(state): State<AppState>,
    Path(orders_pack_id): Path<Uuid>,
) -> Result<Json<OrdersPackResponse>, ApiError> {
    state
        .repositories
        .orders_packs
        .find_by_id(orders_pack_id)
        .await?
        .map(|orders_pack| Json(OrdersPackResponse { orders_pack }))
        .ok_or_else(ApiError::not_found)
}
