use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::handlers::extract::AppJson;
use crate::models::error::ApiError;
use crate::models::order::{
    CreateOrderRequest, CreateOrderResponse, DeleteOrderRequest, EditOrderRequest, Order,
};
use crate::AppState;

pub async fn create_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let order = state.workflow.create_order(payload).await?;
    Ok(Json(CreateOrderResponse { order }))
}

pub async fn edit_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<EditOrderRequest>,
) -> Result<StatusCode, ApiError> {
    state.workflow.edit_order(payload).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<DeleteOrderRequest>,
) -> Result<StatusCode, ApiError> {
    state.workflow.delete_order(payload).await?;
    Ok(StatusCode::OK)
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    state
        .repositories
        .orders
        .find_by_id(order_id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}
