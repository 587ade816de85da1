//! Service-order handlers: list, history, CRUD and comments.
//!
//! All mutations go through [`crate::service::OrderService`] so that each
//! successful change is announced on the event bus.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CommentRequest, CommentResponse, CreateOrderRequest, HistoryQuery, ListOrdersQuery,
    MessageResponse, OrderListResponse, OrderResponse, UpdateOrderRequest,
};
use crate::api::extract::{ApiJson, ApiQuery, PathId};
use crate::app_state::AppState;
use crate::auth::Actor;
use crate::domain::OrderFilter;
use crate::error::{ApiError, ErrorResponse};

/// `GET /api/os`: List orders matching the filters.
#[utoipa::path(
    get,
    path = "/api/os",
    tag = "Orders",
    summary = "List service orders",
    description = "Filters combine with AND. `status` and `priority` match exactly (`all` disables them); the name filters are case-insensitive substring matches.",
    security(("bearer" = [])),
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Matching orders in id order", body = OrderListResponse),
        (status = 401, description = "Missing credential", body = ErrorResponse),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _actor: Actor,
    ApiQuery(query): ApiQuery<ListOrdersQuery>,
) -> Json<OrderListResponse> {
    let orders = state.orders.list_orders(&OrderFilter::from(query)).await;
    Json(OrderListResponse { orders })
}

/// `GET /api/os/history`: Closed orders created within a date range.
///
/// A bound that cannot be read as a date matches no order, so the answer
/// is an empty list rather than an error.
#[utoipa::path(
    get,
    path = "/api/os/history",
    tag = "Orders",
    summary = "Order history",
    description = "Completed and cancelled orders whose creation time lies within the inclusive range. An unreadable date yields an empty list.",
    security(("bearer" = [])),
    params(HistoryQuery),
    responses(
        (status = 200, description = "Closed orders", body = OrderListResponse),
        (status = 401, description = "Missing credential", body = ErrorResponse),
    )
)]
pub async fn order_history(
    State(state): State<AppState>,
    _actor: Actor,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Json<OrderListResponse> {
    let orders = match query.into_filter() {
        Some(filter) => state.orders.list_history(&filter).await,
        None => {
            tracing::debug!("history bound is not a date, nothing matches");
            Vec::new()
        }
    };
    Json(OrderListResponse { orders })
}

/// `POST /api/os`: Open a new order on behalf of the actor.
#[utoipa::path(
    post,
    path = "/api/os",
    tag = "Orders",
    summary = "Create a service order",
    security(("bearer" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 401, description = "Missing credential", body = ErrorResponse),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> impl IntoResponse {
    let order = state.orders.create_order(req.into(), actor.user_id).await;
    (StatusCode::CREATED, Json(OrderResponse { order }))
}

/// `GET /api/os/{id}`: Get one order with its comments.
///
/// # Errors
///
/// Returns [`ApiError::OrderNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/os/{id}",
    tag = "Orders",
    summary = "Get a service order",
    security(("bearer" = [])),
    params(("id" = u64, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = OrderResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    _actor: Actor,
    id: PathId,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.get_order(id.order()?).await?;
    Ok(Json(OrderResponse { order }))
}

/// `PUT /api/os/{id}`: Merge fields into an order.
///
/// # Errors
///
/// Returns [`ApiError::OrderNotFound`] for an unknown id.
#[utoipa::path(
    put,
    path = "/api/os/{id}",
    tag = "Orders",
    summary = "Update a service order",
    description = "Absent fields are kept. Identity, creation metadata and comments cannot be overwritten. Moving into `completed` stamps `completedAt` unless the body sets it.",
    security(("bearer" = [])),
    params(("id" = u64, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    _actor: Actor,
    id: PathId,
    ApiJson(req): ApiJson<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .orders
        .update_order(id.order()?, req.into())
        .await?;
    Ok(Json(OrderResponse { order }))
}

/// `DELETE /api/os/{id}`: Remove an order and its comments.
///
/// # Errors
///
/// Returns [`ApiError::OrderNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/os/{id}",
    tag = "Orders",
    summary = "Delete a service order",
    security(("bearer" = [])),
    params(("id" = u64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    _actor: Actor,
    id: PathId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.orders.delete_order(id.order()?).await?;
    Ok(Json(MessageResponse::new("service order deleted")))
}

/// `POST /api/os/{id}/comments`: Append a comment as the actor.
///
/// # Errors
///
/// Returns [`ApiError::OrderNotFound`] for an unknown order.
#[utoipa::path(
    post,
    path = "/api/os/{id}/comments",
    tag = "Orders",
    summary = "Comment on a service order",
    security(("bearer" = [])),
    params(("id" = u64, Path, description = "Order id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    actor: Actor,
    id: PathId,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state
        .orders
        .add_comment(id.order()?, actor.user_id, req.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

/// Service-order routes. `/os/history` is a static segment, so it always
/// wins over the `{id}` capture.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/os", get(list_orders).post(create_order))
        .route("/os/history", get(order_history))
        .route(
            "/os/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/os/{id}/comments", post(add_comment))
}
