use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        ApiResponse, CancelOrderQuery, CreatedOrder, CreatedOrderEnvelope, EmptyData,
        ErrorResponse, ListOrdersQuery, MessageEnvelope, OrderListEnvelope, OrderSubmission,
        PaginatedOrders,
    },
    middleware::AuthUser,
    services::ServiceError,
    utils::JsonBody,
    AppState,
};

/// Create a delivery order
#[utoipa::path(
    post,
    path = "/create_order",
    request_body = OrderSubmission,
    responses(
        (status = 200, description = "Order created", body = CreatedOrderEnvelope),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 422, description = "Per-field validation errors", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(submission): JsonBody<OrderSubmission>,
) -> Result<Json<ApiResponse<CreatedOrder>>, AppError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let order = state.order_service.submit(submission, authorization).await?;
    Ok(Json(ApiResponse::success(
        "Order Created Successfully",
        CreatedOrder::from(&order),
    )))
}

/// List the caller's orders, newest first
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Orders fetched", body = OrderListEnvelope),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ApiResponse<PaginatedOrders>>, AppError> {
    let page = state
        .order_service
        .list(principal.user_id, query.page(), query.limit())
        .await?;

    Ok(Json(ApiResponse::success(
        "Orders successfully fetched.",
        PaginatedOrders::from(page),
    )))
}

/// Cancel one of the caller's pending orders
#[utoipa::path(
    post,
    path = "/cancel-order",
    params(CancelOrderQuery),
    responses(
        (status = 200, description = "Order cancelled", body = MessageEnvelope),
        (status = 400, description = "Consignment ID missing", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 404, description = "No such order for this user", body = ErrorResponse),
        (status = 409, description = "Order is not pending", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Query(query): Query<CancelOrderQuery>,
) -> Result<Json<ApiResponse<EmptyData>>, AppError> {
    let consignment_id = query
        .consignment_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ServiceError::MissingConsignmentId)?;

    state
        .order_service
        .cancel(consignment_id, principal.user_id)
        .await?;

    Ok(Json(ApiResponse::message(format!(
        "Order with consignment ID {} successfully cancelled.",
        consignment_id
    ))))
}
