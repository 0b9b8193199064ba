pub mod auth;
pub mod orders;

use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub use auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
pub use orders::{
    CancelOrderQuery, CreatedOrder, ListOrdersQuery, OrderSubmission, PaginatedOrders,
};

/// Success envelope: `{message, type: "success", code: 200, data?}`.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    LoginEnvelope = ApiResponse<LoginResponse>,
    RefreshEnvelope = ApiResponse<RefreshResponse>,
    CreatedOrderEnvelope = ApiResponse<CreatedOrder>,
    OrderListEnvelope = ApiResponse<PaginatedOrders>,
    MessageEnvelope = ApiResponse<EmptyData>
)]
pub struct ApiResponse<T> {
    #[schema(example = "Order Created Successfully")]
    pub message: String,
    #[serde(rename = "type")]
    #[schema(example = "success")]
    pub kind: &'static str,
    #[schema(example = 200)]
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Placeholder payload for envelopes that carry only a message.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmptyData {}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            kind: "success",
            code: 200,
            data: Some(data),
        }
    }
}

impl ApiResponse<EmptyData> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: "success",
            code: 200,
            data: None,
        }
    }
}

/// Error envelope as rendered by the shared error type. Documentation only.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Please fix the given errors")]
    pub message: String,
    #[serde(rename = "type")]
    #[schema(example = "error")]
    pub kind: String,
    #[schema(example = 422)]
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}
