//! Order model - one delivery request and its lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::UserId;

/// `transfer_status` value for orders visible in listings.
pub const TRANSFER_STATUS_ACTIVE: i16 = 1;
/// `archive` value for orders that have not been logically deleted.
pub const NOT_ARCHIVED: i16 = 0;

/// Order status codes.
///
/// Allowed transitions: `pending -> cancelled` (owner) and
/// `pending -> completed` (operations, outside this service).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity as persisted.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Order {
    #[serde(skip_serializing)]
    pub id: i64,
    pub store_id: i64,
    pub merchant_order_id: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: i32,
    pub recipient_zone: i32,
    pub recipient_area: Option<i32>,
    pub delivery_type: i32,
    pub item_type: i32,
    pub special_instruction: Option<String>,
    pub item_quantity: i32,
    pub item_weight: f64,
    pub amount_to_collect: f64,
    pub item_description: Option<String>,
    #[schema(example = "CID240101DHAX7Q2")]
    pub consignment_id: String,
    #[schema(example = "pending")]
    pub order_status: String,
    pub delivery_fee: f64,
    pub cod_fee: f64,
    pub user_id: UserId,
    pub transfer_status: i16,
    pub archive: i16,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Parsed status; `None` for codes written by other systems.
    pub fn status(&self) -> Option<OrderStatus> {
        self.order_status.parse().ok()
    }

    pub fn is_listed(&self) -> bool {
        self.transfer_status == TRANSFER_STATUS_ACTIVE && self.archive == NOT_ARCHIVED
    }
}

/// A fully validated, priced order ready for insertion.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub store_id: i64,
    pub merchant_order_id: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: i32,
    pub recipient_zone: i32,
    pub recipient_area: Option<i32>,
    pub delivery_type: i32,
    pub item_type: i32,
    pub special_instruction: Option<String>,
    pub item_quantity: i32,
    pub item_weight: f64,
    pub amount_to_collect: f64,
    pub item_description: Option<String>,
    pub consignment_id: String,
    pub order_status: OrderStatus,
    pub delivery_fee: f64,
    pub cod_fee: f64,
    pub user_id: UserId,
}

impl NewOrder {
    /// Materialize the stored row, as the database would with its column defaults.
    pub fn into_order(self, id: i64, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            store_id: self.store_id,
            merchant_order_id: self.merchant_order_id,
            recipient_name: self.recipient_name,
            recipient_phone: self.recipient_phone,
            recipient_address: self.recipient_address,
            recipient_city: self.recipient_city,
            recipient_zone: self.recipient_zone,
            recipient_area: self.recipient_area,
            delivery_type: self.delivery_type,
            item_type: self.item_type,
            special_instruction: self.special_instruction,
            item_quantity: self.item_quantity,
            item_weight: self.item_weight,
            amount_to_collect: self.amount_to_collect,
            item_description: self.item_description,
            consignment_id: self.consignment_id,
            order_status: self.order_status.as_str().to_string(),
            delivery_fee: self.delivery_fee,
            cod_fee: self.cod_fee,
            user_id: self.user_id,
            transfer_status: TRANSFER_STATUS_ACTIVE,
            archive: NOT_ARCHIVED,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_code() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
