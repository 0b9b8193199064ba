use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{Order, OrderStatus};
use crate::services::OrderPage;

/// Order submission body. Every field is optional at the wire level so the
/// rule checker can report all missing fields at once.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OrderSubmission {
    #[schema(example = 131172)]
    pub store_id: Option<i64>,
    pub merchant_order_id: Option<String>,
    #[schema(example = "Rahim Uddin")]
    pub recipient_name: Option<String>,
    #[schema(example = "01712345678")]
    pub recipient_phone: Option<String>,
    #[schema(example = "House 1, Road 2, Banani")]
    pub recipient_address: Option<String>,
    #[schema(example = 1)]
    pub recipient_city: Option<i32>,
    #[schema(example = 1)]
    pub recipient_zone: Option<i32>,
    pub recipient_area: Option<i32>,
    #[schema(example = 48)]
    pub delivery_type: Option<i32>,
    #[schema(example = 2)]
    pub item_type: Option<i32>,
    pub special_instruction: Option<String>,
    #[schema(example = 1)]
    pub item_quantity: Option<i32>,
    #[schema(example = 0.5)]
    pub item_weight: Option<f64>,
    #[schema(example = 500.0)]
    pub amount_to_collect: Option<f64>,
    pub item_description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedOrder {
    #[schema(example = "CID240101DHAX7Q2")]
    pub consignment_id: String,
    pub merchant_order_id: Option<String>,
    pub order_status: OrderStatus,
    #[schema(example = 60.0)]
    pub delivery_fee: f64,
}

impl From<&Order> for CreatedOrder {
    fn from(order: &Order) -> Self {
        Self {
            consignment_id: order.consignment_id.clone(),
            merchant_order_id: order.merchant_order_id.clone(),
            order_status: order.status().unwrap_or(OrderStatus::Pending),
            delivery_fee: order.delivery_fee,
        }
    }
}

/// Raw pagination parameters. Parsed leniently: junk falls back to defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersQuery {
    #[param(example = "1")]
    pub page: Option<String>,
    #[param(example = "10")]
    pub limit: Option<String>,
}

impl ListOrdersQuery {
    pub fn page(&self) -> Option<i64> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(|l| l.trim().parse().ok())
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CancelOrderQuery {
    #[param(example = "CID240101DHAX7Q2")]
    pub consignment_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedOrders {
    pub data: Vec<Order>,
    pub total: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub total_in_page: usize,
    pub last_page: i64,
}

impl From<OrderPage> for PaginatedOrders {
    fn from(page: OrderPage) -> Self {
        Self {
            total_in_page: page.orders.len(),
            data: page.orders,
            total: page.total,
            current_page: page.page,
            per_page: page.per_page,
            last_page: page.last_page,
        }
    }
}
