//! Order engine: submission, cancellation and listing.

use std::sync::Arc;

use crate::{
    dtos::OrderSubmission,
    models::{NewOrder, Order, OrderStatus, Principal, UserId},
    services::{
        metrics::{record_order_cancelled, record_order_created, record_validation_failure},
        rules::{cod_fee, delivery_fee, validate_submission},
        Authorizer, OrderStore, ServiceError,
    },
    utils::{city_code, generate_consignment_id},
};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

/// One page of a user's orders plus the aggregate used for navigation.
#[derive(Debug)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub last_page: i64,
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    authorizer: Authorizer,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, authorizer: Authorizer) -> Self {
        Self { store, authorizer }
    }

    /// Validate and create an order for the caller named by the raw
    /// `Authorization` header value.
    ///
    /// Identity resolution runs as its own task while the rules are checked
    /// on this one; both always finish before anything is decided. A rule
    /// violation wins over any authentication failure, a missing header
    /// included.
    pub async fn submit(
        &self,
        submission: OrderSubmission,
        authorization: Option<String>,
    ) -> Result<Order, ServiceError> {
        let authorizer = self.authorizer.clone();
        let resolution =
            tokio::spawn(async move { authorizer.authenticate(authorization.as_deref()).await });

        let errors = validate_submission(&submission);

        let principal = resolution
            .await
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Authorization task failed: {}", e)));

        if !errors.is_empty() {
            record_validation_failure();
            tracing::info!(
                fields = ?errors.keys().collect::<Vec<_>>(),
                "Order submission failed validation"
            );
            return Err(ServiceError::Validation(errors));
        }

        let principal: Principal = principal??;
        self.create(submission, principal.user_id).await
    }

    /// Price, number and persist an already validated submission.
    pub async fn create(
        &self,
        submission: OrderSubmission,
        user_id: UserId,
    ) -> Result<Order, ServiceError> {
        let new_order = build_new_order(submission, user_id)?;
        let order = self.store.insert_order(&new_order).await?;

        record_order_created();
        tracing::info!(
            consignment_id = %order.consignment_id,
            user_id = user_id,
            delivery_fee = order.delivery_fee,
            "Order created"
        );
        Ok(order)
    }

    /// Cancel a pending order owned by `user_id`.
    ///
    /// Orders of other users are reported exactly like missing ones. The
    /// read and the write are not transactional; concurrent cancels of the
    /// same order both succeed.
    pub async fn cancel(&self, consignment_id: &str, user_id: UserId) -> Result<(), ServiceError> {
        let consignment_id = consignment_id.trim();
        if consignment_id.is_empty() {
            return Err(ServiceError::MissingConsignmentId);
        }

        let order = self
            .store
            .find_order_by_consignment_and_user(consignment_id, user_id)
            .await?
            .ok_or(ServiceError::OrderNotFoundOrNotOwned)?;

        match order.status() {
            Some(OrderStatus::Pending) => {}
            Some(OrderStatus::Cancelled) => return Err(ServiceError::AlreadyCancelled),
            _ => return Err(ServiceError::RequiresManualIntervention),
        }

        let updated = self
            .store
            .update_order_status(consignment_id, user_id, OrderStatus::Cancelled)
            .await?;
        if !updated {
            return Err(ServiceError::OrderNotFoundOrNotOwned);
        }

        record_order_cancelled();
        tracing::info!(consignment_id = %consignment_id, user_id = user_id, "Order cancelled");
        Ok(())
    }

    pub async fn list(
        &self,
        user_id: UserId,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> Result<OrderPage, ServiceError> {
        let (page, per_page) = normalize_pagination(page, per_page);
        let offset = page_offset(page, per_page).unwrap_or(0);

        let orders = self.store.list_orders(user_id, per_page, offset).await?;
        let total = self.store.count_orders(user_id).await?;

        Ok(OrderPage {
            orders,
            total,
            page,
            per_page,
            last_page: last_page(total, per_page),
        })
    }
}

/// Non-positive, oversized or absent values fall back to the defaults. A
/// page whose offset does not fit in an `i64` counts as oversized.
pub fn normalize_pagination(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let per_page = per_page
        .filter(|p| (1..=MAX_PER_PAGE).contains(p))
        .unwrap_or(DEFAULT_PER_PAGE);
    let page = page
        .filter(|p| page_offset(*p, per_page).is_some())
        .unwrap_or(DEFAULT_PAGE);
    (page, per_page)
}

fn page_offset(page: i64, per_page: i64) -> Option<i64> {
    if page < 1 {
        return None;
    }
    (page - 1).checked_mul(per_page)
}

fn last_page(total: i64, per_page: i64) -> i64 {
    (total + per_page - 1) / per_page
}

fn build_new_order(submission: OrderSubmission, user_id: UserId) -> Result<NewOrder, ServiceError> {
    let missing = |field: &str| {
        ServiceError::Internal(anyhow::anyhow!("validated submission lacks {}", field))
    };

    let recipient_city = submission.recipient_city.ok_or_else(|| missing("recipient_city"))?;
    let amount_to_collect = submission
        .amount_to_collect
        .ok_or_else(|| missing("amount_to_collect"))?;

    Ok(NewOrder {
        store_id: submission.store_id.ok_or_else(|| missing("store_id"))?,
        merchant_order_id: submission.merchant_order_id,
        recipient_name: submission
            .recipient_name
            .map(|v| v.trim().to_string())
            .ok_or_else(|| missing("recipient_name"))?,
        recipient_phone: submission
            .recipient_phone
            .map(|v| v.trim().to_string())
            .ok_or_else(|| missing("recipient_phone"))?,
        recipient_address: submission
            .recipient_address
            .map(|v| v.trim().to_string())
            .ok_or_else(|| missing("recipient_address"))?,
        recipient_city,
        recipient_zone: submission.recipient_zone.ok_or_else(|| missing("recipient_zone"))?,
        recipient_area: submission.recipient_area,
        delivery_type: submission.delivery_type.ok_or_else(|| missing("delivery_type"))?,
        item_type: submission.item_type.ok_or_else(|| missing("item_type"))?,
        special_instruction: submission.special_instruction,
        item_quantity: submission.item_quantity.ok_or_else(|| missing("item_quantity"))?,
        item_weight: submission.item_weight.ok_or_else(|| missing("item_weight"))?,
        amount_to_collect,
        item_description: submission.item_description,
        consignment_id: generate_consignment_id(city_code(recipient_city)),
        order_status: OrderStatus::Pending,
        delivery_fee: delivery_fee(recipient_city),
        cod_fee: cod_fee(amount_to_collect),
        user_id,
    })
}
