use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewOrder, Order, OrderStatus, User, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate consignment id: {0}")]
    DuplicateConsignment(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence seam for users and orders.
///
/// Implementations decide which connection serves each call; callers never do.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fetch an order only if `user_id` owns it.
    async fn find_order_by_consignment_and_user(
        &self,
        consignment_id: &str,
        user_id: UserId,
    ) -> Result<Option<Order>, StoreError>;

    /// Returns `false` when no owned row matched.
    async fn update_order_status(
        &self,
        consignment_id: &str,
        user_id: UserId,
        status: OrderStatus,
    ) -> Result<bool, StoreError>;

    /// Fails with `DuplicateConsignment` if the consignment id is taken.
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError>;

    /// Active, non-archived orders of `user_id`, newest first.
    async fn list_orders(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, StoreError>;

    async fn count_orders(&self, user_id: UserId) -> Result<i64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
