//! PostgreSQL-backed order store.
//!
//! Reads used for authentication and listing go to the read pool; the
//! create and cancel paths stay on the write pool.

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use super::store::{OrderStore, StoreError};
use crate::db;
use crate::models::{NewOrder, Order, OrderStatus, User, UserId, NOT_ARCHIVED, TRANSFER_STATUS_ACTIVE};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct Database {
    read: PgPool,
    write: PgPool,
}

impl Database {
    pub fn new(read: PgPool, write: PgPool) -> Self {
        Self { read, write }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(anyhow::Error::new(err))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[async_trait]
impl OrderStore for Database {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT id, email, password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.read)
            .await
            .map_err(backend)
    }

    async fn find_order_by_consignment_and_user(
        &self,
        consignment_id: &str,
        user_id: UserId,
    ) -> Result<Option<Order>, StoreError> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE consignment_id = $1 AND user_id = $2",
        )
        .bind(consignment_id)
        .bind(user_id)
        .fetch_optional(&self.write)
        .await
        .map_err(backend)
    }

    async fn update_order_status(
        &self,
        consignment_id: &str,
        user_id: UserId,
        status: OrderStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE orders SET order_status = $1 WHERE consignment_id = $2 AND user_id = $3",
        )
        .bind(status.as_str())
        .bind(consignment_id)
        .bind(user_id)
        .execute(&self.write)
        .await
        .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                store_id, merchant_order_id, recipient_name, recipient_phone, recipient_address,
                recipient_city, recipient_zone, recipient_area, delivery_type, item_type,
                special_instruction, item_quantity, item_weight, amount_to_collect,
                item_description, consignment_id, order_status, delivery_fee, cod_fee, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING *
            "#,
        )
        .bind(order.store_id)
        .bind(&order.merchant_order_id)
        .bind(&order.recipient_name)
        .bind(&order.recipient_phone)
        .bind(&order.recipient_address)
        .bind(order.recipient_city)
        .bind(order.recipient_zone)
        .bind(order.recipient_area)
        .bind(order.delivery_type)
        .bind(order.item_type)
        .bind(&order.special_instruction)
        .bind(order.item_quantity)
        .bind(order.item_weight)
        .bind(order.amount_to_collect)
        .bind(&order.item_description)
        .bind(&order.consignment_id)
        .bind(order.order_status.as_str())
        .bind(order.delivery_fee)
        .bind(order.cod_fee)
        .bind(order.user_id)
        .fetch_one(&self.write)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateConsignment(order.consignment_id.clone())
            } else {
                backend(e)
            }
        })
    }

    async fn list_orders(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, StoreError> {
        sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE user_id = $1 AND transfer_status = $2 AND archive = $3
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(TRANSFER_STATUS_ACTIVE)
        .bind(NOT_ARCHIVED)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.read)
        .await
        .map_err(backend)
    }

    async fn count_orders(&self, user_id: UserId) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND transfer_status = $2 AND archive = $3",
        )
        .bind(user_id)
        .bind(TRANSFER_STATUS_ACTIVE)
        .bind(NOT_ARCHIVED)
        .fetch_one(&self.read)
        .await
        .map_err(backend)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        for pool in [&self.read, &self.write] {
            db::health_check(pool).await.map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                backend(e)
            })?;
        }
        Ok(())
    }
}
