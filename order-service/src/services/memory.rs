//! In-process order store for tests and local runs without PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::store::{OrderStore, StoreError};
use crate::models::{NewOrder, Order, OrderStatus, User, UserId, NOT_ARCHIVED};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    orders: Vec<Order>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    user_lookups: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with an already hashed password. Emails are unique.
    pub async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "duplicate user email: {}",
                email
            )));
        }

        let user = User::new(
            tables.users.len() as UserId + 1,
            email.to_string(),
            password_hash.to_string(),
        );
        tables.users.push(user.clone());
        Ok(user)
    }

    /// Overwrite a status regardless of owner, as back-office tooling would.
    #[cfg(any(test, feature = "testing"))]
    pub async fn force_status(&self, consignment_id: &str, status: OrderStatus) -> bool {
        let mut tables = self.tables.write().await;
        match tables
            .orders
            .iter_mut()
            .find(|o| o.consignment_id == consignment_id)
        {
            Some(order) => {
                order.order_status = status.as_str().to_string();
                true
            }
            None => false,
        }
    }

    #[cfg(any(test, feature = "testing"))]
    pub async fn archive(&self, consignment_id: &str) -> bool {
        let mut tables = self.tables.write().await;
        match tables
            .orders
            .iter_mut()
            .find(|o| o.consignment_id == consignment_id)
        {
            Some(order) => {
                order.archive = 1;
                true
            }
            None => false,
        }
    }

    /// Number of `find_user_by_email` calls served so far.
    #[cfg(any(test, feature = "testing"))]
    pub fn user_lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_order_by_consignment_and_user(
        &self,
        consignment_id: &str,
        user_id: UserId,
    ) -> Result<Option<Order>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .find(|o| o.consignment_id == consignment_id && o.user_id == user_id)
            .cloned())
    }

    async fn update_order_status(
        &self,
        consignment_id: &str,
        user_id: UserId,
        status: OrderStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables
            .orders
            .iter_mut()
            .find(|o| o.consignment_id == consignment_id && o.user_id == user_id)
        {
            Some(order) => {
                order.order_status = status.as_str().to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .orders
            .iter()
            .any(|o| o.consignment_id == order.consignment_id)
        {
            return Err(StoreError::DuplicateConsignment(order.consignment_id.clone()));
        }

        let id = tables.orders.len() as i64 + 1;
        let stored = order.clone().into_order(id, Utc::now());
        tables.orders.push(stored.clone());
        Ok(stored)
    }

    async fn list_orders(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, StoreError> {
        let tables = self.tables.read().await;
        let mut owned: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| o.user_id == user_id && o.is_listed())
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(owned
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_orders(&self, user_id: UserId) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.user_id == user_id && o.is_listed())
            .count() as i64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    fn new_order(user_id: UserId, consignment_id: &str) -> NewOrder {
        NewOrder {
            store_id: 131172,
            merchant_order_id: None,
            recipient_name: "Rahim".to_string(),
            recipient_phone: "01712345678".to_string(),
            recipient_address: "House 1, Road 2".to_string(),
            recipient_city: 1,
            recipient_zone: 1,
            recipient_area: None,
            delivery_type: 48,
            item_type: 2,
            special_instruction: None,
            item_quantity: 1,
            item_weight: 0.5,
            amount_to_collect: 500.0,
            item_description: None,
            consignment_id: consignment_id.to_string(),
            order_status: OrderStatus::Pending,
            delivery_fee: 60.0,
            cod_fee: 5.0,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_consignment_rejected() {
        let store = InMemoryStore::new();
        store.insert_order(&new_order(1, "CID240101DHAAAAA")).await.unwrap();

        let err = store
            .insert_order(&new_order(2, "CID240101DHAAAAA"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateConsignment(_)));
    }

    #[tokio::test]
    async fn test_lookup_is_scoped_to_owner() {
        let store = InMemoryStore::new();
        store.insert_order(&new_order(1, "CID240101DHAAAAA")).await.unwrap();

        assert!(store
            .find_order_by_consignment_and_user("CID240101DHAAAAA", 1)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_order_by_consignment_and_user("CID240101DHAAAAA", 2)
            .await
            .unwrap()
            .is_none());
        assert!(!store
            .update_order_status("CID240101DHAAAAA", 2, OrderStatus::Cancelled)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_listing_skips_archived_and_is_newest_first() {
        let store = InMemoryStore::new();
        for id in ["CID240101DHAAAA1", "CID240101DHAAAA2", "CID240101DHAAAA3"] {
            store.insert_order(&new_order(1, id)).await.unwrap();
        }
        store.archive("CID240101DHAAAA2").await;

        let listed = store.list_orders(1, 10, 0).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|o| o.consignment_id.as_str()).collect();
        assert_eq!(ids, vec!["CID240101DHAAAA3", "CID240101DHAAAA1"]);
        assert_eq!(store.count_orders(1).await.unwrap(), 2);
        assert_eq!(store.count_orders(2).await.unwrap(), 0);
    }
}
