//! Services layer: token handling, authorization, the order engine and storage.

mod auth;
mod database;
pub mod error;
mod jwt;
mod memory;
pub mod metrics;
mod orders;
pub mod rules;
mod store;

pub use auth::{AuthService, Authorizer};
pub use database::Database;
pub use error::ServiceError;
pub use jwt::{JwtService, TokenClaims, TokenError, TokenPair};
pub use memory::InMemoryStore;
pub use orders::{normalize_pagination, OrderPage, OrderService, DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use store::{OrderStore, StoreError};
