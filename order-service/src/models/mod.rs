pub mod order;
pub mod user;

pub use order::{NewOrder, Order, OrderStatus, NOT_ARCHIVED, TRANSFER_STATUS_ACTIVE};
pub use user::{Principal, User, UserId};
