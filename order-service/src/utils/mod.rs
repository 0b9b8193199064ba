pub mod consignment;
pub mod password;
pub mod validation;

pub use consignment::{city_code, generate_consignment_id, CONSIGNMENT_ID_LEN, CONSIGNMENT_PREFIX};
pub use password::{hash_password, verify_password, Password, PasswordHashString};
pub use validation::{JsonBody, ValidatedJson};
