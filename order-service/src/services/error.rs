use service_core::error::{AppError, FieldErrors};
use thiserror::Error;

use super::jwt::TokenError;
use super::store::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Missing Bearer Token")]
    MissingOrMalformedToken,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User not found")]
    UserNotFound,

    #[error("The user credentials were incorrect.")]
    InvalidCredentials,

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Consignment ID is required")]
    MissingConsignmentId,

    #[error("Order not found")]
    OrderNotFoundOrNotOwned,

    #[error("Order already cancelled")]
    AlreadyCancelled,

    #[error("Please contact cx to cancel order")]
    RequiresManualIntervention,

    #[error("Database error: {0}")]
    Database(anyhow::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateConsignment(id) => {
                ServiceError::Database(anyhow::anyhow!("duplicate consignment id: {}", id))
            }
            StoreError::Backend(e) => ServiceError::Database(e),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Token(_)
            | ServiceError::MissingOrMalformedToken
            | ServiceError::Unauthorized
            | ServiceError::UserNotFound
            | ServiceError::InvalidCredentials => AppError::Unauthorized(anyhow::anyhow!(message)),
            ServiceError::Validation(fields) => AppError::FieldErrors(fields),
            ServiceError::MissingConsignmentId => AppError::BadRequest(anyhow::anyhow!(message)),
            ServiceError::OrderNotFoundOrNotOwned => AppError::NotFound(anyhow::anyhow!(message)),
            ServiceError::AlreadyCancelled | ServiceError::RequiresManualIntervention => {
                AppError::Conflict(anyhow::anyhow!(message))
            }
            ServiceError::Database(e) => AppError::DatabaseError(e),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
