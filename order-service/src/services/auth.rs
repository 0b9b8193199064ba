use std::sync::Arc;

use crate::{
    dtos::LoginRequest,
    models::Principal,
    services::{
        metrics::{record_login, LoginOutcome},
        JwtService, OrderStore, ServiceError, TokenPair,
    },
    utils::{verify_password, Password, PasswordHashString},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves bearer tokens into principals.
///
/// Every call performs exactly one user lookup; nothing is cached between
/// requests.
#[derive(Clone)]
pub struct Authorizer {
    jwt: JwtService,
    store: Arc<dyn OrderStore>,
}

impl Authorizer {
    pub fn new(jwt: JwtService, store: Arc<dyn OrderStore>) -> Self {
        Self { jwt, store }
    }

    /// Extract the token from an `Authorization` header value.
    pub fn bearer_token(header: Option<&str>) -> Result<&str, ServiceError> {
        header
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ServiceError::MissingOrMalformedToken)
    }

    pub async fn authenticate(&self, header: Option<&str>) -> Result<Principal, ServiceError> {
        let token = Self::bearer_token(header)?;
        self.resolve_token(token).await
    }

    /// Validate a bare token and map its email to a stored user.
    pub async fn resolve_token(&self, token: &str) -> Result<Principal, ServiceError> {
        let claims = self.jwt.validate_token(token).map_err(|e| {
            tracing::debug!(reason = %e, "Rejected bearer token");
            ServiceError::Token(e)
        })?;

        if claims.email.is_empty() {
            return Err(ServiceError::Unauthorized);
        }

        let user = self
            .store
            .find_user_by_email(&claims.email)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        Ok(Principal::from(&user))
    }
}

#[derive(Clone)]
pub struct AuthService {
    jwt: JwtService,
    store: Arc<dyn OrderStore>,
}

impl AuthService {
    pub fn new(jwt: JwtService, store: Arc<dyn OrderStore>) -> Self {
        Self { jwt, store }
    }

    pub async fn login(&self, req: LoginRequest) -> Result<TokenPair, ServiceError> {
        let Some(user) = self.store.find_user_by_email(&req.email).await? else {
            record_login(LoginOutcome::UnknownUser);
            tracing::warn!(email = %req.email, "Login for unknown email");
            return Err(ServiceError::UserNotFound);
        };

        let matches = verify_password(
            &Password::new(req.password),
            &PasswordHashString::new(user.password.clone()),
        )
        .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password verification error: {}", e)))?;

        if !matches {
            record_login(LoginOutcome::BadPassword);
            tracing::warn!(email = %user.email, "Login with incorrect password");
            return Err(ServiceError::InvalidCredentials);
        }

        let pair = self.jwt.issue_token_pair(&user.email)?;
        record_login(LoginOutcome::Success);
        tracing::info!(user_id = user.id, email = %user.email, "User logged in");
        Ok(pair)
    }

    /// Exchange a still-valid token for a fresh pair.
    ///
    /// Any unexpired token signed by this service is accepted here, access
    /// tokens included.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ServiceError> {
        let claims = self.jwt.validate_token(refresh_token)?;
        let pair = self.jwt.issue_token_pair(&claims.email)?;
        tracing::info!(email = %claims.email, "Token pair refreshed");
        Ok(pair)
    }
}
