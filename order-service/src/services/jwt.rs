use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and validates HS256 token pairs.
///
/// Access and refresh tokens share one claim shape; nothing inside a token says
/// which kind it is. Callers decide which endpoints accept which token.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_in: i64,
    pub refresh_expires_in: i64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token is malformed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        }
    }
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        let secret = config.secret.expose_secret();
        if secret.is_empty() {
            return Err(anyhow::anyhow!("JWT secret must not be empty"));
        }

        tracing::info!(
            access_ttl_seconds = config.access_token_expiry_seconds,
            refresh_ttl_seconds = config.refresh_token_expiry_seconds,
            "JWT service initialized with HS256"
        );

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_seconds: config.access_token_expiry_seconds,
            refresh_ttl_seconds: config.refresh_token_expiry_seconds,
        })
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    /// Issue a pair using the configured TTLs.
    pub fn issue_token_pair(&self, email: &str) -> Result<TokenPair, anyhow::Error> {
        self.issue_token_pair_with(email, self.access_ttl_seconds, self.refresh_ttl_seconds)
    }

    pub fn issue_token_pair_with(
        &self,
        email: &str,
        access_ttl_seconds: i64,
        refresh_ttl_seconds: i64,
    ) -> Result<TokenPair, anyhow::Error> {
        Ok(TokenPair {
            access_token: self.sign(email, access_ttl_seconds)?,
            refresh_token: self.sign(email, refresh_ttl_seconds)?,
            access_expires_in: access_ttl_seconds,
            refresh_expires_in: refresh_ttl_seconds,
        })
    }

    fn sign(&self, email: &str, ttl_seconds: i64) -> Result<String, anyhow::Error> {
        let claims = TokenClaims {
            email: email.to_string(),
            exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    /// Verify signature and expiry, then return the claims.
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}
