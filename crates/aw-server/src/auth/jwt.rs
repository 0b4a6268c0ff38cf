//! Token validation and issuance

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AuthConfig;

/// Claims carried by AdventureWorks API tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identity (login id)
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiry, Unix seconds
    pub exp: u64,
    #[serde(default)]
    pub iat: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid token scheme (expected Bearer)")]
    InvalidScheme,

    #[error("Empty bearer token")]
    EmptyToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid token issuer")]
    InvalidIssuer,

    #[error("Invalid token audience")]
    InvalidAudience,

    #[error("Token validation failed: {0}")]
    ValidationFailed(String),

    #[error("Token encoding failed: {0}")]
    EncodeFailed(String),
}

/// Validation and signing keys derived from [`AuthConfig`]
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
    audience: Option<String>,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    pub fn new(secret: &[u8], issuer: Option<String>, audience: Option<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer,
            audience,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.issuer.clone(),
            config.audience.clone(),
        )
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(ref issuer) = self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match self.audience {
            Some(ref audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }

    /// Verify signature, expiry, issuer and audience, returning the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map(|data| {
                debug!(subject = %data.claims.sub, "Token validated");
                data.claims
            })
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                let err = match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
                    ErrorKind::InvalidAudience => JwtError::InvalidAudience,
                    _ => JwtError::ValidationFailed(e.to_string()),
                };
                warn!(error = %err, "Rejected bearer token");
                err
            })
    }

    /// Mint a token for `subject` that expires after `ttl`
    pub fn issue_token(
        &self,
        subject: &str,
        roles: &[&str],
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: subject.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: now + ttl.as_secs(),
            iat: now,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodeFailed(e.to_string()))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, JwtError> {
    let header = header.ok_or(JwtError::MissingHeader)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(JwtError::InvalidScheme)?
        .trim();

    if token.is_empty() {
        return Err(JwtError::EmptyToken);
    }

    Ok(token)
}
