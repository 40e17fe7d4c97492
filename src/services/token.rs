//! HS384 token issuing and verification.
//!
//! The `jti` claim carries the user's auth key, which is the server-side
//! revocation handle: rotating the key or flagging the account invalidates
//! every outstanding token without tracking them individually.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::entities::users::{self, UserRole};

pub const TOKEN_SUBJECT: &str = "auth";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Signing key is not configured")]
    MissingKey,

    #[error("Failed to encode token: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Auth key of the account the token was issued for
    pub jti: String,

    pub sub: String,

    pub role: UserRole,

    pub iat: i64,

    pub exp: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Per-call overrides for token issuing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOptions {
    pub expiration_hours: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: chrono::DateTime<Utc>,
    pub expires_at: chrono::DateTime<Utc>,
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration_hours: i64,
    issuer: Option<String>,
    audience: Option<String>,
}

impl TokenIssuer {
    /// Fails when the signing key is missing, so a misconfigured server
    /// refuses to start instead of issuing unverifiable tokens.
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        if config.jwt_key.trim().is_empty() {
            return Err(TokenError::MissingKey);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(config.jwt_key.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_key.as_bytes()),
            expiration_hours: config.token_expiration_hours,
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
        })
    }

    pub fn issue(
        &self,
        user: &users::Model,
        options: Option<TokenOptions>,
    ) -> Result<IssuedToken, TokenError> {
        let hours = options
            .and_then(|o| o.expiration_hours)
            .unwrap_or(self.expiration_hours);

        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::hours(hours);

        let claims = Claims {
            jti: user.auth_key.clone(),
            sub: TOKEN_SUBJECT.to_string(),
            role: user.role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS384), &claims, &self.encoding)
            .map_err(TokenError::Encode)?;

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Verify signature and expiry, returning the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS384);
        validation.set_required_spec_claims(&["exp", "jti", "sub"]);

        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &self.audience {
            validation.set_audience(&[audience]);
        }

        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(TokenError::Invalid)?;

        Ok(data.claims)
    }
}
