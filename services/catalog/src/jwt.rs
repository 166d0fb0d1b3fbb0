//! JWT service for token generation and validation
//!
//! This module provides functionality for creating and validating bearer
//! tokens signed with a shared HMAC secret. Tokens carry a subject and an
//! expiry claim; nothing is persisted.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Signing algorithm (HMAC family)
    pub algorithm: Algorithm,
    /// Access token expiration time in seconds (default: 30 minutes)
    pub access_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: shared signing secret (required)
    /// - `JWT_ALGORITHM`: HS256, HS384 or HS512 (default: HS256)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: access token expiry in seconds (default: 1800)
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            std::env::var("JWT_SECRET").ok(),
            std::env::var("JWT_ALGORITHM").ok(),
            std::env::var("JWT_ACCESS_TOKEN_EXPIRY").ok(),
        )
    }

    fn from_values(
        secret: Option<String>,
        algorithm: Option<String>,
        expiry: Option<String>,
    ) -> Result<Self> {
        let secret =
            secret.ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let algorithm = match algorithm.as_deref() {
            None | Some("HS256") => Algorithm::HS256,
            Some("HS384") => Algorithm::HS384,
            Some("HS512") => Algorithm::HS512,
            Some(other) => anyhow::bail!("Unsupported JWT algorithm: {}", other),
        };

        let access_token_expiry = expiry.and_then(|s| s.parse().ok()).unwrap_or(1800);

        Ok(JwtConfig {
            secret,
            algorithm,
            access_token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Token validation failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The expiry claim has passed
    #[error("Expired token")]
    Expired,
    /// Bad signature or malformed payload
    #[error("Invalid token")]
    Invalid,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue an access token with the configured expiry
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_with_ttl(subject, Duration::from_secs(self.config.access_token_expiry))
    }

    /// Issue an access token that expires after `ttl`
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.as_secs(),
        };

        let token = encode(
            &Header::new(self.config.algorithm),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// Validate a token and return the claims
    ///
    /// An unverified token is never partially trusted: signature and expiry
    /// checks both run before any claim is returned.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            algorithm: Algorithm::HS256,
            access_token_expiry: 1800,
        })
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let service = test_service("test-secret");

        let token = service.issue("alice").unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, claims.iat + 1800);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = test_service("test-secret");

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub: "alice".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(service.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = test_service("one-secret");
        let verifier = test_service("another-secret");

        let token = issuer.issue("alice").unwrap();

        assert!(matches!(
            verifier.validate(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = test_service("test-secret");

        assert!(matches!(
            service.validate("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_config_requires_secret() {
        assert!(JwtConfig::from_values(None, None, None).is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = JwtConfig::from_values(Some("s".to_string()), None, None).unwrap();

        assert_eq!(config.algorithm, Algorithm::HS256);
        assert_eq!(config.access_token_expiry, 1800);
    }

    #[test]
    fn test_config_rejects_non_hmac_algorithms() {
        let result =
            JwtConfig::from_values(Some("s".to_string()), Some("RS256".to_string()), None);
        assert!(result.is_err());
    }
}
