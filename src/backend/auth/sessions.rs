/**
 * Bearer Tokens
 *
 * This module issues and validates the HS256 JWTs carried in
 * `Authorization: Bearer <token>` headers.
 *
 * Validation is a pure function of the server secret, the credential and the
 * current time. Expiry is checked against the caller-supplied clock rather
 * than the library's, so the outcome for a given instant is deterministic.
 */

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Admin ID
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Identity proven by a valid bearer token
///
/// Carries no role: the role is resolved from the account store on every
/// request by the role gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Why a bearer credential was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No token provided.")]
    MissingCredential,
    #[error("Token has expired.")]
    Expired,
    #[error("Invalid token.")]
    Invalid,
    #[error("Token verification failed.")]
    VerificationFailed,
}

/// Verifies bearer credentials
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the caller's clock in `validate`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate a credential at time `now`
    ///
    /// # Errors
    /// - `AuthError::MissingCredential` if `credential` is absent or blank
    /// - `AuthError::Expired` if `exp` is at or before `now`
    /// - `AuthError::Invalid` if the token is malformed, badly signed or has
    ///   an unusable subject
    /// - `AuthError::VerificationFailed` for any other verification failure
    pub fn validate(&self, credential: Option<&str>, now: DateTime<Utc>) -> Result<Principal, AuthError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::Invalid)?;
        if expires_at <= now {
            return Err(AuthError::Expired);
        }

        let subject_id = claims.sub.parse::<i64>().map_err(|_| AuthError::Invalid)?;

        Ok(Principal { subject_id, expires_at })
    }
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => AuthError::Invalid,
        _ => AuthError::VerificationFailed,
    }
}

/// Issues bearer tokens for authenticated admins
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Create a token for `subject_id`, valid from `now` for the configured TTL
    pub fn issue(&self, subject_id: i64, now: DateTime<Utc>) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: subject_id.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
    }
}

/// Pull the token out of an `Authorization` header value
///
/// Returns `None` when the header is absent or carries an empty token, so the
/// validator reports a missing credential. A value without the `Bearer `
/// prefix is passed through whole and fails signature verification.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
        .filter(|token| !token.is_empty())
}
