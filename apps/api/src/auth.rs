//! # Authentication
//!
//! JWT tokens with a role claim, argon2 password hashing, and the request
//! extractors that gate handlers.
//!
//! ## The Role Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler signature IS the access policy:                                │
//! │                                                                         │
//! │  async fn list(user: AuthUser, ...)   ← any authenticated user         │
//! │  async fn remove(user: AdminUser, ...) ← admin only (403 otherwise)    │
//! │                                                                         │
//! │  The check itself is just "role == admin"; destructive and            │
//! │  user-management endpoints require it, everything else doesn't.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teddy_core::{Role, UserAccount};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Claims & Token Service
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Access role, checked by the admin gate
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// Issues and validates access tokens.
pub struct TokenService {
    secret: String,
    lifetime_secs: i64,
}

impl TokenService {
    /// Create a new token service.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        TokenService {
            secret,
            lifetime_secs,
        }
    }

    /// Generate an access token for a user.
    pub fn issue(&self, user: &UserAccount) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password into an argon2 PHC string for storage.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored PHC string.
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::internal(format!("Stored hash is malformed: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

// =============================================================================
// Request Extractors
// =============================================================================

/// The authenticated caller, extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::unauthorized("Expected a bearer token"))?;

        let claims = state.tokens.verify(token)?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// An authenticated caller that passed the admin gate.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(ApiError::forbidden("This operation requires the admin role"));
        }

        Ok(AdminUser(user))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
