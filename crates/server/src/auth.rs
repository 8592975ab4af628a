use crate::error::ApiError;
use crate::state::AppState;
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use database::entities::user;
use database::services::school::SchoolService;
use database::services::user::UserService;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use models::access::Actor;
use models::role::Role;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

const TOKEN_VALIDITY_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userId")]
    user_id: Uuid,
    exp: i64,
}

pub fn issue_token(secret: &str, user_id: Uuid) -> Result<String, ApiError> {
    let claims = Claims {
        user_id,
        exp: (Utc::now() + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("failed to sign token: {e}")))
}

fn decode_token(secret: &str, token: &str) -> Result<Uuid, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.user_id)
    .map_err(|_| ApiError::authentication("Invalid token."))
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("failed to hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

/// The authenticated principal. Handlers opt into authentication by taking
/// this extractor; its absence makes a route public.
#[derive(Clone)]
pub struct CurrentUser {
    pub user: user::Model,
    pub role: Role,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.user.id,
            role: self.role,
            school_id: self.user.school_id,
        }
    }

    pub fn require_role(&self, floor: Role) -> Result<(), ApiError> {
        models::access::require_role(&self.actor(), floor).map_err(ApiError::from)
    }

    /// The tenant of the actor; absent only for superadmin, which most
    /// school-scoped endpoints treat as a missing-school error.
    pub fn school_id(&self) -> Result<Uuid, ApiError> {
        self.user
            .school_id
            .ok_or_else(|| ApiError::validation("No school found"))
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    /// Verifies the bearer token, loads the user and rejects actors whose
    /// school has been blocked.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::authentication("Access denied. No token provided."))?;

        let user_id = decode_token(&state.jwt_secret, token)?;

        let user = UserService::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| ApiError::authentication("Invalid token. User not found."))?;

        let role = Role::from_str(&user.role)
            .map_err(|_| ApiError::internal(format!("unknown role in store: {}", user.role)))?;

        if role != Role::Superadmin {
            let school_id = user
                .school_id
                .ok_or_else(|| ApiError::authorization("Access denied. No school assigned."))?;
            let school = SchoolService::find_by_id(&state.db, school_id)
                .await?
                .ok_or_else(|| ApiError::authorization("Access denied. No school assigned."))?;
            if !school.is_active {
                return Err(ApiError::authorization(
                    "Access denied. Your school access has been blocked.",
                ));
            }
        }

        Ok(CurrentUser { user, role })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_token("secret", user_id).unwrap();
        assert_eq!(decode_token("secret", &token).unwrap(), user_id);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = issue_token("secret", Uuid::new_v4()).unwrap();
        assert!(decode_token("other-secret", &token).is_err());
        assert!(decode_token("secret", "not-a-token").is_err());
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter42").unwrap();
        assert_ne!(hash, "hunter42");
        assert!(verify_password("hunter42", &hash));
        assert!(!verify_password("hunter43", &hash));
        assert!(!verify_password("hunter42", "garbage-hash"));
    }
}
