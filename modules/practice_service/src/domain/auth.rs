//! Password sign-up, sign-in and bearer sessions
//!
//! Sessions are stateless HS256 tokens carrying the user id (`sub`) and e-mail.

use super::crypto::{hash_password, verify_password};
use super::repository::ProfileRepository;
use super::validation;
use crate::contract::{AuthContext, PracticeError, Profile, Session};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

pub struct AuthService {
    profiles: Arc<dyn ProfileRepository>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    password_iterations: u32,
}

fn internal(err: anyhow::Error) -> PracticeError {
    tracing::error!(error = ?err, "Profile repository call failed");
    PracticeError::Internal
}

impl AuthService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        secret: &[u8],
        token_ttl: Duration,
        password_iterations: u32,
    ) -> Self {
        Self {
            profiles,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            token_ttl,
            password_iterations,
        }
    }

    /// Register a user and create its profile
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Profile, PracticeError> {
        let email = email.trim().to_lowercase();
        validation::validate_email(&email)?;
        validation::validate_password(password)?;
        if full_name.trim().is_empty() {
            return Err(PracticeError::validation("full_name is required"));
        }

        if self
            .profiles
            .find_credentials(&email)
            .await
            .map_err(internal)?
            .is_some()
        {
            return Err(PracticeError::Conflict {
                reason: "e-mail already registered".to_string(),
            });
        }

        let iterations = self.password_iterations;
        let password = password.to_string();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password, iterations))
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, "Password hashing task failed");
                PracticeError::Internal
            })?;

        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            email,
            full_name: full_name.trim().to_string(),
            role: None,
            phone: None,
            bar_number: None,
            created_at: now,
            updated_at: now,
        };
        let created = self
            .profiles
            .create(&profile, &hash)
            .await
            .map_err(internal)?;
        tracing::info!(user_id = %created.id, "User signed up");
        Ok(created)
    }

    /// Check credentials and issue a session token
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, PracticeError> {
        let email = email.trim().to_lowercase();
        let Some((profile, hash)) = self
            .profiles
            .find_credentials(&email)
            .await
            .map_err(internal)?
        else {
            tracing::debug!("Sign-in for unknown e-mail");
            return Err(PracticeError::InvalidCredentials);
        };

        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, "Password verification task failed");
                PracticeError::Internal
            })?;
        if !valid {
            tracing::debug!(user_id = %profile.id, "Sign-in with wrong password");
            return Err(PracticeError::InvalidCredentials);
        }

        let user = AuthContext::new(profile.id, profile.email);
        self.issue(user)
    }

    /// Resolve a bearer token into the caller's context
    pub fn session(&self, token: &str) -> Result<AuthContext, PracticeError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            tracing::debug!(error = %err, "Rejected session token");
            PracticeError::Unauthenticated
        })?;
        let user_id =
            Uuid::parse_str(&data.claims.sub).map_err(|_| PracticeError::Unauthenticated)?;
        Ok(AuthContext::new(user_id, data.claims.email))
    }

    fn issue(&self, user: AuthContext) -> Result<Session, PracticeError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;
        let claims = Claims {
            sub: user.user_id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| {
                tracing::error!(error = %err, "Failed to sign session token");
                PracticeError::Internal
            })?;
        Ok(Session {
            access_token,
            expires_at,
            user,
        })
    }
}
