use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::UserRepository;
use crate::dto::auth_dto::{LoginPayload, RegisterPayload};
use crate::error::{Error, Result};
use crate::models::user::{NewUser, User, UserRole};
use crate::utils::crypto::{hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        let role: UserRole = payload.role.parse().map_err(Error::BadRequest)?;
        let username = payload.username.trim().to_string();
        let email = payload.email.trim().to_lowercase();

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(Error::AlreadyExists("Username already exists".into()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(Error::AlreadyExists("Email already registered".into()));
        }

        let password_hash = hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

        let user = self
            .users
            .create(NewUser {
                username,
                email,
                full_name: payload.full_name.trim().to_string(),
                password_hash,
                role,
            })
            .await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<User> {
        let invalid = || Error::Unauthorized("Invalid username or password".into());
        let user = self
            .users
            .find_by_username(payload.username.trim())
            .await?
            .ok_or_else(invalid)?;

        let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "stored password hash is unreadable");
            invalid()
        })?;
        if !ok {
            return Err(invalid());
        }
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::Unauthorized("Session user no longer exists".into()))
    }
}
