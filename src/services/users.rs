//! Authentication and user management service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::UsersConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{ensure_admin_remains, Caller, CreateUser, NewUser, User, UserClaims, UserStats},
    },
    repository::UserStore,
};

use super::blank_to_none;

#[derive(Clone)]
pub struct UsersService {
    store: Arc<dyn UserStore>,
    config: UsersConfig,
}

impl UsersService {
    pub fn new(store: Arc<dyn UserStore>, config: UsersConfig) -> Self {
        Self { store, config }
    }

    /// Authenticate by username and password, returning a JWT and the user
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .store
            .get_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(&user.password_hash, password)? {
            tracing::warn!("Failed login for {}", user.username);
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.username);
        Ok((token, user))
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            full_name: user.full_name.clone(),
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Create the configured admin account when no user exists yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<Option<User>> {
        let total: i64 = self.store.count_by_role().await?.iter().map(|(_, n)| n).sum();
        if total > 0 {
            return Ok(None);
        }

        let admin = NewUser {
            username: self.config.bootstrap_admin_username.clone(),
            password_hash: hash_password(&self.config.bootstrap_admin_password)?,
            full_name: self.config.bootstrap_admin_full_name.clone(),
            email: None,
            role: Role::Admin,
        };
        let user = self.store.create(&admin).await?;
        tracing::warn!(
            "No users found, created bootstrap admin '{}'; change its password",
            user.username
        );
        Ok(Some(user))
    }

    /// Account of the authenticated caller
    pub async fn me(&self, caller: &Caller) -> AppResult<User> {
        self.store.get_by_id(caller.user_id).await
    }

    pub async fn list(&self, caller: &Caller) -> AppResult<Vec<User>> {
        caller.require_admin()?;
        self.store.list().await
    }

    pub async fn get_by_id(&self, caller: &Caller, id: i32) -> AppResult<User> {
        caller.require_admin()?;
        self.store.get_by_id(id).await
    }

    pub async fn create(&self, caller: &Caller, data: CreateUser) -> AppResult<User> {
        caller.require_admin()?;

        let data = CreateUser {
            username: data.username.trim().to_string(),
            full_name: data.full_name.trim().to_string(),
            email: blank_to_none(data.email),
            ..data
        };
        if data.username.is_empty() || data.password.is_empty() || data.full_name.is_empty() {
            return Err(AppError::Validation(
                "Username, password and full name are required".to_string(),
            ));
        }
        data.validate()?;

        if self.store.username_exists(&data.username).await? {
            return Err(AppError::Duplicate("Username already exists".to_string()));
        }
        if let Some(ref email) = data.email {
            if self.store.email_exists(email).await? {
                return Err(AppError::Duplicate("Email already exists".to_string()));
            }
        }

        let new_user = NewUser {
            password_hash: hash_password(&data.password)?,
            username: data.username,
            full_name: data.full_name,
            email: data.email,
            role: data.role.unwrap_or_default(),
        };
        let user = self.store.create(&new_user).await?;
        tracing::info!("User {} created by {} with role {}", user.username, caller.username, user.role.as_str());
        Ok(user)
    }

    pub async fn delete(&self, caller: &Caller, id: i32) -> AppResult<()> {
        caller.require_admin()?;
        if caller.user_id == id {
            return Err(AppError::SelfDelete);
        }

        let target = self.store.get_by_id(id).await?;
        self.check_admin_remains(&target, None).await?;

        self.store.delete(id).await?;
        tracing::info!("User {} deleted by {}", target.username, caller.username);
        Ok(())
    }

    pub async fn update_role(&self, caller: &Caller, id: i32, role: Role) -> AppResult<User> {
        caller.require_admin()?;
        if caller.user_id == id {
            return Err(AppError::SelfRoleChange);
        }

        let target = self.store.get_by_id(id).await?;
        self.check_admin_remains(&target, Some(role)).await?;

        let user = self.store.update_role(id, role).await?;
        tracing::info!(
            "Role of {} changed from {} to {} by {}",
            user.username,
            target.role.as_str(),
            role.as_str(),
            caller.username
        );
        Ok(user)
    }

    pub async fn stats(&self) -> AppResult<UserStats> {
        let counts = self.store.count_by_role().await?;
        Ok(UserStats::from_counts(&counts))
    }

    async fn check_admin_remains(&self, target: &User, new_role: Option<Role>) -> AppResult<()> {
        if target.role != Role::Admin {
            return Ok(());
        }
        let admins = UserStats::from_counts(&self.store.count_by_role().await?).admins;
        ensure_admin_remains(target.role, new_role, admins).map_err(|e| {
            tracing::warn!("Refused to remove the last admin ({})", target.username);
            e
        })
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
