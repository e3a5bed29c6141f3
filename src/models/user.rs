//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::Role;
use crate::error::AppError;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(max = 50, message = "Username must be at most 50 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Validated account handed to the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: Role,
}

/// Update role request (admin only)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRole {
    pub role: Role,
}

/// Number of accounts per role
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct UserStats {
    pub total: i64,
    pub admins: i64,
    pub technicians: i64,
    pub users: i64,
}

impl UserStats {
    pub fn from_counts(counts: &[(Role, i64)]) -> Self {
        let mut stats = UserStats::default();
        for (role, count) in counts {
            match role {
                Role::Admin => stats.admins += count,
                Role::Technician => stats.technicians += count,
                Role::User => stats.users += count,
            }
            stats.total += count;
        }
        stats
    }
}

/// Reject removing (`new_role = None`) or demoting the only remaining admin
pub fn ensure_admin_remains(
    current_role: Role,
    new_role: Option<Role>,
    admin_count: i64,
) -> Result<(), AppError> {
    let loses_admin = current_role == Role::Admin && new_role != Some(Role::Admin);
    if loses_admin && admin_count <= 1 {
        return Err(AppError::LastAdmin);
    }
    Ok(())
}

/// Identity of the user performing an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    /// Require admin or technician privileges
    pub fn require_technician(&self) -> Result<(), AppError> {
        match self.role {
            Role::Admin | Role::Technician => Ok(()),
            Role::User => Err(AppError::Authorization(
                "Technician or Admin privileges required".to_string(),
            )),
        }
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub full_name: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.user_id,
            username: self.sub.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_validation_messages() {
        let request = CreateUser {
            username: "jdoe".into(),
            password: "abc".into(),
            confirm_password: "abd".into(),
            full_name: "John Doe".into(),
            email: Some("not-an-email".into()),
            role: None,
        };

        let err = AppError::from(request.validate().unwrap_err()).to_string();
        assert!(err.contains("at least 6 characters"));
        assert!(err.contains("Passwords do not match"));
        assert!(err.contains("Invalid email format"));
    }

    #[test]
    fn token_round_trip_preserves_caller() {
        let claims = UserClaims {
            sub: "tech1".into(),
            user_id: 7,
            full_name: "Ama Mensah".into(),
            role: Role::Technician,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        };
        let token = claims.create_token("secret").unwrap();
        let caller = UserClaims::from_token(&token, "secret").unwrap().caller();

        assert_eq!(caller.user_id, 7);
        assert_eq!(caller.role, Role::Technician);
        assert!(caller.require_technician().is_ok());
        assert!(caller.require_admin().is_err());
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn last_admin_guard() {
        assert!(matches!(ensure_admin_remains(Role::Admin, None, 1), Err(AppError::LastAdmin)));
        assert!(matches!(
            ensure_admin_remains(Role::Admin, Some(Role::User), 1),
            Err(AppError::LastAdmin)
        ));
        assert!(ensure_admin_remains(Role::Admin, Some(Role::Admin), 1).is_ok());
        assert!(ensure_admin_remains(Role::Admin, None, 2).is_ok());
        assert!(ensure_admin_remains(Role::Technician, None, 1).is_ok());
    }

    #[test]
    fn stats_fold_role_counts() {
        let stats = UserStats::from_counts(&[(Role::Admin, 2), (Role::User, 5)]);
        assert_eq!(stats.total, 7);
        assert_eq!(stats.admins, 2);
        assert_eq!(stats.technicians, 0);
    }
}
