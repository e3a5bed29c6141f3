//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use super::{map_unique_violation, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{ensure_admin_remains, NewUser, User},
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Lock every admin row and return how many there are
async fn lock_admins(conn: &mut PgConnection) -> AppResult<i64> {
    let ids: Vec<i32> = sqlx::query_scalar("SELECT id FROM users WHERE role = $1 FOR UPDATE")
        .bind(Role::Admin)
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids.len() as i64)
}

async fn lock_user_role(conn: &mut PgConnection, id: i32) -> AppResult<Role> {
    sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, full_name, email, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Username or email already exists"))
    }

    async fn count_by_role(&self) -> AppResult<Vec<(Role, i64)>> {
        let counts = sqlx::query_as::<_, (Role, i64)>("SELECT role, COUNT(*) FROM users GROUP BY role")
            .fetch_all(&self.pool)
            .await?;
        Ok(counts)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let admin_count = lock_admins(&mut *tx).await?;
        let role = lock_user_role(&mut *tx, id).await?;
        ensure_admin_remains(role, None, admin_count)?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_role(&self, id: i32, role: Role) -> AppResult<User> {
        let mut tx = self.pool.begin().await?;

        let admin_count = lock_admins(&mut *tx).await?;
        let current = lock_user_role(&mut *tx, id).await?;
        ensure_admin_remains(current, Some(role), admin_count)?;

        let user = sqlx::query_as::<_, User>("UPDATE users SET role = $1 WHERE id = $2 RETURNING *")
            .bind(role)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(user)
    }
}
