//! # User Repository
//!
//! Staff account storage.
//!
//! Password hashes are argon2 PHC strings, written once at create/reset and
//! compared in the API's auth layer; they are never logged and never leave
//! this table in API responses.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use teddy_core::UserAccount;

const USER_COLUMNS: &str = "id, email, password_hash, display_name, role, created_at";

/// Repository for staff account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets an account by email (the login lookup).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<UserAccount>> {
        let user = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1 COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets an account by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<UserAccount>> {
        let user = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all accounts, oldest first.
    pub async fn list(&self) -> DbResult<Vec<UserAccount>> {
        let users = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Creates an account.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email already registered
    pub async fn insert(&self, user: &UserAccount) -> DbResult<()> {
        debug!(email = %user.email, "Creating user account");

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, display_name, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an account's profile, role, and (optionally) password hash.
    pub async fn update(&self, user: &UserAccount) -> DbResult<()> {
        debug!(id = %user.id, "Updating user account");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = ?2,
                password_hash = ?3,
                display_name = ?4,
                role = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(user.role)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &user.id));
        }

        Ok(())
    }

    /// Deletes an account.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting user account");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Counts accounts (used by the seed tool to detect a fresh database).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use teddy_core::Role;

    fn account(email: &str, role: Role) -> UserAccount {
        UserAccount {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            display_name: "Test User".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_email_lookup_is_case_insensitive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        repo.insert(&account("owner@teddy.lk", Role::Admin)).await.unwrap();

        let user = repo.get_by_email("OWNER@teddy.lk").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        repo.insert(&account("a@teddy.lk", Role::Cashier)).await.unwrap();
        let err = repo
            .insert(&account("a@teddy.lk", Role::Cashier))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let mut user = account("a@teddy.lk", Role::Cashier);
        repo.insert(&user).await.unwrap();

        user.role = Role::Admin;
        user.display_name = "Promoted".to_string();
        repo.update(&user).await.unwrap();

        let fetched = repo.get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.role, Role::Admin);
        assert_eq!(fetched.display_name, "Promoted");

        repo.delete(&user.id).await.unwrap();
        assert!(repo.delete(&user.id).await.unwrap_err().is_not_found());
    }
}
