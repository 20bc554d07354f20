use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::db::models::{Group, NewUser, User, UserSummary, UserUpdate};
use crate::error::{AppError, DatabaseError};

const USER_COLUMNS: &str = "id, username, full_name, password, is_admin, joined_at";
const USER_SUMMARY_COLUMNS: &str = "u.id, u.username, u.full_name, u.is_admin, u.joined_at";

#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        options: PgConnectOptions,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(DatabaseError::ConnectionError(e.to_string())))?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }

    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        Ok(self.pool.begin().await?)
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "user" WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "user" WHERE username = $1"#
        ))
        .bind(username)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    /// Inserts a user, relying on the `username` unique constraint.
    ///
    /// Returns [`DatabaseError::Duplicate`] when the username is taken; no row
    /// is written in that case.
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO "user" (username, full_name, password, is_admin)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.username)
        .bind(&new_user.full_name)
        .bind(&new_user.password_hash)
        .bind(new_user.is_admin)
        .fetch_optional(self.pool())
        .await?;

        match user {
            Some(user) => {
                info!("Created user {} (id {})", user.username, user.id);
                Ok(user)
            }
            None => Err(AppError::DatabaseError(DatabaseError::Duplicate)),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(&format!(
            r#"SELECT {USER_SUMMARY_COLUMNS} FROM "user" u ORDER BY u.joined_at DESC, u.id DESC"#
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }

    pub async fn list_users_in_group(&self, group_id: i32) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(&format!(
            r#"
            SELECT {USER_SUMMARY_COLUMNS}
            FROM "user" u
            JOIN group_user gu ON gu.user_id = u.id
            WHERE gu.group_id = $1
            ORDER BY u.joined_at DESC, u.id DESC
            "#
        ))
        .bind(group_id)
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }

    async fn update_user_with_groups_in_transaction(
        &self,
        id: i32,
        update: &UserUpdate,
        transaction: &mut Transaction<'_, Postgres>,
    ) -> Result<(), AppError> {
        let updated = sqlx::query(
            r#"UPDATE "user" SET full_name = $1, is_admin = $2 WHERE id = $3"#,
        )
        .bind(&update.full_name)
        .bind(update.is_admin)
        .bind(id)
        .execute(&mut **transaction)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user {}", id)));
        }

        let removed = sqlx::query("DELETE FROM group_user WHERE user_id = $1")
            .bind(id)
            .execute(&mut **transaction)
            .await?;
        debug!("Removed {} membership rows for user {}", removed.rows_affected(), id);

        if !update.group_ids.is_empty() {
            sqlx::query(
                "INSERT INTO group_user (user_id, group_id) SELECT $1, UNNEST($2::int4[])",
            )
            .bind(id)
            .bind(&update.group_ids)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(())
    }

    /// Updates the profile fields and replaces the membership set in one transaction.
    pub async fn update_user_with_groups(&self, id: i32, update: &UserUpdate) -> Result<(), AppError> {
        let mut transaction = self.begin_transaction().await?;

        let result = self
            .update_user_with_groups_in_transaction(id, update, &mut transaction)
            .await;

        match result {
            Ok(()) => {
                transaction.commit().await?;
                info!("Updated user {} with {} groups", id, update.group_ids.len());
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = transaction.rollback().await {
                    error!("Rollback failed for user {}: {}", id, rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Deletes the user; membership rows go with it through `ON DELETE CASCADE`.
    pub async fn delete_user(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM "user" WHERE id = $1"#)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user {}", id)));
        }

        info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn set_admin(&self, username: &str, is_admin: bool) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE "user" SET is_admin = $1 WHERE username = $2 RETURNING {USER_COLUMNS}"#
        ))
        .bind(is_admin)
        .bind(username)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", username)))
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, AppError> {
        let groups = sqlx::query_as::<_, Group>(r#"SELECT id, name FROM "group" ORDER BY name"#)
            .fetch_all(self.pool())
            .await?;

        Ok(groups)
    }

    pub async fn get_group(&self, id: i32) -> Result<Option<Group>, AppError> {
        let group = sqlx::query_as::<_, Group>(r#"SELECT id, name FROM "group" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(group)
    }

    pub async fn get_groups_for_user(&self, user_id: i32) -> Result<Vec<Group>, AppError> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT g.id, g.name
            FROM "group" g
            JOIN group_user gu ON gu.group_id = g.id
            WHERE gu.user_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(groups)
    }

    pub async fn create_group(&self, name: &str) -> Result<Group, AppError> {
        let group = sqlx::query_as::<_, Group>(
            r#"INSERT INTO "group" (name) VALUES ($1) RETURNING id, name"#,
        )
        .bind(name)
        .fetch_one(self.pool())
        .await?;

        info!("Created group {} (id {})", group.name, group.id);
        Ok(group)
    }

    pub async fn count_memberships(&self, user_id: i32) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM group_user WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool())
            .await?;

        Ok(count)
    }
}
