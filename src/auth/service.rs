use actix_web::web;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::db::{DbOperations, NewUser, User};
use crate::error::{AppError, AuthError};

/// Account creation and credential checks on top of [`DbOperations`].
pub struct AuthService {
    db: DbOperations,
}

impl AuthService {
    pub fn new(db: DbOperations) -> Self {
        Self { db }
    }

    /// Hashes the password and inserts the user.
    ///
    /// Callers validate the fields first. A taken username surfaces as
    /// `DatabaseError::Duplicate` without a row being written.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        is_admin: bool,
    ) -> Result<User, AppError> {
        let password = password.to_string();
        let password_hash = web::block(move || hash_password(&password)).await??;

        let new_user = NewUser {
            username: username.to_string(),
            full_name: full_name.to_string(),
            password_hash,
            is_admin,
        };

        self.db.create_user(&new_user).await
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = match self.db.get_user_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown username: {}", username);
                return Err(AuthError::UnknownUsername.into());
            }
        };

        let password = password.to_string();
        let hash = user.password.clone();
        let matches = web::block(move || verify_password(&password, &hash)).await??;

        if !matches {
            warn!("Incorrect password for username: {}", username);
            return Err(AuthError::IncorrectPassword.into());
        }

        info!("User {} authenticated", user.username);
        Ok(user)
    }
}
