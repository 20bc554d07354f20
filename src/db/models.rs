use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const USER_USERNAME_MAX_LENGTH: usize = 150;
pub const USER_PASSWORD_MAX_LENGTH: usize = 128;
pub const USER_FULL_NAME_MAX_LENGTH: usize = 180;

pub const GROUP_NAME_MAX_LENGTH: usize = 150;

/// Full row of the `"user"` table, including the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

/// User row without the password hash, as shown in listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            is_admin: user.is_admin,
            joined_at: user.joined_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Group {
    pub id: i32,
    pub name: String,
}

/// Values for a user insert. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Admin edit of an existing user: profile fields plus the full membership set.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub full_name: String,
    pub is_admin: bool,
    pub group_ids: Vec<i32>,
}
