//! Database module
//!
//! Connection pool wrapper, row models and the bundled schema.

pub mod models;
pub mod operations;
pub mod schema;

pub use models::{Group, NewUser, User, UserSummary, UserUpdate};
pub use operations::DbOperations;
