pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod users;
pub mod validation;
pub mod views;

use std::sync::Arc;
use sqlx::PgPool;
use actix_web::{web, HttpResponse};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, SessionManager};
pub use db::{DbOperations, Group, User};

/// Health check endpoint handler
/// Returns a JSON response with server status, database reachability and timestamp
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match state.db.ping().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            "down"
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: DbOperations,
    pub auth_service: Arc<AuthService>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::new_with_options(
            config.database.connect_options(),
            config.database.max_connections,
            config.database.acquire_timeout(),
        )
        .await?;

        Ok(Self::with_db(config, db))
    }

    /// Builds the state around an existing pool.
    pub fn from_pool(config: Settings, pool: PgPool) -> Self {
        Self::with_db(config, DbOperations::new(Arc::new(pool)))
    }

    fn with_db(config: Settings, db: DbOperations) -> Self {
        let sessions = SessionManager::new(
            config.auth.secret_key.clone(),
            config.auth.session_expiry_hours,
        );

        Self {
            config: Arc::new(config),
            auth_service: Arc::new(AuthService::new(db.clone())),
            sessions: Arc::new(sessions),
            db,
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.db.close().await;
        Ok(())
    }
}

/// Registers every route plus the extractor configs that turn malformed
/// path and query parameters into 400 responses.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .route("/", web::get().to(users::handlers::get_user_list))
    .route("/health", web::get().to(health_check))
    .configure(auth::configure)
    .configure(users::configure);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[actix_web::test]
    async fn test_app_state_creation_fails_without_database() {
        let config = Settings::with_overrides(&[
            ("database.host", "127.0.0.1"),
            ("database.port", "1"),
            ("database.acquire_timeout_secs", "1"),
        ])
        .expect("Failed to load test config");
        let state = AppState::new(config).await;

        assert!(state.is_err());
        if let Err(e) = state {
            assert!(matches!(e, AppError::DatabaseError(_)));
        }
    }

    #[actix_web::test]
    async fn test_app_state_clone() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let pool = PgPoolOptions::new()
            .connect_lazy_with(config.database.connect_options());

        let state = AppState::from_pool(config, pool);
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.config, &cloned.config));
        assert!(Arc::ptr_eq(&state.sessions, &cloned.sessions));
        assert!(Arc::ptr_eq(&state.auth_service, &cloned.auth_service));
    }
}
