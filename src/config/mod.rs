use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Builds connection options field by field so passwords never need URL escaping.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub session_expiry_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("environment", "development")?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.workers", num_cpus::get() as i64)?
        .set_default("database.name", "nure_web_lab")?
        .set_default("database.user", "nure_web_lab_admin")?
        .set_default("database.password", "nure_web_lab_admin")?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432)?
        .set_default("database.max_connections", 5)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("auth.secret_key", "dev")?
        .set_default("auth.session_expiry_hours", 24)
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Instance-local secrets, kept out of version control.
            .add_source(File::with_name("instance/config").required(false))
            // E.g., `APP_DATABASE__HOST=db` would set `Settings.database.host`
            .add_source(
                Environment::with_prefix("app")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        s.try_deserialize()
    }

    /// Defaults plus explicit overrides, ignoring config files and the environment.
    pub fn with_overrides(overrides: &[(&str, &str)]) -> Result<Self, ConfigError> {
        let mut builder = with_defaults(Config::builder())?.set_override("environment", "test")?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()?.try_deserialize()
    }

    pub fn new_for_test() -> Result<Self, ConfigError> {
        Self::with_overrides(&[
            ("database.name", "nure_web_lab_test"),
            ("database.max_connections", "2"),
            ("auth.secret_key", "test_secret"),
            ("auth.session_expiry_hours", "1"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::new_for_test().expect("Failed to load settings");
        assert_eq!(settings.environment, "test");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.workers as usize, num_cpus::get());
        assert_eq!(settings.database.name, "nure_web_lab_test");
        assert_eq!(settings.database.user, "nure_web_lab_admin");
        assert_eq!(settings.database.port, 5432);
        assert_eq!(settings.database.max_connections, 2);
        assert_eq!(settings.auth.secret_key, "test_secret");
        assert_eq!(settings.auth.session_expiry_hours, 1);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::with_overrides(&[
            ("server.port", "9000"),
            ("database.host", "db.internal"),
            ("database.port", "6543"),
            ("auth.secret_key", "override_secret"),
        ])
        .expect("Failed to load settings");

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.database.host, "db.internal");
        assert_eq!(settings.database.port, 6543);
        assert_eq!(settings.auth.secret_key, "override_secret");
        assert_eq!(settings.auth.session_expiry_hours, 24);
    }

    #[test]
    fn test_invalid_port() {
        let result = Settings::with_overrides(&[("server.port", "invalid")]);
        assert!(result.is_err(), "Expected error for invalid port");
    }

    #[test]
    fn test_connect_options() {
        let settings = Settings::with_overrides(&[
            ("database.host", "pg.example"),
            ("database.port", "5433"),
            ("database.name", "lab"),
            ("database.user", "lab_user"),
            ("database.acquire_timeout_secs", "3"),
        ])
        .unwrap();

        let options = settings.database.connect_options();
        assert_eq!(options.get_host(), "pg.example");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("lab"));
        assert_eq!(options.get_username(), "lab_user");
        assert_eq!(settings.database.acquire_timeout(), Duration::from_secs(3));
    }
}
