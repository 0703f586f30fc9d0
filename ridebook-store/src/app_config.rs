use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub seating: SeatingConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Bookings live in memory when no url is configured
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// Taken seats come from `seating.demo_taken_seats` when no url is configured
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    /// Accounts signing up with one of these emails get the admin role
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeatingConfig {
    #[serde(default = "default_taken_seats")]
    pub demo_taken_seats: Vec<u32>,
    #[serde(default = "default_row_width")]
    pub row_width: u32,
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            demo_taken_seats: default_taken_seats(),
            row_width: default_row_width(),
        }
    }
}

/// Booking wizard sessions idle for longer than `ttl_seconds` are dropped
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_session_ttl() -> u64 {
    30 * 60
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_taken_seats() -> Vec<u32> {
    vec![7, 14, 21, 28, 35]
}

fn default_row_width() -> u32 {
    ridebook_catalog::seating::DEFAULT_ROW_WIDTH
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // untracked developer overrides
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. RIDEBOOK__SERVER__PORT=8080
            .add_source(config::Environment::with_prefix("RIDEBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_sections_fall_back() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 3000

                [auth]
                jwt_secret = "secret"
                jwt_expiration_seconds = 3600
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let cfg: Config = s.try_deserialize().unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.database.url.is_none());
        assert!(cfg.redis.url.is_none());
        assert!(cfg.auth.admin_emails.is_empty());
        assert_eq!(cfg.seating.demo_taken_seats, vec![7, 14, 21, 28, 35]);
        assert_eq!(cfg.seating.row_width, 4);
        assert_eq!(cfg.sessions.ttl_seconds, 1800);
        assert_eq!(cfg.sessions.sweep_interval_seconds, 60);
    }
}
