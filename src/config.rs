/// Application configuration loaded from environment variables
///
/// Every value has a development default so the server can start with no
/// environment at all, backed by the in-memory repositories.
#[derive(Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub addr: String,
    /// Postgres connection string; in-memory repositories are used when unset
    pub database_url: Option<String>,
    /// Shared scorekeeper password checked at login
    pub shared_password: String,
    /// Secret used to sign session tokens
    pub jwt_secret: String,
    /// Session token lifetime in days
    pub session_expiration_days: i64,
    /// How long after creation a game may still be deleted
    pub game_delete_grace_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let session_expiration_days = std::env::var("SESSION_EXPIRATION_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(365);

        let game_delete_grace_minutes = std::env::var("GAME_DELETE_GRACE_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(15);

        Self {
            addr: std::env::var("TALLYBOARD_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            shared_password: std::env::var("TALLYBOARD_PASSWORD")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            session_expiration_days,
            game_delete_grace_minutes,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_has_usable_defaults() {
        let config = AppConfig::default();

        assert!(!config.addr.is_empty());
        assert!(!config.shared_password.is_empty());
        assert!(!config.jwt_secret.is_empty());
        assert!(config.session_expiration_days > 0);
        assert!(config.game_delete_grace_minutes > 0);
    }

    #[test]
    fn test_config_supports_test_overrides() {
        let config = AppConfig {
            shared_password: "letmein".to_string(),
            ..AppConfig::default()
        };

        assert_eq!(config.shared_password, "letmein");
    }
}
