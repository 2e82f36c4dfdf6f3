use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    /// Shared secret administrators must present at signup. Unset or blank
    /// disables administrator self-registration.
    #[serde(default)]
    pub admin_invite_code: Option<String>,
}

impl AuthConfig {
    pub fn invite_code(&self) -> Option<&str> {
        self.admin_invite_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite://imena.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.access_token_minutes", 60)?
            .set_default("auth.refresh_token_days", 1)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with IMENA__ prefix, double underscore separates levels)
            .add_source(
                Environment::with_prefix("IMENA")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite://imena.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production".to_string(),
                access_token_minutes: 60,
                refresh_token_days: 1,
                admin_invite_code: None,
            },
            cors: CorsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_invite_code_disables_admin_signup() {
        let mut auth = Settings::default().auth;
        assert_eq!(auth.invite_code(), None);

        auth.admin_invite_code = Some("   ".to_string());
        assert_eq!(auth.invite_code(), None);

        auth.admin_invite_code = Some(" ride-together ".to_string());
        assert_eq!(auth.invite_code(), Some("ride-together"));
    }
}
