use std::env;

/// Runtime settings, read once at startup and passed down by reference.
#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://crafty.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// `host:port` as handed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "APP_ENV",
        "DATABASE_URL",
        "HOST",
        "PORT",
        "DATABASE_MAX_CONNECTIONS",
        "CORS_ALLOWED_ORIGINS",
    ];

    fn clear() {
        for var in VARS {
            // SAFETY: env-mutating tests are serialized
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_without_environment() {
        clear();
        let config = Config::from_env();
        assert_eq!(config.app_env, "development");
        assert_eq!(config.database_url, "sqlite://crafty.db?mode=rwc");
        assert_eq!(config.bind_address(), "127.0.0.1:4000");
        assert_eq!(config.max_connections, 10);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn environment_overrides_defaults() {
        clear();
        // SAFETY: env-mutating tests are serialized
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("PORT", "8080");
            env::set_var("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,");
        }
        let config = Config::from_env();
        assert!(config.is_production());
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        clear();
    }

    #[test]
    #[serial]
    fn unparsable_port_falls_back() {
        clear();
        // SAFETY: env-mutating tests are serialized
        unsafe { env::set_var("PORT", "not-a-port") };
        assert_eq!(Config::from_env().port, 4000);
        clear();
    }
}
