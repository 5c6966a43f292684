use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "test" => Some(Environment::Test),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    /// Whether unexpected failures are reported to clients in detail.
    pub fn verbose_errors(self) -> bool {
        !matches!(self, Environment::Production)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at startup and handed to the
/// components that need it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_token: String,
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub enable_hsts: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub const DEFAULT_PORT: u16 = 8000;

    /// Defaults for everything but the token.
    pub fn new(api_token: impl Into<String>, environment: Environment) -> Self {
        Self {
            api_token: api_token.into(),
            environment,
            host: "0.0.0.0".into(),
            port: Self::DEFAULT_PORT,
            database_url: None,
            data_dir: None,
            enable_hsts: false,
            cors_origins: Vec::new(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // treat `FOO=` the same as an unset variable
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_token = get("API_TOKEN").ok_or(ConfigError::Missing("API_TOKEN"))?;
        let environment = match get("APP_ENV") {
            Some(v) => Environment::parse(&v).ok_or(ConfigError::Invalid { name: "APP_ENV", value: v })?,
            None => Environment::Development,
        };

        let mut cfg = Self::new(api_token, environment);
        if let Some(host) = get("HOST") {
            cfg.host = host;
        }
        if let Some(port) = get("PORT") {
            cfg.port = port.trim().parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: port })?;
        }
        cfg.database_url = get("DATABASE_URL");
        cfg.data_dir = get("NOTEFUL_DATA_DIR").map(PathBuf::from);
        cfg.enable_hsts = get("ENABLE_HSTS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        cfg.cors_origins = get("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Ok(cfg)
    }
}
