use jsonwebtoken::Algorithm;
use std::{env, fmt, str::FromStr};

const DEFAULT_ALGORITHM: &str = "HS256";
const DEFAULT_TOKEN_MINUTES: i64 = 30;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Runtime settings, read once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    /// HMAC secret used to sign and verify access tokens.
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, reason } => write!(f, "{} is invalid: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests never touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let algorithm = parse_or(&lookup, "ALGORITHM", DEFAULT_ALGORITHM.to_string())?;
        let algorithm = Algorithm::from_str(&algorithm).map_err(|e| ConfigError::Invalid {
            key: "ALGORITHM",
            reason: e.to_string(),
        })?;
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::Invalid {
                key: "ALGORITHM",
                reason: "only HS256, HS384 and HS512 are supported".into(),
            });
        }

        let access_token_expire_minutes =
            parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_MINUTES)?;
        if access_token_expire_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: "must be positive".into(),
            });
        }

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: "must be between 4 and 31".into(),
            });
        }

        let secret_key = required("SECRET_KEY")?;
        if secret_key.is_empty() {
            return Err(ConfigError::Invalid {
                key: "SECRET_KEY",
                reason: "must not be empty".into(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            secret_key,
            algorithm,
            access_token_expire_minutes,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
