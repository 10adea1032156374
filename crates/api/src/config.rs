use std::net::IpAddr;
use std::str::FromStr;

/// Startup configuration problem. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// `PORT` is required; everything else has a default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port. No default.
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`). Does not apply to
    /// upgraded connections.
    pub request_timeout_secs: u64,
    /// Seconds between heartbeat pings (default: `30`, `0` disables).
    pub heartbeat_interval_secs: u64,
    /// How long shutdown waits for relay connections to finish (default: `10`).
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default    |
    /// |---------------------------|------------|
    /// | `PORT`                    | (required) |
    /// | `HOST`                    | `0.0.0.0`  |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`       |
    /// | `HEARTBEAT_INTERVAL_SECS` | `30`       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `10`       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => parse_var("PORT", raw)?,
            None => return Err(ConfigError::Missing("PORT")),
        };

        Ok(Self {
            host: parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?,
            port,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            heartbeat_interval_secs: parse_or(&lookup, "HEARTBEAT_INTERVAL_SECS", 30)?,
            shutdown_timeout_secs: parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 10)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(raw) => parse_var(var, raw),
        None => Ok(default),
    }
}

fn parse_var<T: FromStr>(var: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value: raw })
}
