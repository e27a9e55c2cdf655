use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks before detaching them.
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// HMAC secret for inbound provider webhooks. When unset, unsigned
    /// deliveries are accepted and a warning is logged on each one.
    pub provider_webhook_secret: Option<String>,
    /// Voice-call provider registration endpoint. When unset (or the API
    /// key is missing), sessions get placeholder call ids instead.
    pub provider_api_url: Option<String>,
    /// Bearer key for the voice-call provider.
    pub provider_api_key: Option<String>,
    /// Remote answer-scoring endpoint. When unset, the built-in lexical
    /// scorer is used.
    pub scorer_api_url: Option<String>,
    /// Bearer key for the remote scorer, when it requires one.
    pub scorer_api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `PROVIDER_WEBHOOK_SECRET` | unset (unsigned accepted)  |
    /// | `PROVIDER_API_URL`        | unset (placeholder calls)  |
    /// | `PROVIDER_API_KEY`        | unset                      |
    /// | `SCORER_API_URL`          | unset (lexical scorer)     |
    /// | `SCORER_API_KEY`          | unset                      |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable is set to something unparseable, or if
    /// [`JwtConfig::from_env`] panics.
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            provider_webhook_secret: env_opt("PROVIDER_WEBHOOK_SECRET"),
            provider_api_url: env_opt("PROVIDER_API_URL"),
            provider_api_key: env_opt("PROVIDER_API_KEY"),
            scorer_api_url: env_opt("SCORER_API_URL"),
            scorer_api_key: env_opt("SCORER_API_KEY"),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn env_parse<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} is invalid: {e}")),
        Err(_) => default,
    }
}

/// Read an optional env var, treating empty values as unset.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
