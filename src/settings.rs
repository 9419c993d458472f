use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Thresholds for the abuse guard.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitSettings {
    /// Submissions allowed per IP inside one window.
    #[serde(default = "default_ip_max")]
    pub ip_max: usize,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Minimum gap between two submissions of the same kind from one email. 0 disables.
    #[serde(default = "default_email_cooldown_secs")]
    pub email_cooldown_secs: u64,

    #[serde(default = "default_eviction_interval_secs")]
    pub eviction_interval_secs: u64,
}

impl RateLimitSettings {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn email_cooldown(&self) -> Duration {
        Duration::from_secs(self.email_cooldown_secs)
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        RateLimitSettings {
            ip_max: default_ip_max(),
            window_secs: default_window_secs(),
            email_cooldown_secs: default_email_cooldown_secs(),
            eviction_interval_secs: default_eviction_interval_secs(),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_max_db_connections")]
    pub max_db_connections: u32,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Take the client IP from the first `X-Forwarded-For` entry.
    #[serde(default = "default_true")]
    pub trust_x_forwarded_for: bool,

    #[serde(default = "default_true")]
    pub verify_mx: bool,

    #[serde(default = "default_dns_timeout_secs")]
    pub dns_timeout_secs: u64,

    #[serde(default = "default_recent_requests_limit")]
    pub recent_requests_limit: i64,

    /// Echo the latest service requests back in the submission response.
    #[serde(default)]
    pub expose_recent_requests: bool,

    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Form-Intake-API".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_max_db_connections() -> u32 {
    20
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_true() -> bool {
    true
}
fn default_dns_timeout_secs() -> u64 {
    5
}
fn default_recent_requests_limit() -> i64 {
    10
}
fn default_ip_max() -> usize {
    5
}
fn default_window_secs() -> u64 {
    60
}
fn default_email_cooldown_secs() -> u64 {
    60
}
fn default_eviction_interval_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        if config.database_url.trim().is_empty() {
            config.database_url = database_url_from_parts(|key| env::var(key).ok()).unwrap_or_default();
        }

        // Plain PORT is what most hosting platforms inject
        if env::var("APP_PORT").is_err() {
            if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse().ok()) {
                config.port = port;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.rate_limit.ip_max == 0 {
            errors.push("RATE_LIMIT__IP_MAX must be at least 1");
        }
        if self.rate_limit.window_secs == 0 {
            errors.push("RATE_LIMIT__WINDOW_SECS must be at least 1");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Builds a Postgres URL from the `DB_HOST`/`DB_USER`/`DB_PASS`/`DB_NAME` quartet.
///
/// `None` when none of them is set. A missing host means `localhost`.
pub fn database_url_from_parts<F>(var: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = var("DB_HOST");
    let user = var("DB_USER");
    let pass = var("DB_PASS");
    let name = var("DB_NAME");

    if host.is_none() && user.is_none() && pass.is_none() && name.is_none() {
        return None;
    }

    let host = host.unwrap_or_else(|| "localhost".into());
    let user = user.unwrap_or_else(|| "postgres".into());
    let name = name.unwrap_or_else(|| "form_intake".into());

    let credentials = match pass.filter(|p| !p.is_empty()) {
        Some(pass) => format!("{user}:{pass}"),
        None => user,
    };

    Some(format!("postgres://{credentials}@{host}/{name}"))
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("max_db_connections", &self.max_db_connections)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("verify_mx", &self.verify_mx)
            .field("dns_timeout_secs", &self.dns_timeout_secs)
            .field("recent_requests_limit", &self.recent_requests_limit)
            .field("expose_recent_requests", &self.expose_recent_requests)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}
