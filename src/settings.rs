use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

use crate::constants::{DEFAULT_RATE_LIMIT_MAX, DEFAULT_RATE_LIMIT_WINDOW_SECS};

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

    /// Store for contact records. Left unset, inserts fail and are logged.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Shared rate-limit counters. Left unset, counters live in process memory.
    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Transactional email API key. Left unset, every send fails.
    #[serde(default)]
    pub email_api_key: Option<String>,

    #[serde(default = "default_email_api_url")]
    pub email_api_url: Url,

    #[serde(default = "default_email_from")]
    pub email_from: String,

    #[serde(default)]
    pub contact_recipient: String,

    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,

    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_rate_limit_sweep")]
    pub rate_limit_sweep_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Contact".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_email_api_url() -> Url {
    Url::parse("https://api.resend.com/").expect("static URL is valid")
}
fn default_email_from() -> String {
    "Portfolio Contact <onboarding@resend.dev>".to_string()
}
fn default_rate_limit_max() -> u32 {
    DEFAULT_RATE_LIMIT_MAX
}
fn default_rate_limit_window() -> u64 {
    DEFAULT_RATE_LIMIT_WINDOW_SECS
}
fn default_rate_limit_sweep() -> u64 {
    10 * 60
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
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        if config.contact_recipient.trim().is_empty() {
            config.contact_recipient = env::var("APP_CONTACT_RECIPIENT").unwrap_or_default();
        }
        config.email_api_key = config.email_api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env::var("RESEND_API_KEY").ok());

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.contact_recipient.trim().is_empty() {
            errors.push("CONTACT_RECIPIENT cannot be empty");
        }
        if self.email_from.trim().is_empty() {
            errors.push("EMAIL_FROM cannot be empty");
        }
        if self.rate_limit_max == 0 {
            errors.push("RATE_LIMIT_MAX must be greater than zero");
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be greater than zero");
        }
        if self.cors_origins().is_empty() {
            errors.push("CORS_ALLOWED_ORIGINS must list at least one origin");
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

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// `true` when any origin may call the API. Anything else turns off the
    /// blanket `Access-Control-Allow-Origin: *`.
    pub fn cors_is_wildcard(&self) -> bool {
        self.cors_origins().iter().any(|origin| origin == "*")
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn rate_limit_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_secs.max(1))
    }
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

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self.as_deref() {
            None | Some("") => "[MISSING]",
            Some(_) => "[REDACTED]",
        }
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
            .field("redis_url", &self.redis_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("email_api_key", &self.email_api_key.redact())
            .field("email_api_url", &self.email_api_url.as_str())
            .field("email_from", &self.email_from)
            .field("contact_recipient", &self.contact_recipient)
            .field("rate_limit_max", &self.rate_limit_max)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("rate_limit_sweep_secs", &self.rate_limit_sweep_secs)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Contact Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: None,
        redis_url: None,
        cors_allowed_origins: vec!["*".to_string()],
        email_api_key: Some("re_test_key".to_string()),
        email_api_url: default_email_api_url(),
        email_from: default_email_from(),
        contact_recipient: "owner@example.com".to_string(),
        rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
        rate_limit_window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
        rate_limit_sweep_secs: 600,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_test_config_is_valid() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_collects_every_problem() {
        let mut config = test_config();
        config.contact_recipient = "  ".into();
        config.rate_limit_max = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("CONTACT_RECIPIENT"));
        assert!(err.contains("RATE_LIMIT_MAX"));
    }

    #[test]
    fn cors_origins_split_comma_lists() {
        let mut config = test_config();
        config.cors_allowed_origins = vec!["https://a.dev, https://b.dev".into(), " ".into()];
        assert_eq!(config.cors_origins(), vec!["https://a.dev", "https://b.dev"]);
        assert!(!config.cors_is_wildcard());
    }

    #[test]
    fn default_cors_is_wildcard() {
        assert!(test_config().cors_is_wildcard());

        let mut config = test_config();
        config.cors_allowed_origins = vec!["https://a.dev,*".into()];
        assert!(config.cors_is_wildcard());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = test_config();
        config.database_url = Some("postgres://user:hunter2@db/portfolio".into());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("re_test_key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("Production".parse::<AppEnvironment>().unwrap(), AppEnvironment::Production);
        assert!("staging".parse::<AppEnvironment>().is_err());
    }
}
