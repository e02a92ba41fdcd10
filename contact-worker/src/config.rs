//! Configuration module for environment variable parsing.
//!
//! Everything the relay needs is read once at startup into a typed [`Config`]
//! and handed to the router; handlers never touch the process environment.

use std::env;

use secrecy::Secret;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Cloudflare Turnstile siteverify endpoint.
pub const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("environment variable {name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Turnstile secret key sent alongside every token verification
    pub turnstile_secret_key: Secret<String>,

    /// Discord webhook receiving accepted submissions
    pub discord_webhook_url: String,

    /// Origins (`scheme://host[:port]`) allowed to read responses cross-origin
    pub allowed_origins: Vec<String>,

    /// Turnstile verification endpoint, overridable for tests
    pub turnstile_verify_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let turnstile_secret_key =
            required(&lookup, "TURNSTILE_SECRET_KEY").map(Secret::new)?;

        let discord_webhook_url = required(&lookup, "DISCORD_WEBHOOK_URL")?;
        Url::parse(&discord_webhook_url).map_err(|source| ConfigError::InvalidUrl {
            name: "DISCORD_WEBHOOK_URL",
            source,
        })?;

        let turnstile_verify_url = match lookup("TURNSTILE_VERIFY_URL") {
            Some(raw) if !raw.trim().is_empty() => {
                let raw = raw.trim().to_string();
                Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
                    name: "TURNSTILE_VERIFY_URL",
                    source,
                })?;
                raw
            }
            _ => TURNSTILE_VERIFY_URL.to_string(),
        };

        Ok(Config {
            port: parse_port(lookup("PORT"), 8080),
            turnstile_secret_key,
            discord_webhook_url,
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|raw| parse_csv(&raw))
                .unwrap_or_default(),
            turnstile_verify_url,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_port(raw: Option<String>, default: u16) -> u16 {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse() {
        Ok(port) => port,
        Err(_) => {
            warn!(env_var = "PORT", value = %raw, "Invalid port, using default");
            default
        }
    }
}

/// Parse a comma-separated list of strings.
fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
