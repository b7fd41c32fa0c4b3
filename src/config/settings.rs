//! Transport configuration types.
//!
//! Configuration is owned by the host application. These types describe the
//! keys the transport understands and how driver-level defaults combine with
//! per-mailer settings.

use serde::{Deserialize, Serialize};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "ZEPTOMAIL_API_KEY";
/// Environment variable holding the API host or region.
pub const ENV_HOST: &str = "ZEPTOMAIL_HOST";
/// Environment variable toggling TLS certificate verification.
pub const ENV_SSL_VERIFY: &str = "ZEPTOMAIL_SSL_VERIFY";

/// Settings for a ZeptoMail transport instance.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Value sent verbatim in the `Authorization` header.
    #[serde(default)]
    pub api_key: String,
    /// API host, full base URL, or region domain such as `zoho.eu`.
    #[serde(default)]
    pub host: String,
    /// Whether TLS certificates are verified.
    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,
}

fn default_ssl_verify() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: String::new(),
            ssl_verify: default_ssl_verify(),
        }
    }
}

// The API key never shows up in debug output.
impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("ssl_verify", &self.ssl_verify)
            .finish()
    }
}

impl TransportConfig {
    pub fn new(api_key: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: host.into(),
            ..Default::default()
        }
    }

    /// Disables or enables TLS certificate verification.
    pub fn with_ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.ssl_verify = ssl_verify;
        self
    }

    /// Reads `ZEPTOMAIL_API_KEY`, `ZEPTOMAIL_HOST` and `ZEPTOMAIL_SSL_VERIFY`.
    ///
    /// Missing variables keep their defaults; an unrecognised
    /// `ZEPTOMAIL_SSL_VERIFY` value is ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let overrides = ConfigOverrides {
            api_key: lookup(ENV_API_KEY),
            host: lookup(ENV_HOST),
            ssl_verify: lookup(ENV_SSL_VERIFY).and_then(|raw| {
                let parsed = parse_bool(&raw);
                if parsed.is_none() {
                    tracing::warn!(value = %raw, "ignoring unrecognised {}", ENV_SSL_VERIFY);
                }
                parsed
            }),
        };

        Self::default().merged_with(overrides)
    }

    /// Applies per-mailer overrides on top of these settings.
    ///
    /// Keys present in `overrides` win; absent keys keep the current value.
    pub fn merged_with(self, overrides: ConfigOverrides) -> Self {
        Self {
            api_key: overrides.api_key.unwrap_or(self.api_key),
            host: overrides.host.unwrap_or(self.host),
            ssl_verify: overrides.ssl_verify.unwrap_or(self.ssl_verify),
        }
    }
}

/// Partial configuration, typically a single mailer's block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub ssl_verify: Option<bool>,
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
