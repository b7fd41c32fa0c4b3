//! Send-endpoint resolution.
//!
//! The configured host may be a region domain (`zoho.eu`), a bare hostname
//! (`api.example.com`) or a full base URL (`https://api.example.com/`).

use super::{MailError, Result};

/// Path of the send-email API, appended to every resolved host.
pub const SEND_PATH: &str = "/v1.1/email";

/// Region domains and the ZeptoMail subdomain each one maps to.
const REGION_DOMAINS: [(&str, &str); 8] = [
    ("zoho.com", "zoho.com"),
    ("zoho.eu", "zoho.eu"),
    ("zoho.in", "zoho.in"),
    ("zoho.com.cn", "zoho.com.cn"),
    ("zoho.com.au", "zoho.com.au"),
    ("zoho.jp", "zoho.jp"),
    ("zohocloud.ca", "zohocloud.ca"),
    ("zoho.sa", "zoho.sa"),
];

/// Turns a configured host into the full send-email URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointResolver;

impl EndpointResolver {
    /// Resolves `host` to `https://.../v1.1/email`.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Configuration`] when the host is empty once
    /// whitespace and surrounding slashes are removed.
    pub fn resolve(host: &str) -> Result<String> {
        let host = host.trim().trim_matches('/');

        if host.is_empty() {
            return Err(MailError::configuration("ZeptoMail host is not configured."));
        }

        if let Some(region) = Self::region_for(host) {
            return Ok(format!("https://zeptomail.{}{}", region, SEND_PATH));
        }

        let base = if has_http_scheme(host) {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        Ok(format!("{}{}", base.trim_end_matches('/'), SEND_PATH))
    }

    /// Region subdomain for an exact region-domain match.
    pub fn region_for(host: &str) -> Option<&'static str> {
        REGION_DOMAINS
            .iter()
            .find(|(domain, _)| *domain == host)
            .map(|(_, region)| *region)
    }

    /// All recognised region domains.
    pub fn region_domains() -> impl Iterator<Item = &'static str> {
        REGION_DOMAINS.iter().map(|(domain, _)| *domain)
    }
}

fn has_http_scheme(host: &str) -> bool {
    let lower = host.get(..8).unwrap_or(host).to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}
