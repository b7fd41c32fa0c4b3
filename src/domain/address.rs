//! Mailbox addresses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Email address.
    pub email: String,
    /// Display name (e.g., "John Doe").
    pub name: Option<String>,
}

impl Address {
    /// Creates a new address with just an email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Creates a new address with email and display name.
    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }

    /// Display name, or the empty string when none is set.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Whether two addresses refer to the same mailbox.
    ///
    /// Display names are ignored and the address is compared ASCII
    /// case-insensitively.
    pub fn same_mailbox(&self, other: &Address) -> bool {
        self.email.eq_ignore_ascii_case(&other.email)
    }

    /// Returns the display representation of this address.
    ///
    /// If a name is present, returns "Name <email>", otherwise just the email.
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => format!("{} <{}>", name, self.email),
            _ => self.email.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Error returned when a mailbox string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid mailbox: {0}")]
pub struct AddressParseError(String);

impl FromStr for Address {
    type Err = AddressParseError;

    /// Parses `"Name <email@example.com>"` or a bare `"email@example.com"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AddressParseError(value.to_string()));
        }

        if let Some(start) = value.find('<') {
            let end = value
                .rfind('>')
                .filter(|end| *end > start)
                .ok_or_else(|| AddressParseError(value.to_string()))?;
            let email = value[start + 1..end].trim().to_string();
            if email.is_empty() {
                return Err(AddressParseError(value.to_string()));
            }
            let name = value[..start].trim().trim_matches('"').to_string();
            return Ok(Address {
                email,
                name: if name.is_empty() { None } else { Some(name) },
            });
        }

        Ok(Address::new(value))
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Address::new(email)
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Address::new(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_display_with_name() {
        let addr = Address::with_name("test@example.com", "Test User");
        assert_eq!(addr.display(), "Test User <test@example.com>");
    }

    #[test]
    fn address_display_without_name() {
        let addr = Address::new("test@example.com");
        assert_eq!(addr.to_string(), "test@example.com");
    }

    #[test]
    fn empty_name_displays_bare_address() {
        let addr = Address::with_name("test@example.com", "");
        assert_eq!(addr.display(), "test@example.com");
        assert_eq!(addr.name_or_empty(), "");
    }

    #[test]
    fn same_mailbox_ignores_case_and_name() {
        let a = Address::with_name("Alice@Example.com", "Alice");
        let b = Address::new("alice@example.com");
        assert!(a.same_mailbox(&b));
        assert!(!a.same_mailbox(&Address::new("bob@example.com")));
    }

    #[test]
    fn parse_named_mailbox() {
        let addr: Address = "\"Jane Doe\" <jane@example.com>".parse().unwrap();
        assert_eq!(addr.email, "jane@example.com");
        assert_eq!(addr.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn parse_bare_mailbox() {
        let addr: Address = "  jane@example.com ".parse().unwrap();
        assert_eq!(addr, Address::new("jane@example.com"));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("".parse::<Address>().is_err());
        assert!("Jane <jane@example.com".parse::<Address>().is_err());
        assert!("Jane <>".parse::<Address>().is_err());
    }
}
