//! Email address value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

const MAX_LOCAL_PART: usize = 64;

/// A syntactically valid email address.
///
/// Only the shape is checked; deliverability is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses an address, trimming surrounding whitespace.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let candidate = raw.as_ref().trim();
        check_syntax(candidate).map_err(|reason| ValidationError::invalid_format("email", reason))?;
        Ok(Self(candidate.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_syntax(candidate: &str) -> Result<(), &'static str> {
    let mut parts = candidate.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        (_, None, _) => return Err("missing @ symbol"),
        _ => return Err("more than one @ symbol"),
    };

    if local.is_empty() {
        return Err("empty local part");
    }
    if local.chars().count() > MAX_LOCAL_PART {
        return Err("local part too long");
    }
    if local.chars().any(char::is_whitespace) {
        return Err("local part contains whitespace");
    }

    if !domain.contains('.') {
        return Err("domain has no dot");
    }
    for label in domain.split('.') {
        if label.is_empty() {
            return Err("domain has an empty label");
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err("domain label starts or ends with a hyphen");
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err("domain contains invalid characters");
        }
    }
    Ok(())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
