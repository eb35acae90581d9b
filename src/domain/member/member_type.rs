//! Member type definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Standing of a person within the congregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberType {
    /// Baptized, full member.
    Baptized,

    /// Attends but is not a baptized member.
    Visitor,
}

impl MemberType {
    /// Accepted spellings, in declaration order.
    pub const ALLOWED: &'static [&'static str] = &["Baptized", "Visitor"];

    /// Returns the display name for this type.
    pub fn display_name(&self) -> &'static str {
        match self {
            MemberType::Baptized => "Baptized",
            MemberType::Visitor => "Visitor",
        }
    }
}

impl std::fmt::Display for MemberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for MemberType {
    type Err = ValidationError;

    /// Matching is exact: `"baptized"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Baptized" => Ok(MemberType::Baptized),
            "Visitor" => Ok(MemberType::Visitor),
            other => Err(ValidationError::invalid_enum(
                "memberType",
                other,
                Self::ALLOWED,
            )),
        }
    }
}
