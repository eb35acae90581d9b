//! Strongly-typed identifier value objects.
//!
//! Document ids are opaque strings assigned by the store, so every id here
//! wraps a non-empty `String` rather than a UUID.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new id, returning error if empty or blank.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::missing_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a member document.
    MemberId,
    "id"
);
string_id!(
    /// Identifier of a course document.
    CourseId,
    "courses"
);
string_id!(
    /// Identifier of a group document.
    GroupId,
    "groups"
);
string_id!(
    /// Identifier of an event document.
    EventId,
    "events"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_rejects_empty() {
        assert_eq!(MemberId::new(""), Err(ValidationError::missing_field("id")));
    }

    #[test]
    fn member_id_rejects_whitespace() {
        assert!(MemberId::new("   ").is_err());
    }

    #[test]
    fn course_id_error_names_relationship_field() {
        let err = CourseId::new("").unwrap_err();
        assert_eq!(err.field(), "courses");
    }

    #[test]
    fn id_displays_inner_value() {
        let id = EventId::new("evt-42").unwrap();
        assert_eq!(id.to_string(), "evt-42");
        assert_eq!(id.as_str(), "evt-42");
    }

    #[test]
    fn id_serializes_transparently() {
        let id = GroupId::new("choir").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"choir\"");
    }

    #[test]
    fn id_deserialization_rejects_empty() {
        let result: Result<GroupId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
