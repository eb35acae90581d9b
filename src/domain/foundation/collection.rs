//! Store collections and references into them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named collections held by the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Members,
    Courses,
    Groups,
    Events,
}

impl Collection {
    /// Collection name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Members => "members",
            Collection::Courses => "courses",
            Collection::Groups => "groups",
            Collection::Events => "events",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A `(collection, id)` key. Only existence matters, never content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionRef {
    pub collection: Collection,
    pub id: String,
}

impl CollectionRef {
    pub fn new(collection: Collection, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_are_lowercase_plurals() {
        assert_eq!(Collection::Members.as_str(), "members");
        assert_eq!(Collection::Courses.as_str(), "courses");
        assert_eq!(Collection::Groups.as_str(), "groups");
        assert_eq!(Collection::Events.as_str(), "events");
    }

    #[test]
    fn collection_ref_displays_as_path() {
        let r = CollectionRef::new(Collection::Courses, "bible-101");
        assert_eq!(r.to_string(), "courses/bible-101");
    }
}
