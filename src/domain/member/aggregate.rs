//! Member entity and its construction-time validation.
//!
//! `Member::construct` is the only way to obtain a `Member`. Checks run in a
//! fixed order and the first violation is returned:
//!
//! 1. `id`, `name`, `memberType` present and non-empty
//! 2. `memberType` is one of `Baptized` / `Visitor`
//! 3. `email`, when present, is well formed
//! 4. relationship lists contain no empty ids
//!
//! No I/O happens here. Whether referenced ids exist is checked by
//! `application::validation`.

use serde::{Deserialize, Serialize};

use super::{Email, MemberType};
use crate::domain::foundation::{CourseId, EventId, GroupId, MemberId, ValidationError};

/// Raw, unvalidated member input as received from the outer layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFields {
    pub id: Option<String>,
    pub name: Option<String>,
    pub member_type: Option<String>,
    pub marital_status: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub occupation: Option<String>,
    pub notes: Option<String>,
    pub courses: Option<Vec<String>>,
    pub groups: Option<Vec<String>>,
    pub events: Option<Vec<String>>,
}

impl MemberFields {
    /// Starts a record with the three required fields set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        member_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            member_type: Some(member_type.into()),
            ..Default::default()
        }
    }
}

/// A validated member record.
///
/// Immutable once built; persisting changes is the job of the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    id: MemberId,
    name: String,
    member_type: MemberType,
    #[serde(skip_serializing_if = "Option::is_none")]
    marital_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    courses: Vec<CourseId>,
    groups: Vec<GroupId>,
    events: Vec<EventId>,
}

impl Member {
    /// Validates `fields` and builds a member, or returns the first violation.
    pub fn construct(fields: MemberFields) -> Result<Self, ValidationError> {
        let id = required(fields.id, "id")?;
        let name = required(fields.name, "name")?;
        let member_type = required(fields.member_type, "memberType")?;

        let member_type: MemberType = member_type.parse()?;
        let id = MemberId::new(id)?;

        let email = optional(fields.email).map(Email::parse).transpose()?;

        let courses = relation(fields.courses, CourseId::new)?;
        let groups = relation(fields.groups, GroupId::new)?;
        let events = relation(fields.events, EventId::new)?;

        Ok(Self {
            id,
            name,
            member_type,
            marital_status: optional(fields.marital_status),
            email,
            phone: optional(fields.phone),
            occupation: optional(fields.occupation),
            notes: optional(fields.notes),
            courses,
            groups,
            events,
        })
    }

    // === Accessors ===

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_type(&self) -> MemberType {
        self.member_type
    }

    pub fn marital_status(&self) -> Option<&str> {
        self.marital_status.as_deref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn occupation(&self) -> Option<&str> {
        self.occupation.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn courses(&self) -> &[CourseId] {
        &self.courses
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn events(&self) -> &[EventId] {
        &self.events
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::missing_field(field)),
    }
}

/// Blank optional text is treated as absent.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn relation<T, F>(ids: Option<Vec<String>>, make: F) -> Result<Vec<T>, ValidationError>
where
    F: Fn(String) -> Result<T, ValidationError>,
{
    ids.unwrap_or_default().into_iter().map(make).collect()
}
