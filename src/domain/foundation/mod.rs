//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and error types
//! that form the vocabulary of the registry domain.

mod collection;
mod errors;
mod ids;
mod timestamp;

pub use collection::{Collection, CollectionRef};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CourseId, EventId, GroupId, MemberId};
pub use timestamp::Timestamp;
