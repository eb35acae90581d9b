//! Consistency validation.
//!
//! Store-backed checks that run before a mutation is committed:
//!
//! - `ExistenceChecker` - does `(collection, id)` exist, optionally in a transaction
//! - `ReferenceValidator` - existence bound to members, courses, groups, events
//! - `UniquenessChecker` - is a field value unused (never transactional)
//! - `validate_event_date` - presence check for event dates
//! - `ConsistencyValidator` - stateless facade combining all of the above

mod errors;
mod event_date;
mod existence;
mod references;
mod uniqueness;
mod validator;

pub use errors::ConsistencyError;
pub use event_date::validate_event_date;
pub use existence::ExistenceChecker;
pub use references::ReferenceValidator;
pub use uniqueness::UniquenessChecker;
pub use validator::ConsistencyValidator;
