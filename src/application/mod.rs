//! Application layer - Validation services and handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
pub mod validation;

pub use handlers::member::{
    RegistrationError, ValidateMemberRegistrationCommand, ValidateMemberRegistrationHandler,
    ValidateMemberRegistrationResult,
};
pub use validation::{
    validate_event_date, ConsistencyError, ConsistencyValidator, ExistenceChecker,
    ReferenceValidator, UniquenessChecker,
};
