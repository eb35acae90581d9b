//! Member handlers.
//!
//! ## Commands
//! - Validating a new member registration before it is persisted

mod validate_member_registration;

pub use validate_member_registration::{
    RegistrationError, ValidateMemberRegistrationCommand, ValidateMemberRegistrationHandler,
    ValidateMemberRegistrationResult,
};
