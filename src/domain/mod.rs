//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, collections, timestamps, errors)
//! - `member` - Member entity and its construction-time validation

pub mod foundation;
pub mod member;
