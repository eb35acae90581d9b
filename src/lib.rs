//! Church Registry - Membership records with consistency checks
//!
//! This crate validates member records and the references between members,
//! courses, groups and events before they are written to the document store.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
