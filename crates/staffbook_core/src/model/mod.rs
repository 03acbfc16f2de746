//! Domain model for the employee directory.
//!
//! # Responsibility
//! - Define the canonical employee record and the transient value objects
//!   (search criteria, partial-update request) consumed by the service
//!   layer.
//! - Own string normalization and required-field validation.

pub mod employee;
