//! Business-rule services.
//!
//! # Responsibility
//! - Orchestrate repository calls into directory use-cases.
//! - Keep presentation layers decoupled from storage details and typed
//!   errors; callers see only the outcome envelope.

pub mod employee_service;
