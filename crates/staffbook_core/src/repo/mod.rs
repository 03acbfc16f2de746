//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage-engine contract for employee rows.
//! - Keep SQL details out of the service/business orchestration.
//!
//! # Invariants
//! - Repositories perform no business validation; that belongs to the
//!   model and service layers.
//! - Absent rows are normal outcomes (`Option`/`bool`), not errors.

pub mod employee_repo;
