//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for pet records.
//! - Isolate SQLite query details from provider routing.
//!
//! # Invariants
//! - Repository writes must validate field maps before persistence.

pub mod pet_repo;
