//! Pet domain model, storage contract and addressing.
//!
//! # Responsibility
//! - Define the pet record and the field maps used by write paths.
//! - Define the immutable table/column names and address scheme.
//!
//! # Invariants
//! - Every pet is identified by a store-assigned `PetId`.
//! - Addresses resolve to exactly one `Route`.

pub mod address;
pub mod contract;
pub mod pet;
