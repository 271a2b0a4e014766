//! Core use-case services.
//!
//! # Responsibility
//! - Route address-based requests into repository calls.
//! - Keep presentation layers decoupled from storage details.

pub mod pet_provider;
