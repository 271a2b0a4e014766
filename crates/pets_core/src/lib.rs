//! Core data access for the Pets catalog.
//! This crate is the single source of truth for pet record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{PetStore, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::address::{Address, Route};
pub use model::contract::Column;
pub use model::pet::{Gender, NewPet, Pet, PetId, PetPatch, PetValidationError};
pub use repo::pet_repo::{
    PetQuery, PetRepository, PetRow, PetRows, RepoError, RepoResult, Selection, SortOrder,
    SqlitePetRepository,
};
pub use service::pet_provider::{
    AddressError, PetProvider, ProviderError, ProviderResult, SaveOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
