//! Address-routed pet provider.
//!
//! # Responsibility
//! - Route query/insert/update/delete requests by [`Address`] shape.
//! - Scope item-address requests to the addressed identifier.
//! - Report addressing, validation and store failures distinctly.
//!
//! # Invariants
//! - Unrecognized addresses fail before validation or any store access.
//! - Item addresses always override caller-supplied selections.
//! - Zero affected rows is a successful outcome, never an error.

use crate::model::address::{Address, Route};
use crate::model::contract::{CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE};
use crate::model::pet::{NewPet, Pet, PetPatch, PetValidationError};
use crate::repo::pet_repo::{PetQuery, PetRepository, PetRows, RepoError, Selection};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Address shape not accepted by the requested operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Address is outside the pet contract.
    Unrecognized(Address),
    /// Address is valid but the operation does not apply to its shape.
    Unsupported {
        operation: &'static str,
        address: Address,
    },
}

impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrecognized(address) => write!(f, "unknown address {address}"),
            Self::Unsupported { operation, address } => {
                write!(f, "{operation} is not supported for {address}")
            }
        }
    }
}

impl Error for AddressError {}

/// Provider-level error surfaced to presentation callers.
#[derive(Debug)]
pub enum ProviderError {
    Addressing(AddressError),
    Validation(PetValidationError),
    Store(RepoError),
}

impl ProviderError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Addressing(_) => "addressing",
            Self::Validation(_) => "validation",
            Self::Store(_) => "store",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Addressing(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Addressing(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<AddressError> for ProviderError {
    fn from(value: AddressError) -> Self {
        Self::Addressing(value)
    }
}

impl From<PetValidationError> for ProviderError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProviderError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

/// Result of the editor's insert-or-update flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new pet was created at this address.
    Inserted(Address),
    /// An existing pet was updated; `0` means the pet no longer exists.
    Updated(usize),
}

/// Route/validate front end over a pet repository.
pub struct PetProvider<R: PetRepository> {
    repo: R,
}

impl<R: PetRepository> PetProvider<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the content type for `address`.
    pub fn get_type(&self, address: &Address) -> ProviderResult<&'static str> {
        match address.route() {
            Route::Collection => Ok(CONTENT_LIST_TYPE),
            Route::Item(_) => Ok(CONTENT_ITEM_TYPE),
            Route::Unrecognized => Err(unrecognized(address)),
        }
    }

    /// Reads pets addressed by `address`.
    ///
    /// For item addresses the selection is replaced by an identifier match;
    /// projection and ordering are kept.
    pub fn query(&self, address: &Address, query: &PetQuery) -> ProviderResult<PetRows> {
        let result = self.query_inner(address, query);
        match &result {
            Ok(rows) => info!(
                "event=pet_query module=provider status=ok route={} rows={}",
                route_label(address),
                rows.len()
            ),
            Err(err) => log_failure("pet_query", err),
        }
        result
    }

    fn query_inner(&self, address: &Address, query: &PetQuery) -> ProviderResult<PetRows> {
        match address.route() {
            Route::Collection => Ok(self.repo.query_pets(query)?),
            Route::Item(id) => {
                let scoped = PetQuery {
                    selection: Some(Selection::by_id(id)),
                    ..query.clone()
                };
                Ok(self.repo.query_pets(&scoped)?)
            }
            Route::Unrecognized => Err(unrecognized(address)),
        }
    }

    /// Creates a pet and returns its item address.
    ///
    /// Only the collection address accepts inserts.
    pub fn insert(&self, address: &Address, pet: &NewPet) -> ProviderResult<Address> {
        let result = match address.route() {
            Route::Collection => self
                .repo
                .insert_pet(pet)
                .map(Address::item)
                .map_err(ProviderError::from),
            Route::Item(_) => Err(unsupported("insert", address)),
            Route::Unrecognized => Err(unrecognized(address)),
        };

        match &result {
            Ok(created) => info!(
                "event=pet_insert module=provider status=ok pet_id={}",
                created.pet_id().unwrap_or_default()
            ),
            Err(err) => log_failure("pet_insert", err),
        }
        result
    }

    /// Applies `patch` to the addressed pets and returns the changed count.
    ///
    /// `selection` only applies to the collection address; `None` there
    /// targets every pet.
    pub fn update(
        &self,
        address: &Address,
        patch: &PetPatch,
        selection: Option<&Selection>,
    ) -> ProviderResult<usize> {
        let result = match address.route() {
            Route::Collection => self
                .repo
                .update_pets(patch, selection)
                .map_err(ProviderError::from),
            Route::Item(id) => self
                .repo
                .update_pets(patch, Some(&Selection::by_id(id)))
                .map_err(ProviderError::from),
            Route::Unrecognized => Err(unrecognized(address)),
        };

        match &result {
            Ok(changed) => info!(
                "event=pet_update module=provider status=ok route={} fields={} changed={}",
                route_label(address),
                patch.len(),
                changed
            ),
            Err(err) => log_failure("pet_update", err),
        }
        result
    }

    /// Removes the addressed pets and returns the removed count.
    pub fn delete(&self, address: &Address, selection: Option<&Selection>) -> ProviderResult<usize> {
        let result = match address.route() {
            Route::Collection => self
                .repo
                .delete_pets(selection)
                .map_err(ProviderError::from),
            Route::Item(id) => self
                .repo
                .delete_pets(Some(&Selection::by_id(id)))
                .map_err(ProviderError::from),
            Route::Unrecognized => Err(unrecognized(address)),
        };

        match &result {
            Ok(removed) => info!(
                "event=pet_delete module=provider status=ok route={} removed={}",
                route_label(address),
                removed
            ),
            Err(err) => log_failure("pet_delete", err),
        }
        result
    }

    /// Loads one full pet by item address.
    pub fn get_pet(&self, address: &Address) -> ProviderResult<Option<Pet>> {
        match address.route() {
            Route::Item(_) => {}
            Route::Collection => return Err(unsupported("get", address)),
            Route::Unrecognized => return Err(unrecognized(address)),
        }

        let mut rows = self.query(address, &PetQuery::default())?;
        Ok(rows.next().and_then(|row| row.into_pet()))
    }

    /// Editor save flow: inserts on the collection address, replaces every
    /// editable field on an item address.
    ///
    /// Name and breed are trimmed first; a blank breed is stored as absent.
    pub fn save_pet(&self, address: &Address, pet: &NewPet) -> ProviderResult<SaveOutcome> {
        let pet = &NewPet {
            name: pet.name.trim().to_string(),
            breed: pet
                .breed
                .as_deref()
                .map(str::trim)
                .filter(|breed| !breed.is_empty())
                .map(str::to_string),
            gender: pet.gender,
            weight: pet.weight,
        };

        match address.route() {
            Route::Collection => self.insert(address, pet).map(SaveOutcome::Inserted),
            Route::Item(_) => {
                let patch = PetPatch {
                    name: Some(pet.name.clone()),
                    breed: Some(pet.breed.clone()),
                    gender: Some(pet.gender),
                    weight: Some(pet.weight),
                };
                self.update(address, &patch, None).map(SaveOutcome::Updated)
            }
            Route::Unrecognized => {
                let err = unrecognized(address);
                log_failure("pet_save", &err);
                Err(err)
            }
        }
    }
}

fn unrecognized(address: &Address) -> ProviderError {
    ProviderError::Addressing(AddressError::Unrecognized(address.clone()))
}

fn unsupported(operation: &'static str, address: &Address) -> ProviderError {
    ProviderError::Addressing(AddressError::Unsupported {
        operation,
        address: address.clone(),
    })
}

fn route_label(address: &Address) -> &'static str {
    match address.route() {
        Route::Collection => "collection",
        Route::Item(_) => "item",
        Route::Unrecognized => "unrecognized",
    }
}

fn log_failure(event: &str, err: &ProviderError) {
    match err {
        ProviderError::Store(_) => error!(
            "event={} module=provider status=error error_code={} error={}",
            event,
            err.code(),
            err
        ),
        ProviderError::Addressing(_) | ProviderError::Validation(_) => warn!(
            "event={} module=provider status=rejected error_code={} error={}",
            event,
            err.code(),
            err
        ),
    }
}
