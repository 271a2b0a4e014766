//! Pet resource addressing.
//!
//! # Responsibility
//! - Represent caller-supplied addresses as opaque values.
//! - Classify an address into exactly one [`Route`].
//!
//! # Invariants
//! - Classification is pure: the same address always yields the same route.
//! - Item identifiers are decimal digits that fit in `i64`; anything else is
//!   unrecognized.

use crate::model::contract::{CONTENT_AUTHORITY, CONTENT_SCHEME, PATH_PETS};
use crate::model::pet::PetId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static PET_ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"^{}{}/{}(?:/([0-9]+))?$",
        regex::escape(CONTENT_SCHEME),
        regex::escape(CONTENT_AUTHORITY),
        regex::escape(PATH_PETS)
    );
    Regex::new(&pattern).expect("valid pet address regex")
});

/// Resource shape resolved from an [`Address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// All pets.
    Collection,
    /// One pet by store-assigned identifier.
    Item(PetId),
    /// Address outside the pet contract.
    Unrecognized,
}

/// Opaque token naming the pet collection or one pet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Wraps any caller-supplied address text. No validation happens here.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Address of the pet collection.
    pub fn collection() -> Self {
        Self(format!("{CONTENT_SCHEME}{CONTENT_AUTHORITY}/{PATH_PETS}"))
    }

    /// Address of one pet: the collection address with `id` appended.
    pub fn item(id: PetId) -> Self {
        Self(format!(
            "{CONTENT_SCHEME}{CONTENT_AUTHORITY}/{PATH_PETS}/{id}"
        ))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Classifies this address.
    pub fn route(&self) -> Route {
        let Some(captures) = PET_ADDRESS_RE.captures(self.0.as_str()) else {
            return Route::Unrecognized;
        };

        match captures.get(1) {
            None => Route::Collection,
            Some(id) => match id.as_str().parse::<PetId>() {
                Ok(id) => Route::Item(id),
                Err(_) => Route::Unrecognized,
            },
        }
    }

    /// Identifier carried by an item address.
    pub fn pet_id(&self) -> Option<PetId> {
        match self.route() {
            Route::Item(id) => Some(id),
            Route::Collection | Route::Unrecognized => None,
        }
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
