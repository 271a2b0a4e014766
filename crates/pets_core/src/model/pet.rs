//! Pet domain model and write-path validation.
//!
//! # Responsibility
//! - Define the canonical pet record and the insert/update field maps.
//! - Validate field maps before any SQL mutation runs.
//!
//! # Invariants
//! - `name` is never empty on a persisted pet.
//! - `gender` is always one of the three [`Gender`] codes.
//! - Inserts require `weight > 0`; updates accept `weight >= 0`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned pet identifier.
pub type PetId = i64;

/// Smallest weight accepted when a pet is created.
pub const MIN_INSERT_WEIGHT: i64 = 1;
/// Smallest weight accepted when an existing pet is updated.
pub const MIN_UPDATE_WEIGHT: i64 = 0;

/// Enumerated pet gender, persisted as a small integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    pub const UNKNOWN_CODE: i64 = 0;
    pub const MALE_CODE: i64 = 1;
    pub const FEMALE_CODE: i64 = 2;

    /// Persisted integer code.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => Self::UNKNOWN_CODE,
            Self::Male => Self::MALE_CODE,
            Self::Female => Self::FEMALE_CODE,
        }
    }

    /// Parses a persisted or caller-supplied code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            Self::UNKNOWN_CODE => Some(Self::Unknown),
            Self::MALE_CODE => Some(Self::Male),
            Self::FEMALE_CODE => Some(Self::Female),
            _ => None,
        }
    }
}

impl From<Gender> for i64 {
    fn from(value: Gender) -> Self {
        value.code()
    }
}

/// Canonical pet record as stored in the `pets` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: i64,
}

/// Field map for creating a pet.
///
/// `gender` carries the raw code supplied by the caller so out-of-range
/// values reach validation instead of being rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub breed: Option<String>,
    pub gender: i64,
    pub weight: i64,
}

impl NewPet {
    /// Creates a field map with unknown gender and no breed.
    pub fn new(name: impl Into<String>, weight: i64) -> Self {
        Self {
            name: name.into(),
            breed: None,
            gender: Gender::Unknown.code(),
            weight,
        }
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender.code();
        self
    }

    /// Sets a raw gender code, bypassing the typed enum.
    pub fn with_gender_code(mut self, code: i64) -> Self {
        self.gender = code;
        self
    }

    /// Checks insert invariants in order: name, weight, gender.
    ///
    /// Returns the typed gender so callers never re-parse the code.
    pub fn validate(&self) -> Result<Gender, PetValidationError> {
        validate_name(self.name.as_str())?;
        if self.weight < MIN_INSERT_WEIGHT {
            return Err(PetValidationError::InvalidWeight {
                weight: self.weight,
                minimum: MIN_INSERT_WEIGHT,
            });
        }
        parse_gender(self.gender)
    }
}

/// Partial field map for updating pets. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetPatch {
    pub name: Option<String>,
    /// `Some(None)` clears the breed.
    pub breed: Option<Option<String>>,
    pub gender: Option<i64>,
    pub weight: Option<i64>,
}

impl PetPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn breed(mut self, breed: Option<String>) -> Self {
        self.breed = Some(breed);
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender.code());
        self
    }

    pub fn gender_code(mut self, code: i64) -> Self {
        self.gender = Some(code);
        self
    }

    pub fn weight(mut self, weight: i64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Number of fields this patch touches.
    pub fn len(&self) -> usize {
        usize::from(self.name.is_some())
            + usize::from(self.breed.is_some())
            + usize::from(self.gender.is_some())
            + usize::from(self.weight.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks update invariants in order: weight, name, gender, non-empty.
    pub fn validate(&self) -> Result<(), PetValidationError> {
        if let Some(weight) = self.weight {
            if weight < MIN_UPDATE_WEIGHT {
                return Err(PetValidationError::InvalidWeight {
                    weight,
                    minimum: MIN_UPDATE_WEIGHT,
                });
            }
        }
        if let Some(name) = self.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(code) = self.gender {
            parse_gender(code)?;
        }
        if self.is_empty() {
            return Err(PetValidationError::EmptyUpdate);
        }
        Ok(())
    }
}

/// Validation errors raised before any write reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetValidationError {
    EmptyName,
    InvalidWeight { weight: i64, minimum: i64 },
    InvalidGender(i64),
    EmptyUpdate,
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pet must have a name"),
            Self::InvalidWeight { weight, minimum } => {
                write!(f, "invalid weight {weight}; must be at least {minimum}")
            }
            Self::InvalidGender(code) => write!(f, "invalid gender code {code}"),
            Self::EmptyUpdate => write!(f, "update contains no fields"),
        }
    }
}

impl Error for PetValidationError {}

fn validate_name(name: &str) -> Result<(), PetValidationError> {
    if name.trim().is_empty() {
        return Err(PetValidationError::EmptyName);
    }
    Ok(())
}

fn parse_gender(code: i64) -> Result<Gender, PetValidationError> {
    Gender::from_code(code).ok_or(PetValidationError::InvalidGender(code))
}
