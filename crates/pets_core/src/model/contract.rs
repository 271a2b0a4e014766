//! Pet storage contract: table, columns, addressing and content types.
//!
//! # Responsibility
//! - Define the immutable names shared by store, repository and provider.
//! - Map typed columns to their persisted names.
//!
//! # Invariants
//! - Constants are process-wide and never mutated at runtime.
//! - `Column::ALL` lists every persisted column in table order.

use serde::{Deserialize, Serialize};

/// Provider authority used in every pet address.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";
/// Address scheme prefix.
pub const CONTENT_SCHEME: &str = "content://";
/// Path segment addressing the pet collection.
pub const PATH_PETS: &str = "pets";

/// Content type returned for the collection address.
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.android.pets/pets";
/// Content type returned for an item address.
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.android.pets/pets";

/// Name of the single pet table.
pub const TABLE_NAME: &str = "pets";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_PET_NAME: &str = "name";
pub const COLUMN_PET_BREED: &str = "breed";
pub const COLUMN_PET_GENDER: &str = "gender";
pub const COLUMN_PET_WEIGHT: &str = "weight";

/// Typed pet column used by projections and orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Name,
    Breed,
    Gender,
    Weight,
}

impl Column {
    /// Every persisted column, in table order.
    pub const ALL: [Column; 5] = [
        Column::Id,
        Column::Name,
        Column::Breed,
        Column::Gender,
        Column::Weight,
    ];

    /// Persisted column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => COLUMN_ID,
            Self::Name => COLUMN_PET_NAME,
            Self::Breed => COLUMN_PET_BREED,
            Self::Gender => COLUMN_PET_GENDER,
            Self::Weight => COLUMN_PET_WEIGHT,
        }
    }

    /// Resolves a persisted column name back to its typed column.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.as_str() == name)
    }
}
