//! Pet repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `pets` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate field maps before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Caller filters are bound with positional `?` arguments, never inlined.

use crate::db::{DbError, PetStore};
use crate::model::contract::{Column, COLUMN_ID, TABLE_NAME};
use crate::model::pet::{Gender, NewPet, Pet, PetId, PetPatch, PetValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

static NAMED_OR_NUMBERED_PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\?[0-9]|[:@$][A-Za-z_]").expect("valid selection placeholder regex")
});

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pet persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PetValidationError),
    Db(DbError),
    InvalidData(String),
    InvalidSelection(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
            Self::InvalidSelection(message) => write!(f, "invalid selection: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::InvalidSelection(_) => None,
        }
    }
}

impl From<PetValidationError> for RepoError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// SQL predicate over pet columns plus its positional arguments.
///
/// Placeholders must be anonymous (`?`); arguments bind in order. Numbered
/// (`?1`) and named (`:name`) placeholders are rejected. A blank clause
/// without arguments matches every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<Value>,
}

impl Selection {
    pub fn new(clause: impl Into<String>) -> Self {
        Self {
            clause: clause.into(),
            args: Vec::new(),
        }
    }

    /// Appends one positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Selection matching exactly one pet identifier.
    pub fn by_id(id: PetId) -> Self {
        Self::new(format!("{COLUMN_ID} = ?")).arg(id)
    }
}

/// One ordering term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub descending: bool,
}

impl SortOrder {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

/// Options for reading pets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetQuery {
    /// Columns to read; `None` or an empty list reads every column.
    pub projection: Option<Vec<Column>>,
    pub selection: Option<Selection>,
    /// Ordering terms; empty means identifier ascending (insertion order).
    pub order_by: Vec<SortOrder>,
}

/// One fetched row. Columns outside the projection are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PetRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

impl PetRow {
    /// Converts a row carrying every required column into a [`Pet`].
    pub fn into_pet(self) -> Option<Pet> {
        Some(Pet {
            id: self.id?,
            name: self.name?,
            breed: self.breed,
            gender: self.gender?,
            weight: self.weight?,
        })
    }
}

impl From<Pet> for PetRow {
    fn from(value: Pet) -> Self {
        Self {
            id: Some(value.id),
            name: Some(value.name),
            breed: value.breed,
            gender: Some(value.gender),
            weight: Some(value.weight),
        }
    }
}

/// Finite, one-shot sequence of fetched rows.
///
/// Every matching row is read into memory when the query runs, because a
/// SQLite statement cannot outlive the connection borrow that produced it.
/// Iteration itself never touches the store, and the sequence cannot be
/// rewound.
#[derive(Debug)]
pub struct PetRows {
    rows: std::vec::IntoIter<PetRow>,
}

impl PetRows {
    fn new(rows: Vec<PetRow>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl Iterator for PetRows {
    type Item = PetRow;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for PetRows {}

/// Repository interface for pet CRUD operations.
pub trait PetRepository {
    fn insert_pet(&self, pet: &NewPet) -> RepoResult<PetId>;
    fn query_pets(&self, query: &PetQuery) -> RepoResult<PetRows>;
    fn update_pets(&self, patch: &PetPatch, selection: Option<&Selection>) -> RepoResult<usize>;
    fn delete_pets(&self, selection: Option<&Selection>) -> RepoResult<usize>;
}

/// SQLite-backed pet repository over a lazily opened store.
pub struct SqlitePetRepository<'store> {
    store: &'store PetStore,
}

impl<'store> SqlitePetRepository<'store> {
    pub fn new(store: &'store PetStore) -> Self {
        Self { store }
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn insert_pet(&self, pet: &NewPet) -> RepoResult<PetId> {
        let gender = pet.validate()?;
        let conn = self.store.connection()?;

        conn.execute(
            "INSERT INTO pets (name, breed, gender, weight) VALUES (?1, ?2, ?3, ?4);",
            params![
                pet.name.as_str(),
                pet.breed.as_deref(),
                gender.code(),
                pet.weight,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn query_pets(&self, query: &PetQuery) -> RepoResult<PetRows> {
        let columns = match query.projection.as_deref() {
            Some(columns) if !columns.is_empty() => columns.to_vec(),
            _ => Column::ALL.to_vec(),
        };

        let column_list = columns
            .iter()
            .map(|column| column.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {column_list} FROM {TABLE_NAME}");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(selection) = query.selection.as_ref() {
            push_where(&mut sql, &mut bind_values, selection)?;
        }

        sql.push_str(" ORDER BY ");
        if query.order_by.is_empty() {
            sql.push_str(COLUMN_ID);
            sql.push_str(" ASC");
        } else {
            let terms = query
                .order_by
                .iter()
                .map(|order| {
                    let direction = if order.descending { "DESC" } else { "ASC" };
                    format!("{} {direction}", order.column.as_str())
                })
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&terms);
        }

        let conn = self.store.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pets = Vec::new();

        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row, &columns)?);
        }

        Ok(PetRows::new(pets))
    }

    fn update_pets(&self, patch: &PetPatch, selection: Option<&Selection>) -> RepoResult<usize> {
        patch.validate()?;

        let mut assignments: Vec<String> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = patch.name.as_ref() {
            assignments.push(format!("{} = ?", Column::Name.as_str()));
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(breed) = patch.breed.as_ref() {
            assignments.push(format!("{} = ?", Column::Breed.as_str()));
            bind_values.push(breed.clone().map_or(Value::Null, Value::Text));
        }
        if let Some(gender) = patch.gender {
            assignments.push(format!("{} = ?", Column::Gender.as_str()));
            bind_values.push(Value::Integer(gender));
        }
        if let Some(weight) = patch.weight {
            assignments.push(format!("{} = ?", Column::Weight.as_str()));
            bind_values.push(Value::Integer(weight));
        }

        let mut sql = format!("UPDATE {TABLE_NAME} SET {}", assignments.join(", "));
        if let Some(selection) = selection {
            push_where(&mut sql, &mut bind_values, selection)?;
        }

        let conn = self.store.connection()?;
        let changed = conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn delete_pets(&self, selection: Option<&Selection>) -> RepoResult<usize> {
        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(selection) = selection {
            push_where(&mut sql, &mut bind_values, selection)?;
        }

        let conn = self.store.connection()?;
        let removed = conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(removed)
    }
}

fn push_where(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    selection: &Selection,
) -> RepoResult<()> {
    let clause = selection.clause.trim();
    if clause.is_empty() {
        if !selection.args.is_empty() {
            return Err(RepoError::InvalidSelection(format!(
                "{} argument(s) supplied without a clause",
                selection.args.len()
            )));
        }
        return Ok(());
    }
    if NAMED_OR_NUMBERED_PARAM_RE.is_match(clause) {
        return Err(RepoError::InvalidSelection(
            "only anonymous `?` placeholders are supported".to_string(),
        ));
    }

    sql.push_str(" WHERE (");
    sql.push_str(clause);
    sql.push(')');
    bind_values.extend(selection.args.iter().cloned());
    Ok(())
}

fn parse_pet_row(row: &Row<'_>, columns: &[Column]) -> RepoResult<PetRow> {
    let mut pet = PetRow::default();

    for (index, column) in columns.iter().enumerate() {
        match column {
            Column::Id => pet.id = Some(row.get(index)?),
            Column::Name => pet.name = Some(row.get(index)?),
            Column::Breed => pet.breed = row.get(index)?,
            Column::Weight => pet.weight = Some(row.get(index)?),
            Column::Gender => {
                let code: i64 = row.get(index)?;
                let gender = Gender::from_code(code).ok_or_else(|| {
                    RepoError::InvalidData(format!("invalid gender code `{code}` in pets.gender"))
                })?;
                pet.gender = Some(gender);
            }
        }
    }

    Ok(pet)
}
