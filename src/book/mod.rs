//! The book record, its fields, and the pipe-delimited line codec.
//!
//! Values are kept as the text the user entered (after normalization), which
//! is exactly what gets persisted. Typed views such as [`Cover`] exist for
//! validation, not storage.

mod field;
mod kinds;

pub use field::{Field, UnknownField};
pub use kinds::{Cover, Source};

use crate::validate::{self, Axis, ValidationError};

/// Column separator of the persisted file. Validators never let it through.
pub const DELIMITER: char = '|';

/// Number of positional columns in a persisted line.
pub const FIELD_COUNT: usize = 12;

/// A persisted line did not split into enough columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 12 fields, found {found}")]
pub struct MalformedLine {
    pub found: usize,
}

/// One catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub name: String,
    pub year: String,
    pub authors: String,
    pub genres: String,
    pub width: String,
    pub height: String,
    pub cover: String,
    pub source: String,
    pub added: String,
    pub read: String,
    pub rating: String,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record carrying only an id; enough to target a delete.
    pub fn with_id(id: impl Into<String>) -> Self {
        Book {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Name => &self.name,
            Field::Year => &self.year,
            Field::Authors => &self.authors,
            Field::Genres => &self.genres,
            Field::Width => &self.width,
            Field::Height => &self.height,
            Field::Cover => &self.cover,
            Field::Source => &self.source,
            Field::Added => &self.added,
            Field::Read => &self.read,
            Field::Rating => &self.rating,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Id => &mut self.id,
            Field::Name => &mut self.name,
            Field::Year => &mut self.year,
            Field::Authors => &mut self.authors,
            Field::Genres => &mut self.genres,
            Field::Width => &mut self.width,
            Field::Height => &mut self.height,
            Field::Cover => &mut self.cover,
            Field::Source => &mut self.source,
            Field::Added => &mut self.added,
            Field::Read => &mut self.read,
            Field::Rating => &mut self.rating,
        }
    }

    /// Validates `value` for `field` against this record's sibling fields
    /// and stores it (normalized for authors/genres). On error the record
    /// is left untouched.
    pub fn set_validated(&mut self, field: Field, value: &str) -> Result<(), ValidationError> {
        let stored = match field {
            Field::Id => {
                value
                    .parse::<u64>()
                    .map_err(|_| ValidationError::IdNotNumeric)?;
                value.to_string()
            }
            Field::Name => validate::validate_name(value).map(|_| value.to_string())?,
            Field::Year => validate::validate_year(value).map(|_| value.to_string())?,
            Field::Authors => validate::validate_authors(value)?,
            Field::Genres => validate::validate_genres(value)?,
            Field::Width => {
                validate::validate_height_width(value, Axis::Width).map(|_| value.to_string())?
            }
            Field::Height => {
                validate::validate_height_width(value, Axis::Height).map(|_| value.to_string())?
            }
            Field::Cover => validate::validate_cover(value).map(|_| value.to_string())?,
            Field::Source => validate::validate_source(value).map(|_| value.to_string())?,
            Field::Added => {
                validate::validate_added(value, &self.year).map(|_| value.to_string())?
            }
            Field::Read => validate::validate_read(value, &self.added).map(|_| value.to_string())?,
            Field::Rating => validate::validate_rating(value).map(|_| value.to_string())?,
        };
        *self.slot(field) = stored;
        Ok(())
    }

    /// Serializes to one persisted line, without the trailing newline.
    pub fn to_line(&self) -> String {
        Field::ALL
            .iter()
            .map(|field| self.get(*field))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Parses one persisted line. Columns beyond the twelfth are ignored.
    pub fn from_line(line: &str) -> Result<Self, MalformedLine> {
        let parts: Vec<&str> = line.trim().split(DELIMITER).collect();
        if parts.len() < FIELD_COUNT {
            return Err(MalformedLine { found: parts.len() });
        }

        let mut book = Book::new();
        for (field, value) in Field::ALL.iter().zip(parts) {
            *book.slot(*field) = value.to_string();
        }
        Ok(book)
    }
}
