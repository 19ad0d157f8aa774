use std::fmt;
use std::str::FromStr;

/// One of the twelve positional fields of a book record.
///
/// Variant order is the persisted column order and also the numbering of
/// the search menu (`Field::Id` is `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Year,
    Authors,
    Genres,
    Width,
    Height,
    Cover,
    Source,
    Added,
    Read,
    Rating,
}

/// Returned when a field name or menu index does not name a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Id,
        Field::Name,
        Field::Year,
        Field::Authors,
        Field::Genres,
        Field::Width,
        Field::Height,
        Field::Cover,
        Field::Source,
        Field::Added,
        Field::Read,
        Field::Rating,
    ];

    /// Fields a user fills in, in prompt order. `Year` precedes `Added` and
    /// `Added` precedes `Read` so sibling checks see their inputs.
    pub const EDITABLE: [Field; 11] = [
        Field::Name,
        Field::Authors,
        Field::Genres,
        Field::Year,
        Field::Width,
        Field::Height,
        Field::Cover,
        Field::Source,
        Field::Added,
        Field::Read,
        Field::Rating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Year => "year",
            Field::Authors => "authors",
            Field::Genres => "genres",
            Field::Width => "width",
            Field::Height => "height",
            Field::Cover => "cover",
            Field::Source => "source",
            Field::Added => "added",
            Field::Read => "read",
            Field::Rating => "rating",
        }
    }

    /// 1-based position, as numbered in the search menu.
    pub fn from_index(index: usize) -> Option<Field> {
        index
            .checked_sub(1)
            .and_then(|i| Field::ALL.get(i))
            .copied()
    }

    /// Search compares these by exact string equality instead of
    /// case-insensitive containment.
    pub fn is_exact_match(self) -> bool {
        matches!(self, Field::Id | Field::Year | Field::Width | Field::Height)
    }

    /// Search values for these must parse as integers before the lookup runs.
    pub fn requires_integer(self) -> bool {
        matches!(self, Field::Id | Field::Width | Field::Height)
    }

    /// Validation of these reads an earlier field of the same record
    /// (`added` checks `year`, `read` checks `added`).
    pub fn depends_on_siblings(self) -> bool {
        matches!(self, Field::Added | Field::Read)
    }

    /// Optional fields accept an empty value.
    pub fn is_optional(self) -> bool {
        matches!(self, Field::Read | Field::Rating)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
