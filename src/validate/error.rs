use std::fmt;

use thiserror::Error;

/// Which list-shaped field a separator rule was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Authors,
    Genres,
}

impl fmt::Display for ListField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListField::Authors => f.write_str("authors"),
            ListField::Genres => f.write_str("genres"),
        }
    }
}

/// Which cover dimension a size rule was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}

/// A field value that violates its schema or a cross-field rule.
///
/// The `Display` text is meant for end users: the session layer echoes it
/// verbatim and re-prompts for the same field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("id must be a number")]
    IdNotNumeric,

    #[error("title must not contain double spaces")]
    NameDoubleSpace,
    #[error("title must be between 1 and 100 characters")]
    NameLength,
    #[error("title may contain only letters, digits and spaces")]
    NameCharset,

    #[error("{field} must not contain double spaces or double commas")]
    DoubleSeparator { field: ListField },
    #[error("{field} may contain only letters, spaces and commas (at most {max} characters)")]
    ListCharset { field: ListField, max: usize },

    #[error("year must be exactly four digits")]
    YearFormat,
    #[error("year cannot be later than the current year ({current})")]
    YearInFuture { current: i32 },
    #[error("year cannot be earlier than 1500")]
    YearTooEarly,

    #[error("{axis} must be a positive number in millimeters")]
    DimensionFormat { axis: Axis },
    #[error("{axis} cannot exceed one meter (1000 mm)")]
    DimensionTooLarge { axis: Axis },
    #[error("{axis} must be greater than zero")]
    DimensionNotPositive { axis: Axis },

    #[error("{field} date must use the DD-MM-YYYY format")]
    DateFormat { field: &'static str },
    #[error("{field} date {value} is not a real calendar date")]
    InvalidDate { field: &'static str, value: String },
    #[error("added date cannot be in the future")]
    AddedInFuture,
    #[error("added date cannot be earlier than the publication year {year}")]
    AddedBeforeYear { year: i32 },
    #[error("read date cannot be earlier than the added date")]
    ReadBeforeAdded,

    #[error("rating must look like 'N/10 - comment' with N from 1 to 10 (for example '8/10 - great book')")]
    RatingFormat,

    #[error("cover must be 'soft' or 'hard'")]
    Cover,
    #[error("source must be 'purchase', 'gift' or 'inheritance'")]
    Source,
}
