//! Field validator: stateless, schema-driven checks for one book field.
//!
//! Every field is first matched against its pattern and then against the
//! semantic rules layered on top (calendar dates, numeric ranges, sibling
//! fields). Failures carry a user-facing message naming the broken rule.
//!
//! Only `validate_authors` / `validate_genres` transform their input: they
//! return the normalized list that must be persisted instead of the raw text.

mod error;
mod rules;

pub use error::{Axis, ListField, ValidationError};
pub use rules::{
    normalize_separators, parse_date, validate_added, validate_authors, validate_cover,
    validate_genres, validate_height_width, validate_name, validate_rating, validate_read,
    validate_source, validate_year, DATE_FORMAT, MAX_DIMENSION_MM, MIN_YEAR,
};
