use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{Axis, ListField, ValidationError};
use crate::book::{Cover, Source};

/// Date layout used by the added/read fields and the persisted file.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

pub const MIN_YEAR: i32 = 1500;
pub const MAX_DIMENSION_MM: f64 = 1000.0;

const NAME_MAX: usize = 100;
const AUTHORS_MAX: usize = 130;
const GENRES_MAX: usize = 100;

static NAME: Lazy<Regex> = Lazy::new(|| compile(r"^[А-Яа-яЁёA-Za-z0-9 ]{1,100}$"));
static AUTHORS: Lazy<Regex> = Lazy::new(|| compile(r"^[А-Яа-яЁёA-Za-z ,]{1,130}$"));
static GENRES: Lazy<Regex> = Lazy::new(|| compile(r"^[А-Яа-яЁёA-Za-z ,]{1,100}$"));
static YEAR: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{4}$"));
static DIMENSION: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]+(\.[0-9]+)?$"));
static DATE: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$"));
static RATING: Lazy<Regex> =
    Lazy::new(|| compile(r"^([1-9]|10)/10 - [А-Яа-яЁёA-Za-z0-9 \t,.!?]{1,200}$"));

fn compile(pattern: &str) -> Regex {
    // Patterns are literals above; a failure here is a programming error.
    Regex::new(pattern).expect("schema pattern must compile")
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value.contains("  ") {
        return Err(ValidationError::NameDoubleSpace);
    }
    let len = value.chars().count();
    if len == 0 || len > NAME_MAX {
        return Err(ValidationError::NameLength);
    }
    if !NAME.is_match(value) {
        return Err(ValidationError::NameCharset);
    }
    Ok(())
}

/// Collapses whitespace around every comma into a single `", "` and trims
/// the ends. Empty items are kept so the caller can reject them.
pub fn normalize_separators(value: &str) -> String {
    value
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_list(value: &str, field: ListField) -> Result<String, ValidationError> {
    let (pattern, max) = match field {
        ListField::Authors => (&*AUTHORS, AUTHORS_MAX),
        ListField::Genres => (&*GENRES, GENRES_MAX),
    };

    let normalized = normalize_separators(value);
    let has_empty_item = normalized.split(", ").any(str::is_empty);
    if has_empty_item || normalized.contains("  ") {
        return Err(ValidationError::DoubleSeparator { field });
    }
    if !pattern.is_match(&normalized) {
        return Err(ValidationError::ListCharset { field, max });
    }
    Ok(normalized)
}

/// Returns the normalized author list; persist that value, not the input.
pub fn validate_authors(value: &str) -> Result<String, ValidationError> {
    validate_list(value, ListField::Authors)
}

/// Returns the normalized genre list; persist that value, not the input.
pub fn validate_genres(value: &str) -> Result<String, ValidationError> {
    validate_list(value, ListField::Genres)
}

fn parse_year(value: &str) -> Result<i32, ValidationError> {
    if !YEAR.is_match(value) {
        return Err(ValidationError::YearFormat);
    }
    value.parse().map_err(|_| ValidationError::YearFormat)
}

pub fn validate_year(value: &str) -> Result<(), ValidationError> {
    let year = parse_year(value)?;
    let current = today().year();
    if year > current {
        return Err(ValidationError::YearInFuture { current });
    }
    if year < MIN_YEAR {
        return Err(ValidationError::YearTooEarly);
    }
    Ok(())
}

pub fn validate_height_width(value: &str, axis: Axis) -> Result<(), ValidationError> {
    if !DIMENSION.is_match(value) {
        return Err(ValidationError::DimensionFormat { axis });
    }
    let size: f64 = value
        .parse()
        .map_err(|_| ValidationError::DimensionFormat { axis })?;
    if size > MAX_DIMENSION_MM {
        return Err(ValidationError::DimensionTooLarge { axis });
    }
    if size <= 0.0 {
        return Err(ValidationError::DimensionNotPositive { axis });
    }
    Ok(())
}

/// Parses a `DD-MM-YYYY` date, naming `field` in any error.
pub fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, ValidationError> {
    if !DATE.is_match(value) {
        return Err(ValidationError::DateFormat { field });
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// `year` is the sibling publication year of the same record.
pub fn validate_added(value: &str, year: &str) -> Result<(), ValidationError> {
    let added = parse_date(value, "added")?;
    let year = parse_year(year)?;

    if added > today() {
        return Err(ValidationError::AddedInFuture);
    }
    if added.year() < year {
        return Err(ValidationError::AddedBeforeYear { year });
    }
    Ok(())
}

/// Empty means "not read yet" and always passes.
pub fn validate_read(value: &str, added: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    let read = parse_date(value, "read")?;
    let added = parse_date(added, "added")?;
    if read < added {
        return Err(ValidationError::ReadBeforeAdded);
    }
    Ok(())
}

/// Empty means "no rating" and always passes.
pub fn validate_rating(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || RATING.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::RatingFormat)
    }
}

pub fn validate_cover(value: &str) -> Result<(), ValidationError> {
    value.parse::<Cover>().map(|_| ())
}

pub fn validate_source(value: &str) -> Result<(), ValidationError> {
    value.parse::<Source>().map(|_| ())
}
