use std::fmt;
use std::str::FromStr;

use crate::validate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cover {
    Soft,
    Hard,
}

impl Cover {
    pub fn as_str(self) -> &'static str {
        match self {
            Cover::Soft => "soft",
            Cover::Hard => "hard",
        }
    }
}

impl FromStr for Cover {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft" => Ok(Cover::Soft),
            "hard" => Ok(Cover::Hard),
            _ => Err(ValidationError::Cover),
        }
    }
}

impl fmt::Display for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the book entered the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Purchase,
    Gift,
    Inheritance,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Purchase => "purchase",
            Source::Gift => "gift",
            Source::Inheritance => "inheritance",
        }
    }
}

impl FromStr for Source {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "purchase" => Ok(Source::Purchase),
            "gift" => Ok(Source::Gift),
            "inheritance" => Ok(Source::Inheritance),
            _ => Err(ValidationError::Source),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
