//! Boundary checks for caller-supplied input.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a valid bookmark id")]
    InvalidId(String),

    #[error("Bookmark id must not be negative, got {0}")]
    NegativeId(i64),

    #[error("Parameter '{0}' is missing")]
    MissingParameter(&'static str),

    #[error("Provide a bookmark id or --all")]
    MissingDeleteTarget,
}

/// Parse a bookmark id. `0` is a valid id.
pub fn parse_id(raw: &str) -> Result<u64, ValidationError> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<u64>() {
        return Ok(id);
    }
    match trimmed.parse::<i64>() {
        Ok(negative) if negative < 0 => Err(ValidationError::NegativeId(negative)),
        _ => Err(ValidationError::InvalidId(raw.to_string())),
    }
}

/// Reject an empty search term.
pub fn require_term(term: &str) -> Result<&str, ValidationError> {
    if term.is_empty() {
        return Err(ValidationError::MissingParameter("term"));
    }
    Ok(term)
}
