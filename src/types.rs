// ABOUTME: Validated domain newtypes shared across checks and steps.
// ABOUTME: Construction is the only place validation happens.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TablePrefixError {
    #[error("table prefix cannot be empty")]
    Empty,

    #[error("table prefix exceeds maximum length of 32 characters")]
    TooLong,

    #[error("invalid character in table prefix: '{0}'")]
    InvalidChar(char),
}

/// A table-name prefix for the shared-database topology.
///
/// Restricted to lowercase alphanumerics and underscores so it can never
/// need quoting inside generated SQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TablePrefix(String);

impl TablePrefix {
    pub fn new(value: &str) -> Result<Self, TablePrefixError> {
        if value.is_empty() {
            return Err(TablePrefixError::Empty);
        }

        if value.len() > 32 {
            return Err(TablePrefixError::TooLong);
        }

        for c in value.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '_' {
                return Err(TablePrefixError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TablePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
