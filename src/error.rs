//! Structured error types for cellgrid.
//!
//! Every fallible grid, tree and overlay operation reports one of these
//! synchronously at the point of violation.

/// All errors that can occur while mutating or querying a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Index outside `[0, len)`, e.g. a missing child or column.
    #[error("index {index} out of range (len {len})")]
    InvalidRange { index: usize, len: usize },

    /// A required reference was omitted.
    #[error("required argument missing: {0}")]
    NullArgument(&'static str),

    /// Operation on an item, column or control that was already destroyed.
    #[error("access to a disposed object")]
    DisposedAccess,

    /// Operation that does not apply in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Argument value rejected (e.g. a row height below 1).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be parsed.
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    /// Shorthand for an [`GridError::InvalidRange`] check.
    pub(crate) fn check_range(index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::InvalidRange { index, len })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(GridError::check_range(0, 1).is_ok());
        match GridError::check_range(3, 3) {
            Err(GridError::InvalidRange { index, len }) => {
                assert_eq!((index, len), (3, 3));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_config_error_message() {
        let err: GridError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("config:"));
    }
}
