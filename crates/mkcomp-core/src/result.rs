//! Result type alias for mkcomp operations

use crate::error::MkcompError;

/// Standard Result type for mkcomp operations
pub type Result<T> = std::result::Result<T, MkcompError>;

/// Batch-style handling for results that must not stop a run
pub trait ResultExt<T> {
    /// Log the error against `subject` and continue with None
    fn log_and_continue(self, subject: &str) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn log_and_continue(self, subject: &str) -> Option<T> {
        let err = match self {
            Ok(value) => return Some(value),
            Err(err) => err,
        };

        if err.is_recoverable() {
            tracing::warn!("Skipping {}: {}", subject, err);
        } else {
            tracing::error!("Failed on {}: {}", subject, err);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_continue() {
        let ok: Result<u8> = Ok(1);
        assert_eq!(ok.log_and_continue("Button"), Some(1));

        let soft: Result<u8> = Err(MkcompError::validation_error("bad name"));
        assert_eq!(soft.log_and_continue("button"), None);

        let hard: Result<u8> = Err(MkcompError::internal_error("boom"));
        assert_eq!(hard.log_and_continue("Card"), None);
    }
}
