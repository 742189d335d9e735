// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PcrError {
    #[error("Allocation of {requested} f32 values failed")]
    Allocation { requested: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Size mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PcrError {
    /// True for the precondition failures a caller should treat as a
    /// programming error (null/inconsistent handles in the C heritage).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            PcrError::InvalidArgument(_) | PcrError::SizeMismatch { .. }
        )
    }
}

pub type PcrResult<T> = Result<T, PcrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_is_invalid_argument() {
        let err = PcrError::SizeMismatch {
            expected: 4,
            found: 3,
        };
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Size mismatch: expected 4, found 3");
    }

    #[test]
    fn test_allocation_is_not_invalid_argument() {
        let err = PcrError::Allocation { requested: 8 };
        assert!(!err.is_invalid_argument());
        assert!(err.to_string().contains("8 f32 values"));
    }
}
