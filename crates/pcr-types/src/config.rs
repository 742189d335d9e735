// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{PcrError, PcrResult};

/// Divisor substituted for an exactly-zero pivot.
pub const DEFAULT_PIVOT_EPSILON: f32 = 1e-30;

/// Below this many rows a level is swept on the calling thread.
pub const DEFAULT_MIN_PARALLEL_LEN: usize = 1024;

/// Solver configuration. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcrConfig {
    /// Replacement divisor when a neighbour's main diagonal is exactly zero.
    /// Trades a small bias for keeping Inf/NaN out of the reduction.
    #[serde(default = "default_pivot_epsilon")]
    pub pivot_epsilon: f32,
    /// Dedicated worker count. `None` uses the global rayon pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
    /// Systems shorter than this are reduced serially.
    #[serde(default = "default_min_parallel_len")]
    pub min_parallel_len: usize,
}

fn default_pivot_epsilon() -> f32 {
    DEFAULT_PIVOT_EPSILON
}
fn default_min_parallel_len() -> usize {
    DEFAULT_MIN_PARALLEL_LEN
}

impl Default for PcrConfig {
    fn default() -> Self {
        PcrConfig {
            pivot_epsilon: DEFAULT_PIVOT_EPSILON,
            num_threads: None,
            min_parallel_len: DEFAULT_MIN_PARALLEL_LEN,
        }
    }
}

impl PcrConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> PcrResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> PcrResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PcrResult<()> {
        if !self.pivot_epsilon.is_finite() || self.pivot_epsilon <= 0.0 {
            return Err(PcrError::ConfigError(format!(
                "pivot_epsilon must be finite and > 0, got {}",
                self.pivot_epsilon
            )));
        }
        if self.num_threads == Some(0) {
            return Err(PcrError::ConfigError(
                "num_threads must be >= 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let cfg = PcrConfig::from_json("{}").unwrap();
        assert_eq!(cfg, PcrConfig::default());
        assert_eq!(cfg.pivot_epsilon, 1e-30);
        assert!(cfg.num_threads.is_none());
    }

    #[test]
    fn test_partial_json_overrides() {
        let cfg = PcrConfig::from_json(r#"{"num_threads": 4, "min_parallel_len": 16}"#).unwrap();
        assert_eq!(cfg.num_threads, Some(4));
        assert_eq!(cfg.min_parallel_len, 16);
        assert_eq!(cfg.pivot_epsilon, DEFAULT_PIVOT_EPSILON);
    }

    #[test]
    fn test_rejects_zero_threads() {
        let err = PcrConfig::from_json(r#"{"num_threads": 0}"#).unwrap_err();
        assert!(matches!(err, PcrError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_non_positive_epsilon() {
        let cfg = PcrConfig {
            pivot_epsilon: 0.0,
            ..PcrConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = PcrConfig {
            pivot_epsilon: -1e-20,
            ..PcrConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = PcrConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, PcrError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PcrConfig::from_file("/nonexistent/pcr_config.json").unwrap_err();
        assert!(matches!(err, PcrError::Io(_)));
    }
}
