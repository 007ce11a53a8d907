//! Load configuration
//!
//! Presets cover the two common cases: [`LoadOptions::strict`] for CI and
//! registry authoring, where any bad record is a build failure, and
//! [`LoadOptions::lenient`] for backends that must keep serving the good
//! records of a partially broken registry.
//!
//! Options deserialize from JSON with every field optional:
//!
//! ```rust
//! use senreg_registry::{LoadOptions, LoadPolicy};
//!
//! let options: LoadOptions = serde_json::from_str(r#"{"policy": "skip_invalid"}"#)?;
//! assert_eq!(options.policy, LoadPolicy::SkipInvalid);
//! assert!(options.verify_examples);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};

/// Default relative tolerance when comparing converted examples
pub const DEFAULT_EXAMPLE_TOLERANCE: f64 = 1e-9;

/// What to do with a record that fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Abort the load on the first bad record
    #[default]
    Strict,
    /// Log and skip bad records, keep the rest
    SkipInvalid,
}

/// Registry load options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadOptions {
    /// Failure policy for individual records
    pub policy: LoadPolicy,

    /// Check every example value against the sensor's own formula
    pub verify_examples: bool,

    /// Relative tolerance for numeric example comparison, scaled by
    /// `max(1, |expected|)`
    pub example_tolerance: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            policy: LoadPolicy::Strict,
            verify_examples: true,
            example_tolerance: DEFAULT_EXAMPLE_TOLERANCE,
        }
    }
}

impl LoadOptions {
    /// Any bad record fails the load, examples verified
    pub fn strict() -> Self {
        Self::default()
    }

    /// Bad records are skipped, examples not verified
    pub fn lenient() -> Self {
        Self {
            policy: LoadPolicy::SkipInvalid,
            verify_examples: false,
            ..Self::default()
        }
    }

    /// Set the failure policy
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable example verification
    pub fn with_example_verification(mut self, enabled: bool) -> Self {
        self.verify_examples = enabled;
        self
    }

    /// Set the example tolerance. Negative values are taken as their magnitude.
    pub fn with_example_tolerance(mut self, tolerance: f64) -> Self {
        self.example_tolerance = tolerance.abs();
        self
    }
}
