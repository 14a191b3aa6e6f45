//! Error types shared by every Screenforge crate.
//!
//! The variants follow the failure classes of the assembly pipeline:
//!
//! - **Configuration**: a pattern definition is malformed (unknown slot kind,
//!   slot without a layout position). Indicates a pattern-authoring bug.
//! - **Synthesis**: a required slot could not be filled from the plan and no
//!   repair was possible.
//! - **Input**: an inbound document (plan, hero image, override) is unusable.
//! - **Pattern loading**: a pattern could not be found or fetched.
//! - **Persistence**: the screen store rejected a write.
//!
//! Validation failures are deliberately *not* represented here. They are
//! returned as data so callers can decide whether to regenerate upstream.

use thiserror::Error;

/// Errors produced by the Screenforge pipeline.
#[derive(Debug, Error)]
pub enum ScreenforgeError {
    /// A pattern definition is malformed.
    #[error("Invalid pattern '{pattern}': {reason}")]
    Configuration {
        /// `FAMILY/variant` of the offending pattern
        pattern: String,
        /// What is wrong with it
        reason: String,
    },

    /// A required slot could not be filled.
    #[error("Cannot synthesize slot '{slot}': {reason}")]
    Synthesis {
        /// The slot name that stayed empty
        slot: String,
        /// Why no content could be produced
        reason: String,
    },

    /// An inbound document is missing data or is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No pattern exists for the requested key.
    #[error("Pattern {family}/{variant} not found")]
    PatternNotFound { family: String, variant: u8 },

    /// A pattern exists but could not be loaded.
    #[error("Failed to load pattern {family}/{variant}: {reason}")]
    PatternLoad { family: String, variant: u8, reason: String },

    /// The screen store rejected an operation.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl ScreenforgeError {
    /// Build a configuration error for the pattern `family/variant`.
    pub fn configuration(family: &str, variant: u8, reason: impl Into<String>) -> Self {
        Self::Configuration { pattern: format!("{family}/{variant}"), reason: reason.into() }
    }

    /// Build a synthesis error for `slot`.
    pub fn synthesis(slot: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Synthesis { slot: slot.into(), reason: reason.into() }
    }

    /// Whether the error comes from a malformed pattern definition.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Whether retrying the pattern load could succeed.
    pub fn is_pattern_load(&self) -> bool {
        matches!(self, Self::PatternLoad { .. } | Self::PatternNotFound { .. } | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, ScreenforgeError>;
