//! Typed errors for the suitability engine.
//!
//! Engine-level failures use `thiserror` so callers can match on them, e.g. to show an
//! unsupported crop as a user-facing message. File loading and the CLI wrap these in `anyhow`.
use thiserror::Error;

/// The kind of lookup which failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum LookupKind {
    /// A crop identifier
    #[display("crop")]
    Crop,
    /// A region identifier
    #[display("region")]
    Region,
}

/// Errors raised while evaluating suitability or validating reference data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SuitabilityError {
    /// An unknown crop or region was requested
    #[error("Unknown {kind}: {id}")]
    NotFound {
        /// Which table the lookup was performed on
        kind: LookupKind,
        /// The identifier which could not be found
        id: String,
    },

    /// A measured value or parameter cannot be scored
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A reference table failed validation
    #[error("Invalid reference data in {table}: {reason}")]
    DataIntegrity {
        /// The table containing the bad entry
        table: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

impl SuitabilityError {
    /// Create a [`SuitabilityError::NotFound`] for a crop
    pub fn crop_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: LookupKind::Crop,
            id: id.to_string(),
        }
    }

    /// Create a [`SuitabilityError::NotFound`] for a region
    pub fn region_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: LookupKind::Region,
            id: id.to_string(),
        }
    }

    /// Create a [`SuitabilityError::DataIntegrity`] error
    pub fn data_integrity(table: &'static str, reason: impl Into<String>) -> Self {
        Self::DataIntegrity {
            table,
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, SuitabilityError>;
