//! Pipeline error types.

use crate::domain::InvalidState;
use crate::store::StoreError;

/// Failures that abort an interaction.
///
/// Empty results and availability problems are not errors; they are
/// reported through [`Notice`](super::Notice) on the view.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The state is not one of the known route tables
    #[error("invalid state selection: {0}")]
    InvalidStateSelection(String),

    /// The store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// Whether the caller's input caused the failure.
    ///
    /// Missing route tables are already reported as invalid states, so any
    /// remaining store error, including a missing offering table, is a
    /// store fault.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, PipelineError::InvalidStateSelection(_))
    }
}

impl From<InvalidState> for PipelineError {
    fn from(e: InvalidState) -> Self {
        PipelineError::InvalidStateSelection(e.to_string())
    }
}
