//! Error types for the document model
//!
//! Structural edits never fail (see [`crate::EditOutcome`]); errors only
//! come from moving documents in and out of the engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate node id {0} in loaded document")]
    DuplicateId(crate::NodeId),
}

pub type Result<T> = std::result::Result<T, ModelError>;
