//! Error types for the Typst backend

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypstError {
    #[error("Invalid asset '{0}': {1}")]
    Asset(String, String),

    #[error("Path security violation: {0}")]
    PathSecurityViolation(String),

    #[error("Typst compilation failed: {}", .0.join("; "))]
    Compile(Vec<String>),

    #[error("PDF export failed: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, TypstError>;
