//! Error types for the DOCX backend

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("ZIP packaging error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writing error: {0}")]
    Xml(String),

    #[error("Invalid image: {0}")]
    Image(String),
}

pub type Result<T> = std::result::Result<T, DocxError>;
