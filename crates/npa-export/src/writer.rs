//! Writer seam: one [`DocumentWriter`] per output format

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use npa_render::PageSequence;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = WriterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            other => Err(WriterError::Other(format!("unknown export format: {other}"))),
        }
    }
}

#[derive(Error, Debug)]
pub enum WriterError {
    #[cfg(feature = "pdf")]
    #[error(transparent)]
    Pdf(#[from] npa_typst::TypstError),

    #[cfg(feature = "docx")]
    #[error(transparent)]
    Docx(#[from] npa_docx::DocxError),

    #[error("{0}")]
    Other(String),
}

/// Serializes a rendered page sequence into one output format
///
/// Writers run on a blocking thread and must not touch the document model.
pub trait DocumentWriter: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn write(&self, sequence: &PageSequence) -> Result<Vec<u8>, WriterError>;
}

/// Writers available to [`crate::export`], keyed by format
#[derive(Clone, Default)]
pub struct WriterRegistry {
    writers: BTreeMap<ExportFormat, Arc<dyn DocumentWriter>>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a writer, replacing any previous one for its format
    pub fn register(&mut self, writer: Arc<dyn DocumentWriter>) -> &mut Self {
        let format = writer.format();
        if self.writers.insert(format, writer).is_some() {
            tracing::debug!(%format, "writer replaced");
        }
        self
    }

    pub fn get(&self, format: ExportFormat) -> Option<Arc<dyn DocumentWriter>> {
        self.writers.get(&format).cloned()
    }

    pub fn formats(&self) -> Vec<ExportFormat> {
        self.writers.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixed(ExportFormat, &'static [u8]);

    impl DocumentWriter for Fixed {
        fn format(&self) -> ExportFormat {
            self.0
        }

        fn write(&self, _: &PageSequence) -> Result<Vec<u8>, WriterError> {
            Ok(self.1.to_vec())
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!(" docx ".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert!("odt".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Docx.to_string(), "docx");
    }

    #[test]
    fn test_register_replaces_by_format() {
        let mut registry = WriterRegistry::new();
        registry
            .register(Arc::new(Fixed(ExportFormat::Pdf, b"a")))
            .register(Arc::new(Fixed(ExportFormat::Pdf, b"b")));
        assert_eq!(registry.formats(), vec![ExportFormat::Pdf]);

        let sequence = npa_render::render(&npa_model::Document::new("NPA 01"));
        let writer = registry.get(ExportFormat::Pdf).unwrap();
        assert_eq!(writer.write(&sequence).unwrap(), b"b".to_vec());
        assert!(registry.get(ExportFormat::Docx).is_none());
    }
}
