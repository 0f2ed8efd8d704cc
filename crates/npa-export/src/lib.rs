//! Export pipeline for NPA documents
//!
//! Backends implement [`DocumentWriter`] and are injected through a
//! [`WriterRegistry`]; [`export`] renders the document and runs the writer
//! for the requested format off the async runtime, with a timeout and a
//! cancellation token. The `pdf` and `docx` features (both on by default)
//! provide the built-in writers.

pub mod backends;
pub mod config;
pub mod export;
pub mod writer;

pub use backends::default_registry;
#[cfg(feature = "docx")]
pub use backends::DocxWriter;
#[cfg(feature = "pdf")]
pub use backends::PdfWriter;
pub use config::ExportConfig;
pub use export::{export, ExportArtifact, ExportError, ExportOptions};
pub use writer::{DocumentWriter, ExportFormat, WriterError, WriterRegistry};
