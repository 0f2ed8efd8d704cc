//! DOCX backend for NPA documents
//!
//! Writes a [`npa_render::PageSequence`] as a WordprocessingML package:
//! one body section where every logical page starts on a new sheet,
//! mirrored even/odd running headers with `PAGE`/`NUMPAGES` fields and an
//! empty first-page header for the cover.
//!
//! ```no_run
//! use npa_docx::{write_docx, DocxOptions};
//! use npa_model::template;
//!
//! let sequence = npa_render::render(&template::standard(None));
//! let bytes = write_docx(&sequence, &DocxOptions::default()).unwrap();
//! std::fs::write("npa.docx", bytes).unwrap();
//! ```

mod body;
mod document;
pub mod error;
mod media;
mod package;
mod parts;
mod rich;
mod table;
mod xml;

pub use error::{DocxError, Result};
pub use package::{write_docx, DocxOptions};
