//! PDF backend for NPA documents
//!
//! A rendered [`npa_render::PageSequence`] is turned into Typst source
//! ([`source::generate`]), mounted in an in-memory [`world::VirtualWorld`]
//! with embedded fonts and decoded images, and compiled to PDF bytes
//! ([`compile_pdf`]).

pub mod compile;
pub mod error;
mod markup;
pub mod source;
pub mod world;

pub use compile::compile_pdf;
pub use error::{Result, TypstError};
pub use source::{generate, TypstOptions, TypstSource};
