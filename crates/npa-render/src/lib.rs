//! Page composition for NPA documents
//!
//! [`render`] turns a [`npa_model::Document`] into a [`PageSequence`]: cover
//! with table of contents, one page per section, references, one page per
//! annex. Page numbers, the SUMÁRIO and running headers are resolved here so
//! every export backend prints the same numbers.

pub mod date;
pub mod image;
pub mod page;
pub mod pagination;
pub mod render;

pub use page::{
    Align, Block, Cell, CoverField, Heading, Letterhead, Page, PageKind, PageSequence,
    RunningHeader, SignatureLine, Table, TocEntry, TocLevel,
};
pub use image::{EmbeddedImage, ImageError, ImageFormat};
pub use pagination::{header_layout, running_header, HeaderSlot, PageEstimate};
pub use render::{render, render_with, RenderOptions};
