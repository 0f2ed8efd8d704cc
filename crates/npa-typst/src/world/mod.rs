//! In-memory compilation environment: sources, images and fonts

pub mod fonts;
pub mod virtual_fs;
pub mod virtual_world;

pub use fonts::{EmbeddedFonts, FALLBACK_FAMILY};
pub use virtual_fs::VirtualFilesystem;
pub use virtual_world::VirtualWorld;
