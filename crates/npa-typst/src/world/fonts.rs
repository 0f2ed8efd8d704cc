//! Fonts bundled with `typst-assets`
//!
//! System fonts are never scanned: a PDF exported on one machine must match
//! the one exported on another.

use std::sync::OnceLock;

use typst::foundations::Bytes;
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;

/// Family used when the configured one is not embedded
pub const FALLBACK_FAMILY: &str = "Libertinus Serif";

static EMBEDDED: OnceLock<EmbeddedFonts> = OnceLock::new();

/// Every face from `typst-assets`, indexed in the order the book lists them
#[derive(Debug)]
pub struct EmbeddedFonts {
    book: LazyHash<FontBook>,
    faces: Vec<Font>,
}

impl EmbeddedFonts {
    /// Process-wide instance; parsing the faces happens on first use
    pub fn shared() -> &'static EmbeddedFonts {
        EMBEDDED.get_or_init(Self::load)
    }

    fn load() -> Self {
        let faces: Vec<Font> = typst_assets::fonts()
            .flat_map(|data| Font::iter(Bytes::from_static(data)))
            .collect();
        let book = FontBook::from_fonts(&faces);
        tracing::debug!(faces = faces.len(), "embedded fonts loaded");
        Self {
            book: LazyHash::new(book),
            faces,
        }
    }

    pub fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    pub fn face(&self, index: usize) -> Option<Font> {
        self.faces.get(index).cloned()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn contains_family(&self, family: &str) -> bool {
        self.faces
            .iter()
            .any(|face| face.info().family.eq_ignore_ascii_case(family))
    }

    /// Families to hand to `#set text(font: ..)`, requested one first.
    ///
    /// Missing families are reported once per export and
    /// [`FALLBACK_FAMILY`] covers them.
    pub fn family_chain(&self, requested: &str) -> Vec<String> {
        if requested.eq_ignore_ascii_case(FALLBACK_FAMILY) {
            return vec![FALLBACK_FAMILY.to_string()];
        }
        if !self.contains_family(requested) {
            tracing::warn!(
                family = requested,
                fallback = FALLBACK_FAMILY,
                "font family not embedded"
            );
        }
        vec![requested.to_string(), FALLBACK_FAMILY.to_string()]
    }
}
