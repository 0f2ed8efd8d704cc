//! The Typst `World` an export compiles against

use chrono::{Datelike, NaiveDate};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use super::fonts::EmbeddedFonts;
use super::virtual_fs::VirtualFilesystem;
use crate::error::Result;

/// Generated source, its images and the embedded fonts
///
/// Built per export and dropped with it.
pub struct VirtualWorld {
    files: VirtualFilesystem,
    entry: FileId,
    fonts: &'static EmbeddedFonts,
    /// Pinned issue date; `datetime.today()` never reads the clock
    today: NaiveDate,
    library: LazyHash<Library>,
}

impl VirtualWorld {
    pub fn new(
        source: String,
        assets: Vec<(String, Bytes)>,
        today: NaiveDate,
    ) -> Result<Self> {
        let mut files = VirtualFilesystem::new();
        let entry = files.mount_main(source);
        assets
            .into_iter()
            .try_for_each(|(path, content)| files.mount_file(&path, content).map(|_| ()))?;

        Ok(Self {
            files,
            entry,
            fonts: EmbeddedFonts::shared(),
            today,
            library: LazyHash::new(Library::builder().build()),
        })
    }

    pub fn filesystem(&self) -> &VirtualFilesystem {
        &self.files
    }

    fn missing(id: FileId) -> FileError {
        FileError::NotFound(id.vpath().as_rootless_path().into())
    }
}

impl World for VirtualWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.fonts.book()
    }

    fn main(&self) -> FileId {
        self.entry
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        self.files.get_source(id).ok_or_else(|| Self::missing(id))
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        self.files.get_file(id).cloned().ok_or_else(|| Self::missing(id))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.face(index)
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        Datetime::from_ymd(
            self.today.year(),
            u8::try_from(self.today.month()).ok()?,
            u8::try_from(self.today.day()).ok()?,
        )
    }
}
