//! In-memory files behind a compilation
//!
//! Holds the generated `main.typ` and the decoded images it references.
//! Nothing is read from or written to disk.

use std::collections::HashMap;

use typst::foundations::Bytes;
use typst::syntax::{FileId, Source, VirtualPath};

use crate::error::{Result, TypstError};

pub const MAIN_PATH: &str = "/main.typ";

#[derive(Debug, Default)]
pub struct VirtualFilesystem {
    entries: HashMap<FileId, Bytes>,
}

impl VirtualFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the generated source under [`MAIN_PATH`]
    pub fn mount_main(&mut self, text: String) -> FileId {
        let id = FileId::new(None, VirtualPath::new(MAIN_PATH));
        self.entries.insert(id, Bytes::from(text.into_bytes()));
        id
    }

    /// Store an asset; `a//b.png`, `/a/b.png` and `a/b.png` name the same file
    pub fn mount_file(&mut self, path: &str, content: Bytes) -> Result<FileId> {
        let id = FileId::new(None, VirtualPath::new(canonical(path)?));
        self.entries.insert(id, content);
        Ok(id)
    }

    /// The file as Typst source, if it is valid UTF-8
    pub fn get_source(&self, id: FileId) -> Option<Source> {
        let text = std::str::from_utf8(self.entries.get(&id)?).ok()?;
        Some(Source::new(id, text.to_owned()))
    }

    pub fn get_file(&self, id: FileId) -> Option<&Bytes> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rooted path with empty segments dropped; parent segments and host
/// paths are refused
fn canonical(path: &str) -> Result<String> {
    if path.contains(':') || path.contains('\\') {
        return Err(TypstError::PathSecurityViolation(format!(
            "not a virtual path: {path}"
        )));
    }
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if segment == ".." {
            return Err(TypstError::PathSecurityViolation(format!(
                "parent segment in asset path: {path}"
            )));
        }
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        return Err(TypstError::PathSecurityViolation(
            "empty asset path".to_string(),
        ));
    }
    Ok(out)
}
