//! Annex descriptors
//!
//! Letters are assigned purely by position: the n-th annex is always
//! letter n (A, B, ..., Z, AA, AB, ...), after adds and after removals.

use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::markup::SafeMarkup;

/// What an annex page contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnexKind {
    /// The personnel roster table
    PersonnelRoster,
    /// The qualification matrix table
    QualificationMatrix,
    /// Free content, usually a process flowchart image
    Flowchart,
    /// Free content
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annex {
    pub id: NodeId,
    #[serde(default)]
    pub letter: String,
    pub title: String,
    pub kind: AnnexKind,
    pub editable: bool,
    /// Printed for flowchart/custom annexes
    #[serde(default)]
    pub content: SafeMarkup,
}

impl Annex {
    pub fn new(id: NodeId, title: impl Into<String>, kind: AnnexKind) -> Self {
        Self {
            id,
            letter: String::new(),
            title: title.into(),
            kind,
            editable: true,
            content: SafeMarkup::empty(),
        }
    }

    pub fn locked(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Cover-page line, `{letter} - {title}`
    pub fn listing(&self) -> String {
        format!("{} - {}", self.letter, self.title)
    }
}

/// Ordered annex descriptors with contiguous letters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnexList {
    annexes: Vec<Annex>,
}

impl AnnexList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annex: Annex) {
        self.annexes.push(annex);
        self.reletter();
    }

    /// Remove by id; returns the removed descriptor
    pub fn remove(&mut self, id: NodeId) -> Option<Annex> {
        let position = self.annexes.iter().position(|annex| annex.id == id)?;
        let removed = self.annexes.remove(position);
        self.reletter();
        Some(removed)
    }

    pub fn get(&self, id: NodeId) -> Option<&Annex> {
        self.annexes.iter().find(|annex| annex.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Annex> {
        self.annexes.iter_mut().find(|annex| annex.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annex> {
        self.annexes.iter()
    }

    pub fn len(&self) -> usize {
        self.annexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annexes.is_empty()
    }

    pub fn letters(&self) -> Vec<String> {
        self.annexes.iter().map(|annex| annex.letter.clone()).collect()
    }

    pub(crate) fn reletter(&mut self) {
        for (position, annex) in self.annexes.iter_mut().enumerate() {
            annex.letter = letter_for(position);
        }
    }
}

impl<'a> IntoIterator for &'a AnnexList {
    type Item = &'a Annex;
    type IntoIter = std::slice::Iter<'a, Annex>;

    fn into_iter(self) -> Self::IntoIter {
        self.annexes.iter()
    }
}

/// Letter for a zero-based position: 0 -> "A", 25 -> "Z", 26 -> "AA"
pub fn letter_for(position: usize) -> String {
    let mut n = position + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
