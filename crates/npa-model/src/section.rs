//! Section / subsection / item tree

use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::markup::SafeMarkup;

/// Numbered top-level block of the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: NodeId,
    /// Display number, recomputed from position
    #[serde(default)]
    pub number: String,
    pub title: String,
    pub title_editable: bool,
    pub removable: bool,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
}

impl Section {
    /// A fixed section of the template: locked title, cannot be removed
    pub fn builtin(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            number: String::new(),
            title: title.into(),
            title_editable: false,
            removable: false,
            subsections: Vec::new(),
        }
    }

    /// A section added by the author
    pub fn user_added(id: NodeId) -> Self {
        Self {
            id,
            number: String::new(),
            title: String::new(),
            title_editable: true,
            removable: true,
            subsections: Vec::new(),
        }
    }

    pub fn with_subsection(mut self, subsection: Subsection) -> Self {
        self.subsections.push(subsection);
        self
    }

    /// Recompute this section's number and everything below it
    pub(crate) fn renumber(&mut self, position: usize) {
        self.number = (position + 1).to_string();
        for (index, subsection) in self.subsections.iter_mut().enumerate() {
            subsection.renumber(&self.number, index);
        }
    }
}

/// How a subsection is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsectionKind {
    /// Title, free content and items
    #[default]
    Text,
    /// Placeholder for the three signatories
    SignatureBlock,
}

/// Numbered child of a [`Section`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    pub id: NodeId,
    #[serde(default)]
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub content: SafeMarkup,
    #[serde(default)]
    pub kind: SubsectionKind,
    pub title_editable: bool,
    pub content_editable: bool,
    pub removable: bool,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Subsection {
    /// A fixed subsection of the template: title locked, content editable
    pub fn builtin(id: NodeId, title: impl Into<String>, content: SafeMarkup) -> Self {
        Self {
            id,
            number: String::new(),
            title: title.into(),
            content,
            kind: SubsectionKind::Text,
            title_editable: false,
            content_editable: true,
            removable: false,
            items: Vec::new(),
        }
    }

    /// The signature placeholder; nothing about it is editable
    pub fn signature_block(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            kind: SubsectionKind::SignatureBlock,
            content_editable: false,
            ..Self::builtin(id, title, SafeMarkup::empty())
        }
    }

    pub fn user_added(id: NodeId) -> Self {
        Self {
            id,
            number: String::new(),
            title: String::new(),
            content: SafeMarkup::empty(),
            kind: SubsectionKind::Text,
            title_editable: true,
            content_editable: true,
            removable: true,
            items: Vec::new(),
        }
    }

    pub fn locked_content(mut self) -> Self {
        self.content_editable = false;
        self
    }

    pub fn is_signature_block(&self) -> bool {
        self.kind == SubsectionKind::SignatureBlock
    }

    pub(crate) fn renumber(&mut self, parent: &str, position: usize) {
        self.number = format!("{}.{}", parent, position + 1);
        for (index, item) in self.items.iter_mut().enumerate() {
            item.number = format!("{}.{}", self.number, index + 1);
        }
    }
}

/// Leaf of the tree (a sub-subsection such as "1.4.1")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: NodeId,
    #[serde(default)]
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub content: SafeMarkup,
    pub editable: bool,
}

impl Item {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            number: String::new(),
            title: String::new(),
            content: SafeMarkup::empty(),
            editable: true,
        }
    }
}
