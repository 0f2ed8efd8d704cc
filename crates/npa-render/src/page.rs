//! The page sequence handed to export backends
//!
//! A [`PageSequence`] is a fully resolved snapshot: numbers, letters, page
//! estimates and header texts are already computed, so a backend only has to
//! lay blocks out. Rich content stays as [`SafeMarkup`] for the backend to
//! walk.

use npa_model::SafeMarkup;
use serde::{Deserialize, Serialize};

use crate::pagination::HeaderSlot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSequence {
    pub document_number: String,
    pub total_pages: u32,
    pub pages: Vec<Page>,
}

impl PageSequence {
    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|page| page.number == number)
    }

    /// Serialize for inspection tools
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// One-based logical page number
    pub number: u32,
    pub kind: PageKind,
    /// `None` on the cover page
    pub header: Option<RunningHeader>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageKind {
    Cover,
    Section { number: String },
    References,
    Annex { letter: String },
}

/// Resolved header text for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningHeader {
    pub left: String,
    pub right: String,
    /// Which slot sits on which side
    pub layout: [HeaderSlot; 2],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Block {
    Letterhead(Letterhead),
    CoverFields(Vec<CoverField>),
    Heading(Heading),
    Toc(Vec<TocEntry>),
    /// Rich content, optionally led by a bold number
    Rich {
        lead: Option<String>,
        markup: SafeMarkup,
        first_line_indent: bool,
    },
    Signatures(Vec<SignatureLine>),
    Table(Table),
    Note { text: String, align: Align },
    /// One empty line
    Spacer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letterhead {
    pub organization: Vec<String>,
    pub document_type: String,
    /// `data:image/...;base64,` URI
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverField {
    pub label: String,
    pub lines: Vec<String>,
}

impl CoverField {
    pub fn single(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            lines: vec![value.into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub bold: bool,
    pub underline: bool,
    pub align: Align,
}

impl Heading {
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            underline: false,
            align: Align::Left,
        }
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TocLevel {
    Section,
    Subsection,
    References,
}

impl TocLevel {
    pub fn bold(&self) -> bool {
        !matches!(self, TocLevel::Subsection)
    }

    pub fn underline(&self) -> bool {
        matches!(self, TocLevel::Subsection)
    }

    pub fn indented(&self) -> bool {
        matches!(self, TocLevel::Subsection)
    }
}

/// One TOC row: label, dotted leader, page number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: TocLevel,
    pub label: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureLine {
    pub label: String,
    /// Already uppercased
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    /// Columns covered
    pub span: u16,
    /// Rows covered, counting this one
    pub row_span: u16,
    pub bold: bool,
    pub align: Align,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: 1,
            row_span: 1,
            bold: false,
            align: Align::Left,
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            align: Align::Center,
            ..Self::text(text)
        }
    }

    pub fn spanning(mut self, span: u16) -> Self {
        self.span = span;
        self
    }

    pub fn spanning_rows(mut self, rows: u16) -> Self {
        self.row_span = rows;
        self
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Bordered table
///
/// In every row, the column spans of its cells plus the columns still
/// covered by row spans from rows above add up to `columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: u16,
    pub header: Vec<Vec<Cell>>,
    pub body: Vec<Vec<Cell>>,
    pub footer: Vec<Vec<Cell>>,
}

impl Table {
    pub fn rows(&self) -> impl Iterator<Item = &Vec<Cell>> {
        self.header.iter().chain(&self.body).chain(&self.footer)
    }
}
