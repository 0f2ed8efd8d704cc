//! Page estimate, table of contents and running headers
//!
//! Pagination is approximate: every section is one logical page, whatever
//! its length. The cover (which also carries the table of contents) is page
//! 1, sections follow from page 2, then the references page, then one page
//! per annex. Backends keep one section per page so printed page numbers
//! match the estimate; a section that overflows its page in a backend shifts
//! later physical pages without changing the printed numbers.

use npa_model::Document;
use serde::{Deserialize, Serialize};

use crate::page::{RunningHeader, TocEntry, TocLevel};

pub const COVER_PAGE: u32 = 1;
pub const REFERENCES_LABEL: &str = "REFERÊNCIAS";

/// Page numbers assigned to each part of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEstimate {
    /// Page of each section, in section order
    pub sections: Vec<u32>,
    pub references: u32,
    /// Page of each annex, in letter order
    pub annexes: Vec<u32>,
    pub total: u32,
}

pub fn estimate(document: &Document) -> PageEstimate {
    let mut counter = COVER_PAGE + 1;
    let mut next = || {
        let page = counter;
        counter += 1;
        page
    };

    let sections: Vec<u32> = document.sections().iter().map(|_| next()).collect();
    let references = next();
    let annexes: Vec<u32> = document.annexes().iter().map(|_| next()).collect();
    let total = annexes.last().copied().unwrap_or(references);

    PageEstimate {
        sections,
        references,
        annexes,
        total,
    }
}

/// Rows of the SUMÁRIO: each section, its subsections on the same page,
/// then the references entry
pub fn table_of_contents(document: &Document, estimate: &PageEstimate) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    for (section, &page) in document.sections().iter().zip(&estimate.sections) {
        entries.push(TocEntry {
            level: TocLevel::Section,
            label: numbered_label(&section.number, &section.title),
            page,
        });
        for subsection in &section.subsections {
            entries.push(TocEntry {
                level: TocLevel::Subsection,
                label: numbered_label(&subsection.number, &subsection.title),
                page,
            });
        }
    }
    entries.push(TocEntry {
        level: TocLevel::References,
        label: REFERENCES_LABEL.to_string(),
        page: estimate.references,
    });
    entries
}

/// `{number} {TITLE}`; just the number when the title is blank
pub fn numbered_label(number: &str, title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        number.to_string()
    } else {
        format!("{} {}", number, title.to_uppercase())
    }
}

/// What a header slot shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderSlot {
    DocumentNumber,
    /// `{page}/{total}`
    PageOfTotal,
}

/// `[left, right]` slots for a page; the cover has no header
///
/// Even pages carry the document number on the left, odd pages mirror it.
pub fn header_layout(page: u32) -> Option<[HeaderSlot; 2]> {
    if page <= COVER_PAGE {
        None
    } else if page % 2 == 0 {
        Some([HeaderSlot::DocumentNumber, HeaderSlot::PageOfTotal])
    } else {
        Some([HeaderSlot::PageOfTotal, HeaderSlot::DocumentNumber])
    }
}

pub fn running_header(document_number: &str, page: u32, total: u32) -> Option<RunningHeader> {
    let layout = header_layout(page)?;
    let resolve = |slot: HeaderSlot| match slot {
        HeaderSlot::DocumentNumber => document_number.to_string(),
        HeaderSlot::PageOfTotal => format!("{page}/{total}"),
    };
    Some(RunningHeader {
        left: resolve(layout[0]),
        right: resolve(layout[1]),
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use npa_model::{template, AnnexKind};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sections_with_subsections(counts: &[usize]) -> Document {
        let mut document = Document::new("NPA 01-01/TEST/2025");
        for (index, &count) in counts.iter().enumerate() {
            document.add_section();
            for _ in 0..count {
                document.add_subsection(index);
            }
        }
        document
    }

    #[test]
    fn test_three_sections_then_references() {
        let document = sections_with_subsections(&[4, 0, 9]);
        let estimate = estimate(&document);
        assert_eq!(estimate.sections, vec![2, 3, 4]);
        assert_eq!(estimate.references, 5);
        assert_eq!(estimate.total, 5);
    }

    #[test]
    fn test_annexes_follow_references() {
        let document = template::standard(None);
        let estimate = estimate(&document);
        assert_eq!(estimate.references, 5);
        assert_eq!(estimate.annexes, vec![6, 7, 8]);
        assert_eq!(estimate.total, 8);
    }

    #[test]
    fn test_empty_document_has_cover_and_references() {
        let estimate = estimate(&Document::new("x"));
        assert!(estimate.sections.is_empty());
        assert_eq!(estimate.references, 2);
        assert_eq!(estimate.total, 2);
    }

    #[test]
    fn test_toc_rows() {
        let mut document = sections_with_subsections(&[2]);
        let section = document.sections()[0].id;
        document.edit_title(section, "Disposições gerais");
        let sub = document.sections()[0].subsections[0].id;
        document.edit_title(sub, "Composição");

        let entries = table_of_contents(&document, &estimate(&document));
        let rows: Vec<(TocLevel, &str, u32)> = entries
            .iter()
            .map(|e| (e.level, e.label.as_str(), e.page))
            .collect();
        assert_eq!(
            rows,
            vec![
                (TocLevel::Section, "1 DISPOSIÇÕES GERAIS", 2),
                (TocLevel::Subsection, "1.1 COMPOSIÇÃO", 2),
                (TocLevel::Subsection, "1.2", 2),
                (TocLevel::References, "REFERÊNCIAS", 3),
            ]
        );
    }

    #[test]
    fn test_toc_ignores_annexes() {
        let mut document = sections_with_subsections(&[0]);
        document.add_annex("Fluxo", AnnexKind::Flowchart);
        let entries = table_of_contents(&document, &estimate(&document));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_cover_has_no_header() {
        assert_eq!(header_layout(1), None);
        assert_eq!(running_header("NPA", 1, 5), None);
    }

    #[test]
    fn test_header_parity() {
        let even = running_header("NPA 01-01/TEST/2025", 2, 5).unwrap();
        assert_eq!(even.left, "NPA 01-01/TEST/2025");
        assert_eq!(even.right, "2/5");

        let odd = running_header("NPA 01-01/TEST/2025", 3, 5).unwrap();
        assert_eq!(odd.left, "3/5");
        assert_eq!(odd.right, "NPA 01-01/TEST/2025");
    }

    proptest! {
        #[test]
        fn header_parity_holds(page in 2u32..500, extra in 0u32..50) {
            let total = page + extra;
            let header = running_header("DOC", page, total).unwrap();
            let counter = format!("{page}/{total}");
            if page % 2 == 0 {
                prop_assert_eq!(header.left, "DOC");
                prop_assert_eq!(header.right, counter);
            } else {
                prop_assert_eq!(header.left, counter);
                prop_assert_eq!(header.right, "DOC");
            }
        }

        #[test]
        fn subsections_share_section_page(counts in prop::collection::vec(0usize..5, 0..8)) {
            let document = sections_with_subsections(&counts);
            let estimate = estimate(&document);
            let expected: Vec<u32> = (0..counts.len() as u32).map(|i| i + 2).collect();
            prop_assert_eq!(&estimate.sections, &expected);
            prop_assert_eq!(estimate.references, counts.len() as u32 + 2);
            prop_assert_eq!(estimate.total, 1 + counts.len() as u32 + 1);
        }
    }
}
