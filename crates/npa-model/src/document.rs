//! The document aggregate and its structural edits
//!
//! Every structural operation ends with [`Document::renumber`], so display
//! numbers and annex letters are always a function of position. Edits that
//! reference an unknown id, or a node whose flags forbid the edit, do
//! nothing and say so through [`EditOutcome`].

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::annex::{Annex, AnnexKind, AnnexList};
use crate::error::{ModelError, Result};
use crate::id::{IdAllocator, NodeId};
use crate::markup::SafeMarkup;
use crate::qualification::QualificationMatrix;
use crate::roster::PersonnelRoster;
use crate::section::{Item, Section, Subsection};
use crate::signature::Signatures;

/// Validity period printed on the cover
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    OneYear,
    #[default]
    TwoYears,
    ThreeYears,
    Indefinite,
}

impl Validity {
    pub fn label(&self) -> &'static str {
        match self {
            Validity::OneYear => "1 ANO",
            Validity::TwoYears => "2 ANOS",
            Validity::ThreeYears => "3 ANOS",
            Validity::Indefinite => "Prazo Indeterminado",
        }
    }
}

/// Result of an edit; edits never fail loudly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// No node with that id (or index out of range)
    NotFound,
    /// The node's flags do not allow this edit
    Locked,
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

/// Borrowed view of any addressable node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Section(&'a Section),
    Subsection(&'a Subsection),
    Item(&'a Item),
    Annex(&'a Annex),
}

/// Root aggregate of an NPA
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Free-text identifier, `NPA NN-NN/SETOR/YYYY`
    pub number: String,
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub validity: Validity,
    pub subject: String,
    pub distribution: String,
    #[serde(default)]
    annexes: AnnexList,
    #[serde(default)]
    sections: Vec<Section>,
    #[serde(default)]
    pub references: SafeMarkup,
    #[serde(default)]
    pub signatures: Signatures,
    #[serde(default)]
    pub roster: PersonnelRoster,
    #[serde(default)]
    pub qualifications: QualificationMatrix,
    #[serde(skip)]
    ids: IdAllocator,
}

impl Document {
    /// A document with no sections, annexes or table rows
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            issue_date: None,
            validity: Validity::default(),
            subject: String::new(),
            distribution: String::new(),
            annexes: AnnexList::new(),
            sections: Vec::new(),
            references: SafeMarkup::empty(),
            signatures: Signatures::default(),
            roster: PersonnelRoster::new(),
            qualifications: QualificationMatrix::new(),
            ids: IdAllocator::new(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn annexes(&self) -> &AnnexList {
        &self.annexes
    }

    // ============================================================
    // Sections
    // ============================================================

    /// Append an author section: editable title, removable, empty
    pub fn add_section(&mut self) -> NodeId {
        let id = self.ids.next_id();
        self.sections.push(Section::user_added(id));
        self.renumber();
        tracing::debug!(%id, number = self.sections.len(), "section added");
        id
    }

    /// Append a fixed template section
    pub fn add_builtin_section(&mut self, title: impl Into<String>) -> NodeId {
        let id = self.ids.next_id();
        self.sections.push(Section::builtin(id, title));
        self.renumber();
        tracing::debug!(%id, number = self.sections.len(), "builtin section added");
        id
    }

    pub fn remove_section(&mut self, id: NodeId) -> EditOutcome {
        let Some(position) = self.sections.iter().position(|s| s.id == id) else {
            tracing::debug!(%id, "remove_section: no such section");
            return EditOutcome::NotFound;
        };
        if !self.sections[position].removable {
            tracing::warn!(%id, "remove_section: section is not removable");
            return EditOutcome::Locked;
        }
        self.sections.remove(position);
        self.renumber();
        tracing::debug!(%id, "section removed");
        EditOutcome::Applied
    }

    // ============================================================
    // Subsections
    // ============================================================

    /// Append an author subsection under the section at `section_index`
    pub fn add_subsection(&mut self, section_index: usize) -> Option<NodeId> {
        self.push_subsection(section_index, Subsection::user_added)
    }

    /// Append a fixed template subsection
    pub fn add_builtin_subsection(
        &mut self,
        section_index: usize,
        title: impl Into<String>,
        content: SafeMarkup,
    ) -> Option<NodeId> {
        self.push_subsection(section_index, |id| Subsection::builtin(id, title, content))
    }

    /// Append the signature placeholder subsection
    pub fn add_signature_block(
        &mut self,
        section_index: usize,
        title: impl Into<String>,
    ) -> Option<NodeId> {
        self.push_subsection(section_index, |id| Subsection::signature_block(id, title))
    }

    /// Lock the content of a subsection; used by templates
    pub fn lock_content(&mut self, id: NodeId) -> EditOutcome {
        match self.subsection_mut(id) {
            Some(subsection) => {
                subsection.content_editable = false;
                EditOutcome::Applied
            }
            None => EditOutcome::NotFound,
        }
    }

    /// An id is only allocated once the section is known to exist
    fn push_subsection(
        &mut self,
        section_index: usize,
        build: impl FnOnce(NodeId) -> Subsection,
    ) -> Option<NodeId> {
        if section_index >= self.sections.len() {
            tracing::debug!(section_index, "add_subsection: section index out of range");
            return None;
        }
        let id = self.ids.next_id();
        self.sections[section_index].subsections.push(build(id));
        self.renumber();
        tracing::debug!(%id, section_index, "subsection added");
        Some(id)
    }

    pub fn remove_subsection(&mut self, section_index: usize, id: NodeId) -> EditOutcome {
        let Some(section) = self.sections.get_mut(section_index) else {
            tracing::debug!(section_index, "remove_subsection: section index out of range");
            return EditOutcome::NotFound;
        };
        let Some(position) = section.subsections.iter().position(|s| s.id == id) else {
            tracing::debug!(%id, section_index, "remove_subsection: no such subsection");
            return EditOutcome::NotFound;
        };
        if !section.subsections[position].removable {
            tracing::warn!(%id, "remove_subsection: subsection is not removable");
            return EditOutcome::Locked;
        }
        section.subsections.remove(position);
        self.renumber();
        tracing::debug!(%id, section_index, "subsection removed");
        EditOutcome::Applied
    }

    // ============================================================
    // Items (sub-subsections)
    // ============================================================

    pub fn add_item(&mut self, section_index: usize, subsection_index: usize) -> Option<NodeId> {
        let subsection = self
            .sections
            .get_mut(section_index)?
            .subsections
            .get_mut(subsection_index)?;
        let id = self.ids.next_id();
        subsection.items.push(Item::new(id));
        self.renumber();
        tracing::debug!(%id, section_index, subsection_index, "item added");
        Some(id)
    }

    pub fn remove_item(
        &mut self,
        section_index: usize,
        subsection_index: usize,
        id: NodeId,
    ) -> EditOutcome {
        let Some(subsection) = self
            .sections
            .get_mut(section_index)
            .and_then(|section| section.subsections.get_mut(subsection_index))
        else {
            return EditOutcome::NotFound;
        };
        let before = subsection.items.len();
        subsection.items.retain(|item| item.id != id);
        if subsection.items.len() == before {
            tracing::debug!(%id, section_index, subsection_index, "remove_item: no such item");
            return EditOutcome::NotFound;
        }
        self.renumber();
        tracing::debug!(%id, section_index, subsection_index, "item removed");
        EditOutcome::Applied
    }

    // ============================================================
    // Annexes
    // ============================================================

    pub fn add_annex(&mut self, title: impl Into<String>, kind: AnnexKind) -> NodeId {
        let id = self.ids.next_id();
        self.annexes.push(Annex::new(id, title, kind));
        tracing::debug!(%id, ?kind, "annex added");
        id
    }

    /// Append an annex whose title and content cannot be edited
    pub fn add_locked_annex(&mut self, title: impl Into<String>, kind: AnnexKind) -> NodeId {
        let id = self.ids.next_id();
        self.annexes.push(Annex::new(id, title, kind).locked());
        tracing::debug!(%id, ?kind, "locked annex added");
        id
    }

    pub fn remove_annex(&mut self, id: NodeId) -> EditOutcome {
        match self.annexes.remove(id) {
            Some(_) => {
                tracing::debug!(%id, "annex removed");
                EditOutcome::Applied
            }
            None => EditOutcome::NotFound,
        }
    }

    // ============================================================
    // Field edits
    // ============================================================

    /// Replace the title of any section, subsection, item or annex
    pub fn edit_title(&mut self, id: NodeId, value: impl Into<String>) -> EditOutcome {
        let value = value.into();
        let outcome = if let Some(section) = self.sections.iter_mut().find(|s| s.id == id) {
            replace_if(section.title_editable, &mut section.title, value)
        } else if let Some(subsection) = self.subsection_mut(id) {
            replace_if(subsection.title_editable, &mut subsection.title, value)
        } else if let Some(item) = self.item_mut(id) {
            replace_if(item.editable, &mut item.title, value)
        } else if let Some(annex) = self.annexes.get_mut(id) {
            replace_if(annex.editable, &mut annex.title, value)
        } else {
            EditOutcome::NotFound
        };
        log_edit("title", id, outcome);
        outcome
    }

    /// Replace the rich content of a subsection, item or annex
    pub fn edit_content(&mut self, id: NodeId, value: SafeMarkup) -> EditOutcome {
        let outcome = if self.sections.iter().any(|s| s.id == id) {
            // Sections only have a title
            EditOutcome::Locked
        } else if let Some(subsection) = self.subsection_mut(id) {
            replace_if(subsection.content_editable, &mut subsection.content, value)
        } else if let Some(item) = self.item_mut(id) {
            replace_if(item.editable, &mut item.content, value)
        } else if let Some(annex) = self.annexes.get_mut(id) {
            replace_if(annex.editable, &mut annex.content, value)
        } else {
            EditOutcome::NotFound
        };
        log_edit("content", id, outcome);
        outcome
    }

    /// Look up any node by id
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        for section in &self.sections {
            if section.id == id {
                return Some(NodeRef::Section(section));
            }
            for subsection in &section.subsections {
                if subsection.id == id {
                    return Some(NodeRef::Subsection(subsection));
                }
                if let Some(item) = subsection.items.iter().find(|item| item.id == id) {
                    return Some(NodeRef::Item(item));
                }
            }
        }
        self.annexes.get(id).map(NodeRef::Annex)
    }

    fn subsection_mut(&mut self, id: NodeId) -> Option<&mut Subsection> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.subsections.iter_mut())
            .find(|subsection| subsection.id == id)
    }

    fn item_mut(&mut self, id: NodeId) -> Option<&mut Item> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.subsections.iter_mut())
            .flat_map(|subsection| subsection.items.iter_mut())
            .find(|item| item.id == id)
    }

    /// Recompute every display number and annex letter from position
    fn renumber(&mut self) {
        for (position, section) in self.sections.iter_mut().enumerate() {
            section.renumber(position);
        }
        self.annexes.reletter();
    }

    // ============================================================
    // Interchange
    // ============================================================

    /// Load a document handed over by a host as JSON
    ///
    /// Numbers and letters in the input are ignored and recomputed; content
    /// is sanitized while deserializing.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut document: Document = serde_json::from_str(json)?;
        document.reseed_ids()?;
        document.roster.reseed_ids();
        document.qualifications.reseed_ids();
        document.renumber();
        Ok(document)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn reseed_ids(&mut self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for section in &self.sections {
            ids.push(section.id);
            for subsection in &section.subsections {
                ids.push(subsection.id);
                ids.extend(subsection.items.iter().map(|item| item.id));
            }
        }
        ids.extend(self.annexes.iter().map(|annex| annex.id));

        for id in ids {
            if !seen.insert(id) {
                return Err(ModelError::DuplicateId(id));
            }
            self.ids.bump_past(id);
        }
        Ok(())
    }
}

fn replace_if<T>(editable: bool, slot: &mut T, value: T) -> EditOutcome {
    if editable {
        *slot = value;
        EditOutcome::Applied
    } else {
        EditOutcome::Locked
    }
}

fn log_edit(field: &str, id: NodeId, outcome: EditOutcome) {
    match outcome {
        EditOutcome::Applied => tracing::debug!(%id, field, "edit applied"),
        EditOutcome::Locked => tracing::warn!(%id, field, "edit rejected: field is locked"),
        EditOutcome::NotFound => tracing::debug!(%id, field, "edit ignored: unknown node"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SubsectionKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn numbers(document: &Document) -> Vec<String> {
        document.sections().iter().map(|s| s.number.clone()).collect()
    }

    fn two_author_sections() -> Document {
        let mut document = Document::new("NPA 01-01/TEST/2025");
        let first = document.add_section();
        document.edit_title(first, "DISPOSIÇÕES PRELIMINARES");
        let second = document.add_section();
        document.edit_title(second, "DISPOSIÇÕES GERAIS");
        document.add_subsection(1);
        document.add_subsection(1);
        document
    }

    #[test]
    fn test_add_section_defaults() {
        let mut document = Document::new("x");
        let id = document.add_section();
        let section = &document.sections()[0];
        assert_eq!(section.id, id);
        assert_eq!(section.number, "1");
        assert!(section.title_editable);
        assert!(section.removable);
        assert!(section.subsections.is_empty());
    }

    #[test]
    fn test_removing_first_section_renumbers_cascade() {
        let mut document = two_author_sections();
        let first = document.sections()[0].id;

        assert_eq!(document.remove_section(first), EditOutcome::Applied);

        assert_eq!(document.sections().len(), 1);
        let remaining = &document.sections()[0];
        assert_eq!(remaining.number, "1");
        assert_eq!(remaining.title, "DISPOSIÇÕES GERAIS");
        let subs: Vec<_> = remaining.subsections.iter().map(|s| s.number.as_str()).collect();
        assert_eq!(subs, vec!["1.1", "1.2"]);
    }

    #[test]
    fn test_builtin_section_cannot_be_removed() {
        let mut document = Document::new("x");
        let id = document.add_builtin_section("DISPOSIÇÕES FINAIS");
        let before = document.clone();
        assert_eq!(document.remove_section(id), EditOutcome::Locked);
        assert_eq!(document, before);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut document = two_author_sections();
        let before = document.clone();

        assert_eq!(document.remove_section(NodeId(999)), EditOutcome::NotFound);
        assert_eq!(document.remove_subsection(1, NodeId(999)), EditOutcome::NotFound);
        assert_eq!(document.remove_subsection(7, NodeId(1)), EditOutcome::NotFound);
        assert_eq!(document.remove_item(1, 0, NodeId(999)), EditOutcome::NotFound);
        assert_eq!(document.remove_annex(NodeId(999)), EditOutcome::NotFound);
        assert_eq!(document.edit_title(NodeId(999), "x"), EditOutcome::NotFound);
        assert_eq!(document.add_subsection(42), None);
        assert_eq!(document.add_item(0, 42), None);

        assert_eq!(document, before);
    }

    #[test]
    fn test_out_of_range_adds_leave_id_counter_alone() {
        let mut document = two_author_sections();
        let before = document.clone();

        assert_eq!(
            document.add_builtin_subsection(9, "X", SafeMarkup::default()),
            None
        );
        assert_eq!(document.add_signature_block(9, "ASSINATURAS"), None);
        assert_eq!(document, before);

        let next = document.add_section();
        let mut reference = before.clone();
        assert_eq!(reference.add_section(), next);
    }

    #[test]
    fn test_items_numbered_under_subsection() {
        let mut document = Document::new("x");
        document.add_section();
        document.add_subsection(0);
        document.add_subsection(0);
        let a = document.add_item(0, 1).unwrap();
        document.add_item(0, 1).unwrap();
        document.add_item(0, 1).unwrap();

        let items: Vec<_> = document.sections()[0].subsections[1]
            .items
            .iter()
            .map(|i| i.number.clone())
            .collect();
        assert_eq!(items, vec!["1.2.1", "1.2.2", "1.2.3"]);

        assert_eq!(document.remove_item(0, 1, a), EditOutcome::Applied);
        let items: Vec<_> = document.sections()[0].subsections[1]
            .items
            .iter()
            .map(|i| i.number.clone())
            .collect();
        assert_eq!(items, vec!["1.2.1", "1.2.2"]);
    }

    #[test]
    fn test_locked_fields_reject_edits() {
        let mut document = Document::new("x");
        document.add_builtin_section("DISPOSIÇÕES FINAIS");
        let sub = document
            .add_builtin_subsection(0, "VIGÊNCIA", SafeMarkup::from_plain_text("texto"))
            .unwrap();
        let block = document.add_signature_block(0, "PROPOSIÇÃO").unwrap();
        let section = document.sections()[0].id;

        assert_eq!(document.edit_title(section, "outro"), EditOutcome::Locked);
        assert_eq!(document.edit_title(sub, "outro"), EditOutcome::Locked);
        assert_eq!(
            document.edit_content(sub, SafeMarkup::from_plain_text("novo")),
            EditOutcome::Applied
        );
        assert_eq!(
            document.edit_content(block, SafeMarkup::from_plain_text("x")),
            EditOutcome::Locked
        );
        assert_eq!(
            document.edit_content(section, SafeMarkup::from_plain_text("x")),
            EditOutcome::Locked
        );
        match document.node(sub) {
            Some(NodeRef::Subsection(s)) => assert_eq!(s.content.plain_text(), "novo"),
            other => panic!("unexpected node: {other:?}"),
        }
        match document.node(block) {
            Some(NodeRef::Subsection(s)) => assert_eq!(s.kind, SubsectionKind::SignatureBlock),
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_annex_edits_follow_flag() {
        let mut document = Document::new("x");
        let fixed = document.add_locked_annex("Tabela", AnnexKind::PersonnelRoster);
        let free = document.add_annex("Fluxograma", AnnexKind::Flowchart);
        assert_eq!(document.edit_title(fixed, "y"), EditOutcome::Locked);
        assert_eq!(document.edit_title(free, "Fluxo"), EditOutcome::Applied);
        assert_eq!(document.annexes().letters(), vec!["A", "B"]);
        assert_eq!(document.remove_annex(fixed), EditOutcome::Applied);
        assert_eq!(document.annexes().letters(), vec!["A"]);
    }

    #[test]
    fn test_json_interchange_recomputes_numbers() {
        let mut document = two_author_sections();
        document.add_annex("Fluxo", AnnexKind::Flowchart);
        let json = document.to_json().unwrap();
        let tampered = json.replace("\"number\": \"2.1\"", "\"number\": \"9.9\"");

        let mut loaded = Document::from_json(&tampered).unwrap();
        assert_eq!(loaded.sections()[1].subsections[0].number, "2.1");

        let fresh = loaded.add_section();
        assert_eq!(loaded.node(fresh).map(|_| ()), Some(()));
        assert!(document.node(fresh).is_none());
    }

    #[test]
    fn test_json_rejects_duplicate_ids() {
        let mut document = Document::new("x");
        document.add_section();
        document.add_section();
        let json = document.to_json().unwrap().replace("\"id\": 2", "\"id\": 1");
        assert!(matches!(
            Document::from_json(&json),
            Err(ModelError::DuplicateId(NodeId(1)))
        ));
    }

    #[derive(Debug, Clone)]
    enum Op {
        AddSection,
        RemoveSection(usize),
        AddSubsection(usize),
        RemoveSubsection(usize, usize),
        AddItem(usize, usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::AddSection),
            (0usize..6).prop_map(Op::RemoveSection),
            (0usize..6).prop_map(Op::AddSubsection),
            (0usize..6, 0usize..6).prop_map(|(a, b)| Op::RemoveSubsection(a, b)),
            (0usize..6, 0usize..6).prop_map(|(a, b)| Op::AddItem(a, b)),
        ]
    }

    fn apply(document: &mut Document, op: &Op) {
        match *op {
            Op::AddSection => {
                document.add_section();
            }
            Op::RemoveSection(pick) => {
                let id = document.sections().get(pick).map(|s| s.id).unwrap_or(NodeId(0));
                document.remove_section(id);
            }
            Op::AddSubsection(section) => {
                document.add_subsection(section);
            }
            Op::RemoveSubsection(section, pick) => {
                let id = document
                    .section(section)
                    .and_then(|s| s.subsections.get(pick))
                    .map(|s| s.id)
                    .unwrap_or(NodeId(0));
                document.remove_subsection(section, id);
            }
            Op::AddItem(section, sub) => {
                document.add_item(section, sub);
            }
        }
    }

    proptest! {
        #[test]
        fn numbering_is_always_positional(ops in prop::collection::vec(op(), 0..60)) {
            let mut document = Document::new("x");
            for op in &ops {
                apply(&mut document, op);

                let expected: Vec<String> =
                    (1..=document.sections().len()).map(|n| n.to_string()).collect();
                prop_assert_eq!(numbers(&document), expected);

                for section in document.sections() {
                    for (i, sub) in section.subsections.iter().enumerate() {
                        prop_assert_eq!(&sub.number, &format!("{}.{}", section.number, i + 1));
                        for (j, item) in sub.items.iter().enumerate() {
                            prop_assert_eq!(&item.number, &format!("{}.{}", sub.number, j + 1));
                        }
                    }
                }
            }
        }

        #[test]
        fn sections_keep_insertion_order(adds in 1usize..12, removals in prop::collection::vec(0usize..12, 0..6)) {
            let mut document = Document::new("x");
            let mut expected: Vec<NodeId> = (0..adds).map(|_| document.add_section()).collect();
            for pick in removals {
                if expected.is_empty() {
                    break;
                }
                let id = expected.remove(pick % expected.len());
                prop_assert_eq!(document.remove_section(id), EditOutcome::Applied);
            }
            let actual: Vec<NodeId> = document.sections().iter().map(|s| s.id).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
