//! Qualification matrix (Anexo "Matriz de Qualificação")

use serde::{Deserialize, Serialize};

use crate::id::{IdAllocator, NodeId};

/// Organizational roles with a column in the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
    Chief,
    Supervisor,
    Assistant,
}

impl OrgRole {
    pub const ALL: [OrgRole; 3] = [OrgRole::Chief, OrgRole::Supervisor, OrgRole::Assistant];

    /// Column heading used in the printed table
    pub fn column_label(&self) -> &'static str {
        match self {
            OrgRole::Chief => "SETOR-CH",
            OrgRole::Supervisor => "SETOR-ENC",
            OrgRole::Assistant => "SETOR-AUX",
        }
    }
}

/// Whether the qualification is desired for each role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleFlags {
    #[serde(default)]
    pub chief: bool,
    #[serde(default)]
    pub supervisor: bool,
    #[serde(default)]
    pub assistant: bool,
}

impl RoleFlags {
    pub fn get(&self, role: OrgRole) -> bool {
        match role {
            OrgRole::Chief => self.chief,
            OrgRole::Supervisor => self.supervisor,
            OrgRole::Assistant => self.assistant,
        }
    }

    pub fn set(&mut self, role: OrgRole, desired: bool) {
        match role {
            OrgRole::Chief => self.chief = desired,
            OrgRole::Supervisor => self.supervisor = desired,
            OrgRole::Assistant => self.assistant = desired,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationRow {
    pub id: NodeId,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub acronym: String,
    #[serde(default)]
    pub legal_basis: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub desired: RoleFlags,
}

impl QualificationRow {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            qualification: String::new(),
            acronym: String::new(),
            legal_basis: String::new(),
            priority: String::new(),
            desired: RoleFlags::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationMatrix {
    rows: Vec<QualificationRow>,
    #[serde(skip)]
    ids: IdAllocator,
}

impl QualificationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty row (all flags "not desired")
    pub fn add_row(&mut self) -> NodeId {
        let id = self.ids.next_id();
        self.rows.push(QualificationRow::new(id));
        id
    }

    pub fn remove_row(&mut self, id: NodeId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        before != self.rows.len()
    }

    pub fn row_mut(&mut self, id: NodeId) -> Option<&mut QualificationRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    pub fn rows(&self) -> &[QualificationRow] {
        &self.rows
    }

    pub(crate) fn reseed_ids(&mut self) {
        for row in &self.rows {
            self.ids.bump_past(row.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rows_desire_nothing() {
        let mut matrix = QualificationMatrix::new();
        let id = matrix.add_row();
        let row = matrix.row_mut(id).unwrap();
        assert!(OrgRole::ALL.iter().all(|role| !row.desired.get(*role)));
    }

    #[test]
    fn test_flags_round_trip_per_role() {
        let mut flags = RoleFlags::default();
        flags.set(OrgRole::Supervisor, true);
        assert!(!flags.get(OrgRole::Chief));
        assert!(flags.get(OrgRole::Supervisor));
        assert!(!flags.get(OrgRole::Assistant));
    }

    #[test]
    fn test_remove_row() {
        let mut matrix = QualificationMatrix::new();
        let a = matrix.add_row();
        let b = matrix.add_row();
        assert!(matrix.remove_row(a));
        assert!(!matrix.remove_row(a));
        assert_eq!(matrix.rows().len(), 1);
        assert_eq!(matrix.rows()[0].id, b);
    }
}
