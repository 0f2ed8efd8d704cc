//! The three fixed signatories

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatory {
    pub name: String,
    pub title: String,
}

impl Signatory {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureRole {
    ProposedBy,
    ReviewedBy,
    ApprovedBy,
}

impl SignatureRole {
    /// Print order
    pub const ALL: [SignatureRole; 3] = [
        SignatureRole::ProposedBy,
        SignatureRole::ReviewedBy,
        SignatureRole::ApprovedBy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SignatureRole::ProposedBy => "Proposto por:",
            SignatureRole::ReviewedBy => "Visto por:",
            SignatureRole::ApprovedBy => "Aprovado por:",
        }
    }
}

/// Exactly three roles; entries can be edited but never added or removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatures {
    pub proposed_by: Signatory,
    pub reviewed_by: Signatory,
    pub approved_by: Signatory,
}

impl Signatures {
    pub fn get(&self, role: SignatureRole) -> &Signatory {
        match role {
            SignatureRole::ProposedBy => &self.proposed_by,
            SignatureRole::ReviewedBy => &self.reviewed_by,
            SignatureRole::ApprovedBy => &self.approved_by,
        }
    }

    pub fn get_mut(&mut self, role: SignatureRole) -> &mut Signatory {
        match role {
            SignatureRole::ProposedBy => &mut self.proposed_by,
            SignatureRole::ReviewedBy => &mut self.reviewed_by,
            SignatureRole::ApprovedBy => &mut self.approved_by,
        }
    }

    /// Signatories in print order
    pub fn in_order(&self) -> impl Iterator<Item = (SignatureRole, &Signatory)> {
        SignatureRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}
