//! Document model for Normas Padrão de Ação (NPA)
//!
//! An NPA is a fixed-layout administrative directive: cover data, numbered
//! sections with subsections and items, lettered annexes, two tables and
//! three signatories. This crate owns that tree and every structural edit
//! on it. Rendering lives in `npa-render`, file output in `npa-export`.
//!
//! # Example
//!
//! ```
//! use npa_model::{template, EditOutcome};
//!
//! let mut document = template::standard(None);
//! let id = document.add_section();
//! assert_eq!(document.sections()[3].number, "4");
//! assert_eq!(document.edit_title(id, "ANEXOS"), EditOutcome::Applied);
//! ```

pub mod annex;
pub mod document;
pub mod error;
pub mod id;
pub mod markup;
pub mod qualification;
pub mod roster;
pub mod section;
pub mod signature;
pub mod template;

pub use annex::{letter_for, Annex, AnnexKind, AnnexList};
pub use document::{Document, EditOutcome, NodeRef, Validity};
pub use error::{ModelError, Result};
pub use id::{IdAllocator, NodeId};
pub use markup::{MarkupNode, MarkupToken, SafeMarkup};
pub use qualification::{OrgRole, QualificationMatrix, QualificationRow, RoleFlags};
pub use roster::{PersonnelRoster, Prediction, RosterRow};
pub use section::{Item, Section, Subsection, SubsectionKind};
pub use signature::{Signatory, SignatureRole, Signatures};
