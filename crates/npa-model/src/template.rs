//! The standard NPA template a new document starts from

use chrono::NaiveDate;

use crate::annex::AnnexKind;
use crate::document::{Document, Validity};
use crate::markup::SafeMarkup;
use crate::qualification::OrgRole;
use crate::signature::{Signatory, Signatures};

const REFERENCES: &str = "BRASIL. Comando da Aeronáutica. Diretoria de Material Aeronáutico e Bélico. \
Portaria DIRMAB n° 118/PLON, de 18 de dezembro de 2023. Aprova a reedição do Regimento Interno do \
Parque de Material Aeronáutico de Lagoa Santa = RICA 21-87. Boletim do Comando da Aeronáutica, \
Rio de Janeiro, RJ, n. 233, de 21 dez 2023.\n\n\
BRASIL. Comando da Aeronáutica. Comando-Geral do Pessoal. Portaria COMGEP n° 836/DLE, de 1º d \
maio de 2019. Aprova a edição da Norma de Sistema que dispõe sobre Correspondência e Atos Oficiais \
do Comando da Aeronáutica = NSCA 10-2. Boletim do Comando da Aeronáutica, Rio de Janeiro, RJ, \
n. 72, 02 mai 2019.";

/// Build the standard document: three fixed sections, three annexes,
/// default signatories and a three-row roster
pub fn standard(issue_date: Option<NaiveDate>) -> Document {
    let mut document = Document::new("NPA XX-XX/SETOR/2025");
    document.issue_date = issue_date;
    document.validity = Validity::TwoYears;
    document.subject = "Seção XXX (XXXX)".to_string();
    document.distribution = "B".to_string();
    document.references = SafeMarkup::from_plain_text(REFERENCES);

    document.add_locked_annex("Tabela Efetivo Proposto", AnnexKind::PersonnelRoster);
    document.add_locked_annex("Matriz de Qualificação", AnnexKind::QualificationMatrix);
    document.add_annex("Fluxograma Bizagi", AnnexKind::Flowchart);

    preliminary_provisions(&mut document);
    general_provisions(&mut document);
    final_provisions(&mut document);

    document.signatures = Signatures {
        proposed_by: Signatory::new("FULANO DE TAL Ten Cel Int", "Chefe da ou do XXXX (XXX)"),
        reviewed_by: Signatory::new(
            "JOSÉ ERASMO LEITE JUNIOR Cel Int",
            "Agente de Controle Interno",
        ),
        approved_by: Signatory::new("CLAUDOMIRO FELTRAN JUNIOR Cel Av", "Diretor do PAMALS"),
    };

    for (role, name) in [
        (OrgRole::Chief, "Chefe"),
        (OrgRole::Supervisor, "Encarregado"),
        (OrgRole::Assistant, "Auxiliar"),
    ] {
        let id = document
            .roster
            .add_row(format!("{} ({name})", role.column_label()));
        if let Some(row) = document.roster.row_mut(id) {
            row.headcount = 1;
        }
    }

    tracing::debug!(
        sections = document.sections().len(),
        annexes = document.annexes().len(),
        "standard template built"
    );
    document
}

fn text(content: &str) -> SafeMarkup {
    SafeMarkup::from_plain_text(content)
}

fn preliminary_provisions(document: &mut Document) {
    let index = document.sections().len();
    document.add_builtin_section("DISPOSIÇÕES PRELIMINARES");
    for (title, content) in [
        (
            "FINALIDADE",
            "A presente Norma Padrão de Ação (NPA) destina-se XXXXX",
        ),
        ("CONCEITUAÇÃO", ""),
        (
            "ÂMBITO",
            "Esta NPA, de observância obrigatória, aplica-se à XXX do PAMALS.",
        ),
        ("DEFINIÇÕES", ""),
        ("RELACIONAMENTO", ""),
    ] {
        document.add_builtin_subsection(index, title, text(content));
    }
}

fn general_provisions(document: &mut Document) {
    let index = document.sections().len();
    document.add_builtin_section("DISPOSIÇÕES GERAIS");
    for title in ["RESPONSABILIDADES", "COMPOSIÇÃO"] {
        document.add_builtin_subsection(index, title, SafeMarkup::empty());
    }
}

fn final_provisions(document: &mut Document) {
    let index = document.sections().len();
    document.add_builtin_section("DISPOSIÇÕES FINAIS");
    document.add_builtin_subsection(
        index,
        "VIGÊNCIA",
        text(
            "A presente NPA entrará em vigor a contar da data de publicação no Boletim Interno \
             Ostensivo do GAP-LS, revogando a NPA XX-XX efetivada em XXXXXX",
        ),
    );
    document.add_builtin_subsection(
        index,
        "ATUALIZAÇÃO",
        text(
            "Esta NPA deverá ser atualizada pela XX, quando necessário, para incluir novas \
             atividades que venham a ser delegadas à XX ou excluir aquelas que venham a ser \
             extintas ou transferidas para outros setores.",
        ),
    );
    if let Some(id) = document.add_builtin_subsection(
        index,
        "CASOS NÃO PREVISTOS",
        text("Os casos não previstos serão resolvidos pelo Sr. Diretor do PAMALS."),
    ) {
        document.lock_content(id);
    }
    document.add_signature_block(index, "PROPOSIÇÃO, VISTO E APROVAÇÃO");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{EditOutcome, NodeRef};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_outline() {
        let document = standard(None);
        let outline: Vec<(String, String)> = document
            .sections()
            .iter()
            .map(|s| (s.number.clone(), s.title.clone()))
            .collect();
        assert_eq!(
            outline,
            vec![
                ("1".to_string(), "DISPOSIÇÕES PRELIMINARES".to_string()),
                ("2".to_string(), "DISPOSIÇÕES GERAIS".to_string()),
                ("3".to_string(), "DISPOSIÇÕES FINAIS".to_string()),
            ]
        );
        let finals: Vec<&str> = document.sections()[2]
            .subsections
            .iter()
            .map(|s| s.number.as_str())
            .collect();
        assert_eq!(finals, vec!["3.1", "3.2", "3.3", "3.4"]);
        assert!(document.sections()[2].subsections[3].is_signature_block());
    }

    #[test]
    fn test_standard_annexes_and_roster() {
        let document = standard(None);
        let listing: Vec<String> = document.annexes().iter().map(|a| a.listing()).collect();
        assert_eq!(
            listing,
            vec![
                "A - Tabela Efetivo Proposto",
                "B - Matriz de Qualificação",
                "C - Fluxograma Bizagi",
            ]
        );
        assert_eq!(document.roster.total_headcount(), 3);
        assert_eq!(document.roster.rows()[1].function, "SETOR-ENC (Encarregado)");
        assert!(document.qualifications.rows().is_empty());
    }

    #[test]
    fn test_template_sections_are_fixed() {
        let mut document = standard(None);
        let first = document.sections()[0].id;
        assert_eq!(document.remove_section(first), EditOutcome::Locked);
        assert_eq!(document.edit_title(first, "X"), EditOutcome::Locked);

        let unforeseen = document.sections()[2].subsections[2].id;
        assert_eq!(
            document.edit_content(unforeseen, SafeMarkup::from_plain_text("x")),
            EditOutcome::Locked
        );
        let scope = document.sections()[0].subsections[2].id;
        assert_eq!(
            document.edit_content(scope, SafeMarkup::from_plain_text("Aplica-se ao GAP.")),
            EditOutcome::Applied
        );
        assert!(matches!(document.node(scope), Some(NodeRef::Subsection(_))));
    }

    #[test]
    fn test_references_are_two_paragraphs() {
        let document = standard(None);
        let text = document.references.plain_text();
        assert_eq!(text.matches("BRASIL.").count(), 2);
        assert!(text.contains("Portaria DIRMAB n° 118/PLON, de 18 de dezembro de 2023"));
        assert!(text.contains("RICA 21-87. Boletim do Comando da Aeronáutica"));
        assert!(text.contains("Portaria COMGEP n° 836/DLE, de 1º d maio de 2019"));
        assert!(text.contains("NSCA 10-2. Boletim do Comando da Aeronáutica"));
        assert!(text.ends_with("n. 72, 02 mai 2019."));
    }
}
