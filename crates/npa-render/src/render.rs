//! Document -> PageSequence composition

use npa_model::{
    Annex, AnnexKind, Document, Item, OrgRole, Section, SignatureRole, Subsection,
};
use serde::{Deserialize, Serialize};

use crate::date::format_issue_date;
use crate::page::{
    Align, Block, Cell, CoverField, Heading, Letterhead, Page, PageKind, PageSequence,
    SignatureLine, Table, TocEntry,
};
use crate::pagination::{self, numbered_label, REFERENCES_LABEL};

pub const DOCUMENT_TYPE: &str = "NORMA PADRÃO DE AÇÃO";
pub const TOC_HEADING: &str = "SUMÁRIO";
pub const MATRIX_LEGEND: &str = "1 = Desejável, 0 = Não desejável";
pub const FLOWCHART_PLACEHOLDER: &str = "Espaço reservado para o Fluxograma Bizagi.";

/// Letterhead and asset choices that are not part of the document itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub organization: Vec<String>,
    pub document_type: String,
    /// Logo as a `data:image/...;base64,` URI
    pub logo: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            organization: vec![
                "COMANDO DA AERONÁUTICA".to_string(),
                "PARQUE DE MATERIAL AERONÁUTICO".to_string(),
                "DE LAGOA SANTA".to_string(),
            ],
            document_type: DOCUMENT_TYPE.to_string(),
            logo: None,
        }
    }
}

/// Render with the default letterhead
pub fn render(document: &Document) -> PageSequence {
    render_with(document, &RenderOptions::default())
}

/// Snapshot the document into its ordered pages
///
/// Pure: the same document and options always give an equal sequence.
pub fn render_with(document: &Document, options: &RenderOptions) -> PageSequence {
    let estimate = pagination::estimate(document);
    let toc = pagination::table_of_contents(document, &estimate);

    let mut pages = Vec::with_capacity(estimate.total as usize);
    pages.push(page(
        document,
        pagination::COVER_PAGE,
        estimate.total,
        PageKind::Cover,
        cover_blocks(document, options, toc),
    ));

    for (section, &number) in document.sections().iter().zip(&estimate.sections) {
        pages.push(page(
            document,
            number,
            estimate.total,
            PageKind::Section {
                number: section.number.clone(),
            },
            section_blocks(document, section),
        ));
    }

    pages.push(page(
        document,
        estimate.references,
        estimate.total,
        PageKind::References,
        references_blocks(document),
    ));

    for (annex, &number) in document.annexes().iter().zip(&estimate.annexes) {
        pages.push(page(
            document,
            number,
            estimate.total,
            PageKind::Annex {
                letter: annex.letter.clone(),
            },
            annex_blocks(document, annex),
        ));
    }

    tracing::debug!(
        document = %document.number,
        pages = pages.len(),
        "document rendered"
    );

    PageSequence {
        document_number: document.number.clone(),
        total_pages: estimate.total,
        pages,
    }
}

fn page(document: &Document, number: u32, total: u32, kind: PageKind, blocks: Vec<Block>) -> Page {
    Page {
        number,
        kind,
        header: pagination::running_header(&document.number, number, total),
        blocks,
    }
}

// ============================================================
// Cover
// ============================================================

fn cover_blocks(document: &Document, options: &RenderOptions, toc: Vec<TocEntry>) -> Vec<Block> {
    let annexes: Vec<String> = document.annexes().iter().map(Annex::listing).collect();
    let fields = vec![
        CoverField::single("Nº DO DOCUMENTO", document.number.clone()),
        CoverField::single("EXPEDIÇÃO", format_issue_date(document.issue_date)),
        CoverField::single("VALIDADE", document.validity.label()),
        CoverField::single("ASSUNTO", document.subject.clone()),
        CoverField {
            label: "ANEXOS".to_string(),
            lines: annexes,
        },
        CoverField::single("DISTRIBUIÇÃO", document.distribution.clone()),
    ];

    vec![
        Block::Letterhead(Letterhead {
            organization: options.organization.clone(),
            document_type: options.document_type.clone(),
            logo: options.logo.clone(),
        }),
        Block::CoverFields(fields),
        Block::Spacer,
        Block::Heading(Heading::bold(TOC_HEADING).centered()),
        Block::Toc(toc),
    ]
}

// ============================================================
// Body
// ============================================================

fn section_blocks(document: &Document, section: &Section) -> Vec<Block> {
    let mut blocks = vec![
        Block::Heading(Heading::bold(numbered_label(&section.number, &section.title))),
        Block::Spacer,
    ];
    for subsection in &section.subsections {
        subsection_blocks(document, subsection, &mut blocks);
        blocks.push(Block::Spacer);
    }
    blocks
}

fn subsection_blocks(document: &Document, subsection: &Subsection, blocks: &mut Vec<Block>) {
    let titled = !subsection.title.trim().is_empty();
    if titled {
        blocks.push(Block::Heading(
            Heading::bold(numbered_label(&subsection.number, &subsection.title)).underlined(),
        ));
        blocks.push(Block::Spacer);
    }

    if subsection.is_signature_block() {
        blocks.push(Block::Signatures(signature_lines(document)));
        return;
    }

    // Untitled subsections lead with their bold number; blank ones print nothing
    if !subsection.content.is_blank() {
        blocks.push(Block::Rich {
            lead: (!titled).then(|| subsection.number.clone()),
            markup: subsection.content.clone(),
            first_line_indent: false,
        });
    }

    for item in &subsection.items {
        item_blocks(item, blocks);
    }
}

fn item_blocks(item: &Item, blocks: &mut Vec<Block>) {
    if item.title.trim().is_empty() {
        blocks.push(Block::Rich {
            lead: Some(item.number.clone()),
            markup: item.content.clone(),
            first_line_indent: false,
        });
        return;
    }
    blocks.push(Block::Heading(Heading::bold(format!(
        "{} {}",
        item.number,
        item.title.trim()
    ))));
    if !item.content.is_blank() {
        blocks.push(Block::Rich {
            lead: None,
            markup: item.content.clone(),
            first_line_indent: false,
        });
    }
}

fn signature_lines(document: &Document) -> Vec<SignatureLine> {
    SignatureRole::ALL
        .iter()
        .map(|&role| {
            let signatory = document.signatures.get(role);
            SignatureLine {
                label: role.label().to_string(),
                name: signatory.name.to_uppercase(),
                title: signatory.title.clone(),
            }
        })
        .collect()
}

fn references_blocks(document: &Document) -> Vec<Block> {
    vec![
        Block::Heading(Heading::bold(REFERENCES_LABEL).centered()),
        Block::Spacer,
        Block::Rich {
            lead: None,
            markup: document.references.clone(),
            first_line_indent: true,
        },
    ]
}

// ============================================================
// Annexes
// ============================================================

pub fn annex_heading(annex: &Annex) -> String {
    format!("Anexo {} - {}", annex.letter, annex.title)
}

fn annex_blocks(document: &Document, annex: &Annex) -> Vec<Block> {
    let mut blocks = vec![
        Block::Heading(Heading::bold(annex_heading(annex)).centered()),
        Block::Spacer,
    ];
    match annex.kind {
        AnnexKind::PersonnelRoster => blocks.push(Block::Table(roster_table(document))),
        AnnexKind::QualificationMatrix => {
            blocks.push(Block::Table(matrix_table(document)));
            blocks.push(Block::Spacer);
            blocks.push(Block::Note {
                text: MATRIX_LEGEND.to_string(),
                align: Align::Left,
            });
        }
        AnnexKind::Flowchart if annex.content.is_blank() => blocks.push(Block::Note {
            text: FLOWCHART_PLACEHOLDER.to_string(),
            align: Align::Center,
        }),
        AnnexKind::Flowchart | AnnexKind::Custom => blocks.push(Block::Rich {
            lead: None,
            markup: annex.content.clone(),
            first_line_indent: false,
        }),
    }
    blocks
}

fn roster_table(document: &Document) -> Table {
    let header = vec![
        vec![
            Cell::header("Função").spanning_rows(2),
            Cell::header("Previsão Principal").spanning(3),
            Cell::header("Previsão Alternativa").spanning(3),
            Cell::header("Efetivo Proposto").spanning_rows(2),
        ],
        ["Posto/Grad", "Quadro", "Espec.", "Posto/Grad", "Quadro", "Espec."]
            .into_iter()
            .map(Cell::header)
            .collect(),
    ];

    let body = document
        .roster
        .rows()
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::text(row.function.clone())];
            for prediction in [&row.primary, &row.alternate] {
                for value in [&prediction.rank, &prediction.corps, &prediction.specialty] {
                    cells.push(Cell::text(value.clone()).aligned(Align::Center));
                }
            }
            cells.push(Cell::text(row.headcount.to_string()).aligned(Align::Center));
            cells
        })
        .collect();

    let total = Cell::header("TOTAL").spanning(7).aligned(Align::Right);
    let footer = vec![vec![
        total,
        Cell::header(document.roster.total_headcount().to_string()),
    ]];

    Table {
        columns: 8,
        header,
        body,
        footer,
    }
}

fn matrix_table(document: &Document) -> Table {
    let mut labels = vec!["Qualificação", "Sigla", "Legislação", "Prioridade"];
    labels.extend(OrgRole::ALL.iter().map(OrgRole::column_label));
    let header = vec![labels.into_iter().map(Cell::header).collect()];

    let body = document
        .qualifications
        .rows()
        .iter()
        .map(|row| {
            let mut cells = vec![
                Cell::text(row.qualification.clone()),
                Cell::text(row.acronym.clone()).aligned(Align::Center),
                Cell::text(row.legal_basis.clone()),
                Cell::text(row.priority.clone()).aligned(Align::Center),
            ];
            cells.extend(OrgRole::ALL.iter().map(|&role| {
                let flag = if row.desired.get(role) { "1" } else { "0" };
                Cell::text(flag).aligned(Align::Center)
            }));
            cells
        })
        .collect();

    Table {
        columns: 4 + OrgRole::ALL.len() as u16,
        header,
        body,
        footer: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npa_model::{template, SafeMarkup};
    use pretty_assertions::assert_eq;

    fn headings(page: &Page) -> Vec<String> {
        page.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading(heading) => Some(heading.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_page_order() {
        let sequence = render(&template::standard(None));
        let kinds: Vec<PageKind> = sequence.pages.iter().map(|p| p.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                PageKind::Cover,
                PageKind::Section { number: "1".into() },
                PageKind::Section { number: "2".into() },
                PageKind::Section { number: "3".into() },
                PageKind::References,
                PageKind::Annex { letter: "A".into() },
                PageKind::Annex { letter: "B".into() },
                PageKind::Annex { letter: "C".into() },
            ]
        );
        let numbers: Vec<u32> = sequence.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
        assert_eq!(sequence.total_pages, 8);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let document = template::standard(chrono::NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(render(&document), render(&document));
    }

    #[test]
    fn test_cover_fields() {
        let document = template::standard(chrono::NaiveDate::from_ymd_opt(2025, 8, 7));
        let sequence = render(&document);
        let cover = &sequence.pages[0];
        assert!(cover.header.is_none());

        let Some(Block::CoverFields(fields)) = cover.blocks.get(1) else {
            panic!("cover fields missing: {:?}", cover.blocks);
        };
        let field = |label: &str| {
            fields
                .iter()
                .find(|f| f.label == label)
                .map(|f| f.lines.clone())
                .unwrap_or_default()
        };
        assert_eq!(field("EXPEDIÇÃO"), vec!["07 AGO 2025"]);
        assert_eq!(field("VALIDADE"), vec!["2 ANOS"]);
        assert_eq!(
            field("ANEXOS"),
            vec![
                "A - Tabela Efetivo Proposto",
                "B - Matriz de Qualificação",
                "C - Fluxograma Bizagi",
            ]
        );
        assert_eq!(headings(cover), vec![TOC_HEADING.to_string()]);
    }

    #[test]
    fn test_section_page_layout() {
        let sequence = render(&template::standard(None));
        let first = sequence.page(2).unwrap();
        assert_eq!(
            headings(first),
            vec![
                "1 DISPOSIÇÕES PRELIMINARES",
                "1.1 FINALIDADE",
                "1.2 CONCEITUAÇÃO",
                "1.3 ÂMBITO",
                "1.4 DEFINIÇÕES",
                "1.5 RELACIONAMENTO",
            ]
        );
        // empty titled subsections print no content block
        let rich = first
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Rich { .. }))
            .count();
        assert_eq!(rich, 2);
    }

    #[test]
    fn test_signature_block_uses_kind() {
        let sequence = render(&template::standard(None));
        let finals = sequence.page(4).unwrap();
        let signatures = finals
            .blocks
            .iter()
            .find_map(|block| match block {
                Block::Signatures(lines) => Some(lines.clone()),
                _ => None,
            })
            .unwrap();
        let labels: Vec<&str> = signatures.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Proposto por:", "Visto por:", "Aprovado por:"]);
        assert_eq!(signatures[1].name, "JOSÉ ERASMO LEITE JUNIOR CEL INT");
    }

    #[test]
    fn test_title_match_is_not_a_signature_block() {
        let mut document = Document::new("x");
        document.add_section();
        let sub = document.add_subsection(0).unwrap();
        document.edit_title(sub, "PROPOSIÇÃO DE MELHORIAS");
        let sequence = render(&document);
        let body = sequence.page(2).unwrap();
        assert!(!body.blocks.iter().any(|b| matches!(b, Block::Signatures(_))));
    }

    #[test]
    fn test_untitled_subsection_leads_with_number() {
        let mut document = Document::new("x");
        document.add_section();
        let sub = document.add_subsection(0).unwrap();
        document.edit_content(sub, SafeMarkup::from_plain_text("Texto livre"));
        let sequence = render(&document);
        let lead = sequence.page(2).unwrap().blocks.iter().find_map(|b| match b {
            Block::Rich { lead, markup, .. } => Some((lead.clone(), markup.plain_text())),
            _ => None,
        });
        assert_eq!(lead, Some((Some("1.1".to_string()), "Texto livre".to_string())));
    }

    #[test]
    fn test_untitled_blank_subsection_prints_nothing() {
        let mut document = Document::new("x");
        document.add_section();
        document.add_subsection(0).unwrap();
        let sequence = render(&document);
        let body = sequence.page(2).unwrap();
        assert!(!body.blocks.iter().any(|b| matches!(b, Block::Rich { .. })));
    }

    #[test]
    fn test_roster_annex_table() {
        let sequence = render(&template::standard(None));
        let annex = sequence.page(6).unwrap();
        assert_eq!(headings(annex), vec!["Anexo A - Tabela Efetivo Proposto"]);
        let table = annex
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.columns, 8);
        assert_eq!(table.header.len(), 2);
        assert_eq!(table.body.len(), 3);
        let footer = &table.footer[0];
        assert_eq!(footer[0].text, "TOTAL");
        assert_eq!(footer[0].span, 7);
        assert_eq!(footer[1].text, "3");
        for row in &table.body {
            assert_eq!(row.iter().map(|c| c.span).sum::<u16>(), 8);
        }
    }

    #[test]
    fn test_matrix_flags_and_legend() {
        let mut document = template::standard(None);
        let id = document.qualifications.add_row();
        if let Some(row) = document.qualifications.row_mut(id) {
            row.qualification = "Curso de Auditoria".to_string();
            row.desired.set(OrgRole::Chief, true);
        }
        let sequence = render(&document);
        let annex = sequence.page(7).unwrap();
        let table = annex
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t.clone()),
                _ => None,
            })
            .unwrap();
        let flags: Vec<&str> = table.body[0][4..].iter().map(|c| c.text.as_str()).collect();
        assert_eq!(flags, vec!["1", "0", "0"]);
        assert!(annex.blocks.iter().any(
            |b| matches!(b, Block::Note { text, .. } if text == MATRIX_LEGEND)
        ));
    }

    #[test]
    fn test_empty_flowchart_placeholder() {
        let sequence = render(&template::standard(None));
        let annex = sequence.page(8).unwrap();
        assert!(annex.blocks.iter().any(
            |b| matches!(b, Block::Note { text, .. } if text == FLOWCHART_PLACEHOLDER)
        ));
    }

    #[test]
    fn test_flowchart_content_is_verbatim() {
        let mut document = template::standard(None);
        let flowchart = document.annexes().iter().nth(2).map(|a| a.id).unwrap();
        let markup = SafeMarkup::sanitize(r#"<p><img src="data:image/png;base64,AAAA"></p>"#);
        document.edit_content(flowchart, markup.clone());
        let sequence = render(&document);
        let annex = sequence.page(8).unwrap();
        assert!(annex
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Rich { markup: m, .. } if *m == markup)));
    }
}
