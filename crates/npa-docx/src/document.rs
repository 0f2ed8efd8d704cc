//! `word/document.xml`: the page sequence as one section of body content

use npa_render::{
    Align, Block, Heading, Letterhead, Page, PageSequence, SignatureLine, Table, TocEntry,
};

use crate::body::{write_paragraph, Inline, Paragraph, RunContext, RunStyle, TabStop};
use crate::error::Result;
use crate::media::Media;
use crate::parts::{Geometry, HEADER_EVEN_ID, HEADER_FIRST_ID, HEADER_ODD_ID, NS_R, NS_W, NS_WP};
use crate::rich::{self, RichLayout};
use crate::table::{cover_table, write_table};
use crate::xml::XmlWriter;

/// 1.25 cm
const FIRST_LINE_INDENT: u32 = 709;
const TOC_INDENT: u32 = 283;
const SIGNATURE_RULE: &str = "_____________________________________";

/// Body content before serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyElement {
    Paragraph(Paragraph),
    Table(Table),
}

/// Convert every page, embedding images into `media`
///
/// Each page after the first starts on a new sheet.
pub fn body_elements(
    sequence: &PageSequence,
    geometry: &Geometry,
    media: &mut Media,
) -> Result<Vec<BodyElement>> {
    let mut elements = Vec::new();
    for (index, page) in sequence.pages.iter().enumerate() {
        let start = elements.len();
        page_elements(page, geometry, media, &mut elements)?;
        if index > 0 {
            break_before(&mut elements, start);
        }
    }
    Ok(elements)
}

fn break_before(elements: &mut Vec<BodyElement>, start: usize) {
    match elements.get_mut(start) {
        Some(BodyElement::Paragraph(paragraph)) => paragraph.page_break_before = true,
        _ => {
            let mut paragraph = Paragraph::new();
            paragraph.page_break_before = true;
            elements.insert(start, BodyElement::Paragraph(paragraph));
        }
    }
}

fn page_elements(
    page: &Page,
    geometry: &Geometry,
    media: &mut Media,
    out: &mut Vec<BodyElement>,
) -> Result<()> {
    for block in &page.blocks {
        match block {
            Block::Letterhead(letterhead) => letterhead_paragraphs(letterhead, media, out)?,
            Block::CoverFields(fields) => out.push(BodyElement::Table(cover_table(fields))),
            Block::Heading(heading) => out.push(BodyElement::Paragraph(heading_paragraph(heading))),
            Block::Toc(entries) => {
                for entry in entries {
                    out.push(BodyElement::Paragraph(toc_paragraph(entry, geometry)));
                }
            }
            Block::Rich {
                lead,
                markup,
                first_line_indent,
            } => {
                let layout = RichLayout {
                    first_line_indent: if *first_line_indent { FIRST_LINE_INDENT } else { 0 },
                };
                for paragraph in rich::paragraphs(markup, lead.as_deref(), layout, media)? {
                    out.push(BodyElement::Paragraph(paragraph));
                }
            }
            Block::Signatures(lines) => {
                for line in lines {
                    signature_paragraphs(line, out);
                }
            }
            Block::Table(table) => out.push(BodyElement::Table(table.clone())),
            Block::Note { text, align } => {
                let style = RunStyle {
                    italic: true,
                    ..RunStyle::default()
                };
                out.push(BodyElement::Paragraph(
                    Paragraph::new().aligned(*align).with_text(text.as_str(), style),
                ));
            }
            Block::Spacer => out.push(BodyElement::Paragraph(Paragraph::new())),
        }
    }
    Ok(())
}

fn letterhead_paragraphs(
    letterhead: &Letterhead,
    media: &mut Media,
    out: &mut Vec<BodyElement>,
) -> Result<()> {
    if let Some(logo) = &letterhead.logo {
        if let Some(index) = media.embed(logo)? {
            let mut paragraph = Paragraph::new().aligned(Align::Center);
            paragraph.inlines.push(Inline::Image(index));
            out.push(BodyElement::Paragraph(paragraph));
        }
    }

    let mut organization = Paragraph::new().aligned(Align::Center);
    for (index, line) in letterhead.organization.iter().enumerate() {
        if index > 0 {
            organization.inlines.push(Inline::Break);
        }
        organization.push_text(line.as_str(), RunStyle::bold());
    }
    out.push(BodyElement::Paragraph(organization));
    out.push(BodyElement::Paragraph(Paragraph::new()));

    let title = RunStyle {
        bold: true,
        size: Some(28),
        ..RunStyle::default()
    };
    out.push(BodyElement::Paragraph(
        Paragraph::new()
            .aligned(Align::Center)
            .with_text(letterhead.document_type.as_str(), title),
    ));
    out.push(BodyElement::Paragraph(Paragraph::new()));
    Ok(())
}

fn heading_paragraph(heading: &Heading) -> Paragraph {
    let style = RunStyle {
        bold: heading.bold,
        underline: heading.underline,
        ..RunStyle::default()
    };
    let mut paragraph = Paragraph::new()
        .aligned(heading.align)
        .with_text(heading.text.as_str(), style);
    paragraph.keep_next = true;
    paragraph.space_after = Some(240);
    paragraph
}

fn toc_paragraph(entry: &TocEntry, geometry: &Geometry) -> Paragraph {
    let style = RunStyle {
        bold: entry.level.bold(),
        underline: entry.level.underline(),
        ..RunStyle::default()
    };
    let mut paragraph = Paragraph::new().with_text(entry.label.as_str(), style);
    paragraph.tab = Some(TabStop {
        position: geometry.content_width(),
        dotted: true,
    });
    if entry.level.indented() {
        paragraph.indent_left = TOC_INDENT;
    }
    paragraph.inlines.push(Inline::Tab);
    paragraph.push_text(entry.page.to_string(), RunStyle::default());
    paragraph
}

fn signature_paragraphs(line: &SignatureLine, out: &mut Vec<BodyElement>) {
    let mut label = Paragraph::new().with_text(line.label.as_str(), RunStyle::default());
    label.keep_next = true;
    out.push(BodyElement::Paragraph(label));

    let mut gap = Paragraph::new();
    gap.keep_next = true;
    out.push(BodyElement::Paragraph(gap));

    let mut block = Paragraph::new()
        .aligned(Align::Center)
        .with_text(SIGNATURE_RULE, RunStyle::default());
    block.inlines.push(Inline::Break);
    block.push_text(line.name.as_str(), RunStyle::bold());
    block.inlines.push(Inline::Break);
    block.push_text(line.title.as_str(), RunStyle::default());
    block.space_after = Some(480);
    out.push(BodyElement::Paragraph(block));
}

/// Serialize the body and the closing section properties
pub fn document_xml(elements: &[BodyElement], geometry: &Geometry, media: &Media) -> Result<Vec<u8>> {
    let mut context = RunContext::new(media, geometry.max_image());
    let mut xml = XmlWriter::new()?;
    xml.start(
        "w:document",
        &[("xmlns:w", NS_W), ("xmlns:r", NS_R), ("xmlns:wp", NS_WP)],
    )?;
    xml.start("w:body", &[])?;

    for element in elements {
        match element {
            BodyElement::Paragraph(paragraph) => write_paragraph(&mut xml, paragraph, &mut context)?,
            BodyElement::Table(table) => {
                write_table(&mut xml, table, geometry.content_width(), &mut context)?;
                // keeps consecutive tables from merging
                write_paragraph(&mut xml, &Paragraph::new(), &mut context)?;
            }
        }
    }

    write_section_properties(&mut xml, geometry)?;
    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

fn write_section_properties(xml: &mut XmlWriter, geometry: &Geometry) -> Result<()> {
    xml.start("w:sectPr", &[])?;
    for (kind, id) in [
        ("default", HEADER_ODD_ID),
        ("even", HEADER_EVEN_ID),
        ("first", HEADER_FIRST_ID),
    ] {
        xml.empty("w:headerReference", &[("w:type", kind), ("r:id", id)])?;
    }
    xml.empty(
        "w:pgSz",
        &[
            ("w:w", geometry.page_width.to_string().as_str()),
            ("w:h", geometry.page_height.to_string().as_str()),
        ],
    )?;
    let [top, right, bottom, left] = geometry.margins;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", top.to_string().as_str()),
            ("w:right", right.to_string().as_str()),
            ("w:bottom", bottom.to_string().as_str()),
            ("w:left", left.to_string().as_str()),
            ("w:header", "709"),
            ("w:footer", "709"),
            ("w:gutter", "0"),
        ],
    )?;
    // the cover page uses the empty first-page header
    xml.empty("w:titlePg", &[])?;
    xml.end("w:sectPr")
}
