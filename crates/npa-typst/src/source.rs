//! PageSequence -> Typst source
//!
//! Every logical page becomes one `#page(...)[...]` call so the printed page
//! numbers stay aligned with the estimate. All document text goes through
//! string literals; nothing from the document is ever parsed as markup.

use std::collections::HashMap;

use npa_render::{
    Align, Block, Cell, CoverField, EmbeddedImage, Heading, Letterhead, Page, PageSequence,
    RunningHeader, SignatureLine, Table, TocEntry,
};

use crate::error::{Result, TypstError};
use crate::markup;
use crate::world::EmbeddedFonts;

/// Page and font settings for the PDF
#[derive(Debug, Clone, PartialEq)]
pub struct TypstOptions {
    /// Falls back to Libertinus Serif when not embedded
    pub font: String,
    pub font_size_pt: f32,
    /// Top, right, bottom, left, in centimetres
    pub margins_cm: [f32; 4],
}

impl Default for TypstOptions {
    fn default() -> Self {
        Self {
            font: "Libertinus Serif".to_string(),
            font_size_pt: 12.0,
            margins_cm: [2.5, 2.0, 2.0, 3.0],
        }
    }
}

/// Generated `main.typ` plus the files it references
#[derive(Debug)]
pub struct TypstSource {
    pub text: String,
    pub assets: Vec<(String, Vec<u8>)>,
}

/// Images decoded from data URIs, mounted under `/assets`
#[derive(Debug, Default)]
pub struct Assets {
    files: Vec<(String, Vec<u8>)>,
    by_uri: HashMap<String, String>,
}

impl Assets {
    /// Decode a data URI and return the virtual path it is mounted at
    pub fn embed(&mut self, uri: &str) -> Result<String> {
        if let Some(path) = self.by_uri.get(uri) {
            return Ok(path.clone());
        }
        let name = format!("img-{}", self.files.len() + 1);
        let image = EmbeddedImage::from_data_uri(uri)
            .map_err(|e| TypstError::Asset(name.clone(), e.to_string()))?;
        let path = format!("/assets/{}.{}", name, image.format.extension());
        self.files.push((path.clone(), image.bytes));
        self.by_uri.insert(uri.to_string(), path.clone());
        Ok(path)
    }

    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    fn into_files(self) -> Vec<(String, Vec<u8>)> {
        self.files
    }
}

/// Typst string literal for arbitrary text
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn generate(sequence: &PageSequence, options: &TypstOptions) -> Result<TypstSource> {
    let mut assets = Assets::default();
    let mut text = preamble(options);

    for page in &sequence.pages {
        write_page(page, &mut assets, &mut text)?;
    }

    tracing::debug!(
        pages = sequence.pages.len(),
        assets = assets.files().len(),
        bytes = text.len(),
        "typst source generated"
    );

    Ok(TypstSource {
        text,
        assets: assets.into_files(),
    })
}

fn preamble(options: &TypstOptions) -> String {
    let [top, right, bottom, left] = options.margins_cm;
    format!(
        "#set page(paper: \"a4\", margin: (top: {top}cm, right: {right}cm, bottom: {bottom}cm, left: {left}cm))\n\
         #set text(font: {font}, size: {size}pt, lang: \"pt\")\n\
         #set par(justify: true)\n\
         #set table(stroke: 0.5pt + black, inset: 4pt)\n\n",
        font = font_array(&EmbeddedFonts::shared().family_chain(&options.font)),
        size = options.font_size_pt,
    )
}

/// Typst array literal; a lone element keeps its trailing comma
fn font_array(families: &[String]) -> String {
    let items: Vec<String> = families.iter().map(|f| string_literal(f)).collect();
    format!("({},)", items.join(", "))
}

fn write_page(page: &Page, assets: &mut Assets, out: &mut String) -> Result<()> {
    out.push_str(&format!("// page {}\n", page.number));
    out.push_str("#page(header: ");
    out.push_str(&header(page.header.as_ref()));
    out.push_str(")[\n");
    for block in &page.blocks {
        write_block(block, assets, out)?;
        out.push('\n');
    }
    out.push_str("];\n\n");
    Ok(())
}

fn header(header: Option<&RunningHeader>) -> String {
    let Some(header) = header else {
        return "none".to_string();
    };
    format!(
        "grid(columns: (1fr, 1fr), align(left, text(size: 10pt, {})), align(right, text(size: 10pt, {})))",
        string_literal(&header.left),
        string_literal(&header.right),
    )
}

fn write_block(block: &Block, assets: &mut Assets, out: &mut String) -> Result<()> {
    match block {
        Block::Letterhead(letterhead) => letterhead_block(letterhead, assets, out)?,
        Block::CoverFields(fields) => cover_fields(fields, out),
        Block::Heading(heading) => {
            out.push('#');
            out.push_str(&heading_expr(heading));
            out.push(';');
        }
        Block::Toc(entries) => {
            for entry in entries {
                toc_row(entry, out);
            }
        }
        Block::Rich {
            lead,
            markup,
            first_line_indent,
        } => {
            out.push_str("#block(width: 100%)[");
            if *first_line_indent {
                out.push_str("#h(1.25cm);");
            }
            if let Some(lead) = lead {
                out.push_str("#strong(");
                out.push_str(&string_literal(lead));
                out.push_str(");#\" \";");
            }
            out.push_str(&markup::to_typst(markup, assets)?);
            out.push_str("];");
        }
        Block::Signatures(lines) => {
            for line in lines {
                signature(line, out);
            }
        }
        Block::Table(table) => table_block(table, out),
        Block::Note { text, align } => {
            out.push_str(&format!(
                "#align({}, emph({}));",
                align_name(*align),
                string_literal(text)
            ));
        }
        Block::Spacer => out.push_str("#v(1em);"),
    }
    Ok(())
}

fn align_name(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
    }
}

fn heading_expr(heading: &Heading) -> String {
    let mut expr = string_literal(&heading.text);
    if heading.underline {
        expr = format!("underline({expr})");
    }
    if heading.bold {
        expr = format!("strong({expr})");
    }
    format!("align({}, {expr})", align_name(heading.align))
}

fn letterhead_block(letterhead: &Letterhead, assets: &mut Assets, out: &mut String) -> Result<()> {
    let mut items = Vec::new();
    if let Some(logo) = &letterhead.logo {
        let path = assets.embed(logo)?;
        items.push(format!("image({}, height: 2.5cm)", string_literal(&path)));
    }
    for line in &letterhead.organization {
        items.push(format!("strong({})", string_literal(line)));
    }
    items.push("v(0.5cm)".to_string());
    items.push(format!(
        "text(size: 14pt, strong({}))",
        string_literal(&letterhead.document_type)
    ));
    out.push_str(&format!(
        "#align(center, stack(spacing: 4pt, {}));#v(1cm);",
        items.join(", ")
    ));
    Ok(())
}

fn cover_fields(fields: &[CoverField], out: &mut String) {
    out.push_str("#table(columns: (4.5cm, 1fr), inset: 6pt");
    for field in fields {
        out.push_str(&format!(
            ", table.cell(fill: luma(230), align: center + horizon, strong({}))",
            string_literal(&field.label)
        ));
        let lines: Vec<String> = field.lines.iter().map(|line| string_literal(line)).collect();
        out.push_str(&format!(", [{}]", join_lines(&lines)));
    }
    out.push_str(");");
}

fn join_lines(literals: &[String]) -> String {
    literals
        .iter()
        .map(|literal| format!("#{literal};"))
        .collect::<Vec<_>>()
        .join("#linebreak();")
}

fn toc_row(entry: &TocEntry, out: &mut String) {
    let mut label = string_literal(&entry.label);
    if entry.level.underline() {
        label = format!("underline({label})");
    }
    if entry.level.bold() {
        label = format!("strong({label})");
    }
    let indent = if entry.level.indented() { "#h(1em);" } else { "" };
    out.push_str(&format!(
        "#block(spacing: 0.6em)[{indent}#{label};#box(width: 1fr, repeat[.]);#\"{page}\";];",
        page = entry.page
    ));
}

fn signature(line: &SignatureLine, out: &mut String) {
    out.push_str(&format!(
        "#block(breakable: false, below: 1.5cm)[#{};#v(0.5cm);#align(center)[#\"_____________________________________\";#linebreak();#{};#linebreak();#{};];];",
        string_literal(&line.label),
        string_literal(&line.name),
        string_literal(&line.title),
    ));
}

fn table_block(table: &Table, out: &mut String) {
    out.push_str(&format!("#text(size: 9pt, table(columns: {}", table.columns));
    if !table.header.is_empty() {
        out.push_str(", table.header(");
        out.push_str(&rows(&table.header, true));
        out.push(')');
    }
    if !table.body.is_empty() {
        out.push_str(", ");
        out.push_str(&rows(&table.body, false));
    }
    if !table.footer.is_empty() {
        out.push_str(", table.footer(");
        out.push_str(&rows(&table.footer, true));
        out.push(')');
    }
    out.push_str("));");
}

fn rows(rows: &[Vec<Cell>], shaded: bool) -> String {
    rows.iter()
        .flatten()
        .map(|cell| cell_expr(cell, shaded))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cell_expr(cell: &Cell, shaded: bool) -> String {
    let mut body = string_literal(&cell.text);
    if cell.bold {
        body = format!("strong({body})");
    }
    let fill = if shaded { ", fill: luma(240)" } else { "" };
    format!(
        "table.cell(colspan: {}, rowspan: {}, align: {} + horizon{fill}, {body})",
        cell.span.max(1),
        cell.row_span.max(1),
        align_name(cell.align),
    )
}
