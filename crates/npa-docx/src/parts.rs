//! Package parts other than the document body

use npa_render::{header_layout, Align, HeaderSlot};

use crate::body::{cm_to_twips, write_paragraph, Inline, Paragraph, RunContext, RunStyle, TabStop};
use crate::error::Result;
use crate::media::Media;
use crate::xml::XmlWriter;
use crate::DocxOptions;

pub const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_WP: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml";

pub const HEADER_ODD_ID: &str = "rIdHeaderOdd";
pub const HEADER_EVEN_ID: &str = "rIdHeaderEven";
pub const HEADER_FIRST_ID: &str = "rIdHeaderFirst";

const EMU_PER_TWIP: u64 = 635;

/// Part names of the three headers, relative to `word/`
pub const HEADER_ODD: &str = "header1.xml";
pub const HEADER_EVEN: &str = "header2.xml";
pub const HEADER_FIRST: &str = "header3.xml";

/// A4 page geometry in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub page_width: u32,
    pub page_height: u32,
    /// Top, right, bottom, left
    pub margins: [u32; 4],
}

impl Geometry {
    pub fn from_options(options: &DocxOptions) -> Self {
        Self {
            page_width: 11906,
            page_height: 16838,
            margins: options.margins_cm.map(cm_to_twips),
        }
    }

    pub fn content_width(&self) -> u32 {
        self.page_width
            .saturating_sub(self.margins[1] + self.margins[3])
    }

    pub fn content_height(&self) -> u32 {
        self.page_height
            .saturating_sub(self.margins[0] + self.margins[2])
    }

    /// Content box in EMUs
    pub fn max_image(&self) -> (u64, u64) {
        let to_emu = |twips: u32| u64::from(twips) * EMU_PER_TWIP;
        (to_emu(self.content_width()), to_emu(self.content_height()) / 2)
    }
}

pub fn content_types(media: &Media) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let mut extensions: Vec<(&str, &str)> = media
        .files()
        .iter()
        .map(|file| (file.format.extension(), file.format.mime_type()))
        .collect();
    extensions.sort_unstable();
    extensions.dedup();
    for (extension, mime) in extensions {
        xml.empty("Default", &[("Extension", extension), ("ContentType", mime)])?;
    }

    let overrides = [
        ("/word/document.xml".to_string(), format!("{CT_BASE}.document.main+xml")),
        ("/word/styles.xml".to_string(), format!("{CT_BASE}.styles+xml")),
        ("/word/settings.xml".to_string(), format!("{CT_BASE}.settings+xml")),
        (format!("/word/{HEADER_ODD}"), format!("{CT_BASE}.header+xml")),
        (format!("/word/{HEADER_EVEN}"), format!("{CT_BASE}.header+xml")),
        (format!("/word/{HEADER_FIRST}"), format!("{CT_BASE}.header+xml")),
    ];
    for (part, content_type) in &overrides {
        xml.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", content_type.as_str())],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.finish())
}

pub fn root_rels() -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", format!("{REL_BASE}/officeDocument").as_str()),
            ("Target", "word/document.xml"),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

pub fn document_rels(media: &Media) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    let fixed = [
        ("rIdStyles", "styles", "styles.xml"),
        ("rIdSettings", "settings", "settings.xml"),
        (HEADER_ODD_ID, "header", HEADER_ODD),
        (HEADER_EVEN_ID, "header", HEADER_EVEN),
        (HEADER_FIRST_ID, "header", HEADER_FIRST),
    ];
    for (id, kind, target) in fixed {
        relationship(&mut xml, id, kind, target)?;
    }
    for file in media.files() {
        relationship(&mut xml, &file.rel_id, "image", &file.target)?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn relationship(xml: &mut XmlWriter, id: &str, kind: &str, target: &str) -> Result<()> {
    xml.empty(
        "Relationship",
        &[
            ("Id", id),
            ("Type", format!("{REL_BASE}/{kind}").as_str()),
            ("Target", target),
        ],
    )
}

/// Document defaults plus the `TableGrid` style tables refer to
pub fn styles(options: &DocxOptions) -> Result<Vec<u8>> {
    let size = ((options.font_size_pt * 2.0).round().max(2.0) as u32).to_string();
    let mut xml = XmlWriter::new()?;
    xml.start("w:styles", &[("xmlns:w", NS_W)])?;

    xml.start("w:docDefaults", &[])?;
    xml.start("w:rPrDefault", &[])?;
    xml.start("w:rPr", &[])?;
    xml.empty(
        "w:rFonts",
        &[
            ("w:ascii", options.font.as_str()),
            ("w:hAnsi", options.font.as_str()),
            ("w:cs", options.font.as_str()),
        ],
    )?;
    xml.empty("w:sz", &[("w:val", size.as_str())])?;
    xml.empty("w:szCs", &[("w:val", size.as_str())])?;
    xml.empty("w:lang", &[("w:val", "pt-BR")])?;
    xml.end("w:rPr")?;
    xml.end("w:rPrDefault")?;
    xml.start("w:pPrDefault", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:spacing", &[("w:after", "120"), ("w:line", "276"), ("w:lineRule", "auto")])?;
    xml.end("w:pPr")?;
    xml.end("w:pPrDefault")?;
    xml.end("w:docDefaults")?;

    xml.start("w:style", &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")])?;
    xml.empty("w:name", &[("w:val", "Normal")])?;
    xml.end("w:style")?;

    xml.start("w:style", &[("w:type", "table"), ("w:styleId", "TableGrid")])?;
    xml.empty("w:name", &[("w:val", "Table Grid")])?;
    xml.start("w:tblPr", &[])?;
    xml.start("w:tblBorders", &[])?;
    for edge in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        xml.empty(
            edge,
            &[("w:val", "single"), ("w:sz", "4"), ("w:space", "0"), ("w:color", "000000")],
        )?;
    }
    xml.end("w:tblBorders")?;
    xml.start("w:tblCellMar", &[])?;
    xml.empty("w:left", &[("w:w", "80"), ("w:type", "dxa")])?;
    xml.empty("w:right", &[("w:w", "80"), ("w:type", "dxa")])?;
    xml.end("w:tblCellMar")?;
    xml.end("w:tblPr")?;
    xml.end("w:style")?;

    xml.end("w:styles")?;
    Ok(xml.finish())
}

/// Separate even/odd headers so the running header can mirror
pub fn settings() -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start("w:settings", &[("xmlns:w", NS_W)])?;
    xml.empty("w:defaultTabStop", &[("w:val", "709")])?;
    xml.empty("w:evenAndOddHeaders", &[])?;
    xml.end("w:settings")?;
    Ok(xml.finish())
}

/// Header for pages of a given parity
///
/// `sample_page` picks the layout: any even page for the even header, any
/// odd page after the cover for the default one, the cover for the first.
/// The page number and total are Word fields, so they follow the physical
/// pages of the opened document.
pub fn header(sample_page: u32, document_number: &str, geometry: &Geometry) -> Result<Vec<u8>> {
    let media = Media::default();
    let mut context = RunContext::new(&media, geometry.max_image());
    let mut xml = XmlWriter::new()?;
    xml.start("w:hdr", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?;

    let mut paragraph = Paragraph::new().aligned(Align::Left);
    if let Some([left, right]) = header_layout(sample_page) {
        paragraph.tab = Some(TabStop {
            position: geometry.content_width(),
            dotted: false,
        });
        slot_inlines(left, document_number, &mut paragraph);
        paragraph.inlines.push(Inline::Tab);
        slot_inlines(right, document_number, &mut paragraph);
    }
    write_paragraph(&mut xml, &paragraph, &mut context)?;

    xml.end("w:hdr")?;
    Ok(xml.finish())
}

fn slot_inlines(slot: HeaderSlot, document_number: &str, paragraph: &mut Paragraph) {
    let style = RunStyle {
        size: Some(20),
        ..RunStyle::default()
    };
    match slot {
        HeaderSlot::DocumentNumber => paragraph.push_text(document_number, style),
        HeaderSlot::PageOfTotal => {
            paragraph.inlines.push(Inline::Field {
                instruction: "PAGE",
                style,
            });
            paragraph.push_text("/", style);
            paragraph.inlines.push(Inline::Field {
                instruction: "NUMPAGES",
                style,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_geometry_from_default_margins() {
        let geometry = Geometry::from_options(&DocxOptions::default());
        assert_eq!(geometry.margins, [1417, 1134, 1134, 1701]);
        assert_eq!(geometry.content_width(), 11906 - 1134 - 1701);
    }

    #[test]
    fn test_headers_mirror_by_parity() {
        let geometry = Geometry::from_options(&DocxOptions::default());
        let even = text(header(2, "NPA 01", &geometry).unwrap());
        let odd = text(header(3, "NPA 01", &geometry).unwrap());
        assert!(even.find("NPA 01").unwrap() < even.find(" PAGE ").unwrap());
        assert!(odd.find(" NUMPAGES ").unwrap() < odd.find("NPA 01").unwrap());
    }

    #[test]
    fn test_first_page_header_is_empty() {
        let geometry = Geometry::from_options(&DocxOptions::default());
        let first = text(header(1, "NPA 01", &geometry).unwrap());
        assert!(!first.contains("NPA 01"));
        assert!(!first.contains("PAGE"));
    }

    #[test]
    fn test_settings_enable_even_and_odd_headers() {
        assert!(text(settings().unwrap()).contains("<w:evenAndOddHeaders/>"));
    }

    #[test]
    fn test_styles_carry_font() {
        let options = DocxOptions {
            font: "Arial".to_string(),
            font_size_pt: 11.0,
            ..DocxOptions::default()
        };
        let out = text(styles(&options).unwrap());
        assert!(out.contains("w:ascii=\"Arial\""));
        assert!(out.contains("<w:sz w:val=\"22\"/>"));
    }
}
