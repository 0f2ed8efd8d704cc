//! Paragraph model and its WordprocessingML serialization

use npa_render::Align;

use crate::error::Result;
use crate::media::{Media, MediaFile};
use crate::xml::XmlWriter;

pub const TWIPS_PER_CM: f32 = 566.929;

pub fn cm_to_twips(cm: f32) -> u32 {
    (cm * TWIPS_PER_CM).round().max(0.0) as u32
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Font size in half points; `None` keeps the document default
    pub size: Option<u32>,
}

impl RunStyle {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text { text: String, style: RunStyle },
    Break,
    Tab,
    /// `PAGE`, `NUMPAGES`
    Field {
        instruction: &'static str,
        style: RunStyle,
    },
    /// Index into the package media
    Image(usize),
}

/// Right-aligned tab stop, optionally with a dotted leader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStop {
    pub position: u32,
    pub dotted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub align: Option<Align>,
    pub justify: bool,
    /// Twips
    pub indent_left: u32,
    pub first_line: u32,
    pub space_after: Option<u32>,
    pub tab: Option<TabStop>,
    pub keep_next: bool,
    pub page_break_before: bool,
    pub inlines: Vec<Inline>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>, style: RunStyle) -> Self {
        self.push_text(text, style);
        self
    }

    pub fn push_text(&mut self, text: impl Into<String>, style: RunStyle) {
        let text = text.into();
        if !text.is_empty() {
            self.inlines.push(Inline::Text { text, style });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }
}

/// Per-part state while writing runs
pub struct RunContext<'a> {
    pub media: &'a Media,
    /// Largest image extent in EMUs
    pub max_image: (u64, u64),
    next_drawing_id: u32,
}

impl<'a> RunContext<'a> {
    pub fn new(media: &'a Media, max_image: (u64, u64)) -> Self {
        Self {
            media,
            max_image,
            next_drawing_id: 1,
        }
    }

    fn drawing_id(&mut self) -> u32 {
        let id = self.next_drawing_id;
        self.next_drawing_id += 1;
        id
    }
}

pub fn write_paragraph(
    xml: &mut XmlWriter,
    paragraph: &Paragraph,
    context: &mut RunContext<'_>,
) -> Result<()> {
    xml.start("w:p", &[])?;
    write_paragraph_properties(xml, paragraph)?;
    for inline in &paragraph.inlines {
        write_inline(xml, inline, context)?;
    }
    xml.end("w:p")
}

fn write_paragraph_properties(xml: &mut XmlWriter, paragraph: &Paragraph) -> Result<()> {
    xml.start("w:pPr", &[])?;
    if paragraph.keep_next {
        xml.empty("w:keepNext", &[])?;
    }
    if paragraph.page_break_before {
        xml.empty("w:pageBreakBefore", &[])?;
    }
    if let Some(tab) = paragraph.tab {
        let position = tab.position.to_string();
        let mut attributes = vec![("w:val", "right"), ("w:pos", position.as_str())];
        if tab.dotted {
            attributes.push(("w:leader", "dot"));
        }
        xml.start("w:tabs", &[])?;
        xml.empty("w:tab", &attributes)?;
        xml.end("w:tabs")?;
    }
    if let Some(after) = paragraph.space_after {
        xml.empty("w:spacing", &[("w:after", after.to_string().as_str())])?;
    }
    if paragraph.indent_left > 0 || paragraph.first_line > 0 {
        xml.empty(
            "w:ind",
            &[
                ("w:left", paragraph.indent_left.to_string().as_str()),
                ("w:firstLine", paragraph.first_line.to_string().as_str()),
            ],
        )?;
    }
    let jc = match paragraph.align {
        Some(Align::Center) => Some("center"),
        Some(Align::Right) => Some("right"),
        Some(Align::Left) => Some("left"),
        None if paragraph.justify => Some("both"),
        None => None,
    };
    if let Some(jc) = jc {
        xml.empty("w:jc", &[("w:val", jc)])?;
    }
    xml.end("w:pPr")
}

fn write_inline(xml: &mut XmlWriter, inline: &Inline, context: &mut RunContext<'_>) -> Result<()> {
    match inline {
        Inline::Text { text, style } => write_text_run(xml, text, style),
        Inline::Break => {
            xml.start("w:r", &[])?;
            xml.empty("w:br", &[])?;
            xml.end("w:r")
        }
        Inline::Tab => {
            xml.start("w:r", &[])?;
            xml.empty("w:tab", &[])?;
            xml.end("w:r")
        }
        Inline::Field { instruction, style } => {
            xml.start("w:fldSimple", &[("w:instr", format!(" {instruction} ").as_str())])?;
            write_text_run(xml, "1", style)?;
            xml.end("w:fldSimple")
        }
        Inline::Image(index) => match context.media.get(*index) {
            Some(file) => {
                let id = context.drawing_id();
                let (cx, cy) = file.extent(context.max_image.0, context.max_image.1);
                write_drawing(xml, file, id, cx, cy)
            }
            None => {
                tracing::warn!(index, "image reference without media part");
                Ok(())
            }
        },
    }
}

fn write_run_properties(xml: &mut XmlWriter, style: &RunStyle) -> Result<()> {
    if *style == RunStyle::default() {
        return Ok(());
    }
    xml.start("w:rPr", &[])?;
    if style.bold {
        xml.empty("w:b", &[])?;
    }
    if style.italic {
        xml.empty("w:i", &[])?;
    }
    if let Some(size) = style.size {
        xml.empty("w:sz", &[("w:val", size.to_string().as_str())])?;
    }
    if style.underline {
        xml.empty("w:u", &[("w:val", "single")])?;
    }
    xml.end("w:rPr")
}

/// One run; embedded newlines become `<w:br/>`
fn write_text_run(xml: &mut XmlWriter, text: &str, style: &RunStyle) -> Result<()> {
    xml.start("w:r", &[])?;
    write_run_properties(xml, style)?;
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            xml.empty("w:br", &[])?;
        }
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            xml.leaf("w:t", &[("xml:space", "preserve")], line)?;
        }
    }
    xml.end("w:r")
}

fn write_drawing(xml: &mut XmlWriter, file: &MediaFile, id: u32, cx: u64, cy: u64) -> Result<()> {
    let id = id.to_string();
    let name = format!("Imagem {id}");
    let (cx, cy) = (cx.to_string(), cy.to_string());

    xml.start("w:r", &[])?;
    xml.start("w:drawing", &[])?;
    xml.start(
        "wp:inline",
        &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
    )?;
    xml.empty("wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.empty("wp:docPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    xml.start(
        "a:graphic",
        &[("xmlns:a", "http://schemas.openxmlformats.org/drawingml/2006/main")],
    )?;
    xml.start(
        "a:graphicData",
        &[("uri", "http://schemas.openxmlformats.org/drawingml/2006/picture")],
    )?;
    xml.start(
        "pic:pic",
        &[("xmlns:pic", "http://schemas.openxmlformats.org/drawingml/2006/picture")],
    )?;

    xml.start("pic:nvPicPr", &[])?;
    xml.empty("pic:cNvPr", &[("id", id.as_str()), ("name", file.target.as_str())])?;
    xml.empty("pic:cNvPicPr", &[])?;
    xml.end("pic:nvPicPr")?;

    xml.start("pic:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", file.rel_id.as_str())])?;
    xml.start("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.end("a:stretch")?;
    xml.end("pic:blipFill")?;

    xml.start("pic:spPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")?;
    xml.end("pic:spPr")?;

    xml.end("pic:pic")?;
    xml.end("a:graphicData")?;
    xml.end("a:graphic")?;
    xml.end("wp:inline")?;
    xml.end("w:drawing")?;
    xml.end("w:r")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(paragraph: &Paragraph) -> String {
        let media = Media::default();
        let mut context = RunContext::new(&media, (1, 1));
        let mut xml = XmlWriter::new().unwrap();
        write_paragraph(&mut xml, paragraph, &mut context).unwrap();
        String::from_utf8(xml.finish()).unwrap()
    }

    #[test]
    fn test_cm_to_twips() {
        assert_eq!(cm_to_twips(1.0), 567);
        assert_eq!(cm_to_twips(2.5), 1417);
    }

    #[test]
    fn test_styled_run() {
        let style = RunStyle {
            bold: true,
            underline: true,
            ..RunStyle::default()
        };
        let out = render(&Paragraph::new().aligned(Align::Center).with_text(" A & B", style));
        assert!(out.contains("<w:jc w:val=\"center\"/>"));
        assert!(out.contains("<w:rPr><w:b/><w:u w:val=\"single\"/></w:rPr>"));
        assert!(out.contains("<w:t xml:space=\"preserve\"> A &amp; B</w:t>"));
    }

    #[test]
    fn test_newlines_become_breaks() {
        let out = render(&Paragraph::new().with_text("a\nb", RunStyle::default()));
        assert!(out.contains("<w:t xml:space=\"preserve\">a</w:t><w:br/><w:t xml:space=\"preserve\">b</w:t>"));
    }

    #[test]
    fn test_dotted_tab_and_field() {
        let mut paragraph = Paragraph::new();
        paragraph.tab = Some(TabStop {
            position: 9071,
            dotted: true,
        });
        paragraph.inlines.push(Inline::Tab);
        paragraph.inlines.push(Inline::Field {
            instruction: "PAGE",
            style: RunStyle::default(),
        });
        let out = render(&paragraph);
        assert!(out.contains("<w:tab w:val=\"right\" w:pos=\"9071\" w:leader=\"dot\"/>"));
        assert!(out.contains("<w:fldSimple w:instr=\" PAGE \">"));
    }

    #[test]
    fn test_missing_media_is_skipped() {
        let mut paragraph = Paragraph::new();
        paragraph.inlines.push(Inline::Image(3));
        assert!(!render(&paragraph).contains("w:drawing"));
    }
}
