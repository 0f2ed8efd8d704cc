//! Rich content -> paragraphs
//!
//! WordprocessingML has no nested block containers, so the markup tree is
//! flattened: `<p>` and list items each start a paragraph, inline styles
//! fold into run properties. List markers are written as text.

use npa_model::letter_for;
use npa_model::markup::{Element, MarkupNode, Numbering, Tag};
use npa_model::SafeMarkup;

use crate::body::{Inline, Paragraph, RunStyle};
use crate::error::Result;
use crate::media::Media;

/// Indent per list level, in twips
const LIST_INDENT: u32 = 567;

/// Paragraph settings shared by everything a rich block produces
#[derive(Debug, Clone, Copy, Default)]
pub struct RichLayout {
    pub first_line_indent: u32,
}

pub fn paragraphs(
    markup: &SafeMarkup,
    lead: Option<&str>,
    layout: RichLayout,
    media: &mut Media,
) -> Result<Vec<Paragraph>> {
    let mut builder = Builder {
        media,
        layout,
        depth: 0,
        current: Paragraph::new(),
        done: Vec::new(),
        has_lead: false,
    };
    builder.reset();
    if let Some(lead) = lead {
        builder.current.push_text(lead, RunStyle::bold());
        builder.current.push_text(" ", RunStyle::default());
        builder.has_lead = true;
    }
    builder.walk(&markup.nodes(), RunStyle::default())?;
    if builder.holds_only_lead() {
        builder.current.inlines.truncate(1);
    }
    builder.force_flush();
    Ok(builder.done)
}

struct Builder<'m> {
    media: &'m mut Media,
    layout: RichLayout,
    depth: u32,
    current: Paragraph,
    done: Vec<Paragraph>,
    has_lead: bool,
}

impl Builder<'_> {
    fn reset(&mut self) {
        let mut paragraph = Paragraph::new();
        paragraph.justify = true;
        if self.depth == 0 {
            paragraph.first_line = self.layout.first_line_indent;
        } else {
            paragraph.indent_left = LIST_INDENT * self.depth;
        }
        self.current = paragraph;
    }

    /// Bold lead followed by its separator and nothing else
    fn holds_only_lead(&self) -> bool {
        self.has_lead && self.done.is_empty() && self.current.inlines.len() == 2
    }

    /// A paragraph break right after the lead keeps the lead in front of
    /// the first paragraph
    fn flush(&mut self) {
        if self.holds_only_lead() {
            return;
        }
        if !self.current.is_empty() {
            let paragraph = std::mem::take(&mut self.current);
            self.done.push(paragraph);
        }
        self.reset();
    }

    fn walk(&mut self, nodes: &[MarkupNode], style: RunStyle) -> Result<()> {
        for node in nodes {
            self.node(node, style)?;
        }
        Ok(())
    }

    fn node(&mut self, node: &MarkupNode, style: RunStyle) -> Result<()> {
        match node {
            MarkupNode::Text(text) => self.current.push_text(text.as_str(), style),
            MarkupNode::LineBreak => self.current.inlines.push(Inline::Break),
            MarkupNode::Image(src) => self.image(src, style)?,
            MarkupNode::Element { element, children } => self.element(element, children, style)?,
        }
        Ok(())
    }

    fn image(&mut self, src: &str, style: RunStyle) -> Result<()> {
        if !src.starts_with("data:") {
            tracing::warn!(src, "remote image left as a link");
            self.current.push_text(src, style);
            return Ok(());
        }
        if let Some(index) = self.media.embed(src)? {
            self.current.inlines.push(Inline::Image(index));
        }
        Ok(())
    }

    fn element(&mut self, element: &Element, children: &[MarkupNode], style: RunStyle) -> Result<()> {
        let style = merge(style, element);
        match element.tag {
            Tag::Paragraph => {
                self.flush();
                self.walk(children, style)?;
                self.flush();
            }
            Tag::UnorderedList | Tag::OrderedList => self.list(element, children, style)?,
            Tag::ListItem => {
                self.walk(children, style)?;
                self.flush();
            }
            _ => self.walk(children, style)?,
        }
        Ok(())
    }

    fn force_flush(&mut self) {
        self.has_lead = false;
        self.flush();
    }

    fn list(&mut self, element: &Element, children: &[MarkupNode], style: RunStyle) -> Result<()> {
        self.force_flush();
        self.depth += 1;
        self.reset();

        let mut position = 0;
        for child in children {
            if matches!(child, MarkupNode::Text(text) if text.trim().is_empty()) {
                continue;
            }
            let marker = marker(element, position);
            position += 1;
            self.current.push_text(marker, RunStyle::default());
            match child {
                MarkupNode::Element { element: item, children } if item.tag == Tag::ListItem => {
                    self.walk(children, merge(style, item))?;
                }
                other => self.node(other, style)?,
            }
            self.flush();
        }

        self.depth -= 1;
        self.reset();
        Ok(())
    }
}

fn merge(mut style: RunStyle, element: &Element) -> RunStyle {
    style.bold |= element.style.bold || element.tag == Tag::Bold;
    style.italic |= element.style.italic || element.tag == Tag::Italic;
    style.underline |= element.style.underline || element.tag == Tag::Underline;
    style
}

fn marker(list: &Element, position: usize) -> String {
    match (list.tag, list.numbering) {
        (Tag::UnorderedList, _) => "\u{2022} ".to_string(),
        (_, Numbering::Decimal) => format!("{}. ", position + 1),
        (_, Numbering::Alpha) => format!("{}) ", letter_for(position).to_lowercase()),
    }
}
