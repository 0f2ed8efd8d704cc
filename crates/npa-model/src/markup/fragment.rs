//! Editor fragments parsed as HTML
//!
//! The fragment goes through `scraper`'s HTML5 parser, so entities, quoted
//! attributes and misnested tags are resolved the way a browser resolves
//! them. The resulting tree is walked into a balanced stream of allow-listed
//! tokens.
//!
//! The stream is emitted so that parsing its serialization again yields the
//! same tree: a paragraph is closed before a block (paragraph, list or list
//! item) opens inside it, and a list item is closed before a sibling item
//! opens. Those are the only implicit closes HTML applies to the allowed tags.

use scraper::{ElementRef, Html, Node};

use super::{Element, InlineStyle, MarkupToken, Numbering, Tag};

/// Removed together with everything inside them
const DROPPED_WITH_CONTENT: &[&str] = &["script", "style", "template", "noscript", "head", "title"];

/// Walk a parsed fragment into allow-listed tokens
pub(crate) fn tokens(raw: &str) -> Vec<MarkupToken> {
    let html = Html::parse_fragment(raw);
    let mut walker = Walker::default();
    walker.children(html.root_element());
    walker.finish()
}

#[derive(Default)]
struct Walker {
    tokens: Vec<MarkupToken>,
    open: Vec<Tag>,
    dropped: usize,
}

impl Walker {
    fn children(&mut self, parent: ElementRef<'_>) {
        for child in parent.children() {
            match child.value() {
                Node::Text(text) => self.text(text),
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        self.element(element);
                    }
                }
                // comments, doctypes, processing instructions
                _ => {}
            }
        }
    }

    fn element(&mut self, node: ElementRef<'_>) {
        let html_element = node.value();
        let name = html_element.name();
        if DROPPED_WITH_CONTENT.contains(&name) {
            self.dropped += 1;
            return;
        }

        match Tag::from_name(name) {
            Some(Tag::LineBreak) => self.tokens.push(MarkupToken::LineBreak),
            Some(Tag::Image) => match image_source(html_element.attr("src")) {
                Some(src) => self.tokens.push(MarkupToken::Image(src)),
                None => self.dropped += 1,
            },
            Some(tag) => {
                let mut element = Element::new(tag);
                if let Some(style) = html_element.attr("style") {
                    element.style = parse_style(style);
                }
                if tag == Tag::OrderedList
                    && html_element
                        .attr("type")
                        .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("a"))
                {
                    element.numbering = Numbering::Alpha;
                }

                self.open_element(element);
                let depth = self.open.len();
                self.children(node);
                self.close_while(|open| open.len() >= depth);
            }
            None => {
                self.dropped += 1;
                self.children(node);
            }
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(MarkupToken::Text(last)) = self.tokens.last_mut() {
            last.push_str(text);
        } else {
            self.tokens.push(MarkupToken::Text(text.to_string()));
        }
    }

    fn open_element(&mut self, element: Element) {
        match element.tag {
            Tag::Paragraph | Tag::UnorderedList | Tag::OrderedList => self.close_paragraph(),
            Tag::ListItem => {
                self.close_paragraph();
                self.close_sibling_item();
            }
            _ => {}
        }
        self.tokens.push(MarkupToken::Open(element));
        self.open.push(element.tag);
    }

    fn close_paragraph(&mut self) {
        if let Some(position) = self.open.iter().rposition(|tag| *tag == Tag::Paragraph) {
            self.close_while(|open| open.len() > position);
        }
    }

    /// An item still open in the innermost list
    fn close_sibling_item(&mut self) {
        let item = self
            .open
            .iter()
            .rev()
            .take_while(|tag| !matches!(tag, Tag::UnorderedList | Tag::OrderedList))
            .position(|tag| *tag == Tag::ListItem);
        if let Some(from_top) = item {
            let position = self.open.len() - 1 - from_top;
            self.close_while(|open| open.len() > position);
        }
    }

    fn close_while(&mut self, keep_closing: impl Fn(&[Tag]) -> bool) {
        while keep_closing(self.open.as_slice()) {
            let Some(tag) = self.open.pop() else {
                break;
            };
            self.tokens.push(MarkupToken::Close(tag));
        }
    }

    fn finish(mut self) -> Vec<MarkupToken> {
        self.close_while(|open| !open.is_empty());
        if self.dropped > 0 {
            tracing::debug!(dropped = self.dropped, "sanitizer dropped disallowed markup");
        }
        self.tokens
    }
}

fn parse_style(declarations: &str) -> InlineStyle {
    let mut style = InlineStyle::default();
    for declaration in declarations.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let value = value.trim().to_ascii_lowercase();
        match property.trim().to_ascii_lowercase().as_str() {
            "font-weight" => {
                style.bold = value == "bold"
                    || value == "bolder"
                    || value.parse::<u16>().is_ok_and(|weight| weight >= 600);
            }
            "font-style" => style.italic = value == "italic" || value == "oblique",
            "text-decoration" | "text-decoration-line" => {
                style.underline = value.contains("underline");
            }
            _ => {}
        }
    }
    style
}

fn image_source(src: Option<&str>) -> Option<String> {
    let src = src?.trim();
    let lower = src.to_ascii_lowercase();
    let allowed = lower.starts_with("data:image/")
        || lower.starts_with("https://")
        || lower.starts_with("http://");
    allowed.then(|| src.to_string())
}
