//! Rich-text content carried by the document
//!
//! Content fields hold HTML fragments produced by the host's editor widget.
//! Inside the engine they are only ever held as [`SafeMarkup`], which can
//! only be built by running the sanitizer. Renderers take the markup as-is;
//! export backends walk it through [`SafeMarkup::tokens`].

mod fragment;
mod sanitize;
mod tree;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use sanitize::sanitize;
pub use tree::MarkupNode;

/// Elements that survive sanitizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Bold,
    Italic,
    Underline,
    Paragraph,
    LineBreak,
    UnorderedList,
    OrderedList,
    ListItem,
    Span,
    Image,
}

impl Tag {
    /// Map an HTML tag name onto the allow-list
    pub fn from_name(name: &str) -> Option<Self> {
        let tag = match name {
            "b" | "strong" => Tag::Bold,
            "i" | "em" => Tag::Italic,
            "u" => Tag::Underline,
            "p" | "div" => Tag::Paragraph,
            "br" => Tag::LineBreak,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "span" => Tag::Span,
            "img" => Tag::Image,
            _ => return None,
        };
        Some(tag)
    }

    /// Canonical tag name
    pub fn name(&self) -> &'static str {
        match self {
            Tag::Bold => "b",
            Tag::Italic => "i",
            Tag::Underline => "u",
            Tag::Paragraph => "p",
            Tag::LineBreak => "br",
            Tag::UnorderedList => "ul",
            Tag::OrderedList => "ol",
            Tag::ListItem => "li",
            Tag::Span => "span",
            Tag::Image => "img",
        }
    }
}

/// Inline style declarations kept from a `style` attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl InlineStyle {
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.underline)
    }
}

/// Numbering of an ordered list (`<ol type="a">` gives alphabetic items)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Numbering {
    #[default]
    Decimal,
    Alpha,
}

/// An opening tag after sanitizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    pub tag: Tag,
    pub style: InlineStyle,
    pub numbering: Numbering,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            style: InlineStyle::default(),
            numbering: Numbering::default(),
        }
    }
}

/// A piece of sanitized markup, in document order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkupToken {
    /// Decoded text (no entities)
    Text(String),
    Open(Element),
    Close(Tag),
    LineBreak,
    /// Image source, either a `data:image/...` URI or an http(s) URL
    Image(String),
}

/// Rich-text content that has passed the sanitizer
///
/// The inner string is always in canonical form: re-sanitizing it yields
/// the same string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SafeMarkup(String);

impl SafeMarkup {
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Sanitize an editor fragment
    pub fn sanitize(raw: &str) -> Self {
        sanitize(raw)
    }

    /// Build markup from unformatted text; newlines become line breaks.
    pub fn from_plain_text(text: &str) -> Self {
        let mut tokens = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                tokens.push(MarkupToken::LineBreak);
            }
            let line = line.trim_end_matches('\r');
            if !line.is_empty() {
                tokens.push(MarkupToken::Text(line.to_string()));
            }
        }
        Self(sanitize::serialize(&tokens))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when there is nothing to print: no visible text and no image
    pub fn is_blank(&self) -> bool {
        self.tokens().iter().all(|token| match token {
            MarkupToken::Text(text) => text.trim().is_empty(),
            MarkupToken::Image(_) => false,
            _ => true,
        })
    }

    /// Token stream of the canonical markup
    pub fn tokens(&self) -> Vec<MarkupToken> {
        sanitize::parse(&self.0)
    }

    /// Balanced element tree of the markup
    pub fn nodes(&self) -> Vec<MarkupNode> {
        tree::build(self.tokens())
    }

    /// Text content with line breaks, paragraphs and list items as newlines
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for token in self.tokens() {
            match token {
                MarkupToken::Text(text) => out.push_str(&text),
                MarkupToken::LineBreak => out.push('\n'),
                MarkupToken::Close(Tag::Paragraph) | MarkupToken::Close(Tag::ListItem) => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                _ => {}
            }
        }
        out.trim_end_matches('\n').to_string()
    }
}

impl From<String> for SafeMarkup {
    fn from(raw: String) -> Self {
        sanitize(&raw)
    }
}

impl From<&str> for SafeMarkup {
    fn from(raw: &str) -> Self {
        sanitize(raw)
    }
}

impl From<SafeMarkup> for String {
    fn from(markup: SafeMarkup) -> Self {
        markup.0
    }
}

impl fmt::Display for SafeMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_round() {
        let markup = SafeMarkup::from_plain_text("linha 1\nlinha <2>");
        assert_eq!(markup.as_str(), "linha 1<br/>linha &lt;2&gt;");
        assert_eq!(markup.plain_text(), "linha 1\nlinha <2>");
    }

    #[test]
    fn test_blank_detection() {
        assert!(SafeMarkup::empty().is_blank());
        assert!(SafeMarkup::sanitize("<p> </p><br>").is_blank());
        assert!(!SafeMarkup::sanitize("<p>x</p>").is_blank());
        assert!(!SafeMarkup::sanitize(r#"<img src="data:image/png;base64,AA==">"#).is_blank());
    }

    #[test]
    fn test_deserialize_sanitizes() {
        let markup: SafeMarkup =
            serde_json::from_str(r#""<p onclick=\"x\">oi<script>bad()</script></p>""#).unwrap();
        assert_eq!(markup.as_str(), "<p>oi</p>");
    }

    #[test]
    fn test_plain_text_of_paragraphs() {
        let markup = SafeMarkup::sanitize("<p>um</p><p>dois</p><ul><li>a</li><li>b</li></ul>");
        assert_eq!(markup.plain_text(), "um\ndois\na\nb");
    }
}
