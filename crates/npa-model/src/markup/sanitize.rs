//! Allow-list sanitizer
//!
//! Only formatting the template can print survives: bold, italic,
//! underline, paragraphs, line breaks, lists, spans and images. Styles are
//! reduced to weight, slant and underline. The output is canonical, so
//! sanitizing twice is the same as sanitizing once.

use super::fragment;
use super::{InlineStyle, MarkupToken, Numbering, SafeMarkup, Tag};

/// Sanitize an editor fragment into canonical safe markup
pub fn sanitize(raw: &str) -> SafeMarkup {
    SafeMarkup(serialize(&parse(raw)))
}

/// Parse a fragment into allow-listed tokens
pub(crate) fn parse(raw: &str) -> Vec<MarkupToken> {
    let tokens = fragment::tokens(raw);
    let has_structure = tokens
        .iter()
        .any(|token| !matches!(token, MarkupToken::Text(_)));
    if has_structure {
        tokens
    } else {
        plain_text_lines(tokens)
    }
}

/// Serialize tokens into the canonical string form
pub(crate) fn serialize(tokens: &[MarkupToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            MarkupToken::Text(text) => out.push_str(&escape_text(text)),
            MarkupToken::LineBreak => out.push_str("<br/>"),
            MarkupToken::Image(src) => {
                out.push_str("<img src=\"");
                out.push_str(&escape_attribute(src));
                out.push_str("\"/>");
            }
            MarkupToken::Open(element) => {
                out.push('<');
                out.push_str(element.tag.name());
                if element.tag == Tag::OrderedList && element.numbering == Numbering::Alpha {
                    out.push_str(" type=\"a\"");
                }
                if !element.style.is_plain() {
                    out.push_str(" style=\"");
                    out.push_str(&style_declarations(&element.style));
                    out.push('"');
                }
                out.push('>');
            }
            MarkupToken::Close(tag) => {
                out.push_str("</");
                out.push_str(tag.name());
                out.push('>');
            }
        }
    }
    out
}

/// Plain text from the editor: newlines are the only structure it has.
fn plain_text_lines(tokens: Vec<MarkupToken>) -> Vec<MarkupToken> {
    let mut lines = Vec::new();
    for token in tokens {
        let MarkupToken::Text(text) = token else {
            lines.push(token);
            continue;
        };
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                lines.push(MarkupToken::LineBreak);
            }
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            match lines.last_mut() {
                Some(MarkupToken::Text(last)) => last.push_str(line),
                _ => lines.push(MarkupToken::Text(line.to_string())),
            }
        }
    }
    lines
}

fn style_declarations(style: &InlineStyle) -> String {
    let mut kept = Vec::new();
    if style.bold {
        kept.push("font-weight:bold");
    }
    if style.italic {
        kept.push("font-style:italic");
    }
    if style.underline {
        kept.push("text-decoration:underline");
    }
    kept.join(";")
}

/// Escape text content for the canonical form.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
