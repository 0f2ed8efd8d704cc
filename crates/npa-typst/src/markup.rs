//! Rich content -> Typst markup

use npa_model::markup::{Element, InlineStyle, MarkupNode, Numbering, Tag};
use npa_model::SafeMarkup;

use crate::error::Result;
use crate::source::{string_literal, Assets};

/// Convert sanitized markup into Typst markup (for use inside `[...]`)
pub(crate) fn to_typst(markup: &SafeMarkup, assets: &mut Assets) -> Result<String> {
    let mut out = String::new();
    write_nodes(&markup.nodes(), assets, &mut out)?;
    Ok(out)
}

fn write_nodes(nodes: &[MarkupNode], assets: &mut Assets, out: &mut String) -> Result<()> {
    for node in nodes {
        write_node(node, assets, out)?;
    }
    Ok(())
}

fn write_node(node: &MarkupNode, assets: &mut Assets, out: &mut String) -> Result<()> {
    match node {
        MarkupNode::Text(text) => text_run(text, out),
        MarkupNode::LineBreak => out.push_str("#linebreak();"),
        MarkupNode::Image(src) => image(src, assets, out)?,
        MarkupNode::Element { element, children } => element_node(element, children, assets, out)?,
    }
    Ok(())
}

/// Every embedded expression ends with `;` so the next token can never be
/// parsed as a call or field access on it
pub(crate) fn text_run(text: &str, out: &mut String) {
    if text.is_empty() {
        return;
    }
    out.push('#');
    out.push_str(&string_literal(text));
    out.push(';');
}

fn image(src: &str, assets: &mut Assets, out: &mut String) -> Result<()> {
    if src.starts_with("data:") {
        let path = assets.embed(src)?;
        out.push_str("#image(");
        out.push_str(&string_literal(&path));
        out.push_str(");");
    } else {
        tracing::warn!(src, "remote image left as a link");
        out.push_str("#link(");
        out.push_str(&string_literal(src));
        out.push_str(");");
    }
    Ok(())
}

fn element_node(
    element: &Element,
    children: &[MarkupNode],
    assets: &mut Assets,
    out: &mut String,
) -> Result<()> {
    let mut style = element.style;
    match element.tag {
        Tag::Bold => style.bold = true,
        Tag::Italic => style.italic = true,
        Tag::Underline => style.underline = true,
        _ => {}
    }

    let wrappers = open_style(&style, out);
    match element.tag {
        Tag::Paragraph => {
            out.push_str("#block(width: 100%)[");
            write_nodes(children, assets, out)?;
            out.push_str("];");
        }
        Tag::UnorderedList => list("list(", children, assets, out)?,
        Tag::OrderedList => {
            let numbering = match element.numbering {
                Numbering::Decimal => "1.",
                Numbering::Alpha => "a)",
            };
            list(
                &format!("enum(numbering: {}, ", string_literal(numbering)),
                children,
                assets,
                out,
            )?
        }
        Tag::ListItem => {
            // an item outside any list prints as its own line
            write_nodes(children, assets, out)?;
            out.push_str("#linebreak();");
        }
        _ => write_nodes(children, assets, out)?,
    }
    for _ in 0..wrappers {
        out.push_str("];");
    }
    Ok(())
}

fn open_style(style: &InlineStyle, out: &mut String) -> usize {
    let mut opened = 0;
    for (on, call) in [
        (style.bold, "#strong["),
        (style.italic, "#emph["),
        (style.underline, "#underline["),
    ] {
        if on {
            out.push_str(call);
            opened += 1;
        }
    }
    opened
}

/// `#list([..], [..]);` from the children of a list element
///
/// Blank text between items is dropped; anything else outside an item
/// becomes an item of its own.
fn list(call: &str, children: &[MarkupNode], assets: &mut Assets, out: &mut String) -> Result<()> {
    out.push('#');
    out.push_str(call);
    for child in children {
        match child {
            MarkupNode::Text(text) if text.trim().is_empty() => continue,
            MarkupNode::Element { element, children } if element.tag == Tag::ListItem => {
                out.push('[');
                let wrappers = open_style(&element.style, out);
                write_nodes(children, assets, out)?;
                for _ in 0..wrappers {
                    out.push_str("];");
                }
                out.push_str("], ");
            }
            other => {
                out.push('[');
                write_node(other, assets, out)?;
                out.push_str("], ");
            }
        }
    }
    out.push_str(");");
    Ok(())
}
