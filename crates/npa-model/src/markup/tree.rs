//! Balanced view of a token stream
//!
//! Sanitized markup is always balanced; hand-built token streams may not
//! be. A stray close tag is ignored, a close tag for an outer element closes
//! everything opened inside it, and whatever is still open at the end is
//! closed there.

use super::{Element, MarkupToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    LineBreak,
    Image(String),
    Element {
        element: Element,
        children: Vec<MarkupNode>,
    },
}

pub(crate) fn build(tokens: Vec<MarkupToken>) -> Vec<MarkupNode> {
    let mut root = Vec::new();
    let mut open: Vec<(Element, Vec<MarkupNode>)> = Vec::new();

    for token in tokens {
        let node = match token {
            MarkupToken::Text(text) => MarkupNode::Text(text),
            MarkupToken::LineBreak => MarkupNode::LineBreak,
            MarkupToken::Image(src) => MarkupNode::Image(src),
            MarkupToken::Open(element) => {
                open.push((element, Vec::new()));
                continue;
            }
            MarkupToken::Close(tag) => {
                if let Some(depth) = open.iter().rposition(|(element, _)| element.tag == tag) {
                    while open.len() > depth {
                        close_top(&mut open, &mut root);
                    }
                }
                continue;
            }
        };
        match open.last_mut() {
            Some((_, children)) => children.push(node),
            None => root.push(node),
        }
    }

    while !open.is_empty() {
        close_top(&mut open, &mut root);
    }
    root
}

fn close_top(open: &mut Vec<(Element, Vec<MarkupNode>)>, root: &mut Vec<MarkupNode>) {
    let Some((element, children)) = open.pop() else {
        return;
    };
    let node = MarkupNode::Element { element, children };
    match open.last_mut() {
        Some((_, parent)) => parent.push(node),
        None => root.push(node),
    }
}
