//! Association of comments with declarations.
//!
//! Comments are grouped the way the Go parser groups them: a comment that
//! starts on the line of the preceding token, with the following token on a
//! later line, is that token's *line comment*; the last group of a run of
//! comments ending on the line right above a token is that token's *lead
//! comment* (its doc).

use super::positions::node_span;
use crate::ast::{Comment, CommentGroup};
use std::collections::HashMap;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy)]
struct Token {
    start_byte: usize,
    end_byte: usize,
    start_line: usize,
    end_line: usize,
}

#[derive(Debug, Default)]
pub struct CommentIndex {
    /// Keyed by the start byte of the token that follows the group
    lead: HashMap<usize, CommentGroup>,
    /// Keyed by the end byte of the token that precedes the group
    line: HashMap<usize, CommentGroup>,
}

impl CommentIndex {
    pub fn build(root: Node<'_>, source: &str) -> Self {
        let mut index = Self::default();
        let mut prev: Option<Token> = None;
        let mut pending: Vec<Comment> = Vec::new();

        for leaf in leaves(root) {
            if leaf.kind() == "comment" {
                let text = leaf.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
                pending.push(Comment { text, span: node_span(&leaf) });
                continue;
            }
            // Statement terminators are not tokens for association purposes.
            if matches!(leaf.kind(), "\n" | ";" | "\0") || leaf.start_byte() == leaf.end_byte() {
                continue;
            }
            let token = Token {
                start_byte: leaf.start_byte(),
                end_byte: leaf.end_byte(),
                start_line: leaf.start_position().row,
                end_line: leaf.end_position().row,
            };
            if !pending.is_empty() {
                index.associate(std::mem::take(&mut pending), prev, Some(token));
            }
            prev = Some(token);
        }
        if !pending.is_empty() {
            index.associate(pending, prev, None);
        }
        index
    }

    /// Remove and return the doc comment of the token starting at `byte`
    pub fn take_lead(&mut self, byte: usize) -> Option<CommentGroup> {
        self.lead.remove(&byte)
    }

    /// Remove and return the trailing comment of the token ending at `byte`
    pub fn take_line(&mut self, byte: usize) -> Option<CommentGroup> {
        self.line.remove(&byte)
    }

    fn associate(&mut self, comments: Vec<Comment>, prev: Option<Token>, next: Option<Token>) {
        let mut rest = comments.as_slice();

        if let Some(prev) = prev {
            if rest[0].span.start.line == prev.end_line {
                let (group, end_line, remaining) = take_group(rest, 0);
                if next.is_none_or(|next| next.start_line != end_line) {
                    self.line.insert(prev.end_byte, group);
                }
                rest = remaining;
            }
        }

        let mut last = None;
        while !rest.is_empty() {
            let (group, end_line, remaining) = take_group(rest, 1);
            last = Some((group, end_line));
            rest = remaining;
        }
        if let (Some((group, end_line)), Some(next)) = (last, next) {
            if end_line + 1 == next.start_line {
                self.lead.insert(next.start_byte, group);
            }
        }
    }
}

/// Take comments while each starts at most `gap` lines after the previous one ends.
fn take_group(comments: &[Comment], gap: usize) -> (CommentGroup, usize, &[Comment]) {
    let mut end_line = comments[0].span.start.line;
    let mut taken = 0;
    for comment in comments {
        if comment.span.start.line > end_line + gap {
            break;
        }
        end_line = comment.span.end.line;
        taken += 1;
    }
    let (group, rest) = comments.split_at(taken);
    (CommentGroup::new(group.to_vec()), end_line, rest)
}

/// Leaf nodes in document order. Comments are always leaves.
fn leaves(root: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        let descend = node.child_count() > 0 && node.kind() != "comment";
        if descend && cursor.goto_first_child() {
            continue;
        }
        if !descend {
            out.push(node);
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(source: &str) -> CommentIndex {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        CommentIndex::build(tree.root_node(), source)
    }

    fn texts(group: &CommentGroup) -> Vec<&str> {
        group.list.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_lead_comment_directly_above() {
        let source = "package x\n\n// Doc line one\n// Doc line two\nconst A = 1\n";
        let mut idx = index(source);
        let lead = idx.take_lead(source.find("const").unwrap()).unwrap();
        assert_eq!(texts(&lead), vec!["// Doc line one", "// Doc line two"]);
    }

    #[test]
    fn test_blank_line_detaches_comment() {
        let source = "package x\n\n// Floating\n\nconst A = 1\n";
        let mut idx = index(source);
        assert!(idx.take_lead(source.find("const").unwrap()).is_none());
    }

    #[test]
    fn test_line_comment_and_next_doc() {
        let source = "package x\n\nconst (\n\tA = 1 // after A\n\t// before B\n\tB = 2\n)\n";
        let mut idx = index(source);
        let one_end = source.find("1 //").unwrap() + 1;
        let line = idx.take_line(one_end).unwrap();
        assert_eq!(texts(&line), vec!["// after A"]);
        let lead = idx.take_lead(source.find("B = 2").unwrap()).unwrap();
        assert_eq!(texts(&lead), vec!["// before B"]);
    }

    #[test]
    fn test_package_doc() {
        let source = "// Package x does things.\npackage x\n";
        let mut idx = index(source);
        let lead = idx.take_lead(source.find("package").unwrap()).unwrap();
        assert_eq!(texts(&lead), vec!["// Package x does things."]);
    }

    #[test]
    fn test_take_is_once() {
        let source = "package x\n\n// Doc\ntype A int\n";
        let mut idx = index(source);
        let at = source.find("type").unwrap();
        assert!(idx.take_lead(at).is_some());
        assert!(idx.take_lead(at).is_none());
    }
}
