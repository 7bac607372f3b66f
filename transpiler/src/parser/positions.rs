//! tree-sitter rows and byte columns as the crate's `Position`/`Span`.

use crate::ast::{Position, Span};
use tree_sitter::Node;

/// Span covered by a syntax node.
pub fn node_span(node: &Node<'_>) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span::new(
        Position {
            byte: node.start_byte(),
            line: start.row,
            col: start.column,
        },
        Position {
            byte: node.end_byte(),
            line: end.row,
            col: end.column,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_span_rows_and_columns() {
        let source = "package x\n\ntype A int\n";
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let decl = tree.root_node().named_child(1).unwrap();
        let span = node_span(&decl);
        assert_eq!((span.start.line, span.start.col, span.start.byte), (2, 0, 11));
        assert_eq!((span.end.line, span.end.col), (2, 10));
    }
}
