mod comments;
pub mod positions;
mod tree_builder;

pub use comments::CommentIndex;
use tree_builder::TreeBuilder;

use crate::ast::{SourceFile, Span};
use crate::error::{ErrorKind, ParseError};

/// Parser trait - converts source code to AST
pub trait Parser {
    fn parse(&self, source: &str) -> Result<SourceFile, ParseError>;
}

/// Go source parser backed by tree-sitter-go
pub struct GoParser {
    // Configuration only, no state
}

impl GoParser {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GoParser {
    fn parse(&self, source: &str) -> Result<SourceFile, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|err| {
                ParseError::new(ErrorKind::InvalidSyntax, format!("failed to load Go grammar: {err}"), Span::default())
            })?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::new(ErrorKind::InvalidSyntax, "Go parser produced no tree", Span::default()))?;

        let root = tree.root_node();
        let comments = CommentIndex::build(root, source);
        TreeBuilder::new(source, comments).build(root)
    }
}
