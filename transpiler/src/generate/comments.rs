//! Comment preservation: doc blocks, trailing comments, package docs and emit directives

use super::Emitter;
use crate::ast::CommentGroup;
use crate::config::CommentLevel;
use crate::transform::EMIT_DIRECTIVE;

impl Emitter<'_> {
    /// Package docs and trailing comments on values survive only at the default level
    pub(crate) fn preserve_doc_comments(&self) -> bool {
        self.conf.preserve_comments == CommentLevel::Default
    }

    /// Comments bound to types, fields and constants
    pub(crate) fn preserve_type_comments(&self) -> bool {
        matches!(self.conf.preserve_comments, CommentLevel::Default | CommentLevel::Types)
    }

    /// Emit directives are copied at every level; the doc itself only when type comments are kept.
    pub(crate) fn write_doc(&self, s: &mut String, cg: Option<&CommentGroup>, depth: usize) {
        let Some(cg) = cg else {
            return;
        };
        if self.preserve_type_comments() {
            self.write_comment_group(s, cg, depth);
        }
    }

    fn write_directives(&self, s: &mut String, cg: &CommentGroup) {
        for comment in &cg.list {
            if let Some(rest) = comment.text.strip_prefix(EMIT_DIRECTIVE) {
                // Drop the separator but keep any further indentation.
                let mut chars = rest.chars();
                chars.next();
                s.push_str(chars.as_str());
                s.push('\n');
            }
        }
    }

    pub(crate) fn write_comment_group(&self, s: &mut String, cg: &CommentGroup, depth: usize) {
        self.write_directives(s, cg);
        let text = cg.text();
        if text.is_empty() {
            s.push('\n');
            return;
        }

        self.write_indent(s, depth);
        s.push_str("/**\n");
        for line in text.split('\n') {
            if line.trim().is_empty() {
                continue;
            }
            self.write_indent(s, depth);
            s.push_str(" * ");
            // A `//` comment can contain `*/`
            s.push_str(&line.replace("*/", "*\\/"));
            s.push('\n');
        }
        self.write_indent(s, depth);
        s.push_str(" */\n");
    }

    /// ` // text` closing the current line
    pub(crate) fn write_single_line_comment(&self, s: &mut String, cg: &CommentGroup) {
        let text = cg.text();
        if text.is_empty() {
            s.push('\n');
            return;
        }
        s.push_str(" // ");
        s.push_str(&text);
    }

    /// Package documentation as a block comment
    pub(crate) fn write_package_doc(&self, s: &mut String, cg: &CommentGroup) {
        let text = cg.text();
        if text.is_empty() {
            return;
        }
        s.push_str("/*\n");
        s.push_str(&text);
        s.push_str("*/\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Comment, Span};
    use crate::config::PackageConfig;
    use crate::transform::TransformMetadata;

    fn group(lines: &[&str]) -> CommentGroup {
        CommentGroup::new(
            lines
                .iter()
                .map(|text| Comment { text: text.to_string(), span: Span::default() })
                .collect(),
        )
    }

    fn render(level: CommentLevel, f: impl Fn(&Emitter<'_>, &mut String)) -> String {
        let conf = PackageConfig { preserve_comments: level, ..PackageConfig::default() }.normalize();
        let metadata = TransformMetadata::new();
        let emitter = Emitter::new(&conf, &metadata);
        let mut s = String::new();
        f(&emitter, &mut s);
        s
    }

    #[test]
    fn test_doc_block_at_depth() {
        let cg = group(&["// First line", "//", "// Has */ inside"]);
        let out = render(CommentLevel::Default, |e, s| e.write_comment_group(s, &cg, 1));
        assert_eq!(out, "  /**\n   * First line\n   * Has *\\/ inside\n   */\n");
    }

    #[test]
    fn test_emit_directive_before_doc() {
        let cg = group(&["//gotype:emit export type Extra = string;", "// Documented"]);
        let out = render(CommentLevel::Default, |e, s| e.write_comment_group(s, &cg, 0));
        assert_eq!(out, "export type Extra = string;\n/**\n * Documented\n */\n");
    }

    #[test]
    fn test_directive_only_group_writes_newline() {
        let cg = group(&["//go:generate stringer -type=Kind"]);
        let out = render(CommentLevel::Default, |e, s| e.write_comment_group(s, &cg, 0));
        assert_eq!(out, "\n");
    }

    #[test]
    fn test_none_level_drops_doc_directives() {
        let cg = group(&["//gotype:emit   indented", "// Documented"]);
        let out = render(CommentLevel::None, |e, s| e.write_doc(s, Some(&cg), 0));
        assert_eq!(out, "");
        let kept = render(CommentLevel::Types, |e, s| e.write_doc(s, Some(&cg), 0));
        assert!(kept.starts_with("  indented\n/**\n"));
    }

    #[test]
    fn test_single_line_comment() {
        let out = render(CommentLevel::Default, |e, s| e.write_single_line_comment(s, &group(&["// note"])));
        assert_eq!(out, " // note\n");
        let empty = render(CommentLevel::Default, |e, s| e.write_single_line_comment(s, &group(&["//"])));
        assert_eq!(empty, "\n");
    }

    #[test]
    fn test_package_doc() {
        let cg = group(&["// Package models is documented.", "// Twice."]);
        let out = render(CommentLevel::Default, |e, s| e.write_package_doc(s, &cg));
        assert_eq!(out, "/*\nPackage models is documented.\nTwice.\n*/\n");
    }
}
