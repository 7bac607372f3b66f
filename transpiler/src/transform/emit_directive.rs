use super::{DeclRef, Visitor};
use crate::ast::{DeclKind, GenDecl, LitKind, Spec, TypeExpr};

/// Comment prefix marking text to be copied into the output verbatim
pub const EMIT_DIRECTIVE: &str = "//gotype:emit";

/// Finds `var` declarations whose doc carries the emit directive and whose
/// first value is a string literal; the literal's contents become output
pub struct EmitDirectivePlugin;

impl Visitor for EmitDirectivePlugin {
    fn enter_decl(&mut self, at: DeclRef, decl: &GenDecl, metadata: &mut super::TransformMetadata) -> bool {
        if decl.kind != DeclKind::Var {
            return false;
        }
        let Some(doc) = &decl.doc else {
            return false;
        };
        if !doc.list.iter().any(|c| c.text.starts_with(EMIT_DIRECTIVE)) {
            return false;
        }
        if let Some(Spec::Value(vs)) = decl.specs.first() {
            if let Some(TypeExpr::Literal(lit)) = vs.values.first() {
                if lit.kind == LitKind::String && lit.raw.len() >= 2 {
                    metadata
                        .emit_vars
                        .insert(at, lit.raw[1..lit.raw.len() - 1].to_string());
                }
            }
        }
        false
    }
}
