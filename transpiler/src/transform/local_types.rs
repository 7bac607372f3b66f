use super::{DeclRef, LocalType, Visitor};
use crate::ast::{DeclKind, GenDecl, Spec, TypeExpr};

/// Indexes every type declared in the package, across all of its files,
/// so embedded fields can be resolved regardless of declaration order
pub struct LocalTypesPlugin;

impl Visitor for LocalTypesPlugin {
    fn enter_decl(&mut self, _at: DeclRef, decl: &GenDecl, _metadata: &mut super::TransformMetadata) -> bool {
        decl.kind == DeclKind::Type
    }

    fn visit_spec(&mut self, spec: &Spec, metadata: &mut super::TransformMetadata) {
        if let Spec::Type(ts) = spec {
            metadata.local_types.insert(
                ts.name.name.clone(),
                LocalType {
                    exported: ts.name.is_exported(),
                    is_struct: matches!(ts.ty, TypeExpr::Struct(_)),
                },
            );
        }
    }
}
