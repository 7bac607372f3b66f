mod emit_directive;
mod local_types;
mod metadata;

pub use emit_directive::{EmitDirectivePlugin, EMIT_DIRECTIVE};
pub use local_types::LocalTypesPlugin;
pub use metadata::{DeclRef, LocalType, TransformMetadata};

use crate::ast::{GenDecl, SourceFile, Spec};

/// Visitor trait for package-wide analysis passes
pub trait Visitor {
    /// Called for each declaration. Return `false` to skip its specs.
    fn enter_decl(&mut self, _at: DeclRef, _decl: &GenDecl, _metadata: &mut TransformMetadata) -> bool {
        true
    }

    /// Called for each spec of an entered declaration.
    fn visit_spec(&mut self, _spec: &Spec, _metadata: &mut TransformMetadata) {}
}

/// Transformer that applies a series of plugins to every file of a package
pub struct Transformer {
    plugins: Vec<Box<dyn Visitor>>,
    pub metadata: TransformMetadata,
}

impl Transformer {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            metadata: TransformMetadata::new(),
        }
    }

    pub fn add<V: Visitor + 'static>(mut self, visitor: V) -> Self {
        self.plugins.push(Box::new(visitor));
        self
    }

    pub fn transform(&mut self, files: &[SourceFile]) -> &TransformMetadata {
        for plugin in &mut self.plugins {
            for (file_index, file) in files.iter().enumerate() {
                for (decl_index, decl) in file.decls.iter().enumerate() {
                    let at = DeclRef {
                        file: file_index,
                        decl: decl_index,
                    };
                    if plugin.enter_decl(at, decl, &mut self.metadata) {
                        for spec in &decl.specs {
                            plugin.visit_spec(spec, &mut self.metadata);
                        }
                    }
                }
            }
        }

        &self.metadata
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a transformer with the standard plugins
pub fn standard_plugins() -> Transformer {
    Transformer::new()
        .add(LocalTypesPlugin)
        .add(EmitDirectivePlugin)
}
