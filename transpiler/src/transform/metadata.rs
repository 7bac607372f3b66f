use std::collections::HashMap;

/// Location of a declaration within a package: file index, then declaration index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclRef {
    pub file: usize,
    pub decl: usize,
}

/// A type declared somewhere in the package being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalType {
    pub exported: bool,
    pub is_struct: bool,
}

/// Metadata collected during transformation
/// This is populated by analysis plugins and used by the generator
#[derive(Debug, Clone, Default)]
pub struct TransformMetadata {
    pub local_types: HashMap<String, LocalType>,
    /// Raw text of `var` declarations carrying the emit directive
    pub emit_vars: HashMap<DeclRef, String>,
}

impl TransformMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_type(&self, name: &str) -> Option<&LocalType> {
        self.local_types.get(name)
    }

    pub fn emit_text(&self, at: DeclRef) -> Option<&str> {
        self.emit_vars.get(&at).map(String::as_str)
    }
}
