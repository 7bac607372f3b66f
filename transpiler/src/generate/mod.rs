mod comments;
mod enums;
mod iota;
mod output;
mod structs;
mod tags;
mod types;
mod typescript;
mod values;

pub use output::{Mapping, Output};
pub use tags::{StructTag, Tag, TagError};
pub use typescript::TypeScriptGenerator;

use crate::ast::SourceFile;
use crate::config::PackageConfig;
use crate::error::CompileError;
use crate::transform::TransformMetadata;
use std::collections::HashSet;

/// Generator options
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Write the generated-code banner and frontmatter
    pub package_header: bool,
    /// Write a `// source:` header before each file's declarations
    pub source_headers: bool,
}

impl GenerateOptions {
    /// Options for a complete output file
    pub fn package() -> Self {
        Self {
            package_header: true,
            source_headers: true,
        }
    }
}

/// Generation result
#[derive(Debug, Clone, serde::Serialize)]
pub struct GenerateResult {
    pub code: String,
    pub mappings: Vec<Mapping>,
}

/// Generator trait - converts the files of one package to code
pub trait Generator {
    fn generate(
        &self,
        files: &[SourceFile],
        metadata: &TransformMetadata,
        options: &GenerateOptions,
    ) -> Result<GenerateResult, CompileError>;
}

/// Package-scoped mutable state, threaded through every emission call
#[derive(Debug, Default)]
pub struct PackageContext {
    /// Type names already emitted by enum/union synthesis
    pub generated_names: HashSet<String>,
}

/// Writes TypeScript for declarations under one package configuration
pub(crate) struct Emitter<'a> {
    pub(crate) conf: &'a PackageConfig,
    pub(crate) metadata: &'a TransformMetadata,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(conf: &'a PackageConfig, metadata: &'a TransformMetadata) -> Self {
        Self { conf, metadata }
    }

    pub(crate) fn write_indent(&self, s: &mut String, depth: usize) {
        for _ in 0..depth {
            s.push_str(&self.conf.indent);
        }
    }
}
