use super::{Emitter, GenerateOptions, GenerateResult, Generator, Output, PackageContext};
use crate::ast::{DeclKind, SourceFile};
use crate::config::PackageConfig;
use crate::error::CompileError;
use crate::transform::{DeclRef, TransformMetadata};
use tracing::debug;

pub const GENERATED_HEADER: &str = "// Code generated by gotype. DO NOT EDIT.\n";

/// Writes one TypeScript file per Go package
pub struct TypeScriptGenerator {
    config: PackageConfig,
}

impl TypeScriptGenerator {
    pub fn new(config: PackageConfig) -> Self {
        Self {
            config: config.normalize(),
        }
    }

    fn included<'f>(&self, files: &'f [SourceFile]) -> impl Iterator<Item = (usize, &'f SourceFile)> {
        files.iter().enumerate().filter(|(_, file)| {
            let ignored = file.path.as_deref().is_some_and(|p| self.config.is_file_ignored(p));
            if ignored {
                debug!(file = ?file.path, "skipping ignored file");
            }
            !ignored
        })
    }
}

impl Generator for TypeScriptGenerator {
    fn generate(
        &self,
        files: &[SourceFile],
        metadata: &TransformMetadata,
        options: &GenerateOptions,
    ) -> Result<GenerateResult, CompileError> {
        let emitter = Emitter::new(&self.config, metadata);
        let mut ctx = PackageContext::default();

        let mut out = Output::new();
        if options.package_header {
            out.push(GENERATED_HEADER);
            out.push(&self.config.frontmatter);
        }

        for (file_index, file) in self.included(files) {
            debug!(file = ?file.path, decls = file.decls.len(), "generating file");
            let mut first = true;
            for (decl_index, decl) in file.decls.iter().enumerate() {
                let emit_text = metadata.emit_text(DeclRef {
                    file: file_index,
                    decl: decl_index,
                });
                if decl.kind == DeclKind::Var && emit_text.is_none() {
                    continue;
                }

                if first {
                    first = false;
                    if options.source_headers {
                        if let Some(name) = file.file_name() {
                            write_source_header(&emitter, &mut out, &name, file);
                        }
                    }
                }

                out.mark(decl.span.start);
                if let Some(text) = emit_text {
                    out.push(text);
                    out.push("\n");
                    continue;
                }

                emitter.write_group_decl(out.buffer(), decl, &mut ctx).map_err(|err| {
                    let err = CompileError::from(err.or_at(decl.span));
                    match &file.path {
                        Some(path) => err.in_file(path),
                        None => err,
                    }
                })?;
            }
        }

        let (code, mappings) = out.finish();
        Ok(GenerateResult { code, mappings })
    }
}

fn write_source_header(emitter: &Emitter<'_>, out: &mut Output, name: &str, file: &SourceFile) {
    out.push("\n//////////\n// source: ");
    out.push(name);
    out.push("\n");
    if let Some(doc) = &file.doc {
        if emitter.preserve_doc_comments() {
            emitter.write_package_doc(out.buffer(), doc);
        }
    }
    out.push("\n");
}
