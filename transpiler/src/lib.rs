//! Generates TypeScript declarations from Go types.
//!
//! A package goes through three stages: every file is parsed into the
//! declaration AST, package-wide analysis passes fill [`TransformMetadata`],
//! and the generator writes one TypeScript module for the whole package.

pub mod ast;
pub mod config;
pub mod error;
pub mod generate;
pub mod literal;
pub mod loader;
pub mod parser;
pub mod transform;

pub use ast::SourceFile;
pub use config::{CommentLevel, Config, ConfigError, EnumStyle, Flavor, OptionalStyle, PackageConfig};
pub use error::{CompileError, ErrorKind, GenerateError, ParseError};
pub use generate::{GenerateOptions, GenerateResult, Generator, Mapping, TypeScriptGenerator};
pub use loader::{LoadError, LoadedFile};
pub use parser::{GoParser, Parser};
pub use transform::{standard_plugins, TransformMetadata};

use std::path::PathBuf;

/// Package clause wrapped around snippets given to [`convert_go_to_typescript`]
const CONVERT_PACKAGE_HEADER: &str = "package gotypeconvert\n\n";

/// Parse, analyze and generate one package
pub struct Pipeline {
    parser: Box<dyn Parser>,
    generator: Box<dyn Generator>,
}

impl Pipeline {
    pub fn new(parser: Box<dyn Parser>, generator: Box<dyn Generator>) -> Self {
        Self { parser, generator }
    }

    /// Go parser and TypeScript generator for the given package configuration
    pub fn standard(config: PackageConfig) -> Self {
        Self::new(Box::new(GoParser::new()), Box::new(TypeScriptGenerator::new(config)))
    }

    pub fn parse_file(&self, path: impl Into<PathBuf>, source: &str) -> Result<SourceFile, CompileError> {
        let path = path.into();
        let mut file = self
            .parser
            .parse(source)
            .map_err(|err| CompileError::from(err).in_file(&path))?;
        file.path = Some(path);
        Ok(file)
    }

    /// Generate code for already parsed files of one package
    pub fn compile(&self, files: &[SourceFile], options: &GenerateOptions) -> Result<GenerateResult, CompileError> {
        let mut transformer = standard_plugins();
        let metadata = transformer.transform(files);
        self.generator.generate(files, metadata, options)
    }

    /// Parse and generate the source files of one package
    pub fn compile_sources(
        &self,
        sources: &[LoadedFile],
        options: &GenerateOptions,
    ) -> Result<GenerateResult, CompileError> {
        let files = sources
            .iter()
            .map(|file| self.parse_file(&file.path, &file.source))
            .collect::<Result<Vec<_>, _>>()?;
        self.compile(&files, options)
    }
}

/// Translate a snippet of Go declarations (without a package clause).
///
/// Mappings refer to lines of the snippet as given.
pub fn convert(code: &str, config: &PackageConfig) -> Result<GenerateResult, CompileError> {
    let source = format!("{CONVERT_PACKAGE_HEADER}{code}");
    let pipeline = Pipeline::standard(config.clone());
    let file = pipeline.parser.parse(&source)?;
    let mut result = pipeline.compile(std::slice::from_ref(&file), &GenerateOptions::default())?;

    let wrapper_lines = CONVERT_PACKAGE_HEADER.matches('\n').count();
    for mapping in &mut result.mappings {
        mapping.src_line = mapping.src_line.saturating_sub(wrapper_lines);
    }
    Ok(result)
}

/// Translate a snippet of Go declarations to TypeScript declaration text.
pub fn convert_go_to_typescript(code: &str, config: &PackageConfig) -> Result<String, CompileError> {
    convert(code, config).map(|result| result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_struct() {
        let code = "type Foo struct {\n\tBar *string `json:\"bar,omitempty\"`\n}\n";
        let out = convert_go_to_typescript(code, &PackageConfig::default()).unwrap();
        assert_eq!(out, "export interface Foo {\n  bar?: string;\n}\n");
    }

    #[test]
    fn test_convert_mappings_are_snippet_relative() {
        let result = convert("const A = 1\n\nconst B = 2\n", &PackageConfig::default()).unwrap();
        let lines: Vec<_> = result.mappings.iter().map(|m| (m.gen_line, m.src_line)).collect();
        assert_eq!(lines, vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn test_convert_syntax_error() {
        let err = convert_go_to_typescript("type A struct {", &PackageConfig::default()).unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn test_pipeline_names_failing_file() {
        let pipeline = Pipeline::standard(PackageConfig::default());
        let sources = [
            LoadedFile { path: PathBuf::from("ok.go"), source: "package p\n\nconst A = 1\n".to_string() },
            LoadedFile { path: PathBuf::from("broken.go"), source: "package p\n\ntype (\n".to_string() },
        ];
        let err = pipeline.compile_sources(&sources, &GenerateOptions::package()).unwrap_err();
        assert_eq!(err.path(), Some(&PathBuf::from("broken.go")));
    }
}
