//! Properties every fixture must satisfy regardless of its expected output
//!
//! Run with: cargo test --test invariants

use gotype_transpiler::{CommentLevel, GenerateOptions, GenerateResult, LoadedFile, PackageConfig, Pipeline};
use libtest_mimic::{Arguments, Failed, Trial};
use std::fs;
use std::path::{Path, PathBuf};

type Check = fn(&Path, &PackageConfig) -> Result<(), Failed>;

const CHECKS: &[(&str, Check)] = &[
    ("deterministic", check_deterministic),
    ("no_comments_at_none", check_no_comments_at_none),
    ("balanced_braces", check_balanced_braces),
    ("mappings_ordered", check_mappings_ordered),
    ("one_source_header", check_one_source_header),
];

fn main() {
    let args = Arguments::from_args();
    let mut trials = Vec::new();
    for path in fixtures() {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("fixture").to_string();
        for (check_name, check) in CHECKS {
            let path = path.clone();
            let check = *check;
            trials.push(Trial::test(format!("{check_name}::{stem}"), move || {
                let config = config_for(&path)?;
                check(&path, &config)
            }));
        }
    }
    libtest_mimic::run(&args, trials).exit();
}

fn fixtures() -> Vec<PathBuf> {
    let pattern = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/*.go");
    let mut files: Vec<_> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .filter_map(|e| e.ok())
        .collect();
    files.sort();
    files
}

fn config_for(path: &Path) -> Result<PackageConfig, Failed> {
    let config_path = path.with_extension("yaml");
    if !config_path.exists() {
        return Ok(PackageConfig::default());
    }
    let text = fs::read_to_string(&config_path).map_err(|e| format!("{}: {e}", config_path.display()))?;
    Ok(serde_yaml::from_str(&text).map_err(|e| format!("{}: {e}", config_path.display()))?)
}

fn generate(path: &Path, config: PackageConfig) -> Result<GenerateResult, Failed> {
    let source = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let sources = [LoadedFile {
        path: path.to_path_buf(),
        source,
    }];
    Ok(Pipeline::standard(config)
        .compile_sources(&sources, &GenerateOptions::package())
        .map_err(|e| format!("{}: {e}", path.display()))?)
}

fn check_deterministic(path: &Path, config: &PackageConfig) -> Result<(), Failed> {
    let first = generate(path, config.clone())?;
    let second = generate(path, config.clone())?;
    if first.code != second.code {
        return Err("two runs produced different output".into());
    }
    Ok(())
}

/// Without comments only the banner, source headers and type annotations remain.
fn check_no_comments_at_none(path: &Path, config: &PackageConfig) -> Result<(), Failed> {
    let config = PackageConfig {
        preserve_comments: CommentLevel::None,
        ..config.clone()
    };
    let code = generate(path, config)?.code;
    for (i, line) in code.lines().enumerate() {
        if line.contains("/**") || line.contains(" // ") || line == "/*" {
            return Err(format!("line {} keeps a comment: {line}", i + 1).into());
        }
    }
    Ok(())
}

fn check_balanced_braces(path: &Path, config: &PackageConfig) -> Result<(), Failed> {
    let code = generate(path, config.clone())?.code;
    let mut depth = 0i64;
    for c in code.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err("closing brace without an opening one".into());
        }
    }
    if depth != 0 {
        return Err(format!("{depth} unclosed braces").into());
    }
    Ok(())
}

fn check_mappings_ordered(path: &Path, config: &PackageConfig) -> Result<(), Failed> {
    let result = generate(path, config.clone())?;
    let lines = result.code.lines().count();
    let mut previous = None;
    for mapping in &result.mappings {
        if mapping.gen_line > lines {
            return Err(format!("mapping past the end of the output: {mapping:?}").into());
        }
        if let Some((gen_line, src_line)) = previous {
            if mapping.gen_line < gen_line || mapping.src_line <= src_line {
                return Err(format!("mappings out of order at {mapping:?}").into());
            }
        }
        previous = Some((mapping.gen_line, mapping.src_line));
    }
    Ok(())
}

fn check_one_source_header(path: &Path, config: &PackageConfig) -> Result<(), Failed> {
    let code = generate(path, config.clone())?.code;
    let headers = code.matches("//////////\n// source: ").count();
    if headers != 1 {
        return Err(format!("expected one source header, found {headers}").into());
    }
    if !code.starts_with("// Code generated by gotype. DO NOT EDIT.\n") {
        return Err("missing generated-code banner".into());
    }
    Ok(())
}
