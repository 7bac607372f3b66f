//! Test runner that compares generated TypeScript against .expected.ts and .expected.err files
//!
//! Run with: cargo test --test expected_tests

use gotype_transpiler::{GenerateOptions, LoadedFile, PackageConfig, Pipeline};
use libtest_mimic::{Arguments, Failed, Trial};
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let args = Arguments::from_args();
    let mut trials = Vec::new();
    for path in collect_test_files("fixtures") {
        trials.push(Trial::test(trial_name("expected", &path), move || check_output(&path)));
    }
    for path in collect_test_files("errors") {
        trials.push(Trial::test(trial_name("error", &path), move || check_error(&path)));
    }
    libtest_mimic::run(&args, trials).exit();
}

/// Collect all .go files of one test directory
fn collect_test_files(dir: &str) -> Vec<PathBuf> {
    let pattern = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join(dir)
        .join("*.go");
    let mut files: Vec<_> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .filter_map(|e| e.ok())
        .collect();
    files.sort();
    files
}

fn trial_name(kind: &str, path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("fixture");
    format!("{kind}::{stem}")
}

fn config_for(path: &Path) -> Result<PackageConfig, Failed> {
    let config_path = path.with_extension("yaml");
    if !config_path.exists() {
        return Ok(PackageConfig::default());
    }
    let text = fs::read_to_string(&config_path).map_err(|e| format!("{}: {e}", config_path.display()))?;
    Ok(serde_yaml::from_str(&text).map_err(|e| format!("{}: {e}", config_path.display()))?)
}

fn compile(path: &Path) -> Result<(String, Result<String, gotype_transpiler::CompileError>), Failed> {
    let source = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("fixture.go");
    let pipeline = Pipeline::standard(config_for(path)?);
    let sources = [LoadedFile {
        path: PathBuf::from(filename),
        source: source.clone(),
    }];
    let result = pipeline
        .compile_sources(&sources, &GenerateOptions::package())
        .map(|output| output.code);
    Ok((source, result))
}

fn check_output(path: &Path) -> Result<(), Failed> {
    let expected_ts = path.with_extension("expected.ts");
    let expected = fs::read_to_string(&expected_ts)
        .map_err(|_| format!("Missing expected file: {}", expected_ts.display()))?;

    match compile(path)? {
        (_, Ok(code)) if code == expected => Ok(()),
        (_, Ok(code)) => Err(format!(
            "Output mismatch: {}\n--- expected ---\n{}\n--- actual ---\n{}",
            path.display(),
            expected,
            code
        )
        .into()),
        (source, Err(e)) => {
            let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("fixture.go");
            Err(format!("Compile error for {}:{}", path.display(), e.render(&source, filename)).into())
        }
    }
}

fn check_error(path: &Path) -> Result<(), Failed> {
    let expected_err = path.with_extension("expected.err");
    let expected = fs::read_to_string(&expected_err)
        .map_err(|_| format!("Missing expected file: {}", expected_err.display()))?;

    match compile(path)? {
        (_, Ok(code)) => Err(format!("Expected an error for {}, got:\n{}", path.display(), code).into()),
        (source, Err(e)) => {
            let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("fixture.go");
            let rendered = e.render(&source, filename);
            if !rendered.contains(&format!(" file: {filename}:")) {
                return Err(format!("Error does not name {filename}:\n{rendered}").into());
            }
            if rendered.lines().any(|line| line == expected.trim_end()) {
                Ok(())
            } else {
                Err(format!(
                    "Error mismatch: {}\n--- expected ---\n{}\n--- actual ---\n{}",
                    path.display(),
                    expected.trim_end(),
                    rendered
                )
                .into())
            }
        }
    }
}
