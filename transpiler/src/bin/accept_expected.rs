//! Binary to generate/update .expected.ts and .expected.err files
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- enum    # Update only fixtures matching "enum"

use gotype_transpiler::{GenerateOptions, LoadedFile, PackageConfig, Pipeline};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&test_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|s| s == "go").unwrap_or(false))
    {
        let path = entry.path();
        let path_str = path.to_string_lossy();

        // Apply filter if provided
        if let Some(ref f) = filter {
            if !path_str.contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(path);
        updated += 1;
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

/// Options from `<name>.yaml` next to the fixture, defaults otherwise
fn fixture_config(path: &Path) -> Result<PackageConfig, String> {
    let config_path = path.with_extension("yaml");
    if !config_path.exists() {
        return Ok(PackageConfig::default());
    }
    let text = fs::read_to_string(&config_path).map_err(|e| format!("{}: {}", config_path.display(), e))?;
    serde_yaml::from_str(&text).map_err(|e| format!("{}: {}", config_path.display(), e))
}

fn process_file(path: &Path) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            return;
        }
    };
    let config = match fixture_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return;
        }
    };

    let is_error_test = path.to_string_lossy().contains("/errors/");
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");

    let pipeline = Pipeline::standard(config);
    let sources = [LoadedFile {
        path: Path::new(filename).to_path_buf(),
        source: source.clone(),
    }];

    match pipeline.compile_sources(&sources, &GenerateOptions::package()) {
        Ok(output) => {
            let expected_ts = path.with_extension("expected.ts");
            if let Err(e) = fs::write(&expected_ts, &output.code) {
                eprintln!("Failed to write {:?}: {}", expected_ts, e);
            } else {
                println!("  wrote {}", expected_ts.display());
            }

            // Remove any stale .expected.err if this now compiles
            let expected_err = path.with_extension("expected.err");
            if expected_err.exists() {
                let _ = fs::remove_file(&expected_err);
            }
        }
        Err(e) => {
            if is_error_test {
                // Only the headline is stable across grammar versions.
                let rendered = e.render(&source, filename);
                let headline = rendered
                    .lines()
                    .find(|line| line.starts_with("error:"))
                    .unwrap_or_default();
                let expected_err = path.with_extension("expected.err");
                if let Err(err) = fs::write(&expected_err, format!("{}\n", headline)) {
                    eprintln!("Failed to write {:?}: {}", expected_err, err);
                } else {
                    println!("  wrote {}", expected_err.display());
                }
            } else {
                eprintln!("ERROR: {:?} failed to compile but is not in errors/: {}", path, e);
            }
        }
    }
}
