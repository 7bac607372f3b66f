//! Package discovery on disk and output writing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("package {package} not found under {}", .root.display())]
    PackageNotFound { package: String, root: PathBuf },
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source text of one Go file
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub source: String,
}

/// Directory of a package given as a path or as an import path inside the
/// module rooted at (or above) `root`.
pub fn resolve_package_dir(root: &Path, package: &str) -> Result<PathBuf, LoadError> {
    let direct = root.join(package);
    if direct.is_dir() {
        return Ok(direct);
    }

    for dir in root.ancestors() {
        let go_mod = dir.join("go.mod");
        let Ok(text) = fs::read_to_string(&go_mod) else {
            continue;
        };
        let Some(module) = module_path(&text) else {
            continue;
        };
        let relative = if package == module {
            Some("")
        } else {
            package.strip_prefix(module).and_then(|rest| rest.strip_prefix('/'))
        };
        if let Some(relative) = relative {
            let candidate = dir.join(relative);
            if candidate.is_dir() {
                debug!(package, dir = %candidate.display(), "resolved package through go.mod");
                return Ok(candidate);
            }
        }
        // The nearest go.mod owns the tree.
        break;
    }

    Err(LoadError::PackageNotFound {
        package: package.to_string(),
        root: root.to_path_buf(),
    })
}

/// Module path declared by a `go.mod` file
fn module_path(go_mod: &str) -> Option<&str> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.trim().trim_matches('"');
        (!module.is_empty()).then_some(module)
    })
}

/// The non-test `.go` files directly inside `dir`, sorted by name
pub fn load_package(dir: &Path) -> Result<Vec<LoadedFile>, LoadError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(".go") || name.ends_with("_test.go") {
            continue;
        }
        let path = entry.path().to_path_buf();
        let source = fs::read_to_string(&path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;
        files.push(LoadedFile { path, source });
    }
    debug!(dir = %dir.display(), files = files.len(), "loaded package");
    Ok(files)
}

/// Write generated code, creating parent directories
pub fn write_output(path: &Path, code: &str) -> Result<(), LoadError> {
    let write_error = |source| LoadError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, code).map_err(write_error)
}
