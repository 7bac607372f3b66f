use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "gotype.yaml";
const DEFAULT_OUTPUT_FILENAME: &str = "index.ts";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("config not found for package {0}")]
    PackageNotFound(String),
    #[error("invalid config for package {package}: {reason}")]
    Invalid { package: String, reason: String },
}

/// Key naming of struct fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    #[serde(alias = "")]
    Default,
    /// Lower-cased keys, like gopkg.in/yaml
    Yaml,
}

/// Which comments survive into the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentLevel {
    /// Package docs, declaration docs, and trailing comments
    #[default]
    #[serde(alias = "")]
    Default,
    /// Only comments bound to types, fields, and constants
    Types,
    None,
}

/// How an optional field is marked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionalStyle {
    /// `name?: T`
    #[default]
    #[serde(alias = "")]
    Undefined,
    /// `name: T | null`
    Null,
}

/// Synthesis of enum-like const groups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumStyle {
    /// Plain `export const` declarations
    #[default]
    #[serde(rename = "", alias = "none")]
    Const,
    Enum,
    Union,
}

/// Options for one Go package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Import path or directory of the package
    pub path: String,
    /// Output file, or directory receiving `index.ts`. Empty writes next to the sources.
    pub output_path: String,
    pub indent: String,
    /// Qualified Go type (`time.Time`) to TypeScript type text
    pub type_mappings: BTreeMap<String, String>,
    /// Written verbatim after the generated-code header
    pub frontmatter: String,
    pub exclude_files: Vec<String>,
    /// When non-empty, only these files are generated
    pub include_files: Vec<String>,
    pub fallback_type: String,
    pub flavor: Flavor,
    pub preserve_comments: CommentLevel,
    pub optional_type: OptionalStyle,
    /// Base type every generated interface extends
    pub extends: String,
    pub enum_style: EnumStyle,
}

impl PackageConfig {
    /// Fill defaults for unset options
    pub fn normalize(mut self) -> Self {
        if self.indent.is_empty() {
            self.indent = "  ".to_string();
        }
        if self.fallback_type.is_empty() {
            self.fallback_type = "any".to_string();
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            package: self.path.clone(),
            reason,
        };
        if self.indent.contains('\n') {
            return Err(invalid("indent must not contain a newline".to_string()));
        }
        if let Some((key, _)) = self.type_mappings.iter().find(|(key, _)| key.trim().is_empty()) {
            return Err(invalid(format!("empty type mapping key {key:?}")));
        }
        Ok(())
    }

    /// Whether a source file is filtered out by `exclude_files` / `include_files`
    pub fn is_file_ignored(&self, path: &Path) -> bool {
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        if self.exclude_files.iter().any(|excluded| *excluded == basename) {
            return true;
        }
        if !self.include_files.is_empty() {
            return !self.include_files.iter().any(|included| *included == basename);
        }
        false
    }

    /// Output file for a package whose sources live in `package_dir`
    pub fn resolved_output_path(&self, package_dir: &Path) -> PathBuf {
        if self.output_path.is_empty() {
            package_dir.join(DEFAULT_OUTPUT_FILENAME)
        } else if !self.output_path.ends_with(".ts") {
            Path::new(&self.output_path).join(DEFAULT_OUTPUT_FILENAME)
        } else {
            PathBuf::from(&self.output_path)
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub packages: Vec<PackageConfig>,
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn package_names(&self) -> Vec<&str> {
        self.packages.iter().map(|p| p.path.as_str()).collect()
    }

    /// Normalized configuration of one package
    pub fn package_config(&self, package_path: &str) -> Result<PackageConfig, ConfigError> {
        let config = self
            .packages
            .iter()
            .find(|p| p.path == package_path)
            .ok_or_else(|| ConfigError::PackageNotFound(package_path.to_string()))?;
        config.validate()?;
        Ok(config.clone().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
packages:
  - path: github.com/acme/app/models
    output_path: web/src/types
    type_mappings:
      time.Time: "string /* RFC3339 */"
    flavor: yaml
    preserve_comments: types
    optional_type: "null"
    enum_style: union
  - path: ./internal/api
    indent: "\t"
    fallback_type: unknown
"#;

    #[test]
    fn test_parse_and_normalize() {
        let config: Config = serde_yaml::from_str(YAML).unwrap();
        assert_eq!(config.package_names(), vec!["github.com/acme/app/models", "./internal/api"]);

        let models = config.package_config("github.com/acme/app/models").unwrap();
        assert_eq!(models.indent, "  ");
        assert_eq!(models.fallback_type, "any");
        assert_eq!(models.flavor, Flavor::Yaml);
        assert_eq!(models.preserve_comments, CommentLevel::Types);
        assert_eq!(models.optional_type, OptionalStyle::Null);
        assert_eq!(models.enum_style, EnumStyle::Union);
        assert_eq!(models.type_mappings["time.Time"], "string /* RFC3339 */");

        let api = config.package_config("./internal/api").unwrap();
        assert_eq!(api.indent, "\t");
        assert_eq!(api.fallback_type, "unknown");
        assert_eq!(api.flavor, Flavor::Default);
        assert_eq!(api.enum_style, EnumStyle::Const);
    }

    #[test]
    fn test_empty_strings_mean_default() {
        let yaml = "packages:\n  - path: x\n    flavor: \"\"\n    preserve_comments: \"\"\n    enum_style: \"\"\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let pkg = config.package_config("x").unwrap();
        assert_eq!(pkg.flavor, Flavor::Default);
        assert_eq!(pkg.preserve_comments, CommentLevel::Default);
        assert_eq!(pkg.enum_style, EnumStyle::Const);
    }

    #[test]
    fn test_unknown_option_value_is_rejected() {
        let yaml = "packages:\n  - path: x\n    flavor: toml\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_missing_package() {
        let config = Config::default();
        assert!(matches!(
            config.package_config("nope"),
            Err(ConfigError::PackageNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_file_filters() {
        let mut pkg = PackageConfig {
            exclude_files: vec!["private.go".to_string()],
            ..PackageConfig::default()
        };
        assert!(pkg.is_file_ignored(Path::new("models/private.go")));
        assert!(!pkg.is_file_ignored(Path::new("models/public.go")));

        pkg.include_files = vec!["public.go".to_string()];
        assert!(!pkg.is_file_ignored(Path::new("models/public.go")));
        assert!(pkg.is_file_ignored(Path::new("models/other.go")));
    }

    #[test]
    fn test_resolved_output_path() {
        let dir = Path::new("pkg/models");
        let mut pkg = PackageConfig::default();
        assert_eq!(pkg.resolved_output_path(dir), PathBuf::from("pkg/models/index.ts"));

        pkg.output_path = "web/types".to_string();
        assert_eq!(pkg.resolved_output_path(dir), PathBuf::from("web/types/index.ts"));

        pkg.output_path = "web/models.ts".to_string();
        assert_eq!(pkg.resolved_output_path(dir), PathBuf::from("web/models.ts"));
    }
}
