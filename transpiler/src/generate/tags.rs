//! Struct tag parsing and the per-field naming/optionality policy.

use crate::config::Flavor;
use crate::literal::unquote_string;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("bad syntax for struct tag pair")]
    PairSyntax,
    #[error("bad syntax for struct tag key")]
    KeySyntax,
    #[error("bad syntax for struct tag value")]
    ValueSyntax,
}

/// One `key:"name,opt1,opt2"` entry of a struct tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub name: String,
    pub options: Vec<String>,
}

impl Tag {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTag {
    tags: Vec<Tag>,
}

impl StructTag {
    /// Parse a tag in the conventional `key:"value" key2:"value2"` format.
    pub fn parse(tag: &str) -> Result<Self, TagError> {
        let mut tags = Vec::new();
        let mut rest = tag;
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            // Key: up to the colon, no control chars, spaces or quotes.
            let key_len = rest
                .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
                .unwrap_or(rest.len());
            if key_len == 0 {
                return Err(TagError::KeySyntax);
            }
            let key = &rest[..key_len];
            rest = &rest[key_len..];
            if !rest.starts_with(':') {
                return Err(TagError::PairSyntax);
            }
            rest = &rest[1..];
            if !rest.starts_with('"') {
                return Err(TagError::ValueSyntax);
            }

            // Quoted value, honoring escapes.
            let bytes = rest.as_bytes();
            let mut end = 1;
            while end < bytes.len() && bytes[end] != b'"' {
                if bytes[end] == b'\\' {
                    end += 1;
                }
                end += 1;
            }
            if end >= bytes.len() {
                return Err(TagError::ValueSyntax);
            }
            let quoted = &rest[..=end];
            rest = &rest[end + 1..];
            let value = unquote_string(quoted).map_err(|_| TagError::ValueSyntax)?;

            let mut parts = value.split(',');
            let name = parts.next().unwrap_or_default().to_string();
            let options = parts.map(str::to_string).collect();
            tags.push(Tag {
                key: key.to_string(),
                name,
                options,
            });
        }
        Ok(Self { tags })
    }

    /// First tag with the given key
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key == key)
    }
}

/// Output decisions for one struct field
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldPolicy {
    pub name: String,
    pub optional: bool,
    pub readonly: bool,
    /// Explicit TypeScript type from the `tstype` tag
    pub type_override: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldDisposition {
    Emit(FieldPolicy),
    /// Not part of the output at all
    Suppressed,
    /// Contributes to the `extends` clause instead of a property
    Extends,
}

/// Resolve the name, optionality and qualifiers of a field from its tag.
///
/// `field_name` is the Go identifier (or the derived name of an embedded field).
pub(crate) fn resolve_field(
    field_name: &str,
    tag: Option<&str>,
    is_pointer: bool,
    flavor: Flavor,
) -> Result<FieldDisposition, TagError> {
    if !field_name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Ok(FieldDisposition::Suppressed);
    }

    let mut name = String::new();
    let mut optional = false;
    let mut required = false;
    let mut readonly = false;
    let mut type_override = None;

    if let Some(tag) = tag {
        let tags = StructTag::parse(tag)?;
        if let Some(json) = tags.get("json") {
            if json.name == "-" {
                return Ok(FieldDisposition::Suppressed);
            }
            name = json.name.clone();
            optional = json.has_option("omitempty") || json.has_option("omitzero");
        }
        if let Some(yaml) = tags.get("yaml") {
            if yaml.name == "-" {
                return Ok(FieldDisposition::Suppressed);
            }
            name = yaml.name.clone();
            optional = yaml.has_option("omitempty");
        }
        if let Some(tstype) = tags.get("tstype") {
            if tstype.name == "-" {
                return Ok(FieldDisposition::Suppressed);
            }
            if tstype.has_option("extends") {
                return Ok(FieldDisposition::Extends);
            }
            if !tstype.name.is_empty() {
                type_override = Some(tstype.name.clone());
            }
            required = tstype.has_option("required");
            readonly = tstype.has_option("readonly");
        }
    }

    if name.is_empty() {
        name = match flavor {
            Flavor::Yaml => field_name.to_lowercase(),
            Flavor::Default => field_name.to_string(),
        };
    }

    Ok(FieldDisposition::Emit(FieldPolicy {
        name,
        optional: (optional || is_pointer) && !required,
        readonly,
        type_override,
    }))
}

/// Whether the `extends` option is set on the `tstype` tag
pub(crate) fn extends_tag(tag: &str) -> Result<Option<Tag>, TagError> {
    let tags = StructTag::parse(tag)?;
    Ok(tags.get("tstype").filter(|t| t.has_option("extends")).cloned())
}

/// Whether `name` can be written as a bare property key
pub(crate) fn is_valid_js_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
