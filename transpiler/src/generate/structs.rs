//! Struct, interface and type declarations.

use super::tags::{extends_tag, is_valid_js_name, resolve_field, FieldDisposition, TagError};
use super::types::ident_type;
use super::{Emitter, PackageContext};
use crate::ast::{is_exported, CommentGroup, Field, Span, TypeExpr, TypeParam, TypeSpec};
use crate::config::OptionalStyle;
use crate::error::{ErrorKind, GenerateError};
use tracing::warn;

fn malformed_tag(err: TagError, span: Span) -> GenerateError {
    GenerateError::new(ErrorKind::MalformedTag, err.to_string()).or_at(span)
}

impl Emitter<'_> {
    pub(crate) fn write_type_spec(
        &self,
        s: &mut String,
        ts: &TypeSpec,
        group_doc: Option<&CommentGroup>,
        ctx: &PackageContext,
    ) -> Result<(), GenerateError> {
        if ctx.generated_names.contains(&ts.name.name) {
            return Ok(());
        }

        self.write_doc(s, ts.doc.as_ref().or(group_doc), 0);

        let name = &ts.name.name;
        match &ts.ty {
            TypeExpr::Struct(fields) => {
                s.push_str("export interface ");
                s.push_str(name);
                self.write_type_params(s, &ts.type_params)?;

                let mut extends = Vec::new();
                if !self.conf.extends.is_empty() {
                    extends.push(self.conf.extends.clone());
                }
                extends.extend(self.inherited_types(fields)?);
                if !extends.is_empty() {
                    s.push_str(" extends ");
                    s.push_str(&extends.join(", "));
                }

                s.push_str(" {\n");
                self.write_struct_fields(s, fields, 0)?;
                s.push('}');
            }
            TypeExpr::Named(ident) if ts.type_params.is_empty() => {
                s.push_str("export type ");
                s.push_str(name);
                s.push_str(" = ");
                s.push_str(&ident_type(ident));
                s.push(';');
            }
            ty => {
                s.push_str("export type ");
                s.push_str(name);
                self.write_type_params(s, &ts.type_params)?;
                s.push_str(" = ");
                self.write_type(s, ty, None, 0, true).map_err(|e| e.or_at(ts.span))?;
                s.push(';');
            }
        }

        match &ts.comment {
            Some(comment) if self.preserve_type_comments() => self.write_single_line_comment(s, comment),
            _ => s.push('\n'),
        }
        Ok(())
    }

    /// `<A extends C, B extends C>`; nothing for a non-generic declaration
    pub(crate) fn write_type_params(&self, s: &mut String, params: &[TypeParam]) -> Result<(), GenerateError> {
        if params.is_empty() {
            return Ok(());
        }
        s.push('<');
        let mut first = true;
        for param in params {
            for name in &param.names {
                if !first {
                    s.push_str(", ");
                }
                first = false;
                s.push_str(&name.name);
                s.push_str(" extends ");
                self.write_type(s, &param.constraint, None, 0, true)?;
            }
        }
        s.push('>');
        Ok(())
    }

    pub(crate) fn write_struct_fields(&self, s: &mut String, fields: &[Field], depth: usize) -> Result<(), GenerateError> {
        for field in fields {
            if field.is_embedded() {
                if let Some(name) = anonymous_field_name(&field.ty, self) {
                    self.write_field(s, field, &name, depth)?;
                }
                continue;
            }
            for ident in &field.names {
                self.write_field(s, field, &ident.name, depth)?;
            }
        }
        Ok(())
    }

    fn write_field(&self, s: &mut String, field: &Field, field_name: &str, depth: usize) -> Result<(), GenerateError> {
        let disposition = resolve_field(field_name, field.tag.as_deref(), field.ty.is_pointer(), self.conf.flavor)
            .map_err(|err| malformed_tag(err, field.span))?;
        let FieldDisposition::Emit(policy) = disposition else {
            return Ok(());
        };

        self.write_doc(s, field.doc.as_ref(), depth + 1);

        self.write_indent(s, depth + 1);
        let quoted = !is_valid_js_name(&policy.name);
        if quoted {
            s.push('\'');
        }
        if policy.readonly {
            s.push_str("readonly ");
        }
        s.push_str(&policy.name);
        if quoted {
            s.push('\'');
        }
        if policy.optional && self.conf.optional_type == OptionalStyle::Undefined {
            s.push('?');
        }
        s.push_str(": ");

        match &policy.type_override {
            Some(ty) => s.push_str(ty),
            None => {
                let ty = match &field.ty {
                    TypeExpr::Pointer(inner) => inner.as_ref(),
                    ty => ty,
                };
                self.write_type(s, ty, None, depth, false).map_err(|e| e.or_at(field.span))?;
            }
        }
        if policy.optional && self.conf.optional_type == OptionalStyle::Null {
            s.push_str(" | null");
        }
        s.push(';');

        match &field.comment {
            Some(comment) if self.preserve_type_comments() => {
                s.push_str(" // ");
                s.push_str(&comment.text());
            }
            _ => s.push('\n'),
        }
        Ok(())
    }

    /// Types named by `tstype:",extends"` embedded fields, in field order
    fn inherited_types(&self, fields: &[Field]) -> Result<Vec<String>, GenerateError> {
        let mut inherited = Vec::new();
        for field in fields {
            let Some(tag) = field.tag.as_deref() else {
                continue;
            };
            let Some(tag) = extends_tag(tag).map_err(|err| malformed_tag(err, field.span))? else {
                continue;
            };

            let (ty, partial) = match &field.ty {
                TypeExpr::Pointer(inner) => (inner.as_ref(), !tag.has_option("required")),
                ty => (ty, false),
            };
            let Some(long_type) = self.inherited_name(ty).map_err(|e| e.or_at(field.span))? else {
                warn!(span = ?field.span.start, "skipping extends of a type that is not an exported struct");
                continue;
            };

            let name = self.conf.type_mappings.get(&long_type).cloned().unwrap_or(long_type);
            if partial {
                inherited.push(format!("Partial<{name}>"));
            } else {
                inherited.push(name);
            }
        }
        Ok(inherited)
    }

    /// Name an extends candidate may be written as; `None` when it cannot be extended.
    fn inherited_name(&self, ty: &TypeExpr) -> Result<Option<String>, GenerateError> {
        Ok(match ty {
            TypeExpr::Named(name) => {
                let valid = match self.metadata.local_type(name) {
                    Some(local) => local.is_struct && local.exported,
                    // Declared outside the files being generated
                    None => is_exported(name),
                };
                valid.then(|| name.clone())
            }
            TypeExpr::Qualified { package, name } => is_exported(name).then(|| format!("{package}.{name}")),
            TypeExpr::Generic { base, args } => {
                let Some(base) = self.inherited_name(base)? else {
                    return Ok(None);
                };
                let args = args.iter().map(type_argument_name).collect::<Result<Vec<_>, _>>()?;
                Some(format!("{base}<{}>", args.join(", ")))
            }
            _ => None,
        })
    }
}

fn type_argument_name(arg: &TypeExpr) -> Result<String, GenerateError> {
    match arg {
        TypeExpr::Named(name) | TypeExpr::TypeParam(name) => Ok(ident_type(name).into_owned()),
        TypeExpr::Qualified { package, name } => Ok(format!("{package}.{name}")),
        _ => Err(GenerateError::new(
            ErrorKind::UnsupportedExtends,
            "extended generic types may only take named type arguments",
        )),
    }
}

/// Property name of an embedded field, when its type has an exported name
fn anonymous_field_name(ty: &TypeExpr, emitter: &Emitter<'_>) -> Option<String> {
    match ty {
        TypeExpr::Named(name) => {
            let exported = match emitter.metadata.local_type(name) {
                Some(local) => local.exported,
                None => is_exported(name),
            };
            exported.then(|| name.clone())
        }
        TypeExpr::Qualified { name, .. } => is_exported(name).then(|| name.clone()),
        TypeExpr::Generic { base, .. } | TypeExpr::Pointer(base) => anonymous_field_name(base, emitter),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CommentLevel, PackageConfig};
    use crate::parser::{GoParser, Parser};
    use crate::transform::{standard_plugins, TransformMetadata};
    use crate::ast::Spec;

    fn render_with(conf: PackageConfig, source: &str) -> Result<String, GenerateError> {
        let file = GoParser::new().parse(source).unwrap();
        let mut transformer = standard_plugins();
        let metadata: TransformMetadata = transformer.transform(std::slice::from_ref(&file)).clone();
        let conf = conf.normalize();
        let emitter = Emitter::new(&conf, &metadata);
        let ctx = PackageContext::default();
        let mut s = String::new();
        for decl in &file.decls {
            for spec in &decl.specs {
                if let Spec::Type(ts) = spec {
                    emitter.write_type_spec(&mut s, ts, None, &ctx)?;
                }
            }
        }
        Ok(s)
    }

    fn render(source: &str) -> String {
        render_with(PackageConfig::default(), source).unwrap()
    }

    #[test]
    fn test_optional_pointer_field() {
        let out = render("package x\n\ntype Foo struct {\n\tBar *string `json:\"bar,omitempty\"`\n}\n");
        assert_eq!(out, "export interface Foo {\n  bar?: string;\n}\n");
    }

    #[test]
    fn test_null_optional_style() {
        let conf = PackageConfig { optional_type: OptionalStyle::Null, ..PackageConfig::default() };
        let out = render_with(conf, "package x\n\ntype Foo struct {\n\tBar *int\n\tWhen string `json:\",omitempty\" tstype:\"Date\"`\n}\n").unwrap();
        assert_eq!(out, "export interface Foo {\n  Bar: number /* int */ | null;\n  When: Date | null;\n}\n");
    }

    #[test]
    fn test_suppressed_and_quoted_fields() {
        let source = "package x\n\ntype Foo struct {\n\thidden int\n\tSecret string `json:\"-\"`\n\tType string `json:\"content-type\" tstype:\",readonly\"`\n\tA, B bool\n}\n";
        let out = render(source);
        assert_eq!(
            out,
            "export interface Foo {\n  'readonly content-type': string;\n  A: boolean;\n  B: boolean;\n}\n"
        );
    }

    #[test]
    fn test_field_comments() {
        let source = "package x\n\n// Foo is documented\ntype Foo struct {\n\t// The bar\n\tBar int // trailing\n}\n";
        let file = GoParser::new().parse(source).unwrap();
        // A lone declaration's doc belongs to the declaration, not the spec.
        assert!(file.decls[0].doc.is_some());
        let out = render(source);
        assert_eq!(out, "export interface Foo {\n  /**\n   * The bar\n   */\n  Bar: number /* int */; // trailing\n}\n");

        let none = render_with(PackageConfig { preserve_comments: CommentLevel::None, ..PackageConfig::default() }, source).unwrap();
        assert_eq!(none, "export interface Foo {\n  Bar: number /* int */;\n}\n");
    }

    #[test]
    fn test_inline_struct_in_map() {
        let source = "package x\n\ntype Prefs struct {\n\tPrefs map[string]struct {\n\t\tFoo uint32 `json:\"foo\"`\n\t} `json:\"prefs\"`\n}\n";
        let out = render(source);
        assert_eq!(
            out,
            "export interface Prefs {\n  prefs: { [key: string]: {\n    foo: number /* uint32 */;\n  }};\n}\n"
        );
    }

    #[test]
    fn test_embedded_fields() {
        let source = "package x\n\ntype Base struct{}\n\ntype hidden struct{}\n\ntype Foo struct {\n\tBase\n\t*Other\n\thidden\n\tPage[int]\n}\n";
        let out = render(source);
        assert!(out.contains("export interface Foo {\n  Base: Base;\n  Other?: Other;\n  Page: Page<number /* int */>;\n}\n"), "{out}");
    }

    #[test]
    fn test_extends() {
        let source = "package x\n\ntype Base struct{}\n\ntype Alias string\n\ntype Foo struct {\n\tBase `tstype:\",extends\"`\n\t*Other `tstype:\",extends\"`\n\t*Req `tstype:\",extends,required\"`\n\tAlias `tstype:\",extends\"`\n\tName string\n}\n";
        let out = render(source);
        assert!(
            out.contains("export interface Foo extends Base, Partial<Other>, Req {\n  Name: string;\n}\n"),
            "{out}"
        );
    }

    #[test]
    fn test_extends_generic_mapped_and_default() {
        let mut conf = PackageConfig { extends: "Model".to_string(), ..PackageConfig::default() };
        conf.type_mappings.insert("db.Row".to_string(), "Row".to_string());
        let source = "package x\n\ntype Foo[T any] struct {\n\tdb.Row `tstype:\",extends\"`\n\tPage[T, string] `tstype:\",extends\"`\n}\n";
        let out = render_with(conf, source).unwrap();
        assert_eq!(out, "export interface Foo<T extends any> extends Model, Row, Page<T, string> {\n}\n");
    }

    #[test]
    fn test_extends_with_opaque_argument_fails() {
        let source = "package x\n\ntype Foo struct {\n\tPage[map[string]int] `tstype:\",extends\"`\n}\n";
        let err = render_with(PackageConfig::default(), source).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedExtends);
    }

    #[test]
    fn test_malformed_tag() {
        let err = render_with(PackageConfig::default(), "package x\n\ntype Foo struct {\n\tBar int `json`\n}\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedTag);
        assert!(err.span.is_some());
    }

    #[test]
    fn test_alias_and_generic_types() {
        let source = "package x\n\ntype ID int64\n\ntype Something any\n\ntype List[T comparable] []*T\n\ntype Fn func()\n";
        let out = render(source);
        assert_eq!(
            out,
            "export type ID = number /* int64 */;\nexport type Something = any;\nexport type List<T extends comparable> = (T | undefined)[];\nexport type Fn = any;\n"
        );
    }

    #[test]
    fn test_pointer_alias_is_parenthesized() {
        assert_eq!(render("package x\n\ntype P *string\n"), "export type P = (string | undefined);\n");
    }

    #[test]
    fn test_union_interface() {
        let source = "package x\n\ntype Number interface {\n\t~int | ~float64\n}\n\ntype Stringer interface {\n\tString() string\n}\n";
        let out = render(source);
        assert_eq!(
            out,
            "export type Number = \n    number /* int */ | number /* float64 */;\nexport type Stringer = any;\n"
        );
    }

    #[test]
    fn test_shared_constraint() {
        let out = render("package x\n\ntype Pair[K, V string | int] struct {\n\tKey K\n}\n");
        assert_eq!(
            out,
            "export interface Pair<K extends string | number /* int */, V extends string | number /* int */> {\n  Key: K;\n}\n"
        );
    }

    #[test]
    fn test_skips_generated_names() {
        let file = GoParser::new().parse("package x\n\ntype Status int\n").unwrap();
        let metadata = TransformMetadata::new();
        let conf = PackageConfig::default().normalize();
        let mut ctx = PackageContext::default();
        ctx.generated_names.insert("Status".to_string());
        let Spec::Type(ts) = &file.decls[0].specs[0] else {
            panic!("expected type spec");
        };
        let mut s = String::new();
        Emitter::new(&conf, &metadata).write_type_spec(&mut s, ts, None, &ctx).unwrap();
        assert!(s.is_empty());
    }
}
