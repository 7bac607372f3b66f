//! Type expression translation.
//!
//! Rendering depends only on the node, its direct parent (for
//! parenthesization) and the nesting depth (for inline structs).

use super::Emitter;
use crate::ast::{BinaryOp, InterfaceElem, InterfaceElemKind, LitKind, Literal, TypeExpr, UnaryOp};
use crate::error::{ErrorKind, GenerateError};
use crate::literal::unquote_rune;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    static ref OCTAL_PREFIX: Regex = Regex::new(r"^0[0-7]").unwrap();
    static ref BACKQUOTE_ESCAPE: Regex = Regex::new(r"([$\\])").unwrap();
    static ref UNICODE8: Regex = Regex::new(r"\\\\|\\U[0-9a-fA-F]{8}").unwrap();
}

/// TypeScript spelling of a Go identifier
pub(crate) fn ident_type(name: &str) -> Cow<'_, str> {
    match name {
        "bool" => Cow::Borrowed("boolean"),
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32" | "uint64"
        | "uintptr" | "byte" | "rune" | "float32" | "float64" | "complex64" | "complex128" => {
            Cow::Owned(format!("number /* {name} */"))
        }
        _ => Cow::Borrowed(name),
    }
}

impl Emitter<'_> {
    pub(crate) fn translate(
        &self,
        t: &TypeExpr,
        parent: Option<&TypeExpr>,
        depth: usize,
        optional_parens: bool,
    ) -> Result<String, GenerateError> {
        let mut s = String::new();
        self.write_type(&mut s, t, parent, depth, optional_parens)?;
        Ok(s)
    }

    pub(crate) fn write_type(
        &self,
        s: &mut String,
        t: &TypeExpr,
        parent: Option<&TypeExpr>,
        depth: usize,
        optional_parens: bool,
    ) -> Result<(), GenerateError> {
        match t {
            TypeExpr::Pointer(inner) => {
                let parens = optional_parens || matches!(parent, Some(TypeExpr::Binary { .. }));
                if parens {
                    s.push('(');
                }
                self.write_type(s, inner, Some(t), depth, false)?;
                s.push_str(" | undefined");
                if parens {
                    s.push(')');
                }
            }
            TypeExpr::Array { elem, .. } => {
                if elem.ident() == Some("byte") {
                    s.push_str("string");
                } else {
                    self.write_type(s, elem, Some(t), depth, true)?;
                    s.push_str("[]");
                }
            }
            TypeExpr::Struct(fields) => {
                s.push_str("{\n");
                self.write_struct_fields(s, fields, depth + 1)?;
                self.write_indent(s, depth + 1);
                s.push('}');
            }
            TypeExpr::Named(name) => {
                if name == "any" {
                    s.push_str(&ident_type(&self.conf.fallback_type));
                } else {
                    s.push_str(&ident_type(name));
                }
            }
            TypeExpr::TypeParam(name) => s.push_str(name),
            TypeExpr::Qualified { package, name } => {
                let long_type = format!("{package}.{name}");
                match self.conf.type_mappings.get(&long_type) {
                    Some(mapped) => s.push_str(mapped),
                    None => {
                        s.push_str(&self.conf.fallback_type);
                        s.push_str(" /* ");
                        s.push_str(&long_type);
                        s.push_str(" */");
                    }
                }
            }
            TypeExpr::Map { key, value } => {
                s.push_str("{ [key: ");
                self.write_type(s, key, Some(t), depth, false)?;
                s.push_str("]: ");
                self.write_type(s, value, Some(t), depth, false)?;
                s.push('}');
            }
            TypeExpr::Literal(lit) => s.push_str(&render_literal(lit)?),
            TypeExpr::Paren(inner) => {
                s.push('(');
                self.write_type(s, inner, Some(t), depth, false)?;
                s.push(')');
            }
            TypeExpr::Binary { op, lhs, rhs } => {
                let parens = match parent {
                    Some(TypeExpr::Binary { op: parent_op, .. }) => op.precedence() < parent_op.precedence(),
                    _ => false,
                };
                if parens {
                    s.push('(');
                }
                self.write_type(s, lhs, Some(t), depth, false)?;
                if *op == BinaryOp::AndNot {
                    s.push_str(" & ~");
                } else {
                    s.push(' ');
                    s.push_str(op.as_str());
                    s.push(' ');
                }
                self.write_type(s, rhs, Some(t), depth, false)?;
                if parens {
                    s.push(')');
                }
            }
            TypeExpr::Unary { op, operand } => match op {
                // Approximation constraints have no TypeScript counterpart.
                UnaryOp::Tilde => self.write_type(s, operand, Some(t), depth, false)?,
                UnaryOp::Xor => {
                    s.push('~');
                    self.write_type(s, operand, Some(t), depth, false)?;
                }
                UnaryOp::Plus | UnaryOp::Minus | UnaryOp::Not => {
                    s.push_str(op.as_str());
                    self.write_type(s, operand, Some(t), depth, false)?;
                }
                UnaryOp::Deref | UnaryOp::Addr | UnaryOp::Recv => {
                    return Err(GenerateError::new(
                        ErrorKind::UnhandledOperator,
                        format!("unhandled unary operator `{}`", op.as_str()),
                    ));
                }
            },
            TypeExpr::Interface(elems) => self.write_interface_fields(s, elems, depth + 1)?,
            TypeExpr::Generic { base, args } => {
                self.write_type(s, base, Some(t), depth, false)?;
                s.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        s.push_str(", ");
                    }
                    self.write_type(s, arg, Some(t), depth, false)?;
                }
                s.push('>');
            }
            TypeExpr::Opaque(_) => s.push_str(&self.conf.fallback_type),
        }
        Ok(())
    }

    /// Type-set elements of an interface joined by `&`; method sets become the fallback type.
    pub(crate) fn write_interface_fields(
        &self,
        s: &mut String,
        elems: &[InterfaceElem],
        depth: usize,
    ) -> Result<(), GenerateError> {
        let mut wrote_any = false;
        for elem in elems {
            let InterfaceElemKind::Type(ty) = &elem.kind else {
                continue;
            };
            if wrote_any {
                s.push_str(" &\n");
            } else {
                // Leading newline so element docs render on their own lines
                s.push('\n');
                wrote_any = true;
            }

            if self.preserve_type_comments() {
                if let Some(doc) = &elem.doc {
                    self.write_comment_group(s, doc, depth + 1);
                }
            }
            self.write_indent(s, depth + 1);
            self.write_type(s, ty, None, depth, false)?;

            if let (Some(comment), true) = (&elem.comment, self.preserve_type_comments()) {
                s.push_str(" // ");
                s.push_str(&comment.text());
            }
        }
        if !wrote_any {
            s.push_str(&self.conf.fallback_type);
        }
        Ok(())
    }
}

/// Render a basic literal as a TypeScript literal
pub(crate) fn render_literal(lit: &Literal) -> Result<String, GenerateError> {
    Ok(match lit.kind {
        LitKind::Int if OCTAL_PREFIX.is_match(&lit.raw) => format!("0o{}", &lit.raw[1..]),
        LitKind::Char => {
            let c = unquote_rune(&lit.raw).map_err(|reason| {
                GenerateError::new(ErrorKind::InvalidLiteral, format!("invalid rune literal {}: {reason}", lit.raw))
            })?;
            let code = u32::from(c);
            if code > 0xFFFF {
                format!("0x{code:08X} /* {} */", lit.raw)
            } else {
                format!("0x{code:04X} /* {} */", lit.raw)
            }
        }
        LitKind::String if lit.raw.starts_with('`') => BACKQUOTE_ESCAPE.replace_all(&lit.raw, r"\$1").into_owned(),
        LitKind::String => UNICODE8
            .replace_all(&lit.raw, |caps: &regex::Captures<'_>| {
                let m = &caps[0];
                if m.len() == 10 {
                    format!("\\u{{{}}}", m[2..].to_uppercase())
                } else {
                    m.to_string()
                }
            })
            .into_owned(),
        _ => lit.raw.clone(),
    })
}
