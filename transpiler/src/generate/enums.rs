//! TypeScript enums and literal unions synthesized from constant groups.

use super::iota::replace_iota;
use super::tags::is_valid_js_name;
use super::Emitter;
use crate::ast::{CommentGroup, DeclKind, GenDecl, Spec, TypeExpr, ValueSpec};
use crate::config::EnumStyle;
use crate::error::GenerateError;
use tracing::trace;

/// A constant group that reads as an enumeration
#[derive(Debug)]
pub(crate) struct EnumGroup<'d> {
    pub type_name: String,
    pub prefix: String,
    pub members: Vec<EnumMember<'d>>,
    pub doc: Option<&'d CommentGroup>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct EnumMember<'d> {
    /// Position of the spec within its declaration
    pub spec_index: usize,
    pub name: &'d str,
    pub spec: &'d ValueSpec,
}

impl EnumGroup<'_> {
    pub(crate) fn contains(&self, spec_index: usize) -> bool {
        self.members.iter().any(|m| m.spec_index == spec_index)
    }
}

fn explicit_type_name(vs: &ValueSpec) -> Option<&str> {
    vs.ty.as_ref().and_then(TypeExpr::ident)
}

/// Recognize a constant group that should become an enum or union.
pub(crate) fn detect_enum_group(decl: &GenDecl, style: EnumStyle) -> Option<EnumGroup<'_>> {
    if decl.kind != DeclKind::Const || decl.specs.len() < 2 {
        return None;
    }
    if !matches!(style, EnumStyle::Enum | EnumStyle::Union) {
        return None;
    }

    let mut candidates = Vec::new();
    let mut common_type = None;
    let mut prefix = None;
    for (spec_index, spec) in decl.specs.iter().enumerate() {
        let Spec::Value(vs) = spec else {
            continue;
        };
        // First exported name of each spec only
        let Some(name) = vs.names.iter().find(|n| n.is_exported() && !n.is_blank()) else {
            continue;
        };
        candidates.push(EnumMember {
            spec_index,
            name: &name.name,
            spec: vs,
        });

        if common_type.is_none() {
            if let Some(type_name) = explicit_type_name(vs) {
                common_type = Some(type_name.to_string());
                if name.name.starts_with(type_name) {
                    prefix = Some(type_name.to_string());
                }
            }
        }
    }
    if candidates.len() < 2 {
        return None;
    }

    let (type_name, prefix) = match (common_type, prefix) {
        (Some(common_type), Some(prefix)) => (common_type, prefix),
        _ => {
            let prefix = common_prefix(&candidates)?;
            (prefix.clone(), prefix)
        }
    };

    let members: Vec<_> = candidates
        .into_iter()
        .filter(|m| m.name.len() > prefix.len() && m.name.starts_with(&prefix))
        .filter(|m| explicit_type_name(m.spec).is_none_or(|t| t == type_name))
        .collect();
    if members.len() < 2 {
        return None;
    }

    trace!(%type_name, %prefix, members = members.len(), "detected enum group");
    Some(EnumGroup {
        type_name,
        prefix,
        members,
        doc: decl.doc.as_ref(),
    })
}

/// Longest prefix of the first name shared by every candidate, starting with
/// an upper-case letter and strictly shorter than each name.
fn common_prefix(candidates: &[EnumMember<'_>]) -> Option<String> {
    let first = candidates.first()?.name;
    if !first.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }
    let boundaries: Vec<usize> = first.char_indices().map(|(i, _)| i).skip(1).collect();
    boundaries
        .into_iter()
        .rev()
        .map(|len| &first[..len])
        .find(|prefix| candidates.iter().all(|m| m.name.len() > prefix.len() && m.name.starts_with(prefix)))
        .map(str::to_string)
}

impl Emitter<'_> {
    /// `carried` holds the resolved value pattern of every spec of the declaration.
    pub(crate) fn write_enum(
        &self,
        s: &mut String,
        group: &EnumGroup<'_>,
        carried: &[Option<String>],
    ) -> Result<(), GenerateError> {
        self.write_doc(s, group.doc, 0);
        s.push_str("export enum ");
        s.push_str(&group.type_name);
        s.push_str(" {\n");

        for member in &group.members {
            let vs = member.spec;
            self.write_doc(s, vs.doc.as_ref(), 1);
            self.write_indent(s, 1);

            let name = &member.name[group.prefix.len()..];
            if is_valid_js_name(name) {
                s.push_str(name);
            } else {
                s.push('\'');
                s.push_str(name);
                s.push('\'');
            }

            // Skipped specs still take an iota slot.
            if let Some(pattern) = carried.get(member.spec_index).and_then(Option::as_ref) {
                s.push_str(" = ");
                s.push_str(&replace_iota(pattern, member.spec_index as i64));
            }
            s.push(',');

            match &vs.comment {
                Some(comment) if self.preserve_doc_comments() => self.write_single_line_comment(s, comment),
                _ => s.push('\n'),
            }
        }
        s.push_str("}\n");
        Ok(())
    }

    pub(crate) fn write_union(
        &self,
        s: &mut String,
        group: &EnumGroup<'_>,
        carried: &[Option<String>],
    ) -> Result<(), GenerateError> {
        for member in &group.members {
            let vs = member.spec;
            self.write_doc(s, vs.doc.as_ref(), 0);
            s.push_str("export const ");
            s.push_str(member.name);
            s.push_str(" = ");
            match carried.get(member.spec_index).and_then(Option::as_ref) {
                Some(pattern) => s.push_str(&replace_iota(pattern, member.spec_index as i64)),
                None => s.push_str("undefined"),
            }
            s.push(';');

            match &vs.comment {
                Some(comment) if self.preserve_doc_comments() => self.write_single_line_comment(s, comment),
                _ => s.push('\n'),
            }
        }

        self.write_doc(s, group.doc, 0);
        s.push_str("export type ");
        s.push_str(&group.type_name);
        s.push_str(" = ");
        for (i, member) in group.members.iter().enumerate() {
            if i > 0 {
                s.push_str(" | ");
            }
            s.push_str("typeof ");
            s.push_str(member.name);
        }
        s.push_str(";\n");
        Ok(())
    }
}
