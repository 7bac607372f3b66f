//! Declaration groups: carried type/value state across `const (...)` blocks.

use super::enums::detect_enum_group;
use super::iota::replace_iota;
use super::{Emitter, PackageContext};
use crate::ast::{CommentGroup, GenDecl, Spec, ValueSpec};
use crate::config::EnumStyle;
use crate::error::GenerateError;
use tracing::debug;

/// State threaded through the specs of one declaration
#[derive(Debug)]
pub(crate) struct GroupContext<'d> {
    pub is_grouped: bool,
    pub doc: Option<&'d CommentGroup>,
    /// Rendered type of the nearest explicitly typed spec
    pub group_type: String,
    /// Rendered value of the nearest spec with a value
    pub group_value: String,
    pub iota_value: i64,
}

impl<'d> GroupContext<'d> {
    pub(crate) fn new(decl: &'d GenDecl) -> Self {
        Self {
            is_grouped: decl.is_grouped(),
            doc: decl.doc.as_ref(),
            group_type: String::new(),
            group_value: String::new(),
            iota_value: -1,
        }
    }

    /// Group doc standing in for specs without their own
    fn fallback_doc(&self) -> Option<&'d CommentGroup> {
        if self.is_grouped { self.doc } else { None }
    }
}

impl Emitter<'_> {
    pub(crate) fn write_group_decl(
        &self,
        s: &mut String,
        decl: &GenDecl,
        ctx: &mut PackageContext,
    ) -> Result<(), GenerateError> {
        let grouped = decl.is_grouped();
        if !grouped {
            let exported = match decl.specs.first() {
                // A synthesized enum replaces the type, doc included.
                Some(Spec::Type(ts)) => ts.name.is_exported() && !ctx.generated_names.contains(&ts.name.name),
                Some(Spec::Value(vs)) => vs.names.first().is_some_and(|n| n.is_exported()),
                None => false,
            };
            if !exported {
                return Ok(());
            }
        }

        let enum_group = detect_enum_group(decl, self.conf.enum_style);
        if let Some(group) = &enum_group {
            debug!(type_name = %group.type_name, style = ?self.conf.enum_style, "synthesizing enum");
            let carried = self.carried_values(decl)?;
            match self.conf.enum_style {
                EnumStyle::Union => self.write_union(s, group, &carried)?,
                _ => self.write_enum(s, group, &carried)?,
            }
            ctx.generated_names.insert(group.type_name.clone());
        }

        if !grouped {
            self.write_doc(s, decl.doc.as_ref(), 0);
        }

        let mut group = GroupContext::new(decl);
        for (spec_index, spec) in decl.specs.iter().enumerate() {
            match spec {
                Spec::Value(vs) => {
                    // Members already written keep the carried state moving.
                    let emit = !enum_group.as_ref().is_some_and(|g| g.contains(spec_index));
                    self.write_value_spec(s, vs, &mut group, emit)?;
                }
                Spec::Type(ts) => {
                    if ts.name.is_exported() {
                        self.write_type_spec(s, ts, group.fallback_doc(), ctx)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Value pattern each spec resolves to once carry-forward is applied, by spec index.
    ///
    /// Type specs, specs without an exported name and specs before the first
    /// explicit value resolve to `None`.
    pub(crate) fn carried_values(&self, decl: &GenDecl) -> Result<Vec<Option<String>>, GenerateError> {
        let mut group = GroupContext::new(decl);
        let mut carried = Vec::with_capacity(decl.specs.len());
        for spec in &decl.specs {
            let Spec::Value(vs) = spec else {
                carried.push(None);
                continue;
            };
            // Enum members are named by the first exported name of their spec.
            let member = vs.names.iter().position(|n| n.is_exported() && !n.is_blank());
            let mut pattern = None;
            for i in 0..vs.names.len() {
                self.advance(&mut group, vs, i)?;
                if member == Some(i) && !group.group_value.is_empty() {
                    pattern = Some(group.group_value.clone());
                }
            }
            carried.push(pattern);
        }
        Ok(carried)
    }

    /// Move the carried state past the `i`-th name of a spec, returning its explicit type.
    fn advance(&self, group: &mut GroupContext<'_>, vs: &ValueSpec, i: usize) -> Result<Option<String>, GenerateError> {
        group.iota_value += 1;

        let value = vs.values.get(i);
        if value.is_some() {
            group.group_type.clear();
        }
        let explicit_type = match &vs.ty {
            Some(ty) => {
                let rendered = self.translate(ty, None, 0, true).map_err(|e| e.or_at(vs.span))?;
                group.group_type = rendered.clone();
                Some(rendered)
            }
            None => None,
        };
        if let Some(value) = value {
            group.group_value = self.translate(value, None, 0, false).map_err(|e| e.or_at(vs.span))?;
        }
        Ok(explicit_type)
    }

    /// `export const` per exported name; with `emit` unset only the carried state advances.
    pub(crate) fn write_value_spec(
        &self,
        s: &mut String,
        vs: &ValueSpec,
        group: &mut GroupContext<'_>,
        emit: bool,
    ) -> Result<(), GenerateError> {
        for (i, name) in vs.names.iter().enumerate() {
            let explicit_type = self.advance(group, vs, i)?;
            let value = vs.values.get(i);

            if !emit || name.is_blank() || !name.is_exported() {
                continue;
            }

            self.write_doc(s, vs.doc.as_ref().or(group.fallback_doc()), 0);
            s.push_str("export const ");
            s.push_str(&name.name);
            match explicit_type {
                Some(ty) => {
                    s.push_str(": ");
                    s.push_str(&ty);
                }
                None if !group.group_type.is_empty() && value.is_none() => {
                    s.push_str(": ");
                    s.push_str(&group.group_type);
                }
                None => {}
            }
            s.push_str(" = ");
            s.push_str(&replace_iota(&group.group_value, group.iota_value));
            s.push(';');

            match &vs.comment {
                Some(comment) if self.preserve_doc_comments() => self.write_single_line_comment(s, comment),
                _ => s.push('\n'),
            }
        }
        Ok(())
    }
}
