//! Lowers the tree-sitter concrete syntax tree into the declaration AST.

use super::comments::CommentIndex;
use super::positions::node_span;
use crate::ast::*;
use crate::error::{ErrorKind, ParseError};
use crate::literal::unquote_string;
use std::sync::Arc;
use tree_sitter::Node;

pub struct TreeBuilder<'a> {
    source: &'a str,
    comments: CommentIndex,
    /// Type parameter names in scope while lowering a type spec
    type_params: Vec<String>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str, comments: CommentIndex) -> Self {
        Self {
            source,
            comments,
            type_params: Vec::new(),
        }
    }

    pub fn build(mut self, root: Node<'_>) -> Result<SourceFile, ParseError> {
        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let message = if bad.is_missing() {
                format!("Syntax error: missing `{}`", bad.kind())
            } else {
                "Syntax error".to_string()
            };
            return Err(ParseError::new(ErrorKind::InvalidSyntax, message, node_span(&bad)));
        }

        let mut package = None;
        let mut doc = None;
        let mut decls = Vec::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_clause" => {
                    doc = self.comments.take_lead(child.start_byte());
                    let mut inner = child.walk();
                    let name = child
                        .named_children(&mut inner)
                        .find(|n| n.kind() == "package_identifier")
                        .ok_or_else(|| self.unsupported(&child, "package clause without a name"))?;
                    package = Some(self.ident(&name));
                }
                "const_declaration" | "type_declaration" | "var_declaration" => {
                    decls.push(self.gen_decl(&child)?);
                }
                _ => {}
            }
        }

        let package = package.ok_or_else(|| {
            ParseError::new(
                ErrorKind::MissingPackageClause,
                "expected a package clause",
                node_span(&root),
            )
            .with_help("Go source files start with `package <name>`")
        })?;

        Ok(SourceFile {
            path: None,
            package,
            doc,
            decls,
            source: Arc::from(self.source),
        })
    }

    fn gen_decl(&mut self, node: &Node<'_>) -> Result<GenDecl, ParseError> {
        let kind = match node.kind() {
            "const_declaration" => DeclKind::Const,
            "type_declaration" => DeclKind::Type,
            _ => DeclKind::Var,
        };
        let doc = self.comments.take_lead(node.start_byte());

        let mut specs = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "const_spec" | "var_spec" => specs.push(Spec::Value(self.value_spec(&child)?)),
                "var_spec_list" => {
                    let mut inner = child.walk();
                    for spec in child.named_children(&mut inner) {
                        if spec.kind() == "var_spec" {
                            specs.push(Spec::Value(self.value_spec(&spec)?));
                        }
                    }
                }
                "type_spec" => specs.push(Spec::Type(self.type_spec(&child, false)?)),
                "type_alias" => specs.push(Spec::Type(self.type_spec(&child, true)?)),
                "comment" => {}
                other => return Err(self.unsupported(&child, &format!("`{other}` in declaration"))),
            }
        }

        Ok(GenDecl {
            kind,
            doc,
            specs,
            span: node_span(node),
        })
    }

    fn value_spec(&mut self, node: &Node<'_>) -> Result<ValueSpec, ParseError> {
        let doc = self.comments.take_lead(node.start_byte());
        let comment = self.comments.take_line(node.end_byte());

        let mut cursor = node.walk();
        let names = node
            .children_by_field_name("name", &mut cursor)
            .filter(|n| n.is_named())
            .map(|n| self.ident(&n))
            .collect();

        let ty = node.child_by_field_name("type").map(|t| self.type_expr(&t)).transpose()?;

        let mut values = Vec::new();
        if let Some(list) = node.child_by_field_name("value") {
            let mut inner = list.walk();
            for expr in list.named_children(&mut inner) {
                if expr.kind() != "comment" {
                    values.push(self.expr(&expr)?);
                }
            }
        }

        Ok(ValueSpec {
            names,
            ty,
            values,
            doc,
            comment,
            span: node_span(node),
        })
    }

    fn type_spec(&mut self, node: &Node<'_>, alias: bool) -> Result<TypeSpec, ParseError> {
        let doc = self.comments.take_lead(node.start_byte());
        let comment = self.comments.take_line(node.end_byte());
        let name_node = node
            .child_by_field_name("name")
            .ok_or_else(|| self.unsupported(node, "type declaration without a name"))?;
        let name = self.ident(&name_node);

        let scope = self.type_params.len();
        let type_params = match node.child_by_field_name("type_parameters") {
            Some(list) => self.type_param_list(&list)?,
            None => Vec::new(),
        };

        let ty_node = node
            .child_by_field_name("type")
            .ok_or_else(|| self.unsupported(node, "type declaration without a type"))?;
        let ty = self.type_expr(&ty_node);
        self.type_params.truncate(scope);

        Ok(TypeSpec {
            name,
            type_params,
            alias,
            ty: ty?,
            doc,
            comment,
            span: node_span(node),
        })
    }

    fn type_param_list(&mut self, list: &Node<'_>) -> Result<Vec<TypeParam>, ParseError> {
        let mut decls = Vec::new();
        let mut cursor = list.walk();
        for decl in list.named_children(&mut cursor) {
            if decl.kind() != "comment" {
                decls.push(decl);
            }
        }

        // Names first: constraints may refer to any parameter of the list.
        let mut names_per_decl = Vec::with_capacity(decls.len());
        for decl in &decls {
            let mut inner = decl.walk();
            let names: Vec<Ident> = decl
                .children_by_field_name("name", &mut inner)
                .filter(|n| n.is_named())
                .map(|n| self.ident(&n))
                .collect();
            self.type_params.extend(names.iter().map(|n| n.name.clone()));
            names_per_decl.push(names);
        }

        let mut params = Vec::with_capacity(decls.len());
        for (decl, names) in decls.iter().zip(names_per_decl) {
            let constraint = decl
                .child_by_field_name("type")
                .ok_or_else(|| self.unsupported(decl, "type parameter without a constraint"))?;
            params.push(TypeParam {
                names,
                constraint: self.type_expr(&constraint)?,
            });
        }
        Ok(params)
    }

    fn type_expr(&mut self, node: &Node<'_>) -> Result<TypeExpr, ParseError> {
        Ok(match node.kind() {
            "type_identifier" | "identifier" => {
                let name = self.text(node);
                if self.type_params.iter().any(|p| p == name) {
                    TypeExpr::TypeParam(name.to_string())
                } else {
                    TypeExpr::Named(name.to_string())
                }
            }
            "qualified_type" => TypeExpr::Qualified {
                package: self.field_text(node, "package")?,
                name: self.field_text(node, "name")?,
            },
            "pointer_type" => TypeExpr::Pointer(Box::new(self.first_named_type(node)?)),
            "slice_type" | "implicit_length_array_type" => TypeExpr::Array {
                len: None,
                elem: Box::new(self.field_type(node, "element")?),
            },
            "array_type" => {
                let len = match node.child_by_field_name("length") {
                    Some(len) => Some(Box::new(self.expr(&len)?)),
                    None => None,
                };
                TypeExpr::Array {
                    len,
                    elem: Box::new(self.field_type(node, "element")?),
                }
            }
            "map_type" => TypeExpr::Map {
                key: Box::new(self.field_type(node, "key")?),
                value: Box::new(self.field_type(node, "value")?),
            },
            "struct_type" => {
                let mut fields = Vec::new();
                let mut cursor = node.walk();
                for list in node.named_children(&mut cursor) {
                    if list.kind() == "field_declaration_list" {
                        fields = self.fields(&list)?;
                    }
                }
                TypeExpr::Struct(fields)
            }
            "interface_type" => TypeExpr::Interface(self.interface_elems(node)?),
            "generic_type" => {
                let base = self.field_type(node, "type")?;
                let mut args = Vec::new();
                if let Some(list) = node.child_by_field_name("type_arguments") {
                    let mut cursor = list.walk();
                    for arg in list.named_children(&mut cursor) {
                        if arg.kind() != "comment" {
                            args.push(self.type_expr(&arg)?);
                        }
                    }
                }
                TypeExpr::Generic {
                    base: Box::new(base),
                    args,
                }
            }
            "parenthesized_type" => TypeExpr::Paren(Box::new(self.first_named_type(node)?)),
            "negated_type" => TypeExpr::Unary {
                op: UnaryOp::Tilde,
                operand: Box::new(self.first_named_type(node)?),
            },
            "type_elem" | "type_constraint" | "constraint_elem" => self.union(node)?,
            "function_type" => TypeExpr::Opaque(OpaqueKind::Func),
            "channel_type" => TypeExpr::Opaque(OpaqueKind::Chan),
            other => return Err(self.unsupported(node, &format!("unsupported type syntax `{other}`"))),
        })
    }

    /// `A | B | C` folds left into binary `|` nodes.
    fn union(&mut self, node: &Node<'_>) -> Result<TypeExpr, ParseError> {
        let mut terms = Vec::new();
        let mut cursor = node.walk();
        for term in node.named_children(&mut cursor) {
            if term.kind() != "comment" {
                terms.push(self.type_expr(&term)?);
            }
        }
        let mut terms = terms.into_iter();
        let first = terms
            .next()
            .ok_or_else(|| self.unsupported(node, "empty type constraint"))?;
        Ok(terms.fold(first, |lhs, rhs| TypeExpr::Binary {
            op: BinaryOp::Or,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }))
    }

    fn fields(&mut self, list: &Node<'_>) -> Result<Vec<Field>, ParseError> {
        let mut fields = Vec::new();
        let mut cursor = list.walk();
        for node in list.named_children(&mut cursor) {
            if node.kind() != "field_declaration" {
                continue;
            }
            let doc = self.comments.take_lead(node.start_byte());
            let comment = self.comments.take_line(node.end_byte());

            let mut inner = node.walk();
            let names: Vec<Ident> = node
                .children_by_field_name("name", &mut inner)
                .filter(|n| n.is_named())
                .map(|n| self.ident(&n))
                .collect();

            let mut ty = self.field_type(&node, "type")?;
            if names.is_empty() {
                // Embedded `*T`: the star is an anonymous child of the field.
                let mut inner = node.walk();
                let starred = node.children(&mut inner).any(|c| c.kind() == "*");
                if starred {
                    ty = TypeExpr::Pointer(Box::new(ty));
                }
            }

            let tag = match node.child_by_field_name("tag") {
                Some(tag) => Some(unquote_string(self.text(&tag)).map_err(|reason| {
                    ParseError::new(ErrorKind::InvalidLiteral, format!("invalid struct tag: {reason}"), node_span(&tag))
                })?),
                None => None,
            };

            fields.push(Field {
                names,
                ty,
                tag,
                doc,
                comment,
                span: node_span(&node),
            });
        }
        Ok(fields)
    }

    fn interface_elems(&mut self, node: &Node<'_>) -> Result<Vec<InterfaceElem>, ParseError> {
        let mut elems = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "comment" {
                continue;
            }
            let doc = self.comments.take_lead(child.start_byte());
            let comment = self.comments.take_line(child.end_byte());
            let kind = match child.kind() {
                "method_elem" | "method_spec" => {
                    let name = child
                        .child_by_field_name("name")
                        .ok_or_else(|| self.unsupported(&child, "method without a name"))?;
                    InterfaceElemKind::Method(self.ident(&name))
                }
                _ => InterfaceElemKind::Type(self.type_expr(&child)?),
            };
            elems.push(InterfaceElem { kind, doc, comment });
        }
        Ok(elems)
    }

    /// Constant expressions in value and array-length position.
    fn expr(&mut self, node: &Node<'_>) -> Result<TypeExpr, ParseError> {
        Ok(match node.kind() {
            "int_literal" => self.literal(node, LitKind::Int),
            "float_literal" => self.literal(node, LitKind::Float),
            "imaginary_literal" => self.literal(node, LitKind::Imag),
            "rune_literal" => self.literal(node, LitKind::Char),
            "interpreted_string_literal" | "raw_string_literal" => self.literal(node, LitKind::String),
            "identifier" | "iota" | "true" | "false" | "nil" => TypeExpr::Named(self.text(node).to_string()),
            "parenthesized_expression" => TypeExpr::Paren(Box::new(self.first_named_expr(node)?)),
            "binary_expression" => {
                let op_text = self.field_text(node, "operator")?;
                let op = BinaryOp::from_token(&op_text)
                    .ok_or_else(|| self.unsupported(node, &format!("unknown binary operator `{op_text}`")))?;
                TypeExpr::Binary {
                    op,
                    lhs: Box::new(self.field_expr(node, "left")?),
                    rhs: Box::new(self.field_expr(node, "right")?),
                }
            }
            "unary_expression" => {
                let op_text = self.field_text(node, "operator")?;
                let op = UnaryOp::from_token(&op_text)
                    .ok_or_else(|| self.unsupported(node, &format!("unknown unary operator `{op_text}`")))?;
                TypeExpr::Unary {
                    op,
                    operand: Box::new(self.field_expr(node, "operand")?),
                }
            }
            "selector_expression" => {
                let operand = node.child_by_field_name("operand");
                match operand {
                    Some(pkg) if pkg.kind() == "identifier" => TypeExpr::Qualified {
                        package: self.text(&pkg).to_string(),
                        name: self.field_text(node, "field")?,
                    },
                    _ => TypeExpr::Opaque(OpaqueKind::Selector),
                }
            }
            "call_expression" | "type_conversion_expression" => TypeExpr::Opaque(OpaqueKind::Call),
            "composite_literal" | "func_literal" | "index_expression" | "slice_expression"
            | "type_assertion_expression" | "type_instantiation_expression" => TypeExpr::Opaque(OpaqueKind::Other),
            _ => self.type_expr(node)?,
        })
    }

    fn literal(&self, node: &Node<'_>, kind: LitKind) -> TypeExpr {
        TypeExpr::Literal(Literal {
            kind,
            raw: self.text(node).to_string(),
        })
    }

    fn ident(&self, node: &Node<'_>) -> Ident {
        Ident::new(self.text(node), node_span(node))
    }

    fn text(&self, node: &Node<'_>) -> &'a str {
        self.source.get(node.start_byte()..node.end_byte()).unwrap_or_default()
    }

    fn field_text(&self, node: &Node<'_>, field: &str) -> Result<String, ParseError> {
        node.child_by_field_name(field)
            .map(|child| self.text(&child).to_string())
            .ok_or_else(|| self.unsupported(node, &format!("missing `{field}`")))
    }

    fn field_type(&mut self, node: &Node<'_>, field: &str) -> Result<TypeExpr, ParseError> {
        let child = node
            .child_by_field_name(field)
            .ok_or_else(|| self.unsupported(node, &format!("missing `{field}`")))?;
        self.type_expr(&child)
    }

    fn field_expr(&mut self, node: &Node<'_>, field: &str) -> Result<TypeExpr, ParseError> {
        let child = node
            .child_by_field_name(field)
            .ok_or_else(|| self.unsupported(node, &format!("missing `{field}`")))?;
        self.expr(&child)
    }

    fn first_named_type(&mut self, node: &Node<'_>) -> Result<TypeExpr, ParseError> {
        let mut cursor = node.walk();
        let child = node
            .named_children(&mut cursor)
            .find(|c| c.kind() != "comment")
            .ok_or_else(|| self.unsupported(node, "empty type"))?;
        self.type_expr(&child)
    }

    fn first_named_expr(&mut self, node: &Node<'_>) -> Result<TypeExpr, ParseError> {
        let mut cursor = node.walk();
        let child = node
            .named_children(&mut cursor)
            .find(|c| c.kind() != "comment")
            .ok_or_else(|| self.unsupported(node, "empty expression"))?;
        self.expr(&child)
    }

    fn unsupported(&self, node: &Node<'_>, message: &str) -> ParseError {
        ParseError::new(ErrorKind::UnsupportedNode, message, node_span(node))
    }
}

/// First ERROR or MISSING node in document order
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}
