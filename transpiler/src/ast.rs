use std::path::PathBuf;
use std::sync::Arc;

/// Position in source (0-based line and byte column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub byte: usize,
    pub line: usize,
    pub col: usize,
}

/// Source span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A parsed Go source file, reduced to the declarations code generation consumes.
///
/// Imports, functions and methods are dropped by the tree builder.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path the file was loaded from. `None` for in-memory snippets.
    pub path: Option<PathBuf>,
    pub package: Ident,
    /// Lead comment of the package clause.
    pub doc: Option<CommentGroup>,
    pub decls: Vec<GenDecl>,
    pub source: Arc<str>,
}

impl SourceFile {
    /// File name used in the `// source:` header.
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Type,
    Var,
}

/// A `const`, `type` or `var` declaration, grouped or not.
#[derive(Debug, Clone)]
pub struct GenDecl {
    pub kind: DeclKind,
    pub doc: Option<CommentGroup>,
    pub specs: Vec<Spec>,
    pub span: Span,
}

impl GenDecl {
    pub fn is_grouped(&self) -> bool {
        self.specs.len() > 1
    }
}

#[derive(Debug, Clone)]
pub enum Spec {
    Type(TypeSpec),
    Value(ValueSpec),
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeExpr,
    pub doc: Option<CommentGroup>,
    pub comment: Option<CommentGroup>,
    pub span: Span,
}

/// One `A, B Constraint` entry of a type parameter list.
#[derive(Debug, Clone)]
pub struct TypeParam {
    pub names: Vec<Ident>,
    pub constraint: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<TypeExpr>,
    pub doc: Option<CommentGroup>,
    pub comment: Option<CommentGroup>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }

    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }

    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

/// Go export rule: the first character is an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Struct field. `names` is empty for embedded fields.
#[derive(Debug, Clone)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    /// Tag contents with the string quoting already removed.
    pub tag: Option<String>,
    pub doc: Option<CommentGroup>,
    pub comment: Option<CommentGroup>,
    pub span: Span,
}

impl Field {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum InterfaceElemKind {
    Method(Ident),
    Type(TypeExpr),
}

#[derive(Debug, Clone)]
pub struct InterfaceElem {
    pub kind: InterfaceElemKind,
    pub doc: Option<CommentGroup>,
    pub comment: Option<CommentGroup>,
}

/// Type expressions, plus the constant-expression forms that appear as values.
#[derive(Debug, Clone)]
pub enum TypeExpr {
    Pointer(Box<TypeExpr>),
    /// Slices have no length.
    Array {
        len: Option<Box<TypeExpr>>,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Struct(Vec<Field>),
    Interface(Vec<InterfaceElem>),
    Named(String),
    /// A reference to a type parameter in scope.
    TypeParam(String),
    Qualified {
        package: String,
        name: String,
    },
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    Literal(Literal),
    Paren(Box<TypeExpr>),
    Binary {
        op: BinaryOp,
        lhs: Box<TypeExpr>,
        rhs: Box<TypeExpr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<TypeExpr>,
    },
    Opaque(OpaqueKind),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(name.into())
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeExpr::Pointer(_))
    }

    /// Identifier name for plain named types and type parameters.
    pub fn ident(&self) -> Option<&str> {
        match self {
            TypeExpr::Named(name) | TypeExpr::TypeParam(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

/// Basic literal, kept as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LitKind,
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Quo,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
    Add,
    Sub,
    Or,
    Xor,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
    LogAnd,
    LogOr,
}

impl BinaryOp {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Quo,
            "%" => BinaryOp::Rem,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            "&" => BinaryOp::And,
            "&^" => BinaryOp::AndNot,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "|" => BinaryOp::Or,
            "^" => BinaryOp::Xor,
            "==" => BinaryOp::Eql,
            "!=" => BinaryOp::Neq,
            "<" => BinaryOp::Lss,
            "<=" => BinaryOp::Leq,
            ">" => BinaryOp::Gtr,
            ">=" => BinaryOp::Geq,
            "&&" => BinaryOp::LogAnd,
            "||" => BinaryOp::LogOr,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Quo => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&",
            BinaryOp::AndNot => "&^",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Eql => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lss => "<",
            BinaryOp::Leq => "<=",
            BinaryOp::Gtr => ">",
            BinaryOp::Geq => ">=",
            BinaryOp::LogAnd => "&&",
            BinaryOp::LogOr => "||",
        }
    }

    /// JavaScript operator precedence of the rendered operator.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Quo | BinaryOp::Rem => 13,
            BinaryOp::Add | BinaryOp::Sub => 12,
            BinaryOp::Shl | BinaryOp::Shr => 11,
            BinaryOp::Lss | BinaryOp::Leq | BinaryOp::Gtr | BinaryOp::Geq => 10,
            BinaryOp::Eql | BinaryOp::Neq => 9,
            BinaryOp::And | BinaryOp::AndNot => 8,
            BinaryOp::Xor => 7,
            BinaryOp::Or => 6,
            BinaryOp::LogAnd => 5,
            BinaryOp::LogOr => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    Xor,
    /// `~T` approximation constraint
    Tilde,
    Deref,
    Addr,
    Recv,
}

impl UnaryOp {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "+" => UnaryOp::Plus,
            "-" => UnaryOp::Minus,
            "!" => UnaryOp::Not,
            "^" => UnaryOp::Xor,
            "~" => UnaryOp::Tilde,
            "*" => UnaryOp::Deref,
            "&" => UnaryOp::Addr,
            "<-" => UnaryOp::Recv,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::Xor => "^",
            UnaryOp::Tilde => "~",
            UnaryOp::Deref => "*",
            UnaryOp::Addr => "&",
            UnaryOp::Recv => "<-",
        }
    }
}

/// Shapes with no TypeScript counterpart. They render as the fallback type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    Func,
    Chan,
    Call,
    Selector,
    Other,
}

/// A single `//` or `/* */` comment, markers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// A run of comments with no blank line or token between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn new(list: Vec<Comment>) -> Self {
        Self { list }
    }

    /// The comment text with markers, directives and surrounding blank lines removed.
    ///
    /// Lines are separated by `\n` and a non-empty result always ends with one.
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for comment in &self.list {
            let raw = comment.text.as_str();
            let body = if let Some(rest) = raw.strip_prefix("//") {
                if let Some(stripped) = rest.strip_prefix(' ') {
                    stripped
                } else if is_directive(rest) {
                    continue;
                } else {
                    rest
                }
            } else if let Some(rest) = raw.strip_prefix("/*") {
                rest.strip_suffix("*/").unwrap_or(rest)
            } else {
                raw
            };
            for line in body.split('\n') {
                lines.push(line.trim_end_matches([' ', '\t', '\n', '\r']).to_string());
            }
        }

        // Drop leading blank lines and collapse interior runs to one.
        let mut kept: Vec<String> = Vec::with_capacity(lines.len());
        for line in lines {
            if !line.is_empty() || kept.last().is_some_and(|prev| !prev.is_empty()) {
                kept.push(line);
            }
        }
        while kept.last().is_some_and(|line| line.is_empty()) {
            kept.pop();
        }
        if kept.is_empty() {
            return String::new();
        }
        kept.push(String::new());
        kept.join("\n")
    }
}

/// Tool directives (`//go:generate`, `//line`, ...) are not documentation.
fn is_directive(comment: &str) -> bool {
    if comment.starts_with("line ") || comment.starts_with("extern ") || comment.starts_with("export ") {
        return true;
    }
    // "[a-z0-9]+:[a-z0-9]"
    let Some(colon) = comment.find(':') else {
        return false;
    };
    if colon == 0 {
        return false;
    }
    let is_word = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    comment.as_bytes()[..colon].iter().all(|&b| is_word(b))
        && comment.as_bytes().get(colon + 1).is_some_and(|&b| is_word(b))
}
