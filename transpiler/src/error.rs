use crate::ast::Span;
use crate::config::ConfigError;
use std::path::PathBuf;

/// Kind of translation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSyntax,
    MissingPackageClause,
    UnsupportedNode,
    InvalidLiteral,
    MalformedTag,
    UnsupportedExtends,
    UnhandledOperator,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidSyntax => "Invalid syntax",
            ErrorKind::MissingPackageClause => "Missing package clause",
            ErrorKind::UnsupportedNode => "Unsupported syntax",
            ErrorKind::InvalidLiteral => "Invalid literal",
            ErrorKind::MalformedTag => "Malformed struct tag",
            ErrorKind::UnsupportedExtends => "Unsupported extends",
            ErrorKind::UnhandledOperator => "Unhandled operator",
        }
    }
}

/// Error while lowering Go source into the declaration AST
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            help: None,
        }
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context
    pub fn render(&self, source: &str, filename: &str) -> String {
        render_diagnostic(&self.message, Some(self.span), self.help.as_deref(), source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        render_diagnostic(&self.message, Some(self.span), self.help.as_deref(), source, filename, true)
    }
}

/// Error while emitting TypeScript for a declaration
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct GenerateError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

impl GenerateError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    /// Attach a location unless a more precise one is already set
    pub fn or_at(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }
}

/// Error during compilation (parsing, generation, or configuration)
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}: {inner}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        inner: Box<CompileError>,
    },
}

impl CompileError {
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            CompileError::InFile { .. } => self,
            other => CompileError::InFile {
                path: path.into(),
                inner: Box::new(other),
            },
        }
    }

    /// The file the error occurred in, when known
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            CompileError::InFile { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Render the error with source context (no color)
    pub fn render(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, true)
    }

    fn render_inner(&self, source: &str, filename: &str, color: bool) -> String {
        match self {
            CompileError::Parse(err) => {
                render_diagnostic(&err.message, Some(err.span), err.help.as_deref(), source, filename, color)
            }
            CompileError::Generate(err) => render_diagnostic(
                &format!("{}: {}", err.kind.as_str(), err.message),
                err.span,
                None,
                source,
                filename,
                color,
            ),
            CompileError::Config(err) => {
                if color {
                    format!("\x1b[1;31merror\x1b[0m: \x1b[1m{}\x1b[0m\n", err)
                } else {
                    format!("error: {}\n", err)
                }
            }
            CompileError::InFile { inner, .. } => inner.render_inner(source, filename, color),
        }
    }
}

fn render_diagnostic(
    message: &str,
    span: Option<Span>,
    help: Option<&str>,
    source: &str,
    filename: &str,
    color: bool,
) -> String {
    // Visual hierarchy: red for errors only, dim for structural chrome
    let red = if color { "\x1b[1;31m" } else { "" };
    let dim = if color { "\x1b[2m" } else { "" };
    let underline = if color { "\x1b[4m" } else { "" };
    let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
    let reset = if color { "\x1b[0m" } else { "" };

    let mut output = String::new();
    output.push('\n');

    let location = match span {
        Some(span) => format!("{}:{}:{}", filename, span.start.line + 1, span.start.col + 1),
        None => filename.to_string(),
    };
    if color {
        // OSC 8 hyperlink: \x1b]8;;URL\x07TEXT\x1b]8;;\x07
        let abs_path = std::path::Path::new(filename)
            .canonicalize()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| filename.to_string());
        output.push_str(&format!(
            " {}file:{} \x1b]8;;file://{}\x07{}{}{}\x1b]8;;\x07\n",
            dim, reset, abs_path, underline, location, reset
        ));
    } else {
        output.push_str(&format!(" file: {}\n", location));
    }

    output.push_str(&format!("{}error:{} {}\n", red, reset, message));

    if let Some(span) = span {
        let err_line = span.start.line + 1;
        if let Some(source_line) = source.lines().nth(span.start.line) {
            let line_num_width = format!("{}", err_line).len().max(2);
            output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = line_num_width));
            output.push_str(&format!(
                "{}{:>width$} |{} {}\n",
                dim, err_line, reset, source_line,
                width = line_num_width
            ));

            let underline_start = span.start.col;
            let underline_len = if span.end.line == span.start.line {
                (span.end.col.saturating_sub(span.start.col)).max(1)
            } else {
                source_line.len().saturating_sub(underline_start).max(1)
            };
            output.push_str(&format!(
                "{}{:>width$} |{} {}{}{}{}\n",
                dim, "", reset,
                " ".repeat(underline_start), red, "^".repeat(underline_len), reset,
                width = line_num_width
            ));
        }
    }

    if let Some(help) = help {
        output.push('\n');
        for (i, help_line) in help.lines().enumerate() {
            if i == 0 {
                output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help_line));
            } else {
                output.push_str(&format!("       {}\n", help_line));
            }
        }
    }

    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    fn span(line: usize, col: usize, len: usize) -> Span {
        Span::new(
            Position { byte: 0, line, col },
            Position { byte: 0, line, col: col + len },
        )
    }

    #[test]
    fn test_render_points_at_span() {
        let source = "package models\n\ntype Foo struct {\n\tBar string `json:bar`\n}\n";
        let err = ParseError::new(ErrorKind::InvalidSyntax, "Syntax error", span(3, 12, 10))
            .with_help("struct tag values must be quoted");
        let rendered = err.render(source, "models.go");
        assert!(rendered.contains(" file: models.go:4:13"));
        assert!(rendered.contains("error: Syntax error"));
        assert!(rendered.contains(" 4 | \tBar string `json:bar`"));
        assert!(rendered.contains("^^^^^^^^^^"));
        assert!(rendered.contains(" help: struct tag values must be quoted"));
    }

    #[test]
    fn test_generate_error_keeps_first_span() {
        let err = GenerateError::new(ErrorKind::MalformedTag, "bad tag")
            .or_at(span(1, 0, 3))
            .or_at(span(5, 0, 3));
        assert_eq!(err.span.map(|s| s.start.line), Some(1));
    }

    #[test]
    fn test_in_file_wraps_once() {
        let err = CompileError::from(GenerateError::new(ErrorKind::UnhandledOperator, "unary &"))
            .in_file("a.go")
            .in_file("b.go");
        assert_eq!(err.path().map(|p| p.display().to_string()), Some("a.go".to_string()));
        assert_eq!(err.to_string(), "a.go: Generation error: unary &");
    }
}
