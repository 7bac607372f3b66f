use crate::ast::Position;

/// Line-level source mapping
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Mapping {
    pub gen_line: usize,
    pub gen_col: usize,
    pub src_line: usize,
    pub src_col: usize,
}

/// Output buffer that accumulates generated code with mappings
pub struct Output {
    code: String,
    mappings: Vec<Mapping>,
    /// Bytes of `code` already counted into `line` / `line_start`
    scanned: usize,
    line: usize,
    line_start: usize,
}

impl Output {
    pub fn new() -> Self {
        Self {
            code: String::new(),
            mappings: Vec::new(),
            scanned: 0,
            line: 0,
            line_start: 0,
        }
    }

    /// Add text without mapping
    pub fn push(&mut self, text: &str) {
        self.code.push_str(text);
    }

    /// Direct access for emitters that write into a `String`
    pub fn buffer(&mut self) -> &mut String {
        &mut self.code
    }

    /// Record that the text written next originates at `source_pos`
    pub fn mark(&mut self, source_pos: Position) {
        let (line, col) = self.position();
        self.mappings.push(Mapping {
            gen_line: line,
            gen_col: col,
            src_line: source_pos.line,
            src_col: source_pos.col,
        });
    }

    /// Current (line, column) of the end of the buffer
    pub fn position(&mut self) -> (usize, usize) {
        for (offset, byte) in self.code.as_bytes()[self.scanned..].iter().enumerate() {
            if *byte == b'\n' {
                self.line += 1;
                self.line_start = self.scanned + offset + 1;
            }
        }
        self.scanned = self.code.len();
        (self.line, self.code.len() - self.line_start)
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Finish and return the generated code
    pub fn finish(self) -> (String, Vec<Mapping>) {
        (self.code, self.mappings)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
