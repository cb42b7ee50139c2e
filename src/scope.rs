//! Scope-local name disambiguation and the indented block writer.

use crate::member::{DOT_SEPARATOR, PATH_SEPARATOR, TOKEN_SEPARATOR};

/// Make a candidate name unique against names already taken in its scope.
///
/// The candidate is first normalized (`.` → `_`); while the result collides
/// with a taken name, a separator is appended. Each retry strictly lengthens
/// the string, so an unused name is reached in at most `taken.len() + 1`
/// attempts.
pub fn disambiguate(candidate: &str, taken: &[String]) -> String {
    let mut name = normalize(candidate);
    for _ in 0..=taken.len() {
        if !taken.iter().any(|t| t == &name) {
            return name;
        }
        name.push_str(TOKEN_SEPARATOR);
    }
    name
}

/// Normalize a name for use as a scope identifier.
pub fn normalize(candidate: &str) -> String {
    candidate.replace(DOT_SEPARATOR, PATH_SEPARATOR)
}

/// Writes nested `public interface` blocks with 4-space indentation.
///
/// Indentation is cosmetic only; the resolver navigates paths, it never
/// re-parses the emitted text.
#[derive(Debug, Default)]
pub struct ScopeWriter {
    buf: String,
    depth: usize,
}

const INDENT: &str = "    ";

impl ScopeWriter {
    pub fn new() -> Self {
        ScopeWriter::default()
    }

    /// Append one raw line at zero indentation (header material).
    pub fn raw_line(&mut self, line: &str) {
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    /// Open a named scope and increase the nesting depth.
    pub fn open(&mut self, name: &str) {
        self.indent();
        self.buf.push_str("public interface ");
        self.buf.push_str(name);
        self.buf.push_str(" {\n");
        self.depth += 1;
    }

    /// Close the innermost open scope.
    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.buf.push_str("}\n");
    }

    /// Emit one terminal leaf inside the current scope.
    pub fn leaf(&mut self, name: &str) {
        self.indent();
        self.buf.push_str("public interface ");
        self.buf.push_str(name);
        self.buf.push_str(" {}\n");
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
