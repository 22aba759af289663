//! Formatting utilities for artifact emission.
//!
//! Provides directive quoting and indentation management.

/// One indentation unit in emitted artifacts.
pub const INDENT: &str = "    ";

/// Quote a directive value with double quotes.
#[must_use]
pub fn quote_directive(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// A writer that manages indentation for artifact output.
#[derive(Debug, Default)]
pub struct IndentWriter {
    buffer: String,
    current_indent: usize,
}

impl IndentWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.current_indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        self.current_indent = self.current_indent.saturating_sub(1);
    }

    /// Write a complete line (with newline at end).
    ///
    /// Empty lines are written without indentation.
    pub fn write_line(&mut self, s: &str) {
        if !s.trim().is_empty() {
            for _ in 0..self.current_indent {
                self.buffer.push_str(INDENT);
            }
            self.buffer.push_str(s);
        }
        self.buffer.push('\n');
    }

    /// Write every line of a multi-line text at the current indentation.
    pub fn write_block(&mut self, text: &str) {
        for line in text.lines() {
            self.write_line(line);
        }
    }

    /// Write a blank line.
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Write a comment, one `# ` line per line of text.
    pub fn write_comment(&mut self, comment: &str) {
        for line in comment.lines() {
            if line.is_empty() {
                self.write_line("#");
            } else {
                self.write_line(&format!("# {}", line));
            }
        }
    }

    /// Write a `KEY "value"` directive line.
    pub fn write_directive(&mut self, key: &str, value: &str) {
        self.write_line(&format!("{} {}", key, quote_directive(value)));
    }

    /// Write the `VERSION n` header followed by a blank line.
    pub fn write_version(&mut self, version: Option<u32>) {
        if let Some(version) = version {
            self.write_line(&format!("VERSION {}", version));
            self.blank_line();
        }
    }

    /// Write a `DESCRIPTION >` block followed by a blank line.
    pub fn write_description(&mut self, description: Option<&str>) {
        if let Some(description) = description {
            self.write_line("DESCRIPTION >");
            self.indent();
            self.write_block(description);
            self.dedent();
            self.blank_line();
        }
    }

    /// Consume the writer and return the final string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Get a reference to the current buffer.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}
