//! Output buffer for dense C/C++ text.

/// Append-only buffer that emission writes into.
///
/// Generated text is dense: no indentation and no inserted whitespace
/// beyond what the grammar requires. A formatter is expected to run over
/// the result when human-readable output is wanted.
///
/// Supports both consuming methods (returning `Self`) for chaining and
/// mutable methods (returning `&mut Self`) used by emitters.
///
/// # Example
///
/// ```
/// use cemit_core::CodeWriter;
///
/// let mut w = CodeWriter::new();
/// w.push_str("int f(");
/// w.push_joined(["int a", "int b"], ",", |w, p| {
///     w.push_str(p);
/// });
/// w.push_str(");");
/// assert_eq!(w.build(), "int f(int a,int b);");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeWriter {
    buffer: String,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Mutable API - methods prefixed with `push_`
    // =========================================================================

    /// Append text verbatim.
    pub fn push_str(&mut self, s: &str) -> &mut Self {
        self.buffer.push_str(s);
        self
    }

    pub fn push_char(&mut self, c: char) -> &mut Self {
        self.buffer.push(c);
        self
    }

    pub fn push_newline(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Append `s` `count` times.
    pub fn push_repeat(&mut self, s: &str, count: usize) -> &mut Self {
        for _ in 0..count {
            self.buffer.push_str(s);
        }
        self
    }

    /// Append a `/* text */` comment.
    pub fn push_block_comment(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str("/* ");
        self.buffer.push_str(text);
        self.buffer.push_str(" */");
        self
    }

    /// Append a `// text` comment and terminate the line.
    pub fn push_line_comment(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str("// ");
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self
    }

    /// Write each item with `f`, separating consecutive items with `sep`.
    pub fn push_joined<T>(
        &mut self,
        items: impl IntoIterator<Item = T>,
        sep: &str,
        mut f: impl FnMut(&mut Self, T),
    ) -> &mut Self {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.buffer.push_str(sep);
            }
            f(self, item);
        }
        self
    }

    /// Render into a scratch writer and hand back its text.
    ///
    /// Used where a fragment must be post-processed before it is spliced
    /// into the surrounding output.
    pub fn capture(f: impl FnOnce(&mut Self)) -> String {
        let mut scratch = Self::new();
        f(&mut scratch);
        scratch.build()
    }

    // =========================================================================
    // Consuming API
    // =========================================================================

    pub fn raw(mut self, s: &str) -> Self {
        self.push_str(s);
        self
    }

    pub fn newline(mut self) -> Self {
        self.push_newline();
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Build the final code string.
    pub fn build(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_joined_separates_only_between_items() {
        let mut w = CodeWriter::new();
        w.push_joined(1..=3, ",", |w, i| {
            w.push_str(&i.to_string());
        });
        assert_eq!(w.as_str(), "1,2,3");
    }

    #[test]
    fn test_push_joined_empty() {
        let mut w = CodeWriter::new();
        w.push_joined(Vec::<&str>::new(), ",", |w, s| {
            w.push_str(s);
        });
        assert!(w.is_empty());
    }

    #[test]
    fn test_comments() {
        let mut w = CodeWriter::new();
        w.push_block_comment("note").push_line_comment("done");
        assert_eq!(w.build(), "/* note */// done\n");
    }

    #[test]
    fn test_push_repeat() {
        let code = CodeWriter::new().raw("a").build();
        assert_eq!(code, "a");

        let mut w = CodeWriter::new();
        w.push_repeat("\t", 3);
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_capture() {
        let text = CodeWriter::capture(|w| {
            w.push_str("x").push_newline();
        });
        assert_eq!(text, "x\n");
    }
}
