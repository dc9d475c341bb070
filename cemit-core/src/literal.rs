//! Formatting helpers for C literal tokens.

/// Format a floating point value the way C's `%f` does.
pub fn format_fixed(value: f64) -> String {
    format!("{value:.6}")
}

/// Escape a character for use inside a C character or string literal.
fn escape_into(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\0' => out.push_str("\\0"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c => out.push(c),
    }
}

/// Quote a character: `x` becomes `'x'`, `'` becomes `'\''`.
pub fn quote_char(c: char) -> String {
    let mut out = String::from("'");
    escape_into(&mut out, c, '\'');
    out.push('\'');
    out
}

/// Escape string contents so they can be placed between double quotes.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        escape_into(&mut out, c, '"');
    }
    out
}

/// Turn every newline into a preprocessor line continuation.
pub fn continue_lines(s: &str) -> String {
    s.replace('\n', "\\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(2.0), "2.000000");
        assert_eq!(format_fixed(0.5), "0.500000");
        assert_eq!(format_fixed(-1.25), "-1.250000");
    }

    #[test]
    fn test_quote_char() {
        assert_eq!(quote_char('x'), "'x'");
        assert_eq!(quote_char('\''), "'\\''");
        assert_eq!(quote_char('\n'), "'\\n'");
        assert_eq!(quote_char('"'), "'\"'");
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("plain"), "plain");
        assert_eq!(escape_string("say \"hi\"\n"), "say \\\"hi\\\"\\n");
        assert_eq!(escape_string("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_continue_lines() {
        assert_eq!(continue_lines("a\nb\n"), "a\\\nb\\\n");
        assert_eq!(continue_lines("none"), "none");
    }
}
