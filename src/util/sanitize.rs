use regex::Regex;
use std::sync::LazyLock;

// CSI (ESC[ ... cmd) and OSC (ESC] ... BEL) sequences
static ANSI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]|\x1B\][^\x07]*\x07").expect("static regex")
});

const MAX_LABEL_CHARS: usize = 120;

/// Makes backend-supplied text safe to print: escape sequences and control
/// characters are dropped, whitespace runs collapse to one space, and long
/// text is cut with an ellipsis.
pub fn sanitize_for_terminal(s: &str) -> String {
    let no_ansi = ANSI.replace_all(s, "");

    let mut cleaned = String::with_capacity(no_ansi.len());
    let mut last_was_space = false;
    for ch in no_ansi.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                cleaned.push(' ');
            }
            last_was_space = true;
        } else if !ch.is_control() {
            cleaned.push(ch);
            last_was_space = false;
        }
    }

    let trimmed = cleaned.trim();
    if trimmed.chars().count() <= MAX_LABEL_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_LABEL_CHARS - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_escapes_and_controls() {
        assert_eq!(sanitize_for_terminal("\x1b[31mred\x1b[0m title\x07"), "red title");
        assert_eq!(sanitize_for_terminal("\x1b]0;pwned\x07ok"), "ok");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize_for_terminal("  a\n\n\tb  c "), "a b c");
    }

    #[test]
    fn truncates_long_text() {
        let long = "x".repeat(500);
        let out = sanitize_for_terminal(&long);
        assert_eq!(out.chars().count(), MAX_LABEL_CHARS);
        assert!(out.ends_with('…'));
    }
}
