use std::borrow::Cow;

/// Strips HTML tags and decodes the common named entities from feed metadata.
///
/// Feed descriptions frequently arrive as HTML fragments; downstream consumers
/// want plain text. Uses simple string scanning (no HTML parser dependency):
/// everything between `<` and the matching `>` is dropped, entities
/// `&amp;` `&lt;` `&gt;` `&quot;` `&#39;` `&nbsp;` are decoded, and runs of
/// whitespace collapse to a single space.
///
/// A `<` with no closing `>` drops the remainder of the input — truncated
/// markup is treated as markup, never leaked as text.
///
/// Returns `Cow::Borrowed` when the input contains no markup (common case).
///
/// # Examples
///
/// ```
/// use feedscout::util::strip_html;
///
/// assert_eq!(strip_html("<p>Hello <b>world</b></p>"), "Hello world");
/// assert_eq!(strip_html("Fish &amp; chips"), "Fish & chips");
/// assert_eq!(strip_html("plain text"), "plain text");
/// ```
pub fn strip_html(s: &str) -> Cow<'_, str> {
    // Fast path: no markup, no entities, no whitespace to collapse or trim
    if !s
        .chars()
        .any(|c| c == '<' || c == '&' || c == '\n' || c == '\r' || c == '\t')
        && !s.contains("  ")
        && !s.starts_with(' ')
        && !s.ends_with(' ')
    {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices();
    let mut last_was_space = true; // suppress leading whitespace

    while let Some((idx, c)) = chars.next() {
        match c {
            '<' => {
                // Skip until the closing '>'; unterminated tags consume the rest
                let mut closed = false;
                for (_, tc) in chars.by_ref() {
                    if tc == '>' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    break;
                }
                // Tags act as word boundaries
                if !last_was_space {
                    out.push(' ');
                    last_was_space = true;
                }
            }
            '&' => {
                let rest = &s[idx..];
                let (decoded, len) = decode_entity(rest);
                match decoded {
                    Some(' ') => {
                        // &nbsp; joins the whitespace run
                        if !last_was_space {
                            out.push(' ');
                            last_was_space = true;
                        }
                        for _ in 1..len {
                            chars.next();
                        }
                    }
                    Some(d) => {
                        out.push(d);
                        last_was_space = false;
                        // Consume the entity body ('&' already consumed)
                        for _ in 1..len {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('&');
                        last_was_space = false;
                    }
                }
            }
            c if c.is_whitespace() => {
                if !last_was_space {
                    out.push(' ');
                    last_was_space = true;
                }
            }
            c => {
                out.push(c);
                last_was_space = false;
            }
        }
    }

    while out.ends_with(' ') {
        out.pop();
    }

    Cow::Owned(out)
}

/// Decodes a named entity at the start of `s` (which begins with `&`).
///
/// Returns the decoded character and the entity's length in bytes, or
/// `(None, 0)` when the prefix is not a recognized entity.
fn decode_entity(s: &str) -> (Option<char>, usize) {
    const ENTITIES: [(&str, char); 7] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&apos;", '\''),
        ("&nbsp;", ' '),
    ];
    for (name, c) in ENTITIES {
        if s.starts_with(name) {
            return (Some(c), name.len());
        }
    }
    (None, 0)
}

/// Strip terminal control characters and ANSI escape sequences from text.
///
/// Removes characters that could manipulate downstream rendering of
/// attacker-controlled feed metadata (titles, descriptions).
///
/// Strips:
/// - ASCII control chars: 0x00-0x08, 0x0B-0x0C, 0x0E-0x1F, 0x7F
/// - ANSI CSI sequences: `\x1b[` ... (terminal byte 0x40-0x7E)
/// - ANSI OSC sequences: `\x1b]` ... (until BEL 0x07 or ST `\x1b\\`)
/// - Bare ESC (0x1b) not followed by `[` or `]`
///
/// Preserves: tab (0x09), newline (0x0A), carriage return (0x0D).
///
/// Returns `Cow::Borrowed` when the input contains no control characters
/// (common case) — a single byte scan with no allocation.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    // Fast path: scan for any byte that needs stripping
    let needs_strip = bytes
        .iter()
        .any(|&b| b == 0x1b || b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d));

    if !needs_strip {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b == 0x1b {
            // ESC byte — check what follows
            if i + 1 < len && bytes[i + 1] == b'[' {
                // CSI sequence: skip \x1b[ then parameter/intermediate bytes until final byte
                i += 2;
                while i < len {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break; // final byte consumed
                    }
                }
            } else if i + 1 < len && bytes[i + 1] == b']' {
                // OSC sequence: skip \x1b] then everything until BEL or ST (\x1b\\)
                i += 2;
                while i < len {
                    if bytes[i] == 0x07 {
                        i += 1; // consume BEL
                        break;
                    }
                    if bytes[i] == 0x1b && i + 1 < len && bytes[i + 1] == b'\\' {
                        i += 2; // consume ST
                        break;
                    }
                    i += 1;
                }
            } else {
                // Bare ESC — skip it
                i += 1;
            }
        } else if b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d) {
            // Control character (not tab/newline/CR) — skip
            i += 1;
        } else {
            // Safe byte — find the run of safe bytes to batch-copy
            let start = i;
            i += 1;
            while i < len {
                let nb = bytes[i];
                if nb == 0x1b || nb == 0x7f || (nb < 0x20 && nb != 0x09 && nb != 0x0a && nb != 0x0d)
                {
                    break;
                }
                i += 1;
            }
            // SAFETY: we only break on ASCII control bytes, which cannot appear
            // mid-codepoint in valid UTF-8, so s[start..i] is valid UTF-8.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    // ========================================================================
    // strip_html tests
    // ========================================================================

    #[test]
    fn test_strip_plain_text_returns_borrowed() {
        let input = "A feed about interesting things.";
        let result = strip_html(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_simple_tags() {
        assert_eq!(strip_html("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn test_strip_tag_with_attributes() {
        assert_eq!(
            strip_html(r#"<a href="https://example.com">Example</a> site"#),
            "Example site"
        );
    }

    #[test]
    fn test_strip_decodes_entities() {
        assert_eq!(strip_html("Fish &amp; chips"), "Fish & chips");
        assert_eq!(strip_html("1 &lt; 2 &gt; 0"), "1 < 2 > 0");
        assert_eq!(strip_html("&quot;quoted&quot;"), "\"quoted\"");
        assert_eq!(strip_html("it&#39;s &apos;fine&apos;"), "it's 'fine'");
    }

    #[test]
    fn test_strip_unknown_entity_kept_literal() {
        assert_eq!(strip_html("AT&T &bogus; rocks"), "AT&T &bogus; rocks");
    }

    #[test]
    fn test_strip_collapses_whitespace() {
        assert_eq!(strip_html("a\n\n  b\t\tc"), "a b c");
        assert_eq!(strip_html("<p>line one</p>\n<p>line two</p>"), "line one line two");
    }

    #[test]
    fn test_strip_trims_edges() {
        assert_eq!(strip_html("  <p> padded </p>  "), "padded");
    }

    #[test]
    fn test_strip_unterminated_tag_drops_rest() {
        assert_eq!(strip_html("before <img src=\"x"), "before");
    }

    #[test]
    fn test_strip_empty_string() {
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_strip_unicode_preserved() {
        assert_eq!(strip_html("<p>日本語のフィード</p>"), "日本語のフィード");
    }

    proptest! {
        #[test]
        fn strip_html_never_leaks_markup(s in "[^&]*") {
            // Without entities, any '<' starts a tag and must be consumed
            let out = strip_html(&s);
            prop_assert!(!out.contains('<'));
        }

        #[test]
        fn strip_html_is_identity_on_clean_ascii(s in "[a-zA-Z0-9.,!? ]*") {
            // No markup, no entities, and single spaces only
            prop_assume!(!s.contains("  "));
            let trimmed = s.trim();
            prop_assume!(trimmed == s);
            let out = strip_html(&s);
            prop_assert_eq!(out.as_ref(), s.as_str());
        }
    }

    // ========================================================================
    // strip_control_chars tests
    // ========================================================================

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "Hello, world! This is clean text.";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_control_chars_removes_controls() {
        let input = "he\x00ll\x07o\x08 w\x0bor\x0cld\x01!";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Owned(_)));
        assert_eq!(result, "hello world!");
    }

    #[test]
    fn test_strip_ansi_color_codes() {
        let input = "\x1b[31mRed text\x1b[0m";
        let result = strip_control_chars(input);
        assert_eq!(result, "Red text");
    }

    #[test]
    fn test_strip_osc_with_bel() {
        let input = "\x1b]0;malicious title\x07safe text";
        let result = strip_control_chars(input);
        assert_eq!(result, "safe text");
    }

    #[test]
    fn test_strip_bare_esc() {
        let input = "before\x1bafter";
        let result = strip_control_chars(input);
        assert_eq!(result, "beforeafter");
    }

    #[test]
    fn test_strip_preserves_tabs_newlines_cr() {
        let input = "line1\nline2\ttabbed\r\nwindows";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }
}
