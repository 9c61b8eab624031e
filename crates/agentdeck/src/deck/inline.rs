//! Inline markup: `**bold**`, `*italic*`, `` `code` `` and `[label](url)`.
//!
//! One left-to-right pass. At every position the four constructs are tried in
//! that order and the first match wins; text that matches nothing is kept
//! verbatim. Delimited text is never parsed again, so there is no nesting.

/// A run of inline text with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { label: String, url: String },
}

impl Span {
    /// The text a reader sees, without delimiters or link target.
    pub fn visible(&self) -> &str {
        match self {
            Span::Text(s) | Span::Bold(s) | Span::Italic(s) | Span::Code(s) => s,
            Span::Link { label, .. } => label,
        }
    }
}

/// Split `text` into styled spans. Never fails; malformed markup stays as plain text.
pub fn format(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        match match_at(rest) {
            Some((span, consumed)) => {
                push_plain(&mut spans, &text[plain_start..pos]);
                spans.push(span);
                pos += consumed;
                plain_start = pos;
            }
            None => {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    push_plain(&mut spans, &text[plain_start..]);
    spans
}

/// Concatenated visible text of `spans`.
pub fn visible_text(spans: &[Span]) -> String {
    spans.iter().map(Span::visible).collect()
}

fn push_plain(spans: &mut Vec<Span>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Span::Text(prev)) = spans.last_mut() {
        prev.push_str(text);
    } else {
        spans.push(Span::Text(text.to_string()));
    }
}

fn match_at(rest: &str) -> Option<(Span, usize)> {
    if let Some((inner, n)) = delimited(rest, "**", "**") {
        return Some((Span::Bold(inner.to_string()), n));
    }
    if let Some((inner, n)) = delimited(rest, "*", "*") {
        return Some((Span::Italic(inner.to_string()), n));
    }
    if let Some((inner, n)) = delimited(rest, "`", "`") {
        return Some((Span::Code(inner.to_string()), n));
    }
    link(rest)
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn line_end(s: &str) -> usize {
    s.find(is_line_break).unwrap_or(s.len())
}

/// `open`, then at least one character, then the nearest `close` on the same line.
/// Returns the inner text and the number of bytes consumed.
fn delimited<'a>(s: &'a str, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let body = s.strip_prefix(open)?;
    let first = body.chars().next().filter(|c| !is_line_break(*c))?;
    let from = first.len_utf8();
    let end = from + body[from..line_end(body)].find(close)?;
    Some((&body[..end], open.len() + end + close.len()))
}

/// `[label](url)`; the label only runs past a `](` when no url closes after it.
fn link(s: &str) -> Option<(Span, usize)> {
    let body = s.strip_prefix('[')?;
    let first = body.chars().next().filter(|c| !is_line_break(*c))?;
    let limit = line_end(body);

    let mut from = first.len_utf8();
    while from < limit {
        let split = from + body[from..limit].find("](")?;
        let after = &body[split + 2..];
        if let Some((url, n)) = delimited_tail(after, ')') {
            let span = Span::Link {
                label: body[..split].to_string(),
                url: url.to_string(),
            };
            return Some((span, 1 + split + 2 + n));
        }
        from = split + 1;
    }
    None
}

/// At least one character then the nearest `close` on the same line.
fn delimited_tail(s: &str, close: char) -> Option<(&str, usize)> {
    let first = s.chars().next().filter(|c| !is_line_break(*c))?;
    let from = first.len_utf8();
    let end = from + s[from..line_end(s)].find(close)?;
    Some((&s[..end], end + close.len_utf8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    fn bold(s: &str) -> Span {
        Span::Bold(s.to_string())
    }

    fn italic(s: &str) -> Span {
        Span::Italic(s.to_string())
    }

    fn code(s: &str) -> Span {
        Span::Code(s.to_string())
    }

    fn link(label: &str, url: &str) -> Span {
        Span::Link {
            label: label.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_plain() {
        assert_eq!(format("plain"), vec![text("plain")]);
    }

    #[test]
    fn test_text_without_delimiters_is_one_plain_span() {
        for input in [
            "plain",
            " ",
            "  \t  ",
            "\n\n",
            "Hello, world!",
            "snake_case (and) {braces} #hash",
            "line one\nline two",
            "Привет, мир",
            "日本語のテキスト",
            "ship it 🚀 now",
        ] {
            assert_eq!(format(input), vec![text(input)], "{input:?}");
            assert_eq!(visible_text(&format(input)), input);
        }
    }

    #[test]
    fn test_empty() {
        assert!(format("").is_empty());
    }

    #[test]
    fn test_bold() {
        assert_eq!(format("**bold**"), vec![bold("bold")]);
    }

    #[test]
    fn test_italic_and_code() {
        assert_eq!(
            format("*it* and `code`"),
            vec![italic("it"), text(" and "), code("code")]
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(format("[go](http://x)"), vec![link("go", "http://x")]);
    }

    #[test]
    fn test_unclosed_marker_is_verbatim() {
        assert_eq!(format("a *b"), vec![text("a *b")]);
        assert_eq!(format("`open"), vec![text("`open")]);
        assert_eq!(format("[x]("), vec![text("[x](")]);
    }

    #[test]
    fn test_back_to_back() {
        assert_eq!(format("**a***b*"), vec![bold("a"), italic("b")]);
        assert_eq!(format("`x``y`"), vec![code("x"), code("y")]);
    }

    #[test]
    fn test_code_content_is_not_parsed() {
        assert_eq!(format("`*x*`"), vec![code("*x*")]);
    }

    #[test]
    fn test_unbalanced_bold_falls_back_to_italic() {
        assert_eq!(format("**a*"), vec![italic("*a")]);
    }

    #[test]
    fn test_empty_delimiters_stay_plain() {
        assert_eq!(format("** and ``"), vec![text("** and ``")]);
    }

    #[test]
    fn test_lazy_close() {
        assert_eq!(
            format("*a* b *c*"),
            vec![italic("a"), text(" b "), italic("c")]
        );
    }

    #[test]
    fn test_no_match_across_line_break() {
        assert_eq!(format("*a\nb*"), vec![text("*a\nb*")]);
        assert_eq!(format("**a\n**"), vec![text("**a\n**")]);
    }

    #[test]
    fn test_link_label_extends_to_working_url() {
        assert_eq!(format("[a] b](c)"), vec![link("a] b", "c")]);
        assert_eq!(
            format("[a](b) c](d)"),
            vec![link("a", "b"), text(" c](d)")]
        );
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            format("→ **ключ** ✅ `é`"),
            vec![text("→ "), bold("ключ"), text(" ✅ "), code("é")]
        );
    }

    #[test]
    fn test_visible_text_drops_delimiters() {
        let spans = format("Tokens `IDs` → **embeddings** and [docs](https://x.y)");
        assert_eq!(visible_text(&spans), "Tokens IDs → embeddings and docs");
    }

    #[test]
    fn test_plain_runs_are_merged() {
        let spans = format("a * b ` c [d");
        assert_eq!(spans, vec![text("a * b ` c [d")]);
    }

    #[test]
    fn test_deck_style_line() {
        let spans = format("❌ *\"Is this correct?\"* → ✅ *\"Find problems in this code\"*");
        assert_eq!(
            spans,
            vec![
                text("❌ "),
                italic("\"Is this correct?\""),
                text(" → ✅ "),
                italic("\"Find problems in this code\""),
            ]
        );
    }
}
