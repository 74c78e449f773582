/// Characters shown on each side of the first match in a snippet.
pub const DEFAULT_SNIPPET_CONTEXT: usize = 100;

const ELLIPSIS: &str = "...";

/// Extract an excerpt of `text` around the earliest query term.
///
/// Terms are matched case-insensitively as raw substrings, so `cat` also
/// hits inside `concatenate`. The window spans `context` characters on each
/// side of the match, with `...` marking any side that was cut. If no term
/// occurs, the first `2 * context` characters are returned followed by
/// `...`.
pub fn extract_snippet(text: &str, terms: &[String], context: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let lowered: Vec<char> = chars.iter().map(|&c| lower_char(c)).collect();

    let best = terms
        .iter()
        .filter_map(|term| {
            let needle: Vec<char> = term.chars().map(lower_char).collect();
            find_chars(&lowered, &needle)
        })
        .min();

    let Some(pos) = best else {
        let head: String =
            chars.iter().take(context.saturating_mul(2)).collect();
        return format!("{}{ELLIPSIS}", head.trim());
    };

    let start = pos.saturating_sub(context);
    let end = pos.saturating_add(context).min(chars.len());
    let window: String = chars[start..end].iter().collect();

    let mut snippet = String::with_capacity(window.len() + 2 * ELLIPSIS.len());
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(window.trim());
    if end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Replace every run of whitespace with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// One char in, one char out, so lowered positions match positions in
// the input text.
fn lower_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
