/// Renders an answer for display: HTML-escapes the text, then turns
/// `**bold**` spans into `<strong>` elements. No other markdown is honoured.
///
/// A span never crosses a line break; an unmatched `**` is kept literally.
pub fn render_bold_spans(text: &str) -> String {
    let escaped = escape_html(text);
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut rest = escaped.as_str();

    while let Some(start) = rest.find("**") {
        let after_open = &rest[start + 2..];
        let line_end = after_open.find('\n').unwrap_or(after_open.len());
        match after_open[..line_end].find("**") {
            Some(close) => {
                out.push_str(&rest[..start]);
                out.push_str("<strong>");
                out.push_str(&after_open[..close]);
                out.push_str("</strong>");
                rest = &after_open[close + 2..];
            }
            None => {
                // No closing marker on this line: keep one '*' and rescan.
                out.push_str(&rest[..start + 1]);
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
