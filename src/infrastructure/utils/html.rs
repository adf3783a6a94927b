/// Escapes the five HTML metacharacters so `input` can be embedded as text
/// inside an HTML document or a double/single quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + input.len() / 8);
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Turns line feeds into `<br>` markers. Run on already-escaped text only.
pub fn newlines_to_breaks(escaped: &str) -> String {
    escaped.replace("\r\n", "\n").replace('\n', "<br>")
}
