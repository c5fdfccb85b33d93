//! Content-Type header parsing.

const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Splits a Content-Type header into its media type and parameters.
///
/// `"text/html; charset=UTF-8"` becomes `("text/html", [("charset", "UTF-8")])`.
/// The media type and parameter names are lower-cased, quoted values are
/// unquoted, and a repeated parameter name overwrites the earlier value while
/// keeping its first position. A blank header is treated as `text/plain`.
pub fn parse_content_type(mime: &str) -> (String, Vec<(String, String)>) {
    let mut parts = split_params(mime).into_iter();

    let main_type = parts
        .next()
        .map(|p| p.trim().to_ascii_lowercase())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| String::from(DEFAULT_MIME_TYPE));

    let mut params: Vec<(String, String)> = Vec::new();
    for part in parts {
        let Some((name, value)) = part.split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = unquote(value.trim());

        match params.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => params.push((name, value)),
        }
    }

    (main_type, params)
}

/// Splits on `;` outside of double quotes.
fn split_params(header: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&header[start..]);
    parts
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    } else {
        value.to_string()
    }
}
