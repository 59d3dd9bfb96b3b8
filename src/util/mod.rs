//! Small pure helpers shared by storage and the token flows.

/// Split `value` into chunks of at most `max_length` characters.
///
/// Splits on `char` boundaries, so multibyte text never tears. An empty
/// input yields no chunks.
pub fn split_chunks(value: &str, max_length: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for ch in value.chars() {
        if current.chars().count() == max_length {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Normalize an issuer domain before building endpoint URLs: strip any
/// trailing slash.
pub fn sanitize_url(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Percent-encode fields into an `application/x-www-form-urlencoded` body.
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
