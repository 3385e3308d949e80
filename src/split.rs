//! Escape-aware splitting of delimited values.

/// Split `text` at every unescaped `delimiter`.
///
/// A backslash escapes the following character and is dropped. A lone
/// backslash at the very end of the input is kept as-is. Empty input yields
/// no parts; a trailing delimiter yields a trailing empty part.
pub fn split_escaped(text: &str, delimiter: char) -> Vec<String> {
    let mut parts = Vec::new();
    if text.is_empty() {
        return parts;
    }

    let mut current = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(chars.next().unwrap_or('\\'));
        } else if c == delimiter {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}
