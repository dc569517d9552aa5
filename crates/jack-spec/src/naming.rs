//! Operation-id naming

/// Characters that separate words in an operation id
fn is_separator(c: char) -> bool {
    matches!(c, '-' | '_' | ' ' | '/' | '.')
}

/// Convert an operation id to the camelCase key it is bound under.
///
/// A run of separators followed by a character is dropped and the character
/// is upper-cased: `get-test` -> `getTest`, `users/list` -> `usersList`.
/// Separators at the end of the input have nothing to capitalize and are kept.
pub fn to_camel_case(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut pending = String::new();

    for c in raw.chars() {
        if is_separator(c) {
            pending.push(c);
        } else if pending.is_empty() {
            result.push(c);
        } else {
            pending.clear();
            result.extend(c.to_uppercase());
        }
    }

    result.push_str(&pending);
    result
}
