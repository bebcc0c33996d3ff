//! Escaping of character data, attribute values, comments and processing
//! instructions.
//!
//! Only the five predefined XML entities are substituted, everything else
//! passes through unchanged.

use std::borrow::Cow;

/// The predefined entities.
pub const ENTITY_MAP: [(char, &str); 5] = [
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('&', "&amp;"),
    ('\'', "&apos;"),
    ('"', "&quot;"),
];

fn entity_for(ch: u8) -> Option<&'static str> {
    ENTITY_MAP
        .iter()
        .find(|&&(special, _)| special == char::from(ch))
        .map(|&(_, entity)| entity)
}

/// Append `input` to `out`, replacing the five special characters with
/// their named entities.
///
/// Returns `true` if at least one substitution occurred. If it returns
/// `false`, exactly `input` has been appended.
pub fn escape_into(input: &str, out: &mut String) -> bool {
    let mut escaped = false;
    let mut start = 0;
    // All special characters are ASCII, so byte offsets are char boundaries.
    for (pos, ch) in input.bytes().enumerate() {
        if let Some(entity) = entity_for(ch) {
            if !escaped {
                out.reserve(input.len() + 8);
                escaped = true;
            }
            out.push_str(&input[start..pos]);
            out.push_str(entity);
            start = pos + 1;
        }
    }
    out.push_str(&input[start..]);
    escaped
}

/// Escape `input` for use as XML text or attribute value.
///
/// If no character needs escaping, return the original `input` wrapped in
/// `Cow::Borrowed`. Otherwise return the escaped copy in `Cow::Owned`.
///
/// # Examples
/// ```rust
/// use std::borrow::Cow;
///
/// use xmlwrite::escape::escape_text;
///
/// assert_eq!(escape_text("a < b"), Cow::<str>::Owned("a &lt; b".to_owned()));
/// assert_eq!(escape_text("plain"), Cow::<str>::Borrowed("plain"));
/// ```
pub fn escape_text(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| entity_for(b).is_some()) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() * 2);
    escape_into(input, &mut out);
    Cow::Owned(out)
}
