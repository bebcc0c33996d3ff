//! Reversible encoding of arbitrary strings into XML name tokens.
//!
//! The encoded form is a single prefix character followed by the base64
//! encoding of the input bytes, where the three characters that are not
//! allowed in XML names are substituted: `+` by `-`, `/` by `.` and `=` by
//! `_`.

use base64::{
    Engine,
    alphabet,
    engine::{
        DecodePaddingMode,
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD},
    },
};

use crate::error::XmlWriteError;

/// Prefix used by [`name_from_string`].
pub const NAME_PREFIX: char = 'Z';

// Lenient engine for the decoding side, never asked to validate padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn to_name_char(ch: char) -> char {
    match ch {
        '+' => '-',
        '/' => '.',
        '=' => '_',
        ch => ch,
    }
}

fn from_name_char(ch: char) -> char {
    match ch {
        '-' => '+',
        '.' => '/',
        '_' => '=',
        ch => ch,
    }
}

/// Encode `value` as `prefix` followed by the name-safe base64 form of its
/// bytes.
///
/// # Errors
/// Returns `XmlWriteError::InvalidArgument` if `prefix` is not exactly one
/// character long.
///
/// # Examples
/// ```rust
/// use xmlwrite::names::{decode_string, encode_string};
///
/// let encoded = encode_string(b"a/b?", "X").unwrap();
/// assert_eq!(encoded, "XYS9iPw__");
/// assert_eq!(decode_string(&encoded), b"a/b?");
/// ```
pub fn encode_string(value: impl AsRef<[u8]>, prefix: &str) -> Result<String, XmlWriteError> {
    let mut chars = prefix.chars();
    let (Some(first), None) = (chars.next(), chars.next()) else {
        return Err(XmlWriteError::InvalidArgument {
            message: format!(
                "Prefix for encoding string must be a single character, not \"{prefix}\""
            ),
        });
    };

    Ok(encode_with(first, value.as_ref()))
}

fn encode_with(prefix: char, value: &[u8]) -> String {
    let encoded = STANDARD.encode(value);
    let mut ret = String::with_capacity(encoded.len() + prefix.len_utf8());
    ret.push(prefix);
    ret.extend(encoded.chars().map(to_name_char));
    ret
}

/// Reverse [`encode_string`]. The first character is the prefix and is
/// skipped.
///
/// This is a best-effort inverse. Decoding stops at the first character that
/// is not part of the substituted alphabet, and malformed input yields
/// whatever bytes could be recovered instead of an error.
pub fn decode_string(value: &str) -> Vec<u8> {
    let mut chars = value.chars();
    if chars.next().is_none() {
        return vec![];
    }

    let mut payload = chars
        .map(from_name_char)
        .take_while(|&ch| ch.is_ascii_alphanumeric() || ch == '+' || ch == '/')
        .collect::<String>();
    // A lone trailing sextet carries no complete byte.
    if payload.len() % 4 == 1 {
        payload.pop();
    }
    LENIENT.decode(&payload).unwrap_or_default()
}

/// Turn arbitrary data into a syntactically valid XML name.
///
/// Equivalent to `encode_string(value, "Z")`, which cannot fail.
pub fn name_from_string(value: impl AsRef<[u8]>) -> String {
    encode_with(NAME_PREFIX, value.as_ref())
}

/// Check whether `ch` may start an XML name (`NameStartChar` of XML 1.0
/// fifth edition).
pub fn is_name_start_char(ch: char) -> bool {
    matches!(ch,
        ':'
        | 'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

/// Check whether `ch` may appear in an XML name after the first character.
pub fn is_name_char(ch: char) -> bool {
    is_name_start_char(ch)
        || matches!(ch,
            '-'
            | '.'
            | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}'
        )
}

/// Check whether `name` is a valid XML `Name`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}
