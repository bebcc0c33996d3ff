//! Provide the error type shared by every writer operation.

use std::{
    fmt::Display,
    io::{Error, Write},
};

/// Errors raised by the writer and the name encoding helpers.
///
/// Both structural kinds are always raised. There is no switch that turns
/// them into silent returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlWriteError {
    /// An argument did not satisfy the precondition of the operation.
    InvalidArgument { message: String },
    /// `end_element` was called on an empty stack (`expected` is `None`)
    /// or with a name that differs from the innermost open element.
    MismatchedElement {
        expected: Option<String>,
        found: String,
    },
    /// The encoding label given at construction is not known, or names an
    /// encoding that cannot be used for output.
    UnsupportedEncoding { label: String },
    /// A character outside character data and attribute values has no
    /// representation in the output encoding.
    UnencodableCharacter { ch: char, encoding: String },
}

impl XmlWriteError {
    pub fn invalid_argument(&self) -> bool {
        matches!(self, XmlWriteError::InvalidArgument { message: _ })
    }

    pub fn mismatched_element(&self) -> bool {
        matches!(
            self,
            XmlWriteError::MismatchedElement {
                expected: _,
                found: _
            }
        )
    }

    pub fn unsupported_encoding(&self) -> bool {
        matches!(self, XmlWriteError::UnsupportedEncoding { label: _ })
    }

    pub fn unencodable_character(&self) -> bool {
        matches!(
            self,
            XmlWriteError::UnencodableCharacter {
                ch: _,
                encoding: _
            }
        )
    }
}

impl Display for XmlWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument { message } => write!(f, "Invalid argument: {message}"),
            Self::MismatchedElement {
                expected: None,
                found,
            } => write!(f, "endElement(\"{found}\") on empty stack"),
            Self::MismatchedElement {
                expected: Some(expected),
                found,
            } => write!(f, "endElement(\"{found}\") does not match \"{expected}\""),
            Self::UnsupportedEncoding { label } => {
                write!(f, "Unsupported encoding \"{label}\"")
            }
            Self::UnencodableCharacter { ch, encoding } => write!(
                f,
                "Character U+{:04X} cannot be written in {encoding} outside character data",
                *ch as u32
            ),
        }
    }
}

impl std::error::Error for XmlWriteError {}

/// Default generic error handler.
///
/// Writes `msg` to `out` if a context is set, otherwise to the standard error.
pub fn generic_error_default(out: Option<&mut (dyn Write + 'static)>, msg: &str) {
    if let Some(out) = out {
        write!(out, "{msg}").ok();
    } else {
        let mut stderr = std::io::stderr();
        if write!(stderr, "{msg}").is_err() {
            eprintln!("{msg}: {}", Error::last_os_error());
        }
    }
}
