//! XHTML 1.0 Strict flavour of the streaming writer.

use const_format::concatcp;

use crate::{
    error::XmlWriteError,
    stream::{MarkupWriter, NO_ATTRS, XmlStream},
};

pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const XHTML_PUBLIC_ID: &str = "-//W3C//DTD XHTML 1.0 Strict//EN";
pub const XHTML_SYSTEM_ID: &str = "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd";
pub const XHTML_DOCTYPE: &str = concatcp!(
    "<!DOCTYPE html PUBLIC \"",
    XHTML_PUBLIC_ID,
    "\" \"",
    XHTML_SYSTEM_ID,
    "\">"
);
pub const ROOT_LANG: &str = "en";
/// Attributes of the `html` root element, in output order.
pub const ROOT_ATTRIBUTES: [(&str, &str); 3] = [
    ("xmlns", XHTML_NAMESPACE),
    ("xml:lang", ROOT_LANG),
    ("lang", ROOT_LANG),
];

/// A writer for XHTML documents.
///
/// Apart from the session start, which also writes the DOCTYPE and opens
/// the `html` root, it behaves exactly like [`XmlStream`].
#[derive(Debug, Clone, Default)]
pub struct XhtmlStream {
    inner: XmlStream,
}

impl XhtmlStream {
    pub fn new(encoding: &str, dtd_local: Option<&str>, id: i64, must_indent: bool) -> Self {
        Self {
            inner: XmlStream::new(encoding, dtd_local, id, must_indent),
        }
    }

    pub fn into_inner(self) -> XmlStream {
        self.inner
    }

    pub fn into_value(self) -> String {
        self.inner.into_value()
    }

    /// Write `text` as character data, replacing every `\n` with a `<br />`
    /// element.
    ///
    /// A trailing newline produces a final `<br />` but no empty text after
    /// it.
    pub fn characters_with_br(&mut self, text: &str) -> Result<(), XmlWriteError> {
        let mut rest = text;
        while !rest.is_empty() {
            match rest.split_once('\n') {
                Some((line, next)) => {
                    self.inner.characters(line);
                    self.inner.start_element("br", NO_ATTRS);
                    self.inner.end_element("br")?;
                    rest = next;
                }
                None => {
                    self.inner.characters(rest);
                    break;
                }
            }
        }
        Ok(())
    }
}

impl MarkupWriter for XhtmlStream {
    fn stream(&self) -> &XmlStream {
        &self.inner
    }

    fn stream_mut(&mut self) -> &mut XmlStream {
        &mut self.inner
    }

    fn enter(&mut self) -> &mut Self {
        self.inner.enter();
        // No element is open yet, so this cannot touch any indent flag.
        self.inner.literal(concatcp!("\n", XHTML_DOCTYPE));
        self.inner.start_element("html", ROOT_ATTRIBUTES);
        self
    }
}
