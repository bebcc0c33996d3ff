//! Scoped helpers that pair one `start_element` with exactly one
//! `end_element`.

use std::ops::{Deref, DerefMut};

use crate::{error::XmlWriteError, generic_error, stream::MarkupWriter};

/// An open element that is closed when the guard goes out of scope.
///
/// The guard borrows the writer for its whole lifetime and dereferences to
/// it, so nested content (including nested guards) is written through it.
///
/// # Examples
/// ```rust
/// use xmlwrite::{Element, NO_ATTRS, XmlStream};
///
/// let mut stream = XmlStream::new("utf-8", None, 0, true);
/// {
///     let mut list = Element::new(&mut stream, "ul", [("class", "menu")]);
///     let mut item = Element::new(&mut *list, "li", NO_ATTRS);
///     item.characters("first");
/// }
/// assert_eq!(
///     stream.get_value(),
///     "\n<ul class=\"menu\">\n  <li>first</li>\n</ul>"
/// );
/// ```
pub struct Element<'a, W: MarkupWriter> {
    writer: &'a mut W,
    name: String,
    closed: bool,
}

impl<'a, W: MarkupWriter> Element<'a, W> {
    /// Start `name` with `attrs` on `writer`.
    pub fn new<I, K, V>(writer: &'a mut W, name: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        writer.start_element(name, attrs);
        Self {
            writer,
            name: name.to_owned(),
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Close the element now and report the result.
    ///
    /// Dropping the guard does the same, but can only report a failure
    /// through the generic error channel.
    pub fn finish(mut self) -> Result<(), XmlWriteError> {
        self.closed = true;
        self.writer.end_element(&self.name)
    }
}

impl<W: MarkupWriter> Deref for Element<'_, W> {
    type Target = W;

    fn deref(&self) -> &Self::Target {
        &*self.writer
    }
}

impl<W: MarkupWriter> DerefMut for Element<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.writer
    }
}

impl<W: MarkupWriter> Drop for Element<'_, W> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.writer.end_element(&self.name) {
            generic_error!("Element \"{}\" could not be closed: {err}\n", self.name);
        }
    }
}

/// Run `f` inside the element `name`.
///
/// The element is closed whether `f` succeeds or not. If `f` fails its
/// error is returned, otherwise the result of closing the element is.
pub fn with_element<W, I, K, V, T, E, F>(
    writer: &mut W,
    name: &str,
    attrs: I,
    f: F,
) -> Result<T, E>
where
    W: MarkupWriter,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    E: From<XmlWriteError>,
    F: FnOnce(&mut W) -> Result<T, E>,
{
    writer.start_element(name, attrs);
    let res = f(writer);
    let closed = writer.end_element(name);
    let value = res?;
    closed?;
    Ok(value)
}
