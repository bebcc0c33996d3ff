//! Provide the streaming XML writer.
//!
//! The writer never builds a tree. Every call appends to an in-memory buffer
//! and updates two parallel stacks: the names of the open elements and, for
//! each of them, whether structural whitespace may still be inserted.
//!
//! Indentation is decided per token: a newline followed by one `INDENT_STR`
//! per open element is written before a start tag, an end tag or a forced
//! comment only if *every* open element still permits indentation. Writing
//! character data, literal text, CDATA or a processing instruction into an
//! element clears its flag for the rest of its lifetime, because added
//! whitespace would become part of its content.

use std::ops::Range;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

use crate::{error::XmlWriteError, escape::escape_into, generic_error};

/// One level of indentation.
pub const INDENT_STR: &str = "  ";

/// Attribute list for elements without attributes.
pub const NO_ATTRS: [(&str, &str); 0] = [];

#[derive(Debug, Clone)]
pub struct XmlStream {
    // output buffer
    output: String,
    // encoding label, written verbatim into the declaration
    encoding: String,
    dtd_local: Option<String>,
    // initial indent flag of every new element
    must_indent: bool,
    int_id: i64,
    // element name stack, innermost last
    elem_stack: Vec<String>,
    // indent permission per open element, parallel to `elem_stack`
    can_indent_stack: Vec<bool>,
    // the last start tag still lacks its `>`
    in_elem: bool,
    // byte ranges of `output` holding escaped character data or attribute
    // values, in order and non-overlapping
    text_spans: Vec<Range<usize>>,
}

impl XmlStream {
    /// Create a new writer.
    ///
    /// `encoding` is used verbatim in the XML declaration. `dtd_local` is
    /// stored but never written by this writer. `id` seeds the counter used
    /// by [`XmlStream::id`]. `must_indent` is the initial indent permission
    /// of every element opened later.
    pub fn new(encoding: &str, dtd_local: Option<&str>, id: i64, must_indent: bool) -> Self {
        Self {
            output: String::new(),
            encoding: encoding.to_owned(),
            dtd_local: dtd_local.map(|dtd| dtd.to_owned()),
            must_indent,
            int_id: id,
            elem_stack: vec![],
            can_indent_stack: vec![],
            in_elem: false,
            text_spans: vec![],
        }
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn dtd_local(&self) -> Option<&str> {
        self.dtd_local.as_deref()
    }

    pub fn must_indent(&self) -> bool {
        self.must_indent
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.elem_stack.len()
    }

    /// Names of the open elements, outermost first.
    pub fn open_elements(&self) -> &[String] {
        &self.elem_stack
    }

    /// Whether the last start tag is still waiting for its `>`.
    pub fn is_tag_open(&self) -> bool {
        self.in_elem
    }

    /// Return the document built so far.
    ///
    /// This may be called at any time, the result is only complete after
    /// [`XmlStream::close`].
    pub fn get_value(&self) -> &str {
        &self.output
    }

    /// Consume the writer and return the document built so far.
    pub fn into_value(self) -> String {
        self.output
    }

    /// Return the document transcoded into the encoding named at
    /// construction.
    ///
    /// Inside character data and attribute values, characters that the
    /// target encoding cannot represent are written as numeric character
    /// references. Anywhere else (names, comments, processing instructions,
    /// CDATA sections and literal text) such a character is an error.
    ///
    /// # Errors
    /// Returns `XmlWriteError::UnsupportedEncoding` if the label is unknown
    /// or names an encoding that is never used for output, such as
    /// `replacement`. Returns `XmlWriteError::UnencodableCharacter` for an
    /// unmappable character outside character data and attribute values.
    pub fn encoded_value(&self) -> Result<Vec<u8>, XmlWriteError> {
        let Some(encoding) = Encoding::for_label(self.encoding.as_bytes()) else {
            return Err(XmlWriteError::UnsupportedEncoding {
                label: self.encoding.clone(),
            });
        };
        // `encoding_rs` has no UTF-16 encoder.
        if encoding == UTF_16LE {
            return Ok(self
                .output
                .encode_utf16()
                .flat_map(u16::to_le_bytes)
                .collect());
        }
        if encoding == UTF_16BE {
            return Ok(self
                .output
                .encode_utf16()
                .flat_map(u16::to_be_bytes)
                .collect());
        }
        if encoding.output_encoding() != encoding {
            return Err(XmlWriteError::UnsupportedEncoding {
                label: self.encoding.clone(),
            });
        }

        let mut bytes = Vec::with_capacity(self.output.len());
        let mut pos = 0;
        for span in &self.text_spans {
            encode_markup(encoding, &self.output[pos..span.start], &mut bytes)?;
            let (text, _, _) = encoding.encode(&self.output[span.clone()]);
            bytes.extend_from_slice(&text);
            pos = span.end;
        }
        encode_markup(encoding, &self.output[pos..], &mut bytes)?;
        Ok(bytes)
    }

    /// Return the current value of the id counter as a string, then
    /// increment it.
    ///
    /// The counter wraps around to `i64::MIN` after `i64::MAX`.
    pub fn id(&mut self) -> String {
        let ret = self.int_id.to_string();
        self.int_id = self.int_id.wrapping_add(1);
        ret
    }

    /// Whether every open element still permits indentation.
    pub fn can_indent(&self) -> bool {
        self.can_indent_stack.iter().all(|&flag| flag)
    }

    fn flip_indent(&mut self, flag: bool) {
        if let Some(last) = self.can_indent_stack.last_mut() {
            *last = flag;
        }
    }

    /// Stop indenting inside the innermost open element.
    ///
    /// Does nothing if no element is open.
    pub fn xml_space_preserve(&mut self) {
        self.flip_indent(false);
    }

    fn indent(&mut self) {
        if self.can_indent() {
            self.output.push('\n');
            for _ in 0..self.elem_stack.len() {
                self.output.push_str(INDENT_STR);
            }
        }
    }

    fn close_elem_if_open(&mut self) {
        if self.in_elem {
            self.output.push('>');
            self.in_elem = false;
        }
    }

    fn write_escaped(&mut self, text: &str) {
        escape_into(text, &mut self.output);
    }

    // Escape `text` and remember it as character data.
    fn write_text(&mut self, text: &str) {
        let start = self.output.len();
        self.write_escaped(text);
        let end = self.output.len();
        if start == end {
            return;
        }
        if let Some(last) = self.text_spans.last_mut().filter(|last| last.end == start) {
            last.end = end;
        } else {
            self.text_spans.push(start..end);
        }
    }

    /// Start a session by writing the XML declaration.
    ///
    /// This must be the first write on a fresh writer.
    pub fn enter(&mut self) -> &mut Self {
        self.output.push_str("<?xml version='1.0' encoding=\"");
        self.output.push_str(&self.encoding);
        self.output.push_str("\"?>");
        self
    }

    /// Open an element.
    ///
    /// Attributes are written in iteration order. Their values are escaped.
    /// The start tag is left open until the next write, so an element
    /// closed right away becomes `<name />`.
    pub fn start_element<I, K, V>(&mut self, name: &str, attrs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.close_elem_if_open();
        self.indent();
        self.output.push('<');
        self.output.push_str(name);
        for (key, value) in attrs {
            self.output.push(' ');
            self.output.push_str(key.as_ref());
            self.output.push_str("=\"");
            self.write_text(value.as_ref());
            self.output.push('"');
        }
        self.in_elem = true;
        self.can_indent_stack.push(self.must_indent);
        self.elem_stack.push(name.to_owned());
    }

    /// Write escaped character data.
    ///
    /// The innermost element now has mixed content and will not be indented
    /// any more.
    pub fn characters(&mut self, text: &str) {
        self.close_elem_if_open();
        self.write_text(text);
        self.flip_indent(false);
    }

    /// Write `text` without escaping. Also suppresses indentation like
    /// [`XmlStream::characters`].
    pub fn literal(&mut self, text: &str) {
        self.close_elem_if_open();
        self.output.push_str(text);
        self.flip_indent(false);
    }

    /// Write an escaped comment, preceded by an indent if `new_line` is set.
    ///
    /// Comments do not count as mixed content.
    pub fn comment(&mut self, text: &str, new_line: bool) {
        self.close_elem_if_open();
        if new_line {
            self.indent();
        }
        self.output.push_str("<!--");
        self.write_escaped(text);
        self.output.push_str("-->");
    }

    /// Write an escaped processing instruction.
    pub fn pi(&mut self, text: &str) {
        self.close_elem_if_open();
        self.output.push_str("<?");
        self.write_escaped(text);
        self.output.push_str("?>");
        self.flip_indent(false);
    }

    /// Close the innermost open element, which must be called `name`.
    ///
    /// # Errors
    /// Returns `XmlWriteError::MismatchedElement` if no element is open or
    /// the innermost one has another name. Nothing is written in that case.
    pub fn end_element(&mut self, name: &str) -> Result<(), XmlWriteError> {
        let Some(last) = self.elem_stack.last() else {
            return Err(writer_err(XmlWriteError::MismatchedElement {
                expected: None,
                found: name.to_owned(),
            }));
        };
        if last != name {
            return Err(writer_err(XmlWriteError::MismatchedElement {
                expected: Some(last.clone()),
                found: name.to_owned(),
            }));
        }

        self.elem_stack.pop();
        if self.in_elem {
            self.output.push_str(" />");
            self.in_elem = false;
        } else {
            // The flag of the element being closed still counts here, so a
            // text-only element gets no whitespace before its end tag.
            self.indent();
            self.output.push_str("</");
            self.output.push_str(name);
            self.output.push('>');
        }
        self.can_indent_stack.pop();
        Ok(())
    }

    /// Write `data` as a CDATA section on lines of its own.
    ///
    /// `data` is not escaped, and the innermost element is no longer
    /// indented.
    pub fn write_cdata(&mut self, data: &str) {
        self.close_elem_if_open();
        self.xml_space_preserve();
        self.output.push_str("\n<![CDATA[\n");
        self.output.push_str(data);
        self.output.push_str("\n]]>\n");
    }

    /// Write a `script` element of type `text/ecmascript` with `script` as
    /// CDATA content.
    pub fn write_ecmascript(&mut self, script: &str) -> Result<(), XmlWriteError> {
        self.start_element("script", [("type", "text/ecmascript")]);
        self.write_cdata(script);
        self.end_element("script")
    }

    /// Write a `style` element of type `text/css`.
    ///
    /// `rules` maps each selector to its `(property, value)` pairs, all of
    /// them emitted in iteration order and without escaping.
    pub fn write_css<I, S, R, K, V>(&mut self, rules: I) -> Result<(), XmlWriteError>
    where
        I: IntoIterator<Item = (S, R)>,
        S: AsRef<str>,
        R: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut css = String::new();
        for (selector, declarations) in rules {
            css.push_str(selector.as_ref());
            css.push_str(" {\n");
            for (property, value) in declarations {
                css.push_str(property.as_ref());
                css.push_str(" : ");
                css.push_str(value.as_ref());
                css.push_str(";\n");
            }
            css.push_str("}\n");
        }

        self.start_element("style", [("type", "text/css")]);
        self.literal(&css);
        self.end_element("style")
    }

    /// End the session: close every open element, then write a final
    /// newline.
    pub fn close(&mut self) -> Result<(), XmlWriteError> {
        while let Some(name) = self.elem_stack.last().cloned() {
            self.end_element(&name)?;
        }
        self.output.push('\n');
        Ok(())
    }
}

impl Default for XmlStream {
    fn default() -> Self {
        Self::new("utf-8", None, 0, true)
    }
}

/// Encode markup that must not contain character references.
fn encode_markup(
    encoding: &'static Encoding,
    markup: &str,
    out: &mut Vec<u8>,
) -> Result<(), XmlWriteError> {
    let (encoded, _, unmappable) = encoding.encode(markup);
    if unmappable {
        let ch = markup
            .chars()
            .find(|ch| {
                let mut buf = [0; 4];
                encoding.encode(ch.encode_utf8(&mut buf)).2
            })
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Err(XmlWriteError::UnencodableCharacter {
            ch,
            encoding: encoding.name().to_owned(),
        });
    }
    out.extend_from_slice(&encoded);
    Ok(())
}

/// Report a writer error through the generic error channel and return it.
fn writer_err(err: XmlWriteError) -> XmlWriteError {
    generic_error!("{err}\n");
    err
}

/// The operation set shared by every kind of markup writer.
///
/// Implementors only provide access to their [`XmlStream`]. Every operation
/// delegates to it, and [`MarkupWriter::enter`] may be overridden to write a
/// different prologue.
pub trait MarkupWriter {
    fn stream(&self) -> &XmlStream;
    fn stream_mut(&mut self) -> &mut XmlStream;

    /// Start the session.
    fn enter(&mut self) -> &mut Self {
        self.stream_mut().enter();
        self
    }

    fn get_value(&self) -> &str {
        self.stream().get_value()
    }

    fn id(&mut self) -> String {
        self.stream_mut().id()
    }

    fn xml_space_preserve(&mut self) {
        self.stream_mut().xml_space_preserve();
    }

    fn start_element<I, K, V>(&mut self, name: &str, attrs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.stream_mut().start_element(name, attrs);
    }

    fn characters(&mut self, text: &str) {
        self.stream_mut().characters(text);
    }

    fn literal(&mut self, text: &str) {
        self.stream_mut().literal(text);
    }

    fn comment(&mut self, text: &str, new_line: bool) {
        self.stream_mut().comment(text, new_line);
    }

    fn pi(&mut self, text: &str) {
        self.stream_mut().pi(text);
    }

    fn end_element(&mut self, name: &str) -> Result<(), XmlWriteError> {
        self.stream_mut().end_element(name)
    }

    fn write_cdata(&mut self, data: &str) {
        self.stream_mut().write_cdata(data);
    }

    fn write_ecmascript(&mut self, script: &str) -> Result<(), XmlWriteError> {
        self.stream_mut().write_ecmascript(script)
    }

    fn write_css<I, S, R, K, V>(&mut self, rules: I) -> Result<(), XmlWriteError>
    where
        I: IntoIterator<Item = (S, R)>,
        S: AsRef<str>,
        R: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.stream_mut().write_css(rules)
    }

    /// End the session.
    fn close(&mut self) -> Result<(), XmlWriteError> {
        self.stream_mut().close()
    }
}

impl MarkupWriter for XmlStream {
    fn stream(&self) -> &XmlStream {
        self
    }

    fn stream_mut(&mut self) -> &mut XmlStream {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    const DECL: &str = "<?xml version='1.0' encoding=\"utf-8\"?>";

    fn new_stream() -> XmlStream {
        let mut stream = XmlStream::default();
        stream.enter();
        stream
    }

    #[test]
    fn declaration_test() {
        let mut stream = XmlStream::new("latin-1", Some("local.dtd"), 0, true);
        stream.enter();
        assert_eq!(
            stream.get_value(),
            "<?xml version='1.0' encoding=\"latin-1\"?>"
        );
        assert_eq!(stream.encoding(), "latin-1");
        assert_eq!(stream.dtd_local(), Some("local.dtd"));
        assert!(stream.must_indent());
        assert!(!XmlStream::new("utf-8", None, 0, false).must_indent());
        stream.close().unwrap();
        assert_eq!(
            stream.get_value(),
            "<?xml version='1.0' encoding=\"latin-1\"?>\n"
        );
    }

    #[test]
    fn self_closing_test() {
        let mut stream = XmlStream::new("utf-8", None, 0, false);
        stream.start_element("x", NO_ATTRS);
        assert!(stream.is_tag_open());
        stream.end_element("x").unwrap();
        assert_eq!(stream.get_value(), "\n<x />");
        assert_eq!(stream.depth(), 0);
    }

    #[test]
    fn nested_indent_test() {
        let mut stream = new_stream();
        stream.start_element("root", NO_ATTRS);
        stream.start_element("a", [("k", "v")]);
        stream.start_element("b", NO_ATTRS);
        stream.end_element("b").unwrap();
        stream.end_element("a").unwrap();
        stream.start_element("c", NO_ATTRS);
        stream.end_element("c").unwrap();
        stream.close().unwrap();
        assert_eq!(
            stream.get_value(),
            format!(
                "{DECL}\n<root>\n  <a k=\"v\">\n    <b />\n  </a>\n  <c />\n</root>\n"
            )
        );
    }

    #[test]
    fn mixed_content_test() {
        let mut stream = new_stream();
        stream.start_element("root", NO_ATTRS);
        stream.start_element("p", NO_ATTRS);
        stream.characters("Hello ");
        stream.start_element("b", NO_ATTRS);
        stream.characters("bold");
        stream.end_element("b").unwrap();
        stream.start_element("i", NO_ATTRS);
        stream.start_element("span", NO_ATTRS);
        stream.end_element("span").unwrap();
        stream.end_element("i").unwrap();
        stream.end_element("p").unwrap();
        stream.start_element("q", NO_ATTRS);
        stream.end_element("q").unwrap();
        stream.close().unwrap();
        assert_eq!(
            stream.get_value(),
            format!(
                "{DECL}\n<root>\n  <p>Hello <b>bold</b><i><span /></i></p>\n  <q />\n</root>\n"
            )
        );
    }

    #[test]
    fn text_only_element_test() {
        let mut stream = new_stream();
        stream.start_element("a", NO_ATTRS);
        stream.start_element("b", NO_ATTRS);
        stream.characters("text");
        assert!(!stream.can_indent());
        stream.end_element("b").unwrap();
        assert!(stream.can_indent());
        stream.end_element("a").unwrap();
        assert_eq!(
            stream.get_value(),
            format!("{DECL}\n<a>\n  <b>text</b>\n</a>")
        );
    }

    #[test]
    fn escaping_test() {
        let mut stream = new_stream();
        stream.start_element("a", [("title", "\"quoted\" & <angled>"), ("plain", "x")]);
        stream.characters("1 < 2 && 'yes'");
        stream.end_element("a").unwrap();
        assert_eq!(
            stream.get_value(),
            format!(
                "{DECL}\n<a title=\"&quot;quoted&quot; &amp; &lt;angled&gt;\" plain=\"x\">1 &lt; 2 &amp;&amp; &apos;yes&apos;</a>"
            )
        );
    }

    #[test]
    fn attribute_order_test() {
        let mut stream = XmlStream::new("utf-8", None, 0, false);
        stream.start_element("e", vec![("z", "1"), ("a", "2"), ("m", "3")]);
        stream.end_element("e").unwrap();
        let sorted = BTreeMap::from([("z", "1"), ("a", "2"), ("m", "3")]);
        stream.start_element("e", &sorted);
        stream.end_element("e").unwrap();
        assert_eq!(
            stream.get_value(),
            "\n<e z=\"1\" a=\"2\" m=\"3\" />\n<e a=\"2\" m=\"3\" z=\"1\" />"
        );
    }

    #[test]
    fn literal_test() {
        let mut stream = new_stream();
        stream.start_element("div", NO_ATTRS);
        stream.literal("<em>pre-escaped &amp;</em>");
        stream.start_element("br", NO_ATTRS);
        stream.end_element("br").unwrap();
        stream.end_element("div").unwrap();
        assert_eq!(
            stream.get_value(),
            format!("{DECL}\n<div><em>pre-escaped &amp;</em><br /></div>")
        );
    }

    #[test]
    fn comment_test() {
        let mut stream = new_stream();
        stream.start_element("a", NO_ATTRS);
        stream.comment("first -> second", true);
        stream.comment("inline", false);
        stream.start_element("b", NO_ATTRS);
        stream.end_element("b").unwrap();
        stream.end_element("a").unwrap();
        assert_eq!(
            stream.get_value(),
            format!("{DECL}\n<a>\n  <!--first -&gt; second--><!--inline-->\n  <b />\n</a>")
        );
    }

    #[test]
    fn pi_test() {
        let mut stream = new_stream();
        stream.start_element("a", NO_ATTRS);
        stream.pi("target data=\"1\"");
        stream.start_element("b", NO_ATTRS);
        stream.end_element("b").unwrap();
        stream.end_element("a").unwrap();
        assert_eq!(
            stream.get_value(),
            format!("{DECL}\n<a><?target data=&quot;1&quot;?><b /></a>")
        );
    }

    #[test]
    fn cdata_test() {
        let mut stream = new_stream();
        stream.start_element("a", NO_ATTRS);
        stream.write_cdata("x < y && z");
        stream.end_element("a").unwrap();
        assert_eq!(
            stream.get_value(),
            format!("{DECL}\n<a>\n<![CDATA[\nx < y && z\n]]>\n</a>")
        );
    }

    #[test]
    fn ecmascript_test() {
        let mut stream = new_stream();
        stream.start_element("head", NO_ATTRS);
        stream.write_ecmascript("if (a < b) { f(); }").unwrap();
        stream.end_element("head").unwrap();
        assert_eq!(
            stream.get_value(),
            format!(
                "{DECL}\n<head>\n  <script type=\"text/ecmascript\">\n<![CDATA[\nif (a < b) {{ f(); }}\n]]>\n</script>\n</head>"
            )
        );
    }

    #[test]
    fn css_test() {
        let mut stream = new_stream();
        stream.start_element("head", NO_ATTRS);
        stream
            .write_css([
                ("body", vec![("color", "black"), ("margin", "0")]),
                ("p > a", vec![("color", "red")]),
            ])
            .unwrap();
        stream.end_element("head").unwrap();
        assert_eq!(
            stream.get_value(),
            format!(
                "{DECL}\n<head>\n  <style type=\"text/css\">body {{\ncolor : black;\nmargin : 0;\n}}\np > a {{\ncolor : red;\n}}\n</style>\n</head>"
            )
        );
    }

    #[test]
    fn end_element_mismatch_test() {
        let mut stream = new_stream();
        let err = stream.end_element("a").unwrap_err();
        assert_eq!(
            err,
            XmlWriteError::MismatchedElement {
                expected: None,
                found: "a".to_owned()
            }
        );

        stream.start_element("a", NO_ATTRS);
        let before = stream.get_value().to_owned();
        let err = stream.end_element("b").unwrap_err();
        assert_eq!(
            err,
            XmlWriteError::MismatchedElement {
                expected: Some("a".to_owned()),
                found: "b".to_owned()
            }
        );
        assert_eq!(stream.get_value(), before);
        assert_eq!(stream.open_elements(), ["a"]);
        stream.end_element("a").unwrap();
    }

    #[test]
    fn close_unwinds_stack_test() {
        let mut stream = new_stream();
        stream.start_element("a", NO_ATTRS);
        stream.start_element("b", NO_ATTRS);
        stream.characters("t");
        stream.start_element("c", NO_ATTRS);
        stream.close().unwrap();
        assert_eq!(stream.depth(), 0);
        assert_eq!(
            stream.get_value(),
            format!("{DECL}\n<a>\n  <b>t<c /></b>\n</a>\n")
        );
    }

    #[test]
    fn no_indent_test() {
        let mut stream = XmlStream::new("utf-8", None, 0, false);
        stream.enter();
        stream.start_element("a", NO_ATTRS);
        stream.start_element("b", NO_ATTRS);
        stream.comment("c", true);
        stream.end_element("b").unwrap();
        stream.end_element("a").unwrap();
        stream.close().unwrap();
        assert_eq!(
            stream.get_value(),
            format!("{DECL}\n<a><b><!--c--></b></a>\n")
        );
    }

    #[test]
    fn id_test() {
        let mut stream = XmlStream::new("utf-8", None, 7, true);
        assert_eq!(stream.id(), "7");
        assert_eq!(stream.id(), "8");
        assert_eq!(stream.id(), "9");
        assert_eq!(stream.get_value(), "");
    }

    #[test]
    fn id_overflow_test() {
        let mut stream = XmlStream::new("utf-8", None, i64::MAX, true);
        assert_eq!(stream.id(), i64::MAX.to_string());
        assert_eq!(stream.id(), i64::MIN.to_string());
        assert_eq!(stream.id(), (i64::MIN + 1).to_string());
    }

    #[test]
    fn xml_space_preserve_test() {
        let mut stream = new_stream();
        stream.xml_space_preserve();
        stream.start_element("pre", NO_ATTRS);
        stream.xml_space_preserve();
        stream.start_element("b", NO_ATTRS);
        stream.end_element("b").unwrap();
        stream.end_element("pre").unwrap();
        assert_eq!(stream.get_value(), format!("{DECL}\n<pre><b /></pre>"));
    }

    #[test]
    fn get_value_mid_session_test() {
        let mut stream = new_stream();
        stream.start_element("a", [("x", "1")]);
        assert_eq!(stream.get_value(), format!("{DECL}\n<a x=\"1\""));
        stream.characters("");
        assert_eq!(stream.get_value(), format!("{DECL}\n<a x=\"1\">"));
        assert_eq!(stream.clone().into_value(), stream.get_value());
    }

    #[test]
    fn encoded_value_test() {
        let mut stream = XmlStream::new("iso-8859-1", None, 0, false);
        stream.enter();
        stream.start_element("a", NO_ATTRS);
        stream.characters("caf\u{e9} \u{3042}");
        stream.close().unwrap();
        let bytes = stream.encoded_value().unwrap();
        let expected = [
            &b"<?xml version='1.0' encoding=\"iso-8859-1\"?>\n<a>caf"[..],
            &[0xE9u8][..],
            &b" &#12354;</a>\n"[..],
        ]
        .concat();
        assert_eq!(bytes, expected);

        let mut stream = XmlStream::new("UTF-16LE", None, 0, false);
        stream.characters("ab");
        assert_eq!(stream.encoded_value().unwrap(), b"a\0b\0");

        let stream = XmlStream::new("no-such-encoding", None, 0, false);
        assert!(stream.encoded_value().unwrap_err().unsupported_encoding());
    }

    #[test]
    fn encoded_value_attribute_test() {
        let mut stream = XmlStream::new("iso-8859-1", None, 0, false);
        stream.start_element("a", [("title", "\u{3042}&")]);
        stream.characters("\u{3044}");
        stream.characters("\u{3046}");
        stream.end_element("a").unwrap();
        assert_eq!(
            stream.encoded_value().unwrap(),
            b"\n<a title=\"&#12354;&amp;\">&#12356;&#12358;</a>"
        );
    }

    #[test]
    fn encoded_value_unencodable_markup_test() {
        fn encode(build: fn(&mut XmlStream)) -> XmlWriteError {
            let mut stream = XmlStream::new("iso-8859-1", None, 0, false);
            stream.enter();
            build(&mut stream);
            stream.close().unwrap();
            stream.encoded_value().unwrap_err()
        }

        let err = encode(|s| s.start_element("\u{540D}", NO_ATTRS));
        assert_eq!(
            err,
            XmlWriteError::UnencodableCharacter {
                ch: '\u{540D}',
                encoding: "windows-1252".to_owned()
            }
        );
        let err = encode(|s| s.start_element("a", [("\u{540D}", "v")]));
        assert!(err.unencodable_character());
        let err = encode(|s| {
            s.start_element("a", NO_ATTRS);
            s.write_cdata("x = '\u{3042}'");
        });
        assert!(err.unencodable_character());
        let err = encode(|s| s.comment("\u{3042}", true));
        assert!(err.unencodable_character());
        let err = encode(|s| s.pi("target \u{3042}"));
        assert!(err.unencodable_character());
        let err = encode(|s| s.literal("<b>\u{3042}</b>"));
        assert!(err.unencodable_character());

        // The same document is fine where every character is representable.
        let mut stream = XmlStream::new("utf-8", None, 0, false);
        stream.start_element("\u{540D}", NO_ATTRS);
        stream.write_cdata("\u{3042}");
        stream.close().unwrap();
        assert_eq!(
            stream.encoded_value().unwrap(),
            stream.get_value().as_bytes()
        );
    }

    #[test]
    fn encoded_value_replacement_encoding_test() {
        for label in ["iso-2022-kr", "hz-gb-2312", "replacement"] {
            let mut stream = XmlStream::new(label, None, 0, false);
            stream.characters("\u{D55C}");
            assert!(
                stream.encoded_value().unwrap_err().unsupported_encoding(),
                "{label}"
            );
        }
    }

    #[test]
    fn markup_writer_delegation_test() {
        fn build<W: MarkupWriter>(writer: &mut W) -> Result<(), XmlWriteError> {
            writer.enter();
            writer.start_element("a", NO_ATTRS);
            writer.characters("x");
            writer.end_element("a")?;
            writer.close()
        }

        let mut stream = XmlStream::default();
        build(&mut stream).unwrap();
        assert_eq!(MarkupWriter::get_value(&stream), format!("{DECL}\n<a>x</a>\n"));
    }
}
