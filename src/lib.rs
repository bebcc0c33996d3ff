//! Streaming XML and XHTML writer.
//!
//! Markup is produced by a sequence of "start element / write text / end
//! element" calls. No document tree is ever built: the writers keep an
//! output buffer, the stack of open element names and the per-element
//! indentation permission, and nothing more.
//!
//! ```rust
//! use xmlwrite::{NO_ATTRS, XmlStream};
//!
//! let mut stream = XmlStream::new("utf-8", None, 0, true);
//! stream.enter();
//! stream.start_element("root", [("version", "1")]);
//! stream.start_element("item", NO_ATTRS);
//! stream.characters("a < b");
//! stream.end_element("item").unwrap();
//! stream.close().unwrap();
//! assert_eq!(
//!     stream.get_value(),
//!     "<?xml version='1.0' encoding=\"utf-8\"?>\n<root version=\"1\">\n  <item>a &lt; b</item>\n</root>\n"
//! );
//! ```
#![warn(unused_mut)]
#![warn(unused_imports)]
#![warn(unused_variables)]

pub mod element;
pub mod error;
pub mod escape;
pub mod globals;
pub mod names;
pub mod stream;
#[cfg(feature = "xhtml")]
pub mod xhtml;

pub use element::{Element, with_element};
pub use error::XmlWriteError;
pub use escape::escape_text;
pub use names::{decode_string, encode_string, name_from_string};
pub use stream::{MarkupWriter, NO_ATTRS, XmlStream};
#[cfg(feature = "xhtml")]
pub use xhtml::XhtmlStream;
