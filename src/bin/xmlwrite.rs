//! Small command line front end for the name encoding and escaping helpers.

use std::io::{Write, stdout};

use anyhow::Context;
use clap::{Parser, Subcommand};
use xmlwrite::{
    Element, MarkupWriter, NO_ATTRS, XmlStream, decode_string, encode_string, escape_text,
    globals::VERSION_STRING, name_from_string,
};

#[derive(Parser)]
#[command(version, name = "xmlwrite", arg_required_else_help = true)]
struct CmdArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// encode a value as a prefixed, name-safe base64 string
    Encode {
        value: String,
        /// single character put in front of the encoded value
        #[arg(short, long, default_value = "Z")]
        prefix: String,
    },
    /// decode a string produced by `encode`
    Decode { value: String },
    /// turn a value into a valid XML name
    Name { value: String },
    /// escape text for use as XML character data
    Escape { text: String },
    /// write a small sample document
    Demo {
        /// write an XHTML document instead of plain XML
        #[arg(long)]
        xhtml: bool,
        /// do not indent the output
        #[arg(long)]
        no_indent: bool,
        /// encoding label written into the XML declaration
        #[arg(long, default_value = "utf-8")]
        encoding: String,
    },
}

fn write_demo_body<W: MarkupWriter>(writer: &mut W) -> anyhow::Result<()> {
    writer.comment(&format!("xmlwrite {VERSION_STRING}"), true);
    let id = writer.id();
    let mut list = Element::new(writer, "ul", [("id", id.as_str())]);
    for item in ["plain", "a < b & c", "\"quoted\""] {
        let mut li = Element::new(&mut *list, "li", NO_ATTRS);
        li.characters(item);
        li.finish()?;
    }
    list.finish()?;
    Ok(())
}

#[cfg(feature = "xhtml")]
fn xhtml_demo(encoding: &str, indent: bool) -> anyhow::Result<Vec<u8>> {
    let mut stream = xmlwrite::XhtmlStream::new(encoding, None, 0, indent);
    stream.enter();
    let mut body = Element::new(&mut stream, "body", NO_ATTRS);
    body.start_element("p", NO_ATTRS);
    body.characters_with_br("first line\nsecond line")?;
    body.end_element("p")?;
    write_demo_body(&mut *body)?;
    body.finish()?;
    stream.close()?;
    Ok(stream.stream().encoded_value()?)
}

#[cfg(not(feature = "xhtml"))]
fn xhtml_demo(_encoding: &str, _indent: bool) -> anyhow::Result<Vec<u8>> {
    anyhow::bail!("xmlwrite was built without the `xhtml` feature")
}

fn xml_demo(encoding: &str, indent: bool) -> anyhow::Result<Vec<u8>> {
    let mut stream = XmlStream::new(encoding, None, 0, indent);
    stream.enter();
    stream.start_element("demo", NO_ATTRS);
    write_demo_body(&mut stream)?;
    stream.close()?;
    Ok(stream.encoded_value()?)
}

fn main() -> anyhow::Result<()> {
    let args = CmdArgs::parse();
    let mut out = stdout().lock();

    match args.command {
        Command::Encode { value, prefix } => {
            writeln!(out, "{}", encode_string(&value, &prefix)?)?;
        }
        Command::Decode { value } => {
            writeln!(out, "{}", String::from_utf8_lossy(&decode_string(&value)))?;
        }
        Command::Name { value } => {
            writeln!(out, "{}", name_from_string(&value))?;
        }
        Command::Escape { text } => {
            writeln!(out, "{}", escape_text(&text))?;
        }
        Command::Demo {
            xhtml,
            no_indent,
            encoding,
        } => {
            let bytes = if xhtml {
                xhtml_demo(&encoding, !no_indent)?
            } else {
                xml_demo(&encoding, !no_indent)?
            };
            out.write_all(&bytes)
                .context("failed to write the document")?;
        }
    }
    Ok(())
}
