use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use thiserror::Error;

use super::FeedDocument;
use crate::util::strip_control_chars;

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Errors raised while turning a [`FeedDocument`] into text.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write feed XML: {0}")]
    Xml(String),

    #[error("Rendered feed contains invalid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a feed document.
pub trait FeedRenderer {
    fn render(&self, doc: &FeedDocument) -> Result<String, RenderError>;
}

/// Renders feeds as Atom 1.0 (RFC 4287).
///
/// Each entry links to its (possibly resolved) URL and carries the post's
/// author, timestamp and an HTML `content` element.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomRenderer;

impl FeedRenderer for AtomRenderer {
    fn render(&self, doc: &FeedDocument) -> Result<String, RenderError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;

        let mut feed = BytesStart::new("feed");
        feed.push_attribute(("xmlns", ATOM_NAMESPACE));
        write(&mut writer, Event::Start(feed))?;

        write_text_element(&mut writer, "title", &doc.title, None)?;
        write_link(&mut writer, &doc.link)?;
        write_text_element(&mut writer, "id", &doc.link, None)?;
        write_text_element(&mut writer, "updated", &format_instant(doc.updated), None)?;
        write_text_element(
            &mut writer,
            "generator",
            env!("CARGO_PKG_NAME"),
            Some(("version", env!("CARGO_PKG_VERSION"))),
        )?;

        for entry in &doc.entries {
            write(&mut writer, Event::Start(BytesStart::new("entry")))?;

            write_text_element(&mut writer, "id", entry.id(), None)?;
            write_text_element(&mut writer, "title", &entry.title, None)?;
            write_link(&mut writer, &entry.url)?;
            write_text_element(&mut writer, "updated", &format_instant(entry.updated()), None)?;

            write(&mut writer, Event::Start(BytesStart::new("author")))?;
            write_text_element(&mut writer, "name", &entry.author_name, None)?;
            write(&mut writer, Event::End(BytesEnd::new("author")))?;

            write_text_element(&mut writer, "content", &entry.content, Some(("type", "html")))?;

            write(&mut writer, Event::End(BytesEnd::new("entry")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("feed")))?;

        let bytes = writer.into_inner().into_inner();
        Ok(String::from_utf8(bytes)?)
    }
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), RenderError> {
    writer
        .write_event(event)
        .map_err(|e| RenderError::Xml(e.to_string()))
}

/// Writes `<name attr="..">text</name>`, escaping the text.
fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
    attribute: Option<(&str, &str)>,
) -> Result<(), RenderError> {
    let mut start = BytesStart::new(name);
    if let Some(attribute) = attribute {
        start.push_attribute(attribute);
    }
    write(writer, Event::Start(start))?;
    write(writer, Event::Text(BytesText::new(&strip_control_chars(text))))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write_link(writer: &mut Writer<Cursor<Vec<u8>>>, href: &str) -> Result<(), RenderError> {
    let mut link = BytesStart::new("link");
    link.push_attribute(("href", strip_control_chars(href).as_ref()));
    write(writer, Event::Empty(link))
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
