//! XML helpers shared by the package and document layers

mod namespace;
mod raw;

pub use namespace::*;
pub use raw::{RawXmlElement, RawXmlNode};

use crate::error::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

/// Get an attribute value by its qualified name
pub fn get_attr(element: &BytesStart, name: &str) -> Option<String> {
    element
        .attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name.as_bytes())
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// Get a `w:`-prefixed attribute, falling back to the unprefixed name
pub fn get_w_attr(element: &BytesStart, local: &str) -> Option<String> {
    get_attr(element, &format!("w:{}", local)).or_else(|| get_attr(element, local))
}

/// Get the `w:val` attribute
pub fn get_w_val(element: &BytesStart) -> Option<String> {
    get_w_attr(element, "val")
}

/// Parse an OOXML on/off property (`<w:b/>`, `<w:b w:val="0"/>`, ...)
pub fn parse_bool(element: &BytesStart) -> bool {
    match get_w_val(element) {
        // A bare toggle element means "on"
        None => true,
        Some(v) => matches!(v.as_str(), "1" | "true" | "on"),
    }
}

/// Collect all attributes as owned (name, value) pairs
pub fn collect_attrs(element: &BytesStart) -> Vec<(String, String)> {
    element
        .attributes()
        .filter_map(|a| a.ok())
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.as_ref()).to_string(),
                String::from_utf8_lossy(&a.value).to_string(),
            )
        })
        .collect()
}

/// Skip an element and all of its children (reader is positioned after the start tag)
pub fn skip_element<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<()> {
    let target = start.name().as_ref().to_vec();
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == target => depth += 1,
            Event::End(e) if e.name().as_ref() == target => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
