//! Style sheet part (word/styles.xml)

use crate::error::Result;
use crate::xml::get_w_attr;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeSet;

/// Style definitions of a document
///
/// The part is carried as raw bytes; only the style ids are interpreted so
/// that paragraph style references can be checked against it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSheet {
    data: Vec<u8>,
    ids: BTreeSet<String>,
    default_paragraph: Option<String>,
}

impl StyleSheet {
    /// Parse a styles part
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut ids = BTreeSet::new();
        let mut default_paragraph = None;

        {
            let mut reader = Reader::from_reader(data.as_slice());
            let mut buf = Vec::new();

            loop {
                match reader.read_event_into(&mut buf)? {
                    Event::Start(e) | Event::Empty(e)
                        if e.name().local_name().as_ref() == b"style" =>
                    {
                        if let Some(id) = get_w_attr(&e, "styleId") {
                            let is_paragraph =
                                get_w_attr(&e, "type").as_deref() == Some("paragraph");
                            let is_default = matches!(
                                get_w_attr(&e, "default").as_deref(),
                                Some("1" | "true" | "on")
                            );
                            if is_paragraph && is_default && default_paragraph.is_none() {
                                default_paragraph = Some(id.clone());
                            }
                            ids.insert(id);
                        }
                    }
                    Event::Eof => break,
                    _ => {}
                }
                buf.clear();
            }
        }

        log::trace!("style sheet defines {} styles", ids.len());
        Ok(Self {
            data,
            ids,
            default_paragraph,
        })
    }

    /// Whether a style with this id is defined
    pub fn contains(&self, style_id: &str) -> bool {
        self.ids.contains(style_id)
    }

    /// Defined style ids, sorted
    pub fn style_ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Id of the default paragraph style, if declared
    pub fn default_paragraph_style(&self) -> Option<&str> {
        self.default_paragraph.as_deref()
    }

    /// Raw part content
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
