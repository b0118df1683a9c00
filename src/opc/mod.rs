//! Open Packaging Convention (OPC) container
//!
//! DOCX files are ZIP archives of parts tied together by content types and
//! relationships. This module reads and writes that container; the document
//! layer only ever sees part bytes.

mod content_types;
mod package;
mod part;
mod part_uri;
mod relationships;

pub use content_types::{ContentTypes, MAIN_DOCUMENT, RELATIONSHIPS, STYLES, XML};
pub use package::Package;
pub use part::Part;
pub use part_uri::{well_known, PartUri};
pub use relationships::{rel_types, Relationship, Relationships, TargetMode};
