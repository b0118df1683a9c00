//! OPC package: reading and writing the ZIP container

use crate::error::{Error, Result};
use crate::opc::relationships::rel_types;
use crate::opc::{ContentTypes, Part, PartUri, Relationships};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::read::ZipArchive;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
const PACKAGE_RELS_PATH: &str = "_rels/.rels";

/// An OPC package (ZIP-based container for DOCX)
#[derive(Debug)]
pub struct Package {
    parts: BTreeMap<PartUri, Part>,
    /// Package-level relationships (`/_rels/.rels`)
    relationships: Relationships,
    content_types: ContentTypes,
}

impl Package {
    /// Create a new empty package
    pub fn new() -> Self {
        Self {
            parts: BTreeMap::new(),
            relationships: Relationships::new(),
            content_types: ContentTypes::new(),
        }
    }

    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Open a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Open a package from a reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut package = Self::new();

        let content_types = read_entry(&mut archive, CONTENT_TYPES_PATH)
            .map_err(|_| Error::MissingPart(CONTENT_TYPES_PATH.into()))?;
        package.content_types = ContentTypes::from_xml(&content_types)?;

        if let Ok(xml) = read_entry(&mut archive, PACKAGE_RELS_PATH) {
            package.relationships = Relationships::from_xml(&xml)?;
        }

        package.read_parts(&mut archive)?;
        package.read_part_relationships(&mut archive)?;

        log::trace!("opened package with {} parts", package.parts.len());
        Ok(package)
    }

    /// Save the package to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Save the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(Cursor::new(&mut buf))?;
        Ok(buf)
    }

    /// Write the package to a writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options: FileOptions<()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file(CONTENT_TYPES_PATH, options)?;
        self.content_types.write_to(&mut zip)?;

        if !self.relationships.is_empty() {
            zip.start_file(PACKAGE_RELS_PATH, options)?;
            self.relationships.write_to(&mut zip)?;
        }

        for (uri, part) in &self.parts {
            zip.start_file(uri.zip_path(), options)?;
            zip.write_all(part.data())?;

            if let Some(rels) = part.relationships().filter(|r| !r.is_empty()) {
                zip.start_file(uri.relationships_uri().zip_path(), options)?;
                rels.write_to(&mut zip)?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    /// Get a part by URI
    pub fn part(&self, uri: &PartUri) -> Option<&Part> {
        self.parts.get(uri)
    }

    /// Add or replace a part, registering its content type
    pub fn add_part(&mut self, part: Part) {
        let uri = part.uri().clone();
        self.content_types.add_override(&uri, part.content_type());
        self.parts.insert(uri, part);
    }

    /// Get all parts
    pub fn parts(&self) -> impl Iterator<Item = (&PartUri, &Part)> {
        self.parts.iter()
    }

    /// Get package-level relationships
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// Get content types
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// URI of the main document part, from the officeDocument relationship
    pub fn main_document_uri(&self) -> Option<PartUri> {
        let rel = self.relationships.by_type(rel_types::OFFICE_DOCUMENT)?;
        PartUri::new(&rel.target).ok()
    }

    /// Get the main document part
    pub fn main_document_part(&self) -> Option<&Part> {
        self.parts.get(&self.main_document_uri()?)
    }

    /// Find the part a source part points to with a relationship of `rel_type`
    pub fn related_part(&self, source: &Part, rel_type: &str) -> Option<&Part> {
        let rel = source.relationships()?.by_type(rel_type)?;
        let uri = source.uri().resolve(&rel.target).ok()?;
        self.parts.get(&uri)
    }

    /// Add a package-level relationship
    pub fn add_relationship(&mut self, rel_type: &str, target: &str) -> String {
        self.relationships.add(rel_type, target)
    }

    fn read_parts<R: Read + Seek>(&mut self, archive: &mut ZipArchive<R>) -> Result<()> {
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            if name.ends_with('/') || name == CONTENT_TYPES_PATH {
                continue;
            }
            // Relationship parts are attached to their source part afterwards
            if name.contains("_rels/") && name.ends_with(".rels") {
                continue;
            }

            let uri = PartUri::new(&name)?;
            let content_type = self
                .content_types
                .get(&uri)
                .unwrap_or("application/octet-stream")
                .to_string();

            let mut data = Vec::new();
            file.read_to_end(&mut data)?;

            self.parts.insert(uri.clone(), Part::new(uri, content_type, data));
        }

        Ok(())
    }

    fn read_part_relationships<R: Read + Seek>(&mut self, archive: &mut ZipArchive<R>) -> Result<()> {
        for part in self.parts.values_mut() {
            let rels_path = part.uri().relationships_uri();
            if let Ok(xml) = read_entry(archive, rels_path.zip_path()) {
                part.set_relationships(Relationships::from_xml(&xml)?);
            }
        }

        Ok(())
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut file = archive.by_name(name)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}
