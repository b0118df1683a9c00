//! Part names inside an OPC package

use crate::error::{Error, Result};
use std::fmt;

/// Absolute name of a part within a package, e.g. `/word/document.xml`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartUri {
    path: String,
}

impl PartUri {
    /// Create a new PartUri, ensuring a leading '/' and no trailing '/'
    pub fn new(path: &str) -> Result<Self> {
        let path = path.trim();

        if path.is_empty() {
            return Err(Error::InvalidPartUri("empty path".into()));
        }

        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        let normalized = normalized.trim_end_matches('/').to_string();

        if normalized.is_empty() || normalized.contains("//") {
            return Err(Error::InvalidPartUri(format!("invalid path '{}'", path)));
        }

        Ok(Self { path: normalized })
    }

    fn from_static(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Path inside the ZIP archive (no leading '/')
    pub fn zip_path(&self) -> &str {
        &self.path[1..]
    }

    /// Get the file name portion
    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').next()
    }

    /// Get the file extension
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let (_, ext) = name.rsplit_once('.')?;
        (!ext.is_empty()).then_some(ext)
    }

    /// Get the parent directory URI
    pub fn parent(&self) -> Option<PartUri> {
        let pos = self.path.rfind('/')?;
        if pos == 0 {
            None
        } else {
            Some(Self::from_static(&self.path[..pos]))
        }
    }

    /// Relationships part for this part.
    ///
    /// For `/word/document.xml`, returns `/word/_rels/document.xml.rels`
    pub fn relationships_uri(&self) -> PartUri {
        let file_name = self.file_name().unwrap_or("");
        let parent = self.parent().map(|p| p.path).unwrap_or_default();
        Self::from_static(&format!("{}/_rels/{}.rels", parent, file_name))
    }

    /// Resolve a relationship target against this part's directory.
    ///
    /// For `/word/document.xml` and `styles.xml`, returns `/word/styles.xml`
    pub fn resolve(&self, relative: &str) -> Result<PartUri> {
        if relative.starts_with('/') {
            return PartUri::new(relative);
        }

        let base_dir = self.parent().map(|p| p.path).unwrap_or_default();
        let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

        for segment in relative.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    parts.pop();
                }
                s => parts.push(s),
            }
        }

        PartUri::new(&format!("/{}", parts.join("/")))
    }
}

impl fmt::Display for PartUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Part names used by WordprocessingML documents
pub mod well_known {
    use super::PartUri;

    pub fn document() -> PartUri {
        PartUri::from_static("/word/document.xml")
    }

    pub fn styles() -> PartUri {
        PartUri::from_static("/word/styles.xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_leading_slash() {
        assert_eq!(PartUri::new("/word/document.xml").unwrap().as_str(), "/word/document.xml");
        assert_eq!(PartUri::new("word/document.xml").unwrap().as_str(), "/word/document.xml");
    }

    #[test]
    fn test_rejects_bad_paths() {
        assert!(PartUri::new("").is_err());
        assert!(PartUri::new("/").is_err());
        assert!(PartUri::new("word//document.xml").is_err());
    }

    #[test]
    fn test_name_parts() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.file_name(), Some("document.xml"));
        assert_eq!(uri.extension(), Some("xml"));
        assert_eq!(uri.parent().unwrap().as_str(), "/word");
        assert_eq!(uri.zip_path(), "word/document.xml");
        assert_eq!(PartUri::new("/word/noext").unwrap().extension(), None);
    }

    #[test]
    fn test_relationships_uri() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.relationships_uri().as_str(), "/word/_rels/document.xml.rels");
    }

    #[test]
    fn test_resolve() {
        let uri = well_known::document();
        assert_eq!(uri.resolve("styles.xml").unwrap(), well_known::styles());
        assert_eq!(uri.resolve("../customXml/item1.xml").unwrap().as_str(), "/customXml/item1.xml");
        assert_eq!(uri.resolve("/word/styles.xml").unwrap(), well_known::styles());
    }
}
