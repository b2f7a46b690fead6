//! ZIP package access for xlsx workbooks.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Decode XML bytes from an archive member.
///
/// Workbook parts are UTF-8; a leading BOM is tolerated and stripped.
pub(crate) fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let content = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &bytes[3..]
    } else {
        bytes
    };

    String::from_utf8(content.to_vec())
        .map_err(|e| Error::XmlParse(format!("invalid UTF-8: {}", e)))
}

/// ZIP container abstraction over an xlsx package.
///
/// Provides access to the XML parts that make up a workbook.
pub struct XlsxPackage {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl XlsxPackage {
    /// Open an xlsx package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xltree::container::XlsxPackage;
    ///
    /// let package = XlsxPackage::open("criteria.xlsx")?;
    /// # Ok::<(), xltree::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create an xlsx package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create an xlsx package from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read an XML part from the archive as a string.
    ///
    /// Returns [`Error::MissingComponent`] when the part is absent.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        decode_xml_bytes(&bytes)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }
}

impl std::fmt::Debug for XlsxPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxPackage")
            .field("parts", &self.archive.borrow().len())
            .finish()
    }
}
