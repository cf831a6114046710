//! Parser layer for reading facet sheets from CSV/TSV files and workbooks

mod csv;
mod excel;
mod source;

use std::path::Path;

use anyhow::{bail, Result};

use crate::model::Sheet;

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;
pub use self::source::{resolve_group, SheetSource};

/// Trait for parsing files into sheets
pub trait SheetParser: Send + Sync {
    /// Parse a file and return every sheet it holds
    fn parse(&self, path: &Path) -> Result<Vec<Sheet>>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for selecting a parser based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn SheetParser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser), Box::new(ExcelParser)],
        }
    }

    /// Check whether some parser handles this path
    pub fn supports(&self, path: &Path) -> bool {
        self.get_parser(path).is_ok()
    }

    /// Get a parser for the given file path.
    /// Files without an extension are sniffed with [`detect_format`].
    pub fn get_parser(&self, path: &Path) -> Result<&dyn SheetParser> {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => detect_format(path).unwrap_or("").to_string(),
        };

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        )
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path) -> Result<Vec<Sheet>> {
        let parser = self.get_parser(path)?;
        parser.parse(path)
    }
}

/// Detect file format from content (for files without extension)
pub fn detect_format(path: &Path) -> Option<&'static str> {
    use std::fs::File;
    use std::io::{BufRead, BufReader, Read};

    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 4];
    let bytes_read = reader.read(&mut buffer).ok()?;

    if bytes_read == 4 {
        // Zip container (xlsx, ods)
        if &buffer == b"PK\x03\x04" {
            return Some("xlsx");
        }
        // OLE compound document (xls)
        if &buffer == b"\xD0\xCF\x11\xE0" {
            return Some("xls");
        }
    }

    reader.seek_relative(-(bytes_read as i64)).ok()?;
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    if line.trim().is_empty() {
        return None;
    }
    if line.contains('\t') {
        return Some("tsv");
    }

    Some("csv")
}

/// Sheet name for a single-sheet file: its file stem
pub(crate) fn sheet_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}
