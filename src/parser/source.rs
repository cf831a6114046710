//! Locating and loading the sheets of a sheet group

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::model::SheetSet;

use super::ParserFactory;

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Where a sheet group is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    /// A directory with one file per sheet
    Directory(PathBuf),
    /// A single file; workbooks hold one worksheet per sheet
    File(PathBuf),
}

impl SheetSource {
    /// Classify a path as a directory or file source
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Ok(SheetSource::Directory(path.to_path_buf()))
        } else if path.is_file() {
            Ok(SheetSource::File(path.to_path_buf()))
        } else {
            bail!("Input not found: {}", path.display())
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SheetSource::Directory(p) | SheetSource::File(p) => p,
        }
    }

    /// Load every sheet the source provides
    pub fn load(&self, factory: &ParserFactory) -> Result<SheetSet> {
        let mut set = SheetSet::new();

        match self {
            SheetSource::File(path) => {
                for sheet in factory.parse(path)? {
                    set.insert(sheet);
                }
            }
            SheetSource::Directory(dir) => {
                let mut entries: Vec<PathBuf> = fs::read_dir(dir)
                    .with_context(|| format!("Failed to read directory: {}", dir.display()))?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| p.is_file())
                    .collect();
                entries.sort();

                for path in entries {
                    if !factory.supports(&path) {
                        tracing::debug!(file = %path.display(), "skipping unsupported file");
                        continue;
                    }
                    let sheets = factory
                        .parse(&path)
                        .with_context(|| format!("Failed to parse sheet file: {}", path.display()))?;
                    for sheet in sheets {
                        set.insert(sheet);
                    }
                }
            }
        }

        tracing::debug!(source = %self.path().display(), sheets = set.len(), "loaded sheet group");
        Ok(set)
    }
}

/// Find a sheet group under a root: a `<group>` directory or a `<group>.<ext>` workbook
pub fn resolve_group(root: &Path, group: &str) -> Result<SheetSource> {
    let dir = root.join(group);
    if dir.is_dir() {
        return Ok(SheetSource::Directory(dir));
    }

    for ext in WORKBOOK_EXTENSIONS {
        let workbook = root.join(format!("{}.{}", group, ext));
        if workbook.is_file() {
            return Ok(SheetSource::File(workbook));
        }
    }

    bail!(
        "No sheet group '{}' under {} (expected a directory or workbook)",
        group,
        root.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("welfare.csv"), "slug\nmi\ndhi\n").unwrap();
        fs::write(dir.path().join("tables.tsv"), "name\tlink\nmain\turl\n").unwrap();
        fs::write(dir.path().join("README.md"), "# notes\n").unwrap();

        let set = SheetSource::from_path(dir.path())
            .unwrap()
            .load(&ParserFactory::new())
            .unwrap();

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["tables", "welfare"]);
        assert_eq!(set.get("welfare").unwrap().row_count(), 2);
    }

    #[test]
    fn test_resolve_group() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("lis")).unwrap();
        fs::write(root.path().join("pip.xlsx"), b"PK\x03\x04").unwrap();

        assert_eq!(
            resolve_group(root.path(), "lis").unwrap(),
            SheetSource::Directory(root.path().join("lis"))
        );
        assert_eq!(
            resolve_group(root.path(), "pip").unwrap(),
            SheetSource::File(root.path().join("pip.xlsx"))
        );
        assert!(resolve_group(root.path(), "other").is_err());
    }

    #[test]
    fn test_load_workbook_group() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/workbooks");
        let source = resolve_group(&root, "pip").unwrap();
        assert_eq!(source, SheetSource::File(root.join("pip.xlsx")));

        let set = source.load(&ParserFactory::new()).unwrap();
        assert_eq!(
            set.names().collect::<Vec<_>>(),
            vec!["povlines_abs", "povlines_rel", "survey_type"]
        );
        assert_eq!(set.get("survey_type").unwrap().row_count(), 3);
    }

    #[test]
    fn test_missing_input() {
        assert!(SheetSource::from_path(Path::new("/nonexistent/explorer/input")).is_err());
    }
}
