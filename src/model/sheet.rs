//! Input sheets: small string tables describing facets of an explorer

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ExplorerError, Result};

/// A row of an input sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// Cell values in column order, empty cells are empty strings
    pub cells: Vec<String>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl SheetRow {
    /// Get a cell by column index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// A named input table with a header row
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Sheet name (file stem or worksheet name)
    pub name: String,
    /// Column names from the header row
    pub columns: Vec<String>,
    /// Data rows
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Create an empty sheet with column names
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row, padding or truncating it to the header width
    pub fn add_row(&mut self, mut cells: Vec<String>, source_line: usize) {
        cells.resize(self.columns.len(), String::new());
        self.rows.push(SheetRow { cells, source_line });
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get column index by name, failing if the column is absent
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ExplorerError::MissingColumn {
                sheet: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// All values of a column, in row order
    pub fn column_values(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }

    /// Return the single row whose `column` equals `value`
    pub fn find_one(&self, column: &str, value: &str) -> Result<&SheetRow> {
        let idx = self.require_column(column)?;
        let mut matches = self.rows.iter().filter(|r| r.get(idx) == Some(value));

        match (matches.next(), matches.count()) {
            (Some(row), 0) => Ok(row),
            (Some(_), rest) => Err(ExplorerError::AmbiguousMatch {
                sheet: self.name.clone(),
                column: column.to_string(),
                value: value.to_string(),
                count: rest + 1,
            }),
            (None, _) => Err(ExplorerError::NoMatch {
                sheet: self.name.clone(),
                column: column.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Deserialize every row into a typed record keyed by column name
    pub fn rows_as<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .columns
                    .iter()
                    .zip(&row.cells)
                    .map(|(name, cell)| (name.clone(), Value::String(cell.clone())))
                    .collect();

                serde_json::from_value(Value::Object(object)).map_err(|e| ExplorerError::Facet {
                    sheet: self.name.clone(),
                    message: format!("row {}: {}", row.source_line, e),
                })
            })
            .collect()
    }
}

/// Named sheets loaded for one sheet group
#[derive(Debug, Clone, Default)]
pub struct SheetSet {
    sheets: IndexMap<String, Sheet>,
}

impl SheetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, replacing any sheet with the same name
    pub fn insert(&mut self, sheet: Sheet) {
        self.sheets.insert(sheet.name.clone(), sheet);
    }

    /// Get a sheet by name
    pub fn get(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| ExplorerError::MissingSheet(name.to_string()))
    }

    /// Deserialize the rows of a named sheet
    pub fn facets<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        self.get(name)?.rows_as()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn sample() -> Sheet {
        let mut sheet = Sheet::new(
            "equivalence_scales",
            vec!["text".to_string(), "slug".to_string()],
        );
        sheet.add_row(vec!["equivalized".into(), "eq".into()], 2);
        sheet.add_row(vec!["per capita".into()], 3);
        sheet
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Scale {
        text: String,
        slug: String,
    }

    #[test]
    fn test_short_rows_are_padded() {
        let sheet = sample();
        assert_eq!(sheet.rows[1].cells, vec!["per capita".to_string(), String::new()]);
    }

    #[test]
    fn test_rows_as_typed_records() {
        let scales: Vec<Scale> = sample().rows_as().unwrap();
        assert_eq!(scales[0].text, "equivalized");
        assert_eq!(scales[0].slug, "eq");
        assert_eq!(scales[1].slug, "");
    }

    #[test]
    fn test_rows_as_missing_column() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct NeedsNote {
            note: String,
        }

        let err = sample().rows_as::<NeedsNote>().unwrap_err();
        assert!(err.to_string().contains("equivalence_scales"));
        assert!(err.to_string().contains("note"));
    }

    #[test]
    fn test_find_one() {
        let mut sheet = sample();
        assert_eq!(sheet.find_one("slug", "eq").unwrap().source_line, 2);
        assert!(matches!(
            sheet.find_one("slug", "xx"),
            Err(ExplorerError::NoMatch { .. })
        ));

        sheet.add_row(vec!["equivalized".into(), "eq".into()], 4);
        assert!(matches!(
            sheet.find_one("slug", "eq"),
            Err(ExplorerError::AmbiguousMatch { count: 2, .. })
        ));
        assert!(matches!(
            sheet.find_one("missing", "eq"),
            Err(ExplorerError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_sheet_set_missing_sheet() {
        let mut set = SheetSet::new();
        set.insert(sample());

        let scales: Vec<Scale> = set.facets("equivalence_scales").unwrap();
        assert_eq!(scales.len(), 2);
        assert!(matches!(
            set.get("welfare"),
            Err(ExplorerError::MissingSheet(name)) if name == "welfare"
        ));
    }
}
