//! Frame, Record and Cell data structures for generated tables

use std::cmp::Ordering;

use indexmap::IndexMap;

/// A generated cell; `None` is a missing value and renders as an empty field
pub type Cell = Option<String>;

/// An ordered set of column assignments for one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    cells: IndexMap<String, Cell>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column to a value
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.cells.insert(column.into(), Some(value.into()));
        self
    }

    /// Set a column to a missing value
    pub fn null(&mut self, column: impl Into<String>) -> &mut Self {
        self.cells.insert(column.into(), None);
        self
    }

    /// Set a column to an optional value
    pub fn set_opt(&mut self, column: impl Into<String>, value: Cell) -> &mut Self {
        self.cells.insert(column.into(), value);
        self
    }

    /// Get the value assigned to a column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|c| c.as_deref())
    }

    /// Iterate over assignments in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Cell)> {
        self.cells.iter()
    }
}

/// A read-only view of one frame row
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    frame: &'a Frame,
    index: usize,
}

impl<'a> RowView<'a> {
    /// Position of the row in the frame
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of a column in this row
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.frame.get(self.index, column)
    }

    /// Cells in column order
    pub fn cells(&self) -> &'a [Cell] {
        &self.frame.rows[self.index]
    }
}

/// A table with ordered, named columns and optional string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check whether the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Add a column filled with missing values, returning its index
    fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.columns.len() - 1
    }

    /// Append a record; unseen keys become new trailing columns
    pub fn push(&mut self, record: Record) {
        let mut row = vec![None; self.columns.len()];
        for (column, value) in record.cells {
            let idx = self.ensure_column(&column);
            if idx >= row.len() {
                row.resize(idx + 1, None);
            }
            row[idx] = value;
        }
        self.rows.push(row);
    }

    /// Get a cell value by row index and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Iterate over row views
    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.rows.len()).map(move |index| RowView { frame: self, index })
    }

    /// All values of a column, in row order
    pub fn column_values(&self, column: &str) -> Vec<Option<&str>> {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().map(|r| r[idx].as_deref()).collect(),
            None => vec![None; self.rows.len()],
        }
    }

    /// Assign the same value to every row of a column, creating it if needed
    pub fn set_column(&mut self, column: &str, value: Cell) {
        let idx = self.ensure_column(column);
        for row in &mut self.rows {
            row[idx] = value.clone();
        }
    }

    /// Assign a value to a column in every row matching `predicate`.
    /// The column is created even when nothing matches. Returns the number of rows set.
    pub fn set_where<F>(&mut self, column: &str, value: Cell, predicate: F) -> usize
    where
        F: Fn(&RowView<'_>) -> bool,
    {
        let matched: Vec<usize> = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.index)
            .collect();

        let idx = self.ensure_column(column);
        for &i in &matched {
            self.rows[i][idx] = value.clone();
        }
        matched.len()
    }

    /// Keep only rows matching `predicate`
    pub fn retain<F>(&mut self, predicate: F)
    where
        F: Fn(&RowView<'_>) -> bool,
    {
        let keep: Vec<bool> = self.rows().map(|row| predicate(&row)).collect();
        let mut flags = keep.into_iter();
        self.rows.retain(|_| flags.next().unwrap_or(false));
    }

    /// Transform every present value of a column
    pub fn map_column<F>(&mut self, column: &str, f: F)
    where
        F: Fn(&str) -> String,
    {
        if let Some(idx) = self.column_index(column) {
            for row in &mut self.rows {
                if let Some(value) = row[idx].as_deref() {
                    row[idx] = Some(f(value));
                }
            }
        }
    }

    /// Append the rows of another frame, aligning columns by name.
    /// Columns only present in `other` are appended after this frame's columns.
    pub fn concat(&mut self, other: &Frame) {
        let mapping: Vec<usize> = other
            .columns
            .iter()
            .map(|name| self.ensure_column(name))
            .collect();

        for other_row in &other.rows {
            let mut row = vec![None; self.columns.len()];
            for (src, &dst) in mapping.iter().enumerate() {
                row[dst] = other_row[src].clone();
            }
            self.rows.push(row);
        }
    }

    /// Stable sort by a list of rank functions, most significant first.
    /// A rank of `None` sorts after every ranked value.
    pub fn sort_by_ranks<F>(&mut self, rankers: &[F])
    where
        F: Fn(&RowView<'_>) -> Option<usize>,
    {
        let keys: Vec<Vec<Option<usize>>> = self
            .rows()
            .map(|row| rankers.iter().map(|rank| rank(&row)).collect())
            .collect();

        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| compare_ranks(&keys[a], &keys[b]));

        let mut rows: Vec<Option<Vec<Cell>>> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(Some)
            .collect();
        self.rows = order
            .into_iter()
            .filter_map(|i| rows[i].take())
            .collect();
    }
}

fn compare_ranks(a: &[Option<usize>], b: &[Option<usize>]) -> Ordering {
    for (ka, kb) in a.iter().zip(b) {
        let ord = match (ka, kb) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Option<&str>)]) -> Record {
        let mut r = Record::new();
        for (k, v) in pairs {
            r.set_opt(*k, v.map(str::to_string));
        }
        r
    }

    #[test]
    fn test_push_enlarges_columns() {
        let mut frame = Frame::new();
        frame.push(record(&[("name", Some("Country")), ("type", Some("EntityName"))]));
        frame.push(record(&[("name", Some("Mean")), ("unit", Some("$"))]));

        assert_eq!(frame.columns(), &["name", "type", "unit"]);
        assert_eq!(frame.get(0, "unit"), None);
        assert_eq!(frame.get(1, "type"), None);
        assert_eq!(frame.get(1, "unit"), Some("$"));
    }

    #[test]
    fn test_set_where_creates_column() {
        let mut frame = Frame::new();
        frame.push(record(&[("metric", Some("a"))]));
        frame.push(record(&[("metric", Some("b"))]));

        let n = frame.set_where("defaultView", Some("true".into()), |r| r.get("metric") == Some("b"));
        assert_eq!(n, 1);
        assert_eq!(frame.column_values("defaultView"), vec![None, Some("true")]);

        let n = frame.set_where("other", Some("x".into()), |_| false);
        assert_eq!(n, 0);
        assert!(frame.has_column("other"));
    }

    #[test]
    fn test_retain() {
        let mut frame = Frame::new();
        for v in ["a", "b", "c"] {
            frame.push(record(&[("k", Some(v))]));
        }
        frame.retain(|r| r.get("k") != Some("b"));

        assert_eq!(frame.columns(), &["k"]);
        assert_eq!(frame.column_values("k"), vec![Some("a"), Some("c")]);
    }

    #[test]
    fn test_concat_aligns_columns() {
        let mut left = Frame::new();
        left.push(record(&[("a", Some("1")), ("b", Some("2"))]));
        let mut right = Frame::new();
        right.push(record(&[("c", Some("3")), ("a", Some("4"))]));

        left.concat(&right);
        assert_eq!(left.columns(), &["a", "b", "c"]);
        assert_eq!(left.rows().nth(1).unwrap().cells(), &[Some("4".into()), None, Some("3".into())]);
    }

    #[test]
    fn test_sort_by_ranks_is_stable_and_puts_unranked_last() {
        let mut frame = Frame::new();
        for (k, id) in [("z", "1"), ("b", "2"), ("a", "3"), ("b", "4")] {
            frame.push(record(&[("k", Some(k)), ("id", Some(id))]));
        }
        let order = ["a", "b"];
        let rank = |r: &RowView<'_>| r.get("k").and_then(|v| order.iter().position(|o| *o == v));
        frame.sort_by_ranks(&[rank]);

        assert_eq!(frame.column_values("id"), vec![Some("3"), Some("2"), Some("4"), Some("1")]);
    }

    #[test]
    fn test_map_column_skips_missing() {
        let mut frame = Frame::new();
        frame.push(record(&[("note", Some("Depending on it."))]));
        frame.push(record(&[("note", None)]));
        frame.map_column("note", |s| s.replace("Depending on it.", "It."));

        assert_eq!(frame.column_values("note"), vec![Some("It."), None]);
    }
}
