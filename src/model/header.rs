//! Explorer header: ordered key to values map

use indexmap::IndexMap;
use serde::Serialize;

/// Header block of an explorer file. Each key renders as one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Header {
    entries: IndexMap<String, Vec<String>>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-valued key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), vec![value.into()]);
        self
    }

    /// Set a key with several values
    pub fn set_list<I, S>(&mut self, key: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of value fields on the widest line
    pub fn width(&self) -> usize {
        self.entries.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Lines as key followed by values, padded with empty fields to `width()`
    pub fn padded_lines(&self) -> Vec<Vec<&str>> {
        let width = self.width();
        self.entries
            .iter()
            .map(|(key, values)| {
                let mut line = Vec::with_capacity(width + 1);
                line.push(key.as_str());
                line.extend(values.iter().map(String::as_str));
                line.resize(width + 1, "");
                line
            })
            .collect()
    }
}
