//! JSON output format

use std::io::Write;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use crate::explorer::Explorer;
use crate::model::{Frame, Header};

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows as objects keyed by column name, missing cells as `null`
type JsonRows<'a> = Vec<IndexMap<&'a str, Option<&'a str>>>;

#[derive(Serialize)]
struct JsonTable<'a> {
    url: &'a str,
    slug: &'a str,
    columns: JsonRows<'a>,
}

#[derive(Serialize)]
struct JsonExplorer<'a> {
    name: &'a str,
    header: &'a Header,
    graphers: JsonRows<'a>,
    tables: Vec<JsonTable<'a>>,
}

fn json_rows(frame: &Frame) -> JsonRows<'_> {
    frame
        .rows()
        .map(|row| {
            frame
                .columns()
                .iter()
                .zip(row.cells())
                .map(|(column, cell)| (column.as_str(), cell.as_deref()))
                .collect()
        })
        .collect()
}

impl OutputFormatter for JsonOutput {
    fn render(&self, explorer: &Explorer, writer: &mut dyn Write) -> Result<()> {
        let output = JsonExplorer {
            name: &explorer.name,
            header: &explorer.header,
            graphers: json_rows(&explorer.graphers),
            tables: explorer
                .tables
                .iter()
                .map(|t| JsonTable {
                    url: &t.url,
                    slug: &t.slug,
                    columns: json_rows(&t.columns),
                })
                .collect(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
