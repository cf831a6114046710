//! Explorer TSV format

use std::io::Write;

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::explorer::Explorer;
use crate::model::Frame;

use super::OutputFormatter;

/// Writes the header, graphers and table blocks in the explorer file layout
pub struct TsvOutput;

impl TsvOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TsvOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Write rows as tab-separated lines, quoting only fields that need it
fn to_tsv<I, R>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush TSV buffer: {}", e.error()))?;
    String::from_utf8(bytes).context("TSV output is not valid UTF-8")
}

fn frame_tsv(frame: &Frame) -> Result<String> {
    let header = std::iter::once(frame.columns().iter().map(String::as_str).collect::<Vec<_>>());
    let rows = frame
        .rows()
        .map(|row| {
            row.cells()
                .iter()
                .map(|c| c.as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
        });
    to_tsv(header.chain(rows))
}

/// Prefix every line that is not blank with a tab.
/// Whitespace-only lines, such as a row of empty cells, stay unindented.
pub fn indent(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("\t{}", line)
            }
        })
        .collect()
}

impl OutputFormatter for TsvOutput {
    fn render(&self, explorer: &Explorer, writer: &mut dyn Write) -> Result<()> {
        let header = to_tsv(explorer.header.padded_lines())?;
        writer.write_all(header.as_bytes())?;

        write!(writer, "\ngraphers\n{}", indent(&frame_tsv(&explorer.graphers)?))?;

        for table in &explorer.tables {
            write!(writer, "\ntable\t{}\t{}", table.url, table.slug)?;
            write!(
                writer,
                "\ncolumns\t{}\n{}",
                table.slug,
                indent(&frame_tsv(&table.columns)?)
            )?;
        }
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "tsv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::TableBlock;
    use crate::model::{Header, Record};

    fn explorer() -> Explorer {
        let mut header = Header::new();
        header
            .set("explorerTitle", "Poverty")
            .set_list("selection", ["Chile", "Brazil"]);
        let mut explorer = Explorer::new("poverty", header);

        let mut view = Record::new();
        view.set("title", "Share \"below\" $2.15")
            .set("ySlugs", "a b")
            .null("note");
        explorer.graphers.push(view);

        let mut columns = Frame::new();
        let mut column = Record::new();
        column.set("slug", "a").set("description", "Line one\nline two");
        columns.push(column);
        explorer.tables.push(TableBlock::new("https://example.org/a.csv", "main", columns));
        explorer
    }

    fn render(explorer: &Explorer) -> String {
        let mut out = Vec::new();
        TsvOutput::new().render(explorer, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_layout() {
        let expected = concat!(
            "explorerTitle\tPoverty\t\n",
            "selection\tChile\tBrazil\n",
            "\n",
            "graphers\n",
            "\ttitle\tySlugs\tnote\n",
            "\t\"Share \"\"below\"\" $2.15\"\ta b\t\n",
            "\n",
            "table\thttps://example.org/a.csv\tmain\n",
            "columns\tmain\n",
            "\tslug\tdescription\n",
            "\ta\t\"Line one\n",
            "\tline two\"\n",
        );
        assert_eq!(render(&explorer()), expected);
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\tb\n\n\t\t\nc\n"), "\ta\tb\n\n\t\t\n\tc\n");
    }

    #[test]
    fn test_rows_of_empty_cells_stay_unindented() {
        let mut frame = Frame::new();
        let mut row = Record::new();
        row.set("title", "Mean").set("note", "x");
        frame.push(row);
        let mut empty = Record::new();
        empty.null("title").null("note");
        frame.push(empty);

        assert_eq!(indent(&frame_tsv(&frame).unwrap()), "\ttitle\tnote\n\tMean\tx\n\t\n");
    }

    #[test]
    fn test_carriage_returns_are_quoted() {
        let tsv = to_tsv([["a\rb", "plain"]]).unwrap();
        assert_eq!(tsv, "\"a\rb\"\tplain\n");
    }

    #[test]
    fn test_output_is_deterministic() {
        let e = explorer();
        assert_eq!(render(&e), render(&e));
    }
}
