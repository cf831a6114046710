//! Row-count summaries and slug check reports for the terminal

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::explorer::{Explorer, SlugIssue};

use super::OutputFormatter;

/// One table row per explorer with view and column definition counts
pub struct SummaryOutput;

impl SummaryOutput {
    pub fn new() -> Self {
        Self
    }

    pub fn render_all(&self, explorers: &[Explorer], writer: &mut dyn Write) -> Result<()> {
        let mut builder = Builder::default();
        builder.push_record(["Explorer", "Views", "Default views", "Tables", "Column definitions"]);
        for e in explorers {
            builder.push_record([
                e.name.clone(),
                e.view_count().to_string(),
                e.default_view_count().to_string(),
                e.tables.len().to_string(),
                e.column_definition_count().to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        writeln!(writer, "{}", table)?;
        Ok(())
    }
}

impl Default for SummaryOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for SummaryOutput {
    fn render(&self, explorer: &Explorer, writer: &mut dyn Write) -> Result<()> {
        self.render_all(std::slice::from_ref(explorer), writer)
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

/// Report slug issues per explorer. Returns the total number of issues.
pub fn write_check_report(
    results: &[(&str, Vec<SlugIssue>)],
    stream: &mut dyn WriteColor,
) -> Result<usize> {
    let mut total = 0;
    for (name, issues) in results {
        if issues.is_empty() {
            stream.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(stream, "ok")?;
            stream.reset()?;
            writeln!(stream, "  {}", name)?;
            continue;
        }

        stream.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stream, "{} issue(s)", issues.len())?;
        stream.reset()?;
        writeln!(stream, "  {}", name)?;
        for issue in issues {
            writeln!(stream, "    {}", issue)?;
        }
        total += issues.len();
    }
    Ok(total)
}
