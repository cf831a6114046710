//! Output formatting for generated explorers

mod json;
mod summary;
mod tsv;

use std::io::Write;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::explorer::Explorer;

pub use json::JsonOutput;
pub use summary::{write_check_report, SummaryOutput};
pub use tsv::TsvOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render an explorer to a writer
    fn render(&self, explorer: &Explorer, writer: &mut dyn Write) -> Result<()>;

    /// File extension after `.explorer`
    fn extension(&self) -> &'static str;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Tsv => Box::new(TsvOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Output file name for an explorer: `<name>.explorer.<ext>`
pub fn file_name(explorer: &Explorer, formatter: &dyn OutputFormatter) -> String {
    format!("{}.explorer.{}", explorer.name, formatter.extension())
}

/// Render an explorer to stdout
pub fn render_to_stdout(explorer: &Explorer, format: OutputFormat) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    formatter.render(explorer, &mut lock)?;
    lock.flush()?;
    Ok(())
}
