//! explorergen - Chart explorer files from facet sheets
//!
//! Reads small facet sheets (welfare concepts, equivalence scales, poverty
//! lines, survey types, ...) from CSV/TSV files or workbooks and expands
//! every combination into the grapher views and column definitions of an
//! explorer file.

pub mod config;
pub mod error;
pub mod explorer;
pub mod generators;
pub mod model;
pub mod output;
pub mod parser;

use anyhow::{Context, Result};

pub use config::{Config, OutputFormat};
pub use error::ExplorerError;
pub use explorer::Explorer;
pub use generators::{Generator, GeneratorRegistry};

use parser::{ParserFactory, SheetSource};

/// Load the sheets of `source` and build one explorer from them
pub fn generate(
    generator: &dyn Generator,
    source: &SheetSource,
    factory: &ParserFactory,
) -> Result<Explorer> {
    let sheets = source
        .load(factory)
        .with_context(|| format!("Failed to load sheets from {}", source.path().display()))?;
    let explorer = generator
        .generate(&sheets)
        .with_context(|| format!("Failed to generate {}", generator.name()))?;

    tracing::info!(
        explorer = generator.name(),
        views = explorer.view_count(),
        tables = explorer.tables.len(),
        columns = explorer.column_definition_count(),
        "generated explorer"
    );
    Ok(explorer)
}
