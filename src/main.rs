//! explorergen - Chart explorer files from facet sheets

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use explorergen::config::{Config, OutputFormat};
use explorergen::explorer::check_slugs;
use explorergen::output::{
    file_name, render_to_stdout, write_check_report, OutputFactory, SummaryOutput,
};
use explorergen::parser::{resolve_group, ParserFactory, SheetSource};
use explorergen::{generate, Explorer, Generator, GeneratorRegistry};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Tsv,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Tsv => OutputFormat::Tsv,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Generate chart explorer files from facet sheets (CSV, TSV, Excel)
#[derive(Parser, Debug)]
#[command(name = "explorergen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Explorer to generate, or `all`
    #[arg(required_unless_present = "list")]
    explorer: Option<String>,

    /// Sheet directory or workbook; for `all`, the root holding one per sheet group
    #[arg(required_unless_present = "list")]
    input: Option<PathBuf>,

    /// Output file, or output directory for `all` (default: stdout / current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tsv")]
    format: CliOutputFormat,

    /// Only show row counts, not the explorer file
    #[arg(long)]
    stats_only: bool,

    /// Check that every ySlug resolves to a column of its table block
    #[arg(long)]
    check: bool,

    /// List registered explorers
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(has_issues) => {
            if has_issues {
                ExitCode::from(1) // Check found broken references
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("explorergen=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    let registry = GeneratorRegistry::new();

    if cli.list {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(false);
    }

    let explorer = cli.explorer.context("explorer is required")?;
    let input = cli.input.context("input is required")?;
    let config = Config::new(explorer, input)
        .with_output(cli.output)
        .with_output_format(cli.format.into())
        .with_stats_only(cli.stats_only)
        .with_check(cli.check);

    let factory = ParserFactory::new();
    let explorers = if config.is_all() {
        let generators: Vec<&dyn Generator> = registry.iter().collect();
        generators
            .par_iter()
            .map(|g| {
                let source = resolve_group(&config.input, g.sheet_group())?;
                generate(*g, &source, &factory)
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        let generator = registry.get(&config.explorer)?;
        let source = SheetSource::from_path(&config.input)?;
        vec![generate(generator, &source, &factory)?]
    };

    let mut has_issues = false;
    if config.check {
        let results: Vec<(&str, _)> = explorers
            .iter()
            .map(|e| (e.name.as_str(), check_slugs(e)))
            .collect();
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        has_issues = write_check_report(&results, &mut stderr)? > 0;
    }

    if config.stats_only {
        let stdout = std::io::stdout();
        SummaryOutput::new().render_all(&explorers, &mut stdout.lock())?;
        return Ok(has_issues);
    }

    write_explorers(&explorers, &config)?;
    Ok(has_issues)
}

fn write_explorers(explorers: &[Explorer], config: &Config) -> Result<()> {
    let formatter = OutputFactory::create(config.output_format);

    if config.is_all() {
        let dir = config
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        for explorer in explorers {
            let path = dir.join(file_name(explorer, formatter.as_ref()));
            write_file(&path, |w| formatter.render(explorer, w))?;
        }
        return Ok(());
    }

    for explorer in explorers {
        match &config.output {
            Some(path) => write_file(path, |w| formatter.render(explorer, w))?,
            None => render_to_stdout(explorer, config.output_format)?,
        }
    }
    Ok(())
}

fn write_file<F>(path: &Path, render: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    render(&mut writer).with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    tracing::debug!(file = %path.display(), "wrote explorer");
    Ok(())
}
