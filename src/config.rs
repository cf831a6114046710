//! Configuration handling for explorergen

use std::path::PathBuf;

/// Name selecting every registered explorer
pub const ALL_EXPLORERS: &str = "all";

/// Output format for generated explorers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for one generation run
#[derive(Debug, Clone)]
pub struct Config {
    /// Registry name of the explorer, or `all`
    pub explorer: String,
    /// Sheet group directory or workbook; for `all`, the root holding every group
    pub input: PathBuf,
    /// Output file, or output directory for `all`. `None` writes to stdout
    pub output: Option<PathBuf>,
    /// Output format
    pub output_format: OutputFormat,
    /// Only show row counts, not the explorer file
    pub stats_only: bool,
    /// Validate slug references and report issues
    pub check: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            explorer: ALL_EXPLORERS.to_string(),
            input: PathBuf::new(),
            output: None,
            output_format: OutputFormat::default(),
            stats_only: false,
            check: false,
        }
    }
}

impl Config {
    /// Create a new Config for an explorer and its input
    pub fn new(explorer: impl Into<String>, input: PathBuf) -> Self {
        Self {
            explorer: explorer.into(),
            input,
            ..Default::default()
        }
    }

    /// Whether every registered explorer is generated
    pub fn is_all(&self) -> bool {
        self.explorer == ALL_EXPLORERS
    }

    /// Set output path
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Enable stats-only mode
    pub fn with_stats_only(mut self, stats_only: bool) -> Self {
        self.stats_only = stats_only;
        self
    }

    /// Enable slug checks
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }
}
