//! Explorer definitions and the registry that resolves them by name

mod common;
mod incomes_comparison;
mod lis_incomes;
mod lis_poverty;
mod pip_poverty;

use crate::error::{ExplorerError, Result};
use crate::explorer::Explorer;
use crate::model::SheetSet;

pub use self::incomes_comparison::IncomesComparison;
pub use self::lis_incomes::LisIncomesAcrossDistribution;
pub use self::lis_poverty::LisExpandedPoverty;
pub use self::pip_poverty::PipPovertyExplorer;

/// An explorer definition: expands facet sheets into an explorer
pub trait Generator: Send + Sync {
    /// Registry name, also the output file stem
    fn name(&self) -> &'static str;

    /// Sheet group the inputs are read from (`lis`, `pip`, `multisource`)
    fn sheet_group(&self) -> &'static str;

    /// Sheets that must be present in the group
    fn required_sheets(&self) -> &'static [&'static str];

    /// Build the explorer from loaded sheets
    fn generate(&self, sheets: &SheetSet) -> Result<Explorer>;

    /// Fail with the first required sheet missing from `sheets`
    fn check_sheets(&self, sheets: &SheetSet) -> Result<()> {
        match self
            .required_sheets()
            .iter()
            .find(|name| !sheets.contains(**name))
        {
            Some(name) => Err(ExplorerError::MissingSheet(name.to_string())),
            None => Ok(()),
        }
    }
}

/// All known explorer definitions, in output order
pub struct GeneratorRegistry {
    generators: Vec<Box<dyn Generator>>,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self {
            generators: vec![
                Box::new(LisIncomesAcrossDistribution),
                Box::new(LisExpandedPoverty),
                Box::new(PipPovertyExplorer),
                Box::new(IncomesComparison),
            ],
        }
    }

    /// Look up a definition by name
    pub fn get(&self, name: &str) -> Result<&dyn Generator> {
        self.generators
            .iter()
            .find(|g| g.name() == name)
            .map(|g| g.as_ref())
            .ok_or_else(|| ExplorerError::UnknownExplorer(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.iter().map(|g| g.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.generators.iter().map(|g| g.name()).collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let registry = GeneratorRegistry::new();
        assert_eq!(
            registry.names(),
            vec![
                "lis-incomes-across-distribution",
                "lis-expanded-poverty",
                "poverty-explorer",
                "incomes-across-distribution-comparison"
            ]
        );
        assert_eq!(
            registry.get("poverty-explorer").unwrap().sheet_group(),
            "pip"
        );
        assert!(matches!(
            registry.get("global-food"),
            Err(ExplorerError::UnknownExplorer(_))
        ));
    }

    #[test]
    fn test_check_sheets_reports_first_missing() {
        let registry = GeneratorRegistry::new();
        let generator = registry.get("lis-expanded-poverty").unwrap();
        let err = generator.check_sheets(&SheetSet::new()).unwrap_err();
        assert_eq!(err.to_string(), "Sheet not found: welfare");
    }
}
