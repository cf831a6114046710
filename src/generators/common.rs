//! Pieces shared by several explorer definitions

use crate::model::{Frame, Header, Record};

/// Line break inside column descriptions
pub const NEW_LINE: &str = "<br><br>";

/// Unit of inflation and PPP adjusted money values
pub const INTERNATIONAL_DOLLARS: &str = "international-$ in 2017 prices";

/// Sheet backing the Luxembourg Income Study explorers
pub const LIS_SHEET_ID: &str = "1UFdwB1iBpP2tEP6GtxCHvW1GGhjsFflh42FWR80rYIg";

pub const LIS_SELECTION: [&str; 6] = [
    "Chile",
    "Brazil",
    "South Africa",
    "United States",
    "France",
    "China",
];

pub const LIS_SOURCE: Source = Source {
    name: "Luxembourg Income Study (LIS) (2023)",
    published_by: "Luxembourg Income Study (LIS) Database, http://www.lisdatacenter.org (multiple countries; 1967-2020). Luxembourg, LIS.",
    link: "https://www.lisdatacenter.org/our-data/lis-database/",
};

/// Dropdown options of the incomes across the distribution explorers
pub const METRIC_MEAN: &str = "Mean income or consumption";
pub const METRIC_DECILE_MEAN: &str = "Mean income or consumption, by decile";
pub const METRIC_MEDIAN: &str = "Median income or consumption";
pub const METRIC_THRESHOLDS: &str = "Decile thresholds";
pub const METRIC_SHARES: &str = "Decile shares";
pub const ALL_DECILES: &str = "All deciles";

/// Decile dropdown order, thresholds and averages interleaved
pub const DECILE_ORDER: [Option<&str>; 14] = [
    None,
    Some("1 (poorest)"),
    Some("2"),
    Some("3"),
    Some("4"),
    Some("5"),
    Some("5 (median)"),
    Some("6"),
    Some("7"),
    Some("8"),
    Some("9"),
    Some("9 (richest)"),
    Some("10 (richest)"),
    Some(ALL_DECILES),
];

pub const METRIC_ORDER: [&str; 5] = [
    METRIC_MEAN,
    METRIC_DECILE_MEAN,
    METRIC_MEDIAN,
    METRIC_THRESHOLDS,
    METRIC_SHARES,
];

pub fn google_sheet_url(sheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{}", sheet_id)
}

/// Header fields common to every explorer
pub fn base_header(title: &str, selection: &[&str], subtitle: &str, sheet_id: &str, wp_block_id: &str) -> Header {
    let mut header = Header::new();
    header
        .set("explorerTitle", title)
        .set_list("selection", selection.iter().copied())
        .set("explorerSubtitle", subtitle)
        .set("isPublished", "true")
        .set("googleSheet", google_sheet_url(sheet_id))
        .set("wpBlockId", wp_block_id)
        .set("entityType", "country or region");
    header
}

/// Provenance written on every column definition
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub name: &'static str,
    pub published_by: &'static str,
    pub link: &'static str,
}

/// Append the `Country` and `Year` column definitions
pub fn push_entity_columns(columns: &mut Frame) {
    for (name, slug, kind) in [("Country", "country", "EntityName"), ("Year", "year", "Year")] {
        let mut record = Record::new();
        record.set("name", name).set("slug", slug).set("type", kind);
        columns.push(record);
    }
}

/// Set provenance and color scale constants on every column definition
pub fn apply_column_constants(columns: &mut Frame, source: &Source) {
    columns.set_column("sourceName", Some(source.name.to_string()));
    columns.set_column("dataPublishedBy", Some(source.published_by.to_string()));
    columns.set_column("sourceLink", Some(source.link.to_string()));
    columns.set_column("colorScaleNumericMinValue", Some("0".to_string()));
    columns.set_column("tolerance", Some("5".to_string()));
    columns.set_column("colorScaleEqualSizeBins", Some("true".to_string()));
}

/// A numeric column definition
pub struct NumericColumn<'a> {
    pub name: String,
    pub slug: String,
    pub description: String,
    /// `(unit, shortUnit)`
    pub unit: Option<(&'a str, &'a str)>,
    pub bins: &'a str,
    pub scheme: &'a str,
}

impl NumericColumn<'_> {
    pub fn into_record(self) -> Record {
        let (unit, short_unit) = match self.unit {
            Some((u, s)) => (Some(u.to_string()), Some(s.to_string())),
            None => (None, None),
        };
        let mut record = Record::new();
        record
            .set("name", self.name)
            .set("slug", self.slug)
            .set("description", self.description)
            .set_opt("unit", unit)
            .set_opt("shortUnit", short_unit)
            .set("type", "Numeric")
            .set("colorScaleNumericBins", self.bins)
            .set("colorScaleScheme", self.scheme);
        record
    }
}

/// How a view opens: on the world map or on a per-entity line chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Map,
    Chart,
}

impl Layout {
    pub fn apply(self, record: &mut Record) {
        match self {
            Layout::Map => {
                record
                    .null("selectedFacetStrategy")
                    .set("hasMapTab", "true")
                    .set("tab", "map");
            }
            Layout::Chart => {
                record
                    .set("selectedFacetStrategy", "entity")
                    .set("hasMapTab", "false")
                    .set("tab", "chart");
            }
        }
    }
}

/// `a vs. b vs. c`, the label of views comparing equivalence scales
pub fn versus<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().collect::<Vec<_>>().join(" vs. ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_columns_and_constants() {
        let mut columns = Frame::new();
        push_entity_columns(&mut columns);
        columns.push(
            NumericColumn {
                name: "Mean".into(),
                slug: "mean".into(),
                description: "Mean income.".into(),
                unit: None,
                bins: "1;2",
                scheme: "BuGn",
            }
            .into_record(),
        );
        apply_column_constants(&mut columns, &LIS_SOURCE);

        assert_eq!(
            columns.columns(),
            &[
                "name",
                "slug",
                "type",
                "description",
                "unit",
                "shortUnit",
                "colorScaleNumericBins",
                "colorScaleScheme",
                "sourceName",
                "dataPublishedBy",
                "sourceLink",
                "colorScaleNumericMinValue",
                "tolerance",
                "colorScaleEqualSizeBins",
            ]
        );
        assert_eq!(columns.get(0, "tolerance"), Some("5"));
        assert_eq!(columns.get(2, "unit"), None);
    }

    #[test]
    fn test_versus() {
        assert_eq!(versus(["equivalized", "per capita"]), "equivalized vs. per capita");
    }
}
