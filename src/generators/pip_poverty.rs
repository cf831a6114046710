//! Poverty explorer from World Bank Poverty and Inequality Platform data
//!
//! Besides one table block per survey type, every variable gets a
//! comparability block per survey type: the same column metadata copied onto
//! each consumption and income survey spell, so charts can show breaks in
//! the series.

use indexmap::IndexSet;

use crate::error::Result;
use crate::explorer::facets::{AbsolutePovertyLine, RelativePovertyLine, SurveyType};
use crate::explorer::text::join_slugs;
use crate::explorer::{
    mark_default_view, rewrite_column, Explorer, Selector, TableBlock, TABLE_SLUG_COLUMN,
    Y_SLUGS_COLUMN,
};
use crate::model::{Frame, Header, Record, SheetSet};

use super::common::{base_header, Layout, INTERNATIONAL_DOLLARS};
use super::Generator;

const SHEETS: &[&str] = &["povlines_abs", "povlines_rel", "survey_type"];

const SHEET_ID: &str = "17KJ9YcvfdmO_7-Sv2Ij0vmzAQI6rXSIqHfJtgFHN-a8";

const SELECTION: [&str; 6] = [
    "Bangladesh",
    "Bolivia",
    "Kenya",
    "Mozambique",
    "Nigeria",
    "Zambia",
];

const PICKER_COLUMN_SLUGS: &str = "headcount_ratio_100 headcount_ratio_215 headcount_ratio_365 headcount_ratio_685 headcount_ratio_1000 headcount_ratio_2000 headcount_ratio_3000 headcount_ratio_4000 headcount_100 headcount_215 headcount_365 headcount_685 headcount_1000 headcount_2000 headcount_3000 headcount_4000 headcount_ratio_40_median headcount_ratio_50_median headcount_ratio_60_median headcount_40_median headcount_50_median headcount_60_median mean median decile1_thr decile9_thr";

const DATA_URL: &str = "https://raw.githubusercontent.com/owid/notebooks/main/BetterDataDocs/JoeHasell/PIP/data/ppp_2017/final/OWID_internal_upload/explorer_database";

const SOURCE_NAME: &str = "World Bank Poverty and Inequality Platform (2022)";
const SOURCE_LINK: &str = "https://pip.worldbank.org/";
const PUBLISHED_BY: &str = "World Bank Poverty and Inequality Platform (PIP)";
const PUBLISHED_BY_ADAPTED: &str =
    "World Bank Poverty and Inequality Platform (PIP), adapted by Our World in Data.";

const HEADCOUNT_BINS: &str = "100000;300000;1000000;3000000;10000000;30000000;100000000;300000000;1000000000;1000000001";
const MONEY_BINS: &str = "1;2;5;10;20;50;100;100.0001";

const SHARE_IN_POVERTY: &str = "Share in poverty";
const NUMBER_IN_POVERTY: &str = "Number in poverty";
const MULTIPLE_LINES: &str = "Multiple lines";

/// Checkbox switching between continuous series and survey spells
pub const BREAKS_CHECKBOX: &str = "Show breaks between less comparable surveys Checkbox";

const INFLATION_SUBTITLE: &str =
    "This data is adjusted for inflation and for differences in the cost of living between countries.";
const RELATIVE_SUBTITLE: &str = "Relative poverty is measured in terms of a poverty line that rises and falls over time with average incomes – in this case set at";
const BREAKS_SUBTITLE: &str = "The chart shows breaks in the comparability of the underlying household survey data over time within each country individually.";

const PRICES_NOTE: &str = "This data is measured in international-$ at 2017 prices.";
const PPP_NOTE: &str = "This data is measured in international-$ at 2017 prices to account for inflation and differences in the cost of living between countries.";

/// Survey types whose footnote does not vary by country and year
const NOTE_REWRITES: [(&str, &str); 4] = [
    (
        "Depending on the country and year, the data relates to disposable income per capita.",
        "The data relates to disposable income per capita.",
    ),
    (
        "Depending on the country and year, the data relates to disposable consumption per capita.",
        "The data relates to disposable consumption per capita.",
    ),
    (
        "Depending on the country and year, it relates to disposable income per capita.",
        "It relates to disposable income per capita.",
    ),
    (
        "Depending on the country and year, it relates to disposable consumption per capita.",
        "It relates to disposable consumption per capita.",
    ),
];

const CONSUMPTION_SPELLS: usize = 6;
const INCOME_SPELLS: usize = 7;

/// `poverty-explorer`
pub struct PipPovertyExplorer;

struct Facets {
    absolute: Vec<AbsolutePovertyLine>,
    relative: Vec<RelativePovertyLine>,
    surveys: Vec<SurveyType>,
}

impl Generator for PipPovertyExplorer {
    fn name(&self) -> &'static str {
        "poverty-explorer"
    }

    fn sheet_group(&self) -> &'static str {
        "pip"
    }

    fn required_sheets(&self) -> &'static [&'static str] {
        SHEETS
    }

    fn generate(&self, sheets: &SheetSet) -> Result<Explorer> {
        self.check_sheets(sheets)?;
        let f = Facets {
            absolute: sheets.facets("povlines_abs")?,
            relative: sheets.facets("povlines_rel")?,
            surveys: sheets.facets("survey_type")?,
        };
        tracing::debug!(
            surveys = f.surveys.len(),
            absolute_lines = f.absolute.len(),
            relative_lines = f.relative.len(),
            "expanding World Bank poverty explorer"
        );

        let mut explorer = Explorer::new(self.name(), header());

        let views: Vec<View<'_>> = f.surveys.iter().flat_map(|s| survey_views(&f, s)).collect();
        let mut graphers = Frame::new();
        for view in &views {
            graphers.push(view.record());
        }
        graphers.set_column(BREAKS_CHECKBOX, Some("false".to_string()));
        for view in views.iter().filter(|v| v.povline != Some(MULTIPLE_LINES)) {
            graphers.push(view.spell_record());
        }

        graphers.set_column("relatedQuestionText", None);
        graphers.set_column("relatedQuestionUrl", None);
        rewrite_column(&mut graphers, "note", &NOTE_REWRITES);
        mark_default_view(
            &mut graphers,
            &Selector::new()
                .eq(Y_SLUGS_COLUMN, "headcount_ratio_215")
                .eq(TABLE_SLUG_COLUMN, "inc_or_cons")
                .eq(BREAKS_CHECKBOX, "false"),
        )?;
        explorer.graphers = graphers;

        explorer.tables = table_blocks(&f);
        Ok(explorer)
    }
}

fn header() -> Header {
    let mut header = base_header(
        "Poverty Data Explorer of World Bank data",
        &SELECTION,
        "<i><a href='https://github.com/owid/poverty-data'>Download Poverty data on GitHub</a></i>",
        SHEET_ID,
        "52633",
    );
    header
        .set("thumbnail", "https://ourworldindata.org/uploads/2022/10/chart.png")
        .set("pickerColumnSlugs", PICKER_COLUMN_SLUGS);
    header
}

/// Column metadata in the order the platform tables use
fn column(
    name: String,
    slug: String,
    description: String,
    published_by: &str,
    unit: Option<(&str, &str)>,
    bins: &str,
    scheme: &str,
) -> Record {
    let (unit, short_unit) = match unit {
        Some((u, s)) => (Some(u.to_string()), Some(s.to_string())),
        None => (None, None),
    };
    let mut record = Record::new();
    record
        .set("name", name)
        .set("slug", slug)
        .set("sourceName", SOURCE_NAME)
        .set("description", description)
        .set("sourceLink", SOURCE_LINK)
        .set("dataPublishedBy", published_by)
        .set_opt("unit", unit)
        .set_opt("shortUnit", short_unit)
        .set("tolerance", "5")
        .set("type", "Numeric")
        .set("colorScaleNumericMinValue", "0")
        .set("colorScaleNumericBins", bins)
        .set("colorScaleEqualSizeBins", "true")
        .set("colorScaleScheme", scheme);
    record
}

fn survey_columns(f: &Facets, s: &SurveyType) -> Vec<Record> {
    let text = &s.text;
    let money = Some((INTERNATIONAL_DOLLARS, "$"));
    let percent = Some(("%", "%"));
    let mut columns = Vec::new();

    for pl in &f.absolute {
        columns.push(column(
            format!("Share below ${} a day", pl.dollars_text),
            format!("headcount_ratio_{}", pl.cents),
            format!(
                "% of population living in households with an {} per person below ${} a day.",
                text, pl.dollars_text
            ),
            PUBLISHED_BY,
            percent,
            "3;10;20;30;40;50;60;70;80;90;100",
            "OrRd",
        ));
    }
    for pl in &f.absolute {
        columns.push(column(
            format!("Number below ${} a day", pl.dollars_text),
            format!("headcount_{}", pl.cents),
            format!(
                "Number of people living in households with an {} per person below ${} a day.",
                text, pl.dollars_text
            ),
            PUBLISHED_BY,
            None,
            HEADCOUNT_BINS,
            "Reds",
        ));
    }
    for pr in &f.relative {
        columns.push(column(
            format!("{} of median - share of population below poverty line", pr.percent),
            format!("headcount_ratio_{}", pr.slug_suffix),
            format!(
                "% of population living in households with an {} per person below {} of the median.",
                text, pr.percent
            ),
            PUBLISHED_BY_ADAPTED,
            percent,
            "5;10;15;20;25;30;30.0001",
            "YlOrBr",
        ));
    }
    for pr in &f.relative {
        columns.push(column(
            format!("{} of median - total number of people below poverty line", pr.percent),
            format!("headcount_{}", pr.slug_suffix),
            format!(
                "Number of people living in households with an {} per person below {} of the median.",
                text, pr.percent
            ),
            PUBLISHED_BY_ADAPTED,
            None,
            HEADCOUNT_BINS,
            "YlOrBr",
        ));
    }

    columns.push(column(
        format!("Mean {} per day", text),
        "mean".to_string(),
        format!("The mean level of {} per day.", text),
        PUBLISHED_BY,
        money,
        MONEY_BINS,
        "BuGn",
    ));
    columns.push(column(
        format!("Median {} per day", text),
        "median".to_string(),
        format!("The level of {} per day below which half of the population live.", text),
        PUBLISHED_BY,
        money,
        MONEY_BINS,
        "Blues",
    ));
    for (slug, end, pct) in [("decile1_thr", "poorest", 10), ("decile9_thr", "richest", 90)] {
        columns.push(column(
            format!("Threshold income or consumption per day marking the {} decile", end),
            slug.to_string(),
            format!(
                "The level of {} per day below which {}% of the population falls.",
                text, pct
            ),
            PUBLISHED_BY,
            money,
            MONEY_BINS,
            "Purples",
        ));
    }

    columns
}

fn spell_slugs() -> impl Iterator<Item = (&'static str, String)> {
    let consumption =
        (1..=CONSUMPTION_SPELLS).map(|i| ("Consumption surveys", format!("consumption_spell_{}", i)));
    let income = (1..=INCOME_SPELLS).map(|i| ("Income surveys", format!("income_spell_{}", i)));
    consumption.chain(income)
}

/// Survey blocks first, then one comparability block per variable and survey
fn table_blocks(f: &Facets) -> Vec<TableBlock> {
    let mut surveys: Vec<(&str, Vec<Record>)> = Vec::new();
    for s in &f.surveys {
        if !surveys.iter().any(|(name, _)| *name == s.table_name) {
            surveys.push((s.table_name.as_str(), survey_columns(f, s)));
        }
    }

    let mut blocks = Vec::new();
    for (survey, columns) in &surveys {
        let mut frame = Frame::new();
        for record in columns {
            frame.push(record.clone());
        }
        blocks.push(TableBlock::new(
            format!("{}/{}/poverty_{}.csv", DATA_URL, survey, survey),
            *survey,
            frame,
        ));
    }

    let variables: IndexSet<&str> = surveys
        .iter()
        .flat_map(|(_, columns)| columns.iter().filter_map(|c| c.get("slug")))
        .collect();

    for variable in variables {
        for (survey, columns) in &surveys {
            let Some(metadata) = columns.iter().find(|c| c.get("slug") == Some(variable)) else {
                continue;
            };
            let mut frame = Frame::new();
            for (name, slug) in spell_slugs() {
                let mut record = metadata.clone();
                record.set("name", name).set("slug", slug);
                frame.push(record);
            }
            blocks.push(TableBlock::new(
                format!("{}/comparability_data/{}/{}.csv", DATA_URL, survey, variable),
                format!("{}_{}", survey, variable),
                frame,
            ));
        }
    }

    blocks
}

/// One continuous-series view; its spell variant is derived from it
struct View<'a> {
    title: String,
    y_slugs: String,
    indicator: &'a str,
    povline: Option<&'a str>,
    survey: &'a SurveyType,
    subtitle: String,
    note: String,
    layout: Layout,
    y_scale_toggle: bool,
}

impl View<'_> {
    fn record(&self) -> Record {
        let mut record = self.lead();
        record
            .set(TABLE_SLUG_COLUMN, self.survey.table_name.as_str())
            .set("subtitle", self.subtitle.as_str());
        self.tail(&mut record);
        record.set("yAxisMin", "0");
        self.layout.apply(&mut record);
        record.set("mapTargetTime", "2019");
        if self.y_scale_toggle {
            record.set("yScaleToggle", "true");
        }
        record
    }

    /// Same view drawn from the survey spells of its variable
    fn spell_record(&self) -> Record {
        let mut record = self.lead();
        record.set(Y_SLUGS_COLUMN, join_slugs(spell_slugs().map(|(_, slug)| slug)));
        record
            .set(
                TABLE_SLUG_COLUMN,
                format!("{}_{}", self.survey.table_name, self.y_slugs),
            )
            .set("subtitle", format!("{} {}", self.subtitle, BREAKS_SUBTITLE));
        self.tail(&mut record);
        record
            .set("yAxisMin", "0")
            .set("selectedFacetStrategy", "entity")
            .set("hasMapTab", "false")
            .null("tab")
            .null("mapTargetTime")
            .set(BREAKS_CHECKBOX, "true");
        record
    }

    fn lead(&self) -> Record {
        let mut record = Record::new();
        record
            .set("title", self.title.as_str())
            .set(Y_SLUGS_COLUMN, self.y_slugs.as_str())
            .set("Indicator Dropdown", self.indicator)
            .set_opt("Poverty line Dropdown", self.povline.map(str::to_string))
            .set(
                "Household survey data type Dropdown",
                self.survey.dropdown_option.as_str(),
            );
        record
    }

    fn tail(&self, record: &mut Record) {
        record
            .set("note", self.note.as_str())
            .set("sourceDesc", SOURCE_NAME)
            .null("type");
    }
}

fn survey_views<'a>(f: &'a Facets, s: &'a SurveyType) -> Vec<View<'a>> {
    let text = &s.text;
    let depends = format!(
        "Depending on the country and year, it relates to disposable {} per capita.",
        text
    );
    let prices_note = format!("{} {}", PRICES_NOTE, depends);
    let mut views = Vec::new();

    let line_view = |title: &str, y_slugs: String, indicator: &'a str, pl: &'a AbsolutePovertyLine| View {
        title: title.to_string(),
        y_slugs,
        indicator,
        povline: Some(pl.povline_dropdown.as_str()),
        survey: s,
        subtitle: pl.subtitle.clone(),
        note: prices_note.clone(),
        layout: Layout::Map,
        y_scale_toggle: false,
    };
    for pl in &f.absolute {
        views.push(line_view(
            &pl.title_share,
            format!("headcount_ratio_{}", pl.cents),
            SHARE_IN_POVERTY,
            pl,
        ));
    }
    for pl in &f.absolute {
        views.push(line_view(
            &pl.title_number,
            format!("headcount_{}", pl.cents),
            NUMBER_IN_POVERTY,
            pl,
        ));
    }

    for (title, indicator, prefix) in [
        (
            "Share of population living below a range of poverty lines",
            SHARE_IN_POVERTY,
            "headcount_ratio",
        ),
        (
            "Number of people living below a range of poverty lines",
            NUMBER_IN_POVERTY,
            "headcount",
        ),
    ] {
        views.push(View {
            title: title.to_string(),
            y_slugs: join_slugs(f.absolute.iter().map(|pl| format!("{}_{}", prefix, pl.cents))),
            indicator,
            povline: Some(MULTIPLE_LINES),
            survey: s,
            subtitle: INFLATION_SUBTITLE.to_string(),
            note: prices_note.clone(),
            layout: Layout::Chart,
            y_scale_toggle: false,
        });
    }

    let relative_view = |title: &str, y_slugs: String, indicator: &'a str, pr: &'a RelativePovertyLine| View {
        title: title.to_string(),
        y_slugs,
        indicator,
        povline: Some(pr.dropdown.as_str()),
        survey: s,
        subtitle: format!("{} {} {}.", RELATIVE_SUBTITLE, pr.text, text),
        note: format!(
            "Depending on the country and year, the data relates to disposable {} per capita.",
            text
        ),
        layout: Layout::Map,
        y_scale_toggle: false,
    };
    for pr in &f.relative {
        views.push(relative_view(
            &pr.title_share,
            format!("headcount_ratio_{}", pr.slug_suffix),
            SHARE_IN_POVERTY,
            pr,
        ));
    }
    for pr in &f.relative {
        views.push(relative_view(
            &pr.title_number,
            format!("headcount_{}", pr.slug_suffix),
            NUMBER_IN_POVERTY,
            pr,
        ));
    }

    let distribution_view = |title: String, y_slugs: &str, indicator: &'a str, subtitle: String, note: String| View {
        title,
        y_slugs: y_slugs.to_string(),
        indicator,
        povline: None,
        survey: s,
        subtitle,
        note,
        layout: Layout::Map,
        y_scale_toggle: true,
    };
    views.push(distribution_view(
        format!("Mean {} per day", text),
        "mean",
        "Mean income or consumption",
        INFLATION_SUBTITLE.to_string(),
        prices_note.clone(),
    ));
    views.push(distribution_view(
        format!("Median {} per day", text),
        "median",
        "Median income or consumption",
        INFLATION_SUBTITLE.to_string(),
        prices_note.clone(),
    ));
    for (slug, end, pct, indicator) in [
        ("decile1_thr", "poorest", 10, "Income or consumption of the poorest 10%"),
        ("decile9_thr", "richest", 90, "Income or consumption of the richest 10%"),
    ] {
        views.push(distribution_view(
            format!("Threshold {} per day marking the {} decile", text, end),
            slug,
            indicator,
            format!(
                "This is the level of {} per day below which {}% of the population falls.",
                text, pct
            ),
            format!(
                "{} It relates to disposable {} per capita.",
                PPP_NOTE, text
            ),
        ));
    }

    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::check_slugs;
    use crate::generators::fixtures;

    fn generate() -> Explorer {
        PipPovertyExplorer.generate(&fixtures::load("pip")).unwrap()
    }

    fn counts() -> (usize, usize, usize) {
        let sheets = fixtures::load("pip");
        let abs: Vec<AbsolutePovertyLine> = sheets.facets("povlines_abs").unwrap();
        let rel: Vec<RelativePovertyLine> = sheets.facets("povlines_rel").unwrap();
        let surveys: Vec<SurveyType> = sheets.facets("survey_type").unwrap();
        (abs.len(), rel.len(), surveys.len())
    }

    #[test]
    fn test_views_and_spell_variants() {
        let (a, r, s) = counts();
        let continuous = 2 * a + 2 + 2 * r + 4;
        let explorer = generate();

        assert_eq!(explorer.view_count(), s * (2 * continuous - 2));
        let breaks = explorer.graphers.column_values(BREAKS_CHECKBOX);
        assert_eq!(
            breaks.iter().filter(|v| **v == Some("false")).count(),
            s * continuous
        );
    }

    #[test]
    fn test_table_blocks() {
        let (a, r, s) = counts();
        let variables = 2 * a + 2 * r + 4;
        let explorer = generate();

        assert_eq!(explorer.tables.len(), s + s * variables);
        let main = explorer.table("inc_or_cons").unwrap();
        assert!(main.url.ends_with("/inc_or_cons/poverty_inc_or_cons.csv"));
        assert_eq!(main.columns.row_count(), variables);
        assert_eq!(main.columns.columns()[2], "sourceName");

        let spells = explorer.table("inc_or_cons_headcount_ratio_215").unwrap();
        assert!(spells.url.contains("/comparability_data/inc_or_cons/"));
        assert_eq!(spells.columns.row_count(), CONSUMPTION_SPELLS + INCOME_SPELLS);
        assert_eq!(spells.columns.get(0, "name"), Some("Consumption surveys"));
        assert_eq!(spells.columns.get(12, "slug"), Some("income_spell_7"));
        assert_eq!(spells.columns.get(0, "colorScaleScheme"), Some("OrRd"));
        assert!(!spells.columns.has_column("master_var"));
    }

    #[test]
    fn test_every_y_slug_resolves() {
        assert_eq!(check_slugs(&generate()), vec![]);
    }

    #[test]
    fn test_default_view_and_footnotes() {
        let explorer = generate();
        assert_eq!(explorer.default_view_count(), 1);

        let notes = explorer.graphers.column_values("note");
        assert!(notes.contains(&Some(
            "This data is measured in international-$ at 2017 prices. It relates to disposable income per capita."
        )));
        assert!(notes.contains(&Some(
            "This data is measured in international-$ at 2017 prices. Depending on the country and year, it relates to disposable income or consumption per capita."
        )));
        assert!(notes.contains(&Some("The data relates to disposable consumption per capita.")));
    }

    #[test]
    fn test_spell_view_shape() {
        let explorer = generate();
        let spell = explorer
            .graphers
            .rows()
            .find(|r| r.get(TABLE_SLUG_COLUMN) == Some("inc_or_cons_mean"))
            .unwrap();
        assert_eq!(spell.get(BREAKS_CHECKBOX), Some("true"));
        assert_eq!(spell.get("tab"), None);
        assert_eq!(spell.get("mapTargetTime"), None);
        assert_eq!(spell.get("yScaleToggle"), None);
        assert!(spell.get("ySlugs").unwrap().starts_with("consumption_spell_1 "));
        assert!(spell
            .get("subtitle")
            .unwrap()
            .ends_with(BREAKS_SUBTITLE));
        assert!(!explorer
            .graphers
            .rows()
            .any(|r| r.get("Poverty line Dropdown") == Some(MULTIPLE_LINES)
                && r.get(BREAKS_CHECKBOX) == Some("true")));
    }
}
