//! Expanded poverty metrics, from the Luxembourg Income Study
//!
//! Six poverty metrics (share and number in poverty, total and average
//! shortfall, income gap ratio, poverty gap index) at absolute and relative
//! poverty lines, for every welfare concept and equivalence scale.

use crate::error::Result;
use crate::explorer::facets::{
    AbsolutePovertyLine, EquivalenceScale, RelativePovertyLine, TableLink, Welfare,
};
use crate::explorer::text::{capitalize, join_slugs};
use crate::explorer::{mark_default_view, Explorer, Selector, TableBlock, TABLE_SLUG_COLUMN};
use crate::model::{Frame, Record, SheetSet};

use super::common::{
    apply_column_constants, base_header, push_entity_columns, versus, Layout, NumericColumn,
    INTERNATIONAL_DOLLARS, LIS_SELECTION, LIS_SHEET_ID, LIS_SOURCE, NEW_LINE,
};
use super::Generator;

const SHEETS: &[&str] = &[
    "welfare",
    "equivalence_scales",
    "povlines_abs",
    "povlines_rel",
    "tables",
];

const MULTIPLE_LINES: &str = "Multiple lines";

const INFLATION_SUBTITLE: &str =
    "This data is adjusted for inflation and for differences in the cost of living between countries.";
const RELATIVE_SUBTITLE: &str = "Relative poverty is measured in terms of a poverty line that rises and falls over time with average incomes – in this case set at";
const PGI_SUBTITLE: &str = "The poverty gap index is a poverty measure that reflects both the prevalence and the depth of poverty. It is calculated as the share of population in poverty multiplied by the average shortfall from the poverty line (expressed as a % of the poverty line).";

const PRICES_NOTE: &str = "This data is measured in international-$ at 2017 prices.";
const PPP_NOTE: &str = "This data is measured in international-$ at 2017 prices to account for inflation and differences in the cost of living between countries.";
const TOTAL_SHORTFALL_NOTE: &str = "This data is expressed in international-$ at 2017 prices. The cost of closing the poverty gap does not take into account costs and inefficiencies from making the necessary transfers.";

const TOTAL_SHORTFALL_CAVEAT: &str = "However this is not a measure of the actual cost of eliminating poverty, since it does not take into account the costs involved in making the necessary transfers nor any changes in behaviour they would bring about.";
const PGI_DEFINITION: &str = "The poverty gap index is a measure that reflects both the depth and prevalence of poverty. It is defined as the mean shortfall of the total population from the poverty line counting the non-poor as having zero shortfall and expressed as a percentage of the poverty line. It is worth unpacking that definition a little. For those below the poverty line, the shortfall corresponds to the amount of money required in order to reach the poverty line. For those at or above the poverty line, the shortfall is counted as zero. The average shortfall is then calculated across the total population – both poor and non-poor – and then expressed as a share of the poverty line. Unlike the more commonly-used metric of the headcount ratio, the poverty gap index is thus sensitive not only to whether a person’s income falls below the poverty line or not, but also by how much – i.e. to the depth of poverty they experience.";
const INCOME_GAP_DEFINITION: &str = "expressed as a share of the poverty line. This metric is sometimes called the \"income gap ratio\". It captures the depth of poverty in which those below the poverty line are living.";

const HEADCOUNT_BINS: &str =
    "100000;300000;1000000;3000000;10000000;30000000;100000000;300000000;1000000000";

/// `lis-expanded-poverty`
pub struct LisExpandedPoverty;

/// The poverty metrics, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Share,
    Number,
    TotalShortfall,
    AverageShortfall,
    IncomeGapRatio,
    PovertyGapIndex,
}

const METRICS: [Metric; 6] = [
    Metric::Share,
    Metric::Number,
    Metric::TotalShortfall,
    Metric::AverageShortfall,
    Metric::IncomeGapRatio,
    Metric::PovertyGapIndex,
];

impl Metric {
    fn slug(self) -> &'static str {
        match self {
            Metric::Share => "headcount_ratio",
            Metric::Number => "headcount",
            Metric::TotalShortfall => "total_shortfall",
            Metric::AverageShortfall => "avg_shortfall",
            Metric::IncomeGapRatio => "income_gap_ratio",
            Metric::PovertyGapIndex => "poverty_gap_index",
        }
    }

    fn dropdown(self) -> &'static str {
        match self {
            Metric::Share => "Share in poverty",
            Metric::Number => "Number in poverty",
            Metric::TotalShortfall => "Total shortfall from poverty line",
            Metric::AverageShortfall => "Average shortfall ($)",
            Metric::IncomeGapRatio => "Average shortfall (% of poverty line)",
            Metric::PovertyGapIndex => "Poverty gap index",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Line<'a> {
    Absolute(&'a AbsolutePovertyLine),
    Relative(&'a RelativePovertyLine),
}

impl<'a> Line<'a> {
    /// Absolute lines put the cents last, relative lines put their suffix first
    fn variable(&self, metric: Metric, welfare: &str, scale: &str) -> String {
        match self {
            Line::Absolute(pl) => format!("{}_{}_{}_{}", metric.slug(), welfare, scale, pl.cents),
            Line::Relative(pr) => {
                format!("{}_{}_{}_{}", metric.slug(), pr.slug_suffix, welfare, scale)
            }
        }
    }

    fn dropdown(&self) -> &'a str {
        match *self {
            Line::Absolute(pl) => &pl.povline_dropdown,
            Line::Relative(pr) => &pr.dropdown,
        }
    }

    /// How the line reads in a sentence: `$2.15 a day`, `40% of the median income`
    fn phrase(&self, welfare_type: &str) -> String {
        match self {
            Line::Absolute(pl) => format!("${} a day", pl.dollars_text),
            Line::Relative(pr) => format!("{} {}", pr.text, welfare_type),
        }
    }
}

/// How a view's footnote relates to the equivalence scale note
enum Note {
    /// Fixed text followed by the scale note
    Prefixed(&'static str),
    /// Fixed text only
    Fixed(&'static str),
    /// Only the scale note
    ScaleOnly,
}

struct Facets {
    welfare: Vec<Welfare>,
    scales: Vec<EquivalenceScale>,
    absolute: Vec<AbsolutePovertyLine>,
    relative: Vec<RelativePovertyLine>,
    tables: Vec<TableLink>,
}

impl Facets {
    fn load(sheets: &SheetSet) -> Result<Self> {
        Ok(Self {
            welfare: sheets.facets("welfare")?,
            scales: sheets.facets("equivalence_scales")?,
            absolute: sheets.facets("povlines_abs")?,
            relative: sheets.facets("povlines_rel")?,
            tables: sheets.facets("tables")?,
        })
    }

    fn absolute_lines(&self) -> impl Iterator<Item = Line<'_>> {
        self.absolute.iter().map(Line::Absolute)
    }

    fn relative_lines(&self) -> impl Iterator<Item = Line<'_>> {
        self.relative.iter().map(Line::Relative)
    }
}

impl Generator for LisExpandedPoverty {
    fn name(&self) -> &'static str {
        "lis-expanded-poverty"
    }

    fn sheet_group(&self) -> &'static str {
        "lis"
    }

    fn required_sheets(&self) -> &'static [&'static str] {
        SHEETS
    }

    fn generate(&self, sheets: &SheetSet) -> Result<Explorer> {
        self.check_sheets(sheets)?;
        let facets = Facets::load(sheets)?;
        tracing::debug!(
            welfare = facets.welfare.len(),
            scales = facets.scales.len(),
            absolute_lines = facets.absolute.len(),
            relative_lines = facets.relative.len(),
            "expanding poverty metrics"
        );

        let header = base_header(
            "Poverty Data Explorer of the Luxembourg Income Study: Expanded metrics",
            &LIS_SELECTION,
            "",
            LIS_SHEET_ID,
            "",
        );
        let mut explorer = Explorer::new(self.name(), header);

        let columns = column_definitions(&facets);
        for table in &facets.tables {
            explorer
                .tables
                .push(TableBlock::new(&table.link, &table.name, columns.clone()));

            let mut views = grapher_views(&facets);
            views.set_column(TABLE_SLUG_COLUMN, Some(table.name.clone()));
            explorer.graphers.concat(&views);
        }

        let graphers = &mut explorer.graphers;
        graphers.set_column("relatedQuestionText", None);
        graphers.set_column("relatedQuestionUrl", None);
        graphers.set_column("yAxisMin", Some("0".to_string()));
        graphers.set_column("mapTargetTime", Some("2019".to_string()));

        mark_default_view(
            graphers,
            &Selector::new()
                .eq("Metric Dropdown", Metric::Share.dropdown())
                .eq("Poverty line Dropdown", "$2.15 per day: International Poverty Line")
                .eq("Income type Dropdown", "Before tax")
                .eq("Equivalence scale Dropdown", "Equivalized"),
        )?;

        Ok(explorer)
    }
}

fn column_definitions(f: &Facets) -> Frame {
    let mut columns = Frame::new();
    push_entity_columns(&mut columns);

    for w in &f.welfare {
        for eq in &f.scales {
            for metric in METRICS {
                for line in f.absolute_lines() {
                    columns.push(column(metric, line, w, eq).into_record());
                }
            }
            for metric in METRICS {
                for line in f.relative_lines() {
                    columns.push(column(metric, line, w, eq).into_record());
                }
            }
        }
    }

    apply_column_constants(&mut columns, &LIS_SOURCE);
    columns
}

fn column<'a>(
    metric: Metric,
    line: Line<'a>,
    w: &Welfare,
    eq: &EquivalenceScale,
) -> NumericColumn<'a> {
    let wt = &w.welfare_type;
    let phrase = line.phrase(wt);
    let money = Some((INTERNATIONAL_DOLLARS, "$"));
    let percent = Some(("%", "%"));

    let (name, lead, unit, bins, scheme): (String, String, _, &'a str, &'a str) = match line {
        Line::Absolute(pl) => {
            let d = &pl.dollars_text;
            match metric {
                Metric::Share => (
                    format!("Share below ${} a day ({})", d, eq.text),
                    format!("% of population living in households with {} below {}.", wt, phrase),
                    percent,
                    "3;10;20;30;40;50;60;70;80;90;100",
                    "OrRd",
                ),
                Metric::Number => (
                    format!("Number below ${} a day ({})", d, eq.text),
                    format!("Number of people living in households with {} below {}.", wt, phrase),
                    None,
                    HEADCOUNT_BINS,
                    "Reds",
                ),
                Metric::TotalShortfall => (
                    format!("${} a day - total shortfall ({})", d, eq.text),
                    total_shortfall_description(&phrase, wt),
                    money,
                    pl.scale_total_shortfall.as_str(),
                    "Oranges",
                ),
                Metric::AverageShortfall => (
                    format!("${} a day - average shortfall ({})", d, eq.text),
                    format!(
                        "The average shortfall from a poverty line of ${} (averaged across the population in poverty).",
                        d
                    ),
                    money,
                    pl.scale_avg_shortfall.as_str(),
                    "Purples",
                ),
                Metric::IncomeGapRatio => (
                    format!("${} a day - income gap ratio ({})", d, eq.text),
                    income_gap_description(&phrase),
                    percent,
                    "10;20;30;40;50;60;70;80;90;100",
                    "YlOrRd",
                ),
                Metric::PovertyGapIndex => (
                    format!("${} a day - poverty gap index ({})", d, eq.text),
                    pgi_description(&phrase),
                    percent,
                    "10;20;30;40;50;60",
                    "RdPu",
                ),
            }
        }
        Line::Relative(pr) => {
            let pct = &pr.percent;
            let technical = capitalize(&w.technical_text);
            match metric {
                Metric::Share => (
                    format!(
                        "{} of median {} - share of population below poverty line ({}, {})",
                        pct, wt, technical, eq.text
                    ),
                    format!(
                        "% of population living in households with {} below {} of the median {}.",
                        wt, pct, wt
                    ),
                    percent,
                    "5;10;15;20;25;30",
                    "YlOrBr",
                ),
                Metric::Number => (
                    format!(
                        "{} of median {} - total number of people below poverty line ({}, {})",
                        pct, wt, technical, eq.text
                    ),
                    format!(
                        "Number of people living in households with {} below {} of the median {}.",
                        wt, pct, wt
                    ),
                    None,
                    HEADCOUNT_BINS,
                    "YlOrBr",
                ),
                Metric::TotalShortfall => (
                    format!("{} of median {} - total shortfall ({})", pct, wt, eq.text),
                    total_shortfall_description(&phrase, wt),
                    None,
                    pr.scale_total_shortfall.as_str(),
                    "YlOrBr",
                ),
                Metric::AverageShortfall => (
                    format!("{} of median {} - average shortfall ({})", pct, wt, eq.text),
                    format!(
                        "The average shortfall from a poverty line of {} (averaged across the population in poverty).",
                        phrase
                    ),
                    money,
                    "1000;2000;3000;4000;5000",
                    "YlOrBr",
                ),
                Metric::IncomeGapRatio => (
                    format!("{} of median {} - income gap ratio ({})", pct, wt, eq.text),
                    income_gap_description(&phrase),
                    percent,
                    "5;10;15;20;25;30;35;40",
                    "YlOrBr",
                ),
                Metric::PovertyGapIndex => (
                    format!("{} of median {} - poverty gap index ({})", pct, wt, eq.text),
                    pgi_description(&phrase),
                    percent,
                    "2;4;6;8;10;12",
                    "YlOrBr",
                ),
            }
        }
    };

    NumericColumn {
        name,
        slug: line.variable(metric, &w.slug, &eq.slug),
        description: format!(
            "{}{}This is {}. {}{}{}",
            lead, NEW_LINE, w.technical_text, w.subtitle, NEW_LINE, eq.description
        ),
        unit,
        bins,
        scheme,
    }
}

fn total_shortfall_description(phrase: &str, welfare_type: &str) -> String {
    format!(
        "The total shortfall from a poverty line of {}. This is the amount of money that would be theoretically needed to lift the {} of all people in poverty up to the poverty line. {}",
        phrase, welfare_type, TOTAL_SHORTFALL_CAVEAT
    )
}

fn income_gap_description(phrase: &str) -> String {
    format!(
        "The average shortfall from a poverty line of {} (averaged across the population in poverty) {}",
        phrase, INCOME_GAP_DEFINITION
    )
}

fn pgi_description(phrase: &str) -> String {
    format!(
        "The poverty gap index calculated at a poverty line of {}. {}",
        phrase, PGI_DEFINITION
    )
}

/// Title without the welfare suffix
fn view_title(metric: Metric, line: Line<'_>, w: &Welfare) -> String {
    let wt = &w.welfare_type;
    match line {
        Line::Absolute(pl) => match metric {
            Metric::Share => pl.title_share.clone(),
            Metric::Number => pl.title_number.clone(),
            Metric::TotalShortfall => pl.title_total_shortfall.clone(),
            Metric::AverageShortfall => pl.title_avg_shortfall.clone(),
            Metric::IncomeGapRatio => pl.title_income_gap_ratio.clone(),
            Metric::PovertyGapIndex => format!("Poverty gap index at {}", line.phrase(wt)),
        },
        Line::Relative(pr) => match metric {
            Metric::Share => pr.title_share.clone(),
            Metric::Number => pr.title_number.clone(),
            Metric::TotalShortfall => {
                format!("Total shortfall from a poverty line of {}", line.phrase(wt))
            }
            Metric::AverageShortfall => {
                format!("Average shortfall from a poverty line of {}", line.phrase(wt))
            }
            Metric::IncomeGapRatio => format!(
                "Average shortfall from a poverty line of {} (as a share of the poverty line)",
                line.phrase(wt)
            ),
            Metric::PovertyGapIndex => format!("Poverty gap index at {}", line.phrase(wt)),
        },
    }
}

fn view_subtitle(metric: Metric, line: Line<'_>, w: &Welfare) -> String {
    let lead = match (line, metric) {
        (_, Metric::PovertyGapIndex) => PGI_SUBTITLE.to_string(),
        (Line::Absolute(pl), Metric::Share | Metric::Number) => pl.subtitle.clone(),
        (Line::Absolute(pl), Metric::TotalShortfall) => pl.subtitle_total_shortfall.clone(),
        (Line::Absolute(pl), Metric::AverageShortfall) => pl.subtitle_avg_shortfall.clone(),
        (Line::Absolute(pl), Metric::IncomeGapRatio) => pl.subtitle_income_gap_ratio.clone(),
        (Line::Relative(_), Metric::Share | Metric::Number) => {
            format!("{} {}.", RELATIVE_SUBTITLE, line.phrase(&w.welfare_type))
        }
        (Line::Relative(_), Metric::TotalShortfall) => format!(
            "This is the amount of money that would be theoretically needed to lift the incomes of all people in poverty up to {}.",
            line.phrase(&w.welfare_type)
        ),
        (Line::Relative(_), Metric::AverageShortfall) => format!(
            "This is the amount of money that would be theoretically needed to lift the incomes of all people in poverty up to {}, averaged across the population in poverty.",
            line.phrase(&w.welfare_type)
        ),
        (Line::Relative(_), Metric::IncomeGapRatio) => format!(
            "This is the average shortfall expressed as a share of the poverty line, sometimes called the \"income gap ratio\". It captures the depth of poverty in which those below {} are living.",
            line.phrase(&w.welfare_type)
        ),
    };
    format!("{} {}", lead, w.subtitle)
}

fn view_note(metric: Metric, line: Line<'_>) -> Note {
    match (line, metric) {
        (Line::Absolute(_), Metric::Share | Metric::Number) => Note::Prefixed(PRICES_NOTE),
        (Line::Absolute(_), Metric::TotalShortfall) => Note::Fixed(TOTAL_SHORTFALL_NOTE),
        (Line::Relative(_), Metric::Share | Metric::Number) => Note::ScaleOnly,
        _ => Note::Prefixed(PPP_NOTE),
    }
}

/// One row of the graphers table
struct View<'a> {
    title: String,
    y_slugs: String,
    metric: Metric,
    povline: &'a str,
    income_type: &'a str,
    scale: String,
    subtitle: String,
    note: Option<String>,
    layout: Layout,
}

impl View<'_> {
    fn into_record(self) -> Record {
        let mut record = Record::new();
        record
            .set("title", self.title)
            .set("ySlugs", self.y_slugs)
            .set("Metric Dropdown", self.metric.dropdown())
            .set("Poverty line Dropdown", self.povline)
            .set("Income type Dropdown", self.income_type)
            .set("Equivalence scale Dropdown", self.scale)
            .set("subtitle", self.subtitle)
            .set_opt("note", self.note)
            .null("type");
        self.layout.apply(&mut record);
        record
    }
}

/// View of one metric at one line for a single equivalence scale
fn scale_view<'a>(metric: Metric, line: Line<'a>, w: &'a Welfare, eq: &EquivalenceScale) -> View<'a> {
    let note = match view_note(metric, line) {
        Note::Prefixed(text) => format!("{} {}", text, eq.note),
        Note::Fixed(text) => text.to_string(),
        Note::ScaleOnly => eq.note.clone(),
    };
    View {
        title: format!("{} ({})", view_title(metric, line, w), w.title),
        y_slugs: line.variable(metric, &w.slug, &eq.slug),
        metric,
        povline: line.dropdown(),
        income_type: &w.dropdown_option,
        scale: capitalize(&eq.text),
        subtitle: view_subtitle(metric, line, w),
        note: Some(note),
        layout: Layout::Map,
    }
}

/// View of one metric at one line comparing every equivalence scale
fn comparison_view<'a>(
    metric: Metric,
    line: Line<'a>,
    w: &'a Welfare,
    scales: &[EquivalenceScale],
) -> View<'a> {
    let compared = versus(scales.iter().map(|s| s.text.as_str()));
    let note = match view_note(metric, line) {
        Note::Prefixed(text) | Note::Fixed(text) => Some(text.to_string()),
        Note::ScaleOnly => None,
    };
    View {
        title: format!("{} ({}, {})", view_title(metric, line, w), w.title, compared),
        y_slugs: join_slugs(scales.iter().map(|s| line.variable(metric, &w.slug, &s.slug))),
        metric,
        povline: line.dropdown(),
        income_type: &w.dropdown_option,
        scale: capitalize(&compared),
        subtitle: view_subtitle(metric, line, w),
        note,
        layout: Layout::Chart,
    }
}

fn grapher_views(f: &Facets) -> Frame {
    let mut graphers = Frame::new();

    for w in &f.welfare {
        for eq in &f.scales {
            for metric in METRICS {
                for line in f.absolute_lines() {
                    graphers.push(scale_view(metric, line, w, eq).into_record());
                }

                // Every absolute line on one chart, after the single-line views
                if metric == Metric::Number {
                    for multiple in [Metric::Share, Metric::Number] {
                        graphers.push(multiple_lines_view(f, multiple, w, eq).into_record());
                    }
                }
            }
            for metric in METRICS {
                for line in f.relative_lines() {
                    graphers.push(scale_view(metric, line, w, eq).into_record());
                }
            }
        }

        for metric in METRICS {
            for line in f.absolute_lines() {
                graphers.push(comparison_view(metric, line, w, &f.scales).into_record());
            }
        }
        for metric in METRICS {
            for line in f.relative_lines() {
                graphers.push(comparison_view(metric, line, w, &f.scales).into_record());
            }
        }
    }

    graphers
}

fn multiple_lines_view<'a>(
    f: &'a Facets,
    metric: Metric,
    w: &'a Welfare,
    eq: &EquivalenceScale,
) -> View<'a> {
    let title = match metric {
        Metric::Number => "Number of people living below a range of poverty lines",
        _ => "Share of population living below a range of poverty lines",
    };
    View {
        title: format!("{} ({})", title, w.title),
        y_slugs: join_slugs(
            f.absolute_lines()
                .map(|line| line.variable(metric, &w.slug, &eq.slug)),
        ),
        metric,
        povline: MULTIPLE_LINES,
        income_type: &w.dropdown_option,
        scale: capitalize(&eq.text),
        subtitle: format!("{} {}", INFLATION_SUBTITLE, w.subtitle),
        note: Some(format!("{} {}", PRICES_NOTE, eq.note)),
        layout: Layout::Chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::check_slugs;
    use crate::generators::fixtures;

    fn generate() -> Explorer {
        LisExpandedPoverty.generate(&fixtures::load("lis")).unwrap()
    }

    #[test]
    fn test_counts() {
        let f = Facets::load(&fixtures::load("lis")).unwrap();
        let lines = f.absolute.len() + f.relative.len();
        let (w, e) = (f.welfare.len(), f.scales.len());
        let explorer = generate();

        assert_eq!(
            explorer.view_count(),
            f.tables.len() * w * (e * (METRICS.len() * lines + 2) + METRICS.len() * lines)
        );
        assert_eq!(
            explorer.column_definition_count(),
            f.tables.len() * (2 + w * e * METRICS.len() * lines)
        );
    }

    #[test]
    fn test_every_y_slug_resolves() {
        assert_eq!(check_slugs(&generate()), vec![]);
    }

    #[test]
    fn test_graphers_column_order() {
        let explorer = generate();
        assert_eq!(
            explorer.graphers.columns(),
            &[
                "title",
                "ySlugs",
                "Metric Dropdown",
                "Poverty line Dropdown",
                "Income type Dropdown",
                "Equivalence scale Dropdown",
                "subtitle",
                "note",
                "type",
                "selectedFacetStrategy",
                "hasMapTab",
                "tab",
                "tableSlug",
                "relatedQuestionText",
                "relatedQuestionUrl",
                "yAxisMin",
                "mapTargetTime",
                "defaultView",
            ]
        );
    }

    #[test]
    fn test_default_view() {
        let explorer = generate();
        let tables: Vec<Option<&str>> = explorer
            .graphers
            .rows()
            .filter(|r| r.get("defaultView") == Some("true"))
            .map(|r| r.get(TABLE_SLUG_COLUMN))
            .collect();
        assert_eq!(tables, vec![Some("lis_main"), Some("lis_extended")]);
        let view = explorer
            .graphers
            .rows()
            .find(|r| r.get("defaultView") == Some("true"))
            .unwrap();
        assert_eq!(view.get("ySlugs"), Some("headcount_ratio_mi_eq_215"));
    }

    #[test]
    fn test_relative_views() {
        let explorer = generate();
        let view = explorer
            .graphers
            .rows()
            .find(|r| r.get("ySlugs") == Some("total_shortfall_40_median_dhi_pc"))
            .unwrap();
        assert_eq!(
            view.get("title"),
            Some("Total shortfall from a poverty line of 40% of the median income (Disposable income)")
        );
        assert_eq!(view.get("hasMapTab"), Some("true"));

        let comparison = explorer
            .graphers
            .rows()
            .find(|r| r.get("ySlugs") == Some("headcount_40_median_mi_eq headcount_40_median_mi_pc"))
            .unwrap();
        assert_eq!(comparison.get("note"), None);
        assert_eq!(comparison.get("Equivalence scale Dropdown"), Some("Equivalized vs. per capita"));
    }

    #[test]
    fn test_multiple_lines_view() {
        let explorer = generate();
        let view = explorer
            .graphers
            .rows()
            .find(|r| {
                r.get("Poverty line Dropdown") == Some(MULTIPLE_LINES)
                    && r.get("Metric Dropdown") == Some("Number in poverty")
            })
            .unwrap();
        assert_eq!(view.get("ySlugs"), Some("headcount_mi_eq_215 headcount_mi_eq_3000"));
        assert_eq!(view.get("tab"), Some("chart"));
    }
}
