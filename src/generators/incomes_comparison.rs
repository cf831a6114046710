//! Incomes across the distribution, compared across data sources
//!
//! Puts World Bank PIP, World Inequality Database and Luxembourg Income
//! Study series side by side. Each row of `source_checkbox` names one
//! combination of sources; only the combinations where every source has
//! data become views (before tax: WID and LIS, after tax: all three).

use crate::error::Result;
use crate::explorer::facets::{
    Decile, EquivalenceScale, IncomeAggregation, SourceCombination, SourceWelfare, TableLink,
};
use crate::explorer::text::capitalize;
use crate::explorer::{
    mark_default_view, sort_views, DropdownOrder, Explorer, Selector, TableBlock,
    TABLE_SLUG_COLUMN, Y_SLUGS_COLUMN,
};
use crate::model::{Frame, Header, Record, Sheet, SheetSet};

use super::common::{
    apply_column_constants, base_header, push_entity_columns, Source, DECILE_ORDER,
    INTERNATIONAL_DOLLARS, LIS_SELECTION, METRIC_DECILE_MEAN, METRIC_MEAN, METRIC_MEDIAN,
    METRIC_ORDER, METRIC_SHARES, METRIC_THRESHOLDS,
};
use super::Generator;

const SHEETS: &[&str] = &[
    "merged_tables",
    "source_checkbox",
    "deciles9",
    "deciles10",
    "income_aggregation",
    "pip_tables",
    "wid_welfare",
    "lis_welfare",
    "lis_equivalence_scales",
];

const PICKER_COLUMN_SLUGS: &str = "mean_year median_year p0p100_avg_posttax_nat_year median_posttax_nat_year mean_dhi_pc_year median_dhi_pc_year";

/// Paragraph break inside descriptions, kept escaped in the file
const PARAGRAPH: &str = "\\n\\n";

const NOTES_TITLE: &str = "NOTES ON HOW WE PROCESSED THIS INDICATOR";

/// Equivalence scale left out of the comparison; the other sources are per capita
const EQUIVALIZED: &str = "equivalized";

const PIP_SOURCE: Source = Source {
    name: "World Bank Poverty and Inequality Platform (2022)",
    published_by: "World Bank. (2022). Poverty and Inequality Platform (version 20220909_2017_01_02_PROD) [Data set]. World Bank Group. https://pip.worldbank.org/. Accessed  2022-10-03.",
    link: "https://pip.worldbank.org/",
};

const WID_SOURCE: Source = Source {
    name: "World Inequality Database (WID.world) (2023)",
    published_by: "World Inequality Database (WID), https://wid.world",
    link: "https://wid.world",
};

const LIS_SOURCE: Source = Source {
    name: "Luxembourg Income Study (2023)",
    published_by: "Luxembourg Income Study (LIS) Database, http://www.lisdatacenter.org (multiple countries; 1967-2021). Luxembourg, LIS.",
    link: "https://www.lisdatacenter.org/our-data/lis-database/",
};

const WID_DOLLARS: &str = "international-$ in 2022 prices";
const PIP_BINS: &str = "1;2;5;10;20;50;100;100.0001";

const PIP_ADDITIONAL: [&str; 2] = [
    "Depending on the country and year, the data relates to income measured after taxes and benefits, or consumption, per capita.",
    "Non-market sources of income, including food grown by subsistence farmers for their own consumption, are taken into account.",
];
const PIP_PROCESSING: [&str; 2] = [
    "For a small number of country-year observations, the World Bank PIP data contains two estimates: one based on income data and one based on consumption data. In these cases we keep only the consumption estimate in order to obtain a single series for each country.",
    "You can find the data with all available income and consumption data points, including these overlapping estimates, in our [complete dataset](https://github.com/owid/poverty-data#a-global-dataset-of-poverty-and-inequality-measures-prepared-by-our-world-in-data-from-the-world-banks-poverty-and-inequality-platform-pip-database) of the World Bank PIP data.",
];
const PPP_2017: &str = "The data is measured in international-$ at 2017 prices – this adjusts for inflation and for differences in the cost of living between countries.";
const PPP_2022: &str = "The data is measured in international-$ at 2022 prices – this adjusts for inflation and for differences in the cost of living between countries.";

const WID_ADDITIONAL: [&str; 2] = [
    "The data is estimated from a combination of household surveys, tax records and national accounts data. This combination can provide a more accurate picture of the incomes of the richest, which tend to be captured poorly in household survey data alone.",
    "These underlying data sources are not always available. For some countries, observations are extrapolated from data relating to other years, or are sometimes modeled based on data observed in other countries.",
];

const LIS_PROCESSING: [&str; 6] = [
    "The Luxembourg Income Study data is created from standardized household survey microdata available in their [LISSY platform](https://www.lisdatacenter.org/data-access/lissy/). The estimations follow the methodology available in LIS, Key Figures and DART platform.",
    "After tax income is obtained by using the disposable household income variable (dhi)",
    "Before tax income is estimated by calculating the sum of income from labor and capital (variable hifactor), cash transfers and in-kind goods and services from privates (hiprivate) and private pensions (hi33). This is done only for surveys where tax and contributions are fully captured, collected or imputed.",
    "Income data is converted from local currency into international-$ by dividing by the [LIS PPP factor](https://www.lisdatacenter.org/resources/ppp-deflators/), available as an additional database in the system.",
    "Incomes are top and bottom-coded by replacing negative values with zeros and setting boundaries for extreme values of log income: at the top Q3 plus 3 times the interquartile range (Q3-Q1), and at the bottom Q1 minus 3 times the interquartile range.",
    "Incomes are equivalized by dividing each household observation by the square root of the number of household members (nhhmem). Per capita estimates are calculated by dividing incomes by the number of household members.",
];
const LIS_GINI_MEAN_MEDIAN: &str = "Gini coefficients are obtained by using [Stata’s ineqdec0 function](https://ideas.repec.org/c/boc/bocode/s366007.html). Weights are set as the product between the number of household members (nhhmem) and the normalized household weight (hwgt). From this function, mean and median values are also calculated.";
const LIS_DISTRIBUTION: &str = "Income shares and thresholds by decile are obtained by using [Stata’s sumdist function](https://ideas.repec.org/c/boc/bocode/s366005.html). The parameters set are again the weight (nhhmem*hwgt) and the number of quantile groups (10). Threshold ratios, share ratios and averages by decile are estimated after the use of LISSY with this data.";

/// `incomes-across-distribution-comparison`
pub struct IncomesComparison;

struct Facets {
    tables: Vec<TableLink>,
    combinations: Vec<SourceCombination>,
    deciles9: Vec<Decile>,
    deciles10: Vec<Decile>,
    aggregations: Vec<IncomeAggregation>,
    wid_welfare: Vec<SourceWelfare>,
    lis_welfare: Vec<SourceWelfare>,
    lis_scales: Vec<EquivalenceScale>,
}

impl Facets {
    fn load(sheets: &SheetSet) -> Result<Self> {
        let combinations: Vec<SourceCombination> = sheets.facets("source_checkbox")?;
        let lis_scales: Vec<EquivalenceScale> = sheets.facets("lis_equivalence_scales")?;

        Ok(Self {
            tables: sheets.facets("merged_tables")?,
            combinations: combinations
                .into_iter()
                .filter(covers_every_source)
                .collect(),
            deciles9: sheets.facets("deciles9")?,
            deciles10: sheets.facets("deciles10")?,
            aggregations: sheets.facets("income_aggregation")?,
            wid_welfare: sheets.facets("wid_welfare")?,
            lis_welfare: sheets.facets("lis_welfare")?,
            lis_scales: lis_scales
                .into_iter()
                .filter(|s| s.text != EQUIVALIZED)
                .collect(),
        })
    }
}

/// Before tax there is no PIP series; after tax all three sources must be on
fn covers_every_source(c: &SourceCombination) -> bool {
    match c.tax.as_str() {
        "pre" => c.wid == "true" && c.pip == "false" && c.lis == "true",
        "post" => c.wid == "true" && c.pip == "true" && c.lis == "true",
        _ => false,
    }
}

impl Generator for IncomesComparison {
    fn name(&self) -> &'static str {
        "incomes-across-distribution-comparison"
    }

    fn sheet_group(&self) -> &'static str {
        "multisource"
    }

    fn required_sheets(&self) -> &'static [&'static str] {
        SHEETS
    }

    fn generate(&self, sheets: &SheetSet) -> Result<Explorer> {
        self.check_sheets(sheets)?;
        let facets = Facets::load(sheets)?;
        let pip_tables = sheets.get("pip_tables")?;
        tracing::debug!(
            combinations = facets.combinations.len(),
            wid_welfare = facets.wid_welfare.len(),
            lis_welfare = facets.lis_welfare.len(),
            "expanding source comparison"
        );

        let mut explorer = Explorer::new(self.name(), header());
        let wid = wid_columns(&facets);
        let lis = lis_columns(&facets);

        for table in &facets.tables {
            let mut columns = pip_columns(pip_welfare(pip_tables, &table.name)?, &facets);
            columns.concat(&wid);
            columns.concat(&lis);
            explorer
                .tables
                .push(TableBlock::new(&table.link, &table.name, columns));

            let mut views = grapher_views(&facets);
            views.set_column(TABLE_SLUG_COLUMN, Some(table.name.clone()));
            explorer.graphers.concat(&views);
        }

        finish_views(&mut explorer.graphers)?;
        Ok(explorer)
    }
}

fn header() -> Header {
    let mut header = base_header(
        "Incomes Across the Distribution Data Explorer: Compare World Bank, WID and LIS data",
        &LIS_SELECTION,
        "",
        "",
        "57742",
    );
    header
        .set("googleSheet", "")
        .set("pickerColumnSlugs", PICKER_COLUMN_SLUGS);
    header
}

/// Welfare text of the PIP series stored in a merged table
fn pip_welfare<'a>(pip_tables: &'a Sheet, table: &str) -> Result<&'a str> {
    let text = pip_tables.require_column("text")?;
    let row = pip_tables.find_one("name", table)?;
    Ok(row.get(text).unwrap_or_default())
}

fn paragraphs<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts.into_iter().collect::<Vec<_>>().join(PARAGRAPH)
}

/// A column definition of one source
struct SourceColumn<'a> {
    name: String,
    slug: String,
    description: String,
    /// `None` for shares, in percent
    dollars: Option<&'a str>,
    bins: Option<&'a str>,
    scheme: &'a str,
    transform: Option<String>,
}

impl SourceColumn<'_> {
    fn into_record(self) -> Record {
        let (unit, short_unit) = match self.dollars {
            Some(unit) => (unit, "$"),
            None => ("%", "%"),
        };
        let mut record = Record::new();
        record
            .set("name", self.name)
            .set("slug", self.slug)
            .set("description", self.description)
            .set("unit", unit)
            .set("shortUnit", short_unit)
            .set("type", "Numeric")
            .set_opt("colorScaleNumericBins", self.bins.map(str::to_string))
            .set("colorScaleScheme", self.scheme)
            .set_opt("transform", self.transform);
        record
    }
}

/// `multiplyBy <slug> <multiplier>`
fn multiply(slug: &str, agg: &IncomeAggregation) -> String {
    format!("multiplyBy {} {}", slug, agg.multiplier)
}

fn pip_columns(text: &str, f: &Facets) -> Frame {
    let mut columns = Frame::new();
    push_entity_columns(&mut columns);

    let money = |lead: String| {
        paragraphs(
            [lead.as_str(), PIP_ADDITIONAL[0], PIP_ADDITIONAL[1], PPP_2017, NOTES_TITLE]
                .into_iter()
                .chain(PIP_PROCESSING),
        )
    };
    let share = |lead: String| {
        paragraphs(
            [lead.as_str(), PIP_ADDITIONAL[0], PIP_ADDITIONAL[1], NOTES_TITLE]
                .into_iter()
                .chain(PIP_PROCESSING),
        )
    };
    let pip_name = |label: &str| format!("{} (PIP data)", label);
    let dollars = Some(INTERNATIONAL_DOLLARS);

    columns.push(
        SourceColumn {
            name: pip_name(&format!("Mean {}", text)),
            slug: "mean".to_string(),
            description: money(format!("Mean {}.", text)),
            dollars,
            bins: Some(PIP_BINS),
            scheme: "BuGn",
            transform: None,
        }
        .into_record(),
    );
    columns.push(
        SourceColumn {
            name: pip_name(&format!("Median {}", text)),
            slug: "median".to_string(),
            description: money(format!(
                "The level of {} per day below which half of the population falls.",
                text
            )),
            dollars,
            bins: Some(PIP_BINS),
            scheme: "Blues",
            transform: None,
        }
        .into_record(),
    );
    for d in &f.deciles9 {
        columns.push(
            SourceColumn {
                name: pip_name(&capitalize(&d.ordinal)),
                slug: format!("decile{}_thr", d.decile),
                description: money(format!(
                    "The level of {} per day below which {}0% of the population falls.",
                    text, d.decile
                )),
                dollars,
                bins: Some(PIP_BINS),
                scheme: "Purples",
                transform: None,
            }
            .into_record(),
        );
    }
    for d in &f.deciles10 {
        columns.push(
            SourceColumn {
                name: pip_name(&capitalize(&d.ordinal)),
                slug: format!("decile{}_avg", d.decile),
                description: money(format!(
                    "The mean {} per day within the {} (tenth of the population).",
                    text, d.ordinal
                )),
                dollars,
                bins: Some(PIP_BINS),
                scheme: "Greens",
                transform: None,
            }
            .into_record(),
        );
    }
    for d in &f.deciles10 {
        columns.push(
            SourceColumn {
                name: pip_name(&capitalize(&d.ordinal)),
                slug: format!("decile{}_share", d.decile),
                description: share(format!(
                    "The share of {} received by the {} (tenth of the population).",
                    text, d.ordinal
                )),
                dollars: None,
                bins: Some(d.scale_share.as_str()),
                scheme: "OrRd",
                transform: None,
            }
            .into_record(),
        );
    }

    for agg in &f.aggregations {
        let per = &agg.aggregation;
        let sfx = &agg.slug_suffix;
        let bins = Some(agg.scale.as_str());

        columns.push(
            SourceColumn {
                name: pip_name(&format!("Mean {}", text)),
                slug: format!("mean{}", sfx),
                description: money(format!("The mean level of {} per {}.", text, per)),
                dollars,
                bins,
                scheme: "BuGn",
                transform: Some(multiply("mean", agg)),
            }
            .into_record(),
        );
        columns.push(
            SourceColumn {
                name: pip_name(&format!("Median {}", text)),
                slug: format!("median{}", sfx),
                description: money(format!(
                    "The level of {} per {} below which half of the population falls.",
                    text, per
                )),
                dollars,
                bins,
                scheme: "Blues",
                transform: Some(multiply("median", agg)),
            }
            .into_record(),
        );
        for d in &f.deciles9 {
            let base = format!("decile{}_thr", d.decile);
            columns.push(
                SourceColumn {
                    name: pip_name(&capitalize(&d.ordinal)),
                    slug: format!("{}{}", base, sfx),
                    description: money(format!(
                        "The level of {} per {} below which {}0% of the population falls.",
                        text, per, d.decile
                    )),
                    dollars,
                    bins,
                    scheme: "Purples",
                    transform: Some(multiply(&base, agg)),
                }
                .into_record(),
            );
        }
        for d in &f.deciles10 {
            let base = format!("decile{}_avg", d.decile);
            columns.push(
                SourceColumn {
                    name: pip_name(&capitalize(&d.ordinal)),
                    slug: format!("{}{}", base, sfx),
                    description: money(format!(
                        "The mean {} per {} within the {} (tenth of the population).",
                        text, per, d.ordinal
                    )),
                    dollars,
                    bins,
                    scheme: "Greens",
                    transform: Some(multiply(&base, agg)),
                }
                .into_record(),
            );
        }
    }

    apply_column_constants(&mut columns, &PIP_SOURCE);
    columns
}

fn wid_columns(f: &Facets) -> Frame {
    let mut columns = Frame::new();
    let dollars = Some(WID_DOLLARS);

    for w in &f.wid_welfare {
        let wt = &w.welfare_type;
        let wid_name = |label: &str| format!("{} (WID data)", label);
        let money = |lead: String| {
            paragraphs(
                [lead.as_str(), w.description.as_str(), PPP_2022]
                    .into_iter()
                    .chain(WID_ADDITIONAL),
            )
        };

        // Aggregated series are multiples of the unsuffixed ones
        let mut distribution = |agg: Option<&IncomeAggregation>| {
            let sfx = agg.map_or("", |a| a.slug_suffix.as_str());
            let transform = |base: &str| agg.map(|a| multiply(base, a));

            let mean = format!("p0p100_avg_{}", w.slug);
            columns.push(
                SourceColumn {
                    name: wid_name(&format!("Mean {}", wt)),
                    slug: format!("{}{}", mean, sfx),
                    description: money(format!("Mean {}.", wt)),
                    dollars,
                    bins: None,
                    scheme: "BuGn",
                    transform: transform(&mean),
                }
                .into_record(),
            );
            let median = format!("median_{}", w.slug);
            columns.push(
                SourceColumn {
                    name: wid_name(&format!("Median {}", wt)),
                    slug: format!("{}{}", median, sfx),
                    description: money(match agg {
                        Some(_) => format!(
                            "This is the level of {} below which 50% of the population falls.",
                            wt
                        ),
                        None => format!(
                            "This is the level of {} below which half of the population falls.",
                            wt
                        ),
                    }),
                    dollars,
                    bins: None,
                    scheme: "Blues",
                    transform: transform(&median),
                }
                .into_record(),
            );
            for d in &f.deciles9 {
                let base = format!("{}_thr_{}", d.wid_notation, w.slug);
                columns.push(
                    SourceColumn {
                        name: wid_name(&capitalize(&d.ordinal)),
                        slug: format!("{}{}", base, sfx),
                        description: money(format!(
                            "The level of {} below which {}0% of the population falls.",
                            wt, d.decile
                        )),
                        dollars,
                        bins: None,
                        scheme: "Purples",
                        transform: transform(&base),
                    }
                    .into_record(),
                );
            }
            for d in &f.deciles10 {
                let base = format!("{}_avg_{}", d.wid_notation, w.slug);
                columns.push(
                    SourceColumn {
                        name: wid_name(&capitalize(&d.ordinal)),
                        slug: format!("{}{}", base, sfx),
                        description: money(format!(
                            "The mean {} within the {} (tenth of the population).",
                            wt, d.ordinal
                        )),
                        dollars,
                        bins: None,
                        scheme: "Greens",
                        transform: transform(&base),
                    }
                    .into_record(),
                );
            }
            if agg.is_none() {
                for d in &f.deciles10 {
                    columns.push(
                        SourceColumn {
                            name: wid_name(&capitalize(&d.ordinal)),
                            slug: format!("{}_share_{}", d.wid_notation, w.slug),
                            description: paragraphs(
                                [
                                    format!(
                                        "The share of {} received by the {} (tenth of the population).",
                                        wt, d.ordinal
                                    )
                                    .as_str(),
                                    w.description.as_str(),
                                ]
                                .into_iter()
                                .chain(WID_ADDITIONAL),
                            ),
                            dollars: None,
                            bins: None,
                            scheme: "OrRd",
                            transform: None,
                        }
                        .into_record(),
                    );
                }
            }
        };

        distribution(None);
        for agg in &f.aggregations {
            distribution(Some(agg));
        }
    }

    apply_column_constants(&mut columns, &WID_SOURCE);
    columns
}

fn lis_columns(f: &Facets) -> Frame {
    let mut columns = Frame::new();
    let dollars = Some(INTERNATIONAL_DOLLARS);

    for w in &f.lis_welfare {
        let wt = &w.welfare_type;
        for eq in &f.lis_scales {
            let lis_name = |label: &str| format!("{} (LIS data)", label);
            let describe = |lead: String, ppp: bool, method: &str| {
                let ppp = ppp.then_some(PPP_2017);
                paragraphs(
                    [lead.as_str(), w.description.as_str(), eq.description.as_str()]
                        .into_iter()
                        .chain(ppp)
                        .chain([NOTES_TITLE])
                        .chain(LIS_PROCESSING)
                        .chain([method]),
                )
            };
            let variable = |metric: &str, decile: Option<&str>| match decile {
                Some(d) => format!("{}_{}_{}_{}", metric, d, w.slug, eq.slug),
                None => format!("{}_{}_{}", metric, w.slug, eq.slug),
            };

            let mut distribution = |agg: Option<&IncomeAggregation>| {
                let sfx = agg.map_or("", |a| a.slug_suffix.as_str());
                let transform = |base: &str| agg.map(|a| multiply(base, a));
                // Only the unaggregated mean and median carry color bins
                let binned = agg.is_none();

                let mean = variable("mean", None);
                columns.push(
                    SourceColumn {
                        name: lis_name(&format!("Mean {}", wt)),
                        slug: format!("{}{}", mean, sfx),
                        description: describe(format!("Mean {}.", wt), true, LIS_GINI_MEAN_MEDIAN),
                        dollars,
                        bins: binned.then_some(w.scale_mean.as_str()),
                        scheme: "BuGn",
                        transform: transform(&mean),
                    }
                    .into_record(),
                );
                let median = variable("median", None);
                columns.push(
                    SourceColumn {
                        name: lis_name(&format!("Median {}", wt)),
                        slug: format!("{}{}", median, sfx),
                        description: describe(
                            format!("The level of {} below which half of the population falls.", wt),
                            true,
                            LIS_GINI_MEAN_MEDIAN,
                        ),
                        dollars,
                        bins: binned.then_some(w.scale_median.as_str()),
                        scheme: "Blues",
                        transform: transform(&median),
                    }
                    .into_record(),
                );
                for d in &f.deciles9 {
                    let base = variable("thr", Some(d.lis_notation.as_str()));
                    columns.push(
                        SourceColumn {
                            name: lis_name(&capitalize(&d.ordinal)),
                            slug: format!("{}{}", base, sfx),
                            description: describe(
                                format!(
                                    "The level of {} below which {}0% of the population falls.",
                                    wt, d.decile
                                ),
                                true,
                                LIS_DISTRIBUTION,
                            ),
                            dollars,
                            bins: None,
                            scheme: "Purples",
                            transform: transform(&base),
                        }
                        .into_record(),
                    );
                }
                for d in &f.deciles10 {
                    let base = variable("avg", Some(d.lis_notation.as_str()));
                    columns.push(
                        SourceColumn {
                            name: lis_name(&capitalize(&d.ordinal)),
                            slug: format!("{}{}", base, sfx),
                            description: describe(
                                format!(
                                    "The mean {} within the {} (tenth of the population).",
                                    wt, d.ordinal
                                ),
                                true,
                                LIS_DISTRIBUTION,
                            ),
                            dollars,
                            bins: None,
                            scheme: "Greens",
                            transform: transform(&base),
                        }
                        .into_record(),
                    );
                }
                if agg.is_none() {
                    for d in &f.deciles10 {
                        columns.push(
                            SourceColumn {
                                name: lis_name(&capitalize(&d.ordinal)),
                                slug: variable("share", Some(d.lis_notation.as_str())),
                                description: describe(
                                    format!(
                                        "The share of {} received by the {} (tenth of the population).",
                                        wt, d.ordinal
                                    ),
                                    false,
                                    LIS_DISTRIBUTION,
                                ),
                                dollars: None,
                                bins: None,
                                scheme: "OrRd",
                                transform: None,
                            }
                            .into_record(),
                        );
                    }
                }
            };

            distribution(None);
            for agg in &f.aggregations {
                distribution(Some(agg));
            }
        }
    }

    apply_column_constants(&mut columns, &LIS_SOURCE);
    columns
}

/// Replace every `{placeholder}` of a slug template
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |slugs, (key, value)| slugs.replace(key, value))
}

fn grapher_views(f: &Facets) -> Frame {
    let mut graphers = Frame::new();

    for c in &f.combinations {
        let measure = capitalize(&c.type_title);

        for agg in &f.aggregations {
            let per = &agg.aggregation;
            let period = capitalize(per);
            let sfx = agg.slug_suffix.as_str();

            let mut push = |title: String,
                            y_slugs: String,
                            metric: &str,
                            decile: Option<&str>,
                            subtitle: String| {
                let mut record = Record::new();
                record
                    .set("title", title)
                    .set(Y_SLUGS_COLUMN, y_slugs)
                    .set("Indicator Dropdown", metric)
                    .set_opt("Decile Dropdown", decile.map(str::to_string))
                    .set("Income measure Dropdown", measure.as_str())
                    .set("Period Radio", period.as_str())
                    .set("hideRelativeToggle", "false")
                    .set("subtitle", subtitle)
                    .set("note", c.note_ppp.as_str())
                    .set("yScaleToggle", "true");
                graphers.push(record);
            };

            push(
                format!("Mean income per {} ({})", per, c.type_title),
                fill(&c.mean, &[("{agg}", sfx)]),
                METRIC_MEAN,
                None,
                c.note.clone(),
            );
            push(
                format!("Median income per {} ({})", per, c.type_title),
                fill(&c.median, &[("{agg}", sfx)]),
                METRIC_MEDIAN,
                None,
                c.note.clone(),
            );
            for d in &f.deciles9 {
                push(
                    format!("Threshold income marking the {} ({})", d.ordinal, c.type_title),
                    fill(
                        &c.thr,
                        &[
                            ("{agg}", sfx),
                            ("{dec9_pip}", d.decile.as_str()),
                            ("{dec9_wid}", d.wid_notation.as_str()),
                            ("{dec9_lis}", d.lis_notation.as_str()),
                        ],
                    ),
                    METRIC_THRESHOLDS,
                    Some(d.dropdown.as_str()),
                    format!(
                        "The level of income per {} below which {}0% of the population falls. {}",
                        per, d.decile, c.note
                    ),
                );
            }
            for d in &f.deciles10 {
                push(
                    format!("Mean income within the {} ({})", d.ordinal, c.type_title),
                    fill(
                        &c.avg,
                        &[
                            ("{agg}", sfx),
                            ("{dec10_pip}", d.decile.as_str()),
                            ("{dec10_wid}", d.wid_notation.as_str()),
                            ("{dec10_lis}", d.lis_notation.as_str()),
                        ],
                    ),
                    METRIC_DECILE_MEAN,
                    Some(d.dropdown.as_str()),
                    format!(
                        "The mean income per {} within the {} (tenth of the population). {}",
                        per, d.ordinal, c.note
                    ),
                );
            }
        }

        for d in &f.deciles10 {
            let mut record = Record::new();
            record
                .set("title", format!("Income share of the {} ({})", d.ordinal, c.type_title))
                .set(
                    Y_SLUGS_COLUMN,
                    fill(
                        &c.share,
                        &[
                            ("{dec10_pip}", d.decile.as_str()),
                            ("{dec10_wid}", d.wid_notation.as_str()),
                            ("{dec10_lis}", d.lis_notation.as_str()),
                        ],
                    ),
                )
                .set("Indicator Dropdown", METRIC_SHARES)
                .set("Decile Dropdown", d.dropdown.as_str())
                .set("Income measure Dropdown", measure.as_str())
                .set(
                    "subtitle",
                    format!("The share of income received by the {}. {}", d.ordinal, c.note),
                )
                .null("note");
            graphers.push(record);
        }
    }

    graphers
}

fn finish_views(graphers: &mut Frame) -> Result<()> {
    graphers.set_column("yAxisMin", Some("0".to_string()));
    graphers.set_column("mapTargetTime", Some("2019".to_string()));
    graphers.set_column("selectedFacetStrategy", Some("entity".to_string()));
    graphers.set_column("hasMapTab", Some("false".to_string()));
    graphers.set_column("tab", Some("chart".to_string()));

    // A view with no series breaks the source checkbox
    graphers.retain(|row| row.get(Y_SLUGS_COLUMN).is_some_and(|y| !y.is_empty()));

    graphers.set_column("relatedQuestionText", None);
    graphers.set_column("relatedQuestionUrl", None);

    mark_default_view(
        graphers,
        &Selector::new()
            .eq("Indicator Dropdown", METRIC_MEAN)
            .eq("Income measure Dropdown", "After tax")
            .eq("Period Radio", "Year"),
    )?;

    sort_views(
        graphers,
        &[
            DropdownOrder::new("Decile Dropdown", DECILE_ORDER),
            DropdownOrder::of("Indicator Dropdown", METRIC_ORDER),
        ],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplorerError;
    use crate::explorer::check_slugs;
    use crate::generators::fixtures;

    fn generate() -> Explorer {
        IncomesComparison
            .generate(&fixtures::load("multisource"))
            .unwrap()
    }

    fn column<'a>(explorer: &'a Explorer, slug: &str) -> crate::model::RowView<'a> {
        explorer.tables[0]
            .columns
            .rows()
            .find(|r| r.get("slug") == Some(slug))
            .unwrap()
    }

    #[test]
    fn test_only_complete_combinations_are_kept() {
        let f = Facets::load(&fixtures::load("multisource")).unwrap();
        let kept: Vec<(&str, &str)> = f
            .combinations
            .iter()
            .map(|c| (c.tax.as_str(), c.pip.as_str()))
            .collect();
        assert_eq!(kept, vec![("pre", "false"), ("post", "true")]);
        assert!(f.lis_scales.iter().all(|s| s.text != EQUIVALIZED));
    }

    #[test]
    fn test_view_count() {
        let f = Facets::load(&fixtures::load("multisource")).unwrap();
        let (a, d9, d10) = (f.aggregations.len(), f.deciles9.len(), f.deciles10.len());
        // Combinations without a share template lose their share views
        let per_table: usize = f
            .combinations
            .iter()
            .map(|c| a * (2 + d9 + d10) + if c.share.is_empty() { 0 } else { d10 })
            .sum();

        assert_eq!(generate().view_count(), f.tables.len() * per_table);
    }

    #[test]
    fn test_column_count_spans_sources() {
        let f = Facets::load(&fixtures::load("multisource")).unwrap();
        let (a, d9, d10) = (f.aggregations.len(), f.deciles9.len(), f.deciles10.len());
        let per_series = 2 + d9 + 2 * d10 + a * (2 + d9 + d10);
        let expected =
            2 + per_series * (1 + f.wid_welfare.len() + f.lis_welfare.len() * f.lis_scales.len());

        let explorer = generate();
        assert_eq!(explorer.tables.len(), f.tables.len());
        assert_eq!(explorer.tables[0].columns.row_count(), expected);
    }

    #[test]
    fn test_every_y_slug_resolves() {
        assert_eq!(check_slugs(&generate()), vec![]);
    }

    #[test]
    fn test_source_metadata_per_column() {
        let explorer = generate();

        let pip = column(&explorer, "decile1_thr_year");
        assert_eq!(pip.get("sourceName"), Some(PIP_SOURCE.name));
        assert_eq!(pip.get("transform"), Some("multiplyBy decile1_thr 365"));
        assert_eq!(pip.get("name"), Some("Poorest decile (PIP data)"));

        let wid = column(&explorer, "p0p100_avg_posttax_nat");
        assert_eq!(wid.get("sourceName"), Some(WID_SOURCE.name));
        assert_eq!(wid.get("unit"), Some(WID_DOLLARS));
        assert_eq!(wid.get("colorScaleNumericBins"), None);
        assert_eq!(wid.get("transform"), None);

        let lis = column(&explorer, "mean_dhi_pc_year");
        assert_eq!(lis.get("sourceName"), Some(LIS_SOURCE.name));
        assert_eq!(lis.get("transform"), Some("multiplyBy mean_dhi_pc 365"));
        assert_eq!(lis.get("colorScaleNumericBins"), None);
        assert!(lis.get("description").unwrap().contains(PARAGRAPH));

        let share = column(&explorer, "share_p100_mi_pc");
        assert_eq!(share.get("unit"), Some("%"));
        assert!(!share.get("description").unwrap().contains(PPP_2017));

        assert!(explorer.tables[0].slugs().all(|s| !s.contains("_eq")));
    }

    #[test]
    fn test_default_view_and_order() {
        let explorer = generate();
        assert_eq!(explorer.default_view_count(), 1);
        let view = explorer
            .graphers
            .rows()
            .find(|r| r.get("defaultView") == Some("true"))
            .unwrap();
        assert_eq!(
            view.get(Y_SLUGS_COLUMN),
            Some("mean_year p0p100_avg_posttax_nat_year mean_dhi_pc_year")
        );
        assert_eq!(view.get("Period Radio"), Some("Year"));

        let deciles = explorer.graphers.column_values("Decile Dropdown");
        assert_eq!(deciles.first().copied(), Some(None));
        assert_eq!(deciles.last().copied(), Some(Some("10 (richest)")));
        assert_eq!(explorer.graphers.get(0, "Indicator Dropdown"), Some(METRIC_MEAN));
    }

    #[test]
    fn test_share_views_have_no_period() {
        let explorer = generate();
        let share = explorer
            .graphers
            .rows()
            .find(|r| r.get("Indicator Dropdown") == Some(METRIC_SHARES))
            .unwrap();
        assert_eq!(share.get("Period Radio"), None);
        assert_eq!(share.get("note"), None);
        assert_eq!(share.get("Income measure Dropdown"), Some("After tax"));
        assert_eq!(share.get("tab"), Some("chart"));
    }

    #[test]
    fn test_missing_pip_table_row() {
        let mut sheets = fixtures::load("multisource");
        let mut pip_tables = Sheet::new("pip_tables", vec!["name".into(), "text".into()]);
        pip_tables.add_row(vec!["other_table".into(), "income".into()], 2);
        sheets.insert(pip_tables);

        assert!(matches!(
            IncomesComparison.generate(&sheets),
            Err(ExplorerError::NoMatch { .. })
        ));
    }
}
