//! Incomes across the distribution, from the Luxembourg Income Study
//!
//! Mean, median, decile thresholds, decile averages and decile shares for
//! every welfare concept and equivalence scale, with daily, monthly and
//! yearly aggregations of the money values.

use crate::error::Result;
use crate::explorer::facets::{
    Decile, EquivalenceScale, IncomeAggregation, RelativeToggle, TableLink, Welfare,
};
use crate::explorer::text::{capitalize, join_slugs};
use crate::explorer::{
    mark_default_view, sort_views, DropdownOrder, Explorer, Selector, TableBlock,
    TABLE_SLUG_COLUMN,
};
use crate::model::{Frame, Header, Record, SheetSet};

use super::common::{
    apply_column_constants, base_header, push_entity_columns, versus, Layout, NumericColumn,
    ALL_DECILES, DECILE_ORDER, INTERNATIONAL_DOLLARS, LIS_SELECTION, LIS_SHEET_ID, LIS_SOURCE,
    METRIC_DECILE_MEAN, METRIC_MEAN, METRIC_MEDIAN, METRIC_ORDER, METRIC_SHARES,
    METRIC_THRESHOLDS, NEW_LINE,
};
use super::Generator;

const SHEETS: &[&str] = &[
    "welfare",
    "equivalence_scales",
    "tables",
    "deciles9",
    "deciles10",
    "income_aggregation",
    "relative_toggle",
];

const PICKER_COLUMN_SLUGS: &str = "mean_mi_eq_year median_mi_eq_year mean_dhi_eq_year median_dhi_eq_year thr_p90_mi_eq_year avg_p100_mi_eq_year share_p100_mi_eq_year thr_p90_dhi_eq_year avg_p100_dhi_eq_year share_p100_dhi_eq_year";

const INFLATION_SUBTITLE: &str =
    "This data is adjusted for inflation and for differences in the cost of living between countries.";
const PRICES_NOTE: &str = "This data is measured in international-$ at 2017 prices.";
const PPP_NOTE: &str = "This data is measured in international-$ at 2017 prices to account for inflation and differences in the cost of living between countries.";

/// `lis-incomes-across-distribution`
pub struct LisIncomesAcrossDistribution;

struct Facets {
    welfare: Vec<Welfare>,
    scales: Vec<EquivalenceScale>,
    tables: Vec<TableLink>,
    deciles9: Vec<Decile>,
    deciles10: Vec<Decile>,
    aggregations: Vec<IncomeAggregation>,
    toggles: Vec<RelativeToggle>,
}

impl Facets {
    fn load(sheets: &SheetSet) -> Result<Self> {
        Ok(Self {
            welfare: sheets.facets("welfare")?,
            scales: sheets.facets("equivalence_scales")?,
            tables: sheets.facets("tables")?,
            deciles9: sheets.facets("deciles9")?,
            deciles10: sheets.facets("deciles10")?,
            aggregations: sheets.facets("income_aggregation")?,
            toggles: sheets.facets("relative_toggle")?,
        })
    }
}

impl Generator for LisIncomesAcrossDistribution {
    fn name(&self) -> &'static str {
        "lis-incomes-across-distribution"
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
            aggregations = facets.aggregations.len(),
            "expanding incomes across the distribution"
        );

        let mut explorer = Explorer::new(self.name(), header());
        let columns = column_definitions(&facets);
        for table in &facets.tables {
            explorer
                .tables
                .push(TableBlock::new(&table.link, &table.name, columns.clone()));

            let mut views = grapher_views(&facets);
            views.set_column(TABLE_SLUG_COLUMN, Some(table.name.clone()));
            explorer.graphers.concat(&views);
        }

        finish_views(&mut explorer.graphers, &facets)?;
        Ok(explorer)
    }
}

fn header() -> Header {
    let mut header = base_header(
        "Incomes across the distribution (Luxembourg Income Study)",
        &LIS_SELECTION,
        "",
        LIS_SHEET_ID,
        "",
    );
    header.set("pickerColumnSlugs", PICKER_COLUMN_SLUGS);
    header
}

/// `<metric>[_<decile>]_<welfare>_<scale><suffix>`
fn variable(metric: &str, decile: Option<&str>, welfare: &str, scale: &str, suffix: &str) -> String {
    match decile {
        Some(d) => format!("{}_{}_{}_{}{}", metric, d, welfare, scale, suffix),
        None => format!("{}_{}_{}{}", metric, welfare, scale, suffix),
    }
}

fn column_definitions(f: &Facets) -> Frame {
    let mut columns = Frame::new();
    push_entity_columns(&mut columns);

    let money = Some((INTERNATIONAL_DOLLARS, "$"));

    for w in &f.welfare {
        let wt = &w.welfare_type;
        for eq in &f.scales {
            let about = format!(
                "This is {}. {}{}{}",
                w.technical_text, w.subtitle, NEW_LINE, eq.description
            );

            let distribution = |columns: &mut Frame, suffix: &str| {
                columns.push(
                    NumericColumn {
                        name: format!("Mean {} ({}, {})", wt, capitalize(&w.technical_text), eq.text),
                        slug: variable("mean", None, &w.slug, &eq.slug, suffix),
                        description: format!("Mean {}.{}{}", wt, NEW_LINE, about),
                        unit: money,
                        bins: &w.scale_mean,
                        scheme: "BuGn",
                    }
                    .into_record(),
                );
                columns.push(
                    NumericColumn {
                        name: format!("Median {} ({}, {})", wt, capitalize(&w.technical_text), eq.text),
                        slug: variable("median", None, &w.slug, &eq.slug, suffix),
                        description: format!(
                            "The level of {} below which half of the population live.{}{}",
                            wt, NEW_LINE, about
                        ),
                        unit: money,
                        bins: &w.scale_median,
                        scheme: "Blues",
                    }
                    .into_record(),
                );
                for d in &f.deciles9 {
                    columns.push(
                        NumericColumn {
                            name: capitalize(&d.ordinal),
                            slug: variable("thr", Some(d.lis_notation.as_str()), &w.slug, &eq.slug, suffix),
                            description: format!(
                                "The level of {} below which {}0% of the population falls.{}{}",
                                wt, d.decile, NEW_LINE, about
                            ),
                            unit: money,
                            bins: &d.scale_thr,
                            scheme: "Purples",
                        }
                        .into_record(),
                    );
                }
                for d in &f.deciles10 {
                    columns.push(
                        NumericColumn {
                            name: capitalize(&d.ordinal),
                            slug: variable("avg", Some(d.lis_notation.as_str()), &w.slug, &eq.slug, suffix),
                            description: format!(
                                "This is the mean {} within the {} (tenth of the population).{}{}",
                                wt, d.ordinal, NEW_LINE, about
                            ),
                            unit: money,
                            bins: &d.scale_avg,
                            scheme: "Greens",
                        }
                        .into_record(),
                    );
                }
            };

            distribution(&mut columns, "");

            for d in &f.deciles10 {
                columns.push(
                    NumericColumn {
                        name: capitalize(&d.ordinal),
                        slug: variable("share", Some(d.lis_notation.as_str()), &w.slug, &eq.slug, ""),
                        description: format!(
                            "This is the {} of the {} (tenth of the population) as a share of total {}.{}{}",
                            wt, d.ordinal, wt, NEW_LINE, about
                        ),
                        unit: Some(("%", "%")),
                        bins: &d.scale_share,
                        scheme: "OrRd",
                    }
                    .into_record(),
                );
            }

            for agg in &f.aggregations {
                distribution(&mut columns, &agg.slug_suffix);
            }
        }
    }

    apply_column_constants(&mut columns, &LIS_SOURCE);
    columns
}

/// One row of the graphers table
#[derive(Clone)]
struct View<'a> {
    title: String,
    y_slugs: String,
    metric: &'a str,
    decile: Option<&'a str>,
    income_type: &'a str,
    aggregation: Option<String>,
    scale: String,
    relative: &'a str,
    stack_mode: &'a str,
    subtitle: String,
    note: Option<String>,
    layout: Layout,
    y_scale_toggle: bool,
}

impl View<'_> {
    fn into_record(self) -> Record {
        let mut record = Record::new();
        record
            .set("title", self.title)
            .set("ySlugs", self.y_slugs)
            .set("Metric Dropdown", self.metric)
            .set_opt("Decile Dropdown", self.decile.map(str::to_string))
            .set("Income type Dropdown", self.income_type)
            .set_opt("Aggregation Radio", self.aggregation)
            .set("Equivalence scale Dropdown", self.scale)
            .set("Relative change Checkbox", self.relative)
            .set("stackMode", self.stack_mode)
            .set("subtitle", self.subtitle)
            .set_opt("note", self.note);
        self.layout.apply(&mut record);
        if self.y_scale_toggle {
            record.set("yScaleToggle", "true");
        }
        record
    }
}

fn grapher_views(f: &Facets) -> Frame {
    let mut graphers = Frame::new();

    let compared = versus(f.scales.iter().map(|s| s.text.as_str()));
    let compared_dropdown = capitalize(&compared);

    for w in &f.welfare {
        let wt = &w.welfare_type;
        let threshold_subtitle = |d: &Decile| {
            format!(
                "This is the level of {} below which {}0% of the population falls. {}",
                wt, d.decile, w.subtitle
            )
        };
        let average_subtitle = |d: &Decile| {
            format!(
                "This is the mean {} within the {} (tenth of the population). {}",
                wt, d.ordinal, w.subtitle
            )
        };
        let share_subtitle = |d: &Decile| {
            format!(
                "This is the {} of the {} (tenth of the population) as a share of total {}. {}",
                wt, d.ordinal, wt, w.subtitle
            )
        };

        for eq in &f.scales {
            for agg in &f.aggregations {
                let per = &agg.aggregation;
                let sfx = &agg.slug_suffix;
                let base = View {
                    title: String::new(),
                    y_slugs: String::new(),
                    metric: METRIC_MEAN,
                    decile: None,
                    income_type: &w.dropdown_option,
                    aggregation: Some(capitalize(per)),
                    scale: capitalize(&eq.text),
                    relative: "false",
                    stack_mode: "absolute",
                    subtitle: format!("{} {}", INFLATION_SUBTITLE, w.subtitle),
                    note: Some(format!("{} {}", PRICES_NOTE, eq.note)),
                    layout: Layout::Map,
                    y_scale_toggle: true,
                };

                graphers.push(
                    View {
                        title: format!("Mean {} per {} ({})", wt, per, w.title),
                        y_slugs: variable("mean", None, &w.slug, &eq.slug, sfx),
                        ..base.clone()
                    }
                    .into_record(),
                );
                graphers.push(
                    View {
                        title: format!("Median {} per {} ({})", wt, per, w.title),
                        y_slugs: variable("median", None, &w.slug, &eq.slug, sfx),
                        metric: METRIC_MEDIAN,
                        ..base.clone()
                    }
                    .into_record(),
                );

                for d in &f.deciles9 {
                    graphers.push(
                        View {
                            title: format!(
                                "Threshold {} per {} marking the {} ({})",
                                wt, per, d.ordinal, w.title
                            ),
                            y_slugs: variable("thr", Some(d.lis_notation.as_str()), &w.slug, &eq.slug, sfx),
                            metric: METRIC_THRESHOLDS,
                            decile: Some(d.dropdown.as_str()),
                            subtitle: threshold_subtitle(d),
                            note: Some(format!("{} {}", PPP_NOTE, eq.note)),
                            ..base.clone()
                        }
                        .into_record(),
                    );
                }

                for d in &f.deciles10 {
                    graphers.push(
                        View {
                            title: format!(
                                "Mean {} per {} within the {} ({})",
                                wt, per, d.ordinal, w.title
                            ),
                            y_slugs: variable("avg", Some(d.lis_notation.as_str()), &w.slug, &eq.slug, sfx),
                            metric: METRIC_DECILE_MEAN,
                            decile: Some(d.dropdown.as_str()),
                            subtitle: average_subtitle(d),
                            note: Some(format!("{} {}", PPP_NOTE, eq.note)),
                            ..base.clone()
                        }
                        .into_record(),
                    );
                }

                for t in &f.toggles {
                    graphers.push(
                        View {
                            title: format!(
                                "Threshold {} per {} for each decile ({})",
                                wt, per, w.title
                            ),
                            y_slugs: join_slugs(f.deciles9.iter().map(|d| {
                                variable("thr", Some(d.lis_notation.as_str()), &w.slug, &eq.slug, sfx)
                            })),
                            metric: METRIC_THRESHOLDS,
                            decile: Some(ALL_DECILES),
                            relative: &t.checkbox,
                            stack_mode: &t.stack_mode,
                            subtitle: format!(
                                "This is the level of income or consumption per year below which 10%, 20%, 30%, etc. of the population falls. {}",
                                w.subtitle
                            ),
                            note: Some(format!("{} {}", PPP_NOTE, eq.note)),
                            layout: Layout::Chart,
                            ..base.clone()
                        }
                        .into_record(),
                    );
                    graphers.push(
                        View {
                            title: format!(
                                "Mean {} per {} within each decile ({})",
                                wt, per, w.title
                            ),
                            y_slugs: join_slugs(f.deciles10.iter().map(|d| {
                                variable("avg", Some(d.lis_notation.as_str()), &w.slug, &eq.slug, sfx)
                            })),
                            metric: METRIC_DECILE_MEAN,
                            decile: Some(ALL_DECILES),
                            relative: &t.checkbox,
                            stack_mode: &t.stack_mode,
                            layout: Layout::Chart,
                            ..base.clone()
                        }
                        .into_record(),
                    );
                }
            }

            let base = View {
                title: String::new(),
                y_slugs: String::new(),
                metric: METRIC_SHARES,
                decile: None,
                income_type: &w.dropdown_option,
                aggregation: None,
                scale: capitalize(&eq.text),
                relative: "false",
                stack_mode: "absolute",
                subtitle: String::new(),
                note: Some(eq.note.clone()),
                layout: Layout::Map,
                y_scale_toggle: false,
            };

            for d in &f.deciles10 {
                graphers.push(
                    View {
                        title: format!("{} share of the {} ({})", capitalize(wt), d.ordinal, w.title),
                        y_slugs: variable("share", Some(d.lis_notation.as_str()), &w.slug, &eq.slug, ""),
                        decile: Some(d.dropdown.as_str()),
                        subtitle: share_subtitle(d),
                        ..base.clone()
                    }
                    .into_record(),
                );
            }
            graphers.push(
                View {
                    title: format!("{} share for each decile ({})", capitalize(wt), w.title),
                    y_slugs: join_slugs(f.deciles10.iter().map(|d| {
                        variable("share", Some(d.lis_notation.as_str()), &w.slug, &eq.slug, "")
                    })),
                    decile: Some(ALL_DECILES),
                    subtitle: format!(
                        "This is the {} of each decile (tenth of the population) as a share of total {}. {}",
                        wt, wt, w.subtitle
                    ),
                    layout: Layout::Chart,
                    ..base
                }
                .into_record(),
            );
        }

        // Equivalence scale comparisons, one series per scale
        let across_scales = |metric: &str, decile: Option<&str>, suffix: &str| {
            join_slugs(
                f.scales
                    .iter()
                    .map(|s| variable(metric, decile, &w.slug, &s.slug, suffix)),
            )
        };

        for agg in &f.aggregations {
            let per = &agg.aggregation;
            let sfx = &agg.slug_suffix;
            for t in &f.toggles {
                let base = View {
                    title: String::new(),
                    y_slugs: String::new(),
                    metric: METRIC_MEAN,
                    decile: None,
                    income_type: &w.dropdown_option,
                    aggregation: Some(capitalize(per)),
                    scale: compared_dropdown.clone(),
                    relative: &t.checkbox,
                    stack_mode: &t.stack_mode,
                    subtitle: format!("{} {}", INFLATION_SUBTITLE, w.subtitle),
                    note: Some(PRICES_NOTE.to_string()),
                    layout: Layout::Chart,
                    y_scale_toggle: true,
                };

                graphers.push(
                    View {
                        title: format!("Mean {} per {} ({}, {})", wt, per, w.title, compared),
                        y_slugs: across_scales("mean", None, sfx),
                        ..base.clone()
                    }
                    .into_record(),
                );
                graphers.push(
                    View {
                        title: format!("Median {} per {} ({}, {})", wt, per, w.title, compared),
                        y_slugs: across_scales("median", None, sfx),
                        metric: METRIC_MEDIAN,
                        ..base.clone()
                    }
                    .into_record(),
                );
                for d in &f.deciles9 {
                    graphers.push(
                        View {
                            title: format!(
                                "Threshold {} per {} marking the {} ({}, {})",
                                wt, per, d.ordinal, w.title, compared
                            ),
                            y_slugs: across_scales("thr", Some(d.lis_notation.as_str()), sfx),
                            metric: METRIC_THRESHOLDS,
                            decile: Some(d.dropdown.as_str()),
                            subtitle: threshold_subtitle(d),
                            note: Some(PPP_NOTE.to_string()),
                            ..base.clone()
                        }
                        .into_record(),
                    );
                }
                for d in &f.deciles10 {
                    graphers.push(
                        View {
                            title: format!(
                                "Mean {} per {} within the {} ({}, {})",
                                wt, per, d.ordinal, w.title, compared
                            ),
                            y_slugs: across_scales("avg", Some(d.lis_notation.as_str()), sfx),
                            metric: METRIC_DECILE_MEAN,
                            decile: Some(d.dropdown.as_str()),
                            subtitle: average_subtitle(d),
                            note: Some(PPP_NOTE.to_string()),
                            ..base.clone()
                        }
                        .into_record(),
                    );
                }
            }
        }

        for d in &f.deciles10 {
            graphers.push(
                View {
                    title: format!(
                        "{} share of the {} ({}, {})",
                        capitalize(wt),
                        d.ordinal,
                        w.title,
                        compared
                    ),
                    y_slugs: across_scales("share", Some(d.lis_notation.as_str()), ""),
                    metric: METRIC_SHARES,
                    decile: Some(d.dropdown.as_str()),
                    income_type: &w.dropdown_option,
                    aggregation: None,
                    scale: compared_dropdown.clone(),
                    relative: "false",
                    stack_mode: "absolute",
                    subtitle: share_subtitle(d),
                    note: None,
                    layout: Layout::Chart,
                    y_scale_toggle: false,
                }
                .into_record(),
            );
        }
    }

    graphers
}

fn finish_views(graphers: &mut Frame, f: &Facets) -> Result<()> {
    graphers.set_column("relatedQuestionText", None);
    graphers.set_column("relatedQuestionUrl", None);
    graphers.set_column("yAxisMin", Some("0".to_string()));
    graphers.set_column("mapTargetTime", Some("2019".to_string()));

    // Shares have no relative change
    graphers.retain(|row| {
        !(row.get("Metric Dropdown") == Some(METRIC_SHARES)
            && row.get("stackMode") == Some("relative"))
    });

    mark_default_view(
        graphers,
        &Selector::new()
            .eq("Metric Dropdown", METRIC_THRESHOLDS)
            .eq("Income type Dropdown", "Before tax")
            .eq("Equivalence scale Dropdown", "Equivalized")
            .eq("Decile Dropdown", ALL_DECILES)
            .eq("Relative change Checkbox", "false"),
    )?;

    let mut scale_order: Vec<String> = f.scales.iter().map(|s| capitalize(&s.text)).collect();
    scale_order.push(capitalize(&versus(f.scales.iter().map(|s| s.text.as_str()))));

    sort_views(
        graphers,
        &[
            DropdownOrder::new("Decile Dropdown", DECILE_ORDER),
            DropdownOrder::of("Metric Dropdown", METRIC_ORDER),
            DropdownOrder::of("Equivalence scale Dropdown", scale_order),
        ],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::check_slugs;
    use crate::generators::fixtures;

    fn generate() -> Explorer {
        LisIncomesAcrossDistribution
            .generate(&fixtures::load("lis"))
            .unwrap()
    }

    #[test]
    fn test_view_count_is_cartesian_product() {
        let f = Facets::load(&fixtures::load("lis")).unwrap();
        let (w, e, a, t) = (
            f.welfare.len(),
            f.scales.len(),
            f.aggregations.len(),
            f.toggles.len(),
        );
        let (d9, d10) = (f.deciles9.len(), f.deciles10.len());

        let per_scale = e * a * (2 + d9 + d10 + 2 * t) + e * (d10 + 1);
        let comparisons = a * t * (2 + d9 + d10) + d10;
        let expected = f.tables.len() * w * (per_scale + comparisons);

        assert_eq!(generate().view_count(), expected);
    }

    #[test]
    fn test_column_definitions() {
        let explorer = generate();
        assert_eq!(explorer.tables.len(), 2);
        assert_eq!(explorer.tables[0].slug, "lis_main");
        assert_eq!(explorer.tables[1].slug, "lis_extended");
        assert_eq!(explorer.tables[0].columns, explorer.tables[1].columns);
        let columns = &explorer.tables[0].columns;

        assert_eq!(columns.get(0, "slug"), Some("country"));
        assert_eq!(columns.get(1, "type"), Some("Year"));
        assert_eq!(columns.get(2, "slug"), Some("mean_mi_eq"));
        assert_eq!(
            columns.get(2, "name"),
            Some("Mean income (Market income, equivalized)")
        );
        assert_eq!(columns.get(2, "unit"), Some(INTERNATIONAL_DOLLARS));
        assert_eq!(columns.get(0, "tolerance"), Some("5"));
        assert!(!columns.has_column(TABLE_SLUG_COLUMN));
        assert!(explorer.tables[0].slugs().any(|s| s == "thr_p90_dhi_pc_year"));
    }

    #[test]
    fn test_every_y_slug_resolves() {
        assert_eq!(check_slugs(&generate()), vec![]);
    }

    #[test]
    fn test_each_table_gets_every_view() {
        let explorer = generate();
        let views_of = |table: &str| -> Vec<Option<&str>> {
            explorer
                .graphers
                .rows()
                .filter(|r| r.get(TABLE_SLUG_COLUMN) == Some(table))
                .map(|r| r.get("ySlugs"))
                .collect()
        };

        let main = views_of("lis_main");
        assert_eq!(main.len() * 2, explorer.view_count());
        assert_eq!(main, views_of("lis_extended"));
    }

    #[test]
    fn test_default_view_per_aggregation() {
        let explorer = generate();
        let f = Facets::load(&fixtures::load("lis")).unwrap();
        assert_eq!(
            explorer.default_view_count(),
            f.tables.len() * f.aggregations.len()
        );

        let first = explorer
            .graphers
            .rows()
            .find(|r| r.get("defaultView") == Some("true"))
            .unwrap();
        assert_eq!(first.get("Metric Dropdown"), Some(METRIC_THRESHOLDS));
        assert_eq!(first.get("selectedFacetStrategy"), Some("entity"));
    }

    #[test]
    fn test_views_sorted_by_decile_then_metric() {
        let explorer = generate();
        let deciles = explorer.graphers.column_values("Decile Dropdown");
        assert_eq!(deciles.first().copied(), Some(None));
        assert_eq!(deciles.last().copied(), Some(Some(ALL_DECILES)));

        let metric = explorer.graphers.get(0, "Metric Dropdown");
        assert_eq!(metric, Some(METRIC_MEAN));
    }

    #[test]
    fn test_comparison_views_span_scales() {
        let explorer = generate();
        let comparison = explorer
            .graphers
            .rows()
            .find(|r| r.get("title") == Some("Mean income per day (Market income, equivalized vs. per capita)"))
            .unwrap();
        assert_eq!(comparison.get("ySlugs"), Some("mean_mi_eq_day mean_mi_pc_day"));
        assert_eq!(
            comparison.get("Equivalence scale Dropdown"),
            Some("Equivalized vs. per capita")
        );
        assert_eq!(comparison.get("note"), Some(PRICES_NOTE));
    }
}
