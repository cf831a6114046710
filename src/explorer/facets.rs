//! Typed facet rows read from input sheets
//!
//! Each struct mirrors the columns of one sheet. Columns only some
//! explorers use default to empty strings, and extra columns are ignored.

use serde::Deserialize;

/// `welfare` sheet: income concepts (market income, disposable income, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct Welfare {
    pub welfare_type: String,
    pub slug: String,
    pub technical_text: String,
    pub subtitle: String,
    pub title: String,
    pub dropdown_option: String,
    #[serde(default)]
    pub scale_mean: String,
    #[serde(default)]
    pub scale_median: String,
}

/// `equivalence_scales` sheet
#[derive(Debug, Clone, Deserialize)]
pub struct EquivalenceScale {
    pub text: String,
    pub slug: String,
    pub description: String,
    pub note: String,
}

/// `povlines_abs` sheet: poverty lines in dollars a day
#[derive(Debug, Clone, Deserialize)]
pub struct AbsolutePovertyLine {
    pub dollars_text: String,
    pub cents: String,
    pub title_share: String,
    pub title_number: String,
    pub povline_dropdown: String,
    pub subtitle: String,
    #[serde(default)]
    pub title_total_shortfall: String,
    #[serde(default)]
    pub title_avg_shortfall: String,
    #[serde(default)]
    pub title_income_gap_ratio: String,
    #[serde(default)]
    pub subtitle_total_shortfall: String,
    #[serde(default)]
    pub subtitle_avg_shortfall: String,
    #[serde(default)]
    pub subtitle_income_gap_ratio: String,
    #[serde(default)]
    pub scale_total_shortfall: String,
    #[serde(default)]
    pub scale_avg_shortfall: String,
}

/// `povlines_rel` sheet: poverty lines relative to the median
#[derive(Debug, Clone, Deserialize)]
pub struct RelativePovertyLine {
    pub percent: String,
    pub slug_suffix: String,
    pub text: String,
    pub dropdown: String,
    pub title_share: String,
    pub title_number: String,
    #[serde(default)]
    pub scale_total_shortfall: String,
}

/// `survey_type` sheet
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyType {
    pub table_name: String,
    pub text: String,
    pub dropdown_option: String,
}

/// `deciles9` and `deciles10` sheets
#[derive(Debug, Clone, Deserialize)]
pub struct Decile {
    pub ordinal: String,
    pub lis_notation: String,
    pub decile: String,
    pub dropdown: String,
    #[serde(default)]
    pub wid_notation: String,
    #[serde(default)]
    pub scale_thr: String,
    #[serde(default)]
    pub scale_avg: String,
    #[serde(default)]
    pub scale_share: String,
}

/// `income_aggregation` sheet: day, month, year
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeAggregation {
    pub aggregation: String,
    pub slug_suffix: String,
    #[serde(default)]
    pub multiplier: String,
    #[serde(default)]
    pub scale: String,
}

/// `relative_toggle` sheet
#[derive(Debug, Clone, Deserialize)]
pub struct RelativeToggle {
    pub checkbox: String,
    pub stack_mode: String,
}

/// `tables` sheet: one table block per row
#[derive(Debug, Clone, Deserialize)]
pub struct TableLink {
    pub name: String,
    pub link: String,
}

/// `lis_welfare` and `wid_welfare` sheets of the source comparison
#[derive(Debug, Clone, Deserialize)]
pub struct SourceWelfare {
    pub welfare_type: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub scale_mean: String,
    #[serde(default)]
    pub scale_median: String,
}

/// `source_checkbox` sheet: one combination of sources per row.
/// Slug columns are templates with `{agg}`, `{dec9_pip}`, `{dec10_lis}`, ... placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceCombination {
    #[serde(rename = "type")]
    pub tax: String,
    pub type_title: String,
    pub pip: String,
    pub wid: String,
    pub lis: String,
    pub mean: String,
    pub median: String,
    pub thr: String,
    pub avg: String,
    pub share: String,
    pub note: String,
    pub note_ppp: String,
}
