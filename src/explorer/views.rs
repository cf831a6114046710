//! Post-processing of the graphers table: default view, ordering, rewrites

use crate::error::{ExplorerError, Result};
use crate::model::{Frame, RowView};

/// Column flagging the view shown when the explorer opens
pub const DEFAULT_VIEW_COLUMN: &str = "defaultView";

/// Conjunction of `column == value` tests against a graphers row.
/// A `None` value matches a missing cell.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    conditions: Vec<(String, Option<String>)>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column` to equal `value`
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((column.into(), Some(value.into())));
        self
    }

    /// Require `column` to be missing
    pub fn missing(mut self, column: impl Into<String>) -> Self {
        self.conditions.push((column.into(), None));
        self
    }

    pub fn matches(&self, row: &RowView<'_>) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| row.get(column) == value.as_deref())
    }

    /// Human-readable form used in error messages
    pub fn describe(&self) -> String {
        self.conditions
            .iter()
            .map(|(column, value)| match value {
                Some(v) => format!("{} = '{}'", column, v),
                None => format!("{} is empty", column),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Set `defaultView = true` on every view matching `selector`.
/// Returns the number of views marked; zero is an error.
pub fn mark_default_view(graphers: &mut Frame, selector: &Selector) -> Result<usize> {
    let marked = graphers.set_where(DEFAULT_VIEW_COLUMN, Some("true".to_string()), |row| {
        selector.matches(row)
    });

    if marked == 0 {
        return Err(ExplorerError::NoDefaultView(selector.describe()));
    }
    if marked > 1 {
        tracing::debug!(views = marked, "default view selection matches several views");
    }
    Ok(marked)
}

/// Display order of a dropdown's options
#[derive(Debug, Clone)]
pub struct DropdownOrder {
    column: String,
    options: Vec<Option<String>>,
}

impl DropdownOrder {
    /// Order where `None` stands for views without a value in this dropdown
    pub fn new<I, S>(column: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            options: options.into_iter().map(|o| o.map(Into::into)).collect(),
        }
    }

    /// Order without a slot for missing values
    pub fn of<I, S>(column: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(column, options.into_iter().map(Some))
    }

    /// Position of the row's value, `None` when the value is not listed
    pub fn rank(&self, row: &RowView<'_>) -> Option<usize> {
        let value = row.get(&self.column);
        self.options.iter().position(|o| o.as_deref() == value)
    }
}

/// Stable sort of views by dropdown orders, first order most significant.
/// Unlisted values sort after listed ones.
pub fn sort_views(graphers: &mut Frame, orders: &[DropdownOrder]) {
    let rankers: Vec<_> = orders
        .iter()
        .map(|order| move |row: &RowView<'_>| order.rank(row))
        .collect();
    graphers.sort_by_ranks(&rankers);
}

/// Literal substring replacements applied in order to every value of a column
pub fn rewrite_column(frame: &mut Frame, column: &str, replacements: &[(&str, &str)]) {
    frame.map_column(column, |value| {
        replacements
            .iter()
            .fold(value.to_string(), |acc, (from, to)| acc.replace(from, to))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn view(metric: &str, decile: Option<&str>) -> Record {
        let mut r = Record::new();
        r.set("Metric Dropdown", metric)
            .set_opt("Decile Dropdown", decile.map(str::to_string));
        r
    }

    fn graphers() -> Frame {
        let mut frame = Frame::new();
        frame.push(view("Decile shares", Some("All deciles")));
        frame.push(view("Mean income or consumption", None));
        frame.push(view("Decile thresholds", Some("2")));
        frame.push(view("Decile thresholds", Some("All deciles")));
        frame.push(view("Something else", Some("3")));
        frame
    }

    #[test]
    fn test_mark_default_view() {
        let mut frame = graphers();
        let selector = Selector::new()
            .eq("Metric Dropdown", "Decile thresholds")
            .eq("Decile Dropdown", "All deciles");

        assert_eq!(mark_default_view(&mut frame, &selector).unwrap(), 1);
        assert_eq!(
            frame.column_values(DEFAULT_VIEW_COLUMN),
            vec![None, None, None, Some("true"), None]
        );
    }

    #[test]
    fn test_mark_default_view_without_match() {
        let mut frame = graphers();
        let selector = Selector::new().eq("Metric Dropdown", "Poverty gap index");

        let err = mark_default_view(&mut frame, &selector).unwrap_err();
        assert!(matches!(err, ExplorerError::NoDefaultView(_)));
        assert!(err.to_string().contains("Poverty gap index"));
    }

    #[test]
    fn test_selector_missing() {
        let frame = graphers();
        let selector = Selector::new().missing("Decile Dropdown");
        let matched: Vec<usize> = frame
            .rows()
            .filter(|r| selector.matches(r))
            .map(|r| r.index())
            .collect();
        assert_eq!(matched, vec![1]);
    }

    #[test]
    fn test_sort_views() {
        let mut frame = graphers();
        let orders = [
            DropdownOrder::new(
                "Decile Dropdown",
                [None, Some("2"), Some("3"), Some("All deciles")],
            ),
            DropdownOrder::of(
                "Metric Dropdown",
                ["Mean income or consumption", "Decile thresholds", "Decile shares"],
            ),
        ];
        sort_views(&mut frame, &orders);

        assert_eq!(
            frame.column_values("Metric Dropdown"),
            vec![
                Some("Mean income or consumption"),
                Some("Decile thresholds"),
                Some("Something else"),
                Some("Decile thresholds"),
                Some("Decile shares"),
            ]
        );
    }

    #[test]
    fn test_rewrite_column() {
        let mut frame = Frame::new();
        let mut r = Record::new();
        r.set("note", "Depending on the country and year, it relates to income.");
        frame.push(r);

        rewrite_column(
            &mut frame,
            "note",
            &[("Depending on the country and year, it relates", "It relates")],
        );
        assert_eq!(frame.get(0, "note"), Some("It relates to income."));
    }
}
