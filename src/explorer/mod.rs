//! Explorer file contents and the helpers used to build them

pub mod facets;
pub mod text;
pub mod validate;
pub mod views;

use crate::model::{Frame, Header};

pub use validate::{check_slugs, SlugIssue};
pub use views::{mark_default_view, rewrite_column, sort_views, DropdownOrder, Selector};

/// Column holding a view's table block reference
pub const TABLE_SLUG_COLUMN: &str = "tableSlug";
/// Column holding a view's space-separated y-slugs
pub const Y_SLUGS_COLUMN: &str = "ySlugs";

/// A `table`/`columns` block: column metadata for one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    /// Dataset location written on the `table` line
    pub url: String,
    /// Table slug referenced by grapher views
    pub slug: String,
    /// One row per dataset column
    pub columns: Frame,
}

impl TableBlock {
    pub fn new(url: impl Into<String>, slug: impl Into<String>, columns: Frame) -> Self {
        Self {
            url: url.into(),
            slug: slug.into(),
            columns,
        }
    }

    /// Slugs of the columns the block defines
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.columns.column_values("slug").into_iter().flatten()
    }
}

/// A generated explorer: header, grapher views and table blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explorer {
    /// Registry name, also the output file stem
    pub name: String,
    pub header: Header,
    pub graphers: Frame,
    pub tables: Vec<TableBlock>,
}

impl Explorer {
    pub fn new(name: impl Into<String>, header: Header) -> Self {
        Self {
            name: name.into(),
            header,
            graphers: Frame::new(),
            tables: Vec::new(),
        }
    }

    /// Number of grapher views
    pub fn view_count(&self) -> usize {
        self.graphers.row_count()
    }

    /// Total column definitions across all table blocks
    pub fn column_definition_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.row_count()).sum()
    }

    /// Number of views flagged as default
    pub fn default_view_count(&self) -> usize {
        self.graphers
            .column_values(views::DEFAULT_VIEW_COLUMN)
            .into_iter()
            .filter(|v| *v == Some("true"))
            .count()
    }

    /// Find a table block by slug
    pub fn table(&self, slug: &str) -> Option<&TableBlock> {
        self.tables.iter().find(|t| t.slug == slug)
    }
}
