//! Cross-reference checks between grapher views and table blocks

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use super::{Explorer, TABLE_SLUG_COLUMN, Y_SLUGS_COLUMN};

/// A broken reference found in an explorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlugIssue {
    /// A y-slug not defined in the view's table block
    DanglingSlug {
        view: usize,
        table: String,
        slug: String,
    },
    /// A view referencing a table block that does not exist
    UnknownTable { view: usize, table: String },
    /// A view without a table reference in a multi-block explorer
    MissingTable { view: usize },
    /// Two table blocks sharing a slug
    DuplicateTable { table: String },
}

impl fmt::Display for SlugIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugIssue::DanglingSlug { view, table, slug } => {
                write!(f, "view {}: ySlug '{}' is not defined in table '{}'", view, slug, table)
            }
            SlugIssue::UnknownTable { view, table } => {
                write!(f, "view {}: unknown table '{}'", view, table)
            }
            SlugIssue::MissingTable { view } => {
                write!(f, "view {}: no tableSlug and several table blocks", view)
            }
            SlugIssue::DuplicateTable { table } => {
                write!(f, "table '{}' is defined more than once", table)
            }
        }
    }
}

/// Check that every y-slug resolves to a column of its table block.
/// Views are numbered from 1 in graphers order.
pub fn check_slugs(explorer: &Explorer) -> Vec<SlugIssue> {
    let mut issues = Vec::new();

    let mut tables: FxHashMap<&str, FxHashSet<&str>> = FxHashMap::default();
    for block in &explorer.tables {
        if tables.contains_key(block.slug.as_str()) {
            issues.push(SlugIssue::DuplicateTable {
                table: block.slug.clone(),
            });
            continue;
        }
        tables.insert(block.slug.as_str(), block.slugs().collect());
    }

    let single = match explorer.tables.as_slice() {
        [only] => Some(only.slug.as_str()),
        _ => None,
    };

    for row in explorer.graphers.rows() {
        let view = row.index() + 1;
        let table = match row.get(TABLE_SLUG_COLUMN).or(single) {
            Some(t) => t,
            None => {
                issues.push(SlugIssue::MissingTable { view });
                continue;
            }
        };
        let Some(defined) = tables.get(table) else {
            issues.push(SlugIssue::UnknownTable {
                view,
                table: table.to_string(),
            });
            continue;
        };

        for slug in row.get(Y_SLUGS_COLUMN).unwrap_or("").split_whitespace() {
            if !defined.contains(slug) {
                issues.push(SlugIssue::DanglingSlug {
                    view,
                    table: table.to_string(),
                    slug: slug.to_string(),
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::TableBlock;
    use crate::model::{Frame, Header, Record};

    fn block(slug: &str, columns: &[&str]) -> TableBlock {
        let mut frame = Frame::new();
        for c in columns {
            let mut r = Record::new();
            r.set("slug", *c);
            frame.push(r);
        }
        TableBlock::new(format!("https://example.org/{}.csv", slug), slug, frame)
    }

    fn view(y: &str, table: Option<&str>) -> Record {
        let mut r = Record::new();
        r.set(Y_SLUGS_COLUMN, y)
            .set_opt(TABLE_SLUG_COLUMN, table.map(str::to_string));
        r
    }

    #[test]
    fn test_single_block_without_table_slug() {
        let mut explorer = Explorer::new("test", Header::new());
        explorer.tables.push(block("main", &["a", "b"]));
        explorer.graphers.push(view("a b", None));

        assert!(check_slugs(&explorer).is_empty());
    }

    #[test]
    fn test_reports_broken_references() {
        let mut explorer = Explorer::new("test", Header::new());
        explorer.tables.push(block("inc", &["a"]));
        explorer.tables.push(block("cons", &["a"]));
        explorer.tables.push(block("cons", &["b"]));
        explorer.graphers.push(view("a", Some("inc")));
        explorer.graphers.push(view("a c", Some("cons")));
        explorer.graphers.push(view("a", Some("other")));
        explorer.graphers.push(view("a", None));

        let issues = check_slugs(&explorer);
        assert_eq!(
            issues,
            vec![
                SlugIssue::DuplicateTable { table: "cons".into() },
                SlugIssue::DanglingSlug {
                    view: 2,
                    table: "cons".into(),
                    slug: "c".into()
                },
                SlugIssue::UnknownTable {
                    view: 3,
                    table: "other".into()
                },
                SlugIssue::MissingTable { view: 4 },
            ]
        );
        assert_eq!(
            issues[1].to_string(),
            "view 2: ySlug 'c' is not defined in table 'cons'"
        );
    }
}
