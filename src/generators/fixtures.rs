//! Fixture sheet groups shared by generator tests

use std::path::PathBuf;

use crate::model::SheetSet;
use crate::parser::{ParserFactory, SheetSource};

fn fixture_dir(group: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(group)
}

/// Load `tests/fixtures/<group>`
pub fn load(group: &str) -> SheetSet {
    SheetSource::Directory(fixture_dir(group))
        .load(&ParserFactory::new())
        .unwrap()
}
