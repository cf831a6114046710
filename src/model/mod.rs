//! Data model for input sheets and generated explorer tables

mod frame;
mod header;
mod sheet;

pub use frame::{Cell, Frame, Record, RowView};
pub use header::Header;
pub use sheet::{Sheet, SheetRow, SheetSet};
