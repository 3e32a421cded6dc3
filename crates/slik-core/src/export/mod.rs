pub mod xlsx;

use std::path::Path;

use crate::error::SlikError;
use crate::model::Table;

pub use xlsx::XlsxSink;

/// Destination for a finished unified table.
pub trait TableSink {
    /// Write the whole table to `path`. Either the file is written completely
    /// or it is left untouched.
    fn write_table(&self, table: &Table, path: &Path) -> Result<(), SlikError>;

    /// Name of this sink (for diagnostics).
    fn sink_name(&self) -> &str;
}
