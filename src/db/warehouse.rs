use std::fmt::{self, Display};

use crate::error::Result;
use crate::frame::Frame;

/// Address of a table: `dataset.table`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    pub fn new(dataset: &str, table: &str) -> TableRef {
        TableRef {
            dataset: dataset.to_string(),
            table: table.to_string(),
        }
    }

    /// Quoted for use in SQL text.
    pub fn sql(&self) -> String {
        format!("{}.{}", quote_ident(&self.dataset), quote_ident(&self.table))
    }
}

impl Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.dataset, self.table)
    }
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// What to do when the destination table does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateDisposition {
    #[default]
    CreateIfNeeded,
    /// Fail if the table is missing.
    CreateNever,
}

/// What to do with rows already in the destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteDisposition {
    /// Replace the contents.  The old rows stay if the job fails.
    WriteTruncate,
    /// Add the new rows, matching columns by name.
    WriteAppend,
    /// Fail unless the table is empty or missing.
    #[default]
    WriteEmpty,
}

/// Options of a load job.
///
/// * `partition`: date column the table is laid out by.  It must exist and
///   hold dates; rows are stored sorted on it.
/// * `clustering_fields`: columns rows are sorted on after the partition
///   column.  Each must exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadConfig {
    pub partition: Option<String>,
    pub clustering_fields: Vec<String>,
    pub create_disposition: CreateDisposition,
    pub write_disposition: WriteDisposition,
}

/// Options of a query job.  Without a `destination` the rows come back as a
/// frame and the layout and disposition options are ignored.
///
/// `use_query_cache` is accepted for parity with hosted warehouses that
/// cache results.  The embedded engine has no result cache.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    pub partition: Option<String>,
    pub clustering_fields: Vec<String>,
    pub destination: Option<TableRef>,
    pub create_disposition: CreateDisposition,
    pub write_disposition: WriteDisposition,
    pub use_query_cache: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            partition: None,
            clustering_fields: Vec::new(),
            destination: None,
            create_disposition: CreateDisposition::default(),
            write_disposition: WriteDisposition::default(),
            use_query_cache: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadJob {
    pub destination: TableRef,
    pub output_rows: usize,
}

pub trait Warehouse: Send + Sync {
    fn get_table_ref(&self, dataset: &str, table: &str) -> TableRef {
        TableRef::new(dataset, table)
    }

    /// Write `frame` into `dataset.table`.  Returns once the job committed.
    fn load_table(
        &self,
        dataset: &str,
        table: &str,
        frame: &Frame,
        config: &LoadConfig,
    ) -> Result<LoadJob>;

    /// Run `query`.  Rows are returned only when no destination is set.
    fn run_query(&self, query: &str, config: &QueryConfig) -> Result<Option<Frame>>;
}
