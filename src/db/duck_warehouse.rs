use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use duckdb::types::Value as DuckValue;
use duckdb::{appender_params_from_iter, AccessMode, Connection};
use itertools::Itertools;
use jiff::civil::{date, Date};
use jiff::ToSpan;
use log::{debug, info};
use rust_decimal::prelude::ToPrimitive;

use crate::db::warehouse::{
    quote_ident, CreateDisposition, LoadConfig, LoadJob, QueryConfig, TableRef, Warehouse,
    WriteDisposition,
};
use crate::error::{EtlError, Result};
use crate::frame::{ColumnType, Frame, Value};
use crate::utils::lib_duckdb::{column_types, ensure_schema, open_with_retry, row_count, table_exists};

/// Datasets are DuckDB schemas.  One connection, used by one job at a time.
pub struct DuckWarehouse {
    pub duckdb_path: String,
    conn: Mutex<Connection>,
}

impl DuckWarehouse {
    pub fn open(duckdb_path: &str) -> Result<DuckWarehouse> {
        let conn = open_with_retry(
            duckdb_path,
            8,
            Duration::from_millis(25),
            AccessMode::ReadWrite,
        )?;
        info!("opened warehouse {}", duckdb_path);
        Ok(DuckWarehouse {
            duckdb_path: duckdb_path.to_string(),
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<DuckWarehouse> {
        Ok(DuckWarehouse {
            duckdb_path: ":memory:".to_string(),
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| EtlError::LockPoisoned)
    }
}

impl Warehouse for DuckWarehouse {
    fn load_table(
        &self,
        dataset: &str,
        table: &str,
        frame: &Frame,
        config: &LoadConfig,
    ) -> Result<LoadJob> {
        let destination = self.get_table_ref(dataset, table);
        if frame.width() == 0 {
            return Err(EtlError::JobOption(format!(
                "nothing to load into {}, the frame has no columns",
                destination
            )));
        }
        let types: Vec<(String, String)> = frame
            .columns()
            .iter()
            .map(|c| {
                let kind = c.kind().unwrap_or(ColumnType::Str);
                (c.name.clone(), kind.sql_type().to_string())
            })
            .collect();
        check_layout(&config.partition, &config.clustering_fields, &types)?;

        let mut conn = self.lock()?;
        ensure_schema(&conn, dataset)?;
        let exists = check_dispositions(
            &conn,
            &destination,
            config.create_disposition,
            config.write_disposition,
        )?;

        let staging = quote_ident(&format!("_staging_{}_{}", dataset, table));
        let tx = conn.transaction()?;
        tx.execute_batch(&format!(
            "CREATE OR REPLACE TABLE main.{} ({});",
            staging,
            types
                .iter()
                .map(|(name, kind)| format!("{} {}", quote_ident(name), kind))
                .join(", ")
        ))?;
        {
            let mut appender = tx.appender(&format!("_staging_{}_{}", dataset, table))?;
            for i in 0..frame.height() {
                let row = frame.row(i).into_iter().map(to_duck);
                appender.append_row(appender_params_from_iter(row))?;
            }
            appender.flush()?;
        }
        let select = format!(
            "SELECT * FROM main.{}{}",
            staging,
            order_by(&config.partition, &config.clustering_fields)
        );
        tx.execute_batch(&write_statement(
            &destination,
            &select,
            exists,
            config.write_disposition,
        ))?;
        tx.execute_batch(&format!("DROP TABLE main.{};", staging))?;
        tx.commit()?;

        info!(
            "LOAD TABLE -- Destination: {}, Output Rows: {}",
            destination,
            frame.height()
        );
        Ok(LoadJob {
            destination,
            output_rows: frame.height(),
        })
    }

    fn run_query(&self, query: &str, config: &QueryConfig) -> Result<Option<Frame>> {
        let mut conn = self.lock()?;
        if !config.use_query_cache {
            debug!("query cache disabled for this job");
        }

        let Some(destination) = &config.destination else {
            let frame = query_frame(&conn, query)?;
            info!("RUN QUERY -- Query: {}, Output Rows: {}", query.trim(), frame.height());
            return Ok(Some(frame));
        };

        ensure_schema(&conn, &destination.dataset)?;
        let exists = check_dispositions(
            &conn,
            destination,
            config.create_disposition,
            config.write_disposition,
        )?;
        let tx = conn.transaction()?;
        let select = format!(
            "SELECT * FROM (\n{}\n) AS q{}",
            query,
            order_by(&config.partition, &config.clustering_fields)
        );
        tx.execute_batch(&write_statement(
            destination,
            &select,
            exists,
            config.write_disposition,
        ))?;
        check_layout(
            &config.partition,
            &config.clustering_fields,
            &column_types(&tx, destination)?,
        )?;
        tx.commit()?;

        let rows = row_count(&conn, destination)?;
        info!(
            "RUN QUERY -- Query: {}, Destination: {}, Output Rows: {}",
            query.trim(),
            destination,
            rows
        );
        Ok(None)
    }
}

fn epoch() -> Date {
    date(1970, 1, 1)
}

fn to_duck(value: &Value) -> DuckValue {
    match value {
        Value::Null => DuckValue::Null,
        Value::Str(s) => DuckValue::Text(s.clone()),
        Value::Float(x) if x.is_nan() => DuckValue::Null,
        Value::Float(x) => DuckValue::Double(*x),
        Value::Date(d) => DuckValue::Date32((*d - epoch()).get_days()),
    }
}

fn from_duck(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Str(b.to_string()),
        DuckValue::TinyInt(x) => Value::Float(x as f64),
        DuckValue::SmallInt(x) => Value::Float(x as f64),
        DuckValue::Int(x) => Value::Float(x as f64),
        DuckValue::BigInt(x) => Value::Float(x as f64),
        DuckValue::HugeInt(x) => Value::Float(x as f64),
        DuckValue::UTinyInt(x) => Value::Float(x as f64),
        DuckValue::USmallInt(x) => Value::Float(x as f64),
        DuckValue::UInt(x) => Value::Float(x as f64),
        DuckValue::UBigInt(x) => Value::Float(x as f64),
        DuckValue::Float(x) => Value::Float(x as f64),
        DuckValue::Double(x) => Value::Float(x),
        DuckValue::Decimal(d) => d.to_f64().map_or(Value::Null, Value::Float),
        DuckValue::Text(s) => Value::Str(s),
        DuckValue::Enum(s) => Value::Str(s),
        DuckValue::Date32(days) => epoch()
            .checked_add(days.days())
            .map_or(Value::Null, Value::Date),
        other => Value::Str(format!("{:?}", other)),
    }
}

fn query_frame(conn: &Connection, query: &str) -> Result<Frame> {
    let mut stmt = conn.prepare(query)?;
    let mut rows = stmt.query([])?;
    let labels: Vec<String> = rows.as_ref().map(|s| s.column_names()).unwrap_or_default();
    let mut data: Vec<Vec<Value>> = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(labels.len());
        for i in 0..labels.len() {
            cells.push(from_duck(row.get::<usize, DuckValue>(i)?));
        }
        data.push(cells);
    }
    Ok(Frame::from_rows(labels, data)?)
}

fn order_by(partition: &Option<String>, clustering_fields: &[String]) -> String {
    let columns: Vec<String> = partition
        .iter()
        .chain(clustering_fields.iter())
        .map(|c| quote_ident(c))
        .collect();
    if columns.is_empty() {
        String::new()
    } else {
        format!("\nORDER BY {}", columns.join(", "))
    }
}

/// The partition column has to be a date and every clustering field has to
/// exist.
fn check_layout(
    partition: &Option<String>,
    clustering_fields: &[String],
    columns: &[(String, String)],
) -> Result<()> {
    if let Some(p) = partition {
        match columns.iter().find(|(name, _)| name == p) {
            Some((_, kind)) if kind == "DATE" => {}
            Some((_, kind)) => {
                return Err(EtlError::JobOption(format!(
                    "partition column '{}' is {}, expected DATE",
                    p, kind
                )))
            }
            None => {
                return Err(EtlError::JobOption(format!(
                    "partition column '{}' does not exist",
                    p
                )))
            }
        }
    }
    for field in clustering_fields {
        if !columns.iter().any(|(name, _)| name == field) {
            return Err(EtlError::JobOption(format!(
                "clustering field '{}' does not exist",
                field
            )));
        }
    }
    Ok(())
}

/// Returns whether the destination already exists.
fn check_dispositions(
    conn: &Connection,
    destination: &TableRef,
    create: CreateDisposition,
    write: WriteDisposition,
) -> Result<bool> {
    let exists = table_exists(conn, destination)?;
    if !exists && create == CreateDisposition::CreateNever {
        return Err(EtlError::JobOption(format!(
            "table {} does not exist and may not be created",
            destination
        )));
    }
    if exists && write == WriteDisposition::WriteEmpty && row_count(conn, destination)? > 0 {
        return Err(EtlError::JobOption(format!(
            "table {} already has rows",
            destination
        )));
    }
    Ok(exists)
}

fn write_statement(
    destination: &TableRef,
    select: &str,
    exists: bool,
    write: WriteDisposition,
) -> String {
    match (exists, write) {
        (true, WriteDisposition::WriteAppend) => {
            format!("INSERT INTO {} BY NAME {};", destination.sql(), select)
        }
        _ => format!("CREATE OR REPLACE TABLE {} AS {};", destination.sql(), select),
    }
}
