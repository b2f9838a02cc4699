//! A small column-oriented table used between the fetch, normalize and load
//! steps.

use std::fmt;

use itertools::Itertools;
use jiff::civil::Date;
use thiserror::Error;

use crate::error::{EtlError, Result};

#[derive(Error, Debug, PartialEq)]
pub enum FrameError {
    #[error("duplicate column label '{0}'")]
    DuplicateLabel(String),
    #[error("column '{column}' has {found} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("no column named '{0}'")]
    MissingColumn(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Str(String),
    Float(f64),
    Date(Date),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Str(_) => Some(ColumnType::Str),
            Value::Float(_) => Some(ColumnType::Float),
            Value::Date(_) => Some(ColumnType::Date),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Str(s) => write!(f, "{}", s),
            Value::Float(x) => write!(f, "{}", x),
            Value::Date(d) => write!(f, "{}", d),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Str,
    Float,
    Date,
}

impl ColumnType {
    /// DuckDB type used when the column is stored.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Str => "VARCHAR",
            ColumnType::Float => "DOUBLE",
            ColumnType::Date => "DATE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    /// Type of the first non-null cell.  An all-null column reports `None`.
    pub fn kind(&self) -> Option<ColumnType> {
        self.values.iter().find_map(|v| v.kind())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    pub fn new() -> Frame {
        Frame::default()
    }

    /// Build a frame from row-major data.
    pub fn from_rows(labels: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Frame, FrameError> {
        let mut columns: Vec<Column> = labels
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(FrameError::RowWidth {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.values.push(value);
            }
        }
        let mut frame = Frame::new();
        for column in columns {
            frame.push_column(column.name, column.values)?;
        }
        Ok(frame)
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<(), FrameError> {
        let name = name.into();
        if self.columns.iter().any(|c| c.name == name) {
            return Err(FrameError::DuplicateLabel(name));
        }
        if let Some(first) = self.columns.first() {
            if first.values.len() != values.len() {
                return Err(FrameError::LengthMismatch {
                    column: name,
                    expected: first.values.len(),
                    found: values.len(),
                });
            }
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    pub fn drop_column(&mut self, name: &str) -> Result<Column, FrameError> {
        let idx = self
            .position(name)
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))?;
        Ok(self.columns.remove(idx))
    }

    /// Relabel every column.  Fails if two labels collapse into one.
    pub fn rename_with<F>(&mut self, f: F) -> Result<(), FrameError>
    where
        F: Fn(&str) -> String,
    {
        let labels: Vec<String> = self.columns.iter().map(|c| f(&c.name)).collect();
        if let Some(dup) = labels.iter().duplicates().next() {
            return Err(FrameError::DuplicateLabel(dup.clone()));
        }
        for (column, label) in self.columns.iter_mut().zip(labels) {
            column.name = label;
        }
        Ok(())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Replace every cell of column `name` with `f(name, cell)`.  The column
    /// keeps its length, and it is left untouched if `f` fails.
    pub fn map_values<F, E>(&mut self, name: &str, mut f: F) -> Result<(), E>
    where
        F: FnMut(&str, &Value) -> Result<Value, E>,
        E: From<FrameError>,
    {
        let idx = self
            .position(name)
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))?;
        let column = &mut self.columns[idx];
        let mapped = column
            .values
            .iter()
            .map(|v| f(&column.name, v))
            .collect::<Result<Vec<Value>, E>>()?;
        column.values = mapped;
        Ok(())
    }

    pub fn require(&self, name: &str) -> Result<&Column, FrameError> {
        self.column(name)
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Cells of row `i`, in column order.
    pub fn row(&self, i: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[i]).collect()
    }

    pub fn value(&self, column: &str, i: usize) -> Option<&Value> {
        self.column(column).and_then(|c| c.values.get(i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: ColumnType,
    pub nullable: bool,
}

pub const fn field(name: &'static str, kind: ColumnType, nullable: bool) -> Field {
    Field {
        name,
        kind,
        nullable,
    }
}

/// Declared shape of a frame: the listed fields must be present with the
/// given types.  Other columns are rejected unless `extra` names the type
/// they must have.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
    pub extra: Option<ColumnType>,
}

impl Schema {
    pub fn check(&self, frame: &Frame) -> Result<()> {
        for f in self.fields {
            let column = frame.column(f.name).ok_or_else(|| {
                EtlError::Schema(format!(
                    "{}: missing column '{}', found [{}]",
                    self.name,
                    f.name,
                    frame.labels().join(", ")
                ))
            })?;
            check_values(self.name, column, f.kind, f.nullable)?;
        }
        for column in frame.columns() {
            if self.fields.iter().any(|f| f.name == column.name) {
                continue;
            }
            match self.extra {
                Some(kind) => check_values(self.name, column, kind, true)?,
                None => {
                    return Err(EtlError::Schema(format!(
                        "{}: unexpected column '{}'",
                        self.name, column.name
                    )))
                }
            }
        }
        Ok(())
    }
}

fn check_values(schema: &str, column: &Column, kind: ColumnType, nullable: bool) -> Result<()> {
    for (i, v) in column.values.iter().enumerate() {
        match v.kind() {
            None if nullable => {}
            None => {
                return Err(EtlError::Schema(format!(
                    "{}: column '{}' has a null at row {}",
                    schema, column.name, i
                )))
            }
            Some(k) if k != kind => {
                return Err(EtlError::Schema(format!(
                    "{}: column '{}' should hold {:?} values, found {:?} at row {}",
                    schema, column.name, kind, k, i
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}
