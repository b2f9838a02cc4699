use thiserror::Error;

use crate::frame::FrameError;

/// Which part of the pipeline an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Transform,
    Warehouse,
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot build the http client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("unexpected page structure at {url}: {reason}")]
    PageStructure { url: String, reason: String },

    #[error("failed to parse csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("value {value:?} in column '{column}' is not numeric")]
    NotNumeric { column: String, value: String },

    #[error("cannot parse {0:?} as a date")]
    BadDate(String),

    #[error("duplicate key ({0})")]
    DuplicateKey(String),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("duckdb: {0}")]
    Warehouse(#[from] duckdb::Error),

    #[error("invalid job option: {0}")]
    JobOption(String),

    #[error("warehouse connection lock is poisoned")]
    LockPoisoned,

    #[error("no data: {0}")]
    Empty(String),
}

impl EtlError {
    pub fn kind(&self) -> ErrorKind {
        use EtlError::*;
        match self {
            Fetch { .. } | HttpClient(_) | HttpStatus { .. } | PageStructure { .. } => {
                ErrorKind::Fetch
            }
            Csv(_) | Schema(_) | NotNumeric { .. } | BadDate(_) | DuplicateKey(_) | Frame(_) => {
                ErrorKind::Transform
            }
            Warehouse(_) | JobOption(_) | LockPoisoned | Empty(_) => ErrorKind::Warehouse,
        }
    }
}

pub type Result<T, E = EtlError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let e = EtlError::HttpStatus {
            url: "http://x".to_string(),
            status: 404,
        };
        assert_eq!(e.kind(), ErrorKind::Fetch);
        assert_eq!(e.to_string(), "request to http://x returned HTTP 404");

        let e = EtlError::NotNumeric {
            column: "population".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(e.kind(), ErrorKind::Transform);
        assert_eq!(EtlError::LockPoisoned.kind(), ErrorKind::Warehouse);
    }
}
