//! ODBC `CatalogConnection`.
//!
//! Every cell is fetched through a text buffer and surfaces as
//! [`Value::Text`]; the normalizer coerces it to the canonical kind.

use std::sync::OnceLock;

use async_trait::async_trait;
use odbc_api::buffers::TextRowSet;
use odbc_api::{Connection, ConnectionOptions, Cursor, Environment, IntoParameter, ResultSetMetadata};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::{CatalogConnection, RawRowSet, Value};
use crate::error::DriverError;
use crate::query::BoundQuery;

/// Rows fetched per round trip.
const BATCH_SIZE: usize = 1000;

/// Upper bound for one text cell; view and trigger bodies can be long.
/// A longer value fails the fetch instead of coming back cut off.
const MAX_CELL_BYTES: usize = 32 * 1024;

static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

fn environment() -> Result<&'static Environment, DriverError> {
    if let Some(env) = ENVIRONMENT.get() {
        return Ok(env);
    }
    let env = Environment::new()?;
    Ok(ENVIRONMENT.get_or_init(|| env))
}

/// ODBC connection wrapped for shared use.
///
/// ODBC handles are not thread-safe; queries on one connection are
/// serialized.
pub struct OdbcCatalogConnection {
    conn: Mutex<Connection<'static>>,
}

impl OdbcCatalogConnection {
    /// Wrap a connection opened on the process-wide environment.
    pub fn new(conn: Connection<'static>) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Connect with a full ODBC connection string, e.g.
    /// `Driver={IBM i Access ODBC Driver};System=host;Uid=user;Pwd=secret;`.
    pub fn connect(connection_string: &str) -> Result<Self, DriverError> {
        let conn = environment()?
            .connect_with_connection_string(connection_string, ConnectionOptions::default())?;
        info!("Connected via ODBC");
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl CatalogConnection for OdbcCatalogConnection {
    async fn fetch(&self, query: &BoundQuery) -> Result<RawRowSet, DriverError> {
        let conn = self.conn.lock().await;
        let params: Vec<_> = query
            .params
            .iter()
            .map(|p| p.as_deref().into_parameter())
            .collect();

        let Some(mut cursor) = conn.execute(&query.sql, &params[..])? else {
            return Ok(RawRowSet::default());
        };

        let columns = cursor.column_names()?.collect::<Result<Vec<String>, _>>()?;
        let mut raw = RawRowSet::new(columns);
        let num_cols = raw.columns.len();

        let mut buffers = TextRowSet::for_cursor(BATCH_SIZE, &mut cursor, Some(MAX_CELL_BYTES))?;
        let mut row_cursor = cursor.bind_buffer(&mut buffers)?;
        while let Some(batch) = row_cursor
            .fetch_with_truncation_check(true)
            .map_err(|e| truncation_error(e, &raw.columns))?
        {
            for row_idx in 0..batch.num_rows() {
                let mut row = Vec::with_capacity(num_cols);
                for col_idx in 0..num_cols {
                    let value = batch
                        .at(col_idx, row_idx)
                        .map(|bytes| Value::Text(String::from_utf8_lossy(bytes).into_owned()))
                        .unwrap_or(Value::Null);
                    row.push(value);
                }
                raw.rows.push(row);
            }
        }
        debug!("ODBC catalog query returned {} rows", raw.len());
        Ok(raw)
    }
}

/// Name the column whose value did not fit its text buffer.
fn truncation_error(error: odbc_api::Error, columns: &[String]) -> DriverError {
    match error {
        odbc_api::Error::TooLargeValueForBuffer {
            indicator,
            buffer_index,
        } => {
            let column = columns
                .get(buffer_index)
                .cloned()
                .unwrap_or_else(|| format!("#{}", buffer_index + 1));
            let size = indicator
                .map(|n| format!("{} bytes", n))
                .unwrap_or_else(|| "unknown length".to_string());
            DriverError::decode(
                column,
                format!(
                    "value of {} exceeds the {}-byte cell buffer",
                    size, MAX_CELL_BYTES
                ),
            )
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_cell_is_an_error() {
        let columns = vec!["TRIGGER_NAME".to_string(), "ACTION_STATEMENT".to_string()];
        let err = truncation_error(
            odbc_api::Error::TooLargeValueForBuffer {
                indicator: Some(70_000),
                buffer_index: 1,
            },
            &columns,
        );
        match err {
            DriverError::Decode { column, message } => {
                assert_eq!(column, "ACTION_STATEMENT");
                assert!(message.contains("70000 bytes"));
            }
            other => panic!("expected a decode error, got {}", other),
        }
    }

    #[test]
    fn test_oversized_cell_of_unknown_length() {
        let err = truncation_error(
            odbc_api::Error::TooLargeValueForBuffer {
                indicator: None,
                buffer_index: 4,
            },
            &[],
        );
        assert!(err.to_string().contains("#5"));
        assert!(err.to_string().contains("unknown length"));
    }
}
