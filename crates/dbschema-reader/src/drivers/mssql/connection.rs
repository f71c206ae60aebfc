//! `CatalogConnection` for an open Tiberius client.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tiberius::{Client, ColumnData, Config, Query, Row};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

use crate::core::{CatalogConnection, RawRowSet, Value};
use crate::error::DriverError;
use crate::query::BoundQuery;

/// Tiberius client wrapped for shared use.
///
/// Tiberius needs `&mut Client` per query, so queries on one connection
/// are serialized.
pub struct MssqlCatalogConnection {
    client: Mutex<Client<Compat<TcpStream>>>,
}

impl MssqlCatalogConnection {
    /// Wrap an already-connected client.
    pub fn new(client: Client<Compat<TcpStream>>) -> Self {
        Self {
            client: Mutex::new(client),
        }
    }

    /// Open a TCP connection and log in.
    pub async fn connect(config: Config) -> Result<Self, DriverError> {
        let addr = config.get_addr();
        let tcp = TcpStream::connect(addr.clone())
            .await
            .map_err(|e| tiberius::error::Error::Io {
                kind: e.kind(),
                message: e.to_string(),
            })?;
        tcp.set_nodelay(true).ok();
        let client = Client::connect(config, tcp.compat_write()).await?;
        info!("Connected to SQL Server at {}", addr);
        Ok(Self::new(client))
    }

    /// Unwrap the client, handing ownership back to the caller.
    pub fn into_inner(self) -> Client<Compat<TcpStream>> {
        self.client.into_inner()
    }
}

#[async_trait]
impl CatalogConnection for MssqlCatalogConnection {
    async fn fetch(&self, query: &BoundQuery) -> Result<RawRowSet, DriverError> {
        let mut q = Query::new(query.sql.as_str());
        for param in &query.params {
            q.bind(param.clone());
        }

        let mut client = self.client.lock().await;
        let mut stream = q.query(&mut *client).await?;
        let columns: Vec<String> = stream
            .columns()
            .await?
            .map(|cols| cols.iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows = stream.into_first_result().await?;

        let mut raw = RawRowSet::new(columns);
        for row in &rows {
            raw.rows.push(convert_row(row)?);
        }
        debug!("SQL Server catalog query returned {} rows", raw.len());
        Ok(raw)
    }
}

/// Decode every cell of a row by its TDS type.
fn convert_row(row: &Row) -> Result<Vec<Value>, DriverError> {
    row.cells()
        .map(|(column, data)| convert_cell(column.name(), data))
        .collect()
}

fn convert_cell(name: &str, data: &ColumnData<'static>) -> Result<Value, DriverError> {
    let value: Value = match data {
        ColumnData::Bit(v) => (*v).into(),
        ColumnData::U8(v) => v.map(i64::from).into(),
        ColumnData::I16(v) => v.map(i64::from).into(),
        ColumnData::I32(v) => (*v).into(),
        ColumnData::I64(v) => (*v).into(),
        ColumnData::String(v) => v.as_ref().map(|s| s.to_string()).into(),
        ColumnData::Numeric(Some(n)) => {
            Decimal::try_from_i128_with_scale(n.value(), u32::from(n.scale()))
                .map(Value::Decimal)
                .unwrap_or_else(|_| Value::Wide(digits_with_scale(n.value(), n.scale())))
        }
        ColumnData::Numeric(None) => Value::Null,
        ColumnData::Binary(v) => v
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .into(),
        other => {
            return Err(DriverError::decode(
                name,
                format!("unsupported catalog value {:?}", other),
            ))
        }
    };
    Ok(value)
}

/// Render an unscaled TDS numeric, e.g. `(12345, 2)` as `123.45`.
fn digits_with_scale(value: i128, scale: u8) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let digits = value.unsigned_abs().to_string();
    let scale = usize::from(scale);
    if scale == 0 {
        return format!("{}{}", sign, digits);
    }
    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    format!("{}{}.{}", sign, int_part, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_38_values_keep_their_digits() {
        let max = 10i128.pow(38) - 1;
        assert_eq!(digits_with_scale(max, 0), "9".repeat(38));
        assert_eq!(digits_with_scale(-max, 0), format!("-{}", "9".repeat(38)));
        assert!(Decimal::try_from_i128_with_scale(max, 0).is_err());
    }

    #[test]
    fn test_scaled_digits() {
        assert_eq!(digits_with_scale(12345, 2), "123.45");
        assert_eq!(digits_with_scale(-5, 3), "-0.005");
    }
}
