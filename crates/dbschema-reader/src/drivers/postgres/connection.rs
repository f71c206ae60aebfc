//! `CatalogConnection` for an open `tokio_postgres::Client`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, Row};
use tracing::debug;

use crate::core::{CatalogConnection, RawRowSet, Value};
use crate::error::DriverError;
use crate::query::BoundQuery;

#[async_trait]
impl CatalogConnection for Client {
    async fn fetch(&self, query: &BoundQuery) -> Result<RawRowSet, DriverError> {
        let statement = self.prepare(&query.sql).await?;
        let params: Vec<&(dyn ToSql + Sync)> = query
            .params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();
        let rows = self.query(&statement, &params).await?;

        let mut raw = RawRowSet::new(
            statement
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        );
        for row in &rows {
            let mut values = Vec::with_capacity(statement.columns().len());
            for (idx, column) in statement.columns().iter().enumerate() {
                values.push(convert_pg_cell(row, idx, column.type_(), column.name())?);
            }
            raw.rows.push(values);
        }
        debug!("PostgreSQL catalog query returned {} rows", raw.len());
        Ok(raw)
    }
}

/// Decode one catalog cell by its wire type.
fn convert_pg_cell(row: &Row, idx: usize, ty: &Type, name: &str) -> Result<Value, DriverError> {
    let value: Value = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx)?.into(),
        Type::INT2 => row.try_get::<_, Option<i16>>(idx)?.map(i64::from).into(),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx)?.into(),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx)?.into(),
        Type::OID => row.try_get::<_, Option<u32>>(idx)?.map(i64::from).into(),
        Type::NUMERIC => row.try_get::<_, Option<Decimal>>(idx)?.into(),
        // "char" (relkind, contype) arrives as a single signed byte.
        Type::CHAR => row
            .try_get::<_, Option<i8>>(idx)?
            .map(|b| ((b as u8) as char).to_string())
            .into(),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            row.try_get::<_, Option<String>>(idx)?.into()
        }
        _ => row
            .try_get::<_, Option<String>>(idx)
            .map_err(|_| DriverError::decode(name, format!("unsupported type {}", ty)))?
            .into(),
    };
    Ok(value)
}
