//! Connection pool ownership and read-only query execution.

use crate::error::DbError;
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row};

/// Owns the MySQL connection pool for introspection and execution.
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Connect a pool to the given MySQL URL.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(DbError::Connect)?;
        Ok(Self { pool })
    }

    /// Borrow the underlying pool for metadata calls.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Execute an already-validated SELECT statement and decode each row
    /// into a column-name -> value JSON object.
    pub async fn run_select(&self, sql: &str) -> Result<Vec<Map<String, Value>>, DbError> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(sql, error = %e, "query execution failed");
                DbError::Execute(e)
            })?;

        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn row_to_json(row: &MySqlRow) -> Map<String, Value> {
    let mut object = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), decode_value(row, index));
    }
    object
}

/// Decode one cell, trying typed decodes before giving up. MySQL result
/// types that fit none of these (exotic spatial/blob values) come back as
/// NULL rather than failing the whole row.
fn decode_value(row: &MySqlRow, index: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<u64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
        return value
            .map(|v| Value::from(v.to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<chrono::NaiveDate>, _>(index) {
        return value
            .map(|v| Value::from(v.to_string()))
            .unwrap_or(Value::Null);
    }

    tracing::debug!(index, "column type not decodable, returning NULL");
    Value::Null
}
