use diesel::QueryableByName;
use diesel::sql_types::{Integer, Jsonb, Nullable};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// One row of the procedure wire contract.
///
/// A row either carries a `record` belonging to result set `result_set`, or an
/// affected-row report in `rows_affected`.
#[derive(Debug, Clone, PartialEq, QueryableByName)]
pub struct ProcedureRow {
    #[diesel(sql_type = Integer)]
    pub result_set: i32,
    #[diesel(sql_type = Nullable<Integer>)]
    pub rows_affected: Option<i32>,
    #[diesel(sql_type = Nullable<Jsonb>)]
    pub record: Option<Value>,
}

impl ProcedureRow {
    pub fn record(result_set: i32, record: Value) -> Self {
        Self {
            result_set,
            rows_affected: None,
            record: Some(record),
        }
    }

    pub fn affected(rows_affected: i32) -> Self {
        Self {
            result_set: 0,
            rows_affected: Some(rows_affected),
            record: None,
        }
    }
}

/// Ordered result sets and affected-row reports of one procedure call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcedureResult {
    procedure: String,
    pub recordsets: Vec<Vec<Value>>,
    pub rows_affected: Vec<u64>,
}

impl ProcedureResult {
    pub fn new(procedure: impl Into<String>) -> Self {
        Self {
            procedure: procedure.into(),
            recordsets: Vec::new(),
            rows_affected: Vec::new(),
        }
    }

    /// Groups raw rows into result sets, keeping row order within each set.
    pub fn from_rows(procedure: impl Into<String>, rows: Vec<ProcedureRow>) -> AppResult<Self> {
        let mut result = Self::new(procedure);

        for row in rows {
            if let Some(affected) = row.rows_affected {
                result.rows_affected.push(u64::try_from(affected).unwrap_or(0));
            }

            if let Some(record) = row.record {
                let index = usize::try_from(row.result_set).map_err(|_| AppError::Internal {
                    source: anyhow::anyhow!(
                        "{} returned negative result set index {}",
                        result.procedure,
                        row.result_set
                    ),
                })?;
                result.push_record(index, record);
            }
        }

        Ok(result)
    }

    /// Appends a row to result set `index`, creating empty sets before it.
    pub fn push_record(&mut self, index: usize, record: Value) {
        if self.recordsets.len() <= index {
            self.recordsets.resize_with(index + 1, Vec::new);
        }
        self.recordsets[index].push(record);
    }

    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Rows of result set `index`; empty when the procedure returned fewer sets.
    pub fn recordset(&self, index: usize) -> &[Value] {
        self.recordsets
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn first(&self, index: usize) -> Option<&Value> {
        self.recordset(index).first()
    }

    /// Decodes every row of result set `index`.
    pub fn decode<T: DeserializeOwned>(&self, index: usize) -> AppResult<Vec<T>> {
        self.recordset(index)
            .iter()
            .map(|row| self.decode_row(index, row))
            .collect()
    }

    fn decode_row<T: DeserializeOwned>(&self, index: usize, row: &Value) -> AppResult<T> {
        T::deserialize(row).map_err(|source| AppError::Decode {
            procedure: self.procedure.clone(),
            index,
            source,
        })
    }

    /// First affected-row report, if the procedure emitted one.
    pub fn first_affected(&self) -> Option<u64> {
        self.rows_affected.first().copied()
    }

    /// Whether the first affected-row report is non-zero.
    pub fn affected(&self) -> bool {
        self.first_affected().is_some_and(|n| n > 0)
    }
}
