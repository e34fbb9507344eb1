use std::fmt;

use serde::Serialize;

use super::SqlValue;

/// A named bind parameter of a procedure call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureParam {
    pub name: &'static str,
    pub value: SqlValue,
}

/// Description of a single stored procedure invocation.
///
/// Schema, procedure and parameter names are `'static` so they can only come
/// from identifiers in the source, never from request data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    schema: &'static str,
    name: &'static str,
    params: Vec<ProcedureParam>,
}

impl ProcedureCall {
    pub fn new(schema: &'static str, name: &'static str) -> Self {
        Self {
            schema,
            name,
            params: Vec::new(),
        }
    }

    /// Adds a bind parameter. Parameters keep their insertion order.
    pub fn input(mut self, name: &'static str, value: impl Into<SqlValue>) -> Self {
        self.params.push(ProcedureParam {
            name,
            value: value.into(),
        });
        self
    }

    /// Adds the parameter only when a value is present, so the procedure's
    /// declared default applies otherwise.
    pub fn input_opt<V: Into<SqlValue>>(self, name: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.input(name, value),
            None => self,
        }
    }

    pub fn schema(&self) -> &'static str {
        self.schema
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &[ProcedureParam] {
        &self.params
    }

    /// Looks up a bound parameter by name.
    pub fn param(&self, name: &str) -> Option<&SqlValue> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .map(|param| &param.value)
    }

    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Renders the Postgres statement using named argument notation.
    pub fn to_sql(&self) -> String {
        let args = self
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| format!("{} => ${}", param.name, i + 1))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "SELECT result_set, rows_affected, record FROM {}.{}({})",
            self.schema, self.name, args
        )
    }
}

impl fmt::Display for ProcedureCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema)?;
        f.write_str(".")?;
        f.write_str(self.name)
    }
}
