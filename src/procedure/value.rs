use serde::Serialize;

/// A typed, nullable bind value.
///
/// Values are always sent as bind parameters, never spliced into SQL text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SqlValue {
    Int(Option<i32>),
    VarChar(Option<String>),
    Bit(Option<bool>),
    DateTime(Option<jiff::Timestamp>),
}

impl SqlValue {
    /// Integer payload, if this is a non-null `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            SqlValue::Int(v) => *v,
            _ => None,
        }
    }

    /// String payload, if this is a non-null `VarChar`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::VarChar(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bit(v) => *v,
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<jiff::Timestamp> {
        match self {
            SqlValue::DateTime(v) => *v,
            _ => None,
        }
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(Some(value))
    }
}

impl From<Option<i32>> for SqlValue {
    fn from(value: Option<i32>) -> Self {
        SqlValue::Int(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::VarChar(Some(value))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        SqlValue::VarChar(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bit(Some(value))
    }
}

impl From<Option<jiff::Timestamp>> for SqlValue {
    fn from(value: Option<jiff::Timestamp>) -> Self {
        SqlValue::DateTime(value)
    }
}
