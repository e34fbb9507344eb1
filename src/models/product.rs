use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Spotlight list plus the reference rows needed to edit it.
///
/// Rows are passed through as the procedure returned them, like the
/// `product` of a write result; the columns belong to the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightOverview {
    pub products: Vec<Value>,
    pub customer_types: Vec<Value>,
    pub units: Vec<Value>,
}

/// Values written by a create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProductSpotlight {
    pub product_itemnum: String,
    pub customer_type: Option<i32>,
    pub unit_id: i32,
}

/// Which spotlight rows a PUT/DELETE addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerTypeSelector {
    /// No customer type given; the procedure's default applies.
    Unspecified,
    Value(i32),
}

impl CustomerTypeSelector {
    /// Parses a path segment; the literal `null` means unspecified.
    pub fn parse(segment: &str) -> Option<Self> {
        if segment == "null" {
            return Some(Self::Unspecified);
        }
        segment.parse().ok().map(Self::Value)
    }

    /// The value to bind, or `None` when the parameter must be omitted.
    ///
    /// With `zero_is_unspecified`, a value of `0` is omitted as well.
    pub fn bind_value(self, zero_is_unspecified: bool) -> Option<i32> {
        match self {
            Self::Unspecified => None,
            Self::Value(0) if zero_is_unspecified => None,
            Self::Value(n) => Some(n),
        }
    }
}

/// Outcome of a create or update.
///
/// Serializes to `{success, product}` when the procedure reported affected
/// rows, and to `false` when it reported nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductWriteResult {
    Written {
        success: bool,
        product: Option<Value>,
    },
    Unreported,
}

impl Serialize for ProductWriteResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Written<'a> {
            success: bool,
            product: &'a Option<Value>,
        }

        match self {
            Self::Written { success, product } => Written {
                success: *success,
                product,
            }
            .serialize(serializer),
            Self::Unreported => serializer.serialize_bool(false),
        }
    }
}
