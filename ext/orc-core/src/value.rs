use bytes::Bytes;
use jiff::civil::Date;
use jiff::Zoned;
use num::BigInt;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::decimal::Decimal;

/// Application-level value of a single column cell
///
/// Values are totally ordered: variants rank in declaration order and compare
/// within a variant by value. Timestamps compare by instant, then by UTC
/// offset, then by zone name;
/// decimals compare numerically, then by exponent. Equality follows the same
/// order.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    String(Arc<str>),
    Binary(Bytes),
    Date(Date),
    Timestamp(Zoned),
    Decimal(Decimal),
}

/// Native on-disk representation exchanged with the storage engine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeValue {
    Boolean(bool),
    Long(i64),
    Double(OrderedFloat<f64>),
    String(Arc<str>),
    Binary(Bytes),
    /// Days since 1970-01-01
    Date(i64),
    /// Seconds since the UTC epoch plus nanoseconds within the second
    Timestamp { seconds: i64, nanos: i64 },
    /// `value * 10^-scale`
    Decimal { value: BigInt, scale: u32 },
}

impl Value {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Binary(_) => "Binary",
            Value::Date(_) => "Date",
            Value::Timestamp(_) => "Timestamp",
            Value::Decimal(_) => "Decimal",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::String(_) => 4,
            Value::Binary(_) => 5,
            Value::Date(_) => 6,
            Value::Timestamp(_) => 7,
            Value::Decimal(_) => 8,
        }
    }

    /// Exact sum of two values of the same numeric variant
    ///
    /// Returns `None` for mismatched or non-numeric variants and on integer
    /// overflow.
    pub fn checked_add(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.checked_add(*b).map(Value::Int),
            (Value::Float(a), Value::Float(b)) => Some(Value::Float(*a + *b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(Value::Decimal(a + b)),
            _ => None,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Binary(a), Value::Binary(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a
                .timestamp()
                .cmp(&b.timestamp())
                .then_with(|| a.offset().seconds().cmp(&b.offset().seconds()))
                .then_with(|| a.time_zone().iana_name().cmp(&b.time_zone().iana_name())),
            (Value::Decimal(a), Value::Decimal(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.hash(state),
            Value::String(s) => s.hash(state),
            Value::Binary(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Timestamp(ts) => {
                ts.timestamp().hash(state);
                ts.offset().seconds().hash(state);
                ts.time_zone().iana_name().hash(state);
            }
            Value::Decimal(d) => {
                d.hash(state);
                d.exponent().hash(state);
            }
        }
    }
}

impl NativeValue {
    /// Get the type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            NativeValue::Boolean(_) => "Boolean",
            NativeValue::Long(_) => "Long",
            NativeValue::Double(_) => "Double",
            NativeValue::String(_) => "String",
            NativeValue::Binary(_) => "Binary",
            NativeValue::Date(_) => "Date",
            NativeValue::Timestamp { .. } => "Timestamp",
            NativeValue::Decimal { .. } => "Decimal",
        }
    }

    /// Compare two native values of the same variant
    ///
    /// Decimals with different scales compare numerically. Mismatched variants
    /// are incomparable.
    pub fn compare(&self, other: &NativeValue) -> Option<Ordering> {
        match (self, other) {
            (NativeValue::Boolean(a), NativeValue::Boolean(b)) => Some(a.cmp(b)),
            (NativeValue::Long(a), NativeValue::Long(b)) => Some(a.cmp(b)),
            (NativeValue::Double(a), NativeValue::Double(b)) => Some(a.cmp(b)),
            (NativeValue::String(a), NativeValue::String(b)) => Some(a.cmp(b)),
            (NativeValue::Binary(a), NativeValue::Binary(b)) => Some(a.cmp(b)),
            (NativeValue::Date(a), NativeValue::Date(b)) => Some(a.cmp(b)),
            (
                NativeValue::Timestamp {
                    seconds: s1,
                    nanos: n1,
                },
                NativeValue::Timestamp {
                    seconds: s2,
                    nanos: n2,
                },
            ) => Some((s1, n1).cmp(&(s2, n2))),
            (
                NativeValue::Decimal {
                    value: v1,
                    scale: s1,
                },
                NativeValue::Decimal {
                    value: v2,
                    scale: s2,
                },
            ) => {
                let lhs = Decimal::from_scaled(v1.clone(), *s1);
                let rhs = Decimal::from_scaled(v2.clone(), *s2);
                Some(lhs.cmp(&rhs))
            }
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(OrderedFloat(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Binary(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}

impl From<Zoned> for Value {
    fn from(value: Zoned) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
