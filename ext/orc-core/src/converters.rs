//! Conversion between engine native values and application values
//!
//! Every non-compound kind has a conversion. DATE, DECIMAL, TIMESTAMP and
//! TIMESTAMP_INSTANT go through replaceable [`Converter`]s held in a
//! [`ConverterRegistry`]; the remaining kinds map one to one.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jiff::civil::{date, Date};
use jiff::tz::{Offset, TimeZone};
use jiff::{Span, Timestamp};
use num::{BigInt, BigUint, Zero};
use ordered_float::OrderedFloat;

use crate::decimal::{ten_pow, Decimal};
use crate::error::{OrcError, Result};
use crate::kind::TypeKind;
use crate::logger::Logger;
use crate::schema::TypeDescription;
use crate::value::{NativeValue, Value};

const EPOCH_DAY: Date = date(1970, 1, 1);
const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MICRO: i64 = 1_000;

/// Per-column parameters a converter may need
#[derive(Debug, Clone)]
pub struct ConversionContext {
    timezone: TimeZone,
    precision: Option<u32>,
    scale: Option<u32>,
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::new(TimeZone::UTC)
    }
}

impl ConversionContext {
    pub fn new(timezone: TimeZone) -> Self {
        Self {
            timezone,
            precision: None,
            scale: None,
        }
    }

    /// Context for a column, picking up decimal precision and scale
    pub fn for_type(descr: &TypeDescription, timezone: TimeZone) -> Self {
        Self {
            timezone,
            precision: descr.precision(),
            scale: descr.scale(),
        }
    }

    pub fn with_decimal(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn timezone(&self) -> &TimeZone {
        &self.timezone
    }

    /// `(precision, scale)`, required by decimal conversion
    pub fn decimal_params(&self) -> Result<(u32, u32)> {
        match (self.precision, self.scale) {
            (Some(precision), Some(scale)) => Ok((precision, scale)),
            _ => Err(OrcError::value(
                "Decimal conversion requires precision and scale",
            )),
        }
    }
}

/// Resolve an IANA zone name or a fixed `+HH:MM` / `-HH` offset
pub fn resolve_time_zone(name: &str) -> Result<TimeZone> {
    if name.eq_ignore_ascii_case("utc") {
        return Ok(TimeZone::UTC);
    }
    match name.as_bytes().first() {
        Some(b'+') => parse_fixed_offset(name, false),
        Some(b'-') => parse_fixed_offset(name, true),
        _ => TimeZone::get(name)
            .map_err(|e| OrcError::value(format!("Unknown time zone {:?}: {}", name, e))),
    }
}

fn parse_fixed_offset(name: &str, negative: bool) -> Result<TimeZone> {
    let invalid = || OrcError::value(format!("Invalid UTC offset {:?}", name));
    let body = &name[1..];
    let (hours, minutes) = match body.split_once(':') {
        Some((h, m)) => (h, m),
        None if body.len() == 4 => body.split_at(2),
        None => (body, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 25 || minutes > 59 {
        return Err(invalid());
    }
    let seconds = (hours * 60 + minutes) * 60;
    let offset = Offset::from_seconds(if negative { -seconds } else { seconds })
        .map_err(|_| invalid())?;
    Ok(TimeZone::fixed(offset))
}

/// Bidirectional transform for one kind
pub trait Converter: Send + Sync {
    /// Build the application value from the engine's native value
    fn from_native(&self, native: &NativeValue, ctx: &ConversionContext) -> Result<Value>;

    /// Produce the engine's native value from an application value
    fn to_native(&self, value: &Value, ctx: &ConversionContext) -> Result<NativeValue>;
}

fn unexpected_native(kind: TypeKind, native: &NativeValue) -> OrcError {
    OrcError::type_error(format!(
        "Native {} value cannot back a {} column",
        native.type_name(),
        kind
    ))
}

fn unexpected_value(kind: TypeKind, value: &Value) -> OrcError {
    OrcError::type_error(format!(
        "{} value cannot be stored in a {} column",
        value.type_name(),
        kind
    ))
}

/// Mismatch error for converters shared by several kinds
fn not_a_timestamp(type_name: &str, native: bool) -> OrcError {
    let side = if native { "Native " } else { "" };
    OrcError::type_error(format!("{}{} value is not a timestamp", side, type_name))
}

/// Days since 1970-01-01 to a calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct DateConverter;

impl Converter for DateConverter {
    fn from_native(&self, native: &NativeValue, _ctx: &ConversionContext) -> Result<Value> {
        match native {
            NativeValue::Date(days) => {
                let span = Span::new().try_days(*days)?;
                Ok(Value::Date(EPOCH_DAY.checked_add(span)?))
            }
            other => Err(unexpected_native(TypeKind::Date, other)),
        }
    }

    fn to_native(&self, value: &Value, _ctx: &ConversionContext) -> Result<NativeValue> {
        match value {
            Value::Date(d) => Ok(NativeValue::Date(i64::from(EPOCH_DAY.until(*d)?.get_days()))),
            other => Err(unexpected_value(TypeKind::Date, other)),
        }
    }
}

/// `(seconds, nanos)` since the UTC epoch to a zoned date-time
///
/// Precision is one microsecond in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampConverter;

impl Converter for TimestampConverter {
    fn from_native(&self, native: &NativeValue, ctx: &ConversionContext) -> Result<Value> {
        match native {
            NativeValue::Timestamp { seconds, nanos } => {
                let micros = seconds
                    .checked_mul(1_000_000)
                    .and_then(|m| m.checked_add(nanos.div_euclid(NANOS_PER_MICRO)))
                    .ok_or_else(|| {
                        OrcError::conversion(format!(
                            "Timestamp ({}, {}) out of range",
                            seconds, nanos
                        ))
                    })?;
                let instant = Timestamp::from_microsecond(micros)?;
                Ok(Value::Timestamp(instant.to_zoned(ctx.timezone().clone())))
            }
            other => Err(not_a_timestamp(other.type_name(), true)),
        }
    }

    fn to_native(&self, value: &Value, _ctx: &ConversionContext) -> Result<NativeValue> {
        match value {
            Value::Timestamp(zoned) => {
                let total = zoned.timestamp().as_nanosecond();
                let seconds = i64::try_from(total.div_euclid(NANOS_PER_SECOND)).map_err(|_| {
                    OrcError::conversion(format!("Timestamp {} out of range", zoned))
                })?;
                // 0 <= subsec < 1e9
                let subsec = total.rem_euclid(NANOS_PER_SECOND) as i64;
                Ok(NativeValue::Timestamp {
                    seconds,
                    nanos: subsec - subsec % NANOS_PER_MICRO,
                })
            }
            other => Err(not_a_timestamp(other.type_name(), false)),
        }
    }
}

/// Scaled integer to an exact [`Decimal`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalConverter;

impl Converter for DecimalConverter {
    fn from_native(&self, native: &NativeValue, _ctx: &ConversionContext) -> Result<Value> {
        match native {
            NativeValue::Decimal { value, scale } => {
                Ok(Value::Decimal(Decimal::from_scaled(value.clone(), *scale)))
            }
            other => Err(unexpected_native(TypeKind::Decimal, other)),
        }
    }

    fn to_native(&self, value: &Value, ctx: &ConversionContext) -> Result<NativeValue> {
        let decimal = match value {
            Value::Decimal(d) => d,
            other => {
                return Err(OrcError::conversion(format!(
                    "{} value cannot be cast as a decimal",
                    other.type_name()
                )))
            }
        };
        let (precision, scale) = ctx.decimal_params()?;
        let tuple = decimal.quantize(scale, precision)?.as_tuple();

        let mut integer = tuple
            .digits
            .iter()
            .rev()
            .enumerate()
            .fold(BigUint::zero(), |acc, (exp, digit)| {
                acc + BigUint::from(*digit) * ten_pow(exp as u64)
            });
        if tuple.exponent > 0 {
            integer *= ten_pow(tuple.exponent.unsigned_abs());
        }
        let mut value = BigInt::from(integer);
        if tuple.sign == 1 {
            value = -value;
        }
        Ok(NativeValue::Decimal { value, scale })
    }
}

/// One to one mapping for kinds without a dedicated converter
#[derive(Debug, Clone, Copy)]
struct PrimitiveConverter {
    kind: TypeKind,
}

impl Converter for PrimitiveConverter {
    fn from_native(&self, native: &NativeValue, _ctx: &ConversionContext) -> Result<Value> {
        use TypeKind::*;
        match (self.kind, native) {
            (Boolean, NativeValue::Boolean(b)) => Ok(Value::Boolean(*b)),
            (Byte | Short | Int | Long, NativeValue::Long(i)) => Ok(Value::Int(*i)),
            (Float | Double, NativeValue::Double(f)) => Ok(Value::Float(*f)),
            (String | VarChar | Char, NativeValue::String(s)) => Ok(Value::String(s.clone())),
            (Binary, NativeValue::Binary(b)) => Ok(Value::Binary(b.clone())),
            (kind, other) => Err(unexpected_native(kind, other)),
        }
    }

    fn to_native(&self, value: &Value, _ctx: &ConversionContext) -> Result<NativeValue> {
        use TypeKind::*;
        match (self.kind, value) {
            (Boolean, Value::Boolean(b)) => Ok(NativeValue::Boolean(*b)),
            (Byte | Short | Int | Long, Value::Int(i)) => Ok(NativeValue::Long(*i)),
            (Float | Double, Value::Float(f)) => Ok(NativeValue::Double(*f)),
            (Float | Double, Value::Int(i)) => Ok(NativeValue::Double(OrderedFloat(*i as f64))),
            (String | VarChar | Char, Value::String(s)) => Ok(NativeValue::String(s.clone())),
            (Binary, Value::Binary(b)) => Ok(NativeValue::Binary(b.clone())),
            (kind, other) => Err(unexpected_value(kind, other)),
        }
    }
}

/// Converters keyed by kind
///
/// Starts with defaults for DATE, DECIMAL, TIMESTAMP and TIMESTAMP_INSTANT.
/// An override replaces the default for its kind entirely.
#[derive(Clone)]
pub struct ConverterRegistry {
    converters: HashMap<TypeKind, Arc<dyn Converter>>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let timestamp: Arc<dyn Converter> = Arc::new(TimestampConverter);
        let mut converters: HashMap<TypeKind, Arc<dyn Converter>> = HashMap::new();
        converters.insert(TypeKind::Date, Arc::new(DateConverter));
        converters.insert(TypeKind::Decimal, Arc::new(DecimalConverter));
        converters.insert(TypeKind::Timestamp, timestamp.clone());
        converters.insert(TypeKind::TimestampInstant, timestamp);
        Self { converters }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.converters.keys().collect();
        kinds.sort();
        f.debug_struct("ConverterRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `converter` for `kind`, returning the one it replaces
    pub fn register(
        &mut self,
        kind: TypeKind,
        converter: Arc<dyn Converter>,
    ) -> Result<Option<Arc<dyn Converter>>> {
        if kind.is_compound() {
            return Err(OrcError::type_error(format!(
                "Converters cannot be registered for {}",
                kind
            )));
        }
        let replaced = self.converters.insert(kind, converter);
        if replaced.is_some() {
            Logger::global().warn(|| format!("replacing the converter for {}", kind));
        }
        Ok(replaced)
    }

    pub fn with_override(mut self, kind: TypeKind, converter: Arc<dyn Converter>) -> Result<Self> {
        self.register(kind, converter)?;
        Ok(self)
    }

    pub fn get(&self, kind: TypeKind) -> Option<&Arc<dyn Converter>> {
        self.converters.get(&kind)
    }

    pub fn from_native(
        &self,
        kind: TypeKind,
        native: &NativeValue,
        ctx: &ConversionContext,
    ) -> Result<Value> {
        match self.converters.get(&kind) {
            Some(converter) => converter.from_native(native, ctx),
            None => Self::primitive(kind)?.from_native(native, ctx),
        }
    }

    pub fn to_native(
        &self,
        kind: TypeKind,
        value: &Value,
        ctx: &ConversionContext,
    ) -> Result<NativeValue> {
        match self.converters.get(&kind) {
            Some(converter) => converter.to_native(value, ctx),
            None => Self::primitive(kind)?.to_native(value, ctx),
        }
    }

    fn primitive(kind: TypeKind) -> Result<PrimitiveConverter> {
        if kind.is_compound() {
            return Err(OrcError::type_error(format!(
                "No scalar conversion for {}",
                kind
            )));
        }
        Ok(PrimitiveConverter { kind })
    }
}
