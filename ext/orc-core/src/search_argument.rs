//! Predicates lowered for the storage engine
//!
//! A [`SearchArgument`] mirrors the shape of a [`Predicate`] but every leaf
//! literal has already been converted to the engine's native form, tagged
//! with the [`PredicateDataType`] the engine compares it as.

use std::cmp::Ordering;
use std::sync::Arc;

use jiff::tz::TimeZone;
use num::BigInt;
use ordered_float::OrderedFloat;

use crate::converters::{ConversionContext, ConverterRegistry};
use crate::error::{OrcError, Result};
use crate::kind::TypeKind;
use crate::logger::Logger;
use crate::predicate::{ColumnRef, Operator, Predicate, PredicateColumn};
use crate::value::{NativeValue, Value};

/// Comparison domain of a leaf literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateDataType {
    Long,
    Float,
    String,
    Date,
    Decimal,
    Timestamp,
    Boolean,
}

impl PredicateDataType {
    pub fn for_kind(kind: TypeKind) -> Result<Self> {
        Ok(match kind {
            TypeKind::Boolean => PredicateDataType::Boolean,
            TypeKind::Byte | TypeKind::Short | TypeKind::Int | TypeKind::Long => {
                PredicateDataType::Long
            }
            TypeKind::Float | TypeKind::Double => PredicateDataType::Float,
            TypeKind::Char | TypeKind::VarChar | TypeKind::String => PredicateDataType::String,
            TypeKind::Date => PredicateDataType::Date,
            TypeKind::Timestamp | TypeKind::TimestampInstant => PredicateDataType::Timestamp,
            TypeKind::Decimal => PredicateDataType::Decimal,
            other => {
                return Err(OrcError::type_error(format!(
                    "Unsupported type for a predicate literal: {}",
                    other
                )))
            }
        })
    }
}

/// Native literal of a predicate leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null(PredicateDataType),
    Boolean(bool),
    Long(i64),
    Float(OrderedFloat<f64>),
    String(Arc<str>),
    Date(i64),
    Timestamp { seconds: i64, nanos: i64 },
    Decimal { value: BigInt, precision: u32, scale: u32 },
}

impl Literal {
    pub fn data_type(&self) -> PredicateDataType {
        match self {
            Literal::Null(data_type) => *data_type,
            Literal::Boolean(_) => PredicateDataType::Boolean,
            Literal::Long(_) => PredicateDataType::Long,
            Literal::Float(_) => PredicateDataType::Float,
            Literal::String(_) => PredicateDataType::String,
            Literal::Date(_) => PredicateDataType::Date,
            Literal::Timestamp { .. } => PredicateDataType::Timestamp,
            Literal::Decimal { .. } => PredicateDataType::Decimal,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null(_))
    }

    /// The literal as a native value, `None` for null
    pub fn to_native(&self) -> Option<NativeValue> {
        Some(match self {
            Literal::Null(_) => return None,
            Literal::Boolean(b) => NativeValue::Boolean(*b),
            Literal::Long(i) => NativeValue::Long(*i),
            Literal::Float(f) => NativeValue::Double(*f),
            Literal::String(s) => NativeValue::String(s.clone()),
            Literal::Date(d) => NativeValue::Date(*d),
            Literal::Timestamp { seconds, nanos } => NativeValue::Timestamp {
                seconds: *seconds,
                nanos: *nanos,
            },
            Literal::Decimal { value, scale, .. } => NativeValue::Decimal {
                value: value.clone(),
                scale: *scale,
            },
        })
    }
}

/// Convert a leaf's literal to its native form
pub fn build_literal(
    column: &PredicateColumn,
    value: &Value,
    converters: &ConverterRegistry,
    timezone: &TimeZone,
) -> Result<Literal> {
    let kind = column.type_kind();
    let data_type = PredicateDataType::for_kind(kind)?;
    if value.is_null() {
        return Ok(Literal::Null(data_type));
    }

    let mut ctx = ConversionContext::new(timezone.clone());
    if let (Some(precision), Some(scale)) = (column.precision(), column.scale()) {
        ctx = ctx.with_decimal(precision, scale);
    }
    // Both timestamp kinds are lowered through the TIMESTAMP converter
    let converter_kind = match kind {
        TypeKind::TimestampInstant => TypeKind::Timestamp,
        other => other,
    };
    let native = converters.to_native(converter_kind, value, &ctx)?;

    Ok(match (data_type, native) {
        (PredicateDataType::Boolean, NativeValue::Boolean(b)) => Literal::Boolean(b),
        (PredicateDataType::Long, NativeValue::Long(i)) => Literal::Long(i),
        (PredicateDataType::Float, NativeValue::Double(f)) => Literal::Float(f),
        (PredicateDataType::String, NativeValue::String(s)) => Literal::String(s),
        (PredicateDataType::Date, NativeValue::Date(d)) => Literal::Date(d),
        (PredicateDataType::Timestamp, NativeValue::Timestamp { seconds, nanos }) => {
            Literal::Timestamp { seconds, nanos }
        }
        (PredicateDataType::Decimal, NativeValue::Decimal { value, scale }) => Literal::Decimal {
            value,
            precision: column.precision().unwrap_or_default(),
            scale,
        },
        (data_type, native) => {
            return Err(OrcError::type_error(format!(
                "Converter for {} produced a native {} value, expected {:?}",
                kind,
                native.type_name(),
                data_type
            )))
        }
    })
}

/// One comparison handed to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateLeaf {
    operator: Operator,
    column: ColumnRef,
    literal: Literal,
}

impl PredicateLeaf {
    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    pub fn data_type(&self) -> PredicateDataType {
        self.literal.data_type()
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    fn evaluate(&self, cell: Option<&NativeValue>) -> Option<bool> {
        let literal = self.literal.to_native()?;
        let ordering = cell?.compare(&literal)?;
        Some(match self.operator {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            _ => return None,
        })
    }
}

/// Lowered predicate tree
#[derive(Debug, Clone, PartialEq)]
pub enum SearchArgument {
    Leaf(PredicateLeaf),
    Not(Box<SearchArgument>),
    And(Box<SearchArgument>, Box<SearchArgument>),
    Or(Box<SearchArgument>, Box<SearchArgument>),
}

impl SearchArgument {
    /// Lower `predicate`, converting every literal through `converters`
    pub fn build(
        predicate: &Predicate,
        converters: &ConverterRegistry,
        timezone: &TimeZone,
    ) -> Result<Self> {
        let sarg = Self::lower(predicate, converters, timezone)?;
        Logger::global().debug(|| format!("lowered predicate {}", predicate));
        Ok(sarg)
    }

    fn lower(
        predicate: &Predicate,
        converters: &ConverterRegistry,
        timezone: &TimeZone,
    ) -> Result<Self> {
        let lower = |p: &Predicate| Self::lower(p, converters, timezone).map(Box::new);
        match predicate {
            Predicate::Not(inner) => Ok(SearchArgument::Not(lower(inner)?)),
            Predicate::And(lhs, rhs) => Ok(SearchArgument::And(lower(lhs)?, lower(rhs)?)),
            Predicate::Or(lhs, rhs) => Ok(SearchArgument::Or(lower(lhs)?, lower(rhs)?)),
            Predicate::Eq(column, value)
            | Predicate::Lt(column, value)
            | Predicate::Le(column, value) => Ok(SearchArgument::Leaf(PredicateLeaf {
                operator: predicate.operator(),
                column: column.column().clone(),
                literal: build_literal(column, value, converters, timezone)?,
            })),
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            SearchArgument::Leaf(leaf) => leaf.operator,
            SearchArgument::Not(_) => Operator::Not,
            SearchArgument::And(..) => Operator::And,
            SearchArgument::Or(..) => Operator::Or,
        }
    }

    /// Leaves in left to right order
    pub fn leaves(&self) -> Vec<&PredicateLeaf> {
        match self {
            SearchArgument::Leaf(leaf) => vec![leaf],
            SearchArgument::Not(inner) => inner.leaves(),
            SearchArgument::And(lhs, rhs) | SearchArgument::Or(lhs, rhs) => {
                let mut leaves = lhs.leaves();
                leaves.extend(rhs.leaves());
                leaves
            }
        }
    }

    /// Evaluate against one row with three-valued logic
    ///
    /// `lookup` returns the row's native value for a column, `None` for
    /// null. A comparison with a null operand, or between incomparable
    /// values, is unknown (`None`). `NOT` of unknown is unknown; `AND` is
    /// false when either side is false and `OR` is true when either side is
    /// true, regardless of unknowns.
    pub fn evaluate<F>(&self, lookup: &F) -> Option<bool>
    where
        F: Fn(&ColumnRef) -> Option<NativeValue>,
    {
        match self {
            SearchArgument::Leaf(leaf) => leaf.evaluate(lookup(&leaf.column).as_ref()),
            SearchArgument::Not(inner) => inner.evaluate(lookup).map(|b| !b),
            SearchArgument::And(lhs, rhs) => match (lhs.evaluate(lookup), rhs.evaluate(lookup)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            SearchArgument::Or(lhs, rhs) => match (lhs.evaluate(lookup), rhs.evaluate(lookup)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
        }
    }
}
