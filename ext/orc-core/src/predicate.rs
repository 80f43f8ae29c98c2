//! Boolean filter expressions for predicate pushdown
//!
//! Leaves compare a [`PredicateColumn`] against a literal [`Value`] with one of
//! the three primitive comparisons `EQ`, `LT` and `LE`. The other comparisons
//! are rewritten on construction:
//!
//! | built with | stored as    |
//! |------------|--------------|
//! | `ne(v)`    | `NOT(EQ v)`  |
//! | `gt(v)`    | `NOT(LE v)`  |
//! | `ge(v)`    | `NOT(LT v)`  |
//!
//! Expressions are immutable. `and`, `or` and `not` (or `&`, `|`, `!`)
//! consume their operands and return a new root.
//!
//! ```
//! use orc_core::{PredicateColumn, TypeKind};
//!
//! let num = PredicateColumn::named(TypeKind::Int, "num")?;
//! let name = PredicateColumn::named(TypeKind::String, "name")?;
//! let pred = num.gt(10) & (name.eq("x") | !num.le(100));
//! assert_eq!(pred.to_string(), "(NOT (num <= 10) AND (name = \"x\" OR NOT (num <= 100)))");
//! # Ok::<(), orc_core::OrcError>(())
//! ```

use std::fmt;
use std::ops;

use crate::error::{OrcError, Result};
use crate::kind::TypeKind;
use crate::schema::{quote_field_name, TypeDescription};
use crate::value::Value;

/// Operator codes shared with the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Operator {
    Not = 0,
    Or = 1,
    And = 2,
    Eq = 3,
    Lt = 4,
    Le = 5,
}

impl Operator {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(code: i32) -> Result<Self> {
        Ok(match code {
            0 => Operator::Not,
            1 => Operator::Or,
            2 => Operator::And,
            3 => Operator::Eq,
            4 => Operator::Lt,
            5 => Operator::Le,
            _ => return Err(OrcError::value(format!("Invalid operator code: {}", code))),
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Not => "NOT",
            Operator::Or => "OR",
            Operator::And => "AND",
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Le => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How a predicate leaf addresses its column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    /// Dotted field path
    Name(String),
    /// Column id
    Index(u64),
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => f.write_str(&quote_field_name(name)),
            ColumnRef::Index(idx) => write!(f, "#{}", idx),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<u64> for ColumnRef {
    fn from(index: u64) -> Self {
        ColumnRef::Index(index)
    }
}

/// A typed reference to one column, usable on the left of a comparison
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateColumn {
    column: ColumnRef,
    type_kind: TypeKind,
    precision: Option<u32>,
    scale: Option<u32>,
}

impl PredicateColumn {
    /// Validate and build a column reference
    ///
    /// Exactly one of `name` and `index` must be given. Binary and compound
    /// kinds cannot be compared and are rejected with a type error. Decimal
    /// columns need `precision` and `scale`; other kinds ignore them.
    pub fn new(
        type_kind: TypeKind,
        name: Option<String>,
        index: Option<u64>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Result<Self> {
        if !type_kind.is_comparable() {
            return Err(OrcError::type_error(format!(
                "Invalid type for PredicateColumn: {}",
                type_kind
            )));
        }
        let column = match (name, index) {
            (Some(name), None) => ColumnRef::Name(name),
            (None, Some(index)) => ColumnRef::Index(index),
            (Some(_), Some(_)) => {
                return Err(OrcError::value(
                    "Only one of the name or index parameter must be given",
                ))
            }
            (None, None) => {
                return Err(OrcError::value(
                    "Either name or index parameter must be given",
                ))
            }
        };
        let (precision, scale) = if type_kind == TypeKind::Decimal {
            match (precision, scale) {
                (Some(precision), Some(scale)) => {
                    TypeDescription::check_decimal(precision, scale)?;
                    (Some(precision), Some(scale))
                }
                _ => {
                    return Err(OrcError::value(
                        "Both precision and scale must be set for decimal columns",
                    ))
                }
            }
        } else {
            (None, None)
        };
        Ok(Self {
            column,
            type_kind,
            precision,
            scale,
        })
    }

    pub fn named<S: Into<String>>(type_kind: TypeKind, name: S) -> Result<Self> {
        Self::new(type_kind, Some(name.into()), None, None, None)
    }

    pub fn indexed(type_kind: TypeKind, index: u64) -> Result<Self> {
        Self::new(type_kind, None, Some(index), None, None)
    }

    pub fn decimal_named<S: Into<String>>(name: S, precision: u32, scale: u32) -> Result<Self> {
        Self::new(
            TypeKind::Decimal,
            Some(name.into()),
            None,
            Some(precision),
            Some(scale),
        )
    }

    pub fn decimal_indexed(index: u64, precision: u32, scale: u32) -> Result<Self> {
        Self::new(
            TypeKind::Decimal,
            None,
            Some(index),
            Some(precision),
            Some(scale),
        )
    }

    /// Reference a schema column by its dotted path, taking kind, precision
    /// and scale from the schema
    pub fn from_schema(schema: &TypeDescription, path: &str) -> Result<Self> {
        let column_id = schema.find_column_id(path)?;
        let descr = schema.find_type(column_id)?;
        Self::new(
            descr.kind(),
            Some(path.to_string()),
            None,
            descr.precision(),
            descr.scale(),
        )
    }

    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    pub fn name(&self) -> Option<&str> {
        match &self.column {
            ColumnRef::Name(name) => Some(name),
            ColumnRef::Index(_) => None,
        }
    }

    pub fn index(&self) -> Option<u64> {
        match self.column {
            ColumnRef::Index(idx) => Some(idx),
            ColumnRef::Name(_) => None,
        }
    }

    pub fn type_kind(&self) -> TypeKind {
        self.type_kind
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn scale(&self) -> Option<u32> {
        self.scale
    }

    pub fn eq<V: Into<Value>>(&self, value: V) -> Predicate {
        Predicate::Eq(self.clone(), value.into())
    }

    pub fn ne<V: Into<Value>>(&self, value: V) -> Predicate {
        !self.eq(value)
    }

    pub fn lt<V: Into<Value>>(&self, value: V) -> Predicate {
        Predicate::Lt(self.clone(), value.into())
    }

    pub fn le<V: Into<Value>>(&self, value: V) -> Predicate {
        Predicate::Le(self.clone(), value.into())
    }

    pub fn gt<V: Into<Value>>(&self, value: V) -> Predicate {
        !self.le(value)
    }

    pub fn ge<V: Into<Value>>(&self, value: V) -> Predicate {
        !self.lt(value)
    }
}

/// Boolean expression tree over column comparisons
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(PredicateColumn, Value),
    Lt(PredicateColumn, Value),
    Le(PredicateColumn, Value),
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn operator(&self) -> Operator {
        match self {
            Predicate::Eq(..) => Operator::Eq,
            Predicate::Lt(..) => Operator::Lt,
            Predicate::Le(..) => Operator::Le,
            Predicate::Not(_) => Operator::Not,
            Predicate::And(..) => Operator::And,
            Predicate::Or(..) => Operator::Or,
        }
    }

    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    /// Column and literal of a comparison leaf
    pub fn comparison(&self) -> Option<(&PredicateColumn, &Value)> {
        match self {
            Predicate::Eq(col, value) | Predicate::Lt(col, value) | Predicate::Le(col, value) => {
                Some((col, value))
            }
            _ => None,
        }
    }

    /// Visit every comparison leaf, left to right
    pub fn leaves(&self) -> Vec<(Operator, &PredicateColumn, &Value)> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(Operator, &'a PredicateColumn, &'a Value)>) {
        match self {
            Predicate::Not(inner) => inner.collect_leaves(out),
            Predicate::And(lhs, rhs) | Predicate::Or(lhs, rhs) => {
                lhs.collect_leaves(out);
                rhs.collect_leaves(out);
            }
            leaf => {
                if let Some((col, value)) = leaf.comparison() {
                    out.push((leaf.operator(), col, value));
                }
            }
        }
    }
}

impl ops::BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        self.and(rhs)
    }
}

impl ops::BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        self.or(rhs)
    }
}

impl ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }
}

fn fmt_literal(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Null => f.write_str("NULL"),
        Value::Boolean(b) => write!(f, "{}", b),
        Value::Int(i) => write!(f, "{}", i),
        Value::Float(v) => write!(f, "{}", v),
        Value::String(s) => write!(f, "{:?}", s),
        Value::Binary(b) => write!(f, "{:?}", b),
        Value::Date(d) => write!(f, "{}", d),
        Value::Timestamp(ts) => write!(f, "{}", ts),
        Value::Decimal(d) => write!(f, "{}", d),
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Not(inner) => write!(f, "NOT ({})", inner),
            Predicate::And(lhs, rhs) => write!(f, "({} AND {})", lhs, rhs),
            Predicate::Or(lhs, rhs) => write!(f, "({} OR {})", lhs, rhs),
            leaf => {
                if let Some((col, value)) = leaf.comparison() {
                    write!(f, "{} {} ", col.column(), leaf.operator())?;
                    fmt_literal(value, f)?;
                }
                Ok(())
            }
        }
    }
}
