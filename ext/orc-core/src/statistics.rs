//! Column statistics and their aggregation
//!
//! The storage engine reports one [`ColumnStatistics`] record per stripe and
//! column. [`ColumnStatistics::aggregate`] reduces them to a file level
//! summary:
//!
//! - `number_of_values`, `sum`, `false_count`, `true_count` and
//!   `total_length` add up
//! - `minimum` and `lower_bound` take the smallest value, `maximum` and
//!   `upper_bound` the largest
//! - `has_null` is true when any record has nulls
//! - absent fields are skipped
//!
//! Integer sums are exact. A total outside the `i64` range is carried as an
//! integral [`Value::Decimal`] and folds back to [`Value::Int`] once it fits.
//!
//! The reduction is commutative and associative, so records may be merged in
//! any grouping.

use num::{BigInt, ToPrimitive};

use crate::decimal::Decimal;
use crate::error::{OrcError, Result};
use crate::kind::{StatisticField, TypeKind};
use crate::logger::Logger;
use crate::value::Value;

/// Kind-tagged bag of optional statistic fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnStatistics {
    pub kind: Option<TypeKind>,
    pub number_of_values: Option<u64>,
    pub has_null: Option<bool>,
    pub minimum: Option<Value>,
    pub maximum: Option<Value>,
    pub sum: Option<Value>,
    pub lower_bound: Option<Value>,
    pub upper_bound: Option<Value>,
    pub false_count: Option<u64>,
    pub true_count: Option<u64>,
    pub total_length: Option<u64>,
}

fn merge_with<T: Clone>(lhs: &Option<T>, rhs: &Option<T>, f: impl FnOnce(&T, &T) -> T) -> Option<T> {
    match (lhs, rhs) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (Some(a), None) | (None, Some(a)) => Some(a.clone()),
        (None, None) => None,
    }
}

fn add_counts(lhs: Option<u64>, rhs: Option<u64>) -> Option<u64> {
    merge_with(&lhs, &rhs, |a, b| a.saturating_add(*b))
}

/// An integer sum as a big integer; decimals qualify only when integral
fn integral(value: &Value) -> Option<BigInt> {
    match value {
        Value::Int(i) => Some(BigInt::from(*i)),
        Value::Decimal(d) if d.exponent() >= 0 => {
            let exponent = u32::try_from(d.exponent()).ok()?;
            Some(d.signed_coefficient() * BigInt::from(10).pow(exponent))
        }
        _ => None,
    }
}

fn add_integer_sums(a: &Value, b: &Value) -> Option<Value> {
    let total = integral(a)? + integral(b)?;
    Some(match total.to_i64() {
        Some(total) => Value::Int(total),
        None => Value::Decimal(Decimal::from(total)),
    })
}

impl ColumnStatistics {
    /// An empty record for a column of `kind`
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Combine two records of the same column
    ///
    /// Records that both carry a kind must agree on it. Fields that are not
    /// legitimate for the resulting kind are dropped.
    pub fn merge(&self, other: &ColumnStatistics) -> Result<ColumnStatistics> {
        let kind = match (self.kind, other.kind) {
            (Some(a), Some(b)) if a != b => {
                return Err(OrcError::value(format!(
                    "Cannot merge statistics of a {} column with a {} column",
                    a, b
                )))
            }
            (a, b) => a.or(b),
        };

        let integer_sums = match kind {
            Some(kind) => kind.is_integer(),
            None => matches!(
                (&self.sum, &other.sum),
                (Some(Value::Int(_)), _) | (_, Some(Value::Int(_)))
            ),
        };
        let sum = match (&self.sum, &other.sum) {
            (Some(a), Some(b)) => {
                let sum = if integer_sums {
                    add_integer_sums(a, b)
                } else {
                    a.checked_add(b)
                };
                if sum.is_none() {
                    Logger::global().debug(|| {
                        format!(
                            "dropping sum: {} + {} is not representable",
                            a.type_name(),
                            b.type_name()
                        )
                    });
                }
                sum
            }
            (Some(a), None) | (None, Some(a)) => Some(a.clone()),
            (None, None) => None,
        };

        let merged = ColumnStatistics {
            kind,
            number_of_values: add_counts(self.number_of_values, other.number_of_values),
            has_null: merge_with(&self.has_null, &other.has_null, |a, b| *a || *b),
            minimum: merge_with(&self.minimum, &other.minimum, |a, b| a.min(b).clone()),
            maximum: merge_with(&self.maximum, &other.maximum, |a, b| a.max(b).clone()),
            sum,
            lower_bound: merge_with(&self.lower_bound, &other.lower_bound, |a, b| {
                a.min(b).clone()
            }),
            upper_bound: merge_with(&self.upper_bound, &other.upper_bound, |a, b| {
                a.max(b).clone()
            }),
            false_count: add_counts(self.false_count, other.false_count),
            true_count: add_counts(self.true_count, other.true_count),
            total_length: add_counts(self.total_length, other.total_length),
        };
        Ok(merged.restricted_to_kind())
    }

    /// Reduce per-stripe records into one summary
    ///
    /// An empty input yields an empty record without a kind.
    pub fn aggregate<'a, I>(records: I) -> Result<ColumnStatistics>
    where
        I: IntoIterator<Item = &'a ColumnStatistics>,
    {
        records
            .into_iter()
            .try_fold(ColumnStatistics::default(), |acc, record| acc.merge(record))
    }

    /// Drop the fields the engine never reports for this record's kind
    pub fn restricted_to_kind(mut self) -> Self {
        let Some(kind) = self.kind else {
            return self;
        };
        for field in StatisticField::ALL {
            if !kind.has_statistic(field) && self.is_present(field) {
                Logger::global().debug(|| format!("dropping {} from {} statistics", field, kind));
                self.clear(field);
            }
        }
        self
    }

    fn clear(&mut self, field: StatisticField) {
        match field {
            StatisticField::NumberOfValues => self.number_of_values = None,
            StatisticField::HasNull => self.has_null = None,
            StatisticField::Minimum => self.minimum = None,
            StatisticField::Maximum => self.maximum = None,
            StatisticField::Sum => self.sum = None,
            StatisticField::LowerBound => self.lower_bound = None,
            StatisticField::UpperBound => self.upper_bound = None,
            StatisticField::FalseCount => self.false_count = None,
            StatisticField::TrueCount => self.true_count = None,
            StatisticField::TotalLength => self.total_length = None,
        }
    }

    pub fn is_present(&self, field: StatisticField) -> bool {
        self.get(field).is_some()
    }

    /// A field as a [`Value`]; counts are integers, `has_null` a boolean
    pub fn get(&self, field: StatisticField) -> Option<Value> {
        let count = |c: Option<u64>| c.map(|c| Value::Int(i64::try_from(c).unwrap_or(i64::MAX)));
        match field {
            StatisticField::NumberOfValues => count(self.number_of_values),
            StatisticField::HasNull => self.has_null.map(Value::Boolean),
            StatisticField::Minimum => self.minimum.clone(),
            StatisticField::Maximum => self.maximum.clone(),
            StatisticField::Sum => self.sum.clone(),
            StatisticField::LowerBound => self.lower_bound.clone(),
            StatisticField::UpperBound => self.upper_bound.clone(),
            StatisticField::FalseCount => count(self.false_count),
            StatisticField::TrueCount => count(self.true_count),
            StatisticField::TotalLength => count(self.total_length),
        }
    }

    /// Present fields in declaration order
    pub fn fields(&self) -> Vec<(StatisticField, Value)> {
        StatisticField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
            .collect()
    }
}
