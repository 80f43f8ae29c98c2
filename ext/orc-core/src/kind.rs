use std::fmt;

use crate::error::{OrcError, Result};

/// The type kinds of an ORC schema
///
/// Discriminants match the storage engine's numbering, so `kind as i32` can be
/// handed across the engine boundary unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum TypeKind {
    Boolean = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    String = 7,
    Binary = 8,
    Timestamp = 9,
    List = 10,
    Map = 11,
    Struct = 12,
    Union = 13,
    Decimal = 14,
    Date = 15,
    VarChar = 16,
    Char = 17,
    TimestampInstant = 18,
}

/// Fields a column statistics record may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatisticField {
    NumberOfValues,
    HasNull,
    Minimum,
    Maximum,
    Sum,
    LowerBound,
    UpperBound,
    FalseCount,
    TrueCount,
    TotalLength,
}

impl StatisticField {
    pub const ALL: [StatisticField; 10] = [
        StatisticField::NumberOfValues,
        StatisticField::HasNull,
        StatisticField::Minimum,
        StatisticField::Maximum,
        StatisticField::Sum,
        StatisticField::LowerBound,
        StatisticField::UpperBound,
        StatisticField::FalseCount,
        StatisticField::TrueCount,
        StatisticField::TotalLength,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatisticField::NumberOfValues => "number_of_values",
            StatisticField::HasNull => "has_null",
            StatisticField::Minimum => "minimum",
            StatisticField::Maximum => "maximum",
            StatisticField::Sum => "sum",
            StatisticField::LowerBound => "lower_bound",
            StatisticField::UpperBound => "upper_bound",
            StatisticField::FalseCount => "false_count",
            StatisticField::TrueCount => "true_count",
            StatisticField::TotalLength => "total_length",
        }
    }
}

impl fmt::Display for StatisticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use StatisticField::*;

const GENERIC_FIELDS: &[StatisticField] = &[NumberOfValues, HasNull];
const BOOLEAN_FIELDS: &[StatisticField] = &[NumberOfValues, HasNull, FalseCount, TrueCount];
const NUMERIC_FIELDS: &[StatisticField] = &[NumberOfValues, HasNull, Minimum, Maximum, Sum];
const STRING_FIELDS: &[StatisticField] = &[
    NumberOfValues,
    HasNull,
    Minimum,
    Maximum,
    LowerBound,
    UpperBound,
    TotalLength,
];
const BINARY_FIELDS: &[StatisticField] = &[NumberOfValues, HasNull, TotalLength];
const DATE_FIELDS: &[StatisticField] = &[NumberOfValues, HasNull, Minimum, Maximum];
const TIMESTAMP_FIELDS: &[StatisticField] = &[
    NumberOfValues,
    HasNull,
    Minimum,
    Maximum,
    LowerBound,
    UpperBound,
];

impl TypeKind {
    pub const ALL: [TypeKind; 19] = [
        TypeKind::Boolean,
        TypeKind::Byte,
        TypeKind::Short,
        TypeKind::Int,
        TypeKind::Long,
        TypeKind::Float,
        TypeKind::Double,
        TypeKind::String,
        TypeKind::Binary,
        TypeKind::Timestamp,
        TypeKind::List,
        TypeKind::Map,
        TypeKind::Struct,
        TypeKind::Union,
        TypeKind::Decimal,
        TypeKind::Date,
        TypeKind::VarChar,
        TypeKind::Char,
        TypeKind::TimestampInstant,
    ];

    /// Resolve an engine kind code
    pub fn from_i32(code: i32) -> Result<Self> {
        TypeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_i32() == code)
            .ok_or_else(|| OrcError::value(format!("Invalid type kind code: {}", code)))
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Keyword used by the schema grammar
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Boolean => "boolean",
            TypeKind::Byte => "tinyint",
            TypeKind::Short => "smallint",
            TypeKind::Int => "int",
            TypeKind::Long => "bigint",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::String => "string",
            TypeKind::Binary => "binary",
            TypeKind::Timestamp => "timestamp",
            TypeKind::TimestampInstant => "timestamp with local time zone",
            TypeKind::List => "array",
            TypeKind::Map => "map",
            TypeKind::Struct => "struct",
            TypeKind::Union => "uniontype",
            TypeKind::Decimal => "decimal",
            TypeKind::Date => "date",
            TypeKind::VarChar => "varchar",
            TypeKind::Char => "char",
        }
    }

    /// Container kinds hold child types
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            TypeKind::List | TypeKind::Map | TypeKind::Struct | TypeKind::Union
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            TypeKind::Byte | TypeKind::Short | TypeKind::Int | TypeKind::Long
        )
    }

    /// Kinds a predicate column may reference
    pub fn is_comparable(&self) -> bool {
        !self.is_compound() && *self != TypeKind::Binary
    }

    /// The statistic fields the engine reports for this kind
    pub fn statistic_fields(&self) -> &'static [StatisticField] {
        match self {
            TypeKind::Boolean => BOOLEAN_FIELDS,
            TypeKind::Byte
            | TypeKind::Short
            | TypeKind::Int
            | TypeKind::Long
            | TypeKind::Float
            | TypeKind::Double
            | TypeKind::Decimal => NUMERIC_FIELDS,
            TypeKind::String | TypeKind::Char | TypeKind::VarChar => STRING_FIELDS,
            TypeKind::Binary => BINARY_FIELDS,
            TypeKind::Date => DATE_FIELDS,
            TypeKind::Timestamp | TypeKind::TimestampInstant => TIMESTAMP_FIELDS,
            TypeKind::List | TypeKind::Map | TypeKind::Struct | TypeKind::Union => {
                GENERIC_FIELDS
            }
        }
    }

    pub fn has_statistic(&self, field: StatisticField) -> bool {
        self.statistic_fields().contains(&field)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_codes() {
        for kind in TypeKind::ALL {
            assert_eq!(TypeKind::from_i32(kind.as_i32()).unwrap(), kind);
        }
        assert_eq!(TypeKind::Struct.as_i32(), 12);
        assert_eq!(TypeKind::TimestampInstant.as_i32(), 18);
        assert!(TypeKind::from_i32(42).is_err());
    }

    #[test]
    fn test_comparable_kinds() {
        assert!(TypeKind::Int.is_comparable());
        assert!(TypeKind::Decimal.is_comparable());
        assert!(TypeKind::TimestampInstant.is_comparable());
        for kind in [
            TypeKind::Binary,
            TypeKind::List,
            TypeKind::Map,
            TypeKind::Union,
            TypeKind::Struct,
        ] {
            assert!(!kind.is_comparable(), "{kind} should not be comparable");
        }
    }

    #[test]
    fn test_statistic_fields() {
        assert!(!TypeKind::Boolean.has_statistic(StatisticField::Minimum));
        assert!(TypeKind::Boolean.has_statistic(StatisticField::TrueCount));
        assert!(TypeKind::Int.has_statistic(StatisticField::Sum));
        assert!(TypeKind::String.has_statistic(StatisticField::TotalLength));
        assert!(!TypeKind::Date.has_statistic(StatisticField::Sum));
        assert_eq!(
            TypeKind::Struct.statistic_fields(),
            &[StatisticField::NumberOfValues, StatisticField::HasNull]
        );
    }
}
