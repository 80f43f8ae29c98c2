use jiff::tz::TimeZone;
use num::BigInt;
use orc_core::*;

/// Schema with one column of every scalar kind plus nested containers
pub fn create_test_schema() -> TypeDescription {
    TypeDescription::parse(
        "struct<id:bigint,name:string,price:decimal(10,3),born:date,seen:timestamp,\
         tags:array<varchar(16)>,attrs:map<string,double>,flag:boolean>",
    )
    .unwrap()
}

/// Numeric statistics record for one stripe
pub fn int_stripe(n: u64, min: i64, max: i64, sum: i64, has_null: bool) -> ColumnStatistics {
    ColumnStatistics {
        number_of_values: Some(n),
        has_null: Some(has_null),
        minimum: Some(Value::Int(min)),
        maximum: Some(Value::Int(max)),
        sum: Some(Value::Int(sum)),
        ..ColumnStatistics::new(TypeKind::Long)
    }
}

/// Decimal statistics record for one stripe, values given as `value * 10^-scale`
pub fn decimal_stripe(n: u64, values: &[(i64, u32)]) -> ColumnStatistics {
    let decimals: Vec<Decimal> = values
        .iter()
        .map(|(v, s)| Decimal::from_scaled(BigInt::from(*v), *s))
        .collect();
    let sum = decimals
        .iter()
        .fold(Decimal::zero(), |acc, d| &acc + d);
    ColumnStatistics {
        number_of_values: Some(n),
        minimum: decimals.iter().min().cloned().map(Value::Decimal),
        maximum: decimals.iter().max().cloned().map(Value::Decimal),
        sum: Some(Value::Decimal(sum)),
        ..ColumnStatistics::new(TypeKind::Decimal)
    }
}

/// Build a search argument with the default converters in UTC
pub fn lower(predicate: &Predicate) -> Result<SearchArgument> {
    SearchArgument::build(predicate, &ConverterRegistry::default(), &TimeZone::UTC)
}

/// Evaluate against a row given as `(column name, native value)` pairs
pub fn eval_row(sarg: &SearchArgument, row: &[(&str, Option<NativeValue>)]) -> Option<bool> {
    sarg.evaluate(&|column: &ColumnRef| match column {
        ColumnRef::Name(name) => row
            .iter()
            .find(|(n, _)| *n == name.as_str())
            .and_then(|(_, v)| v.clone()),
        ColumnRef::Index(_) => None,
    })
}
