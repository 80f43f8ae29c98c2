use jiff::civil::date;
use jiff::tz::TimeZone;
use num::BigInt;
use orc_core::*;
use std::sync::Arc;

mod test_helpers;
use test_helpers::*;

#[test]
fn test_derived_operators_are_negations() {
    let id = PredicateColumn::named(TypeKind::Long, "id").unwrap();

    assert_eq!(id.ne(3), !id.eq(3));
    assert_eq!(id.gt(3), !id.le(3));
    assert_eq!(id.ge(3), !id.lt(3));
    assert_eq!(id.gt(3).operator(), Operator::Not);
    assert_eq!(id.ge(3).to_string(), "NOT (id < 3)");
}

#[test]
fn test_operator_codes() {
    let expected = [
        (Operator::Not, 0),
        (Operator::Or, 1),
        (Operator::And, 2),
        (Operator::Eq, 3),
        (Operator::Lt, 4),
        (Operator::Le, 5),
    ];
    for (op, code) in expected {
        assert_eq!(op.as_i32(), code);
        assert_eq!(Operator::from_i32(code).unwrap(), op);
    }
    assert!(Operator::from_i32(6).is_err());
}

#[test]
fn test_column_validation() {
    assert!(matches!(
        PredicateColumn::named(TypeKind::Binary, "b"),
        Err(OrcError::Type(_))
    ));
    assert!(matches!(
        PredicateColumn::indexed(TypeKind::Struct, 0),
        Err(OrcError::Type(_))
    ));
    assert!(matches!(
        PredicateColumn::new(TypeKind::Int, Some("a".into()), Some(1), None, None),
        Err(OrcError::Value(_))
    ));
    assert!(matches!(
        PredicateColumn::new(TypeKind::Int, None, None, None, None),
        Err(OrcError::Value(_))
    ));
    assert!(matches!(
        PredicateColumn::new(TypeKind::Decimal, Some("d".into()), None, Some(10), None),
        Err(OrcError::Value(_))
    ));

    let by_index = PredicateColumn::indexed(TypeKind::String, 2).unwrap();
    assert_eq!(by_index.index(), Some(2));
    assert_eq!(by_index.name(), None);
}

#[test]
fn test_columns_from_schema() {
    let schema = create_test_schema();
    let price = PredicateColumn::from_schema(&schema, "price").unwrap();
    assert_eq!(price.type_kind(), TypeKind::Decimal);
    assert_eq!((price.precision(), price.scale()), (Some(10), Some(3)));

    assert!(matches!(
        PredicateColumn::from_schema(&schema, "tags"),
        Err(OrcError::Type(_))
    ));
    assert!(matches!(
        PredicateColumn::from_schema(&schema, "nope"),
        Err(OrcError::NotFound(_))
    ));
}

#[test]
fn test_lowering_keeps_tree_shape() {
    let id = PredicateColumn::named(TypeKind::Long, "id").unwrap();
    let name = PredicateColumn::named(TypeKind::String, "name").unwrap();
    let pred = (id.ge(10) & id.lt(20)) | name.eq("bob");

    let sarg = lower(&pred).unwrap();
    assert_eq!(sarg.operator(), Operator::Or);

    let leaves = sarg.leaves();
    assert_eq!(leaves.len(), 3);
    assert_eq!(leaves[0].operator(), Operator::Lt);
    assert_eq!(leaves[0].literal(), &Literal::Long(10));
    assert_eq!(leaves[2].column(), &ColumnRef::from("name"));
    assert_eq!(leaves[2].literal(), &Literal::String(Arc::from("bob")));
    assert_eq!(leaves[2].data_type(), PredicateDataType::String);
}

#[test]
fn test_typed_literals() {
    let born = PredicateColumn::named(TypeKind::Date, "born").unwrap();
    let sarg = lower(&born.eq(date(1970, 1, 11))).unwrap();
    assert_eq!(sarg.leaves()[0].literal(), &Literal::Date(10));

    let price = PredicateColumn::decimal_named("price", 10, 3).unwrap();
    let value: Decimal = "12.5".parse().unwrap();
    let sarg = lower(&price.le(value)).unwrap();
    assert_eq!(
        sarg.leaves()[0].literal(),
        &Literal::Decimal {
            value: BigInt::from(12500),
            precision: 10,
            scale: 3
        }
    );

    let seen = PredicateColumn::named(TypeKind::TimestampInstant, "seen").unwrap();
    let instant = date(2001, 9, 9)
        .at(1, 46, 40, 0)
        .to_zoned(TimeZone::UTC)
        .unwrap();
    let sarg = lower(&seen.lt(instant)).unwrap();
    assert_eq!(
        sarg.leaves()[0].literal(),
        &Literal::Timestamp {
            seconds: 1_000_000_000,
            nanos: 0
        }
    );

    let sarg = lower(&seen.eq(Value::Null)).unwrap();
    assert_eq!(
        sarg.leaves()[0].literal(),
        &Literal::Null(PredicateDataType::Timestamp)
    );
}

#[test]
fn test_mismatched_literal_is_rejected() {
    let born = PredicateColumn::named(TypeKind::Date, "born").unwrap();
    assert!(matches!(lower(&born.eq("yesterday")), Err(OrcError::Type(_))));

    let price = PredicateColumn::decimal_named("price", 4, 2).unwrap();
    let too_big: Decimal = "123.45".parse().unwrap();
    assert!(matches!(
        lower(&price.eq(too_big)),
        Err(OrcError::Conversion(_))
    ));
}

#[test]
fn test_three_valued_evaluation() {
    let id = PredicateColumn::named(TypeKind::Long, "id").unwrap();
    let name = PredicateColumn::named(TypeKind::String, "name").unwrap();
    let sarg = lower(&(id.gt(5) & name.ne("x"))).unwrap();

    let row = |id: Option<i64>, name: Option<&str>| {
        [
            ("id", id.map(NativeValue::Long)),
            ("name", name.map(|n| NativeValue::String(Arc::from(n)))),
        ]
    };

    assert_eq!(eval_row(&sarg, &row(Some(6), Some("y"))), Some(true));
    assert_eq!(eval_row(&sarg, &row(Some(5), Some("y"))), Some(false));
    assert_eq!(eval_row(&sarg, &row(Some(6), Some("x"))), Some(false));
    // false AND unknown is false
    assert_eq!(eval_row(&sarg, &row(Some(1), None)), Some(false));
    // true AND unknown is unknown
    assert_eq!(eval_row(&sarg, &row(Some(9), None)), None);

    let either = lower(&(id.eq(1) | name.eq("x"))).unwrap();
    assert_eq!(eval_row(&either, &row(None, Some("x"))), Some(true));
    assert_eq!(eval_row(&either, &row(None, Some("y"))), None);
}

#[test]
fn test_custom_converter_feeds_literals() {
    struct DaysAsLong;

    impl Converter for DaysAsLong {
        fn from_native(&self, native: &NativeValue, _ctx: &ConversionContext) -> Result<Value> {
            match native {
                NativeValue::Date(days) => Ok(Value::Int(*days)),
                other => Err(OrcError::type_error(other.type_name())),
            }
        }

        fn to_native(&self, value: &Value, _ctx: &ConversionContext) -> Result<NativeValue> {
            match value {
                Value::Int(days) => Ok(NativeValue::Date(*days)),
                other => Err(OrcError::type_error(other.type_name())),
            }
        }
    }

    let converters = ConverterRegistry::default()
        .with_override(TypeKind::Date, Arc::new(DaysAsLong))
        .unwrap();
    let born = PredicateColumn::named(TypeKind::Date, "born").unwrap();
    let sarg = SearchArgument::build(&born.lt(100), &converters, &TimeZone::UTC).unwrap();
    assert_eq!(sarg.leaves()[0].literal(), &Literal::Date(100));
}
