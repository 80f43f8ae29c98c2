use bytes::Bytes;
use jiff::civil::date;
use num::BigInt;
use orc_core::*;
use std::sync::Arc;

mod test_helpers;
use test_helpers::*;

type Cells = std::vec::IntoIter<Result<Option<NativeValue>>>;

fn cells(values: Vec<Option<NativeValue>>) -> Cells {
    values.into_iter().map(Ok).collect::<Vec<_>>().into_iter()
}

#[test]
fn test_scan_pipeline() {
    let schema = create_test_schema();
    let price = PredicateColumn::from_schema(&schema, "price").unwrap();
    let born = PredicateColumn::from_schema(&schema, "born").unwrap();

    let options = ScanOptions::builder()
        .with_column_names(["price", "born"])
        .with_timezone(resolve_time_zone("Europe/Budapest").unwrap())
        .with_predicate(price.gt(Decimal::from(10)) & born.ge(date(2000, 1, 1)))
        .with_null_value("n/a")
        .build(&schema)
        .unwrap();
    assert_eq!(options.selected_columns(), &[3, 4]);

    let sarg = options.search_argument().unwrap();
    assert_eq!(sarg.leaves().len(), 2);
    assert_eq!(
        sarg.leaves()[0].literal(),
        &Literal::Decimal {
            value: BigInt::from(10_000),
            precision: 10,
            scale: 3
        }
    );

    let prices = options
        .column_values(
            &schema,
            3,
            cells(vec![
                Some(NativeValue::Decimal {
                    value: BigInt::from(12_345),
                    scale: 3,
                }),
                None,
            ]),
        )
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap();
    assert_eq!(
        prices[0],
        Value::Decimal(Decimal::from_scaled(BigInt::from(12_345), 3))
    );
    assert_eq!(prices[1], Value::from("n/a"));

    let row = [
        (
            "price",
            Some(NativeValue::Decimal {
                value: BigInt::from(12_345),
                scale: 3,
            }),
        ),
        ("born", Some(NativeValue::Date(11_000))),
    ];
    assert_eq!(eval_row(sarg, &row), Some(true));
}

#[test]
fn test_scan_rejects_bad_predicate() {
    let schema = create_test_schema();
    let born = PredicateColumn::from_schema(&schema, "born").unwrap();
    let err = ScanOptions::builder()
        .with_predicate(born.eq(42))
        .build(&schema)
        .unwrap_err();
    assert!(matches!(err, OrcError::Type(_)));
    assert!(err.to_string().contains("Invalid predicate"));
}

#[test]
fn test_scan_rejects_unknown_columns() {
    let schema = create_test_schema();
    assert!(matches!(
        ScanOptions::builder()
            .with_column_names(["missing"])
            .build(&schema),
        Err(OrcError::NotFound(_))
    ));
    assert!(matches!(
        ScanOptions::builder()
            .with_column_indices([12])
            .build(&schema),
        Err(OrcError::NotFound(_))
    ));
}

#[test]
fn test_write_options_convert_cells() {
    let schema = create_test_schema();
    let options = WriteOptions::builder()
        .with_compression(CompressionKind::Zstd)
        .with_bloom_filter_columns(["id", "name"])
        .with_metadata("origin", Bytes::from_static(b"sales"))
        .build(&schema)
        .unwrap();

    assert_eq!(options.compression().to_string(), "zstd");
    assert_eq!(
        options.bloom_filter_columns().iter().copied().collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(options.metadata()["origin"], Bytes::from_static(b"sales"));

    let price = schema.field("price").unwrap();
    let value: Decimal = "7.0005".parse().unwrap();
    assert_eq!(
        options.to_native(price, &Value::Decimal(value)).unwrap(),
        Some(NativeValue::Decimal {
            value: BigInt::from(7_000),
            scale: 3
        })
    );
    assert_eq!(options.to_native(price, &Value::Null).unwrap(), None);

    let name = schema.field("name").unwrap();
    assert_eq!(
        options.to_native(name, &Value::from("x")).unwrap(),
        Some(NativeValue::String(Arc::from("x")))
    );
    assert!(matches!(
        options.to_native(name, &Value::Int(1)),
        Err(OrcError::Type(_))
    ));
}
