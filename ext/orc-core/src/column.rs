//! Converting cursor over one column's native values

use jiff::tz::TimeZone;

use crate::converters::{ConversionContext, ConverterRegistry};
use crate::error::{OrcError, Result};
use crate::kind::TypeKind;
use crate::schema::TypeDescription;
use crate::value::{NativeValue, Value};

/// Application values of a single column
///
/// Wraps the engine's cursor, which yields `Ok(None)` for null cells, and
/// converts every cell through the registered converter for the column's
/// kind. Nulls become the configured null value.
#[derive(Debug, Clone)]
pub struct ColumnValues<C> {
    origin: C,
    cursor: C,
    column_id: u64,
    kind: TypeKind,
    ctx: ConversionContext,
    converters: ConverterRegistry,
    null_value: Value,
}

impl<C> ColumnValues<C>
where
    C: Iterator<Item = Result<Option<NativeValue>>> + Clone,
{
    /// Cursor over column `column_id` of `schema`
    ///
    /// Compound columns have no scalar values and are rejected.
    pub fn new(
        schema: &TypeDescription,
        column_id: u64,
        cursor: C,
        converters: ConverterRegistry,
        timezone: TimeZone,
        null_value: Value,
    ) -> Result<Self> {
        let descr = schema.find_type(column_id)?;
        if descr.kind().is_compound() {
            return Err(OrcError::type_error(format!(
                "Column {} is a {} and has no scalar values",
                column_id,
                descr.kind()
            )));
        }
        Ok(Self {
            origin: cursor.clone(),
            cursor,
            column_id,
            kind: descr.kind(),
            ctx: ConversionContext::for_type(descr, timezone),
            converters,
            null_value,
        })
    }

    pub fn column_id(&self) -> u64 {
        self.column_id
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    fn convert(&self, cell: Option<NativeValue>) -> Result<Value> {
        match cell {
            Some(native) => self.converters.from_native(self.kind, &native, &self.ctx),
            None => Ok(self.null_value.clone()),
        }
    }

    /// Restart from the first cell
    pub fn rewind(&mut self) {
        self.cursor = self.origin.clone();
    }

    /// Whether any cell of the column equals `item`
    ///
    /// Scans from the first cell and leaves the current position untouched.
    pub fn contains(&self, item: &Value) -> Result<bool> {
        for cell in self.origin.clone() {
            if self.convert(cell?)? == *item {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<C> Iterator for ColumnValues<C>
where
    C: Iterator<Item = Result<Option<NativeValue>>> + Clone,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.cursor.next()?;
        Some(cell.and_then(|cell| self.convert(cell)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    type Cells = std::vec::IntoIter<Result<Option<NativeValue>>>;

    fn cells(values: Vec<Option<NativeValue>>) -> Cells {
        values.into_iter().map(Ok).collect::<Vec<_>>().into_iter()
    }

    fn schema() -> TypeDescription {
        TypeDescription::parse("struct<d:date,n:int,s:struct<x:string>>").unwrap()
    }

    #[test]
    fn test_converts_dates_and_nulls() {
        let column = ColumnValues::new(
            &schema(),
            1,
            cells(vec![Some(NativeValue::Date(0)), None, Some(NativeValue::Date(31))]),
            ConverterRegistry::default(),
            TimeZone::UTC,
            Value::from("missing"),
        )
        .unwrap();
        assert_eq!(column.kind(), TypeKind::Date);
        let values: Vec<Value> = column.collect::<Result<_>>().unwrap();
        assert_eq!(
            values,
            vec![
                Value::Date(date(1970, 1, 1)),
                Value::from("missing"),
                Value::Date(date(1970, 2, 1)),
            ]
        );
    }

    #[test]
    fn test_contains_keeps_position() {
        let mut column = ColumnValues::new(
            &schema(),
            2,
            cells(vec![Some(NativeValue::Long(1)), Some(NativeValue::Long(2)), None]),
            ConverterRegistry::default(),
            TimeZone::UTC,
            Value::Null,
        )
        .unwrap();
        assert_eq!(column.next().unwrap().unwrap(), Value::Int(1));
        assert!(column.contains(&Value::Int(1)).unwrap());
        assert!(column.contains(&Value::Null).unwrap());
        assert!(!column.contains(&Value::Int(3)).unwrap());
        assert_eq!(column.next().unwrap().unwrap(), Value::Int(2));
        column.rewind();
        assert_eq!(column.next().unwrap().unwrap(), Value::Int(1));
    }

    #[test]
    fn test_rejects_compound_and_unknown_columns() {
        let err = ColumnValues::new(
            &schema(),
            3,
            cells(Vec::new()),
            ConverterRegistry::default(),
            TimeZone::UTC,
            Value::Null,
        )
        .unwrap_err();
        assert!(matches!(err, OrcError::Type(_)));

        let err = ColumnValues::new(
            &schema(),
            9,
            cells(Vec::new()),
            ConverterRegistry::default(),
            TimeZone::UTC,
            Value::Null,
        )
        .unwrap_err();
        assert!(matches!(err, OrcError::NotFound(_)));
    }

    #[test]
    fn test_engine_errors_propagate() {
        let cursor = vec![
            Ok(Some(NativeValue::Long(1))),
            Err(OrcError::conversion("corrupt stripe")),
        ]
        .into_iter();
        let column = ColumnValues::new(
            &schema(),
            2,
            cursor,
            ConverterRegistry::default(),
            TimeZone::UTC,
            Value::Null,
        )
        .unwrap();
        let result: Result<Vec<Value>> = column.collect();
        assert!(matches!(result, Err(OrcError::Conversion(_))));
    }
}
