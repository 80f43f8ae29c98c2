//! Language-agnostic core logic for ORC readers and writers
//!
//! `orc-core` sits between application values and a native ORC storage
//! engine. The engine does the stripe encoding, compression and file I/O;
//! this crate provides the typed model the engine is driven with.
//!
//! # Key Components
//!
//! - **Schema**: The ORC type tree
//!   - Parsing and printing of schema strings such as
//!     `struct<a:int,b:map<varchar(20),int>>` through [`TypeDescription`]
//!   - Pre-order column id assignment, kept current across field edits
//!   - Dotted, back-tick aware path lookup
//!   - Schema introspection through the [`traits::SchemaInspector`] trait
//!
//! - **Predicates**: Filters for predicate pushdown
//!   - [`PredicateColumn`] comparisons combined with `&`, `|` and `!`
//!   - Lowering to a [`SearchArgument`] with native literals
//!   - Three-valued evaluation for a single row
//!
//! - **Statistics**: Per-stripe [`ColumnStatistics`] reduced to file level
//!   summaries
//!
//! - **Values**: Application [`Value`]s and engine [`NativeValue`]s
//!   - Exact arbitrary precision [`Decimal`]
//!   - Dates and zoned timestamps backed by `jiff`
//!   - Replaceable per-kind [`Converter`]s
//!
//! - **Options**: [`ScanOptions`] and [`WriteOptions`] builders resolved
//!   against a schema
//!
//! # Example Usage
//!
//! ```
//! use orc_core::{PredicateColumn, ScanOptions, TypeDescription};
//!
//! let schema: TypeDescription = "struct<id:bigint,name:string>".parse()?;
//! assert_eq!(schema.find_column_id("name")?, 2);
//!
//! let id = PredicateColumn::from_schema(&schema, "id")?;
//! let options = ScanOptions::builder()
//!     .with_column_names(["name"])
//!     .with_predicate(id.ge(100) & id.lt(200))
//!     .build(&schema)?;
//! assert_eq!(options.selected_columns(), &[2]);
//! # Ok::<(), orc_core::OrcError>(())
//! ```

pub mod column;
pub mod converters;
pub mod decimal;
pub mod error;
pub mod kind;
pub mod logger;
pub mod options;
pub mod predicate;
pub mod schema;
pub mod search_argument;
pub mod statistics;
pub mod traits;
pub mod value;

pub use column::ColumnValues;
pub use converters::{
    resolve_time_zone, ConversionContext, Converter, ConverterRegistry, DateConverter,
    DecimalConverter, TimestampConverter,
};
pub use decimal::{Decimal, DecimalTuple};
pub use error::{ErrorContext, OrcError, Result};
pub use kind::{StatisticField, TypeKind};
pub use logger::{LogLevel, Logger};
pub use options::{
    CompressionKind, CompressionStrategy, ScanOptions, ScanOptionsBuilder, WriteOptions,
    WriteOptionsBuilder,
};
pub use predicate::{ColumnRef, Operator, Predicate, PredicateColumn};
pub use schema::{DataType, TypeDescription};
pub use search_argument::{Literal, PredicateDataType, PredicateLeaf, SearchArgument};
pub use statistics::ColumnStatistics;
pub use value::{NativeValue, Value};
