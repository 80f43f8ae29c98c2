//! Reader and writer configuration
//!
//! Both builders are resolved against a schema: column names become column
//! ids, converter overrides are merged over the defaults and a predicate is
//! lowered to a [`SearchArgument`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use indexmap::IndexMap;
use jiff::tz::TimeZone;

use crate::column::ColumnValues;
use crate::converters::{ConversionContext, Converter, ConverterRegistry};
use crate::error::{ErrorContext, OrcError, Result};
use crate::kind::TypeKind;
use crate::predicate::{ColumnRef, Predicate};
use crate::schema::TypeDescription;
use crate::search_argument::SearchArgument;
use crate::value::{NativeValue, Value};

// Default configuration constants
pub const DEFAULT_BATCH_SIZE: usize = 1024;
pub const DEFAULT_STRIPE_SIZE: u64 = 64 * 1024 * 1024; // 64MiB
pub const DEFAULT_COMPRESSION_BLOCK_SIZE: u64 = 64 * 1024; // 64KiB
pub const DEFAULT_BLOOM_FILTER_FPP: f64 = 0.05;

/// Compression codecs understood by the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum CompressionKind {
    None = 0,
    #[default]
    Zlib = 1,
    Snappy = 2,
    Lzo = 3,
    Lz4 = 4,
    Zstd = 5,
}

impl CompressionKind {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(code: i32) -> Result<Self> {
        Ok(match code {
            0 => CompressionKind::None,
            1 => CompressionKind::Zlib,
            2 => CompressionKind::Snappy,
            3 => CompressionKind::Lzo,
            4 => CompressionKind::Lz4,
            5 => CompressionKind::Zstd,
            _ => {
                return Err(OrcError::value(format!(
                    "Invalid compression kind code: {}",
                    code
                )))
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompressionKind::None => "none",
            CompressionKind::Zlib => "zlib",
            CompressionKind::Snappy => "snappy",
            CompressionKind::Lzo => "lzo",
            CompressionKind::Lz4 => "lz4",
            CompressionKind::Zstd => "zstd",
        }
    }
}

impl FromStr for CompressionKind {
    type Err = OrcError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "none" | "uncompressed" => CompressionKind::None,
            "zlib" => CompressionKind::Zlib,
            "snappy" => CompressionKind::Snappy,
            "lzo" => CompressionKind::Lzo,
            "lz4" => CompressionKind::Lz4,
            "zstd" => CompressionKind::Zstd,
            _ => return Err(OrcError::value(format!("Invalid compression kind: {}", s))),
        })
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the engine favours speed or ratio when compressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum CompressionStrategy {
    #[default]
    Speed = 0,
    Compression = 1,
}

impl CompressionStrategy {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(code: i32) -> Result<Self> {
        match code {
            0 => Ok(CompressionStrategy::Speed),
            1 => Ok(CompressionStrategy::Compression),
            _ => Err(OrcError::value(format!(
                "Invalid compression strategy code: {}",
                code
            ))),
        }
    }
}

fn resolve_column(schema: &TypeDescription, column: &ColumnRef) -> Result<u64> {
    match column {
        ColumnRef::Name(name) => schema.find_column_id(name),
        ColumnRef::Index(idx) if *idx <= schema.maximum_column_id() => Ok(*idx),
        ColumnRef::Index(idx) => Err(OrcError::not_found(format!(
            "Column {} not found, the schema has {} columns",
            idx,
            schema.maximum_column_id() + 1
        ))),
    }
}

fn check_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(OrcError::value("Batch size must be positive"));
    }
    Ok(())
}

fn registry_with(overrides: Vec<(TypeKind, Arc<dyn Converter>)>) -> Result<ConverterRegistry> {
    overrides
        .into_iter()
        .try_fold(ConverterRegistry::default(), |registry, (kind, converter)| {
            registry.with_override(kind, converter)
        })
}

/// Builder for [`ScanOptions`]
pub struct ScanOptionsBuilder {
    batch_size: usize,
    column_indices: Vec<u64>,
    column_names: Vec<String>,
    timezone: TimeZone,
    converters: Vec<(TypeKind, Arc<dyn Converter>)>,
    predicate: Option<Predicate>,
    null_value: Value,
}

impl Default for ScanOptionsBuilder {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            column_indices: Vec::new(),
            column_names: Vec::new(),
            timezone: TimeZone::UTC,
            converters: Vec::new(),
            predicate: None,
            null_value: Value::Null,
        }
    }
}

impl ScanOptionsBuilder {
    /// Create a new ScanOptionsBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rows fetched from the engine per batch
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Select columns by id
    pub fn with_column_indices<I: IntoIterator<Item = u64>>(mut self, indices: I) -> Self {
        self.column_indices.extend(indices);
        self
    }

    /// Select columns by dotted path
    pub fn with_column_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the zone timestamps are presented in
    pub fn with_timezone(mut self, timezone: TimeZone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Replace the converter for one kind
    pub fn with_converter(mut self, kind: TypeKind, converter: Arc<dyn Converter>) -> Self {
        self.converters.push((kind, converter));
        self
    }

    /// Filter stripes and row groups with a predicate
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Set the value null cells are presented as
    pub fn with_null_value<V: Into<Value>>(mut self, value: V) -> Self {
        self.null_value = value.into();
        self
    }

    /// Resolve the options against the file schema
    pub fn build(self, schema: &TypeDescription) -> Result<ScanOptions> {
        check_batch_size(self.batch_size)?;

        let mut selected = Vec::new();
        let requested = self
            .column_indices
            .into_iter()
            .map(ColumnRef::Index)
            .chain(self.column_names.into_iter().map(ColumnRef::Name));
        for column in requested {
            let id = resolve_column(schema, &column)?;
            if !selected.contains(&id) {
                selected.push(id);
            }
        }

        let converters = registry_with(self.converters)?;
        let search_argument = self
            .predicate
            .map(|predicate| SearchArgument::build(&predicate, &converters, &self.timezone))
            .transpose()
            .context("Invalid predicate")?;

        Ok(ScanOptions {
            batch_size: self.batch_size,
            selected_columns: selected,
            timezone: self.timezone,
            converters,
            search_argument,
            null_value: self.null_value,
        })
    }
}

/// Resolved reader configuration
#[derive(Debug, Clone)]
pub struct ScanOptions {
    batch_size: usize,
    selected_columns: Vec<u64>,
    timezone: TimeZone,
    converters: ConverterRegistry,
    search_argument: Option<SearchArgument>,
    null_value: Value,
}

impl ScanOptions {
    pub fn builder() -> ScanOptionsBuilder {
        ScanOptionsBuilder::new()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Selected column ids in request order; empty selects every column
    pub fn selected_columns(&self) -> &[u64] {
        &self.selected_columns
    }

    pub fn timezone(&self) -> &TimeZone {
        &self.timezone
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn search_argument(&self) -> Option<&SearchArgument> {
        self.search_argument.as_ref()
    }

    pub fn null_value(&self) -> &Value {
        &self.null_value
    }

    /// Wrap an engine cursor for one column with these options
    pub fn column_values<C>(
        &self,
        schema: &TypeDescription,
        column_id: u64,
        cursor: C,
    ) -> Result<ColumnValues<C>>
    where
        C: Iterator<Item = Result<Option<NativeValue>>> + Clone,
    {
        ColumnValues::new(
            schema,
            column_id,
            cursor,
            self.converters.clone(),
            self.timezone.clone(),
            self.null_value.clone(),
        )
    }
}

/// Builder for [`WriteOptions`]
pub struct WriteOptionsBuilder {
    batch_size: usize,
    stripe_size: u64,
    compression: CompressionKind,
    compression_strategy: CompressionStrategy,
    compression_block_size: u64,
    bloom_filter_columns: Vec<ColumnRef>,
    bloom_filter_fpp: f64,
    timezone: TimeZone,
    converters: Vec<(TypeKind, Arc<dyn Converter>)>,
    metadata: IndexMap<String, Bytes>,
}

impl Default for WriteOptionsBuilder {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            stripe_size: DEFAULT_STRIPE_SIZE,
            compression: CompressionKind::default(),
            compression_strategy: CompressionStrategy::default(),
            compression_block_size: DEFAULT_COMPRESSION_BLOCK_SIZE,
            bloom_filter_columns: Vec::new(),
            bloom_filter_fpp: DEFAULT_BLOOM_FILTER_FPP,
            timezone: TimeZone::UTC,
            converters: Vec::new(),
            metadata: IndexMap::new(),
        }
    }
}

impl WriteOptionsBuilder {
    /// Create a new WriteOptionsBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rows buffered before handing them to the engine
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the target stripe size in bytes
    pub fn with_stripe_size(mut self, size: u64) -> Self {
        self.stripe_size = size;
        self
    }

    /// Set the compression algorithm
    pub fn with_compression(mut self, compression: CompressionKind) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_compression_strategy(mut self, strategy: CompressionStrategy) -> Self {
        self.compression_strategy = strategy;
        self
    }

    /// Set the compression block size in bytes
    pub fn with_compression_block_size(mut self, size: u64) -> Self {
        self.compression_block_size = size;
        self
    }

    /// Request bloom filters for columns given by id or dotted path
    pub fn with_bloom_filter_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        self.bloom_filter_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Set the bloom filters' false positive probability
    pub fn with_bloom_filter_fpp(mut self, fpp: f64) -> Self {
        self.bloom_filter_fpp = fpp;
        self
    }

    pub fn with_timezone(mut self, timezone: TimeZone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Replace the converter for one kind
    pub fn with_converter(mut self, kind: TypeKind, converter: Arc<dyn Converter>) -> Self {
        self.converters.push((kind, converter));
        self
    }

    /// Attach user metadata written to the file footer
    pub fn with_metadata<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Bytes>,
    {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Resolve the options against the schema being written
    pub fn build(self, schema: &TypeDescription) -> Result<WriteOptions> {
        check_batch_size(self.batch_size)?;
        // Negated so that NaN is rejected too
        if !(self.bloom_filter_fpp > 0.0 && self.bloom_filter_fpp < 1.0) {
            return Err(OrcError::value(format!(
                "False positive probability should be > 0.0 & < 1.0, got {}",
                self.bloom_filter_fpp
            )));
        }

        let bloom_filter_columns = self
            .bloom_filter_columns
            .iter()
            .map(|column| resolve_column(schema, column))
            .collect::<Result<BTreeSet<u64>>>()
            .context("Invalid bloom filter column")?;

        Ok(WriteOptions {
            batch_size: self.batch_size,
            stripe_size: self.stripe_size,
            compression: self.compression,
            compression_strategy: self.compression_strategy,
            compression_block_size: self.compression_block_size,
            bloom_filter_columns,
            bloom_filter_fpp: self.bloom_filter_fpp,
            timezone: self.timezone,
            converters: registry_with(self.converters)?,
            metadata: self.metadata,
        })
    }
}

/// Resolved writer configuration
#[derive(Debug, Clone)]
pub struct WriteOptions {
    batch_size: usize,
    stripe_size: u64,
    compression: CompressionKind,
    compression_strategy: CompressionStrategy,
    compression_block_size: u64,
    bloom_filter_columns: BTreeSet<u64>,
    bloom_filter_fpp: f64,
    timezone: TimeZone,
    converters: ConverterRegistry,
    metadata: IndexMap<String, Bytes>,
}

impl WriteOptions {
    pub fn builder() -> WriteOptionsBuilder {
        WriteOptionsBuilder::new()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn stripe_size(&self) -> u64 {
        self.stripe_size
    }

    pub fn compression(&self) -> CompressionKind {
        self.compression
    }

    pub fn compression_strategy(&self) -> CompressionStrategy {
        self.compression_strategy
    }

    pub fn compression_block_size(&self) -> u64 {
        self.compression_block_size
    }

    pub fn bloom_filter_columns(&self) -> &BTreeSet<u64> {
        &self.bloom_filter_columns
    }

    pub fn bloom_filter_fpp(&self) -> f64 {
        self.bloom_filter_fpp
    }

    pub fn timezone(&self) -> &TimeZone {
        &self.timezone
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn metadata(&self) -> &IndexMap<String, Bytes> {
        &self.metadata
    }

    /// Convert one cell for column `descr`; nulls stay `None`
    pub fn to_native(&self, descr: &TypeDescription, value: &Value) -> Result<Option<NativeValue>> {
        if value.is_null() {
            return Ok(None);
        }
        let ctx = ConversionContext::for_type(descr, self.timezone.clone());
        self.converters
            .to_native(descr.kind(), value, &ctx)
            .map(Some)
    }
}
