//! Schema type tree
//!
//! A [`TypeDescription`] describes one ORC type together with its pre-order
//! column id. Kind specific data lives in the [`DataType`] sum type, so a
//! decimal always has a precision and scale and a list always has exactly
//! one element type.
//!
//! Column ids follow the storage engine's numbering: a node takes its id
//! before its children, and every node of a subtree consumes one id. For
//! `struct<a:int,b:map<varchar(20),int>>` the ids are `struct=0, a=1, b=2,
//! b.key=3, b.value=4`.

mod parser;
pub mod path;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{OrcError, Result};
use crate::kind::TypeKind;
use crate::logger::Logger;

pub use path::{join_dotted_path, quote_field_name, split_dotted_path};

/// Largest precision a decimal column may declare.
pub const MAX_DECIMAL_PRECISION: u32 = 38;
/// Precision used by [`TypeDescription::from_kind`] for decimals.
pub const DEFAULT_DECIMAL_PRECISION: u32 = 38;
/// Scale used by [`TypeDescription::from_kind`] for decimals.
pub const DEFAULT_DECIMAL_SCALE: u32 = 10;
/// Maximum length used by [`TypeDescription::from_kind`] for char/varchar.
pub const DEFAULT_CHAR_LENGTH: u64 = 256;

/// Kind specific shape of a schema node
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Binary,
    Timestamp,
    TimestampInstant,
    Date,
    Char {
        max_length: u64,
    },
    VarChar {
        max_length: u64,
    },
    Decimal {
        precision: u32,
        scale: u32,
    },
    List {
        element: Box<TypeDescription>,
    },
    Map {
        key: Box<TypeDescription>,
        value: Box<TypeDescription>,
    },
    /// Fields keep their declaration order
    Struct {
        fields: IndexMap<String, TypeDescription>,
    },
    Union {
        variants: Vec<TypeDescription>,
    },
}

impl DataType {
    pub fn kind(&self) -> TypeKind {
        match self {
            DataType::Boolean => TypeKind::Boolean,
            DataType::Byte => TypeKind::Byte,
            DataType::Short => TypeKind::Short,
            DataType::Int => TypeKind::Int,
            DataType::Long => TypeKind::Long,
            DataType::Float => TypeKind::Float,
            DataType::Double => TypeKind::Double,
            DataType::String => TypeKind::String,
            DataType::Binary => TypeKind::Binary,
            DataType::Timestamp => TypeKind::Timestamp,
            DataType::TimestampInstant => TypeKind::TimestampInstant,
            DataType::Date => TypeKind::Date,
            DataType::Char { .. } => TypeKind::Char,
            DataType::VarChar { .. } => TypeKind::VarChar,
            DataType::Decimal { .. } => TypeKind::Decimal,
            DataType::List { .. } => TypeKind::List,
            DataType::Map { .. } => TypeKind::Map,
            DataType::Struct { .. } => TypeKind::Struct,
            DataType::Union { .. } => TypeKind::Union,
        }
    }
}

/// One node of a schema type tree
///
/// Equality compares the type structure only: column ids and attributes are
/// ignored.
#[derive(Debug, Clone)]
pub struct TypeDescription {
    data_type: DataType,
    column_id: u64,
    attributes: IndexMap<String, String>,
}

impl PartialEq for TypeDescription {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type
    }
}

impl TypeDescription {
    /// Create a tree rooted at this node and number it from 0
    pub fn new(data_type: DataType) -> Self {
        let mut descr = Self::from_data_type(data_type);
        descr.set_column_id(0);
        descr
    }

    pub(crate) fn from_data_type(data_type: DataType) -> Self {
        Self {
            data_type,
            column_id: 0,
            attributes: IndexMap::new(),
        }
    }

    /// Parse a schema string such as `struct<a:int,b:array<string>>`
    pub fn parse(schema: &str) -> Result<Self> {
        parser::parse_type_description(schema)
    }

    /// Create a node of the given kind with default parameters
    ///
    /// Lists, maps and unions need child types and are rejected; build them
    /// with [`TypeDescription::list`], [`TypeDescription::map`] or
    /// [`TypeDescription::union`].
    pub fn from_kind(kind: TypeKind) -> Result<Self> {
        let data_type = match kind {
            TypeKind::Boolean => DataType::Boolean,
            TypeKind::Byte => DataType::Byte,
            TypeKind::Short => DataType::Short,
            TypeKind::Int => DataType::Int,
            TypeKind::Long => DataType::Long,
            TypeKind::Float => DataType::Float,
            TypeKind::Double => DataType::Double,
            TypeKind::String => DataType::String,
            TypeKind::Binary => DataType::Binary,
            TypeKind::Timestamp => DataType::Timestamp,
            TypeKind::TimestampInstant => DataType::TimestampInstant,
            TypeKind::Date => DataType::Date,
            TypeKind::Char => DataType::Char {
                max_length: DEFAULT_CHAR_LENGTH,
            },
            TypeKind::VarChar => DataType::VarChar {
                max_length: DEFAULT_CHAR_LENGTH,
            },
            TypeKind::Decimal => DataType::Decimal {
                precision: DEFAULT_DECIMAL_PRECISION,
                scale: DEFAULT_DECIMAL_SCALE,
            },
            TypeKind::Struct => DataType::Struct {
                fields: IndexMap::new(),
            },
            TypeKind::List | TypeKind::Map | TypeKind::Union => {
                return Err(OrcError::type_error(format!(
                    "{} requires child types",
                    kind
                )))
            }
        };
        Ok(Self::new(data_type))
    }

    pub fn char(max_length: u64) -> Result<Self> {
        Self::check_max_length(max_length)?;
        Ok(Self::new(DataType::Char { max_length }))
    }

    pub fn varchar(max_length: u64) -> Result<Self> {
        Self::check_max_length(max_length)?;
        Ok(Self::new(DataType::VarChar { max_length }))
    }

    pub fn decimal(precision: u32, scale: u32) -> Result<Self> {
        Self::check_decimal(precision, scale)?;
        Ok(Self::new(DataType::Decimal { precision, scale }))
    }

    pub fn list(element: TypeDescription) -> Self {
        Self::new(DataType::List {
            element: Box::new(element),
        })
    }

    pub fn map(key: TypeDescription, value: TypeDescription) -> Self {
        Self::new(DataType::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    /// Build a struct; field order follows the iterator
    pub fn structure<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, TypeDescription)>,
        S: Into<String>,
    {
        let mut map = IndexMap::new();
        for (name, field) in fields {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(OrcError::value(format!("Duplicate field name `{}`", name)));
            }
            map.insert(name, field);
        }
        Ok(Self::new(DataType::Struct { fields: map }))
    }

    pub fn union(variants: Vec<TypeDescription>) -> Result<Self> {
        if variants.is_empty() {
            return Err(OrcError::value("Union type needs at least one variant"));
        }
        Ok(Self::new(DataType::Union { variants }))
    }

    pub(crate) fn check_decimal(precision: u32, scale: u32) -> Result<()> {
        if precision == 0 || precision > MAX_DECIMAL_PRECISION {
            return Err(OrcError::value(format!(
                "Decimal precision must be between 1 and {}, got {}",
                MAX_DECIMAL_PRECISION, precision
            )));
        }
        if scale > precision {
            return Err(OrcError::value(format!(
                "Decimal scale {} exceeds precision {}",
                scale, precision
            )));
        }
        Ok(())
    }

    pub(crate) fn check_max_length(max_length: u64) -> Result<()> {
        if max_length == 0 {
            return Err(OrcError::value("Maximum length must be positive"));
        }
        Ok(())
    }

    pub fn kind(&self) -> TypeKind {
        self.data_type.kind()
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn column_id(&self) -> u64 {
        self.column_id
    }

    /// Largest column id used by this subtree
    pub fn maximum_column_id(&self) -> u64 {
        match &self.data_type {
            DataType::List { element } => element.maximum_column_id(),
            DataType::Map { value, .. } => value.maximum_column_id(),
            DataType::Struct { fields } => fields
                .values()
                .last()
                .map_or(self.column_id, TypeDescription::maximum_column_id),
            DataType::Union { variants } => variants
                .last()
                .map_or(self.column_id, TypeDescription::maximum_column_id),
            _ => self.column_id,
        }
    }

    /// Number the subtree in pre-order starting at `id`
    ///
    /// Returns the largest id assigned, so the next free id is the return
    /// value plus one.
    pub fn set_column_id(&mut self, id: u64) -> u64 {
        self.column_id = id;
        match &mut self.data_type {
            DataType::List { element } => element.set_column_id(id + 1),
            DataType::Map { key, value } => {
                let last = key.set_column_id(id + 1);
                value.set_column_id(last + 1)
            }
            DataType::Struct { fields } => fields
                .values_mut()
                .fold(id, |last, field| field.set_column_id(last + 1)),
            DataType::Union { variants } => variants
                .iter_mut()
                .fold(id, |last, variant| variant.set_column_id(last + 1)),
            _ => id,
        }
    }

    fn renumber(&mut self) {
        let last = self.set_column_id(self.column_id);
        Logger::global().debug(|| {
            format!(
                "renumbered {} from column {} to {}",
                self.kind(),
                self.column_id,
                last
            )
        });
    }

    pub fn precision(&self) -> Option<u32> {
        match self.data_type {
            DataType::Decimal { precision, .. } => Some(precision),
            _ => None,
        }
    }

    pub fn scale(&self) -> Option<u32> {
        match self.data_type {
            DataType::Decimal { scale, .. } => Some(scale),
            _ => None,
        }
    }

    pub fn max_length(&self) -> Option<u64> {
        match self.data_type {
            DataType::Char { max_length } | DataType::VarChar { max_length } => Some(max_length),
            _ => None,
        }
    }

    pub fn set_precision(&mut self, value: u32) -> Result<()> {
        match &mut self.data_type {
            DataType::Decimal { precision, scale } => {
                Self::check_decimal(value, *scale)?;
                *precision = value;
                Ok(())
            }
            _ => Err(OrcError::type_error(format!(
                "Cannot set precision for a non decimal type ({})",
                self.kind()
            ))),
        }
    }

    pub fn set_scale(&mut self, value: u32) -> Result<()> {
        match &mut self.data_type {
            DataType::Decimal { precision, scale } => {
                Self::check_decimal(*precision, value)?;
                *scale = value;
                Ok(())
            }
            _ => Err(OrcError::type_error(format!(
                "Cannot set scale for a non decimal type ({})",
                self.kind()
            ))),
        }
    }

    pub fn set_max_length(&mut self, value: u64) -> Result<()> {
        match &mut self.data_type {
            DataType::Char { max_length } | DataType::VarChar { max_length } => {
                Self::check_max_length(value)?;
                *max_length = value;
                Ok(())
            }
            _ => Err(OrcError::type_error(format!(
                "Cannot set max_length for a non char or varchar type ({})",
                self.kind()
            ))),
        }
    }

    pub fn fields(&self) -> Option<&IndexMap<String, TypeDescription>> {
        match &self.data_type {
            DataType::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    /// Look up a direct struct field by name
    pub fn field(&self, name: &str) -> Result<&TypeDescription> {
        let fields = self.fields().ok_or_else(|| {
            OrcError::type_error(format!("{} has no fields", self.kind()))
        })?;
        fields
            .get(name)
            .ok_or_else(|| OrcError::not_found(format!("No field named `{}`", name)))
    }

    pub fn element(&self) -> Option<&TypeDescription> {
        match &self.data_type {
            DataType::List { element } => Some(&**element),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&TypeDescription> {
        match &self.data_type {
            DataType::Map { key, .. } => Some(&**key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&TypeDescription> {
        match &self.data_type {
            DataType::Map { value, .. } => Some(&**value),
            _ => None,
        }
    }

    pub fn variants(&self) -> Option<&[TypeDescription]> {
        match &self.data_type {
            DataType::Union { variants } => Some(variants),
            _ => None,
        }
    }

    /// Child types of a list, map or union in column order; empty otherwise
    pub fn container_types(&self) -> Vec<&TypeDescription> {
        match &self.data_type {
            DataType::List { element } => vec![element.as_ref()],
            DataType::Map { key, value } => vec![key.as_ref(), value.as_ref()],
            DataType::Union { variants } => variants.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Replace the child types of a list, map or union and renumber
    pub fn set_container_types(&mut self, types: Vec<TypeDescription>) -> Result<()> {
        let kind = self.kind();
        let data_type = match kind {
            TypeKind::List => {
                let [element]: [TypeDescription; 1] = types.try_into().map_err(|_| {
                    OrcError::value("For list type container types must contain one element")
                })?;
                DataType::List {
                    element: Box::new(element),
                }
            }
            TypeKind::Map => {
                let [key, value]: [TypeDescription; 2] = types.try_into().map_err(|_| {
                    OrcError::value("For map type container types must contain two elements")
                })?;
                DataType::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            TypeKind::Union => {
                if types.is_empty() {
                    return Err(OrcError::value(
                        "For union type container types cannot be empty",
                    ));
                }
                DataType::Union { variants: types }
            }
            _ => {
                return Err(OrcError::type_error(format!(
                    "Not allowed to set container types on {}",
                    kind
                )))
            }
        };
        self.data_type = data_type;
        self.renumber();
        Ok(())
    }

    /// Append a struct field, or replace an existing field's type in place
    pub fn add_field<S: Into<String>>(&mut self, name: S, field: TypeDescription) -> Result<()> {
        let kind = self.kind();
        match &mut self.data_type {
            DataType::Struct { fields } => {
                fields.insert(name.into(), field);
            }
            _ => {
                return Err(OrcError::type_error(format!(
                    "Not allowed to add field to a non struct type ({})",
                    kind
                )))
            }
        }
        self.renumber();
        Ok(())
    }

    /// Remove a struct field and renumber the remaining ones
    pub fn remove_field(&mut self, name: &str) -> Result<TypeDescription> {
        let kind = self.kind();
        let removed = match &mut self.data_type {
            DataType::Struct { fields } => fields
                .shift_remove(name)
                .ok_or_else(|| OrcError::not_found(format!("No field named `{}`", name)))?,
            _ => {
                return Err(OrcError::type_error(format!(
                    "Not allowed to remove field from a non struct type ({})",
                    kind
                )))
            }
        };
        self.renumber();
        Ok(removed)
    }

    /// Resolve a dotted, back-tick aware path to a column id
    pub fn find_column_id(&self, path: &str) -> Result<u64> {
        let mut node = self;
        for segment in split_dotted_path(path)? {
            node = match &node.data_type {
                DataType::Struct { fields } => fields.get(&segment).ok_or_else(|| {
                    OrcError::not_found(format!("Column `{}` not found: no field `{}`", path, segment))
                })?,
                _ => {
                    return Err(OrcError::not_found(format!(
                        "Column `{}` not found: {} has no field `{}`",
                        path,
                        node.kind(),
                        segment
                    )))
                }
            };
        }
        Ok(node.column_id)
    }

    /// Locate the node that owns `column_id`
    pub fn find_type(&self, column_id: u64) -> Result<&TypeDescription> {
        if column_id == self.column_id {
            return Ok(self);
        }
        self.children()
            .into_iter()
            .find(|child| child.column_id <= column_id && column_id <= child.maximum_column_id())
            .ok_or_else(|| OrcError::not_found(format!("Column {} not found", column_id)))
            .and_then(|child| child.find_type(column_id))
    }

    /// Direct children in column order
    pub fn children(&self) -> Vec<&TypeDescription> {
        match &self.data_type {
            DataType::Struct { fields } => fields.values().collect(),
            _ => self.container_types(),
        }
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Replace the attribute map
    pub fn set_attributes<I, K, V>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }
}

impl FromStr for TypeDescription {
    type Err = OrcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data_type {
            DataType::Char { max_length } => write!(f, "char({})", max_length),
            DataType::VarChar { max_length } => write!(f, "varchar({})", max_length),
            DataType::Decimal { precision, scale } => write!(f, "decimal({},{})", precision, scale),
            DataType::List { element } => write!(f, "array<{}>", element),
            DataType::Map { key, value } => write!(f, "map<{},{}>", key, value),
            DataType::Struct { fields } => {
                f.write_str("struct<")?;
                for (idx, (name, field)) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{}", quote_field_name(name), field)?;
                }
                f.write_str(">")
            }
            DataType::Union { variants } => {
                f.write_str("uniontype<")?;
                for (idx, variant) in variants.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", variant)?;
                }
                f.write_str(">")
            }
            other => f.write_str(other.kind().name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> TypeDescription {
        TypeDescription::from_kind(TypeKind::Int).unwrap()
    }

    #[test]
    fn test_from_str_schema() {
        let descr: TypeDescription = "struct<a:int,b:map<varchar(20),int>,c:struct<d:bigint,e:float>>"
            .parse()
            .unwrap();
        assert_eq!(descr.kind(), TypeKind::Struct);
        let fields = descr.fields().unwrap();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(fields["a"].kind(), TypeKind::Int);
        assert_eq!(fields["a"].precision(), None);
        assert_eq!(fields["b"].scale(), None);
        assert_eq!(fields["b"].column_id(), 2);
        assert_eq!(fields["b"].key().unwrap().kind(), TypeKind::VarChar);
        assert_eq!(fields["b"].key().unwrap().max_length(), Some(20));
        assert_eq!(fields["b"].value().unwrap().column_id(), 4);
        assert_eq!(fields["c"].max_length(), None);
        assert_eq!(fields["c"].field("e").unwrap().column_id(), 7);
        assert_eq!(descr.maximum_column_id(), 7);
    }

    #[test]
    fn test_struct_constructor_numbers_fields() {
        let descr = TypeDescription::structure([
            ("x", int()),
            ("y", TypeDescription::list(int())),
            ("z", int()),
        ])
        .unwrap();
        assert_eq!(descr.field("y").unwrap().element().unwrap().column_id(), 3);
        assert_eq!(descr.field("z").unwrap().column_id(), 4);

        let err = TypeDescription::structure([("x", int()), ("x", int())]).unwrap_err();
        assert!(matches!(err, OrcError::Value(_)));
    }

    #[test]
    fn test_set_column_id_with_base() {
        let mut descr = TypeDescription::parse("map<string,struct<a:int,b:int>>").unwrap();
        let last = descr.set_column_id(10);
        assert_eq!(last, 14);
        assert_eq!(descr.key().unwrap().column_id(), 11);
        assert_eq!(descr.value().unwrap().column_id(), 12);
        assert_eq!(descr.value().unwrap().field("b").unwrap().column_id(), 14);
    }

    #[test]
    fn test_decimal_setters() {
        let mut descr = TypeDescription::from_kind(TypeKind::Decimal).unwrap();
        descr.set_scale(3).unwrap();
        descr.set_precision(5).unwrap();
        assert_eq!(descr.precision(), Some(5));
        assert_eq!(descr.scale(), Some(3));
        assert_eq!(descr.to_string(), "decimal(5,3)");
        assert!(matches!(descr.set_scale(6), Err(OrcError::Value(_))));
        assert!(matches!(descr.set_precision(39), Err(OrcError::Value(_))));
    }

    #[test]
    fn test_setters_reject_other_kinds() {
        let mut descr = TypeDescription::from_kind(TypeKind::VarChar).unwrap();
        assert!(matches!(descr.set_precision(3), Err(OrcError::Type(_))));
        assert!(matches!(descr.set_scale(2), Err(OrcError::Type(_))));
        descr.set_max_length(15).unwrap();
        assert_eq!(descr.to_string(), "varchar(15)");

        let mut descr = TypeDescription::from_kind(TypeKind::Long).unwrap();
        assert!(matches!(descr.set_max_length(3), Err(OrcError::Type(_))));
    }

    #[test]
    fn test_container_types() {
        let mut descr = TypeDescription::parse("map<string,int>").unwrap();
        assert_eq!(descr.container_types().len(), 2);
        descr
            .set_container_types(vec![
                int(),
                TypeDescription::from_kind(TypeKind::String).unwrap(),
            ])
            .unwrap();
        assert_eq!(descr.to_string(), "map<int,string>");
        assert_eq!(descr.container_types()[0].column_id(), 1);
        assert!(matches!(
            descr.set_container_types(vec![int()]),
            Err(OrcError::Value(_))
        ));

        let mut descr = TypeDescription::parse("array<string>").unwrap();
        descr.set_container_types(vec![int()]).unwrap();
        assert_eq!(descr.to_string(), "array<int>");
        assert!(descr.set_container_types(vec![int(), int()]).is_err());

        let mut descr = TypeDescription::parse("uniontype<string,int,double>").unwrap();
        assert_eq!(descr.container_types().len(), 3);
        assert!(matches!(
            descr.set_container_types(Vec::new()),
            Err(OrcError::Value(_))
        ));

        let mut descr = TypeDescription::parse("string").unwrap();
        assert!(descr.container_types().is_empty());
        assert!(matches!(
            descr.set_container_types(vec![int()]),
            Err(OrcError::Type(_))
        ));
    }

    #[test]
    fn test_add_field() {
        let mut descr = TypeDescription::parse("string").unwrap();
        assert!(matches!(descr.add_field("test", int()), Err(OrcError::Type(_))));

        let mut descr = TypeDescription::from_kind(TypeKind::Struct).unwrap();
        assert!(descr.fields().unwrap().is_empty());
        assert_eq!(descr.to_string(), "struct<>");
        descr.add_field("a", int()).unwrap();
        descr
            .add_field("b", TypeDescription::from_kind(TypeKind::String).unwrap())
            .unwrap();
        assert_eq!(descr.field("b").unwrap().column_id(), 2);
        assert_eq!(descr.to_string(), "struct<a:int,b:string>");

        descr
            .add_field("a", TypeDescription::parse("array<double>").unwrap())
            .unwrap();
        assert_eq!(descr.to_string(), "struct<a:array<double>,b:string>");
        assert_eq!(descr.field("b").unwrap().column_id(), 3);
    }

    #[test]
    fn test_remove_field() {
        let mut descr = TypeDescription::parse("string").unwrap();
        assert!(matches!(descr.remove_field("test"), Err(OrcError::Type(_))));

        let mut descr = TypeDescription::parse("struct<a:double,b:string>").unwrap();
        assert_eq!(descr.field("b").unwrap().column_id(), 2);
        let removed = descr.remove_field("a").unwrap();
        assert_eq!(removed.kind(), TypeKind::Double);
        assert!(matches!(descr.remove_field("c"), Err(OrcError::NotFound(_))));
        assert_eq!(descr.field("b").unwrap().column_id(), 1);
        assert_eq!(descr.to_string(), "struct<b:string>");
    }

    #[test]
    fn test_find_column_id() {
        let descr = TypeDescription::parse("struct<a:struct<b:struct<c:int,d:string>,e:int>>").unwrap();
        assert_eq!(descr.find_column_id("a").unwrap(), 1);
        assert_eq!(descr.find_column_id("a.b.c").unwrap(), 3);
        assert_eq!(descr.find_column_id("a.e").unwrap(), 5);
        assert!(matches!(
            descr.find_column_id("f.z"),
            Err(OrcError::NotFound(_))
        ));
        assert!(matches!(
            descr.find_column_id("a.e.x"),
            Err(OrcError::NotFound(_))
        ));
        assert!(matches!(
            descr.find_column_id("a.`b"),
            Err(OrcError::Value(_))
        ));
    }

    #[test]
    fn test_find_column_id_quoted() {
        let descr = TypeDescription::parse("struct<`a.b`:int,a:struct<b:string>>").unwrap();
        assert_eq!(descr.find_column_id("`a.b`").unwrap(), 1);
        assert_eq!(descr.find_column_id("a.b").unwrap(), 3);
    }

    #[test]
    fn test_find_type() {
        let descr =
            TypeDescription::parse("struct<a:int,b:map<string,array<int>>,c:uniontype<int,date>>")
                .unwrap();
        assert_eq!(descr.find_type(0).unwrap().kind(), TypeKind::Struct);
        assert_eq!(descr.find_type(5).unwrap().kind(), TypeKind::Int);
        assert_eq!(descr.find_type(8).unwrap().kind(), TypeKind::Date);
        assert!(matches!(descr.find_type(9), Err(OrcError::NotFound(_))));
    }

    #[test]
    fn test_equality_ignores_attributes() {
        let mut lhs = TypeDescription::parse("struct<a:int>").unwrap();
        let rhs = TypeDescription::parse("struct<a:int>").unwrap();
        lhs.set_attributes([("encoding", "utf8")]);
        assert_eq!(lhs, rhs);
        assert_eq!(lhs.attribute("encoding"), Some("utf8"));
        assert_eq!(lhs.to_string(), rhs.to_string());
        assert_ne!(lhs, TypeDescription::parse("struct<a:bigint>").unwrap());
    }

    #[test]
    fn test_from_kind_rejects_containers() {
        for kind in [TypeKind::List, TypeKind::Map, TypeKind::Union] {
            assert!(matches!(
                TypeDescription::from_kind(kind),
                Err(OrcError::Type(_))
            ));
        }
        assert_eq!(
            TypeDescription::from_kind(TypeKind::Char).unwrap().to_string(),
            "char(256)"
        );
    }
}
