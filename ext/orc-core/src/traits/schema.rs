use crate::schema::{quote_field_name, split_dotted_path, DataType, TypeDescription};

/// Path segment naming a list's element
pub const LIST_ELEMENT: &str = "_elem";
/// Path segment naming a map's key
pub const MAP_KEY: &str = "_key";
/// Path segment naming a map's value
pub const MAP_VALUE: &str = "_value";

/// Trait for schema introspection
///
/// This trait provides methods for examining and querying schemas
/// without modifying them. Paths are dotted and relative to the root node:
/// struct fields by name (back-tick quoted where needed), list elements as
/// `_elem`, map children as `_key` / `_value` and union variants by position.
pub trait SchemaInspector {
    /// Get the total number of nodes, the root included
    fn field_count(&self) -> usize;

    /// Get node by path (e.g., "address.city" or "tags._elem")
    fn get_field_by_path(&self, path: &str) -> Option<&TypeDescription>;

    /// Check if schema contains a specific path
    fn has_field(&self, path: &str) -> bool;

    /// Get all paths in the schema in column order
    fn all_field_paths(&self) -> Vec<String>;
}

impl SchemaInspector for TypeDescription {
    fn field_count(&self) -> usize {
        count_nodes(self)
    }

    fn get_field_by_path(&self, path: &str) -> Option<&TypeDescription> {
        let parts = split_dotted_path(path).ok()?;
        parts
            .iter()
            .try_fold(self, |node, part| child_by_segment(node, part))
    }

    fn has_field(&self, path: &str) -> bool {
        self.get_field_by_path(path).is_some()
    }

    fn all_field_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_paths(self, None, &mut paths);
        paths
    }
}

fn count_nodes(node: &TypeDescription) -> usize {
    1 + node.children().into_iter().map(count_nodes).sum::<usize>()
}

fn child_by_segment<'a>(node: &'a TypeDescription, segment: &str) -> Option<&'a TypeDescription> {
    match node.data_type() {
        DataType::Struct { fields } => fields.get(segment),
        DataType::List { element } if segment == LIST_ELEMENT => Some(&**element),
        DataType::Map { key, value } => match segment {
            MAP_KEY => Some(&**key),
            MAP_VALUE => Some(&**value),
            _ => None,
        },
        DataType::Union { variants } => segment
            .parse::<usize>()
            .ok()
            .and_then(|idx| variants.get(idx)),
        _ => None,
    }
}

fn collect_paths(node: &TypeDescription, prefix: Option<&str>, paths: &mut Vec<String>) {
    let mut visit = |segment: &str, child: &TypeDescription| {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, segment),
            None => segment.to_string(),
        };
        paths.push(path.clone());
        collect_paths(child, Some(&path), paths);
    };

    match node.data_type() {
        DataType::Struct { fields } => {
            for (name, field) in fields {
                visit(&quote_field_name(name), field);
            }
        }
        DataType::List { element } => visit(LIST_ELEMENT, &**element),
        DataType::Map { key, value } => {
            visit(MAP_KEY, &**key);
            visit(MAP_VALUE, &**value);
        }
        DataType::Union { variants } => {
            for (idx, variant) in variants.iter().enumerate() {
                visit(&idx.to_string(), variant);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::TypeKind;

    #[test]
    fn test_schema_inspector() {
        let schema = TypeDescription::parse(
            "struct<id:bigint,address:struct<city:string>,tags:array<string>>",
        )
        .unwrap();

        // root, id, address, city, tags, tags._elem
        assert_eq!(schema.field_count(), 6);

        assert!(schema.has_field("id"));
        assert!(schema.has_field("address"));
        assert!(schema.has_field("address.city"));
        assert!(schema.has_field("tags._elem"));
        assert!(!schema.has_field("missing"));
        assert!(!schema.has_field("id.nested"));

        let city = schema.get_field_by_path("address.city").unwrap();
        assert_eq!(city.kind(), TypeKind::String);
        assert_eq!(city.column_id(), 3);
    }

    #[test]
    fn test_all_field_paths() {
        let schema =
            TypeDescription::parse("struct<`a.b`:int,m:map<string,uniontype<int,date>>>").unwrap();
        assert_eq!(
            schema.all_field_paths(),
            vec![
                "`a.b`",
                "m",
                "m._key",
                "m._value",
                "m._value.0",
                "m._value.1"
            ]
        );
        for path in schema.all_field_paths() {
            assert!(schema.has_field(&path), "{path}");
        }
        assert_eq!(
            schema.get_field_by_path("m._value.1").unwrap().kind(),
            TypeKind::Date
        );
    }

    #[test]
    fn test_primitive_root() {
        let schema = TypeDescription::parse("int").unwrap();
        assert_eq!(schema.field_count(), 1);
        assert!(schema.all_field_paths().is_empty());
        assert!(!schema.has_field("x"));
    }
}
