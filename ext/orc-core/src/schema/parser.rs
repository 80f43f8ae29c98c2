//! Recursive-descent parser for the ORC schema grammar
//!
//! ```text
//! type  := primitive | "char(" int ")" | "varchar(" int ")"
//!        | "decimal(" int "," int ")" | "array<" type ">"
//!        | "map<" type "," type ">" | "struct<" [field ("," field)*] ">"
//!        | "uniontype<" type ("," type)* ">"
//! field := name ":" type
//! ```

use indexmap::IndexMap;

use super::{DataType, TypeDescription};
use crate::error::{OrcError, Result};

/// Deepest container nesting accepted before giving up.
const MAX_NESTING_DEPTH: usize = 256;

const TIMESTAMP_INSTANT: &str = "timestamp with local time zone";

pub(super) fn parse_type_description(input: &str) -> Result<TypeDescription> {
    let mut parser = Parser { input, pos: 0 };
    let data_type = parser.parse_data_type(0)?;
    if parser.pos != input.len() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(TypeDescription::new(data_type))
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn error(&self, msg: &str) -> OrcError {
        OrcError::parse(format!(
            "{} at position {} in {:?}",
            msg, self.pos, self.input
        ))
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.pos += ch.len_utf8();
                Ok(())
            }
            Some(ch) => Err(self.error(&format!("expected '{}' but found '{}'", expected, ch))),
            None => Err(self.error(&format!("expected '{}' but input ended", expected))),
        }
    }

    fn consume_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| !pred(c))
            .unwrap_or(self.rest().len());
        self.pos += len;
        &self.input[start..start + len]
    }

    fn parse_number<T: std::str::FromStr>(&mut self) -> Result<T> {
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.error("expected a number"));
        }
        digits
            .parse::<T>()
            .map_err(|_| self.error(&format!("number {} out of range", digits)))
    }

    fn parse_data_type(&mut self, depth: usize) -> Result<DataType> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.error("type nesting too deep"));
        }
        if self.rest().starts_with(TIMESTAMP_INSTANT) {
            self.pos += TIMESTAMP_INSTANT.len();
            return Ok(DataType::TimestampInstant);
        }

        let start = self.pos;
        let word = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let data_type = match word {
            "boolean" => DataType::Boolean,
            "tinyint" => DataType::Byte,
            "smallint" => DataType::Short,
            "int" => DataType::Int,
            "bigint" => DataType::Long,
            "float" => DataType::Float,
            "double" => DataType::Double,
            "string" => DataType::String,
            "binary" => DataType::Binary,
            "timestamp" => DataType::Timestamp,
            "date" => DataType::Date,
            "char" | "varchar" => {
                self.expect('(')?;
                let max_length = self.parse_number::<u64>()?;
                self.expect(')')?;
                TypeDescription::check_max_length(max_length)
                    .map_err(|e| self.error(&e.to_string()))?;
                if word == "char" {
                    DataType::Char { max_length }
                } else {
                    DataType::VarChar { max_length }
                }
            }
            "decimal" => {
                self.expect('(')?;
                let precision = self.parse_number::<u32>()?;
                self.expect(',')?;
                let scale = self.parse_number::<u32>()?;
                self.expect(')')?;
                TypeDescription::check_decimal(precision, scale)
                    .map_err(|e| self.error(&e.to_string()))?;
                DataType::Decimal { precision, scale }
            }
            "array" => {
                self.expect('<')?;
                let element = self.parse_child(depth)?;
                self.expect('>')?;
                DataType::List {
                    element: Box::new(element),
                }
            }
            "map" => {
                self.expect('<')?;
                let key = self.parse_child(depth)?;
                self.expect(',')?;
                let value = self.parse_child(depth)?;
                self.expect('>')?;
                DataType::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            "struct" => self.parse_struct(depth)?,
            "uniontype" => {
                self.expect('<')?;
                let mut variants = vec![self.parse_child(depth)?];
                while self.consume_if(',') {
                    variants.push(self.parse_child(depth)?);
                }
                self.expect('>')?;
                DataType::Union { variants }
            }
            "" => return Err(self.error("expected a type name")),
            other => {
                self.pos = start;
                return Err(self.error(&format!("unknown type kind `{}`", other)));
            }
        };
        Ok(data_type)
    }

    fn parse_child(&mut self, depth: usize) -> Result<TypeDescription> {
        let data_type = self.parse_data_type(depth + 1)?;
        Ok(TypeDescription::from_data_type(data_type))
    }

    fn parse_struct(&mut self, depth: usize) -> Result<DataType> {
        self.expect('<')?;
        let mut fields = IndexMap::new();
        if self.consume_if('>') {
            return Ok(DataType::Struct { fields });
        }
        loop {
            let name = self.parse_field_name()?;
            self.expect(':')?;
            let field = self.parse_child(depth)?;
            if fields.insert(name.clone(), field).is_some() {
                return Err(self.error(&format!("duplicate field name `{}`", name)));
            }
            if !self.consume_if(',') {
                break;
            }
        }
        self.expect('>')?;
        Ok(DataType::Struct { fields })
    }

    fn parse_field_name(&mut self) -> Result<String> {
        if !self.consume_if('`') {
            let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            if name.is_empty() {
                return Err(self.error("expected a field name"));
            }
            return Ok(name.to_string());
        }

        let mut name = String::new();
        loop {
            match self.peek() {
                Some('`') => {
                    self.pos += 1;
                    if self.consume_if('`') {
                        name.push('`');
                    } else {
                        return Ok(name);
                    }
                }
                Some(ch) => {
                    self.pos += ch.len_utf8();
                    name.push(ch);
                }
                None => return Err(self.error("unterminated back-tick in field name")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::TypeKind;

    #[test]
    fn test_primitives() {
        for (text, kind) in [
            ("boolean", TypeKind::Boolean),
            ("tinyint", TypeKind::Byte),
            ("smallint", TypeKind::Short),
            ("int", TypeKind::Int),
            ("bigint", TypeKind::Long),
            ("float", TypeKind::Float),
            ("double", TypeKind::Double),
            ("string", TypeKind::String),
            ("binary", TypeKind::Binary),
            ("timestamp", TypeKind::Timestamp),
            ("timestamp with local time zone", TypeKind::TimestampInstant),
            ("date", TypeKind::Date),
        ] {
            assert_eq!(parse_type_description(text).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_nested_commas_do_not_split() {
        let descr =
            parse_type_description("struct<m:map<string,array<int>>,u:uniontype<int,string>>")
                .unwrap();
        let fields = descr.fields().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["m"].kind(), TypeKind::Map);
        assert_eq!(fields["u"].variants().unwrap().len(), 2);
    }

    #[test]
    fn test_quoted_field_names() {
        let descr = parse_type_description("struct<`a.b`:int,`x``y`:string>").unwrap();
        let names: Vec<_> = descr.fields().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["a.b".to_string(), "x`y".to_string()]);
    }

    #[test]
    fn test_grammar_errors() {
        for text in [
            "struct<a:int,",
            "struct<a:int",
            "in",
            "map<int>",
            "array<int,int>",
            "char(",
            "char(0)",
            "varchar(0)",
            "decimal(10)",
            "uniontype<>",
            "int>",
            "struct<`a:int>",
            "struct<a:int,a:string>",
            "",
        ] {
            let err = parse_type_description(text).unwrap_err();
            assert!(matches!(err, OrcError::Parse(_)), "{text:?} gave {err:?}");
        }
    }

    #[test]
    fn test_nesting_limit() {
        let text = format!("{}int{}", "array<".repeat(300), ">".repeat(300));
        assert!(matches!(
            parse_type_description(&text),
            Err(OrcError::Parse(_))
        ));
    }
}
