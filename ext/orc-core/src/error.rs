use thiserror::Error;

/// Core error type for ORC schema, predicate and conversion operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrcError {
    /// Malformed schema string: unknown kind, bad nesting, trailing input
    #[error("Parse error: {0}")]
    Parse(String),

    /// Operation not valid for the node's kind or the argument's type
    #[error("Type error: {0}")]
    Type(String),

    /// Well typed but semantically invalid argument
    #[error("Value error: {0}")]
    Value(String),

    /// Dotted path, field name or column id does not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// A value cannot be coerced to or from its native form
    #[error("Conversion error: {0}")]
    Conversion(String),
}

/// Result type alias for ORC core operations
pub type Result<T> = std::result::Result<T, OrcError>;

impl OrcError {
    /// Create a new grammar error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        OrcError::Parse(msg.into())
    }

    /// Create a new domain/type error
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        OrcError::Type(msg.into())
    }

    /// Create a new value error
    pub fn value<S: Into<String>>(msg: S) -> Self {
        OrcError::Value(msg.into())
    }

    /// Create a new lookup error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        OrcError::NotFound(msg.into())
    }

    /// Create a new conversion error
    pub fn conversion<S: Into<String>>(msg: S) -> Self {
        OrcError::Conversion(msg.into())
    }

    fn map_message(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            OrcError::Parse(m) => OrcError::Parse(f(m)),
            OrcError::Type(m) => OrcError::Type(f(m)),
            OrcError::Value(m) => OrcError::Value(f(m)),
            OrcError::NotFound(m) => OrcError::NotFound(f(m)),
            OrcError::Conversion(m) => OrcError::Conversion(f(m)),
        }
    }
}

impl From<jiff::Error> for OrcError {
    fn from(err: jiff::Error) -> Self {
        OrcError::Conversion(err.to_string())
    }
}

impl From<std::num::ParseIntError> for OrcError {
    fn from(err: std::num::ParseIntError) -> Self {
        OrcError::Parse(err.to_string())
    }
}

/// Extension trait to add context to errors
///
/// Unlike a plain `map_err`, the category of the underlying error is kept so
/// callers can still tell a lookup failure from a conversion failure.
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, ctx: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<OrcError>,
{
    fn context<S: Into<String>>(self, ctx: S) -> Result<T> {
        self.map_err(|e| {
            let ctx = ctx.into();
            e.into().map_message(|m| format!("{}: {}", ctx, m))
        })
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let ctx = f().into();
            e.into().map_message(|m| format!("{}: {}", ctx, m))
        })
    }
}
