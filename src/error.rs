use thiserror::Error;

/// Boxed error returned by element conversions and custom text decoders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum EnvbindError {
    #[error("Neither annotation '{tag}' nor a fallback key has been set for field '{field}'")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envbind::missing_key),
            help("add #[bind(key = \"...\")] or a source-specific override such as #[bind(env = \"...\")]")
        )
    )]
    MissingKey { field: String, tag: String },

    #[error("Field '{field}' has unsupported type '{type_name}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envbind::unsupported_type)))]
    UnsupportedType { field: String, type_name: String },

    #[error("Value '{value}' isn't parsable as '{expected}' for field '{field}': {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envbind::parse_value)))]
    ParseValue {
        field: String,
        value: String,
        expected: String,
        source: BoxError,
    },

    #[error("Invalid map entry {index} ('{entry}') for field '{field}': {problem}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(envbind::map_entry),
            help("map entries are written as key=value; escape literal '=' and ',' with a backslash")
        )
    )]
    MapEntry {
        field: String,
        index: usize,
        entry: String,
        problem: String,
    },

    #[error("Field '{field}' expects exactly {expected} elements, got {actual}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envbind::array_length)))]
    ArrayLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Source not found: {origin}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envbind::source_not_found)))]
    SourceNotFound { origin: String },

    #[error("Source path {origin} is not a file")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envbind::not_a_file)))]
    NotAFile { origin: String },

    #[error("Failed to read {origin}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envbind::io)))]
    Io {
        origin: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {message}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envbind::syntax)))]
    Syntax { origin: String, message: String },

    #[error("Reader source has already been consumed")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envbind::reader_consumed)))]
    ReaderConsumed,

    #[error("No sources configured. Call .add_source() on the builder")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(envbind::no_sources)))]
    NoSources,
}

/// Coarse classification of [`EnvbindError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingKey,
    UnsupportedType,
    ParseValue,
    SourceUnavailable,
    NoSources,
}

impl EnvbindError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnvbindError::MissingKey { .. } => ErrorKind::MissingKey,
            EnvbindError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            EnvbindError::ParseValue { .. }
            | EnvbindError::MapEntry { .. }
            | EnvbindError::ArrayLength { .. } => ErrorKind::ParseValue,
            EnvbindError::SourceNotFound { .. }
            | EnvbindError::NotAFile { .. }
            | EnvbindError::Io { .. }
            | EnvbindError::Syntax { .. }
            | EnvbindError::ReaderConsumed => ErrorKind::SourceUnavailable,
            EnvbindError::NoSources => ErrorKind::NoSources,
        }
    }

    pub fn is_parse_value(&self) -> bool {
        self.kind() == ErrorKind::ParseValue
    }

    pub(crate) fn parse_value(
        field: &str,
        value: &str,
        expected: impl ToString,
        source: impl Into<BoxError>,
    ) -> Self {
        EnvbindError::ParseValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn unsupported(field: &str, type_name: impl ToString) -> Self {
        EnvbindError::UnsupportedType {
            field: field.to_string(),
            type_name: type_name.to_string(),
        }
    }
}
