//! Environment-style sources.
//!
//! An [`EnvSource`] reads from exactly one origin: the live process
//! environment, a dotenv buffer, a dotenv file, a reader, or synthetic pairs.
//! Fields are looked up through their `env` override annotation, falling
//! back to the uppercased `key` annotation.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use crate::decode::{Decoder, Schema};
use crate::error::EnvbindError;
use crate::file;
use crate::key::{ENV_TAG, KeyNaming};
use crate::types::Companion;

/// Something that materializes key/value data and decodes a destination
/// from it.
pub trait Source {
    /// Override annotation this source consults.
    fn key_tag(&self) -> &str;

    /// Decode `destination`. Returns `false` when the source was absent and
    /// that is allowed.
    fn parse(
        &mut self,
        companion: &dyn Companion,
        destination: &mut dyn Schema,
    ) -> Result<bool, EnvbindError>;
}

enum Origin {
    Process,
    Bytes(Vec<u8>),
    Path(PathBuf),
    Reader(Option<Box<dyn Read>>),
    Vars(HashMap<String, String>),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Process => f.write_str("process environment"),
            Origin::Bytes(_) => f.write_str("in-memory buffer"),
            Origin::Path(path) => write!(f, "{}", path.display()),
            Origin::Reader(_) => f.write_str("reader"),
            Origin::Vars(_) => f.write_str("key/value pairs"),
        }
    }
}

/// Source of environment-style key/value pairs.
///
/// ```ignore
/// let mut config = AppConfig::default();
/// EnvSource::path(".env").prefix("APP").parse(&DefaultCompanion, &mut config)?;
/// ```
pub struct EnvSource {
    origin: Origin,
    must: bool,
    prefix: String,
    naming: KeyNaming,
}

impl fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSource")
            .field("origin", &self.origin.to_string())
            .field("must", &self.must)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl EnvSource {
    fn new(origin: Origin) -> Self {
        Self {
            origin,
            must: false,
            prefix: String::new(),
            naming: KeyNaming::new(ENV_TAG),
        }
    }

    /// Read the live process environment.
    pub fn env() -> Self {
        Self::new(Origin::Process)
    }

    /// Parse an in-memory dotenv buffer.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::new(Origin::Bytes(data.into()))
    }

    pub fn string(data: &str) -> Self {
        Self::bytes(data)
    }

    /// Parse the dotenv file at `path`.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::new(Origin::Path(path.into()))
    }

    /// Parse dotenv data from a reader. The reader is consumed by the first
    /// parse.
    pub fn reader(reader: impl Read + 'static) -> Self {
        Self::new(Origin::Reader(Some(Box::new(reader))))
    }

    /// Use already-materialized pairs.
    pub fn vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self::new(Origin::Vars(vars))
    }

    /// Fail when the source does not exist instead of skipping it.
    pub fn must(mut self) -> Self {
        self.must = true;
        self
    }

    /// Prefix joined in front of every top-level key.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Replace the case converter applied to fallback keys (default: uppercase).
    pub fn key_converter(mut self, converter: impl Fn(&str) -> String + 'static) -> Self {
        self.naming = self.naming.converter(converter);
        self
    }

    /// Replace the function joining a prefix and a key (default:
    /// [`default_joiner`](crate::default_joiner)).
    pub fn key_joiner(mut self, joiner: impl Fn(&str, &str) -> String + 'static) -> Self {
        self.naming = self.naming.joiner(joiner);
        self
    }

    fn load(&mut self) -> Result<Option<HashMap<String, String>>, EnvbindError> {
        let origin = self.origin.to_string();
        let vars = match &mut self.origin {
            Origin::Process => return Ok(None),
            Origin::Vars(vars) => vars.clone(),
            Origin::Bytes(data) => file::read_vars(data.as_slice(), &origin)?,
            Origin::Path(path) => file::load_path(path)?,
            Origin::Reader(reader) => {
                let reader = reader.take().ok_or(EnvbindError::ReaderConsumed)?;
                file::read_vars(reader, &origin)?
            }
        };
        Ok(Some(vars))
    }
}

impl Source for EnvSource {
    fn key_tag(&self) -> &str {
        self.naming.tag()
    }

    fn parse(
        &mut self,
        companion: &dyn Companion,
        destination: &mut dyn Schema,
    ) -> Result<bool, EnvbindError> {
        debug!(origin = %self.origin, prefix = %self.prefix, "loading env source");
        let vars = match self.load() {
            Ok(vars) => vars,
            Err(EnvbindError::SourceNotFound { .. }) if !self.must => {
                debug!(origin = %self.origin, "env source not found, skipping");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let decoder_result = match &vars {
            Some(vars) => {
                let lookup = |key: &str| vars.get(key).cloned();
                Decoder::new(&lookup, companion, &self.naming).decode(&self.prefix, destination)
            }
            None => {
                let lookup = |key: &str| std::env::var(key).ok();
                Decoder::new(&lookup, companion, &self.naming).decode(&self.prefix, destination)
            }
        };
        decoder_result.map(|()| true)
    }
}
