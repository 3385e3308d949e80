//! Bind flat key/value pairs into nested, typed Rust structs. Annotate a
//! struct, point it at the environment or a dotenv file, and go.
//!
//! ```ignore
//! use envbind::{Bind, EnvSource, Envbind};
//!
//! #[derive(Bind, Default)]
//! pub struct AppConfig {
//!     #[bind(key = "host")]
//!     pub host: String,
//!     #[bind(key = "port")]
//!     pub port: u16,
//!     #[bind(key = "database")]
//!     pub database: Database,
//! }
//!
//! #[derive(Bind, Default)]
//! pub struct Database {
//!     #[bind(key = "url")]
//!     pub url: Option<String>,
//!     #[bind(key = "pool_size")]
//!     pub pool_size: usize,
//! }
//!
//! let config: AppConfig = Envbind::builder()
//!     .add_source(EnvSource::path(".env"))
//!     .add_source(EnvSource::env().prefix("APP"))
//!     .load()?;
//! ```
//!
//! That reads `APP_HOST`, `APP_PORT`, `APP_DATABASE_URL` and
//! `APP_DATABASE_POOL_SIZE`, first from `.env` (skipped when missing), then
//! from the process environment, and hands you a typed struct.
//!
//! # Keys
//!
//! Every decoded field needs a key. The `env` annotation names the variable
//! verbatim; otherwise the generic `key` annotation is passed through the
//! source's case converter (uppercase by default). Nested structs join their
//! own key in front of their fields' keys with a single `_`.
//!
//! ```text
//! #[bind(key = "pool_size")]            -> POOL_SIZE
//! #[bind(key = "url", env = "DB_URL")]  -> DB_URL
//! nested under `database`, prefix APP   -> APP_DATABASE_POOL_SIZE
//! ```
//!
//! A field with neither annotation fails with
//! [`EnvbindError::MissingKey`]. Private fields and fields flagged
//! `#[bind(ignore)]` are left alone.
//!
//! # Values
//!
//! - Integers are base-10 and checked against their exact width.
//! - Floats follow the JSON number grammar.
//! - Booleans are `true` or `false` in any letter case.
//! - [`Duration`](std::time::Duration) fields take literals such as `1h30m`
//!   or `250ms`.
//! - `Vec<T>` and `[T; N]` take comma-separated elements; `HashMap` and
//!   `BTreeMap` take `key=value` entries separated by commas. A backslash
//!   escapes the next character, so `a\,b` is one element.
//! - `Option<T>` at any depth wraps the parsed value in as many `Some`s as
//!   the type declares.
//!
//! Types with their own text format implement [`TextDecode`] and derive
//! with `#[bind(text)]`. [`Json`] covers anything serde can deserialize.
//!
//! # Defaults survive
//!
//! Decoding only writes fields whose keys are present with a non-zero
//! value. Whatever the destination already holds, at any nesting depth,
//! stays in place otherwise. An `Option<Struct>` that is `None` stays `None`
//! unless at least one of its fields decodes to something non-zero.
//!
//! # Errors
//!
//! All fallible operations return [`EnvbindError`]; [`EnvbindError::kind`]
//! groups the variants. Decoding stops at the first error, and fields
//! decoded before it keep their new values. With the `rich-errors` feature
//! the error also implements `miette::Diagnostic`.

extern crate self as envbind;

pub mod error;
pub mod types;

mod bind;
mod builder;
mod custom;
mod decode;
mod duration;
mod env;
mod file;
mod json;
mod key;
mod pointer;
mod shape;
mod split;
mod value;

#[cfg(test)]
mod fixtures;

pub use bind::{Bind, TextDecode};
pub use builder::{Envbind, EnvbindBuilder};
pub use decode::{Decoder, Lookup, Schema, decode};
pub use duration::{DurationError, parse_duration};
pub use env::{EnvSource, Source};
pub use envbind_derive::Bind;
pub use error::{BoxError, EnvbindError, ErrorKind};
pub use file::{load_path, read_vars};
pub use json::Json;
pub use key::{ENV_TAG, KeyNaming, default_converter, default_joiner};
pub use shape::TypeShape;
pub use split::split_escaped;
pub use types::{Companion, DefaultCompanion, FieldDescriptor, IGNORE_TAG, KEY_TAG};
pub use value::{DecodedValue, Parsed, parse_value};
