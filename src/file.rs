//! Loading of dotenv-formatted data from buffers, files and readers.
//!
//! Everything is materialized into a map before decoding starts. Syntax
//! errors report the position only, never the offending line, so secrets in
//! the data never reach error messages.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::error::EnvbindError;

/// Parse dotenv data from `reader`. `origin` names the data in errors.
pub fn read_vars(reader: impl Read, origin: &str) -> Result<HashMap<String, String>, EnvbindError> {
    let mut vars = HashMap::new();
    for item in dotenvy::from_read_iter(reader) {
        let (key, value) = item.map_err(|e| dotenv_error(e, origin))?;
        vars.insert(key, value);
    }
    debug!(origin, count = vars.len(), "parsed dotenv data");
    Ok(vars)
}

/// Parse the dotenv file at `path`.
///
/// A missing file is [`EnvbindError::SourceNotFound`]; a path that exists
/// but is not a regular file is [`EnvbindError::NotAFile`].
pub fn load_path(path: &Path) -> Result<HashMap<String, String>, EnvbindError> {
    let origin = path.display().to_string();
    let metadata = std::fs::metadata(path).map_err(|e| io_error(e, &origin))?;
    if !metadata.is_file() {
        return Err(EnvbindError::NotAFile { origin });
    }
    let file = File::open(path).map_err(|e| io_error(e, &origin))?;
    read_vars(file, &origin)
}

fn io_error(err: io::Error, origin: &str) -> EnvbindError {
    if err.kind() == io::ErrorKind::NotFound {
        EnvbindError::SourceNotFound {
            origin: origin.to_string(),
        }
    } else {
        EnvbindError::Io {
            origin: origin.to_string(),
            source: err,
        }
    }
}

fn dotenv_error(err: dotenvy::Error, origin: &str) -> EnvbindError {
    match err {
        dotenvy::Error::Io(io_err) => io_error(io_err, origin),
        dotenvy::Error::LineParse(_, index) => EnvbindError::Syntax {
            origin: origin.to_string(),
            message: format!("invalid syntax at position {index}"),
        },
        _ => EnvbindError::Syntax {
            origin: origin.to_string(),
            message: "unreadable dotenv data".to_string(),
        },
    }
}
