//! JSON-encoded values behind a custom text decoder.

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;

use crate::bind::{Bind, mismatch};
use crate::error::BoxError;
use crate::shape::TypeShape;
use crate::value::DecodedValue;

/// A field whose raw text is a JSON document.
///
/// Carries data the comma-separated grammar cannot express, such as lists
/// of structs: `SERVERS='[{"host":"a","port":1}]'`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> Bind for Json<T>
where
    T: DeserializeOwned + Default + PartialEq,
{
    type Base = Self;
    const SHAPE: &'static TypeShape = &TypeShape::Text("json");

    fn zero() -> Self {
        Json(T::default())
    }

    fn is_zero(&self) -> bool {
        self.0 == T::default()
    }

    fn base_mut(&mut self) -> Option<&mut Self> {
        Some(self)
    }

    fn wrap(base: Self) -> Self {
        base
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Text(text) => Ok(Json(serde_json::from_str(&text)?)),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }

    fn bind_text(&mut self, text: &str) -> Result<(), BoxError> {
        self.0 = serde_json::from_str(text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use crate::error::ErrorKind;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Default, Clone, PartialEq)]
    struct Server {
        host: String,
        port: u16,
    }

    #[derive(crate::Bind, Debug, Default)]
    struct Cluster {
        #[bind(key = "servers")]
        pub servers: Json<Vec<Server>>,

        #[bind(key = "labels")]
        pub labels: Option<Json<Vec<String>>>,
    }

    #[test]
    fn decodes_structured_values() {
        let mut c = Cluster::default();
        decode(
            |key| match key {
                "SERVERS" => Some(r#"[{"host":"a","port":1},{"host":"b","port":2}]"#.into()),
                "LABELS" => Some(r#"["x","y"]"#.into()),
                _ => None,
            },
            "",
            &mut c,
        )
        .unwrap();
        assert_eq!(c.servers.len(), 2);
        assert_eq!(c.servers[1].host, "b");
        assert_eq!(c.servers[0].port, 1);
        assert_eq!(c.labels.map(Json::into_inner), Some(vec!["x".into(), "y".into()]));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let mut c = Cluster::default();
        let err = decode(
            |key| (key == "SERVERS").then(|| "[{".to_string()),
            "",
            &mut c,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseValue);
        assert!(err.to_string().contains("json"));
    }
}
