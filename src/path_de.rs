//! Deserialize with path context in error messages.
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A deserialization failure plus the path (e.g. `types[3].fields[0].type`) it happened at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at path {path}: {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
}

impl<E: std::fmt::Display> From<serde_path_to_error::Error<E>> for PathError {
    fn from(err: serde_path_to_error::Error<E>) -> Self {
        let path = err.path().to_string();
        Self { path, message: err.into_inner().to_string() }
    }
}

pub fn from_json_value_with_path<T: DeserializeOwned>(value: &serde_json::Value) -> Result<T, PathError> {
    Ok(serde_path_to_error::deserialize::<_, T>(value)?)
}

pub fn from_yaml_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = serde_yaml::Deserializer::from_str(src);
    Ok(serde_path_to_error::deserialize::<_, T>(de)?)
}
