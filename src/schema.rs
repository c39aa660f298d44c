//! Introspected GraphQL schema: the read-only type catalog the resolver walks.
//!
//! Accepts any of the shapes an introspection result usually comes in:
//! - the full response envelope `{"data": {"__schema": ...}}`
//! - the bare `{"__schema": ...}` object
//! - the `__schema` value itself (`{"types": [...]}`)
use std::fmt;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::path_de::{from_json_value_with_path, PathError};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Type kind as reported by `__Type.kind`.
///
/// Closed over the kinds the generator knows; anything else lands in
/// `Unrecognized` so schema drift surfaces as an error instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Kind {
    Object,
    InputObject,
    Enum,
    Interface,
    Union,
    Scalar,
    List,
    NonNull,
    Unrecognized(String),
}

/// A (possibly wrapped) reference to a named type, e.g. `[Node!]!`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: Kind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// Entry of `interfaces` / `possibleTypes`. Only the name matters for traversal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelatedType {
    pub name: String,
}

/// One schema type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub name: String,
    pub kind: Kind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub input_fields: Vec<FieldDescriptor>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub enum_values: Vec<EnumValue>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interfaces: Vec<RelatedType>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub possible_types: Vec<RelatedType>,
}

/// The type catalog keyed by name, in the order the introspection result listed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    types: IndexMap<String, TypeDescriptor>,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema: {0}")]
    Io(#[from] std::io::Error),
    #[error("schema is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("malformed __schema {0}")]
    Shape(#[from] PathError),
    #[error("introspection returned errors: {}", .0.join("; "))]
    Graphql(Vec<String>),
    #[error("no __schema object found in introspection result")]
    MissingSchema,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Kind {
    pub fn as_str(&self) -> &str {
        match self {
            Kind::Object => "OBJECT",
            Kind::InputObject => "INPUT_OBJECT",
            Kind::Enum => "ENUM",
            Kind::Interface => "INTERFACE",
            Kind::Union => "UNION",
            Kind::Scalar => "SCALAR",
            Kind::List => "LIST",
            Kind::NonNull => "NON_NULL",
            Kind::Unrecognized(other) => other,
        }
    }
}

impl From<String> for Kind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "OBJECT" => Kind::Object,
            "INPUT_OBJECT" => Kind::InputObject,
            "ENUM" => Kind::Enum,
            "INTERFACE" => Kind::Interface,
            "UNION" => Kind::Union,
            "SCALAR" => Kind::Scalar,
            "LIST" => Kind::List,
            "NON_NULL" => Kind::NonNull,
            _ => Kind::Unrecognized(raw),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TypeRef {
    /// Innermost reference once LIST / NON_NULL wrappers are peeled off.
    pub fn named(&self) -> &TypeRef {
        let mut cur = self;
        while let Some(inner) = cur.of_type.as_deref() {
            cur = inner;
        }
        cur
    }
    pub fn is_non_null(&self) -> bool {
        self.kind == Kind::NonNull
    }
}

impl TypeDescriptor {
    /// Members of a record-like type: `inputFields` for input objects, `fields` otherwise.
    pub fn members(&self) -> &[FieldDescriptor] {
        match self.kind {
            Kind::InputObject => &self.input_fields,
            _ => &self.fields,
        }
    }
}

impl Schema {
    pub fn from_types(types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let types = types.into_iter().map(|ty| (ty.name.clone(), ty)).collect();
        Self { types }
    }

    pub fn from_introspection_value(value: &Value) -> Result<Self, SchemaError> {
        let node = locate_schema(value)?;
        let raw = from_json_value_with_path::<RawSchema>(node)?;
        Ok(Self::from_types(raw.types))
    }

    pub fn from_introspection_str(src: &str) -> Result<Self, SchemaError> {
        let value = serde_json::from_str::<Value>(src)?;
        Self::from_introspection_value(&value)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self, SchemaError> {
        let mut src = String::new();
        reader.read_to_string(&mut src)?;
        Self::from_introspection_str(&src)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_introspection_str(&src)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }
    pub fn len(&self) -> usize {
        self.types.len()
    }
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Deserialize)]
struct RawSchema {
    #[serde(default, deserialize_with = "null_as_empty")]
    types: Vec<TypeDescriptor>,
}

fn locate_schema(value: &Value) -> Result<&Value, SchemaError> {
    if let Some(schema) = value.pointer("/data/__schema").filter(|v| v.is_object()) {
        return Ok(schema);
    }
    if let Some(schema) = value.get("__schema").filter(|v| v.is_object()) {
        return Ok(schema);
    }
    if value.get("types").is_some() {
        return Ok(value);
    }
    if let Some(errors) = value.get("errors").and_then(Value::as_array) {
        let messages = errors
            .iter()
            .map(|e| {
                e.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .unwrap_or_else(|| e.to_string())
            })
            .collect();
        return Err(SchemaError::Graphql(messages));
    }
    Err(SchemaError::MissingSchema)
}

/// Introspection sends `null` rather than `[]` for lists that don't apply to a kind.
fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

// ————————————————————————————————————————————————————————————————————————————
// TEST FIXTURES
// ————————————————————————————————————————————————————————————————————————————


// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
