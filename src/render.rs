//! Per-kind rendering of schema types into Rust source.
//!
//! Every definition is self-contained text; references to other schema types are
//! by identifier only, so the output of one type never depends on another having
//! been rendered first.
//!
//! Wrapper translation:
//! - `T!`  → `T`
//! - `T`   → `Option<T>`
//! - `[T]` → `Vec<T>`
//! - composite `T` outside a `Vec` → `Box<T>` (keeps recursive records finite)
pub mod ident;

use indexmap::IndexMap;

use crate::schema::{FieldDescriptor, Kind, TypeDescriptor, TypeRef};
use ident::{bare, field_ident, type_ident, variant_ident, Scope};

// ————————————————————————————————————————————————————————————————————————————
// OPTIONS
// ————————————————————————————————————————————————————————————————————————————

/// Rust type used for custom scalars with no override.
pub const DEFAULT_CUSTOM_SCALAR: &str = "String";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// GraphQL scalar name → Rust type path. Wins over the built-in table.
    pub scalars: IndexMap<String, String>,
}

impl RenderOptions {
    pub fn new() -> Self { Self::default() }

    pub fn with_scalar(mut self, graphql: impl Into<String>, rust: impl Into<String>) -> Self {
        self.scalars.insert(graphql.into(), rust.into());
        self
    }

    pub fn scalar<'a>(&'a self, name: &str) -> &'a str {
        match self.scalars.get(name) {
            Some(rust) => rust.as_str(),
            None => builtin_scalar(name),
        }
    }
}

/// Fixed mapping for the built-in GraphQL scalars.
pub fn builtin_scalar(name: &str) -> &'static str {
    match name {
        "Int" => "i32",
        "Float" => "f64",
        "Boolean" => "bool",
        "String" | "ID" => "String",
        _ => DEFAULT_CUSTOM_SCALAR,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DEFINITIONS
// ————————————————————————————————————————————————————————————————————————————

/// OBJECT / INPUT_OBJECT → `pub struct`.
pub fn render_record(ty: &TypeDescriptor, options: &RenderOptions) -> String {
    let mut out = String::new();
    push_docs(&mut out, "", ty.description.as_deref());
    if !ty.interfaces.is_empty() {
        if ty.description.as_deref().is_some_and(|d| !d.trim().is_empty()) {
            out.push_str("///\n");
        }
        let names = ty.interfaces.iter().map(|i| format!("`{}`", i.name)).collect::<Vec<_>>();
        out.push_str(&format!("/// Implements: {}.\n", names.join(", ")));
    }
    out.push_str("#[derive(Debug, Clone, Serialize, Deserialize)]\n");
    let members = ty.members();
    if members.is_empty() {
        out.push_str(&format!("pub struct {} {{}}\n", type_ident(&ty.name)));
        return out;
    }
    out.push_str(&format!("pub struct {} {{\n", type_ident(&ty.name)));
    let mut scope = Scope::new();
    for field in members {
        render_member(&mut out, &mut scope, field, options);
    }
    out.push_str("}\n");
    out
}

/// ENUM → unit-variant `pub enum`, values in schema order.
pub fn render_enum(ty: &TypeDescriptor) -> String {
    let mut out = String::new();
    push_docs(&mut out, "", ty.description.as_deref());
    out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]\n");
    out.push_str(&format!("pub enum {} {{\n", type_ident(&ty.name)));
    let mut scope = Scope::new();
    for value in &ty.enum_values {
        push_docs(&mut out, "    ", value.description.as_deref());
        push_deprecation(&mut out, "    ", value.is_deprecated, value.deprecation_reason.as_deref());
        let variant = scope.claim(variant_ident(&value.name));
        push_rename(&mut out, &variant, &value.name);
        out.push_str(&format!("    {variant},\n"));
    }
    out.push_str("}\n");
    out
}

/// INTERFACE / UNION → enum tagged by `__typename`, one variant per possible type.
///
/// `Unknown` absorbs implementers added to the API after generation.
pub fn render_polymorphic(ty: &TypeDescriptor) -> String {
    let mut out = String::new();
    push_docs(&mut out, "", ty.description.as_deref());
    out.push_str("#[derive(Debug, Clone, Serialize, Deserialize)]\n");
    out.push_str("#[serde(tag = \"__typename\")]\n");
    out.push_str(&format!("pub enum {} {{\n", type_ident(&ty.name)));
    let mut scope = Scope::new();
    for member in &ty.possible_types {
        let variant = scope.claim(type_ident(&member.name));
        push_rename(&mut out, &variant, &member.name);
        out.push_str(&format!("    {variant}({}),\n", type_ident(&member.name)));
    }
    let unknown = scope.claim("Unknown".to_string());
    out.push_str("    #[serde(other)]\n");
    out.push_str(&format!("    {unknown},\n"));
    out.push_str("}\n");
    out
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

/// Rust type for a field's (possibly wrapped) type reference.
pub fn type_expr(ty: &TypeRef, options: &RenderOptions) -> String {
    nullable_expr(ty, options, false)
}

fn nullable_expr(ty: &TypeRef, options: &RenderOptions, in_list: bool) -> String {
    match (&ty.kind, ty.of_type.as_deref()) {
        (Kind::NonNull, Some(inner)) => non_null_expr(inner, options, in_list),
        _ => format!("Option<{}>", non_null_expr(ty, options, in_list)),
    }
}

fn non_null_expr(ty: &TypeRef, options: &RenderOptions, in_list: bool) -> String {
    match (&ty.kind, ty.of_type.as_deref()) {
        (Kind::List, Some(inner)) => format!("Vec<{}>", nullable_expr(inner, options, true)),
        (Kind::NonNull, Some(inner)) => non_null_expr(inner, options, in_list),
        _ => named_expr(ty, options, in_list),
    }
}

fn named_expr(ty: &TypeRef, options: &RenderOptions, in_list: bool) -> String {
    let Some(name) = ty.name.as_deref() else {
        // malformed reference, nothing to name
        return "serde_json::Value".to_string();
    };
    match ty.kind {
        Kind::Scalar => options.scalar(name).to_string(),
        Kind::Enum => type_ident(name),
        _ if in_list => type_ident(name),
        _ => format!("Box<{}>", type_ident(name)),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn render_member(out: &mut String, scope: &mut Scope, field: &FieldDescriptor, options: &RenderOptions) {
    push_docs(out, "    ", field.description.as_deref());
    push_deprecation(out, "    ", field.is_deprecated, field.deprecation_reason.as_deref());
    let member = scope.claim(field_ident(&field.name));
    push_rename(out, &member, &field.name);
    out.push_str(&format!("    pub {member}: {},\n", type_expr(&field.ty, options)));
}

fn push_docs(out: &mut String, indent: &str, text: Option<&str>) {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return;
    };
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            out.push_str(&format!("{indent}///\n"));
        } else {
            out.push_str(&format!("{indent}/// {line}\n"));
        }
    }
}

fn push_deprecation(out: &mut String, indent: &str, deprecated: bool, reason: Option<&str>) {
    if !deprecated {
        return;
    }
    match reason.map(str::trim).filter(|r| !r.is_empty()) {
        Some(reason) => {
            out.push_str(&format!("{indent}/// Deprecated: {}\n", reason.replace('\n', " ")));
        }
        None => {
            out.push_str(&format!("{indent}/// Deprecated.\n"));
        }
    }
}

fn push_rename(out: &mut String, ident: &str, wire: &str) {
    if bare(ident) != wire {
        out.push_str(&format!("    #[serde(rename = {wire:?})]\n"));
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
