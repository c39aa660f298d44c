//! Orchestration: resolve the configured roots, then assemble and write the module.
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use crate::config::Config;
use crate::resolve::{resolve, Resolution};
use crate::schema::Schema;

pub const HEADER: &str = "// Code generated by typegen; DO NOT EDIT.";

/// What to do when some types failed to resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the errors and emit whatever did resolve.
    #[default]
    Lenient,
    /// Any recorded error aborts generation.
    Strict,
}

#[derive(Debug, Clone)]
pub struct Generated {
    pub source: String,
    pub resolution: Resolution,
}

pub fn generate(schema: &Schema, config: &Config, policy: ErrorPolicy) -> Result<Generated> {
    config.validate()?;
    tracing::info!(package = %config.package, roots = config.types.len(), schema_types = schema.len(), "resolving types");

    let resolution = resolve(schema, &config.types, &config.render_options());
    for error in &resolution.errors {
        tracing::warn!("{error}");
    }
    if policy == ErrorPolicy::Strict && !resolution.is_complete() {
        bail!("{} error(s) while resolving types; refusing to write partial output", resolution.errors.len());
    }
    tracing::info!(generated = resolution.types.len(), errors = resolution.errors.len(), "resolved");

    let source = render_module(&config.package, &resolution);
    Ok(Generated { source, resolution })
}

/// Header, prelude, then every definition sorted by type name.
pub fn render_module(package: &str, resolution: &Resolution) -> String {
    let mut out = format!("{HEADER}\n// package: {package}\n\nuse serde::{{Deserialize, Serialize}};\n");
    for ty in resolution.sorted() {
        tracing::debug!(name = %ty.name, kind = %ty.kind, "emitting");
        out.push('\n');
        out.push_str(&ty.source);
    }
    out
}

/// Debug view of a walk: reached types by name, then the recorded errors.
pub fn closure_view(resolution: &Resolution) -> Value {
    let types = resolution
        .sorted()
        .into_iter()
        .map(|t| json!({ "name": t.name, "kind": t.kind.as_str() }))
        .collect::<Vec<_>>();
    let errors = resolution.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>();
    json!({ "types": types, "errors": errors })
}

pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote generated types");
    Ok(())
}
