//! Schema-driven type generation.
//!
//! Introspected GraphQL schema + a list of root type names in, deduplicated Rust
//! type definitions for everything reachable from those roots out.
//!
//! - [`schema`]: the read-only type catalog
//! - [`resolve`]: reachability walk + per-type rendering ([`render`])
//! - [`config`], [`generate`], [`cli`]: the `typegen` tool around it
pub mod cli;
pub mod config;
pub mod generate;
pub mod path_de;
pub mod render;
pub mod resolve;
pub mod schema;

pub use config::Config;
pub use render::RenderOptions;
pub use resolve::{resolve, GeneratedType, Resolution, ResolveError};
pub use schema::{Kind, Schema, SchemaError, TypeDescriptor};
