//! Minimal CLI: introspection result + typegen.yaml → (rust | closure)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::generate::{closure_view, generate, write_output, ErrorPolicy};
use crate::resolve::resolve;
use crate::schema::Schema;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Rust types for the closure of requested GraphQL schema types
#[derive(Parser, Debug)]
#[command(name = "typegen", version)]
pub struct CommandLineInterface {
    /// increase verbosity
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// resolve the configured types and emit a Rust module
    Generate(GenerateOut),
    /// print the reachable types (and resolution errors) as JSON
    Closure(ClosureOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// introspection result (JSON), or '-' for stdin
    #[arg(long, short)]
    schema: String,

    /// config file listing package + root types [default: typegen.yaml]
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// package name (overrides the config)
    #[arg(long, short)]
    package: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .rs file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// fail instead of writing partial output when any type fails to resolve
    #[arg(long)]
    strict: bool,
}

#[derive(clap::Parser, Debug)]
struct ClosureOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// root types (defaults to the config's list)
    types: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_schema(&self) -> Result<Schema> {
        let schema = if self.schema == "-" {
            Schema::from_reader(std::io::stdin())
        } else {
            Schema::from_path(&self.schema)
        };
        let schema = schema.with_context(|| format!("failed to load schema from {}", self.schema))?;
        tracing::debug!(types = schema.len(), "loaded schema");
        Ok(schema)
    }

    fn load_config(&self, allow_missing: bool) -> Result<Config> {
        self.load_config_from(Path::new(DEFAULT_CONFIG_FILE), allow_missing)
    }

    /// An explicit `--config` must exist; `default_path` is optional when
    /// `allow_missing` is set.
    fn load_config_from(&self, default_path: &Path, allow_missing: bool) -> Result<Config> {
        let path = self.config.as_deref().unwrap_or(default_path);
        let config = if self.config.is_none() && allow_missing && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Config::default()
        } else {
            Config::from_path(path).with_context(|| format!("failed to load config {}", path.display()))?
        };
        Ok(config.with_package(self.package.clone()))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn verbose(&self) -> bool {
        self.verbose
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let config = target.input_settings.load_config(false)?;
                let schema = target.input_settings.load_schema()?;
                let policy = if target.strict { ErrorPolicy::Strict } else { ErrorPolicy::Lenient };

                let generated = generate(&schema, &config, policy)?;
                match target.out.as_ref() {
                    Some(out) => write_output(out, &generated.source)?,
                    None => print!("{}", generated.source),
                }
            }
            Command::Closure(target) => {
                let mut config = target.input_settings.load_config(!target.types.is_empty())?;
                if !target.types.is_empty() {
                    config.types = target.types.clone();
                }
                let schema = target.input_settings.load_schema()?;

                let resolution = resolve(&schema, &config.types, &config.render_options());
                println!("{}", serde_json::to_string_pretty(&closure_view(&resolution))?);
            }
        }
        Ok(())
    }
}
