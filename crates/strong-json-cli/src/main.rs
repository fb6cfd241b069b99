//! `sjson` CLI for checking and converting strong-json documents.
//!
//! Documents are decoded with the built-in sentinels and adapters only, so
//! envelopes naming user record types are rejected.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a document (stdin → summary on stdout)
//! echo '{"__type__":"tuple","__data__":[1,2]}' | sjson check
//!
//! # Rewrite ordered `dict` envelopes as compact objects
//! sjson convert --compact-maps -i data.json -o compact.json
//!
//! # Switch envelope keys
//! sjson convert --to-type-key '$type' --to-data-key '$data' -i data.json
//!
//! # Count decoded values by kind
//! sjson stats -i data.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use strong_json::{CodecConfig, MapKind, Mapping, Object, Registry, Set, StrongJson, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sjson",
    version,
    about = "Type-preserving JSON codec CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with the codec configuration of the input
    #[arg(long, global = true)]
    config: Option<String>,

    /// Type-tag key used by the input (overrides --config)
    #[arg(long, global = true)]
    type_key: Option<String>,

    /// Data key used by the input (overrides --config)
    #[arg(long, global = true)]
    data_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a document and print a one-line summary
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Decode a document and re-encode it under another configuration
    Convert {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write plain string-keyed mappings as compact JSON objects
        #[arg(long, conflicts_with = "ordered_maps")]
        compact_maps: bool,
        /// Write every mapping as an order-preserving `dict` envelope
        #[arg(long)]
        ordered_maps: bool,
        /// Type-tag key for the output
        #[arg(long)]
        to_type_key: Option<String>,
        /// Data key for the output
        #[arg(long)]
        to_data_key: Option<String>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Count decoded values by kind
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let input_config = load_config(
        cli.config.as_deref(),
        cli.type_key.as_deref(),
        cli.data_key.as_deref(),
    )?;
    let reader = StrongJson::new(input_config.clone(), Registry::empty())
        .context("Invalid input configuration")?;

    match cli.command {
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            let value = reader
                .from_json(&text)
                .context("Failed to decode document")?;
            println!("ok: {}", describe(&value));
        }
        Commands::Convert {
            input,
            output,
            compact_maps,
            ordered_maps,
            to_type_key,
            to_data_key,
            pretty,
        } => {
            let text = read_input(input.as_deref())?;
            let mut value = reader
                .from_json(&text)
                .context("Failed to decode document")?;

            let mut output_config = input_config;
            if compact_maps {
                output_config.treat_dict_as_ordered_dict = false;
                // Decoded `dict` envelopes are ordered mappings.
                value = into_plain_mappings(value);
            }
            if ordered_maps {
                output_config.treat_dict_as_ordered_dict = true;
            }
            if let Some(key) = to_type_key {
                output_config.type_key = key;
            }
            if let Some(key) = to_data_key {
                output_config.data_key = key;
            }
            let writer = StrongJson::new(output_config, Registry::empty())
                .context("Invalid output configuration")?;

            let mut converted = if pretty {
                writer.to_json_pretty(&value)
            } else {
                writer.to_json(&value)
            }
            .context("Failed to encode document")?;
            converted.push('\n');
            write_output(output.as_deref(), &converted)?;
        }
        Commands::Stats { input } => {
            let text = read_input(input.as_deref())?;
            let value = reader
                .from_json(&text)
                .context("Failed to decode document")?;
            let mut counts = BTreeMap::new();
            count_kinds(&value, &mut counts);
            let total: usize = counts.values().sum();
            println!("values: {}", total);
            for (kind, count) in counts {
                println!("{:<10}{}", format!("{}:", kind), count);
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Start from the config file (or defaults), then apply key overrides.
fn load_config(
    path: Option<&str>,
    type_key: Option<&str>,
    data_key: Option<&str>,
) -> Result<CodecConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("Invalid config: {}", path))?
        }
        None => CodecConfig::default(),
    };
    if let Some(key) = type_key {
        config.type_key = key.to_string();
    }
    if let Some(key) = data_key {
        config.data_key = key.to_string();
    }
    tracing::debug!(?config, "input configuration");
    Ok(config)
}

/// One-line description of the top-level value.
fn describe(value: &Value) -> String {
    match value {
        Value::List(items) => format!("list of {} items", items.len()),
        Value::Tuple(items) => format!("tuple of {} items", items.len()),
        Value::Set(set) => format!("set of {} items", set.len()),
        Value::Map(map) => format!("map with {} entries", map.len()),
        Value::Enum(member) => format!("enum {}.{}", member.type_name, member.member),
        Value::Object(object) => format!("object {}", object.type_name()),
        Value::Date(date) => format!("date {}", date),
        Value::DateTime(dt) => format!("datetime {}", dt),
        other => other.kind().to_string(),
    }
}

fn count_kinds(value: &Value, counts: &mut BTreeMap<&'static str, usize>) {
    *counts.entry(value.kind()).or_default() += 1;
    match value {
        Value::List(items) | Value::Tuple(items) => {
            for item in items {
                count_kinds(item, counts);
            }
        }
        Value::Set(set) => {
            for item in set.iter() {
                count_kinds(item, counts);
            }
        }
        Value::Map(map) => {
            for (key, item) in map.iter() {
                count_kinds(key, counts);
                count_kinds(item, counts);
            }
        }
        Value::Object(object) => {
            for (_, field) in object.as_object().reflect_fields() {
                count_kinds(&field, counts);
            }
        }
        _ => {}
    }
}

/// Demote every mapping to the plain kind, recursing through containers.
/// Record fields are left alone.
fn into_plain_mappings(value: Value) -> Value {
    match value {
        Value::Map(map) => {
            let mut plain = Mapping::new().with_kind(MapKind::Plain);
            for (key, item) in map {
                plain.insert(into_plain_mappings(key), into_plain_mappings(item));
            }
            Value::Map(plain)
        }
        Value::List(items) => Value::List(items.into_iter().map(into_plain_mappings).collect()),
        Value::Tuple(items) => Value::Tuple(items.into_iter().map(into_plain_mappings).collect()),
        Value::Set(set) => Value::Set(set.into_iter().map(into_plain_mappings).collect::<Set>()),
        other => other,
    }
}

/// The document text, from `path` or stdin.
fn read_input(path: Option<&str>) -> Result<String> {
    let Some(path) = path else {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read document from stdin")?;
        return Ok(text);
    };
    std::fs::read_to_string(path).with_context(|| format!("Failed to read document: {path}"))
}

fn write_output(path: Option<&str>, document: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("Failed to write converted document: {path}")),
        None => {
            io::stdout()
                .write_all(document.as_bytes())
                .context("Failed to write converted document to stdout")
        }
    }
}
