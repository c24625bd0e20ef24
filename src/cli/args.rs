//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

/// docstore - a minimal JSON document store
#[derive(Parser, Debug)]
#[command(name = "docstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store name; the snapshot is <data_dir>/<db>.<extension>
    #[arg(long, global = true, default_value = "docstore")]
    pub db: String,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a table, replacing any existing table of that name
    CreateTable {
        table: String,
    },

    /// Append a row given as a JSON object
    Insert {
        table: String,
        /// Row as JSON, e.g. '{"id": 1, "name": "Ann"}'
        #[arg(value_parser = parse_row)]
        row: Value,
    },

    /// List rows, optionally filtered and sorted
    Select {
        table: String,
        /// Equality condition FIELD=VALUE (repeatable, all must hold)
        #[arg(long = "where", value_parser = parse_assignment)]
        conditions: Vec<(String, Value)>,
        /// Sort ascending by this field
        #[arg(long)]
        sort: Option<String>,
    },

    /// Rows matching every FIELD=VALUE condition
    Get {
        table: String,
        #[arg(long = "where", value_parser = parse_assignment)]
        conditions: Vec<(String, Value)>,
    },

    /// Set or remove fields on matching rows
    Update {
        table: String,
        #[arg(long = "where", value_parser = parse_assignment)]
        conditions: Vec<(String, Value)>,
        /// FIELD=VALUE to assign (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        assignments: Vec<(String, Value)>,
        /// Field to remove (repeatable)
        #[arg(long = "unset")]
        removals: Vec<String>,
    },

    /// Delete matching rows; with no --where nothing is deleted
    Delete {
        table: String,
        #[arg(long = "where", value_parser = parse_assignment)]
        conditions: Vec<(String, Value)>,
    },

    /// Remove null and empty-string fields from the row with this id
    Clean {
        table: String,
        /// Row id as JSON (plain text is taken as a string)
        #[arg(value_parser = parse_json_or_string)]
        id: Value,
    },

    /// Replace a table's rows with a JSON array of objects
    Replace {
        table: String,
        #[arg(value_parser = parse_rows)]
        rows: Value,
    },

    /// Chart the number of rows in each table
    Tables,

    /// Store a file as a blob and print its receipt
    PutFile {
        path: PathBuf,
    },

    /// Describe the image referenced by a row's image_path field
    ShowImage {
        table: String,
        #[arg(value_parser = parse_json_or_string)]
        id: Value,
    },

    /// Execute JSON requests from stdin, one per line
    Exec,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// JSON if it parses, otherwise the raw text as a string
pub fn parse_json_or_string(raw: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// `FIELD=VALUE`, with VALUE read by [`parse_json_or_string`]
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", raw))?;
    if field.is_empty() {
        return Err(format!("empty field name in '{}'", raw));
    }
    Ok((field.to_string(), parse_json_or_string(value)?))
}

fn parse_row(raw: &str) -> Result<Value, String> {
    match serde_json::from_str(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("row must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {}", e)),
    }
}

fn parse_rows(raw: &str) -> Result<Value, String> {
    match serde_json::from_str(raw) {
        Ok(Value::Array(items)) if items.iter().all(Value::is_object) => Ok(Value::Array(items)),
        Ok(_) => Err("rows must be a JSON array of objects".to_string()),
        Err(e) => Err(format!("invalid JSON: {}", e)),
    }
}
