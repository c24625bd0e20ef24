//! CLI command implementations
//!
//! Table commands are thin clients: each is translated into an API
//! [`Request`] and executed through the same [`RequestHandler`] that
//! serves `exec`, so the CLI and the JSON API cannot drift apart.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::api::{Request, RequestHandler};
use crate::blob::BlobStore;
use crate::config::StoreConfig;
use crate::display::{BarChart, ImageView};
use crate::store::{row_from_value, Row, TableStore};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_envelope, write_response, write_text};

/// Parse arguments, install logging and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_command(&cli, &mut stdout.lock(), stdin.lock())
}

/// Logs go to stderr so stdout stays machine-readable
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Load `--config` if given, otherwise defaults
pub fn load_config(path: Option<&Path>) -> CliResult<StoreConfig> {
    match path {
        Some(path) => Ok(StoreConfig::load(path)?),
        None => Ok(StoreConfig::default()),
    }
}

/// Run one command, writing results to `out` and reading `exec` input
/// from `input`
pub fn run_command<W: Write, R: BufRead>(cli: &Cli, out: &mut W, input: R) -> CliResult<()> {
    let config = load_config(cli.config.as_deref())?;

    if let Command::PutFile { path } = &cli.command {
        return put_file(&config, path, out);
    }

    let mut store = TableStore::open_with_config(&cli.db, &config)?;
    match &cli.command {
        Command::Tables => {
            let chart = BarChart::from_store(&store, config.chart_width);
            write_text(out, &chart.render())
        }
        Command::ShowImage { table, id } => {
            let view = ImageView::for_row(&store, table, id)?;
            write_text(out, &view.render())
        }
        Command::Exec => exec(&mut store, out, input),
        command => {
            let request = to_request(command)?;
            let data = RequestHandler::new(&mut store).execute(request)?;
            write_response(out, data)
        }
    }
}

/// Translate a table command into its API request
fn to_request(command: &Command) -> CliResult<Request> {
    let request = match command {
        Command::CreateTable { table } => Request::CreateTable {
            table: table.clone(),
        },
        Command::Insert { table, row } => Request::Insert {
            table: table.clone(),
            row: row_from_value(row.clone())
                .ok_or_else(|| CliError::invalid_input("row must be a JSON object"))?,
        },
        Command::Select {
            table,
            conditions,
            sort,
        } => Request::Select {
            table: table.clone(),
            filter: optional_condition(conditions),
            sort: sort.clone(),
        },
        Command::Get { table, conditions } => Request::GetRow {
            table: table.clone(),
            condition: optional_condition(conditions),
        },
        Command::Update {
            table,
            conditions,
            assignments,
            removals,
        } => Request::Update {
            table: table.clone(),
            filter: condition(conditions),
            set: condition(assignments),
            unset: removals.clone(),
        },
        Command::Delete { table, conditions } => Request::Delete {
            table: table.clone(),
            filter: optional_condition(conditions),
        },
        Command::Clean { table, id } => Request::CleanRow {
            table: table.clone(),
            id: id.clone(),
        },
        Command::Replace { table, rows } => Request::ReplaceTable {
            table: table.clone(),
            rows: serde_json::from_value(rows.clone())?,
        },
        Command::Tables | Command::PutFile { .. } | Command::ShowImage { .. } | Command::Exec => {
            return Err(CliError::invalid_input("command has no request form"));
        }
    };
    Ok(request)
}

fn condition(pairs: &[(String, Value)]) -> Row {
    pairs.iter().cloned().collect()
}

/// No `--where` means "no condition", which differs from an empty one for
/// `delete` (keeps every row) and `get` (whole table)
fn optional_condition(pairs: &[(String, Value)]) -> Option<Row> {
    if pairs.is_empty() {
        None
    } else {
        Some(condition(pairs))
    }
}

/// Line-oriented request loop. A bad request produces an error response
/// and the loop continues; only I/O failures stop it.
fn exec<W: Write, R: BufRead>(store: &mut TableStore, out: &mut W, input: R) -> CliResult<()> {
    let mut handler = RequestHandler::new(store);
    let mut handled = 0usize;

    for line in read_requests(input) {
        let response = handler.handle(&line?);
        write_envelope(out, &response)?;
        handled += 1;
    }

    debug!(handled, "exec input exhausted");
    Ok(())
}

fn put_file<W: Write>(config: &StoreConfig, path: &Path, out: &mut W) -> CliResult<()> {
    let data = fs::read(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let blobs = BlobStore::open(config.blob_path());
    let object = blobs.save(&filename, &data)?;
    info!(
        id = %object.id,
        location = %blobs.path_of(&object.id).display(),
        "file stored"
    );

    write_response(out, object.to_value())
}
