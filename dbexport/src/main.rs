//! Key-value database export tool.
//!
//! Run without arguments the tool exports every key of the database configured through
//! `REPLIT_DB_URL` into `replit_db_export.json` inside the current directory and prints a single
//! confirmation line.
//!
//! The output may be a plain text or a JSON format which enables simpler processing by external
//! tools. Diagnostics are logged to stderr and controlled with `RUST_LOG`.

#![deny(warnings)]
#![deny(missing_docs, rustdoc::missing_crate_level_docs)]

use clap::Parser;
use colored::Colorize;
use db::error::Result;
use serde::Serialize;
use std::io;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod export;

#[derive(Parser)]
#[clap(version, about = "Export a hosted key-value database to a JSON file")]
struct Cli {
    #[clap(flatten)]
    params: export::Params,
}

#[derive(Serialize)]
struct CommandError {
    cause: String,
}

#[derive(Serialize)]
struct CommandOutput<O>
where
    O: Serialize,
{
    status: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<O>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CommandError>,
}

fn print_json_output<O>(output: &CommandOutput<O>)
where
    O: Serialize,
{
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Cannot format command output: {}", err),
    }
}

fn do_execute<Params, Output>(
    exec: fn(Params) -> Result<Output>,
    params: Params,
    json: bool,
    print_text_output_fn: fn(&Output),
) where
    Output: Serialize,
{
    const STATUS_OK: i32 = 0;
    const STATUS_FAILURE: i32 = -1;
    const EXIT_FAILURE: i32 = 1;

    // Call a specific command's executor
    let result = exec(params);
    let failed = result.is_err();
    let output = match result {
        Ok(outcome) => CommandOutput {
            status: STATUS_OK,
            data: Some(outcome),
            error: None,
        },

        Err(err) => CommandOutput {
            status: STATUS_FAILURE,
            data: None,
            error: Some(CommandError {
                cause: err.to_string(),
            }),
        },
    };

    // Print output
    if json {
        print_json_output(&output);
    } else if let Some(data) = &output.data {
        print_text_output_fn(data);
    } else if let Some(error) = &output.error {
        println!("{}", error.cause.red());
    }

    // Notify the caller the command has failed
    if failed {
        process::exit(EXIT_FAILURE);
    }
}

// Stdout is reserved for the command output, logs go to stderr
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    do_execute(
        export::execute,
        &cli.params,
        cli.params.json_output,
        export::print_text_output,
    );
}
