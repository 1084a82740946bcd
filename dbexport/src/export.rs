use clap::Args;
use colored::Colorize;
use db::config::ExportConfig;
use db::error::Result;
use db::exporter::Exporter;
use db::report::ExportReport;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// List of arguments supported by the command.
#[derive(Args)]
pub struct Params {
    #[clap(short, long, default_value = "replit_db_export.json", help = "Output file")]
    pub output: PathBuf,
    #[clap(long, env = "REPLIT_DB_URL", hide_env_values = true, help = "Database URL")]
    pub db_url: Option<String>,
    #[clap(short, long, help = "Export only keys starting with the prefix")]
    pub prefix: Option<String>,
    #[clap(short, long, help = "Write compact JSON instead of an indented one")]
    pub compact: bool,
    #[clap(short, long, help = "JSON output format")]
    pub json_output: bool,
}

/// Output of the command
#[derive(Serialize, Debug)]
pub struct Output {
    #[serde(skip)]
    requested: PathBuf,
    #[serde(flatten)]
    report: ExportReport,
}

/// Print command's text output
pub fn print_text_output(outcome: &Output) {
    let message = format!(
        "✅ Database exported successfully to {}",
        outcome.requested.display()
    );
    println!("{}", message.green());
}

/// Main entry of the command
pub fn execute(params: &Params) -> Result<Output> {
    let db_url = ExportConfig::resolve_db_url(params.db_url.clone())?;
    let mut config = ExportConfig::new(&db_url)?;
    config.output = params.output.clone();
    config.prefix = params.prefix.clone().unwrap_or_default();
    config.pretty = !params.compact;
    debug!(output = %config.output.display(), prefix = %config.prefix, "export configured");

    let report = Exporter::from_config(&config)?.run()?;
    Ok(Output {
        requested: params.output.clone(),
        report,
    })
}
