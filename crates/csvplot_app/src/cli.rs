use std::path::PathBuf;

use clap::Parser;

use crate::platform::logging::LogDestination;

/// Render a scatter plot from a CSV file through the configured computation backend.
///
/// Form fields are taken as typed; blank or unparsable values are handled by the
/// request policy in the configuration file.
#[derive(Parser, Debug, Clone)]
#[command(name = "csvplot", version)]
pub struct Cli {
    /// CSV file to plot.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Comma-separated column names to plot.
    #[arg(short = 'c', long, default_value = "")]
    pub columns: String,

    /// Plot title.
    #[arg(short = 't', long, default_value = "")]
    pub title: String,

    /// Image size as WIDTHxHEIGHT.
    #[arg(long, default_value = "")]
    pub size: String,

    /// Upper bound for X values.
    #[arg(long = "range", default_value = "")]
    pub max_range: String,

    /// Plot every Nth row.
    #[arg(long, default_value = "")]
    pub skip: String,

    /// Use the first column as X data.
    #[arg(long)]
    pub xdata: bool,

    /// X axis range as START,END.
    #[arg(long, default_value = "")]
    pub xscale: String,

    /// RON configuration file (defaults to ./csvplot.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend program, overriding the configuration.
    #[arg(long)]
    pub backend: Option<PathBuf>,

    /// Argument passed to the backend before the options JSON. Repeatable.
    #[arg(long = "backend-arg", action = clap::ArgAction::Append, allow_hyphen_values = true)]
    pub backend_args: Vec<String>,

    /// Directory the image is saved to, overriding the configuration.
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Do not save the image; print the data URI instead.
    #[arg(long = "print-uri")]
    pub print_uri: bool,

    /// Where log output goes, overriding the configuration.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,
}
