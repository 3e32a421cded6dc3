mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slik",
    version,
    about = "Convert SLIK debtor information reports into one spreadsheet"
)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more report PDFs into the unified table
    Convert {
        /// Report PDF file(s)
        #[arg(required = true)]
        input_files: Vec<PathBuf>,

        /// Bank directory spreadsheet (KETERANGAN / NAMA BANK columns)
        #[arg(short, long = "bank-directory", value_name = "FILE")]
        bank_directory: Option<PathBuf>,

        /// JSON options file
        #[arg(short, long = "config", value_name = "FILE")]
        config: Option<PathBuf>,

        /// Percentage columns as a fraction (0.125) or as printed (12.5)
        #[arg(long = "percent-scale", value_name = "raw|fraction")]
        percent_scale: Option<String>,

        /// Only convert these categories (credit, lc, guarantee, securities, other_facility)
        #[arg(short = 'k', long = "category", value_name = "NAME")]
        categories: Vec<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the table to an xlsx file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List the report sections that are converted
    Layouts,
    /// Explain the labels read for one category
    Explain {
        /// Category name (e.g., "credit", "lc")
        category: String,
    },
    /// Print the output column order
    Columns,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            input_files,
            bank_directory,
            config,
            percent_scale,
            categories,
            output,
            out,
        } => commands::convert::run(commands::convert::ConvertArgs {
            input_files,
            bank_directory,
            config,
            percent_scale,
            categories,
            output_format: output,
            out,
        }),
        Commands::Layouts => commands::layouts::list(),
        Commands::Explain { category } => commands::layouts::explain(&category),
        Commands::Columns => commands::layouts::columns(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
