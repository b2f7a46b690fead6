//! xltree CLI - Excel to nested JSON converter
//!
//! Reads a position-encoded Excel sheet and writes the nested JSON
//! document it describes. Every flag is optional; whatever is missing
//! is asked for interactively, so `xltree` with no arguments walks
//! through the whole conversion step by step.

mod prompt;

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xltree::xlsx::Workbook;
use xltree::{default_fields, detect_levels, to_json_default, TreeBuilder};

/// Position-encoded Excel tables to nested JSON hierarchies
#[derive(Parser)]
#[command(
    name = "xltree",
    version,
    about = "Excel to Nested JSON Converter",
    long_about = "xltree - Convert flat, position-encoded Excel tables into nested JSON.\n\n\
                  Flags that are left out are asked for interactively."
)]
struct Cli {
    /// Path to the input Excel file (.xlsx)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Name of the sheet to convert
    #[arg(short, long)]
    sheet: Option<String>,

    /// Number of hierarchy levels (default: detected from column count)
    #[arg(short, long)]
    levels: Option<usize>,

    /// Path to the output JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-d: info, -dd: debug, -ddd: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Excel to Nested JSON Converter".cyan().bold());

    let input = prompt::input_path(cli.input)?;

    let workbook =
        Workbook::open(&input).map_err(|e| format!("failed to open Excel file: {}", e))?;

    let sheet = {
        let names = workbook.sheet_names();
        prompt::sheet_name(cli.sheet, &names)?
    };

    let grid = workbook.grid(&sheet)?;

    let detected = detect_levels(grid.column_count(), default_fields().len());
    println!("Detected {} levels based on column structure.", detected);

    let levels = prompt::level_count(cli.levels, detected)?;
    let output = ensure_json_suffix(prompt::output_path(cli.output)?);

    tracing::debug!(
        input = %input.display(),
        sheet = %sheet,
        levels,
        output = %output.display(),
        "conversion parameters resolved"
    );

    let pb = create_spinner("Building tree...");

    let builder = TreeBuilder::new(levels)?;
    let forest = builder.build(&grid)?;

    pb.set_message("Writing JSON...");
    let json = to_json_default(&forest)?;
    fs::write(&output, json)?;

    pb.finish_and_clear();

    println!(
        "{} JSON exported to: {}",
        "✓".green().bold(),
        output.display()
    );

    Ok(())
}

fn setup_logging(debug_level: u8) {
    let default_level = match debug_level {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins when set; the -d count supplies the default.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Appends `.json` unless the path already ends with it, case-insensitively.
fn ensure_json_suffix(path: PathBuf) -> PathBuf {
    let has_suffix = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if has_suffix {
        path
    } else {
        let mut text = path.into_os_string();
        text.push(".json");
        PathBuf::from(text)
    }
}
