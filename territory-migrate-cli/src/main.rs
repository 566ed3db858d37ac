//! territory-migrate CLI - legacy territory coordinate migration from the command line.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use territory_migrate::{
    to_pretty_json, MigrationOptions, MigrationOutcome, MigrationReport, TerritoryMigrator,
    DEFAULT_INPUT, DEFAULT_OUTPUT,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "territory-migrate")]
#[command(
    about = "Migrate a legacy territory coordinate document to the per-territory schema",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Legacy coordinates document
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the migrated document
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Print the migrated document to stdout instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Fail on exhausted marker pools or duplicate square keys
    #[arg(long)]
    strict: bool,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Human,
    /// JSON report
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = MigrationOptions {
        input: cli.input,
        output: cli.output,
        dry_run: cli.dry_run,
        strict: cli.strict,
    };

    process::exit(handle_migrate(&options, &cli.format));
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_migrate(options: &MigrationOptions, format: &OutputFormat) -> i32 {
    let outcome = match TerritoryMigrator::migrate_file(options) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if options.dry_run {
        match to_pretty_json(&outcome.document) {
            Ok(rendered) => print!("{}", rendered),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
        // stdout carries the document; keep the summary on stderr.
        eprint!("{}", render_summary(&outcome, format));
    } else {
        print!("{}", render_summary(&outcome, format));
    }
    0
}

fn render_summary(outcome: &MigrationOutcome, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => summary_human(outcome),
        OutputFormat::Json => summary_json(outcome),
    }
}

fn summary_human(outcome: &MigrationOutcome) -> String {
    let report = &outcome.report;
    let mut out = String::new();

    match &outcome.written {
        Some(path) => out.push_str(&format!("Wrote {}\n", path.display())),
        None => out.push_str("Dry run: nothing written\n"),
    }
    out.push_str(&format!("{}\n", "─".repeat(60)));
    out.push_str(&format!("  Territories: {}\n", report.territories));
    out.push_str(&format!("  Squares:     {}\n", report.squares));

    if !report.letters.is_empty() {
        out.push_str("\n  Square markers:\n");
        for usage in &report.letters {
            out.push_str(&format!(
                "    {}: {}/{} assigned",
                usage.letter, usage.consumed, usage.available
            ));
            if usage.null_markers > 0 {
                out.push_str(&format!(", {} square(s) without marker", usage.null_markers));
            }
            out.push('\n');
        }
    }

    if !report.duplicates.is_empty() {
        out.push_str("\n  Duplicate squares (last one kept):\n");
        for key in &report.duplicates {
            out.push_str(&format!("    - {}\n", key));
        }
    }
    out
}

fn summary_json(outcome: &MigrationOutcome) -> String {
    let report: &MigrationReport = &outcome.report;
    let output = serde_json::json!({
        "output": outcome.written.as_ref().map(|p| p.display().to_string()),
        "report": report,
        "summary": {
            "exhausted_letters": report.exhausted_letters(),
            "unused_markers": report
                .unused_markers()
                .into_iter()
                .map(|(letter, count)| serde_json::json!({"letter": letter, "count": count}))
                .collect::<Vec<_>>(),
            "warnings": report.has_warnings(),
        }
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => format!("{}\n", text),
        Err(e) => format!("{{\"error\": \"{}\"}}\n", e),
    }
}
