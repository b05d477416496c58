use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use redate_core::{DateFormats, Event, Outcome, RestoreOptions};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "redate-rs", version, about = "Restore iCloud photo timestamps from exported CSV metadata")]
struct Cli {
    /// Folder containing the photos and CSV metadata files
    #[arg(long)]
    folder: PathBuf,

    /// Preview changes without modifying any file
    #[arg(long)]
    dry_run: bool,

    /// Interpret recorded dates as UTC instead of local time
    #[arg(long)]
    utc: bool,

    /// chrono format of the originalCreationDate column
    #[arg(long)]
    input_format: Option<String>,

    /// chrono format used when reporting dates
    #[arg(long)]
    output_format: Option<String>,

    /// Print the run summary as JSON instead of per-file lines
    #[arg(long)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let t_total = std::time::Instant::now();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(log_level)),
        )
        .init();
    tracing::debug!("CLI arguments: {:?}", cli);

    let defaults = DateFormats::default();
    let options = RestoreOptions {
        folder: cli.folder,
        dry_run: cli.dry_run,
        utc: cli.utc,
        formats: DateFormats {
            input: cli.input_format.unwrap_or(defaults.input),
            output: cli.output_format.unwrap_or(defaults.output),
        },
    };

    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} restoring {msg}")?);

    let quiet = cli.json;
    let say = |line: String| {
        if !quiet {
            pb.suspend(|| println!("{}", line));
        }
    };

    let report = |event: Event<'_>| match event {
        Event::MetadataLoaded { records, files } => say(format!(
            "[INFO] Loaded metadata for {} records from {} CSV file(s).",
            records, files
        )),
        Event::MediaFound { count, extensions } => say(format!(
            "[INFO] Found {} media file(s) with extensions: {{{}}}",
            count,
            extensions.iter().cloned().collect::<Vec<_>>().join(", ")
        )),
        Event::File {
            current,
            total,
            outcome,
        } => {
            pb.set_length(total);
            pb.set_message(outcome.filename.clone());
            let name = &outcome.filename;
            say(match &outcome.outcome {
                Outcome::Applied { date } => format!("[OK]    Setting {} → {}", name, date),
                Outcome::Previewed { date } => format!("[DRY-RUN] Would set {} → {}", name, date),
                Outcome::Skipped => format!("[SKIP]  No metadata found for: {}", name),
                Outcome::Failed(err) => format!("[ERROR] {}: {}", name, err),
            });
            pb.set_position(current + 1);
        }
    };

    let result = redate_core::run(&options, &report);
    pb.finish_and_clear();
    let result = result?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("\n--- Done: {} updated, {} errors ---", result.updated, result.errors);
    }

    eprintln!("Total: {:.2}s", t_total.elapsed().as_secs_f64());
    Ok(())
}
