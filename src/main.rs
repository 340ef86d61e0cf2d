use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use nursing_notes::db;
use nursing_notes::document::load_text;
use nursing_notes::report;
use nursing_notes::{daily_records, process_document, Vocabulary};

#[derive(Parser)]
#[command(name = "nursing_notes", about = "Date-indexed notable events from nursing-note text")]
struct Cli {
    /// Vocabulary JSON (rules, presentation tables); built-in tables if omitted
    #[arg(long, global = true, env = "NURSING_NOTES_VOCAB")]
    vocab: Option<PathBuf>,

    /// SQLite store for ingested documents
    #[arg(long, global = true, default_value = db::DEFAULT_DB_PATH)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one text file and print notes as JSON
    Parse {
        file: PathBuf,
        /// Print per-date raw matches instead (no normalization, no resolved entries)
        #[arg(long)]
        raw: bool,
    },
    /// Print the day-over-day change report for one text file
    Report {
        file: PathBuf,
        /// Compact table instead of the full report
        #[arg(long)]
        table: bool,
    },
    /// Parse files in parallel and store them for a patient
    Ingest {
        #[arg(short, long)]
        patient: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show the latest stored notes for a patient
    Notes {
        #[arg(short, long)]
        patient: String,
        /// Text report instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Store statistics and per-patient overview
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let vocab = load_vocab(cli.vocab.as_deref())?;

    let result = match cli.command {
        Commands::Parse { file, raw } => {
            let text = load_text(&file)?;
            let json = if raw {
                serde_json::to_string_pretty(&daily_records(&text, &vocab))?
            } else {
                serde_json::to_string_pretty(&process_document(&text, &vocab))?
            };
            println!("{}", json);
            Ok(())
        }
        Commands::Report { file, table } => {
            let text = load_text(&file)?;
            let records = process_document(&text, &vocab);
            if table {
                println!("{}", report::render_table(&records));
            } else {
                print!("{}", report::render_changes(&records));
            }
            Ok(())
        }
        Commands::Ingest { patient, files } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            println!("Parsing {} files for patient {}...", files.len(), patient);
            let counts = ingest_files(&conn, &vocab, &patient, &files)?;
            counts.print();
            Ok(())
        }
        Commands::Notes { patient, text } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            match db::fetch_latest_notes(&conn, &patient)? {
                None => println!("No notes stored for patient {}.", patient),
                Some(records) if text => print!("{}", report::render_changes(&records)),
                Some(records) => println!("{}", serde_json::to_string_pretty(&records)?),
            }
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Patients:  {}", s.patients);
            println!("Documents: {}", s.documents);
            println!("Items:     {}", s.items);
            println!("Resolved:  {}", s.resolved);

            let rows = db::list_patients(&conn)?;
            if !rows.is_empty() {
                println!();
                println!(
                    "{:>3} | {:<16} | {:>4} | {:<10} | {:<10} | {:>5}",
                    "#", "Patient", "Docs", "From", "To", "Items"
                );
                println!("{}", "-".repeat(64));
                for (i, r) in rows.iter().enumerate() {
                    println!(
                        "{:>3} | {:<16} | {:>4} | {:<10} | {:<10} | {:>5}",
                        i + 1,
                        report::truncate(&r.patient_id, 16),
                        r.documents,
                        r.first_date.as_deref().unwrap_or("-"),
                        r.last_date.as_deref().unwrap_or("-"),
                        r.items
                    );
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn load_vocab(path: Option<&Path>) -> anyhow::Result<Vocabulary> {
    match path {
        Some(p) => Vocabulary::load(p).with_context(|| format!("loading vocabulary {}", p.display())),
        None => Ok(Vocabulary::builtin()),
    }
}

struct IngestCounts {
    documents: usize,
    dates: usize,
    items: usize,
    failed: usize,
}

impl IngestCounts {
    fn print(&self) {
        println!(
            "Saved {} documents ({} dates, {} items), {} failed.",
            self.documents, self.dates, self.items, self.failed,
        );
    }
}

fn ingest_files(
    conn: &rusqlite::Connection,
    vocab: &Vocabulary,
    patient: &str,
    files: &[PathBuf],
) -> anyhow::Result<IngestCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let parsed: Vec<_> = files
        .par_iter()
        .map(|path| {
            let result = load_text(path).map(|text| db::DocumentRow {
                patient_id: patient.to_string(),
                source: path.display().to_string(),
                char_count: text.chars().count(),
                records: process_document(&text, vocab),
            });
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = IngestCounts {
        documents: 0,
        dates: 0,
        items: 0,
        failed: 0,
    };

    for (path, result) in parsed {
        match result {
            Ok(doc) => {
                let id = db::save_document(conn, &doc)?;
                counts.documents += 1;
                counts.dates += doc.records.len();
                counts.items += doc.records.iter().map(|r| r.items.len()).sum::<usize>();
                info!("Stored {} as document {}", path.display(), id);
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                counts.failed += 1;
            }
        }
    }

    Ok(counts)
}
