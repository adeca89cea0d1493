use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use wss_extract::config::Settings;
use wss_extract::enrich::EnrichmentGateway;
use wss_extract::ocr::{FragmentDumpEngine, OcrEngine, OcrService};
use wss_extract::parser::ParsedMap;
use wss_extract::{db, pipeline, Extraction, Extractor, MapRecord};

#[derive(Parser)]
#[command(name = "wss_extract", about = "Structured extraction and segmentation of WSS survey maps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from recognized map text
    Extract {
        /// Text files (or fragment dumps with --fragments)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Inputs are JSON arrays of {text, confidence} fragments
        #[arg(long)]
        fragments: bool,
        /// Skip business enrichment
        #[arg(long)]
        offline: bool,
        /// Write one <name>.json per input here
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Store results in the SQLite database
        #[arg(long)]
        save: bool,
        /// Environment type to describe (e.g. perkambingan)
        #[arg(short, long)]
        target: Option<String>,
    },
    /// Recompute centers, segments and validation for an edited record
    Resegment {
        /// Record JSON as written by `extract`
        #[arg(required_unless_present = "id")]
        record: Option<PathBuf>,
        /// Stored extraction id instead of a file
        #[arg(long, conflicts_with = "record")]
        id: Option<i64>,
    },
    /// Stored extractions
    Overview {
        /// Only records with a valid header
        #[arg(long)]
        valid: bool,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show store statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Extract {
            files,
            fragments,
            offline,
            out,
            save,
            target,
        } => {
            let gateway = if offline {
                EnrichmentGateway::disabled()
            } else {
                settings.gateway()?
            };
            let extractor = Extractor::new(settings.gazetteer()?, gateway)
                .with_default_location(&settings.default_location)
                .with_target_environment(target);

            let texts = read_inputs(&settings, &files, fragments).await?;
            if texts.is_empty() {
                println!("Nothing to extract.");
                return Ok(());
            }

            // Phase 1: classify (pure, parallel)
            let t_parse = Instant::now();
            println!("Classifying {} maps...", texts.len());
            let parsed = classify_all(&extractor, &texts);
            println!("Classified in {:.1}s", t_parse.elapsed().as_secs_f64());

            // Phase 2: enrich + derive (sequential, one lookup at a time)
            let conn = if save {
                let conn = db::connect(&settings.db_path)?;
                db::init_schema(&conn)?;
                Some(conn)
            } else {
                None
            };
            if let Some(dir) = &out {
                std::fs::create_dir_all(dir)?;
            }

            let mut counts = ExtractCounts::default();
            for ((path, _), parsed) in texts.iter().zip(parsed) {
                let extraction = match parsed {
                    Ok(p) => extractor.complete(p).await,
                    Err(e) => Err(e),
                };
                let extraction = match extraction {
                    Ok(x) => x,
                    Err(e) => {
                        error!(file = %path.display(), "extraction failed: {}", e);
                        counts.failed += 1;
                        continue;
                    }
                };
                counts.add(&extraction);
                print_summary(path, &extraction);

                if let Some(dir) = &out {
                    let dest = dir.join(output_name(path));
                    std::fs::write(&dest, serde_json::to_string_pretty(&extraction)?)?;
                    info!(file = %dest.display(), "wrote record");
                }
                if let Some(conn) = &conn {
                    db::save_record(conn, &extraction.record, extraction.is_valid())?;
                }
            }
            counts.print();
            Ok(())
        }
        Commands::Resegment { record, id } => {
            let record = match (record, id) {
                (_, Some(id)) => {
                    let conn = db::connect(&settings.db_path)?;
                    db::init_schema(&conn)?;
                    db::fetch_record(&conn, id)?
                        .with_context(|| format!("no stored extraction with id {}", id))?
                }
                (Some(path), None) => read_record(&path)?,
                (None, None) => anyhow::bail!("give a record file or --id"),
            };
            let extraction = pipeline::resynthesize(record)?;
            println!("{}", serde_json::to_string_pretty(&extraction)?);
            Ok(())
        }
        Commands::Overview { valid, limit } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, valid, limit)?;
            if rows.is_empty() {
                println!("No extractions found.");
                return Ok(());
            }

            println!(
                "{:>4} | {:<16} | {:<20} | {:<16} | {:<5} | {:>4} | {:>5} | {:>6} | {:>6}",
                "#", "Map ID", "Village", "Regency", "Valid", "Segs", "Biz", "KK", "Load"
            );
            println!("{}", "-".repeat(104));

            for r in &rows {
                println!(
                    "{:>4} | {:<16} | {:<20} | {:<16} | {:<5} | {:>4} | {:>5} | {:>6} | {:>6}",
                    r.id,
                    truncate(&r.map_id, 16),
                    truncate(&r.village, 20),
                    truncate(&r.regency, 16),
                    if r.valid { "yes" } else { "no" },
                    r.segments,
                    r.business_count,
                    r.households,
                    r.total_load
                );
            }

            println!("\n{} extractions", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Extractions: {}", s.extractions);
            println!("Valid:       {}", s.valid);
            println!("Invalid:     {}", s.invalid);
            println!("Segments:    {}", s.segments);
            println!("Businesses:  {}", s.businesses);
            println!("Enriched:    {}", s.enriched);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// A bare record or a full extraction, as written by `extract`.
fn read_record(path: &Path) -> anyhow::Result<MapRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    match serde_json::from_str::<Extraction>(&raw) {
        Ok(x) => Ok(x.record),
        Err(_) => Ok(serde_json::from_str(&raw)?),
    }
}

/// Read every input as text. Fragment dumps go through the OCR service so
/// the confidence threshold applies.
async fn read_inputs(
    settings: &Settings,
    files: &[PathBuf],
    fragments: bool,
) -> anyhow::Result<Vec<(PathBuf, String)>> {
    let ocr = OcrService::new(|| Ok(Box::new(FragmentDumpEngine) as Box<dyn OcrEngine>))
        .with_min_confidence(settings.min_confidence);

    let mut texts = Vec::with_capacity(files.len());
    for path in files {
        let text = if fragments {
            let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            match ocr.read_text(&bytes).await {
                Ok(t) => t,
                Err(e) => {
                    error!(file = %path.display(), "no usable text: {}", e);
                    continue;
                }
            }
        } else {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        };
        texts.push((path.clone(), text));
    }
    Ok(texts)
}

fn classify_all(
    extractor: &Extractor,
    texts: &[(PathBuf, String)],
) -> Vec<Result<ParsedMap, wss_extract::ExtractError>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(texts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut parsed = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(500) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|(_, text)| extractor.classify(text))
            .collect();
        parsed.extend(results);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    parsed
}

#[derive(Default)]
struct ExtractCounts {
    records: usize,
    invalid: usize,
    failed: usize,
    businesses: usize,
    segments: usize,
}

impl ExtractCounts {
    fn add(&mut self, x: &Extraction) {
        self.records += 1;
        if !x.is_valid() {
            self.invalid += 1;
        }
        self.businesses += x.record.businesses.len();
        self.segments += x.record.segments.len();
    }

    fn print(&self) {
        println!(
            "\n{} records ({} invalid, {} failed), {} businesses, {} segments.",
            self.records, self.invalid, self.failed, self.businesses, self.segments,
        );
    }
}

fn print_summary(path: &Path, x: &Extraction) {
    let r = &x.record;
    let t = r.totals();
    println!(
        "{} | {} | {} | {} segments | KK {} | load {}",
        truncate(&path.display().to_string(), 32),
        if r.admin.map_id.is_empty() { "-" } else { r.admin.map_id.as_str() },
        truncate(&r.admin.village, 20),
        r.segments.len(),
        t.households,
        t.total_load
    );
    if let Some(v) = &x.validation {
        println!("  ! {}", v.message);
    }
}

fn output_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());
    format!("{}.json", stem)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
