mod db;
mod report;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

use report::model::MetStatus;

#[derive(Parser)]
#[command(name = "audit_processor", about = "Degree evaluation reconstruction from extracted row dumps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct evaluations from dump files and store them
    Process {
        /// Dump file or directory of .json dumps
        path: PathBuf,
        /// Max dumps to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print one stored evaluation
    Show {
        /// Dump source name (file stem of the processed dump)
        source: String,
        /// Emit the evaluation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stored evaluations overview table
    Overview {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show processing statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process { path, limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let mut paths = collect_dump_paths(&path)?;
            if let Some(n) = limit {
                paths.truncate(n);
            }
            if paths.is_empty() {
                println!("No dump files found in {}.", path.display());
                return Ok(());
            }
            println!("Processing {} dumps...", paths.len());
            let counts = process_dumps(&conn, &paths)?;
            counts.print();
            Ok(())
        }
        Commands::Show { source, json } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            match db::fetch_evaluation(&conn, &source)? {
                Some(record) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&record.evaluation)?);
                    } else {
                        print_evaluation(&record);
                    }
                }
                None => println!("No evaluation stored for '{}'. Run 'process' first.", source),
            }
            Ok(())
        }
        Commands::Overview { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, limit)?;
            if rows.is_empty() {
                println!("No evaluations stored. Run 'process' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<20} | {:<20} | {:<24} | {:<12} | {:>5} | {:>6}",
                "#", "Source", "Student", "Degree", "Catalog", "Areas", "GPA"
            );
            println!("{}", "-".repeat(108));

            for (i, r) in rows.iter().enumerate() {
                let source = truncate(&r.source, 20);
                let student = truncate(&r.student_name, 20);
                let degree = truncate(&r.degree, 24);
                let areas = format!("{}/{}", r.areas_met, r.areas_total);

                println!(
                    "{:>3} | {:<20} | {:<20} | {:<24} | {:<12} | {:>5} | {:>6}",
                    i + 1, source, student, degree, r.catalog_term, areas, r.overall_gpa
                );
            }

            println!("\n{} evaluations", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Evaluations: {}", s.evaluations);
            println!("Areas:       {} ({} met)", s.areas, s.areas_met);
            println!(
                "Courses:     {} ({} met, {} not met, {} unknown)",
                s.courses, s.courses_met, s.courses_unmet, s.courses_unknown
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct ProcessCounts {
    evaluations: usize,
    areas: usize,
    courses: usize,
    failed: usize,
}

impl ProcessCounts {
    fn print(&self) {
        println!(
            "Saved {} evaluations, {} areas, {} courses ({} dumps failed).",
            self.evaluations, self.areas, self.courses, self.failed,
        );
    }
}

fn process_dumps(conn: &rusqlite::Connection, paths: &[PathBuf]) -> anyhow::Result<ProcessCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut counts = ProcessCounts {
        evaluations: 0,
        areas: 0,
        courses: 0,
        failed: 0,
    };

    for chunk in paths.chunks(500) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|path| -> anyhow::Result<db::EvaluationRecord> {
                let dump = report::rows::load_dump(path)?;
                let evaluation = report::reconstruct(&dump);
                Ok(db::EvaluationRecord {
                    source: source_name(path),
                    term: dump.term,
                    request_no: dump.request_no,
                    evaluation,
                })
            })
            .collect();

        let mut records = Vec::new();
        for (path, result) in chunk.iter().zip(results) {
            match result {
                Ok(record) => {
                    counts.areas += record.evaluation.areas.len();
                    counts.courses += record
                        .evaluation
                        .areas
                        .iter()
                        .map(|a| a.courses.len())
                        .sum::<usize>();
                    records.push(record);
                }
                Err(err) => {
                    warn!("skipping {}: {}", path.display(), err);
                    counts.failed += 1;
                }
            }
        }

        counts.evaluations += records.len();
        db::save_evaluations(conn, &records)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn collect_dump_paths(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let entries = std::fs::read_dir(path)
        .with_context(|| format!("reading dump directory {}", path.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let p = entry?.path();
        if p.extension().is_some_and(|ext| ext == "json") {
            paths.push(p);
        }
    }
    paths.sort();
    Ok(paths)
}

fn source_name(path: &Path) -> String {
    match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

fn print_evaluation(record: &db::EvaluationRecord) {
    let e = &record.evaluation;
    println!("{} ({})", e.student_name, e.student_id);
    println!("{} | {} | {}", e.college, e.degree, e.level);
    println!("Majors:  {}", e.majors);
    if !e.minors.is_empty() {
        println!("Minors:  {}", e.minors);
    }
    if !e.concentrations.is_empty() {
        println!("Concentrations: {}", e.concentrations);
    }
    println!(
        "Catalog: {} | Graduation: {} | Generated: {}",
        e.catalog_term, e.expected_graduation, e.generated
    );
    println!(
        "Credits: {} required, {} used, {} transfer ({})",
        e.required_credits,
        e.used_credits,
        e.transfer_credits,
        if e.credits_met { "met" } else { "not met" }
    );
    println!(
        "GPA:     program {} ({}), overall {} ({})",
        e.program_gpa,
        e.program_gpa_met.as_str(),
        e.overall_gpa,
        e.overall_gpa_met.as_str()
    );

    for area in &e.areas {
        let marker = if area.met { "met" } else { "not met" };
        let earned = if area.earned_credits.is_empty() { "-" } else { area.earned_credits.as_str() };
        let gpa = if area.gpa.is_empty() { "-" } else { area.gpa.as_str() };
        println!(
            "\n[{}] {} ({} credits required, {} earned, GPA {})",
            marker, area.name, area.required_credits, earned, gpa
        );
        for course in &area.courses {
            let flag = match course.met {
                MetStatus::Yes => "+",
                MetStatus::No => "-",
                MetStatus::Unknown => "?",
            };
            if course.taken_id.is_empty() {
                println!("  {} {}", flag, course.requirement);
            } else {
                println!(
                    "  {} {} <- {} {} ({}, {} cr, {})",
                    flag,
                    course.requirement,
                    course.taken_id,
                    course.taken_title,
                    course.taken_term,
                    course.taken_credits,
                    course.taken_grade
                );
            }
            if !course.details.is_empty() {
                println!("      note: {}", course.details);
            }
        }
    }

    println!(
        "\nSource: {} (term {}, request {})",
        record.source, record.term, record.request_no
    );
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
