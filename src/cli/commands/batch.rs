//! `turnplan batch` command - Plan every digest under a directory

use std::path::{Path, PathBuf};

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::warn;
use walkdir::WalkDir;

use crate::cli::helpers::truncate_str;
use crate::cli::{load_planner, GlobalOpts};
use crate::core::digest::{DigestFile, GeometryKernel};
use crate::core::planner::{PlanOutcome, PlanRequest, Planner};
use crate::core::synthesis::QualityTargets;

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Directory searched recursively for *.digest.yaml / *.digest.json
    pub dir: PathBuf,

    /// Workpiece material profile for every part
    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Lathe machine profile for every part
    #[arg(long)]
    pub machine: Option<String>,

    /// Dimensional tolerance (mm)
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Surface roughness target Ra (µm)
    #[arg(long)]
    pub ra: Option<f64>,

    /// Also export the summary as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// One summary line per digest file
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct BatchRow {
    #[tabled(rename = "Part")]
    pub part: String,
    #[tabled(rename = "Scope")]
    pub scope: String,
    #[tabled(rename = "Score")]
    pub score: String,
    #[tabled(rename = "Ops")]
    pub operations: String,
    #[tabled(rename = "Minutes")]
    pub total_minutes: String,
    #[tabled(rename = "Validation")]
    pub validation: String,
    #[tabled(rename = "Recommended")]
    pub recommended: String,
    #[tabled(skip)]
    pub fingerprint: String,
    #[tabled(skip)]
    pub file: String,
}

impl BatchRow {
    fn from_outcome(path: &Path, outcome: &PlanOutcome) -> Self {
        Self {
            part: outcome.part.clone().unwrap_or_else(|| path.display().to_string()),
            scope: outcome.scope.to_string(),
            score: outcome.score.to_string(),
            operations: outcome.plan.operations.len().to_string(),
            total_minutes: format!("{:.1}", outcome.total_minutes),
            validation: outcome
                .validation
                .as_ref()
                .map(|v| v.worst_level.to_string())
                .unwrap_or_else(|| "-".to_string()),
            recommended: outcome
                .recommended_process
                .map(|p| p.to_string())
                .unwrap_or_else(|| "turning".to_string()),
            fingerprint: outcome.fingerprint.clone(),
            file: path.display().to_string(),
        }
    }

    fn from_error(path: &Path, error: &str) -> Self {
        Self {
            part: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            scope: "error".to_string(),
            score: "-".to_string(),
            operations: "-".to_string(),
            total_minutes: "-".to_string(),
            validation: truncate_str(error, 40),
            recommended: "-".to_string(),
            fingerprint: String::new(),
            file: path.display().to_string(),
        }
    }
}

/// Digest files under a directory, in a stable order
pub fn find_digests(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| DigestFile::is_digest_path(p))
        .collect();
    paths.sort();
    paths
}

/// Plan each digest independently; unreadable files become error rows
pub fn plan_all(planner: &Planner, paths: &[PathBuf], request: &PlanRequest) -> Vec<BatchRow> {
    paths
        .iter()
        .map(|path| match DigestFile.digest(path) {
            Ok(digest) => BatchRow::from_outcome(path, &planner.plan(&digest, request)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable digest");
                BatchRow::from_error(path, &e.to_string())
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[BatchRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).into_diagnostic()?;
    for row in rows {
        writer.serialize(row).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()
}

pub fn run(args: BatchArgs, global: &GlobalOpts) -> Result<()> {
    if !args.dir.is_dir() {
        return Err(miette::miette!("Not a directory: {}", args.dir.display()));
    }

    let planner = load_planner(global)?;
    let paths = find_digests(&args.dir);

    println!(
        "{} Planning {} digest file(s)...\n",
        style("→").blue(),
        paths.len()
    );
    if paths.is_empty() {
        return Ok(());
    }

    let request = PlanRequest {
        material: args.material,
        machine: args.machine,
        targets: QualityTargets::new(args.tolerance, args.ra),
    };
    let rows = plan_all(&planner, &paths, &request);

    println!("{}", Table::new(&rows).with(Style::rounded()));

    let count = |scope: &str| rows.iter().filter(|r| r.scope == scope).count();
    println!();
    println!(
        "  {} full   {} partial   {} not turnable   {} errors",
        style(count("full")).green(),
        style(count("partial")).yellow(),
        style(count("none")).red(),
        style(count("error")).red()
    );

    if let Some(csv_path) = &args.csv {
        write_csv(csv_path, &rows)?;
        println!(
            "{} Summary exported to {}",
            style("✓").green(),
            csv_path.display()
        );
    }
    Ok(())
}
