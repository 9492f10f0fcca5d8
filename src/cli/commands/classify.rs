//! `turnplan classify` command - Turnability gate and feature detection only

use std::path::PathBuf;

use miette::Result;
use serde::Serialize;

use crate::cli::output::{effective_format, emit, serialize};
use crate::cli::report::render_classification;
use crate::cli::{load_planner, GlobalOpts, OutputFormat};
use crate::core::digest::{DigestFile, GeometryKernel};
use crate::core::{AxisFit, FeatureDetection, GateConfig, TurnabilityAssessment, TurningScope};

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Digest file (YAML or JSON)
    pub digest: PathBuf,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Classification<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    part: Option<&'a str>,
    scope: TurningScope,
    score: u8,
    axis_fit: &'a AxisFit,
    assessment: &'a TurnabilityAssessment,
    feature_detection: &'a FeatureDetection,
    /// Thresholds the assessment was made with
    gate: &'a GateConfig,
}

pub fn run(args: ClassifyArgs, global: &GlobalOpts) -> Result<()> {
    let planner = load_planner(global)?;
    let digest = DigestFile.digest(&args.digest)?;
    let (fit, assessment, detection) = planner.classify(&digest);

    let format = effective_format(args.format, args.output.as_deref());
    let content = match format {
        OutputFormat::Yaml | OutputFormat::Json => serialize(
            &Classification {
                part: digest.part.as_deref(),
                scope: assessment.scope,
                score: assessment.score,
                axis_fit: &fit,
                assessment: &assessment,
                feature_detection: &detection,
                gate: planner.gate_config(),
            },
            format,
        )?,
        OutputFormat::Auto | OutputFormat::Text => {
            if args.output.is_some() {
                console::set_colors_enabled(false);
            }
            render_classification(digest.part.as_deref(), &fit, &assessment, &detection)
        }
    };
    emit(&content, args.output.as_deref())
}
