//! Human-readable reports for plans and classifications

use std::fmt::Write as _;

use chrono::Local;
use console::style;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::{format_minutes, format_optional, format_pct, truncate_str};
use crate::core::gate::{TurnabilityAssessment, TurningScope};
use crate::core::planner::PlanOutcome;
use crate::core::validation::ValidationLevel;
use crate::core::{AxisFit, FeatureDetection, FeatureFinding, ProcessOption};

const RULE_WIDTH: usize = 80;

const SETUP_NOTES: [&str; 6] = [
    "Mount part securely in chuck or collet",
    "Run spindle at low speed before full engagement",
    "Use appropriate coolant for cutting conditions",
    "Check tool alignment before each operation",
    "Monitor surface finish and adjust feeds/speeds as needed",
    "Ensure adequate clearance for each tool and holder",
];

#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "#")]
    seq: usize,
    #[tabled(rename = "Operation")]
    name: String,
    #[tabled(rename = "Tool")]
    tool: String,
    #[tabled(rename = "RPM")]
    rpm: u32,
    #[tabled(rename = "Feed (mm/rev)")]
    feed: String,
    #[tabled(rename = "DOC (mm)")]
    doc: String,
    #[tabled(rename = "Coolant")]
    coolant: String,
    #[tabled(rename = "Time (min)")]
    minutes: String,
}

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "#")]
    id: usize,
    #[tabled(rename = "Tool")]
    name: String,
    #[tabled(rename = "Type")]
    designation: String,
    #[tabled(rename = "Material")]
    material: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
}

#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "Process")]
    process: String,
    #[tabled(rename = "Score")]
    score: u8,
    #[tabled(rename = "Feasibility")]
    feasibility: String,
}

fn heavy_rule() -> String {
    style("═".repeat(RULE_WIDTH)).dim().to_string()
}

fn light_rule() -> String {
    style("─".repeat(RULE_WIDTH)).dim().to_string()
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", style(title).bold());
}

fn mark(passed: bool) -> String {
    if passed {
        style("✓").green().to_string()
    } else {
        style("✗").red().to_string()
    }
}

fn level_mark(level: ValidationLevel) -> String {
    match level {
        ValidationLevel::Pass => style("✓").green().to_string(),
        ValidationLevel::Warn => style("!").yellow().to_string(),
        ValidationLevel::Fail => style("✗").red().to_string(),
    }
}

fn verdict(scope: TurningScope) -> String {
    match scope {
        TurningScope::Full => style("FULL - strictly turnable").green().bold().to_string(),
        TurningScope::Partial => style("PARTIAL - turnable features only")
            .yellow()
            .bold()
            .to_string(),
        TurningScope::None => style("NOT SUITABLE FOR TURNING").red().bold().to_string(),
    }
}

fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn write_checks(out: &mut String, assessment: &TurnabilityAssessment) {
    for (name, passed) in assessment.checks.iter() {
        let _ = writeln!(out, "  {} {}", mark(passed), name);
    }
    if !assessment.checks_trusted {
        let _ = writeln!(
            out,
            "  {} legacy digest: strict turnability is not available",
            style("!").yellow()
        );
    }
}

fn write_finding(out: &mut String, label: &str, finding: &FeatureFinding) {
    let _ = writeln!(
        out,
        "  {}: {} (confidence {}, score {})",
        label,
        if finding.detected { "detected" } else { "not detected" },
        finding.confidence,
        finding.score
    );
    for reason in &finding.reasons {
        let _ = writeln!(out, "    - {}", reason);
    }
}

fn write_alternatives(out: &mut String, options: &[ProcessOption]) {
    let rows: Vec<ProcessRow> = options
        .iter()
        .map(|o| ProcessRow {
            process: o.process.to_string(),
            score: o.score,
            feasibility: o.feasibility.to_string(),
        })
        .collect();
    let _ = writeln!(out, "{}", render_table(rows));
    for option in options {
        for reason in &option.reasons {
            let _ = writeln!(out, "  {}: {}", option.process, reason);
        }
    }
}

/// Full text report for a plan outcome
pub fn render_plan(outcome: &PlanOutcome) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", heavy_rule());
    let _ = writeln!(out, "{}", style("TURNING PROCESS PLAN").bold());
    let _ = writeln!(out, "{}", heavy_rule());
    let _ = writeln!(out);

    heading(&mut out, "PART INFORMATION:");
    let _ = writeln!(out, "  Part: {}", outcome.part.as_deref().unwrap_or("Unknown"));
    let _ = writeln!(
        out,
        "  Analysis Date: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "  Material Profile: {}", outcome.material.name);
    let _ = writeln!(out, "  Machine Profile: {}", outcome.machine.name);
    let _ = writeln!(
        out,
        "  Targets: tolerance {} mm, Ra {} µm",
        format_optional(outcome.targets.tolerance_mm),
        format_optional(outcome.targets.roughness_ra_um)
    );
    let short_fingerprint = outcome.fingerprint.get(..12).unwrap_or(&outcome.fingerprint);
    let _ = writeln!(out, "  Fingerprint: {}", style(short_fingerprint).dim());
    let _ = writeln!(out);

    heading(&mut out, "TURNING MACHINABILITY:");
    let _ = writeln!(out, "  Score: {}/100", style(outcome.score).cyan());
    let _ = writeln!(out, "  Verdict: {}", verdict(outcome.scope));
    write_checks(&mut out, &outcome.assessment);
    let _ = writeln!(out);

    if !outcome.is_machinable() {
        if !outcome.turning_limitations.is_empty() {
            heading(&mut out, "TURNING LIMITATIONS:");
            for limitation in &outcome.turning_limitations {
                let _ = writeln!(out, "  • {}", limitation);
            }
            let _ = writeln!(out);
        }
        if let Some(best) = outcome.recommended_process {
            heading(&mut out, "ALTERNATIVE PROCESSES:");
            let _ = writeln!(out, "  Recommended: {}", style(best).cyan());
            write_alternatives(&mut out, &outcome.alternative_processes);
            let _ = writeln!(out);
        }
        write_notes(&mut out, &outcome.notes);
        return out;
    }

    heading(&mut out, "PART DIMENSIONS:");
    let _ = writeln!(out, "  Diameter: {:.2} mm", outcome.dimensions.diameter);
    let _ = writeln!(out, "  Length: {:.2} mm", outcome.dimensions.length);
    let _ = writeln!(out, "  Volume: {:.2} mm³", outcome.dimensions.volume);
    let _ = writeln!(out);

    heading(&mut out, "TURNING OPERATIONS SEQUENCE:");
    let rows: Vec<OperationRow> = outcome
        .plan
        .operations
        .iter()
        .map(|op| OperationRow {
            seq: op.sequence_index,
            name: op.name.clone(),
            tool: truncate_str(&op.tool_reference, 24),
            rpm: op.spindle_speed_rpm,
            feed: format!("{}", op.feed_rate_mm_per_rev),
            doc: format!("{}", op.depth_of_cut_mm),
            coolant: op.coolant_mode.to_string(),
            minutes: format!("{:.1}", op.estimated_minutes),
        })
        .collect();
    let _ = writeln!(out, "{}", render_table(rows));
    for op in &outcome.plan.operations {
        let _ = writeln!(out, "  {}. {}", op.sequence_index, op.description);
        if let Some(thread) = &op.thread_spec {
            let _ = writeln!(out, "     Thread: {}", thread);
        }
    }
    let _ = writeln!(out, "{}", light_rule());
    let _ = writeln!(
        out,
        "{} {}",
        style("TOTAL ESTIMATED MACHINING TIME:").bold(),
        format_minutes(outcome.total_minutes)
    );
    let _ = writeln!(out);

    heading(&mut out, "REQUIRED TURNING TOOLS:");
    let rows: Vec<ToolRow> = outcome
        .plan
        .tools
        .iter()
        .map(|t| ToolRow {
            id: t.id,
            name: t.name.clone(),
            designation: t.designation.clone(),
            material: format!("{} ({})", t.material, t.coating),
            purpose: truncate_str(&t.purpose, 40),
        })
        .collect();
    let _ = writeln!(out, "{}", render_table(rows));
    let _ = writeln!(out);

    if let Some(validation) = &outcome.validation {
        heading(&mut out, "VALIDATION:");
        for message in &validation.messages {
            let _ = writeln!(
                out,
                "  {} {}: {}",
                level_mark(message.level),
                message.title,
                message.detail
            );
        }
        let _ = writeln!(
            out,
            "  Overall: {} ({} pass, {} warn, {} fail)",
            validation.worst_level,
            validation.count(ValidationLevel::Pass),
            validation.count(ValidationLevel::Warn),
            validation.count(ValidationLevel::Fail)
        );
        let _ = writeln!(out);
    }

    if outcome.scope == TurningScope::Partial && !outcome.turning_limitations.is_empty() {
        heading(&mut out, "EXCLUDED FROM TURNING:");
        for limitation in &outcome.turning_limitations {
            let _ = writeln!(out, "  • {}", limitation);
        }
        let _ = writeln!(out);
    }

    if let Some(advice) = &outcome.advice {
        heading(&mut out, "OPTIMIZATION ADVICE:");
        let _ = writeln!(out, "{}", light_rule());
        let _ = writeln!(out, "{}", advice.trim_end());
        let _ = writeln!(out);
    }

    heading(&mut out, "SETUP NOTES:");
    let _ = writeln!(out, "{}", light_rule());
    for (i, note) in SETUP_NOTES.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, note);
    }
    let _ = writeln!(out);

    write_notes(&mut out, &outcome.notes);

    let _ = writeln!(out, "{}", heavy_rule());
    let _ = writeln!(out, "End of Process Plan");
    let _ = writeln!(out, "{}", heavy_rule());
    out
}

fn write_notes(out: &mut String, notes: &[String]) {
    if notes.is_empty() {
        return;
    }
    heading(out, "NOTES:");
    for note in notes {
        let _ = writeln!(out, "  • {}", note);
    }
    let _ = writeln!(out);
}

/// Text report for the gate and feature detection
pub fn render_classification(
    part: Option<&str>,
    fit: &AxisFit,
    assessment: &TurnabilityAssessment,
    detection: &FeatureDetection,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {}",
        style("Turnability:").bold(),
        part.unwrap_or("Unknown part")
    );
    let _ = writeln!(out, "{}", light_rule());
    let _ = writeln!(out, "  Score: {}/100", style(assessment.score).cyan());
    let _ = writeln!(out, "  Verdict: {}", verdict(assessment.scope));
    let _ = writeln!(out);

    heading(&mut out, "AXIS FIT:");
    if fit.available {
        let _ = writeln!(
            out,
            "  Axis: [{:.3}, {:.3}, {:.3}] from {} cues",
            fit.best_axis[0], fit.best_axis[1], fit.best_axis[2], fit.cue_count
        );
        let _ = writeln!(
            out,
            "  Aligned: {} strict, {} relaxed, mean misalignment {:.1}°",
            format_pct(fit.aligned_ratio_strict),
            format_pct(fit.aligned_ratio_relaxed),
            fit.mean_misalignment_degrees
        );
    } else {
        let _ = writeln!(out, "  No axis cues available");
    }
    let _ = writeln!(out);

    heading(&mut out, "CHECKS:");
    for reason in &assessment.reasons {
        let _ = writeln!(out, "  {}", reason);
    }
    let _ = writeln!(out);

    heading(&mut out, "FEATURES:");
    write_finding(&mut out, "Threading", &detection.threading);
    write_finding(&mut out, "Grooving", &detection.grooving);
    out
}
