//! Post-synthesis validation rules
//!
//! Re-derives what the digest implies (threading, grooving, fine finishing)
//! and cross-checks it against the synthesized operations, then checks the
//! part and the roughing cut against the machine envelope. Every rule yields
//! exactly one message; nothing here returns an error.

use serde::{Deserialize, Serialize};

use crate::core::digest::GeometryDigest;
use crate::core::features::FeatureDetection;
use crate::core::profiles::{MachineProfile, MaterialProfile};
use crate::core::synthesis::{OperationKind, ProcessPlan, QualityTargets};

/// Fraction of the RPM ceiling at which spindle margin is flagged
pub const SPINDLE_MARGIN_RATIO: f64 = 0.95;

/// Fraction of rated power at which roughing load is flagged
pub const POWER_MARGIN_RATIO: f64 = 0.85;

/// Severity of a validation message, ordered pass < warn < fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    #[default]
    Pass,
    Warn,
    Fail,
}

impl std::fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationLevel::Pass => write!(f, "pass"),
            ValidationLevel::Warn => write!(f, "warn"),
            ValidationLevel::Fail => write!(f, "fail"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub level: ValidationLevel,
    pub title: String,
    pub detail: String,
}

impl ValidationMessage {
    fn new(level: ValidationLevel, title: &str, detail: String) -> Self {
        Self {
            level,
            title: title.to_string(),
            detail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub messages: Vec<ValidationMessage>,
    pub worst_level: ValidationLevel,
    /// Estimated roughing power demand (kW), 0 without a roughing pass
    pub roughing_power_kw: f64,
}

impl ValidationReport {
    pub fn message(&self, title: &str) -> Option<&ValidationMessage> {
        self.messages.iter().find(|m| m.title == title)
    }

    pub fn count(&self, level: ValidationLevel) -> usize {
        self.messages.iter().filter(|m| m.level == level).count()
    }
}

pub const THREADING_RULE: &str = "Threading rule";
pub const GROOVING_RULE: &str = "Grooving rule";
pub const FINISH_RULE: &str = "Tolerance/Ra rule";
pub const DIAMETER_LIMIT: &str = "Machine diameter limit";
pub const LENGTH_LIMIT: &str = "Machine length limit";
pub const SPINDLE_MARGIN: &str = "Spindle speed margin";
pub const SPINDLE_POWER: &str = "Spindle power";

/// Inputs the validation rules read
pub struct ValidationInput<'a> {
    pub digest: &'a GeometryDigest,
    pub detection: &'a FeatureDetection,
    pub plan: &'a ProcessPlan,
    pub machine: &'a MachineProfile,
    pub material: &'a MaterialProfile,
    pub targets: QualityTargets,
}

fn consistency_rule(title: &str, feature: &str, expected: bool, present: bool) -> ValidationMessage {
    let level = if expected == present {
        ValidationLevel::Pass
    } else {
        ValidationLevel::Fail
    };
    let detail = match (expected, present) {
        (true, true) => format!("{} detected and a {} operation is planned", feature, feature),
        (false, false) => format!("No {} detected and none planned", feature),
        (true, false) => format!("{} detected but no {} operation is planned", feature, feature),
        (false, true) => format!("{} operation planned without {} evidence", feature, feature),
    };
    ValidationMessage::new(level, title, detail)
}

fn envelope_rule(title: &str, what: &str, part: f64, limit: f64) -> ValidationMessage {
    if part > limit {
        ValidationMessage::new(
            ValidationLevel::Fail,
            title,
            format!("Part {} {:.1} mm exceeds machine limit {:.1} mm", what, part, limit),
        )
    } else {
        ValidationMessage::new(
            ValidationLevel::Pass,
            title,
            format!("Part {} {:.1} mm within machine limit {:.1} mm", what, part, limit),
        )
    }
}

/// Estimated roughing power (kW) for the plan, 0 without a roughing pass
pub fn roughing_power_kw(input: &ValidationInput<'_>) -> f64 {
    input
        .plan
        .operation(OperationKind::RoughTurning)
        .map(|op| {
            let removal_cm3_per_min = std::f64::consts::PI
                * input.digest.dimensions.diameter()
                * op.spindle_speed_rpm as f64
                * op.feed_rate_mm_per_rev
                * op.depth_of_cut_mm
                / 1000.0;
            removal_cm3_per_min * input.material.specific_power
        })
        .unwrap_or(0.0)
}

/// Run every validation rule
pub fn validate(input: &ValidationInput<'_>) -> ValidationReport {
    let plan = input.plan;
    let machine = input.machine;
    let dims = &input.digest.dimensions;
    let mut messages = Vec::with_capacity(7);

    messages.push(consistency_rule(
        THREADING_RULE,
        "threading",
        input.detection.threading.detected,
        plan.has(OperationKind::Threading),
    ));
    messages.push(consistency_rule(
        GROOVING_RULE,
        "grooving",
        input.detection.grooving.detected,
        plan.has(OperationKind::Grooving),
    ));

    let finish_expected = input.targets.requires_fine_finish();
    let finish_present = plan.has(OperationKind::FineFinish);
    messages.push(ValidationMessage::new(
        if finish_expected == finish_present {
            ValidationLevel::Pass
        } else {
            ValidationLevel::Fail
        },
        FINISH_RULE,
        match (finish_expected, finish_present) {
            (true, true) => "Quality targets require and receive a fine finishing pass".to_string(),
            (false, false) => "Quality targets met by standard finish turning".to_string(),
            (true, false) => "Quality targets require a fine finishing pass but none is planned".to_string(),
            (false, true) => "Fine finishing pass planned without a tight quality target".to_string(),
        },
    ));

    messages.push(envelope_rule(
        DIAMETER_LIMIT,
        "diameter",
        dims.diameter(),
        machine.max_diameter_mm,
    ));
    messages.push(envelope_rule(
        LENGTH_LIMIT,
        "length",
        dims.length(),
        machine.max_length_mm,
    ));

    let rpm_threshold = machine.max_rpm as f64 * SPINDLE_MARGIN_RATIO;
    let near_limit: Vec<String> = plan
        .operations
        .iter()
        .filter(|op| op.spindle_speed_rpm as f64 >= rpm_threshold)
        .map(|op| format!("{} ({} RPM)", op.name, op.spindle_speed_rpm))
        .collect();
    messages.push(if near_limit.is_empty() {
        ValidationMessage::new(
            ValidationLevel::Pass,
            SPINDLE_MARGIN,
            format!("All operations below {:.0} RPM", rpm_threshold),
        )
    } else {
        ValidationMessage::new(
            ValidationLevel::Warn,
            SPINDLE_MARGIN,
            format!(
                "Near machine ceiling of {} RPM: {}",
                machine.max_rpm,
                near_limit.join(", ")
            ),
        )
    });

    let power = roughing_power_kw(input);
    let power_limit = machine.max_power_kw * POWER_MARGIN_RATIO;
    messages.push(if !plan.has(OperationKind::RoughTurning) {
        ValidationMessage::new(
            ValidationLevel::Pass,
            SPINDLE_POWER,
            "No roughing pass; no significant power demand".to_string(),
        )
    } else if power > power_limit {
        ValidationMessage::new(
            ValidationLevel::Warn,
            SPINDLE_POWER,
            format!(
                "Roughing needs ~{:.2} kW, above {:.0}% of rated {:.1} kW",
                power,
                POWER_MARGIN_RATIO * 100.0,
                machine.max_power_kw
            ),
        )
    } else {
        ValidationMessage::new(
            ValidationLevel::Pass,
            SPINDLE_POWER,
            format!(
                "Roughing needs ~{:.2} kW of rated {:.1} kW",
                power, machine.max_power_kw
            ),
        )
    });

    let worst_level = messages
        .iter()
        .map(|m| m.level)
        .max()
        .unwrap_or_default();

    ValidationReport {
        messages,
        worst_level,
        roughing_power_kw: power,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::digest::Dimensions;
    use crate::core::features::detect_features;
    use crate::core::profiles::ProfileCatalog;
    use crate::core::synthesis::{CoolantMode, Operation};

    fn op(index: usize, kind: OperationKind, rpm: u32) -> Operation {
        Operation {
            sequence_index: index,
            kind,
            name: kind.title().to_string(),
            description: String::new(),
            tool_reference: String::new(),
            spindle_speed_rpm: rpm,
            feed_rate_mm_per_rev: 0.2,
            depth_of_cut_mm: 2.0,
            coolant_mode: CoolantMode::Flood,
            estimated_minutes: 1.0,
            thread_spec: None,
        }
    }

    fn digest(diameter: f64, length: f64) -> GeometryDigest {
        GeometryDigest {
            dimensions: Dimensions {
                x: diameter,
                y: diameter,
                z: length,
                volume: 0.0,
            },
            ..Default::default()
        }
    }

    fn run(digest: &GeometryDigest, plan: &ProcessPlan, targets: QualityTargets) -> ValidationReport {
        let catalog = ProfileCatalog::default();
        let machine = catalog.default_machine();
        let material = catalog.material(Some("Mild Steel (AISI 1018/1020)")).profile;
        let detection = detect_features(digest);
        validate(&ValidationInput {
            digest,
            detection: &detection,
            plan,
            machine: &machine,
            material: &material,
            targets,
        })
    }

    #[test]
    fn test_clean_plan_passes() {
        let plan = ProcessPlan {
            operations: vec![op(1, OperationKind::Facing, 1000), op(2, OperationKind::Parting, 900)],
            tools: vec![],
        };
        let report = run(&digest(40.0, 100.0), &plan, QualityTargets::default());
        assert_eq!(report.messages.len(), 7);
        assert_eq!(report.worst_level, ValidationLevel::Pass);
        assert_eq!(report.roughing_power_kw, 0.0);
    }

    #[test]
    fn test_unexpected_threading_fails() {
        let plan = ProcessPlan {
            operations: vec![op(1, OperationKind::Threading, 500)],
            tools: vec![],
        };
        let report = run(&digest(40.0, 100.0), &plan, QualityTargets::default());
        assert_eq!(report.message(THREADING_RULE).unwrap().level, ValidationLevel::Fail);
        assert_eq!(report.worst_level, ValidationLevel::Fail);
    }

    #[test]
    fn test_missing_fine_finish_fails() {
        let plan = ProcessPlan::default();
        let report = run(&digest(40.0, 100.0), &plan, QualityTargets::new(Some(0.01), None));
        assert_eq!(report.message(FINISH_RULE).unwrap().level, ValidationLevel::Fail);
    }

    #[test]
    fn test_envelope_limits() {
        let report = run(&digest(300.0, 600.0), &ProcessPlan::default(), QualityTargets::default());
        assert_eq!(report.message(DIAMETER_LIMIT).unwrap().level, ValidationLevel::Fail);
        assert_eq!(report.message(LENGTH_LIMIT).unwrap().level, ValidationLevel::Fail);
    }

    #[test]
    fn test_spindle_margin_warns_near_ceiling() {
        let plan = ProcessPlan {
            operations: vec![op(1, OperationKind::FinishTurning, 3800)],
            tools: vec![],
        };
        let report = run(&digest(40.0, 100.0), &plan, QualityTargets::default());
        assert_eq!(report.message(SPINDLE_MARGIN).unwrap().level, ValidationLevel::Warn);
        assert_eq!(report.worst_level, ValidationLevel::Warn);
    }

    #[test]
    fn test_roughing_power_estimate() {
        // π × 200 × 1000 × 0.2 × 2 / 1000 = 251.3 cm³/min × 0.045 = 11.3 kW
        let plan = ProcessPlan {
            operations: vec![op(1, OperationKind::RoughTurning, 1000)],
            tools: vec![],
        };
        let report = run(&digest(200.0, 100.0), &plan, QualityTargets::default());
        assert!((report.roughing_power_kw - 11.31).abs() < 0.01);
        assert_eq!(report.message(SPINDLE_POWER).unwrap().level, ValidationLevel::Pass);

        let plan = ProcessPlan {
            operations: vec![op(1, OperationKind::RoughTurning, 1200)],
            tools: vec![],
        };
        let report = run(&digest(200.0, 100.0), &plan, QualityTargets::default());
        assert_eq!(report.message(SPINDLE_POWER).unwrap().level, ValidationLevel::Warn);
    }

    #[test]
    fn test_level_ordering() {
        assert!(ValidationLevel::Pass < ValidationLevel::Warn);
        assert!(ValidationLevel::Warn < ValidationLevel::Fail);
    }
}
