//! Turning operation synthesis
//!
//! Builds the ordered operation sequence for a machinable part, with spindle
//! speeds derived from surface speed, feeds, depths of cut, coolant and time
//! estimates, plus the list of tools the sequence needs.
//!
//! Spindle speed:
//! ```text
//! rpm = (sfm × material_factor × 12) / (π × diameter_in)     clamped to [100, machine max]
//! ```
//!
//! Turning time:
//! ```text
//! passes        = max(⌊(D/2) / doc⌋, 1)
//! time_per_pass = L / (rpm × feed / 1000)
//! total         = time_per_pass × passes + 0.5 × (passes − 1)
//! ```
//! Totals above [`CYCLE_TIME_CAP_TRIGGER_MIN`] are replaced by
//! [`CYCLE_TIME_CAP_MIN`]. The cap is a tunable heuristic, not a physical
//! limit.

use serde::{Deserialize, Serialize};

use crate::core::digest::GeometryDigest;
use crate::core::features::FeatureDetection;
use crate::core::gate::TurnabilityAssessment;
use crate::core::profiles::{MachineProfile, MaterialProfile};

/// Lowest spindle speed ever commanded
pub const MIN_SPINDLE_RPM: u32 = 100;

/// Diameter used when the supplied diameter is not positive (mm)
pub const FALLBACK_DIAMETER_MM: f64 = 20.0;

/// Rough turning is added only above this diameter (mm, exclusive)
pub const ROUGHING_MIN_DIAMETER_MM: f64 = 20.0;

/// Boring is added only above this many cylindrical faces
pub const BORING_MIN_CYLINDRICAL_FACES: u32 = 2;

/// Tolerance at or below which a fine finishing pass is added (mm)
pub const FINE_FINISH_TOLERANCE_MM: f64 = 0.05;

/// Roughness at or below which a fine finishing pass is added (Ra, µm)
pub const FINE_FINISH_RA_UM: f64 = 1.6;

/// Tool change overhead between passes (minutes)
pub const TOOL_CHANGE_MIN: f64 = 0.5;

/// Estimates above this are treated as degenerate (minutes)
pub const CYCLE_TIME_CAP_TRIGGER_MIN: f64 = 100.0;

/// Replacement for degenerate estimates (minutes)
pub const CYCLE_TIME_CAP_MIN: f64 = 10.0;

const MM_PER_INCH: f64 = 25.4;

/// Turning operation kinds, in sequence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    Facing,
    RoughTurning,
    FinishTurning,
    FineFinish,
    Boring,
    Threading,
    Grooving,
    Parting,
}

impl OperationKind {
    /// Base surface speed (SFM) before the material factor
    pub fn base_surface_speed(self) -> f64 {
        match self {
            OperationKind::Facing => 250.0,
            OperationKind::RoughTurning => 200.0,
            OperationKind::FinishTurning => 300.0,
            OperationKind::FineFinish => 350.0,
            OperationKind::Boring => 180.0,
            OperationKind::Threading => 100.0,
            OperationKind::Grooving => 150.0,
            OperationKind::Parting => 120.0,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            OperationKind::Facing => "Face & Center",
            OperationKind::RoughTurning => "Rough Turning",
            OperationKind::FinishTurning => "Finish Turning",
            OperationKind::FineFinish => "Fine Finish Pass",
            OperationKind::Boring => "Boring",
            OperationKind::Threading => "Threading",
            OperationKind::Grooving => "Grooving",
            OperationKind::Parting => "Parting Off",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Facing => write!(f, "facing"),
            OperationKind::RoughTurning => write!(f, "rough-turning"),
            OperationKind::FinishTurning => write!(f, "finish-turning"),
            OperationKind::FineFinish => write!(f, "fine-finish"),
            OperationKind::Boring => write!(f, "boring"),
            OperationKind::Threading => write!(f, "threading"),
            OperationKind::Grooving => write!(f, "grooving"),
            OperationKind::Parting => write!(f, "parting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolantMode {
    Flood,
    Light,
}

impl std::fmt::Display for CoolantMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoolantMode::Flood => write!(f, "flood"),
            CoolantMode::Light => write!(f, "light"),
        }
    }
}

/// One manufacturing step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// 1-based position in the sequence
    pub sequence_index: usize,
    pub kind: OperationKind,
    pub name: String,
    pub description: String,
    pub tool_reference: String,
    pub spindle_speed_rpm: u32,
    pub feed_rate_mm_per_rev: f64,
    pub depth_of_cut_mm: f64,
    pub coolant_mode: CoolantMode,
    pub estimated_minutes: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_spec: Option<String>,
}

/// A tool needed by the operation sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequirement {
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub designation: String,
    pub material: String,
    pub coating: String,
    pub purpose: String,
}

/// Optional quality targets for the finished part
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityTargets {
    /// Dimensional tolerance (mm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance_mm: Option<f64>,
    /// Surface roughness (Ra, µm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness_ra_um: Option<f64>,
}

impl QualityTargets {
    pub fn new(tolerance_mm: Option<f64>, roughness_ra_um: Option<f64>) -> Self {
        Self {
            tolerance_mm,
            roughness_ra_um,
        }
    }

    /// Whether the targets call for a fine finishing pass
    pub fn requires_fine_finish(&self) -> bool {
        self.tolerance_mm.is_some_and(|t| t <= FINE_FINISH_TOLERANCE_MM)
            || self.roughness_ra_um.is_some_and(|ra| ra <= FINE_FINISH_RA_UM)
    }

    fn describe(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.tolerance_mm.map(|t| format!("tolerance ±{} mm", t)),
            self.roughness_ra_um.map(|ra| format!("Ra {} µm", ra)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Everything synthesis needs besides the digest
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub material: &'a MaterialProfile,
    pub machine: &'a MachineProfile,
    pub targets: QualityTargets,
}

impl SynthesisContext<'_> {
    /// Spindle speed for an operation kind at a working diameter
    pub fn spindle_speed(&self, diameter_mm: f64, kind: OperationKind) -> u32 {
        spindle_speed(diameter_mm, kind, self.material, self.machine)
    }
}

/// Spindle speed for an operation at a working diameter
pub fn spindle_speed(
    diameter_mm: f64,
    kind: OperationKind,
    material: &MaterialProfile,
    machine: &MachineProfile,
) -> u32 {
    let diameter_mm = if diameter_mm.is_finite() && diameter_mm > 0.0 {
        diameter_mm
    } else {
        FALLBACK_DIAMETER_MM
    };
    let sfm = kind.base_surface_speed() * material.speed_factor;
    let diameter_in = diameter_mm / MM_PER_INCH;
    let rpm = (sfm * 12.0) / (std::f64::consts::PI * diameter_in);

    let ceiling = machine.max_rpm.max(MIN_SPINDLE_RPM);
    if !rpm.is_finite() {
        return MIN_SPINDLE_RPM;
    }
    (rpm as u32).clamp(MIN_SPINDLE_RPM, ceiling)
}

/// Estimated minutes for a multi-pass turning operation
pub fn estimate_turning_minutes(
    diameter_mm: f64,
    length_mm: f64,
    depth_of_cut_mm: f64,
    feed_mm_per_rev: f64,
    ctx: &SynthesisContext<'_>,
) -> f64 {
    if feed_mm_per_rev <= 0.0 || length_mm <= 0.0 || depth_of_cut_mm <= 0.0 {
        return 0.0;
    }

    let passes = (((diameter_mm / 2.0) / depth_of_cut_mm).floor() as u32).max(1);
    let rpm = ctx.spindle_speed(diameter_mm, OperationKind::RoughTurning);
    let time_per_pass = length_mm / (rpm as f64 * feed_mm_per_rev / 1000.0);

    let mut total = time_per_pass * passes as f64 + TOOL_CHANGE_MIN * (passes - 1) as f64;
    if total > CYCLE_TIME_CAP_TRIGGER_MIN {
        total = CYCLE_TIME_CAP_MIN;
    }
    round_tenths(total)
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// ISO metric coarse threads: (nominal diameter, pitch) in mm
const METRIC_COARSE_THREADS: [(f64, f64); 16] = [
    (3.0, 0.5),
    (4.0, 0.7),
    (5.0, 0.8),
    (6.0, 1.0),
    (8.0, 1.25),
    (10.0, 1.5),
    (12.0, 1.75),
    (16.0, 2.0),
    (20.0, 2.5),
    (24.0, 3.0),
    (30.0, 3.5),
    (36.0, 4.0),
    (42.0, 4.5),
    (48.0, 5.0),
    (56.0, 5.5),
    (64.0, 6.0),
];

/// Largest coarse thread that fits the diameter: (designation, pitch)
pub fn select_thread(diameter_mm: f64) -> (String, f64) {
    let (nominal, pitch) = METRIC_COARSE_THREADS
        .iter()
        .rev()
        .find(|(nominal, _)| *nominal <= diameter_mm)
        .copied()
        .unwrap_or(METRIC_COARSE_THREADS[0]);
    (format!("M{} x {}", nominal, pitch), pitch)
}

/// Operations and tools for a machinable part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessPlan {
    pub operations: Vec<Operation>,
    pub tools: Vec<ToolRequirement>,
}

impl ProcessPlan {
    pub fn total_minutes(&self) -> f64 {
        round_tenths(self.operations.iter().map(|op| op.estimated_minutes).sum())
    }

    pub fn has(&self, kind: OperationKind) -> bool {
        self.operations.iter().any(|op| op.kind == kind)
    }

    pub fn operation(&self, kind: OperationKind) -> Option<&Operation> {
        self.operations.iter().find(|op| op.kind == kind)
    }
}

struct OperationSpec {
    kind: OperationKind,
    description: String,
    tool: &'static str,
    rpm: u32,
    feed: f64,
    doc: f64,
    coolant: CoolantMode,
    minutes: f64,
    thread_spec: Option<String>,
}

impl OperationSpec {
    fn build(self) -> Operation {
        Operation {
            sequence_index: 0,
            kind: self.kind,
            name: self.kind.title().to_string(),
            description: self.description,
            tool_reference: self.tool.to_string(),
            spindle_speed_rpm: self.rpm,
            feed_rate_mm_per_rev: self.feed,
            depth_of_cut_mm: self.doc,
            coolant_mode: self.coolant,
            estimated_minutes: self.minutes,
            thread_spec: self.thread_spec,
        }
    }
}

/// Generate the operation sequence and tool list
///
/// Returns an empty plan when the assessment is not machinable.
pub fn synthesize(
    digest: &GeometryDigest,
    assessment: &TurnabilityAssessment,
    detection: &FeatureDetection,
    ctx: &SynthesisContext<'_>,
) -> ProcessPlan {
    if !assessment.is_machinable {
        return ProcessPlan::default();
    }

    let diameter = digest.dimensions.diameter();
    let length = digest.dimensions.length();
    let mut specs = Vec::with_capacity(8);

    specs.push(OperationSpec {
        kind: OperationKind::Facing,
        description: "Face the part and create center marks for alignment".to_string(),
        tool: "Facing insert (CNMG)",
        rpm: ctx.spindle_speed(diameter, OperationKind::Facing),
        feed: 0.15,
        doc: 1.0,
        coolant: CoolantMode::Flood,
        minutes: 2.0,
        thread_spec: None,
    });

    if diameter > ROUGHING_MIN_DIAMETER_MM {
        specs.push(OperationSpec {
            kind: OperationKind::RoughTurning,
            description: "Remove material from outer diameter".to_string(),
            tool: "Turning insert (VNMG)",
            rpm: ctx.spindle_speed(diameter * 0.8, OperationKind::RoughTurning),
            feed: 0.20,
            doc: 2.0,
            coolant: CoolantMode::Flood,
            minutes: estimate_turning_minutes(diameter, length, 2.0, 0.20, ctx),
            thread_spec: None,
        });
    }

    let finish_description = match ctx.targets.describe() {
        Some(targets) => format!("Achieve final diameter and surface finish ({})", targets),
        None => "Achieve final diameter and surface finish".to_string(),
    };
    specs.push(OperationSpec {
        kind: OperationKind::FinishTurning,
        description: finish_description,
        tool: "Finishing insert (VNMG, R0.4)",
        rpm: ctx.spindle_speed(diameter, OperationKind::FinishTurning),
        feed: 0.10,
        doc: 0.5,
        coolant: CoolantMode::Flood,
        minutes: estimate_turning_minutes(diameter, length, 0.5, 0.10, ctx),
        thread_spec: None,
    });

    if ctx.targets.requires_fine_finish() {
        specs.push(OperationSpec {
            kind: OperationKind::FineFinish,
            description: "Light spring pass to hold tight tolerance and low roughness".to_string(),
            tool: "Fine finishing insert (VCGT, R0.2)",
            rpm: ctx.spindle_speed(diameter, OperationKind::FineFinish),
            feed: 0.05,
            doc: 0.2,
            coolant: CoolantMode::Flood,
            minutes: 1.5,
            thread_spec: None,
        });
    }

    if digest.cylindrical_face_count > BORING_MIN_CYLINDRICAL_FACES {
        specs.push(OperationSpec {
            kind: OperationKind::Boring,
            description: "Machine internal cylindrical features".to_string(),
            tool: "Boring bar with insert",
            rpm: ctx.spindle_speed(diameter * 0.5, OperationKind::Boring),
            feed: 0.12,
            doc: 1.0,
            coolant: CoolantMode::Flood,
            minutes: 3.0,
            thread_spec: None,
        });
    }

    if detection.threading.detected {
        let (designation, pitch) = select_thread(diameter);
        specs.push(OperationSpec {
            kind: OperationKind::Threading,
            description: "Cut external threads".to_string(),
            tool: "Threading insert (60° profile)",
            rpm: (ctx.spindle_speed(diameter, OperationKind::Threading) / 2).max(MIN_SPINDLE_RPM),
            feed: pitch,
            doc: 0.5,
            coolant: CoolantMode::Light,
            minutes: 2.5,
            thread_spec: Some(designation),
        });
    }

    if detection.grooving.detected {
        specs.push(OperationSpec {
            kind: OperationKind::Grooving,
            description: "Cut grooves and undercuts".to_string(),
            tool: "Grooving insert",
            rpm: ctx.spindle_speed(diameter * 0.7, OperationKind::Grooving),
            feed: 0.15,
            doc: 0.8,
            coolant: CoolantMode::Flood,
            minutes: 1.5,
            thread_spec: None,
        });
    }

    specs.push(OperationSpec {
        kind: OperationKind::Parting,
        description: "Separate finished part from stock".to_string(),
        tool: "Parting blade",
        rpm: ctx.spindle_speed(diameter * 0.9, OperationKind::Parting),
        feed: 0.08,
        doc: round_tenths(diameter * 0.5),
        coolant: CoolantMode::Light,
        minutes: 1.0,
        thread_spec: None,
    });

    let operations: Vec<Operation> = specs
        .into_iter()
        .enumerate()
        .map(|(i, spec)| {
            let mut op = spec.build();
            op.sequence_index = i + 1;
            op
        })
        .collect();

    let tools = required_tools(&operations);
    ProcessPlan { operations, tools }
}

struct CatalogTool {
    name: &'static str,
    designation: &'static str,
    coating: &'static str,
    purpose: &'static str,
    used_by: &'static [OperationKind],
}

const TOOL_CATALOG: [CatalogTool; 6] = [
    CatalogTool {
        name: "Facing Insert",
        designation: "CNMG 432 M0804",
        coating: "TiAlN",
        purpose: "For facing and end turning",
        used_by: &[OperationKind::Facing],
    },
    CatalogTool {
        name: "Turning Insert",
        designation: "VNMG 431",
        coating: "TiAlN",
        purpose: "For rough and finish turning",
        used_by: &[OperationKind::RoughTurning, OperationKind::FinishTurning],
    },
    CatalogTool {
        name: "Boring Insert",
        designation: "VNMG 331",
        coating: "TiAlN",
        purpose: "For boring internal diameters",
        used_by: &[OperationKind::Boring],
    },
    CatalogTool {
        name: "Threading Insert",
        designation: "TT09T304",
        coating: "TiN",
        purpose: "For external threading",
        used_by: &[OperationKind::Threading],
    },
    CatalogTool {
        name: "Grooving Insert",
        designation: "MGMN 300-M",
        coating: "TiAlN",
        purpose: "For grooving operations",
        used_by: &[OperationKind::Grooving],
    },
    CatalogTool {
        name: "Parting Blade",
        designation: "MGHR-3-M",
        coating: "TiN",
        purpose: "For parting off finished parts",
        used_by: &[OperationKind::Parting],
    },
];

const FINE_FINISH_TOOL: CatalogTool = CatalogTool {
    name: "Fine Finishing Insert",
    designation: "VCGT 160402",
    coating: "Uncoated (polished)",
    purpose: "For tight-tolerance and low-roughness finishing passes",
    used_by: &[OperationKind::FineFinish],
};

/// Tools used by at least one operation, numbered 1..N
pub fn required_tools(operations: &[Operation]) -> Vec<ToolRequirement> {
    let present = |kinds: &[OperationKind]| operations.iter().any(|op| kinds.contains(&op.kind));

    TOOL_CATALOG
        .iter()
        .chain(std::iter::once(&FINE_FINISH_TOOL))
        .filter(|tool| present(tool.used_by))
        .enumerate()
        .map(|(i, tool)| ToolRequirement {
            id: i + 1,
            name: tool.name.to_string(),
            designation: tool.designation.to_string(),
            material: "Carbide".to_string(),
            coating: tool.coating.to_string(),
            purpose: tool.purpose.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::axis::fit_axis;
    use crate::core::digest::{Dimensions, EdgeCounts, SurfaceCounts};
    use crate::core::features::detect_features;
    use crate::core::gate::{assess, GateConfig};
    use crate::core::profiles::{DEFAULT_MACHINE, DEFAULT_MATERIAL};

    fn material() -> MaterialProfile {
        MaterialProfile::new(DEFAULT_MATERIAL, 1.7, 0.013)
    }

    fn machine() -> MachineProfile {
        MachineProfile::new(DEFAULT_MACHINE, 4000, 14.9, 262.0, 533.0)
    }

    fn shaft(diameter: f64) -> GeometryDigest {
        GeometryDigest {
            surface_counts: SurfaceCounts {
                plane: 4,
                cylinder: 6,
                cone: 1,
                ..Default::default()
            },
            edge_counts: EdgeCounts {
                line: 8,
                circle: 6,
                other: 0,
            },
            dimensions: Dimensions {
                x: diameter,
                y: diameter,
                z: diameter * 3.0,
                volume: 0.0,
            },
            axis_cues: vec![[0.0, 0.0, 1.0]; 20],
            cylindrical_face_count: 6,
            ..Default::default()
        }
    }

    fn plan_for(digest: &GeometryDigest, targets: QualityTargets) -> ProcessPlan {
        let fit = fit_axis(&digest.unit_cues());
        let assessment = assess(digest, &fit, &GateConfig::default());
        let detection = detect_features(digest);
        let (material, machine) = (material(), machine());
        let ctx = SynthesisContext {
            material: &material,
            machine: &machine,
            targets,
        };
        synthesize(digest, &assessment, &detection, &ctx)
    }

    #[test]
    fn test_spindle_speed_formula() {
        // 250 SFM × 1.0 × 12 / (π × 1 in) = 954.9
        let steel = MaterialProfile::new("steel", 1.0, 0.045);
        let rpm = spindle_speed(25.4, OperationKind::Facing, &steel, &machine());
        assert_eq!(rpm, 954);
    }

    #[test]
    fn test_spindle_speed_is_clamped() {
        let m = machine();
        assert_eq!(spindle_speed(0.5, OperationKind::FinishTurning, &material(), &m), 4000);
        assert_eq!(spindle_speed(5000.0, OperationKind::Threading, &material(), &m), 100);
        // Non-positive diameters use the fallback diameter
        assert_eq!(
            spindle_speed(0.0, OperationKind::Facing, &material(), &m),
            spindle_speed(FALLBACK_DIAMETER_MM, OperationKind::Facing, &material(), &m)
        );
    }

    #[test]
    fn test_turning_time_cap() {
        let (material, machine) = (material(), machine());
        let ctx = SynthesisContext {
            material: &material,
            machine: &machine,
            targets: QualityTargets::default(),
        };
        assert_eq!(estimate_turning_minutes(40.0, 120.0, 2.0, 0.2, &ctx), CYCLE_TIME_CAP_MIN);
        assert_eq!(estimate_turning_minutes(40.0, 120.0, 2.0, 0.0, &ctx), 0.0);
    }

    #[test]
    fn test_turning_time_single_pass() {
        let (material, machine) = (material(), machine());
        let ctx = SynthesisContext {
            material: &material,
            machine: &machine,
            targets: QualityTargets::default(),
        };
        // 2 mm diameter, 1 mm doc: one pass at the rpm ceiling
        // 0.1 / (4000 × 0.2 / 1000) = 0.125
        assert_eq!(estimate_turning_minutes(2.0, 0.1, 1.0, 0.2, &ctx), 0.1);
    }

    #[test]
    fn test_sequence_indices_are_contiguous() {
        let plan = plan_for(&shaft(40.0), QualityTargets::new(Some(0.02), None));
        for (i, op) in plan.operations.iter().enumerate() {
            assert_eq!(op.sequence_index, i + 1);
        }
        assert_eq!(plan.operations.first().unwrap().kind, OperationKind::Facing);
        assert_eq!(plan.operations.last().unwrap().kind, OperationKind::Parting);
    }

    #[test]
    fn test_roughing_requires_diameter_above_twenty() {
        assert!(!plan_for(&shaft(20.0), QualityTargets::default()).has(OperationKind::RoughTurning));
        assert!(plan_for(&shaft(20.5), QualityTargets::default()).has(OperationKind::RoughTurning));
    }

    #[test]
    fn test_fine_finish_trigger() {
        assert!(QualityTargets::new(Some(0.03), None).requires_fine_finish());
        assert!(QualityTargets::new(None, Some(1.6)).requires_fine_finish());
        assert!(!QualityTargets::new(Some(0.2), Some(5.0)).requires_fine_finish());
        assert!(!QualityTargets::default().requires_fine_finish());

        let plan = plan_for(&shaft(40.0), QualityTargets::new(Some(0.03), None));
        assert!(plan.has(OperationKind::FineFinish));
        assert!(plan.tools.iter().any(|t| t.name == "Fine Finishing Insert"));
        let finish = plan.operation(OperationKind::FinishTurning).unwrap();
        assert!(finish.description.contains("tolerance ±0.03 mm"));
    }

    #[test]
    fn test_threading_operation_carries_thread_spec() {
        let plan = plan_for(&shaft(40.0), QualityTargets::default());
        let threading = plan.operation(OperationKind::Threading).unwrap();
        assert_eq!(threading.thread_spec.as_deref(), Some("M36 x 4"));
        assert_eq!(threading.feed_rate_mm_per_rev, 4.0);
        assert_eq!(threading.coolant_mode, CoolantMode::Light);
        assert!(threading.spindle_speed_rpm >= MIN_SPINDLE_RPM);
    }

    #[test]
    fn test_select_thread() {
        assert_eq!(select_thread(10.0).0, "M10 x 1.5");
        assert_eq!(select_thread(11.9).0, "M10 x 1.5");
        assert_eq!(select_thread(1.0).0, "M3 x 0.5");
        assert_eq!(select_thread(500.0).0, "M64 x 6");
    }

    #[test]
    fn test_tools_follow_operations() {
        let plan = plan_for(&shaft(40.0), QualityTargets::default());
        let ids: Vec<usize> = plan.tools.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=plan.tools.len()).collect::<Vec<_>>());
        assert_eq!(
            plan.tools.iter().any(|t| t.name == "Threading Insert"),
            plan.has(OperationKind::Threading)
        );
        assert_eq!(
            plan.tools.iter().any(|t| t.name == "Grooving Insert"),
            plan.has(OperationKind::Grooving)
        );
        assert!(!plan.tools.iter().any(|t| t.name == "Fine Finishing Insert"));
    }

    #[test]
    fn test_not_machinable_yields_empty_plan() {
        let plan = plan_for(&GeometryDigest::default(), QualityTargets::default());
        assert!(plan.operations.is_empty());
        assert!(plan.tools.is_empty());
    }
}
