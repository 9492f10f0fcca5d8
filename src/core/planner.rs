//! Classify-and-plan entry point
//!
//! Runs the whole pipeline for one digest:
//! axis fit → turnability gate → feature detection → synthesis → validation.
//! Every stage is a pure function of its inputs, so independent digests can be
//! planned concurrently without coordination.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::core::alternatives::{rank_alternatives, ProcessKind, ProcessOption};
use crate::core::axis::{fit_axis, AxisFit};
use crate::core::config::Config;
use crate::core::digest::GeometryDigest;
use crate::core::features::{detect_features, FeatureDetection};
use crate::core::gate::{assess, CheckName, GateConfig, TurnabilityAssessment, TurningScope};
use crate::core::profiles::{MachineProfile, MaterialProfile, ProfileCatalog};
use crate::core::synthesis::{synthesize, ProcessPlan, QualityTargets, SynthesisContext};
use crate::core::validation::{validate, ValidationInput, ValidationReport};

/// Caller choices for one planning run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Material profile name (default profile when absent or unknown)
    pub material: Option<String>,
    /// Machine profile name (default profile when absent or unknown)
    pub machine: Option<String>,
    #[serde(default)]
    pub targets: QualityTargets,
}

/// Floored part dimensions used by planning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartDimensions {
    pub diameter: f64,
    pub length: f64,
    pub volume: f64,
}

/// Everything a presentation or persistence layer needs about one part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
    pub scope: TurningScope,
    pub score: u8,
    pub material: MaterialProfile,
    pub machine: MachineProfile,
    pub targets: QualityTargets,
    pub dimensions: PartDimensions,
    pub cylindrical_faces: u32,
    pub axis_fit: AxisFit,
    pub assessment: TurnabilityAssessment,
    pub feature_detection: FeatureDetection,
    #[serde(flatten)]
    pub plan: ProcessPlan,
    pub total_minutes: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_process: Option<ProcessKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_processes: Vec<ProcessOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub turning_limitations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    /// Hex SHA-256 of the digest, profile names and targets
    pub fingerprint: String,
}

impl PlanOutcome {
    pub fn is_machinable(&self) -> bool {
        self.assessment.is_machinable
    }
}

/// Description of what a failing check means for turning
fn limitation(check: CheckName) -> &'static str {
    match check {
        CheckName::Axisymmetric => "Axis cues do not agree on a single rotational axis",
        CheckName::TurnableMajority => {
            "Too few faces and edges are aligned with the turning axis"
        }
        CheckName::SmallAsymmetryOk => {
            "Significant non-rotational geometry (flats, pockets, cross holes) needs secondary operations"
        }
        CheckName::CylindricalDominance => "Cylindrical and conical faces do not dominate the part",
        CheckName::CircularEdgeSupport => "Too few circular edges to support a turned profile",
        CheckName::LimitedComplexity => "Free-form surfaces dominate and cannot be turned",
        CheckName::ReasonableAspectRatio => {
            "Length to diameter ratio is outside the range a lathe can hold"
        }
    }
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    digest: &'a GeometryDigest,
    material: &'a str,
    machine: &'a str,
    targets: &'a QualityTargets,
}

/// Stable fingerprint of the inputs of a planning run
pub fn fingerprint(digest: &GeometryDigest, material: &str, machine: &str, targets: &QualityTargets) -> String {
    let input = FingerprintInput {
        digest,
        material,
        machine,
        targets,
    };
    let bytes = serde_json::to_vec(&input).unwrap_or_default();
    format!("{:x}", Sha256::digest(&bytes))
}

/// Turning planner configured with profiles and gate thresholds
#[derive(Debug, Clone, Default)]
pub struct Planner {
    catalog: ProfileCatalog,
    gate: GateConfig,
}

impl Planner {
    pub fn new(catalog: ProfileCatalog, gate: GateConfig) -> Self {
        Self { catalog, gate }
    }

    /// Build a planner from layered configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.catalog(), config.gate.clone())
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn gate_config(&self) -> &GateConfig {
        &self.gate
    }

    /// Axis fit, gate and feature detection without synthesis
    pub fn classify(&self, digest: &GeometryDigest) -> (AxisFit, TurnabilityAssessment, FeatureDetection) {
        let fit = fit_axis(&digest.unit_cues());
        debug!(
            cues = fit.cue_count,
            strict = fit.aligned_ratio_strict,
            relaxed = fit.aligned_ratio_relaxed,
            misalignment = fit.mean_misalignment_degrees,
            "axis fit"
        );

        let assessment = assess(digest, &fit, &self.gate);
        debug!(
            score = assessment.score,
            scope = %assessment.scope,
            failing = ?assessment.failing_checks,
            "turnability gate"
        );

        let detection = detect_features(digest);
        debug!(
            threading = %detection.threading.confidence,
            grooving = %detection.grooving.confidence,
            "feature detection"
        );

        (fit, assessment, detection)
    }

    /// Classify a digest and, when it is turnable, plan and validate it
    pub fn plan(&self, digest: &GeometryDigest, request: &PlanRequest) -> PlanOutcome {
        let mut notes = Vec::new();

        let material = self.catalog.material(request.material.as_deref());
        if let Some(requested) = &material.fallback_from {
            warn!(requested = %requested, using = %material.profile.name, "unknown material profile");
            notes.push(format!(
                "Unknown material '{}'; using {}",
                requested, material.profile.name
            ));
        }
        let machine = self.catalog.machine(request.machine.as_deref());
        if let Some(requested) = &machine.fallback_from {
            warn!(requested = %requested, using = %machine.profile.name, "unknown machine profile");
            notes.push(format!(
                "Unknown machine '{}'; using {}",
                requested, machine.profile.name
            ));
        }
        let (material, machine) = (material.profile, machine.profile);

        let (axis_fit, assessment, feature_detection) = self.classify(digest);

        let ctx = SynthesisContext {
            material: &material,
            machine: &machine,
            targets: request.targets,
        };
        let plan = synthesize(digest, &assessment, &feature_detection, &ctx);

        let validation = assessment.is_machinable.then(|| {
            validate(&ValidationInput {
                digest,
                detection: &feature_detection,
                plan: &plan,
                machine: &machine,
                material: &material,
                targets: request.targets,
            })
        });

        let alternative_processes = match assessment.scope {
            TurningScope::Full => Vec::new(),
            TurningScope::Partial | TurningScope::None => rank_alternatives(digest),
        };
        let recommended_process = alternative_processes.first().map(|o| o.process);

        if let (TurningScope::Partial, Some(best)) = (assessment.scope, recommended_process) {
            notes.push(format!(
                "Partial turning plan: non-turnable features are excluded; machine them by {}",
                best
            ));
        }

        let turning_limitations = assessment
            .failing_checks
            .iter()
            .map(|c| limitation(*c).to_string())
            .collect();

        let fp = fingerprint(digest, &material.name, &machine.name, &request.targets);
        let total_minutes = plan.total_minutes();

        info!(
            part = digest.part.as_deref().unwrap_or("-"),
            scope = %assessment.scope,
            score = assessment.score,
            operations = plan.operations.len(),
            validation = ?validation.as_ref().map(|v| v.worst_level),
            "plan complete"
        );

        PlanOutcome {
            part: digest.part.clone(),
            scope: assessment.scope,
            score: assessment.score,
            material,
            machine,
            targets: request.targets,
            dimensions: PartDimensions {
                diameter: digest.dimensions.diameter(),
                length: digest.dimensions.length(),
                volume: digest.dimensions.volume(),
            },
            cylindrical_faces: digest.cylindrical_face_count,
            axis_fit,
            assessment,
            feature_detection,
            plan,
            total_minutes,
            validation,
            recommended_process,
            alternative_processes,
            turning_limitations,
            notes,
            advice: None,
            fingerprint: fp,
        }
    }
}

/// Classify and plan with built-in profiles and default thresholds
pub fn plan(digest: &GeometryDigest, request: &PlanRequest) -> PlanOutcome {
    Planner::default().plan(digest, request)
}
