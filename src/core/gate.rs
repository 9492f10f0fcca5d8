//! Turnability gate - multi-criteria lathe suitability decision
//!
//! Seven independent geometric checks are evaluated from a single decision
//! table. Each check contributes a signed score delta; the sum is shifted by a
//! base score and clamped to 0..=100. Strict turnability needs every check to
//! pass plus a minimum score, partial turnability a lower score and a subset
//! of the checks.
//!
//! All thresholds and deltas live in [`GateConfig`] so they can be tuned from
//! configuration without touching the evaluation loop.

use serde::{Deserialize, Serialize};

use crate::core::axis::{AxisFit, RELAXED_TOLERANCE_DEG, STRICT_TOLERANCE_DEG};
use crate::core::digest::GeometryDigest;

/// Names of the seven gate checks, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    Axisymmetric,
    TurnableMajority,
    SmallAsymmetryOk,
    CylindricalDominance,
    CircularEdgeSupport,
    LimitedComplexity,
    ReasonableAspectRatio,
}

impl std::fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckName::Axisymmetric => write!(f, "axisymmetric"),
            CheckName::TurnableMajority => write!(f, "turnable_majority"),
            CheckName::SmallAsymmetryOk => write!(f, "small_asymmetry_ok"),
            CheckName::CylindricalDominance => write!(f, "cylindrical_dominance"),
            CheckName::CircularEdgeSupport => write!(f, "circular_edge_support"),
            CheckName::LimitedComplexity => write!(f, "limited_complexity"),
            CheckName::ReasonableAspectRatio => write!(f, "reasonable_aspect_ratio"),
        }
    }
}

/// Score contribution of a check: added when it passes, subtracted when not
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub pass: i32,
    pub fail: i32,
}

impl ScoreDelta {
    pub const fn new(pass: i32, fail: i32) -> Self {
        Self { pass, fail }
    }

    fn apply(&self, passed: bool) -> i32 {
        if passed {
            self.pass
        } else {
            -self.fail
        }
    }
}

/// Per-check score deltas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateDeltas {
    pub axisymmetric: ScoreDelta,
    pub turnable_majority: ScoreDelta,
    pub small_asymmetry_ok: ScoreDelta,
    pub cylindrical_dominance: ScoreDelta,
    pub circular_edge_support: ScoreDelta,
    pub limited_complexity: ScoreDelta,
    pub reasonable_aspect_ratio: ScoreDelta,
}

impl Default for GateDeltas {
    fn default() -> Self {
        Self {
            axisymmetric: ScoreDelta::new(22, 18),
            turnable_majority: ScoreDelta::new(18, 14),
            small_asymmetry_ok: ScoreDelta::new(8, 10),
            cylindrical_dominance: ScoreDelta::new(14, 16),
            circular_edge_support: ScoreDelta::new(10, 8),
            limited_complexity: ScoreDelta::new(8, 20),
            reasonable_aspect_ratio: ScoreDelta::new(8, 8),
        }
    }
}

impl GateDeltas {
    pub fn get(&self, name: CheckName) -> ScoreDelta {
        match name {
            CheckName::Axisymmetric => self.axisymmetric,
            CheckName::TurnableMajority => self.turnable_majority,
            CheckName::SmallAsymmetryOk => self.small_asymmetry_ok,
            CheckName::CylindricalDominance => self.cylindrical_dominance,
            CheckName::CircularEdgeSupport => self.circular_edge_support,
            CheckName::LimitedComplexity => self.limited_complexity,
            CheckName::ReasonableAspectRatio => self.reasonable_aspect_ratio,
        }
    }
}

/// Tunable thresholds of the turnability gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// axisymmetric: minimum strict-aligned ratio
    pub axis_strict_min: f64,

    /// turnable_majority: minimum relaxed-aligned ratio
    pub majority_relaxed_min: f64,
    /// turnable_majority: minimum rotational-face or circular-edge ratio
    pub majority_feature_ratio_min: f64,
    /// turnable_majority: minimum sum of the two ratios above
    pub majority_feature_sum_min: f64,
    /// turnable_majority: maximum non-rotational face ratio
    pub majority_non_rotational_max: f64,

    /// small_asymmetry_ok: maximum non-rotational face count
    pub asymmetry_max_faces: u32,
    /// small_asymmetry_ok: maximum non-rotational face ratio
    pub asymmetry_max_ratio: f64,
    /// small_asymmetry_ok: strict-aligned ratio that excuses asymmetry
    pub asymmetry_strict_override: f64,
    /// small_asymmetry_ok: circular-edge ratio that excuses asymmetry
    pub asymmetry_circular_override: f64,

    /// cylindrical_dominance: minimum cylinder+cone count
    pub dominance_min_faces: u32,
    /// cylindrical_dominance: minimum rotational face ratio
    pub dominance_min_ratio: f64,

    /// circular_edge_support: minimum circular edge ratio
    pub circular_min_ratio: f64,
    /// circular_edge_support: minimum circular edge count
    pub circular_min_edges: u32,

    /// limited_complexity: complex face count above which complexity matters
    pub complexity_max_faces: u32,
    /// limited_complexity: complex face ratio above which complexity matters
    pub complexity_max_ratio: f64,

    /// reasonable_aspect_ratio: accepted length/diameter range
    pub aspect_min: f64,
    pub aspect_max: f64,

    /// Score added to the sum of deltas before clamping
    pub base_score: i32,
    /// Minimum score for strict turnability
    pub strict_min_score: u8,
    /// Minimum score for partial turnability
    pub partial_min_score: u8,
    /// Minimum score for partial turnability when the checks are untrusted
    pub fallback_min_score: u8,

    pub deltas: GateDeltas,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            axis_strict_min: 0.60,
            majority_relaxed_min: 0.72,
            majority_feature_ratio_min: 0.18,
            majority_feature_sum_min: 0.36,
            majority_non_rotational_max: 0.85,
            asymmetry_max_faces: 12,
            asymmetry_max_ratio: 0.45,
            asymmetry_strict_override: 0.70,
            asymmetry_circular_override: 0.20,
            dominance_min_faces: 4,
            dominance_min_ratio: 0.12,
            circular_min_ratio: 0.04,
            circular_min_edges: 6,
            complexity_max_faces: 40,
            complexity_max_ratio: 0.75,
            aspect_min: 0.2,
            aspect_max: 12.0,
            base_score: 30,
            strict_min_score: 66,
            partial_min_score: 40,
            fallback_min_score: 45,
            deltas: GateDeltas::default(),
        }
    }
}

/// Geometric quantities the checks are evaluated against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateMetrics {
    pub axis_available: bool,
    pub aligned_ratio_strict: f64,
    pub aligned_ratio_relaxed: f64,
    pub rotational_face_ratio: f64,
    pub circular_edge_ratio: f64,
    pub circular_edges: u32,
    pub non_rotational_faces: u32,
    pub non_rotational_ratio: f64,
    pub cylinder_cone_faces: u32,
    pub complex_faces: u32,
    pub complex_ratio: f64,
    pub aspect_ratio: f64,
}

impl GateMetrics {
    pub fn from_digest(digest: &GeometryDigest, fit: &AxisFit) -> Self {
        let surfaces = &digest.surface_counts;
        Self {
            axis_available: fit.available,
            aligned_ratio_strict: fit.aligned_ratio_strict,
            aligned_ratio_relaxed: fit.aligned_ratio_relaxed,
            rotational_face_ratio: digest.face_ratio(surfaces.rotational()),
            circular_edge_ratio: digest.edge_ratio(digest.edge_counts.circle),
            circular_edges: digest.edge_counts.circle,
            non_rotational_faces: surfaces.non_rotational(),
            non_rotational_ratio: digest.face_ratio(surfaces.non_rotational()),
            cylinder_cone_faces: surfaces.cylinder + surfaces.cone,
            complex_faces: surfaces.complex(),
            complex_ratio: digest.face_ratio(surfaces.complex()),
            aspect_ratio: digest.dimensions.aspect_ratio(),
        }
    }
}

/// Outcome of a single check
struct CheckOutcome {
    passed: bool,
    reason: String,
}

/// One row of the gate decision table
struct GateRule {
    name: CheckName,
    evaluate: fn(&GateMetrics, &GateConfig) -> CheckOutcome,
}

fn pct(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

fn check_axisymmetric(m: &GateMetrics, c: &GateConfig) -> CheckOutcome {
    if !m.axis_available {
        return CheckOutcome {
            passed: false,
            reason: "No axis cues available; rotational axis cannot be established".to_string(),
        };
    }
    let passed = m.aligned_ratio_strict >= c.axis_strict_min;
    CheckOutcome {
        passed,
        reason: format!(
            "{} of axis cues within {:.0}° of the best-fit axis (need ≥ {})",
            pct(m.aligned_ratio_strict),
            STRICT_TOLERANCE_DEG,
            pct(c.axis_strict_min)
        ),
    }
}

fn check_turnable_majority(m: &GateMetrics, c: &GateConfig) -> CheckOutcome {
    let feature_support = m.rotational_face_ratio >= c.majority_feature_ratio_min
        || m.circular_edge_ratio >= c.majority_feature_ratio_min
        || m.rotational_face_ratio + m.circular_edge_ratio >= c.majority_feature_sum_min;
    let passed = m.aligned_ratio_relaxed >= c.majority_relaxed_min
        && feature_support
        && m.non_rotational_ratio <= c.majority_non_rotational_max;
    CheckOutcome {
        passed,
        reason: format!(
            "{} of cues within {:.0}°, rotational faces {}, circular edges {}, non-rotational faces {}",
            pct(m.aligned_ratio_relaxed),
            RELAXED_TOLERANCE_DEG,
            pct(m.rotational_face_ratio),
            pct(m.circular_edge_ratio),
            pct(m.non_rotational_ratio)
        ),
    }
}

fn check_small_asymmetry(m: &GateMetrics, c: &GateConfig) -> CheckOutcome {
    let passed = m.non_rotational_faces <= c.asymmetry_max_faces
        || m.non_rotational_ratio <= c.asymmetry_max_ratio
        || (m.aligned_ratio_strict >= c.asymmetry_strict_override
            && m.circular_edge_ratio >= c.asymmetry_circular_override);
    CheckOutcome {
        passed,
        reason: format!(
            "{} non-rotational faces ({}); limit {} faces or {}",
            m.non_rotational_faces,
            pct(m.non_rotational_ratio),
            c.asymmetry_max_faces,
            pct(c.asymmetry_max_ratio)
        ),
    }
}

fn check_cylindrical_dominance(m: &GateMetrics, c: &GateConfig) -> CheckOutcome {
    let passed = m.cylinder_cone_faces >= c.dominance_min_faces
        || m.rotational_face_ratio >= c.dominance_min_ratio;
    CheckOutcome {
        passed,
        reason: format!(
            "{} cylindrical/conical faces, rotational face ratio {}",
            m.cylinder_cone_faces,
            pct(m.rotational_face_ratio)
        ),
    }
}

fn check_circular_edges(m: &GateMetrics, c: &GateConfig) -> CheckOutcome {
    let passed =
        m.circular_edge_ratio >= c.circular_min_ratio || m.circular_edges >= c.circular_min_edges;
    CheckOutcome {
        passed,
        reason: format!(
            "{} circular edges ({} of all edges)",
            m.circular_edges,
            pct(m.circular_edge_ratio)
        ),
    }
}

fn check_limited_complexity(m: &GateMetrics, c: &GateConfig) -> CheckOutcome {
    let passed =
        !(m.complex_faces > c.complexity_max_faces && m.complex_ratio > c.complexity_max_ratio);
    CheckOutcome {
        passed,
        reason: format!(
            "{} free-form faces ({} of all faces)",
            m.complex_faces,
            pct(m.complex_ratio)
        ),
    }
}

fn check_aspect_ratio(m: &GateMetrics, c: &GateConfig) -> CheckOutcome {
    let passed = (c.aspect_min..=c.aspect_max).contains(&m.aspect_ratio);
    CheckOutcome {
        passed,
        reason: format!(
            "Length to diameter ratio {:.2}:1 (accepted {}..{})",
            m.aspect_ratio, c.aspect_min, c.aspect_max
        ),
    }
}

/// The decision table, in evaluation order
static GATE_RULES: [GateRule; 7] = [
    GateRule {
        name: CheckName::Axisymmetric,
        evaluate: check_axisymmetric,
    },
    GateRule {
        name: CheckName::TurnableMajority,
        evaluate: check_turnable_majority,
    },
    GateRule {
        name: CheckName::SmallAsymmetryOk,
        evaluate: check_small_asymmetry,
    },
    GateRule {
        name: CheckName::CylindricalDominance,
        evaluate: check_cylindrical_dominance,
    },
    GateRule {
        name: CheckName::CircularEdgeSupport,
        evaluate: check_circular_edges,
    },
    GateRule {
        name: CheckName::LimitedComplexity,
        evaluate: check_limited_complexity,
    },
    GateRule {
        name: CheckName::ReasonableAspectRatio,
        evaluate: check_aspect_ratio,
    },
];

/// Boolean outcome of each gate check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnabilityChecks {
    pub axisymmetric: bool,
    pub turnable_majority: bool,
    pub small_asymmetry_ok: bool,
    pub cylindrical_dominance: bool,
    pub circular_edge_support: bool,
    pub limited_complexity: bool,
    pub reasonable_aspect_ratio: bool,
}

impl TurnabilityChecks {
    pub fn get(&self, name: CheckName) -> bool {
        match name {
            CheckName::Axisymmetric => self.axisymmetric,
            CheckName::TurnableMajority => self.turnable_majority,
            CheckName::SmallAsymmetryOk => self.small_asymmetry_ok,
            CheckName::CylindricalDominance => self.cylindrical_dominance,
            CheckName::CircularEdgeSupport => self.circular_edge_support,
            CheckName::LimitedComplexity => self.limited_complexity,
            CheckName::ReasonableAspectRatio => self.reasonable_aspect_ratio,
        }
    }

    fn set(&mut self, name: CheckName, value: bool) {
        let slot = match name {
            CheckName::Axisymmetric => &mut self.axisymmetric,
            CheckName::TurnableMajority => &mut self.turnable_majority,
            CheckName::SmallAsymmetryOk => &mut self.small_asymmetry_ok,
            CheckName::CylindricalDominance => &mut self.cylindrical_dominance,
            CheckName::CircularEdgeSupport => &mut self.circular_edge_support,
            CheckName::LimitedComplexity => &mut self.limited_complexity,
            CheckName::ReasonableAspectRatio => &mut self.reasonable_aspect_ratio,
        };
        *slot = value;
    }

    pub fn all_passed(&self) -> bool {
        GATE_RULES.iter().all(|rule| self.get(rule.name))
    }

    /// Each check with its outcome, in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (CheckName, bool)> + '_ {
        GATE_RULES.iter().map(move |rule| (rule.name, self.get(rule.name)))
    }

    /// Names of the failing checks, in evaluation order
    pub fn failing(&self) -> Vec<CheckName> {
        GATE_RULES
            .iter()
            .map(|rule| rule.name)
            .filter(|name| !self.get(*name))
            .collect()
    }
}

/// Lathe suitability tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurningScope {
    /// Strictly turnable: full-part turning plan
    Full,
    /// Partially turnable: plan covers the turnable operations only
    Partial,
    /// Not suitable for turning
    None,
}

impl std::fmt::Display for TurningScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurningScope::Full => write!(f, "full"),
            TurningScope::Partial => write!(f, "partial"),
            TurningScope::None => write!(f, "none"),
        }
    }
}

/// Result of the turnability gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnabilityAssessment {
    pub score: u8,
    pub checks: TurnabilityChecks,
    /// False when the digest cannot support every check (legacy format)
    pub checks_trusted: bool,
    pub strict_turnable: bool,
    pub partial_turnable: bool,
    pub is_machinable: bool,
    pub scope: TurningScope,
    pub failing_checks: Vec<CheckName>,
    pub reasons: Vec<String>,
    pub metrics: GateMetrics,
}

/// Evaluate the turnability gate
pub fn assess(digest: &GeometryDigest, fit: &AxisFit, config: &GateConfig) -> TurnabilityAssessment {
    let metrics = GateMetrics::from_digest(digest, fit);
    let checks_trusted = digest.version.has_axis_cues();

    let mut checks = TurnabilityChecks::default();
    let mut reasons = Vec::with_capacity(GATE_RULES.len() + 2);
    let mut raw_score = config.base_score;

    for rule in &GATE_RULES {
        let outcome = (rule.evaluate)(&metrics, config);
        checks.set(rule.name, outcome.passed);
        raw_score += config.deltas.get(rule.name).apply(outcome.passed);
        let mark = if outcome.passed { "pass" } else { "fail" };
        reasons.push(format!("[{}] {}: {}", mark, rule.name, outcome.reason));
    }

    let score = raw_score.clamp(0, 100) as u8;

    let strict_turnable = checks_trusted && checks.all_passed() && score >= config.strict_min_score;
    let partial_turnable = !strict_turnable
        && if checks_trusted {
            score >= config.partial_min_score
                && checks.cylindrical_dominance
                && (checks.circular_edge_support || checks.reasonable_aspect_ratio)
        } else {
            score >= config.fallback_min_score
        };
    let is_machinable = strict_turnable || partial_turnable;

    let scope = if strict_turnable {
        TurningScope::Full
    } else if partial_turnable {
        TurningScope::Partial
    } else {
        TurningScope::None
    };

    let failing_checks = checks.failing();

    if !checks_trusted {
        reasons.push(format!(
            "Legacy digest without axis cues: strict turnability unavailable, partial requires score ≥ {}",
            config.fallback_min_score
        ));
    }

    let failing_list = || {
        failing_checks
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    reasons.push(match scope {
        TurningScope::Full => format!("Turning gate passed: all checks satisfied, score {}/100", score),
        TurningScope::Partial => format!(
            "Turning gate passed partially (score {}/100); failing checks: {}",
            score,
            failing_list()
        ),
        TurningScope::None if failing_checks.is_empty() => format!(
            "Turning gate failed: score {}/100 below threshold",
            score
        ),
        TurningScope::None => format!(
            "Turning gate failed (score {}/100); failing checks: {}",
            score,
            failing_list()
        ),
    });

    TurnabilityAssessment {
        score,
        checks,
        checks_trusted,
        strict_turnable,
        partial_turnable,
        is_machinable,
        scope,
        failing_checks,
        reasons,
        metrics,
    }
}
