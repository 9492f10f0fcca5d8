//! Core module - digest model and the classification/planning pipeline

pub mod advisory;
pub mod alternatives;
pub mod axis;
pub mod config;
pub mod digest;
pub mod features;
pub mod gate;
pub mod planner;
pub mod profiles;
pub mod synthesis;
pub mod validation;

pub use advisory::{advisory_prompt, attach_advice, Advisor, AdvisoryError};
pub use alternatives::{rank_alternatives, Feasibility, ProcessKind, ProcessOption};
pub use axis::{fit_axis, AxisFit};
pub use config::{Config, ConfigError};
pub use digest::{
    DigestError, DigestFile, DigestVersion, Dimensions, EdgeCounts, GeometryDigest,
    GeometryKernel, SurfaceCounts, SurfaceKind,
};
pub use features::{detect_features, Confidence, FeatureDetection, FeatureFinding};
pub use gate::{assess, CheckName, GateConfig, TurnabilityAssessment, TurningScope};
pub use planner::{plan, PartDimensions, PlanOutcome, PlanRequest, Planner};
pub use profiles::{MachineProfile, MaterialProfile, ProfileCatalog};
pub use synthesis::{
    synthesize, CoolantMode, Operation, OperationKind, ProcessPlan, QualityTargets,
    ToolRequirement,
};
pub use validation::{validate, ValidationLevel, ValidationMessage, ValidationReport};
