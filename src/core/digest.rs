//! Geometry digest - normalized snapshot of a part's geometry
//!
//! The digest is the only input the classification pipeline needs. It is
//! produced once per analysis by a [`GeometryKernel`] and never refers back
//! into kernel state, so a slow geometry read never shares a lock with
//! classification.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::yaml::{parse_yaml_file, YamlError};

/// Smallest extent used for any bounding dimension (mm)
pub const DIMENSION_FLOOR_MM: f64 = 0.1;

/// Surface kinds reported by the geometry kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Plane,
    Cylinder,
    Cone,
    Sphere,
    Torus,
    Bezier,
    Bspline,
    Other,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 8] = [
        SurfaceKind::Plane,
        SurfaceKind::Cylinder,
        SurfaceKind::Cone,
        SurfaceKind::Sphere,
        SurfaceKind::Torus,
        SurfaceKind::Bezier,
        SurfaceKind::Bspline,
        SurfaceKind::Other,
    ];

    /// Surfaces of revolution: a lathe can generate them about a single axis
    pub fn is_rotational(self) -> bool {
        matches!(
            self,
            SurfaceKind::Cylinder | SurfaceKind::Cone | SurfaceKind::Sphere | SurfaceKind::Torus
        )
    }

    /// Free-form surfaces (bezier, bspline, unclassified)
    pub fn is_complex(self) -> bool {
        matches!(
            self,
            SurfaceKind::Bezier | SurfaceKind::Bspline | SurfaceKind::Other
        )
    }
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceKind::Plane => write!(f, "plane"),
            SurfaceKind::Cylinder => write!(f, "cylinder"),
            SurfaceKind::Cone => write!(f, "cone"),
            SurfaceKind::Sphere => write!(f, "sphere"),
            SurfaceKind::Torus => write!(f, "torus"),
            SurfaceKind::Bezier => write!(f, "bezier"),
            SurfaceKind::Bspline => write!(f, "bspline"),
            SurfaceKind::Other => write!(f, "other"),
        }
    }
}

/// Face counts per surface kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceCounts {
    pub plane: u32,
    pub cylinder: u32,
    pub cone: u32,
    pub sphere: u32,
    pub torus: u32,
    #[serde(alias = "bezier_surface")]
    pub bezier: u32,
    #[serde(alias = "bspline_surface")]
    pub bspline: u32,
    pub other: u32,
}

impl SurfaceCounts {
    /// Count for a single surface kind
    pub fn get(&self, kind: SurfaceKind) -> u32 {
        match kind {
            SurfaceKind::Plane => self.plane,
            SurfaceKind::Cylinder => self.cylinder,
            SurfaceKind::Cone => self.cone,
            SurfaceKind::Sphere => self.sphere,
            SurfaceKind::Torus => self.torus,
            SurfaceKind::Bezier => self.bezier,
            SurfaceKind::Bspline => self.bspline,
            SurfaceKind::Other => self.other,
        }
    }

    pub fn total(&self) -> u32 {
        SurfaceKind::ALL.iter().map(|k| self.get(*k)).sum()
    }

    pub fn rotational(&self) -> u32 {
        SurfaceKind::ALL
            .iter()
            .filter(|k| k.is_rotational())
            .map(|k| self.get(*k))
            .sum()
    }

    /// Faces that are not surfaces of revolution (planes included)
    pub fn non_rotational(&self) -> u32 {
        self.total() - self.rotational()
    }

    pub fn complex(&self) -> u32 {
        SurfaceKind::ALL
            .iter()
            .filter(|k| k.is_complex())
            .map(|k| self.get(*k))
            .sum()
    }

    /// Number of distinct surface kinds with at least one face
    pub fn distinct_kinds(&self) -> usize {
        SurfaceKind::ALL.iter().filter(|k| self.get(**k) > 0).count()
    }
}

/// Edge counts per curve kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeCounts {
    pub line: u32,
    pub circle: u32,
    pub other: u32,
}

impl EdgeCounts {
    pub fn total(&self) -> u32 {
        self.line + self.circle + self.other
    }
}

/// Bounding box extents and enclosed volume
///
/// Raw values may be zero or negative when the kernel returns a degenerate
/// box; use the accessor methods, which clamp to [`DIMENSION_FLOOR_MM`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    #[serde(alias = "x_size")]
    pub x: f64,
    #[serde(alias = "y_size")]
    pub y: f64,
    #[serde(alias = "z_size")]
    pub z: f64,
    pub volume: f64,
}

fn floored(value: f64) -> f64 {
    if value.is_finite() {
        value.max(DIMENSION_FLOOR_MM)
    } else {
        DIMENSION_FLOOR_MM
    }
}

impl Dimensions {
    /// Turning diameter: the larger of the two radial extents
    pub fn diameter(&self) -> f64 {
        floored(self.x).max(floored(self.y))
    }

    /// Turning length along the spindle axis (z extent)
    pub fn length(&self) -> f64 {
        floored(self.z)
    }

    pub fn volume(&self) -> f64 {
        if self.volume.is_finite() {
            self.volume.max(0.0)
        } else {
            0.0
        }
    }

    /// Length over radial size
    pub fn aspect_ratio(&self) -> f64 {
        self.length() / self.diameter()
    }
}

/// Digest format version
///
/// Legacy digests predate axis-cue capture; the turnability gate cannot
/// grant strict turnability for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestVersion {
    Legacy,
    #[default]
    AxisAware,
}

impl DigestVersion {
    pub fn has_axis_cues(self) -> bool {
        matches!(self, DigestVersion::AxisAware)
    }
}

impl std::fmt::Display for DigestVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestVersion::Legacy => write!(f, "legacy"),
            DigestVersion::AxisAware => write!(f, "axis_aware"),
        }
    }
}

/// Normalized snapshot of a solid part's geometry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryDigest {
    /// Format version of this digest
    pub version: DigestVersion,

    /// Source part name or file, for display only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,

    #[serde(alias = "surface_types")]
    pub surface_counts: SurfaceCounts,

    #[serde(alias = "edge_types")]
    pub edge_counts: EdgeCounts,

    pub dimensions: Dimensions,

    /// One direction per cylindrical/conical face and per circular edge
    pub axis_cues: Vec<[f64; 3]>,

    /// Cylindrical faces usable for boring decisions
    #[serde(alias = "cylindrical_faces")]
    pub cylindrical_face_count: u32,
}

impl GeometryDigest {
    /// Axis cues as unit vectors; zero-length and non-finite cues are dropped
    pub fn unit_cues(&self) -> Vec<Vector3<f64>> {
        self.axis_cues
            .iter()
            .map(|c| Vector3::new(c[0], c[1], c[2]))
            .filter(|v| v.iter().all(|x| x.is_finite()))
            .filter_map(|v| v.try_normalize(1e-12))
            .collect()
    }

    /// Total faces
    pub fn face_count(&self) -> u32 {
        self.surface_counts.total()
    }

    /// Total edges
    pub fn edge_count(&self) -> u32 {
        self.edge_counts.total()
    }

    /// Ratio of `count` over total faces, 0 when the digest has no faces
    pub fn face_ratio(&self, count: u32) -> f64 {
        ratio(count, self.face_count())
    }

    /// Ratio of `count` over total edges, 0 when the digest has no edges
    pub fn edge_ratio(&self, count: u32) -> f64 {
        ratio(count, self.edge_count())
    }

    /// Edges per face (faces floored to 1)
    pub fn edge_face_ratio(&self) -> f64 {
        self.edge_count() as f64 / self.face_count().max(1) as f64
    }
}

fn ratio(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Errors produced while obtaining a digest
#[derive(Debug, Error, Diagnostic)]
pub enum DigestError {
    #[error("Failed to read digest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON digest {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Geometry kernel error: {0}")]
    Kernel(String),
}

/// A geometry kernel that can summarize a shape into a digest
///
/// Implementations own whatever kernel handle they need; callers create and
/// pass the handle explicitly instead of relying on process-wide state.
pub trait GeometryKernel {
    /// Shape representation understood by this kernel
    type Shape: ?Sized;

    fn digest(&self, shape: &Self::Shape) -> Result<GeometryDigest, DigestError>;
}

/// Reads precomputed digests from YAML or JSON files
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestFile;

impl DigestFile {
    /// Whether a path looks like a digest file this reader accepts
    pub fn is_digest_path(path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        name.ends_with(".digest.yaml") || name.ends_with(".digest.yml") || name.ends_with(".digest.json")
    }
}

impl GeometryKernel for DigestFile {
    type Shape = Path;

    fn digest(&self, path: &Path) -> Result<GeometryDigest, DigestError> {
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let mut digest: GeometryDigest = if is_json {
            let content = std::fs::read_to_string(path).map_err(|source| DigestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| DigestError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            parse_yaml_file(path).map_err(|e| match e {
                YamlError::Io { path, source } => DigestError::Io { path, source },
                other => DigestError::Yaml(other),
            })?
        };

        if digest.part.is_none() {
            digest.part = path.file_name().map(|n| {
                n.to_string_lossy()
                    .trim_end_matches(".json")
                    .trim_end_matches(".yaml")
                    .trim_end_matches(".yml")
                    .trim_end_matches(".digest")
                    .to_string()
            });
        }

        Ok(digest)
    }
}
