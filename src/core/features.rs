//! Threading and grooving detection from surface and edge statistics
//!
//! Detection is independent of the turnability gate. Each feature collects
//! integer evidence points; 3 or more is high confidence, exactly 2 is medium,
//! anything less is not detected.

use serde::{Deserialize, Serialize};

use crate::core::digest::GeometryDigest;

/// Maximum reasons retained per feature
pub const MAX_REASONS: usize = 3;

/// Detection confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    fn from_score(score: u32) -> Self {
        match score {
            s if s >= 3 => Confidence::High,
            2 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Detection result for one feature type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFinding {
    pub detected: bool,
    pub confidence: Confidence,
    pub score: u32,
    pub reasons: Vec<String>,
}

/// Geometry metrics used by detection, exposed for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMetrics {
    pub edge_face_ratio: f64,
    pub cylinder_surfaces: u32,
    pub cone_surfaces: u32,
    pub torus_surfaces: u32,
    pub slenderness: f64,
}

/// Threading and grooving detection for a digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDetection {
    pub threading: FeatureFinding,
    pub grooving: FeatureFinding,
    pub metrics: FeatureMetrics,
}

/// Accumulates evidence points and reasons for one feature
struct Evidence {
    score: u32,
    reasons: Vec<String>,
}

impl Evidence {
    fn new() -> Self {
        Self {
            score: 0,
            reasons: Vec::new(),
        }
    }

    fn add(&mut self, condition: bool, points: u32, reason: impl FnOnce() -> String) {
        if condition {
            self.score += points;
            if self.reasons.len() < MAX_REASONS {
                self.reasons.push(reason());
            }
        }
    }

    fn finish(mut self, feature: &str) -> FeatureFinding {
        let confidence = Confidence::from_score(self.score);
        let detected = confidence != Confidence::Low;
        if !detected {
            self.reasons = vec![format!("No strong {} evidence in surface/edge statistics", feature)];
        }
        FeatureFinding {
            detected,
            confidence,
            score: self.score,
            reasons: self.reasons,
        }
    }
}

/// Infer threading and grooving operations from a digest
pub fn detect_features(digest: &GeometryDigest) -> FeatureDetection {
    let s = &digest.surface_counts;
    let metrics = FeatureMetrics {
        edge_face_ratio: digest.edge_face_ratio(),
        cylinder_surfaces: s.cylinder,
        cone_surfaces: s.cone,
        torus_surfaces: s.torus,
        slenderness: digest.dimensions.aspect_ratio(),
    };

    let mut threading = Evidence::new();
    threading.add(s.cone > 0 && s.cylinder >= 2, 2, || {
        format!(
            "{} conical faces next to {} cylinders (thread chamfer/runout pattern)",
            s.cone, s.cylinder
        )
    });
    threading.add(metrics.edge_face_ratio >= 2.8 && s.cylinder >= 3, 1, || {
        format!(
            "High edge density ({:.2} edges per face) on a cylindrical body",
            metrics.edge_face_ratio
        )
    });
    threading.add(metrics.slenderness >= 1.2, 1, || {
        format!("Slender part (L/D {:.2}) typical of threaded shafts", metrics.slenderness)
    });

    let mut grooving = Evidence::new();
    grooving.add(s.torus > 0, 2, || {
        format!("{} toroidal faces (groove fillets)", s.torus)
    });
    grooving.add(
        s.cylinder >= 4 && s.plane >= 4 && metrics.edge_face_ratio >= 2.2,
        1,
        || {
            format!(
                "Stepped profile: {} cylinders, {} planes, {:.2} edges per face",
                s.cylinder, s.plane, metrics.edge_face_ratio
            )
        },
    );
    grooving.add(digest.cylindrical_face_count >= 5, 1, || {
        format!(
            "{} cylindrical faces suggest recessed diameters",
            digest.cylindrical_face_count
        )
    });

    FeatureDetection {
        threading: threading.finish("threading"),
        grooving: grooving.finish("grooving"),
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::digest::{Dimensions, EdgeCounts, SurfaceCounts};

    fn digest(surfaces: SurfaceCounts, edges: u32, z: f64, cylindrical: u32) -> GeometryDigest {
        GeometryDigest {
            surface_counts: surfaces,
            edge_counts: EdgeCounts {
                line: edges,
                circle: 0,
                other: 0,
            },
            dimensions: Dimensions {
                x: 20.0,
                y: 20.0,
                z,
                volume: 0.0,
            },
            cylindrical_face_count: cylindrical,
            ..Default::default()
        }
    }

    #[test]
    fn test_threading_high_confidence() {
        let d = digest(
            SurfaceCounts {
                cylinder: 3,
                cone: 1,
                plane: 2,
                ..Default::default()
            },
            18,
            60.0,
            3,
        );
        let det = detect_features(&d);
        assert_eq!(det.threading.score, 4);
        assert_eq!(det.threading.confidence, Confidence::High);
        assert!(det.threading.detected);
        assert_eq!(det.threading.reasons.len(), 3);
    }

    #[test]
    fn test_threading_medium_confidence() {
        let d = digest(
            SurfaceCounts {
                cylinder: 2,
                cone: 1,
                ..Default::default()
            },
            3,
            10.0,
            2,
        );
        let det = detect_features(&d);
        assert_eq!(det.threading.confidence, Confidence::Medium);
        assert!(det.threading.detected);
    }

    #[test]
    fn test_slenderness_alone_is_not_enough() {
        let d = digest(
            SurfaceCounts {
                cylinder: 1,
                plane: 2,
                ..Default::default()
            },
            3,
            100.0,
            1,
        );
        let det = detect_features(&d);
        assert_eq!(det.threading.score, 1);
        assert!(!det.threading.detected);
        assert_eq!(det.threading.confidence, Confidence::Low);
        assert_eq!(det.threading.reasons.len(), 1);
        assert!(det.threading.reasons[0].contains("No strong threading"));
    }

    #[test]
    fn test_grooving_from_torus() {
        let d = digest(
            SurfaceCounts {
                cylinder: 4,
                plane: 4,
                torus: 2,
                ..Default::default()
            },
            25,
            30.0,
            5,
        );
        let det = detect_features(&d);
        assert_eq!(det.grooving.score, 4);
        assert_eq!(det.grooving.confidence, Confidence::High);
        assert_eq!(det.metrics.torus_surfaces, 2);
    }

    #[test]
    fn test_empty_digest_detects_nothing() {
        let det = detect_features(&GeometryDigest::default());
        assert!(!det.threading.detected);
        assert!(!det.grooving.detected);
        assert_eq!(det.metrics.edge_face_ratio, 0.0);
    }
}
