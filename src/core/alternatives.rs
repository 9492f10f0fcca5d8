//! Alternative manufacturing processes for parts (or features) a lathe cannot make
//!
//! Coarse feasibility scores for 3-axis milling and 3D printing, used to name
//! a recommended process when the turning gate fails or only partially passes.

use serde::{Deserialize, Serialize};

use crate::core::digest::GeometryDigest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    #[serde(rename = "3_axis_milling")]
    Milling3Axis,
    #[serde(rename = "3d_printing")]
    Printing3D,
}

impl std::fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessKind::Milling3Axis => write!(f, "3-axis milling"),
            ProcessKind::Printing3D => write!(f, "3D printing"),
        }
    }
}

/// Feasibility band derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feasibility {
    High,
    Medium,
    Low,
}

impl Feasibility {
    fn from_score(score: u8) -> Self {
        if score > 70 {
            Feasibility::High
        } else if score > 40 {
            Feasibility::Medium
        } else {
            Feasibility::Low
        }
    }
}

impl std::fmt::Display for Feasibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feasibility::High => write!(f, "high"),
            Feasibility::Medium => write!(f, "medium"),
            Feasibility::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOption {
    pub process: ProcessKind,
    pub score: u8,
    pub feasibility: Feasibility,
    pub reasons: Vec<String>,
}

fn finish(process: ProcessKind, raw: f64, reasons: Vec<String>) -> ProcessOption {
    let score = raw.round().clamp(0.0, 100.0) as u8;
    ProcessOption {
        process,
        score,
        feasibility: Feasibility::from_score(score),
        reasons,
    }
}

fn milling(digest: &GeometryDigest) -> ProcessOption {
    let s = &digest.surface_counts;
    let dims = &digest.dimensions;
    let mut score = 0.0;
    let mut reasons = Vec::new();

    let planar_ratio = digest.face_ratio(s.plane);
    if planar_ratio > 0.5 {
        score += 30.0;
        reasons.push("High percentage of planar surfaces".to_string());
    } else if planar_ratio > 0.3 {
        score += 20.0;
        reasons.push("Moderate percentage of planar surfaces".to_string());
    }

    if s.cylinder > 0 {
        score += (s.cylinder as f64 / 10.0).min(20.0);
        reasons.push(format!("{} cylindrical surfaces detected", s.cylinder));
    }

    let complex = s.bezier + s.bspline;
    if complex > 0 {
        score -= (complex as f64 * 2.0).min(30.0);
        reasons.push(format!("{} complex surfaces may require 5-axis milling", complex));
    }

    if dims.x.max(dims.y).max(dims.z) < 500.0 {
        score += 10.0;
        reasons.push("Size suitable for standard milling machines".to_string());
    }

    finish(ProcessKind::Milling3Axis, score + 40.0, reasons)
}

fn printing(digest: &GeometryDigest) -> ProcessOption {
    let s = &digest.surface_counts;
    let dims = &digest.dimensions;
    let mut score = 0.0;
    let mut reasons = Vec::new();

    let complex = s.bezier + s.bspline;
    if complex > 0 {
        score += (complex as f64 * 2.0).min(40.0);
        reasons.push(format!("{} complex surfaces well-suited for 3D printing", complex));
    }

    if dims.x.max(dims.y).max(dims.z) < 250.0 {
        score += 30.0;
        reasons.push("Size suitable for standard 3D printers".to_string());
    }

    let kinds = s.distinct_kinds();
    if kinds >= 4 {
        score += 20.0;
        reasons.push(format!("{} different surface types detected", kinds));
    }

    finish(ProcessKind::Printing3D, score + 30.0, reasons)
}

/// Alternative processes ranked best first
pub fn rank_alternatives(digest: &GeometryDigest) -> Vec<ProcessOption> {
    let mut options = vec![milling(digest), printing(digest)];
    // Stable sort keeps milling ahead on ties
    options.sort_by(|a, b| b.score.cmp(&a.score));
    options
}
