//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;
use turnplan::core::{Dimensions, EdgeCounts, GeometryDigest, SurfaceCounts};

/// Helper to get a turnplan command isolated from the user's config
pub fn turnplan(config_home: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("turnplan"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("TURNPLAN_CONFIG")
        .env_remove("TURNPLAN_ADVISOR")
        .env_remove("TURNPLAN_ADVISOR_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Temp directory used as both workspace and config home
pub fn setup_workspace() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a digest as YAML into `dir` and return its path
pub fn write_digest(dir: &Path, name: &str, digest: &GeometryDigest) -> PathBuf {
    let path = dir.join(format!("{}.digest.yaml", name));
    std::fs::write(&path, serde_yml::to_string(digest).unwrap()).unwrap();
    path
}

/// Write a digest as JSON into `dir` and return its path
pub fn write_digest_json(dir: &Path, name: &str, digest: &GeometryDigest) -> PathBuf {
    let path = dir.join(format!("{}.digest.json", name));
    std::fs::write(&path, serde_json::to_string_pretty(digest).unwrap()).unwrap();
    path
}

/// Stepped shaft: cylinder ratio 0.6, circle-edge ratio 0.3, L/D 3.0, one axis
///
/// `cones` controls the thread chamfer evidence.
pub fn stepped_shaft(cones: u32) -> GeometryDigest {
    GeometryDigest {
        part: Some("stepped_shaft".to_string()),
        surface_counts: SurfaceCounts {
            cylinder: 6,
            cone: cones,
            plane: 4 - cones,
            ..Default::default()
        },
        edge_counts: EdgeCounts {
            line: 14,
            circle: 6,
            other: 0,
        },
        dimensions: Dimensions {
            x: 30.0,
            y: 30.0,
            z: 90.0,
            volume: 45_000.0,
        },
        axis_cues: vec![[0.0, 0.0, 1.0]; 20],
        cylindrical_face_count: 6,
        ..Default::default()
    }
}

/// Free-form housing: 60 spline faces out of 66, no axis agreement
pub fn freeform_housing() -> GeometryDigest {
    GeometryDigest {
        part: Some("freeform_housing".to_string()),
        surface_counts: SurfaceCounts {
            plane: 2,
            cylinder: 3,
            bspline: 50,
            other: 10,
            torus: 1,
            ..Default::default()
        },
        edge_counts: EdgeCounts {
            line: 80,
            circle: 2,
            other: 120,
        },
        dimensions: Dimensions {
            x: 120.0,
            y: 80.0,
            z: 60.0,
            volume: 150_000.0,
        },
        axis_cues: vec![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0],
        ],
        cylindrical_face_count: 3,
        ..Default::default()
    }
}

/// Short pin with a given diameter and no threading/grooving evidence
pub fn plain_pin(diameter: f64) -> GeometryDigest {
    GeometryDigest {
        part: Some("plain_pin".to_string()),
        surface_counts: SurfaceCounts {
            cylinder: 2,
            plane: 2,
            ..Default::default()
        },
        edge_counts: EdgeCounts {
            line: 0,
            circle: 4,
            other: 0,
        },
        dimensions: Dimensions {
            x: diameter,
            y: diameter,
            z: diameter,
            volume: 0.0,
        },
        axis_cues: vec![[0.0, 1.0, 0.0]; 6],
        cylindrical_face_count: 2,
        ..Default::default()
    }
}
