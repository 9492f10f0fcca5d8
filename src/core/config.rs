//! Layered configuration
//!
//! Built-in defaults, then the user config file, then an explicit `--config`
//! file. Mappings merge key by key, lists append, scalars replace.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_yml::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::gate::GateConfig;
use crate::core::profiles::{MachineProfile, MaterialProfile, ProfileCatalog};
use crate::yaml::{parse_yaml, YamlError};

/// File name of the user config inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    #[diagnostic(code(turnplan::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(turnplan::config::invalid))]
    Invalid(String),
}

/// Names of the profiles used when a request names none
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: ProfileDefaults,
    pub gate: GateConfig,
    /// Additional material profiles; a name matching a built-in replaces it
    pub materials: Vec<MaterialProfile>,
    /// Additional machine profiles; a name matching a built-in replaces it
    pub machines: Vec<MachineProfile>,
}

/// Path of the per-user config file, when the platform has a config directory
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "turnplan")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Overlay `layer` onto `base`
fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Mapping(base), Value::Mapping(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (Value::Sequence(base), Value::Sequence(layer)) => base.extend(layer),
        (_, Value::Null) => {}
        (base, layer) => *base = layer,
    }
}

impl Config {
    /// Merge YAML layers (name, content), lowest precedence first
    pub fn from_layers<'a, I>(layers: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut merged = serde_yml::to_value(Config::default())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        for (name, content) in layers {
            if content.trim().is_empty() {
                continue;
            }
            let layer: Value = parse_yaml(content, name)?;
            debug!(layer = name, "merging config layer");
            merge(&mut merged, layer);
        }

        let config: Config =
            serde_yml::from_value(merged).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults, the user config file (if present) and an explicit file
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut sources: Vec<(String, String)> = Vec::new();

        if let Some(path) = user_config_path().filter(|p| p.is_file()) {
            sources.push(read_layer(&path)?);
        }
        if let Some(path) = explicit {
            sources.push(read_layer(path)?);
        }

        Self::from_layers(sources.iter().map(|(n, c)| (n.as_str(), c.as_str())))
    }

    /// Profile catalog with extra profiles and defaults applied
    pub fn catalog(&self) -> ProfileCatalog {
        let mut catalog = ProfileCatalog::default();
        for material in &self.materials {
            catalog.add_material(material.clone());
        }
        for machine in &self.machines {
            catalog.add_machine(machine.clone());
        }

        if let Some(name) = &self.defaults.material {
            if !catalog.set_default_material(name) {
                warn!(material = %name, "configured default material not found; keeping built-in default");
            }
        }
        if let Some(name) = &self.defaults.machine {
            if !catalog.set_default_machine(name) {
                warn!(machine = %name, "configured default machine not found; keeping built-in default");
            }
        }
        catalog
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gate;
        if g.aspect_min > g.aspect_max {
            return Err(ConfigError::Invalid(format!(
                "gate.aspect_min ({}) is greater than gate.aspect_max ({})",
                g.aspect_min, g.aspect_max
            )));
        }
        if g.partial_min_score > g.strict_min_score {
            return Err(ConfigError::Invalid(format!(
                "gate.partial_min_score ({}) is greater than gate.strict_min_score ({})",
                g.partial_min_score, g.strict_min_score
            )));
        }
        for m in &self.materials {
            if !m.speed_factor.is_finite() || m.speed_factor <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "material '{}' needs a positive speed_factor",
                    m.name
                )));
            }
        }
        for m in &self.machines {
            if m.max_rpm == 0 {
                return Err(ConfigError::Invalid(format!(
                    "machine '{}' needs a positive max_rpm",
                    m.name
                )));
            }
        }
        Ok(())
    }
}

fn read_layer(path: &Path) -> Result<(String, String), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((path.display().to_string(), content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profiles::{DEFAULT_MACHINE, DEFAULT_MATERIAL};

    #[test]
    fn test_no_layers_gives_defaults() {
        let config = Config::from_layers([]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.catalog().default_material().name, DEFAULT_MATERIAL);
    }

    #[test]
    fn test_later_layer_overrides_single_field() {
        let user = "gate:\n  strict_min_score: 70\n  aspect_max: 10.0\n";
        let explicit = "gate:\n  aspect_max: 8.0\n";
        let config = Config::from_layers([("user", user), ("explicit", explicit)]).unwrap();
        assert_eq!(config.gate.strict_min_score, 70);
        assert_eq!(config.gate.aspect_max, 8.0);
        assert_eq!(config.gate.partial_min_score, 40);
    }

    #[test]
    fn test_score_delta_override() {
        let layer = "gate:\n  deltas:\n    axisymmetric:\n      pass: 30\n";
        let config = Config::from_layers([("layer", layer)]).unwrap();
        assert_eq!(config.gate.deltas.axisymmetric.pass, 30);
        assert_eq!(config.gate.deltas.axisymmetric.fail, 18);
    }

    #[test]
    fn test_profiles_append_across_layers() {
        let user = "materials:\n  - name: Delrin\n    speed_factor: 2.5\n    specific_power: 0.008\n";
        let explicit = "machines:\n  - name: Bench lathe\n    max_rpm: 2500\n    max_power_kw: 1.1\n    max_diameter_mm: 180\n    max_length_mm: 300\ndefaults:\n  material: delrin\n  machine: Bench lathe\n";
        let config = Config::from_layers([("user", user), ("explicit", explicit)]).unwrap();
        let catalog = config.catalog();
        assert_eq!(catalog.default_material().name, "Delrin");
        assert_eq!(catalog.default_machine().name, "Bench lathe");
        assert!(catalog.machine(Some(DEFAULT_MACHINE)).fallback_from.is_none());
    }

    #[test]
    fn test_unknown_default_keeps_builtin() {
        let layer = "defaults:\n  material: Unobtainium\n";
        let config = Config::from_layers([("layer", layer)]).unwrap();
        assert_eq!(config.catalog().default_material().name, DEFAULT_MATERIAL);
    }

    #[test]
    fn test_empty_layer_is_ignored() {
        let config = Config::from_layers([("empty", "")]).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_inverted_aspect_range_rejected() {
        let layer = "gate:\n  aspect_min: 5.0\n  aspect_max: 1.0\n";
        let result = Config::from_layers([("layer", layer)]);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_yaml_is_reported() {
        let result = Config::from_layers([("broken.yaml", "gate: [unclosed\n")]);
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
