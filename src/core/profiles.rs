//! Material and machine profiles
//!
//! Profiles are looked up by name (case-insensitive). Unknown names resolve to
//! the documented default profile and the resolution records the fallback.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MATERIAL: &str = "Aluminum 6061-T6";
pub const DEFAULT_MACHINE: &str = "2-axis CNC turning center (ST-20 class)";

/// Workpiece material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProfile {
    pub name: String,
    /// Multiplier applied to the base surface speeds
    pub speed_factor: f64,
    /// Specific cutting power (kW per cm³/min of removed material)
    pub specific_power: f64,
}

impl MaterialProfile {
    pub fn new(name: &str, speed_factor: f64, specific_power: f64) -> Self {
        Self {
            name: name.to_string(),
            speed_factor,
            specific_power,
        }
    }
}

/// Lathe capabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineProfile {
    pub name: String,
    pub max_rpm: u32,
    /// Rated spindle power (kW)
    pub max_power_kw: f64,
    /// Maximum turning diameter (mm)
    pub max_diameter_mm: f64,
    /// Maximum turning length (mm)
    pub max_length_mm: f64,
}

impl MachineProfile {
    pub fn new(
        name: &str,
        max_rpm: u32,
        max_power_kw: f64,
        max_diameter_mm: f64,
        max_length_mm: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            max_rpm,
            max_power_kw,
            max_diameter_mm,
            max_length_mm,
        }
    }
}

pub fn builtin_materials() -> Vec<MaterialProfile> {
    vec![
        MaterialProfile::new(DEFAULT_MATERIAL, 1.7, 0.013),
        MaterialProfile::new("Mild Steel (AISI 1018/1020)", 1.0, 0.045),
        MaterialProfile::new("Stainless Steel 304", 0.65, 0.060),
        MaterialProfile::new("Free-machining Brass C360", 2.0, 0.012),
        MaterialProfile::new("Gray Cast Iron", 0.8, 0.035),
        MaterialProfile::new("Titanium Ti-6Al-4V", 0.35, 0.070),
    ]
}

pub fn builtin_machines() -> Vec<MachineProfile> {
    vec![
        MachineProfile::new(DEFAULT_MACHINE, 4000, 14.9, 262.0, 533.0),
        MachineProfile::new("Toolroom CNC lathe (TL-1 class)", 1800, 5.6, 406.0, 762.0),
        MachineProfile::new(
            "High-speed CNC turning center (ST-10 class)",
            6000,
            11.2,
            225.0,
            356.0,
        ),
    ]
}

/// A profile chosen for a request, with whether the requested name was found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved<T> {
    pub profile: T,
    /// Requested name that was not found, when the default was substituted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_from: Option<String>,
}

/// Named material and machine profiles
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCatalog {
    materials: Vec<MaterialProfile>,
    machines: Vec<MachineProfile>,
    default_material: String,
    default_machine: String,
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self {
            materials: builtin_materials(),
            machines: builtin_machines(),
            default_material: DEFAULT_MATERIAL.to_string(),
            default_machine: DEFAULT_MACHINE.to_string(),
        }
    }
}

fn find<'a, T>(items: &'a [T], name: &str, key: impl Fn(&T) -> &str) -> Option<&'a T> {
    let wanted = name.trim();
    items.iter().find(|p| key(p).eq_ignore_ascii_case(wanted))
}

impl ProfileCatalog {
    pub fn materials(&self) -> &[MaterialProfile] {
        &self.materials
    }

    pub fn machines(&self) -> &[MachineProfile] {
        &self.machines
    }

    /// Add or replace a material profile (matched by name)
    pub fn add_material(&mut self, profile: MaterialProfile) {
        match self
            .materials
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(&profile.name))
        {
            Some(existing) => *existing = profile,
            None => self.materials.push(profile),
        }
    }

    /// Add or replace a machine profile (matched by name)
    pub fn add_machine(&mut self, profile: MachineProfile) {
        match self
            .machines
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(&profile.name))
        {
            Some(existing) => *existing = profile,
            None => self.machines.push(profile),
        }
    }

    /// Change the default material; ignored when no such profile exists
    pub fn set_default_material(&mut self, name: &str) -> bool {
        match find(&self.materials, name, |p| p.name.as_str()) {
            Some(p) => {
                self.default_material = p.name.clone();
                true
            }
            None => false,
        }
    }

    /// Change the default machine; ignored when no such profile exists
    pub fn set_default_machine(&mut self, name: &str) -> bool {
        match find(&self.machines, name, |p| p.name.as_str()) {
            Some(p) => {
                self.default_machine = p.name.clone();
                true
            }
            None => false,
        }
    }

    pub fn default_material(&self) -> MaterialProfile {
        find(&self.materials, &self.default_material, |p| p.name.as_str())
            .cloned()
            .unwrap_or_else(|| MaterialProfile::new(DEFAULT_MATERIAL, 1.7, 0.013))
    }

    pub fn default_machine(&self) -> MachineProfile {
        find(&self.machines, &self.default_machine, |p| p.name.as_str())
            .cloned()
            .unwrap_or_else(|| MachineProfile::new(DEFAULT_MACHINE, 4000, 14.9, 262.0, 533.0))
    }

    /// Resolve a material by name, falling back to the default
    pub fn material(&self, name: Option<&str>) -> Resolved<MaterialProfile> {
        match name {
            None => Resolved {
                profile: self.default_material(),
                fallback_from: None,
            },
            Some(n) => match find(&self.materials, n, |p| p.name.as_str()) {
                Some(p) => Resolved {
                    profile: p.clone(),
                    fallback_from: None,
                },
                None => Resolved {
                    profile: self.default_material(),
                    fallback_from: Some(n.to_string()),
                },
            },
        }
    }

    /// Resolve a machine by name, falling back to the default
    pub fn machine(&self, name: Option<&str>) -> Resolved<MachineProfile> {
        match name {
            None => Resolved {
                profile: self.default_machine(),
                fallback_from: None,
            },
            Some(n) => match find(&self.machines, n, |p| p.name.as_str()) {
                Some(p) => Resolved {
                    profile: p.clone(),
                    fallback_from: None,
                },
                None => Resolved {
                    profile: self.default_machine(),
                    fallback_from: Some(n.to_string()),
                },
            },
        }
    }
}
