//! `turnplan profiles` command - List material and machine profiles

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::output::{emit, serialize};
use crate::cli::{load_planner, GlobalOpts, OutputFormat};
use crate::core::{MachineProfile, MaterialProfile};

#[derive(clap::Args, Debug)]
pub struct ProfilesArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,
}

#[derive(Tabled)]
struct MaterialRow {
    #[tabled(rename = "Material")]
    name: String,
    #[tabled(rename = "Speed factor")]
    speed_factor: f64,
    #[tabled(rename = "kW per cm³/min")]
    specific_power: f64,
    #[tabled(rename = "Default")]
    default: &'static str,
}

#[derive(Tabled)]
struct MachineRow {
    #[tabled(rename = "Machine")]
    name: String,
    #[tabled(rename = "Max RPM")]
    max_rpm: u32,
    #[tabled(rename = "Power (kW)")]
    max_power_kw: f64,
    #[tabled(rename = "Max Ø (mm)")]
    max_diameter_mm: f64,
    #[tabled(rename = "Max length (mm)")]
    max_length_mm: f64,
    #[tabled(rename = "Default")]
    default: &'static str,
}

#[derive(Serialize)]
struct ProfileListing<'a> {
    default_material: String,
    default_machine: String,
    materials: &'a [MaterialProfile],
    machines: &'a [MachineProfile],
}

fn default_mark(is_default: bool) -> &'static str {
    if is_default {
        "*"
    } else {
        ""
    }
}

pub fn run(args: ProfilesArgs, global: &GlobalOpts) -> Result<()> {
    let planner = load_planner(global)?;
    let catalog = planner.catalog();
    let default_material = catalog.default_material().name;
    let default_machine = catalog.default_machine().name;

    if matches!(args.format, OutputFormat::Yaml | OutputFormat::Json) {
        let listing = ProfileListing {
            default_material,
            default_machine,
            materials: catalog.materials(),
            machines: catalog.machines(),
        };
        return emit(&serialize(&listing, args.format)?, None);
    }

    let materials: Vec<MaterialRow> = catalog
        .materials()
        .iter()
        .map(|m| MaterialRow {
            name: m.name.clone(),
            speed_factor: m.speed_factor,
            specific_power: m.specific_power,
            default: default_mark(m.name == default_material),
        })
        .collect();
    let machines: Vec<MachineRow> = catalog
        .machines()
        .iter()
        .map(|m| MachineRow {
            name: m.name.clone(),
            max_rpm: m.max_rpm,
            max_power_kw: m.max_power_kw,
            max_diameter_mm: m.max_diameter_mm,
            max_length_mm: m.max_length_mm,
            default: default_mark(m.name == default_machine),
        })
        .collect();

    println!("{}", style("Materials").bold());
    println!("{}", Table::new(materials).with(Style::rounded()));
    println!();
    println!("{}", style("Machines").bold());
    println!("{}", Table::new(machines).with(Style::rounded()));
    Ok(())
}
