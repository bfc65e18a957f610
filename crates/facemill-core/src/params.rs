//! Parameter data model for face-milling program generation.
//!
//! A [`Parameters`] value describes one complete generation run: where the
//! stock sits, its dimensions, the roughing and finishing operations, the
//! machine environment, and the coolant selection. Callers assemble it once
//! (from a config file or a parameter file) and pass it whole to the
//! generator; all numeric fields are already coerced, nothing is parsed
//! from strings downstream.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Work-offset reference frame used to position the stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionReference {
    /// Absolute table coordinates; the G55 registers are written in the
    /// program header from the table reference plus the position offset.
    Table,
    G55,
    G56,
    G57,
}

impl PositionReference {
    /// Work-offset selection command emitted at the start of each
    /// operation. Table-referenced programs run in G55 after the header
    /// has loaded its registers.
    pub fn offset_command(&self) -> &'static str {
        match self {
            Self::Table | Self::G55 => "G55",
            Self::G56 => "G56",
            Self::G57 => "G57",
        }
    }
}

impl std::fmt::Display for PositionReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "Table"),
            Self::G55 => write!(f, "G55"),
            Self::G56 => write!(f, "G56"),
            Self::G57 => write!(f, "G57"),
        }
    }
}

/// Stock placement relative to the selected reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub reference: PositionReference,
    /// X offset from the reference origin (mm, signed)
    pub x: f64,
    /// Y offset from the reference origin (mm, signed)
    pub y: f64,
}

/// Dimensions of the block being faced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    /// Stock size along X (mm)
    pub x_size: f64,
    /// Stock size along Y (mm)
    pub y_size: f64,
    /// Stock size along Z (mm); also the top face before the first pass
    pub z_size: f64,
    /// Target height of the finished face (mm)
    pub finished_z_height: f64,
    /// Margin added around the part before the first pass (mm)
    pub stock_offset: f64,
}

/// Roughing operation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roughing {
    pub tool_number: i32,
    /// Cutter diameter (mm)
    pub tool_diameter: f64,
    /// Maximum material removed per depth level (mm)
    pub depth_of_cut: f64,
    /// Material left above the finished height for the finishing pass (mm)
    pub leave_for_finishing: f64,
    /// Maximum lateral stepover (mm); never more than the tool diameter
    pub width_of_cut: f64,
    /// Spindle speed (rpm)
    pub rpm: u32,
    /// Cutting feedrate (mm/min)
    pub feedrate: f64,
}

/// Finishing operation parameters. Finishing always runs as a single pass
/// to the finished height, so there is no depth-of-cut or leave here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finishing {
    pub tool_number: i32,
    /// Cutter diameter (mm)
    pub tool_diameter: f64,
    /// Maximum lateral stepover (mm); never more than the tool diameter
    pub width_of_cut: f64,
    /// Spindle speed (rpm)
    pub rpm: u32,
    /// Cutting feedrate (mm/min)
    pub feedrate: f64,
}

/// Machine environment: work-offset registers, safe heights, approach
/// geometry, and output naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSettings {
    /// Table reference registers loaded into G55 for table-referenced runs
    pub table_reference_x: f64,
    pub table_reference_y: f64,
    pub table_reference_z: f64,
    /// Safe rapid-traverse height above the stock top (mm)
    pub clearance_height: f64,
    /// Feedrate for Z plunge moves (mm/min)
    pub plunge_feedrate: f64,
    /// Approach distance before the cutter engages material (mm)
    pub lead_in_length: f64,
    /// Corner radius of each spiral lap (mm); rounded to whole millimetres
    /// by the path calculator
    pub corner_radius: f64,
    /// Overlap of the last lap over the previous one (mm)
    pub last_cut_overlap: f64,
    /// Base name of the generated program file
    pub program_name: String,
    /// Append a timestamp suffix to the program name
    pub append_timestamp: bool,
    /// Directory the writer places generated programs in
    pub output_path: PathBuf,
}

/// Coolant switch codes. M-codes are machine-specific, so they are
/// supplied by the configuration rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoolantCodes {
    pub on_code: u32,
    pub off_code: u32,
}

/// One coolant option selected for a run. The selected set is ordered;
/// on-codes are emitted in this order and off-codes mirror it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolantSelection {
    pub name: String,
    pub codes: CoolantCodes,
}

/// Complete input for one program generation call. Immutable for the
/// duration of the call; the generator never writes back into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub position: Position,
    pub stock: Stock,
    /// Required unless `only_finish` is set; the validator enforces this.
    pub roughing: Option<Roughing>,
    pub finishing: Finishing,
    pub machine: MachineSettings,
    /// Coolants enabled for this run, in emission order.
    #[serde(default)]
    pub coolant: Vec<CoolantSelection>,
    /// Skip roughing and perform the finishing pass only.
    pub only_finish: bool,
}
