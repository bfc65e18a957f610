//! # Facemill Core
//!
//! Toolpath calculation and program generation for face-milling a
//! rectangular block with a contour-parallel (rectangular spiral)
//! strategy.
//!
//! The pipeline is validate → calculate → serialize:
//!
//! 1. [`InputValidator`] checks ranges and cross-field rules and stops at
//!    the first failure.
//! 2. [`SpiralPathCalculator`] turns validated [`Parameters`] into ordered
//!    depth levels of spiral toolpath points, once for roughing and once
//!    for finishing.
//! 3. [`ProgramGenerator`] serializes the levels into a complete program
//!    with header, per-operation sections, and footer.
//! 4. [`ProgramWriter`] persists the text; it is the only I/O boundary.
//!
//! The core is synchronous and stateless: every call builds its own
//! collections and nothing is shared between invocations.

pub mod error;
pub mod generator;
pub mod params;
pub mod path_calculator;
pub mod validator;
pub mod writer;

pub use error::{ProgramError, ProgramResult, ValidationError};
pub use generator::ProgramGenerator;
pub use params::{
    CoolantCodes, CoolantSelection, Finishing, MachineSettings, Parameters, Position,
    PositionReference, Roughing, Stock,
};
pub use path_calculator::{DepthLevel, Operation, SpiralPathCalculator, ToolPathPoint};
pub use validator::InputValidator;
pub use writer::ProgramWriter;
