//! # Facemill
//!
//! A face-milling G-code program generator. Given stock dimensions, tool
//! geometry and cutting speeds, facemill computes a contour-parallel
//! (rectangular spiral) toolpath over the top face of a rectangular block
//! and serializes it into a ready-to-run motion program.
//!
//! ## Architecture
//!
//! Facemill is organized as a workspace:
//!
//! 1. **facemill-core** - parameter model, validation, spiral path
//!    calculation, program generation, program writer
//! 2. **facemill-settings** - configuration file handling and the coolant
//!    code catalog
//! 3. **facemill** - the command-line binary that ties them together

pub use facemill_core::{
    CoolantCodes, CoolantSelection, DepthLevel, Finishing, InputValidator, MachineSettings,
    Operation, Parameters, Position, PositionReference, ProgramError, ProgramGenerator,
    ProgramResult, ProgramWriter, Roughing, SpiralPathCalculator, Stock, ToolPathPoint,
    ValidationError,
};

pub use facemill_settings::{ConfigError, Defaults, FacemillConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output and RUST_LOG
/// environment variable support.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
