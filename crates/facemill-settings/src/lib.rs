//! # Facemill Settings
//!
//! Configuration handling for facemill: the persisted default parameter
//! set, machine settings, and the coolant code catalog, with JSON/TOML
//! file I/O and assembly of per-run [`facemill_core::Parameters`] values.

pub mod config;
pub mod error;

pub use config::{Defaults, FacemillConfig};
pub use error::{ConfigError, ConfigResult};
