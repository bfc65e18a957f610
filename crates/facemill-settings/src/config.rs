//! Configuration management for facemill.
//!
//! A [`FacemillConfig`] holds everything that outlives a single run: the
//! default parameter set the CLI starts from, the machine settings, and
//! the coolant code catalog. Files are JSON or TOML, chosen by extension.
//! The core never touches this file; it receives an assembled
//! [`Parameters`] value instead.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use facemill_core::{
    CoolantCodes, CoolantSelection, Finishing, InputValidator, MachineSettings, Parameters,
    Position, PositionReference, Roughing, Stock,
};
use tracing::info;

use crate::error::ConfigError;

/// Default parameter sections loaded into a new run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub position: Position,
    pub stock: Stock,
    pub roughing: Roughing,
    pub finishing: Finishing,
}

/// Complete persisted configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacemillConfig {
    pub defaults: Defaults,
    pub machine_settings: MachineSettings,
    /// Coolant catalog: display name to machine-specific M-codes. A run
    /// selects a subset of these by name.
    pub coolant_options: BTreeMap<String, CoolantCodes>,
}

impl Default for FacemillConfig {
    fn default() -> Self {
        let coolant_options = BTreeMap::from([
            (
                "Air".to_string(),
                CoolantCodes {
                    on_code: 81,
                    off_code: 82,
                },
            ),
            (
                "Internal air".to_string(),
                CoolantCodes {
                    on_code: 79,
                    off_code: 80,
                },
            ),
            (
                "Cold air".to_string(),
                CoolantCodes {
                    on_code: 83,
                    off_code: 84,
                },
            ),
            (
                "Oil Mist".to_string(),
                CoolantCodes {
                    on_code: 8,
                    off_code: 9,
                },
            ),
        ]);

        Self {
            defaults: Defaults {
                position: Position {
                    reference: PositionReference::Table,
                    x: 0.0,
                    y: 0.0,
                },
                stock: Stock {
                    x_size: 400.0,
                    y_size: 300.0,
                    z_size: 150.0,
                    finished_z_height: 140.0,
                    stock_offset: 0.0,
                },
                roughing: Roughing {
                    tool_number: 55,
                    tool_diameter: 63.0,
                    depth_of_cut: 5.0,
                    leave_for_finishing: 1.0,
                    width_of_cut: 30.0,
                    rpm: 6500,
                    feedrate: 7000.0,
                },
                finishing: Finishing {
                    tool_number: 1,
                    tool_diameter: 80.0,
                    width_of_cut: 53.0,
                    rpm: 4000,
                    feedrate: 3000.0,
                },
            },
            machine_settings: MachineSettings {
                table_reference_x: -2600.0,
                table_reference_y: -1500.0,
                table_reference_z: -1171.193,
                clearance_height: 50.0,
                plunge_feedrate: 500.0,
                lead_in_length: 10.0,
                corner_radius: 4.0,
                last_cut_overlap: 10.0,
                program_name: "FACEMILLING".to_string(),
                append_timestamp: true,
                output_path: ".".into(),
            },
            coolant_options,
        }
    }
}

impl FacemillConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML, by extension).
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(ConfigError::UnsupportedFormat(
                path.extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ));
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML, by extension).
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(
                path.extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ));
        };

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Load an existing config, or write the defaults out and return them
    /// on first run.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            let config = Self::default();
            config.save_to_file(path)?;
            info!(path = %path.display(), "created default configuration");
            Ok(config)
        }
    }

    /// Run the configured defaults through the core validator so a bad
    /// config file is rejected at load time, not at generation time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let params = self.build_parameters(false, &[] as &[&str])?;
        InputValidator::validate(&params).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Resolve coolant names against the catalog, preserving the
    /// requested order.
    pub fn select_coolants(
        &self,
        names: &[impl AsRef<str>],
    ) -> Result<Vec<CoolantSelection>, ConfigError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.coolant_options
                    .get(name)
                    .map(|codes| CoolantSelection {
                        name: name.to_string(),
                        codes: *codes,
                    })
                    .ok_or_else(|| ConfigError::UnknownCoolant(name.to_string()))
            })
            .collect()
    }

    /// Assemble a complete parameter set for one run from the configured
    /// defaults plus per-run choices.
    pub fn build_parameters(
        &self,
        only_finish: bool,
        coolant_names: &[impl AsRef<str>],
    ) -> Result<Parameters, ConfigError> {
        Ok(Parameters {
            position: self.defaults.position.clone(),
            stock: self.defaults.stock.clone(),
            roughing: Some(self.defaults.roughing.clone()),
            finishing: self.defaults.finishing.clone(),
            machine: self.machine_settings.clone(),
            coolant: self.select_coolants(coolant_names)?,
            only_finish,
        })
    }
}
