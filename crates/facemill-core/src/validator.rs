//! Parameter validation for program generation.
//!
//! All range and cross-field rules live here; the calculator and generator
//! assume validated input and never re-check field presence. The first
//! failing rule short-circuits, so callers always get a single reason.

use crate::error::ValidationError;
use crate::params::{Finishing, MachineSettings, Parameters, Roughing, Stock};

/// Validates a complete parameter set before any geometry is computed.
pub struct InputValidator;

impl InputValidator {
    pub const STOCK_SIZE_MIN: f64 = 50.0;
    pub const STOCK_SIZE_MAX: f64 = 1000.0;
    pub const TOOL_DIAMETER_MIN: f64 = 5.0;
    pub const TOOL_DIAMETER_MAX: f64 = 300.0;
    pub const DEPTH_OF_CUT_MIN: f64 = 0.1;
    pub const DEPTH_OF_CUT_MAX: f64 = 100.0;
    pub const RPM_MIN: u32 = 800;
    pub const RPM_MAX: u32 = 20_000;
    pub const FEEDRATE_MIN: f64 = 100.0;
    pub const FEEDRATE_MAX: f64 = 15_000.0;
    pub const CORNER_RADIUS_MIN: f64 = 1.0;
    pub const CORNER_RADIUS_MAX: f64 = 25.0;
    pub const CLEARANCE_MIN: f64 = 5.0;
    pub const CLEARANCE_MAX: f64 = 500.0;

    /// Check every rule; `Ok(())` means the generator can run without
    /// further presence or range checks.
    pub fn validate(params: &Parameters) -> Result<(), ValidationError> {
        Self::validate_stock(&params.stock)?;

        if !params.only_finish {
            let roughing = params
                .roughing
                .as_ref()
                .ok_or_else(|| ValidationError::Missing("roughing".to_string()))?;
            Self::validate_roughing(roughing)?;
        }

        Self::validate_finishing(&params.finishing)?;
        Self::validate_machine_settings(&params.machine)?;
        Self::validate_interdependencies(params)?;

        Ok(())
    }

    fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                name: name.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }

    fn validate_stock(stock: &Stock) -> Result<(), ValidationError> {
        Self::check_range(
            "stock.x_size",
            stock.x_size,
            Self::STOCK_SIZE_MIN,
            Self::STOCK_SIZE_MAX,
        )?;
        Self::check_range(
            "stock.y_size",
            stock.y_size,
            Self::STOCK_SIZE_MIN,
            Self::STOCK_SIZE_MAX,
        )?;
        Self::check_range(
            "stock.z_size",
            stock.z_size,
            Self::STOCK_SIZE_MIN,
            Self::STOCK_SIZE_MAX,
        )?;

        if stock.finished_z_height < 0.0 || stock.finished_z_height >= stock.z_size {
            return Err(ValidationError::InvalidValue {
                name: "stock.finished_z_height".to_string(),
                reason: format!("must be within 0..{} (below the stock top)", stock.z_size),
            });
        }

        if stock.stock_offset < 0.0 {
            return Err(ValidationError::InvalidValue {
                name: "stock.stock_offset".to_string(),
                reason: "cannot be negative".to_string(),
            });
        }

        Ok(())
    }

    fn validate_roughing(roughing: &Roughing) -> Result<(), ValidationError> {
        if roughing.tool_number < 0 {
            return Err(ValidationError::InvalidValue {
                name: "roughing.tool_number".to_string(),
                reason: "cannot be negative".to_string(),
            });
        }

        Self::check_range(
            "roughing.tool_diameter",
            roughing.tool_diameter,
            Self::TOOL_DIAMETER_MIN,
            Self::TOOL_DIAMETER_MAX,
        )?;
        Self::check_range(
            "roughing.depth_of_cut",
            roughing.depth_of_cut,
            Self::DEPTH_OF_CUT_MIN,
            Self::DEPTH_OF_CUT_MAX,
        )?;

        if roughing.leave_for_finishing < 0.0 {
            return Err(ValidationError::InvalidValue {
                name: "roughing.leave_for_finishing".to_string(),
                reason: "cannot be negative".to_string(),
            });
        }

        if roughing.width_of_cut > roughing.tool_diameter {
            return Err(ValidationError::InvalidValue {
                name: "roughing.width_of_cut".to_string(),
                reason: format!(
                    "must be at most the tool diameter ({}mm)",
                    roughing.tool_diameter
                ),
            });
        }

        Self::check_rpm("roughing.rpm", roughing.rpm)?;
        Self::check_range(
            "roughing.feedrate",
            roughing.feedrate,
            Self::FEEDRATE_MIN,
            Self::FEEDRATE_MAX,
        )?;

        Ok(())
    }

    fn validate_finishing(finishing: &Finishing) -> Result<(), ValidationError> {
        if finishing.tool_number < 0 {
            return Err(ValidationError::InvalidValue {
                name: "finishing.tool_number".to_string(),
                reason: "cannot be negative".to_string(),
            });
        }

        Self::check_range(
            "finishing.tool_diameter",
            finishing.tool_diameter,
            Self::TOOL_DIAMETER_MIN,
            Self::TOOL_DIAMETER_MAX,
        )?;

        if finishing.width_of_cut > finishing.tool_diameter {
            return Err(ValidationError::InvalidValue {
                name: "finishing.width_of_cut".to_string(),
                reason: format!(
                    "must be at most the tool diameter ({}mm)",
                    finishing.tool_diameter
                ),
            });
        }

        Self::check_rpm("finishing.rpm", finishing.rpm)?;
        Self::check_range(
            "finishing.feedrate",
            finishing.feedrate,
            Self::FEEDRATE_MIN,
            Self::FEEDRATE_MAX,
        )?;

        Ok(())
    }

    fn validate_machine_settings(machine: &MachineSettings) -> Result<(), ValidationError> {
        Self::check_range(
            "machine_settings.corner_radius",
            machine.corner_radius,
            Self::CORNER_RADIUS_MIN,
            Self::CORNER_RADIUS_MAX,
        )?;
        Self::check_range(
            "machine_settings.clearance_height",
            machine.clearance_height,
            Self::CLEARANCE_MIN,
            Self::CLEARANCE_MAX,
        )?;
        Self::check_range(
            "machine_settings.plunge_feedrate",
            machine.plunge_feedrate,
            Self::FEEDRATE_MIN,
            Self::FEEDRATE_MAX,
        )?;

        if machine.lead_in_length < 0.0 {
            return Err(ValidationError::InvalidValue {
                name: "machine_settings.lead_in_length".to_string(),
                reason: "cannot be negative".to_string(),
            });
        }

        Ok(())
    }

    fn check_rpm(name: &str, rpm: u32) -> Result<(), ValidationError> {
        if rpm < Self::RPM_MIN || rpm > Self::RPM_MAX {
            return Err(ValidationError::OutOfRange {
                name: name.to_string(),
                value: rpm as f64,
                min: Self::RPM_MIN as f64,
                max: Self::RPM_MAX as f64,
            });
        }
        Ok(())
    }

    /// Rules spanning more than one section. Roughing must have material
    /// to remove once the finishing allowance is subtracted.
    fn validate_interdependencies(params: &Parameters) -> Result<(), ValidationError> {
        if !params.only_finish {
            // Presence is guaranteed by the earlier roughing check.
            if let Some(roughing) = &params.roughing {
                let material_to_remove = params.stock.z_size
                    - params.stock.finished_z_height
                    - roughing.leave_for_finishing;
                if material_to_remove <= 0.0 {
                    return Err(ValidationError::Incompatible(
                        "leave for finishing must be less than the total material to remove"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
