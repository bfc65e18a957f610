//! G-code program assembly for face-milling operations.
//!
//! The generator validates the parameter set, runs the spiral path
//! calculator for roughing and finishing, and serializes the result into a
//! complete program: header comments and work-offset registers, one
//! section per operation with tool change, spindle, coolant and clamp
//! handling, and a common footer. It produces text only; persistence is
//! the writer's job.

use chrono::Local;
use tracing::debug;

use crate::error::ProgramError;
use crate::params::{CoolantSelection, Parameters, PositionReference, Roughing};
use crate::path_calculator::{DepthLevel, Operation, SpiralPathCalculator, ToolPathPoint};
use crate::validator::InputValidator;

/// Generates face-milling programs from a parameter set.
#[derive(Debug, Default)]
pub struct ProgramGenerator;

impl ProgramGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate the full program text. Validation failures propagate with
    /// their reason before any geometry is computed; no partial program is
    /// ever returned.
    pub fn generate_program(&self, params: &Parameters) -> Result<String, ProgramError> {
        InputValidator::validate(params)?;

        let calculator = SpiralPathCalculator::new(params);

        let mut program = self.create_header(params);
        if let Some(roughing) = params.roughing.as_ref().filter(|_| !params.only_finish) {
            program.push_str(&self.create_roughing_section(params, roughing, &calculator));
        }
        program.push_str(&self.create_finishing_section(params, &calculator));
        program.push_str(&self.create_footer());

        debug!(
            bytes = program.len(),
            only_finish = params.only_finish,
            "program generated"
        );

        Ok(program)
    }

    fn create_header(&self, params: &Parameters) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let stock = &params.stock;

        let mut header = format!(
            "(*******************************)\n\
             (======FaceMilling Program======)\n\
             (===Date: {timestamp}===)\n\
             (*******************************)\n\
             (==========Stock Size===========)\n\
             (X={}mm, Y={}mm, Z={}mm)\n\
             (*******************************)\n\
             (======Finished Z: {}mm======)\n\
             (*******************************)\n\n",
            stock.x_size, stock.y_size, stock.z_size, stock.finished_z_height
        );

        // Table-referenced programs load the G55 registers from the table
        // reference plus the requested offset, then do a Z reference
        // return before the first operation.
        if params.position.reference == PositionReference::Table {
            let machine = &params.machine;
            let offset_x = machine.table_reference_x + params.position.x;
            let offset_y = machine.table_reference_y + params.position.y;
            header.push_str(&format!(
                "(Setting G55 according to table offset)\n\
                 #5241 = {:.3}\n\
                 #5242 = {:.3}\n\
                 #5243 = {:.3}\n\n",
                offset_x, offset_y, machine.table_reference_z
            ));
            header.push_str("G28 G91 Z0\n\n");
        }

        header
    }

    fn create_roughing_section(
        &self,
        params: &Parameters,
        roughing: &Roughing,
        calculator: &SpiralPathCalculator,
    ) -> String {
        let depth_levels = calculator.calculate_spiral_passes(Operation::Roughing);
        let Some(first_point) = first_point(&depth_levels) else {
            return String::new();
        };
        let clearance = calculator.get_total_clearance_height();

        let mut output = String::from("\nN1 (Roughing)\n");
        output.push_str(&format!("M06 T{}\n", roughing.tool_number));
        output.push_str(&self.operation_preamble(params, roughing.rpm));
        output.push_str(&format!("G0 X{:.1} Y{:.1}\n", first_point.x, first_point.y));
        output.push_str(&format!(
            "G43 H{} Z{:.3}\n",
            roughing.tool_number, clearance
        ));
        write_coolant_on(&mut output, &params.coolant);

        for level in &depth_levels {
            output.push_str(&format!("(Depth: {:.3}mm)\n", level.z_depth));
            for pass in &level.passes {
                write_pass_points(&mut output, pass);
            }
            // Retract between depth levels.
            output.push_str(&format!("G0 Z{:.3}\n", clearance));
        }

        write_coolant_off(&mut output, &params.coolant);
        output.push_str("M5\n");
        output.push_str("G28 G91 Z0\n");

        debug!(levels = depth_levels.len(), "roughing section emitted");
        output
    }

    fn create_finishing_section(
        &self,
        params: &Parameters,
        calculator: &SpiralPathCalculator,
    ) -> String {
        let finishing = &params.finishing;
        let depth_levels = calculator.calculate_spiral_passes(Operation::Finishing);
        let Some(first_point) = first_point(&depth_levels) else {
            return String::new();
        };
        let clearance = calculator.get_total_clearance_height();

        let mut output = String::from("\nN2 (Finishing)\n");
        // Optional stop before the finishing tool change.
        output.push_str("M1\n");
        output.push_str(&format!("M06 T{}\n", finishing.tool_number));
        output.push_str(&self.operation_preamble(params, finishing.rpm));
        output.push_str(&format!("G0 X{:.1} Y{:.1}\n", first_point.x, first_point.y));
        output.push_str(&format!(
            "G43 H{} Z{:.3}\n",
            finishing.tool_number, clearance
        ));
        write_coolant_on(&mut output, &params.coolant);

        for level in &depth_levels {
            for pass in &level.passes {
                write_pass_points(&mut output, pass);
            }
        }

        // Single retract once the finished face is cut.
        output.push_str(&format!("G0 Z{:.3}\n", clearance));
        write_coolant_off(&mut output, &params.coolant);
        output.push_str("M5\n");

        debug!(levels = depth_levels.len(), "finishing section emitted");
        output
    }

    /// Commands shared by both operations between tool change and first
    /// rapid: work-offset selection, contouring mode, rotary-axis zeroing
    /// and clamping, spindle start.
    fn operation_preamble(&self, params: &Parameters, rpm: u32) -> String {
        let mut output = String::new();
        output.push_str(params.position.reference.offset_command());
        output.push('\n');
        // Semi-precision contouring mode.
        output.push_str("G5.1 Q1 R5\n");
        output.push_str("G0 G90 B0 C0\n");
        output.push_str("M32 (Clamp C)\nM34 (Clamp B)\n");
        output.push_str(&format!("M3 S{}\n", rpm));
        output
    }

    fn create_footer(&self) -> String {
        "\nG49\nG28 G91 Z0\nG28 G91 X0 Y0\nM30\n%\n".to_string()
    }
}

fn first_point(levels: &[DepthLevel]) -> Option<&ToolPathPoint> {
    levels
        .first()
        .and_then(|level| level.passes.first())
        .and_then(|pass| pass.first())
}

/// Serialize one pass. The first point positions and plunges, the second
/// establishes the cutting feedrate, the rest are plain arc/linear moves.
fn write_pass_points(output: &mut String, points: &[ToolPathPoint]) {
    for (i, point) in points.iter().enumerate() {
        if i == 0 {
            output.push_str(&format!("G0 X{:.1} Y{:.1}\n", point.x, point.y));
            output.push_str(&format!("G1 Z{:.3} F{:.0}\n", point.z, point.feed));
        } else if i == 1 {
            output.push_str(&format!(
                "G1 X{:.1} Y{:.1} F{:.0}\n",
                point.x, point.y, point.feed
            ));
        } else if point.arc {
            // Clockwise arc around the lap corner.
            output.push_str(&format!(
                "G2 X{:.1} Y{:.1} R{:.1}\n",
                point.x, point.y, point.arc_radius
            ));
        } else {
            output.push_str(&format!("G1 X{:.1} Y{:.1}\n", point.x, point.y));
        }
    }
}

fn write_coolant_on(output: &mut String, coolant: &[CoolantSelection]) {
    for selection in coolant {
        output.push_str(&format!(
            "M{} (Turn on {})\n",
            selection.codes.on_code, selection.name
        ));
    }
}

fn write_coolant_off(output: &mut String, coolant: &[CoolantSelection]) {
    for selection in coolant {
        output.push_str(&format!(
            "M{} (Turn off {})\n",
            selection.codes.off_code, selection.name
        ));
    }
}
