//! Spiral milling path calculation.
//!
//! Computes toolpaths for face-milling using a contour-parallel strategy:
//! nested, inward-shrinking rectangles with rounded corners, one spiral per
//! depth level. The calculator is a pure function of its parameters; two
//! calls with the same input produce identical point sequences.

use crate::params::{Parameters, PositionReference};

/// One motion target in a generated toolpath. X/Y are rounded to a tenth
/// of a millimetre when the point is created; serialization emits the
/// carried values as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPathPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Feedrate for the move (mm/min); the plunge feedrate on the initial
    /// rapid point, the cutting feedrate everywhere else.
    pub feed: f64,
    pub rapid: bool,
    pub arc: bool,
    pub arc_radius: f64,
}

impl ToolPathPoint {
    fn rapid(x: f64, y: f64, z: f64, feed: f64) -> Self {
        Self {
            x,
            y,
            z,
            feed,
            rapid: true,
            arc: false,
            arc_radius: 0.0,
        }
    }

    fn line(x: f64, y: f64, z: f64, feed: f64) -> Self {
        Self {
            x,
            y,
            z,
            feed,
            rapid: false,
            arc: false,
            arc_radius: 0.0,
        }
    }

    fn arc(x: f64, y: f64, z: f64, feed: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            z,
            feed,
            rapid: false,
            arc: true,
            arc_radius: radius,
        }
    }
}

/// All passes at one target depth. Roughing produces one level per depth
/// increment; finishing produces exactly one level at the finished height.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthLevel {
    pub z_depth: f64,
    pub passes: Vec<Vec<ToolPathPoint>>,
}

/// Which operation's parameters drive the spiral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Roughing,
    Finishing,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Calculates rectangular spiral toolpaths from a validated parameter set.
pub struct SpiralPathCalculator<'a> {
    params: &'a Parameters,
    /// Corner radius snapped to whole millimetres.
    corner_radius: f64,
}

impl<'a> SpiralPathCalculator<'a> {
    pub fn new(params: &'a Parameters) -> Self {
        Self {
            params,
            corner_radius: params.machine.corner_radius.round(),
        }
    }

    /// Compute the ordered depth levels for one operation, each holding a
    /// complete spiral as a single pass. Roughing in only-finish mode
    /// yields no levels; finishing always yields exactly one level at the
    /// finished height plus one per leave increment above it.
    pub fn calculate_spiral_passes(&self, op: Operation) -> Vec<DepthLevel> {
        if op == Operation::Roughing && self.params.only_finish {
            return Vec::new();
        }

        let stock = &self.params.stock;
        let leave = if self.params.only_finish {
            0.0
        } else {
            self.params
                .roughing
                .as_ref()
                .map_or(0.0, |r| r.leave_for_finishing)
        };

        let (tool_diameter, width_of_cut, depth_of_cut, start_z, end_z, feedrate) = match op {
            Operation::Roughing => {
                let Some(roughing) = self.params.roughing.as_ref() else {
                    return Vec::new();
                };
                (
                    roughing.tool_diameter,
                    roughing.width_of_cut,
                    roughing.depth_of_cut,
                    stock.z_size,
                    stock.finished_z_height + leave,
                    roughing.feedrate,
                )
            }
            Operation::Finishing => {
                let finishing = &self.params.finishing;
                let start_z = stock.finished_z_height + leave;
                (
                    finishing.tool_diameter,
                    finishing.width_of_cut,
                    start_z - stock.finished_z_height,
                    start_z,
                    stock.finished_z_height,
                    finishing.feedrate,
                )
            }
        };

        let tool_radius = tool_diameter / 2.0;
        let plunge_feedrate = self.params.machine.plunge_feedrate;

        let mut depth_targets = Vec::new();
        let mut current_z = start_z;
        while current_z > end_z {
            let next_z = (current_z - depth_of_cut).max(end_z);
            depth_targets.push(next_z);
            current_z = next_z;
        }
        // With no leave (or in only-finish mode) the loop is a no-op for
        // finishing; the single pass at the finished height still runs.
        if depth_targets.is_empty() && op == Operation::Finishing {
            depth_targets.push(end_z);
        }

        depth_targets
            .into_iter()
            .map(|z_depth| DepthLevel {
                z_depth,
                passes: vec![self.generate_rectangular_spiral(
                    tool_radius,
                    width_of_cut,
                    z_depth,
                    feedrate,
                    plunge_feedrate,
                )],
            })
            .collect()
    }

    /// Z height for rapid traversal between operations: stock top plus the
    /// configured clearance.
    pub fn get_total_clearance_height(&self) -> f64 {
        round3(self.params.stock.z_size + self.params.machine.clearance_height)
    }

    /// One complete clockwise spiral at a single depth. Laps run as eight
    /// segments (four rounded corners, four straight edges), insetting by
    /// one stepover per lap, until the remaining rectangle no longer
    /// exceeds twice the tool radius in both axes or the stock runs out.
    fn generate_rectangular_spiral(
        &self,
        tool_radius: f64,
        width_of_cut: f64,
        z_depth: f64,
        feedrate: f64,
        plunge_feedrate: f64,
    ) -> Vec<ToolPathPoint> {
        let stock = &self.params.stock;
        let machine = &self.params.machine;
        let position = &self.params.position;

        // Work area, expanded by the stock offset on all sides.
        let mut x_min = -stock.stock_offset;
        let mut y_min = -stock.stock_offset;
        let mut x_max = stock.x_size + stock.stock_offset;
        let mut y_max = stock.y_size + stock.stock_offset;

        let mut x_stock_left = x_max - x_min;
        let mut y_stock_left = y_max - y_min;

        // G55/G56/G57 offsets shift the geometry; table-reference offsets
        // are written into the work-offset registers in the header instead.
        if position.reference != PositionReference::Table {
            x_min += position.x;
            x_max += position.x;
            y_min += position.y;
            y_max += position.y;
        }

        let corner_r = self.corner_radius;
        let stepover = self.calculate_stepover(x_max - x_min, y_max - y_min, width_of_cut);

        let mut points = Vec::new();

        // Rapid approach from outside the stock, one stepover up from the
        // bottom boundary.
        points.push(ToolPathPoint::rapid(
            round1(x_max + machine.lead_in_length + tool_radius),
            round1(y_min - tool_radius + stepover),
            z_depth,
            plunge_feedrate,
        ));

        // The first lap runs on the tool-radius boundary around the work
        // area.
        let mut cur_x_min = x_min - tool_radius;
        let mut cur_y_min = y_min - tool_radius;
        let mut cur_x_max = x_max + tool_radius;
        let mut cur_y_max = y_max + tool_radius;

        // Feed to the bottom-left corner of the first lap (the plunge move
        // lands here at cutting feedrate).
        points.push(ToolPathPoint::line(
            round1(cur_x_min + stepover + corner_r),
            round1(cur_y_min + stepover),
            z_depth,
            feedrate,
        ));

        y_stock_left -= stepover;
        if y_stock_left < 0.0 {
            // The entry pass already cleared the stock; extend it to the
            // tool-radius boundary and stop.
            points.push(ToolPathPoint::line(
                round1(cur_x_min + stepover + tool_radius),
                round1(cur_y_min + stepover),
                z_depth,
                feedrate,
            ));
            return points;
        }

        while cur_x_max - cur_x_min > tool_radius * 2.0
            && cur_y_max - cur_y_min > tool_radius * 2.0
        {
            // Step inward for this lap.
            cur_x_min += stepover;
            cur_y_min += stepover;
            cur_x_max -= stepover;
            cur_y_max -= stepover;

            // Arc at bottom-left.
            points.push(ToolPathPoint::arc(
                round1(cur_x_min),
                round1(cur_y_min + corner_r),
                z_depth,
                feedrate,
                corner_r,
            ));
            // Up the left edge.
            points.push(ToolPathPoint::line(
                round1(cur_x_min),
                round1(cur_y_max - corner_r),
                z_depth,
                feedrate,
            ));
            x_stock_left -= stepover;
            if x_stock_left < 0.0 {
                points.push(ToolPathPoint::line(
                    round1(cur_x_min),
                    round1(cur_y_max + tool_radius),
                    z_depth,
                    feedrate,
                ));
                break;
            }

            // Arc at top-left.
            points.push(ToolPathPoint::arc(
                round1(cur_x_min + corner_r),
                round1(cur_y_max),
                z_depth,
                feedrate,
                corner_r,
            ));
            // Right across the top.
            points.push(ToolPathPoint::line(
                round1(cur_x_max - corner_r),
                round1(cur_y_max),
                z_depth,
                feedrate,
            ));
            y_stock_left -= stepover;
            if y_stock_left < 0.0 {
                points.push(ToolPathPoint::line(
                    round1(cur_x_max + tool_radius),
                    round1(cur_y_max),
                    z_depth,
                    feedrate,
                ));
                break;
            }

            // Arc at top-right.
            points.push(ToolPathPoint::arc(
                round1(cur_x_max),
                round1(cur_y_max - corner_r),
                z_depth,
                feedrate,
                corner_r,
            ));
            // Down the right edge, stopping one stepover above the bottom.
            points.push(ToolPathPoint::line(
                round1(cur_x_max),
                round1(cur_y_min + stepover + corner_r),
                z_depth,
                feedrate,
            ));
            x_stock_left -= stepover;
            if x_stock_left < 0.0 {
                points.push(ToolPathPoint::line(
                    round1(cur_x_max),
                    round1(cur_y_min - tool_radius),
                    z_depth,
                    feedrate,
                ));
                break;
            }

            // Arc at bottom-right.
            points.push(ToolPathPoint::arc(
                round1(cur_x_max - corner_r),
                round1(cur_y_min + stepover),
                z_depth,
                feedrate,
                corner_r,
            ));
            // Left across the bottom, to the start of the next lap.
            points.push(ToolPathPoint::line(
                round1(cur_x_min + stepover + corner_r),
                round1(cur_y_min + stepover),
                z_depth,
                feedrate,
            ));
            y_stock_left -= stepover;
            if y_stock_left < 0.0 {
                points.push(ToolPathPoint::line(
                    round1(cur_x_min + stepover - tool_radius),
                    round1(cur_y_min + stepover),
                    z_depth,
                    feedrate,
                ));
                break;
            }
        }

        points
    }

    /// Stepover that never exceeds the configured width of cut while
    /// distributing laps evenly; the lap count forces the last cut to
    /// overlap the previous one by the configured amount.
    fn calculate_stepover(&self, width: f64, height: f64, width_of_cut: f64) -> f64 {
        let span = width.min(height);
        let overlap = self.params.machine.last_cut_overlap;
        let laps = ((span + overlap) / width_of_cut).floor() + 1.0;
        round1((span + overlap) / laps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{
        CoolantSelection, Finishing, MachineSettings, Parameters, Position, Roughing, Stock,
    };

    fn test_parameters() -> Parameters {
        Parameters {
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
            roughing: Some(Roughing {
                tool_number: 55,
                tool_diameter: 63.0,
                depth_of_cut: 5.0,
                leave_for_finishing: 1.0,
                width_of_cut: 30.0,
                rpm: 6500,
                feedrate: 7000.0,
            }),
            finishing: Finishing {
                tool_number: 1,
                tool_diameter: 80.0,
                width_of_cut: 53.0,
                rpm: 4000,
                feedrate: 3000.0,
            },
            machine: MachineSettings {
                table_reference_x: -2600.0,
                table_reference_y: -1500.0,
                table_reference_z: -1171.193,
                clearance_height: 50.0,
                plunge_feedrate: 500.0,
                lead_in_length: 10.0,
                corner_radius: 4.0,
                last_cut_overlap: 10.0,
                program_name: "FACEMILLING".to_string(),
                append_timestamp: false,
                output_path: ".".into(),
            },
            coolant: Vec::<CoolantSelection>::new(),
            only_finish: false,
        }
    }

    #[test]
    fn roughing_depths_descend_to_target() {
        let params = test_parameters();
        let calc = SpiralPathCalculator::new(&params);
        let levels = calc.calculate_spiral_passes(Operation::Roughing);

        let depths: Vec<f64> = levels.iter().map(|l| l.z_depth).collect();
        assert_eq!(depths, vec![145.0, 141.0]);

        // Strictly decreasing, each step bounded by the depth of cut,
        // landing exactly on finished height plus leave.
        let mut previous = params.stock.z_size;
        for &depth in &depths {
            assert!(depth < previous);
            assert!(previous - depth <= 5.0 + 1e-9);
            previous = depth;
        }
        assert_eq!(depths.last().copied(), Some(141.0));
    }

    #[test]
    fn uneven_final_step_is_clamped() {
        let mut params = test_parameters();
        params.roughing.as_mut().unwrap().depth_of_cut = 4.0;
        let calc = SpiralPathCalculator::new(&params);
        let depths: Vec<f64> = calc
            .calculate_spiral_passes(Operation::Roughing)
            .iter()
            .map(|l| l.z_depth)
            .collect();
        // 150 -> 146 -> 142 -> 141 (last step shortened to 1mm).
        assert_eq!(depths, vec![146.0, 142.0, 141.0]);
    }

    #[test]
    fn finishing_is_single_level_at_finished_height() {
        let params = test_parameters();
        let calc = SpiralPathCalculator::new(&params);
        let levels = calc.calculate_spiral_passes(Operation::Finishing);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].z_depth, 140.0);
        assert_eq!(levels[0].passes.len(), 1);
    }

    #[test]
    fn only_finish_skips_roughing_but_not_finishing() {
        let mut params = test_parameters();
        params.only_finish = true;
        let calc = SpiralPathCalculator::new(&params);

        assert!(calc.calculate_spiral_passes(Operation::Roughing).is_empty());

        let levels = calc.calculate_spiral_passes(Operation::Finishing);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].z_depth, 140.0);
    }

    #[test]
    fn all_points_in_a_level_share_its_depth() {
        let params = test_parameters();
        let calc = SpiralPathCalculator::new(&params);
        for level in calc.calculate_spiral_passes(Operation::Roughing) {
            for pass in &level.passes {
                assert!(pass.iter().all(|p| p.z == level.z_depth));
            }
        }
    }

    #[test]
    fn stepover_never_exceeds_width_of_cut() {
        let params = test_parameters();
        let calc = SpiralPathCalculator::new(&params);
        // span 300 + overlap 10 over 11 laps -> 28.2
        assert_eq!(calc.calculate_stepover(400.0, 300.0, 30.0), 28.2);

        for (w, h, woc) in [
            (400.0, 300.0, 30.0),
            (1000.0, 1000.0, 63.0),
            (50.0, 50.0, 5.0),
            (333.3, 777.7, 41.9),
        ] {
            let stepover = calc.calculate_stepover(w, h, woc);
            assert!(
                stepover <= woc + 1e-9,
                "stepover {stepover} exceeds width of cut {woc}"
            );
        }
    }

    #[test]
    fn spiral_starts_with_rapid_outside_stock() {
        let params = test_parameters();
        let calc = SpiralPathCalculator::new(&params);
        let levels = calc.calculate_spiral_passes(Operation::Roughing);
        let first = &levels[0].passes[0][0];

        // x_max + lead-in + tool radius; one stepover up from the bottom
        // tool-radius boundary.
        assert!(first.rapid);
        assert_eq!(first.x, 441.5);
        assert_eq!(first.y, -3.3);
        assert_eq!(first.feed, 500.0);

        let second = &levels[0].passes[0][1];
        assert!(!second.rapid);
        assert_eq!(second.feed, 7000.0);
    }

    #[test]
    fn offset_reference_shifts_geometry() {
        let mut params = test_parameters();
        params.position.reference = PositionReference::G56;
        params.position.x = 100.0;
        params.position.y = -50.0;
        let calc = SpiralPathCalculator::new(&params);
        let shifted = calc.calculate_spiral_passes(Operation::Roughing);

        params.position.reference = PositionReference::Table;
        let calc = SpiralPathCalculator::new(&params);
        let table = calc.calculate_spiral_passes(Operation::Roughing);

        let a = &shifted[0].passes[0][0];
        let b = &table[0].passes[0][0];
        assert_eq!(a.x, b.x + 100.0);
        assert_eq!(a.y, b.y - 50.0);
    }

    #[test]
    fn table_reference_leaves_geometry_alone() {
        let mut params = test_parameters();
        params.position.x = 250.0;
        params.position.y = 99.0;
        let calc = SpiralPathCalculator::new(&params);
        let levels = calc.calculate_spiral_passes(Operation::Roughing);
        // Table offsets only affect the program header.
        assert_eq!(levels[0].passes[0][0].x, 441.5);
    }

    #[test]
    fn single_point_clearing_for_narrow_stock() {
        let mut params = test_parameters();
        params.stock.x_size = 50.0;
        params.stock.y_size = 50.0;
        params.stock.finished_z_height = 10.0;
        let roughing = params.roughing.as_mut().unwrap();
        roughing.width_of_cut = 63.0;
        roughing.depth_of_cut = 100.0;
        let calc = SpiralPathCalculator::new(&params);

        let levels = calc.calculate_spiral_passes(Operation::Roughing);
        // stepover = (50 + 10) / 1 = 60 consumes the full 50mm of stock on
        // the entry pass: rapid, plunge target, extension, nothing else.
        let pass = &levels[0].passes[0];
        assert_eq!(pass.len(), 3);
        assert!(pass[0].rapid);
        assert!(!pass[1].rapid && !pass[2].rapid);
    }

    #[test]
    fn spiral_terminates_within_lap_bound() {
        let params = test_parameters();
        let calc = SpiralPathCalculator::new(&params);
        let levels = calc.calculate_spiral_passes(Operation::Roughing);
        // Each lap is at most 9 points; lap count is bounded by
        // span / stepover.
        let max_laps = (300.0_f64 / 28.2).ceil() as usize + 2;
        for level in levels {
            assert!(level.passes[0].len() <= max_laps * 9);
        }
    }

    #[test]
    fn identical_parameters_yield_identical_paths() {
        let params = test_parameters();
        let calc = SpiralPathCalculator::new(&params);
        let a = calc.calculate_spiral_passes(Operation::Roughing);
        let b = calc.calculate_spiral_passes(Operation::Roughing);
        assert_eq!(a, b);
    }

    #[test]
    fn coordinates_are_rounded_to_tenths() {
        let mut params = test_parameters();
        params.stock.x_size = 333.33;
        params.stock.y_size = 277.77;
        let calc = SpiralPathCalculator::new(&params);
        for level in calc.calculate_spiral_passes(Operation::Roughing) {
            for point in &level.passes[0] {
                assert_eq!(point.x, (point.x * 10.0).round() / 10.0);
                assert_eq!(point.y, (point.y * 10.0).round() / 10.0);
            }
        }
    }

    #[test]
    fn clearance_height_sits_above_stock_top() {
        let params = test_parameters();
        let calc = SpiralPathCalculator::new(&params);
        assert_eq!(calc.get_total_clearance_height(), 200.0);
    }

    #[test]
    fn finishing_starts_above_leave_allowance() {
        let params = test_parameters();
        let calc = SpiralPathCalculator::new(&params);
        let levels = calc.calculate_spiral_passes(Operation::Finishing);
        // start 141, end 140, depth of cut 1 -> one level at 140.
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].z_depth, 140.0);
    }
}
