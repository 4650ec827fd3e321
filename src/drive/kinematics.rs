// Differential drive kinematics for the Playbot base
// Converts a sampled body trajectory into cumulative left/right encoder ticks.

use tracing::debug;

use super::units::{radians_to_ticks, rotation_to_microseconds};
use crate::config::TURN_THRESHOLD_RAD;
use crate::messages::{DriveCommand, FrameSample, WheelTicks};

/// Wheel configuration for one conversion run (validated by `ExporterConfig::validate`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotGeometry {
    pub wheel_diameter: f64,      // mm
    pub wheel_spacing: f64,       // mm, between wheel contact centers
    pub ticks_per_revolution: u32,
}

impl RobotGeometry {
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_diameter / 2.0
    }

    /// Ticks for a wheel rolling `distance` mm along the ground
    fn ticks_for_arc(&self, distance: f64) -> i64 {
        let wheel_angle = distance / self.wheel_radius();
        radians_to_ticks(wheel_angle, self.ticks_per_revolution)
    }
}

/// Wheel tick deltas for the motion between two consecutive samples
///
/// A heading change above `TURN_THRESHOLD_RAD` is a turn in place and any
/// translation during that frame is ignored. Otherwise the frame is a straight
/// move and both wheels get the same delta.
pub fn frame_delta(geometry: &RobotGeometry, prev: &FrameSample, current: &FrameSample) -> WheelTicks {
    let heading_delta = current.body_heading - prev.body_heading;

    if heading_delta.abs() > TURN_THRESHOLD_RAD {
        let arc_length = geometry.wheel_spacing * heading_delta.abs() / 2.0;
        let turn_ticks = geometry.ticks_for_arc(arc_length);

        if heading_delta > 0.0 {
            WheelTicks::new(turn_ticks, -turn_ticks)
        } else {
            WheelTicks::new(-turn_ticks, turn_ticks)
        }
    } else {
        let movement = current.body_position - prev.body_position;
        let ticks = geometry.ticks_for_arc(movement.horizontal_length());

        // The body faces -Y: a negative Y displacement is forward
        let ticks = if movement.y < 0.0 { ticks } else { -ticks };
        WheelTicks::new(ticks, ticks)
    }
}

/// Convert a sampled trajectory into one drive command per sample
///
/// The first sample is the reference pose and always carries zero ticks.
/// An empty trajectory yields no commands.
pub fn convert(samples: &[FrameSample], geometry: &RobotGeometry) -> Vec<DriveCommand> {
    let mut commands = Vec::with_capacity(samples.len());
    let mut total = WheelTicks::zero();
    let mut prev: Option<&FrameSample> = None;

    for sample in samples {
        if let Some(prev) = prev {
            let delta = frame_delta(geometry, prev, sample);
            debug!(
                "Frame {}: right={:+}, left={:+}",
                sample.frame, delta.right, delta.left
            );
            total.right += delta.right;
            total.left += delta.left;
        }

        commands.push(DriveCommand {
            frame: sample.frame,
            servo_us: rotation_to_microseconds(sample.head_pan),
            cumulative_right_ticks: total.right,
            cumulative_left_ticks: total.left,
        });
        prev = Some(sample);
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Vec3;
    use std::f64::consts::TAU;

    fn geometry() -> RobotGeometry {
        RobotGeometry {
            wheel_diameter: 33.5,
            wheel_spacing: 81.0,
            ticks_per_revolution: 813,
        }
    }

    fn sample(frame: i32, x: f64, y: f64, heading: f64) -> FrameSample {
        FrameSample {
            frame,
            body_position: Vec3::new(x, y, 0.0),
            body_heading: heading,
            head_pan: 0.0,
        }
    }

    #[test]
    fn test_empty_trajectory() {
        assert!(convert(&[], &geometry()).is_empty());
    }

    #[test]
    fn test_first_frame_is_zero() {
        let samples = [
            FrameSample {
                head_pan: 0.4,
                ..sample(12, 250.0, -30.0, 1.2)
            },
            sample(13, 250.0, -60.0, 1.2),
        ];
        let commands = convert(&samples, &geometry());
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].frame, 12);
        assert_eq!(commands[0].cumulative_right_ticks, 0);
        assert_eq!(commands[0].cumulative_left_ticks, 0);
        assert_eq!(commands[0].servo_us, rotation_to_microseconds(0.4));
    }

    #[test]
    fn test_straight_line_forward() {
        let d = 10.0;
        let n = 5;
        let samples: Vec<_> = (0..=n)
            .map(|i| sample(i + 1, 0.0, -d * i as f64, 0.0))
            .collect();
        let commands = convert(&samples, &geometry());

        let per_frame = ((d / 16.75) / TAU * 813.0).round() as i64;
        assert_eq!(per_frame, 77);
        let last = commands.last().unwrap();
        assert_eq!(last.frame, n + 1);
        assert_eq!(last.cumulative_right_ticks, n as i64 * per_frame);
        assert_eq!(last.cumulative_left_ticks, n as i64 * per_frame);
    }

    #[test]
    fn test_straight_line_backward() {
        let samples = [sample(1, 0.0, 0.0, 0.0), sample(2, 0.0, 10.0, 0.0)];
        let commands = convert(&samples, &geometry());
        assert_eq!(commands[1].cumulative_right_ticks, -77);
        assert_eq!(commands[1].cumulative_left_ticks, -77);
    }

    #[test]
    fn test_vertical_motion_ignored() {
        let prev = sample(1, 0.0, 0.0, 0.0);
        let current = FrameSample {
            body_position: Vec3::new(0.0, 0.0, 50.0),
            ..sample(2, 0.0, 0.0, 0.0)
        };
        assert_eq!(frame_delta(&geometry(), &prev, &current), WheelTicks::zero());
    }

    #[test]
    fn test_turn_right() {
        // arc = 81 * 0.5 / 2 = 20.25mm -> 1.2089 rad -> 156.4 ticks
        let delta = frame_delta(&geometry(), &sample(1, 0.0, 0.0, 0.0), &sample(2, 0.0, 0.0, 0.5));
        assert_eq!(delta, WheelTicks::new(156, -156));
    }

    #[test]
    fn test_turn_symmetric() {
        let g = geometry();
        for theta in [0.02, 0.1, 0.5, 1.0, 3.0] {
            let right = frame_delta(&g, &sample(1, 0.0, 0.0, 0.0), &sample(2, 0.0, 0.0, theta));
            let left = frame_delta(&g, &sample(1, 0.0, 0.0, 0.0), &sample(2, 0.0, 0.0, -theta));
            assert_eq!(right.right, left.left, "theta {}", theta);
            assert_eq!(right.left, left.right, "theta {}", theta);
            assert_eq!(right.right, -right.left);
        }
    }

    #[test]
    fn test_turn_discards_translation() {
        let g = geometry();
        let turning = frame_delta(&g, &sample(1, 0.0, 0.0, 0.0), &sample(2, 40.0, -200.0, 0.5));
        let in_place = frame_delta(&g, &sample(1, 0.0, 0.0, 0.0), &sample(2, 0.0, 0.0, 0.5));
        assert_eq!(turning, in_place);
    }

    #[test]
    fn test_small_rotation_is_translation() {
        // 0.005 rad is below the turn threshold: no movement, no ticks
        let delta = frame_delta(&geometry(), &sample(1, 0.0, 0.0, 0.0), &sample(2, 0.0, 0.0, 0.005));
        assert_eq!(delta, WheelTicks::zero());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let g = geometry();
        // Exactly 0.01 rad is still a straight move
        let at = frame_delta(&g, &sample(1, 0.0, 0.0, 0.0), &sample(2, 0.0, -10.0, 0.01));
        assert_eq!(at, WheelTicks::new(77, 77));

        let above = frame_delta(&g, &sample(1, 0.0, 0.0, 0.0), &sample(2, 0.0, -10.0, 0.0101));
        assert_eq!(above.right, -above.left);
        assert!(above.right > 0);
    }

    #[test]
    fn test_cumulative_mixes_turns_and_moves() {
        let samples = [
            sample(1, 0.0, 0.0, 0.0),
            sample(2, 0.0, -10.0, 0.0), // +77 both
            sample(3, 0.0, -10.0, 0.5), // +156 right, -156 left
            sample(4, 0.0, -10.0, 0.0), // -156 right, +156 left
            sample(5, 0.0, 0.0, 0.0),   // -77 both
        ];
        let commands = convert(&samples, &geometry());
        let totals: Vec<_> = commands
            .iter()
            .map(|c| (c.cumulative_right_ticks, c.cumulative_left_ticks))
            .collect();
        assert_eq!(totals, vec![(0, 0), (77, 77), (233, -79), (77, 77), (0, 0)]);
    }
}
