// Defaults, axis conventions and user-facing options
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::drive::RobotGeometry;
use crate::error::{ExportError, Result};
use crate::scene::Axis;

// Heading changes above this (rad) are classified as a turn in place
pub const TURN_THRESHOLD_RAD: f64 = 0.01;

// Servo: 1500us center, +/-500us for +/-90 degrees
pub const SERVO_CENTER_US: f64 = 1500.0;
pub const SERVO_MIN_US: f64 = 1000.0;
pub const SERVO_MAX_US: f64 = 2000.0;
pub const SERVO_US_PER_DEG: f64 = 500.0 / 90.0;

// Object names as they appear in the animation scene
pub const DEFAULT_BODY_NAME: &str = "body";
pub const DEFAULT_HEAD_NAME: &str = "head";
pub const DEFAULT_LEFT_WHEEL_NAME: &str = "L_Wheel";
pub const DEFAULT_RIGHT_WHEEL_NAME: &str = "R_Wheel";

// Robot geometry
pub const DEFAULT_WHEEL_DIAMETER_MM: f64 = 33.5;
pub const DEFAULT_WHEEL_SPACING_MM: f64 = 81.0;
pub const DEFAULT_TICKS_PER_REV: u32 = 813;
pub const MIN_WHEEL_DIAMETER_MM: f64 = 1.0;
pub const MIN_WHEEL_SPACING_MM: f64 = 1.0;
pub const MIN_TICKS_PER_REV: u32 = 1;

// Rig conventions: the body faces -Y, turns about Z, the head pans about Y
// and wheels spin about their local Y
pub const HEADING_AXIS: Axis = Axis::Z;
pub const PAN_AXIS: Axis = Axis::Y;
pub const WHEEL_AXIS: Axis = Axis::Y;

/// Options recognized by the exporter
#[derive(Debug, Clone, PartialEq, Args, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Name of the robot's body object
    #[arg(long, default_value = DEFAULT_BODY_NAME)]
    pub body_name: String,

    /// Name of the robot's head (servo) object
    #[arg(long, default_value = DEFAULT_HEAD_NAME)]
    pub head_name: String,

    /// Name of the left wheel object
    #[arg(long, default_value = DEFAULT_LEFT_WHEEL_NAME)]
    pub left_wheel_name: String,

    /// Name of the right wheel object
    #[arg(long, default_value = DEFAULT_RIGHT_WHEEL_NAME)]
    pub right_wheel_name: String,

    /// Wheel diameter in millimeters
    #[arg(long, default_value_t = DEFAULT_WHEEL_DIAMETER_MM)]
    pub wheel_diameter_mm: f64,

    /// Distance between wheel centers in millimeters
    #[arg(long, default_value_t = DEFAULT_WHEEL_SPACING_MM)]
    pub wheel_spacing_mm: f64,

    /// Number of encoder ticks per wheel revolution
    #[arg(long, default_value_t = DEFAULT_TICKS_PER_REV)]
    pub ticks_per_rev: u32,

    /// Export rendered frames along with animation data
    #[arg(long)]
    pub render_frames: bool,

    /// First frame to export (defaults to the scene's start frame)
    #[arg(long)]
    pub frame_start: Option<i32>,

    /// Last frame to export (defaults to the scene's end frame)
    #[arg(long)]
    pub frame_end: Option<i32>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            body_name: DEFAULT_BODY_NAME.to_string(),
            head_name: DEFAULT_HEAD_NAME.to_string(),
            left_wheel_name: DEFAULT_LEFT_WHEEL_NAME.to_string(),
            right_wheel_name: DEFAULT_RIGHT_WHEEL_NAME.to_string(),
            wheel_diameter_mm: DEFAULT_WHEEL_DIAMETER_MM,
            wheel_spacing_mm: DEFAULT_WHEEL_SPACING_MM,
            ticks_per_rev: DEFAULT_TICKS_PER_REV,
            render_frames: false,
            frame_start: None,
            frame_end: None,
        }
    }
}

impl ExporterConfig {
    /// Check the geometry options and build the converter's geometry
    pub fn validate(&self) -> Result<RobotGeometry> {
        check_length("wheel diameter", self.wheel_diameter_mm, MIN_WHEEL_DIAMETER_MM)?;
        check_length("wheel spacing", self.wheel_spacing_mm, MIN_WHEEL_SPACING_MM)?;
        if self.ticks_per_rev < MIN_TICKS_PER_REV {
            return Err(ExportError::InvalidGeometry {
                reason: format!(
                    "ticks per revolution must be at least {}, got {}",
                    MIN_TICKS_PER_REV, self.ticks_per_rev
                ),
            });
        }

        Ok(RobotGeometry {
            wheel_diameter: self.wheel_diameter_mm,
            wheel_spacing: self.wheel_spacing_mm,
            ticks_per_revolution: self.ticks_per_rev,
        })
    }

    /// Resolve the frame range, falling back to the scene's own range
    pub fn frame_range(&self, scene_range: (i32, i32)) -> Result<(i32, i32)> {
        let start = self.frame_start.unwrap_or(scene_range.0);
        let end = self.frame_end.unwrap_or(scene_range.1);
        if start > end {
            return Err(ExportError::InvalidFrameRange { start, end });
        }
        Ok((start, end))
    }
}

fn check_length(what: &str, value_mm: f64, min_mm: f64) -> Result<()> {
    if !value_mm.is_finite() || value_mm < min_mm {
        return Err(ExportError::InvalidGeometry {
            reason: format!("{} must be at least {} mm, got {}", what, min_mm, value_mm),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let geometry = ExporterConfig::default().validate().unwrap();
        assert_eq!(geometry.wheel_diameter, 33.5);
        assert_eq!(geometry.wheel_spacing, 81.0);
        assert_eq!(geometry.ticks_per_revolution, 813);
    }

    #[test]
    fn test_rejects_zero_diameter() {
        let config = ExporterConfig {
            wheel_diameter_mm: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExportError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_or_nan_spacing() {
        for spacing in [-81.0, f64::NAN, 0.5] {
            let config = ExporterConfig {
                wheel_spacing_mm: spacing,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "spacing {} accepted", spacing);
        }
    }

    #[test]
    fn test_rejects_zero_ticks() {
        let config = ExporterConfig {
            ticks_per_rev: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ticks per revolution"));
    }

    #[test]
    fn test_frame_range_override() {
        let config = ExporterConfig {
            frame_end: Some(40),
            ..Default::default()
        };
        assert_eq!(config.frame_range((1, 250)).unwrap(), (1, 40));

        let inverted = ExporterConfig {
            frame_start: Some(10),
            frame_end: Some(5),
            ..Default::default()
        };
        assert!(matches!(
            inverted.frame_range((1, 250)),
            Err(ExportError::InvalidFrameRange { start: 10, end: 5 })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExporterConfig =
            serde_json::from_str(r#"{ "ticks_per_rev": 870, "body_name": "chassis" }"#).unwrap();
        assert_eq!(config.ticks_per_rev, 870);
        assert_eq!(config.body_name, "chassis");
        assert_eq!(config.head_name, DEFAULT_HEAD_NAME);
        assert_eq!(config.wheel_diameter_mm, DEFAULT_WHEEL_DIAMETER_MM);
    }
}
