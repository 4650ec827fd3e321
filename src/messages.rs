// Define record types flowing through the exporter

use serde::{Deserialize, Serialize};

/// World-space point or euler triple (x, y, z)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Length of the projection onto the ground (XY) plane
    pub fn horizontal_length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn lerp(&self, other: &Vec3, t: f64) -> Vec3 {
        Vec3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Evaluated transform of a scene object at one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub location: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
}

// Input to the converter, one per frame
// Produced by sampling the scene; the converter never touches the scene itself
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    pub frame: i32,
    pub body_position: Vec3,
    /// Rotation about the vertical axis (rad)
    pub body_heading: f64,
    /// Head pan (rad)
    pub head_pan: f64,
}

// Output of the converter -> firmware command file / keyframe baker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    pub frame: i32,
    pub servo_us: f64,
    pub cumulative_right_ticks: i64,
    pub cumulative_left_ticks: i64,
}

/// Signed per-frame wheel deltas (right, left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelTicks {
    pub right: i64,
    pub left: i64,
}

impl WheelTicks {
    pub fn new(right: i64, left: i64) -> Self {
        Self { right, left }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_length_ignores_vertical() {
        let v = Vec3::new(3.0, 4.0, 100.0);
        assert_eq!(v.horizontal_length(), 5.0);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(2.0, -4.0, 6.0);
        assert_eq!(a.lerp(&b, 0.5), Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn test_drive_command_json_shape() {
        let cmd = DriveCommand {
            frame: 3,
            servo_us: 1500.0,
            cumulative_right_ticks: -4,
            cumulative_left_ticks: 4,
        };
        let json = serde_json::to_value(cmd).unwrap();
        assert_eq!(json["cumulative_right_ticks"], -4);
        assert_eq!(json["frame"], 3);
    }
}
