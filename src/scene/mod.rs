// Animation host interface
//
// The exporter only talks to the animation host through `Scene`: resolve objects
// by name, evaluate their pose at an explicit frame, and write rotation
// keyframes back. `MemoryScene` is the JSON-backed implementation used by the
// command line tool and the tests.

mod memory;

use serde::{Deserialize, Serialize};

use crate::messages::{Pose, Vec3};

pub use memory::{MemoryScene, RotationCurve, ScalarKey, SceneObject, TransformKey};

/// Handle to an object resolved from a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Euler rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component of `v` along this axis
    pub fn of(self, v: &Vec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    pub fn set(self, v: &mut Vec3, value: f64) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

pub trait Scene {
    /// Inclusive (start, end) frame range of the animation
    fn frame_range(&self) -> (i32, i32);

    fn resolve(&self, name: &str) -> Option<ObjectId>;

    /// Evaluate an object's transform at `frame`; world location, euler rotation in radians
    fn pose_at(&self, object: ObjectId, frame: i32) -> Pose;

    /// Drop the rotation track on `axis`. Returns true if one existed.
    fn clear_rotation_track(&mut self, object: ObjectId, axis: Axis) -> bool;

    /// Insert or replace the rotation keyframe at `frame`
    fn write_rotation_keyframe(&mut self, object: ObjectId, axis: Axis, frame: i32, angle: f64);
}
