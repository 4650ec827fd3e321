// In-memory animation scene loaded from / saved to JSON

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Axis, ObjectId, Scene};
use crate::error::Result;
use crate::messages::{Pose, Vec3};

/// Keyed transform of an object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformKey {
    pub frame: i32,
    #[serde(default)]
    pub location: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarKey {
    pub frame: i32,
    pub value: f64,
}

/// Single-axis rotation track; overrides that rotation component when present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationCurve {
    pub axis: Axis,
    pub keys: Vec<ScalarKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub keyframes: Vec<TransformKey>,
    #[serde(default)]
    pub rotation_curves: Vec<RotationCurve>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, keyframes: Vec<TransformKey>) -> Self {
        let mut obj = Self {
            name: name.into(),
            keyframes,
            rotation_curves: Vec::new(),
        };
        obj.sort_keys();
        obj
    }

    fn sort_keys(&mut self) {
        self.keyframes.sort_by_key(|k| k.frame);
        for curve in &mut self.rotation_curves {
            curve.keys.sort_by_key(|k| k.frame);
        }
    }

    fn pose_at(&self, frame: i32) -> Pose {
        let mut pose = match segment(&self.keyframes, frame, |k| k.frame) {
            None => Pose::default(),
            Some((a, b, t)) => Pose {
                location: a.location.lerp(&b.location, t),
                rotation: a.rotation.lerp(&b.rotation, t),
            },
        };

        for curve in &self.rotation_curves {
            if let Some((a, b, t)) = segment(&curve.keys, frame, |k| k.frame) {
                curve.axis.set(&mut pose.rotation, a.value + (b.value - a.value) * t);
            }
        }
        pose
    }
}

/// Find the keys surrounding `frame` and the blend factor between them.
/// Frames outside the keyed range hold the nearest key.
fn segment<K>(keys: &[K], frame: i32, frame_of: impl Fn(&K) -> i32) -> Option<(&K, &K, f64)> {
    let first = keys.first()?;
    let last = keys.last()?;
    if frame <= frame_of(first) {
        return Some((first, first, 0.0));
    }
    if frame >= frame_of(last) {
        return Some((last, last, 0.0));
    }

    // Index of the first key after `frame`; always in 1..len here
    let next = keys.partition_point(|k| frame_of(k) <= frame);
    let (a, b) = (&keys[next - 1], &keys[next]);
    let span = (frame_of(b) - frame_of(a)) as f64;
    Some((a, b, (frame - frame_of(a)) as f64 / span))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryScene {
    pub frame_start: i32,
    pub frame_end: i32,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl MemoryScene {
    pub fn new(frame_start: i32, frame_end: i32) -> Self {
        Self {
            frame_start,
            frame_end,
            objects: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut scene: MemoryScene = serde_json::from_str(json)?;
        for obj in &mut scene.objects {
            obj.sort_keys();
        }
        Ok(scene)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading scene from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    pub fn object(&self, id: ObjectId) -> &SceneObject {
        &self.objects[id.0]
    }

    /// Keys of the rotation track on `axis`, if any
    pub fn rotation_curve(&self, id: ObjectId, axis: Axis) -> Option<&[ScalarKey]> {
        self.object(id)
            .rotation_curves
            .iter()
            .find(|c| c.axis == axis)
            .map(|c| c.keys.as_slice())
    }
}

impl Scene for MemoryScene {
    fn frame_range(&self) -> (i32, i32) {
        (self.frame_start, self.frame_end)
    }

    fn resolve(&self, name: &str) -> Option<ObjectId> {
        self.objects.iter().position(|o| o.name == name).map(ObjectId)
    }

    fn pose_at(&self, object: ObjectId, frame: i32) -> Pose {
        self.object(object).pose_at(frame)
    }

    fn clear_rotation_track(&mut self, object: ObjectId, axis: Axis) -> bool {
        let curves = &mut self.objects[object.0].rotation_curves;
        let before = curves.len();
        curves.retain(|c| c.axis != axis);
        curves.len() != before
    }

    fn write_rotation_keyframe(&mut self, object: ObjectId, axis: Axis, frame: i32, angle: f64) {
        let curves = &mut self.objects[object.0].rotation_curves;
        let idx = match curves.iter().position(|c| c.axis == axis) {
            Some(idx) => idx,
            None => {
                curves.push(RotationCurve {
                    axis,
                    keys: Vec::new(),
                });
                curves.len() - 1
            }
        };

        let keys = &mut curves[idx].keys;
        let key = ScalarKey { frame, value: angle };
        match keys.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => keys[i] = key,
            Err(i) => keys.insert(i, key),
        }
    }
}
