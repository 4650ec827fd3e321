// Optional per-frame preview rendering alongside an export
//
// Rendering is a side feature: every failure is a `RenderError` that the
// exporter reports as a warning before moving on to the next frame.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::messages::Pose;
use crate::scene::{ObjectId, Scene};

pub trait FrameRenderer {
    /// File extension of rendered frames
    fn extension(&self) -> &str {
        "png"
    }

    /// Called once before the first frame
    fn begin(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn render(&mut self, scene: &dyn Scene, frame: i32, path: &Path) -> Result<(), RenderError>;

    /// Called once after the last frame, also when `begin` or any frame failed
    fn finish(&mut self) {}
}

/// `anim.txt` -> `anim_frames`
pub fn render_dir_for(output: &Path) -> PathBuf {
    let mut dir = output.with_extension("").into_os_string();
    dir.push("_frames");
    PathBuf::from(dir)
}

/// `frame_0007.png`
pub fn frame_file_name(frame: i32, extension: &str) -> String {
    format!("frame_{:04}.{}", frame, extension)
}

/// Writes the evaluated pose of each tracked object as one JSON file per frame
pub struct PoseSnapshotRenderer {
    objects: Vec<(String, ObjectId)>,
}

impl PoseSnapshotRenderer {
    pub fn new(objects: Vec<(String, ObjectId)>) -> Self {
        Self { objects }
    }
}

impl FrameRenderer for PoseSnapshotRenderer {
    fn extension(&self) -> &str {
        "json"
    }

    fn render(&mut self, scene: &dyn Scene, frame: i32, path: &Path) -> Result<(), RenderError> {
        let poses: BTreeMap<&str, Pose> = self
            .objects
            .iter()
            .map(|(name, id)| (name.as_str(), scene.pose_at(*id, frame)))
            .collect();

        let json = serde_json::to_string_pretty(&poses).map_err(|e| RenderError::Unsupported {
            frame,
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(|source| RenderError::Io {
            frame,
            path: path.to_path_buf(),
            source,
        })
    }
}
