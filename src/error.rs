// Error kinds surfaced by an export or bake run

use std::path::PathBuf;

/// Fatal errors: the run aborts and no output file is written
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Object '{name}' not found in scene. Check names.")]
    ObjectNotFound { name: String },

    #[error("Invalid robot geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("Invalid frame range: start {start} is after end {end}")]
    InvalidFrameRange { start: i32, end: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file is not valid: {0}")]
    SceneFormat(#[from] serde_json::Error),

    #[error("Malformed command on line {line}: {reason}")]
    MalformedCommand { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Per-frame rendering failure; reported as a warning, never aborts the export
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Could not render frame {frame} to {}: {source}", .path.display())]
    Io {
        frame: i32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not render frame {frame}: {reason}")]
    Unsupported { frame: i32, reason: String },
}
