// Export and bake runs
// Resolve the rig, sample the trajectory, convert to drive commands, then write
// the firmware file and/or bake wheel rotations back into the scene.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{ExporterConfig, HEADING_AXIS, PAN_AXIS, WHEEL_AXIS};
use crate::drive::{self, RobotGeometry, ticks_to_radians};
use crate::error::{ExportError, RenderError, Result};
use crate::messages::{DriveCommand, FrameSample};
use crate::render::{FrameRenderer, frame_file_name, render_dir_for};
use crate::scene::{ObjectId, Scene};

/// The four scene objects making up the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotRig {
    pub body: ObjectId,
    pub head: ObjectId,
    pub left_wheel: ObjectId,
    pub right_wheel: ObjectId,
}

impl RobotRig {
    /// Resolve all objects by name; the first missing one is an error
    pub fn resolve<S: Scene + ?Sized>(scene: &S, config: &ExporterConfig) -> Result<Self> {
        let find = |name: &str| {
            scene.resolve(name).ok_or_else(|| ExportError::ObjectNotFound {
                name: name.to_string(),
            })
        };

        Ok(Self {
            body: find(&config.body_name)?,
            head: find(&config.head_name)?,
            left_wheel: find(&config.left_wheel_name)?,
            right_wheel: find(&config.right_wheel_name)?,
        })
    }
}

/// Read body pose and head pan for every frame in `start..=end`
pub fn sample_trajectory<S: Scene + ?Sized>(
    scene: &S,
    rig: &RobotRig,
    (start, end): (i32, i32),
) -> Vec<FrameSample> {
    (start..=end)
        .map(|frame| {
            let body = scene.pose_at(rig.body, frame);
            let head = scene.pose_at(rig.head, frame);
            FrameSample {
                frame,
                body_position: body.location,
                body_heading: HEADING_AXIS.of(&body.rotation),
                head_pan: PAN_AXIS.of(&head.rotation),
            }
        })
        .collect()
}

/// Write cumulative wheel ticks as rotation keyframes on both wheels
///
/// Any existing track on the wheel axis is dropped first, so baking the same
/// commands twice leaves identical keyframes.
pub fn bake_wheels<S: Scene + ?Sized>(
    scene: &mut S,
    rig: &RobotRig,
    commands: &[DriveCommand],
    ticks_per_revolution: u32,
) {
    for (wheel, is_left) in [(rig.left_wheel, true), (rig.right_wheel, false)] {
        if scene.clear_rotation_track(wheel, WHEEL_AXIS) {
            debug!("Replaced existing {:?} rotation track on {:?}", WHEEL_AXIS, wheel);
        }

        for cmd in commands {
            let ticks = if is_left {
                cmd.cumulative_left_ticks
            } else {
                cmd.cumulative_right_ticks
            };
            let angle = ticks_to_radians(ticks, ticks_per_revolution);
            scene.write_rotation_keyframe(wheel, WHEEL_AXIS, cmd.frame, angle);
        }
    }
}

/// Outcome of a successful export
#[derive(Debug)]
pub struct ExportReport {
    pub output: PathBuf,
    pub frames: usize,
    pub render_dir: Option<PathBuf>,
    /// Non-fatal rendering problems, in frame order
    pub warnings: Vec<RenderError>,
}

pub struct Exporter {
    config: ExporterConfig,
    geometry: RobotGeometry,
}

impl Exporter {
    /// Validate the configuration; invalid geometry is rejected here
    pub fn new(config: ExporterConfig) -> Result<Self> {
        let geometry = config.validate()?;
        Ok(Self { config, geometry })
    }

    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Resolve the rig and run the converter over the configured frame range
    pub fn compute<S: Scene + ?Sized>(&self, scene: &S) -> Result<(RobotRig, Vec<DriveCommand>)> {
        let rig = RobotRig::resolve(scene, &self.config)?;
        let range = self.config.frame_range(scene.frame_range())?;

        let samples = sample_trajectory(scene, &rig, range);
        let commands = drive::convert(&samples, &self.geometry);
        info!(
            "Converted frames {}..={} ({} commands)",
            range.0,
            range.1,
            commands.len()
        );
        Ok((rig, commands))
    }

    /// Convert the scene's trajectory and bake it onto the wheels
    pub fn bake<S: Scene + ?Sized>(&self, scene: &mut S) -> Result<Vec<DriveCommand>> {
        let (rig, commands) = self.compute(&*scene)?;
        bake_wheels(scene, &rig, &commands, self.geometry.ticks_per_revolution);
        info!("Wheel animations baked successfully");
        Ok(commands)
    }

    /// Bake previously exported commands instead of recomputing them
    pub fn bake_commands<S: Scene + ?Sized>(&self, scene: &mut S, commands: &[DriveCommand]) -> Result<()> {
        let rig = RobotRig::resolve(&*scene, &self.config)?;
        bake_wheels(scene, &rig, commands, self.geometry.ticks_per_revolution);
        info!("Baked {} frames from command file", commands.len());
        Ok(())
    }

    /// Export the firmware command file, bake the wheels, and render frames if enabled
    ///
    /// Nothing is written when the rig does not resolve, and a failed write
    /// leaves any previous file at `output` intact. The scene is only baked
    /// once the command file has been written.
    pub fn export_to_file<S: Scene>(
        &self,
        scene: &mut S,
        output: &Path,
        renderer: Option<&mut dyn FrameRenderer>,
    ) -> Result<ExportReport> {
        let (rig, commands) = self.compute(&*scene)?;

        drive::write_command_file(output, &commands)?;
        bake_wheels(scene, &rig, &commands, self.geometry.ticks_per_revolution);

        let mut report = ExportReport {
            output: output.to_path_buf(),
            frames: commands.len(),
            render_dir: None,
            warnings: Vec::new(),
        };

        if self.config.render_frames {
            let frames: Vec<i32> = commands.iter().map(|c| c.frame).collect();
            let dir = render_dir_for(output);
            match renderer {
                Some(renderer) => {
                    report.warnings = render_frames(&*scene, renderer, &dir, &frames);
                    report.render_dir = Some(dir);
                }
                None => {
                    let err = RenderError::Unsupported {
                        frame: frames.first().copied().unwrap_or_default(),
                        reason: "no renderer available for this scene".to_string(),
                    };
                    warn!("{}", err);
                    report.warnings.push(err);
                }
            }
        }

        match &report.render_dir {
            Some(dir) => info!(
                "Animation and frames exported to {} ({} warnings)",
                dir.display(),
                report.warnings.len()
            ),
            None => info!("Animation exported to {}", output.display()),
        }
        Ok(report)
    }
}

/// Render each frame into `dir`; failures are collected, never fatal
fn render_frames(
    scene: &dyn Scene,
    renderer: &mut dyn FrameRenderer,
    dir: &Path,
    frames: &[i32],
) -> Vec<RenderError> {
    let mut warnings = Vec::new();
    let first = frames.first().copied().unwrap_or_default();

    if let Err(source) = fs::create_dir_all(dir) {
        let err = RenderError::Io {
            frame: first,
            path: dir.to_path_buf(),
            source,
        };
        warn!("{}", err);
        warnings.push(err);
        return warnings;
    }

    match renderer.begin() {
        Ok(()) => {
            for &frame in frames {
                let path = dir.join(frame_file_name(frame, renderer.extension()));
                if let Err(err) = renderer.render(scene, frame, &path) {
                    warn!("{}", err);
                    warnings.push(err);
                }
            }
        }
        Err(err) => {
            warn!("{}", err);
            warnings.push(err);
        }
    }
    renderer.finish();

    warnings
}
