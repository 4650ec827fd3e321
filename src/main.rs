use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use playbot_exporter::config::ExporterConfig;
use playbot_exporter::drive;
use playbot_exporter::error::Result;
use playbot_exporter::exporter::{Exporter, RobotRig};
use playbot_exporter::render::PoseSnapshotRenderer;
use playbot_exporter::scene::MemoryScene;

/// Export Playbot robot animations to a firmware-compatible format
#[derive(Debug, Parser)]
#[command(name = "playbot-exporter", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the firmware command file and bake the wheels
    Export {
        /// Scene JSON file
        #[arg(long)]
        scene: PathBuf,

        /// Firmware command file to write
        #[arg(long, short)]
        output: PathBuf,

        /// Save the baked scene to this JSON file
        #[arg(long)]
        save_scene: Option<PathBuf>,

        #[command(flatten)]
        config: ExporterConfig,
    },

    /// Bake wheel rotations into the scene for preview
    Bake {
        /// Scene JSON file
        #[arg(long)]
        scene: PathBuf,

        /// Baked scene JSON file to write
        #[arg(long, short)]
        output: PathBuf,

        /// Bake an exported command file instead of converting the scene
        #[arg(long)]
        commands: Option<PathBuf>,

        #[command(flatten)]
        config: ExporterConfig,
    },
}

fn main() {
    // Setup logging (set RUST_LOG=debug for per-frame output)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Export error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Export {
            scene,
            output,
            save_scene,
            config,
        } => {
            let exporter = Exporter::new(config)?;
            let mut scene = MemoryScene::load(&scene)?;

            let report = if exporter.config().render_frames {
                let rig = RobotRig::resolve(&scene, exporter.config())?;
                let cfg = exporter.config();
                let mut renderer = PoseSnapshotRenderer::new(vec![
                    (cfg.body_name.clone(), rig.body),
                    (cfg.head_name.clone(), rig.head),
                    (cfg.left_wheel_name.clone(), rig.left_wheel),
                    (cfg.right_wheel_name.clone(), rig.right_wheel),
                ]);
                exporter.export_to_file(&mut scene, &output, Some(&mut renderer))?
            } else {
                exporter.export_to_file(&mut scene, &output, None)?
            };

            if !report.warnings.is_empty() {
                info!("{} frames exported with {} render warnings", report.frames, report.warnings.len());
            }
            if let Some(path) = save_scene {
                scene.save(&path)?;
                info!("Baked scene saved to {}", path.display());
            }
        }
        Command::Bake {
            scene,
            output,
            commands,
            config,
        } => {
            let exporter = Exporter::new(config)?;
            let mut scene = MemoryScene::load(&scene)?;

            match commands {
                Some(path) => {
                    let parsed = drive::parse_commands(&fs::read_to_string(&path)?)?;
                    exporter.bake_commands(&mut scene, &parsed)?;
                }
                None => {
                    exporter.bake(&mut scene)?;
                }
            }
            scene.save(&output)?;
            info!("Baked scene saved to {}", output.display());
        }
    }
    Ok(())
}
