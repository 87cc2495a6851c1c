//! `scenesound` command-line tool
//!
//! `process` runs an effect chain over a WAV file. `simulate` plays a scene
//! description through the scheduler and prints the timeline it produces.
//! `render` processes the sound attached to one object of a scene, optionally
//! baking its distance attenuation, and rebinds the object to the result.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use glam::Vec3;
use scenesound::bounce::{process_attached, process_file};
use scenesound::effects::GainProfile;
use scenesound::utils::init_logger;
use scenesound::{
    ChainSettings, EffectChain, PlaybackScheduler, Scene, SceneGraph, SceneObject, Sequence,
    SoundLibrary, Timeline,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "scenesound", version, about = "Scene-driven sound placement and offline effects")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply the effect chain to a WAV file
    Process {
        input: PathBuf,
        output: PathBuf,

        /// JSON file with chain settings; flags below override it
        #[arg(long)]
        chain: Option<PathBuf>,

        #[arg(long)]
        no_reverb: bool,
        #[arg(long, value_name = "MS")]
        reverb_delay: Option<f32>,
        #[arg(long, value_name = "DB")]
        reverb_decay: Option<f32>,

        #[arg(long)]
        no_delay: bool,
        #[arg(long, value_name = "MS")]
        delay_time: Option<f32>,
        #[arg(long, value_name = "DB")]
        delay_decay: Option<f32>,
        #[arg(long, value_name = "N")]
        delay_repetitions: Option<u32>,

        #[arg(long)]
        no_eq: bool,
        #[arg(long, value_name = "DB", allow_hyphen_values = true)]
        eq_low: Option<f32>,
        #[arg(long, value_name = "DB", allow_hyphen_values = true)]
        eq_high: Option<f32>,

        #[arg(long)]
        no_pitch: bool,
        #[arg(long, value_name = "SEMITONES", allow_hyphen_values = true)]
        pitch: Option<i32>,

        /// Enable the spectral low-pass at this cutoff
        #[arg(long, value_name = "HZ")]
        lowpass: Option<f32>,
    },

    /// Run the scheduler over a frame range of a scene description
    Simulate {
        scene: PathBuf,

        #[arg(long)]
        from: Option<i32>,
        #[arg(long)]
        to: Option<i32>,

        /// Write the updated scene, sounds and timeline back to the file
        #[arg(long)]
        save: bool,
    },

    /// Process an object's attached sound and attach the result instead
    Render {
        scene: PathBuf,

        #[arg(long)]
        object: String,

        #[arg(long)]
        output: PathBuf,

        /// JSON file with chain settings; without it no effects are applied
        #[arg(long)]
        chain: Option<PathBuf>,

        /// Bake the distance attenuation over the attachment's frame range
        #[arg(long)]
        bake: bool,

        #[arg(long, default_value_t = 24.0)]
        fps: f32,

        /// JSON array of per-frame object positions used by --bake
        #[arg(long)]
        positions: Option<PathBuf>,

        /// Write the updated scene and sound table back to the file
        #[arg(long)]
        save: bool,
    },
}

/// Everything `simulate` reads and writes
#[derive(Serialize, Deserialize)]
struct SceneFile {
    #[serde(flatten)]
    scene: Scene,
    #[serde(default)]
    sounds: SoundLibrary,
    #[serde(default)]
    timeline: Sequence,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_scene(file: &SceneFile, path: &Path) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(file)?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Saved to {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            input,
            output,
            chain,
            no_reverb,
            reverb_delay,
            reverb_decay,
            no_delay,
            delay_time,
            delay_decay,
            delay_repetitions,
            no_eq,
            eq_low,
            eq_high,
            no_pitch,
            pitch,
            lowpass,
        } => {
            let mut settings: ChainSettings = match &chain {
                Some(path) => read_json(path)?,
                None => ChainSettings::default(),
            };

            settings.reverb_enabled &= !no_reverb;
            settings.delay_enabled &= !no_delay;
            settings.eq_enabled &= !no_eq;
            settings.pitch_enabled &= !no_pitch;
            if let Some(v) = reverb_delay {
                settings.reverb_delay_ms = v;
            }
            if let Some(v) = reverb_decay {
                settings.reverb_decay_db = v;
            }
            if let Some(v) = delay_time {
                settings.delay_time_ms = v;
            }
            if let Some(v) = delay_decay {
                settings.delay_decay_db = v;
            }
            if let Some(v) = delay_repetitions {
                settings.delay_repetitions = v;
            }
            if let Some(v) = eq_low {
                settings.eq_low_gain_db = v;
            }
            if let Some(v) = eq_high {
                settings.eq_high_gain_db = v;
            }
            if let Some(v) = pitch {
                settings.pitch_semitones = v;
            }
            if let Some(v) = lowpass {
                settings.lowpass_enabled = true;
                settings.lowpass_cutoff_hz = v;
            }

            let chain = settings.to_chain();
            println!("Effects: {:?}", chain);
            let written = process_file(&input, &output, &chain)
                .with_context(|| format!("failed to process {}", input.display()))?;
            println!("Saved to {}", written.display());
        }

        Command::Simulate {
            scene,
            from,
            to,
            save,
        } => {
            let mut file: SceneFile = read_json(&scene)?;
            let from = from.unwrap_or(file.scene.frame_start);
            let to = to.unwrap_or(file.scene.frame_end);
            if to < from {
                bail!("--to {} is before --from {}", to, from);
            }

            let scheduler = PlaybackScheduler::new(file.scene.attenuation);
            for frame in from..=to {
                let report = match scheduler.on_frame_change(
                    &mut file.scene,
                    &mut file.timeline,
                    &file.sounds,
                    frame,
                ) {
                    Ok(report) => report,
                    Err(e) => {
                        println!("frame {:>5}: {}", frame, e);
                        continue;
                    }
                };

                for key in &report.inserted {
                    println!(
                        "frame {:>5}: placed '{}' {}-{}",
                        frame, key.sound, key.frame_start, key.frame_end
                    );
                }
                for skipped in &report.skipped {
                    println!("frame {:>5}: skipped '{}': {}", frame, skipped.object, skipped.reason);
                }
            }

            println!("\nTimeline ({} segments):", file.timeline.len());
            for segment in file.timeline.segments() {
                println!(
                    "  [lane {:>2}] {:<24} {:>5}-{:<5} volume {:.3}",
                    segment.channel,
                    segment.name,
                    segment.frame_start,
                    segment.frame_end,
                    segment.volume
                );
            }

            if save {
                write_scene(&file, &scene)?;
            }
        }

        Command::Render {
            scene,
            object,
            output,
            chain,
            bake,
            fps,
            positions,
            save,
        } => {
            let mut file: SceneFile = read_json(&scene)?;
            let mut chain = match &chain {
                Some(path) => read_json::<ChainSettings>(path)?.to_chain(),
                None => EffectChain::new(),
            };

            if bake {
                let camera = file
                    .scene
                    .camera_position()
                    .context("scene has no camera to bake against")?;
                let target = file
                    .scene
                    .object(&object)
                    .with_context(|| format!("no object named '{}'", object))?;
                let attachment = target
                    .attachment()
                    .with_context(|| format!("'{}' has no attached sound", object))?;

                let path: Vec<Vec3> = match &positions {
                    Some(p) => read_json(p)?,
                    None => vec![target.position(); attachment.duration().max(0) as usize],
                };
                chain.push(GainProfile::from_positions(
                    path.into_iter().map(|p| (p, camera)),
                    &file.scene.attenuation,
                    fps,
                ));
            }

            println!("Effects: {:?}", chain);
            let target = file
                .scene
                .object_mut(&object)
                .with_context(|| format!("no object named '{}'", object))?;
            let name = process_attached(&mut file.sounds, target, &chain, &output)
                .with_context(|| format!("failed to render the sound of '{}'", object))?;
            println!("'{}' now plays '{}'", object, name);

            if save {
                write_scene(&file, &scene)?;
            }
        }
    }

    Ok(())
}
