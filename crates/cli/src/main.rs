#![deny(unsafe_code)]
//! Headless host for the plexus point field.
//!
//! Subcommands:
//! - `render` mounts a field on a CPU surface, drives it with a virtual clock, writes a PNG
//! - `inspect` prints point and link statistics for a generated field
//! - `schema` prints the tunable parameters

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use plexus_core::{FieldConfig, Srgb, Xorshift64};
use plexus_field::{Field, InputCapability, InputEvent, Plexus};
use plexus_raster::RasterSurface;
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Largest side `render` will rasterize; 16 bytes per pixel on the CPU surface.
const MAX_RENDER_SIDE: f64 = 8192.0;

#[derive(Parser)]
#[command(name = "plexus", about = "Animated point field renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a mounted field for a number of frames and write the last one as PNG.
    Render {
        #[command(flatten)]
        field: FieldArgs,

        /// Frames to simulate.
        #[arg(short, long, default_value_t = 90)]
        frames: u32,

        /// Virtual frames per second.
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Pointer x position; the target stays at the center unless both x and y are given.
        #[arg(long, requires = "pointer_y", allow_negative_numbers = true)]
        pointer_x: Option<f64>,

        /// Pointer y position.
        #[arg(long, requires = "pointer_x", allow_negative_numbers = true)]
        pointer_y: Option<f64>,

        /// Page scroll offset applied before the first frame.
        #[arg(long)]
        scroll: Option<f64>,

        /// Mount as a touch-primary device (pointer moves are ignored).
        #[arg(long)]
        touch: bool,

        /// Background color behind the transparent surface.
        #[arg(short, long, default_value = "#0b1b2b")]
        background: String,

        /// Output file path.
        #[arg(short, long, default_value = "plexus.png")]
        output: PathBuf,
    },
    /// Generate a field and print its statistics.
    Inspect {
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Print the parameter schema.
    Schema,
}

#[derive(clap::Args)]
struct FieldArgs {
    /// Surface width.
    #[arg(short = 'W', long, default_value_t = 1280.0)]
    width: f64,

    /// Surface height.
    #[arg(short = 'H', long, default_value_t = 720.0)]
    height: f64,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Field parameters as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,
}

impl FieldArgs {
    fn config(&self) -> Result<FieldConfig, CliError> {
        let params: serde_json::Value = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        Ok(FieldConfig::from_json(self.width, self.height, self.seed, &params)?)
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Schema => {
            let schema = FieldConfig::param_schema();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else if let Some(entries) = schema.as_object() {
                for (name, entry) in entries {
                    println!(
                        "  {name:<15} {:<8} default {:<8} {}",
                        entry["type"].as_str().unwrap_or("?"),
                        entry["default"].to_string(),
                        entry["description"].as_str().unwrap_or("")
                    );
                }
            }
        }
        Command::Inspect { field } => {
            let config = field.config()?;
            let generated = Field::generate(&config, &mut Xorshift64::new(config.seed))?;
            let stats = generated.stats();
            if cli.json {
                let info = serde_json::json!({
                    "width": config.width,
                    "height": config.height,
                    "seed": config.seed,
                    "params": config.params(),
                    "stats": stats,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("points:           {}", stats.points);
                println!("links:            {}", stats.links);
                println!("mean link length: {:.2}", stats.mean_link_length);
            }
        }
        Command::Render {
            field,
            frames,
            fps,
            pointer_x,
            pointer_y,
            scroll,
            touch,
            background,
            output,
        } => {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(CliError::Input(format!("--fps must be positive, got {fps}")));
            }
            if field.width > MAX_RENDER_SIDE || field.height > MAX_RENDER_SIDE {
                return Err(CliError::Input(format!(
                    "render size {}x{} exceeds {MAX_RENDER_SIDE} per side",
                    field.width, field.height
                )));
            }
            let background =
                Srgb::from_hex(&background).map_err(|e| CliError::Input(e.to_string()))?;
            let config = field.config()?;
            let mut plexus = Plexus::mount(
                RasterSurface::default(),
                config.clone(),
                InputCapability { touch },
            )?;

            if let (Some(x), Some(y)) = (pointer_x, pointer_y) {
                let handled = plexus.handle_event(InputEvent::PointerMove { x, y })?;
                debug!(x, y, handled, "pointer event");
            }
            if let Some(offset_y) = scroll {
                plexus.handle_event(InputEvent::Scroll { offset_y })?;
            }

            let mut last = None;
            let mut completed = 0;
            for frame in 0..frames {
                let report = plexus.tick(frame as f64 / fps);
                completed += report.completed_transitions;
                last = Some(report);
            }
            info!(frames, completed, "simulation finished");

            let surface = plexus.into_surface();
            plexus_raster::snapshot::write_png(&surface, background, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "width": config.width,
                    "height": config.height,
                    "seed": config.seed,
                    "frames": frames,
                    "completed_transitions": completed,
                    "last_frame": last,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {}x{} field ({frames} frames, seed {}) -> {}",
                    config.width,
                    config.height,
                    config.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
