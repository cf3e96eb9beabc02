use argh::FromArgs;
use std::{fs::File, io::BufWriter, path::PathBuf};

use colmap_track::{import_scene, FpsPreset, ImportConfig};

#[derive(FromArgs)]
/// Convert a COLMAP text reconstruction into a keyframed camera track (JSON)
struct Args {
    /// the scene folder holding the model under `sparse`
    #[argh(option, short = 's')]
    scene_dir: PathBuf,

    /// JSON file with import settings; command line flags override it
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// sensor width in millimeters
    #[argh(option)]
    sensor_width: Option<f64>,

    /// timeline frames per second
    #[argh(option, short = 'f')]
    fps: Option<u32>,

    /// video frame rate preset, e.g. 29.97
    #[argh(option)]
    fps_preset: Option<FpsPreset>,

    /// uniform scale applied to cameras and points
    #[argh(option)]
    scale: Option<f64>,

    /// skip the sparse point cloud
    #[argh(switch)]
    no_points: bool,

    /// output file; stdout when omitted
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => ImportConfig::default(),
    };
    if let Some(sensor_width) = args.sensor_width {
        config.sensor_width_mm = sensor_width;
    }
    if let Some(preset) = args.fps_preset {
        config.fps = preset.timeline_fps();
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if args.no_points {
        config.include_points = false;
    }

    let scene = import_scene(&args.scene_dir, &config)?;

    match &args.output {
        Some(path) => {
            serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &scene)?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&scene)?),
    }

    log::info!("{}", scene.summary());

    Ok(())
}
