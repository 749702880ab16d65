use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rand::{rng, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use portalpath::{render_frame, AccumulationImage, FrameControl, Scene, SceneDescription};

mod cli;
mod logger;
mod output;

use cli::Args;
use logger::init_logger;
use output::{save_image, OutputFormat, TevViewer};

/// Scene from `--scene`, or the built-in default scene.
fn load_scene(args: &Args) -> portalpath::Result<SceneDescription> {
    match &args.scene {
        Some(path) => SceneDescription::load(path),
        None => {
            info!("No scene given, using the default scene");
            Ok(SceneDescription::default())
        }
    }
}

/// Frame seeds come from ChaCha20, seeded from `--seed` when given.
fn seed_generator(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_rng(&mut rng()),
    }
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("PortalPath - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    if OutputFormat::from_path(&args.output).is_none() {
        error!(
            "Unsupported file extension '{}'. Only .png and .exr formats are supported.",
            std::path::Path::new(&args.output).extension().unwrap_or_default().to_string_lossy()
        );
        std::process::exit(1);
    }

    let description = match load_scene(&args) {
        Ok(description) => description,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut settings = description.render_settings;
    if let Some(mode) = args.mode {
        settings.render_type = mode.into();
    }
    if args.no_antialiasing {
        settings.antialiasing = false;
    }
    if let Some(max_bounces) = args.max_bounces {
        settings.max_bounces = max_bounces;
    }
    if let Some(max_portal_traversals) = args.max_portal_traversals {
        settings.max_portal_traversals = max_portal_traversals;
    }

    let planes = description.to_planes();
    let scene = match Scene::validated(&planes) {
        Ok(scene) => scene,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let camera = description.camera_with(&settings);

    let width = args.width.max(1);
    let height = args.height.max(1);
    info!(
        "Image resolution: {}x{}, {} frames of {} samples per pixel, {:?} mode",
        width, height, args.frames, args.samples_per_pixel, settings.render_type
    );

    let mut accumulation = AccumulationImage::new(width, height);
    let mut seeds = seed_generator(args.seed);

    let should_send_to_tev = args.tev || args.tev_address.is_some();
    let mut viewer = if should_send_to_tev {
        TevViewer::connect(args.tev_address.as_deref().unwrap_or("localhost:14158"))
    } else {
        None
    };

    info!("Rendering using {} CPU cores...", rayon::current_num_threads());
    let render_start = std::time::Instant::now();
    let pb = ProgressBar::new(u64::from(args.frames));
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} frames ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for _ in 0..args.frames {
        let frame = FrameControl {
            camera,
            aspect_ratio: width as f32 / height as f32,
            accumulated_frames: accumulation.accumulated_frames(),
            random_seed: seeds.random(),
            render_mode: settings.render_type,
            samples_per_pixel: args.samples_per_pixel,
            antialiasing: settings.antialiasing,
        };
        render_frame(&frame, &scene, accumulation.image_mut());
        accumulation.finish_frame();

        if let Some(viewer) = viewer.as_mut() {
            viewer.show(accumulation.image());
        }
        pb.inc(1);
    }

    pb.finish();
    info!(
        "{} frames accumulated in {:.2?}",
        accumulation.accumulated_frames(),
        render_start.elapsed()
    );

    save_image(accumulation.image(), &args.output);
}
