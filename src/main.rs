use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use whitted::camera::DEFAULT_RECURSION_DEPTH;
use whitted::scene;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Format {
    Ppm,
    Png,
}

/// Render a YAML scene description to an image.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Scene description file
    scene: PathBuf,

    /// File to write the rendered image to
    #[arg(short, long)]
    output: PathBuf,

    /// Image encoding
    #[arg(long, value_enum, default_value_t = Format::Ppm)]
    format: Format,

    /// Reflection/refraction recursion depth
    #[arg(long, default_value_t = DEFAULT_RECURSION_DEPTH)]
    depth: u32,

    /// Number of render threads, defaulting to the available cores
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let (world, camera) = scene::load_scene(&args.scene)?;
    debug!(
        "loaded {} with {} top-level shapes and {} lights",
        args.scene.display(),
        world.objects.len(),
        world.lights.len()
    );

    info!(
        "rendering {}x{} at depth {}",
        camera.hsize, camera.vsize, args.depth
    );
    let started = Instant::now();
    let image = camera.render_with_depth(&world, args.depth);
    info!("rendered in {:.2?}", started.elapsed());

    let file = File::create(&args.output)?;
    let mut out = BufWriter::new(file);
    match args.format {
        Format::Ppm => image.write_ppm(&mut out)?,
        Format::Png => image.write_png(&mut out)?,
    }
    out.flush()?;

    Ok(())
}
