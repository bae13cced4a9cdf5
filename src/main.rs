use std::path::PathBuf;
use std::process;

use clap::Parser;
use tomo_volume::{CancelToken, VolumeLoader, compute_normalization};

/// Load a TIFF slice stack as a volume and report its statistics.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the .tif/.tiff slice stack
    folder: PathBuf,

    /// Integer stride applied along each slice axis while loading
    #[arg(short, long, default_value_t = 1)]
    downsample: usize,

    /// Low contrast percentile
    #[arg(long, default_value_t = 1.0)]
    low: f32,

    /// High contrast percentile
    #[arg(long, default_value_t = 99.0)]
    high: f32,

    /// Write the normalized middle slice to this image path
    #[arg(short, long)]
    preview: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let volume = VolumeLoader::load_from_directory_with_progress(
        &args.folder,
        args.downsample,
        |completed, total| println!("Loading {completed}/{total}..."),
        &CancelToken::new(),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error! {e}");
        process::exit(1);
    });

    println!("{}", volume.summary());

    let clim = compute_normalization(&volume, args.low, args.high);
    println!("Contrast limits: [{:.1}, {:.1}]", clim.low, clim.high);

    if let Some(path) = args.preview {
        let index = volume.dim().0 / 2;
        let image = volume
            .slice_image(index, clim)
            .unwrap_or_else(|| {
                eprintln!("Error! middle slice {index} out of range");
                process::exit(1);
            });
        image.save(&path).unwrap_or_else(|e| {
            eprintln!("Error! {e}");
            process::exit(1);
        });
        println!("Preview saved: {}", path.display());
    }
}
