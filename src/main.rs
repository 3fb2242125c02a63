use anyhow::{Context, Result};
use clap::Parser;
use image::{ImageFormat, ImageReader};
use std::{
    fs::File,
    io::{self, BufReader, Cursor, Read, Write},
    path::PathBuf,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fsdither::{dither_image, Color, Palette, Preset};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Opt {
    /// A path to an image, else reads from stdin
    file: Option<PathBuf>,

    /// Output file path (overwrites old files), else writes a PNG to stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Built-in palette, used when no colors are given
    #[arg(short, long, value_enum, default_value_t = Preset::Mono)]
    preset: Preset,

    /// Comma-separated palette colors as #rgb or #rrggbb; earlier colors win ties
    #[arg(
        short = 'c',
        long = "color",
        value_delimiter = ',',
        conflicts_with = "palette_file"
    )]
    colors: Vec<Color>,

    /// JSON file holding palette colors, as an array or under a `colors` key
    #[arg(long)]
    palette_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fsdither=info")),
        )
        .with_writer(io::stderr)
        .init();
    let opt = Opt::parse();

    // Palette problems surface before any image is read or written
    let palette = load_palette(&opt)?;
    debug!(colors = ?palette.colors(), "Resolved palette");

    let image = match &opt.file {
        Some(filepath) => ImageReader::open(filepath)
            .with_context(|| format!("failed to open {}", filepath.display()))?
            .decode()
            .with_context(|| format!("{} is not an image", filepath.display()))?,
        None => {
            info!("Reading from stdin");
            let mut bytes = vec![];
            io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .context("failed to read stdin")?
                .decode()
                .context("stdin is not an image")?
        }
    };

    info!(
        "Dithering {}x{} image to {} colors",
        image.width(),
        image.height(),
        palette.colors().len()
    );
    let dithered = dither_image(image, &palette)?;

    match &opt.out {
        Some(path) => dithered
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut bytes = Cursor::new(vec![]);
            dithered
                .write_to(&mut bytes, ImageFormat::Png)
                .context("failed to encode PNG")?;
            io::stdout()
                .lock()
                .write_all(bytes.get_ref())
                .context("failed to write stdout")?;
        }
    }

    Ok(())
}

/// A palette file wins over explicit colors, which win over the preset.
fn load_palette(opt: &Opt) -> Result<Palette> {
    if let Some(path) = &opt.palette_file {
        let file = File::open(path)
            .with_context(|| format!("failed to open palette file {}", path.display()))?;
        Palette::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid palette file {}", path.display()))
    } else if !opt.colors.is_empty() {
        Palette::new(opt.colors.clone()).context("invalid palette colors")
    } else {
        Ok(opt.preset.palette())
    }
}
