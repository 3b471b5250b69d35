use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use dynart::compose::{Composer, encode_png};
use dynart::palette::PaletteTable;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

/// Render a single image to disk without starting the server.
///
///   render_image "a lighthouse in fog" --style ocean --seed 7 --out lighthouse.png
#[derive(Parser, Debug)]
#[command(name = "render_image")]
struct Args {
    /// Text drawn across the middle of the image
    prompt: String,

    /// Palette name (abstract, nature, tech, sunset, ocean)
    #[arg(long, default_value = dynart::constants::DEFAULT_STYLE)]
    style: String,

    /// Fixed seed, for repeatable output
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the PNG
    #[arg(long, default_value = "image.png")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let palettes = PaletteTable::default();
    if !palettes.contains(&args.style) {
        eprintln!(
            "Unknown style {:?}, using the {} palette",
            args.style,
            palettes.lookup(&args.style).name
        );
    }
    let composer = Composer::new(palettes).context("loading embedded fonts")?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let image = composer.compose(&args.prompt, &args.style, &mut rng, Utc::now().date_naive());
    let png = encode_png(&image).context("encoding PNG")?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&args.out, &png).with_context(|| format!("writing {}", args.out.display()))?;
    println!("Wrote {} ({} bytes)", args.out.display(), png.len());
    Ok(())
}
