use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::DynamicImage;
use map_raster::{DynamicRaster, Enhancement, Upscaler, UpscalerConfig, parse_map_filename};
use map_tiling::{
    BorderSpec, OverlapSpec, PixelScale, TilingOptions, calculate_statistics, compose,
    plan_for_image,
};

#[derive(Parser)]
#[command(name = "mapt", about = "Battle map print preparation", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a map image into printable PDF pages
    Split {
        /// Input map image (name_WWxHH.png encodes the grid size)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        tiling: TilingArgs,

        #[command(flatten)]
        enhancement: EnhancementArgs,

        /// Path to a waifu2x-style upscaler executable
        #[arg(long)]
        upscaler: Option<PathBuf>,

        /// Show page statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Split every name_WWxHH.png map in a directory
    Batch {
        /// Directory of map images
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the output PDFs
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        tiling: TilingArgs,

        #[command(flatten)]
        enhancement: EnhancementArgs,
    },

    /// Extract embedded raster maps from a PDF
    Extract {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the extracted PNG files
        #[arg(short, long)]
        output: PathBuf,

        /// First page to scan (1-based)
        #[arg(long, default_value = "1")]
        first_page: u32,

        /// Last page to scan, inclusive
        #[arg(long)]
        last_page: Option<u32>,

        /// Skip images narrower than this many pixels
        #[arg(long, default_value = "100")]
        min_width: u32,

        /// Skip images shorter than this many pixels
        #[arg(long, default_value = "100")]
        min_height: u32,

        /// Skip images stored in fewer bytes than this
        #[arg(long, default_value = "524288")]
        min_bytes: usize,
    },

    /// Produce a single custom-sized page for print services
    Single {
        /// Input map image (name_WWxHH.png encodes the grid size)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Grid squares across the width (overrides the filename)
        #[arg(long)]
        squares_wide: Option<f32>,

        /// Grid squares across the height (overrides the filename)
        #[arg(long)]
        squares_high: Option<f32>,

        /// Page border in mm (uniform on all sides)
        #[arg(long, default_value = "5.0")]
        border: f32,

        #[command(flatten)]
        enhancement: EnhancementArgs,
    },
}

#[derive(Args)]
struct TilingArgs {
    /// Grid squares across the width (overrides the filename)
    #[arg(long)]
    squares_wide: Option<f32>,

    /// Grid squares across the height (overrides the filename)
    #[arg(long)]
    squares_high: Option<f32>,

    /// Paper size
    #[arg(long, default_value = "a4", value_enum)]
    paper: PaperArg,

    /// Page border in mm (uniform on all sides)
    #[arg(long, default_value = "5.0")]
    border: f32,

    /// Horizontal glue strip in mm, repeated on the east edge of each column
    #[arg(long, default_value = "10.0")]
    overlap_east: f32,

    /// Vertical glue strip in mm, repeated on the south edge of each row
    #[arg(long, default_value = "10.0")]
    overlap_south: f32,

    /// JSON file with paper/border/overlap settings (overrides the flags)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct EnhancementArgs {
    /// Brightness factor (1.0 leaves the image unchanged)
    #[arg(long, default_value = "1.2")]
    brighten: f32,

    /// Sharpness factor (1.0 leaves the image unchanged)
    #[arg(long, default_value = "1.1")]
    sharpen: f32,

    /// Saturation factor (1.0 leaves the image unchanged)
    #[arg(long, default_value = "1.0")]
    saturation: f32,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    Letter,
}

impl From<PaperArg> for map_tiling::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A0 => Self::A0,
            PaperArg::A1 => Self::A1,
            PaperArg::A2 => Self::A2,
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
        }
    }
}

impl TilingArgs {
    async fn to_options(&self) -> Result<TilingOptions> {
        if let Some(path) = &self.config {
            return Ok(TilingOptions::load(path)
                .await
                .with_context(|| format!("loading config {}", path.display()))?);
        }
        let options = TilingOptions {
            paper: self.paper.into(),
            border: BorderSpec::uniform(self.border),
            overlap: OverlapSpec {
                east_mm: self.overlap_east,
                south_mm: self.overlap_south,
            },
        };
        options.validate()?;
        Ok(options)
    }
}

impl From<&EnhancementArgs> for Enhancement {
    fn from(args: &EnhancementArgs) -> Self {
        Self {
            brighten: Some(args.brighten),
            sharpen: Some(args.sharpen),
            saturation: Some(args.saturation),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            input,
            output,
            tiling,
            enhancement,
            upscaler,
            stats_only,
        } => {
            let options = tiling.to_options().await?;
            let (squares_wide, squares_high) = grid_squares(
                &input,
                tiling.squares_wide,
                tiling.squares_high,
            )?;

            let mut image = load_image(&input).await?;
            if !stats_only {
                if let Some(executable) = upscaler {
                    image = upscale(image, executable).await?;
                }
                image = apply_enhancement(image, (&enhancement).into()).await?;
            }

            let scale = PixelScale::from_reference_squares(
                image.width(),
                image.height(),
                squares_wide,
                squares_high,
            )?;
            let plan = plan_for_image(image.width(), image.height(), scale, &options)?;
            print_statistics(&plan);

            if stats_only {
                return Ok(());
            }

            let mut source = DynamicRaster::new(image);
            let pages = compose(&mut source, &plan)?;
            map_pdf::write_tiled_pdf(pages, &plan, &output).await?;
            println!("Split {} → {}", input.display(), output.display());
        }

        Commands::Batch {
            input,
            output,
            tiling,
            enhancement,
        } => {
            let options = tiling.to_options().await?;
            tokio::fs::create_dir_all(&output).await?;

            let mut done = 0usize;
            let mut entries = tokio::fs::read_dir(&input).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let parsed = match parse_map_filename(&path) {
                    Ok(parsed) => parsed,
                    Err(err) => {
                        if path.extension().is_some_and(|ext| ext == "png") {
                            log::warn!("skipping {}: {err}", path.display());
                        }
                        continue;
                    }
                };

                let mut image = load_image(&path).await?;
                image = apply_enhancement(image, (&enhancement).into()).await?;

                let scale = PixelScale::from_reference_squares(
                    image.width(),
                    image.height(),
                    parsed.squares_wide,
                    parsed.squares_high,
                )?;
                let plan = plan_for_image(image.width(), image.height(), scale, &options)?;

                let mut source = DynamicRaster::new(image);
                let pages = compose(&mut source, &plan)?;
                let target = output.join(format!("{}.pdf", parsed.name));
                map_pdf::write_tiled_pdf(pages, &plan, &target).await?;
                println!("Split {} → {}", path.display(), target.display());
                done += 1;
            }
            println!("Processed {done} maps");
        }

        Commands::Extract {
            input,
            output,
            first_page,
            last_page,
            min_width,
            min_height,
            min_bytes,
        } => {
            let options = map_pdf::ExtractOptions {
                first_page,
                last_page,
                min_width,
                min_height,
                min_bytes,
            };
            let images = map_pdf::extract_images(&input, &options).await?;
            if images.is_empty() {
                bail!("no images found in {}", input.display());
            }

            tokio::fs::create_dir_all(&output).await?;
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("map")
                .to_owned();
            for (index, image) in images.into_iter().enumerate() {
                let target = output.join(format!("{stem}_{index:03}.png"));
                let save_path = target.clone();
                tokio::task::spawn_blocking(move || image.save(&save_path)).await??;
                println!("Extracted {}", target.display());
            }
        }

        Commands::Single {
            input,
            output,
            squares_wide,
            squares_high,
            border,
            enhancement,
        } => {
            let (squares_wide, squares_high) = grid_squares(&input, squares_wide, squares_high)?;

            let mut image = load_image(&input).await?;
            image = apply_enhancement(image, (&enhancement).into()).await?;

            map_pdf::write_single_page_pdf(
                image,
                squares_wide,
                squares_high,
                &BorderSpec::uniform(border),
                &output,
            )
            .await?;
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}

/// Grid size from explicit flags, falling back to the filename convention.
fn grid_squares(input: &Path, wide: Option<f32>, high: Option<f32>) -> Result<(f32, f32)> {
    match (wide, high) {
        (Some(w), Some(h)) => Ok((w, h)),
        (None, None) => {
            let parsed = parse_map_filename(input).with_context(|| {
                format!(
                    "{} does not follow name_WWxHH.png; pass --squares-wide/--squares-high",
                    input.display()
                )
            })?;
            Ok((parsed.squares_wide, parsed.squares_high))
        }
        _ => bail!("--squares-wide and --squares-high must be given together"),
    }
}

async fn load_image(path: &Path) -> Result<DynamicImage> {
    let load_path = path.to_owned();
    let image = tokio::task::spawn_blocking(move || image::open(&load_path))
        .await?
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!("loaded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

async fn apply_enhancement(image: DynamicImage, enhancement: Enhancement) -> Result<DynamicImage> {
    if enhancement.is_noop() {
        return Ok(image);
    }
    Ok(tokio::task::spawn_blocking(move || map_raster::enhance(image, &enhancement)).await?)
}

/// Quadruple the image: a de-noising 2x pass followed by a plain 2x pass.
async fn upscale(image: DynamicImage, executable: PathBuf) -> Result<DynamicImage> {
    let denoise = Upscaler::new(UpscalerConfig {
        executable: executable.clone(),
        scale: true,
        noise: Some(2),
    });
    let scale = Upscaler::new(UpscalerConfig {
        executable,
        scale: true,
        noise: None,
    });
    let image = denoise.run(image).await?;
    Ok(scale.run(image).await?)
}

fn print_statistics(plan: &map_tiling::LayoutPlan) {
    let stats = calculate_statistics(plan);
    println!("Tiling statistics:");
    println!(
        "  Sheets: {} ({} across, {} down)",
        stats.total_sheets, stats.pages_horizontal, stats.pages_vertical
    );
    println!("  Paper: {} {:?}", stats.paper_label, stats.orientation);
    println!(
        "  Assembled size: {:.0} x {:.0} mm",
        stats.assembled_width_mm, stats.assembled_height_mm
    );
}
