use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stereodots", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the left/right images of a job file as PNGs.
    Render(RenderArgs),
    /// Rotate an image about its centre (nearest neighbour, cropped).
    Rotate(RotateArgs),
    /// Print left/right screen offsets (pixels) of points in depth as JSON.
    Offsets(OffsetArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `left.png` and `right.png`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Render the two eyes concurrently.
    #[arg(long)]
    parallel: bool,

    /// Worker threads when `--parallel` is set.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct RotateArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Clockwise angle in degrees.
    #[arg(long, allow_negative_numbers = true)]
    angle: f32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct OffsetArgs {
    /// Depths from the screen in cm (+ behind, - in front).
    #[arg(long, num_args = 1.., allow_negative_numbers = true, required = true)]
    depth: Vec<f64>,

    /// Inter-pupillary distance in cm.
    #[arg(long, default_value_t = 6.4)]
    ipd: f64,

    /// Viewing distance in cm.
    #[arg(long)]
    view_dist: f64,

    #[arg(long)]
    pixels_per_cm: f64,

    /// Horizontal world position in cm.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    world_x: i32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Rotate(args) => cmd_rotate(args),
        Command::Offsets(args) => cmd_offsets(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let job = stereodots::StereoJob::read(&args.in_path)?;
    job.validate()?;

    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let scene = job.load_scene(root)?;

    let threading = stereodots::RenderThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let pair = stereodots::render_pair(&scene, &threading)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (name, canvas) in [("left.png", &pair.left), ("right.png", &pair.right)] {
        let path = args.out_dir.join(name);
        write_png(&path, &stereodots::canvas_to_u8(canvas))?;
        eprintln!("wrote {}", path.display());
    }
    eprintln!(
        "dots: {} ({} noise, {} signal)",
        pair.stats.dots_total, pair.stats.noise_dots, pair.stats.signal_dots
    );
    Ok(())
}

fn cmd_rotate(args: RotateArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let image = stereodots::decode_image_u8(&bytes)?;
    let rotated = stereodots::rotate_nearest(&image, args.angle);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&args.out, &rotated)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_offsets(args: OffsetArgs) -> anyhow::Result<()> {
    let geometry = stereodots::ViewGeometry {
        ipd_cm: args.ipd,
        view_dist_cm: args.view_dist,
        pixels_per_cm: args.pixels_per_cm,
    };
    let depth = stereodots::Grid::from_col_major(
        stereodots::Shape::new(1, args.depth.len()),
        args.depth.clone(),
    )?;
    let (left, right) = stereodots::screen_offsets(&depth, &geometry, args.world_x)?;

    let out = serde_json::json!({
        "depth": args.depth,
        "left": left.as_slice(),
        "right": right.as_slice(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn write_png(path: &Path, grid: &stereodots::Grid<u8>) -> anyhow::Result<()> {
    let png = stereodots::encode_png(grid)?;
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))
}
