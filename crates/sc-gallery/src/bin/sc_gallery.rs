use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::{GrayImage, Rgb, RgbImage, RgbaImage};
use serde::Serialize;
use sprite_collider::{
    AnalyzeConfig, Contour, DEFAULT_MATTER_SCALE, EdgeMask, GridDetectConfig, GridStrategy, Image,
    ImageView, IslandPolicy, PipelineObserver, PixelBuffer, Point2f, SpriteGridInfo,
    analyze_with_observer, crop_frame, detect_grid, matter_parts, rgba_view,
};

#[derive(Parser, Debug)]
#[command(name = "sc_gallery")]
#[command(about = "Run the sprite-collider pipeline on PNG fixtures")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "grid")]
    Grid(GridArgs),
    #[command(name = "analyze")]
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "out")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct GridHints {
    /// Expected frame width; used with --estimate-height.
    #[arg(long, requires = "estimate_height")]
    estimate_width: Option<usize>,
    #[arg(long, requires = "estimate_width")]
    estimate_height: Option<usize>,
    #[arg(long, default_value_t = 30)]
    max_frames: usize,
    /// Also try exact column/row fits near the estimate.
    #[arg(long, default_value_t = false)]
    fit_estimate: bool,
}

impl GridHints {
    fn to_config(&self) -> GridDetectConfig {
        let estimate = self.estimate_width.zip(self.estimate_height);
        let mut strategies = vec![GridStrategy::Dividers];
        if self.fit_estimate && estimate.is_some() {
            strategies.push(GridStrategy::EstimateFit);
        }
        strategies.push(GridStrategy::Divisors);

        GridDetectConfig {
            max_frames: self.max_frames,
            estimate,
            strategies,
            ..GridDetectConfig::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
struct GridArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    hints: GridHints,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum IslandArg {
    Largest,
    First,
    Merge,
}

impl From<IslandArg> for IslandPolicy {
    fn from(arg: IslandArg) -> Self {
        match arg {
            IslandArg::Largest => IslandPolicy::Largest,
            IslandArg::First => IslandPolicy::First,
            IslandArg::Merge => IslandPolicy::Merge,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    hints: GridHints,
    #[arg(long, default_value = "body")]
    name: String,
    #[arg(long, default_value_t = 128)]
    alpha_threshold: u8,
    /// Skip grid detection and use this frame width (needs --frame-height).
    #[arg(long, requires = "frame_height")]
    frame_width: Option<usize>,
    #[arg(long, requires = "frame_width")]
    frame_height: Option<usize>,
    #[arg(long, default_value_t = 128.0)]
    ppm: f32,
    #[arg(long, default_value_t = 8)]
    target_vertices: usize,
    #[arg(long, default_value_t = 20)]
    outline_vertices: usize,
    #[arg(long, value_enum, default_value_t = IslandArg::Largest)]
    islands: IslandArg,
}

#[derive(Debug, Clone, Serialize)]
struct MetaAnalyze {
    input: String,
    width: usize,
    height: usize,
    pixels_per_meter: f32,
    target_vertex_count: usize,
    contour_points: usize,
    hull_vertices: usize,
    parts: usize,
    edge_pixels: usize,
}

/// Keeps the intermediate results the gallery renders.
#[derive(Default)]
struct Capture {
    edges: Option<EdgeMask>,
    contour_points: usize,
}

impl PipelineObserver for Capture {
    fn on_mask(&mut self, _mask: &ImageView<'_, u8>, edge: &EdgeMask) {
        self.edges = Some(edge.clone());
    }

    fn on_contour(&mut self, contour: &Contour) {
        self.contour_points = contour.len();
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Grid(args) => run_grid(args),
        Command::Analyze(args) => run_analyze(args),
    }
}

fn run_grid(args: GridArgs) -> Result<()> {
    let (width, height, bytes) = load_rgba(&args.common.input)?;
    let pixels = rgba_view(width, height, &bytes)
        .with_context(|| format!("viewing {} as rgba", args.common.input.display()))?;

    let grid = detect_grid(&pixels, &args.hints.to_config()).context("detecting frame grid")?;
    tracing::info!(
        frame_width = grid.frame_width,
        frame_height = grid.frame_height,
        cols = grid.cols,
        rows = grid.rows,
        source = ?grid.source,
        "grid detected"
    );

    let case_dir = prepare_out_dir(&args.common, "grid")?;
    write_json(case_dir.join("grid.json"), &grid)
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let (width, height, bytes) = load_rgba(&args.common.input)?;
    let pixels = PixelBuffer::from_rgba(width, height, &bytes)
        .with_context(|| format!("viewing {} as rgba", args.common.input.display()))?;

    let cfg = AnalyzeConfig {
        name: args.name.clone(),
        alpha_threshold: args.alpha_threshold,
        grid: args.hints.to_config(),
        frame_size: args.frame_width.zip(args.frame_height),
        pixels_per_meter: args.ppm,
        target_vertex_count: args.target_vertices,
        outline_vertex_count: args.outline_vertices,
        island_policy: args.islands.into(),
        ..AnalyzeConfig::default()
    };

    let mut capture = Capture::default();
    let analysis = analyze_with_observer(&pixels, &cfg, &mut capture)
        .with_context(|| format!("analyzing {}", args.common.input.display()))?;

    let case_dir = prepare_out_dir(&args.common, "analyze")?;
    let xml_path = case_dir.join("body.xml");
    fs::write(&xml_path, analysis.to_xml())
        .with_context(|| format!("writing {}", xml_path.display()))?;
    write_json(case_dir.join("body.json"), &analysis.body)?;
    write_json(case_dir.join("analysis.json"), &analysis)?;
    write_json(case_dir.join("sprite.json"), &analysis.sprite_meta())?;
    write_json(
        case_dir.join("matter.json"),
        &matter_parts(&analysis.body, DEFAULT_MATTER_SCALE),
    )?;

    let frame = crop_frame(&pixels, &analysis.grid, 0).context("cropping frame 0")?;
    save_rgba(case_dir.join("frame.png"), &Image::from_view(&frame))?;

    let Some(edges) = capture.edges else {
        bail!("pipeline finished without reporting an edge mask");
    };
    save_gray(case_dir.join("edges.png"), &edges)?;
    render_outline(&analysis.grid, &analysis.outline)
        .save(case_dir.join("outline.png"))
        .context("writing outline.png")?;

    write_json(
        case_dir.join("meta.json"),
        &MetaAnalyze {
            input: args.common.input.display().to_string(),
            width,
            height,
            pixels_per_meter: cfg.pixels_per_meter,
            target_vertex_count: cfg.target_vertex_count,
            contour_points: capture.contour_points,
            hull_vertices: analysis.convex_hull.len(),
            parts: analysis.body.polygons.len(),
            edge_pixels: edges.count(),
        },
    )?;

    tracing::info!(
        parts = analysis.body.polygons.len(),
        out = %case_dir.display(),
        "analysis written"
    );
    Ok(())
}

fn load_rgba(path: &Path) -> Result<(usize, usize, Vec<u8>)> {
    ensure_file_exists(path, "input")?;
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgba = dyn_img.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok((w as usize, h as usize, rgba.into_raw()))
}

fn prepare_out_dir(common: &CommonArgs, case_name: &str) -> Result<PathBuf> {
    let case_dir = common.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;
    Ok(case_dir)
}

fn save_gray(path: PathBuf, edges: &EdgeMask) -> Result<()> {
    let img = &edges.edges;
    let gray = GrayImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .context("constructing GrayImage from edge mask")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn save_rgba(path: PathBuf, frame: &Image<[u8; 4]>) -> Result<()> {
    let raw = frame.data().as_flattened().to_vec();
    let rgba = RgbaImage::from_raw(frame.width() as u32, frame.height() as u32, raw)
        .context("constructing RgbaImage from frame")?;
    rgba.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

/// Draws the closed outline over a dark frame-sized canvas.
fn render_outline(grid: &SpriteGridInfo, outline: &[Point2f]) -> RgbImage {
    let (w, h) = (grid.frame_width as u32, grid.frame_height as u32);
    let mut img = RgbImage::from_pixel(w, h, Rgb([24, 24, 24]));

    let n = outline.len();
    for i in 0..n {
        draw_segment(&mut img, outline[i], outline[(i + 1) % n], Rgb([80, 220, 120]));
    }
    for &p in outline {
        draw_dot(&mut img, p, Rgb([255, 64, 64]));
    }
    img
}

fn draw_segment(img: &mut RgbImage, a: Point2f, b: Point2f, color: Rgb<u8>) {
    let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        put(img, a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t, color);
    }
}

fn draw_dot(img: &mut RgbImage, p: Point2f, color: Rgb<u8>) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            put(img, p.x + dx as f32, p.y + dy as f32, color);
        }
    }
}

fn put(img: &mut RgbImage, x: f32, y: f32, color: Rgb<u8>) {
    let (x, y) = (x.round(), y.round());
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (ux, uy) = (x as u32, y as u32);
    if ux < img.width() && uy < img.height() {
        img.put_pixel(ux, uy, color);
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
