use sc_contour::{Contour, IslandPolicy, select_contour, trace_islands};
use sc_core::{Error, ImageView, PixelBuffer, Point2f, Rect, Result};
use sc_export::{
    PhysicsBody, PhysicsPolygon, PhysicsVertex, SpriteMeta, normalize, to_physics_space,
    write_body_def,
};
use sc_grid::{GridDetectConfig, GridSource, SpriteGridInfo, crop_frame, detect_grid};
use sc_morph::{EdgeMask, edge_mask, opacity_mask};
use sc_poly::{ConvexPolygon, DecomposeConfig, clockwise_sort, decompose, simplify_to_count};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeConfig {
    /// Body name written to the exported documents.
    pub name: String,
    /// Pixels with alpha at or above this are part of the silhouette.
    pub alpha_threshold: u8,
    pub grid: GridDetectConfig,
    /// Known frame size. Skips grid detection when set.
    pub frame_size: Option<(usize, usize)>,
    pub pixels_per_meter: f32,
    /// Vertex budget per convex part.
    pub target_vertex_count: usize,
    /// Vertex budget for the pixel-space outline.
    pub outline_vertex_count: usize,
    pub decompose: DecomposeConfig,
    pub island_policy: IslandPolicy,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            name: "body".to_owned(),
            alpha_threshold: 128,
            grid: GridDetectConfig::default(),
            frame_size: None,
            pixels_per_meter: 128.0,
            target_vertex_count: 8,
            outline_vertex_count: 20,
            decompose: DecomposeConfig::default(),
            island_policy: IslandPolicy::default(),
        }
    }
}

/// Hooks for inspecting intermediate results. Every hook defaults to a no-op.
pub trait PipelineObserver {
    fn on_grid(&mut self, _grid: &SpriteGridInfo) {}
    fn on_mask(&mut self, _mask: &ImageView<'_, u8>, _edge: &EdgeMask) {}
    fn on_contour(&mut self, _contour: &Contour) {}
    fn on_hull(&mut self, _hull: &ConvexPolygon) {}
    fn on_decomposition(&mut self, _parts: &[ConvexPolygon]) {}
    fn on_body(&mut self, _body: &PhysicsBody) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Everything one [`analyze`] call produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsAnalysis {
    pub grid: SpriteGridInfo,
    /// Analyzed frame within the input image.
    #[serde(skip)]
    pub frame: Rect,
    pub image_width: usize,
    pub image_height: usize,
    pub pixels_per_meter: f32,
    pub body: PhysicsBody,
    /// Traced contour in the body's physics frame.
    pub contour: Vec<PhysicsVertex>,
    pub convex_hull: Vec<PhysicsVertex>,
    pub decomposition: Vec<PhysicsPolygon>,
    /// Simplified outline in frame pixels, clockwise on screen.
    pub outline: Vec<Point2f>,
}

impl PhysicsAnalysis {
    pub fn to_xml(&self) -> String {
        write_body_def(core::slice::from_ref(&self.body), self.pixels_per_meter)
    }

    pub fn sprite_meta(&self) -> SpriteMeta {
        SpriteMeta {
            name: self.body.name.clone(),
            frame_width: self.grid.frame_width,
            frame_height: self.grid.frame_height,
            vertices: self.outline.clone(),
            width: self.image_width,
            height: self.image_height,
        }
    }
}

pub fn analyze(pixels: &PixelBuffer<'_>, cfg: &AnalyzeConfig) -> Result<PhysicsAnalysis> {
    analyze_with_observer(pixels, cfg, &mut NoopObserver)
}

/// Runs the pipeline on frame 0 of `pixels`.
#[tracing::instrument(
    skip_all,
    fields(name = %cfg.name, width = pixels.width(), height = pixels.height())
)]
pub fn analyze_with_observer(
    pixels: &PixelBuffer<'_>,
    cfg: &AnalyzeConfig,
    observer: &mut dyn PipelineObserver,
) -> Result<PhysicsAnalysis> {
    let (width, height) = (pixels.width(), pixels.height());
    if width == 0 || height == 0 {
        return Err(Error::insufficient(format!("empty image {width}x{height}")));
    }
    let ppm = cfg.pixels_per_meter;
    if !ppm.is_finite() || ppm <= 0.0 {
        return Err(Error::invalid(format!("pixels_per_meter {ppm}")));
    }

    let grid = match cfg.frame_size {
        Some((fw, fh)) => {
            SpriteGridInfo::from_frame_size(width, height, fw, fh, GridSource::Explicit)
        }
        None => detect_grid(pixels, &cfg.grid)?,
    };
    tracing::debug!(?grid, "frame grid");
    observer.on_grid(&grid);

    let frame_rect = grid.frame_rect(0, width, height).ok_or(Error::OutOfBounds)?;
    let frame = crop_frame(pixels, &grid, 0)?;

    let mask = opacity_mask(&frame, cfg.alpha_threshold);
    let edge = edge_mask(&mask.as_view())
        .ok_or_else(|| Error::insufficient("frame has no opaque pixels"))?;
    tracing::debug!(edge_pixels = edge.count(), opaque = ?edge.opaque, "edge mask");
    observer.on_mask(&mask.as_view(), &edge);

    let islands = trace_islands(&edge.edges.as_view());
    let contour = select_contour(islands, cfg.island_policy)
        .filter(|c| c.len() >= 3)
        .ok_or_else(|| Error::insufficient("contour has fewer than 3 points"))?;
    observer.on_contour(&contour);

    let bounds = contour.bounds().ok_or_else(|| Error::insufficient("empty contour"))?;

    let hull = ConvexPolygon::from_points(&contour.points)?;
    observer.on_hull(&hull);

    let parts: Vec<ConvexPolygon> = decompose(&contour.points, &bounds, &cfg.decompose)?
        .iter()
        .map(|p| p.simplified(cfg.target_vertex_count))
        .collect();
    observer.on_decomposition(&parts);

    let body = normalize(&parts, &bounds, (frame.width(), frame.height()), ppm, &cfg.name)?;
    observer.on_body(&body);

    let mut outline = contour.points.clone();
    clockwise_sort(&mut outline);
    let outline = simplify_to_count(&outline, cfg.outline_vertex_count)?;

    tracing::debug!(
        contour = contour.len(),
        hull = hull.len(),
        parts = body.polygons.len(),
        outline = outline.len(),
        "analysis complete"
    );

    Ok(PhysicsAnalysis {
        grid,
        frame: frame_rect,
        image_width: width,
        image_height: height,
        pixels_per_meter: ppm,
        contour: to_physics_space(&contour.points, &bounds, ppm)?,
        convex_hull: to_physics_space(hull.vertices(), &bounds, ppm)?,
        decomposition: body.polygons.clone(),
        body,
        outline,
    })
}
