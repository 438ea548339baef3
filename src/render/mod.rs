use image::RgbaImage;
use kurbo::Rect;
use log::{debug, warn};

use crate::assets::{AssetLoader, DecodedImage};
use crate::common::{
    mask_at, max_hidden_axis_dots, ModuleFilter, ModuleMatrix, RenderError, RenderResult, DOT_MASK, FINDER_DOT_SIZE,
    FINDER_SIZE, SQUARE_MASK,
};
use crate::figures::{Corner, DotCell, DotKind, FigureDrawer, CORNERS};
use crate::paths::{PathSet, ShapeCache};
use crate::style::{Paint, RenderOptions};

pub mod canvas;
pub mod layout;
pub mod logo;
pub mod surface;
pub mod svg;

pub use canvas::*;
pub use layout::*;
pub use logo::*;
pub use surface::*;
pub use svg::*;

type FinderMask = [[bool; FINDER_SIZE]; FINDER_SIZE];

// Render session
//------------------------------------------------------------------------------

/// Renders module matrices with one asset loader and a shape cache that
/// persists across renders.
pub struct RenderSession<L: AssetLoader> {
    loader: L,
    shapes: ShapeCache,
}

/// Fill layers of one finder corner, resolved before drawing starts.
struct CornerPaints {
    corner: Corner,
    square_area: Rect,
    dot_area: Rect,
    square: Option<Paint>,
    dot: Option<Paint>,
}

impl<L: AssetLoader> RenderSession<L> {
    pub fn new(loader: L) -> Self {
        Self { loader, shapes: ShapeCache::new() }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn shapes(&self) -> &ShapeCache {
        &self.shapes
    }

    pub async fn render_svg<M: ModuleMatrix + ?Sized>(
        &mut self,
        matrix: &M,
        opts: &RenderOptions,
    ) -> RenderResult<SvgDocument> {
        self.render::<SvgSurface, M>(matrix, opts).await
    }

    pub async fn render_raster<M: ModuleMatrix + ?Sized>(
        &mut self,
        matrix: &M,
        opts: &RenderOptions,
    ) -> RenderResult<RgbaImage> {
        self.render::<RasterSurface, M>(matrix, opts).await
    }

    /// Draws `matrix` onto a fresh surface of type `S`. Layout and fills are
    /// resolved before the surface is created, so a failed render never draws.
    pub async fn render<S: Surface, M: ModuleMatrix + ?Sized>(
        &mut self,
        matrix: &M,
        opts: &RenderOptions,
    ) -> RenderResult<S::Output> {
        if !matrix.is_finalized() {
            return Err(RenderError::MatrixNotFinalized);
        }
        let n = matrix.module_count();

        let frame_art = match &opts.frame_options.image {
            Some(src) => self.load_image(src, "frame art").await?,
            None => None,
        };
        let layout = Layout::compute(opts, n, frame_art.as_ref().map(|a| (a.width, a.height)))?;
        let dot = layout.dot_size;

        let logo = match &opts.image {
            Some(src) => self.load_image(src, "logo").await?,
            None => None,
        };
        let logo_size = logo.as_ref().map(|img| {
            let level = opts.qr_options.error_correction_level;
            let max_hidden = level.max_hidden_dots(opts.image_options.image_size, n);
            calculate_image_size(img.width, img.height, max_hidden, max_hidden_axis_dots(n), dot)
        });

        let mut filter = ModuleFilter::new(n);
        if let Some(size) = logo_size.filter(|_| opts.image_options.hide_background_dots) {
            filter = filter.hiding(size.hide_x, size.hide_y);
        }

        if let Some(family) = opts.corners_square_options.kind.and_then(|k| k.path_family()) {
            self.shapes.load(PathSet::CornerSquare, family, &self.loader).await;
        }
        if let Some(family) = opts.corners_dot_options.kind.and_then(|k| k.path_family()) {
            self.shapes.load(PathSet::CornerDot, family, &self.loader).await;
        }

        let canvas_area = layout.canvas.area();
        let frame_paint = match &opts.frame_options.background {
            Some(fill) => fill.paint(0.0, canvas_area)?,
            None => None,
        };
        let background_area = layout.background_area();
        let background_paint = opts.background_options.fill.paint(0.0, background_area)?;
        let grid_area = layout.grid_area();
        let dots_paint = match opts.dots_options.fill.paint(0.0, grid_area)? {
            Some(paint) => paint,
            None => Paint::solid("#000")?,
        };
        let corners = CORNERS
            .iter()
            .map(|&corner| -> RenderResult<CornerPaints> {
                let square_area = layout.corner_square_area(&corner);
                let dot_area = layout.corner_dot_area(&corner);
                Ok(CornerPaints {
                    corner,
                    square_area,
                    dot_area,
                    square: opts.corners_square_options.fill.paint(corner.rotation, square_area)?,
                    dot: opts.corners_dot_options.fill.paint(corner.rotation, dot_area)?,
                })
            })
            .collect::<RenderResult<Vec<_>>>()?;

        debug!("Rendering {n}x{n} modules on a {}x{} canvas", layout.canvas.width, layout.canvas.height);
        let mut surface = S::create(layout.canvas)?;

        match &frame_paint {
            Some(paint) if !paint.is_invisible() => {
                surface.begin_layer("frame-background-color", paint, canvas_area);
                surface.fill_area(canvas_area, 0.0);
            }
            Some(_) => debug!("Frame background is transparent, skipping"),
            None => {}
        }
        if let Some(art) = &frame_art {
            surface.draw_frame_art(art);
        }

        match &background_paint {
            Some(paint) if !paint.is_invisible() => {
                let radius = opts.background_options.round * background_area.width().min(background_area.height()) / 2.0;
                surface.begin_layer("background-color", paint, background_area);
                surface.fill_area(background_area, radius);
            }
            Some(_) => debug!("Background is transparent, skipping"),
            None => {}
        }

        let kind = opts.dots_options.kind;
        let dots_layer = surface.begin_layer("dot-color", &dots_paint, grid_area);
        for r in 0..n {
            for c in 0..n {
                if !filter.allows(r, c) || !matrix.is_dark(r, c) {
                    continue;
                }
                let (x, y) = layout.module_origin(r, c);
                let q = |dx: isize, dy: isize| filter.neighbor(matrix, r, c, dx, dy);
                let fig = kind.resolve(DotCell::new(x, y, dot, c, r), &q);
                surface.draw_figure(&fig, &mut self.shapes);
            }
        }

        for (i, paints) in corners.iter().enumerate() {
            let Corner { col, row, rotation } = paints.corner;
            let (x, y) = (paints.square_area.x0, paints.square_area.y0);
            let index = i as u32;

            let square_layer = match &paints.square {
                Some(paint) => surface.begin_layer(&format!("corners-square-color-{col}-{row}"), paint, paints.square_area),
                None => {
                    surface.use_layer(dots_layer);
                    dots_layer
                }
            };
            match opts.corners_square_options.kind {
                Some(square) => {
                    let fig = square.resolve(x, y, dot * FINDER_SIZE as f64, rotation);
                    surface.draw_figure(&fig, &mut self.shapes);
                }
                None => draw_mask(&mut surface, &mut self.shapes, kind, &SQUARE_MASK, x, y, dot, index + 1),
            }

            match &paints.dot {
                Some(paint) => {
                    surface.begin_layer(&format!("corners-dot-color-{col}-{row}"), paint, paints.dot_area);
                }
                None => surface.use_layer(square_layer),
            }
            match opts.corners_dot_options.kind {
                Some(corner_dot) => {
                    let (dx, dy) = (paints.dot_area.x0, paints.dot_area.y0);
                    let fig = corner_dot.resolve(dx, dy, dot * FINDER_DOT_SIZE as f64, rotation);
                    surface.draw_figure(&fig, &mut self.shapes);
                }
                None => draw_mask(&mut surface, &mut self.shapes, kind, &DOT_MASK, x, y, dot, index + 4),
            }
        }

        if let (Some(image), Some(size)) = (&logo, &logo_size) {
            let area = layout.logo_area(size, opts.image_options.margin);
            if area.width() > 0.0 && area.height() > 0.0 {
                surface.draw_image(image, area);
            } else {
                warn!("Logo {} does not fit the module grid, skipping", image.src);
            }
        }

        surface.finish()
    }

    /// Loads an image for an optional layer. Only fatal errors abort the render,
    /// anything else drops that layer.
    async fn load_image(&self, src: &str, what: &str) -> RenderResult<Option<DecodedImage>> {
        match self.loader.load_image(src).await {
            Ok(img) if img.has_size() => Ok(Some(img)),
            Ok(img) => {
                warn!("Cannot size {what} {}, skipping", img.src);
                Ok(None)
            }
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                warn!("Cannot load {what} {src}: {err}");
                Ok(None)
            }
        }
    }
}

/// Draws the cells of a finder mask with a module kind, reading neighbors from the mask.
#[allow(clippy::too_many_arguments)]
fn draw_mask<S: Surface>(
    surface: &mut S,
    shapes: &mut ShapeCache,
    kind: DotKind,
    mask: &FinderMask,
    x: f64,
    y: f64,
    dot: f64,
    corner: u32,
) {
    for r in 0..FINDER_SIZE {
        for c in 0..FINDER_SIZE {
            if !mask[r][c] {
                continue;
            }
            let q = |dx: isize, dy: isize| mask_at(mask, r as isize + dy, c as isize + dx);
            let cell = DotCell::new(x + c as f64 * dot, y + r as f64 * dot, dot, c, r).corner(corner);
            surface.draw_figure(&kind.resolve(cell, &q), shapes);
        }
    }
}
