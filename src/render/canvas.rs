use std::f64::consts::{FRAC_PI_2, PI, TAU};

use image::RgbaImage;
use kurbo::{Affine, Arc, BezPath, PathEl, Point, Rect, RoundedRect, Shape, Vec2};
use log::warn;
use tiny_skia::{
    FillRule, FilterQuality, GradientStop, IntSize, LinearGradient, Pixmap, PixmapPaint, RadialGradient, Shader,
    SpreadMode, Transform,
};

use super::{CanvasSize, LayerId, Surface};
use crate::assets::DecodedImage;
use crate::common::{RenderError, RenderResult};
use crate::figures::{FigureArgs, FigureDrawer};
use crate::style::{CssColor, GradientGeometry, Paint};

const ARC_TOLERANCE: f64 = 0.1;

// Canvas
//------------------------------------------------------------------------------

/// Immediate-mode 2D context over a pixmap: build a path under the current
/// transform, then fill it. Coordinates are logical; the pixmap is addressed in
/// display pixels.
pub struct Canvas {
    pixmap: Pixmap,
    base: Transform,
    transform: Affine,
    path: BezPath,
    open: bool,
}

impl Canvas {
    pub fn new(size: CanvasSize) -> RenderResult<Self> {
        let (w, h) = (size.display_width, size.display_height);
        let pixmap = Pixmap::new(w, h).ok_or(RenderError::SurfaceAllocation { width: w, height: h })?;
        let (sx, sy) = size.scale();
        Ok(Self {
            pixmap,
            base: Transform::from_scale(sx as f32, sy as f32),
            transform: Affine::IDENTITY,
            path: BezPath::new(),
            open: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Moves the origin to `(cx, cy)` and rotates the axes by `rotation`.
    pub fn set_origin(&mut self, cx: f64, cy: f64, rotation: f64) {
        self.transform = Affine::translate((cx, cy)) * Affine::rotate(rotation);
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    pub fn reset_transform(&mut self) {
        self.transform = Affine::IDENTITY;
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(self.transform * Point::new(x, y));
        self.open = true;
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        if !self.open {
            return self.move_to(x, y);
        }
        self.path.line_to(self.transform * Point::new(x, y));
    }

    /// Circular arc from `start` to `end` radians, joined to the current point by a line.
    pub fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, anticlockwise: bool) {
        let sweep = if anticlockwise {
            if start - end >= TAU {
                -TAU
            } else {
                -(start - end).rem_euclid(TAU)
            }
        } else if end - start >= TAU {
            TAU
        } else {
            (end - start).rem_euclid(TAU)
        };

        let center = Point::new(cx, cy);
        let from = center + Vec2::from_angle(start) * r;
        self.line_to(from.x, from.y);

        let arc = Arc { center, radii: Vec2::new(r, r), start_angle: start, sweep_angle: sweep, x_rotation: 0.0 };
        for el in arc.append_iter(ARC_TOLERANCE) {
            self.path.push(self.transform * el);
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close_path();
    }

    pub fn close_path(&mut self) {
        if self.open {
            self.path.close_path();
            self.open = false;
        }
    }

    /// Appends an already built path under the current transform.
    pub fn append(&mut self, path: &BezPath) {
        for el in path.elements() {
            self.path.push(self.transform * *el);
        }
        self.open = !matches!(path.elements().last(), Some(PathEl::ClosePath) | None);
    }

    /// Fills the current path and starts a new one.
    pub fn fill(&mut self, paint: &tiny_skia::Paint, rule: FillRule) {
        let path = std::mem::take(&mut self.path);
        self.open = false;
        if let Some(path) = to_skia_path(&path) {
            self.pixmap.fill_path(&path, paint, rule, self.base, None);
        }
    }

    /// Draws `image` stretched over `area`.
    pub fn draw_pixels(&mut self, image: &RgbaImage, area: Rect) {
        let Some(pixmap) = to_pixmap(image) else {
            return;
        };
        let sx = area.width() / image.width() as f64;
        let sy = area.height() / image.height() as f64;
        if !(sx.is_finite() && sy.is_finite()) || sx <= 0.0 || sy <= 0.0 {
            return;
        }

        let paint = PixmapPaint { quality: FilterQuality::Bicubic, ..PixmapPaint::default() };
        let ts = Transform::from_row(sx as f32, 0.0, 0.0, sy as f32, area.x0 as f32, area.y0 as f32);
        self.pixmap.draw_pixmap(0, 0, pixmap.as_ref(), &paint, self.base.pre_concat(ts), None);
    }

    pub fn into_image(self) -> RenderResult<RgbaImage> {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RgbaImage::from_raw(w, h, data).ok_or(RenderError::SurfaceAllocation { width: w, height: h })
    }
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => {
                pb.cubic_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32, p3.x as f32, p3.y as f32)
            }
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Premultiplies straight RGBA pixels into a pixmap.
fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let data = image
        .pixels()
        .flat_map(|p| {
            let [r, g, b, a] = p.0;
            let mul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
            [mul(r), mul(g), mul(b), a]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

fn skia_color(c: &CssColor) -> tiny_skia::Color {
    let [r, g, b, a] = c.rgba();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn skia_point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x as f32, p.y as f32)
}

pub fn skia_paint(paint: &Paint) -> tiny_skia::Paint<'static> {
    let mut sp = tiny_skia::Paint { anti_alias: true, ..tiny_skia::Paint::default() };
    match paint {
        Paint::Solid(c) => sp.shader = Shader::SolidColor(skia_color(c)),
        Paint::Gradient { geometry, stops } => {
            let fallback = stops.first().map(|s| skia_color(&s.color)).unwrap_or(tiny_skia::Color::TRANSPARENT);
            let stops = stops.iter().map(|s| GradientStop::new(s.offset as f32, skia_color(&s.color))).collect();
            let shader = match *geometry {
                GradientGeometry::Linear { start, end } => LinearGradient::new(
                    skia_point(start),
                    skia_point(end),
                    stops,
                    SpreadMode::Pad,
                    Transform::identity(),
                ),
                GradientGeometry::Radial { center, radius } => RadialGradient::new(
                    skia_point(center),
                    skia_point(center),
                    radius as f32,
                    stops,
                    SpreadMode::Pad,
                    Transform::identity(),
                ),
            };
            sp.shader = shader.unwrap_or(Shader::SolidColor(fallback));
        }
    }
    sp
}

// Raster surface
//------------------------------------------------------------------------------

/// Surface painting straight into pixels. Each figure is filled as soon as it is
/// drawn with the paint of the current layer, under the nonzero rule except for
/// rings, whose two contours share a direction.
pub struct RasterSurface {
    canvas: Canvas,
    layers: Vec<tiny_skia::Paint<'static>>,
    current: Option<usize>,
    ink: tiny_skia::Paint<'static>,
}

impl RasterSurface {
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Draws a figure in a frame centered on `(cx, cy)` and rotated by `rotation`, then fills it.
    fn figure(&mut self, cx: f64, cy: f64, rotation: f64, draw: impl FnOnce(&mut Canvas)) {
        self.trace(FillRule::Winding, cx, cy, rotation, draw);
    }

    fn ring(&mut self, cx: f64, cy: f64, rotation: f64, draw: impl FnOnce(&mut Canvas)) {
        self.trace(FillRule::EvenOdd, cx, cy, rotation, draw);
    }

    fn trace(&mut self, rule: FillRule, cx: f64, cy: f64, rotation: f64, draw: impl FnOnce(&mut Canvas)) {
        self.canvas.set_origin(cx, cy, rotation);
        draw(&mut self.canvas);
        self.canvas.close_path();
        self.canvas.reset_transform();
        self.fill(rule);
    }

    fn fill(&mut self, rule: FillRule) {
        let paint = match self.current {
            Some(i) => &self.layers[i],
            None => &self.ink,
        };
        self.canvas.fill(paint, rule);
    }
}

impl Surface for RasterSurface {
    type Output = RgbaImage;

    fn create(size: CanvasSize) -> RenderResult<Self> {
        let mut ink = tiny_skia::Paint { anti_alias: true, ..tiny_skia::Paint::default() };
        ink.set_color_rgba8(0, 0, 0, 255);
        Ok(Self { canvas: Canvas::new(size)?, layers: Vec::new(), current: None, ink })
    }

    fn begin_layer(&mut self, _name: &str, paint: &Paint, _area: Rect) -> LayerId {
        self.layers.push(skia_paint(paint));
        let id = self.layers.len() - 1;
        self.current = Some(id);
        LayerId(id)
    }

    fn use_layer(&mut self, layer: LayerId) {
        if layer.0 < self.layers.len() {
            self.current = Some(layer.0);
        }
    }

    fn fill_area(&mut self, area: Rect, radius: f64) {
        if radius > 0.0 {
            let path = RoundedRect::from_rect(area, radius).to_path(ARC_TOLERANCE);
            self.canvas.append(&path);
        } else {
            self.canvas.rect(area.x0, area.y0, area.width(), area.height());
        }
        self.fill(FillRule::Winding);
    }

    fn draw_frame_art(&mut self, art: &DecodedImage) {
        match &art.pixels {
            Some(pixels) => {
                let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
                let area = Rect::new(0.0, 0.0, w, h);
                // Frame art covers the whole display, undo the logical scale.
                let base = self.canvas.base;
                self.canvas.base = Transform::identity();
                self.canvas.draw_pixels(pixels, area);
                self.canvas.base = base;
            }
            None => warn!("Frame art {} has no raster pixels, skipping", art.src),
        }
    }

    fn draw_image(&mut self, image: &DecodedImage, area: Rect) {
        match &image.pixels {
            Some(pixels) => self.canvas.draw_pixels(pixels, area),
            None => warn!("Image {} has no raster pixels, skipping", image.src),
        }
    }

    fn finish(self) -> RenderResult<RgbaImage> {
        self.canvas.into_image()
    }
}

impl FigureDrawer for RasterSurface {
    fn basic_dot(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        self.figure(cx, cy, a.rotation, |c| c.arc(0.0, 0.0, a.size / 2.0, 0.0, TAU, false));
    }

    fn basic_reduced_dot(&mut self, a: FigureArgs, base: f64) {
        self.figure(a.x + base / 2.0, a.y + base / 2.0, a.rotation, |c| {
            c.arc(0.0, 0.0, a.size / 2.0, 0.0, TAU, false)
        });
    }

    fn basic_square(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        self.figure(cx, cy, a.rotation, |c| c.rect(-h, -h, a.size, a.size));
    }

    fn basic_reduced_square(&mut self, a: FigureArgs, base: f64) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        let off = a.reduced_offset(base);
        self.figure(cx, cy, a.rotation, |c| c.rect(off - h, off - h, a.size, a.size));
    }

    fn basic_rectangle(&mut self, x: f64, y: f64, x_size: f64, y_size: f64) {
        let (x, y) = if x_size < y_size { (x + (y_size - x_size) / 2.0, y) } else { (x, y + (x_size - y_size) / 2.0) };
        self.figure(x, y, 0.0, |c| c.rect(0.0, 0.0, x_size, y_size));
    }

    fn basic_side_rounded(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        self.figure(cx, cy, a.rotation, |c| {
            c.move_to(-h, -h);
            c.line_to(-h, h);
            c.line_to(0.0, h);
            c.arc(0.0, 0.0, h, FRAC_PI_2, -FRAC_PI_2, true);
        });
    }

    fn basic_reduced_side_rounded(&mut self, a: FigureArgs, base: f64) {
        let (x, y, len) = a.reduced_side_rounded(base);
        let (h, l) = (a.size / 2.0, len / 2.0);
        self.figure(x + l, y + h, a.rotation, |c| {
            c.move_to(-l, -h);
            c.line_to(-l, h);
            c.line_to(-l + base / 2.0, h);
            c.arc(-l + base / 2.0, 0.0, h, FRAC_PI_2, -FRAC_PI_2, true);
        });
    }

    fn basic_corner_rounded(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        self.figure(cx, cy, a.rotation, |c| {
            c.move_to(-h, -h);
            c.line_to(-h, h);
            c.line_to(h, h);
            c.line_to(h, 0.0);
            c.arc(0.0, 0.0, h, 0.0, -FRAC_PI_2, true);
        });
    }

    fn basic_corner_extra_rounded(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        self.figure(cx, cy, a.rotation, |c| {
            c.move_to(-h, -h);
            c.line_to(-h, h);
            c.line_to(h, h);
            c.arc(-h, h, a.size, 0.0, -FRAC_PI_2, true);
        });
    }

    fn basic_corners_rounded(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        self.figure(cx, cy, a.rotation, |c| {
            c.move_to(-h, -h);
            c.line_to(-h, 0.0);
            c.arc(0.0, 0.0, h, PI, FRAC_PI_2, true);
            c.line_to(h, h);
            c.line_to(h, 0.0);
            c.arc(0.0, 0.0, h, 0.0, -FRAC_PI_2, true);
        });
    }

    fn basic_corner_ribbon(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        self.figure(cx, cy, a.rotation, |c| {
            c.move_to(-h, -h);
            c.line_to(h, -h);
            c.line_to(0.0, 0.0);
            c.line_to(h, h);
            c.line_to(-h, h);
        });
    }

    fn basic_diamond(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        self.figure(cx, cy, a.rotation, |c| {
            c.move_to(0.0, -h);
            c.line_to(h, 0.0);
            c.line_to(0.0, h);
            c.line_to(-h, 0.0);
        });
    }

    fn basic_side_diamond(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        self.figure(cx, cy, a.rotation, |c| {
            c.move_to(-h, -h);
            c.line_to(0.0, -h);
            c.line_to(h, 0.0);
            c.line_to(0.0, h);
            c.line_to(-h, h);
        });
    }

    fn basic_corner_diamond(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let h = a.size / 2.0;
        self.figure(cx, cy, a.rotation, |c| {
            c.move_to(-h, -h);
            c.line_to(0.0, -h);
            c.line_to(h, 0.0);
            c.line_to(h, h);
            c.line_to(-h, h);
        });
    }

    fn ring_dot(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let (h, d) = (a.size / 2.0, a.size / 7.0);
        self.ring(cx, cy, a.rotation, |c| {
            c.arc(0.0, 0.0, h, 0.0, TAU, false);
            c.close_path();
            c.arc(0.0, 0.0, h - d, 0.0, TAU, false);
        });
    }

    fn ring_square(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let (h, d) = (a.size / 2.0, a.size / 7.0);
        self.ring(cx, cy, a.rotation, |c| {
            c.rect(-h, -h, a.size, a.size);
            c.rect(-h + d, -h + d, a.size - 2.0 * d, a.size - 2.0 * d);
        });
    }

    fn ring_extra_rounded(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let d = a.size / 7.0;
        self.ring(cx, cy, a.rotation, |c| {
            for (r, edge) in [(2.5 * d, 3.5 * d), (1.5 * d, 2.5 * d)] {
                c.arc(-d, -d, r, PI, -FRAC_PI_2, false);
                c.line_to(d, -edge);
                c.arc(d, -d, r, -FRAC_PI_2, 0.0, false);
                c.line_to(edge, d);
                c.arc(d, d, r, 0.0, FRAC_PI_2, false);
                c.line_to(-d, edge);
                c.arc(-d, d, r, FRAC_PI_2, PI, false);
                c.line_to(-edge, -d);
                c.close_path();
            }
        });
    }

    fn compiled_path(&mut self, path: &str, a: FigureArgs) {
        let parsed = match BezPath::from_svg(path) {
            Ok(p) => p,
            Err(e) => {
                warn!("Cannot rasterize compiled path: {e}");
                return;
            }
        };
        let (cx, cy) = a.center();
        self.canvas.set_transform(Affine::rotate_about(a.rotation, Point::new(cx, cy)));
        self.canvas.append(&parsed);
        self.canvas.close_path();
        self.canvas.reset_transform();
        self.fill(FillRule::Winding);
    }
}

#[cfg(test)]
mod raster_tests {
    use std::f64::consts::PI;

    use image::Rgba;
    use kurbo::Rect;
    use test_case::test_case;

    use super::{Canvas, RasterSurface};
    use crate::common::RenderError;
    use crate::figures::{FigureArgs, FigureDrawer};
    use crate::render::{CanvasSize, Surface};
    use crate::style::{ColorStop, Gradient, Paint};

    fn surface(size: u32) -> RasterSurface {
        RasterSurface::create(CanvasSize::new(size, size)).unwrap()
    }

    fn red() -> Paint {
        Paint::solid("#f00").unwrap()
    }

    #[test]
    fn test_allocation_failure() {
        assert!(matches!(
            Canvas::new(CanvasSize::new(0, 10)),
            Err(RenderError::SurfaceAllocation { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_square_fills_cell() {
        let mut s = surface(20);
        s.begin_layer("dot-color", &red(), Rect::new(0.0, 0.0, 20.0, 20.0));
        s.basic_square(FigureArgs::new(10.0, 0.0, 10.0, 0.0));
        let img = s.finish().unwrap();
        assert_eq!(img.get_pixel(15, 5), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(5, 5)[3], 0);
    }

    #[test]
    fn test_dot_leaves_corners_empty() {
        let mut s = surface(20);
        s.basic_dot(FigureArgs::new(0.0, 0.0, 20.0, 0.0));
        let img = s.finish().unwrap();
        assert_eq!(img.get_pixel(10, 10), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_side_rounded_rotation() {
        // Unrotated the rounded side faces right; rotated by π it faces left.
        let mut s = surface(20);
        s.basic_side_rounded(FigureArgs::new(0.0, 0.0, 20.0, PI));
        let img = s.finish().unwrap();
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(19, 0)[3], 255);
    }

    #[test]
    fn test_ring_has_hole() {
        let mut s = surface(70);
        s.ring_square(FigureArgs::new(0.0, 0.0, 70.0, 0.0));
        let img = s.finish().unwrap();
        assert_eq!(img.get_pixel(5, 35)[3], 255);
        assert_eq!(img.get_pixel(35, 35)[3], 0);
    }

    #[test]
    fn test_compiled_path() {
        let mut s = surface(20);
        s.compiled_path("m 0 0 h 10 v 10 h -10 z", FigureArgs::new(0.0, 0.0, 10.0, 0.0));
        let img = s.finish().unwrap();
        assert_eq!(img.get_pixel(5, 5)[3], 255);
        assert_eq!(img.get_pixel(15, 15)[3], 0);
    }

    #[test_case("m 0 0 h 20 v 20 h -20 z m 5 5 h 10 v 10 h -10 z", 255; "same_direction")]
    #[test_case("m 0 0 h 20 v 20 h -20 z m 5 5 v 10 h 10 v -10 z", 0; "reversed")]
    fn test_compiled_path_nonzero(path: &str, center_alpha: u8) {
        let mut s = surface(20);
        s.compiled_path(path, FigureArgs::new(0.0, 0.0, 20.0, 0.0));
        let img = s.finish().unwrap();
        assert_eq!(img.get_pixel(10, 10)[3], center_alpha);
        assert_eq!(img.get_pixel(2, 10)[3], 255);
    }

    #[test]
    fn test_layers_and_gradient() {
        let mut s = surface(20);
        let area = Rect::new(0.0, 0.0, 20.0, 20.0);
        let g = Gradient::linear(0.0, vec![ColorStop::new(0.0, "#000"), ColorStop::new(1.0, "#fff")]);
        let grad = s.begin_layer("background-color", &Paint::gradient(&g, 0.0, area).unwrap(), area);
        s.fill_area(area, 0.0);
        s.begin_layer("dot-color", &red(), area);
        s.use_layer(grad);
        s.basic_square(FigureArgs::new(0.0, 0.0, 1.0, 0.0));
        let img = s.finish().unwrap();
        assert!(img.get_pixel(1, 10)[0] < img.get_pixel(18, 10)[0]);
        assert_eq!(img.get_pixel(18, 10)[3], 255);
    }

    #[test]
    fn test_display_scale() {
        let size = CanvasSize { width: 40.0, height: 40.0, display_width: 20, display_height: 20 };
        let mut s = RasterSurface::create(size).unwrap();
        s.basic_square(FigureArgs::new(20.0, 20.0, 20.0, 0.0));
        let img = s.finish().unwrap();
        assert_eq!(img.dimensions(), (20, 20));
        assert_eq!(img.get_pixel(15, 15)[3], 255);
        assert_eq!(img.get_pixel(5, 5)[3], 0);
    }
}
