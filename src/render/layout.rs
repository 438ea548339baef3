use kurbo::Rect;
use log::debug;

use super::logo::ImageSize;
use crate::common::{RenderError, RenderResult, FINDER_DOT_SIZE, FINDER_SIZE};
use crate::figures::Corner;
use crate::style::RenderOptions;

// Canvas size
//------------------------------------------------------------------------------

/// Logical drawing space and the pixel size it is displayed at. The two only
/// differ when frame art dictates the logical space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
    pub display_width: u32,
    pub display_height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: width as f64, height: height as f64, display_width: width, display_height: height }
    }

    pub fn area(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Display pixels per logical unit along each axis.
    pub fn scale(&self) -> (f64, f64) {
        (self.display_width as f64 / self.width, self.display_height as f64 / self.height)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Insets {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Insets {
    pub fn x_padding(&self) -> f64 {
        self.left + self.right
    }

    pub fn y_padding(&self) -> f64 {
        self.top + self.bottom
    }

    fn scaled(self, k: f64) -> Self {
        Self {
            left: (self.left * k).round(),
            right: (self.right * k).round(),
            top: (self.top * k).round(),
            bottom: (self.bottom * k).round(),
        }
    }
}

// Layout
//------------------------------------------------------------------------------

/// Placement of the module grid on the canvas for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub count: usize,
    pub dot_size: f64,
    pub x_begin: f64,
    pub y_begin: f64,
    pub margin: f64,
    pub insets: Insets,
    pub canvas: CanvasSize,
}

impl Layout {
    /// Fits `count` modules into the surface described by `opts`. `frame_art` is
    /// the natural size of the frame image, which rescales insets and canvas.
    pub fn compute(opts: &RenderOptions, count: usize, frame_art: Option<(f64, f64)>) -> RenderResult<Self> {
        if count < FINDER_SIZE {
            return Err(RenderError::InvalidMatrix(format!("{count} modules cannot hold a finder pattern")));
        }

        let frame = &opts.frame_options;
        let mut insets =
            Insets { left: frame.left(), right: frame.right(), top: frame.top_size, bottom: frame.bottom_size };
        let mut margin = opts.margin;

        let canvas = match frame_art.filter(|(w, h)| *w > 0.0 && *h > 0.0) {
            Some((art_w, art_h)) => {
                let width = opts.width as f64;
                let k = art_w / (width + insets.x_padding());
                insets = insets.scaled(k);
                margin = (margin * k).round();
                CanvasSize {
                    width: art_w,
                    height: art_h,
                    display_width: opts.width,
                    display_height: (width * art_h / art_w).round() as u32,
                }
            }
            None => CanvasSize::new(opts.width, opts.height),
        };

        let n = count as f64;
        if n > canvas.width || n > canvas.height {
            return Err(RenderError::SurfaceTooSmall);
        }

        let available = canvas.width.min(canvas.height) - 2.0 * margin - insets.x_padding();
        let dot_size = (available / n).floor();
        if dot_size.is_nan() || dot_size < 1.0 {
            return Err(RenderError::SurfaceTooSmall);
        }

        let grid = n * dot_size;
        let x_begin = ((canvas.width - insets.x_padding() - grid) / 2.0).floor() + insets.left;
        let y_begin = ((canvas.height - insets.y_padding() - grid) / 2.0).floor() + insets.top;
        debug!(
            "Layout: {count} modules of {dot_size}px at ({x_begin}, {y_begin}) on {}x{} canvas",
            canvas.width, canvas.height
        );

        Ok(Self { count, dot_size, x_begin, y_begin, margin, insets, canvas })
    }

    pub fn grid_size(&self) -> f64 {
        self.count as f64 * self.dot_size
    }

    pub fn grid_area(&self) -> Rect {
        let s = self.grid_size();
        Rect::new(self.x_begin, self.y_begin, self.x_begin + s, self.y_begin + s)
    }

    /// Area covered by the content background: the canvas minus the frame insets.
    pub fn background_area(&self) -> Rect {
        let Insets { left, top, .. } = self.insets;
        let w = self.canvas.width - self.insets.x_padding();
        let h = self.canvas.height - self.insets.y_padding();
        Rect::new(left, top, left + w, top + h)
    }

    pub fn module_origin(&self, r: usize, c: usize) -> (f64, f64) {
        (self.x_begin + c as f64 * self.dot_size, self.y_begin + r as f64 * self.dot_size)
    }

    /// Top-left of a finder pattern.
    pub fn corner_origin(&self, corner: &Corner) -> (f64, f64) {
        let offset = self.dot_size * (self.count - FINDER_SIZE) as f64;
        (self.x_begin + corner.col as f64 * offset, self.y_begin + corner.row as f64 * offset)
    }

    pub fn corner_square_area(&self, corner: &Corner) -> Rect {
        let (x, y) = self.corner_origin(corner);
        Rect::from_origin_size((x, y), (self.dot_size * FINDER_SIZE as f64, self.dot_size * FINDER_SIZE as f64))
    }

    pub fn corner_dot_area(&self, corner: &Corner) -> Rect {
        let (x, y) = self.corner_origin(corner);
        let inset = self.dot_size * ((FINDER_SIZE - FINDER_DOT_SIZE) / 2) as f64;
        let size = self.dot_size * FINDER_DOT_SIZE as f64;
        Rect::from_origin_size((x + inset, y + inset), (size, size))
    }

    /// Logo rectangle, centered on the grid and shrunk by `margin` on each side.
    pub fn logo_area(&self, size: &ImageSize, margin: f64) -> Rect {
        let grid = self.grid_size();
        let x = self.x_begin + margin + (grid - size.width) / 2.0;
        let y = self.y_begin + margin + (grid - size.height) / 2.0;
        Rect::from_origin_size((x, y), (size.width - 2.0 * margin, size.height - 2.0 * margin))
    }
}

#[cfg(test)]
mod layout_tests {
    use kurbo::Rect;
    use test_case::test_case;

    use super::{CanvasSize, Layout};
    use crate::common::RenderError;
    use crate::figures::CORNERS;
    use crate::render::ImageSize;
    use crate::style::{FrameOptions, RenderOptions};

    fn opts(width: u32, height: u32, margin: f64) -> RenderOptions {
        RenderOptions { margin, ..RenderOptions::default().with_size(width, height) }
    }

    #[test_case(21, 210, 0.0, 10.0, 0.0; "exact_fit")]
    #[test_case(21, 300, 0.0, 14.0, 3.0; "centered")]
    #[test_case(25, 300, 10.0, 11.0, 12.0; "margin")]
    #[test_case(40, 100, 0.0, 2.0, 10.0; "small_modules")]
    fn test_compute(count: usize, size: u32, margin: f64, dot: f64, begin: f64) {
        let l = Layout::compute(&opts(size, size, margin), count, None).unwrap();
        assert_eq!((l.dot_size, l.x_begin, l.y_begin), (dot, begin, begin));
        assert_eq!(l.canvas, CanvasSize::new(size, size));
    }

    #[test_case(40, 30, 0.0; "more_modules_than_pixels")]
    #[test_case(21, 30, 10.0; "margin_eats_grid")]
    fn test_too_small(count: usize, size: u32, margin: f64) {
        assert_eq!(Layout::compute(&opts(size, size, margin), count, None), Err(RenderError::SurfaceTooSmall));
    }

    #[test_case(0; "empty")]
    #[test_case(5; "smaller_than_finder")]
    fn test_invalid_matrix(count: usize) {
        assert!(matches!(Layout::compute(&opts(100, 100, 0.0), count, None), Err(RenderError::InvalidMatrix(_))));
    }

    #[test]
    fn test_asymmetric_frame() {
        let mut o = opts(300, 340, 0.0);
        o.frame_options =
            FrameOptions { left_size: 10.0, right_size: 30.0, top_size: 20.0, bottom_size: 20.0, ..Default::default() };
        let l = Layout::compute(&o, 26, None).unwrap();
        // (300 - 40) / 26 = 10
        assert_eq!(l.dot_size, 10.0);
        assert_eq!(l.x_begin, 10.0);
        assert_eq!(l.y_begin, 20.0 + 20.0);
        assert_eq!(l.background_area(), Rect::new(10.0, 20.0, 270.0, 320.0));
    }

    #[test]
    fn test_frame_art_scaling() {
        let mut o = opts(200, 200, 5.0);
        o.frame_options = FrameOptions { x_size: 20.0, top_size: 10.0, bottom_size: 50.0, ..Default::default() };
        let l = Layout::compute(&o, 21, Some((480.0, 600.0))).unwrap();
        // 480 / (200 + 40) = 2
        assert_eq!((l.insets.left, l.insets.right, l.insets.top, l.insets.bottom), (40.0, 40.0, 20.0, 100.0));
        assert_eq!(l.margin, 10.0);
        assert_eq!(l.canvas, CanvasSize { width: 480.0, height: 600.0, display_width: 200, display_height: 250 });
        assert_eq!(l.dot_size, ((480.0 - 20.0 - 80.0) / 21.0_f64).floor());
    }

    #[test]
    fn test_corners() {
        let l = Layout::compute(&opts(210, 210, 0.0), 21, None).unwrap();
        let origins = CORNERS.iter().map(|c| l.corner_origin(c)).collect::<Vec<_>>();
        assert_eq!(origins, [(0.0, 0.0), (140.0, 0.0), (0.0, 140.0)]);
        assert_eq!(l.corner_square_area(&CORNERS[1]), Rect::new(140.0, 0.0, 210.0, 70.0));
        assert_eq!(l.corner_dot_area(&CORNERS[2]), Rect::new(20.0, 160.0, 50.0, 190.0));
        assert_eq!(l.module_origin(2, 3), (30.0, 20.0));
    }

    #[test]
    fn test_logo_area() {
        let l = Layout::compute(&opts(250, 250, 0.0), 25, None).unwrap();
        let size = ImageSize { hide_x: 7, hide_y: 7, width: 70.0, height: 70.0 };
        assert_eq!(l.logo_area(&size, 5.0), Rect::new(95.0, 95.0, 155.0, 155.0));
    }
}
