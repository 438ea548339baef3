use std::f64::consts::{FRAC_PI_2, PI};

use crate::paths::{PathSet, ShapeCache};

pub mod corner;
pub mod dot;

pub use corner::*;
pub use dot::*;

// Neighbors
//------------------------------------------------------------------------------

/// Answers whether the module at a relative offset is dark and drawable.
pub trait NeighborQuery {
    fn is_dark(&self, dx: isize, dy: isize) -> bool;
}

impl<F: Fn(isize, isize) -> bool> NeighborQuery for F {
    fn is_dark(&self, dx: isize, dy: isize) -> bool {
        self(dx, dy)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Neighbors {
    pub fn new(left: bool, right: bool, top: bool, bottom: bool) -> Self {
        Self { left, right, top, bottom }
    }

    pub fn query<Q: NeighborQuery + ?Sized>(q: &Q) -> Self {
        Self { left: q.is_dark(-1, 0), right: q.is_dark(1, 0), top: q.is_dark(0, -1), bottom: q.is_dark(0, 1) }
    }

    pub fn count(self) -> u8 {
        self.left as u8 + self.right as u8 + self.top as u8 + self.bottom as u8
    }

    /// Rotation turning a single-sided figure towards its occupied neighbor.
    pub fn side_rotation(self) -> f64 {
        if self.right {
            PI
        } else if self.top {
            FRAC_PI_2
        } else if self.bottom {
            -FRAC_PI_2
        } else {
            0.0
        }
    }

    /// All 16 occupancy combinations, bit 0 is left through bit 3 bottom.
    pub fn all() -> impl Iterator<Item = Self> {
        (0u8..16).map(|b| Self::new(b & 1 != 0, b & 2 != 0, b & 4 != 0, b & 8 != 0))
    }
}

// Figure
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Dot,
    ReducedDot { base: f64 },
    Square,
    ReducedSquare { base: f64 },
    Rectangle { x_size: f64, y_size: f64 },
    SideRounded,
    ReducedSideRounded { base: f64 },
    CornerRounded,
    CornerExtraRounded,
    CornersRounded,
    CornerRibbon,
    Diamond,
    SideDiamond,
    CornerDiamond,

    // Finder rings
    RingDot,
    RingSquare,
    RingExtraRounded,

    Path { set: PathSet, family: &'static str },
}

/// Placement shared by every basic figure. Rotation is applied about the figure's own center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureArgs {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
}

impl FigureArgs {
    pub fn new(x: f64, y: f64, size: f64, rotation: f64) -> Self {
        Self { x, y, size, rotation }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    /// Offset of a reduced square inside its `base` cell.
    pub fn reduced_offset(&self, base: f64) -> f64 {
        ((base - self.size) / 2.0).round()
    }

    /// Unrotated top-left corner and length of a reduced side-rounded cap of
    /// thickness `size` inside a `base` cell. Once rotated about its own center
    /// the cap is flush with the side its rotation points away from.
    pub fn reduced_side_rounded(&self, base: f64) -> (f64, f64, f64) {
        let s = self.size;
        let len = base / 2.0 + s / 2.0;
        if self.rotation == FRAC_PI_2 || self.rotation == -FRAC_PI_2 {
            let dy = if self.rotation == FRAC_PI_2 { 0.0 } else { base / 2.0 - s / 2.0 };
            (self.x + (base - len) / 2.0, self.y + (base - len) / 2.0 + dy, len)
        } else {
            let dx = if self.rotation == 0.0 { 0.0 } else { base - len };
            (self.x + dx, self.y + (base - s) / 2.0, len)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub shape: Shape,
    pub args: FigureArgs,
}

impl Figure {
    pub fn new(shape: Shape, x: f64, y: f64, size: f64, rotation: f64) -> Self {
        Self { shape, args: FigureArgs::new(x, y, size, rotation) }
    }

    pub fn rotation(&self) -> f64 {
        self.args.rotation
    }
}

// Figure drawer
//------------------------------------------------------------------------------

/// Basic figures a drawing backend must provide. Every figure is drawn in a local
/// frame rotated about its own center; `rotation == 0` points the rounded or open
/// feature to the right.
pub trait FigureDrawer {
    fn basic_dot(&mut self, args: FigureArgs);

    /// Dot of `args.size` centered in a `base` cell.
    fn basic_reduced_dot(&mut self, args: FigureArgs, base: f64);

    fn basic_square(&mut self, args: FigureArgs);

    fn basic_reduced_square(&mut self, args: FigureArgs, base: f64);

    /// Axis-aligned rectangle centered on the shorter side of its cell.
    fn basic_rectangle(&mut self, x: f64, y: f64, x_size: f64, y_size: f64);

    /// Right side rounded.
    fn basic_side_rounded(&mut self, args: FigureArgs);

    /// Half-length side-rounded cap flush with the occupied side of a `base` cell.
    fn basic_reduced_side_rounded(&mut self, args: FigureArgs, base: f64);

    /// Top right corner rounded.
    fn basic_corner_rounded(&mut self, args: FigureArgs);

    /// Top right corner rounded with a full-size radius.
    fn basic_corner_extra_rounded(&mut self, args: FigureArgs);

    /// Bottom left and top right corners rounded.
    fn basic_corners_rounded(&mut self, args: FigureArgs);

    fn basic_corner_ribbon(&mut self, args: FigureArgs);

    fn basic_diamond(&mut self, args: FigureArgs);

    fn basic_side_diamond(&mut self, args: FigureArgs);

    fn basic_corner_diamond(&mut self, args: FigureArgs);

    fn ring_dot(&mut self, args: FigureArgs);

    fn ring_square(&mut self, args: FigureArgs);

    fn ring_extra_rounded(&mut self, args: FigureArgs);

    /// Fills a compiled path anchored at `(args.x, args.y)`.
    fn compiled_path(&mut self, path: &str, args: FigureArgs);

    fn draw_figure(&mut self, fig: &Figure, shapes: &mut ShapeCache) {
        let args = fig.args;
        match fig.shape {
            Shape::Dot => self.basic_dot(args),
            Shape::ReducedDot { base } => self.basic_reduced_dot(args, base),
            Shape::Square => self.basic_square(args),
            Shape::ReducedSquare { base } => self.basic_reduced_square(args, base),
            Shape::Rectangle { x_size, y_size } => self.basic_rectangle(args.x, args.y, x_size, y_size),
            Shape::SideRounded => self.basic_side_rounded(args),
            Shape::ReducedSideRounded { base } => self.basic_reduced_side_rounded(args, base),
            Shape::CornerRounded => self.basic_corner_rounded(args),
            Shape::CornerExtraRounded => self.basic_corner_extra_rounded(args),
            Shape::CornersRounded => self.basic_corners_rounded(args),
            Shape::CornerRibbon => self.basic_corner_ribbon(args),
            Shape::Diamond => self.basic_diamond(args),
            Shape::SideDiamond => self.basic_side_diamond(args),
            Shape::CornerDiamond => self.basic_corner_diamond(args),
            Shape::RingDot => self.ring_dot(args),
            Shape::RingSquare => self.ring_square(args),
            Shape::RingExtraRounded => self.ring_extra_rounded(args),
            Shape::Path { set, family } => {
                let path = shapes.build(set, family, args.size, args.x, args.y);
                if !path.is_empty() {
                    self.compiled_path(&path, args);
                }
            }
        }
    }
}

#[cfg(test)]
mod neighbors_tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use test_case::test_case;

    use super::Neighbors;

    #[test]
    fn test_query() {
        let q = |dx: isize, dy: isize| dx == 1 || dy == -1;
        let n = Neighbors::query(&q);
        assert_eq!(n, Neighbors::new(false, true, true, false));
        assert_eq!(n.count(), 2);
    }

    #[test_case(Neighbors::new(true, true, true, true), PI; "right_wins")]
    #[test_case(Neighbors::new(true, false, true, true), FRAC_PI_2; "top")]
    #[test_case(Neighbors::new(true, false, false, true), -FRAC_PI_2; "bottom")]
    #[test_case(Neighbors::new(true, false, false, false), 0.0; "left")]
    #[test_case(Neighbors::default(), 0.0; "none")]
    fn test_side_rotation(n: Neighbors, exp: f64) {
        assert_eq!(n.side_rotation(), exp);
    }

    #[test_case(0.0, (0.0, 0.7, 9.3); "left_flush")]
    #[test_case(PI, (0.7, 0.7, 9.3); "right_flush")]
    #[test_case(FRAC_PI_2, (0.35, 0.35, 9.3); "top_flush")]
    #[test_case(-FRAC_PI_2, (0.35, 1.05, 9.3); "bottom_flush")]
    fn test_reduced_side_rounded(rotation: f64, exp: (f64, f64, f64)) {
        let args = super::FigureArgs::new(0.0, 0.0, 8.6, rotation);
        let (x, y, len) = args.reduced_side_rounded(10.0);
        assert!((x - exp.0).abs() < 1e-9 && (y - exp.1).abs() < 1e-9 && (len - exp.2).abs() < 1e-9, "{x} {y} {len}");
    }

    #[test]
    fn test_all_combinations() {
        let all = Neighbors::all().collect::<Vec<_>>();
        assert_eq!(all.len(), 16);
        assert_eq!(all.iter().map(|n| n.count() as usize).sum::<usize>(), 32);
    }
}
