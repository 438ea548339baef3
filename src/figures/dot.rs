use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use super::{Figure, NeighborQuery, Neighbors, Shape};
use crate::paths::PathSet;

// Dot kind
//------------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotKind {
    Dots,
    Rounded,
    Classy,
    ClassyRounded,
    #[default]
    Square,
    ExtraRounded,
    HorizontalRounded,
    VerticalRounded,
    Star,
    Diamond,
    X,
    Cross,
    CrossRounded,
    XRounded,
    Heart,
    Sparkle,
    Ribbon,
    DiamondSpecial,
    Shake,
}

impl DotKind {
    pub const ALL: [Self; 19] = [
        Self::Dots,
        Self::Rounded,
        Self::Classy,
        Self::ClassyRounded,
        Self::Square,
        Self::ExtraRounded,
        Self::HorizontalRounded,
        Self::VerticalRounded,
        Self::Star,
        Self::Diamond,
        Self::X,
        Self::Cross,
        Self::CrossRounded,
        Self::XRounded,
        Self::Heart,
        Self::Sparkle,
        Self::Ribbon,
        Self::DiamondSpecial,
        Self::Shake,
    ];

    /// Name of the path family drawn for neighbor-independent kinds.
    pub fn path_family(self) -> Option<&'static str> {
        match self {
            Self::Star => Some("star"),
            Self::Diamond => Some("diamond"),
            Self::X => Some("x"),
            Self::Cross => Some("cross"),
            Self::CrossRounded => Some("cross-rounded"),
            Self::XRounded => Some("x-rounded"),
            Self::Heart => Some("heart"),
            Self::Sparkle => Some("sparkle"),
            _ => None,
        }
    }
}

// Module cell
//------------------------------------------------------------------------------

/// Pixel placement and grid position of one module. `corner` is 0 for the
/// module field, 1..=3 for finder squares and 4..=6 for finder dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotCell {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub col: usize,
    pub row: usize,
    pub corner: u32,
}

impl DotCell {
    pub fn new(x: f64, y: f64, size: f64, col: usize, row: usize) -> Self {
        Self { x, y, size, col, row, corner: 0 }
    }

    pub fn corner(mut self, corner: u32) -> Self {
        self.corner = corner;
        self
    }

    fn figure(&self, shape: Shape, rotation: f64) -> Figure {
        Figure::new(shape, self.x, self.y, self.size, rotation)
    }
}

// Resolver
//------------------------------------------------------------------------------

const REDUCED_RATIO: f64 = 0.86;
const SHAKE_RATIO: f64 = 0.9;

impl DotKind {
    /// Picks the figure for one dark module from its kind and drawable neighbors.
    pub fn resolve<Q: NeighborQuery + ?Sized>(self, cell: DotCell, q: &Q) -> Figure {
        match self {
            Self::Dots => cell.figure(Shape::Dot, 0.0),
            Self::Square => cell.figure(Shape::Square, 0.0),
            Self::Shake => shake(cell),
            kind => match kind.path_family() {
                Some(family) => cell.figure(Shape::Path { set: PathSet::Dot, family }, 0.0),
                None => kind.resolve_neighbors(cell, Neighbors::query(q)),
            },
        }
    }

    pub fn resolve_neighbors(self, cell: DotCell, n: Neighbors) -> Figure {
        match self {
            Self::Rounded => rounded(cell, n, Shape::CornerRounded),
            Self::ExtraRounded => rounded(cell, n, Shape::CornerExtraRounded),
            Self::Classy => classy(cell, n, Shape::CornerRounded),
            Self::ClassyRounded => classy(cell, n, Shape::CornerExtraRounded),
            Self::HorizontalRounded => axis_rounded(cell, n.left, n.right, true),
            Self::VerticalRounded => axis_rounded(cell, n.top, n.bottom, false),
            Self::Ribbon => ribbon(cell, n),
            Self::DiamondSpecial => diamond_special(cell, n),
            kind => kind.resolve(cell, &|_: isize, _: isize| false),
        }
    }
}

fn corner_rotation(n: Neighbors) -> f64 {
    if n.left && n.top {
        FRAC_PI_2
    } else if n.top && n.right {
        PI
    } else if n.right && n.bottom {
        -FRAC_PI_2
    } else {
        0.0
    }
}

fn single_side_rotation(n: Neighbors) -> f64 {
    if n.top {
        FRAC_PI_2
    } else if n.right {
        PI
    } else if n.bottom {
        -FRAC_PI_2
    } else {
        0.0
    }
}

fn rounded(cell: DotCell, n: Neighbors, corner: Shape) -> Figure {
    let count = n.count();
    if count == 0 {
        return cell.figure(Shape::Dot, 0.0);
    }
    if count > 2 || (n.left && n.right) || (n.top && n.bottom) {
        return cell.figure(Shape::Square, 0.0);
    }
    if count == 2 {
        return cell.figure(corner, corner_rotation(n));
    }
    cell.figure(Shape::SideRounded, single_side_rotation(n))
}

fn classy(cell: DotCell, n: Neighbors, corner: Shape) -> Figure {
    if n.count() == 0 {
        return cell.figure(Shape::CornersRounded, FRAC_PI_2);
    }
    if !n.left && !n.top {
        return cell.figure(corner, -FRAC_PI_2);
    }
    if !n.right && !n.bottom {
        return cell.figure(corner, FRAC_PI_2);
    }
    cell.figure(Shape::Square, 0.0)
}

/// Horizontal or vertical capsules: `before` is left/top, `after` is right/bottom.
fn axis_rounded(cell: DotCell, before: bool, after: bool, horizontal: bool) -> Figure {
    let base = cell.size;
    let size = REDUCED_RATIO * base;
    let reduced = DotCell { size, ..cell };

    if before && after {
        let (x_size, y_size) = if horizontal { (base, size) } else { (size, base) };
        return cell.figure(Shape::Rectangle { x_size, y_size }, 0.0);
    }
    if before != after {
        let rotation = match (horizontal, after) {
            (true, true) => PI,
            (true, false) => 0.0,
            (false, _) if before => FRAC_PI_2,
            (false, _) => -FRAC_PI_2,
        };
        return reduced.figure(Shape::ReducedSideRounded { base }, rotation);
    }
    reduced.figure(Shape::ReducedDot { base }, 0.0)
}

fn ribbon(cell: DotCell, n: Neighbors) -> Figure {
    if n.count() != 1 {
        return cell.figure(Shape::Square, 0.0);
    }
    cell.figure(Shape::CornerRibbon, n.side_rotation())
}

fn diamond_special(cell: DotCell, n: Neighbors) -> Figure {
    match n.count() {
        0 => cell.figure(Shape::Diamond, 0.0),
        1 => cell.figure(Shape::SideDiamond, n.side_rotation()),
        2 if !(n.left && n.right) && !(n.top && n.bottom) => {
            let rotation = if n.top && n.left {
                FRAC_PI_2
            } else if n.top && n.right {
                PI
            } else if n.bottom && n.right {
                -FRAC_PI_2
            } else {
                0.0
            };
            cell.figure(Shape::CornerDiamond, rotation)
        }
        _ => cell.figure(Shape::Square, 0.0),
    }
}

fn shake(cell: DotCell) -> Figure {
    let base = cell.size;
    let rotation = shake_rotation(cell.col, cell.row, cell.corner);
    Figure::new(Shape::ReducedSquare { base }, cell.x, cell.y, SHAKE_RATIO * base, rotation)
}

// Shake jitter
//------------------------------------------------------------------------------

const SHAKE_MULTIPLIER: f64 = 73_244_475.0; // 0x45d9f3b
const SHAKE_STEPS: i32 = 18;
const SHAKE_HALF: i32 = SHAKE_STEPS / 2;
const SHAKE_DIVISOR: f64 = (SHAKE_HALF + 1) as f64;
const SHAKE_MAX_ROTATION: f64 = PI / 16.0;

/// Wraps a float into a signed 32-bit integer the way bitwise operators coerce numbers.
fn to_int32(v: f64) -> i32 {
    if !v.is_finite() {
        return 0;
    }
    let m = v.trunc().rem_euclid(4_294_967_296.0);
    if m >= 2_147_483_648.0 {
        (m - 4_294_967_296.0) as i32
    } else {
        m as i32
    }
}

fn avalanche(v: f64) -> i32 {
    let n = to_int32(v);
    (n >> 16) ^ n
}

/// Deterministic jitter angle for a module. The products are carried in double
/// precision between rounds, so large intermediates lose their low bits exactly
/// as the reference hash does.
pub fn shake_rotation(col: usize, row: usize, corner: u32) -> f64 {
    let seed = ((col + 1) * (row + 1)) as f64 + corner as f64;
    let mut n = avalanche(seed) as f64 * SHAKE_MULTIPLIER;
    n = avalanche(n) as f64 * SHAKE_MULTIPLIER;
    let mut step = avalanche(n) % SHAKE_STEPS;

    // -10..=-2 and 2..=10
    step = if step < SHAKE_HALF { step - SHAKE_HALF - 1 } else { step - SHAKE_HALF + 2 };
    step as f64 / SHAKE_DIVISOR * SHAKE_MAX_ROTATION
}

#[cfg(test)]
mod resolver_tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use test_case::test_case;

    use super::{DotCell, DotKind};
    use crate::figures::{Neighbors, Shape};
    use crate::paths::PathSet;

    const L: Neighbors = Neighbors { left: true, right: false, top: false, bottom: false };
    const R: Neighbors = Neighbors { left: false, right: true, top: false, bottom: false };
    const T: Neighbors = Neighbors { left: false, right: false, top: true, bottom: false };
    const B: Neighbors = Neighbors { left: false, right: false, top: false, bottom: true };
    const NONE: Neighbors = Neighbors { left: false, right: false, top: false, bottom: false };

    fn or(a: Neighbors, b: Neighbors) -> Neighbors {
        Neighbors::new(a.left || b.left, a.right || b.right, a.top || b.top, a.bottom || b.bottom)
    }

    fn cell() -> DotCell {
        DotCell::new(10.0, 20.0, 10.0, 1, 2)
    }

    fn resolve(kind: DotKind, n: Neighbors) -> (Shape, f64) {
        let fig = kind.resolve_neighbors(cell(), n);
        (fig.shape, fig.rotation())
    }

    #[test_case(NONE, Shape::Dot, 0.0; "isolated")]
    #[test_case(L, Shape::SideRounded, 0.0; "left")]
    #[test_case(T, Shape::SideRounded, FRAC_PI_2; "top")]
    #[test_case(R, Shape::SideRounded, PI; "right")]
    #[test_case(B, Shape::SideRounded, -FRAC_PI_2; "bottom")]
    #[test_case(or(L, T), Shape::CornerRounded, FRAC_PI_2; "left_top")]
    #[test_case(or(T, R), Shape::CornerRounded, PI; "top_right")]
    #[test_case(or(R, B), Shape::CornerRounded, -FRAC_PI_2; "right_bottom")]
    #[test_case(or(B, L), Shape::CornerRounded, 0.0; "bottom_left")]
    #[test_case(or(L, R), Shape::Square, 0.0; "horizontal_pair")]
    #[test_case(or(T, B), Shape::Square, 0.0; "vertical_pair")]
    #[test_case(or(or(L, R), T), Shape::Square, 0.0; "three")]
    fn test_rounded(n: Neighbors, shape: Shape, rotation: f64) {
        assert_eq!(resolve(DotKind::Rounded, n), (shape, rotation));
    }

    #[test]
    fn test_extra_rounded_matches_rounded() {
        for n in Neighbors::all() {
            let (rs, rr) = resolve(DotKind::Rounded, n);
            let (es, er) = resolve(DotKind::ExtraRounded, n);
            assert_eq!(rr, er);
            let exp = if rs == Shape::CornerRounded { Shape::CornerExtraRounded } else { rs };
            assert_eq!(es, exp);
        }
    }

    #[test_case(DotKind::Classy, NONE, Shape::CornersRounded, FRAC_PI_2; "classy_isolated")]
    #[test_case(DotKind::Classy, or(R, B), Shape::CornerRounded, -FRAC_PI_2; "classy_open_top_left")]
    #[test_case(DotKind::Classy, or(L, T), Shape::CornerRounded, FRAC_PI_2; "classy_open_bottom_right")]
    #[test_case(DotKind::Classy, or(L, R), Shape::Square, 0.0; "classy_pair")]
    #[test_case(DotKind::ClassyRounded, NONE, Shape::CornersRounded, FRAC_PI_2; "classy_rounded_isolated")]
    #[test_case(DotKind::ClassyRounded, R, Shape::CornerExtraRounded, -FRAC_PI_2; "classy_rounded_right")]
    #[test_case(DotKind::ClassyRounded, T, Shape::CornerExtraRounded, FRAC_PI_2; "classy_rounded_top")]
    #[test_case(DotKind::ClassyRounded, or(T, R), Shape::Square, 0.0; "classy_rounded_top_right")]
    fn test_classy(kind: DotKind, n: Neighbors, shape: Shape, rotation: f64) {
        assert_eq!(resolve(kind, n), (shape, rotation));
    }

    #[test]
    fn test_horizontal_rounded() {
        let (s, _) = resolve(DotKind::HorizontalRounded, or(L, R));
        assert_eq!(s, Shape::Rectangle { x_size: 10.0, y_size: 8.6 });

        let fig = DotKind::HorizontalRounded.resolve_neighbors(cell(), R);
        assert_eq!(fig.shape, Shape::ReducedSideRounded { base: 10.0 });
        assert_eq!((fig.args.size, fig.rotation()), (8.6, PI));
        assert_eq!(resolve(DotKind::HorizontalRounded, or(L, T)).1, 0.0);

        // Vertical neighbors are ignored
        assert_eq!(resolve(DotKind::HorizontalRounded, or(T, B)).0, Shape::ReducedDot { base: 10.0 });
    }

    #[test]
    fn test_vertical_rounded() {
        assert_eq!(resolve(DotKind::VerticalRounded, or(T, B)).0, Shape::Rectangle { x_size: 8.6, y_size: 10.0 });
        assert_eq!(resolve(DotKind::VerticalRounded, T), (Shape::ReducedSideRounded { base: 10.0 }, FRAC_PI_2));
        assert_eq!(resolve(DotKind::VerticalRounded, B), (Shape::ReducedSideRounded { base: 10.0 }, -FRAC_PI_2));
        assert_eq!(resolve(DotKind::VerticalRounded, or(L, R)).0, Shape::ReducedDot { base: 10.0 });
    }

    #[test_case(R, Shape::CornerRibbon, PI; "right")]
    #[test_case(T, Shape::CornerRibbon, FRAC_PI_2; "top")]
    #[test_case(B, Shape::CornerRibbon, -FRAC_PI_2; "bottom")]
    #[test_case(L, Shape::CornerRibbon, 0.0; "left")]
    #[test_case(NONE, Shape::Square, 0.0; "none")]
    #[test_case(or(L, B), Shape::Square, 0.0; "two")]
    fn test_ribbon(n: Neighbors, shape: Shape, rotation: f64) {
        assert_eq!(resolve(DotKind::Ribbon, n), (shape, rotation));
    }

    #[test_case(NONE, Shape::Diamond, 0.0; "none")]
    #[test_case(T, Shape::SideDiamond, FRAC_PI_2; "top")]
    #[test_case(or(T, L), Shape::CornerDiamond, FRAC_PI_2; "top_left")]
    #[test_case(or(T, R), Shape::CornerDiamond, PI; "top_right")]
    #[test_case(or(B, R), Shape::CornerDiamond, -FRAC_PI_2; "bottom_right")]
    #[test_case(or(B, L), Shape::CornerDiamond, 0.0; "bottom_left")]
    #[test_case(or(T, B), Shape::Square, 0.0; "opposite")]
    #[test_case(or(or(T, B), L), Shape::Square, 0.0; "three")]
    fn test_diamond_special(n: Neighbors, shape: Shape, rotation: f64) {
        assert_eq!(resolve(DotKind::DiamondSpecial, n), (shape, rotation));
    }

    #[test]
    fn test_neighbor_independent_kinds() {
        for n in Neighbors::all() {
            assert_eq!(resolve(DotKind::Dots, n), (Shape::Dot, 0.0));
            assert_eq!(resolve(DotKind::Square, n), (Shape::Square, 0.0));
            assert_eq!(resolve(DotKind::Heart, n), (Shape::Path { set: PathSet::Dot, family: "heart" }, 0.0));
        }
    }

    #[test]
    fn test_resolve_queries_neighbors() {
        let q = |dx: isize, dy: isize| (dx, dy) == (0, 1);
        let fig = DotKind::Rounded.resolve(cell(), &q);
        assert_eq!((fig.shape, fig.rotation()), (Shape::SideRounded, -FRAC_PI_2));
        assert_eq!((fig.args.x, fig.args.y, fig.args.size), (10.0, 20.0, 10.0));
    }

    #[test]
    fn test_deterministic() {
        for kind in DotKind::ALL {
            for n in Neighbors::all() {
                assert_eq!(kind.resolve_neighbors(cell(), n), kind.resolve_neighbors(cell(), n));
            }
        }
    }

    #[test]
    fn test_kind_names() {
        let kind: DotKind = serde_json::from_str("\"diamond-special\"").unwrap();
        assert_eq!(kind, DotKind::DiamondSpecial);
        assert_eq!(serde_json::to_string(&DotKind::XRounded).unwrap(), "\"x-rounded\"");
        assert_eq!(DotKind::ALL.iter().filter(|k| k.path_family().is_some()).count(), 8);
    }
}

#[cfg(test)]
mod shake_tests {
    use std::f64::consts::PI;

    use proptest::prelude::*;
    use test_case::test_case;

    use super::{shake_rotation, to_int32, DotCell, DotKind};
    use crate::figures::Shape;

    #[test_case(0, 0, 0, -3; "origin")]
    #[test_case(1, 0, 0, -3; "second_column")]
    #[test_case(3, 4, 1, -9; "finder_square")]
    #[test_case(10, 20, 5, -7; "finder_dot")]
    #[test_case(0, 0, 4, 8; "first_dot_corner")]
    #[test_case(6, 6, 3, 5; "last_square_corner")]
    fn test_shake_rotation(col: usize, row: usize, corner: u32, step: i32) {
        assert_eq!(shake_rotation(col, row, corner), step as f64 / 10.0 * (PI / 16.0));
    }

    #[test_case(0.0, 0)]
    #[test_case(-1.5, -1)]
    #[test_case(2_147_483_648.0, -2_147_483_648)]
    #[test_case(4_294_967_297.0, 1)]
    #[test_case(f64::NAN, 0)]
    fn test_to_int32(v: f64, exp: i32) {
        assert_eq!(to_int32(v), exp);
    }

    #[test]
    fn test_shake_figure() {
        let fig = DotKind::Shake.resolve(DotCell::new(0.0, 0.0, 10.0, 0, 0), &|_: isize, _: isize| true);
        assert_eq!(fig.shape, Shape::ReducedSquare { base: 10.0 });
        assert_eq!(fig.args.size, 9.0);
        assert_eq!(fig.rotation(), shake_rotation(0, 0, 0));
    }

    proptest! {
        #[test]
        fn proptest_shake_range(col in 0usize..200, row in 0usize..200, corner in 0u32..7) {
            let rot = shake_rotation(col, row, corner);
            let step = (rot / (PI / 16.0) * 10.0).round() as i32;
            prop_assert!((-10..=-2).contains(&step) || (2..=10).contains(&step));
            prop_assert_eq!(rot.to_bits(), shake_rotation(col, row, corner).to_bits());
        }
    }
}
