use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use super::{Figure, Shape};
use crate::paths::PathSet;

// Finder corners
//------------------------------------------------------------------------------

/// One of the three finder patterns: grid column and row (0 or 1 in units of
/// `n - 7` modules) and the rotation applied to its ornaments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub col: usize,
    pub row: usize,
    pub rotation: f64,
}

/// Top-left, top-right and bottom-left, in drawing order.
pub const CORNERS: [Corner; 3] = [
    Corner { col: 0, row: 0, rotation: 0.0 },
    Corner { col: 1, row: 0, rotation: FRAC_PI_2 },
    Corner { col: 0, row: 1, rotation: -FRAC_PI_2 },
];

// Corner square kind
//------------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareKind {
    #[default]
    Dot,
    Square,
    ExtraRounded,
    Shape1,
    Shape2,
    Shape3,
    Shape4,
    Shape5,
    Shape6,
    Shape7,
    Shape8,
    Shape9,
    Shape10,
    Shape11,
    Shape12,
}

impl CornerSquareKind {
    pub fn path_family(self) -> Option<&'static str> {
        match self {
            Self::Dot | Self::Square | Self::ExtraRounded => None,
            Self::Shape1 => Some("shape1"),
            Self::Shape2 => Some("shape2"),
            Self::Shape3 => Some("shape3"),
            Self::Shape4 => Some("shape4"),
            Self::Shape5 => Some("shape5"),
            Self::Shape6 => Some("shape6"),
            Self::Shape7 => Some("shape7"),
            Self::Shape8 => Some("shape8"),
            Self::Shape9 => Some("shape9"),
            Self::Shape10 => Some("shape10"),
            Self::Shape11 => Some("shape11"),
            Self::Shape12 => Some("shape12"),
        }
    }

    /// Figure for a finder square of `size` (seven modules) at `(x, y)`.
    pub fn resolve(self, x: f64, y: f64, size: f64, rotation: f64) -> Figure {
        let shape = match self {
            Self::Dot => Shape::RingDot,
            Self::Square => Shape::RingSquare,
            Self::ExtraRounded => Shape::RingExtraRounded,
            kind => match kind.path_family() {
                Some(family) => Shape::Path { set: PathSet::CornerSquare, family },
                None => Shape::RingDot,
            },
        };
        Figure::new(shape, x, y, size, rotation)
    }
}

// Corner dot kind
//------------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotKind {
    #[default]
    Dot,
    Square,
    Rounded,
    Square2,
    Square3,
    Dot2,
    Dot3,
    Dot4,
    Sun,
    Star,
    Diamond,
    X,
    XRounded,
    Cross,
    CrossRounded,
    Heart,
}

impl CornerDotKind {
    pub fn path_family(self) -> Option<&'static str> {
        match self {
            Self::Dot | Self::Square => None,
            Self::Rounded => Some("rounded"),
            Self::Square2 => Some("square2"),
            Self::Square3 => Some("square3"),
            Self::Dot2 => Some("dot2"),
            Self::Dot3 => Some("dot3"),
            Self::Dot4 => Some("dot4"),
            Self::Sun => Some("sun"),
            Self::Star => Some("star"),
            Self::Diamond => Some("diamond"),
            Self::X => Some("x"),
            Self::XRounded => Some("x-rounded"),
            Self::Cross => Some("cross"),
            Self::CrossRounded => Some("cross-rounded"),
            Self::Heart => Some("heart"),
        }
    }

    /// Figure for a finder dot of `size` (three modules) at `(x, y)`.
    pub fn resolve(self, x: f64, y: f64, size: f64, rotation: f64) -> Figure {
        let shape = match self {
            Self::Dot => Shape::Dot,
            Self::Square => Shape::Square,
            kind => match kind.path_family() {
                Some(family) => Shape::Path { set: PathSet::CornerDot, family },
                None => Shape::Dot,
            },
        };
        Figure::new(shape, x, y, size, rotation)
    }
}
