use std::f64::consts::{PI, TAU};

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

// Gradient
//------------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self { offset, color: color.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    #[serde(rename = "type", default)]
    pub kind: GradientKind,
    #[serde(default)]
    pub rotation: f64,
    pub color_stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn linear(rotation: f64, stops: Vec<ColorStop>) -> Self {
        Self { kind: GradientKind::Linear, rotation, color_stops: stops }
    }

    pub fn radial(stops: Vec<ColorStop>) -> Self {
        Self { kind: GradientKind::Radial, rotation: 0.0, color_stops: stops }
    }

    pub fn geometry(&self, additional_rotation: f64, area: Rect) -> GradientGeometry {
        match self.kind {
            GradientKind::Radial => radial_geometry(area),
            GradientKind::Linear => linear_geometry(self.rotation + additional_rotation, area),
        }
    }
}

// Geometry
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientGeometry {
    Linear { start: Point, end: Point },
    Radial { center: Point, radius: f64 },
}

pub fn radial_geometry(area: Rect) -> GradientGeometry {
    GradientGeometry::Radial { center: area.center(), radius: area.width().max(area.height()) / 2.0 }
}

/// Octant of a linear gradient axis: which pair of box edges the axis runs between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Octant {
    /// `[0, 0.25π]` and `(1.75π, 2π)`: left to right.
    Rightward,
    /// `(0.25π, 0.75π]`: top to bottom.
    Downward,
    /// `(0.75π, 1.25π]`: right to left.
    Leftward,
    /// `(1.25π, 1.75π]`: bottom to top.
    Upward,
}

pub fn normalize_rotation(rotation: f64) -> f64 {
    let r = (rotation % TAU).rem_euclid(TAU);
    if r >= TAU {
        0.0
    } else {
        r
    }
}

pub fn octant(rotation: f64) -> Octant {
    let r = normalize_rotation(rotation);
    if r <= 0.25 * PI || r > 1.75 * PI {
        Octant::Rightward
    } else if r <= 0.75 * PI {
        Octant::Downward
    } else if r <= 1.25 * PI {
        Octant::Leftward
    } else {
        Octant::Upward
    }
}

/// Axis through the box center at `rotation`, clipped to the edges the octant selects.
/// The slope uses the unnormalized angle; `tan` has period π so the result is the same.
pub fn linear_geometry(rotation: f64, area: Rect) -> GradientGeometry {
    let Point { x: cx, y: cy } = area.center();
    let (hw, hh) = (area.width() / 2.0, area.height() / 2.0);
    let rotation = rotation % TAU;
    let tan = rotation.tan();

    let (start, end) = match octant(rotation) {
        Octant::Rightward => ((cx - hw, cy - hh * tan), (cx + hw, cy + hh * tan)),
        Octant::Downward => ((cx - hw / tan, cy - hh), (cx + hw / tan, cy + hh)),
        Octant::Leftward => ((cx + hw, cy + hh * tan), (cx - hw, cy - hh * tan)),
        Octant::Upward => ((cx + hw / tan, cy + hh), (cx - hw / tan, cy - hh)),
    };
    GradientGeometry::Linear { start: start.into(), end: end.into() }
}
