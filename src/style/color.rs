use std::str::FromStr;

use kurbo::Rect;
use peniko::color::{parse_color, Srgb};

use super::{Gradient, GradientGeometry};
use crate::common::{RenderError, RenderResult};

// Css color
//------------------------------------------------------------------------------

/// A CSS color string together with its sRGB value. The vector backend writes the
/// original string back out, the raster backend paints the resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssColor {
    css: String,
    rgba: [u8; 4],
}

impl CssColor {
    pub fn parse(css: &str) -> RenderResult<Self> {
        let css = css.trim();
        let parsed = parse_color(css).map_err(|e| RenderError::InvalidColor(format!("{css}: {e}")))?;
        let c = parsed.to_alpha_color::<Srgb>().to_rgba8();
        Ok(Self { css: css.to_string(), rgba: [c.r, c.g, c.b, c.a] })
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn rgba(&self) -> [u8; 4] {
        self.rgba
    }

    pub fn is_transparent(&self) -> bool {
        self.rgba[3] == 0
    }
}

impl FromStr for CssColor {
    type Err = RenderError;

    fn from_str(s: &str) -> RenderResult<Self> {
        Self::parse(s)
    }
}

// Paint
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PaintStop {
    pub offset: f64,
    pub color: CssColor,
}

/// Fill resolved against the bounding box of the layer it colors.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(CssColor),
    Gradient { geometry: GradientGeometry, stops: Vec<PaintStop> },
}

impl Paint {
    pub fn solid(css: &str) -> RenderResult<Self> {
        Ok(Self::Solid(CssColor::parse(css)?))
    }

    pub fn gradient(gradient: &Gradient, additional_rotation: f64, area: Rect) -> RenderResult<Self> {
        let stops = gradient
            .color_stops
            .iter()
            .map(|s| Ok(PaintStop { offset: s.offset.clamp(0.0, 1.0), color: CssColor::parse(&s.color)? }))
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(Self::Gradient { geometry: gradient.geometry(additional_rotation, area), stops })
    }

    /// Fully transparent solid colors paint nothing.
    pub fn is_invisible(&self) -> bool {
        matches!(self, Self::Solid(c) if c.is_transparent())
    }
}

#[cfg(test)]
mod color_tests {
    use std::f64::consts::PI;

    use kurbo::Rect;
    use test_case::test_case;

    use super::{CssColor, Paint};
    use crate::common::RenderError;
    use crate::style::{ColorStop, Gradient, GradientGeometry};

    #[test_case("#000", [0, 0, 0, 255]; "short_hex")]
    #[test_case("#ff8000", [255, 128, 0, 255]; "long_hex")]
    #[test_case("white", [255, 255, 255, 255]; "named")]
    #[test_case("rgb(1, 2, 3)", [1, 2, 3, 255]; "rgb")]
    #[test_case("transparent", [0, 0, 0, 0]; "transparent")]
    fn test_parse(css: &str, exp: [u8; 4]) {
        let c: CssColor = css.parse().unwrap();
        assert_eq!(c.rgba(), exp);
        assert_eq!(c.css(), css);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(CssColor::parse("not-a-color"), Err(RenderError::InvalidColor(_))));
    }

    #[test]
    fn test_invisible() {
        assert!(Paint::solid("transparent").unwrap().is_invisible());
        assert!(!Paint::solid("#fff").unwrap().is_invisible());
    }

    #[test]
    fn test_gradient_paint() {
        let g = Gradient::linear(PI, vec![ColorStop::new(0.0, "#000"), ColorStop::new(1.5, "#fff")]);
        let paint = Paint::gradient(&g, 0.0, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let Paint::Gradient { geometry, stops } = paint else { panic!("expected gradient") };
        assert!(matches!(geometry, GradientGeometry::Linear { start, .. } if start.x == 10.0));
        assert_eq!(stops[1].offset, 1.0);
        assert_eq!(stops[1].color.rgba(), [255, 255, 255, 255]);
    }

    #[test]
    fn test_gradient_bad_stop() {
        let g = Gradient::radial(vec![ColorStop::new(0.0, "#zzz")]);
        assert!(Paint::gradient(&g, 0.0, Rect::ZERO).is_err());
    }
}
