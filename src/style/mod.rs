use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::common::{ECLevel, RenderResult};
use crate::figures::{CornerDotKind, CornerSquareKind, DotKind};

pub mod color;
pub mod gradient;

pub use color::*;
pub use gradient::*;

// Fill
//------------------------------------------------------------------------------

/// Solid color or gradient. A gradient wins when both are set.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

impl Fill {
    pub fn color(css: impl Into<String>) -> Self {
        Self { color: Some(css.into()), gradient: None }
    }

    pub fn gradient(gradient: Gradient) -> Self {
        Self { color: None, gradient: Some(gradient) }
    }

    pub fn is_set(&self) -> bool {
        self.gradient.is_some() || self.color.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Resolves the fill over `area`. Returns `None` when neither color nor gradient is set.
    pub fn paint(&self, additional_rotation: f64, area: Rect) -> RenderResult<Option<Paint>> {
        if let Some(g) = &self.gradient {
            return Paint::gradient(g, additional_rotation, area).map(Some);
        }
        match self.color.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => Paint::solid(c).map(Some),
            _ => Ok(None),
        }
    }
}

// Options
//------------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrOptions {
    pub error_correction_level: ECLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageOptions {
    pub hide_background_dots: bool,
    pub image_size: f64,
    pub margin: f64,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self { hide_background_dots: true, image_size: 0.4, margin: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotsOptions {
    #[serde(rename = "type")]
    pub kind: DotKind,
    #[serde(flatten)]
    pub fill: Fill,
}

impl Default for DotsOptions {
    fn default() -> Self {
        Self { kind: DotKind::Square, fill: Fill::color("#000") }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornersSquareOptions {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<CornerSquareKind>,
    #[serde(flatten)]
    pub fill: Fill,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornersDotOptions {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<CornerDotKind>,
    #[serde(flatten)]
    pub fill: Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundOptions {
    /// Corner rounding as a fraction of half the shorter side.
    pub round: f64,
    #[serde(flatten)]
    pub fill: Fill,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self { round: 0.0, fill: Fill::color("#fff") }
    }
}

/// Insets reserved around the code for a decorative frame. `leftSize`/`rightSize`
/// take precedence over the symmetric `xSize` once `rightSize` is set.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameOptions {
    pub x_size: f64,
    pub left_size: f64,
    pub right_size: f64,
    pub top_size: f64,
    pub bottom_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Fill>,
}

impl FrameOptions {
    pub fn is_asymmetric(&self) -> bool {
        self.right_size > 0.0
    }

    pub fn left(&self) -> f64 {
        if self.is_asymmetric() {
            self.left_size
        } else {
            self.x_size
        }
    }

    pub fn right(&self) -> f64 {
        if self.is_asymmetric() {
            self.right_size
        } else {
            self.x_size
        }
    }

    pub fn x_padding(&self) -> f64 {
        self.left() + self.right()
    }
}

/// Everything a render pass reads. Deserializes from camelCase JSON; missing
/// fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub margin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub qr_options: QrOptions,
    pub image_options: ImageOptions,
    pub dots_options: DotsOptions,
    pub corners_square_options: CornersSquareOptions,
    pub corners_dot_options: CornersDotOptions,
    pub background_options: BackgroundOptions,
    pub frame_options: FrameOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            margin: 0.0,
            image: None,
            qr_options: QrOptions::default(),
            image_options: ImageOptions::default(),
            dots_options: DotsOptions::default(),
            corners_square_options: CornersSquareOptions::default(),
            corners_dot_options: CornersDotOptions::default(),
            background_options: BackgroundOptions::default(),
            frame_options: FrameOptions::default(),
        }
    }
}

impl RenderOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_dots(mut self, kind: DotKind) -> Self {
        self.dots_options.kind = kind;
        self
    }
}

#[cfg(test)]
mod options_tests {
    use std::f64::consts::PI;

    use kurbo::Rect;

    use super::{Fill, FrameOptions, Gradient, GradientKind, Paint, RenderOptions};
    use crate::common::ECLevel;
    use crate::figures::{CornerDotKind, CornerSquareKind, DotKind};

    #[test]
    fn test_defaults() {
        let opts = RenderOptions::from_json("{}").unwrap();
        assert_eq!(opts, RenderOptions::default());
        assert_eq!((opts.width, opts.height), (300, 300));
        assert_eq!(opts.qr_options.error_correction_level, ECLevel::Q);
        assert!(opts.image_options.hide_background_dots);
        assert_eq!(opts.image_options.image_size, 0.4);
        assert_eq!(opts.dots_options.kind, DotKind::Square);
        assert_eq!(opts.dots_options.fill.color.as_deref(), Some("#000"));
        assert_eq!(opts.background_options.fill.color.as_deref(), Some("#fff"));
        assert_eq!(opts.corners_square_options.kind, None);
    }

    #[test]
    fn test_full_json() {
        let json = r##"{
            "width": 400,
            "height": 420,
            "margin": 8,
            "image": "logo.png",
            "qrOptions": { "errorCorrectionLevel": "H" },
            "imageOptions": { "hideBackgroundDots": false, "imageSize": 0.3, "margin": 4 },
            "dotsOptions": { "type": "classy-rounded", "gradient": {
                "type": "linear", "rotation": 0.5,
                "colorStops": [{ "offset": 0, "color": "#f00" }, { "offset": 1, "color": "#00f" }]
            } },
            "cornersSquareOptions": { "type": "shape11", "color": "#123456" },
            "cornersDotOptions": { "type": "x-rounded" },
            "backgroundOptions": { "color": "transparent", "round": 0.5 },
            "frameOptions": { "leftSize": 10, "rightSize": 20, "topSize": 5, "image": "frame.svg",
                              "background": { "color": "#eee" } }
        }"##;
        let opts = RenderOptions::from_json(json).unwrap();
        assert_eq!((opts.width, opts.height, opts.margin), (400, 420, 8.0));
        assert_eq!(opts.qr_options.error_correction_level, ECLevel::H);
        assert!(!opts.image_options.hide_background_dots);
        assert_eq!(opts.dots_options.kind, DotKind::ClassyRounded);
        let g = opts.dots_options.fill.gradient.as_ref().unwrap();
        assert_eq!((g.kind, g.rotation, g.color_stops.len()), (GradientKind::Linear, 0.5, 2));
        assert_eq!(opts.corners_square_options.kind, Some(CornerSquareKind::Shape11));
        assert_eq!(opts.corners_square_options.fill, Fill::color("#123456"));
        assert_eq!(opts.corners_dot_options.kind, Some(CornerDotKind::XRounded));
        assert!(!opts.corners_dot_options.fill.is_set());
        assert_eq!(opts.background_options.round, 0.5);
        assert_eq!(opts.frame_options.x_padding(), 30.0);
        assert_eq!(opts.frame_options.background, Some(Fill::color("#eee")));
    }

    #[test]
    fn test_unknown_kind() {
        assert!(RenderOptions::from_json(r#"{"dotsOptions":{"type":"blob"}}"#).is_err());
    }

    #[test]
    fn test_frame_insets() {
        let sym = FrameOptions { x_size: 12.0, left_size: 3.0, ..Default::default() };
        assert_eq!((sym.left(), sym.right(), sym.x_padding()), (12.0, 12.0, 24.0));

        let asym = FrameOptions { x_size: 12.0, left_size: 3.0, right_size: 5.0, ..Default::default() };
        assert_eq!((asym.left(), asym.right(), asym.x_padding()), (3.0, 5.0, 8.0));
    }

    #[test]
    fn test_fill_paint() {
        let area = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(Fill::default().paint(0.0, area).unwrap(), None);
        assert_eq!(Fill::color("  ").paint(0.0, area).unwrap(), None);
        assert!(matches!(Fill::color("#abc").paint(0.0, area).unwrap(), Some(Paint::Solid(_))));

        let both = Fill { color: Some("#abc".into()), gradient: Some(Gradient::linear(PI, vec![])) };
        assert!(matches!(both.paint(0.0, area).unwrap(), Some(Paint::Gradient { .. })));
        assert!(Fill::color("nope").paint(0.0, area).is_err());
    }
}
