//! # qrstyle
//!
//! A Rust library for drawing QR code module matrices as styled images. The
//! encoder is someone else's job: hand qrstyle a grid of dark and light modules
//! and a set of render options, and it decides the shape of every module from
//! its neighbors, ornaments the three finder patterns, fills everything with
//! solid colors or gradients, and overlays an optional frame and logo.
//!
//! ## Features
//!
//! - **Neighbor-aware modules**: 19 module styles (rounded, classy, ribbon, shake, ...) chosen per module from its 4-neighborhood
//! - **Finder ornaments**: 15 corner-square and 16 corner-dot styles, each with its own fill
//! - **Gradients**: linear gradients at any rotation and radial gradients, spanning the whole layer
//! - **Logos**: sized to the error correction budget, with the modules underneath cleared
//! - **Frames**: asymmetric insets, background fill and frame art that rescales the canvas
//! - **Two backends**: raster output through `tiny-skia` and SVG output, drawn by one shared resolver
//!
//! ## Quick Start
//!
//! ### SVG output
//!
//! ```rust
//! use qrstyle::{BitMatrix, BundledAssets, DotKind, RenderOptions, RenderSession};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Any `ModuleMatrix` works; `BitMatrix` is the simplest one
//! let matrix = BitMatrix::from_fn(21, |r, c| (r * 3 + c) % 4 == 0);
//! let opts = RenderOptions::default().with_size(210, 210).with_dots(DotKind::Rounded);
//!
//! let mut session = RenderSession::new(BundledAssets);
//! let svg = pollster::block_on(session.render_svg(&matrix, &opts))?;
//! assert!(svg.to_string().starts_with("<svg"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Raster output with JSON options
//!
//! ```rust,no_run
//! use qrstyle::{BitMatrix, FsAssetLoader, RenderOptions, RenderSession};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let matrix: BitMatrix = std::fs::read_to_string("matrix.txt")?.parse()?;
//! let opts = RenderOptions::from_json(
//!     r##"{
//!         "image": "logo.png",
//!         "qrOptions": { "errorCorrectionLevel": "H" },
//!         "dotsOptions": { "type": "classy", "gradient": {
//!             "type": "linear", "rotation": 0.8,
//!             "colorStops": [{ "offset": 0, "color": "#8a2be2" }, { "offset": 1, "color": "#ff69b4" }]
//!         } },
//!         "cornersSquareOptions": { "type": "extra-rounded", "color": "#333" },
//!         "cornersDotOptions": { "type": "heart" }
//!     }"##,
//! )?;
//!
//! // Logo and frame sources resolve against the loader's root directory
//! let mut session = RenderSession::new(FsAssetLoader::new("."));
//! let img = pollster::block_on(session.render_raster(&matrix, &opts))?;
//! img.save("styled_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Drawing Order
//!
//! Every render draws, back to front: frame background, frame art, content
//! background, module field, the three finder patterns, and the logo. Each
//! colored part is a named layer (`background-color`, `dot-color`,
//! `corners-square-color-{col}-{row}`, ...), which the SVG backend writes as a
//! clip path over a filled rectangle.
//!
//! ## Custom Backends
//!
//! A backend implements [`Surface`] for layers and images and [`FigureDrawer`]
//! for the basic figures the resolver emits. [`RenderSession::render`] is generic
//! over the surface type, so a new backend gets the full layout and shape logic
//! for free.

#![allow(clippy::items_after_test_module)]

pub mod assets;
pub mod common;
pub mod figures;
pub mod paths;
pub mod render;
pub mod style;

pub use assets::{AssetLoader, BundledAssets, DecodedImage, FsAssetLoader};
pub use common::*;
pub use figures::{CornerDotKind, CornerSquareKind, DotKind, Figure, FigureArgs, FigureDrawer, Shape};
pub use paths::{CacheStats, PathSet, PathTemplate, ShapeCache};
pub use render::{RasterSurface, RenderSession, Surface, SvgDocument, SvgSurface};
pub use style::{Fill, Gradient, GradientKind, RenderOptions};
