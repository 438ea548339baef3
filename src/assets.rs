use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::debug;

use crate::common::{RenderError, RenderResult};
use crate::paths::{templates, PathTemplate};

// Decoded image
//------------------------------------------------------------------------------

/// A logo or frame image ready to draw. Raster sources carry decoded pixels,
/// vector sources carry their markup; both report their natural size.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub src: String,
    pub width: f64,
    pub height: f64,
    pub pixels: Option<RgbaImage>,
    pub markup: Option<String>,
}

impl DecodedImage {
    pub fn raster(src: impl Into<String>, pixels: RgbaImage) -> Self {
        let (w, h) = pixels.dimensions();
        Self { src: src.into(), width: w as f64, height: h as f64, pixels: Some(pixels), markup: None }
    }

    pub fn vector(src: impl Into<String>, markup: impl Into<String>, width: f64, height: f64) -> Self {
        Self { src: src.into(), width, height, pixels: None, markup: Some(markup.into()) }
    }

    pub fn has_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

// Loader
//------------------------------------------------------------------------------

/// Source of lazily loaded shape families and of logo/frame images.
#[allow(async_fn_in_trait)]
pub trait AssetLoader {
    /// Fetches a path template declared lazy by the shape cache. The default
    /// serves the templates compiled into the crate.
    async fn load_template(&self, name: &str) -> RenderResult<PathTemplate> {
        templates::lazy_template(name)
            .ok_or_else(|| RenderError::AssetLoadFailure(format!("no template named {name}")))
    }

    async fn load_image(&self, src: &str) -> RenderResult<DecodedImage>;
}

/// Serves the bundled lazy templates and no images.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledAssets;

impl AssetLoader for BundledAssets {
    async fn load_image(&self, src: &str) -> RenderResult<DecodedImage> {
        Err(RenderError::AssetLoadFailure(format!("no image source for {src}")))
    }
}

/// Resolves image sources and `<name>.json` templates relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetLoader for FsAssetLoader {
    async fn load_template(&self, name: &str) -> RenderResult<PathTemplate> {
        let path = self.resolve(&format!("{name}.json"));
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!("Loaded template {name} from {}", path.display());
                serde_json::from_str(&text).map_err(|e| RenderError::MalformedTemplate {
                    family: name.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => BundledAssets.load_template(name).await,
        }
    }

    async fn load_image(&self, src: &str) -> RenderResult<DecodedImage> {
        let path = self.resolve(src);
        let is_svg = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        if is_svg {
            let markup = fs::read_to_string(&path)
                .map_err(|e| RenderError::AssetLoadFailure(format!("{}: {e}", path.display())))?;
            let (w, h) = svg_size(&markup)
                .ok_or_else(|| RenderError::AssetLoadFailure(format!("{src}: svg has no size")))?;
            return Ok(DecodedImage::vector(src, markup, w, h));
        }

        let img = image::open(&path).map_err(|e| RenderError::AssetLoadFailure(format!("{}: {e}", path.display())))?;
        Ok(DecodedImage::raster(src, img.to_rgba8()))
    }
}

// Svg size
//------------------------------------------------------------------------------

/// Natural size of an svg document from its root `width`/`height`, falling back to `viewBox`.
pub fn svg_size(markup: &str) -> Option<(f64, f64)> {
    let start = markup.find("<svg")?;
    let end = start + markup[start..].find('>')?;
    let tag = &markup[start..end];

    let length = |name: &str| {
        attribute(tag, name)
            .map(|v| v.trim().trim_end_matches("px"))
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| *v > 0.0)
    };
    if let (Some(w), Some(h)) = (length("width"), length("height")) {
        return Some((w, h));
    }

    let view_box = attribute(tag, "viewBox")?
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    match view_box[..] {
        [_, _, w, h] if w > 0.0 && h > 0.0 => Some((w, h)),
        _ => None,
    }
}

fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = tag;
    while let Some(i) = rest.find(name) {
        let preceded = rest[..i].chars().last().is_some_and(char::is_whitespace);
        let after = rest[i + name.len()..].trim_start();
        if let (true, Some(after)) = (preceded, after.strip_prefix('=')) {
            let after = after.trim_start();
            let quote = after.chars().next().filter(|q| *q == '"' || *q == '\'')?;
            let value = &after[1..];
            return value.find(quote).map(|j| &value[..j]);
        }
        rest = &rest[i + name.len()..];
    }
    None
}
