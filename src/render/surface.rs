use kurbo::Rect;

use super::CanvasSize;
use crate::assets::DecodedImage;
use crate::common::RenderResult;
use crate::figures::FigureDrawer;
use crate::style::Paint;

/// Handle to a fill layer opened on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub usize);

/// Drawing target for a render pass. Figures drawn through [`FigureDrawer`] are
/// painted with the current layer's fill; a layer's fill is resolved against the
/// area it was opened with, so a gradient spans the whole layer rather than
/// each figure.
pub trait Surface: FigureDrawer + Sized {
    type Output;

    fn create(canvas: CanvasSize) -> RenderResult<Self>;

    /// Opens a named fill layer over `area` and makes it current.
    fn begin_layer(&mut self, name: &str, paint: &Paint, area: Rect) -> LayerId;

    fn use_layer(&mut self, layer: LayerId);

    /// Fills `area` in the current layer, rounding its corners by `radius`.
    fn fill_area(&mut self, area: Rect, radius: f64);

    /// Draws frame art stretched over the whole logical canvas.
    fn draw_frame_art(&mut self, art: &DecodedImage);

    fn draw_image(&mut self, image: &DecodedImage, area: Rect);

    fn finish(self) -> RenderResult<Self::Output>;
}
