use std::f64::consts::PI;
use std::fmt::{self, Display, Write};

use kurbo::Rect;

use super::{CanvasSize, LayerId, Surface};
use crate::assets::DecodedImage;
use crate::common::RenderResult;
use crate::figures::{FigureArgs, FigureDrawer};
use crate::style::{GradientGeometry, Paint, PaintStop};

// Svg node
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Element { name: &'static str, attrs: Vec<(&'static str, String)>, children: Vec<SvgNode> },
    /// Markup inserted verbatim, such as inline frame art.
    Raw(String),
}

impl SvgNode {
    pub fn new(name: &'static str) -> Self {
        Self::Element { name, attrs: Vec::new(), children: Vec::new() }
    }

    pub fn attr(mut self, key: &'static str, value: impl Display) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.push((key, value.to_string()));
        }
        self
    }

    pub fn push(&mut self, node: SvgNode) {
        if let Self::Element { children, .. } = self {
            children.push(node);
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Element { name, .. } => Some(*name),
            Self::Raw(_) => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Self::Element { attrs, .. } => attrs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str()),
            Self::Raw(_) => None,
        }
    }

    pub fn children(&self) -> &[SvgNode] {
        match self {
            Self::Element { children, .. } => children,
            Self::Raw(_) => &[],
        }
    }
}

fn escape(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    for ch in value.chars() {
        match ch {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '"' => f.write_str("&quot;")?,
            _ => f.write_char(ch)?,
        }
    }
    Ok(())
}

impl Display for SvgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, attrs, children) = match self {
            Self::Raw(markup) => return f.write_str(markup),
            Self::Element { name, attrs, children } => (name, attrs, children),
        };

        write!(f, "<{name}")?;
        for (k, v) in attrs {
            write!(f, " {k}=\"")?;
            escape(f, v)?;
            f.write_char('"')?;
        }
        if children.is_empty() {
            return f.write_str("/>");
        }
        f.write_char('>')?;
        for child in children {
            write!(f, "{child}")?;
        }
        write!(f, "</{name}>")
    }
}

// Svg document
//------------------------------------------------------------------------------

/// Vector output: clip paths and gradients in `<defs>`, one filled rectangle per
/// layer in the body, clipped to the figures drawn into that layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub canvas: CanvasSize,
    pub defs: Vec<SvgNode>,
    pub body: Vec<SvgNode>,
}

impl SvgDocument {
    pub fn new(canvas: CanvasSize) -> Self {
        Self { canvas, defs: Vec::new(), body: Vec::new() }
    }

    fn def(&self, id: &str) -> Option<&SvgNode> {
        self.defs.iter().find(|n| n.get("id") == Some(id))
    }

    /// Clip path holding the figures of layer `name`.
    pub fn clip_path(&self, name: &str) -> Option<&SvgNode> {
        self.def(&format!("clip-path-{name}"))
    }

    pub fn gradient(&self, name: &str) -> Option<&SvgNode> {
        self.def(name)
    }

    /// Filled rectangle of layer `name`.
    pub fn layer_rect(&self, name: &str) -> Option<&SvgNode> {
        let clip = format!("url('#clip-path-{name}')");
        self.body.iter().find(|n| n.get("clip-path") == Some(clip.as_str()))
    }
}

impl Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.canvas;
        write!(
            f,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
            c.display_width, c.display_height, c.width, c.height
        )?;
        f.write_str("<defs>")?;
        for node in &self.defs {
            write!(f, "{node}")?;
        }
        f.write_str("</defs>")?;
        for node in &self.body {
            write!(f, "{node}")?;
        }
        f.write_str("</svg>")
    }
}

fn gradient_node(id: &str, geometry: &GradientGeometry, stops: &[PaintStop]) -> SvgNode {
    let mut node = match *geometry {
        GradientGeometry::Linear { start, end } => SvgNode::new("linearGradient")
            .attr("id", id)
            .attr("gradientUnits", "userSpaceOnUse")
            .attr("x1", start.x.round())
            .attr("y1", start.y.round())
            .attr("x2", end.x.round())
            .attr("y2", end.y.round()),
        GradientGeometry::Radial { center, radius } => SvgNode::new("radialGradient")
            .attr("id", id)
            .attr("gradientUnits", "userSpaceOnUse")
            .attr("fx", center.x)
            .attr("fy", center.y)
            .attr("cx", center.x)
            .attr("cy", center.y)
            .attr("r", radius),
    };
    for stop in stops {
        node.push(
            SvgNode::new("stop")
                .attr("offset", format!("{}%", 100.0 * stop.offset))
                .attr("stop-color", stop.color.css()),
        );
    }
    node
}

// Svg surface
//------------------------------------------------------------------------------

pub struct SvgSurface {
    doc: SvgDocument,
    current: Option<usize>,
}

impl SvgSurface {
    pub fn document(&self) -> &SvgDocument {
        &self.doc
    }

    fn push(&mut self, node: SvgNode) {
        match self.current {
            Some(i) => self.doc.defs[i].push(node),
            None => self.doc.body.push(node),
        }
    }

    /// Adds a figure rotated about `(cx, cy)`.
    fn figure(&mut self, node: SvgNode, rotation: f64, cx: f64, cy: f64) {
        let node = if rotation != 0.0 { node.attr("transform", rotate(rotation, cx, cy)) } else { node };
        self.push(node);
    }

    fn path(&mut self, d: String, a: FigureArgs) {
        let (cx, cy) = a.center();
        self.figure(SvgNode::new("path").attr("d", d), a.rotation, cx, cy);
    }

    fn ring(&mut self, d: String, a: FigureArgs) {
        let (cx, cy) = a.center();
        self.figure(SvgNode::new("path").attr("clip-rule", "evenodd").attr("d", d), a.rotation, cx, cy);
    }
}

fn rotate(rotation: f64, cx: f64, cy: f64) -> String {
    format!("rotate({},{cx},{cy})", 180.0 * rotation / PI)
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> SvgNode {
    SvgNode::new("rect").attr("x", x).attr("y", y).attr("width", w).attr("height", h)
}

fn circle(cx: f64, cy: f64, r: f64) -> SvgNode {
    SvgNode::new("circle").attr("cx", cx).attr("cy", cy).attr("r", r)
}

impl Surface for SvgSurface {
    type Output = SvgDocument;

    fn create(canvas: CanvasSize) -> RenderResult<Self> {
        Ok(Self { doc: SvgDocument::new(canvas), current: None })
    }

    fn begin_layer(&mut self, name: &str, paint: &Paint, area: Rect) -> LayerId {
        let mut layer = rect(area.x0, area.y0, area.width(), area.height())
            .attr("clip-path", format!("url('#clip-path-{name}')"));
        self.doc.defs.push(SvgNode::new("clipPath").attr("id", format!("clip-path-{name}")));
        let id = self.doc.defs.len() - 1;

        layer = match paint {
            Paint::Solid(c) => layer.attr("fill", c.css()),
            Paint::Gradient { geometry, stops } => {
                self.doc.defs.push(gradient_node(name, geometry, stops));
                layer.attr("fill", format!("url('#{name}')"))
            }
        };
        self.doc.body.push(layer);
        self.current = Some(id);
        LayerId(id)
    }

    fn use_layer(&mut self, layer: LayerId) {
        if layer.0 < self.doc.defs.len() {
            self.current = Some(layer.0);
        }
    }

    fn fill_area(&mut self, area: Rect, radius: f64) {
        let mut node = rect(area.x0, area.y0, area.width(), area.height());
        if radius > 0.0 {
            node = node.attr("rx", radius).attr("ry", radius);
        }
        self.push(node);
    }

    fn draw_frame_art(&mut self, art: &DecodedImage) {
        let node = match &art.markup {
            Some(markup) => SvgNode::Raw(markup.clone()),
            None => SvgNode::new("image")
                .attr("href", &art.src)
                .attr("x", 0)
                .attr("y", 0)
                .attr("width", self.doc.canvas.width)
                .attr("height", self.doc.canvas.height),
        };
        self.doc.body.push(node);
    }

    fn draw_image(&mut self, image: &DecodedImage, area: Rect) {
        self.doc.body.push(
            SvgNode::new("image")
                .attr("href", &image.src)
                .attr("x", area.x0)
                .attr("y", area.y0)
                .attr("width", format!("{}px", area.width()))
                .attr("height", format!("{}px", area.height())),
        );
    }

    fn finish(self) -> RenderResult<SvgDocument> {
        Ok(self.doc)
    }
}

impl FigureDrawer for SvgSurface {
    fn basic_dot(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        self.figure(circle(cx, cy, a.size / 2.0), a.rotation, cx, cy);
    }

    fn basic_reduced_dot(&mut self, a: FigureArgs, base: f64) {
        let off = (base - a.size) / 2.0;
        let (cx, cy) = (a.x + off + a.size / 2.0, a.y + off + a.size / 2.0);
        self.figure(circle(cx, cy, a.size / 2.0), a.rotation, cx, cy);
    }

    fn basic_square(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        self.figure(rect(a.x, a.y, a.size, a.size), a.rotation, cx, cy);
    }

    fn basic_reduced_square(&mut self, a: FigureArgs, base: f64) {
        let (cx, cy) = a.center();
        let off = a.reduced_offset(base);
        self.figure(rect(a.x + off, a.y + off, a.size, a.size), a.rotation, cx, cy);
    }

    fn basic_rectangle(&mut self, x: f64, y: f64, x_size: f64, y_size: f64) {
        let (x, y) = if x_size < y_size { (x + (y_size - x_size) / 2.0, y) } else { (x, y + (x_size - y_size) / 2.0) };
        self.push(rect(x, y, x_size, y_size));
    }

    fn basic_side_rounded(&mut self, a: FigureArgs) {
        let (x, y, s, h) = (a.x, a.y, a.size, a.size / 2.0);
        self.path(format!("M {x} {y} v {s} h {h} a {h} {h} 0 0 0 0 {}", -s), a);
    }

    fn basic_reduced_side_rounded(&mut self, a: FigureArgs, base: f64) {
        let (x, y, len) = a.reduced_side_rounded(base);
        let (s, h) = (a.size, a.size / 2.0);
        let d = format!("M {x} {y} v {s} h {} a {h} {h} 0 0 0 0 {}", base / 2.0, -s);
        self.figure(SvgNode::new("path").attr("d", d), a.rotation, x + len / 2.0, y + h);
    }

    fn basic_corner_rounded(&mut self, a: FigureArgs) {
        let (x, y, s, h) = (a.x, a.y, a.size, a.size / 2.0);
        self.path(format!("M {x} {y} v {s} h {s} v {} a {h} {h} 0 0 0 {} {}", -h, -h, -h), a);
    }

    fn basic_corner_extra_rounded(&mut self, a: FigureArgs) {
        let (x, y, s) = (a.x, a.y, a.size);
        self.path(format!("M {x} {y} v {s} h {s} a {s} {s} 0 0 0 {} {}", -s, -s), a);
    }

    fn basic_corners_rounded(&mut self, a: FigureArgs) {
        let (x, y, h) = (a.x, a.y, a.size / 2.0);
        self.path(format!("M {x} {y} v {h} a {h} {h} 0 0 0 {h} {h} h {h} v {} a {h} {h} 0 0 0 {} {}", -h, -h, -h), a);
    }

    fn basic_corner_ribbon(&mut self, a: FigureArgs) {
        let (x, y, s, h) = (a.x, a.y, a.size, a.size / 2.0);
        self.path(format!("M {x} {y} h {s} l {} {h} l {h} {h} h {} z", -h, -s), a);
    }

    fn basic_diamond(&mut self, a: FigureArgs) {
        let (x, y, h) = (a.x, a.y, a.size / 2.0);
        self.path(format!("M {} {y} l {h} {h} l {} {h} l {} {} z", x + h, -h, -h, -h), a);
    }

    fn basic_side_diamond(&mut self, a: FigureArgs) {
        let (x, y, h) = (a.x, a.y, a.size / 2.0);
        self.path(format!("M {x} {y} h {h} l {h} {h} l {} {h} h {} z", -h, -h), a);
    }

    fn basic_corner_diamond(&mut self, a: FigureArgs) {
        let (x, y, s, h) = (a.x, a.y, a.size, a.size / 2.0);
        self.path(format!("M {x} {y} h {h} l {h} {h} v {h} h {} z", -s), a);
    }

    fn ring_dot(&mut self, a: FigureArgs) {
        let (s, d) = (a.size, a.size / 7.0);
        let (cy, r, inner) = (a.y + s / 2.0, s / 2.0, s / 2.0 - d);
        let ring = format!(
            "M {x} {cy} a {r} {r} 0 1 0 {s} 0 a {r} {r} 0 1 0 {ns} 0 z \
             M {ix} {cy} a {inner} {inner} 0 1 0 {is} 0 a {inner} {inner} 0 1 0 {nis} 0 z",
            x = a.x,
            ns = -s,
            ix = a.x + d,
            is = 2.0 * inner,
            nis = -2.0 * inner,
        );
        self.ring(ring, a);
    }

    fn ring_square(&mut self, a: FigureArgs) {
        let (s, d) = (a.size, a.size / 7.0);
        let inner = s - 2.0 * d;
        let ring = format!(
            "M {x} {y} h {s} v {s} h {ns} z M {ix} {iy} h {inner} v {inner} h {ni} z",
            x = a.x,
            y = a.y,
            ns = -s,
            ix = a.x + d,
            iy = a.y + d,
            ni = -inner,
        );
        self.ring(ring, a);
    }

    fn ring_extra_rounded(&mut self, a: FigureArgs) {
        let (cx, cy) = a.center();
        let d = a.size / 7.0;
        let mut ring = String::new();
        for (r, edge) in [(2.5 * d, 3.5 * d), (1.5 * d, 2.5 * d)] {
            let side = 2.0 * d;
            let _ = write!(
                ring,
                "M {x} {y} a {r} {r} 0 0 1 {r} {nr} h {side} a {r} {r} 0 0 1 {r} {r} v {side} \
                 a {r} {r} 0 0 1 {nr} {r} h {ns} a {r} {r} 0 0 1 {nr} {nr} z ",
                x = cx - edge,
                y = cy - d,
                nr = -r,
                ns = -side,
            );
        }
        self.ring(ring.trim_end().to_string(), a);
    }

    fn compiled_path(&mut self, path: &str, a: FigureArgs) {
        self.path(path.to_string(), a);
    }
}
