//! Visit glyph outlines.
//!
//! A decoded `GlyphOutline` is delivered to implementors of the `OutlineSink` trait as a series
//! of straight contour segments followed by one marker per point. `Viewport` maps font units onto
//! a device area and `SvgSink` uses it to render the outline to an SVG document.
//!
//! ### Example
//!
//! ```
//! use glyphscope::outline::OutlineSink;
//! use glyphscope::tables::glyf::Point;
//!
//! #[derive(Default)]
//! struct Counter {
//!     lines: usize,
//!     off_curve: usize,
//! }
//!
//! impl OutlineSink for Counter {
//!     fn line(&mut self, _from: Point, _to: Point) {
//!         self.lines += 1;
//!     }
//!
//!     fn point(&mut self, _index: usize, point: Point) {
//!         if !point.on_curve {
//!             self.off_curve += 1;
//!         }
//!     }
//! }
//! ```

use pathfinder_geometry::rect::RectF;
use pathfinder_geometry::transform2d::Transform2F;
use pathfinder_geometry::vector::Vector2F;
use svg::node::element::{Circle, Line, Rectangle, Text};
use svg::{Document, Node};

use crate::tables::glyf::{BoundingBox, GlyphOutline, Point};

/// A trait for visiting a glyph outline
pub trait OutlineSink {
    /// Draws a straight line between two points of the same contour.
    fn line(&mut self, from: Point, to: Point);
    /// Marks a point of the outline. `index` is the position of the point in the glyph.
    fn point(&mut self, index: usize, point: Point);
}

impl GlyphOutline {
    /// Deliver the outline to `sink`.
    ///
    /// Every contour is drawn as a closed polygon, then every point is marked in order.
    pub fn draw<S: OutlineSink>(&self, sink: &mut S) {
        for (from, to) in self.segments() {
            sink.line(from, to);
        }
        for (index, &point) in self.points.iter().enumerate() {
            sink.point(index, point);
        }
    }
}

impl From<Point> for Vector2F {
    fn from(point: Point) -> Self {
        Vector2F::new(f32::from(point.x), f32::from(point.y))
    }
}

/// Maps font units onto a device area with the y axis pointing down.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    transform: Transform2F,
    size: Vector2F,
    scale: f32,
}

impl Viewport {
    /// Space left around the glyph on each side, in device units.
    pub const MARGIN: f32 = 50.;

    /// Fit `bounding_box` into a `width` by `height` area, preserving its aspect ratio.
    ///
    /// An axis on which the box has no extent does not constrain the scale. If neither axis
    /// has any extent the scale is 1. An area too small to hold the margins gives a scale of 0.
    pub fn fit(bounding_box: &BoundingBox, width: f32, height: f32) -> Viewport {
        let inner_width = (width - 2. * Self::MARGIN).max(0.);
        let inner_height = (height - 2. * Self::MARGIN).max(0.);
        let scale = [
            (bounding_box.width(), inner_width),
            (bounding_box.height(), inner_height),
        ]
        .iter()
        .filter(|(extent, _)| *extent > 0)
        .map(|&(extent, inner)| inner / extent as f32)
        .fold(f32::INFINITY, f32::min);
        let scale = if scale.is_finite() { scale } else { 1. };

        let to_origin = Vector2F::new(
            -f32::from(bounding_box.x_min),
            -f32::from(bounding_box.y_min),
        );
        let transform = Transform2F::from_translation(Vector2F::new(
            Self::MARGIN,
            height - Self::MARGIN,
        )) * Transform2F::from_scale(Vector2F::new(scale, -scale))
            * Transform2F::from_translation(to_origin);

        Viewport {
            transform,
            size: Vector2F::new(width, height),
            scale,
        }
    }

    pub fn size(&self) -> Vector2F {
        self.size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Position of `point` in device units.
    pub fn project(&self, point: Point) -> Vector2F {
        self.transform * Vector2F::from(point)
    }

    /// Device rectangle covered by `bounding_box`.
    pub fn project_box(&self, bounding_box: &BoundingBox) -> RectF {
        let corner = |x, y| {
            self.project(Point {
                x,
                y,
                on_curve: true,
            })
        };
        let top_left = corner(bounding_box.x_min, bounding_box.y_max);
        let bottom_right = corner(bounding_box.x_max, bounding_box.y_min);
        RectF::from_points(top_left, bottom_right)
    }
}

const BOX_COLOR: &str = "blue";
const LINE_COLOR: &str = "black";
const ON_CURVE_COLOR: &str = "red";
const OFF_CURVE_COLOR: &str = "green";
const LABEL_COLOR: &str = "dimgray";

/// Renders an outline to an SVG document.
///
/// Contours are drawn as lines, on-curve points as circles and off-curve points as squares.
/// Each point is labelled with its index. The glyph bounding box is drawn when the sink is
/// created.
pub struct SvgSink {
    viewport: Viewport,
    document: Document,
}

impl SvgSink {
    pub fn new(viewport: Viewport, bounding_box: &BoundingBox) -> SvgSink {
        let size = viewport.size();
        let rect = viewport.project_box(bounding_box);
        let frame = Rectangle::new()
            .set("x", rect.origin_x())
            .set("y", rect.origin_y())
            .set("width", rect.width())
            .set("height", rect.height())
            .set("fill", "none")
            .set("stroke", BOX_COLOR);
        let document = Document::new()
            .set("width", size.x())
            .set("height", size.y())
            .set("viewBox", (0., 0., size.x(), size.y()))
            .add(frame);

        SvgSink { viewport, document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

impl OutlineSink for SvgSink {
    fn line(&mut self, from: Point, to: Point) {
        let from = self.viewport.project(from);
        let to = self.viewport.project(to);
        self.document.append(
            Line::new()
                .set("x1", from.x())
                .set("y1", from.y())
                .set("x2", to.x())
                .set("y2", to.y())
                .set("stroke", LINE_COLOR),
        );
    }

    fn point(&mut self, index: usize, point: Point) {
        let at = self.viewport.project(point);
        if point.on_curve {
            self.document.append(
                Circle::new()
                    .set("cx", at.x())
                    .set("cy", at.y())
                    .set("r", 5)
                    .set("fill", ON_CURVE_COLOR),
            );
        } else {
            self.document.append(
                Rectangle::new()
                    .set("x", at.x() - 4.)
                    .set("y", at.y() - 4.)
                    .set("width", 8)
                    .set("height", 8)
                    .set("fill", OFF_CURVE_COLOR),
            );
        }
        self.document.append(
            Text::new()
                .set("x", at.x() + 8.)
                .set("y", at.y() - 8.)
                .set("font-size", 10)
                .set("fill", LABEL_COLOR)
                .add(svg::node::Text::new(index.to_string())),
        );
    }
}
