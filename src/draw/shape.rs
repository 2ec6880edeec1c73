use kurbo::{BezPath, Ellipse, PathEl, Shape as _};

use crate::canvas::Canvas;
use crate::color::{Color, RgbColor};
use crate::draw::Drawable;
use crate::engine::{Layer, RasterEngine};
use crate::foundation::core::{Coordinate, Dimension, Region};
use crate::foundation::error::{RasterError, RasterResult};

const PATH_TOLERANCE: f64 = 0.1;

/// Geometry of a [`Shape`].
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rectangle(Region),
    /// Ellipse around `center`.
    Ellipse {
        /// Center point.
        center: Coordinate,
        /// Horizontal radius.
        radius_x: u32,
        /// Vertical radius.
        radius_y: u32,
    },
    /// Straight segment.
    Line {
        /// Start point.
        from: Coordinate,
        /// End point.
        to: Coordinate,
    },
    /// Closed polygon through at least three points.
    Polygon(Vec<Coordinate>),
}

/// How a [`Shape`] is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeStyle {
    /// Paint the interior.
    Fill,
    /// Paint the outline with the given width in pixels.
    Stroke {
        /// Stroke width.
        width: f64,
    },
}

/// An antialiased vector shape.
///
/// Solid colors are rasterized with coverage antialiasing. [`Color::Brushed`] outlines stamp
/// the canvas' registered brush along the path instead, ignoring the stroke width.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    style: ShapeStyle,
    color: Color,
}

impl Shape {
    /// Shape of `kind`, filled black.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            style: ShapeStyle::Fill,
            color: Color::Rgb(RgbColor::BLACK),
        }
    }

    /// Filled rectangle covering `region`.
    pub fn rectangle(region: Region) -> Self {
        Self::new(ShapeKind::Rectangle(region))
    }

    /// Filled ellipse.
    pub fn ellipse(center: Coordinate, radius_x: u32, radius_y: u32) -> Self {
        Self::new(ShapeKind::Ellipse {
            center,
            radius_x,
            radius_y,
        })
    }

    /// One pixel wide line.
    pub fn line(from: Coordinate, to: Coordinate) -> Self {
        Self::new(ShapeKind::Line { from, to }).stroked(1.0)
    }

    /// Filled polygon.
    pub fn polygon(points: impl IntoIterator<Item = Coordinate>) -> Self {
        Self::new(ShapeKind::Polygon(points.into_iter().collect()))
    }

    /// Use `color`: a solid color, [`Color::Transparent`] or, for strokes, [`Color::Brushed`].
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Paint the outline instead of the interior.
    pub fn stroked(mut self, width: f64) -> Self {
        self.style = ShapeStyle::Stroke { width };
        self
    }

    /// Paint the interior.
    pub fn filled(mut self) -> Self {
        self.style = ShapeStyle::Fill;
        self
    }

    /// Geometry.
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Paint style.
    pub fn style(&self) -> ShapeStyle {
        self.style
    }

    /// Paint color.
    pub fn color(&self) -> &Color {
        &self.color
    }

    fn path(&self) -> RasterResult<BezPath> {
        match &self.kind {
            ShapeKind::Rectangle(region) => Ok(region.to_rect().to_path(PATH_TOLERANCE)),
            ShapeKind::Ellipse {
                center,
                radius_x,
                radius_y,
            } => {
                if *radius_x == 0 || *radius_y == 0 {
                    return Err(RasterError::invalid_argument(
                        "ellipse radii must be positive",
                    ));
                }
                let ellipse = Ellipse::new(
                    center.to_point(),
                    (f64::from(*radius_x), f64::from(*radius_y)),
                    0.0,
                );
                Ok(ellipse.to_path(PATH_TOLERANCE))
            }
            ShapeKind::Line { from, to } => {
                if matches!(self.style, ShapeStyle::Fill) {
                    return Err(RasterError::invalid_argument("a line can only be stroked"));
                }
                let mut path = BezPath::new();
                path.move_to(pixel_center(*from));
                path.line_to(pixel_center(*to));
                Ok(path)
            }
            ShapeKind::Polygon(points) => {
                let [first, rest @ ..] = points.as_slice() else {
                    return Err(RasterError::invalid_argument("polygon has no points"));
                };
                if points.len() < 3 {
                    return Err(RasterError::invalid_argument(format!(
                        "polygon needs at least 3 points, got {}",
                        points.len()
                    )));
                }
                let mut path = BezPath::new();
                path.move_to(first.to_point());
                for p in rest {
                    path.line_to(p.to_point());
                }
                path.close_path();
                Ok(path)
            }
        }
    }

    fn rasterize(&self, color: RgbColor, dimension: Dimension) -> RasterResult<Layer> {
        let path = bezpath_to_cpu(&self.path()?);
        let (w, h) = pixmap_size(dimension)?;

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let [r, g, b, a] = color.to_array();
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        match self.style {
            ShapeStyle::Fill => ctx.fill_path(&path),
            ShapeStyle::Stroke { width } => {
                if !width.is_finite() || width <= 0.0 {
                    return Err(RasterError::invalid_argument(format!(
                        "stroke width must be finite and > 0, got {width}"
                    )));
                }
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
                ctx.stroke_path(&path);
            }
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Layer::new(
            Coordinate::ORIGIN,
            dimension,
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

impl<E: RasterEngine> Drawable<E> for Shape {
    #[tracing::instrument(name = "shape", skip_all)]
    fn draw(&self, canvas: &mut Canvas<E>) -> RasterResult<()> {
        let color = match &self.color {
            Color::Rgb(c) => *c,
            Color::Transparent => RgbColor::rgba(0, 0, 0, 0),
            Color::Brushed => {
                if matches!(self.style, ShapeStyle::Fill) {
                    return Err(RasterError::invalid_argument(
                        "a brushed shape can only be stroked",
                    ));
                }
                let points = brush_points(&self.path()?);
                canvas.stamp_brush(&points)?;
                return Ok(());
            }
            Color::Styled(_) | Color::Tiled => {
                return Err(RasterError::invalid_argument(
                    "shapes are painted with a solid or brushed color",
                ));
            }
        };
        let layer = self.rasterize(color, canvas.dimension()?)?;
        canvas.composite(&layer)?;
        Ok(())
    }
}

/// Pixels one unit apart along the flattened outline, without consecutive repeats.
fn brush_points(path: &BezPath) -> Vec<Coordinate> {
    let mut points = Vec::new();
    let mut start = kurbo::Point::ZERO;
    let mut current = kurbo::Point::ZERO;
    kurbo::flatten(path, PATH_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            start = p;
            current = p;
            push_point(&mut points, p);
        }
        PathEl::LineTo(p) => {
            walk_segment(&mut points, current, p);
            current = p;
        }
        PathEl::ClosePath => {
            walk_segment(&mut points, current, start);
            current = start;
        }
        // flatten only emits move, line and close
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    points
}

fn walk_segment(points: &mut Vec<Coordinate>, from: kurbo::Point, to: kurbo::Point) {
    let steps = from.distance(to).ceil().max(1.0) as usize;
    for i in 0..=steps {
        push_point(points, from.lerp(to, i as f64 / steps as f64));
    }
}

fn push_point(points: &mut Vec<Coordinate>, p: kurbo::Point) {
    let c = Coordinate::new(p.x.floor() as i32, p.y.floor() as i32);
    if points.last() != Some(&c) {
        points.push(c);
    }
}

fn pixel_center(c: Coordinate) -> kurbo::Point {
    kurbo::Point::new(f64::from(c.x) + 0.5, f64::from(c.y) + 0.5)
}

fn pixmap_size(dimension: Dimension) -> RasterResult<(u16, u16)> {
    let w = u16::try_from(dimension.width());
    let h = u16::try_from(dimension.height());
    match (w, h) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(RasterError::invalid_argument(format!(
            "shape rendering supports canvases up to {}x{}, got {}x{}",
            u16::MAX,
            u16::MAX,
            dimension.width(),
            dimension.height()
        ))),
    }
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/draw/shape.rs"]
mod tests;
