use crate::foundation::error::{RasterError, RasterResult};

pub use kurbo::{Point, Rect};

/// Width and height of a raster area in pixels, both strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "DimensionRepr")]
pub struct Dimension {
    width: u32,
    height: u32,
}

#[derive(serde::Deserialize)]
struct DimensionRepr {
    width: u32,
    height: u32,
}

impl TryFrom<DimensionRepr> for Dimension {
    type Error = RasterError;

    fn try_from(repr: DimensionRepr) -> RasterResult<Self> {
        Self::new(repr.width, repr.height)
    }
}

impl Dimension {
    /// Create a validated dimension with `width > 0` and `height > 0`.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimension { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.height
    }

    /// Number of pixels covered.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A pixel position. Defaults to the origin `(0, 0)`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Coordinate {
    /// Horizontal position, growing to the right.
    pub x: i32,
    /// Vertical position, growing downwards.
    pub y: i32,
}

impl Coordinate {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a coordinate.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return `true` when the coordinate addresses a pixel inside `dimension`.
    pub fn is_inside(self, dimension: Dimension) -> bool {
        self.x >= 0
            && self.y >= 0
            && i64::from(self.x) < i64::from(dimension.width())
            && i64::from(self.y) < i64::from(dimension.height())
    }

    /// Convert to a `kurbo` point.
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// An axis-aligned rectangular sub-region of a canvas.
///
/// A region carries no canvas context: whether it lies inside a given canvas is checked by
/// the operation consuming it (see [`Region::fits_within`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Top-left corner.
    #[serde(default)]
    pub origin: Coordinate,
    /// Extent.
    pub dimension: Dimension,
}

impl Region {
    /// Create a region.
    pub fn new(origin: Coordinate, dimension: Dimension) -> Self {
        Self { origin, dimension }
    }

    /// A region covering `dimension` starting at `(0, 0)`.
    pub fn at_origin(dimension: Dimension) -> Self {
        Self {
            origin: Coordinate::ORIGIN,
            dimension,
        }
    }

    /// Left edge.
    pub fn x(self) -> i32 {
        self.origin.x
    }

    /// Top edge.
    pub fn y(self) -> i32 {
        self.origin.y
    }

    /// Region width.
    pub fn width(self) -> u32 {
        self.dimension.width()
    }

    /// Region height.
    pub fn height(self) -> u32 {
        self.dimension.height()
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.origin.x) + i64::from(self.dimension.width())
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.origin.y) + i64::from(self.dimension.height())
    }

    /// Return `true` when the whole region lies inside a canvas of `bounds`.
    pub fn fits_within(self, bounds: Dimension) -> bool {
        self.origin.x >= 0
            && self.origin.y >= 0
            && self.right() <= i64::from(bounds.width())
            && self.bottom() <= i64::from(bounds.height())
    }

    /// Return `true` when both regions share at least one pixel.
    pub fn overlaps(self, other: Region) -> bool {
        i64::from(self.origin.x) < other.right()
            && i64::from(other.origin.x) < self.right()
            && i64::from(self.origin.y) < other.bottom()
            && i64::from(other.origin.y) < self.bottom()
    }

    /// Convert to a `kurbo` rectangle in pixel space.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.origin.x),
            f64::from(self.origin.y),
            self.right() as f64,
            self.bottom() as f64,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
