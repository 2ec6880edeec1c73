//! Raster engine boundary.
//!
//! A [`RasterEngine`] owns the pixel math: allocation, codecs, region copies, flood fills,
//! convolution and layer compositing. Canvases, actions and drawables only sequence these
//! primitives. Surfaces are owned values; the engine never keeps a second reference to one.

use std::io::Write;
use std::path::Path;

use crate::color::Color;
use crate::foundation::core::{Coordinate, Dimension, Region};
use crate::foundation::error::{RasterError, RasterResult};

/// CPU engine built on the `image` crate.
pub mod cpu;
/// Validated 3x3 convolution kernels.
pub mod kernel;

pub use kernel::Kernel;

/// Rendering flags stored on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RasterFlag {
    /// Composite fills, copies and layers "source over" instead of replacing pixels.
    AlphaBlending,
    /// Request interlaced (progressive) output where the codec supports it.
    Interlace,
}

/// Primitive raster operations consumed by [`crate::Canvas`].
///
/// `Surface` is the raster handle. It is moved into [`RasterEngine::free`] so a released
/// handle can not be used again.
pub trait RasterEngine: Clone {
    /// Owned pixel buffer handle.
    type Surface;
    /// Engine-native color produced by [`RasterEngine::resolve_color`].
    type Paint;

    /// Allocate a true-color surface of `dimension`.
    fn allocate(&self, dimension: Dimension) -> RasterResult<Self::Surface>;

    /// Decode an image file.
    fn decode_file(&self, path: &Path) -> RasterResult<Self::Surface>;

    /// Decode an in-memory encoded image.
    fn decode_bytes(&self, bytes: &[u8]) -> RasterResult<Self::Surface>;

    /// Encode `surface` into the file at `path`.
    fn encode_to_file(&self, surface: &Self::Surface, path: &Path) -> RasterResult<()>;

    /// Encode `surface` with the engine's default format into `out`.
    fn encode_to_writer(&self, surface: &Self::Surface, out: &mut dyn Write) -> RasterResult<()>;

    /// Release a surface.
    fn free(&self, surface: Self::Surface) -> RasterResult<()>;

    /// Check that a surface handed in from outside is usable by this engine.
    fn validate(&self, surface: &Self::Surface) -> RasterResult<()>;

    /// Current size of `surface`.
    fn dimension(&self, surface: &Self::Surface) -> RasterResult<Dimension>;

    /// Full pixel copy into a brand-new surface.
    fn duplicate(&self, surface: &Self::Surface) -> RasterResult<Self::Surface>;

    /// Copy `src_region` of `src` into `dst_region` of `dst`, stretching when the sizes differ.
    fn copy_region(
        &self,
        src: &Self::Surface,
        src_region: Region,
        dst: &mut Self::Surface,
        dst_region: Region,
    ) -> RasterResult<()>;

    /// Copy between two regions of the same surface.
    ///
    /// The source pixels are read from a snapshot, so overlapping regions never observe
    /// already-written pixels.
    fn copy_within(
        &self,
        surface: &mut Self::Surface,
        src_region: Region,
        dst_region: Region,
    ) -> RasterResult<()> {
        let snapshot = self.duplicate(surface)?;
        let copied = self.copy_region(&snapshot, src_region, surface, dst_region);
        let freed = self.free(snapshot);
        copied.and(freed)
    }

    /// Flood fill the area connected to `origin` with `paint`.
    fn fill_region(
        &self,
        surface: &mut Self::Surface,
        paint: &Self::Paint,
        origin: Coordinate,
    ) -> RasterResult<()>;

    /// Register `tile` as the pattern used by [`Color::Tiled`].
    fn set_tile(&self, surface: &mut Self::Surface, tile: &Self::Surface) -> RasterResult<()>;

    /// Register `brush` as the image used by [`Color::Brushed`] and [`RasterEngine::stamp_brush`].
    fn set_brush(&self, surface: &mut Self::Surface, brush: &Self::Surface) -> RasterResult<()>;

    /// Stamp the registered brush centred on every point, clipped to the surface.
    fn stamp_brush(&self, surface: &mut Self::Surface, points: &[Coordinate]) -> RasterResult<()>;

    /// Apply a 3x3 convolution in place.
    fn apply_convolution(
        &self,
        surface: &mut Self::Surface,
        kernel: &Kernel,
        divisor: f32,
        offset: f32,
    ) -> RasterResult<()>;

    /// Toggle a rendering flag.
    fn set_flag(
        &self,
        surface: &mut Self::Surface,
        flag: RasterFlag,
        enabled: bool,
    ) -> RasterResult<()>;

    /// Read a rendering flag.
    fn flag(&self, surface: &Self::Surface, flag: RasterFlag) -> bool;

    /// Resolve `color` against `surface`.
    fn resolve_color(&self, surface: &Self::Surface, color: &Color) -> RasterResult<Self::Paint>;

    /// Composite a premultiplied layer onto `surface`. Pixels outside the surface are clipped.
    fn composite_layer(&self, surface: &mut Self::Surface, layer: &Layer) -> RasterResult<()>;
}

/// A premultiplied RGBA8 pixel block positioned in canvas space.
///
/// Drawables rasterize into a layer and hand it to [`crate::Canvas::composite`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    origin: Coordinate,
    dimension: Dimension,
    rgba8_premul: Vec<u8>,
}

impl Layer {
    /// Create a layer; `rgba8_premul` must hold `width * height * 4` bytes, row-major.
    pub fn new(
        origin: Coordinate,
        dimension: Dimension,
        rgba8_premul: Vec<u8>,
    ) -> RasterResult<Self> {
        let expected = (dimension.width() as usize)
            .checked_mul(dimension.height() as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| RasterError::invalid_argument("layer buffer size overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(RasterError::invalid_argument(format!(
                "layer expects {expected} bytes for {}x{} but got {}",
                dimension.width(),
                dimension.height(),
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            origin,
            dimension,
            rgba8_premul,
        })
    }

    /// Top-left corner in canvas space.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Layer size.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Premultiplied pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied pixel at layer-local `(x, y)`, or `None` outside the layer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.dimension.width() || y >= self.dimension.height() {
            return None;
        }
        let i = ((y as usize) * (self.dimension.width() as usize) + (x as usize)) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
