//! The mutable canvas: exclusive owner of one raster handle.
//!
//! A canvas is either empty or bound to exactly one surface of its [`RasterEngine`]. Every
//! rebind (`create`, `from_file`, `from_bytes`, `from_canvas`, `set_handle`) releases the
//! current surface through the engine before the new one is stored, and copies
//! (`duplicate`, `from_canvas`) always produce a distinct surface.

use std::io::Write;
use std::path::Path;

use crate::action::Action;
use crate::color::Color;
use crate::draw::Drawable;
use crate::engine::cpu::CpuEngine;
use crate::engine::{Layer, RasterEngine, RasterFlag};
use crate::foundation::core::{Coordinate, Dimension, Region};
use crate::foundation::error::{RasterError, RasterResult};

/// A raster canvas over engine `E`.
///
/// Dropping a bound canvas releases its surface. Call [`Canvas::destroy`] to observe release
/// failures.
pub struct Canvas<E: RasterEngine = CpuEngine> {
    engine: E,
    surface: Option<E::Surface>,
}

impl Canvas<CpuEngine> {
    /// Empty canvas on the default CPU engine.
    pub fn new() -> Self {
        Self::with_engine(CpuEngine::default())
    }

    /// Bound canvas of `dimension` on the default CPU engine.
    pub fn from_dimension(dimension: Dimension) -> RasterResult<Self> {
        let mut canvas = Self::new();
        canvas.create(dimension)?;
        Ok(canvas)
    }
}

impl Default for Canvas<CpuEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RasterEngine> std::fmt::Debug for Canvas<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dimension = self
            .surface
            .as_ref()
            .and_then(|s| self.engine.dimension(s).ok());
        f.debug_struct("Canvas")
            .field("bound", &self.surface.is_some())
            .field("dimension", &dimension)
            .finish()
    }
}

impl<E: RasterEngine> Canvas<E> {
    /// Empty canvas on `engine`.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            surface: None,
        }
    }

    /// Engine backing this canvas.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Return `true` when a surface is bound.
    pub fn is_bound(&self) -> bool {
        self.surface.is_some()
    }

    /// Bound surface, if any.
    pub fn handle(&self) -> Option<&E::Surface> {
        self.surface.as_ref()
    }

    /// Bind an externally built surface, releasing the current one.
    ///
    /// The surface is checked with [`RasterEngine::validate`] before anything is released.
    pub fn set_handle(&mut self, surface: E::Surface) -> RasterResult<&mut Self> {
        self.engine.validate(&surface).map_err(|e| match e {
            RasterError::InvalidArgument(_) => e,
            other => RasterError::invalid_argument(other.to_string()),
        })?;
        self.release()?;
        self.surface = Some(surface);
        Ok(self)
    }

    /// Give up ownership of the bound surface without releasing it. The canvas becomes empty.
    pub fn take_handle(&mut self) -> Option<E::Surface> {
        self.surface.take()
    }

    /// Run engine primitives against the bound surface.
    pub fn with_surface_mut<R>(
        &mut self,
        f: impl FnOnce(&E, &mut E::Surface) -> RasterResult<R>,
    ) -> RasterResult<R> {
        let Self { engine, surface } = self;
        let surface = surface.as_mut().ok_or(RasterError::EmptyCanvas)?;
        f(engine, surface)
    }

    /// Allocate a new true-color surface of `dimension`.
    #[tracing::instrument(skip(self))]
    pub fn create(&mut self, dimension: Dimension) -> RasterResult<&mut Self> {
        self.release()?;
        self.surface = Some(self.engine.allocate(dimension)?);
        Ok(self)
    }

    /// Decode the image file at `path` into a new surface.
    #[tracing::instrument(skip_all)]
    pub fn from_file(&mut self, path: impl AsRef<Path>) -> RasterResult<&mut Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "load canvas");
        self.release()?;
        self.surface = Some(self.engine.decode_file(path)?);
        Ok(self)
    }

    /// Decode an in-memory encoded image into a new surface.
    #[tracing::instrument(skip_all, fields(len = bytes.len()))]
    pub fn from_bytes(&mut self, bytes: &[u8]) -> RasterResult<&mut Self> {
        self.release()?;
        self.surface = Some(self.engine.decode_bytes(bytes)?);
        Ok(self)
    }

    /// Replace the bound surface with a full copy of `other`'s pixels.
    ///
    /// Later changes to `other` do not affect this canvas.
    #[tracing::instrument(skip_all)]
    pub fn from_canvas(&mut self, other: &Canvas<E>) -> RasterResult<&mut Self> {
        let src = other.surface()?;
        self.release()?;
        self.surface = Some(self.engine.duplicate(src)?);
        Ok(self)
    }

    /// Independent canvas holding a copy of this canvas' pixels.
    pub fn duplicate(&self) -> RasterResult<Canvas<E>> {
        let copy = self.engine.duplicate(self.surface()?)?;
        Ok(Canvas {
            engine: self.engine.clone(),
            surface: Some(copy),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> RasterResult<u32> {
        Ok(self.dimension()?.width())
    }

    /// Height in pixels.
    pub fn height(&self) -> RasterResult<u32> {
        Ok(self.dimension()?.height())
    }

    /// Current size, read from the bound surface.
    pub fn dimension(&self) -> RasterResult<Dimension> {
        self.engine.dimension(self.surface()?)
    }

    /// Toggle alpha blending for subsequent fills, pastes and draws.
    pub fn alpha_blending(&mut self, enabled: bool) -> RasterResult<&mut Self> {
        self.set_flag(RasterFlag::AlphaBlending, enabled)
    }

    /// Toggle the interlace bit.
    pub fn interlace(&mut self, enabled: bool) -> RasterResult<&mut Self> {
        self.set_flag(RasterFlag::Interlace, enabled)
    }

    /// Read a rendering flag.
    pub fn flag(&self, flag: RasterFlag) -> RasterResult<bool> {
        Ok(self.engine.flag(self.surface()?, flag))
    }

    fn set_flag(&mut self, flag: RasterFlag, enabled: bool) -> RasterResult<&mut Self> {
        self.with_surface_mut(|engine, s| engine.set_flag(s, flag, enabled))?;
        Ok(self)
    }

    /// Let `drawable` render itself onto this canvas.
    pub fn draw<D: Drawable<E> + ?Sized>(&mut self, drawable: &D) -> RasterResult<&mut Self> {
        self.surface()?;
        drawable.draw(self)?;
        Ok(self)
    }

    /// Apply `action` to this canvas.
    pub fn apply<A: Action<E> + ?Sized>(&mut self, action: &A) -> RasterResult<&mut Self> {
        action.apply(self)
    }

    /// Copy `src_region` of `src` into `dest_region` of this canvas.
    ///
    /// An omitted `src_region` covers all of `src` from `(0, 0)`; an omitted `dest_region`
    /// covers all of this canvas from `(0, 0)`. Regions of different sizes stretch.
    pub fn paste(
        &mut self,
        src: &Canvas<E>,
        src_region: Option<Region>,
        dest_region: Option<Region>,
    ) -> RasterResult<&mut Self> {
        let src_surface = src.surface()?;
        let src_dim = src.dimension()?;
        let dest_dim = self.dimension()?;
        let src_region = src_region.unwrap_or_else(|| Region::at_origin(src_dim));
        let dest_region = dest_region.unwrap_or_else(|| Region::at_origin(dest_dim));
        check_region("source", src_region, src_dim)?;
        check_region("destination", dest_region, dest_dim)?;

        self.with_surface_mut(|engine, dst| {
            engine.copy_region(src_surface, src_region, dst, dest_region)
        })?;
        Ok(self)
    }

    /// Copy between two regions of this canvas. Source pixels are read before any write, so
    /// overlapping regions are safe. Omitted regions cover the whole canvas.
    pub fn paste_within(
        &mut self,
        src_region: Option<Region>,
        dest_region: Option<Region>,
    ) -> RasterResult<&mut Self> {
        let dim = self.dimension()?;
        let src_region = src_region.unwrap_or_else(|| Region::at_origin(dim));
        let dest_region = dest_region.unwrap_or_else(|| Region::at_origin(dim));
        check_region("source", src_region, dim)?;
        check_region("destination", dest_region, dim)?;

        self.with_surface_mut(|engine, s| engine.copy_within(s, src_region, dest_region))?;
        Ok(self)
    }

    /// Flood fill from `at` (default `(0, 0)`) with `color`.
    pub fn fill(&mut self, color: &Color, at: Option<Coordinate>) -> RasterResult<&mut Self> {
        let origin = at.unwrap_or_default();
        let dim = self.dimension()?;
        if !origin.is_inside(dim) {
            return Err(RasterError::invalid_argument(format!(
                "fill origin ({}, {}) is outside the {}x{} canvas",
                origin.x,
                origin.y,
                dim.width(),
                dim.height()
            )));
        }

        self.with_surface_mut(|engine, s| {
            let paint = engine.resolve_color(s, color)?;
            engine.fill_region(s, &paint, origin)
        })?;
        Ok(self)
    }

    /// Flood fill from `at` (default `(0, 0)`) repeating `pattern`.
    pub fn fill_pattern(
        &mut self,
        pattern: &Canvas<E>,
        at: Option<Coordinate>,
    ) -> RasterResult<&mut Self> {
        let tile = pattern.surface()?;
        self.with_surface_mut(|engine, s| engine.set_tile(s, tile))?;
        self.fill(&Color::Tiled, at)
    }

    /// Register `brush`'s pixels as the image painted by [`Color::Brushed`].
    pub fn set_brush(&mut self, brush: &Canvas<E>) -> RasterResult<&mut Self> {
        let brush = brush.surface()?;
        self.with_surface_mut(|engine, s| engine.set_brush(s, brush))?;
        Ok(self)
    }

    /// Stamp the registered brush centred on each of `points`.
    pub fn stamp_brush(&mut self, points: &[Coordinate]) -> RasterResult<&mut Self> {
        self.with_surface_mut(|engine, s| engine.stamp_brush(s, points))?;
        Ok(self)
    }

    /// Composite a premultiplied layer onto this canvas.
    pub fn composite(&mut self, layer: &Layer) -> RasterResult<&mut Self> {
        self.with_surface_mut(|engine, s| engine.composite_layer(s, layer))?;
        Ok(self)
    }

    /// Encode into the file at `path`; the format follows the file extension.
    #[tracing::instrument(skip_all)]
    pub fn save(&self, path: impl AsRef<Path>) -> RasterResult<&Self> {
        let path = path.as_ref();
        let surface = self.surface()?;
        tracing::debug!(path = %path.display(), "save canvas");
        self.engine.encode_to_file(surface, path)?;
        Ok(self)
    }

    /// Encode with the engine's default format into `out`.
    pub fn write_to(&self, out: &mut dyn Write) -> RasterResult<&Self> {
        self.engine.encode_to_writer(self.surface()?, out)?;
        Ok(self)
    }

    /// Encoded bytes of the canvas, as [`Canvas::write_to`] would produce them.
    pub fn to_bytes(&self) -> RasterResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Release the bound surface. Destroying an empty canvas is a no-op.
    pub fn destroy(&mut self) -> RasterResult<&mut Self> {
        self.release()?;
        Ok(self)
    }

    fn surface(&self) -> RasterResult<&E::Surface> {
        self.surface.as_ref().ok_or(RasterError::EmptyCanvas)
    }

    fn release(&mut self) -> RasterResult<()> {
        let Some(surface) = self.surface.take() else {
            return Ok(());
        };
        self.engine.free(surface).map_err(|e| match e {
            RasterError::Destroy(_) => e,
            other => RasterError::destroy(other.to_string()),
        })
    }
}

impl<E: RasterEngine> Drop for Canvas<E> {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.take()
            && let Err(e) = self.engine.free(surface)
        {
            tracing::warn!(error = %e, "failed to release canvas surface on drop");
        }
    }
}

fn check_region(which: &str, region: Region, bounds: Dimension) -> RasterResult<()> {
    if region.fits_within(bounds) {
        return Ok(());
    }
    Err(RasterError::invalid_argument(format!(
        "{which} region {}x{} at ({}, {}) exceeds the {}x{} canvas",
        region.width(),
        region.height(),
        region.x(),
        region.y(),
        bounds.width(),
        bounds.height()
    )))
}

#[cfg(test)]
#[path = "../tests/unit/canvas.rs"]
mod tests;
