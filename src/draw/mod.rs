//! Things that paint themselves onto a canvas.
//!
//! Drawables rasterize into a premultiplied [`crate::engine::Layer`] and composite it through
//! [`Canvas::composite`]; the canvas keeps its handle.

use crate::canvas::Canvas;
use crate::engine::RasterEngine;
use crate::engine::cpu::CpuEngine;
use crate::foundation::error::RasterResult;

/// Vector shapes.
pub mod shape;
/// SVG overlays.
pub mod svg;

/// A renderable that mutates a bound canvas' pixels in place.
pub trait Drawable<E: RasterEngine = CpuEngine> {
    /// Render onto `canvas`.
    fn draw(&self, canvas: &mut Canvas<E>) -> RasterResult<()>;
}

impl<E: RasterEngine, D: Drawable<E> + ?Sized> Drawable<E> for Box<D> {
    fn draw(&self, canvas: &mut Canvas<E>) -> RasterResult<()> {
        (**self).draw(canvas)
    }
}

impl<E: RasterEngine, D: Drawable<E>> Drawable<E> for [D] {
    fn draw(&self, canvas: &mut Canvas<E>) -> RasterResult<()> {
        for d in self {
            d.draw(canvas)?;
        }
        Ok(())
    }
}
