use crate::action::{Action, require_bound};
use crate::canvas::Canvas;
use crate::engine::{RasterEngine, RasterFlag};
use crate::foundation::core::{Dimension, Region};
use crate::foundation::error::RasterResult;

/// Scales the whole canvas to a new size.
///
/// The canvas keeps its identity and its rendering flags; only its surface is swapped for a
/// resampled one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeAction {
    dimension: Dimension,
}

impl ResizeAction {
    /// Resize to `dimension`.
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }

    /// Change the target size.
    pub fn set_dimension(&mut self, dimension: Dimension) -> &mut Self {
        self.dimension = dimension;
        self
    }

    /// Target size.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }
}

impl<E: RasterEngine> Action<E> for ResizeAction {
    #[tracing::instrument(
        name = "resize",
        skip_all,
        fields(width = self.dimension.width(), height = self.dimension.height())
    )]
    fn apply<'c>(&self, canvas: &'c mut Canvas<E>) -> RasterResult<&'c mut Canvas<E>> {
        require_bound(canvas)?;

        let blending = canvas.flag(RasterFlag::AlphaBlending)?;
        let interlace = canvas.flag(RasterFlag::Interlace)?;

        // The scratch canvas releases its surface on drop, so every early return below
        // frees it too. Blending is off while copying, so every destination pixel, alpha
        // included, comes from the source.
        let mut scaled = Canvas::with_engine(canvas.engine().clone());
        scaled.create(self.dimension)?.alpha_blending(false)?;
        scaled.paste(canvas, None, Some(Region::at_origin(self.dimension)))?;
        scaled.alpha_blending(blending)?.interlace(interlace)?;

        canvas.from_canvas(&scaled)?;
        scaled.destroy()?;
        Ok(canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/action/resize.rs"]
mod tests;
