use std::sync::Arc;

use anyhow::Context;

use crate::canvas::Canvas;
use crate::draw::Drawable;
use crate::engine::{Layer, RasterEngine};
use crate::foundation::core::Region;
use crate::foundation::error::{RasterError, RasterResult};

/// An SVG document stretched over a canvas region.
#[derive(Clone)]
pub struct SvgOverlay {
    tree: Arc<usvg::Tree>,
    region: Region,
}

impl std::fmt::Debug for SvgOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.tree.size();
        f.debug_struct("SvgOverlay")
            .field("svg_size", &(size.width(), size.height()))
            .field("region", &self.region)
            .finish()
    }
}

impl SvgOverlay {
    /// Wrap a parsed tree.
    pub fn new(tree: Arc<usvg::Tree>, region: Region) -> Self {
        Self { tree, region }
    }

    /// Parse SVG source.
    pub fn from_data(bytes: &[u8], region: Region) -> RasterResult<Self> {
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
        Ok(Self::new(Arc::new(tree), region))
    }

    /// Target region in canvas space.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Move or rescale the overlay.
    pub fn set_region(&mut self, region: Region) -> &mut Self {
        self.region = region;
        self
    }

    fn rasterize(&self) -> RasterResult<Layer> {
        let (width, height) = (self.region.width(), self.region.height());
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| RasterError::invalid_argument("failed to allocate svg pixmap"))?;

        let size = self.tree.size();
        let sx = (width as f32) / size.width();
        let sy = (height as f32) / size.height();
        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
        resvg::render(&self.tree, xform, &mut pixmap.as_mut());

        Layer::new(self.region.origin, self.region.dimension, pixmap.data().to_vec())
    }
}

impl<E: RasterEngine> Drawable<E> for SvgOverlay {
    #[tracing::instrument(name = "svg_overlay", skip_all)]
    fn draw(&self, canvas: &mut Canvas<E>) -> RasterResult<()> {
        let layer = self.rasterize()?;
        canvas.composite(&layer)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/svg.rs"]
mod tests;
