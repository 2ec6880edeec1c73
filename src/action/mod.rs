//! In-place canvas transformations.
//!
//! An [`Action`] owns its configuration, never a canvas. Configuration is validated when it is
//! set, so a constructed action is always applicable; applying it only fails on an empty
//! canvas or on an engine error.

use crate::canvas::Canvas;
use crate::engine::RasterEngine;
use crate::engine::cpu::CpuEngine;
use crate::foundation::error::{RasterError, RasterResult};

/// Sequential composition of actions.
pub mod chain;
/// 3x3 convolution filters.
pub mod convolution;
/// Whole-canvas scaling.
pub mod resize;
/// Building actions from JSON.
pub mod parse;

/// A reusable transformation applied in place to a bound canvas.
pub trait Action<E: RasterEngine = CpuEngine> {
    /// Transform `canvas` and hand it back for chaining.
    ///
    /// Implementations start with [`require_bound`], so an empty canvas is rejected before
    /// anything else happens.
    fn apply<'c>(&self, canvas: &'c mut Canvas<E>) -> RasterResult<&'c mut Canvas<E>>;
}

/// Fail with [`RasterError::EmptyCanvas`] unless `canvas` is bound.
pub fn require_bound<E: RasterEngine>(canvas: &Canvas<E>) -> RasterResult<()> {
    if canvas.is_bound() {
        Ok(())
    } else {
        Err(RasterError::EmptyCanvas)
    }
}

impl<E: RasterEngine, A: Action<E> + ?Sized> Action<E> for Box<A> {
    fn apply<'c>(&self, canvas: &'c mut Canvas<E>) -> RasterResult<&'c mut Canvas<E>> {
        (**self).apply(canvas)
    }
}
