//! rasterkit is a small image manipulation toolkit.
//!
//! A [`Canvas`] owns exactly one raster surface of a [`RasterEngine`]. Reusable
//! [`Action`]s transform the canvas in place, [`Drawable`]s paint onto it, and
//! geometry values ([`Dimension`], [`Coordinate`], [`Region`]) address sub-areas when pasting
//! between canvases.
//!
//! - Build a canvas with [`Canvas::create`], [`Canvas::from_file`] or [`Canvas::from_bytes`]
//! - Apply actions such as [`ConvolutionAction`] and [`ResizeAction`], or a whole
//!   [`ActionChain`]
//! - Encode with [`Canvas::save`] or [`Canvas::to_bytes`]
//!
//! Pixel math lives behind the engine; [`CpuEngine`] is the default implementation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Composable canvas transformations.
pub mod action;
/// The canvas and its lifecycle.
pub mod canvas;
/// Color values accepted by fills.
pub mod color;
/// Renderables that paint onto a canvas.
pub mod draw;
/// Raster engine boundary and the CPU engine.
pub mod engine;

pub use crate::foundation::core::{Coordinate, Dimension, Point, Rect, Region};
pub use crate::foundation::error::{ErrorKind, KernelError, RasterError, RasterResult};

pub use crate::action::chain::ActionChain;
pub use crate::action::convolution::ConvolutionAction;
pub use crate::action::resize::ResizeAction;
pub use crate::action::parse::{ActionSpec, parse_action};
pub use crate::action::{Action, require_bound};
pub use crate::canvas::Canvas;
pub use crate::color::{Color, RgbColor};
pub use crate::draw::Drawable;
pub use crate::draw::shape::{Shape, ShapeKind, ShapeStyle};
pub use crate::draw::svg::SvgOverlay;
pub use crate::engine::cpu::{CpuEngine, CpuEngineOpts, CpuPaint, CpuSurface};
pub use crate::engine::{Kernel, Layer, RasterEngine, RasterFlag};
