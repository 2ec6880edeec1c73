use crate::action::{Action, require_bound};
use crate::canvas::Canvas;
use crate::engine::{Kernel, RasterEngine};
use crate::foundation::error::{RasterError, RasterResult};

/// Applies a 3x3 convolution kernel.
///
/// Each color channel becomes `clamp(sum(kernel * neighbourhood) / divisor + offset, 0, 255)`;
/// the pixel math itself is done by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvolutionAction {
    kernel: Kernel,
    offset: f32,
    divisor: f32,
}

impl ConvolutionAction {
    /// Build an action from matrix rows; fails unless the matrix is exactly 3x3.
    pub fn new<R: AsRef<[f32]>>(matrix: &[R], offset: f32, divisor: f32) -> RasterResult<Self> {
        let mut action = Self::from_kernel(Kernel::IDENTITY, 0.0, 1.0)?;
        action
            .set_offset(offset)?
            .set_divisor(divisor)?
            .set_matrix(matrix)?;
        Ok(action)
    }

    /// Build an action from an already validated kernel.
    pub fn from_kernel(kernel: Kernel, offset: f32, divisor: f32) -> RasterResult<Self> {
        check_divisor(divisor)?;
        check_offset(offset)?;
        Ok(Self {
            kernel,
            offset,
            divisor,
        })
    }

    /// Kernel that leaves pixels unchanged.
    pub fn identity() -> Self {
        Self {
            kernel: Kernel::IDENTITY,
            offset: 0.0,
            divisor: 1.0,
        }
    }

    /// Sharpen against the four direct neighbours.
    pub fn sharpen() -> Self {
        Self::preset([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]], 0.0, 1.0)
    }

    /// Laplacian edge detection, offset to mid-grey.
    pub fn edge_detect() -> Self {
        Self::preset([[-1.0, 0.0, -1.0], [0.0, 4.0, 0.0], [-1.0, 0.0, -1.0]], 127.0, 1.0)
    }

    /// Emboss towards the bottom-right, offset to mid-grey.
    pub fn emboss() -> Self {
        Self::preset([[1.5, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, -1.5]], 127.0, 1.0)
    }

    /// 3x3 Gaussian blur.
    pub fn gaussian_blur() -> Self {
        Self::preset([[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]], 0.0, 16.0)
    }

    /// Mean removal (sketchy sharpening).
    pub fn mean_removal() -> Self {
        Self::preset([[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]], 0.0, 1.0)
    }

    fn preset(rows: [[f32; 3]; 3], offset: f32, divisor: f32) -> Self {
        Self {
            kernel: Kernel::new(rows).unwrap_or_default(),
            offset,
            divisor,
        }
    }

    /// Replace the matrix. The current matrix is kept when validation fails.
    pub fn set_matrix<R: AsRef<[f32]>>(&mut self, matrix: &[R]) -> RasterResult<&mut Self> {
        self.kernel = Kernel::from_rows(matrix)?;
        Ok(self)
    }

    /// Replace the matrix from a JSON array of arrays.
    pub fn set_matrix_json(&mut self, matrix: &serde_json::Value) -> RasterResult<&mut Self> {
        self.kernel = Kernel::from_json(matrix)?;
        Ok(self)
    }

    /// Matrix rows in row/column order.
    pub fn matrix(&self) -> [[f32; 3]; 3] {
        *self.kernel.rows()
    }

    /// Kernel in use.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Set the value added to every channel after division.
    pub fn set_offset(&mut self, offset: f32) -> RasterResult<&mut Self> {
        check_offset(offset)?;
        self.offset = offset;
        Ok(self)
    }

    /// Color offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Set the divisor of the weighted sum.
    pub fn set_divisor(&mut self, divisor: f32) -> RasterResult<&mut Self> {
        check_divisor(divisor)?;
        self.divisor = divisor;
        Ok(self)
    }

    /// Divisor.
    pub fn divisor(&self) -> f32 {
        self.divisor
    }
}

impl<E: RasterEngine> Action<E> for ConvolutionAction {
    #[tracing::instrument(name = "convolution", skip_all, fields(divisor = self.divisor, offset = self.offset))]
    fn apply<'c>(&self, canvas: &'c mut Canvas<E>) -> RasterResult<&'c mut Canvas<E>> {
        require_bound(canvas)?;
        canvas.with_surface_mut(|engine, s| {
            engine.apply_convolution(s, &self.kernel, self.divisor, self.offset)
        })?;
        Ok(canvas)
    }
}

fn check_divisor(divisor: f32) -> RasterResult<()> {
    if divisor == 0.0 || !divisor.is_finite() {
        return Err(RasterError::config(format!(
            "convolution divisor must be finite and non-zero, got {divisor}"
        )));
    }
    Ok(())
}

fn check_offset(offset: f32) -> RasterResult<()> {
    if !offset.is_finite() {
        return Err(RasterError::config(format!(
            "convolution offset must be finite, got {offset}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/action/convolution.rs"]
mod tests;
