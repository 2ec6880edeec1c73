use crate::foundation::error::KernelError;

/// A 3x3 convolution matrix. Row index is the vertical offset, column index the horizontal one.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Kernel([[f32; 3]; 3]);

impl Kernel {
    /// Leaves every pixel unchanged.
    pub const IDENTITY: Self = Self([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);

    /// Build a kernel from a fixed-size matrix; every value must be finite.
    pub fn new(rows: [[f32; 3]; 3]) -> Result<Self, KernelError> {
        for (row, values) in rows.iter().enumerate() {
            for (col, v) in values.iter().enumerate() {
                if !v.is_finite() {
                    return Err(KernelError::NonFinite { row, col });
                }
            }
        }
        Ok(Self(rows))
    }

    /// Build a kernel from variable-length rows, checking the row count first and then each
    /// row's column count in order.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, KernelError> {
        if rows.len() != 3 {
            return Err(KernelError::RowCount { found: rows.len() });
        }
        let mut out = [[0.0f32; 3]; 3];
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != 3 {
                return Err(KernelError::ColumnCount {
                    row,
                    found: values.len(),
                });
            }
            out[row].copy_from_slice(values);
        }
        Self::new(out)
    }

    /// Build a kernel from a JSON array of arrays of numbers.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, KernelError> {
        let rows = match value.as_array() {
            Some(rows) => rows,
            None => return Err(KernelError::MatrixNotSequence),
        };
        if rows.len() != 3 {
            return Err(KernelError::RowCount { found: rows.len() });
        }

        let mut out = [[0.0f32; 3]; 3];
        for (row, item) in rows.iter().enumerate() {
            let values = item
                .as_array()
                .ok_or(KernelError::RowNotSequence { row })?;
            if values.len() != 3 {
                return Err(KernelError::ColumnCount {
                    row,
                    found: values.len(),
                });
            }
            for (col, v) in values.iter().enumerate() {
                out[row][col] = v
                    .as_f64()
                    .ok_or(KernelError::NonFinite { row, col })? as f32;
            }
        }
        Self::new(out)
    }

    /// Matrix rows.
    pub fn rows(&self) -> &[[f32; 3]; 3] {
        &self.0
    }

    /// Sum of all weights (the usual divisor for normalized kernels).
    pub fn sum(&self) -> f32 {
        self.0.iter().flatten().sum()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/kernel.rs"]
mod tests;
