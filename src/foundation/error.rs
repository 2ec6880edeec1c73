/// Convenience result type used across rasterkit.
pub type RasterResult<T> = Result<T, RasterError>;

/// Top-level error taxonomy used by canvas, engine and action APIs.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// Invalid configuration handed to an action, drawable or engine option.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed convolution matrix.
    #[error("configuration error: {0}")]
    Kernel(#[from] KernelError),

    /// Width or height outside the accepted range.
    #[error("invalid dimension {width}x{height}")]
    InvalidDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The canvas holds no raster handle.
    #[error("canvas is empty")]
    EmptyCanvas,

    /// An argument is not acceptable for the target canvas (bad handle, region out of bounds).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A raster primitive failed (decode, copy, convolution, ...).
    #[error("canvas error: {0}")]
    Canvas(String),

    /// Encoding or writing the canvas failed.
    #[error("canvas output error: {0}")]
    Output(String),

    /// Releasing a bound handle failed.
    #[error("canvas destroy error: {0}")]
    Destroy(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a [`RasterError`].
///
/// Configuration errors can be retried with corrected input; engine errors usually cannot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration or argument, raised before any pixel is touched.
    Configuration,
    /// The operation needs a bound canvas.
    EmptyCanvas,
    /// The raster engine failed.
    Engine,
}

impl RasterError {
    /// Build a [`RasterError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`RasterError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`RasterError::Canvas`] value.
    pub fn canvas(msg: impl Into<String>) -> Self {
        Self::Canvas(msg.into())
    }

    /// Build a [`RasterError::Output`] value.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    /// Build a [`RasterError::Destroy`] value.
    pub fn destroy(msg: impl Into<String>) -> Self {
        Self::Destroy(msg.into())
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_)
            | Self::Kernel(_)
            | Self::InvalidDimension { .. }
            | Self::InvalidArgument(_) => ErrorKind::Configuration,
            Self::EmptyCanvas => ErrorKind::EmptyCanvas,
            Self::Canvas(_) | Self::Output(_) | Self::Destroy(_) | Self::Other(_) => {
                ErrorKind::Engine
            }
        }
    }
}

/// Reasons a convolution matrix is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// The matrix itself is a scalar or an object instead of a sequence of rows.
    #[error("the matrix is not a sequence of rows")]
    MatrixNotSequence,

    /// The matrix does not have exactly three rows.
    #[error("expected a 3x3 matrix but the given matrix has {found} row(s)")]
    RowCount {
        /// Number of rows found.
        found: usize,
    },

    /// A row is a scalar instead of a sequence.
    #[error("row {row} of the matrix is not a sequence")]
    RowNotSequence {
        /// Offending row index.
        row: usize,
    },

    /// A row does not have exactly three columns.
    #[error("row {row} of the matrix must hold 3 values but {found} were found")]
    ColumnCount {
        /// Offending row index.
        row: usize,
        /// Number of values found in that row.
        found: usize,
    },

    /// A value is NaN, infinite or not a number at all.
    #[error("value at row {row}, column {col} is not a finite number")]
    NonFinite {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
