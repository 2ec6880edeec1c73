//! Actions described as data.
//!
//! An [`ActionSpec`] is a `{ "kind": ..., "params": {...} }` object, so pipelines can be stored
//! as JSON and rebuilt later with [`ActionChain::from_specs`].

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::action::chain::ActionChain;
use crate::action::convolution::ConvolutionAction;
use crate::action::resize::ResizeAction;
use crate::engine::RasterEngine;
use crate::foundation::core::Dimension;
use crate::foundation::error::{RasterError, RasterResult};

/// Serialized form of one action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Action kind, e.g. `"resize"` or `"gaussian_blur"`.
    pub kind: String,
    /// Kind-specific parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ActionSpec {
    /// Build the action this spec describes.
    pub fn build<E: RasterEngine + 'static>(&self) -> RasterResult<Box<dyn Action<E>>> {
        parse_action(&self.kind, &self.params)
    }
}

/// Build an action from its kind and JSON parameters.
///
/// Kinds are matched case-insensitively, and `-` and `_` are interchangeable.
///
/// - `convolution`: `matrix` (3x3, required), `offset` (default 0), `divisor` (default 1)
/// - `resize`: `width`, `height`
/// - presets: `identity`, `sharpen`, `edge_detect`, `emboss`, `gaussian_blur`, `mean_removal`
pub fn parse_action<E: RasterEngine + 'static>(
    kind: &str,
    params: &serde_json::Value,
) -> RasterResult<Box<dyn Action<E>>> {
    let kind = kind.trim().to_ascii_lowercase().replace('-', "_");
    if kind.is_empty() {
        return Err(RasterError::config("action kind must be non-empty"));
    }

    match kind.as_str() {
        "convolution" => {
            let Some(matrix) = params.get("matrix") else {
                return Err(RasterError::config("missing action param 'matrix'"));
            };
            let mut action = ConvolutionAction::identity();
            action.set_matrix_json(matrix)?;
            if let Some(offset) = opt_f32(params, "offset")? {
                action.set_offset(offset)?;
            }
            if let Some(divisor) = opt_f32(params, "divisor")? {
                action.set_divisor(divisor)?;
            }
            Ok(Box::new(action))
        }
        "resize" => {
            let width = get_u32(params, "width")?;
            let height = get_u32(params, "height")?;
            Ok(Box::new(ResizeAction::new(Dimension::new(width, height)?)))
        }
        "identity" => Ok(Box::new(ConvolutionAction::identity())),
        "sharpen" => Ok(Box::new(ConvolutionAction::sharpen())),
        "edge_detect" | "edgedetect" => Ok(Box::new(ConvolutionAction::edge_detect())),
        "emboss" => Ok(Box::new(ConvolutionAction::emboss())),
        "gaussian_blur" | "gaussianblur" | "blur" => {
            Ok(Box::new(ConvolutionAction::gaussian_blur()))
        }
        "mean_removal" | "meanremoval" => Ok(Box::new(ConvolutionAction::mean_removal())),
        _ => Err(RasterError::config(format!("unknown action kind '{kind}'"))),
    }
}

impl<E: RasterEngine + 'static> ActionChain<E> {
    /// Build a chain from specs, failing on the first invalid one.
    pub fn from_specs(specs: &[ActionSpec]) -> RasterResult<Self> {
        specs.iter().map(ActionSpec::build::<E>).collect()
    }
}

fn get_u32(obj: &serde_json::Value, key: &str) -> RasterResult<u32> {
    let Some(v) = obj.get(key) else {
        return Err(RasterError::config(format!("missing action param '{key}'")));
    };
    let Some(n) = v.as_u64() else {
        return Err(RasterError::config(format!(
            "action param '{key}' must be an unsigned integer"
        )));
    };
    u32::try_from(n)
        .map_err(|_| RasterError::config(format!("action param '{key}' is out of range")))
}

fn opt_f32(obj: &serde_json::Value, key: &str) -> RasterResult<Option<f32>> {
    let Some(v) = obj.get(key) else {
        return Ok(None);
    };
    let Some(n) = v.as_f64() else {
        return Err(RasterError::config(format!(
            "action param '{key}' must be a number"
        )));
    };
    Ok(Some(n as f32))
}

#[cfg(test)]
#[path = "../../tests/unit/action/parse.rs"]
mod tests;
