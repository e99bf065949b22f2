use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::api::ChartOptions;
use crate::core::{ChartData, Dimensions};
use crate::error::{ChartError, ChartResult};

/// `{"data": ..., "options": ...}` payload consumed by every chart script.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenderRequest<'a> {
    pub data: &'a ChartData,
    pub options: &'a ChartOptions,
}

impl RenderRequest<'_> {
    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ChartError::validation(format!("failed to serialize render request: {e}"))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutOperation {
    /// Second chart to the right of the first.
    SideBySide,
    /// Second chart below the first.
    Vertical,
    /// Second chart layered on top of the first, sharing the canvas.
    Stack,
}

impl LayoutOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LayoutOperation::SideBySide => "sideBySide",
            LayoutOperation::Vertical => "vertical",
            LayoutOperation::Stack => "stack",
        }
    }

    /// Combined canvas size for two panels under this operation.
    #[must_use]
    pub fn combined_dimensions(self, first: Dimensions, second: Dimensions) -> Dimensions {
        match self {
            LayoutOperation::SideBySide => Dimensions {
                width: first.width.saturating_add(second.width),
                height: first.height.max(second.height),
            },
            LayoutOperation::Vertical => Dimensions {
                width: first.width.max(second.width),
                height: first.height.saturating_add(second.height),
            },
            LayoutOperation::Stack => Dimensions {
                width: first.width.max(second.width),
                height: first.height.max(second.height),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutPanel<'a> {
    pub svg: &'a str,
    pub width: u32,
    pub height: u32,
}

impl<'a> LayoutPanel<'a> {
    #[must_use]
    pub fn new(svg: &'a str, dimensions: Dimensions) -> Self {
        Self {
            svg,
            width: dimensions.width,
            height: dimensions.height,
        }
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutRequest<'a> {
    pub operation: LayoutOperation,
    pub first: LayoutPanel<'a>,
    pub second: LayoutPanel<'a>,
}

impl LayoutRequest<'_> {
    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ChartError::validation(format!("failed to serialize layout request: {e}"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayoutResponse {
    pub svg: String,
    pub width: u32,
    pub height: u32,
}

impl LayoutResponse {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let response: Self = serde_json::from_str(input.trim()).map_err(|e| {
            ChartError::RenderFailure(format!("malformed layout response: {e}"))
        })?;
        if response.svg.trim().is_empty() {
            return Err(ChartError::RenderFailure(
                "layout response carried an empty svg".to_owned(),
            ));
        }
        Ok(response)
    }

    pub fn dimensions(&self) -> ChartResult<Dimensions> {
        Dimensions::new(self.width, self.height).map_err(|_| {
            ChartError::RenderFailure(format!(
                "layout response has non-positive size {}x{}",
                self.width, self.height
            ))
        })
    }
}

/// PNG resolution, either as a multiplier of the SVG size or as DPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterOptions {
    Scale(f64),
    Dpi(f64),
}

impl Default for RasterOptions {
    fn default() -> Self {
        RasterOptions::Scale(1.0)
    }
}

impl RasterOptions {
    /// CSS reference resolution; `Dpi(96.0)` equals `Scale(1.0)`.
    pub const REFERENCE_DPI: f64 = 96.0;

    /// Builds options from two optional knobs; setting both is ambiguous.
    pub fn from_parts(scale: Option<f64>, dpi: Option<f64>) -> ChartResult<Self> {
        let options = match (scale, dpi) {
            (Some(_), Some(_)) => {
                return Err(ChartError::validation(
                    "specify either `scale` or `dpi` for rasterization, not both",
                ));
            }
            (Some(scale), None) => RasterOptions::Scale(scale),
            (None, Some(dpi)) => RasterOptions::Dpi(dpi),
            (None, None) => RasterOptions::default(),
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(self) -> ChartResult<()> {
        let (name, value) = match self {
            RasterOptions::Scale(value) => ("scale", value),
            RasterOptions::Dpi(value) => ("dpi", value),
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(ChartError::validation(format!(
                "rasterization `{name}` must be finite and > 0"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn effective_scale(self) -> f64 {
        match self {
            RasterOptions::Scale(scale) => scale,
            RasterOptions::Dpi(dpi) => dpi / Self::REFERENCE_DPI,
        }
    }
}

/// `{"svg": ..., "scale"|"dpi": ...}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RasterRequest<'a> {
    pub svg: &'a str,
    #[serde(flatten)]
    pub options: RasterOptions,
}

impl RasterRequest<'_> {
    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ChartError::validation(format!("failed to serialize raster request: {e}"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RasterResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RasterResponse {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input.trim())
            .map_err(|e| ChartError::RenderFailure(format!("malformed raster response: {e}")))
    }

    /// Decodes the base64 PNG or surfaces the rasterizer's own error.
    pub fn into_png_bytes(self) -> ChartResult<Vec<u8>> {
        if !self.success {
            return Err(ChartError::RenderFailure(format!(
                "rasterization failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            )));
        }
        let encoded = self.data.ok_or_else(|| {
            ChartError::RenderFailure("raster response reported success without data".to_owned())
        })?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| ChartError::RenderFailure(format!("raster data is not valid base64: {e}")))
    }
}
