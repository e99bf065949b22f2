use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::{Chart, LayoutOperation, LayoutPanel, LayoutRequest, RasterOptions};
use crate::core::Dimensions;
use crate::error::{ChartError, ChartResult};
use crate::render::{DenoGateway, GatewayConfig, RenderGateway};

/// Largest PNG side the rasterizer accepts, in pixels.
pub const MAX_CANVAS_PX: u32 = 16_384;

/// Entry point holding the one rendering gateway an application uses.
///
/// Construct it once (probing the external renderer is not free) and pass it
/// to wherever charts are rendered, laid out or exported. Cloning shares the
/// same gateway.
#[derive(Clone)]
pub struct ChartContext {
    gateway: Arc<dyn RenderGateway>,
}

impl fmt::Debug for ChartContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartContext").finish_non_exhaustive()
    }
}

impl ChartContext {
    #[must_use]
    pub fn new<G: RenderGateway + 'static>(gateway: G) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    #[must_use]
    pub fn with_shared_gateway(gateway: Arc<dyn RenderGateway>) -> Self {
        Self { gateway }
    }

    /// Probes the subprocess renderer configured through the environment.
    pub fn from_env() -> ChartResult<Self> {
        let config = GatewayConfig::from_env()?;
        Ok(Self::new(DenoGateway::new(config)?))
    }

    #[must_use]
    pub fn gateway(&self) -> &dyn RenderGateway {
        self.gateway.as_ref()
    }

    /// Rendered SVG of `chart`, rendering it on first access.
    pub fn svg<'c>(&self, chart: &'c Chart) -> ChartResult<&'c str> {
        chart.svg(self.gateway())
    }

    /// Places `second` to the right of `first`.
    pub fn side_by_side(&self, first: &Chart, second: &Chart) -> ChartResult<Chart> {
        self.compose_layout(LayoutOperation::SideBySide, first, second)
    }

    /// Places `second` below `first`.
    pub fn vertical(&self, first: &Chart, second: &Chart) -> ChartResult<Chart> {
        self.compose_layout(LayoutOperation::Vertical, first, second)
    }

    /// Layers the rendered `second` over the rendered `first`. Unlike
    /// [`crate::api::overlay`] no scales are shared; this works on any pair
    /// of charts, including rendered-only ones.
    pub fn stack(&self, first: &Chart, second: &Chart) -> ChartResult<Chart> {
        self.compose_layout(LayoutOperation::Stack, first, second)
    }

    fn compose_layout(
        &self,
        operation: LayoutOperation,
        first: &Chart,
        second: &Chart,
    ) -> ChartResult<Chart> {
        let first_svg = first.svg(self.gateway())?;
        let second_svg = second.svg(self.gateway())?;
        let request = LayoutRequest {
            operation,
            first: LayoutPanel::new(first_svg, panel_dimensions(first, first_svg)?),
            second: LayoutPanel::new(second_svg, panel_dimensions(second, second_svg)?),
        };

        let response = self.gateway.layout(&request)?;
        let dimensions = response.dimensions()?;
        debug!(
            operation = operation.as_str(),
            width = dimensions.width,
            height = dimensions.height,
            "composed chart layout"
        );
        Chart::from_svg(response.svg, dimensions)
    }

    /// Rasterizes the chart's SVG into PNG bytes.
    pub fn png(&self, chart: &Chart, options: RasterOptions) -> ChartResult<Vec<u8>> {
        options.validate()?;
        let svg = chart.svg(self.gateway())?;
        match chart.dimensions().or_else(|| svg_root_dimensions(svg)) {
            Some(dimensions) => ensure_canvas_fits(dimensions, options)?,
            None => warn!("chart size unknown; skipping canvas size check before rasterizing"),
        }
        self.gateway.rasterize(svg, options)
    }

    /// Writes the chart to `path`, choosing the format from the extension.
    pub fn save(&self, chart: &Chart, path: impl AsRef<Path>) -> ChartResult<()> {
        self.save_with(chart, path, RasterOptions::default())
    }

    /// `.svg` writes the markup verbatim; `.png` rasterizes with `raster`.
    pub fn save_with(
        &self,
        chart: &Chart,
        path: impl AsRef<Path>,
        raster: RasterOptions,
    ) -> ChartResult<()> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("svg") => {
                let svg = chart.svg(self.gateway())?;
                write_file(path, svg.as_bytes())
            }
            Some("png") => {
                let bytes = self.png(chart, raster)?;
                write_file(path, &bytes)
            }
            Some(other) => Err(ChartError::Export(format!(
                "unsupported file extension '.{other}' for {}; use .svg or .png",
                path.display()
            ))),
            None => Err(ChartError::Export(format!(
                "{} has no file extension; use .svg or .png",
                path.display()
            ))),
        }
    }
}

/// Reads `width`/`height` from the root `<svg>` tag, ignoring unit suffixes.
#[must_use]
pub fn svg_root_dimensions(svg: &str) -> Option<Dimensions> {
    let start = svg.find("<svg")?;
    let tag_end = start + svg[start..].find('>')?;
    let tag = &svg[start..tag_end];
    let width = svg_attribute_px(tag, "width")?;
    let height = svg_attribute_px(tag, "height")?;
    Dimensions::new(width, height).ok()
}

fn svg_attribute_px(tag: &str, name: &str) -> Option<u32> {
    let needle = format!("{name}=");
    let (offset, _) = tag.match_indices(&needle).find(|(offset, _)| {
        tag[..*offset]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace)
    })?;
    let rest = &tag[offset + needle.len()..];
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let value = &value[..value.find(quote)?];
    let numeric_len = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let parsed: f64 = value[..numeric_len].parse().ok()?;
    if !parsed.is_finite() || parsed <= 0.0 || parsed > f64::from(u32::MAX) {
        return None;
    }
    Some(parsed.ceil() as u32)
}

fn panel_dimensions(chart: &Chart, svg: &str) -> ChartResult<Dimensions> {
    chart
        .dimensions()
        .or_else(|| svg_root_dimensions(svg))
        .ok_or_else(|| {
            ChartError::composition(
                "layout composition needs chart dimensions; set width/height or render an svg with a sized root",
            )
        })
}

fn ensure_canvas_fits(dimensions: Dimensions, options: RasterOptions) -> ChartResult<()> {
    let scale = options.effective_scale();
    let width = (f64::from(dimensions.width) * scale).ceil();
    let height = (f64::from(dimensions.height) * scale).ceil();
    let limit = f64::from(MAX_CANVAS_PX);
    if width > limit || height > limit {
        return Err(ChartError::Export(format!(
            "PNG canvas {width}x{height} exceeds the {MAX_CANVAS_PX}px limit; \
             use a smaller scale/dpi or export as .svg instead"
        )));
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> ChartResult<()> {
    fs::write(path, contents).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote chart export");
    Ok(())
}
