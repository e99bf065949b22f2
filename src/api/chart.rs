use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::api::{ChartOptions, RenderRequest};
use crate::core::{ChartData, ChartKind, Dimensions};
use crate::error::{ChartError, ChartResult};
use crate::render::RenderGateway;

/// Where a chart stands with respect to rendering and composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartState {
    /// Structured data, not rendered yet.
    Specified,
    /// Structured data plus a cached SVG.
    Rendered,
    /// Only an SVG and its size; the product of layout composition.
    Opaque,
}

/// Immutable chart specification with a write-once SVG cache.
///
/// The data and options never change after construction; composing charts
/// always allocates a new `Chart`.
#[derive(Debug, Clone)]
pub struct Chart {
    data: Option<ChartData>,
    options: ChartOptions,
    width: Option<u32>,
    height: Option<u32>,
    svg: OnceLock<String>,
}

impl Chart {
    /// Creates a specified chart; width/height are read from `options`.
    pub fn new(data: ChartData, options: ChartOptions) -> ChartResult<Self> {
        data.validate()?;
        options.validate()?;
        Ok(Self {
            width: options.width,
            height: options.height,
            data: Some(data),
            options,
            svg: OnceLock::new(),
        })
    }

    /// Wraps already-rendered output that carries no structured data.
    pub fn from_svg(svg: impl Into<String>, dimensions: Dimensions) -> ChartResult<Self> {
        let svg = svg.into();
        if svg.trim().is_empty() {
            return Err(ChartError::validation("svg must not be empty"));
        }
        let dimensions = Dimensions::new(dimensions.width, dimensions.height)?;
        Ok(Self {
            data: None,
            options: ChartOptions::default(),
            width: Some(dimensions.width),
            height: Some(dimensions.height),
            svg: OnceLock::from(svg),
        })
    }

    #[must_use]
    pub fn kind(&self) -> Option<ChartKind> {
        self.data.as_ref().map(ChartData::kind)
    }

    #[must_use]
    pub fn data(&self) -> Option<&ChartData> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.options.title()
    }

    #[must_use]
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Declared size, when both sides are set.
    #[must_use]
    pub fn dimensions(&self) -> Option<Dimensions> {
        Some(Dimensions {
            width: self.width?,
            height: self.height?,
        })
    }

    #[must_use]
    pub fn state(&self) -> ChartState {
        match (&self.data, self.svg.get()) {
            (None, _) => ChartState::Opaque,
            (Some(_), None) => ChartState::Specified,
            (Some(_), Some(_)) => ChartState::Rendered,
        }
    }

    /// Cached SVG without triggering a render.
    #[must_use]
    pub fn rendered_svg(&self) -> Option<&str> {
        self.svg.get().map(String::as_str)
    }

    /// Gateway payload for this chart; opaque charts have none.
    pub fn render_request(&self) -> ChartResult<RenderRequest<'_>> {
        let data = self.data.as_ref().ok_or_else(|| {
            ChartError::validation("cannot build a render request: chart has no data")
        })?;
        Ok(RenderRequest {
            data,
            options: &self.options,
        })
    }

    /// Returns the SVG, rendering through `gateway` on first access only.
    pub fn svg(&self, gateway: &dyn RenderGateway) -> ChartResult<&str> {
        if let Some(svg) = self.svg.get() {
            trace!(kind = ?self.kind(), "svg cache hit");
            return Ok(svg);
        }

        let data = self.data.as_ref().ok_or_else(|| {
            ChartError::validation("cannot render: chart has neither data nor svg")
        })?;
        debug!(kind = %data.kind(), series = data.series_count(), "rendering chart");
        let svg = gateway.render(data.kind(), data, &self.options)?;
        Ok(self.svg.get_or_init(|| svg).as_str())
    }

    pub(crate) fn from_parts(
        data: ChartData,
        options: ChartOptions,
        width: Option<u32>,
        height: Option<u32>,
    ) -> ChartResult<Self> {
        data.validate()?;
        Ok(Self {
            data: Some(data),
            options,
            width,
            height,
            svg: OnceLock::new(),
        })
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side =
            |value: Option<u32>| value.map_or_else(|| "auto".to_owned(), |v| v.to_string());
        write!(f, "<Chart {}x{}>", side(self.width), side(self.height))
    }
}
