use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{
    ChartOptions, DEFAULT_HEIGHT, DEFAULT_WIDTH, LayoutOperation, LayoutRequest, LayoutResponse,
    RasterOptions,
};
use crate::core::{ChartData, ChartKind};
use crate::error::{ChartError, ChartResult};
use crate::render::RenderGateway;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// In-process gateway used by tests and headless runs.
///
/// It validates what it receives, answers with placeholder SVG whose root
/// carries the requested size, and counts every call so callers can assert
/// how often the renderer was reached.
#[derive(Debug, Default)]
pub struct NullGateway {
    render_calls: AtomicUsize,
    layout_calls: AtomicUsize,
    rasterize_calls: AtomicUsize,
}

impl NullGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn render_calls(&self) -> usize {
        self.render_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn layout_calls(&self) -> usize {
        self.layout_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn rasterize_calls(&self) -> usize {
        self.rasterize_calls.load(Ordering::SeqCst)
    }
}

impl RenderGateway for NullGateway {
    fn render(
        &self,
        kind: ChartKind,
        data: &ChartData,
        options: &ChartOptions,
    ) -> ChartResult<String> {
        if data.kind() != kind {
            return Err(ChartError::validation(format!(
                "render requested as {kind} but data is {}",
                data.kind()
            )));
        }
        data.validate()?;
        options.validate()?;
        self.render_calls.fetch_add(1, Ordering::SeqCst);

        let width = options.width.unwrap_or(DEFAULT_WIDTH);
        let height = options.height.unwrap_or(DEFAULT_HEIGHT);
        Ok(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" data-kind="{kind}" data-series="{}"></svg>"#,
            data.series_count()
        ))
    }

    fn layout(&self, request: &LayoutRequest<'_>) -> ChartResult<LayoutResponse> {
        self.layout_calls.fetch_add(1, Ordering::SeqCst);
        let first = request.first.dimensions();
        let second = request.second.dimensions();
        let combined = request.operation.combined_dimensions(first, second);
        let (dx, dy) = match request.operation {
            LayoutOperation::SideBySide => (first.width, 0),
            LayoutOperation::Vertical => (0, first.height),
            LayoutOperation::Stack => (0, 0),
        };
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}"><g>{}</g><g transform="translate({dx},{dy})">{}</g></svg>"#,
            combined.width, combined.height, request.first.svg, request.second.svg
        );
        Ok(LayoutResponse {
            svg,
            width: combined.width,
            height: combined.height,
        })
    }

    fn rasterize(&self, svg: &str, options: RasterOptions) -> ChartResult<Vec<u8>> {
        options.validate()?;
        if svg.trim().is_empty() {
            return Err(ChartError::RenderFailure("cannot rasterize empty svg".to_owned()));
        }
        self.rasterize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PNG_SIGNATURE.to_vec())
    }
}
