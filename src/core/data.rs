use serde::Serialize;

use crate::core::{BarDatum, ChartKind, GraphData, HeatmapCell, HistogramBin, Series, UnifiedSeries};
use crate::error::{ChartError, ChartResult};

/// Kind-specific chart payload, serialized exactly as the renderer expects
/// its `data` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Bar(Vec<BarDatum>),
    Line(Vec<Series>),
    Scatter(Vec<Series>),
    Histogram(Vec<HistogramBin>),
    Heatmap(Vec<HeatmapCell>),
    Graph(GraphData),
    Composite(Vec<UnifiedSeries>),
}

impl ChartData {
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Bar(_) => ChartKind::Bar,
            ChartData::Line(_) => ChartKind::Line,
            ChartData::Scatter(_) => ChartKind::Scatter,
            ChartData::Histogram(_) => ChartKind::Histogram,
            ChartData::Heatmap(_) => ChartKind::Heatmap,
            ChartData::Graph(_) => ChartKind::Graph,
            ChartData::Composite(_) => ChartKind::Composite,
        }
    }

    /// Number of color-bearing series this payload contributes to an overlay.
    #[must_use]
    pub fn series_count(&self) -> usize {
        match self {
            ChartData::Line(series) | ChartData::Scatter(series) => series.len(),
            ChartData::Composite(series) => series.len(),
            ChartData::Bar(_)
            | ChartData::Histogram(_)
            | ChartData::Heatmap(_)
            | ChartData::Graph(_) => 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Bar(bars) => bars.is_empty(),
            ChartData::Line(series) | ChartData::Scatter(series) => series.is_empty(),
            ChartData::Histogram(bins) => bins.is_empty(),
            ChartData::Heatmap(cells) => cells.is_empty(),
            ChartData::Graph(graph) => graph.nodes().is_empty(),
            ChartData::Composite(series) => series.is_empty(),
        }
    }

    /// Rejects empty payloads and non-finite coordinates.
    pub fn validate(&self) -> ChartResult<()> {
        if self.is_empty() {
            return Err(ChartError::validation(format!(
                "{} chart data must not be empty",
                self.kind()
            )));
        }

        match self {
            ChartData::Bar(bars) => {
                ensure_finite(bars.iter().map(|bar| bar.value), "bar value")?;
            }
            ChartData::Line(series) | ChartData::Scatter(series) => {
                for series in series {
                    ensure_finite(
                        series.data.iter().flat_map(|point| {
                            [Some(point.x), Some(point.y), point.size].into_iter().flatten()
                        }),
                        "series coordinate",
                    )?;
                }
            }
            ChartData::Histogram(bins) => {
                if let Some(bin) = bins.iter().find(|bin| !(bin.bin_start < bin.bin_end)) {
                    return Err(ChartError::validation(format!(
                        "histogram bin start {} must be below bin end {}",
                        bin.bin_start, bin.bin_end
                    )));
                }
            }
            ChartData::Heatmap(cells) => {
                ensure_finite(cells.iter().map(|cell| cell.value), "heatmap value")?;
            }
            ChartData::Graph(_) | ChartData::Composite(_) => {}
        }
        Ok(())
    }
}

fn ensure_finite(values: impl IntoIterator<Item = f64>, what: &str) -> ChartResult<()> {
    if let Some(value) = values.into_iter().find(|value| !value.is_finite()) {
        return Err(ChartError::validation(format!("{what} must be finite, got {value}")));
    }
    Ok(())
}
