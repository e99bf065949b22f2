use serde::Serialize;

use crate::core::{BarDatum, ChartData, ChartKind, GraphData, HeatmapCell, HistogramBin, Series};

/// Point in the cross-kind representation used by composite charts.
///
/// Only `x`/`y` are always present; the optional fields carry whatever the
/// source kind had to say about the point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedPoint {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_end: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl UnifiedPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            size: None,
            label: None,
            bin_start: None,
            bin_end: None,
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UnifiedData {
    Points(Vec<UnifiedPoint>),
    /// Graphs have no x/y reading and travel unchanged.
    Graph(GraphData),
}

/// One render-type tagged series of a composite chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSeries {
    pub name: String,
    pub render_type: ChartKind,
    pub data: UnifiedData,
}

impl UnifiedSeries {
    #[must_use]
    pub fn points(&self) -> Option<&[UnifiedPoint]> {
        match &self.data {
            UnifiedData::Points(points) => Some(points),
            UnifiedData::Graph(_) => None,
        }
    }
}

/// Maps any chart payload into render-type tagged series.
///
/// Bars become one series indexed by ordinal position, line/scatter series
/// pass through with their tag, a histogram becomes one series of bin
/// midpoints, composite series are copied as they are.
#[must_use]
pub fn to_unified_series(data: &ChartData) -> Vec<UnifiedSeries> {
    match data {
        ChartData::Bar(bars) => vec![unify_bars(bars)],
        ChartData::Line(series) => unify_series(series, ChartKind::Line),
        ChartData::Scatter(series) => unify_series(series, ChartKind::Scatter),
        ChartData::Histogram(bins) => vec![unify_histogram(bins)],
        ChartData::Heatmap(cells) => vec![unify_heatmap(cells)],
        ChartData::Graph(graph) => vec![UnifiedSeries {
            name: String::new(),
            render_type: ChartKind::Graph,
            data: UnifiedData::Graph(graph.clone()),
        }],
        ChartData::Composite(series) => series.clone(),
    }
}

fn unify_bars(bars: &[BarDatum]) -> UnifiedSeries {
    let points = bars
        .iter()
        .enumerate()
        .map(|(index, bar)| UnifiedPoint {
            label: Some(bar.label.clone()),
            ..UnifiedPoint::new(index as f64, bar.value)
        })
        .collect();
    UnifiedSeries {
        name: String::new(),
        render_type: ChartKind::Bar,
        data: UnifiedData::Points(points),
    }
}

fn unify_series(series: &[Series], kind: ChartKind) -> Vec<UnifiedSeries> {
    series
        .iter()
        .map(|series| UnifiedSeries {
            name: series.name.clone(),
            render_type: kind,
            data: UnifiedData::Points(
                series
                    .data
                    .iter()
                    .map(|point| UnifiedPoint {
                        size: point.size,
                        label: point.label.clone(),
                        ..UnifiedPoint::new(point.x, point.y)
                    })
                    .collect(),
            ),
        })
        .collect()
}

fn unify_histogram(bins: &[HistogramBin]) -> UnifiedSeries {
    let points = bins
        .iter()
        .map(|bin| UnifiedPoint {
            bin_start: Some(bin.bin_start),
            bin_end: Some(bin.bin_end),
            ..UnifiedPoint::new(bin.midpoint(), bin.count as f64)
        })
        .collect();
    UnifiedSeries {
        name: String::new(),
        render_type: ChartKind::Histogram,
        data: UnifiedData::Points(points),
    }
}

fn unify_heatmap(cells: &[HeatmapCell]) -> UnifiedSeries {
    let points = cells
        .iter()
        .map(|cell| UnifiedPoint {
            label: cell.text.clone(),
            value: Some(cell.value),
            ..UnifiedPoint::new(f64::from(cell.x), f64::from(cell.y))
        })
        .collect();
    UnifiedSeries {
        name: String::new(),
        render_type: ChartKind::Heatmap,
        data: UnifiedData::Points(points),
    }
}
