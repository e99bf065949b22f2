//! Convenience constructors that normalize array-like input into charts.
//!
//! Every scalar goes through [`ScalarExtractable`] and must be finite; every
//! label goes through `Display`. Paired arrays of different lengths are
//! rejected with a validation error naming both arrays.

use std::fmt::Display;

use tracing::debug;

use crate::api::{Chart, ChartConfig};
use crate::core::primitives::ensure_same_length;
use crate::core::{
    BarDatum, BinSpec, ChartData, Edge, GraphData, Node, ScalarExtractable, Series, SeriesPoint,
    build_histogram, cells_from_matrix, finite_scalars,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{GraphLayoutEngine, apply_graph_layout};

/// Layout the renderer applies to graphs without precomputed coordinates.
pub const DEFAULT_GRAPH_LAYOUT: &str = "reverse";
/// Layout tag for graphs whose coordinates were computed up front.
pub const FIXED_GRAPH_LAYOUT: &str = "fixed";

/// One array or several parallel arrays, one per series.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayInput<T> {
    Flat(Vec<T>),
    Nested(Vec<Vec<T>>),
}

impl<T> ArrayInput<T> {
    #[must_use]
    pub fn nested(arrays: Vec<Vec<T>>) -> Self {
        ArrayInput::Nested(arrays)
    }

    #[must_use]
    pub fn is_multi_series(&self) -> bool {
        matches!(self, ArrayInput::Nested(_))
    }
}

impl<T> From<Vec<T>> for ArrayInput<T> {
    fn from(values: Vec<T>) -> Self {
        ArrayInput::Flat(values)
    }
}

impl<T: Clone> From<&[T]> for ArrayInput<T> {
    fn from(values: &[T]) -> Self {
        ArrayInput::Flat(values.to_vec())
    }
}

impl<T, const N: usize> From<[T; N]> for ArrayInput<T> {
    fn from(values: [T; N]) -> Self {
        ArrayInput::Flat(values.into())
    }
}

/// Bar chart with one bar per category, in input order.
pub fn bar<L, V>(categories: &[L], values: &[V], config: ChartConfig) -> ChartResult<Chart>
where
    L: Display,
    V: ScalarExtractable,
{
    ensure_same_length("categories", categories.len(), "values", values.len())?;
    ensure_non_empty("values", values.len())?;

    let values = finite_scalars(values, "values")?;
    let bars = categories
        .iter()
        .zip(values)
        .map(|(category, value)| BarDatum::new(category.to_string(), value))
        .collect::<Vec<_>>();
    debug!(bars = bars.len(), "normalized bar input");
    Chart::new(ChartData::Bar(bars), config.into_options()?)
}

/// Line chart.
///
/// Without `y`, `x` holds the y values and x becomes `0..n`. Nested input
/// yields one series per inner array; labels shorter than the series list
/// are padded with empty names.
pub fn line<T: ScalarExtractable>(
    x: impl Into<ArrayInput<T>>,
    y: Option<ArrayInput<T>>,
    labels: &[&str],
    config: ChartConfig,
) -> ChartResult<Chart> {
    let series = normalize_series(x.into(), y, labels)?;
    Chart::new(ChartData::Line(series), config.into_options()?)
}

/// Scatter chart over paired x/y input, flat or nested like [`line`].
pub fn scatter<T: ScalarExtractable>(
    x: impl Into<ArrayInput<T>>,
    y: impl Into<ArrayInput<T>>,
    labels: &[&str],
    config: ChartConfig,
) -> ChartResult<Chart> {
    let series = normalize_series(x.into(), Some(y.into()), labels)?;
    Chart::new(ChartData::Scatter(series), config.into_options()?)
}

/// Single-series scatter chart with a per-point size.
pub fn scatter_sized<T, S>(
    x: &[T],
    y: &[T],
    size: &[S],
    label: Option<&str>,
    config: ChartConfig,
) -> ChartResult<Chart>
where
    T: ScalarExtractable,
    S: ScalarExtractable,
{
    ensure_same_length("x", x.len(), "y", y.len())?;
    ensure_same_length("size", size.len(), "x", x.len())?;
    ensure_non_empty("x", x.len())?;

    let xs = finite_scalars(x, "x")?;
    let ys = finite_scalars(y, "y")?;
    let sizes = finite_scalars(size, "size")?;
    let points = xs
        .into_iter()
        .zip(ys)
        .zip(sizes)
        .map(|((x, y), size)| SeriesPoint::new(x, y).with_size(size))
        .collect();
    let series = Series::new(label.unwrap_or_default(), points);
    Chart::new(ChartData::Scatter(vec![series]), config.into_options()?)
}

/// Histogram of `values` binned per `bins`.
pub fn hist<T: ScalarExtractable>(
    values: &[T],
    bins: impl Into<BinSpec>,
    config: ChartConfig,
) -> ChartResult<Chart> {
    ensure_non_empty("values", values.len())?;
    let values = finite_scalars(values, "values")?;
    let bins = build_histogram(&values, &bins.into())?;
    debug!(values = values.len(), bins = bins.len(), "binned histogram input");
    Chart::new(ChartData::Histogram(bins), config.into_options()?)
}

/// Heatmap from a row-major matrix, with optional per-cell text.
pub fn heatmap<T: ScalarExtractable>(
    matrix: &[Vec<T>],
    text: Option<&[Vec<String>]>,
    config: ChartConfig,
) -> ChartResult<Chart> {
    let rows = matrix
        .iter()
        .enumerate()
        .map(|(row, values)| finite_scalars(values, &format!("matrix[{row}]")))
        .collect::<ChartResult<Vec<_>>>()?;
    let cells = cells_from_matrix(&rows, text)?;
    Chart::new(ChartData::Heatmap(cells), config.into_options()?)
}

/// Graph chart. Edge endpoints are checked against the node ids here, before
/// any renderer is involved.
pub fn graph(
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    layout: Option<&str>,
    config: ChartConfig,
) -> ChartResult<Chart> {
    let graph = GraphData::new(nodes, edges)?;
    let mut options = config.into_options()?;
    options.layout = Some(layout.unwrap_or(DEFAULT_GRAPH_LAYOUT).to_owned());
    Chart::new(ChartData::Graph(graph), options)
}

/// Graph chart whose node coordinates come from `engine`.
pub fn graph_with_layout(
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    engine: &dyn GraphLayoutEngine,
    config: ChartConfig,
) -> ChartResult<Chart> {
    let mut graph = GraphData::new(nodes, edges)?;
    let placed = apply_graph_layout(&mut graph, engine)?;
    debug!(placed, nodes = graph.nodes().len(), "applied graph layout");
    let mut options = config.into_options()?;
    options.layout = Some(FIXED_GRAPH_LAYOUT.to_owned());
    Chart::new(ChartData::Graph(graph), options)
}

fn normalize_series<T: ScalarExtractable>(
    x: ArrayInput<T>,
    y: Option<ArrayInput<T>>,
    labels: &[&str],
) -> ChartResult<Vec<Series>> {
    let pairs = match (x, y) {
        (ArrayInput::Flat(ys), None) => vec![(None, ys)],
        (ArrayInput::Nested(ys), None) => ys.into_iter().map(|ys| (None, ys)).collect(),
        (ArrayInput::Flat(xs), Some(ArrayInput::Flat(ys))) => vec![(Some(xs), ys)],
        (ArrayInput::Nested(xs), Some(ArrayInput::Nested(ys))) => {
            ensure_same_length("x series", xs.len(), "y series", ys.len())?;
            xs.into_iter().map(Some).zip(ys).collect()
        }
        (ArrayInput::Flat(_), Some(ArrayInput::Nested(_)))
        | (ArrayInput::Nested(_), Some(ArrayInput::Flat(_))) => {
            return Err(ChartError::validation(
                "`x` and `y` must both be single arrays or both be arrays of series",
            ));
        }
    };
    ensure_non_empty("series", pairs.len())?;

    let names = pad_labels(labels, pairs.len());
    let mut series = Vec::with_capacity(pairs.len());
    for (index, ((xs, ys), name)) in pairs.into_iter().zip(names).enumerate() {
        let y_name = format!("y[{index}]");
        ensure_non_empty(&y_name, ys.len())?;
        let ys = finite_scalars(&ys, &y_name)?;
        let xs = match xs {
            Some(xs) => {
                let x_name = format!("x[{index}]");
                ensure_same_length(&x_name, xs.len(), &y_name, ys.len())?;
                finite_scalars(&xs, &x_name)?
            }
            None => (0..ys.len()).map(|i| i as f64).collect(),
        };
        series.push(Series::from_xy(name, &xs, &ys));
    }
    debug!(series = series.len(), "normalized series input");
    Ok(series)
}

/// One name per series: given labels first, then empty names. Extra labels
/// are kept out of the chart but never rejected.
fn pad_labels(labels: &[&str], series_count: usize) -> Vec<String> {
    (0..series_count)
        .map(|index| labels.get(index).copied().unwrap_or_default().to_owned())
        .collect()
}

fn ensure_non_empty(name: &str, len: usize) -> ChartResult<()> {
    if len == 0 {
        return Err(ChartError::validation(format!("`{name}` must not be empty")));
    }
    Ok(())
}
