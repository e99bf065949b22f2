pub mod bar_series;
pub mod data;
pub mod graph;
pub mod heatmap;
pub mod histogram_series;
pub mod line_series;
pub mod primitives;
pub mod types;
pub mod unified;

pub use bar_series::BarDatum;
pub use data::ChartData;
pub use graph::{Edge, GraphData, LayoutBounds, Node, NodePosition, NodeShape};
pub use heatmap::{HeatmapCell, cells_from_matrix, heatmap_extent};
pub use histogram_series::{
    BinSpec, HistogramBin, build_histogram, count_into_bins, histogram_edges,
};
pub use line_series::{Series, SeriesPoint};
pub use primitives::{ScalarExtractable, finite_scalar, finite_scalars};
pub use types::{ChartKind, Dimensions, max_dimension};
pub use unified::{UnifiedData, UnifiedPoint, UnifiedSeries, to_unified_series};
