mod chart;
mod compose;
mod constructors;
mod context;
mod json_contract;
mod options;

pub use chart::{Chart, ChartState};
pub use compose::{merge_colors, merge_titles, overlay};
pub use constructors::{
    ArrayInput, DEFAULT_GRAPH_LAYOUT, FIXED_GRAPH_LAYOUT, bar, graph, graph_with_layout, heatmap,
    hist, line, scatter, scatter_sized,
};
pub use context::{ChartContext, MAX_CANVAS_PX, svg_root_dimensions};
pub use json_contract::{
    LayoutOperation, LayoutPanel, LayoutRequest, LayoutResponse, RasterOptions, RasterRequest,
    RasterResponse, RenderRequest,
};
pub use options::{
    ChartConfig, ChartOptions, DEFAULT_HEIGHT, DEFAULT_PALETTE, DEFAULT_WIDTH, LegendPosition,
    RECOGNIZED_OPTION_KEYS,
};
