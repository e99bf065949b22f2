mod config;
mod deno_gateway;
mod layout_engine;
mod null_gateway;
mod process;

pub use config::{
    DEFAULT_MAX_ARGV_PAYLOAD, GatewayConfig, REQUIRED_SCRIPTS, discover_scripts_dir,
};
pub use deno_gateway::{DenoGateway, LAYOUT_SCRIPT, RASTERIZE_SCRIPT, script_for_kind};
pub use layout_engine::{
    DotLayoutEngine, GraphLayoutEngine, apply_graph_layout, graph_to_dot, parse_dot_json,
};
pub use null_gateway::{NullGateway, PNG_SIGNATURE};

use crate::api::{ChartOptions, LayoutRequest, LayoutResponse, RasterOptions};
use crate::core::{ChartData, ChartKind};
use crate::error::ChartResult;

/// Boundary to the external SVG renderer.
///
/// Every argument is a self-contained value that serializes to JSON; no live
/// references cross the boundary. Calls block until the renderer answers or
/// the implementation's timeout elapses.
pub trait RenderGateway: Send + Sync {
    fn render(
        &self,
        kind: ChartKind,
        data: &ChartData,
        options: &ChartOptions,
    ) -> ChartResult<String>;

    /// Combines two rendered panels into one SVG.
    fn layout(&self, request: &LayoutRequest<'_>) -> ChartResult<LayoutResponse>;

    fn rasterize(&self, svg: &str, options: RasterOptions) -> ChartResult<Vec<u8>>;
}
