//! chart-bridge: chart specifications and composition in front of an
//! external SVG renderer.
//!
//! Array-like input is normalized into typed chart data, charts are
//! overlaid in-process, and rendering, side-by-side/vertical layout and PNG
//! rasterization are delegated to a [`render::RenderGateway`], by default a
//! script-runtime subprocess.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{Chart, ChartConfig, ChartContext, ChartOptions};
pub use error::{ChartError, ChartResult};
