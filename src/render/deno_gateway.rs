use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::api::{
    ChartOptions, LayoutRequest, LayoutResponse, RasterOptions, RasterRequest, RasterResponse,
    RenderRequest,
};
use crate::core::{ChartData, ChartKind};
use crate::error::{ChartError, ChartResult};
use crate::render::process::run_with_timeout;
use crate::render::{GatewayConfig, RenderGateway};

pub const LAYOUT_SCRIPT: &str = "ChartComposer.ts";
pub const RASTERIZE_SCRIPT: &str = "Rasterize.ts";

#[must_use]
pub const fn script_for_kind(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Bar => "BarChart.ts",
        ChartKind::Line => "LineChart.ts",
        ChartKind::Scatter => "ScatterChart.ts",
        ChartKind::Histogram => "HistogramChart.ts",
        ChartKind::Heatmap => "HeatmapChart.ts",
        ChartKind::Graph => "GraphChart.ts",
        ChartKind::Composite => "CompositeChart.ts",
    }
}

/// Gateway that runs one chart script per call in a script runtime
/// subprocess (Deno by default).
///
/// Chart scripts receive the render request as their last argument and print
/// the SVG on stdout; requests larger than
/// [`GatewayConfig::max_argv_payload`] are written to stdin instead, with no
/// argument. The layout and rasterize scripts always read their request from
/// stdin and print a JSON envelope.
#[derive(Debug, Clone)]
pub struct DenoGateway {
    config: GatewayConfig,
    scripts_dir: PathBuf,
}

impl DenoGateway {
    /// Probes the runtime and locates the scripts directory.
    pub fn new(config: GatewayConfig) -> ChartResult<Self> {
        config.validate()?;

        let mut probe = Command::new(&config.runtime);
        probe.args(&config.probe_args);
        let output = run_with_timeout(probe, None, config.probe_timeout, "runtime probe")
            .map_err(|e| match e {
                ChartError::RenderTimeout { .. } => ChartError::GatewayUnavailable(format!(
                    "runtime {} is not responding",
                    config.runtime.display()
                )),
                other => other,
            })?;
        if !output.status.success() {
            return Err(ChartError::GatewayUnavailable(format!(
                "runtime {} failed its availability probe ({})",
                config.runtime.display(),
                output.status
            )));
        }

        let scripts_dir = config.resolve_scripts_dir()?;
        // Commands run inside the scripts dir, so the script path must not be relative.
        let scripts_dir = std::path::absolute(&scripts_dir).map_err(|e| {
            ChartError::GatewayUnavailable(format!(
                "cannot resolve chart scripts directory {}: {e}",
                scripts_dir.display()
            ))
        })?;
        info!(
            runtime = %config.runtime.display(),
            version = output.stdout.lines().next().unwrap_or_default(),
            scripts_dir = %scripts_dir.display(),
            "chart gateway ready"
        );
        Ok(Self {
            config,
            scripts_dir,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    #[must_use]
    pub fn scripts_dir(&self) -> &std::path::Path {
        &self.scripts_dir
    }

    fn command(&self, script: &str) -> ChartResult<Command> {
        let script_path = self.scripts_dir.join(script);
        if !script_path.is_file() {
            return Err(ChartError::GatewayUnavailable(format!(
                "chart script not found: {}",
                script_path.display()
            )));
        }
        let mut command = Command::new(&self.config.runtime);
        command
            .args(&self.config.runtime_args)
            .arg(script_path)
            .current_dir(&self.scripts_dir);
        Ok(command)
    }
}

impl RenderGateway for DenoGateway {
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
        let script = script_for_kind(kind);
        let payload = RenderRequest { data, options }.to_json()?;
        let via_stdin = payload.len() > self.config.max_argv_payload;
        debug!(%kind, script, payload_bytes = payload.len(), via_stdin, "invoking chart script");

        let mut command = self.command(script)?;
        let stdin_payload = if via_stdin {
            Some(payload.into_bytes())
        } else {
            command.arg(payload);
            None
        };
        let operation = format!("chart script {script}");
        run_with_timeout(command, stdin_payload, self.config.timeout, &operation)?
            .into_stdout(&operation)
    }

    fn layout(&self, request: &LayoutRequest<'_>) -> ChartResult<LayoutResponse> {
        let payload = request.to_json()?;
        debug!(
            operation = request.operation.as_str(),
            payload_bytes = payload.len(),
            "invoking layout script"
        );
        let command = self.command(LAYOUT_SCRIPT)?;
        let stdout = run_with_timeout(
            command,
            Some(payload.into_bytes()),
            self.config.timeout,
            "chart layout",
        )?
        .into_stdout("chart layout")?;
        LayoutResponse::from_json_str(&stdout)
    }

    fn rasterize(&self, svg: &str, options: RasterOptions) -> ChartResult<Vec<u8>> {
        options.validate()?;
        let payload = RasterRequest { svg, options }.to_json()?;
        debug!(?options, svg_bytes = svg.len(), "invoking rasterize script");
        let command = self.command(RASTERIZE_SCRIPT)?;
        let stdout = run_with_timeout(
            command,
            Some(payload.into_bytes()),
            self.config.timeout,
            "rasterize",
        )?
        .into_stdout("rasterize")?;
        RasterResponse::from_json_str(&stdout)?.into_png_bytes()
    }
}
