use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ChartError, ChartResult};

pub const ENV_RUNTIME: &str = "CHART_BRIDGE_RUNTIME";
pub const ENV_SCRIPTS_DIR: &str = "CHART_BRIDGE_SCRIPTS_DIR";
pub const ENV_TIMEOUT_MS: &str = "CHART_BRIDGE_TIMEOUT_MS";

/// Render payloads above this size go over stdin instead of argv; Linux caps
/// a single argument at 128 KiB.
pub const DEFAULT_MAX_ARGV_PAYLOAD: usize = 64 * 1024;

/// Scripts a directory must hold to be accepted as the chart scripts dir.
pub const REQUIRED_SCRIPTS: [&str; 4] = [
    "BarChart.ts",
    "LineChart.ts",
    "ScatterChart.ts",
    "GraphChart.ts",
];

/// How the subprocess gateway finds and runs its renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Script runtime executable.
    pub runtime: PathBuf,
    /// Arguments placed before the script path on every call.
    pub runtime_args: Vec<String>,
    /// Arguments for the availability probe run at construction.
    pub probe_args: Vec<String>,
    /// Directory holding the chart scripts; discovered when unset.
    pub scripts_dir: Option<PathBuf>,
    pub timeout: Duration,
    pub probe_timeout: Duration,
    /// Largest render payload passed as an argument, in bytes.
    pub max_argv_payload: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            runtime: PathBuf::from("deno"),
            runtime_args: vec!["run".to_owned(), "--allow-all".to_owned()],
            probe_args: vec!["--version".to_owned()],
            scripts_dir: None,
            timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
            max_argv_payload: DEFAULT_MAX_ARGV_PAYLOAD,
        }
    }
}

impl GatewayConfig {
    /// Defaults overridden by `CHART_BRIDGE_RUNTIME`, `CHART_BRIDGE_SCRIPTS_DIR`
    /// and `CHART_BRIDGE_TIMEOUT_MS`.
    pub fn from_env() -> ChartResult<Self> {
        let mut config = Self::default();
        if let Some(runtime) = env::var_os(ENV_RUNTIME).filter(|value| !value.is_empty()) {
            config.runtime = PathBuf::from(runtime);
        }
        if let Some(dir) = env::var_os(ENV_SCRIPTS_DIR).filter(|value| !value.is_empty()) {
            config.scripts_dir = Some(PathBuf::from(dir));
        }
        if let Ok(raw) = env::var(ENV_TIMEOUT_MS) {
            config.timeout = parse_timeout_ms(&raw)?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_runtime(mut self, runtime: impl Into<PathBuf>) -> Self {
        self.runtime = runtime.into();
        self
    }

    #[must_use]
    pub fn with_runtime_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runtime_args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_probe_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.probe_args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_scripts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_argv_payload(mut self, bytes: usize) -> Self {
        self.max_argv_payload = bytes;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.runtime.as_os_str().is_empty() {
            return Err(ChartError::validation("gateway runtime path must not be empty"));
        }
        if self.timeout.is_zero() || self.probe_timeout.is_zero() {
            return Err(ChartError::validation("gateway timeouts must be > 0"));
        }
        Ok(())
    }

    /// The configured scripts dir, or one discovered from the working dir.
    pub fn resolve_scripts_dir(&self) -> ChartResult<PathBuf> {
        if let Some(dir) = &self.scripts_dir {
            if !dir.is_dir() {
                return Err(ChartError::GatewayUnavailable(format!(
                    "chart scripts directory {} does not exist",
                    dir.display()
                )));
            }
            if let Some(missing) = REQUIRED_SCRIPTS
                .iter()
                .find(|script| !dir.join(script).is_file())
            {
                return Err(ChartError::GatewayUnavailable(format!(
                    "chart script {missing} not found in {}",
                    dir.display()
                )));
            }
            return Ok(dir.clone());
        }

        let cwd = env::current_dir().map_err(|e| {
            ChartError::GatewayUnavailable(format!("cannot read working directory: {e}"))
        })?;
        discover_scripts_dir(&cwd).ok_or_else(|| {
            ChartError::GatewayUnavailable(format!(
                "chart scripts not found from {}; set {ENV_SCRIPTS_DIR}",
                cwd.display()
            ))
        })
    }
}

/// Looks for the chart scripts starting at `start`.
///
/// Checked in order: `start` and `start/charts`; then `src/viz` and
/// `src/viz/charts` under the nearest ancestor holding `environment.yml`;
/// finally `src/viz` and `src/viz/charts` next to `start`.
#[must_use]
pub fn discover_scripts_dir(start: &Path) -> Option<PathBuf> {
    if let Some(dir) = first_with_scripts(start) {
        return Some(dir);
    }

    if let Some(root) = start
        .ancestors()
        .find(|dir| dir.join("environment.yml").is_file())
    {
        if let Some(dir) = first_with_scripts(&root.join("src").join("viz")) {
            return Some(dir);
        }
    }

    let sibling = start.parent()?.join("src").join("viz");
    first_with_scripts(&sibling)
}

fn first_with_scripts(dir: &Path) -> Option<PathBuf> {
    [dir.to_path_buf(), dir.join("charts")]
        .into_iter()
        .find(|candidate| has_required_scripts(candidate))
}

fn has_required_scripts(dir: &Path) -> bool {
    REQUIRED_SCRIPTS
        .iter()
        .all(|script| dir.join(script).is_file())
}

fn parse_timeout_ms(raw: &str) -> ChartResult<Duration> {
    let millis = raw.trim().parse::<u64>().map_err(|e| {
        ChartError::validation(format!("{ENV_TIMEOUT_MS} must be an integer: {e}"))
    })?;
    if millis == 0 {
        return Err(ChartError::validation(format!("{ENV_TIMEOUT_MS} must be > 0")));
    }
    Ok(Duration::from_millis(millis))
}
