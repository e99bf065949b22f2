use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// Fallback colors handed out to series without an explicit color.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

/// Wire names of the typed option fields; `extra` must not repeat them.
pub const RECOGNIZED_OPTION_KEYS: [&str; 10] = [
    "title", "xLabel", "yLabel", "width", "height", "xTicks", "yTicks", "legend", "colors",
    "layout",
];

pub const DEFAULT_WIDTH: u32 = 320;
pub const DEFAULT_HEIGHT: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Hidden,
}

/// Rendering hints forwarded to the gateway as the `options` object.
///
/// Recognized keys are typed fields; anything else goes into `extra` and is
/// passed through to the renderer without validation. A recognized key in
/// `extra` fails [`ChartOptions::validate`], since it would shadow the typed
/// field in the payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_ticks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_ticks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ChartOptions {
    /// Title, treating an empty string as absent.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !title.is_empty())
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("xTicks", self.x_ticks),
            ("yTicks", self.y_ticks),
        ] {
            if value == Some(0) {
                return Err(ChartError::validation(format!(
                    "chart option `{name}` must be > 0"
                )));
            }
        }
        if let Some(key) = self
            .extra
            .keys()
            .find(|key| RECOGNIZED_OPTION_KEYS.contains(&key.as_str()))
        {
            return Err(ChartError::validation(format!(
                "chart option `{key}` has a typed setter and cannot be passed as an extra option"
            )));
        }
        if let Some(colors) = &self.colors {
            if colors.iter().any(|color| color.trim().is_empty()) {
                return Err(ChartError::validation("chart colors must not be blank"));
            }
        }
        Ok(())
    }
}

/// Caller-facing configuration for the convenience constructors.
///
/// Defaults to a 320x240 chart; `auto_size` leaves sizing to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub options: ChartOptions,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: Some(DEFAULT_WIDTH),
            height: Some(DEFAULT_HEIGHT),
            options: ChartOptions::default(),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.options.x_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.options.y_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn auto_size(mut self) -> Self {
        self.width = None;
        self.height = None;
        self
    }

    #[must_use]
    pub fn with_ticks(mut self, x_ticks: u32, y_ticks: u32) -> Self {
        self.options.x_ticks = Some(x_ticks);
        self.options.y_ticks = Some(y_ticks);
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: LegendPosition) -> Self {
        self.options.legend = Some(legend);
        self
    }

    #[must_use]
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.with_colors(colors);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options = self.options.with_extra(key, value);
        self
    }

    /// Produces the options object, with width/height written in when set.
    pub fn into_options(self) -> ChartResult<ChartOptions> {
        let mut options = self.options;
        options.width = self.width;
        options.height = self.height;
        options.validate()?;
        Ok(options)
    }
}
