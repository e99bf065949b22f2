use serde::{Deserialize, Serialize};

/// One sample of a line or scatter series.
///
/// `size` drives per-point radius in scatter plots; `label` is rendered as a
/// point annotation. Both are omitted from the payload when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SeriesPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            size: None,
            label: None,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Named x/y series shared by line and scatter charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<SeriesPoint>,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<SeriesPoint>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Builds a series from already-validated parallel coordinate arrays.
    #[must_use]
    pub fn from_xy(name: impl Into<String>, xs: &[f64], ys: &[f64]) -> Self {
        let data = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| SeriesPoint::new(x, y))
            .collect();
        Self::new(name, data)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
