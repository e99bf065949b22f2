use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ChartError, ChartResult};

/// Counted histogram bin spanning `[bin_start, bin_end)`; the last bin of a
/// histogram is closed on the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub bin_start: f64,
    pub bin_end: f64,
    pub count: u64,
}

impl HistogramBin {
    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.bin_start + self.bin_end) * 0.5
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.bin_end - self.bin_start
    }
}

/// How histogram edges are chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec {
    /// Equal-width bins from the minimum to the maximum value.
    Count(usize),
    /// Explicit, strictly increasing edges; `edges.len() - 1` bins.
    Edges(Vec<f64>),
}

impl Default for BinSpec {
    fn default() -> Self {
        BinSpec::Count(20)
    }
}

impl From<usize> for BinSpec {
    fn from(count: usize) -> Self {
        BinSpec::Count(count)
    }
}

impl From<Vec<f64>> for BinSpec {
    fn from(edges: Vec<f64>) -> Self {
        BinSpec::Edges(edges)
    }
}

impl From<&[f64]> for BinSpec {
    fn from(edges: &[f64]) -> Self {
        BinSpec::Edges(edges.to_vec())
    }
}

/// Resolves bin edges for `values`.
///
/// With a bin count the edges run linearly from min to max (the last edge is
/// pinned to the exact maximum). Edges that round onto their neighbor in f64
/// are skipped, so a narrow range at large magnitude gets fewer bins than
/// requested. When every value is equal a single bin of width 1.0 centered
/// on the value is produced regardless of the count.
pub fn histogram_edges(values: &[f64], bins: &BinSpec) -> ChartResult<Vec<f64>> {
    match bins {
        BinSpec::Count(0) => Err(ChartError::validation(
            "histogram bin count must be >= 1",
        )),
        BinSpec::Count(count) => {
            let (min, max) = value_range(values)?;
            if min == max {
                return Ok(vec![min - 0.5, max + 0.5]);
            }

            let count = *count;
            let width = (max - min) / count as f64;
            let mut edges: Vec<f64> = Vec::with_capacity(count + 1);
            for i in 0..count {
                let edge = min + i as f64 * width;
                if edges.last().is_none_or(|last| edge > *last) {
                    edges.push(edge);
                }
            }
            while edges.last().is_some_and(|last| *last >= max) {
                edges.pop();
            }
            edges.push(max);
            if edges.len() - 1 < count {
                debug!(
                    requested = count,
                    bins = edges.len() - 1,
                    "histogram edges collapsed in f64; using fewer bins"
                );
            }
            Ok(edges)
        }
        BinSpec::Edges(edges) => {
            if edges.len() < 2 {
                return Err(ChartError::validation(format!(
                    "histogram needs at least 2 bin edges, got {}",
                    edges.len()
                )));
            }
            if edges.iter().any(|edge| !edge.is_finite()) {
                return Err(ChartError::validation("histogram bin edges must be finite"));
            }
            ensure_strictly_increasing(edges)?;
            Ok(edges.clone())
        }
    }
}

/// Counts `values` into the bins described by `edges`.
///
/// Each value lands in the first bin whose range contains it. Values outside
/// `[edges[0], edges[last]]` are dropped without being counted.
#[must_use]
pub fn count_into_bins(values: &[f64], edges: &[f64]) -> Vec<HistogramBin> {
    if edges.len() < 2 {
        return Vec::new();
    }

    let bin_count = edges.len() - 1;
    let first = edges[0];
    let last = edges[bin_count];
    let mut counts = vec![0_u64; bin_count];
    let mut dropped = 0_usize;

    for &value in values {
        if !(first..=last).contains(&value) {
            dropped += 1;
            continue;
        }
        let index = if value == last {
            bin_count - 1
        } else {
            edges.partition_point(|edge| *edge <= value) - 1
        };
        counts[index] += 1;
    }

    if dropped > 0 {
        trace!(dropped, first, last, "histogram values outside bin edges");
    }

    edges
        .windows(2)
        .zip(counts)
        .map(|(pair, count)| HistogramBin {
            bin_start: pair[0],
            bin_end: pair[1],
            count,
        })
        .collect()
}

/// Resolves edges and counts in one step.
pub fn build_histogram(values: &[f64], bins: &BinSpec) -> ChartResult<Vec<HistogramBin>> {
    let edges = histogram_edges(values, bins)?;
    Ok(count_into_bins(values, &edges))
}

fn value_range(values: &[f64]) -> ChartResult<(f64, f64)> {
    if values.is_empty() {
        return Err(ChartError::validation(
            "histogram requires at least one value",
        ));
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in values {
        min = min.min(value);
        max = max.max(value);
    }
    Ok((min, max))
}

fn ensure_strictly_increasing(edges: &[f64]) -> ChartResult<()> {
    if let Some(index) = edges.windows(2).position(|pair| pair[0] >= pair[1]) {
        return Err(ChartError::validation(format!(
            "histogram bin edges must be strictly increasing (edge {} >= edge {})",
            index,
            index + 1
        )));
    }
    Ok(())
}
