use std::ops::Mul;

use tracing::debug;

use crate::api::{Chart, ChartOptions, DEFAULT_PALETTE};
use crate::core::{ChartData, max_dimension, to_unified_series};
use crate::error::{ChartError, ChartResult};

/// Overlays `second` onto `first` in one coordinate space.
///
/// Two line charts (or two scatter charts) keep their kind and concatenate
/// series. Any other pairing is converted to unified series and becomes a
/// composite chart, except bar-on-bar and histogram-on-histogram which are
/// rejected. Charts that only carry rendered output cannot be overlaid; layer
/// those with [`ChartContext::stack`](crate::api::ChartContext::stack).
pub fn overlay(first: &Chart, second: &Chart) -> ChartResult<Chart> {
    let (Some(first_data), Some(second_data)) = (first.data(), second.data()) else {
        return Err(ChartError::composition(
            "overlay requires structured data on both charts; \
             use side-by-side, vertical or stack layout for rendered-only charts",
        ));
    };

    let data = match (first_data, second_data) {
        (ChartData::Line(a), ChartData::Line(b)) => ChartData::Line(concat(a, b)),
        (ChartData::Scatter(a), ChartData::Scatter(b)) => ChartData::Scatter(concat(a, b)),
        (ChartData::Bar(_), ChartData::Bar(_)) => {
            return Err(ChartError::composition(
                "bar charts cannot be overlaid (stacked vs grouped is ambiguous); \
                 place them side by side instead",
            ));
        }
        (ChartData::Histogram(_), ChartData::Histogram(_)) => {
            return Err(ChartError::composition(
                "histograms cannot be overlaid (bin edges would need realignment); \
                 place them side by side or bin the combined values instead",
            ));
        }
        (a, b) => {
            let mut series = to_unified_series(a);
            series.extend(to_unified_series(b));
            ChartData::Composite(series)
        }
    };
    debug!(
        first = %first_data.kind(),
        second = %second_data.kind(),
        result = %data.kind(),
        series = data.series_count(),
        "overlaid charts"
    );

    let width = max_dimension(first.width(), second.width());
    let height = max_dimension(first.height(), second.height());
    let mut options = merge_options(
        first.options(),
        first_data.series_count(),
        second.options(),
        second_data.series_count(),
    );
    options.width = width;
    options.height = height;

    Chart::from_parts(data, options, width, height)
}

/// `&a * &b` is [`overlay`]; use [`ChartContext::stack`](crate::api::ChartContext::stack)
/// for charts without structured data.
impl Mul for &Chart {
    type Output = ChartResult<Chart>;

    fn mul(self, rhs: Self) -> Self::Output {
        overlay(self, rhs)
    }
}

/// `"{first} & {second}"` when both are titled, otherwise whichever exists.
#[must_use]
pub fn merge_titles(first: Option<&str>, second: Option<&str>) -> Option<String> {
    match (first, second) {
        (Some(a), Some(b)) => Some(format!("{a} & {b}")),
        (Some(title), None) | (None, Some(title)) => Some(title.to_owned()),
        (None, None) => None,
    }
}

/// One color per series, first operand then second.
///
/// Explicit colors are used in order; series without one draw from
/// [`DEFAULT_PALETTE`] at the running series index, which keeps counting
/// across both operands whether the previous colors were explicit or not.
#[must_use]
pub fn merge_colors(
    first: Option<&[String]>,
    first_series: usize,
    second: Option<&[String]>,
    second_series: usize,
) -> Vec<String> {
    let mut merged = Vec::with_capacity(first_series + second_series);
    for (explicit, series_count) in [(first, first_series), (second, second_series)] {
        for index in 0..series_count {
            let color = explicit
                .and_then(|colors| colors.get(index))
                .cloned()
                .unwrap_or_else(|| {
                    DEFAULT_PALETTE[merged.len() % DEFAULT_PALETTE.len()].to_owned()
                });
            merged.push(color);
        }
    }
    merged
}

/// First operand wins on every key; the second only fills gaps.
fn merge_options(
    first: &ChartOptions,
    first_series: usize,
    second: &ChartOptions,
    second_series: usize,
) -> ChartOptions {
    let mut merged = first.clone();
    merged.title = merge_titles(first.title(), second.title());
    merged.x_label = first.x_label.clone().or_else(|| second.x_label.clone());
    merged.y_label = first.y_label.clone().or_else(|| second.y_label.clone());
    merged.x_ticks = first.x_ticks.or(second.x_ticks);
    merged.y_ticks = first.y_ticks.or(second.y_ticks);
    merged.legend = first.legend.or(second.legend);
    merged.layout = first.layout.clone().or_else(|| second.layout.clone());
    merged.colors = Some(merge_colors(
        first.colors.as_deref(),
        first_series,
        second.colors.as_deref(),
        second_series,
    ));
    for (key, value) in &second.extra {
        merged
            .extra
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
    merged
}

fn concat<T: Clone>(first: &[T], second: &[T]) -> Vec<T> {
    let mut combined = Vec::with_capacity(first.len() + second.len());
    combined.extend_from_slice(first);
    combined.extend_from_slice(second);
    combined
}
