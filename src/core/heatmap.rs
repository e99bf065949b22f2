use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// One cell of a rectangular heatmap; `x` is the column, `y` the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub x: u32,
    pub y: u32,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Flattens a row-major matrix into cells, rejecting ragged rows and a
/// `text` matrix whose shape differs from `values`.
pub fn cells_from_matrix(
    values: &[Vec<f64>],
    text: Option<&[Vec<String>]>,
) -> ChartResult<Vec<HeatmapCell>> {
    let Some(first_row) = values.first() else {
        return Err(ChartError::validation("heatmap matrix must have at least one row"));
    };
    let cols = first_row.len();
    if cols == 0 {
        return Err(ChartError::validation("heatmap matrix rows must not be empty"));
    }
    if let Some(row) = values.iter().position(|row| row.len() != cols) {
        return Err(ChartError::validation(format!(
            "heatmap matrix is not rectangular: row {row} has {} columns, expected {cols}",
            values[row].len()
        )));
    }

    if let Some(text) = text {
        if text.len() != values.len() || text.iter().any(|row| row.len() != cols) {
            return Err(ChartError::validation(format!(
                "heatmap `text` must match the {}x{cols} shape of `values`",
                values.len()
            )));
        }
    }

    let mut cells = Vec::with_capacity(values.len() * cols);
    for (y, row) in values.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            cells.push(HeatmapCell {
                x: index_u32(x)?,
                y: index_u32(y)?,
                value,
                text: text.map(|text| text[y][x].clone()),
            });
        }
    }
    Ok(cells)
}

/// Returns `(rows, cols)` spanned by the cells.
#[must_use]
pub fn heatmap_extent(cells: &[HeatmapCell]) -> (u32, u32) {
    let rows = cells.iter().map(|cell| cell.y + 1).max().unwrap_or(0);
    let cols = cells.iter().map(|cell| cell.x + 1).max().unwrap_or(0);
    (rows, cols)
}

fn index_u32(index: usize) -> ChartResult<u32> {
    u32::try_from(index)
        .map_err(|_| ChartError::validation(format!("heatmap index {index} exceeds u32 range")))
}
