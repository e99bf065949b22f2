use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rect,
    Circle,
}

/// Graph vertex. Coordinates are optional; missing ones are either filled by
/// a layout engine or left to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub text: String,
    pub shape: NodeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl Node {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            shape,
            x: None,
            y: None,
            color: None,
            tooltip: None,
        }
    }

    #[must_use]
    pub fn rect(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, text, NodeShape::Rect)
    }

    #[must_use]
    pub fn circle(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, text, NodeShape::Circle)
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    #[must_use]
    pub fn has_position(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Validated node/edge set: at least one node, unique ids, and every edge
/// endpoint refers to an existing node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphData {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphData {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> ChartResult<Self> {
        if nodes.is_empty() {
            return Err(ChartError::validation("graph must have at least one node"));
        }

        let mut ids = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(ChartError::validation(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
            for (axis, value) in [("x", node.x), ("y", node.y)] {
                if value.is_some_and(|v| !v.is_finite()) {
                    return Err(ChartError::validation(format!(
                        "node '{}' {axis} coordinate must be finite",
                        node.id
                    )));
                }
            }
        }

        for edge in &edges {
            if !ids.contains(edge.source.as_str()) {
                return Err(ChartError::validation(format!(
                    "edge source '{}' not found in nodes",
                    edge.source
                )));
            }
            if !ids.contains(edge.target.as_str()) {
                return Err(ChartError::validation(format!(
                    "edge target '{}' not found in nodes",
                    edge.target
                )));
            }
        }

        Ok(Self { nodes, edges })
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Writes layout coordinates into nodes lacking an explicit position.
    ///
    /// Positions for unknown ids are ignored; nodes the layout did not place
    /// keep whatever they had.
    pub fn apply_positions<'a, I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = &'a NodePosition>,
    {
        let mut applied = 0;
        for position in positions {
            if let Some(node) = self
                .nodes
                .iter_mut()
                .find(|node| node.id == position.id && !node.has_position())
            {
                node.x = Some(position.x);
                node.y = Some(position.y);
                applied += 1;
            }
        }
        applied
    }
}

/// Node coordinate produced by a layout engine, already in top-left space.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Bounding box reported by a layout engine with a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl LayoutBounds {
    /// Maps a bottom-left-origin y into top-left space.
    #[must_use]
    pub fn flip_y(self, y: f64) -> f64 {
        (self.y_max - self.y_min) - (y - self.y_min)
    }
}
