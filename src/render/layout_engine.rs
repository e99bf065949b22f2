use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::{GraphData, LayoutBounds, NodePosition, NodeShape};
use crate::error::{ChartError, ChartResult};
use crate::render::process::run_with_timeout;

/// Computes node coordinates for a graph, in top-left-origin space.
pub trait GraphLayoutEngine {
    fn layout(&self, graph: &GraphData) -> ChartResult<Vec<NodePosition>>;
}

/// Layout engine backed by Graphviz `dot -Tjson`.
#[derive(Debug, Clone, PartialEq)]
pub struct DotLayoutEngine {
    pub executable: PathBuf,
    pub timeout: Duration,
}

impl Default for DotLayoutEngine {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("dot"),
            timeout: Duration::from_secs(30),
        }
    }
}

impl DotLayoutEngine {
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl GraphLayoutEngine for DotLayoutEngine {
    fn layout(&self, graph: &GraphData) -> ChartResult<Vec<NodePosition>> {
        let dot = graph_to_dot(graph);
        let mut command = Command::new(&self.executable);
        command.arg("-Tjson");
        let stdout = run_with_timeout(command, Some(dot.into_bytes()), self.timeout, "graph layout")?
            .into_stdout("graph layout")?;
        parse_dot_json(&stdout)
    }
}

/// Fills in coordinates for nodes without an explicit position and returns
/// how many were placed.
pub fn apply_graph_layout(
    graph: &mut GraphData,
    engine: &dyn GraphLayoutEngine,
) -> ChartResult<usize> {
    if graph.nodes().iter().all(|node| node.has_position()) {
        return Ok(0);
    }
    let positions = engine.layout(graph)?;
    Ok(graph.apply_positions(&positions))
}

/// Renders the graph as a DOT digraph; rect nodes become `box`.
#[must_use]
pub fn graph_to_dot(graph: &GraphData) -> String {
    let mut dot = String::from("digraph G {\n  node [fontsize=12];\n");
    for node in graph.nodes() {
        let shape = match node.shape {
            NodeShape::Rect => "box",
            NodeShape::Circle => "circle",
        };
        let _ = writeln!(
            dot,
            "  \"{}\" [label=\"{}\", shape={shape}];",
            escape_dot(&node.id),
            escape_dot(&node.text)
        );
    }
    for edge in graph.edges() {
        let _ = write!(
            dot,
            "  \"{}\" -> \"{}\"",
            escape_dot(&edge.source),
            escape_dot(&edge.target)
        );
        match &edge.label {
            Some(label) => {
                let _ = writeln!(dot, " [label=\"{}\"];", escape_dot(label));
            }
            None => dot.push_str(";\n"),
        }
    }
    dot.push_str("}\n");
    dot
}

#[derive(Debug, Deserialize)]
struct DotJson {
    bb: String,
    #[serde(default)]
    objects: Vec<DotObject>,
}

#[derive(Debug, Deserialize)]
struct DotObject {
    name: String,
    #[serde(default)]
    pos: Option<String>,
}

/// Reads node positions out of `dot -Tjson` output, flipping y from
/// Graphviz's bottom-left origin to top-left.
pub fn parse_dot_json(input: &str) -> ChartResult<Vec<NodePosition>> {
    let parsed: DotJson = serde_json::from_str(input)
        .map_err(|e| ChartError::RenderFailure(format!("malformed graph layout output: {e}")))?;

    let [x_min, y_min, x_max, y_max] = parse_numbers::<4>(&parsed.bb, "bb")?;
    let bounds = LayoutBounds {
        x_min,
        y_min,
        x_max,
        y_max,
    };

    let mut positions = Vec::with_capacity(parsed.objects.len());
    for object in parsed.objects {
        // subgraph and cluster objects carry no position
        let Some(pos) = object.pos else {
            continue;
        };
        let [x, y] = parse_numbers::<2>(&pos, "pos")?;
        positions.push(NodePosition {
            id: object.name,
            x,
            y: bounds.flip_y(y),
        });
    }
    debug!(nodes = positions.len(), "parsed graph layout");
    Ok(positions)
}

fn parse_numbers<const N: usize>(raw: &str, field: &str) -> ChartResult<[f64; N]> {
    let malformed = || ChartError::RenderFailure(format!("malformed layout `{field}`: {raw:?}"));
    let mut values = [0.0; N];
    let mut parts = raw.split(',');
    for value in &mut values {
        *value = parts
            .next()
            .and_then(|part| part.trim().parse::<f64>().ok())
            .filter(|parsed| parsed.is_finite())
            .ok_or_else(malformed)?;
    }
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok(values)
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
