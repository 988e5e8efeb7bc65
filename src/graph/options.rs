//! Construction-time options for a graph.

use serde::Deserialize;

use super::link::LinkSpec;
use super::node::NodeSpec;

/// Default damping coefficient for the simulation step.
pub const DEFAULT_FRICTION: f64 = 0.3;

/// Default gravity for the simulation step.
pub const DEFAULT_GRAVITY: f64 = 0.0;

/// Options for [`Graph::with_options`](super::Graph::with_options).
///
/// `nodes` and `links` seed the graph through the regular add operations,
/// so duplicates merge exactly as they would at runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Damping coefficient consumed by the simulation step.
    pub friction: f64,
    /// Gravity consumed by the simulation step.
    pub gravity: f64,
    /// Nodes to create up front.
    pub nodes: Vec<NodeSpec>,
    /// Links to create up front.
    pub links: Vec<LinkSpec>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
            gravity: DEFAULT_GRAVITY,
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }
}
