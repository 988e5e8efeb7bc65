//! Node type and related structures.
//!
//! Nodes are the vertices in the graph. Each node has:
//! - A stable unique identifier, allocated by the owning graph
//! - A name, unique within one graph (defaults to `Node-<id>`)
//! - Arbitrary user data, deep-merged when the node is re-added

use std::fmt;

use serde::{Deserialize, Serialize};

use super::data::Data;

/// Stable node identifier.
///
/// This ID remains valid even after other nodes are removed from the graph.
/// It wraps a u32 for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A named vertex carrying user data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier.
    pub id: NodeId,
    /// Unique name within the owning graph.
    pub name: String,
    /// User data.
    #[serde(default)]
    pub data: Data,
}

impl Node {
    /// Create a node. A missing name falls back to `Node-<id>`.
    pub fn new(id: NodeId, name: Option<String>, data: Data) -> Self {
        let name = name.unwrap_or_else(|| default_node_name(id));
        Self { id, name, data }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Name given to nodes created without one.
pub fn default_node_name(id: NodeId) -> String {
    format!("Node-{}", id.0)
}

/// Description of a node to create or merge into.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NodeSpec {
    /// Node name. `None` lets the graph derive one from the id.
    #[serde(default)]
    pub name: Option<String>,
    /// Data to attach (or merge into an existing node).
    #[serde(default)]
    pub data: Data,
}

impl NodeSpec {
    /// A spec with a name and no data.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            data: Data::new(),
        }
    }

    /// Attach data to the spec.
    pub fn with_data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }
}

/// Input accepted by [`Graph::add_node`](super::Graph::add_node).
#[derive(Debug, Clone)]
pub enum NodeInput {
    /// An already constructed node, registered as-is unless its name is taken.
    Node(Node),
    /// A name and data to build a node from.
    Spec(NodeSpec),
}

impl From<Node> for NodeInput {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<NodeSpec> for NodeInput {
    fn from(spec: NodeSpec) -> Self {
        Self::Spec(spec)
    }
}

impl From<&str> for NodeInput {
    fn from(name: &str) -> Self {
        Self::Spec(NodeSpec::named(name))
    }
}

impl From<String> for NodeInput {
    fn from(name: String) -> Self {
        Self::Spec(NodeSpec::named(name))
    }
}

impl<S: Into<String>> From<(S, Data)> for NodeInput {
    fn from((name, data): (S, Data)) -> Self {
        Self::Spec(NodeSpec::named(name).with_data(data))
    }
}

/// Key used to look a node up, either by id or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKey<'a> {
    /// Lookup by identifier.
    Id(NodeId),
    /// Lookup by name.
    Name(&'a str),
}

impl From<NodeId> for NodeKey<'_> {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a str> for NodeKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for NodeKey<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

/// Node-like values resolve by their name.
impl<'a> From<&'a Node> for NodeKey<'a> {
    fn from(node: &'a Node) -> Self {
        Self::Name(node.name.as_str())
    }
}
