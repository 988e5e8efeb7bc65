//! Link type and related structures.
//!
//! Links are the directed connections between nodes. Each link has:
//! - A stable unique identifier (separate sequence from nodes)
//! - A name derived from its endpoints, `"<from>-><to>"`
//! - Arbitrary user data, deep-merged when the link is re-added

use std::fmt;

use serde::{Deserialize, Serialize};

use super::data::Data;
use super::node::{Node, NodeId, NodeKey, NodeSpec};

/// Stable link identifier.
///
/// This ID remains valid even after other links are removed from the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkId(pub u32);

impl LinkId {
    /// Create a new LinkId from a raw u32.
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

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({})", self.0)
    }
}

impl From<u32> for LinkId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<LinkId> for u32 {
    #[inline]
    fn from(id: LinkId) -> Self {
        id.0
    }
}

/// Name of the link between two node names.
pub fn link_name(from: &str, to: &str) -> String {
    format!("{from}->{to}")
}

/// Reference to a link endpoint.
///
/// Node names never change, so id + name is enough to find the node again
/// and to rebuild the adjacency keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandle {
    /// Endpoint node id.
    pub id: NodeId,
    /// Endpoint node name.
    pub name: String,
}

impl From<&Node> for NodeHandle {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
        }
    }
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Stable identifier.
    pub id: LinkId,
    /// Derived name, `"<from>-><to>"`.
    pub name: String,
    /// Source endpoint.
    pub node_from: NodeHandle,
    /// Destination endpoint.
    pub node_to: NodeHandle,
    /// User data.
    pub data: Data,
}

impl Link {
    /// Create a link between two nodes.
    pub fn new(id: LinkId, node_from: &Node, node_to: &Node, data: Data) -> Self {
        Self {
            id,
            name: link_name(&node_from.name, &node_to.name),
            node_from: node_from.into(),
            node_to: node_to.into(),
            data,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One end of a link being added.
///
/// Anything but an id is created on demand when the graph doesn't know it yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LinkEnd {
    /// An existing node id.
    Id(NodeId),
    /// A node name.
    Name(String),
    /// A name plus data, merged into the node.
    Spec(NodeSpec),
    /// A constructed node.
    #[serde(skip)]
    Node(Node),
}

impl From<NodeId> for LinkEnd {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for LinkEnd {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for LinkEnd {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for LinkEnd {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<NodeSpec> for LinkEnd {
    fn from(spec: NodeSpec) -> Self {
        Self::Spec(spec)
    }
}

impl From<Node> for LinkEnd {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<&Node> for LinkEnd {
    fn from(node: &Node) -> Self {
        Self::Name(node.name.clone())
    }
}

/// Description of a link to create or merge into.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSpec {
    /// Source endpoint.
    pub node_from: LinkEnd,
    /// Destination endpoint.
    pub node_to: LinkEnd,
    /// Data to attach (or merge into an existing link).
    #[serde(default)]
    pub data: Data,
}

impl LinkSpec {
    /// A spec between two endpoints with no data.
    pub fn new(node_from: impl Into<LinkEnd>, node_to: impl Into<LinkEnd>) -> Self {
        Self {
            node_from: node_from.into(),
            node_to: node_to.into(),
            data: Data::new(),
        }
    }

    /// Attach data to the spec.
    pub fn with_data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }
}

/// Input accepted by [`Graph::add_link`](super::Graph::add_link).
#[derive(Debug, Clone)]
pub enum LinkInput {
    /// An already constructed link.
    Link(Link),
    /// Endpoints and data to build a link from.
    Spec(LinkSpec),
}

impl From<Link> for LinkInput {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

impl From<LinkSpec> for LinkInput {
    fn from(spec: LinkSpec) -> Self {
        Self::Spec(spec)
    }
}

impl<A: Into<LinkEnd>, B: Into<LinkEnd>> From<(A, B)> for LinkInput {
    fn from((from, to): (A, B)) -> Self {
        Self::Spec(LinkSpec::new(from, to))
    }
}

impl<A: Into<LinkEnd>, B: Into<LinkEnd>> From<(A, B, Data)> for LinkInput {
    fn from((from, to, data): (A, B, Data)) -> Self {
        Self::Spec(LinkSpec::new(from, to).with_data(data))
    }
}

/// Key used to look a link up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKey<'a> {
    /// Lookup by identifier.
    Id(LinkId),
    /// Lookup by derived name.
    Name(&'a str),
    /// Lookup by ordered endpoints; both must resolve to live nodes.
    Pair(NodeKey<'a>, NodeKey<'a>),
}

impl From<LinkId> for LinkKey<'_> {
    fn from(id: LinkId) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a str> for LinkKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for LinkKey<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

impl<'a> From<&'a Link> for LinkKey<'a> {
    fn from(link: &'a Link) -> Self {
        Self::Name(link.name.as_str())
    }
}

impl<'a, A: Into<NodeKey<'a>>, B: Into<NodeKey<'a>>> From<(A, B)> for LinkKey<'a> {
    fn from((from, to): (A, B)) -> Self {
        Self::Pair(from.into(), to.into())
    }
}
