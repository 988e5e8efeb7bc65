//! Graph - the authoritative store of nodes and links.
//!
//! The Graph keeps three link indices in lockstep (nested adjacency by
//! endpoint names, flat by id, flat by derived name) and two node indices
//! (by id, by name). It also owns the particle list and the scalar settings
//! an external simulation step consumes. No physics runs here.

use std::collections::{BTreeMap, HashMap};

use log::{debug, trace};
use petgraph::Directed;
use petgraph::stable_graph::StableGraph;

use super::data::{Data, merge_data};
use super::error::{GraphError, Result};
use super::ids::IdAllocator;
use super::link::{Link, LinkEnd, LinkId, LinkInput, LinkKey, LinkSpec};
use super::node::{Node, NodeId, NodeInput, NodeKey, NodeSpec, default_node_name};
use super::options::{DEFAULT_FRICTION, DEFAULT_GRAVITY, GraphOptions};
use crate::physics::{Particle, Vector};
use crate::spatial::SpatialIndex;

/// The graph container.
///
/// This struct manages:
/// - Node and link storage with id and name indices
/// - Directed adjacency keyed by node names
/// - Particles for the external simulation, plus a spatial index over them
/// - Friction and gravity settings
pub struct Graph {
    /// Source name -> destination name -> link id.
    links: HashMap<String, BTreeMap<String, LinkId>>,

    /// Links by id. Owns the link values.
    links_by_id: BTreeMap<LinkId, Link>,

    /// Derived link name -> link id. Node names may contain `->`, so two
    /// pairs can derive the same name; the most recent link holds it.
    links_by_name: HashMap<String, LinkId>,

    /// Nodes by id. Owns the node values.
    nodes_by_id: BTreeMap<NodeId, Node>,

    /// Node name -> node id.
    nodes_by_name: HashMap<String, NodeId>,

    /// Particles, append-only from the graph's side.
    particles: Vec<Particle>,

    /// Damping coefficient for the simulation step.
    friction: f64,

    /// Gravity for the simulation step.
    gravity: f64,

    /// Node and link id sequences for this graph.
    ids: IdAllocator,

    /// Spatial index over particle locations
    spatial: SpatialIndex,

    /// Whether the spatial index needs rebuilding
    spatial_dirty: bool,
}

impl Graph {
    /// Create a new empty graph with default settings.
    pub fn new() -> Self {
        Self::with_allocator(IdAllocator::new())
    }

    /// Create an empty graph drawing ids from the given allocator.
    pub fn with_allocator(ids: IdAllocator) -> Self {
        Self {
            links: HashMap::new(),
            links_by_id: BTreeMap::new(),
            links_by_name: HashMap::new(),
            nodes_by_id: BTreeMap::new(),
            nodes_by_name: HashMap::new(),
            particles: Vec::new(),
            friction: DEFAULT_FRICTION,
            gravity: DEFAULT_GRAVITY,
            ids,
            spatial: SpatialIndex::new(),
            spatial_dirty: false,
        }
    }

    /// Create a graph from options, replaying any seed nodes and links.
    pub fn with_options(options: GraphOptions) -> Result<Self> {
        let GraphOptions {
            friction,
            gravity,
            nodes,
            links,
        } = options;

        let mut graph = Self::new();
        graph.friction = friction;
        graph.gravity = gravity;

        for spec in nodes {
            graph.add_node(spec)?;
        }
        for spec in links {
            graph.add_link(spec)?;
        }

        debug!(
            "graph seeded with {} nodes, {} links",
            graph.node_count(),
            graph.link_count()
        );
        Ok(graph)
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node, or merge data into the node that already has its name.
    ///
    /// Returns the live node either way. Fails only when a new node is
    /// needed and the node id space is used up.
    pub fn add_node(&mut self, input: impl Into<NodeInput>) -> Result<&Node> {
        let id = match input.into() {
            NodeInput::Node(node) => match self.nodes_by_name.get(&node.name).copied() {
                Some(existing) => self.merge_node(existing, node.data),
                None => {
                    let id = if self.nodes_by_id.contains_key(&node.id) {
                        self.ids.next_node()?
                    } else {
                        self.ids.observe_node(node.id);
                        node.id
                    };
                    self.insert_node(Node { id, ..node })
                }
            },
            NodeInput::Spec(NodeSpec { name, data }) => {
                let name = match name {
                    Some(name) => name,
                    None => default_node_name(self.ids.peek_node()?),
                };
                match self.nodes_by_name.get(&name).copied() {
                    Some(existing) => self.merge_node(existing, data),
                    None => {
                        let id = self.ids.next_node()?;
                        self.insert_node(Node::new(id, Some(name), data))
                    }
                }
            }
        };

        Ok(&self.nodes_by_id[&id])
    }

    fn insert_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        debug!("node created: {} ({})", node.name, id);
        self.nodes_by_name.insert(node.name.clone(), id);
        self.nodes_by_id.insert(id, node);
        id
    }

    fn merge_node(&mut self, id: NodeId, data: Data) -> NodeId {
        if let Some(node) = self.nodes_by_id.get_mut(&id) {
            debug!("node merged: {} ({})", node.name, id);
            merge_data(&mut node.data, data);
        }
        id
    }

    /// Look a node up by id or name.
    pub fn get_node<'a>(&self, key: impl Into<NodeKey<'a>>) -> Option<&Node> {
        let key = key.into();
        let found = match key {
            NodeKey::Id(id) => self.nodes_by_id.get(&id),
            NodeKey::Name(name) => self
                .nodes_by_name
                .get(name)
                .and_then(|id| self.nodes_by_id.get(id)),
        };
        if found.is_none() {
            trace!("node lookup missed: {key:?}");
        }
        found
    }

    /// Remove a node from both node indices.
    ///
    /// Links touching the node are left in place.
    pub fn remove_node<'a>(&mut self, key: impl Into<NodeKey<'a>>) -> Option<Node> {
        let id = self.get_node(key)?.id;
        let node = self.nodes_by_id.remove(&id)?;
        if self.nodes_by_name.get(&node.name) == Some(&id) {
            self.nodes_by_name.remove(&node.name);
        }
        debug!("node removed: {} ({})", node.name, id);
        Some(node)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes_by_id.len()
    }

    /// Iterate over nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes_by_id.values()
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Add a link, or merge data into the link that already joins the same
    /// ordered pair of nodes.
    ///
    /// Endpoints given by name or spec are created when missing. An endpoint
    /// given by id must already exist.
    pub fn add_link(&mut self, input: impl Into<LinkInput>) -> Result<&Link> {
        let id = match input.into() {
            LinkInput::Spec(LinkSpec {
                node_from,
                node_to,
                data,
            }) => {
                let from = self.resolve_end(node_from)?;
                let to = self.resolve_end(node_to)?;
                self.upsert_link(from, to, data, None)?
            }
            LinkInput::Link(link) => {
                let from = self.resolve_handle(&link.node_from.name, link.node_from.id)?;
                let to = self.resolve_handle(&link.node_to.name, link.node_to.id)?;
                self.upsert_link(from, to, link.data, Some(link.id))?
            }
        };

        Ok(&self.links_by_id[&id])
    }

    fn resolve_end(&mut self, end: LinkEnd) -> Result<NodeId> {
        match end {
            LinkEnd::Id(id) if self.nodes_by_id.contains_key(&id) => Ok(id),
            LinkEnd::Id(id) => Err(GraphError::UnknownNode(id)),
            LinkEnd::Name(name) => Ok(self.add_node(name)?.id),
            LinkEnd::Spec(spec) => Ok(self.add_node(spec)?.id),
            LinkEnd::Node(node) => Ok(self.add_node(node)?.id),
        }
    }

    fn resolve_handle(&mut self, name: &str, id: NodeId) -> Result<NodeId> {
        match self.nodes_by_name.get(name) {
            Some(&existing) => Ok(existing),
            None => Ok(self.add_node(Node::new(id, Some(name.to_owned()), Data::new()))?.id),
        }
    }

    fn upsert_link(
        &mut self,
        from: NodeId,
        to: NodeId,
        data: Data,
        preferred: Option<LinkId>,
    ) -> Result<LinkId> {
        let from_node = self.nodes_by_id.get(&from).ok_or(GraphError::UnknownNode(from))?;
        let to_node = self.nodes_by_id.get(&to).ok_or(GraphError::UnknownNode(to))?;

        let existing = self
            .links
            .get(&from_node.name)
            .and_then(|row| row.get(&to_node.name))
            .copied();

        if let Some(id) = existing {
            if let Some(link) = self.links_by_id.get_mut(&id) {
                debug!("link merged: {} ({})", link.name, id);
                link.node_from = from_node.into();
                link.node_to = to_node.into();
                merge_data(&mut link.data, data);
            }
            return Ok(id);
        }

        let id = match preferred {
            Some(id) if !self.links_by_id.contains_key(&id) => {
                self.ids.observe_link(id);
                id
            }
            _ => self.ids.next_link()?,
        };
        let link = Link::new(id, from_node, to_node, data);

        debug!("link created: {} ({})", link.name, id);
        self.links
            .entry(link.node_from.name.clone())
            .or_default()
            .insert(link.node_to.name.clone(), id);
        self.links_by_name.insert(link.name.clone(), id);
        self.links_by_id.insert(id, link);
        Ok(id)
    }

    /// Look a link up by id, derived name, or ordered pair of nodes.
    ///
    /// The pair form needs both endpoints to resolve to live nodes.
    pub fn get_link<'a>(&self, key: impl Into<LinkKey<'a>>) -> Option<&Link> {
        let key = key.into();
        let found = match key {
            LinkKey::Id(id) => self.links_by_id.get(&id),
            LinkKey::Name(name) => self.link_named(name),
            LinkKey::Pair(from, to) => {
                let from = self.get_node(from)?;
                let to = self.get_node(to)?;
                self.links
                    .get(&from.name)
                    .and_then(|row| row.get(&to.name))
                    .and_then(|id| self.links_by_id.get(id))
            }
        };
        if found.is_none() {
            trace!("link lookup missed: {key:?}");
        }
        found
    }

    fn link_named(&self, name: &str) -> Option<&Link> {
        self.links_by_name
            .get(name)
            .and_then(|id| self.links_by_id.get(id))
    }

    /// Outgoing links of a node, keyed by destination name.
    pub fn get_links_from<'a>(&self, key: impl Into<NodeKey<'a>>) -> BTreeMap<&str, &Link> {
        let Some(node) = self.get_node(key) else {
            return BTreeMap::new();
        };

        self.links
            .get(&node.name)
            .map(|row| {
                row.iter()
                    .filter_map(|(to, id)| self.links_by_id.get(id).map(|link| (to.as_str(), link)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Incoming links of a node, keyed by source name.
    ///
    /// Scans every adjacency row.
    pub fn get_links_to<'a>(&self, key: impl Into<NodeKey<'a>>) -> BTreeMap<&str, &Link> {
        let Some(node) = self.get_node(key) else {
            return BTreeMap::new();
        };

        self.links
            .iter()
            .filter_map(|(from, row)| {
                row.get(&node.name)
                    .and_then(|id| self.links_by_id.get(id))
                    .map(|link| (from.as_str(), link))
            })
            .collect()
    }

    /// Remove a link from all three link indices.
    pub fn remove_link<'a>(&mut self, key: impl Into<LinkKey<'a>>) -> Option<Link> {
        let id = self.get_link(key)?.id;
        let link = self.links_by_id.remove(&id)?;

        if self.links_by_name.get(&link.name) == Some(&id) {
            self.links_by_name.remove(&link.name);
            let shadowed = self
                .links_by_id
                .values()
                .rev()
                .find(|other| other.name == link.name)
                .map(|other| other.id);
            if let Some(other) = shadowed {
                self.links_by_name.insert(link.name.clone(), other);
            }
        }
        if let Some(row) = self.links.get_mut(&link.node_from.name) {
            row.remove(&link.node_to.name);
            if row.is_empty() {
                self.links.remove(&link.node_from.name);
            }
        }

        debug!("link removed: {} ({})", link.name, id);
        Some(link)
    }

    /// Get the number of links.
    pub fn link_count(&self) -> usize {
        self.links_by_id.len()
    }

    /// Iterate over links in id order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links_by_id.values()
    }

    /// Snapshot of the live topology for a simulation step.
    ///
    /// Node weights are node ids, edge weights are link ids. Links with an
    /// endpoint that is no longer in the graph are left out.
    pub fn topology(&self) -> StableGraph<NodeId, LinkId, Directed> {
        let mut graph = StableGraph::with_capacity(self.nodes_by_id.len(), self.links_by_id.len());

        let index: HashMap<NodeId, _> = self
            .nodes_by_id
            .keys()
            .map(|&id| (id, graph.add_node(id)))
            .collect();

        for link in self.links_by_id.values() {
            let from = self.nodes_by_name.get(&link.node_from.name).and_then(|id| index.get(id));
            let to = self.nodes_by_name.get(&link.node_to.name).and_then(|id| index.get(id));
            if let (Some(&from), Some(&to)) = (from, to) {
                graph.add_edge(from, to, link.id);
            }
        }

        graph
    }

    // =========================================================================
    // Particles
    // =========================================================================

    /// Append a particle. Returns its index.
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.spatial_dirty = true;
        self.particles.len() - 1
    }

    /// All particles, in insertion order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for the simulation step.
    ///
    /// Marks the spatial index stale.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        self.spatial_dirty = true;
        &mut self.particles
    }

    /// Index of the particle nearest to a point.
    pub fn nearest_particle(&mut self, point: &Vector) -> Option<usize> {
        self.ensure_spatial_index_up_to_date();
        self.spatial.nearest(point)
    }

    /// Indices of all particles within `radius` of a point, ascending.
    pub fn particles_within(&mut self, point: &Vector, radius: f64) -> Vec<usize> {
        self.ensure_spatial_index_up_to_date();
        self.spatial.in_radius(point, radius)
    }

    fn ensure_spatial_index_up_to_date(&mut self) {
        if self.spatial_dirty {
            self.spatial.rebuild(&self.particles);
            self.spatial_dirty = false;
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn set_friction(&mut self, friction: f64) {
        self.friction = friction;
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: f64) {
        self.gravity = gravity;
    }

    /// Clear nodes, links and particles.
    ///
    /// Id sequences keep counting, so ids stay unique for this graph's lifetime.
    pub fn clear(&mut self) {
        self.links.clear();
        self.links_by_id.clear();
        self.links_by_name.clear();
        self.nodes_by_id.clear();
        self.nodes_by_name.clear();
        self.particles.clear();
        self.spatial.clear();
        self.spatial_dirty = false;
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
