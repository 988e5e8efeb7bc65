//! Nexus - WASM Module
//!
//! This module provides a small graph data model and the 3D vector/particle
//! primitives used as the substrate for force-directed layout. It is compiled
//! to WebAssembly and exposes a JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: Node/link container with id, name and adjacency indices
//! - `physics`: Vector arithmetic and particle state for a simulation step
//! - `spatial`: R-tree spatial indexing over particle locations

use js_sys::{Float64Array, Reflect};
use log::{Level, info};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

pub mod graph;
pub mod physics;
pub mod spatial;

use graph::{
    Data, Graph, GraphError, GraphOptions, LinkEnd, LinkId, LinkKey, LinkSpec, NodeId, NodeKey,
    NodeSpec, data_from_value,
};
use physics::{Particle, ParticleSpec, Vector};

/// Initialize logging and panic hooks for the WASM target.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
    info!("nexus initialized");
}

/// Main entry point for the graph.
///
/// This struct wraps the internal Graph and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct Nexus {
    graph: Graph,
}

#[wasm_bindgen]
impl Nexus {
    /// Create a graph.
    ///
    /// `options` may carry `friction`, `gravity`, and seed `nodes` / `links`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<Nexus, JsError> {
        let options: GraphOptions = if options.is_undefined() || options.is_null() {
            GraphOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };

        Ok(Self {
            graph: Graph::with_options(options)?,
        })
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node by name (plus optional data) or from a `{ name, data }` object.
    ///
    /// Returns the live node; an existing node with the same name gets the
    /// data merged in.
    #[wasm_bindgen(js_name = addNode)]
    pub fn add_node(&mut self, name: JsValue, data: JsValue) -> Result<JsValue, JsError> {
        let spec = if let Some(name) = name.as_string() {
            NodeSpec::named(name).with_data(data_from_js(data)?)
        } else if name.is_undefined() || name.is_null() {
            NodeSpec::default().with_data(data_from_js(data)?)
        } else {
            serde_wasm_bindgen::from_value(name)?
        };

        to_js(self.graph.add_node(spec)?)
    }

    /// Get a node by id (number) or name (string, or an object with `name`).
    #[wasm_bindgen(js_name = getNode)]
    pub fn get_node(&self, key: JsValue) -> Result<JsValue, JsError> {
        let node = JsKey::from_js(&key).and_then(|key| self.graph.get_node(key.node_key()));
        maybe_to_js(node)
    }

    /// Remove a node. Links touching it are kept.
    ///
    /// Returns the removed node, or undefined.
    #[wasm_bindgen(js_name = removeNode)]
    pub fn remove_node(&mut self, key: JsValue) -> Result<JsValue, JsError> {
        let node = JsKey::from_js(&key).and_then(|key| self.graph.remove_node(key.node_key()));
        maybe_to_js(node)
    }

    /// Get the number of nodes in the graph.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Add a link.
    ///
    /// Either `(nodeFrom, nodeTo, data?)` where endpoints are ids, names or
    /// `{ name, data }` objects, or a single `{ nodeFrom, nodeTo, data }` object.
    #[wasm_bindgen(js_name = addLink)]
    pub fn add_link(
        &mut self,
        node_from: JsValue,
        node_to: JsValue,
        data: JsValue,
    ) -> Result<JsValue, JsError> {
        let spec = if node_to.is_undefined() {
            let spec = node_from;
            LinkSpec::new(
                link_end_from_js(get_field(&spec, "nodeFrom")?)?,
                link_end_from_js(get_field(&spec, "nodeTo")?)?,
            )
            .with_data(data_from_js(get_field(&spec, "data")?)?)
        } else {
            LinkSpec::new(link_end_from_js(node_from)?, link_end_from_js(node_to)?)
                .with_data(data_from_js(data)?)
        };

        to_js(self.graph.add_link(spec)?)
    }

    /// Get a link by id or name, or by `(nodeFrom, nodeTo)`.
    #[wasm_bindgen(js_name = getLink)]
    pub fn get_link(&self, first: JsValue, second: JsValue) -> Result<JsValue, JsError> {
        let link = if second.is_undefined() {
            JsKey::from_js(&first).and_then(|key| self.graph.get_link(key.link_key()))
        } else {
            match (JsKey::from_js(&first), JsKey::from_js(&second)) {
                (Some(from), Some(to)) => self
                    .graph
                    .get_link(LinkKey::Pair(from.node_key(), to.node_key())),
                _ => None,
            }
        };
        maybe_to_js(link)
    }

    /// Outgoing links of a node as `{ destinationName: link }`.
    #[wasm_bindgen(js_name = getLinksFrom)]
    pub fn get_links_from(&self, key: JsValue) -> Result<JsValue, JsError> {
        let links = JsKey::from_js(&key)
            .map(|key| self.graph.get_links_from(key.node_key()))
            .unwrap_or_default();
        to_js(&links)
    }

    /// Incoming links of a node as `{ sourceName: link }`.
    #[wasm_bindgen(js_name = getLinksTo)]
    pub fn get_links_to(&self, key: JsValue) -> Result<JsValue, JsError> {
        let links = JsKey::from_js(&key)
            .map(|key| self.graph.get_links_to(key.node_key()))
            .unwrap_or_default();
        to_js(&links)
    }

    /// Remove a link by id or name, or by `(nodeFrom, nodeTo)`.
    ///
    /// Returns the removed link, or undefined.
    #[wasm_bindgen(js_name = removeLink)]
    pub fn remove_link(&mut self, first: JsValue, second: JsValue) -> Result<JsValue, JsError> {
        let link = if second.is_undefined() {
            JsKey::from_js(&first).and_then(|key| self.graph.remove_link(key.link_key()))
        } else {
            match (JsKey::from_js(&first), JsKey::from_js(&second)) {
                (Some(from), Some(to)) => self
                    .graph
                    .remove_link(LinkKey::Pair(from.node_key(), to.node_key())),
                _ => None,
            }
        };
        maybe_to_js(link)
    }

    /// Get the number of links in the graph.
    #[wasm_bindgen(js_name = linkCount)]
    pub fn link_count(&self) -> u32 {
        self.graph.link_count() as u32
    }

    /// Live links as node id pairs `[from0, to0, from1, to1, ...]`.
    ///
    /// Links whose endpoint was removed are skipped.
    #[wasm_bindgen(js_name = getEdgeList)]
    pub fn get_edge_list(&self) -> Vec<u32> {
        edge_list(&self.graph)
    }

    // =========================================================================
    // Particles
    // =========================================================================

    /// Add a particle from `{ location, velocity, force, mass, death }`
    /// (all optional). Returns its index.
    #[wasm_bindgen(js_name = addParticle)]
    pub fn add_particle(&mut self, spec: JsValue) -> Result<u32, JsError> {
        let spec: ParticleSpec = if spec.is_undefined() || spec.is_null() {
            ParticleSpec::default()
        } else {
            serde_wasm_bindgen::from_value(spec)?
        };
        Ok(self.graph.add_particle(Particle::from_spec(spec)) as u32)
    }

    /// Get a particle by index, or undefined.
    #[wasm_bindgen(js_name = getParticle)]
    pub fn get_particle(&self, index: u32) -> Result<JsValue, JsError> {
        maybe_to_js(self.graph.particles().get(index as usize))
    }

    /// Overwrite a particle's location. Returns false for an unknown index.
    #[wasm_bindgen(js_name = setParticleLocation)]
    pub fn set_particle_location(&mut self, index: u32, x: f64, y: f64, z: f64) -> bool {
        self.set_particle_vector(index, Slot::Location, Vector::new(x, y, z))
    }

    /// Overwrite a particle's velocity. Returns false for an unknown index.
    #[wasm_bindgen(js_name = setParticleVelocity)]
    pub fn set_particle_velocity(&mut self, index: u32, x: f64, y: f64, z: f64) -> bool {
        self.set_particle_vector(index, Slot::Velocity, Vector::new(x, y, z))
    }

    /// Overwrite a particle's accumulated force. Returns false for an unknown index.
    #[wasm_bindgen(js_name = setParticleForce)]
    pub fn set_particle_force(&mut self, index: u32, x: f64, y: f64, z: f64) -> bool {
        self.set_particle_vector(index, Slot::Force, Vector::new(x, y, z))
    }

    /// Copy of all particle locations as `[x0, y0, z0, x1, y1, z1, ...]`.
    #[wasm_bindgen(js_name = getLocations)]
    pub fn get_locations(&self) -> Float64Array {
        Float64Array::from(&flatten(self.graph.particles(), Slot::Location)[..])
    }

    /// Copy of all particle velocities, laid out like `getLocations`.
    #[wasm_bindgen(js_name = getVelocities)]
    pub fn get_velocities(&self) -> Float64Array {
        Float64Array::from(&flatten(self.graph.particles(), Slot::Velocity)[..])
    }

    /// Copy of all particle forces, laid out like `getLocations`.
    #[wasm_bindgen(js_name = getForces)]
    pub fn get_forces(&self) -> Float64Array {
        Float64Array::from(&flatten(self.graph.particles(), Slot::Force)[..])
    }

    /// Write back every location from a flat `[x0, y0, z0, ...]` buffer.
    ///
    /// The buffer must hold exactly three values per particle.
    #[wasm_bindgen(js_name = setLocations)]
    pub fn set_locations(&mut self, values: &[f64]) -> Result<(), JsError> {
        Ok(scatter(self.graph.particles_mut(), Slot::Location, values)?)
    }

    /// Write back every velocity from a flat buffer.
    #[wasm_bindgen(js_name = setVelocities)]
    pub fn set_velocities(&mut self, values: &[f64]) -> Result<(), JsError> {
        Ok(scatter(self.graph.particles_mut(), Slot::Velocity, values)?)
    }

    /// Write back every force from a flat buffer.
    #[wasm_bindgen(js_name = setForces)]
    pub fn set_forces(&mut self, values: &[f64]) -> Result<(), JsError> {
        Ok(scatter(self.graph.particles_mut(), Slot::Force, values)?)
    }

    /// Get the number of particles.
    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.graph.particles().len() as u32
    }

    /// Index of the particle nearest to a point, or undefined if there are none.
    #[wasm_bindgen(js_name = nearestParticle)]
    pub fn nearest_particle(&mut self, x: f64, y: f64, z: f64) -> Option<u32> {
        self.graph
            .nearest_particle(&Vector::new(x, y, z))
            .map(|index| index as u32)
    }

    /// Indices of particles within `radius` of a point.
    #[wasm_bindgen(js_name = particlesWithin)]
    pub fn particles_within(&mut self, x: f64, y: f64, z: f64, radius: f64) -> Vec<u32> {
        self.graph
            .particles_within(&Vector::new(x, y, z), radius)
            .into_iter()
            .map(|index| index as u32)
            .collect()
    }

    // =========================================================================
    // Settings
    // =========================================================================

    #[wasm_bindgen(getter)]
    pub fn friction(&self) -> f64 {
        self.graph.friction()
    }

    #[wasm_bindgen(setter)]
    pub fn set_friction(&mut self, friction: f64) {
        self.graph.set_friction(friction);
    }

    #[wasm_bindgen(getter)]
    pub fn gravity(&self) -> f64 {
        self.graph.gravity()
    }

    #[wasm_bindgen(setter)]
    pub fn set_gravity(&mut self, gravity: f64) {
        self.graph.set_gravity(gravity);
    }

    /// Clear nodes, links and particles.
    pub fn clear(&mut self) {
        self.graph.clear();
    }
}

impl Nexus {
    fn set_particle_vector(&mut self, index: u32, slot: Slot, value: Vector) -> bool {
        match self.graph.particles_mut().get_mut(index as usize) {
            Some(particle) => {
                slot.of_mut(particle).set(value);
                true
            }
            None => false,
        }
    }
}

/// Which vector of a particle a bulk read or write touches.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Location,
    Velocity,
    Force,
}

impl Slot {
    fn of(self, particle: &Particle) -> &Vector {
        match self {
            Self::Location => &particle.location,
            Self::Velocity => &particle.velocity,
            Self::Force => &particle.force,
        }
    }

    fn of_mut(self, particle: &mut Particle) -> &mut Vector {
        match self {
            Self::Location => &mut particle.location,
            Self::Velocity => &mut particle.velocity,
            Self::Force => &mut particle.force,
        }
    }
}

/// A lookup key read from JavaScript.
enum JsKey {
    Id(u32),
    Name(String),
}

impl JsKey {
    /// Numbers are ids, strings are names, other objects resolve by their `name`.
    fn from_js(value: &JsValue) -> Option<Self> {
        if let Some(id) = value.as_f64() {
            return id_from_f64(id).map(Self::Id);
        }
        if let Some(name) = value.as_string() {
            return Some(Self::Name(name));
        }
        Reflect::get(value, &JsValue::from_str("name"))
            .ok()?
            .as_string()
            .map(Self::Name)
    }

    fn node_key(&self) -> NodeKey<'_> {
        match self {
            Self::Id(id) => NodeKey::Id(NodeId(*id)),
            Self::Name(name) => NodeKey::Name(name),
        }
    }

    fn link_key(&self) -> LinkKey<'_> {
        match self {
            Self::Id(id) => LinkKey::Id(LinkId(*id)),
            Self::Name(name) => LinkKey::Name(name),
        }
    }
}

/// A JS number names an id only when it is a whole number in `u32` range.
fn id_from_f64(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value)).then_some(value as u32)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    Ok(value.serialize(&Serializer::json_compatible())?)
}

/// Missing values surface as `undefined`, not `null`.
fn maybe_to_js<T: Serialize>(value: Option<T>) -> Result<JsValue, JsError> {
    match value {
        Some(value) => to_js(&value),
        None => Ok(JsValue::UNDEFINED),
    }
}

fn get_field(object: &JsValue, field: &str) -> Result<JsValue, JsError> {
    Reflect::get(object, &JsValue::from_str(field))
        .map_err(|_| JsError::from(GraphError::InvalidInput(format!("missing `{field}`"))))
}

fn data_from_js(value: JsValue) -> Result<Data, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Data::new());
    }
    let value: serde_json::Value = serde_wasm_bindgen::from_value(value)?;
    Ok(data_from_value(value)?)
}

fn link_end_from_js(value: JsValue) -> Result<LinkEnd, JsError> {
    if let Some(id) = value.as_f64() {
        return id_from_f64(id)
            .map(|id| LinkEnd::Id(NodeId(id)))
            .ok_or_else(|| GraphError::InvalidInput(format!("`{id}` is not a node id")).into());
    }
    if let Some(name) = value.as_string() {
        return Ok(LinkEnd::Name(name));
    }
    if value.is_undefined() || value.is_null() {
        return Err(GraphError::InvalidInput("link endpoint is missing".into()).into());
    }
    Ok(LinkEnd::Spec(serde_wasm_bindgen::from_value(value)?))
}

fn edge_list(graph: &Graph) -> Vec<u32> {
    let topology = graph.topology();
    topology
        .edge_indices()
        .filter_map(|edge| topology.edge_endpoints(edge))
        .flat_map(|(from, to)| [topology[from].raw(), topology[to].raw()])
        .collect()
}

fn flatten(particles: &[Particle], slot: Slot) -> Vec<f64> {
    particles
        .iter()
        .flat_map(|particle| slot.of(particle).to_array())
        .collect()
}

fn scatter(particles: &mut [Particle], slot: Slot, values: &[f64]) -> Result<(), GraphError> {
    if values.len() != particles.len() * 3 {
        return Err(GraphError::InvalidInput(format!(
            "expected {} values for {} particles, got {}",
            particles.len() * 3,
            particles.len(),
            values.len()
        )));
    }
    for (particle, xyz) in particles.iter_mut().zip(values.chunks_exact(3)) {
        slot.of_mut(particle).set([xyz[0], xyz[1], xyz[2]]);
    }
    Ok(())
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    /// One particle per node, then a spring pass over `get_links_from`
    /// the way an external stepper would drive it.
    #[test]
    fn test_graph_drives_particle_step() {
        let mut graph = Graph::new();
        graph.add_link(("a", "b")).unwrap();
        graph.add_link(("a", "c")).unwrap();

        let names: Vec<String> = graph.nodes().map(|node| node.name.clone()).collect();
        for (i, _) in names.iter().enumerate() {
            let mut particle = Particle::new();
            particle.location.set((i as f64 * 10.0, 0.0, 0.0));
            graph.add_particle(particle);
        }

        let slot = |name: &str| names.iter().position(|n| n == name).unwrap();
        let before = graph.particles()[slot("a")]
            .location
            .distance(&graph.particles()[slot("c")].location);

        let springs: Vec<(usize, usize)> = graph
            .get_links_from("a")
            .values()
            .map(|link| (slot(link.node_from.name.as_str()), slot(link.node_to.name.as_str())))
            .collect();
        assert_eq!(springs.len(), 2);

        let friction = graph.friction();
        let particles = graph.particles_mut();
        for (from, to) in springs {
            let mut pull = particles[to].location - particles[from].location;
            pull.multiply(0.1);
            particles[from].force.add(pull);
            particles[to].force.subtract(pull);
        }
        for particle in particles.iter_mut() {
            let acceleration = particle.force / particle.mass;
            particle.velocity.add(acceleration).multiply(1.0 - friction);
            let velocity = particle.velocity;
            particle.location.add(velocity);
            particle.force.set(Vector::ZERO);
        }

        let after = graph.particles()[slot("a")]
            .location
            .distance(&graph.particles()[slot("c")].location);
        assert!(after < before, "spring pass should pull a and c together");
        assert_eq!(graph.nearest_particle(&Vector::ZERO), Some(slot("a")));
    }

    /// The readme scenario: three nodes, two links, directed lookups.
    #[test]
    fn test_adjacency_scenario() {
        let mut graph = Graph::new();
        for name in ["a", "b", "c"] {
            graph.add_node(name).unwrap();
        }
        graph.add_link(("a", "b")).unwrap();
        graph.add_link(("a", "c")).unwrap();

        let from: Vec<_> = graph.get_links_from("a").into_keys().collect();
        assert_eq!(from, ["b", "c"]);
        let to: Vec<_> = graph.get_links_to("c").into_keys().collect();
        assert_eq!(to, ["a"]);

        assert!(graph.get_link(("c", "a")).is_none());
        assert_eq!(edge_list(&graph), vec![0, 1, 0, 2]);
    }

    /// Seeding from options, then mutating, keeps one link per ordered pair.
    #[test]
    fn test_seeded_graph_merges_runtime_links() {
        let options: GraphOptions = serde_json::from_value(json!({
            "gravity": 1.5,
            "links": [{ "nodeFrom": "x", "nodeTo": "y", "data": { "w": 1 } }]
        }))
        .unwrap();
        let mut graph = Graph::with_options(options).unwrap();

        let w2 = json!({ "w": 2 }).as_object().cloned().unwrap();
        graph.add_link(("x", "y", w2)).unwrap();

        assert_eq!(graph.link_count(), 1);
        let link = graph.get_link("x->y").unwrap();
        assert_eq!(link.data["w"], json!(2));
        assert_eq!(graph.gravity(), 1.5);
    }

    #[test]
    fn test_remove_then_edge_list() {
        let mut graph = Graph::new();
        graph.add_link(("a", "b")).unwrap();
        graph.add_link(("b", "c")).unwrap();

        graph.remove_link(("a", "b")).unwrap();
        graph.remove_node("c").unwrap();

        assert!(edge_list(&graph).is_empty());
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn test_js_numbers_as_ids() {
        assert_eq!(id_from_f64(0.0), Some(0));
        assert_eq!(id_from_f64(7.0), Some(7));
        assert_eq!(id_from_f64(f64::from(u32::MAX)), Some(u32::MAX));

        assert_eq!(id_from_f64(-1.0), None);
        assert_eq!(id_from_f64(1.5), None);
        assert_eq!(id_from_f64(f64::NAN), None);
        assert_eq!(id_from_f64(f64::INFINITY), None);
        assert_eq!(id_from_f64(f64::from(u32::MAX) + 1.0), None);
    }

    #[test]
    fn test_scatter_and_flatten_velocities() {
        let mut graph = Graph::new();
        graph.add_particle(Particle::new());
        graph.add_particle(Particle::new());

        let velocities = [1.0, 0.0, 0.0, 0.0, 2.0, 0.0];
        scatter(graph.particles_mut(), Slot::Velocity, &velocities).unwrap();
        assert_eq!(graph.particles()[1].velocity, Vector::new(0.0, 2.0, 0.0));
        assert_eq!(flatten(graph.particles(), Slot::Velocity), velocities);
        assert_eq!(flatten(graph.particles(), Slot::Force), vec![0.0; 6]);

        let short = scatter(graph.particles_mut(), Slot::Force, &[1.0, 2.0]);
        assert!(matches!(short, Err(GraphError::InvalidInput(_))));
        assert_eq!(graph.particles()[0].force, Vector::ZERO);
    }

    #[test]
    fn test_flatten_locations() {
        let mut graph = Graph::new();
        graph.add_particle(Particle::with(
            Vector::new(1.0, 2.0, 3.0),
            1.0,
            Vector::ZERO,
            Vector::ZERO,
            None,
        ));
        graph.add_particle(Particle::new());

        assert_eq!(
            flatten(graph.particles(), Slot::Location),
            vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0]
        );
    }
}
