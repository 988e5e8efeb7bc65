//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) spatial queries over particle locations for:
//! - Nearest neighbor
//! - Point-in-radius

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::physics::{Particle, Vector};

/// A particle location tagged with its slot in the graph's particle list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePoint {
    /// Index into the particle list.
    pub index: usize,
    /// Location at the time the index was built.
    pub location: [f64; 3],
}

impl ParticlePoint {
    /// Create a new ParticlePoint.
    pub fn new(index: usize, location: &Vector) -> Self {
        Self {
            index,
            location: location.to_array(),
        }
    }
}

impl RTreeObject for ParticlePoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.location)
    }
}

impl PointDistance for ParticlePoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.location[0] - point[0];
        let dy = self.location[1] - point[1];
        let dz = self.location[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Spatial index for particles.
///
/// Uses an R*-tree. The index is a snapshot; rebuild it after particles move.
pub struct SpatialIndex {
    tree: RTree<ParticlePoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Find the particle nearest to a point.
    pub fn nearest(&self, point: &Vector) -> Option<usize> {
        self.tree
            .nearest_neighbor(&point.to_array())
            .map(|p| p.index)
    }

    /// Find all particles within a radius of a point.
    pub fn in_radius(&self, point: &Vector, radius: f64) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .tree
            .locate_within_distance(point.to_array(), radius * radius)
            .map(|p| p.index)
            .collect();
        found.sort_unstable();
        found
    }

    /// Rebuild the index from the current particle list.
    ///
    /// Bulk loading beats incremental inserts after a simulation tick moves everything.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        let points: Vec<_> = particles
            .iter()
            .enumerate()
            .map(|(index, particle)| ParticlePoint::new(index, &particle.location))
            .collect();

        self.tree = RTree::bulk_load(points);
    }

    /// Clear all particles from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Get the number of particles in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
