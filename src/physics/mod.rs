//! Vector math and particle state for force-directed layout.
//!
//! This module holds the primitives an external simulation step works on.
//! No integration, attraction or repulsion happens here.

mod particle;
mod vector;

pub use particle::{DEFAULT_MASS, Particle, ParticleSpec, now_ms};
pub use vector::{Operand, Vector};
