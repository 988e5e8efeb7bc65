//! Physical state of a simulated body.
//!
//! A particle is plain data. The simulation step (outside this crate) reads
//! and writes `location`, `velocity` and `force` each tick.

use serde::{Deserialize, Serialize};

use super::vector::Vector;

/// Default particle mass.
pub const DEFAULT_MASS: f64 = 1.0;

/// Position, motion and lifetime of one body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub location: Vector,
    pub velocity: Vector,
    pub force: Vector,
    pub mass: f64,
    /// Creation time, milliseconds since the Unix epoch.
    pub birth: f64,
    /// Expiry time in the same clock as `birth`. `None` means never.
    pub death: Option<f64>,
}

/// Optional fields for building a particle from a single record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleSpec {
    pub location: Option<Vector>,
    pub velocity: Option<Vector>,
    pub force: Option<Vector>,
    pub mass: Option<f64>,
    pub death: Option<f64>,
}

impl Particle {
    /// A particle at rest at the origin with unit mass.
    pub fn new() -> Self {
        Self::from_spec(ParticleSpec::default())
    }

    /// Build from positional values.
    pub fn with(
        location: Vector,
        mass: f64,
        force: Vector,
        velocity: Vector,
        death: Option<f64>,
    ) -> Self {
        Self {
            location,
            velocity,
            force,
            mass,
            birth: now_ms(),
            death,
        }
    }

    /// Build from a spec; missing fields take their defaults.
    ///
    /// Non-positive mass falls back to the default.
    pub fn from_spec(spec: ParticleSpec) -> Self {
        let mass = spec.mass.filter(|m| *m > 0.0).unwrap_or(DEFAULT_MASS);
        Self::with(
            spec.location.unwrap_or_default(),
            mass,
            spec.force.unwrap_or_default(),
            spec.velocity.unwrap_or_default(),
            spec.death,
        )
    }

    /// Whether the particle is alive at time `t` (same clock as `birth`).
    pub fn is_alive_at(&self, t: f64) -> bool {
        t >= self.birth && self.death.is_none_or(|death| t < death)
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ParticleSpec> for Particle {
    fn from(spec: ParticleSpec) -> Self {
        Self::from_spec(spec)
    }
}

/// Wall-clock milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
