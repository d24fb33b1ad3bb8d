//! Configuration types for loading simulation scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`EngineConfig`]      frame clock (dt, number of frames, logging cadence)
//! - [`PhysicsConfig`]     simulation-wide constants
//! - [`ParticleConfig`]    free particles and the particles of elastic bodies
//! - [`ElasticBodyConfig`] named particle groups
//! - [`HardBodyConfig`]    rigid obstacles with their plane
//! - [`ScenarioConfig`]    top-level wrapper
//!
//! Every section and most fields are optional and fall back to defaults.
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   dt: 0.016666667
//!   frames: 600
//!
//! physics:
//!   gravitational_force: -0.1
//!   avg_weight: 0.0
//!   energy_leak_upon_bounce: 0.9
//!   coefficient_of_repulsion: 10.0
//!   response: "sequential"     # or "snapshot"
//!   dampening: "partner"       # or "self"
//!
//! particles:
//!   - x: [0.0, 2.0, 0.0]
//!     radius: 0.5
//!
//! elastic_bodies:
//!   - name: "jelly"
//!     particles:
//!       - x: [1.0, 3.0, 0.0]
//!         radius: 0.4
//!
//! hard_bodies:
//!   - x: [0.0, 0.0, 0.0]
//!     normal: [0.0, 1.0, 0.0]
//!     standoff: 0.5
//!     extent: { u_axis: [1.0, 0.0, 0.0], half_u: 5.0, half_v: 5.0 }
//! ```

use std::io::Read;

use serde::Deserialize;

use nalgebra::Unit;

use crate::configuration::error::{ConfigError, Result};
use crate::simulation::plane::MIN_AXIS_NORM;
use crate::simulation::states::NVec3;

/// How the collision response combines several neighbours
/// `response: "sequential"` or `response: "snapshot"`
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseConfig {
    #[default]
    #[serde(rename = "sequential")] // in-place per pair, order dependent
    Sequential,

    #[serde(rename = "snapshot")] // summed against the pre-pass velocity
    Snapshot,
}

/// Whose dampening attenuates a collided particle
/// `dampening: "partner"` or `dampening: "self"`
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DampeningConfig {
    #[default]
    #[serde(rename = "partner")]
    Partner,

    #[serde(rename = "self")]
    SelfIndexed,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub dt: f64, // seconds per frame
    pub frames: u64, // number of frames the headless runner executes
    pub log_every: u64, // progress line cadence, 0 disables
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            frames: 600,
            log_every: 60,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravitational_force: f64,
    pub avg_weight: f64,
    pub energy_leak_upon_bounce: f64,
    pub coefficient_of_repulsion: f64,
    pub response: ResponseConfig,
    pub dampening: DampeningConfig,
    pub gravity_on_hard_bodies: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_force: -0.1,
            avg_weight: 0.0,
            energy_leak_upon_bounce: 0.9,
            coefficient_of_repulsion: 10.0,
            response: ResponseConfig::Sequential,
            dampening: DampeningConfig::Partner,
            gravity_on_hard_bodies: false,
        }
    }
}

fn zero3() -> Vec<f64> {
    vec![0.0; 3]
}

fn one() -> f64 {
    1.0
}

/// Initial state of one particle
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub x: Vec<f64>, // center
    #[serde(default = "zero3")]
    pub v: Vec<f64>, // velocity, displacement per frame
    pub radius: f64,
    #[serde(default = "one")]
    pub weight_coefficient: f64,
    #[serde(default = "one")]
    pub bouncy_factor: f64,
    #[serde(default = "one")]
    pub dampening_effect: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ElasticBodyConfig {
    #[serde(default)]
    pub name: String,
    pub particles: Vec<ParticleConfig>,
}

/// Rectangle bounding a plane, see `PlaneExtent`
#[derive(Deserialize, Debug, Clone)]
pub struct ExtentConfig {
    pub u_axis: Vec<f64>,
    pub half_u: f64,
    pub half_v: f64,
}

/// Rigid obstacle: a collidable point plus a plane through it
#[derive(Deserialize, Debug, Clone)]
pub struct HardBodyConfig {
    pub x: Vec<f64>,
    pub normal: Vec<f64>,
    #[serde(default)]
    pub radius: f64, // collision radius of the body itself
    #[serde(default)]
    pub standoff: f64, // distance kept between stopped particles and the surface
    #[serde(default = "one")]
    pub weight_coefficient: f64,
    #[serde(default = "one")]
    pub dampening_effect: f64,
    #[serde(default)]
    pub extent: Option<ExtentConfig>,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub physics: PhysicsConfig,
    pub particles: Vec<ParticleConfig>,
    pub elastic_bodies: Vec<ElasticBodyConfig>,
    pub hard_bodies: Vec<HardBodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Reject inputs the core assumes never happen
    pub fn validate(&self) -> Result<()> {
        if !self.engine.dt.is_finite() || self.engine.dt <= 0.0 {
            return Err(ConfigError::NonPositiveDt(self.engine.dt));
        }

        let p = &self.physics;
        finite("physics.gravitational_force", p.gravitational_force)?;
        finite("physics.avg_weight", p.avg_weight)?;
        finite("physics.energy_leak_upon_bounce", p.energy_leak_upon_bounce)?;
        finite("physics.coefficient_of_repulsion", p.coefficient_of_repulsion)?;

        for (i, pc) in self.particles.iter().enumerate() {
            pc.validate(&format!("particles[{i}]"))?;
        }
        for (b, eb) in self.elastic_bodies.iter().enumerate() {
            for (i, pc) in eb.particles.iter().enumerate() {
                pc.validate(&format!("elastic_bodies[{b}].particles[{i}]"))?;
            }
        }
        for (i, hb) in self.hard_bodies.iter().enumerate() {
            hb.validate(i)?;
        }
        Ok(())
    }
}

impl ParticleConfig {
    fn validate(&self, path: &str) -> Result<()> {
        vec3(&format!("{path}.x"), &self.x)?;
        vec3(&format!("{path}.v"), &self.v)?;
        non_negative(&format!("{path}.radius"), self.radius)?;
        non_negative(&format!("{path}.weight_coefficient"), self.weight_coefficient)?;
        finite(&format!("{path}.bouncy_factor"), self.bouncy_factor)?;
        finite(&format!("{path}.dampening_effect"), self.dampening_effect)
    }
}

impl HardBodyConfig {
    fn validate(&self, index: usize) -> Result<()> {
        let path = format!("hard_bodies[{index}]");
        vec3(&format!("{path}.x"), &self.x)?;
        let n = vec3(&format!("{path}.normal"), &self.normal)?;
        let n = Unit::try_new(n, MIN_AXIS_NORM).ok_or(ConfigError::ZeroNormal { index })?;
        non_negative(&format!("{path}.radius"), self.radius)?;
        non_negative(&format!("{path}.standoff"), self.standoff)?;
        non_negative(&format!("{path}.weight_coefficient"), self.weight_coefficient)?;
        finite(&format!("{path}.dampening_effect"), self.dampening_effect)?;

        if let Some(ext) = &self.extent {
            let u = vec3(&format!("{path}.extent.u_axis"), &ext.u_axis)?;
            non_negative(&format!("{path}.extent.half_u"), ext.half_u)?;
            non_negative(&format!("{path}.extent.half_v"), ext.half_v)?;

            // length of the part of u lying in the plane
            if n.cross(&u).norm() <= MIN_AXIS_NORM {
                return Err(ConfigError::BadExtentAxis { index });
            }
        }
        Ok(())
    }
}

// helpers ==============================================================================

fn finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field: field.to_string() })
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field: field.to_string(), value });
    }
    Ok(())
}

fn vec3(field: &str, v: &[f64]) -> Result<NVec3> {
    let arr: [f64; 3] = v
        .try_into()
        .map_err(|_| ConfigError::BadVector { field: field.to_string(), len: v.len() })?;
    for c in arr {
        finite(field, c)?;
    }
    Ok(NVec3::from(arr))
}
