pub mod simulation;
pub mod configuration;
pub mod runner;
pub mod benchmark;

pub use simulation::states::{Particle, ElasticBody, HardBody, NVec3};
pub use simulation::plane::{Plane, PlaneExtent, PlaneHit};
pub use simulation::params::{PhysicsParams, ResponseMode, DampeningSource};
pub use simulation::registry::{ParticleRegistry, ParticleRef, WorkingSet};
pub use simulation::collision::{CollisionResolver, CollisionStats};
pub use simulation::penetration::prevent_penetration;
pub use simulation::controller::{PhysicsController, StepReport};
pub use simulation::engine::Engine;
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, PhysicsConfig, EngineConfig, ParticleConfig, ElasticBodyConfig, HardBodyConfig};
pub use configuration::error::ConfigError;

pub use runner::headless::{run_headless, RunSummary};

pub use benchmark::benchmark::bench_step;
