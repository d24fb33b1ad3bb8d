pub mod states;
pub mod params;
pub mod engine;
pub mod plane;
pub mod registry;
pub mod gravity;
pub mod collision;
pub mod penetration;
pub mod controller;
pub mod scenario;
