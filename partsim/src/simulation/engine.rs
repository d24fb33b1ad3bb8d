//! High-level runtime settings
//!
//! Frame clock for the headless host: step size, number of frames and how
//! often progress is logged. Physical constants live in `PhysicsParams`.

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub dt: f64, // seconds per frame
    pub frames: u64, // frames to run
    pub log_every: u64, // log a progress line every n frames, 0 = never
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            frames: 600,
            log_every: 60,
        }
    }
}
