pub extern crate nalgebra as na;

pub mod config;
pub mod frames;
pub mod propagator;
pub mod ranking;
pub mod report;
pub mod scheduler;
pub mod source;
pub mod store;
pub mod system;
pub mod units;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// A component driven by one of the periodic loops.
pub trait PeriodicComponent {
    /// What the component needs from the outside world on each tick
    type Environment;

    /// The value produced by a tick
    type Output;

    fn tick(&self, now: units::Timestamp, env: &Self::Environment) -> Self::Output;
}
