//! Core functionalities.
mod agent;
mod env;
mod step;
pub use agent::{Agent, AgentHandle};
pub use env::{EnvHandle, Env, MultiAgentEnv, ObservationBounds};
use std::fmt::Debug;
pub use step::{AgentAct, AgentObs, MultiStep, Step};

/// An observation of an environment.
///
/// Reward shaping policies read coordinates of the observation, thus
/// it must be viewable as a slice of `f32`.
pub trait Obs: Clone + Debug {
    /// Returns the coordinates of the observation.
    fn as_slice(&self) -> &[f32];

    /// Returns the number of coordinates.
    fn len(&self) -> usize {
        self.as_slice().len()
    }
}

/// An action of an environment.
pub trait Act: Clone + Debug {}

impl Obs for Vec<f32> {
    fn as_slice(&self) -> &[f32] {
        &self[..]
    }
}

impl Act for i64 {}
