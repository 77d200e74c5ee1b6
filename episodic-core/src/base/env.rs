//! Environment.
use super::{AgentAct, AgentObs, MultiStep, Step};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Lower and upper bounds of the observation space.
///
/// Agents discretizing the observation space, like a tile coder, need them
/// when they are constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationBounds {
    /// Lower bounds of the coordinates.
    pub low: Vec<f32>,

    /// Upper bounds of the coordinates.
    pub high: Vec<f32>,
}

impl ObservationBounds {
    /// Constructs bounds, checking that `low` and `high` have the same length.
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Result<Self> {
        if low.len() != high.len() {
            anyhow::bail!(
                "Observation bounds of different lengths: low={}, high={}",
                low.len(),
                high.len()
            );
        }
        Ok(Self { low, high })
    }
}

/// Represents a single-agent environment, typically an MDP.
pub trait Env {
    /// Observation of the environment.
    type Obs;

    /// Action of the environment.
    type Act;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performes an environment step.
    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>>;

    /// Renders the environment.
    ///
    /// Non-visual backends do nothing.
    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    /// Bounds of the observation space, if the backend exposes them.
    fn observation_bounds(&self) -> Option<ObservationBounds> {
        None
    }
}

/// Represents an environment shared by a number of named agents.
pub trait MultiAgentEnv {
    /// Observation of an agent.
    type Obs;

    /// Action of an agent.
    type Act;

    /// Names of the agents in the order the environment reports them.
    fn agent_names(&self) -> Vec<String>;

    /// Resets the environment and returns the initial observation of every agent.
    ///
    /// Engine-driven backends decide at reset whether the episode is rendered.
    fn reset(&mut self, render: bool) -> Result<Vec<AgentObs<Self::Obs>>>;

    /// Applies one action per agent.
    fn step(&mut self, acts: &[AgentAct<Self::Act>]) -> Result<MultiStep<Self::Obs>>;

    /// Renders the environment.
    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    /// Bounds of the observation space, if the backend exposes them.
    fn observation_bounds(&self) -> Option<ObservationBounds> {
        None
    }
}

/// An environment owned by a session.
pub enum EnvHandle<O, A> {
    /// Single-agent environment.
    Single(Box<dyn Env<Obs = O, Act = A>>),

    /// Multi-agent environment.
    Multi(Box<dyn MultiAgentEnv<Obs = O, Act = A>>),
}

impl<O, A> EnvHandle<O, A> {
    /// Returns `true` for a multi-agent environment.
    pub fn is_multi_agent(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    /// Bounds of the observation space, if the backend exposes them.
    pub fn observation_bounds(&self) -> Option<ObservationBounds> {
        match self {
            Self::Single(env) => env.observation_bounds(),
            Self::Multi(env) => env.observation_bounds(),
        }
    }

    /// Names of the agents acting in the environment.
    ///
    /// `None` for a single-agent environment.
    pub fn agent_names(&self) -> Option<Vec<String>> {
        match self {
            Self::Single(_) => None,
            Self::Multi(env) => Some(env.agent_names()),
        }
    }
}
