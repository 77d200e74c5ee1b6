//! Configuration of agents and their function approximators.
use super::Options;
use crate::ObservationBounds;
use serde::{Deserialize, Serialize};

/// Supported agent algorithms.
///
/// The serialized names follow the session type selectors of parameter files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentKind {
    /// Deep Q-network.
    #[serde(rename = "DQN", alias = "DQN test")]
    Dqn,

    /// Tabular TD control over a tile-coded observation space.
    #[serde(rename = "tile coder", alias = "tile coder test")]
    TileCoder,

    /// Monte-Carlo policy gradient.
    #[serde(rename = "REINFORCE")]
    Reinforce,

    /// Monte-Carlo policy gradient with a learned baseline.
    #[serde(rename = "REINFORCE with baseline")]
    ReinforceWithBaseline,

    /// One-step actor-critic.
    #[serde(rename = "actor-critic")]
    ActorCritic,

    /// Uniformly random actions, as a baseline.
    #[serde(rename = "random")]
    Random,
}

impl AgentKind {
    /// Returns `true` if the agent needs the observation bounds of the
    /// environment to be constructed.
    pub fn requires_observation_bounds(&self) -> bool {
        matches!(self, Self::TileCoder)
    }

    /// Returns `true` if the agent updates from returns after each episode,
    /// through [`Agent::learn_from_experience`](crate::Agent::learn_from_experience).
    pub fn requires_consolidation(&self) -> bool {
        matches!(self, Self::Reinforce | Self::ReinforceWithBaseline)
    }
}

impl Default for AgentKind {
    fn default() -> Self {
        Self::Reinforce
    }
}

/// Options of a function approximator, as given in parameter files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionApproximatorParams {
    /// Options, including `type`.
    #[serde(flatten)]
    pub options: Options,
}

/// Options of an agent, as given in parameter files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentParams {
    /// Options of the agent.
    #[serde(flatten)]
    pub options: Options,

    /// Options of the function approximator of the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_approximator_info: Option<FunctionApproximatorParams>,
}

/// Configuration of a function approximator.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionApproximatorConfig {
    kind: Option<String>,
    options: Options,
    env_bounds: Option<ObservationBounds>,
}

impl FunctionApproximatorConfig {
    /// Builds the configuration from parameters.
    pub fn new(params: &FunctionApproximatorParams) -> Self {
        let kind = params
            .options
            .get("type")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Self {
            kind,
            options: params.options.clone(),
            env_bounds: None,
        }
    }

    /// Type of the approximator, e.g. `"tile coder"` or `"neural network"`.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Options of the approximator.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Observation bounds of the environment, when injected.
    pub fn env_bounds(&self) -> Option<&ObservationBounds> {
        self.env_bounds.as_ref()
    }

    fn with_bounds(&self, bounds: ObservationBounds) -> Self {
        Self {
            env_bounds: Some(bounds),
            ..self.clone()
        }
    }
}

/// Configuration of an agent, handed to the factory of its kind.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig {
    kind: AgentKind,
    options: Options,
    function_approximator: Option<FunctionApproximatorConfig>,
}

impl AgentConfig {
    /// Builds the configuration of an agent of the given kind.
    pub fn new(kind: AgentKind, params: &AgentParams) -> Self {
        Self {
            kind,
            options: params.options.clone(),
            function_approximator: params
                .function_approximator_info
                .as_ref()
                .map(FunctionApproximatorConfig::new),
        }
    }

    /// Kind of the agent.
    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Options of the agent.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Configuration of the function approximator, if any.
    pub fn function_approximator(&self) -> Option<&FunctionApproximatorConfig> {
        self.function_approximator.as_ref()
    }

    /// Returns a configuration with the observation bounds of the environment
    /// injected into the function approximator.
    ///
    /// A function approximator section is created if there is none.
    pub fn with_observation_bounds(&self, bounds: ObservationBounds) -> Self {
        let fa = match &self.function_approximator {
            Some(fa) => fa.with_bounds(bounds),
            None => FunctionApproximatorConfig::new(&FunctionApproximatorParams::default())
                .with_bounds(bounds),
        };
        Self {
            function_approximator: Some(fa),
            ..self.clone()
        }
    }
}
