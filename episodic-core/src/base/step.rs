//! Environment step.
use crate::record::Record;

/// Represents an observation and reward tuple `(o_t+1, r_t)` emitted by a
/// single-agent environment after applying an action `a_t`.
#[derive(Debug)]
pub struct Step<O> {
    /// Observation.
    pub obs: O,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode has ended.
    pub is_done: bool,

    /// Information defined by the environment.
    pub info: Record,
}

impl<O> Step<O> {
    /// Constructs a [`Step`] object with an empty info record.
    pub fn new(obs: O, reward: f32, is_done: bool) -> Self {
        Self {
            obs,
            reward,
            is_done,
            info: Record::empty(),
        }
    }
}

/// Observation of one named agent in a multi-agent environment.
///
/// `reward` is `None` right after a reset, where no action has been taken yet.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentObs<O> {
    /// Name of the agent, unique within an episode.
    pub name: String,

    /// Observation of the agent.
    pub obs: O,

    /// Reward of the last action of the agent.
    pub reward: Option<f32>,
}

impl<O> AgentObs<O> {
    /// Observation given at the beginning of an episode.
    pub fn initial(name: impl Into<String>, obs: O) -> Self {
        Self {
            name: name.into(),
            obs,
            reward: None,
        }
    }

    /// Observation given after an action.
    pub fn new(name: impl Into<String>, obs: O, reward: f32) -> Self {
        Self {
            name: name.into(),
            obs,
            reward: Some(reward),
        }
    }
}

/// Action of one named agent in a multi-agent environment.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentAct<A> {
    /// Name of the agent.
    pub name: String,

    /// Action.
    pub act: A,
}

/// Represents the outcome of a joint action in a multi-agent environment.
#[derive(Debug)]
pub struct MultiStep<O> {
    /// Observations and rewards, one per agent.
    pub agents: Vec<AgentObs<O>>,

    /// Flag denoting if the episode has ended.
    pub is_done: bool,

    /// Information defined by the environment.
    pub info: Record,
}

impl<O> MultiStep<O> {
    /// Constructs a [`MultiStep`] object with an empty info record.
    pub fn new(agents: Vec<AgentObs<O>>, is_done: bool) -> Self {
        Self {
            agents,
            is_done,
            info: Record::empty(),
        }
    }
}
