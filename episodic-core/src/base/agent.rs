//! Agent.
use anyhow::Result;

/// Represents a learning agent acting on observations of type `O` with
/// actions of type `A`.
///
/// The reward of an action is reported to the agent together with the
/// observation that followed the action, one step delayed:
/// `start(o_0) -> a_0`, `step(o_1, r_0) -> a_1`, ..., `end(o_T, r_{T-1})`.
pub trait Agent<O, A> {
    /// Returns the first action of an episode.
    fn start(&mut self, obs: &O) -> Result<A>;

    /// Receives the reward of the previous action and returns the next action.
    fn step(&mut self, obs: &O, reward: f32) -> Result<A>;

    /// Receives the terminal observation and the reward of the last action.
    fn end(&mut self, obs: &O, reward: f32) -> Result<()>;

    /// Consolidates the experience of the episode.
    ///
    /// On-policy algorithms updating from returns do their update here.
    fn learn_from_experience(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Agents owned by a session.
pub enum AgentHandle<O, A> {
    /// The agent of a single-agent environment.
    Single(Box<dyn Agent<O, A>>),

    /// Named agents, in the order declared by the environment.
    Multi(Vec<(String, Box<dyn Agent<O, A>>)>),
}

impl<O, A> AgentHandle<O, A> {
    /// Number of agents.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi(agents) => agents.len(),
        }
    }

    /// Returns `true` if there is no agent.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
