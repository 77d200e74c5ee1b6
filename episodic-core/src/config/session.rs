//! Configuration of [`Session`](crate::Session).
use super::{AgentConfig, AgentKind, AgentParams, Options, RewardShapingConfig};
use crate::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write, path::Path};

/// Backend family of the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    /// Gym-style environments selected by name.
    Gym,

    /// Environments driven by an external game engine.
    Godot,
}

impl Default for EnvironmentKind {
    fn default() -> Self {
        Self::Gym
    }
}

/// How the scalar episode reward is derived in multi-agent environments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiAgentReward {
    /// Reward of the first agent in the order declared by the environment.
    Primary,

    /// Sum of the rewards of all agents.
    Sum,
}

impl Default for MultiAgentReward {
    fn default() -> Self {
        Self::Primary
    }
}

/// Parameters of a session, as given in parameter files.
///
/// Missing options take their default values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// The number of episodes.
    #[serde(alias = "episode_count")]
    pub num_episodes: usize,

    /// Whether episodes are displayed.
    pub show: bool,

    /// Interval of displayed episodes.
    pub show_every: usize,

    /// Backend family of the environment.
    #[serde(alias = "environment_kind")]
    pub environment_type: EnvironmentKind,

    /// Name of the environment.
    pub environment_name: String,

    /// Agent algorithm.
    #[serde(alias = "agent_kind")]
    pub session_type: AgentKind,

    /// Whether the environment hosts named agents.
    pub is_multi_agent: bool,

    /// Whether the reward series is plotted at the end of the run.
    pub plot: bool,

    /// Whether the reward series is returned by the run.
    pub return_results: bool,

    /// Reward shaping policy.
    pub reward_shaping: RewardShapingConfig,

    /// Episode reward in multi-agent environments.
    pub multi_agent_reward: MultiAgentReward,

    /// Whether the reward series is smoothed with a trailing moving average.
    pub avg_results: bool,

    /// Window of the moving average.
    pub avg_length: usize,

    /// Seed given to the environment factory.
    pub seed: i64,

    /// Options of the agents.
    pub agent_info: AgentParams,

    /// Options of the environment.
    pub environment_info: Options,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            num_episodes: 100,
            show: false,
            show_every: 10,
            environment_type: EnvironmentKind::Gym,
            environment_name: "MountainCar-v0".to_string(),
            session_type: AgentKind::Reinforce,
            is_multi_agent: false,
            plot: false,
            return_results: false,
            reward_shaping: RewardShapingConfig::None,
            multi_agent_reward: MultiAgentReward::Primary,
            avg_results: false,
            avg_length: 100,
            seed: 0,
            agent_info: AgentParams::default(),
            environment_info: Options::new(),
        }
    }
}

impl SessionParams {
    /// Sets the number of episodes.
    pub fn num_episodes(mut self, v: usize) -> Self {
        self.num_episodes = v;
        self
    }

    /// Displays every `show_every` episodes.
    pub fn show(mut self, show_every: usize) -> Self {
        self.show = true;
        self.show_every = show_every;
        self
    }

    /// Sets the environment.
    pub fn environment(mut self, kind: EnvironmentKind, name: impl Into<String>) -> Self {
        self.environment_type = kind;
        self.environment_name = name.into();
        self
    }

    /// Sets the agent algorithm.
    pub fn session_type(mut self, v: AgentKind) -> Self {
        self.session_type = v;
        self
    }

    /// Sets if the environment hosts named agents.
    pub fn multi_agent(mut self, v: bool) -> Self {
        self.is_multi_agent = v;
        self
    }

    /// Sets if the reward series is plotted.
    pub fn plot(mut self, v: bool) -> Self {
        self.plot = v;
        self
    }

    /// Sets if the reward series is returned.
    pub fn return_results(mut self, v: bool) -> Self {
        self.return_results = v;
        self
    }

    /// Sets the reward shaping policy.
    pub fn reward_shaping(mut self, v: RewardShapingConfig) -> Self {
        self.reward_shaping = v;
        self
    }

    /// Sets how the episode reward is derived in multi-agent environments.
    pub fn multi_agent_reward(mut self, v: MultiAgentReward) -> Self {
        self.multi_agent_reward = v;
        self
    }

    /// Smooths the reward series with a trailing moving average of the given window.
    pub fn avg_results(mut self, avg_length: usize) -> Self {
        self.avg_results = true;
        self.avg_length = avg_length;
        self
    }

    /// Sets the seed of the environment.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the options of the agents.
    pub fn agent_info(mut self, v: AgentParams) -> Self {
        self.agent_info = v;
        self
    }

    /// Sets the options of the environment.
    pub fn environment_info(mut self, v: Options) -> Self {
        self.environment_info = v;
        self
    }

    /// Constructs [`SessionParams`] from a YAML or JSON file.
    ///
    /// Besides the flat layout, files with top-level `session_info`,
    /// `agent_info` and `environment_info` sections are accepted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        super::load_session_params(path.as_ref())
    }

    /// Saves [`SessionParams`] as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Validated configuration of a session.
///
/// It is not modified after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    episode_count: usize,
    show: bool,
    show_every: usize,
    environment_kind: EnvironmentKind,
    environment_name: String,
    is_multi_agent: bool,
    plot: bool,
    return_results: bool,
    reward_shaping: RewardShapingConfig,
    multi_agent_reward: MultiAgentReward,
    avg_results: bool,
    avg_length: usize,
    seed: i64,
    agent: AgentConfig,
    environment_options: Options,
}

impl SessionConfig {
    /// Validates parameters and builds the configuration, agent configuration first.
    pub fn build(params: &SessionParams) -> Result<Self, ConfigError> {
        if params.show_every == 0 {
            return Err(ConfigError::InvalidValue {
                key: "show_every".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if params.avg_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "avg_length".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if params.environment_name.is_empty() {
            return Err(ConfigError::MissingKey("environment_name".to_string()));
        }

        let agent = AgentConfig::new(params.session_type, &params.agent_info);

        Ok(Self {
            episode_count: params.num_episodes,
            show: params.show,
            show_every: params.show_every,
            environment_kind: params.environment_type,
            environment_name: params.environment_name.clone(),
            is_multi_agent: params.is_multi_agent,
            plot: params.plot,
            return_results: params.return_results,
            reward_shaping: params.reward_shaping.clone(),
            multi_agent_reward: params.multi_agent_reward,
            avg_results: params.avg_results,
            avg_length: params.avg_length,
            seed: params.seed,
            agent,
            environment_options: params.environment_info.clone(),
        })
    }

    /// Returns a configuration whose agent configuration is replaced.
    pub(crate) fn with_agent(&self, agent: AgentConfig) -> Self {
        Self {
            agent,
            ..self.clone()
        }
    }

    /// The number of episodes.
    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    /// Returns `true` if the given episode is displayed.
    pub fn is_shown(&self, episode: usize) -> bool {
        self.show && episode % self.show_every == 0
    }

    /// Interval of displayed episodes.
    pub fn show_every(&self) -> usize {
        self.show_every
    }

    /// Backend family of the environment.
    pub fn environment_kind(&self) -> EnvironmentKind {
        self.environment_kind
    }

    /// Name of the environment.
    pub fn environment_name(&self) -> &str {
        &self.environment_name
    }

    /// Agent algorithm.
    pub fn agent_kind(&self) -> AgentKind {
        self.agent.kind()
    }

    /// Whether the environment hosts named agents.
    pub fn is_multi_agent(&self) -> bool {
        self.is_multi_agent
    }

    /// Whether the reward series is plotted.
    pub fn plot(&self) -> bool {
        self.plot
    }

    /// Whether the reward series is returned.
    pub fn return_results(&self) -> bool {
        self.return_results
    }

    /// Reward shaping policy.
    pub fn reward_shaping(&self) -> &RewardShapingConfig {
        &self.reward_shaping
    }

    /// Episode reward in multi-agent environments.
    pub fn multi_agent_reward(&self) -> MultiAgentReward {
        self.multi_agent_reward
    }

    /// Window of the moving average, if the series is smoothed.
    pub fn smoothing_window(&self) -> Option<usize> {
        if self.avg_results {
            Some(self.avg_length)
        } else {
            None
        }
    }

    /// Seed of the environment.
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Configuration of the agents.
    pub fn agent(&self) -> &AgentConfig {
        &self.agent
    }

    /// Options of the environment.
    pub fn environment_options(&self) -> &Options {
        &self.environment_options
    }
}
