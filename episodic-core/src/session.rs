//! Run of a configured number of episodes.
use crate::{
    config::{SessionConfig, SessionParams},
    error::{ConfigError, RunAborted},
    record::{NullRecorder, Record, RecordStorage, RecordValue, Recorder},
    shaping::build_shaper,
    util::moving_average,
    Act, AgentHandle, AgentRegistry, EnvHandle, EnvRegistry, EnvSpec, EpisodeResult,
    EpisodeRunner, LabeledSeries, NullPlotter, Obs, Plotter,
};
use anyhow::Result;
use log::{debug, info};
use std::collections::HashSet;

/// Rewards of the episodes of a session, in episode order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RewardSeries(Vec<f32>);

impl RewardSeries {
    /// Constructs an empty series.
    pub fn new() -> Self {
        Self(vec![])
    }

    /// Appends the reward of the next episode.
    pub fn push(&mut self, reward: f32) {
        self.0.push(reward);
    }

    /// The number of episodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no episode has completed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rewards as a slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Returns the trailing moving average of the series.
    pub fn smoothed(&self, window: usize) -> Self {
        Self(moving_average(&self.0, window))
    }

    /// Consumes the series and returns the rewards.
    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for RewardSeries {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// One configured run of episodes with a fixed agent and environment pairing.
///
/// # Construction
///
/// [`Session::build`] resolves everything before any episode is executed:
///
/// 1. Parameters are validated into a [`SessionConfig`].
/// 2. The agent kind must be present in the [`AgentRegistry`].
/// 3. The environment is built by the [`EnvRegistry`] and must be multi-agent
///    exactly when the session is configured so.
/// 4. If the agent kind requires observation bounds, they are taken from the
///    environment and injected into the agent configuration.
/// 5. One agent is built, or one per agent name declared by a multi-agent
///    environment.
///
/// # Run
///
/// Episodes are executed strictly one after another with an [`EpisodeRunner`]:
///
/// ```mermaid
/// graph LR
///     S[Session]-->|episode i|R[EpisodeRunner]
///     R-->|act|E[Env]
///     E-->|obs, reward, done|R
///     R-->|start/step/end|A[Agent]
///     A-->|act|R
///     R-->|EpisodeResult|S
///     S-->|RewardSeries|P[Plotter]
/// ```
///
/// The total reward of each episode is appended to a [`RewardSeries`], which
/// is optionally smoothed with a trailing moving average, plotted, and
/// returned.
pub struct Session<O, A> {
    config: SessionConfig,
    env: EnvHandle<O, A>,
    agents: AgentHandle<O, A>,
    runner: EpisodeRunner,
    plotter: Box<dyn Plotter>,
}

impl<O, A> Session<O, A>
where
    O: Obs,
    A: Act,
{
    /// Builds a session from parameters.
    pub fn build(
        params: &SessionParams,
        envs: &EnvRegistry<O, A>,
        agents: &AgentRegistry<O, A>,
    ) -> Result<Self> {
        let config = SessionConfig::build(params)?;
        Self::from_config(config, envs, agents)
    }

    /// Builds a session from a validated configuration.
    pub fn from_config(
        config: SessionConfig,
        envs: &EnvRegistry<O, A>,
        agents: &AgentRegistry<O, A>,
    ) -> Result<Self> {
        let kind = config.agent_kind();
        if !agents.contains(kind) {
            return Err(ConfigError::UnsupportedAgent(kind).into());
        }

        let spec = EnvSpec {
            name: config.environment_name().to_string(),
            options: config.environment_options().clone(),
            seed: config.seed(),
        };
        let env = envs.build(config.environment_kind(), &spec)?;
        if env.is_multi_agent() != config.is_multi_agent() {
            return Err(ConfigError::AgentArityMismatch {
                env: spec.name,
                expected: arity(config.is_multi_agent()),
                actual: arity(env.is_multi_agent()),
            }
            .into());
        }

        let config = if kind.requires_observation_bounds() {
            let bounds = env
                .observation_bounds()
                .ok_or_else(|| ConfigError::MissingObservationBounds {
                    agent: kind,
                    env: spec.name.clone(),
                })?;
            let agent = config.agent().with_observation_bounds(bounds);
            config.with_agent(agent)
        } else {
            config
        };

        let agent_handle = match env.agent_names() {
            None => AgentHandle::Single(agents.build(config.agent())?),
            Some(names) => {
                let unique: HashSet<&String> = names.iter().collect();
                if names.is_empty() || unique.len() != names.len() {
                    return Err(ConfigError::InvalidAgentNames(names).into());
                }
                let named = names
                    .into_iter()
                    .map(|name| -> Result<_> { Ok((name, agents.build(config.agent())?)) })
                    .collect::<Result<Vec<_>>>()?;
                AgentHandle::Multi(named)
            }
        };

        info!(
            "Built session: {:?} agent(s) of kind {:?} on {:?} ({:?})",
            agent_handle.len(),
            kind,
            config.environment_name(),
            config.environment_kind()
        );

        let runner = EpisodeRunner::new(
            build_shaper(config.reward_shaping()),
            kind.requires_consolidation(),
            config.multi_agent_reward(),
        );

        Ok(Self {
            config,
            env,
            agents: agent_handle,
            runner,
            plotter: Box::new(NullPlotter),
        })
    }

    /// Sets the plotter receiving the reward series when plotting is enabled.
    pub fn with_plotter(mut self, plotter: Box<dyn Plotter>) -> Self {
        self.plotter = plotter;
        self
    }

    /// Configuration of the session.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Runs one episode.
    pub fn episode(&mut self, episode: usize) -> Result<EpisodeResult> {
        let show = self.config.is_shown(episode);
        if show {
            info!("EPISODE: {}", episode);
        }
        self.runner.run(&mut self.env, &mut self.agents, show)
    }

    /// Runs all the episodes and returns the reward series if `return_results` is set.
    pub fn run(&mut self) -> Result<Option<RewardSeries>> {
        self.run_with_recorder(&mut NullRecorder::default())
    }

    /// Runs all the episodes, writing a record per episode to `recorder`.
    pub fn run_with_recorder(&mut self, recorder: &mut dyn Recorder) -> Result<Option<RewardSeries>> {
        let rewards = self.run_episodes(recorder)?;

        if self.config.plot() {
            let series = LabeledSeries::new(self.config.environment_name(), rewards.as_slice().to_vec());
            self.plotter.plot(self.config.environment_name(), &[series])?;
        }

        Ok(if self.config.return_results() {
            Some(rewards)
        } else {
            None
        })
    }

    /// Runs all the episodes and returns the reward series, smoothed if configured.
    ///
    /// If an episode fails, the error is a [`RunAborted`] holding the rewards
    /// of the completed episodes.
    pub fn run_episodes(&mut self, recorder: &mut dyn Recorder) -> Result<RewardSeries> {
        let mut rewards = RewardSeries::new();
        let mut storage = RecordStorage::new();

        for episode in 0..self.config.episode_count() {
            let result = match self.episode(episode) {
                Ok(result) => result,
                Err(source) => {
                    return Err(RunAborted {
                        episode,
                        completed: rewards,
                        source,
                    }
                    .into())
                }
            };
            debug!(
                "Episode {}: reward = {}, success = {}, {} steps",
                episode, result.total_reward, result.success, result.n_steps
            );
            rewards.push(result.total_reward);

            let record = episode_record(episode, self.config.environment_name(), &result);
            storage.store(record.clone());
            recorder.write(record);
        }

        if !storage.is_empty() {
            log_summary(storage.aggregate());
        }

        Ok(match self.config.smoothing_window() {
            Some(window) => rewards.smoothed(window),
            None => rewards,
        })
    }
}

fn arity(is_multi_agent: bool) -> &'static str {
    if is_multi_agent {
        "multi-agent"
    } else {
        "single-agent"
    }
}

fn episode_record(episode: usize, environment: &str, result: &EpisodeResult) -> Record {
    Record::from_slice(&[
        ("environment", RecordValue::String(environment.to_string())),
        ("episode", RecordValue::Scalar(episode as f32)),
        ("episode_reward", RecordValue::Scalar(result.total_reward)),
        ("success", RecordValue::Scalar(if result.success { 1.0 } else { 0.0 })),
        ("n_steps", RecordValue::Scalar(result.n_steps as f32)),
    ])
}

fn log_summary(record: Record) {
    let mut keys: Vec<&String> = record.keys().collect();
    keys.sort();
    info!("Summary of the session");
    for key in keys {
        match record.get(key) {
            Some(RecordValue::Scalar(v)) => info!("  {} = {}", key, v),
            Some(RecordValue::String(s)) => info!("  {} = {}", key, s),
            None => {}
        }
    }
}
