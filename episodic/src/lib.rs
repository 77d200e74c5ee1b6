#![warn(missing_docs)]
//! Reinforcement learning experiments on classic control environments.
//!
//! The workspace consists of the following crates:
//!
//! * [`episodic_core`] provides the capability traits of environments and
//!   agents, configuration, the session controller and experiment sweeps.
//! * [`episodic_classic_env`] implements `CartPole-v0` and `MountainCar-v0`.
//! * [`episodic_plotters`] writes reward series to SVG files.
//! * This crate registers the built-in agents and environments and provides
//!   the `episodic` command.
//!
//! ```no_run
//! use episodic::{agent_registry, env_registry};
//! use episodic_core::{config::SessionParams, Session};
//!
//! # fn main() -> anyhow::Result<()> {
//! let params = SessionParams::load("session.yaml")?;
//! let mut session = Session::build(&params, &env_registry(), &agent_registry())?;
//! let rewards = session.run()?;
//! # Ok(())
//! # }
//! ```
mod random_agent;
use anyhow::Result;
use episodic_core::{
    config::{AgentKind, EnvironmentKind, SessionParams},
    Agent, AgentRegistry, EnvRegistry, Experiment, ExperimentConfig, LabeledSeries, RewardSeries,
    Session,
};
use episodic_plotters::SvgPlotter;
use log::info;
pub use random_agent::{RandomAgent, RandomAgentConfig};
use std::path::Path;

/// Observation of the built-in environments.
pub type Obs = Vec<f32>;

/// Action of the built-in environments.
pub type Act = i64;

/// Registry of the built-in agents.
///
/// Only [`AgentKind::Random`] is available: learning algorithms are provided
/// by registering their factories.
pub fn agent_registry() -> AgentRegistry<Obs, Act> {
    AgentRegistry::new().register(AgentKind::Random, |config| {
        let config = RandomAgentConfig::from_agent_config(config)?;
        Ok(Box::new(RandomAgent::build(&config)) as Box<dyn Agent<Obs, Act>>)
    })
}

/// Registry of the built-in environments, the classic control environments
/// of the `gym` kind.
pub fn env_registry() -> EnvRegistry<Obs, Act> {
    EnvRegistry::new().register(EnvironmentKind::Gym, episodic_classic_env::build)
}

/// Runs a session configured by a parameter file.
///
/// The reward series is plotted to `plot_path` if plotting is enabled in the file.
pub fn run_session(config: impl AsRef<Path>, plot_path: impl AsRef<Path>) -> Result<Option<RewardSeries>> {
    let params = SessionParams::load(config)?;
    let mut session = Session::build(&params, &env_registry(), &agent_registry())?
        .with_plotter(Box::new(SvgPlotter::new(plot_path)));
    let rewards = session.run()?;
    if let Some(rewards) = &rewards {
        info!("Rewards: {:?}", rewards.as_slice());
    }
    Ok(rewards)
}

/// Runs an experiment configured by a parameter file and plots the reward
/// series of its sessions to `plot_path`.
pub fn run_experiment(config: impl AsRef<Path>, plot_path: impl AsRef<Path>) -> Result<Vec<LabeledSeries>> {
    let config = ExperimentConfig::load(config)?;
    let mut experiment = Experiment::build(&config, &env_registry(), &agent_registry())?
        .with_plotter(Box::new(SvgPlotter::new(plot_path)));
    let results = experiment.run()?;
    for series in results.iter() {
        info!(
            "{}: last reward = {:?}",
            series.label,
            series.values.last()
        );
    }
    Ok(results)
}
