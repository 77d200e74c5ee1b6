#![warn(missing_docs)]
//! Core of an experiment harness for reinforcement learning.
//!
//! A [`Session`] drives agents through episodes of interaction with an
//! environment, collects per-episode rewards and optionally smooths and plots
//! them. An [`Experiment`] runs several parameterized sessions for comparison.
//!
//! Concrete learning algorithms and environment backends are plugged in
//! through the [`Agent`], [`Env`] and [`MultiAgentEnv`] traits, resolved at
//! configuration time by an [`AgentRegistry`] and an [`EnvRegistry`].
pub mod config;
pub mod dummy;
pub mod error;
pub mod record;
pub mod shaping;
pub mod util;

mod base;
pub use base::{
    Act, Agent, AgentAct, AgentHandle, AgentObs, Env, EnvHandle, MultiAgentEnv, MultiStep,
    Obs, ObservationBounds, Step,
};

mod registry;
pub use registry::{AgentRegistry, EnvRegistry, EnvSpec};

mod runner;
pub use runner::{EpisodeResult, EpisodeRunner};

mod session;
pub use session::{RewardSeries, Session};

mod experiment;
pub use experiment::{Experiment, ExperimentConfig, SessionVariant, VariantLevel};

mod plot;
pub use plot::{LabeledSeries, NullPlotter, Plotter};
