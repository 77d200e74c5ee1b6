//! Errors in the library.
use crate::{config::AgentKind, config::EnvironmentKind, RewardSeries};
use thiserror::Error;

/// Errors detected while resolving the configuration of a session.
///
/// These are raised before any episode is executed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No factory is registered for the agent kind.
    #[error("Unsupported agent kind: {0:?}")]
    UnsupportedAgent(AgentKind),

    /// No factory is registered for the environment kind, or the factory
    /// does not know the environment name.
    #[error("Unsupported environment: {kind:?} {name:?}")]
    UnsupportedEnvironment {
        /// Kind of the backend.
        kind: EnvironmentKind,
        /// Name of the environment.
        name: String,
    },

    /// A required option is missing.
    #[error("Missing required key: {0}")]
    MissingKey(String),

    /// The option has an invalid value.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Name of the option.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The agent needs observation bounds the environment does not expose.
    #[error("Agent {agent:?} requires observation bounds, but environment {env:?} does not expose them")]
    MissingObservationBounds {
        /// Agent kind.
        agent: AgentKind,
        /// Name of the environment.
        env: String,
    },

    /// Single-agent configuration with a multi-agent environment, or vice versa.
    #[error("Environment {env:?} is {actual}, but the session is configured as {expected}")]
    AgentArityMismatch {
        /// Name of the environment.
        env: String,
        /// Arity required by the configuration.
        expected: &'static str,
        /// Arity of the environment.
        actual: &'static str,
    },

    /// Agent names of a multi-agent environment are empty or not unique.
    #[error("Invalid agent names {0:?}")]
    InvalidAgentNames(Vec<String>),

    /// Parameter file could not be parsed.
    #[error("Failed to parse parameters: {0}")]
    Parse(String),
}

/// A session was aborted by an agent or environment failure.
///
/// `completed` holds the totals of the episodes finished before the failure.
#[derive(Error, Debug)]
#[error("Session aborted in episode {episode} after {} completed episodes", .completed.len())]
pub struct RunAborted {
    /// Index of the failed episode.
    pub episode: usize,

    /// Rewards of the completed episodes.
    pub completed: RewardSeries,

    /// The failure.
    #[source]
    pub source: anyhow::Error,
}

/// Errors on reading values of a [`Record`](crate::record::Record).
#[derive(Error, Debug)]
pub enum RecordError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
