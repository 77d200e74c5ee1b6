//! Factories of agents and environments, keyed by their kinds.
use crate::{
    config::{AgentConfig, AgentKind, EnvironmentKind, Options},
    error::ConfigError,
    Agent, EnvHandle,
};
use anyhow::Result;
use std::collections::HashMap;

type AgentFactory<O, A> = Box<dyn Fn(&AgentConfig) -> Result<Box<dyn Agent<O, A>>>>;

type EnvFactory<O, A> = Box<dyn Fn(&EnvSpec) -> Result<EnvHandle<O, A>>>;

/// Builds agents of the registered kinds.
pub struct AgentRegistry<O, A> {
    factories: HashMap<AgentKind, AgentFactory<O, A>>,
}

impl<O, A> Default for AgentRegistry<O, A> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<O, A> AgentRegistry<O, A> {
    /// Constructs an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the factory of an agent kind, replacing any previous one.
    pub fn register<F>(mut self, kind: AgentKind, factory: F) -> Self
    where
        F: Fn(&AgentConfig) -> Result<Box<dyn Agent<O, A>>> + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
        self
    }

    /// Returns `true` if the kind has a factory.
    pub fn contains(&self, kind: AgentKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Builds an agent.
    pub fn build(&self, config: &AgentConfig) -> Result<Box<dyn Agent<O, A>>> {
        let factory = self
            .factories
            .get(&config.kind())
            .ok_or(ConfigError::UnsupportedAgent(config.kind()))?;
        factory(config)
    }
}

/// What an environment factory is asked to build.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvSpec {
    /// Name of the environment, like `CartPole-v0`.
    pub name: String,

    /// Options of the environment.
    pub options: Options,

    /// Random seed.
    pub seed: i64,
}

/// Builds environments of the registered backend kinds.
pub struct EnvRegistry<O, A> {
    factories: HashMap<EnvironmentKind, EnvFactory<O, A>>,
}

impl<O, A> Default for EnvRegistry<O, A> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<O, A> EnvRegistry<O, A> {
    /// Constructs an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the factory of a backend kind, replacing any previous one.
    ///
    /// A factory returns [`ConfigError::UnsupportedEnvironment`] for names it
    /// does not know.
    pub fn register<F>(mut self, kind: EnvironmentKind, factory: F) -> Self
    where
        F: Fn(&EnvSpec) -> Result<EnvHandle<O, A>> + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
        self
    }

    /// Builds an environment.
    pub fn build(&self, kind: EnvironmentKind, spec: &EnvSpec) -> Result<EnvHandle<O, A>> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| ConfigError::UnsupportedEnvironment {
                kind,
                name: spec.name.clone(),
            })?;
        factory(spec)
    }
}
