//! Uniformly random agent.
use anyhow::Result;
use episodic_core::{config::AgentConfig, error::ConfigError, Agent};

/// Configuration of [`RandomAgent`].
#[derive(Clone, Debug, PartialEq)]
pub struct RandomAgentConfig {
    num_actions: usize,
    seed: Option<u64>,
}

impl RandomAgentConfig {
    /// Constructs the configuration of an agent choosing among `num_actions` actions.
    pub fn new(num_actions: usize) -> Self {
        Self {
            num_actions,
            seed: None,
        }
    }

    /// Sets the seed of the agent.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Reads the configuration from the options `num_actions` (required) and
    /// `seed` (optional) of an agent.
    pub fn from_agent_config(config: &AgentConfig) -> Result<Self, ConfigError> {
        let options = config.options();
        let num_actions = options
            .get("num_actions")
            .ok_or_else(|| ConfigError::MissingKey("num_actions".to_string()))?;
        let num_actions = match num_actions.as_u64() {
            Some(n) if n > 0 => n as usize,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "num_actions".to_string(),
                    reason: format!("expected a positive integer, got {:?}", num_actions),
                })
            }
        };
        let config = Self::new(num_actions);
        match options.get("seed").map(|v| v.as_u64()) {
            None => Ok(config),
            Some(Some(seed)) => Ok(config.seed(seed)),
            Some(None) => Err(ConfigError::InvalidValue {
                key: "seed".to_string(),
                reason: "expected a non-negative integer".to_string(),
            }),
        }
    }
}

/// Chooses actions uniformly at random, ignoring observations and rewards.
///
/// It is a baseline for learning agents.
pub struct RandomAgent {
    num_actions: usize,
    rng: fastrand::Rng,
}

impl RandomAgent {
    /// Constructs the agent.
    pub fn build(config: &RandomAgentConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            num_actions: config.num_actions,
            rng,
        }
    }

    fn sample(&mut self) -> i64 {
        self.rng.usize(..self.num_actions) as i64
    }
}

impl<O> Agent<O, i64> for RandomAgent {
    fn start(&mut self, _obs: &O) -> Result<i64> {
        Ok(self.sample())
    }

    fn step(&mut self, _obs: &O, _reward: f32) -> Result<i64> {
        Ok(self.sample())
    }

    fn end(&mut self, _obs: &O, _reward: f32) -> Result<()> {
        Ok(())
    }
}
