//! Configuration of classic control environments.
use episodic_core::{config::Options, error::ConfigError};

/// Configuration of [`CartPole`](crate::CartPole) and [`MountainCar`](crate::MountainCar).
#[derive(Clone, Debug, PartialEq)]
pub struct ClassicEnvConfig {
    pub(crate) max_steps: Option<usize>,
    pub(crate) seed: u64,
}

impl Default for ClassicEnvConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(200),
            seed: 0,
        }
    }
}

impl ClassicEnvConfig {
    /// Sets the maximum number of steps in an episode. `None` disables the limit.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the seed of the initial states.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Reads the configuration from environment options.
    ///
    /// `max_steps` is the only option; `null` disables the step limit.
    pub fn from_options(options: &Options, seed: i64) -> Result<Self, ConfigError> {
        let config = Self::default().seed(seed as u64);
        match options.get("max_steps") {
            None => Ok(config),
            Some(serde_yaml::Value::Null) => Ok(config.max_steps(None)),
            Some(v) => match v.as_u64() {
                Some(n) if n > 0 => Ok(config.max_steps(Some(n as usize))),
                _ => Err(ConfigError::InvalidValue {
                    key: "max_steps".to_string(),
                    reason: format!("expected a positive integer, got {:?}", v),
                }),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn options(s: &str) -> Options {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_from_options() {
        let config = ClassicEnvConfig::from_options(&Options::new(), 42).unwrap();
        assert_eq!(config, ClassicEnvConfig::default().seed(42));

        let config = ClassicEnvConfig::from_options(&options("max_steps: 500"), 0).unwrap();
        assert_eq!(config.max_steps, Some(500));

        let config = ClassicEnvConfig::from_options(&options("max_steps: null"), 0).unwrap();
        assert_eq!(config.max_steps, None);

        assert!(ClassicEnvConfig::from_options(&options("max_steps: -3"), 0).is_err());
        assert!(ClassicEnvConfig::from_options(&options("max_steps: many"), 0).is_err());
    }
}
