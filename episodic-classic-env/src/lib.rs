#![warn(missing_docs)]
//! Classic control environments in pure Rust.
//!
//! [`build`] is the factory of the `gym` environment kind:
//!
//! ```
//! use episodic_classic_env::build;
//! use episodic_core::{config::Options, EnvSpec};
//!
//! let spec = EnvSpec {
//!     name: "CartPole-v0".to_string(),
//!     options: Options::new(),
//!     seed: 42,
//! };
//! let env = build(&spec).unwrap();
//! assert!(!env.is_multi_agent());
//! ```
mod cart_pole;
mod config;
mod mountain_car;
use anyhow::Result;
pub use cart_pole::{CartPole, THETA_THRESHOLD_RADIANS, X_THRESHOLD};
pub use config::ClassicEnvConfig;
use episodic_core::{config::EnvironmentKind, error::ConfigError, EnvHandle, EnvSpec};
use log::info;
pub use mountain_car::{MountainCar, GOAL_POSITION};

/// Names of the available environments.
pub const ENV_NAMES: [&str; 2] = ["CartPole-v0", "MountainCar-v0"];

/// Builds the environment of the given name.
pub fn build(spec: &EnvSpec) -> Result<EnvHandle<Vec<f32>, i64>> {
    let config = ClassicEnvConfig::from_options(&spec.options, spec.seed)?;
    info!("Build {} with {:?}", spec.name, config);
    match spec.name.as_str() {
        "CartPole-v0" => Ok(EnvHandle::Single(Box::new(CartPole::build(&config)))),
        "MountainCar-v0" => Ok(EnvHandle::Single(Box::new(MountainCar::build(&config)))),
        _ => Err(ConfigError::UnsupportedEnvironment {
            kind: EnvironmentKind::Gym,
            name: spec.name.clone(),
        }
        .into()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use episodic_core::config::Options;

    fn spec(name: &str) -> EnvSpec {
        EnvSpec {
            name: name.to_string(),
            options: Options::new(),
            seed: 0,
        }
    }

    #[test]
    fn test_build() {
        for name in ENV_NAMES.iter() {
            let env = build(&spec(name)).unwrap();
            assert!(env.observation_bounds().is_some());
        }

        let err = build(&spec("Pendulum-v1")).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnsupportedEnvironment { .. })
        ));
    }
}
