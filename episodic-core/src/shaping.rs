//! Reward shaping policies.
//!
//! Shaping is a pure function of an observation and the raw reward. It never
//! mutates the environment or the agents. A policy is selected per session
//! with [`RewardShapingConfig`].
use crate::config::RewardShapingConfig;
use anyhow::{anyhow, Result};

/// Outcome of an episode as seen by a [`RewardShaper`] on the terminal observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalOutcome {
    /// Reward reported to the agents with the terminal observation.
    pub reward: f32,

    /// Whether the episode reached its goal.
    pub success: bool,
}

/// Transforms rewards before they are accumulated and reported to agents.
pub trait RewardShaper {
    /// Shapes the reward of a step, given the observation following the step.
    fn shape(&self, obs: &[f32], reward: f32) -> Result<f32> {
        let _ = obs;
        Ok(reward)
    }

    /// Shapes the reward of the last step of an episode and decides its success.
    fn shape_terminal(&self, obs: &[f32], reward: f32) -> Result<TerminalOutcome> {
        let _ = obs;
        Ok(TerminalOutcome {
            reward,
            success: false,
        })
    }
}

/// Keeps rewards as given by the environment.
pub struct NoShaping;

impl RewardShaper for NoShaping {}

/// Replaces the reward of cart-pole environments with the sum of the
/// normalized distances of the cart and the pole from their failure thresholds,
/// each offset by `-0.5`.
pub struct CartPoleShaping {
    x_threshold: f32,
    theta_threshold_radians: f32,
}

impl RewardShaper for CartPoleShaping {
    fn shape(&self, obs: &[f32], _reward: f32) -> Result<f32> {
        if obs.len() < 4 {
            return Err(anyhow!(
                "Cart-pole shaping expects 4 coordinates, got {}",
                obs.len()
            ));
        }
        let (x, theta) = (obs[0], obs[2]);
        let r1 = (self.x_threshold - x.abs()) / self.x_threshold - 0.5;
        let r2 = (self.theta_threshold_radians - theta.abs()) / self.theta_threshold_radians - 0.5;
        Ok(r1 + r2)
    }
}

/// Detects the success of mountain-car episodes on the terminal observation.
///
/// A successful episode ends with `success_bonus`, any other with `0.0`.
pub struct MountainCarSuccess {
    coordinate: usize,
    goal_position: f32,
    success_bonus: f32,
}

impl RewardShaper for MountainCarSuccess {
    fn shape_terminal(&self, obs: &[f32], _reward: f32) -> Result<TerminalOutcome> {
        let position = obs.get(self.coordinate).ok_or_else(|| {
            anyhow!(
                "Coordinate {} is out of range of the observation of length {}",
                self.coordinate,
                obs.len()
            )
        })?;
        Ok(if *position >= self.goal_position {
            TerminalOutcome {
                reward: self.success_bonus,
                success: true,
            }
        } else {
            TerminalOutcome {
                reward: 0.0,
                success: false,
            }
        })
    }
}

/// Builds the shaping policy of the configuration.
pub fn build_shaper(config: &RewardShapingConfig) -> Box<dyn RewardShaper> {
    match config {
        RewardShapingConfig::None => Box::new(NoShaping),
        RewardShapingConfig::CartPole {
            x_threshold,
            theta_threshold_radians,
        } => Box::new(CartPoleShaping {
            x_threshold: *x_threshold,
            theta_threshold_radians: *theta_threshold_radians,
        }),
        RewardShapingConfig::MountainCarSuccess {
            coordinate,
            goal_position,
            success_bonus,
        } => Box::new(MountainCarSuccess {
            coordinate: *coordinate,
            goal_position: *goal_position,
            success_bonus: *success_bonus,
        }),
    }
}
