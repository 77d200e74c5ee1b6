//! Selection of the reward shaping policy.
use serde::{Deserialize, Serialize};

fn default_x_threshold() -> f32 {
    2.4
}

fn default_theta_threshold_radians() -> f32 {
    12.0 * 2.0 * std::f32::consts::PI / 360.0
}

fn default_goal_position() -> f32 {
    0.5
}

fn default_success_bonus() -> f32 {
    1.0
}

/// Reward shaping applied by the episode runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RewardShapingConfig {
    /// Rewards are used as given by the environment.
    None,

    /// Replaces the reward with the distance of the cart and the pole from
    /// their failure thresholds.
    CartPole {
        /// Position of the cart at which the episode fails.
        #[serde(default = "default_x_threshold")]
        x_threshold: f32,

        /// Angle of the pole at which the episode fails.
        #[serde(default = "default_theta_threshold_radians")]
        theta_threshold_radians: f32,
    },

    /// Flags an episode as successful when a coordinate of the terminal
    /// observation reaches the goal.
    MountainCarSuccess {
        /// Index of the tracked coordinate.
        #[serde(default)]
        coordinate: usize,

        /// Goal threshold of the tracked coordinate.
        #[serde(default = "default_goal_position")]
        goal_position: f32,

        /// Terminal reward of a successful episode.
        #[serde(default = "default_success_bonus")]
        success_bonus: f32,
    },
}

impl Default for RewardShapingConfig {
    fn default() -> Self {
        Self::None
    }
}

impl RewardShapingConfig {
    /// Cart-pole shaping with the thresholds of `CartPole-v0`.
    pub fn cart_pole() -> Self {
        Self::CartPole {
            x_threshold: default_x_threshold(),
            theta_threshold_radians: default_theta_threshold_radians(),
        }
    }

    /// Mountain-car success detection with the goal of `MountainCar-v0`.
    pub fn mountain_car_success() -> Self {
        Self::MountainCarSuccess {
            coordinate: 0,
            goal_position: default_goal_position(),
            success_bonus: default_success_bonus(),
        }
    }
}
