//! Cart-pole balancing.
use crate::ClassicEnvConfig;
use anyhow::{bail, Result};
use episodic_core::{Env, ObservationBounds, Step};
use log::{debug, trace};

const GRAVITY: f32 = 9.8;
const MASS_CART: f32 = 1.0;
const MASS_POLE: f32 = 0.1;
const TOTAL_MASS: f32 = MASS_CART + MASS_POLE;
const LENGTH: f32 = 0.5;
const POLE_MASS_LENGTH: f32 = MASS_POLE * LENGTH;
const FORCE_MAG: f32 = 10.0;
const TAU: f32 = 0.02;

/// Position of the cart at which the episode fails.
pub const X_THRESHOLD: f32 = 2.4;

/// Angle of the pole at which the episode fails, 12 degrees.
pub const THETA_THRESHOLD_RADIANS: f32 = 12.0 * 2.0 * std::f32::consts::PI / 360.0;

/// `CartPole-v0`.
///
/// The observation is `[x, x_dot, theta, theta_dot]`. Action `0` pushes the
/// cart to the left, `1` to the right. The reward is `1.0` per step.
pub struct CartPole {
    state: [f32; 4],
    n_steps: usize,
    max_steps: Option<usize>,
    rng: fastrand::Rng,
}

impl CartPole {
    /// Constructs the environment.
    pub fn build(config: &ClassicEnvConfig) -> Self {
        Self {
            state: [0.0; 4],
            n_steps: 0,
            max_steps: config.max_steps,
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }

    fn is_failed(&self) -> bool {
        let [x, _, theta, _] = self.state;
        x < -X_THRESHOLD
            || x > X_THRESHOLD
            || theta < -THETA_THRESHOLD_RADIANS
            || theta > THETA_THRESHOLD_RADIANS
    }
}

impl Env for CartPole {
    type Obs = Vec<f32>;
    type Act = i64;

    fn reset(&mut self) -> Result<Vec<f32>> {
        trace!("CartPole::reset()");
        for s in self.state.iter_mut() {
            *s = self.rng.f32() * 0.1 - 0.05;
        }
        self.n_steps = 0;
        Ok(self.state.to_vec())
    }

    fn step(&mut self, act: &i64) -> Result<Step<Vec<f32>>> {
        let force = match act {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            _ => bail!("Invalid action {} for CartPole-v0", act),
        };
        let [x, x_dot, theta, theta_dot] = self.state;
        let (sin, cos) = theta.sin_cos();
        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin - cos * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * cos * cos / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.n_steps += 1;

        let truncated = self.max_steps.map_or(false, |m| self.n_steps >= m);
        let is_done = self.is_failed() || truncated;
        Ok(Step::new(self.state.to_vec(), 1.0, is_done))
    }

    fn render(&mut self) -> Result<()> {
        debug!("CartPole-v0 step {}: {:?}", self.n_steps, self.state);
        Ok(())
    }

    fn observation_bounds(&self) -> Option<ObservationBounds> {
        Some(ObservationBounds {
            low: vec![-2.0 * X_THRESHOLD, f32::MIN, -2.0 * THETA_THRESHOLD_RADIANS, f32::MIN],
            high: vec![2.0 * X_THRESHOLD, f32::MAX, 2.0 * THETA_THRESHOLD_RADIANS, f32::MAX],
        })
    }
}
