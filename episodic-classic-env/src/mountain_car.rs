//! Mountain car.
use crate::ClassicEnvConfig;
use anyhow::{bail, Result};
use episodic_core::{Env, ObservationBounds, Step};
use log::{debug, trace};

const MIN_POSITION: f32 = -1.2;
const MAX_POSITION: f32 = 0.6;
const MAX_SPEED: f32 = 0.07;
const FORCE: f32 = 0.001;
const GRAVITY: f32 = 0.0025;

/// Position of the goal at the top of the right hill.
pub const GOAL_POSITION: f32 = 0.5;

/// `MountainCar-v0`.
///
/// The observation is `[position, velocity]`. Action `0` accelerates to the
/// left, `1` does nothing and `2` accelerates to the right. The reward is
/// `-1.0` per step until the goal is reached.
pub struct MountainCar {
    position: f32,
    velocity: f32,
    n_steps: usize,
    max_steps: Option<usize>,
    rng: fastrand::Rng,
}

impl MountainCar {
    /// Constructs the environment.
    pub fn build(config: &ClassicEnvConfig) -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            n_steps: 0,
            max_steps: config.max_steps,
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }

    fn obs(&self) -> Vec<f32> {
        vec![self.position, self.velocity]
    }
}

impl Env for MountainCar {
    type Obs = Vec<f32>;
    type Act = i64;

    fn reset(&mut self) -> Result<Vec<f32>> {
        trace!("MountainCar::reset()");
        self.position = -0.6 + self.rng.f32() * 0.2;
        self.velocity = 0.0;
        self.n_steps = 0;
        Ok(self.obs())
    }

    fn step(&mut self, act: &i64) -> Result<Step<Vec<f32>>> {
        if !(0..=2).contains(act) {
            bail!("Invalid action {} for MountainCar-v0", act);
        }
        self.velocity += (*act - 1) as f32 * FORCE - (3.0 * self.position).cos() * GRAVITY;
        self.velocity = self.velocity.clamp(-MAX_SPEED, MAX_SPEED);
        self.position = (self.position + self.velocity).clamp(MIN_POSITION, MAX_POSITION);
        if self.position <= MIN_POSITION && self.velocity < 0.0 {
            self.velocity = 0.0;
        }
        self.n_steps += 1;

        let reached = self.position >= GOAL_POSITION;
        let truncated = self.max_steps.map_or(false, |m| self.n_steps >= m);
        Ok(Step::new(self.obs(), -1.0, reached || truncated))
    }

    fn render(&mut self) -> Result<()> {
        debug!(
            "MountainCar-v0 step {}: position = {}, velocity = {}",
            self.n_steps, self.position, self.velocity
        );
        Ok(())
    }

    fn observation_bounds(&self) -> Option<ObservationBounds> {
        Some(ObservationBounds {
            low: vec![MIN_POSITION, -MAX_SPEED],
            high: vec![MAX_POSITION, MAX_SPEED],
        })
    }
}
