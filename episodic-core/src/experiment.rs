//! Comparison of sessions differing in a few options.
mod config;
use crate::{
    record::{NullRecorder, Recorder},
    Act, AgentRegistry, EnvRegistry, LabeledSeries, NullPlotter, Obs, Plotter, Session,
};
use anyhow::{anyhow, Result};
pub use config::{ExperimentConfig, SessionVariant, VariantLevel};
use log::info;

/// Runs sessions built from a shared base configuration, one after another.
///
/// All sessions are built when the experiment is built, so that an invalid
/// variant is reported before any episode is executed.
pub struct Experiment<O, A> {
    sessions: Vec<(String, Session<O, A>)>,
    smoothing_window: Option<usize>,
    title: String,
    plotter: Box<dyn Plotter>,
}

impl<O, A> Experiment<O, A>
where
    O: Obs,
    A: Act,
{
    /// Builds the sessions of an experiment.
    pub fn build(
        config: &ExperimentConfig,
        envs: &EnvRegistry<O, A>,
        agents: &AgentRegistry<O, A>,
    ) -> Result<Self> {
        config.validate()?;
        let mut sessions = Vec::with_capacity(config.num_sessions);
        for i in 0..config.num_sessions {
            // Series are plotted together by the experiment.
            let params = config.session_params(i)?.plot(false);
            let label = config.session_label(i)?;
            info!("Session {}: {}", i, label);
            sessions.push((label, Session::build(&params, envs, agents)?));
        }

        Ok(Self {
            sessions,
            smoothing_window: config.smoothing_window(),
            title: config.session_info.environment_name.clone(),
            plotter: Box::new(NullPlotter),
        })
    }

    /// Sets the plotter receiving the reward series of all sessions.
    pub fn with_plotter(mut self, plotter: Box<dyn Plotter>) -> Self {
        self.plotter = plotter;
        self
    }

    /// The number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if the experiment has no session.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Labels of the sessions, in session order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().map(|(label, _)| label.as_str())
    }

    /// Runs all the sessions and returns their labeled reward series.
    pub fn run(&mut self) -> Result<Vec<LabeledSeries>> {
        self.run_with_recorder(&mut NullRecorder::default())
    }

    /// Runs all the sessions, writing the records of their episodes to `recorder`.
    pub fn run_with_recorder(&mut self, recorder: &mut dyn Recorder) -> Result<Vec<LabeledSeries>> {
        let mut results = Vec::with_capacity(self.sessions.len());
        for (i, (label, session)) in self.sessions.iter_mut().enumerate() {
            info!("Run session {} ({})", i, label);
            let rewards = session
                .run_with_recorder(recorder)?
                .ok_or_else(|| anyhow!("Session {} returned no results", i))?;
            let rewards = match self.smoothing_window {
                Some(window) => rewards.smoothed(window),
                None => rewards,
            };
            results.push(LabeledSeries::new(label.clone(), rewards.into_vec()));
        }

        self.plotter.plot(&self.title, &results)?;
        Ok(results)
    }
}
