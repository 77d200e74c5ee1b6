//! Scripted environments and agents, used for tests.
//!
//! Observations are `Vec<f32>` and actions are `i64`. Everything the
//! environments and agents receive is logged in shared buffers, so that tests
//! can inspect the interaction after the capabilities have been moved into a
//! [`Session`](crate::Session).
use crate::{
    Agent, AgentAct, AgentObs, Env, MultiAgentEnv, MultiStep, ObservationBounds, Step,
};
use anyhow::{bail, Result};
use std::{cell::RefCell, rc::Rc};

/// A call received by a [`DummyAgent`].
#[derive(Clone, Debug, PartialEq)]
pub enum AgentCall {
    /// [`Agent::start`] with the observation.
    Start(Vec<f32>),

    /// [`Agent::step`] with the observation and the reward.
    Step(Vec<f32>, f32),

    /// [`Agent::end`] with the observation and the reward.
    End(Vec<f32>, f32),

    /// [`Agent::learn_from_experience`].
    Learn,
}

/// Calls received by the agents sharing the log, with the id of the agent.
#[derive(Clone, Default)]
pub struct AgentLog(Rc<RefCell<(usize, Vec<(usize, AgentCall)>)>>);

impl AgentLog {
    /// Constructs an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All the calls, in the order they were received.
    pub fn calls(&self) -> Vec<(usize, AgentCall)> {
        self.0.borrow().1.clone()
    }

    /// The calls received by the agent of the given id.
    pub fn calls_of(&self, id: usize) -> Vec<AgentCall> {
        self.0
            .borrow()
            .1
            .iter()
            .filter(|(i, _)| *i == id)
            .map(|(_, call)| call.clone())
            .collect()
    }

    /// The number of agents created with this log.
    pub fn n_agents(&self) -> usize {
        self.0.borrow().0
    }

    fn next_id(&self) -> usize {
        let mut inner = self.0.borrow_mut();
        inner.0 += 1;
        inner.0 - 1
    }

    fn push(&self, id: usize, call: AgentCall) {
        self.0.borrow_mut().1.push((id, call));
    }
}

/// An agent logging its calls.
///
/// Agents get ids in creation order, starting from 0. The `n`-th action of an
/// agent in its lifetime is `n`.
pub struct DummyAgent {
    id: usize,
    n_acts: i64,
    fail_at_step: Option<usize>,
    n_steps: usize,
    log: AgentLog,
}

impl DummyAgent {
    /// Constructs an agent logging to `log`.
    pub fn new(log: &AgentLog) -> Self {
        Self {
            id: log.next_id(),
            n_acts: 0,
            fail_at_step: None,
            n_steps: 0,
            log: log.clone(),
        }
    }

    /// Makes the `n`-th call of [`Agent::step`] fail, counted over all episodes.
    pub fn fail_at_step(mut self, n: usize) -> Self {
        self.fail_at_step = Some(n);
        self
    }

    fn act(&mut self) -> i64 {
        self.n_acts += 1;
        self.n_acts - 1
    }
}

impl Agent<Vec<f32>, i64> for DummyAgent {
    fn start(&mut self, obs: &Vec<f32>) -> Result<i64> {
        self.log.push(self.id, AgentCall::Start(obs.clone()));
        Ok(self.act())
    }

    fn step(&mut self, obs: &Vec<f32>, reward: f32) -> Result<i64> {
        self.n_steps += 1;
        if Some(self.n_steps) == self.fail_at_step {
            bail!("Agent {} failed at step {}", self.id, self.n_steps);
        }
        self.log.push(self.id, AgentCall::Step(obs.clone(), reward));
        Ok(self.act())
    }

    fn end(&mut self, obs: &Vec<f32>, reward: f32) -> Result<()> {
        self.log.push(self.id, AgentCall::End(obs.clone(), reward));
        Ok(())
    }

    fn learn_from_experience(&mut self) -> Result<()> {
        self.log.push(self.id, AgentCall::Learn);
        Ok(())
    }
}

/// Observations and rewards of the steps of an episode.
#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    /// Observation given at reset.
    pub initial: Vec<f32>,

    /// Observation and reward of every step. The episode ends with the last one.
    pub steps: Vec<(Vec<f32>, f32)>,
}

impl Script {
    /// Constructs a script.
    pub fn new(initial: Vec<f32>, steps: Vec<(Vec<f32>, f32)>) -> Self {
        Self { initial, steps }
    }

    /// An episode with one step per reward. The observation after the `k`-th
    /// step is `[k]`.
    pub fn counting(rewards: &[f32]) -> Self {
        Self {
            initial: vec![0.0],
            steps: rewards
                .iter()
                .enumerate()
                .map(|(k, &r)| (vec![(k + 1) as f32], r))
                .collect(),
        }
    }
}

/// Shared state of a dummy environment.
#[derive(Clone, Debug, Default)]
struct EnvState {
    n_resets: usize,
    n_renders: usize,
    reset_renders: Vec<bool>,
    acts: Vec<Vec<(String, i64)>>,
}

/// What a dummy environment has received.
#[derive(Clone, Default)]
pub struct EnvLog(Rc<RefCell<EnvState>>);

impl EnvLog {
    /// Constructs an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of resets.
    pub fn n_resets(&self) -> usize {
        self.0.borrow().n_resets
    }

    /// The number of renderings.
    pub fn n_renders(&self) -> usize {
        self.0.borrow().n_renders
    }

    /// The `render` flag of every reset of a multi-agent environment.
    pub fn reset_renders(&self) -> Vec<bool> {
        self.0.borrow().reset_renders.clone()
    }

    /// Actions of every step, with the name of the agent (empty in single-agent environments).
    pub fn acts(&self) -> Vec<Vec<(String, i64)>> {
        self.0.borrow().acts.clone()
    }
}

/// A single-agent environment replaying a [`Script`] in every episode.
pub struct DummyEnv {
    scripts: Vec<Script>,
    episode: usize,
    bounds: Option<ObservationBounds>,
    fail_at_reset: Option<usize>,
    t: usize,
    log: EnvLog,
}

impl DummyEnv {
    /// Constructs an environment logging to `log`.
    pub fn new(script: Script, log: &EnvLog) -> Self {
        Self::cycling(vec![script], log)
    }

    /// Constructs an environment replaying the scripts in turn, one per
    /// episode, starting over after the last one.
    ///
    /// # Panics
    ///
    /// Panics if `scripts` is empty.
    pub fn cycling(scripts: Vec<Script>, log: &EnvLog) -> Self {
        assert!(!scripts.is_empty(), "No script given");
        Self {
            scripts,
            episode: 0,
            bounds: None,
            fail_at_reset: None,
            t: 0,
            log: log.clone(),
        }
    }

    /// Exposes observation bounds.
    pub fn with_bounds(mut self, bounds: ObservationBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Makes the `n`-th reset fail, counting from 0.
    pub fn fail_at_reset(mut self, n: usize) -> Self {
        self.fail_at_reset = Some(n);
        self
    }
}

impl DummyEnv {
    fn script(&self) -> &Script {
        &self.scripts[(self.episode.max(1) - 1) % self.scripts.len()]
    }
}

impl Env for DummyEnv {
    type Obs = Vec<f32>;
    type Act = i64;

    fn reset(&mut self) -> Result<Vec<f32>> {
        let n = self.log.n_resets();
        if Some(n) == self.fail_at_reset {
            bail!("Reset {} failed", n);
        }
        self.log.0.borrow_mut().n_resets += 1;
        self.episode += 1;
        self.t = 0;
        Ok(self.script().initial.clone())
    }

    fn step(&mut self, act: &i64) -> Result<Step<Vec<f32>>> {
        let (obs, reward) = match self.script().steps.get(self.t) {
            Some(step) => step.clone(),
            None => bail!("Step after the end of the episode"),
        };
        self.log
            .0
            .borrow_mut()
            .acts
            .push(vec![(String::new(), *act)]);
        self.t += 1;
        let is_done = self.t == self.script().steps.len();
        Ok(Step::new(obs, reward, is_done))
    }

    fn render(&mut self) -> Result<()> {
        self.log.0.borrow_mut().n_renders += 1;
        Ok(())
    }

    fn observation_bounds(&self) -> Option<ObservationBounds> {
        self.bounds.clone()
    }
}

/// A multi-agent environment replaying a [`Script`] in every episode.
///
/// Agent `j`, in declared order, observes the scripted observation with `j`
/// appended and receives the scripted reward multiplied by its scale.
pub struct DummyMultiAgentEnv {
    names: Vec<String>,
    scales: Vec<f32>,
    script: Script,
    report_reversed: bool,
    omit_at_end: Option<String>,
    t: usize,
    log: EnvLog,
}

impl DummyMultiAgentEnv {
    /// Constructs an environment hosting agents of the given names.
    pub fn new(names: &[&str], script: Script, log: &EnvLog) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            scales: vec![1.0; names.len()],
            script,
            report_reversed: false,
            omit_at_end: None,
            t: 0,
            log: log.clone(),
        }
    }

    /// Sets the reward scale of each agent.
    pub fn with_reward_scales(mut self, scales: Vec<f32>) -> Self {
        self.scales = scales;
        self
    }

    /// Reports agents in the reverse of the declared order.
    pub fn report_reversed(mut self) -> Self {
        self.report_reversed = true;
        self
    }

    /// Leaves the agent of the given name out of the terminal report.
    pub fn omit_at_end(mut self, name: &str) -> Self {
        self.omit_at_end = Some(name.to_string());
        self
    }

    fn agents_data(&self, obs: &[f32], reward: Option<f32>) -> Vec<AgentObs<Vec<f32>>> {
        let mut data: Vec<_> = self
            .names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let mut obs = obs.to_vec();
                obs.push(j as f32);
                match reward {
                    Some(r) => AgentObs::new(name.clone(), obs, r * self.scales[j]),
                    None => AgentObs::initial(name.clone(), obs),
                }
            })
            .collect();
        if self.report_reversed {
            data.reverse();
        }
        data
    }
}

impl MultiAgentEnv for DummyMultiAgentEnv {
    type Obs = Vec<f32>;
    type Act = i64;

    fn agent_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn reset(&mut self, render: bool) -> Result<Vec<AgentObs<Vec<f32>>>> {
        {
            let mut state = self.log.0.borrow_mut();
            state.n_resets += 1;
            state.reset_renders.push(render);
        }
        self.t = 0;
        Ok(self.agents_data(&self.script.initial, None))
    }

    fn step(&mut self, acts: &[AgentAct<i64>]) -> Result<MultiStep<Vec<f32>>> {
        let (obs, reward) = match self.script.steps.get(self.t) {
            Some(step) => step.clone(),
            None => bail!("Step after the end of the episode"),
        };
        self.log
            .0
            .borrow_mut()
            .acts
            .push(acts.iter().map(|a| (a.name.clone(), a.act)).collect());
        self.t += 1;
        let is_done = self.t == self.script.steps.len();
        let mut agents_data = self.agents_data(&obs, Some(reward));
        if let (true, Some(name)) = (is_done, &self.omit_at_end) {
            agents_data.retain(|data| data.name != *name);
        }
        Ok(MultiStep::new(agents_data, is_done))
    }

    fn render(&mut self) -> Result<()> {
        self.log.0.borrow_mut().n_renders += 1;
        Ok(())
    }
}
