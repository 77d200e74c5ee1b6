//! Execution of a single episode.
use crate::{
    config::MultiAgentReward,
    shaping::{RewardShaper, TerminalOutcome},
    Act, Agent, AgentAct, AgentHandle, AgentObs, Env, EnvHandle, MultiAgentEnv, Obs,
};
use anyhow::{anyhow, Result};
use log::trace;

/// Outcome of an episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeResult {
    /// Sum of the shaped rewards of the episode.
    pub total_reward: f32,

    /// Whether the episode reached its goal.
    pub success: bool,

    /// The number of environment steps.
    pub n_steps: usize,
}

/// Runs episodes of interaction between agents and an environment.
///
/// An episode goes through three states:
///
/// 1. Start: the environment is reset and every agent gives its first action
///    with [`Agent::start`].
/// 2. Stepping: actions are applied to the environment, rewards are shaped and
///    accumulated, and while the episode continues, every agent receives its
///    new observation together with the reward of its previous action through
///    [`Agent::step`].
/// 3. Terminal: the terminal reward is shaped, every agent receives
///    [`Agent::end`], then [`Agent::learn_from_experience`] if the algorithm
///    consolidates after episodes.
pub struct EpisodeRunner {
    shaper: Box<dyn RewardShaper>,
    consolidate: bool,
    multi_agent_reward: MultiAgentReward,
}

impl EpisodeRunner {
    /// Constructs a runner.
    ///
    /// `consolidate` enables the call of [`Agent::learn_from_experience`] at
    /// the end of each episode.
    pub fn new(
        shaper: Box<dyn RewardShaper>,
        consolidate: bool,
        multi_agent_reward: MultiAgentReward,
    ) -> Self {
        Self {
            shaper,
            consolidate,
            multi_agent_reward,
        }
    }

    /// Runs one episode.
    ///
    /// `render` enables rendering of the environment at every step.
    pub fn run<O, A>(
        &self,
        env: &mut EnvHandle<O, A>,
        agents: &mut AgentHandle<O, A>,
        render: bool,
    ) -> Result<EpisodeResult>
    where
        O: Obs,
        A: Act,
    {
        match (env, agents) {
            (EnvHandle::Single(env), AgentHandle::Single(agent)) => {
                self.run_single(env.as_mut(), agent.as_mut(), render)
            }
            (EnvHandle::Multi(env), AgentHandle::Multi(agents)) => {
                self.run_multi(env.as_mut(), agents, render)
            }
            _ => Err(anyhow!(
                "Single-agent and multi-agent handles can not be combined"
            )),
        }
    }

    /// Runs an episode in a single-agent environment.
    pub fn run_single<O, A>(
        &self,
        env: &mut dyn Env<Obs = O, Act = A>,
        agent: &mut dyn Agent<O, A>,
        render: bool,
    ) -> Result<EpisodeResult>
    where
        O: Obs,
        A: Act,
    {
        let obs = env.reset()?;
        let mut act = agent.start(&obs)?;
        let mut total_reward = 0f32;
        let mut n_steps = 0;

        loop {
            trace!("act = {:?}", act);
            let step = env.step(&act)?;
            n_steps += 1;

            let reward = self.shaper.shape(step.obs.as_slice(), step.reward)?;
            total_reward += reward;

            if render {
                env.render()?;
            }

            if !step.is_done {
                act = agent.step(&step.obs, reward)?;
            } else {
                let TerminalOutcome { reward, success } =
                    self.shaper.shape_terminal(step.obs.as_slice(), reward)?;
                agent.end(&step.obs, reward)?;
                if self.consolidate {
                    agent.learn_from_experience()?;
                }
                return Ok(EpisodeResult {
                    total_reward,
                    success,
                    n_steps,
                });
            }
        }
    }

    /// Runs an episode in a multi-agent environment.
    ///
    /// `agents` are in the order declared by the environment. Observations
    /// are routed to agents by name, every agent must be in each report of
    /// the environment, and actions are returned in the declared order.
    pub fn run_multi<O, A>(
        &self,
        env: &mut dyn MultiAgentEnv<Obs = O, Act = A>,
        agents: &mut [(String, Box<dyn Agent<O, A>>)],
        render: bool,
    ) -> Result<EpisodeResult>
    where
        O: Obs,
        A: Act,
    {
        let primary = agents
            .first()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| anyhow!("No agent in the session"))?;
        let agents_data = env.reset(render)?;
        let mut acts = start_actions(agents, &agents_data)?;
        let mut total_reward = 0f32;
        let mut n_steps = 0;

        loop {
            trace!("acts = {:?}", acts);
            let step = env.step(&acts)?;
            n_steps += 1;

            let agents_data = self.shape_all(step.agents)?;
            total_reward += self.episode_reward(&primary, &agents_data)?;

            if render {
                env.render()?;
            }

            if !step.is_done {
                acts = step_actions(agents, &agents_data)?;
            } else {
                check_names(agents, &agents_data)?;
                let mut success = false;
                for (name, agent) in agents.iter_mut() {
                    let data = find_data(&agents_data, name)?;
                    let TerminalOutcome {
                        reward,
                        success: agent_success,
                    } = self.shaper.shape_terminal(data.obs.as_slice(), reward_of(data)?)?;
                    success |= agent_success;
                    agent.end(&data.obs, reward)?;
                }
                if self.consolidate {
                    for (_, agent) in agents.iter_mut() {
                        agent.learn_from_experience()?;
                    }
                }
                return Ok(EpisodeResult {
                    total_reward,
                    success,
                    n_steps,
                });
            }
        }
    }

    fn shape_all<O: Obs>(&self, agents_data: Vec<AgentObs<O>>) -> Result<Vec<AgentObs<O>>> {
        agents_data
            .into_iter()
            .map(|data| -> Result<AgentObs<O>> {
                let reward = self.shaper.shape(data.obs.as_slice(), reward_of(&data)?)?;
                Ok(AgentObs {
                    reward: Some(reward),
                    ..data
                })
            })
            .collect()
    }

    fn episode_reward<O>(&self, primary: &str, agents_data: &[AgentObs<O>]) -> Result<f32> {
        match self.multi_agent_reward {
            MultiAgentReward::Primary => agents_data
                .iter()
                .find(|data| data.name == primary)
                .ok_or_else(|| anyhow!("No reward for the primary agent {:?}", primary))
                .and_then(reward_of),
            MultiAgentReward::Sum => agents_data.iter().map(reward_of).sum(),
        }
    }
}

fn reward_of<O>(data: &AgentObs<O>) -> Result<f32> {
    data.reward
        .ok_or_else(|| anyhow!("The environment gave no reward to agent {:?}", data.name))
}

fn find_data<'a, O>(agents_data: &'a [AgentObs<O>], name: &str) -> Result<&'a AgentObs<O>> {
    agents_data
        .iter()
        .find(|data| data.name == name)
        .ok_or_else(|| anyhow!("The environment reported nothing for agent {:?}", name))
}

/// Fails on a report for an agent not in the session.
fn check_names<O, A>(
    agents: &[(String, Box<dyn Agent<O, A>>)],
    agents_data: &[AgentObs<O>],
) -> Result<()> {
    match agents_data
        .iter()
        .find(|data| !agents.iter().any(|(name, _)| *name == data.name))
    {
        Some(data) => Err(anyhow!("Unknown agent {:?}", data.name)),
        None => Ok(()),
    }
}

/// Asks every agent for its first action.
fn start_actions<O, A>(
    agents: &mut [(String, Box<dyn Agent<O, A>>)],
    agents_data: &[AgentObs<O>],
) -> Result<Vec<AgentAct<A>>> {
    check_names(agents, agents_data)?;
    agents
        .iter_mut()
        .map(|(name, agent)| -> Result<AgentAct<A>> {
            let data = find_data(agents_data, name)?;
            Ok(AgentAct {
                name: name.clone(),
                act: agent.start(&data.obs)?,
            })
        })
        .collect()
}

/// Reports rewards and asks every agent for its next action.
fn step_actions<O, A>(
    agents: &mut [(String, Box<dyn Agent<O, A>>)],
    agents_data: &[AgentObs<O>],
) -> Result<Vec<AgentAct<A>>> {
    check_names(agents, agents_data)?;
    agents
        .iter_mut()
        .map(|(name, agent)| -> Result<AgentAct<A>> {
            let data = find_data(agents_data, name)?;
            Ok(AgentAct {
                name: name.clone(),
                act: agent.step(&data.obs, reward_of(data)?)?,
            })
        })
        .collect()
}
