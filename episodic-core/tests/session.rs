use anyhow::Result;
use episodic_core::{
    config::{AgentKind, EnvironmentKind, MultiAgentReward, RewardShapingConfig, SessionParams},
    dummy::{AgentCall, AgentLog, DummyAgent, DummyEnv, DummyMultiAgentEnv, EnvLog, Script},
    error::{ConfigError, RunAborted},
    record::BufferedRecorder,
    Agent, AgentRegistry, EnvHandle, EnvRegistry, LabeledSeries, ObservationBounds, Plotter,
    RewardSeries, Session,
};
use std::{cell::RefCell, rc::Rc};
use test_log::test;

type O = Vec<f32>;
type A = i64;

fn agents(kind: AgentKind, log: &AgentLog) -> AgentRegistry<O, A> {
    let log = log.clone();
    AgentRegistry::<O, A>::new().register(kind, move |_| {
        Ok(Box::new(DummyAgent::new(&log)) as Box<dyn Agent<O, A>>)
    })
}

fn single_env(script: Script, log: &EnvLog) -> EnvRegistry<O, A> {
    let log = log.clone();
    EnvRegistry::<O, A>::new().register(EnvironmentKind::Gym, move |_| {
        Ok(EnvHandle::Single(Box::new(DummyEnv::new(script.clone(), &log))))
    })
}

fn multi_env(names: &'static [&'static str], scales: Vec<f32>, log: &EnvLog) -> EnvRegistry<O, A> {
    let log = log.clone();
    EnvRegistry::<O, A>::new().register(EnvironmentKind::Gym, move |_| {
        let env = DummyMultiAgentEnv::new(names, Script::counting(&[1.0, 2.0, 3.0]), &log)
            .with_reward_scales(scales.clone());
        Ok(EnvHandle::Multi(Box::new(env)))
    })
}

fn params(num_episodes: usize) -> SessionParams {
    SessionParams::default()
        .num_episodes(num_episodes)
        .environment(EnvironmentKind::Gym, "Dummy-v0")
        .session_type(AgentKind::Random)
        .return_results(true)
}

fn config_error(err: &anyhow::Error) -> &ConfigError {
    err.downcast_ref::<ConfigError>()
        .unwrap_or_else(|| panic!("not a configuration error: {:?}", err))
}

#[test]
fn test_reward_threading() -> Result<()> {
    let (agent_log, env_log) = (AgentLog::new(), EnvLog::new());
    let mut session = Session::build(
        &params(1),
        &single_env(Script::counting(&[1.0, 2.0, 3.0]), &env_log),
        &agents(AgentKind::Random, &agent_log),
    )?;

    let rewards = session.run()?.unwrap();
    assert_eq!(rewards.as_slice(), &[6.0]);

    // The step reward is the one of the previous action.
    assert_eq!(
        agent_log.calls_of(0),
        vec![
            AgentCall::Start(vec![0.0]),
            AgentCall::Step(vec![1.0], 1.0),
            AgentCall::Step(vec![2.0], 2.0),
            AgentCall::End(vec![3.0], 3.0),
        ]
    );
    let acts: Vec<i64> = env_log.acts().into_iter().map(|a| a[0].1).collect();
    assert_eq!(acts, vec![0, 1, 2]);
    assert_eq!(env_log.n_resets(), 1);
    Ok(())
}

/// Removes the agent index appended to observations by multi-agent dummies.
fn without_agent_index(calls: Vec<AgentCall>) -> Vec<AgentCall> {
    let strip = |obs: &Vec<f32>| obs[..obs.len() - 1].to_vec();
    calls
        .into_iter()
        .map(|call| match call {
            AgentCall::Start(obs) => AgentCall::Start(strip(&obs)),
            AgentCall::Step(obs, r) => AgentCall::Step(strip(&obs), r),
            AgentCall::End(obs, r) => AgentCall::End(strip(&obs), r),
            AgentCall::Learn => AgentCall::Learn,
        })
        .collect()
}

fn act_values(env_log: &EnvLog) -> Vec<Vec<i64>> {
    env_log
        .acts()
        .into_iter()
        .map(|acts| acts.into_iter().map(|(_, act)| act).collect())
        .collect()
}

#[test]
fn test_single_agent_multi_agent_equivalence() -> Result<()> {
    let (single_agents, single_env_log) = (AgentLog::new(), EnvLog::new());
    let single = Session::build(
        &params(3),
        &single_env(Script::counting(&[1.0, 2.0, 3.0]), &single_env_log),
        &agents(AgentKind::Random, &single_agents),
    )?
    .run()?;

    let (multi_agents, multi_env_log) = (AgentLog::new(), EnvLog::new());
    let multi = Session::build(
        &params(3).multi_agent(true),
        &multi_env(&["solo"], vec![1.0], &multi_env_log),
        &agents(AgentKind::Random, &multi_agents),
    )?
    .run()?;

    assert_eq!(single, Some(RewardSeries::from(vec![6.0, 6.0, 6.0])));
    assert_eq!(single, multi);

    let calls = single_agents.calls_of(0);
    assert_eq!(calls.len(), 12);
    assert_eq!(calls, without_agent_index(multi_agents.calls_of(0)));
    assert_eq!(act_values(&single_env_log), act_values(&multi_env_log));
    assert_eq!(act_values(&single_env_log)[3], vec![3]);
    Ok(())
}

#[test]
fn test_zero_episodes() -> Result<()> {
    let (agent_log, env_log) = (AgentLog::new(), EnvLog::new());
    let mut session = Session::build(
        &params(0),
        &single_env(Script::counting(&[1.0]), &env_log),
        &agents(AgentKind::Random, &agent_log),
    )?;

    let rewards = session.run()?.unwrap();
    assert!(rewards.is_empty());
    assert_eq!(env_log.n_resets(), 0);
    assert!(env_log.acts().is_empty());
    assert!(agent_log.calls().is_empty());
    Ok(())
}

#[test]
fn test_results_not_returned() -> Result<()> {
    let mut session = Session::build(
        &params(2).return_results(false),
        &single_env(Script::counting(&[1.0]), &EnvLog::new()),
        &agents(AgentKind::Random, &AgentLog::new()),
    )?;
    assert_eq!(session.run()?, None);
    Ok(())
}

#[test]
fn test_missing_observation_bounds() -> Result<()> {
    let agent_log = AgentLog::new();
    let err = Session::build(
        &params(1).session_type(AgentKind::TileCoder),
        &single_env(Script::counting(&[1.0]), &EnvLog::new()),
        &agents(AgentKind::TileCoder, &agent_log),
    )
    .err()
    .unwrap();

    assert!(matches!(
        config_error(&err),
        ConfigError::MissingObservationBounds {
            agent: AgentKind::TileCoder,
            ..
        }
    ));
    assert_eq!(agent_log.n_agents(), 0);
    Ok(())
}

#[test]
fn test_observation_bounds_injected() -> Result<()> {
    let bounds = ObservationBounds::new(vec![-1.2, -0.07], vec![0.6, 0.07])?;
    let envs = {
        let bounds = bounds.clone();
        EnvRegistry::<O, A>::new().register(EnvironmentKind::Gym, move |_| {
            let env = DummyEnv::new(Script::counting(&[1.0]), &EnvLog::new()).with_bounds(bounds.clone());
            Ok(EnvHandle::Single(Box::new(env)))
        })
    };
    let injected = Rc::new(RefCell::new(None));
    let agents = {
        let injected = injected.clone();
        let log = AgentLog::new();
        AgentRegistry::<O, A>::new().register(AgentKind::TileCoder, move |config| {
            *injected.borrow_mut() = config
                .function_approximator()
                .and_then(|fa| fa.env_bounds())
                .cloned();
            Ok(Box::new(DummyAgent::new(&log)) as Box<dyn Agent<O, A>>)
        })
    };

    let session = Session::build(&params(1).session_type(AgentKind::TileCoder), &envs, &agents)?;
    assert_eq!(*injected.borrow(), Some(bounds.clone()));
    let fa = session.config().agent().function_approximator().unwrap();
    assert_eq!(fa.env_bounds(), Some(&bounds));
    Ok(())
}

#[test]
fn test_consolidation_after_end() -> Result<()> {
    let agent_log = AgentLog::new();
    let mut session = Session::build(
        &params(2)
            .session_type(AgentKind::Reinforce)
            .multi_agent(true),
        &multi_env(&["left", "right"], vec![1.0, 1.0], &EnvLog::new()),
        &agents(AgentKind::Reinforce, &agent_log),
    )?;
    session.run()?;

    let calls = agent_log.calls();
    let learns: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, (_, call))| *call == AgentCall::Learn)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(learns.len(), 4);

    for id in 0..2 {
        let of_agent = agent_log.calls_of(id);
        assert_eq!(
            of_agent.iter().filter(|c| **c == AgentCall::Learn).count(),
            2
        );
        assert_eq!(of_agent.last(), Some(&AgentCall::Learn));
    }

    // Both agents end the episode before any of them learns.
    let first_learn = learns[0];
    let ends_before: usize = calls[..first_learn]
        .iter()
        .filter(|(_, call)| matches!(call, AgentCall::End(..)))
        .count();
    assert_eq!(ends_before, 2);
    Ok(())
}

#[test]
fn test_no_consolidation_for_online_agents() -> Result<()> {
    let agent_log = AgentLog::new();
    Session::build(
        &params(3).session_type(AgentKind::ActorCritic),
        &single_env(Script::counting(&[1.0, 1.0]), &EnvLog::new()),
        &agents(AgentKind::ActorCritic, &agent_log),
    )?
    .run()?;
    assert!(agent_log.calls().iter().all(|(_, c)| *c != AgentCall::Learn));
    Ok(())
}

#[test]
fn test_abort_keeps_completed_episodes() -> Result<()> {
    let env_log = EnvLog::new();
    let envs = {
        let env_log = env_log.clone();
        EnvRegistry::<O, A>::new().register(EnvironmentKind::Gym, move |_| {
            let env = DummyEnv::new(Script::counting(&[1.0, 2.0, 3.0]), &env_log).fail_at_reset(2);
            Ok(EnvHandle::Single(Box::new(env)))
        })
    };
    let mut session = Session::build(&params(5), &envs, &agents(AgentKind::Random, &AgentLog::new()))?;

    let err = session.run().err().unwrap();
    let aborted = err.downcast_ref::<RunAborted>().unwrap();
    assert_eq!(aborted.episode, 2);
    assert_eq!(aborted.completed.as_slice(), &[6.0, 6.0]);
    assert_eq!(env_log.n_resets(), 2);
    Ok(())
}

#[test]
fn test_abort_on_agent_failure() -> Result<()> {
    let agents = {
        let log = AgentLog::new();
        AgentRegistry::<O, A>::new().register(AgentKind::Random, move |_| {
            Ok(Box::new(DummyAgent::new(&log).fail_at_step(2)) as Box<dyn Agent<O, A>>)
        })
    };
    let mut session = Session::build(
        &params(3),
        &single_env(Script::counting(&[1.0, 1.0]), &EnvLog::new()),
        &agents,
    )?;

    let err = session.run().err().unwrap();
    let aborted = err.downcast_ref::<RunAborted>().unwrap();
    assert_eq!(aborted.episode, 1);
    assert_eq!(aborted.completed.as_slice(), &[2.0]);
    Ok(())
}

#[test]
fn test_arity_mismatch() {
    let err = Session::build(
        &params(1).multi_agent(true),
        &single_env(Script::counting(&[1.0]), &EnvLog::new()),
        &agents(AgentKind::Random, &AgentLog::new()),
    )
    .err()
    .unwrap();
    assert!(matches!(
        config_error(&err),
        ConfigError::AgentArityMismatch { .. }
    ));

    let err = Session::build(
        &params(1),
        &multi_env(&["a", "b"], vec![1.0, 1.0], &EnvLog::new()),
        &agents(AgentKind::Random, &AgentLog::new()),
    )
    .err()
    .unwrap();
    assert!(matches!(
        config_error(&err),
        ConfigError::AgentArityMismatch { .. }
    ));
}

#[test]
fn test_unregistered_kinds() {
    let env_log = EnvLog::new();
    let err = Session::build(
        &params(1).session_type(AgentKind::Dqn),
        &single_env(Script::counting(&[1.0]), &env_log),
        &agents(AgentKind::Random, &AgentLog::new()),
    )
    .err()
    .unwrap();
    assert!(matches!(
        config_error(&err),
        ConfigError::UnsupportedAgent(AgentKind::Dqn)
    ));

    let err = Session::build(
        &params(1).environment(EnvironmentKind::Godot, "Arena"),
        &single_env(Script::counting(&[1.0]), &env_log),
        &agents(AgentKind::Random, &AgentLog::new()),
    )
    .err()
    .unwrap();
    assert!(matches!(
        config_error(&err),
        ConfigError::UnsupportedEnvironment {
            kind: EnvironmentKind::Godot,
            ..
        }
    ));
    assert_eq!(env_log.n_resets(), 0);
}

#[test]
fn test_duplicate_agent_names() {
    let err = Session::build(
        &params(1).multi_agent(true),
        &multi_env(&["a", "a"], vec![1.0, 1.0], &EnvLog::new()),
        &agents(AgentKind::Random, &AgentLog::new()),
    )
    .err()
    .unwrap();
    assert!(matches!(
        config_error(&err),
        ConfigError::InvalidAgentNames(_)
    ));
}

#[test]
fn test_mountain_car_success() -> Result<()> {
    let agent_log = AgentLog::new();
    let script = Script::new(
        vec![-0.5, 0.0],
        vec![(vec![-0.3, 0.02], -1.0), (vec![0.55, 0.03], -1.0)],
    );
    let mut session = Session::build(
        &params(1).reward_shaping(RewardShapingConfig::mountain_car_success()),
        &single_env(script, &EnvLog::new()),
        &agents(AgentKind::Random, &agent_log),
    )?;

    let mut recorder = BufferedRecorder::new();
    let rewards = session.run_with_recorder(&mut recorder)?.unwrap();
    assert_eq!(rewards.as_slice(), &[-2.0]);
    assert_eq!(
        agent_log.calls_of(0).last(),
        Some(&AgentCall::End(vec![0.55, 0.03], 1.0))
    );

    let record = recorder.iter().next().unwrap();
    assert_eq!(record.get_scalar("success")?, 1.0);
    assert_eq!(record.get_scalar("episode_reward")?, -2.0);
    assert_eq!(record.get_scalar("n_steps")?, 2.0);
    assert_eq!(record.get_string("environment")?, "Dummy-v0");
    Ok(())
}

#[test]
fn test_multi_agent_routing_and_reward() -> Result<()> {
    let agent_log = AgentLog::new();
    let env_log = EnvLog::new();
    let envs = {
        let env_log = env_log.clone();
        EnvRegistry::<O, A>::new().register(EnvironmentKind::Gym, move |_| {
            let env = DummyMultiAgentEnv::new(&["a", "b"], Script::counting(&[1.0, 2.0]), &env_log)
                .with_reward_scales(vec![1.0, 10.0])
                .report_reversed();
            Ok(EnvHandle::Multi(Box::new(env)))
        })
    };
    let agents = agents(AgentKind::Random, &agent_log);

    let primary = Session::build(&params(1).multi_agent(true), &envs, &agents)?.run()?;
    assert_eq!(primary.unwrap().as_slice(), &[3.0]);

    // Agent 1 is "b": it sees its own index and its own scaled rewards.
    assert_eq!(
        agent_log.calls_of(1),
        vec![
            AgentCall::Start(vec![0.0, 1.0]),
            AgentCall::Step(vec![1.0, 1.0], 10.0),
            AgentCall::End(vec![2.0, 1.0], 20.0),
        ]
    );
    // Actions follow the declared order, whatever the order of the report.
    assert_eq!(
        env_log.acts()[0],
        vec![("a".to_string(), 0), ("b".to_string(), 0)]
    );
    assert_eq!(
        env_log.acts()[1],
        vec![("a".to_string(), 1), ("b".to_string(), 1)]
    );

    let sum = Session::build(
        &params(1)
            .multi_agent(true)
            .multi_agent_reward(MultiAgentReward::Sum),
        &envs,
        &agents,
    )?
    .run()?;
    assert_eq!(sum.unwrap().as_slice(), &[33.0]);
    Ok(())
}

#[test]
fn test_agent_missing_from_terminal_report() -> Result<()> {
    let agent_log = AgentLog::new();
    let envs = EnvRegistry::<O, A>::new().register(EnvironmentKind::Gym, move |_| {
        let env = DummyMultiAgentEnv::new(&["a", "b"], Script::counting(&[1.0, 2.0]), &EnvLog::new())
            .omit_at_end("b");
        Ok(EnvHandle::Multi(Box::new(env)))
    });
    let mut session = Session::build(
        &params(2).multi_agent(true),
        &envs,
        &agents(AgentKind::Random, &agent_log),
    )?;

    let err = session.run().err().unwrap();
    let aborted = err.downcast_ref::<RunAborted>().unwrap();
    assert_eq!(aborted.episode, 0);
    assert!(aborted.completed.is_empty());
    assert!(format!("{:?}", aborted.source).contains("\"b\""));
    Ok(())
}

#[derive(Clone, Default)]
struct SharedPlotter(Rc<RefCell<Vec<(String, Vec<LabeledSeries>)>>>);

impl Plotter for SharedPlotter {
    fn plot(&mut self, title: &str, series: &[LabeledSeries]) -> Result<()> {
        self.0.borrow_mut().push((title.to_string(), series.to_vec()));
        Ok(())
    }
}

#[test]
fn test_smoothed_and_plotted() -> Result<()> {
    let plotter = SharedPlotter::default();
    let envs = EnvRegistry::<O, A>::new().register(EnvironmentKind::Gym, move |_| {
        let scripts = vec![
            Script::counting(&[1.0]),
            Script::counting(&[2.0]),
            Script::counting(&[3.0]),
            Script::counting(&[4.0]),
        ];
        Ok(EnvHandle::Single(Box::new(DummyEnv::cycling(scripts, &EnvLog::new()))))
    });
    let mut session = Session::build(
        &params(4).plot(true).avg_results(2),
        &envs,
        &agents(AgentKind::Random, &AgentLog::new()),
    )?
    .with_plotter(Box::new(plotter.clone()));

    // Raw episode rewards are 1, 2, 3 and 4.
    let rewards = session.run()?.unwrap();
    assert_eq!(rewards.as_slice(), &[1.0, 1.5, 2.5, 3.5]);

    let plotted = plotter.0.borrow();
    assert_eq!(plotted.len(), 1);
    assert_eq!(plotted[0].0, "Dummy-v0");
    assert_eq!(
        plotted[0].1,
        vec![LabeledSeries::new("Dummy-v0", vec![1.0, 1.5, 2.5, 3.5])]
    );
    Ok(())
}

#[test]
fn test_shown_episodes_are_rendered() -> Result<()> {
    let env_log = EnvLog::new();
    Session::build(
        &params(4).show(2),
        &single_env(Script::counting(&[1.0, 1.0, 1.0]), &env_log),
        &agents(AgentKind::Random, &AgentLog::new()),
    )?
    .run()?;
    // Episodes 0 and 2, three steps each.
    assert_eq!(env_log.n_renders(), 6);
    Ok(())
}

#[test]
fn test_shown_episodes_reset_with_rendering() -> Result<()> {
    let env_log = EnvLog::new();
    Session::build(
        &params(5).multi_agent(true).show(2),
        &multi_env(&["a", "b"], vec![1.0, 1.0], &env_log),
        &agents(AgentKind::Random, &AgentLog::new()),
    )?
    .run()?;
    assert_eq!(env_log.reset_renders(), vec![true, false, true, false, true]);
    // Episodes 0, 2 and 4, three steps each.
    assert_eq!(env_log.n_renders(), 9);
    Ok(())
}
