//! Configuration of [`Experiment`](crate::Experiment).
use crate::{
    config::{load_file, nest_sections, value_label, SessionParams},
    error::ConfigError,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs::File, io::Write, path::Path};

/// Where the values of a session variant are substituted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantLevel {
    /// Options of the agent.
    Agent,

    /// Options of the function approximator of the agent.
    FunctionApproximator,
}

/// An option varied across the sessions of an experiment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionVariant {
    /// Value of the option in each session, in session order.
    pub values: Vec<serde_yaml::Value>,

    /// Where the option is substituted.
    pub level: VariantLevel,
}

impl SessionVariant {
    /// Constructs a variant.
    pub fn new(level: VariantLevel, values: Vec<serde_yaml::Value>) -> Self {
        Self { values, level }
    }
}

/// Configuration of an [`Experiment`](crate::Experiment).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// The number of sessions.
    pub num_sessions: usize,

    /// Options varied across sessions, by option name.
    pub session_variants: BTreeMap<String, SessionVariant>,

    /// Whether the reward series are smoothed with a trailing moving average.
    pub avg_results: bool,

    /// Window of the moving average.
    pub avg_length: usize,

    /// Parameters shared by all sessions.
    pub session_info: SessionParams,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            num_sessions: 0,
            session_variants: BTreeMap::new(),
            avg_results: false,
            avg_length: 100,
            session_info: SessionParams::default(),
        }
    }
}

impl ExperimentConfig {
    /// Sets the number of sessions.
    pub fn num_sessions(mut self, v: usize) -> Self {
        self.num_sessions = v;
        self
    }

    /// Adds an option varied across sessions.
    pub fn variant(mut self, name: impl Into<String>, variant: SessionVariant) -> Self {
        self.session_variants.insert(name.into(), variant);
        self
    }

    /// Smooths the reward series with a trailing moving average of the given window.
    pub fn avg_results(mut self, avg_length: usize) -> Self {
        self.avg_results = true;
        self.avg_length = avg_length;
        self
    }

    /// Sets the parameters shared by all sessions.
    pub fn session_info(mut self, v: SessionParams) -> Self {
        self.session_info = v;
        self
    }

    /// Loads the configuration from a YAML or JSON file.
    ///
    /// `agent_info` and `environment_info` may be given at the top level,
    /// next to `session_info`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let value: serde_yaml::Value = load_file(path)?;
        let value = nest_sections(value, true);
        Ok(serde_yaml::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))?)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    /// Returns the parameters of the `i`-th session.
    ///
    /// Variant values are substituted into the agent or function approximator
    /// options and `return_results` is forced on.
    pub fn session_params(&self, i: usize) -> Result<SessionParams, ConfigError> {
        let mut params = self.session_info.clone().return_results(true);
        for (name, variant) in self.session_variants.iter() {
            let value = variant_value(name, variant, i, self.num_sessions)?;
            let options = match variant.level {
                VariantLevel::Agent => &mut params.agent_info.options,
                VariantLevel::FunctionApproximator => {
                    &mut params
                        .agent_info
                        .function_approximator_info
                        .as_mut()
                        .ok_or_else(|| {
                            ConfigError::MissingKey("function_approximator_info".to_string())
                        })?
                        .options
                }
            };
            options.insert(name.clone(), value.clone());
        }
        Ok(params)
    }

    /// Returns the label of the `i`-th session, like `"trace_decay: 0.4, control_method: sarsa"`.
    pub fn session_label(&self, i: usize) -> Result<String, ConfigError> {
        let labels = self
            .session_variants
            .iter()
            .map(|(name, variant)| -> Result<String, ConfigError> {
                let value = variant_value(name, variant, i, self.num_sessions)?;
                Ok(format!("{}: {}", name, value_label(value)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(labels.join(", "))
    }

    /// Checks the options of the experiment itself. Session parameters are
    /// checked when the sessions are built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.avg_results && self.avg_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "avg_length".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Window of the moving average applied to the reward series, if any.
    pub fn smoothing_window(&self) -> Option<usize> {
        if self.avg_results {
            Some(self.avg_length)
        } else {
            None
        }
    }
}

fn variant_value<'a>(
    name: &str,
    variant: &'a SessionVariant,
    i: usize,
    num_sessions: usize,
) -> Result<&'a serde_yaml::Value, ConfigError> {
    variant
        .values
        .get(i)
        .ok_or_else(|| ConfigError::InvalidValue {
            key: format!("session_variants.{}", name),
            reason: format!(
                "{} values given for {} sessions",
                variant.values.len(),
                num_sessions
            ),
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{AgentParams, FunctionApproximatorParams};
    use tempdir::TempDir;

    fn yaml(s: &str) -> serde_yaml::Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn base_params() -> SessionParams {
        let agent: AgentParams = serde_yaml::from_str(
            "num_actions: 3\ntrace_decay: 0.0\nfunction_approximator_info:\n  type: tile coder\n  num_tiles: 4\n",
        )
        .unwrap();
        SessionParams::default().num_episodes(5).agent_info(agent)
    }

    #[test]
    fn test_substitution_levels() {
        let config = ExperimentConfig::default()
            .num_sessions(2)
            .session_info(base_params())
            .variant(
                "trace_decay",
                SessionVariant::new(VariantLevel::Agent, vec![yaml("0.4"), yaml("0.9")]),
            )
            .variant(
                "num_tiles",
                SessionVariant::new(VariantLevel::FunctionApproximator, vec![yaml("8"), yaml("16")]),
            );

        let params = config.session_params(1).unwrap();
        assert!(params.return_results);
        assert_eq!(params.agent_info.options.get("trace_decay"), Some(&yaml("0.9")));
        let fa = params.agent_info.function_approximator_info.unwrap();
        assert_eq!(fa.options.get("num_tiles"), Some(&yaml("16")));
        assert_eq!(fa.options.get("type"), Some(&yaml("tile coder")));
        assert!(!params.agent_info.options.contains_key("num_tiles"));

        // The base parameters are untouched.
        assert_eq!(
            config.session_info.agent_info.options.get("trace_decay"),
            Some(&yaml("0.0"))
        );
        assert!(!config.session_info.return_results);

        assert_eq!(
            config.session_label(0).unwrap(),
            "num_tiles: 8, trace_decay: 0.4"
        );
    }

    #[test]
    fn test_short_variant_values() {
        let config = ExperimentConfig::default()
            .num_sessions(3)
            .variant(
                "epsilon",
                SessionVariant::new(VariantLevel::Agent, vec![yaml("0.9"), yaml("0.95")]),
            );
        assert!(config.session_params(1).is_ok());
        match config.session_params(2) {
            Err(ConfigError::InvalidValue { key, .. }) => {
                assert_eq!(key, "session_variants.epsilon")
            }
            _ => panic!("expected an invalid value error"),
        }
    }

    #[test]
    fn test_missing_function_approximator() {
        let params = SessionParams::default().agent_info(AgentParams {
            function_approximator_info: None,
            ..AgentParams::default()
        });
        let config = ExperimentConfig::default()
            .num_sessions(1)
            .session_info(params)
            .variant(
                "batch_size",
                SessionVariant::new(VariantLevel::FunctionApproximator, vec![yaml("128")]),
            );
        assert!(matches!(
            config.session_params(0),
            Err(ConfigError::MissingKey(_))
        ));

        let with_fa = config.clone().session_info(SessionParams::default().agent_info(AgentParams {
            function_approximator_info: Some(FunctionApproximatorParams::default()),
            ..AgentParams::default()
        }));
        assert!(with_fa.session_params(0).is_ok());
    }

    #[test]
    fn test_load_top_level_sections() -> Result<()> {
        let dir = TempDir::new("experiment")?;
        let path = dir.path().join("experiment.yaml");
        std::fs::write(
            &path,
            r#"
num_sessions: 2
avg_results: true
session_variants:
  control_method:
    values: [sarsa, q-learning]
    level: agent
session_info:
  num_episodes: 500
  environment_name: MountainCar-v0
agent_info:
  num_actions: 3
environment_info:
  render_mode: none
"#,
        )?;

        let config = ExperimentConfig::load(&path)?;
        assert_eq!(config.num_sessions, 2);
        assert_eq!(config.smoothing_window(), Some(100));
        assert_eq!(config.session_info.num_episodes, 500);
        assert_eq!(
            config.session_info.agent_info.options.get("num_actions"),
            Some(&yaml("3"))
        );
        assert_eq!(
            config.session_info.environment_info.get("render_mode"),
            Some(&yaml("none"))
        );
        assert_eq!(config.session_label(1)?, "control_method: q-learning");

        let path = dir.path().join("saved.yaml");
        config.save(&path)?;
        assert_eq!(ExperimentConfig::load(&path)?, config);
        Ok(())
    }
}
