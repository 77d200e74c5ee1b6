//! Configuration of sessions, agents and function approximators.
//!
//! Parameter files are parsed into plain parameter structs ([`SessionParams`],
//! [`AgentParams`], [`FunctionApproximatorParams`]). These are validated into
//! immutable configurations built bottom-up: function approximator, agent,
//! then session.
mod agent;
mod session;
mod shaping;
use crate::error::ConfigError;
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

pub use agent::{
    AgentConfig, AgentKind, AgentParams, FunctionApproximatorConfig, FunctionApproximatorParams,
};
pub use session::{EnvironmentKind, MultiAgentReward, SessionConfig, SessionParams};
pub use shaping::RewardShapingConfig;

/// Named options of agents, function approximators and environments.
pub type Options = BTreeMap<String, serde_yaml::Value>;

/// Reads a YAML file, or a JSON file if the extension is `json`.
pub fn load_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let rdr = BufReader::new(File::open(path)?);
    let is_json = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    let value = if is_json {
        serde_json::from_reader(rdr).map_err(|e| ConfigError::Parse(e.to_string()))?
    } else {
        serde_yaml::from_reader(rdr).map_err(|e| ConfigError::Parse(e.to_string()))?
    };
    Ok(value)
}

/// Converts a parameter value into a typed struct.
pub(crate) fn from_value<T: DeserializeOwned>(value: serde_yaml::Value) -> Result<T, ConfigError> {
    serde_yaml::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Moves top-level `agent_info` and `environment_info` sections into the
/// `session_info` mapping.
///
/// Without a `session_info` mapping, one is created if `create_session` is
/// set, otherwise the value is returned unchanged.
pub(crate) fn nest_sections(value: serde_yaml::Value, create_session: bool) -> serde_yaml::Value {
    let mut map = match value {
        serde_yaml::Value::Mapping(map) => map,
        value => return value,
    };
    let session_key = serde_yaml::Value::from("session_info");
    let mut session = match map.remove(&session_key) {
        Some(serde_yaml::Value::Mapping(session)) => session,
        None if create_session => serde_yaml::Mapping::new(),
        Some(other) => {
            map.insert(session_key, other);
            return serde_yaml::Value::Mapping(map);
        }
        None => return serde_yaml::Value::Mapping(map),
    };
    for key in ["agent_info", "environment_info"].iter() {
        if let Some(section) = map.remove(&serde_yaml::Value::from(*key)) {
            session.insert(serde_yaml::Value::from(*key), section);
        }
    }
    map.insert(session_key, serde_yaml::Value::Mapping(session));
    serde_yaml::Value::Mapping(map)
}

/// Reads session parameters, either sectioned or flat.
fn load_session_params(path: &Path) -> Result<SessionParams> {
    let session_key = serde_yaml::Value::from("session_info");
    let value = match nest_sections(load_file(path)?, false) {
        serde_yaml::Value::Mapping(mut map) => match map.remove(&session_key) {
            Some(session) => session,
            None => serde_yaml::Value::Mapping(map),
        },
        value => value,
    };
    Ok(from_value(value)?)
}

/// Renders an option value as a short label.
pub fn value_label(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
    }
}
