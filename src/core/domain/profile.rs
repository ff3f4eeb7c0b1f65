//! Profile type.
//!
//! A named configuration bundle selecting an AI backend, its base URL and
//! model, and the environment variables it declares.

use serde::{Deserialize, Serialize};

use super::agent::AgentKind;
use super::requirement::RequirementKind;
use crate::core::types::{EnvVarName, ProfileId};

/// One environment variable declared by a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVarDecl {
    pub name: EnvVarName,
    /// Value for `plain` declarations; ignored for secrets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub kind: RequirementKind,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Second name the injected value is exported under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<EnvVarName>,
}

fn default_required() -> bool {
    true
}

impl EnvVarDecl {
    /// Required secret declaration
    pub fn secret(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
            kind: RequirementKind::Secret,
            required: true,
            alias: None,
        }
    }

    /// Optional secret declaration
    pub fn optional_secret(name: &str) -> Self {
        Self {
            required: false,
            ..Self::secret(name)
        }
    }

    /// Plain declaration with a fixed value
    pub fn plain(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
            kind: RequirementKind::Plain,
            required: true,
            alias: None,
        }
    }

    /// Also export the value as `alias` when it is injected.
    ///
    /// Lets a provider key reach an agent that reads a fixed variable,
    /// e.g. `DEEPSEEK_API_KEY` as claude's `ANTHROPIC_AUTH_TOKEN`.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }
}

/// An AI backend profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Agents this profile can drive
    #[serde(default = "all_agents")]
    pub agents: Vec<AgentKind>,
    #[serde(default)]
    pub env: Vec<EnvVarDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_permission_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model_mode: Option<String>,
}

fn all_agents() -> Vec<AgentKind> {
    AgentKind::ALL.to_vec()
}

impl Profile {
    /// Minimal profile usable with every agent
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            base_url: None,
            model: None,
            agents: all_agents(),
            env: Vec::new(),
            default_permission_mode: None,
            default_model_mode: None,
        }
    }

    /// Builder-style helper to append a declaration
    pub fn with_env(mut self, decl: EnvVarDecl) -> Self {
        self.env.push(decl);
        self
    }

    /// Builder-style helper to restrict the agents
    pub fn with_agents(mut self, agents: &[AgentKind]) -> Self {
        self.agents = agents.to_vec();
        self
    }

    /// Whether this profile can drive `agent`
    pub fn supports(&self, agent: AgentKind) -> bool {
        self.agents.contains(&agent)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
