//! Agent card types: the metadata document an agent publishes so clients can
//! discover its identity, capabilities and skills before sending tasks.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::AuthenticationInfo;

/// Describes the capabilities of an agent.
///
/// The `streaming` and `push_notifications` flags gate the corresponding
/// protocol operations; the remaining fields are advisory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    /// Whether the agent supports `tasks/sendSubscribe` and
    /// `tasks/resubscribe` streaming.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub streaming: bool,
    /// Whether the agent accepts push notification configuration.
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        rename = "pushNotifications"
    )]
    pub push_notifications: bool,
    /// Whether the agent supports multi-turn conversations on a single task.
    #[serde(default, skip_serializing_if = "std::ops::Not::not", rename = "multiTurn")]
    pub multi_turn: bool,
    /// Whether the agent can work on multiple tasks concurrently.
    #[serde(default, skip_serializing_if = "std::ops::Not::not", rename = "multiTask")]
    pub multi_task: bool,
    /// Input MIME types the agent accepts.
    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "acceptedInputModes"
    )]
    pub accepted_input_modes: Option<Value>,
    /// The MIME type the agent produces when the client expresses no
    /// preference.
    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "defaultOutputMode"
    )]
    pub default_output_mode: Option<String>,
}

/// Describes the skills of an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSkills {
    /// Well-known skills the agent can perform.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        rename = "availableSkills",
        default
    )]
    pub available_skills: Vec<Skill>,
    /// Agent-specific skills keyed by name.
    #[serde(
        skip_serializing_if = "HashMap::is_empty",
        rename = "customSkills",
        default
    )]
    pub custom_skills: HashMap<String, SkillDetails>,
}

/// A skill that an agent can perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// The skill's type identifier.
    #[serde(rename = "type")]
    pub skill_type: String,
    /// Whether clients must support this skill to use the agent.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

/// Detailed information about a custom skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDetails {
    /// A human-readable description of the skill.
    pub description: String,
    /// An optional schema for the skill's parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Information about the provider of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProvider {
    /// The provider's name.
    pub name: String,
    /// The provider's website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Metadata about an agent, served to clients for discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCard {
    /// The kind of agent (e.g. 'assistant', 'tool').
    #[serde(rename = "agentType")]
    pub agent_type: String,
    /// The agent's display name.
    pub name: String,
    /// A human-readable description of what the agent does.
    pub description: String,
    /// The agent's version string.
    pub version: String,
    /// The agent's capabilities.
    pub capabilities: AgentCapabilities,
    /// The agent's skills.
    #[serde(default, skip_serializing_if = "is_default_skills")]
    pub skills: AgentSkills,
    /// Authentication methods the agent supports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthenticationInfo>,
    /// Information about the agent's provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AgentProvider>,
    /// Free-form extension fields.
    #[serde(
        skip_serializing_if = "HashMap::is_empty",
        rename = "additionalFields",
        default
    )]
    pub additional_fields: HashMap<String, Value>,
}

fn is_default_skills(skills: &AgentSkills) -> bool {
    skills.available_skills.is_empty() && skills.custom_skills.is_empty()
}
