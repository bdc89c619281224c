//! Stages and transition rules of a journey graph.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Marker string used in journey documents for the terminal target.
pub const TERMINAL_MARKER: &str = "$end";

/// Identifier of a stage, unique within one journey.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

impl StageId {
    /// Creates a StageId from a raw string. Emptiness is caught by
    /// journey validation, not here, so documents report a journey-level
    /// error instead of a parse failure.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Where a transition rule leads: another stage, or the absorbing end
/// of the journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StageTarget {
    Stage(StageId),
    Terminal,
}

impl From<String> for StageTarget {
    fn from(s: String) -> Self {
        if s == TERMINAL_MARKER {
            StageTarget::Terminal
        } else {
            StageTarget::Stage(StageId::new(s))
        }
    }
}

impl From<StageTarget> for String {
    fn from(target: StageTarget) -> Self {
        match target {
            StageTarget::Terminal => TERMINAL_MARKER.to_string(),
            StageTarget::Stage(id) => id.as_str().to_string(),
        }
    }
}

impl fmt::Display for StageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageTarget::Terminal => write!(f, "{}", TERMINAL_MARKER),
            StageTarget::Stage(id) => write!(f, "{}", id),
        }
    }
}

/// A single equality condition over collected data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCondition {
    /// Collected-data field the condition inspects.
    pub field: String,
    /// Value the field must equal for the condition to hold.
    pub equals: serde_json::Value,
}

impl FieldCondition {
    /// Evaluates the condition against collected data.
    ///
    /// A missing field never matches.
    pub fn matches(&self, data: &HashMap<String, serde_json::Value>) -> bool {
        data.get(&self.field) == Some(&self.equals)
    }
}

/// One rule of a stage's transition function.
///
/// Rules are evaluated in document order; the first matching rule wins.
/// A rule without a condition always matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRule {
    #[serde(default)]
    pub when: Option<FieldCondition>,
    pub target: StageTarget,
}

impl TransitionRule {
    /// Returns true if this rule applies to the given collected data.
    pub fn applies(&self, data: &HashMap<String, serde_json::Value>) -> bool {
        match &self.when {
            Some(condition) => condition.matches(data),
            None => true,
        }
    }

    /// Returns true if this rule has no condition.
    pub fn is_unconditional(&self) -> bool {
        self.when.is_none()
    }
}

/// One node of a journey's dialogue graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Unique id within the journey.
    pub id: StageId,
    /// Data fields this stage must collect before the journey advances.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// What to ask when the stage still needs data.
    pub prompt: String,
    /// Ordered transition rules; the last must be unconditional.
    pub transitions: Vec<TransitionRule>,
}

impl Stage {
    /// Returns the required fields not yet present in the collected data.
    pub fn missing_fields<'a>(
        &'a self,
        data: &HashMap<String, serde_json::Value>,
    ) -> Vec<&'a str> {
        self.required_fields
            .iter()
            .filter(|f| !data.contains_key(f.as_str()))
            .map(|f| f.as_str())
            .collect()
    }

    /// Returns true if every required field is present in the data.
    pub fn is_satisfied_by(&self, data: &HashMap<String, serde_json::Value>) -> bool {
        self.missing_fields(data).is_empty()
    }

    /// Evaluates the transition rules against collected data.
    ///
    /// Returns `None` only for a stage whose rules are not total; journey
    /// validation guarantees a trailing unconditional rule, so loaded
    /// journeys always produce a target.
    pub fn next_target(&self, data: &HashMap<String, serde_json::Value>) -> Option<&StageTarget> {
        self.transitions
            .iter()
            .find(|rule| rule.applies(data))
            .map(|rule| &rule.target)
    }
}
