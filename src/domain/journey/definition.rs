//! Journey definitions: the validated, immutable stage graph for one intent.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::foundation::Intent;

use super::stage::{Stage, StageId, StageTarget};

/// Reply used at terminal when a document does not declare one.
const DEFAULT_FINAL_MESSAGE: &str = "Thank you, that is everything I needed.";

/// Errors that make a journey document unusable.
///
/// All of these are startup-fatal: the affected intent is never served.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedJourney {
    #[error("Journey '{intent}' declares no stages")]
    NoStages { intent: String },

    #[error("Journey '{intent}' has a stage with an empty id")]
    EmptyStageId { intent: String },

    #[error("Journey '{intent}' duplicates stage id '{stage}'")]
    DuplicateStageId { intent: String, stage: String },

    #[error("Journey '{intent}' entry stage '{entry}' is not defined")]
    MissingEntryStage { intent: String, entry: String },

    #[error("Journey '{intent}' stage '{stage}' declares an empty required field name")]
    EmptyFieldName { intent: String, stage: String },

    #[error("Journey '{intent}' stage '{stage}' transitions to undefined stage '{target}'")]
    UnknownTransitionTarget {
        intent: String,
        stage: String,
        target: String,
    },

    #[error("Journey '{intent}' stage '{stage}' has no unconditional final transition")]
    NoDefaultTransition { intent: String, stage: String },

    #[error("Journey '{intent}' stage '{stage}' is unreachable from the entry stage")]
    UnreachableStage { intent: String, stage: String },
}

/// Raw shape of a journey document, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct JourneyDocument {
    pub intent: Intent,
    pub entry_stage_id: StageId,
    #[serde(default)]
    pub final_message: Option<String>,
    pub stages: Vec<Stage>,
}

/// Validated, immutable stage graph for one intent.
///
/// Construction enforces every structural invariant, so lookups on a
/// built definition cannot dangle. Shared read-only across sessions.
#[derive(Debug, Clone)]
pub struct JourneyDefinition {
    intent: Intent,
    entry_stage_id: StageId,
    final_message: String,
    stages: Vec<Stage>,
    index: HashMap<StageId, usize>,
    field_schema: HashSet<String>,
}

impl JourneyDefinition {
    /// Validates a raw document into a usable definition.
    pub fn new(doc: JourneyDocument) -> Result<Self, MalformedJourney> {
        let intent_name = doc.intent.as_str().to_string();

        if doc.stages.is_empty() {
            return Err(MalformedJourney::NoStages {
                intent: intent_name,
            });
        }

        let mut index = HashMap::new();
        for (pos, stage) in doc.stages.iter().enumerate() {
            if stage.id.is_blank() {
                return Err(MalformedJourney::EmptyStageId {
                    intent: intent_name,
                });
            }
            if index.insert(stage.id.clone(), pos).is_some() {
                return Err(MalformedJourney::DuplicateStageId {
                    intent: intent_name,
                    stage: stage.id.to_string(),
                });
            }
        }

        if !index.contains_key(&doc.entry_stage_id) {
            return Err(MalformedJourney::MissingEntryStage {
                intent: intent_name,
                entry: doc.entry_stage_id.to_string(),
            });
        }

        for stage in &doc.stages {
            if stage.required_fields.iter().any(|f| f.trim().is_empty()) {
                return Err(MalformedJourney::EmptyFieldName {
                    intent: intent_name,
                    stage: stage.id.to_string(),
                });
            }

            for rule in &stage.transitions {
                if let StageTarget::Stage(target) = &rule.target {
                    if !index.contains_key(target) {
                        return Err(MalformedJourney::UnknownTransitionTarget {
                            intent: intent_name,
                            stage: stage.id.to_string(),
                            target: target.to_string(),
                        });
                    }
                }
            }

            // The transition function must be total over collected data.
            let has_default = stage
                .transitions
                .last()
                .map(|rule| rule.is_unconditional())
                .unwrap_or(false);
            if !has_default {
                return Err(MalformedJourney::NoDefaultTransition {
                    intent: intent_name,
                    stage: stage.id.to_string(),
                });
            }
        }

        Self::check_reachability(&intent_name, &doc.entry_stage_id, &doc.stages, &index)?;

        let field_schema = doc
            .stages
            .iter()
            .flat_map(|s| s.required_fields.iter().cloned())
            .collect();

        Ok(Self {
            intent: doc.intent,
            entry_stage_id: doc.entry_stage_id,
            final_message: doc
                .final_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FINAL_MESSAGE.to_string()),
            stages: doc.stages,
            index,
            field_schema,
        })
    }

    fn check_reachability(
        intent: &str,
        entry: &StageId,
        stages: &[Stage],
        index: &HashMap<StageId, usize>,
    ) -> Result<(), MalformedJourney> {
        let mut seen: HashSet<&StageId> = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(entry);
        queue.push_back(entry);

        while let Some(current) = queue.pop_front() {
            let stage = &stages[index[current]];
            for rule in &stage.transitions {
                if let StageTarget::Stage(target) = &rule.target {
                    if seen.insert(target) {
                        queue.push_back(target);
                    }
                }
            }
        }

        for stage in stages {
            if !seen.contains(&stage.id) {
                return Err(MalformedJourney::UnreachableStage {
                    intent: intent.to_string(),
                    stage: stage.id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The intent this journey serves.
    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// Id of the stage every new session starts at.
    pub fn entry_stage_id(&self) -> &StageId {
        &self.entry_stage_id
    }

    /// The entry stage itself.
    pub fn entry_stage(&self) -> &Stage {
        &self.stages[self.index[&self.entry_stage_id]]
    }

    /// Looks up a stage by id.
    pub fn stage(&self, id: &StageId) -> Option<&Stage> {
        self.index.get(id).map(|&pos| &self.stages[pos])
    }

    /// All stages in declaration order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Reply sent when the journey reaches terminal.
    pub fn final_message(&self) -> &str {
        &self.final_message
    }

    /// Union of required fields across all stages.
    pub fn field_schema(&self) -> &HashSet<String> {
        &self.field_schema
    }

    /// Returns true if the field name appears anywhere in the journey.
    pub fn knows_field(&self, field: &str) -> bool {
        self.field_schema.contains(field)
    }
}
