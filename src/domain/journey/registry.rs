//! Registry of loaded journeys, one per intent.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::Intent;

use super::definition::JourneyDefinition;

/// Immutable intent -> journey lookup, built once at startup and shared
/// read-only by every session.
#[derive(Debug, Clone, Default)]
pub struct JourneyRegistry {
    journeys: HashMap<Intent, Arc<JourneyDefinition>>,
}

impl JourneyRegistry {
    /// Builds a registry from validated definitions.
    ///
    /// Returns the offending intent if two definitions claim the same one.
    pub fn new(definitions: Vec<JourneyDefinition>) -> Result<Self, Intent> {
        let mut journeys = HashMap::new();
        for definition in definitions {
            let intent = definition.intent().clone();
            if journeys.insert(intent.clone(), Arc::new(definition)).is_some() {
                return Err(intent);
            }
        }
        Ok(Self { journeys })
    }

    /// Looks up the journey governing an intent.
    pub fn get(&self, intent: &Intent) -> Option<Arc<JourneyDefinition>> {
        self.journeys.get(intent).cloned()
    }

    /// Number of registered journeys.
    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    /// Returns true if no journeys are registered.
    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }

    /// All registered intents.
    pub fn intents(&self) -> impl Iterator<Item = &Intent> {
        self.journeys.keys()
    }
}
