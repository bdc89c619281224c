//! Loading journey documents from YAML at startup.
//!
//! Malformed documents fail startup, never a request.

use std::path::Path;

use thiserror::Error;

use super::definition::{JourneyDefinition, JourneyDocument, MalformedJourney};
use super::registry::JourneyRegistry;

/// Errors that can occur while loading journey documents.
#[derive(Debug, Error)]
pub enum JourneyLoadError {
    #[error("Failed to read journey file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse journey file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid journey in {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: MalformedJourney,
    },

    #[error("Two journey files declare intent '{intent}'")]
    DuplicateIntent { intent: String },

    #[error("No journey files found in {dir}")]
    EmptyDirectory { dir: String },
}

/// Parses a single YAML document into a validated definition.
pub fn parse_journey_yaml(yaml: &str) -> Result<JourneyDefinition, ParseJourneyError> {
    let doc: JourneyDocument = serde_yaml::from_str(yaml)?;
    Ok(JourneyDefinition::new(doc)?)
}

/// Parse-level failure for a single document.
#[derive(Debug, Error)]
pub enum ParseJourneyError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Malformed(#[from] MalformedJourney),
}

/// Loads every `*.yaml`/`*.yml` file under `dir` into a registry.
pub fn load_journey_dir(dir: impl AsRef<Path>) -> Result<JourneyRegistry, JourneyLoadError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|source| JourneyLoadError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();
    // Deterministic load order so duplicate-intent errors are stable.
    paths.sort();

    let mut definitions = Vec::new();
    for path in paths {
        let file_display = path.display().to_string();
        let yaml = std::fs::read_to_string(&path).map_err(|source| JourneyLoadError::Io {
            path: file_display.clone(),
            source,
        })?;

        let definition = parse_journey_yaml(&yaml).map_err(|err| match err {
            ParseJourneyError::Yaml(source) => JourneyLoadError::Parse {
                path: file_display.clone(),
                source,
            },
            ParseJourneyError::Malformed(source) => JourneyLoadError::Malformed {
                path: file_display.clone(),
                source,
            },
        })?;

        tracing::info!(
            intent = %definition.intent(),
            stages = definition.stages().len(),
            file = %file_display,
            "loaded journey definition"
        );
        definitions.push(definition);
    }

    if definitions.is_empty() {
        return Err(JourneyLoadError::EmptyDirectory {
            dir: dir.display().to_string(),
        });
    }

    JourneyRegistry::new(definitions).map_err(|intent| JourneyLoadError::DuplicateIntent {
        intent: intent.to_string(),
    })
}
