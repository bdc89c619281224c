//! Journey document configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Where journey definitions are loaded from at startup
#[derive(Debug, Clone, Deserialize)]
pub struct JourneyConfig {
    /// Directory containing one YAML document per intent
    #[serde(default = "default_dir")]
    pub dir: String,
}

impl JourneyConfig {
    /// Validate journey configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dir.trim().is_empty() {
            return Err(ValidationError::EmptyJourneyDir);
        }
        Ok(())
    }
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

fn default_dir() -> String {
    "journeys".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dir() {
        let config = JourneyConfig::default();
        assert_eq!(config.dir, "journeys");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_dir_is_invalid() {
        let config = JourneyConfig {
            dir: "  ".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyJourneyDir)
        ));
    }
}
