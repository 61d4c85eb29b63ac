use serde::Deserialize;

use crate::error::EnrichError;
use crate::model::{Mode, Priority};

/// Default output filename for the enriched table.
pub const DEFAULT_OUTPUT: &str = "convenio.csv";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EnrichConfig {
    pub name: String,
    #[serde(default)]
    pub mode: Mode,
    pub master: MasterConfig,
    pub sources: Vec<SourceConfig>,
    #[serde(default = "default_output")]
    pub output: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MasterConfig {
    pub file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub file: String,
    /// Forces the merge tier; when absent the filename marker decides.
    #[serde(default)]
    pub priority: Option<Priority>,
}

fn default_output() -> String {
    DEFAULT_OUTPUT.into()
}

impl EnrichConfig {
    pub fn from_toml(s: &str) -> Result<Self, EnrichError> {
        let config: Self = toml::from_str(s).map_err(|e| EnrichError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EnrichError> {
        if self.name.trim().is_empty() {
            return Err(EnrichError::ConfigValidation("name must not be empty".into()));
        }
        if self.master.file.trim().is_empty() {
            return Err(EnrichError::ConfigValidation("master.file must not be empty".into()));
        }
        if self.sources.is_empty() {
            return Err(EnrichError::ConfigValidation("at least one [[sources]] entry is required".into()));
        }
        for source in &self.sources {
            if source.file.trim().is_empty() {
                return Err(EnrichError::ConfigValidation("sources.file must not be empty".into()));
            }
        }
        if self.output.trim().is_empty() {
            return Err(EnrichError::ConfigValidation("output must not be empty".into()));
        }
        Ok(())
    }
}
