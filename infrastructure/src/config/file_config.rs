//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use counsel_domain::{DomainError, SpecialistConfig, SpecialistId, SpecialistRegistry};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat-completion backend settings
    pub provider: FileProviderConfig,
    /// Orchestrator settings
    pub orchestrator: FileOrchestratorConfig,
    /// Specialist panel (`[[specialists]]`); empty means built-in panel
    pub specialists: Vec<FileSpecialistConfig>,
}

impl FileConfig {
    /// Build the specialist registry from the configured panel.
    ///
    /// An empty `[[specialists]]` list selects the built-in tax panel.
    pub fn registry(&self) -> Result<SpecialistRegistry, DomainError> {
        if self.specialists.is_empty() {
            return Ok(SpecialistRegistry::default_panel());
        }
        let specialists = self
            .specialists
            .iter()
            .map(|s| s.to_domain())
            .collect::<Result<Vec<_>, _>>()?;
        SpecialistRegistry::new(specialists)
    }
}

/// Backend connection settings (`[provider]` section)
///
/// # Example
///
/// ```toml
/// [provider]
/// model = "claude-sonnet-4-5"
/// max_tokens = 4096
/// api_key_env = "ANTHROPIC_API_KEY"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the Messages API
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Hard output-token cap per request
    pub max_tokens: u32,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Literal API key; takes precedence over `api_key_env` when set
    pub api_key: Option<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-sonnet-4-5".to_string(),
            max_tokens: 4096,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: literal value first, then the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
    }
}

/// Orchestrator settings (`[orchestrator]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Replacement persona prompt; the built-in Lead Tax Partner persona
    /// is used when unset
    pub persona: Option<String>,
}

/// One specialist definition (`[[specialists]]` entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSpecialistConfig {
    pub id: String,
    pub display_name: String,
    pub persona_prompt: String,
    pub description: String,
}

impl FileSpecialistConfig {
    fn to_domain(&self) -> Result<SpecialistConfig, DomainError> {
        Ok(SpecialistConfig::new(
            SpecialistId::try_new(&self.id)?,
            &self.display_name,
            &self.persona_prompt,
            &self.description,
        ))
    }
}
