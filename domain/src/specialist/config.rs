//! Specialist identity and configuration (Value Objects)

use crate::core::DomainError;
use serde::{Deserialize, Serialize};

/// Prefix used when a specialist is declared as a callable tool.
///
/// The planner sees one tool per specialist, named `consult_<id>`. The same
/// convention is used in reverse to map a returned tool name back to a
/// specialist id.
pub const TOOL_NAME_PREFIX: &str = "consult_";

/// Identifier of a specialist (Value Object)
///
/// Lowercase identifier made of ASCII letters, digits, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpecialistId(String);

impl SpecialistId {
    /// Create a new specialist id
    ///
    /// # Panics
    /// Panics if the id is empty or contains invalid characters
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(Self::is_valid(&id), "Invalid specialist id: {id}");
        Self(id)
    }

    /// Try to create a specialist id, returning an error if invalid
    pub fn try_new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if Self::is_valid(&id) {
            Ok(Self(id))
        } else {
            Err(DomainError::InvalidSpecialistId(id))
        }
    }

    /// Map a planner-returned tool name back to a specialist id.
    ///
    /// Returns `None` when the name does not follow the `consult_<id>`
    /// convention.
    pub fn from_tool_name(tool_name: &str) -> Option<Self> {
        let id = tool_name.strip_prefix(TOOL_NAME_PREFIX)?;
        Self::try_new(id).ok()
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(id: &str) -> bool {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    }
}

impl std::fmt::Display for SpecialistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SpecialistId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<SpecialistId> for String {
    fn from(id: SpecialistId) -> Self {
        id.0
    }
}

/// Immutable configuration of a single specialist
///
/// Loaded at process start and shared read-only across all requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistConfig {
    /// Identifier used on the wire and in tool names
    pub id: SpecialistId,
    /// Human-readable name shown to the caller (e.g. in progress events)
    pub display_name: String,
    /// System prompt establishing the specialist's domain persona
    pub persona_prompt: String,
    /// Short description of the specialist's domain, shown to the planner
    /// as the tool description
    pub description: String,
}

impl SpecialistConfig {
    pub fn new(
        id: SpecialistId,
        display_name: impl Into<String>,
        persona_prompt: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            persona_prompt: persona_prompt.into(),
            description: description.into(),
        }
    }

    /// Name under which this specialist is declared as a callable tool
    pub fn tool_name(&self) -> String {
        format!("{TOOL_NAME_PREFIX}{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        assert!(SpecialistId::try_new("individual").is_ok());
        assert!(SpecialistId::try_new("corp_tax-2").is_ok());
    }

    #[test]
    fn invalid_ids_rejected() {
        assert!(SpecialistId::try_new("").is_err());
        assert!(SpecialistId::try_new("Upper").is_err());
        assert!(SpecialistId::try_new("has space").is_err());
    }

    #[test]
    #[should_panic]
    fn new_panics_on_invalid() {
        SpecialistId::new("Not Valid");
    }

    #[test]
    fn tool_name_round_trip() {
        let config = SpecialistConfig::new(
            SpecialistId::new("partnership"),
            "Partnership Tax Expert",
            "persona",
            "description",
        );
        assert_eq!(config.tool_name(), "consult_partnership");
        assert_eq!(
            SpecialistId::from_tool_name(&config.tool_name()),
            Some(config.id.clone())
        );
    }

    #[test]
    fn from_tool_name_rejects_foreign_names() {
        assert_eq!(SpecialistId::from_tool_name("read_file"), None);
        assert_eq!(SpecialistId::from_tool_name("consult_"), None);
        assert_eq!(SpecialistId::from_tool_name("consult_Bad Id"), None);
    }

    #[test]
    fn serde_as_plain_string() {
        let id = SpecialistId::new("individual");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"individual\"");
        let back: SpecialistId = serde_json::from_str("\"individual\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<SpecialistId>("\"Bad Id\"").is_err());
    }
}
