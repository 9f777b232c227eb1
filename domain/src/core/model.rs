//! Model value object representing a chat completion model

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Chat completion models (Value Object)
///
/// Well-known OpenAI identifiers get their own variant; anything else an
/// OpenAI-compatible endpoint accepts goes through [`Model::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Model {
    #[default]
    Gpt35Turbo1106,
    Gpt35Turbo,
    Gpt4,
    Gpt4Turbo,
    Gpt4o,
    Gpt4oMini,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier sent to the completion endpoint
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt35Turbo1106 => "gpt-3.5-turbo-1106",
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::Gpt4 => "gpt-4",
            Model::Gpt4Turbo => "gpt-4-turbo",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Custom(s) => s,
        }
    }

    /// Models with a dedicated variant
    pub fn known_models() -> Vec<Model> {
        vec![
            Model::Gpt35Turbo1106,
            Model::Gpt35Turbo,
            Model::Gpt4,
            Model::Gpt4Turbo,
            Model::Gpt4o,
            Model::Gpt4oMini,
        ]
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidModel(
                "model name cannot be empty".to_string(),
            ));
        }

        Ok(match s {
            "gpt-3.5-turbo-1106" => Model::Gpt35Turbo1106,
            "gpt-3.5-turbo" => Model::Gpt35Turbo,
            "gpt-4" => Model::Gpt4,
            "gpt-4-turbo" => Model::Gpt4Turbo,
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in Model::known_models() {
            let s = model.to_string();
            let parsed: Model = s.parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model: Model = "llama-3.1-8b-instruct".parse().unwrap();
        assert_eq!(model, Model::Custom("llama-3.1-8b-instruct".to_string()));
        assert_eq!(model.to_string(), "llama-3.1-8b-instruct");
    }

    #[test]
    fn test_empty_model_rejected() {
        let err = "  ".parse::<Model>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidModel(_)));
    }

    #[test]
    fn test_model_default() {
        assert_eq!(Model::default(), Model::Gpt35Turbo1106);
        assert_eq!(Model::default().as_str(), "gpt-3.5-turbo-1106");
    }

    #[test]
    fn test_model_serde_as_string() {
        let json = serde_json::to_string(&Model::Gpt4o).unwrap();
        assert_eq!(json, "\"gpt-4o\"");
        let parsed: Model = serde_json::from_str("\"gpt-4o-mini\"").unwrap();
        assert_eq!(parsed, Model::Gpt4oMini);
        assert!(serde_json::from_str::<Model>("\"\"").is_err());
    }
}
