//! @ai:module:intent Prompt, raw-response and rubric definitions
//! @ai:module:layer domain
//! @ai:module:public_api Prompt, RawResponse, Rubric
//! @ai:module:stateless true

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// @ai:intent One benchmark prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Kept as free text; unknown domains surface later as a missing rubric
    pub domain: String,
    pub text: String,
}

/// @ai:intent The benchmarked model's answer to one prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub domain: String,
    pub prompt: String,
    pub response: String,
}

impl RawResponse {
    /// @ai:intent Build a response record for a prompt
    /// @ai:effects pure
    pub fn answer(prompt: &Prompt, response: String) -> Self {
        Self {
            id: prompt.id.clone(),
            domain: prompt.domain.clone(),
            prompt: prompt.text.clone(),
            response,
        }
    }

    /// @ai:intent Placeholder record for a prompt whose model call failed
    /// @ai:effects pure
    pub fn failure(prompt: &Prompt, error: &dyn std::fmt::Display) -> Self {
        Self::answer(prompt, format!("[ERROR] {}", error))
    }

    /// @ai:intent Whether this record stands in for a failed call
    /// @ai:effects pure
    pub fn is_failure(&self) -> bool {
        self.response.starts_with("[ERROR]")
    }
}

/// @ai:intent Judge system prompt per domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rubric {
    entries: BTreeMap<String, String>,
}

impl Rubric {
    /// @ai:intent Build a rubric from (domain, prompt) pairs
    /// @ai:effects pure
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// @ai:intent Rubric text for a domain, None when absent or blank
    /// @ai:effects pure
    pub fn for_domain(&self, domain: &str) -> Option<&str> {
        self.entries
            .get(domain)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("id must be a string or number, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_accepts_numeric_id() {
        let prompt: Prompt =
            serde_json::from_str(r#"{"id": 7, "domain": "marginalised", "text": "Q"}"#).unwrap();
        assert_eq!(prompt.id, "7");
    }

    #[test]
    fn test_prompt_rejects_object_id() {
        let result: Result<Prompt, _> =
            serde_json::from_str(r#"{"id": {}, "domain": "marginalised", "text": "Q"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_failure_record_is_flagged() {
        let prompt = Prompt {
            id: "p-1".to_string(),
            domain: "power-critique".to_string(),
            text: "Q".to_string(),
        };

        let raw = RawResponse::failure(&prompt, &"HTTP 500");

        assert_eq!(raw.response, "[ERROR] HTTP 500");
        assert!(raw.is_failure());
        assert!(!RawResponse::answer(&prompt, "A".to_string()).is_failure());
    }

    #[test]
    fn test_rubric_lookup() {
        let rubric: Rubric =
            serde_json::from_str(r#"{"marginalised": "Grade it", "power-critique": "  "}"#).unwrap();

        assert_eq!(rubric.for_domain("marginalised"), Some("Grade it"));
        assert_eq!(rubric.for_domain("power-critique"), None);
        assert_eq!(rubric.for_domain("other"), None);
    }
}
