//! Wire format of the generative-language `generateContent` call.
//!
//! Request: `{"contents": [{"parts": [{"text": "..."}]}]}`
//! Reply text lives at `candidates[0].content.parts[0].text`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

impl GenerateRequest {
    /// Request carrying a single user message and no history.
    pub fn single_prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part { text: text.into() }],
            }],
        }
    }

    /// All text parts joined, used for size checks.
    pub fn prompt_text(&self) -> String {
        self.contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateResponse {
    /// Trimmed text of the first part of the first candidate, if non-empty.
    pub fn reply_text(&self) -> Option<String> {
        let text = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let req = GenerateRequest::single_prompt("hello");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]}));
    }

    #[test]
    fn reply_text_extraction() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "  hi there \n"}]},
                "finishReason": "STOP"}], "usageMetadata": {}}"#,
        )
        .unwrap();
        assert_eq!(resp.reply_text().as_deref(), Some("hi there"));
    }

    #[test]
    fn missing_or_blank_reply() {
        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.reply_text(), None);
        let blank: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{"text": " "}]}}]}"#)
                .unwrap();
        assert_eq!(blank.reply_text(), None);
    }
}
