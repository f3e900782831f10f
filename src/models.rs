use serde::{Deserialize, Serialize};

/// Profile submitted by the user before any tips are generated
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub age: String,
    pub gender: String,
    pub goal: String,
}

impl UserProfile {
    pub fn new(age: impl Into<String>, gender: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            age: age.into(),
            gender: gender.into(),
            goal: goal.into(),
        }
    }
}

/// A single tip as shown on the board and in the saved list
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WellnessTip {
    pub id: i64,
    pub title: String,
    pub short: String,
    pub icon: String,
}

/// Detailed guidance for one tip, fetched on demand and never cached
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TipDetail {
    pub explanation: String,
    pub steps: Vec<String>,
}

// Gemini generateContent request format
#[derive(Debug, Serialize, Clone)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Clone)]
pub struct Part {
    pub text: String,
}

// Gemini generateContent response format. Any level may be missing.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if it is present and non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }

    /// Convenience constructor for a single-candidate, single-part response.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![CandidatePart {
                        text: Some(text.into()),
                    }],
                }),
            }],
        }
    }
}
