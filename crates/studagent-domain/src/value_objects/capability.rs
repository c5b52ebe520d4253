use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// A kind of generation a provider can be asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Condense a document into a structured summary
    Summarize,
    /// Produce question/answer flashcards
    GenerateFlashcards,
    /// Produce a multiple-choice quiz
    GenerateQuiz,
    /// Explain why two profiles match
    ExplainMatch,
}

impl Capability {
    /// All capabilities in declaration order
    pub const ALL: [Capability; 4] = [
        Capability::Summarize,
        Capability::GenerateFlashcards,
        Capability::GenerateQuiz,
        Capability::ExplainMatch,
    ];

    /// Wire name of the capability
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::GenerateFlashcards => "generate-flashcards",
            Self::GenerateQuiz => "generate-quiz",
            Self::ExplainMatch => "explain-match",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summarize" => Ok(Self::Summarize),
            "generate-flashcards" => Ok(Self::GenerateFlashcards),
            "generate-quiz" => Ok(Self::GenerateQuiz),
            "explain-match" => Ok(Self::ExplainMatch),
            other => Err(Error::validation(format!("Unknown capability: {other}"))),
        }
    }
}
