//! Null LLM provider tests
//!
//! The offline replies must be accepted by the document pipeline parsers.

use studagent_domain::ports::providers::LlmProvider;
use studagent_domain::{Capability, Flashcard, GenerationConstraints, QuizQuestion, StudySummary};
use studagent_providers::llm::NullLlmProvider;

async fn reply(capability: Capability, prompt: &str) -> String {
    NullLlmProvider::new("offline")
        .generate(capability, prompt, &GenerationConstraints::new().json())
        .await
        .unwrap()
        .text
}

#[tokio::test]
async fn test_summary_reply_deserializes() {
    let text = reply(Capability::Summarize, "Task: summarize\nText: Cells divide by mitosis.").await;
    let summary: StudySummary = serde_json::from_str(&text).unwrap();
    assert_eq!(summary.summary, "Cells divide by mitosis.");
}

#[tokio::test]
async fn test_flashcard_and_quiz_replies_deserialize() {
    let cards: Vec<Flashcard> =
        serde_json::from_str(&reply(Capability::GenerateFlashcards, "Content: mitosis").await)
            .unwrap();
    assert_eq!(cards.len(), 1);

    let quiz: Vec<QuizQuestion> =
        serde_json::from_str(&reply(Capability::GenerateQuiz, "Content: mitosis").await).unwrap();
    assert_eq!(quiz[0].options.len(), 4);
    assert_eq!(quiz[0].answer, "mitosis");
}

#[tokio::test]
async fn test_replies_are_deterministic() {
    let a = reply(Capability::ExplainMatch, "Facts: Shared interest in chess").await;
    let b = reply(Capability::ExplainMatch, "Facts: Shared interest in chess").await;
    assert_eq!(a, b);
    assert!(a.contains("chess"));
}
