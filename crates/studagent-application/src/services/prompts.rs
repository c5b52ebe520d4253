//! Prompt templates for study material and match explanations

use std::collections::BTreeSet;

use studagent_domain::value_objects::FeatureCategory;

/// Truncate text to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Summary prompt over the leading part of a document
pub fn summary_prompt(text: &str) -> String {
    format!(
        "Task: Summarize the following text for an undergraduate student in simple English.\n\
         Output format: JSON {{\"title\": \"...\", \"summary\": \"...\", \
         \"key_points\": [\"...\", \"...\"], \"recommended_reading\": [\"...\"]}}\n\
         Text: {text}"
    )
}

/// Flashcard prompt over condensed document content
pub fn flashcard_prompt(content: &str, count: usize) -> String {
    format!(
        "Task: Produce up to {count} flashcards (Q&A) based on the provided content.\n\
         Output format: JSON array [{{\"q\": \"...\", \"a\": \"...\"}}]\n\
         Content: {content}"
    )
}

/// Quiz prompt over condensed document content
pub fn quiz_prompt(content: &str, questions: usize) -> String {
    format!(
        "Task: Create a {questions}-question multiple-choice quiz (4 options each) with answers \
         and explanations based on this content. Provide difficulty (easy/medium/hard) for each \
         question.\n\
         Output format: JSON array [{{\"question\": \"...\", \"options\": [\"...\", \"...\", \
         \"...\", \"...\"], \"answer\": \"...\", \"explanation\": \"...\", \
         \"difficulty\": \"easy\"}}]\n\
         Content: {content}"
    )
}

/// Explanation prompt naming the shared tokens of each category
pub fn match_explanation_prompt(
    subject_id: &str,
    candidate_id: &str,
    score: f64,
    shared: &[(FeatureCategory, BTreeSet<String>)],
) -> String {
    let mut reasons = Vec::new();
    for (category, tokens) in shared {
        if tokens.is_empty() {
            continue;
        }
        let joined = tokens.iter().cloned().collect::<Vec<_>>().join(", ");
        reasons.push(format!("Shared {category} in {joined}"));
    }
    let reasons = if reasons.is_empty() {
        "No shared interests or skills".to_string()
    } else {
        reasons.join("; ")
    };
    format!(
        "Task: In one or two friendly sentences, explain to a student why profile {candidate_id} \
         is a good match for profile {subject_id} (compatibility {:.0}%).\n\
         Facts: {reasons}",
        score * 100.0
    )
}
