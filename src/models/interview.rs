use serde::{Deserialize, Serialize};

/// Question label used for free-form additions after the generated questions.
pub const TELL_ME_MORE: &str = "Tell me more";

/// One question and the author's answer.
///
/// Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Everything collected for a single outline point during the interview phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRecord {
    /// The exact outline point string this record answers.
    pub outline_point: String,
    /// Generated questions first, then any "tell me more" additions.
    pub q_and_a: Vec<QaPair>,
}

impl InterviewRecord {
    pub fn new(outline_point: impl Into<String>) -> Self {
        Self {
            outline_point: outline_point.into(),
            q_and_a: Vec::new(),
        }
    }

    /// Render the pairs as `Q: ...\nA: ...` blocks joined by newlines.
    pub fn qa_block(&self) -> String {
        self.q_and_a
            .iter()
            .map(|qa| format!("Q: {}\nA: {}", qa.question, qa.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Whether `records` already holds an entry for `point`.
pub fn is_interviewed(records: &[InterviewRecord], point: &str) -> bool {
    records.iter().any(|r| r.outline_point == point)
}

/// Parse a model completion as a JSON array of question strings.
///
/// Anything else (prose, an object, an array holding non-strings) is an error.
pub fn parse_questions(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(raw)
}
