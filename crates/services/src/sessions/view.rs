use exam_core::model::{AnswerLabel, QuestionId, ReviewStatus, Score};

use super::service::{ActiveSession, CompletionCause};

/// Result line for one evaluated question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub index: usize,
    pub question_id: QuestionId,
    pub prompt: String,
    pub chosen: Option<(AnswerLabel, String)>,
    pub correct: (AnswerLabel, String),
    pub explanation: String,
    pub status: ReviewStatus,
}

/// What the results screen shows once a session completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub score: Score,
    pub cause: Option<CompletionCause>,
    pub time_taken_secs: u32,
    /// One entry per question up to and including the last one reached.
    pub reviews: Vec<QuestionReview>,
}

impl SessionReport {
    #[must_use]
    pub fn from_session(session: &ActiveSession) -> Self {
        let score = session.score();
        let reviews = session
            .questions()
            .iter()
            .take(score.total())
            .enumerate()
            .map(|(index, question)| {
                let chosen = session.answer(index);
                QuestionReview {
                    index,
                    question_id: question.id(),
                    prompt: question.text().to_string(),
                    chosen: chosen.map(|label| (label, question.option(label).to_string())),
                    correct: (
                        question.correct_answer(),
                        question.option(question.correct_answer()).to_string(),
                    ),
                    explanation: question.explanation().to_string(),
                    status: ReviewStatus::of(question, chosen),
                }
            })
            .collect();

        Self {
            score,
            cause: session.cause(),
            time_taken_secs: session.time_taken_secs(),
            reviews,
        }
    }
}
