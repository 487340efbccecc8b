use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use exam_core::model::{Question, QuestionRecord};

use crate::config::QuestionSourceConfig;
use crate::error::QuestionSourceError;

//
// ─── WIRE DOCUMENT ─────────────────────────────────────────────────────────────
//

/// Body of the question-bank listing endpoint: `{ "questions": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionDocument {
    pub questions: Vec<QuestionRecord>,
}

impl QuestionDocument {
    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::Decode` if the JSON does not match the shape.
    pub fn from_json(raw: &str) -> Result<Self, QuestionSourceError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a JSON document from disk.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::Io` or `QuestionSourceError::Decode`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuestionSourceError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Validate records into domain `Question`s, skipping any that fail.
    ///
    /// A bad row (blank text, unknown answer label) is logged and dropped so
    /// the rest of the bank stays usable.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::InvalidQuestion` for the first bad record
    /// when the document has records but none of them validate.
    pub fn into_questions(self) -> Result<Vec<Question>, QuestionSourceError> {
        let mut questions = Vec::with_capacity(self.questions.len());
        let mut first_error = None;

        for (index, record) in self.questions.into_iter().enumerate() {
            match record.into_question() {
                Ok(question) => questions.push(question),
                Err(source) => {
                    warn!(index, error = %source, "skipping invalid question");
                    if first_error.is_none() {
                        first_error = Some(QuestionSourceError::InvalidQuestion { index, source });
                    }
                }
            }
        }

        match first_error {
            Some(err) if questions.is_empty() => Err(err),
            _ => Ok(questions),
        }
    }
}

//
// ─── SOURCE CONTRACT ───────────────────────────────────────────────────────────
//

/// Read-only provider of the full question pool.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch every available question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` on transport, status or validation failure.
    /// No retry is attempted.
    async fn load_questions(&self) -> Result<Vec<Question>, QuestionSourceError>;
}

/// Question source backed by the question-bank HTTP API.
#[derive(Clone, Debug)]
pub struct HttpQuestionSource {
    client: Client,
    config: QuestionSourceConfig,
}

impl HttpQuestionSource {
    /// # Errors
    ///
    /// Returns `QuestionSourceError::Http` if the HTTP client cannot be built.
    pub fn new(config: QuestionSourceConfig) -> Result<Self, QuestionSourceError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &QuestionSourceConfig {
        &self.config
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn load_questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        let url = self.config.url().clone();
        let response = self.client.get(url.clone()).send().await.map_err(|err| {
            warn!(%url, error = %err, "question pool request failed");
            err
        })?;

        if !response.status().is_success() {
            warn!(%url, status = %response.status(), "question pool request rejected");
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }

        let document: QuestionDocument = response.json().await?;
        let questions = document.into_questions()?;
        info!(%url, count = questions.len(), "loaded question pool");
        Ok(questions)
    }
}

/// Question source over a fixed list, for tests and offline files.
#[derive(Clone, Debug, Default)]
pub struct InMemoryQuestionSource {
    questions: Vec<Question>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Load a local JSON document with the same shape as the API response.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the file cannot be read or validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuestionSourceError> {
        let questions = QuestionDocument::from_path(path)?.into_questions()?;
        Ok(Self::new(questions))
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn load_questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        Ok(self.questions.clone())
    }
}

//
// ─── POOL ──────────────────────────────────────────────────────────────────────
//

/// The loaded question pool, shared read-only by every session.
#[derive(Clone, Debug, Default)]
pub struct QuestionPool {
    questions: Arc<[Question]>,
}

impl QuestionPool {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into(),
        }
    }

    /// Load the pool once from a source.
    ///
    /// # Errors
    ///
    /// Propagates the source's `QuestionSourceError`.
    pub async fn load(source: &dyn QuestionSource) -> Result<Self, QuestionSourceError> {
        Ok(Self::new(source.load_questions().await?))
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{AnswerLabel, QuestionError};

    const DOC: &str = r#"{
        "questions": [
            {
                "id": 1,
                "subject": "Quantitative Aptitude",
                "difficulty": "Easy",
                "question": "What is 15% of 200?",
                "option_a": "20",
                "option_b": "30",
                "option_c": "40",
                "option_d": "50",
                "correct_answer": "B",
                "explanation": "15% of 200 = (15/100) x 200 = 30"
            },
            {
                "id": 2,
                "subject": "verbal ability ",
                "difficulty": "medium",
                "question": "Pick the synonym of 'rapid'.",
                "option_a": "slow",
                "option_b": "quick",
                "option_c": "late",
                "option_d": "calm",
                "correct_answer": "b",
                "explanation": ""
            }
        ]
    }"#;

    #[test]
    fn document_parses_and_validates() {
        let questions = QuestionDocument::from_json(DOC)
            .unwrap()
            .into_questions()
            .unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].correct_answer(), AnswerLabel::B);
        assert_eq!(questions[1].subject(), "verbal ability ");
    }

    #[test]
    fn invalid_record_is_skipped_and_valid_ones_kept() {
        let raw = DOC.replace("\"correct_answer\": \"b\"", "\"correct_answer\": \"\"");
        let questions = QuestionDocument::from_json(&raw)
            .unwrap()
            .into_questions()
            .unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id().value(), 1);
    }

    #[test]
    fn blank_rows_among_valid_ones_do_not_fail_the_load() {
        let raw = r#"{"questions": [
            {"id": 1, "subject": "General Science", "difficulty": "Easy", "question": "Q1",
             "option_a": "a", "option_b": "b", "option_c": "c", "option_d": "d",
             "correct_answer": "A"},
            {"id": 2, "subject": "General Science", "difficulty": "Easy", "question": "Q2",
             "option_a": "a", "option_b": "b", "option_c": "c", "option_d": "d",
             "correct_answer": ""},
            {"id": 3, "subject": "General Science", "difficulty": "Hard", "question": "  ",
             "option_a": "a", "option_b": "b", "option_c": "c", "option_d": "d",
             "correct_answer": "C"},
            {"id": 4, "subject": "General Science", "difficulty": "Hard", "question": "Q4",
             "option_a": "a", "option_b": "b", "option_c": "c", "option_d": "d",
             "correct_answer": "d"}
        ]}"#;
        let questions = QuestionDocument::from_json(raw)
            .unwrap()
            .into_questions()
            .unwrap();
        let ids: Vec<u64> = questions.iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(questions[1].correct_answer(), AnswerLabel::D);
    }

    #[test]
    fn document_with_no_valid_record_reports_the_first_bad_one() {
        let raw = DOC
            .replace("\"correct_answer\": \"B\"", "\"correct_answer\": \"\"")
            .replace("\"correct_answer\": \"b\"", "\"correct_answer\": \"quick\"");
        let err = QuestionDocument::from_json(&raw)
            .unwrap()
            .into_questions()
            .unwrap_err();
        assert!(matches!(
            err,
            QuestionSourceError::InvalidQuestion {
                index: 0,
                source: QuestionError::InvalidLabel(_)
            }
        ));
    }

    #[test]
    fn empty_document_is_an_empty_pool() {
        let questions = QuestionDocument::from_json(r#"{"questions": []}"#)
            .unwrap()
            .into_questions()
            .unwrap();
        assert!(questions.is_empty());
    }

    #[test]
    fn missing_questions_key_is_a_decode_error() {
        let err = QuestionDocument::from_json(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, QuestionSourceError::Decode(_)));
    }

    #[tokio::test]
    async fn pool_loads_from_in_memory_source() {
        let questions = QuestionDocument::from_json(DOC)
            .unwrap()
            .into_questions()
            .unwrap();
        let source = InMemoryQuestionSource::new(questions);
        let pool = QuestionPool::load(&source).await.unwrap();
        assert_eq!(pool.len(), 2);
        assert!(!pool.is_empty());
    }
}
