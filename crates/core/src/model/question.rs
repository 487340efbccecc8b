use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("invalid answer label: {0:?}")]
    InvalidLabel(String),

    #[error("unknown subject: {0:?}")]
    UnknownSubject(String),

    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
}

/// Canonical form used whenever subject or difficulty strings are compared.
///
/// Question banks are edited by hand, so `" Verbal ability"` and
/// `"Verbal Ability"` must be treated as the same tag.
#[must_use]
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// The fixed set of exam subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    QuantitativeAptitude,
    VerbalAbility,
    LogicalReasoning,
    GeneralKnowledge,
    GeneralScience,
}

impl Subject {
    pub const ALL: [Subject; 5] = [
        Subject::QuantitativeAptitude,
        Subject::VerbalAbility,
        Subject::LogicalReasoning,
        Subject::GeneralKnowledge,
        Subject::GeneralScience,
    ];

    /// Display name, identical to the tag used by the question bank.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Subject::QuantitativeAptitude => "Quantitative Aptitude",
            Subject::VerbalAbility => "Verbal Ability",
            Subject::LogicalReasoning => "Logical Reasoning",
            Subject::GeneralKnowledge => "General Knowledge",
            Subject::GeneralScience => "General Science",
        }
    }

    /// Returns true if a raw subject tag refers to this subject.
    #[must_use]
    pub fn matches(self, raw: &str) -> bool {
        normalize(raw) == normalize(self.name())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subject {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.matches(s))
            .ok_or_else(|| QuestionError::UnknownSubject(s.to_string()))
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Ordered difficulty levels, easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::VeryHard => "Very Hard",
        }
    }

    /// Position of this level in `Difficulty::ALL`.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns true if a raw difficulty tag refers to this level.
    #[must_use]
    pub fn matches(self, raw: &str) -> bool {
        normalize(raw) == normalize(self.name())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    /// Accepts display names case-insensitively; `"veryhard"` and
    /// `"very-hard"` are also understood so CLI input stays forgiving.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Difficulty::ALL
            .into_iter()
            .find(|level| level.name().replace(' ', "").to_lowercase() == squashed)
            .ok_or_else(|| QuestionError::UnknownDifficulty(s.to_string()))
    }
}

//
// ─── ANSWER LABELS & OPTIONS ───────────────────────────────────────────────────
//

/// One of the four option labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnswerLabel {
    A,
    B,
    C,
    D,
}

impl AnswerLabel {
    pub const ALL: [AnswerLabel; 4] = [
        AnswerLabel::A,
        AnswerLabel::B,
        AnswerLabel::C,
        AnswerLabel::D,
    ];

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            AnswerLabel::A => 'A',
            AnswerLabel::B => 'B',
            AnswerLabel::C => 'C',
            AnswerLabel::D => 'D',
        }
    }
}

impl fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for AnswerLabel {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(AnswerLabel::A),
            "B" => Ok(AnswerLabel::B),
            "C" => Ok(AnswerLabel::C),
            "D" => Ok(AnswerLabel::D),
            _ => Err(QuestionError::InvalidLabel(s.to_string())),
        }
    }
}

/// Option texts keyed by label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    a: String,
    b: String,
    c: String,
    d: String,
}

impl Options {
    #[must_use]
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
        d: impl Into<String>,
    ) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    #[must_use]
    pub fn get(&self, label: AnswerLabel) -> &str {
        match label {
            AnswerLabel::A => &self.a,
            AnswerLabel::B => &self.b,
            AnswerLabel::C => &self.c,
            AnswerLabel::D => &self.d,
        }
    }

    /// Iterates `(label, text)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (AnswerLabel, &str)> {
        AnswerLabel::ALL.into_iter().map(|label| (label, self.get(label)))
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question as loaded from the question bank.
///
/// Subject and difficulty tags are kept verbatim; comparisons go through
/// [`Subject::matches`] and [`Difficulty::matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    subject: String,
    difficulty: String,
    text: String,
    options: Options,
    correct_answer: AnswerLabel,
    explanation: String,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the question text is blank.
    pub fn new(
        id: QuestionId,
        subject: impl Into<String>,
        difficulty: impl Into<String>,
        text: impl Into<String>,
        options: Options,
        correct_answer: AnswerLabel,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        Ok(Self {
            id,
            subject: subject.into(),
            difficulty: difficulty.into(),
            text,
            options,
            correct_answer,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    /// Parsed difficulty level, if the tag is one of the known levels.
    #[must_use]
    pub fn difficulty_level(&self) -> Option<Difficulty> {
        Difficulty::ALL
            .into_iter()
            .find(|level| level.matches(&self.difficulty))
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn option(&self, label: AnswerLabel) -> &str {
        self.options.get(label)
    }

    #[must_use]
    pub fn correct_answer(&self) -> AnswerLabel {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, label: AnswerLabel) -> bool {
        self.correct_answer == label
    }
}

//
// ─── WIRE RECORD ───────────────────────────────────────────────────────────────
//

/// Serialized shape of a question as exchanged with the question-bank API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub subject: String,
    pub difficulty: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionRecord {
    /// Convert the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the correct answer is not one of A-D or the
    /// question text is blank.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let correct_answer = self.correct_answer.parse::<AnswerLabel>()?;
        Question::new(
            self.id,
            self.subject,
            self.difficulty,
            self.question,
            Options::new(self.option_a, self.option_b, self.option_c, self.option_d),
            correct_answer,
            self.explanation,
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> QuestionRecord {
        QuestionRecord {
            id: QuestionId::new(1),
            subject: "Quantitative Aptitude".into(),
            difficulty: "Easy".into(),
            question: "What is 15% of 200?".into(),
            option_a: "20".into(),
            option_b: "30".into(),
            option_c: "40".into(),
            option_d: "50".into(),
            correct_answer: "B".into(),
            explanation: "15% of 200 = 30".into(),
        }
    }

    #[test]
    fn subject_matching_ignores_case_and_padding() {
        assert!(Subject::VerbalAbility.matches("verbal ability"));
        assert!(Subject::VerbalAbility.matches("  Verbal Ability "));
        assert!(!Subject::VerbalAbility.matches("Verbal"));
        assert_eq!(
            "logical reasoning".parse::<Subject>().unwrap(),
            Subject::LogicalReasoning
        );
    }

    #[test]
    fn difficulty_parses_loose_spellings() {
        assert_eq!("very hard".parse::<Difficulty>().unwrap(), Difficulty::VeryHard);
        assert_eq!("VeryEasy".parse::<Difficulty>().unwrap(), Difficulty::VeryEasy);
        assert_eq!("very-easy".parse::<Difficulty>().unwrap(), Difficulty::VeryEasy);
        assert!(matches!(
            "brutal".parse::<Difficulty>(),
            Err(QuestionError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn difficulty_order_follows_table_order() {
        assert!(Difficulty::VeryEasy < Difficulty::VeryHard);
        for (i, level) in Difficulty::ALL.into_iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn answer_label_parses_lowercase() {
        assert_eq!(" c".parse::<AnswerLabel>().unwrap(), AnswerLabel::C);
        assert!(matches!(
            "E".parse::<AnswerLabel>(),
            Err(QuestionError::InvalidLabel(_))
        ));
    }

    #[test]
    fn record_converts_to_question_with_label_lookup() {
        let question = record().into_question().unwrap();
        assert_eq!(question.correct_answer(), AnswerLabel::B);
        assert_eq!(question.option(AnswerLabel::B), "30");
        assert!(question.is_correct(AnswerLabel::B));
        assert_eq!(question.difficulty_level(), Some(Difficulty::Easy));

        let labels: Vec<char> = question.options().iter().map(|(l, _)| l.as_char()).collect();
        assert_eq!(labels, vec!['A', 'B', 'C', 'D']);
    }

    #[test]
    fn record_rejects_bad_correct_answer() {
        let mut bad = record();
        bad.correct_answer = "30".into();
        assert!(matches!(
            bad.into_question(),
            Err(QuestionError::InvalidLabel(_))
        ));
    }

    #[test]
    fn record_rejects_blank_question_text() {
        let mut bad = record();
        bad.question = "   ".into();
        assert_eq!(bad.into_question().unwrap_err(), QuestionError::EmptyText);
    }

    #[test]
    fn record_json_uses_bank_field_names() {
        let json = serde_json::json!({
            "id": 7,
            "subject": "General Science",
            "difficulty": "Hard",
            "question": "Boiling point of water at sea level?",
            "option_a": "90",
            "option_b": "100",
            "option_c": "110",
            "option_d": "120",
            "correct_answer": "b"
        });
        let record: QuestionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.explanation, "");
        let question = record.into_question().unwrap();
        assert_eq!(question.id(), QuestionId::new(7));
        assert_eq!(question.correct_answer(), AnswerLabel::B);
        assert_eq!(question.option(AnswerLabel::B), "100");
    }
}
