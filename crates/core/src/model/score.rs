use std::collections::BTreeMap;

use crate::model::question::{AnswerLabel, Question};

/// Outcome of one evaluated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Correct,
    Wrong,
    Unanswered,
}

impl ReviewStatus {
    #[must_use]
    pub fn of(question: &Question, answer: Option<AnswerLabel>) -> Self {
        match answer {
            Some(label) if question.is_correct(label) => ReviewStatus::Correct,
            Some(_) => ReviewStatus::Wrong,
            None => ReviewStatus::Unanswered,
        }
    }
}

/// Aggregate result over the evaluated prefix of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    correct: usize,
    wrong: usize,
    total: usize,
}

impl Score {
    /// Score the questions at indices `0..=upto` against the recorded answers.
    ///
    /// `upto` past the end evaluates the whole list; an empty list yields an
    /// all-zero score.
    #[must_use]
    pub fn evaluate(
        questions: &[Question],
        answers: &BTreeMap<usize, AnswerLabel>,
        upto: usize,
    ) -> Self {
        let evaluated = questions.len().min(upto.saturating_add(1));
        let mut correct = 0_usize;
        let mut wrong = 0_usize;

        for (index, question) in questions.iter().take(evaluated).enumerate() {
            match ReviewStatus::of(question, answers.get(&index).copied()) {
                ReviewStatus::Correct => correct += 1,
                ReviewStatus::Wrong => wrong += 1,
                ReviewStatus::Unanswered => {}
            }
        }

        Self {
            correct,
            wrong,
            total: evaluated,
        }
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> usize {
        self.wrong
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total - self.correct - self.wrong
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Percent correct, rounded half up. Zero when nothing was evaluated.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let rounded = (self.correct * 200 + self.total) / (self.total * 2);
        u32::try_from(rounded).unwrap_or(100)
    }
}
