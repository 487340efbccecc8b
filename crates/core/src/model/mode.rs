use thiserror::Error;

use crate::model::question::{Difficulty, Subject};

pub const QUESTION_COUNT_MIN: u32 = 5;
pub const QUESTION_COUNT_MAX: u32 = 100;
pub const QUESTION_COUNT_DEFAULT: u32 = 20;

pub const TIMER_MINUTES_MIN: u32 = 5;
pub const TIMER_MINUTES_MAX: u32 = 180;
pub const TIMER_MINUTES_DEFAULT: u32 = 30;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Precondition failures when turning a draft into a startable configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModeError {
    #[error("a subject must be chosen for a subject-wise test")]
    MissingSubject,

    #[error("a target difficulty must be chosen for a mock test")]
    MissingTargetDifficulty,
}

//
// ─── SESSION PARAMETERS ────────────────────────────────────────────────────────
//

/// Question count and timer length shared by every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionParams {
    question_count: u32,
    timer_minutes: u32,
}

impl SessionParams {
    /// Builds parameters, clamping each value into its allowed range.
    ///
    /// Zero selects the default, the same way an empty number input does.
    #[must_use]
    pub fn new(question_count: u32, timer_minutes: u32) -> Self {
        Self {
            question_count: clamp_or_default(
                question_count,
                QUESTION_COUNT_MIN,
                QUESTION_COUNT_MAX,
                QUESTION_COUNT_DEFAULT,
            ),
            timer_minutes: clamp_or_default(
                timer_minutes,
                TIMER_MINUTES_MIN,
                TIMER_MINUTES_MAX,
                TIMER_MINUTES_DEFAULT,
            ),
        }
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn timer_minutes(&self) -> u32 {
        self.timer_minutes
    }

    /// Timer length in seconds.
    #[must_use]
    pub fn timer_secs(&self) -> u32 {
        self.timer_minutes * 60
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            question_count: QUESTION_COUNT_DEFAULT,
            timer_minutes: TIMER_MINUTES_DEFAULT,
        }
    }
}

fn clamp_or_default(value: u32, min: u32, max: u32, default: u32) -> u32 {
    if value == 0 {
        default
    } else {
        value.clamp(min, max)
    }
}

//
// ─── MODE ──────────────────────────────────────────────────────────────────────
//

/// The three question-selection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    SubjectFiltered,
    MockTest,
    Random,
}

impl ModeKind {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ModeKind::SubjectFiltered => "Subject-wise Test",
            ModeKind::MockTest => "Mock Test",
            ModeKind::Random => "Random Practice",
        }
    }
}

/// A fully specified, startable mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeConfig {
    SubjectFiltered {
        subject: Subject,
        difficulty: Option<Difficulty>,
        params: SessionParams,
    },
    MockTest {
        target: Difficulty,
        params: SessionParams,
    },
    Random {
        params: SessionParams,
    },
}

impl ModeConfig {
    #[must_use]
    pub fn kind(&self) -> ModeKind {
        match self {
            ModeConfig::SubjectFiltered { .. } => ModeKind::SubjectFiltered,
            ModeConfig::MockTest { .. } => ModeKind::MockTest,
            ModeConfig::Random { .. } => ModeKind::Random,
        }
    }

    #[must_use]
    pub fn params(&self) -> SessionParams {
        match self {
            ModeConfig::SubjectFiltered { params, .. }
            | ModeConfig::MockTest { params, .. }
            | ModeConfig::Random { params } => *params,
        }
    }
}

/// Mode selection in progress: the user has picked a mode and may still be
/// filling in subject, difficulty, count and timer.
///
/// For `MockTest`, `difficulty` holds the target difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDraft {
    pub kind: ModeKind,
    pub subject: Option<Subject>,
    pub difficulty: Option<Difficulty>,
    pub question_count: u32,
    pub timer_minutes: u32,
}

impl ModeDraft {
    #[must_use]
    pub fn new(kind: ModeKind) -> Self {
        Self {
            kind,
            subject: None,
            difficulty: None,
            question_count: QUESTION_COUNT_DEFAULT,
            timer_minutes: TIMER_MINUTES_DEFAULT,
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = count;
        self
    }

    #[must_use]
    pub fn with_timer_minutes(mut self, minutes: u32) -> Self {
        self.timer_minutes = minutes;
        self
    }

    /// Validate the draft into a startable configuration.
    ///
    /// # Errors
    ///
    /// Returns `ModeError::MissingSubject` for a subject-wise draft without a
    /// subject and `ModeError::MissingTargetDifficulty` for a mock test
    /// without a target.
    pub fn validate(&self) -> Result<ModeConfig, ModeError> {
        let params = SessionParams::new(self.question_count, self.timer_minutes);
        match self.kind {
            ModeKind::SubjectFiltered => Ok(ModeConfig::SubjectFiltered {
                subject: self.subject.ok_or(ModeError::MissingSubject)?,
                difficulty: self.difficulty,
                params,
            }),
            ModeKind::MockTest => Ok(ModeConfig::MockTest {
                target: self.difficulty.ok_or(ModeError::MissingTargetDifficulty)?,
                params,
            }),
            ModeKind::Random => Ok(ModeConfig::Random { params }),
        }
    }
}
