#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod question_source;
pub mod sessions;

pub use exam_core::Clock;

pub use config::QuestionSourceConfig;
pub use error::{QuestionSourceError, SessionError};
pub use question_source::{
    HttpQuestionSource, InMemoryQuestionSource, QuestionDocument, QuestionPool, QuestionSource,
};

pub use sessions::{
    ActiveSession, CompletionCause, Countdown, ManualTicks, QuestionReview, SelectionPlan,
    SessionPhase, SessionProgress, SessionReport, SessionRunner, SessionSelector, SessionState,
    TickOutcome, TickSource, select,
};
