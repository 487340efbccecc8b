mod distribution;
mod ids;
mod mode;
mod question;
mod score;

pub use distribution::{BUCKET_COUNT, Distribution};
pub use ids::QuestionId;
pub use mode::{
    ModeConfig, ModeDraft, ModeError, ModeKind, QUESTION_COUNT_DEFAULT, QUESTION_COUNT_MAX,
    QUESTION_COUNT_MIN, SessionParams, TIMER_MINUTES_DEFAULT, TIMER_MINUTES_MAX,
    TIMER_MINUTES_MIN,
};
pub use question::{
    AnswerLabel, Difficulty, Options, Question, QuestionError, QuestionRecord, Subject, normalize,
};
pub use score::{ReviewStatus, Score};
