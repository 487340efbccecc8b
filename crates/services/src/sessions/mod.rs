mod plan;
mod progress;
mod service;
mod timer;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SelectionPlan, SessionSelector, select};
pub use progress::SessionProgress;
pub use service::{ActiveSession, CompletionCause, SessionPhase, SessionRunner, SessionState};
pub use timer::{Countdown, ManualTicks, TickOutcome, TickSource};
pub use view::{QuestionReview, SessionReport};
