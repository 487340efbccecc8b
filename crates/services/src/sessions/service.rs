use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use exam_core::Clock;
use exam_core::model::{AnswerLabel, ModeConfig, ModeDraft, ModeKind, Question, Score};
use exam_core::time::is_time_critical;

use super::plan::SessionSelector;
use super::progress::SessionProgress;
use super::timer::{Countdown, TickOutcome, TickSource};
use super::view::SessionReport;
use crate::error::SessionError;

//
// ─── SESSION DATA ──────────────────────────────────────────────────────────────
//

/// Why a session stopped accepting answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCause {
    /// Advanced past the last question.
    Finished,
    /// Stopped early by the user.
    Stopped,
    /// The countdown reached zero.
    TimedOut,
    /// The selection produced no questions.
    Empty,
}

/// One test run: its questions, answers, position and countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    config: ModeConfig,
    questions: Vec<Question>,
    answers: BTreeMap<usize, AnswerLabel>,
    current: usize,
    countdown: Countdown,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    cause: Option<CompletionCause>,
}

impl ActiveSession {
    #[must_use]
    pub fn config(&self) -> &ModeConfig {
        &self.config
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, AnswerLabel> {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<AnswerLabel> {
        self.answers.get(&index).copied()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    /// Seconds of the timer used so far.
    #[must_use]
    pub fn time_taken_secs(&self) -> u32 {
        self.countdown.elapsed_secs()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn cause(&self) -> Option<CompletionCause> {
        self.cause
    }

    /// Score questions `0..=upto`.
    #[must_use]
    pub fn score_upto(&self, upto: usize) -> Score {
        Score::evaluate(&self.questions, &self.answers, upto)
    }

    /// Score up to and including the current question, which is what a
    /// session stopped early reports.
    #[must_use]
    pub fn score(&self) -> Score {
        self.score_upto(self.current)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: (self.current + 1).min(self.questions.len()),
            total: self.questions.len(),
            answered: self.answers.len(),
            is_last: self.is_last(),
            remaining_secs: self.remaining_secs(),
            is_time_critical: is_time_critical(self.remaining_secs()),
        }
    }

    #[must_use]
    pub fn report(&self) -> SessionReport {
        SessionReport::from_session(self)
    }
}

//
// ─── STATE MACHINE ─────────────────────────────────────────────────────────────
//

/// Every state the runner can be in. Session data only exists while a test
/// is running or completed.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unconfigured,
    Configuring(ModeDraft),
    Running(ActiveSession),
    Completed(ActiveSession),
}

/// Discriminant of `SessionState`, for cheap checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unconfigured,
    Configuring,
    Running,
    Completed,
}

/// Drives one test at a time from mode selection to score.
///
/// Owns the tick source: it is started when a test begins and cancelled
/// exactly once when that test ends, is reset, or the runner is dropped.
pub struct SessionRunner<T: TickSource> {
    clock: Clock,
    ticks: T,
    state: SessionState,
}

impl<T: TickSource> SessionRunner<T> {
    #[must_use]
    pub fn new(clock: Clock, ticks: T) -> Self {
        Self {
            clock,
            ticks,
            state: SessionState::Unconfigured,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Unconfigured => SessionPhase::Unconfigured,
            SessionState::Configuring(_) => SessionPhase::Configuring,
            SessionState::Running(_) => SessionPhase::Running,
            SessionState::Completed(_) => SessionPhase::Completed,
        }
    }

    #[must_use]
    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    /// The running or completed session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&ActiveSession> {
        match &self.state {
            SessionState::Running(session) | SessionState::Completed(session) => Some(session),
            SessionState::Unconfigured | SessionState::Configuring(_) => None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running(_))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Completed(_))
    }

    /// Pick a mode, discarding any draft in progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionActive` while a test is running or
    /// completed; call `reset` first.
    pub fn choose_mode(&mut self, kind: ModeKind) -> Result<(), SessionError> {
        match self.state {
            SessionState::Unconfigured | SessionState::Configuring(_) => {
                self.state = SessionState::Configuring(ModeDraft::new(kind));
                Ok(())
            }
            SessionState::Running(_) | SessionState::Completed(_) => {
                Err(SessionError::SessionActive)
            }
        }
    }

    /// Mutable access to the draft being configured.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotConfiguring` outside the configuring state.
    pub fn draft_mut(&mut self) -> Result<&mut ModeDraft, SessionError> {
        match &mut self.state {
            SessionState::Configuring(draft) => Ok(draft),
            _ => Err(SessionError::NotConfiguring),
        }
    }

    /// Validate the draft, select questions from `pool` and start the
    /// countdown. Returns the number of questions selected.
    ///
    /// A selection with no questions completes the session immediately with
    /// `CompletionCause::Empty` and never starts the timer. Calling this
    /// while a test is already running changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Mode` if the draft is missing a required choice
    /// (the runner stays in `Configuring`), or `SessionError::NotConfiguring`
    /// when no mode has been picked or the test has completed.
    pub fn start_test<R: Rng + ?Sized>(
        &mut self,
        pool: &[Question],
        rng: &mut R,
    ) -> Result<usize, SessionError> {
        let config = match &self.state {
            SessionState::Configuring(draft) => draft.validate()?,
            SessionState::Running(session) => {
                debug!("start ignored: test already running");
                return Ok(session.total_questions());
            }
            SessionState::Unconfigured | SessionState::Completed(_) => {
                return Err(SessionError::NotConfiguring);
            }
        };

        let plan = SessionSelector::new(pool).build(&config, rng);
        let selected = plan.total();
        let timer_secs = config.params().timer_secs();
        let now = self.clock.now();

        let mut session = ActiveSession {
            config,
            questions: plan.questions,
            answers: BTreeMap::new(),
            current: 0,
            countdown: Countdown::idle(timer_secs),
            started_at: now,
            completed_at: None,
            cause: None,
        };

        if selected == 0 {
            info!(
                mode = ?config.kind(),
                pool = pool.len(),
                "no questions matched; test completed empty"
            );
            session.completed_at = Some(now);
            session.cause = Some(CompletionCause::Empty);
            self.state = SessionState::Completed(session);
            return Ok(0);
        }

        session.countdown = Countdown::start(timer_secs);
        self.ticks.start();
        info!(
            mode = ?config.kind(),
            requested = config.params().question_count(),
            selected,
            timer_secs,
            "test started"
        );
        self.state = SessionState::Running(session);
        Ok(selected)
    }

    /// Record or overwrite the answer for question `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning` unless a test is running, or
    /// `SessionError::IndexOutOfRange` for an index past the last question.
    pub fn record_answer(&mut self, index: usize, label: AnswerLabel) -> Result<(), SessionError> {
        let session = self.running_mut()?;
        let len = session.questions.len();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        session.answers.insert(index, label);
        Ok(())
    }

    /// Record an answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning` unless a test is running.
    pub fn answer_current(&mut self, label: AnswerLabel) -> Result<(), SessionError> {
        let index = self.running_mut()?.current;
        self.record_answer(index, label)
    }

    /// Move to the next question, or finish the test from the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning` unless a test is running.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        let session = self.running_mut()?;
        if session.current + 1 < session.questions.len() {
            session.current += 1;
        } else {
            self.finish(CompletionCause::Finished);
        }
        Ok(())
    }

    /// Move to the previous question; no-op on the first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning` unless a test is running.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        let session = self.running_mut()?;
        session.current = session.current.saturating_sub(1);
        Ok(())
    }

    /// End a running test early. Does nothing in any other state.
    pub fn stop(&mut self) {
        self.finish(CompletionCause::Stopped);
    }

    /// Feed one second to the countdown. Ticks outside a running test, or
    /// after the timer was cancelled, are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        let SessionState::Running(session) = &mut self.state else {
            return TickOutcome::Ignored;
        };
        let outcome = session.countdown.tick();
        if outcome == TickOutcome::Expired {
            self.finish(CompletionCause::TimedOut);
        }
        outcome
    }

    /// Return to `Unconfigured` from any state, cancelling a live timer.
    pub fn reset(&mut self) {
        self.release_timer();
        self.state = SessionState::Unconfigured;
        debug!("session reset");
    }

    /// Score of the running or completed session up to its current question.
    #[must_use]
    pub fn score(&self) -> Option<Score> {
        self.session().map(ActiveSession::score)
    }

    /// Score of the running or completed session over `0..=upto`.
    #[must_use]
    pub fn score_upto(&self, upto: usize) -> Option<Score> {
        self.session().map(|session| session.score_upto(upto))
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session().map(ActiveSession::progress)
    }

    #[must_use]
    pub fn report(&self) -> Option<SessionReport> {
        match &self.state {
            SessionState::Completed(session) => Some(session.report()),
            _ => None,
        }
    }

    fn running_mut(&mut self) -> Result<&mut ActiveSession, SessionError> {
        match &mut self.state {
            SessionState::Running(session) => Ok(session),
            _ => Err(SessionError::NotRunning),
        }
    }

    fn finish(&mut self, cause: CompletionCause) {
        let state = std::mem::replace(&mut self.state, SessionState::Unconfigured);
        self.state = match state {
            SessionState::Running(mut session) => {
                if session.countdown.stop() {
                    self.ticks.cancel();
                }
                session.completed_at = Some(self.clock.now());
                session.cause = Some(cause);
                info!(
                    ?cause,
                    answered = session.answers.len(),
                    total = session.questions.len(),
                    time_taken_secs = session.time_taken_secs(),
                    "test completed"
                );
                SessionState::Completed(session)
            }
            other => other,
        };
    }

    fn release_timer(&mut self) {
        if let SessionState::Running(session) = &mut self.state {
            if session.countdown.stop() {
                self.ticks.cancel();
            }
        }
    }
}

impl<T: TickSource> Drop for SessionRunner<T> {
    fn drop(&mut self) {
        self.release_timer();
    }
}

impl<T: TickSource> fmt::Debug for SessionRunner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRunner")
            .field("clock", &self.clock)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
