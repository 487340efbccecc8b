/// Capability that delivers countdown ticks to a session runner.
///
/// The runner calls `start` once when a test begins and `cancel` once when it
/// ends, however it ends. Implementations deliver ticks by having their owner
/// call `SessionRunner::tick`; ticks that arrive after `cancel` are dropped by
/// the runner.
pub trait TickSource: Send {
    fn start(&mut self);
    fn cancel(&mut self);
}

/// Tick source for tests and scripted hosts: records calls, never ticks on
/// its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualTicks {
    starts: usize,
    cancels: usize,
    armed: bool,
}

impl ManualTicks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn starts(&self) -> usize {
        self.starts
    }

    #[must_use]
    pub fn cancels(&self) -> usize {
        self.cancels
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl TickSource for ManualTicks {
    fn start(&mut self) {
        self.starts += 1;
        self.armed = true;
    }

    fn cancel(&mut self) {
        self.cancels += 1;
        self.armed = false;
    }
}

/// Result of feeding one tick to a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running; nothing changed.
    Ignored,
    Ticked { remaining_secs: u32 },
    /// This tick took the countdown to zero.
    Expired,
}

/// Logical countdown in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total_secs: u32,
    remaining_secs: u32,
    running: bool,
}

impl Countdown {
    /// A running countdown from `total_secs`.
    #[must_use]
    pub fn start(total_secs: u32) -> Self {
        Self {
            total_secs,
            remaining_secs: total_secs,
            running: true,
        }
    }

    /// A countdown that never runs, for sessions completed at start.
    #[must_use]
    pub fn idle(total_secs: u32) -> Self {
        Self {
            total_secs,
            remaining_secs: total_secs,
            running: false,
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Stops the countdown. Returns true only for the call that actually
    /// stopped it.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.total_secs - self.remaining_secs
    }
}
