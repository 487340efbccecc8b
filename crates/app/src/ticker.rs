use std::time::Duration;

use services::TickSource;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// One-second tick source backed by a tokio interval task.
///
/// Each tick carries the generation of the `start` that produced it. Aborting
/// a task is not synchronous, so a tick can land in the channel after
/// `cancel`; the host checks `is_current` before forwarding a tick to
/// `SessionRunner::tick`.
pub struct IntervalTicks {
    period: Duration,
    tx: UnboundedSender<u64>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicks {
    #[must_use]
    pub fn new(period: Duration) -> (Self, UnboundedReceiver<u64>) {
        let (tx, rx) = unbounded_channel();
        (
            Self {
                period,
                tx,
                generation: 0,
                task: None,
            },
            rx,
        )
    }

    /// True if `generation` belongs to the interval that is running now.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.task.is_some() && generation == self.generation
    }
}

impl TickSource for IntervalTicks {
    fn start(&mut self) {
        self.cancel();
        let tx = self.tx.clone();
        let period = self.period;
        let generation = self.generation;
        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(generation).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Drop for IntervalTicks {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_after_start() {
        let (mut ticks, mut rx) = IntervalTicks::new(SECOND);
        let started = Instant::now();
        ticks.start();

        let first = rx.recv().await.unwrap();
        assert!(ticks.is_current(first));
        assert!(started.elapsed() >= SECOND && started.elapsed() < SECOND * 2);

        let second = rx.recv().await.unwrap();
        assert_eq!(first, second);
        assert!(started.elapsed() >= SECOND * 2 && started.elapsed() < SECOND * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_arrives_after_cancel() {
        let (mut ticks, mut rx) = IntervalTicks::new(SECOND);
        ticks.start();
        rx.recv().await.unwrap();

        ticks.cancel();
        tokio::time::sleep(SECOND * 5).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn tick_queued_before_restart_is_stale() {
        let (mut ticks, mut rx) = IntervalTicks::new(SECOND);
        ticks.start();
        // Let a tick land in the channel without draining it.
        tokio::time::sleep(SECOND + SECOND / 2).await;

        ticks.cancel();
        ticks.start();

        let leftover = rx.recv().await.unwrap();
        assert!(!ticks.is_current(leftover));
        let fresh = rx.recv().await.unwrap();
        assert!(ticks.is_current(fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_current_while_stopped() {
        let (mut ticks, _rx) = IntervalTicks::new(SECOND);
        assert!(!ticks.is_current(0));
        ticks.start();
        let generation = ticks.generation;
        assert!(ticks.is_current(generation));
        ticks.cancel();
        assert!(!ticks.is_current(generation));
    }
}
