//! The checkout progress timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::checkout::TICKS_TO_COMPLETE;
use crate::runtime::RuntimeEvent;

/// A running progress timer. Dropping the handle stops the timer.
#[derive(Debug)]
pub struct TimerHandle {
    epoch: u64,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Start a timer that sends one tick for checkout `epoch` every
    /// `period`, stopping after enough ticks to complete a payment.
    #[must_use]
    pub fn spawn(
        epoch: u64,
        period: Duration,
        events: mpsc::UnboundedSender<RuntimeEvent>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for _ in 0..TICKS_TO_COMPLETE {
                ticker.tick().await;
                if events.send(RuntimeEvent::CheckoutTick { epoch }).is_err() {
                    break;
                }
            }
            tracing::trace!(epoch, "Progress timer finished");
        });

        tracing::debug!(epoch, period_ms = period.as_millis(), "Progress timer started");
        Self { epoch, task }
    }

    /// Epoch of the checkout this timer drives.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the timer has sent its last tick or was stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the timer.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sends_twenty_ticks_then_stops() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let timer = TimerHandle::spawn(4, Duration::from_millis(100), tx);

        let mut ticks = 0;
        while let Some(event) = rx.recv().await {
            assert_eq!(event, RuntimeEvent::CheckoutTick { epoch: 4 });
            ticks += 1;
        }

        assert_eq!(ticks, TICKS_TO_COMPLETE);
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_millis(2100));
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = TimerHandle::spawn(1, Duration::from_millis(100), tx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = TimerHandle::spawn(1, Duration::from_millis(100), tx);

        tokio::time::sleep(Duration::from_millis(250)).await;
        timer.cancel();

        let mut ticks = 0;
        while rx.recv().await.is_some() {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
    }
}
