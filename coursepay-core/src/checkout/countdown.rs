//! The QR countdown as a scoped resource.
//!
//! The ticking task is owned by a [`CountdownHandle`] that aborts it on
//! drop, so every exit path out of the awaiting-payment state releases
//! the timer. The decrement logic itself is a plain struct, testable
//! without a runtime.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Pure countdown arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    remaining: u32,
}

impl CountdownState {
    pub fn new(secs: u32) -> Self {
        Self { remaining: secs }
    }

    /// Decrement by one second, saturating at zero. Returns the new
    /// remaining value.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

/// Receiver of once-per-second remaining values; the final message is 0.
pub type CountdownTickReceiver = mpsc::Receiver<u32>;

/// Owns the ticking task. Dropping the handle aborts the task, which is
/// how the orchestrator cancels a countdown whose flow moved on.
#[derive(Debug)]
pub struct CountdownHandle {
    task: JoinHandle<()>,
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a countdown of `secs` seconds, ticking once per second.
pub fn spawn_countdown(secs: u32) -> (CountdownHandle, CountdownTickReceiver) {
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(async move {
        let mut state = CountdownState::new(secs);
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        // The first interval tick completes immediately.
        interval.tick().await;
        while !state.is_expired() {
            interval.tick().await;
            let remaining = state.tick();
            if tx.send(remaining).await.is_err() {
                debug!("Countdown receiver dropped, stopping early");
                return;
            }
        }
    });
    (CountdownHandle { task }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_zero_and_saturates() {
        let mut state = CountdownState::new(2);
        assert!(!state.is_expired());
        assert_eq!(state.tick(), 1);
        assert_eq!(state.tick(), 0);
        assert!(state.is_expired());
        assert_eq!(state.tick(), 0);
    }

    #[test]
    fn a_full_countdown_takes_exactly_its_duration_in_ticks() {
        let mut state = CountdownState::new(120);
        let mut ticks = 0;
        while !state.is_expired() {
            state.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 120);
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_countdown_delivers_every_remaining_value() {
        let (_handle, mut rx) = spawn_countdown(3);
        assert_eq!(rx.recv().await, Some(2));
        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(0));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_the_task() {
        let (handle, mut rx) = spawn_countdown(600);
        assert_eq!(rx.recv().await, Some(599));
        drop(handle);
        assert_eq!(rx.recv().await, None);
    }
}
