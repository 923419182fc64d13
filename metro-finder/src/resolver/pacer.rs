//! Courtesy delay between outgoing requests.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces out requests so that consecutive calls to [`Pacer::wait`] return
/// at least `interval` apart.
///
/// The pacer is shared by every caller of a search client, so the spacing
/// holds across concurrent workers as well. Waiters queue on the lock in
/// arrival order.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request slot is free and claim it.
    ///
    /// The first call returns immediately.
    pub async fn wait(&self) {
        let mut next_slot = self.next_slot.lock().await;
        if let Some(at) = *next_slot
            && at > Instant::now()
        {
            tokio::time::sleep_until(at).await;
        }
        *next_slot = Some(Instant::now() + self.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_is_immediate() {
        let pacer = Pacer::new(Duration::from_secs(2));
        let start = Instant::now();
        pacer.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_calls_are_spaced() {
        let pacer = Pacer::new(Duration::from_secs(2));
        let start = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_interval_does_not_wait() {
        let pacer = Pacer::new(Duration::from_secs(1));
        pacer.wait().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        let before = Instant::now();
        pacer.wait().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn spacing_holds_across_concurrent_callers() {
        let pacer = Pacer::new(Duration::from_secs(1));
        let start = Instant::now();
        futures::join!(pacer.wait(), pacer.wait(), pacer.wait());
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
