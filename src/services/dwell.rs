use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A pending long-view credit for one focused item
///
/// Runs `on_fire` once the dwell threshold elapses. Cancelling or dropping
/// the handle aborts the task, so scrolled-past items are never credited.
#[derive(Debug)]
pub struct DwellTimer {
    item_id: u32,
    handle: JoinHandle<()>,
}

impl DwellTimer {
    pub fn arm<F>(item_id: u32, delay: Duration, on_fire: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(item_id, "Dwell threshold reached");
            on_fire.await;
        });

        Self { item_id, handle }
    }

    pub fn item_id(&self) -> u32 {
        self.item_id
    }

    pub fn has_fired(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        // Drop aborts the task
    }
}

impl Drop for DwellTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Holds the single armed dwell timer; only one item is in focus at a time
#[derive(Debug, Default)]
pub struct FocusTimers {
    pending: Option<DwellTimer>,
}

impl FocusTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending timer, then arms a new one for `item_id`
    pub fn arm<F>(&mut self, item_id: u32, delay: Duration, on_fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.clear();
        self.pending = Some(DwellTimer::arm(item_id, delay, on_fire));
        tracing::debug!(item_id, delay_ms = delay.as_millis() as u64, "Dwell timer armed");
    }

    /// Cancels the pending timer. Returns the item it was armed for, if it
    /// had not fired yet.
    pub fn clear(&mut self) -> Option<u32> {
        let timer = self.pending.take()?;
        if timer.has_fired() {
            return None;
        }
        let item_id = timer.item_id();
        timer.cancel();
        tracing::debug!(item_id, "Dwell timer cancelled");
        Some(item_id)
    }

    /// Item with a timer still waiting to fire
    pub fn armed_item(&self) -> Option<u32> {
        self.pending
            .as_ref()
            .filter(|timer| !timer.has_fired())
            .map(DwellTimer::item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> std::pin::Pin<Box<dyn Future<Output = ()> + Send>>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let make = move |item_id: u32| {
            let sink = sink.clone();
            Box::pin(async move {
                sink.lock().unwrap().push(item_id);
            }) as std::pin::Pin<Box<dyn Future<Output = ()> + Send>>
        };
        (fired, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_threshold() {
        let (fired, make) = recorder();
        let mut timers = FocusTimers::new();
        timers.arm(1, Duration::from_secs(3), make(1));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(fired.lock().unwrap().is_empty());
        assert_eq!(timers.armed_item(), Some(1));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*fired.lock().unwrap(), vec![1]);
        assert_eq!(timers.armed_item(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_arming_cancels_previous_timer() {
        let (fired, make) = recorder();
        let mut timers = FocusTimers::new();
        timers.arm(1, Duration::from_secs(3), make(1));

        tokio::time::sleep(Duration::from_secs(1)).await;
        timers.arm(2, Duration::from_secs(3), make(2));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(*fired.lock().unwrap(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_before_threshold() {
        let (fired, make) = recorder();
        let mut timers = FocusTimers::new();
        timers.arm(5, Duration::from_secs(3), make(5));

        assert_eq!(timers.clear(), Some(5));
        assert_eq!(timers.clear(), None);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_aborts_task() {
        let (fired, make) = recorder();
        let timer = DwellTimer::arm(7, Duration::from_secs(1), make(7));
        drop(timer);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(fired.lock().unwrap().is_empty());
    }
}
