use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// One-shot refresh scheduler.
///
/// At most one timer is outstanding at a time: arming a replacement aborts
/// the previous task, so two timers can never fire for the same session. The
/// delay is used as supplied; callers subtract any early-refresh margin
/// themselves. Firing is fire-and-forget — the timer neither awaits nor
/// retries the task, and failure handling belongs to the task itself.
#[derive(Debug, Default)]
pub struct RefreshTimer {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshTimer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.handle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Cancel any outstanding timer, then schedule `task` to run once after
    /// `delay_secs`.
    pub fn arm<F>(&self, delay_secs: u64, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            task.await;
        });
        if let Some(previous) = self.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Cancel the outstanding timer, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            previous.abort();
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
