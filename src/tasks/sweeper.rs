//! Expiry Sweeper Task
//!
//! Background thread that periodically removes expired cache entries, so
//! entries nobody reads again do not hold on to capacity.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, warn};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

// == Stop Signal ==
/// Stop flag paired with a condvar so a sleeping sweeper wakes up at once.
#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    fn raise(&self) {
        *self.stopped.lock() = true;
        self.condvar.notify_all();
    }

    fn is_raised(&self) -> bool {
        *self.stopped.lock()
    }

    /// Blocks for up to `timeout`. Returns true if the signal was raised.
    ///
    /// A timeout too large to express as a deadline waits for the signal only.
    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut stopped = self.stopped.lock();
        while !*stopped {
            match deadline {
                Some(deadline) => {
                    if self.condvar.wait_until(&mut stopped, deadline).timed_out() {
                        break;
                    }
                }
                None => self.condvar.wait(&mut stopped),
            }
        }
        *stopped
    }
}

// == Sweeper ==
/// Handle to the running sweeper thread.
///
/// The thread runs until [`Sweeper::stop`] is called; `stop` raises the
/// signal and joins, so no sweep is in flight once it returns.
#[derive(Debug)]
pub(crate) struct Sweeper {
    handle: Option<JoinHandle<()>>,
    signal: Arc<StopSignal>,
}

impl Sweeper {
    /// Spawns a sweeper thread over `store`, ticking every `interval`.
    ///
    /// # Errors
    /// Returns [`CacheError::Internal`] if the OS refuses to spawn the thread.
    pub fn spawn<V>(store: Arc<Mutex<CacheStore<V>>>, interval: Duration) -> Result<Self>
    where
        V: Clone + Send + 'static,
    {
        Self::spawn_with(interval, move || {
            sweep_once(&store);
        })
    }

    /// Spawns the sweeper thread running `sweep` once per tick.
    fn spawn_with<F>(interval: Duration, sweep: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let signal = Arc::new(StopSignal::default());
        let thread_signal = signal.clone();

        let handle = thread::Builder::new()
            .name("cache-sweeper".to_string())
            .spawn(move || run(sweep, interval, &thread_signal))
            .map_err(|e| CacheError::Internal(format!("failed to spawn sweeper thread: {e}")))?;

        Ok(Self {
            handle: Some(handle),
            signal,
        })
    }

    /// Stops the sweeper and waits for its thread to exit.
    ///
    /// Calling it again is a no-op.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        self.signal.raise();
        if handle.join().is_err() {
            warn!("Expiry sweeper thread terminated abnormally");
        }
    }

    /// Returns true while the sweeper thread has not been stopped.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

fn run<F: FnMut()>(mut sweep: F, interval: Duration, signal: &StopSignal) {
    info!(interval_ms = interval.as_millis() as u64, "Starting expiry sweeper");

    while !signal.is_raised() {
        // A failed sweep must not take the thread down; reads still expire lazily.
        if panic::catch_unwind(AssertUnwindSafe(&mut sweep)).is_err() {
            error!("Expiry sweep panicked, retrying on next tick");
        }

        if signal.wait(interval) {
            break;
        }
    }

    info!("Expiry sweeper stopped");
}

/// Runs a single sweep over `store`, returning the number of removed entries.
///
/// The lock is released before anything is logged.
pub(crate) fn sweep_once<V: Clone>(store: &Mutex<CacheStore<V>>) -> usize {
    let removed = store.lock().remove_expired(Instant::now());

    for key in &removed {
        info!(key = %key, "Removed expired key");
    }
    if removed.is_empty() {
        debug!("Expiry sweep: no expired entries found");
    }

    removed.len()
}
