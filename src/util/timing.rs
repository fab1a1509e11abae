//! Debounce and throttle for input handlers.
//!
//! ## Design
//! - [`Debouncer`] spawns one tokio task per call; each task sleeps for the
//!   wait period and fires only if no newer call arrived meanwhile
//!   (generation counter).
//! - [`Gate`] opens at most once per limit; [`Throttle`] wraps an action in a
//!   gate. No timers involved.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default debounce wait for input handlers.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(300);

type Action<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Delays `action` until calls stop arriving for `wait`.
///
/// Must be called from inside a tokio runtime.
pub struct Debouncer<T> {
    wait: Duration,
    generation: Arc<AtomicU64>,
    action: Action<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(wait: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            wait,
            generation: Arc::new(AtomicU64::new(0)),
            action: Arc::new(action),
        }
    }

    /// Schedule `action(arg)`, superseding any pending call.
    pub fn call(&self, arg: T) {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let action = Arc::clone(&self.action);
        let wait = self.wait;

        tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            if generation.load(Ordering::SeqCst) == ticket {
                action(arg);
            }
        });
    }

    /// Drop any pending call without firing it.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Opens at most once per `limit`, measured from the last time it opened.
#[derive(Debug)]
pub struct Gate {
    limit: Duration,
    last_opened: Mutex<Option<Instant>>,
}

impl Gate {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            last_opened: Mutex::new(None),
        }
    }

    /// Returns `true` and restarts the window if the limit has elapsed.
    pub fn try_pass(&self) -> bool {
        let now = Instant::now();
        let mut last = self.last_opened.lock();
        if let Some(prev) = *last {
            if now.duration_since(prev) < self.limit {
                return false;
            }
        }
        *last = Some(now);
        true
    }
}

/// Runs `action` at most once per `limit`.
pub struct Throttle<T> {
    gate: Gate,
    action: Action<T>,
}

impl<T> Throttle<T> {
    pub fn new<F>(limit: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            gate: Gate::new(limit),
            action: Arc::new(action),
        }
    }

    /// Returns whether the action ran.
    pub fn call(&self, arg: T) -> bool {
        if !self.gate.try_pass() {
            return false;
        }
        (self.action)(arg);
        true
    }
}
