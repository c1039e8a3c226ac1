//! Timer scheduling
//!
//! Everything that waits (mount retries, conversation polling, the reply
//! timeout) goes through a [`Scheduler`], so the page's `setInterval` /
//! `setTimeout` can be swapped for a deterministic clock in tests.

pub mod manual;

use futures::future::LocalBoxFuture;

/// Identifier returned by `set_interval`/`set_timeout`.
pub type TimerId = i32;

pub trait Scheduler {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId;
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId;
    /// Cancel a pending timeout or interval. Unknown ids are ignored.
    fn clear(&self, id: TimerId);
    /// Future resolving after `delay_ms`.
    fn sleep(&self, delay_ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// A cleared-on-demand timer slot. Starting a new timer through the slot
/// cancels the previous one, so at most one timer per slot is live.
#[derive(Debug, Default)]
pub struct TimerSlot {
    current: std::cell::Cell<Option<TimerId>>,
}

impl TimerSlot {
    pub fn replace(&self, scheduler: &dyn Scheduler, id: TimerId) {
        if let Some(previous) = self.current.replace(Some(id)) {
            scheduler.clear(previous);
        }
    }

    pub fn cancel(&self, scheduler: &dyn Scheduler) {
        if let Some(previous) = self.current.take() {
            scheduler.clear(previous);
        }
    }

    /// Forget the stored id without clearing it. Called from a timeout's own
    /// callback, once the timer has fired.
    pub fn fired(&self) {
        self.current.set(None);
    }

    pub fn is_active(&self) -> bool {
        self.current.get().is_some()
    }
}
