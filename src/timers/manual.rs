//! Deterministic virtual clock
//!
//! Timers only fire inside [`ManualScheduler::advance`], in due-time order
//! (ties broken by creation order). Callbacks may schedule or clear timers,
//! including their own.

use super::{Scheduler, TimerId};
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

enum Callback {
    Once(Box<dyn FnOnce()>),
    Repeat(Box<dyn FnMut()>),
}

struct Entry {
    due: u64,
    period: Option<u64>,
    callback: Option<Callback>,
}

#[derive(Default)]
struct Clock {
    now: u64,
    next_id: TimerId,
    timers: BTreeMap<TimerId, Entry>,
}

#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.clock.borrow().now
    }

    /// Timers that are scheduled and not cleared.
    pub fn active_timers(&self) -> usize {
        self.clock.borrow().timers.len()
    }

    /// Move the clock forward by `ms`, firing every timer that falls due.
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;

        while let Some(id) = self.next_due(target) {
            let callback = {
                let mut clock = self.clock.borrow_mut();
                let entry = match clock.timers.get_mut(&id) {
                    Some(entry) => entry,
                    None => continue,
                };
                let due = entry.due;
                let callback = entry.callback.take();
                clock.now = due;
                callback
            };

            match callback {
                Some(Callback::Once(f)) => {
                    f();
                    self.clock.borrow_mut().timers.remove(&id);
                }
                Some(Callback::Repeat(mut f)) => {
                    f();
                    let mut clock = self.clock.borrow_mut();
                    if let Some(entry) = clock.timers.get_mut(&id) {
                        entry.due += entry.period.unwrap_or(1).max(1);
                        entry.callback = Some(Callback::Repeat(f));
                    }
                }
                None => {}
            }
        }

        self.clock.borrow_mut().now = target;
    }

    fn next_due(&self, target: u64) -> Option<TimerId> {
        self.clock
            .borrow()
            .timers
            .iter()
            .filter(|(_, e)| e.callback.is_some() && e.due <= target)
            .min_by_key(|(id, e)| (e.due, **id))
            .map(|(id, _)| *id)
    }

    fn insert(&self, delay_ms: u32, period: Option<u64>, callback: Callback) -> TimerId {
        let mut clock = self.clock.borrow_mut();
        clock.next_id += 1;
        let id = clock.next_id;
        let due = clock.now + u64::from(delay_ms);
        clock.timers.insert(
            id,
            Entry {
                due,
                period,
                callback: Some(callback),
            },
        );
        id
    }
}

impl Scheduler for ManualScheduler {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId {
        self.insert(period_ms, Some(u64::from(period_ms)), Callback::Repeat(callback))
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        self.insert(delay_ms, None, Callback::Once(callback))
    }

    fn clear(&self, id: TimerId) {
        self.clock.borrow_mut().timers.remove(&id);
    }

    fn sleep(&self, delay_ms: u32) -> LocalBoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel::<()>();
        self.set_timeout(
            delay_ms,
            Box::new(move || {
                let _ = tx.send(());
            }),
        );
        Box::pin(async move {
            let _ = rx.await;
        })
    }
}
