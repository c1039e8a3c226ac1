//! Conversation switch detection

use crate::timers::{Scheduler, TimerSlot};
use std::cell::RefCell;
use std::rc::Rc;

/// Poll period used by [`PollingWatcher`] unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 5_000;

/// Raises a signal whenever the open conversation changes.
pub trait ConversationWatcher {
    /// Start watching. Calling it again replaces the previous watch; only
    /// the latest callback stays active.
    fn watch(&self, callback: Box<dyn FnMut()>);
    fn stop(&self);
}

/// What identifies the open conversation at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationSnapshot {
    pub contact_key: String,
    pub title: Option<String>,
}

pub type SnapshotProbe = Rc<dyn Fn() -> ConversationSnapshot>;

/// Re-reads the conversation identity on a fixed interval and fires the
/// callback once per observed change.
pub struct PollingWatcher {
    scheduler: Rc<dyn Scheduler>,
    interval_ms: u32,
    probe: SnapshotProbe,
    timer: TimerSlot,
    last_seen: Rc<RefCell<ConversationSnapshot>>,
}

impl PollingWatcher {
    pub fn new(scheduler: Rc<dyn Scheduler>, interval_ms: u32, probe: SnapshotProbe) -> Self {
        Self {
            scheduler,
            interval_ms,
            probe,
            timer: TimerSlot::default(),
            last_seen: Rc::new(RefCell::new(ConversationSnapshot::default())),
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    pub fn last_seen(&self) -> ConversationSnapshot {
        self.last_seen.borrow().clone()
    }
}

impl ConversationWatcher for PollingWatcher {
    fn watch(&self, mut callback: Box<dyn FnMut()>) {
        self.timer.cancel(self.scheduler.as_ref());
        *self.last_seen.borrow_mut() = (self.probe)();

        let probe = self.probe.clone();
        let last_seen = self.last_seen.clone();
        let id = self.scheduler.set_interval(
            self.interval_ms,
            Box::new(move || {
                let current = probe();
                let changed = {
                    let mut last = last_seen.borrow_mut();
                    if *last == current {
                        false
                    } else {
                        log::info!(
                            "conversation changed: {:?} -> {:?}",
                            last.contact_key,
                            current.contact_key
                        );
                        *last = current;
                        true
                    }
                };
                if changed {
                    callback();
                }
            }),
        );
        self.timer.replace(self.scheduler.as_ref(), id);
    }

    fn stop(&self) {
        self.timer.cancel(self.scheduler.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::manual::ManualScheduler;
    use std::cell::Cell;

    fn watcher_with_title(
        scheduler: &ManualScheduler,
    ) -> (PollingWatcher, Rc<RefCell<Option<String>>>) {
        let title = Rc::new(RefCell::new(Some("Abhay".to_string())));
        let source = title.clone();
        let probe: SnapshotProbe = Rc::new(move || {
            let title = source.borrow().clone();
            ConversationSnapshot {
                contact_key: crate::utils::contact_key(crate::models::PlatformId::Whatsapp, title.as_deref()),
                title,
            }
        });
        let watcher = PollingWatcher::new(Rc::new(scheduler.clone()), 5_000, probe);
        (watcher, title)
    }

    #[test]
    fn test_fires_once_per_change() {
        let scheduler = ManualScheduler::new();
        let (watcher, title) = watcher_with_title(&scheduler);
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        watcher.watch(Box::new(move || counter.set(counter.get() + 1)));

        scheduler.advance(15_000);
        assert_eq!(hits.get(), 0);

        *title.borrow_mut() = Some("Riya".to_string());
        scheduler.advance(5_000);
        assert_eq!(hits.get(), 1);

        scheduler.advance(20_000);
        assert_eq!(hits.get(), 1);
        assert_eq!(watcher.last_seen().title.as_deref(), Some("Riya"));
    }

    #[test]
    fn test_repeated_watch_keeps_a_single_timer() {
        let scheduler = ManualScheduler::new();
        let (watcher, title) = watcher_with_title(&scheduler);
        let hits = Rc::new(Cell::new(0));

        for _ in 0..2 {
            let counter = hits.clone();
            watcher.watch(Box::new(move || counter.set(counter.get() + 1)));
        }
        assert_eq!(scheduler.active_timers(), 1);

        *title.borrow_mut() = None;
        scheduler.advance(5_000);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_stop_clears_timer() {
        let scheduler = ManualScheduler::new();
        let (watcher, title) = watcher_with_title(&scheduler);
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        watcher.watch(Box::new(move || counter.set(counter.get() + 1)));
        watcher.stop();

        *title.borrow_mut() = Some("Someone else".to_string());
        scheduler.advance(10_000);
        assert_eq!(hits.get(), 0);
        assert!(!watcher.is_active());
        assert_eq!(scheduler.active_timers(), 0);
    }
}
