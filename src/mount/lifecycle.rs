//! Attachment loops: the initial bounded interval, remounting with backoff
//! after a conversation switch, and teardown.

use super::{MountController, MountPhase};
use crate::adapters::SiteAdapter;
use crate::dom::Document;
use std::rc::Rc;

impl<D: Document + 'static> MountController<D> {
    /// Try to attach every `interval_ms` until it works or `max_attempts`
    /// run out. On success, subscribe to the adapter's conversation watcher
    /// when it has one.
    pub fn start(self: &Rc<Self>, adapter: Rc<dyn SiteAdapter<D>>) {
        self.attach_timer.cancel(self.scheduler.as_ref());
        self.set_phase(MountPhase::Mounting { attempt: 0 });

        let controller = Rc::downgrade(self);
        let max_attempts = self.options.max_attempts;
        let mut attempts = 0;

        let id = self.scheduler.set_interval(
            self.options.interval_ms,
            Box::new(move || {
                let Some(controller) = controller.upgrade() else {
                    return;
                };
                attempts += 1;
                controller.set_phase(MountPhase::Mounting { attempt: attempts });

                if controller.ensure_mounted(adapter.as_ref(), false) {
                    controller.attach_timer.cancel(controller.scheduler.as_ref());
                    controller.watch_conversation(&adapter);
                    return;
                }

                if attempts >= max_attempts {
                    log::info!("giving up mounting widget after {attempts} attempts");
                    controller.attach_timer.cancel(controller.scheduler.as_ref());
                    controller.set_phase(MountPhase::Unmounted);
                }
            }),
        );
        self.attach_timer.replace(self.scheduler.as_ref(), id);
    }

    fn watch_conversation(self: &Rc<Self>, adapter: &Rc<dyn SiteAdapter<D>>) {
        let Some(watcher) = adapter.conversation_watcher() else {
            log::debug!("adapter {} has no conversation watcher", adapter.id());
            return;
        };

        let controller = Rc::downgrade(self);
        let weak_adapter = Rc::downgrade(adapter);
        watcher.watch(Box::new(move || {
            if let (Some(controller), Some(adapter)) = (controller.upgrade(), weak_adapter.upgrade()) {
                controller.on_contact_changed(adapter);
            }
        }));
    }

    /// Start a fresh remount sequence for a new conversation. Any sequence
    /// still pending from an earlier switch is abandoned.
    pub fn on_contact_changed(self: &Rc<Self>, adapter: Rc<dyn SiteAdapter<D>>) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.set_phase(MountPhase::Remounting { attempt: 0 });
        log::info!("contact changed, remounting widget");

        let delay = self.options.remount_initial_delay_ms;
        self.schedule_remount(adapter, generation, 0, delay);
    }

    fn schedule_remount(
        self: &Rc<Self>,
        adapter: Rc<dyn SiteAdapter<D>>,
        generation: u64,
        retry: usize,
        delay_ms: u32,
    ) {
        let controller = Rc::downgrade(self);
        let id = self.scheduler.set_timeout(
            delay_ms,
            Box::new(move || {
                if let Some(controller) = controller.upgrade() {
                    controller.remount_timer.fired();
                    controller.remount_step(adapter, generation, retry);
                }
            }),
        );
        self.remount_timer.replace(self.scheduler.as_ref(), id);
    }

    fn remount_step(self: &Rc<Self>, adapter: Rc<dyn SiteAdapter<D>>, generation: u64, retry: usize) {
        if generation != self.generation.get() {
            log::debug!("dropping stale remount attempt");
            return;
        }

        self.set_phase(MountPhase::Remounting {
            attempt: retry as u32 + 1,
        });
        if self.ensure_mounted(adapter.as_ref(), true) {
            log::info!("widget remounted after contact change");
            return;
        }

        match self.options.remount_delays_ms.get(retry) {
            Some(&delay) => {
                log::debug!(
                    "remount failed, retrying in {delay}ms (attempt {}/{})",
                    retry + 1,
                    self.options.remount_delays_ms.len()
                );
                self.schedule_remount(adapter, generation, retry + 1, delay);
            }
            None => {
                log::warn!("failed to remount widget after all retries");
                self.set_phase(MountPhase::Unmounted);
            }
        }
    }

    /// Cancel every pending timer, stop the adapter's watcher and remove the
    /// widget.
    pub fn teardown(&self, adapter: &dyn SiteAdapter<D>) {
        self.attach_timer.cancel(self.scheduler.as_ref());
        self.remount_timer.cancel(self.scheduler.as_ref());
        self.generation.set(self.generation.get() + 1);
        if let Some(watcher) = adapter.conversation_watcher() {
            watcher.stop();
        }
        self.discard_container();

        let mut state = self.state.borrow_mut();
        state.contact_key = None;
        state.phase = MountPhase::Unmounted;
    }

    pub fn has_pending_timers(&self) -> bool {
        self.attach_timer.is_active() || self.remount_timer.is_active()
    }
}
