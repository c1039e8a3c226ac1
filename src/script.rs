//! Content-script wiring
//!
//! One [`ContentScript`] is built per page. It registers the site adapters,
//! picks the one for the current URL and hands it to the mount controller.

use crate::adapters::{AdapterRegistry, SiteAdapter, WhatsAppAdapter};
use crate::assistant::ReplyAssistant;
use crate::config::ReplaisConfig;
use crate::dom::Document;
use crate::mount::{MountController, WidgetRenderer};
use crate::reply::ReplyGenerator;
use crate::settings::SettingsStore;
use crate::timers::Scheduler;
use std::cell::RefCell;
use std::rc::Rc;

/// Every adapter this build knows about, in detection order.
pub fn default_registry<D: Document + Clone + 'static>(
    document: &D,
    scheduler: &Rc<dyn Scheduler>,
    config: &ReplaisConfig,
) -> AdapterRegistry<D> {
    let mut registry = AdapterRegistry::new();
    registry.register(Rc::new(WhatsAppAdapter::with_poll_interval(
        document.clone(),
        scheduler.clone(),
        config.watch_interval_ms,
    )));
    registry
}

pub struct ContentScript<D: Document> {
    assistant: Rc<ReplyAssistant<D>>,
    mount: Rc<MountController<D>>,
    active: RefCell<Option<Rc<dyn SiteAdapter<D>>>>,
}

impl<D: Document + Clone + 'static> ContentScript<D> {
    /// `renderer` receives the assistant so the widget it draws can trigger
    /// replies.
    pub fn new<F>(
        document: D,
        scheduler: Rc<dyn Scheduler>,
        settings: Rc<dyn SettingsStore>,
        generator: Rc<dyn ReplyGenerator>,
        config: ReplaisConfig,
        renderer: F,
    ) -> Self
    where
        F: FnOnce(Rc<ReplyAssistant<D>>) -> Rc<dyn WidgetRenderer<D::Element>>,
    {
        let registry = default_registry(&document, &scheduler, &config);
        let mount_options = config.mount.clone();
        let assistant = Rc::new(ReplyAssistant::new(
            document.clone(),
            Rc::new(registry),
            settings,
            generator,
            scheduler.clone(),
            config,
        ));
        let renderer = renderer(assistant.clone());
        let mount = Rc::new(MountController::new(document, scheduler, renderer, mount_options));

        Self {
            assistant,
            mount,
            active: RefCell::new(None),
        }
    }

    /// Detect the site and start mounting. Returns `false` when no adapter
    /// handles this page.
    pub fn start(&self) -> bool {
        let Some(adapter) = self.assistant.adapter() else {
            log::info!("No adapter for this site");
            return false;
        };
        log::info!("using {} adapter", adapter.id());

        let previous = self.active.replace(Some(adapter.clone()));
        if let Some(previous) = previous {
            self.mount.teardown(previous.as_ref());
        }
        self.mount.start(adapter);
        true
    }

    /// Clear every timer and remove the widget.
    pub fn teardown(&self) {
        let active = self.active.take();
        if let Some(adapter) = active {
            self.mount.teardown(adapter.as_ref());
        }
    }

    pub fn assistant(&self) -> &Rc<ReplyAssistant<D>> {
        &self.assistant
    }

    pub fn mount(&self) -> &Rc<MountController<D>> {
        &self.mount
    }
}
