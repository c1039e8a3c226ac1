//! Widget mounting
//!
//! [`MountController`] is the single owner of the injected container. It
//! keeps at most one live container per page, attached to the adapter's
//! mount target, and rebuilds it when the conversation changes or the page
//! re-renders the composer out from under it.

mod lifecycle;

use crate::adapters::SiteAdapter;
use crate::config::MountOptions;
use crate::dom::{Document, Element};
use crate::timers::{Scheduler, TimerSlot};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Renders the UI into a container the controller created.
pub trait WidgetRenderer<E> {
    fn render(&self, container: &E, contact_key: &str);
    /// Best-effort release of whatever `render` attached to `container`.
    fn release(&self, container: &E);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountPhase {
    Unmounted,
    Mounting { attempt: u32 },
    Mounted,
    Remounting { attempt: u32 },
}

const DEFAULT_CONTAINER_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("right", "8px"),
    ("bottom", "8px"),
    ("z-index", "9999"),
    ("pointer-events", "auto"),
];

struct MountState<E> {
    contact_key: Option<String>,
    container: Option<E>,
    mounted: bool,
    phase: MountPhase,
}

impl<E> Default for MountState<E> {
    fn default() -> Self {
        Self {
            contact_key: None,
            container: None,
            mounted: false,
            phase: MountPhase::Unmounted,
        }
    }
}

pub struct MountController<D: Document> {
    document: D,
    scheduler: Rc<dyn Scheduler>,
    renderer: Rc<dyn WidgetRenderer<D::Element>>,
    options: MountOptions,
    state: RefCell<MountState<D::Element>>,
    attach_timer: TimerSlot,
    remount_timer: TimerSlot,
    /// Bumped on every conversation switch; stale remount steps compare
    /// against it and stop.
    generation: Cell<u64>,
}

impl<D: Document> MountController<D> {
    pub fn new(
        document: D,
        scheduler: Rc<dyn Scheduler>,
        renderer: Rc<dyn WidgetRenderer<D::Element>>,
        options: MountOptions,
    ) -> Self {
        Self {
            document,
            scheduler,
            renderer,
            options,
            state: RefCell::new(MountState::default()),
            attach_timer: TimerSlot::default(),
            remount_timer: TimerSlot::default(),
            generation: Cell::new(0),
        }
    }

    pub fn phase(&self) -> MountPhase {
        self.state.borrow().phase
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    pub fn contact_key(&self) -> Option<String> {
        self.state.borrow().contact_key.clone()
    }

    pub fn container(&self) -> Option<D::Element> {
        self.state.borrow().container.clone()
    }

    pub fn options(&self) -> &MountOptions {
        &self.options
    }

    fn set_phase(&self, phase: MountPhase) {
        self.state.borrow_mut().phase = phase;
    }

    /// Attach the widget for the adapter's current conversation.
    ///
    /// Returns `false` when there is no open conversation or no composer
    /// yet; the caller retries. Never waits.
    pub fn ensure_mounted(&self, adapter: &dyn SiteAdapter<D>, force_remount: bool) -> bool {
        let composer = adapter.composer();
        let contact_key = adapter.contact_key();

        if contact_key.is_empty() {
            log::warn!("no contact key found, not mounting");
            return false;
        }

        let changed = self.state.borrow().contact_key.as_deref() != Some(contact_key.as_str());
        if changed || force_remount {
            log::debug!(
                "contact changed or forced remount: {:?} -> {:?} (force: {})",
                self.contact_key(),
                contact_key,
                force_remount
            );
            self.discard_container();
            let mut state = self.state.borrow_mut();
            state.mounted = false;
            state.contact_key = Some(contact_key.clone());
        }

        let Some(composer) = composer else {
            log::warn!("no composer found to mount widget for {contact_key}");
            return false;
        };

        let hint = adapter.mount_position_hint(&composer);
        let mount_target = hint
            .as_ref()
            .map(|h| h.mount_target.clone())
            .unwrap_or_else(|| composer.clone());

        let tracked = {
            let state = self.state.borrow();
            if state.mounted {
                state.container.clone()
            } else {
                None
            }
        };
        if let Some(container) = tracked {
            let attached = container.parent().as_ref() == Some(&mount_target)
                || mount_target.contains(&container);
            if attached {
                return true;
            }
            log::info!("widget container was detached by the page, remounting");
            self.discard_container();
        }

        self.remove_orphans(&mount_target);

        if mount_target.computed_position() == "static" {
            mount_target.set_style("position", "relative");
        }

        let Some(container) = self.document.create_element("div") else {
            log::error!("could not create widget container");
            return false;
        };
        container.set_class_name(&self.options.container_class);
        match &hint {
            Some(hint) => {
                for (property, value) in &hint.style_overrides {
                    container.set_style(property, value);
                }
            }
            None => {
                for (property, value) in DEFAULT_CONTAINER_STYLE {
                    container.set_style(property, value);
                }
            }
        }
        mount_target.append_child(&container);
        self.renderer.render(&container, &contact_key);

        let mut state = self.state.borrow_mut();
        state.container = Some(container);
        state.mounted = true;
        state.contact_key = Some(contact_key.clone());
        state.phase = MountPhase::Mounted;
        log::info!("widget mounted for {contact_key}");
        true
    }

    /// Remove containers under `mount_target` left behind by earlier mount
    /// cycles.
    fn remove_orphans(&self, mount_target: &D::Element) {
        let tracked = self.container();
        let selector = format!(".{}", self.options.container_class);
        for existing in mount_target.query_selector_all(&selector) {
            if tracked.as_ref() != Some(&existing) {
                log::info!("removing orphaned widget container");
                existing.remove();
            }
        }
    }

    /// Detach and release the tracked container, if any.
    fn discard_container(&self) {
        let container = {
            let mut state = self.state.borrow_mut();
            state.mounted = false;
            state.container.take()
        };
        if let Some(container) = container {
            container.remove();
            self.renderer.release(&container);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapters::{ContextOptions, MountPositionHint};
    use crate::dom::memory::{MemoryDocument, MemoryElement};
    use crate::models::{MessageContext, PlatformId};
    use crate::timers::manual::ManualScheduler;
    use pretty_assertions::assert_eq;

    /// Records every render and release call.
    #[derive(Default)]
    pub(crate) struct CountingRenderer {
        pub rendered: RefCell<Vec<String>>,
        pub released: Cell<usize>,
    }

    impl WidgetRenderer<MemoryElement> for CountingRenderer {
        fn render(&self, _container: &MemoryElement, contact_key: &str) {
            self.rendered.borrow_mut().push(contact_key.to_string());
        }

        fn release(&self, _container: &MemoryElement) {
            self.released.set(self.released.get() + 1);
        }
    }

    /// Adapter whose composer and key are set directly by the test.
    struct StubAdapter {
        key: RefCell<String>,
        composer: RefCell<Option<MemoryElement>>,
        hint_target: Option<MemoryElement>,
    }

    impl StubAdapter {
        fn new(key: &str, composer: Option<MemoryElement>) -> Self {
            Self {
                key: RefCell::new(key.to_string()),
                composer: RefCell::new(composer),
                hint_target: None,
            }
        }
    }

    impl SiteAdapter<MemoryDocument> for StubAdapter {
        fn id(&self) -> PlatformId {
            PlatformId::Generic
        }

        fn matches(&self, _url: &str) -> bool {
            true
        }

        fn composer(&self) -> Option<MemoryElement> {
            self.composer.borrow().clone()
        }

        fn contact_key(&self) -> String {
            self.key.borrow().clone()
        }

        fn conversation_title(&self) -> Option<String> {
            None
        }

        fn context(&self, _options: ContextOptions) -> Option<MessageContext> {
            None
        }

        fn mount_position_hint(&self, _composer: &MemoryElement) -> Option<MountPositionHint<MemoryElement>> {
            self.hint_target.clone().map(|mount_target| MountPositionHint {
                mount_target,
                style_overrides: vec![("top".to_string(), "50%".to_string())],
            })
        }
    }

    fn setup() -> (MemoryDocument, MemoryElement, Rc<CountingRenderer>, MountController<MemoryDocument>) {
        let doc = MemoryDocument::new("https://example.test/");
        let composer = MemoryElement::new("div").with_attr("contenteditable", "true");
        doc.body().append_child(&composer);
        let renderer = Rc::new(CountingRenderer::default());
        let controller = MountController::new(
            doc.clone(),
            Rc::new(ManualScheduler::new()),
            renderer.clone(),
            MountOptions::default(),
        );
        (doc, composer, renderer, controller)
    }

    fn containers(root: &MemoryElement) -> usize {
        root.query_selector_all(".replais-dot-container").len()
    }

    #[test]
    fn test_mount_is_idempotent() {
        let (_doc, composer, renderer, controller) = setup();
        let adapter = StubAdapter::new("whatsapp|abhay", Some(composer.clone()));

        assert!(controller.ensure_mounted(&adapter, false));
        let first = controller.container().unwrap();
        assert!(controller.ensure_mounted(&adapter, false));

        assert_eq!(containers(&composer), 1);
        assert_eq!(controller.container().unwrap(), first);
        assert_eq!(renderer.rendered.borrow().len(), 1);
        assert_eq!(controller.phase(), MountPhase::Mounted);
        assert_eq!(controller.contact_key().as_deref(), Some("whatsapp|abhay"));
    }

    #[test]
    fn test_force_remount_replaces_container() {
        let (_doc, composer, renderer, controller) = setup();
        let adapter = StubAdapter::new("whatsapp|abhay", Some(composer.clone()));

        controller.ensure_mounted(&adapter, false);
        let first = controller.container().unwrap();
        assert!(controller.ensure_mounted(&adapter, true));

        assert_eq!(containers(&composer), 1);
        assert_ne!(controller.container().unwrap(), first);
        assert_eq!(first.parent(), None);
        assert_eq!(renderer.released.get(), 1);
        assert_eq!(renderer.rendered.borrow().len(), 2);
    }

    #[test]
    fn test_contact_change_rebuilds_container() {
        let (_doc, composer, renderer, controller) = setup();
        let adapter = StubAdapter::new("whatsapp|abhay", Some(composer.clone()));
        controller.ensure_mounted(&adapter, false);

        *adapter.key.borrow_mut() = "whatsapp|riya".to_string();
        assert!(controller.ensure_mounted(&adapter, false));

        assert_eq!(containers(&composer), 1);
        assert_eq!(
            *renderer.rendered.borrow(),
            vec!["whatsapp|abhay".to_string(), "whatsapp|riya".to_string()]
        );
    }

    #[test]
    fn test_removes_orphaned_containers() {
        let (_doc, composer, _renderer, controller) = setup();
        composer.append_child(&MemoryElement::new("div").with_class("replais-dot-container"));
        composer.append_child(&MemoryElement::new("div").with_class("replais-dot-container"));
        let adapter = StubAdapter::new("whatsapp|abhay", Some(composer.clone()));

        assert!(controller.ensure_mounted(&adapter, false));
        assert_eq!(containers(&composer), 1);
        assert_eq!(composer.query_selector(".replais-dot-container"), controller.container());
    }

    #[test]
    fn test_detached_container_is_rebuilt() {
        let (_doc, composer, renderer, controller) = setup();
        let adapter = StubAdapter::new("whatsapp|abhay", Some(composer.clone()));
        controller.ensure_mounted(&adapter, false);

        controller.container().unwrap().remove();
        assert!(controller.ensure_mounted(&adapter, false));

        assert_eq!(containers(&composer), 1);
        assert_eq!(renderer.rendered.borrow().len(), 2);
    }

    #[test]
    fn test_no_contact_key_does_not_touch_the_page() {
        let (_doc, composer, renderer, controller) = setup();
        let adapter = StubAdapter::new("", Some(composer.clone()));

        assert!(!controller.ensure_mounted(&adapter, false));
        assert_eq!(containers(&composer), 0);
        assert_eq!(composer.style("position"), None);
        assert!(renderer.rendered.borrow().is_empty());
        assert_eq!(controller.contact_key(), None);
    }

    #[test]
    fn test_no_composer_records_key_and_fails() {
        let (_doc, _composer, _renderer, controller) = setup();
        let adapter = StubAdapter::new("whatsapp|abhay", None);

        assert!(!controller.ensure_mounted(&adapter, false));
        assert!(!controller.is_mounted());
        assert_eq!(controller.contact_key().as_deref(), Some("whatsapp|abhay"));
    }

    #[test]
    fn test_static_target_becomes_relative() {
        let (_doc, composer, _renderer, controller) = setup();
        let adapter = StubAdapter::new("whatsapp|abhay", Some(composer.clone()));
        controller.ensure_mounted(&adapter, false);

        assert_eq!(composer.style("position").as_deref(), Some("relative"));
        let container = controller.container().unwrap();
        assert_eq!(container.style("position").as_deref(), Some("absolute"));
        assert_eq!(container.style("bottom").as_deref(), Some("8px"));
    }

    #[test]
    fn test_positioned_target_keeps_its_position() {
        let (_doc, composer, _renderer, controller) = setup();
        composer.set_style("position", "fixed");
        let adapter = StubAdapter::new("whatsapp|abhay", Some(composer.clone()));
        controller.ensure_mounted(&adapter, false);

        assert_eq!(composer.style("position").as_deref(), Some("fixed"));
    }

    #[test]
    fn test_position_hint_overrides_target_and_styles() {
        let (doc, composer, _renderer, controller) = setup();
        let wrapper = MemoryElement::new("div");
        doc.body().append_child(&wrapper);
        let mut adapter = StubAdapter::new("whatsapp|abhay", Some(composer.clone()));
        adapter.hint_target = Some(wrapper.clone());

        assert!(controller.ensure_mounted(&adapter, false));
        assert_eq!(containers(&composer), 0);
        assert_eq!(containers(&wrapper), 1);

        let container = controller.container().unwrap();
        assert_eq!(container.style("top").as_deref(), Some("50%"));
        assert_eq!(container.style("bottom"), None);
    }
}
