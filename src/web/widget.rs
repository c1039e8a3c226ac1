//! The reply dot rendered inside the mounted container

use super::dom::{WebDocument, WebElement};
use crate::assistant::{ReplyAssistant, ReplyOverrides};
use crate::mount::WidgetRenderer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, HtmlButtonElement};

const BUTTON_STYLE: &[(&str, &str)] = &[
    ("width", "28px"),
    ("height", "28px"),
    ("border", "none"),
    ("border-radius", "50%"),
    ("background", "#4f46e5"),
    ("color", "#fff"),
    ("font-size", "12px"),
    ("font-weight", "700"),
    ("cursor", "pointer"),
    ("user-select", "none"),
    ("pointer-events", "auto"),
];

type Listener = Closure<dyn FnMut(Event)>;

struct Rendered {
    container: WebElement,
    button: HtmlButtonElement,
    listeners: Vec<(&'static str, Listener)>,
}

/// Draws a single "r" button that asks the assistant for a reply. The button
/// is disabled while a reply is pending.
pub struct DotRenderer {
    assistant: Rc<ReplyAssistant<WebDocument>>,
    rendered: RefCell<Vec<Rendered>>,
}

impl DotRenderer {
    pub fn new(assistant: Rc<ReplyAssistant<WebDocument>>) -> Self {
        Self {
            assistant,
            rendered: RefCell::new(Vec::new()),
        }
    }

    fn build_button(&self) -> Result<HtmlButtonElement, JsValue> {
        let button: HtmlButtonElement = self
            .assistant
            .document()
            .raw()
            .create_element("button")?
            .dyn_into()?;
        button.set_type("button");
        button.set_class_name("replais-dot");
        button.set_attribute("aria-label", "Open ReplAIs")?;
        button.set_text_content(Some("r"));
        let style = button.style();
        for (property, value) in BUTTON_STYLE {
            style.set_property(property, value)?;
        }
        Ok(button)
    }

    fn click_listener(&self, button: &HtmlButtonElement) -> Listener {
        let assistant = self.assistant.clone();
        let button = button.clone();
        Closure::wrap(Box::new(move |event: Event| {
            event.stop_propagation();
            if button.disabled() {
                return;
            }
            button.set_disabled(true);

            let assistant = assistant.clone();
            let button = button.clone();
            spawn_local(async move {
                if let Err(e) = assistant.suggest(ReplyOverrides::default()).await {
                    log::error!("error getting reply: {e}");
                }
                button.set_disabled(false);
            });
        }) as Box<dyn FnMut(Event)>)
    }
}

impl WidgetRenderer<WebElement> for DotRenderer {
    fn render(&self, container: &WebElement, contact_key: &str) {
        let button = match self.build_button() {
            Ok(button) => button,
            Err(e) => {
                log::error!("could not build widget for {contact_key}: {e:?}");
                return;
            }
        };

        // Keep focus (and the caret) in the composer.
        let mousedown: Listener = Closure::wrap(Box::new(|event: Event| event.prevent_default()) as Box<dyn FnMut(Event)>);
        let listeners = vec![("click", self.click_listener(&button)), ("mousedown", mousedown)];
        for (name, listener) in &listeners {
            let _ = button.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }

        if let Err(e) = container.raw().append_child(&button) {
            log::error!("could not attach widget: {e:?}");
            return;
        }
        self.rendered.borrow_mut().push(Rendered {
            container: container.clone(),
            button,
            listeners,
        });
    }

    fn release(&self, container: &WebElement) {
        let released: Vec<Rendered> = {
            let mut rendered = self.rendered.borrow_mut();
            let (released, kept): (Vec<Rendered>, Vec<Rendered>) =
                rendered.drain(..).partition(|r| &r.container == container);
            *rendered = kept;
            released
        };
        for entry in released {
            for (name, listener) in &entry.listeners {
                let _ = entry
                    .button
                    .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
            }
            entry.button.remove();
        }
    }
}
