//! Browser bindings
//!
//! The content script loads the wasm module (which installs the console
//! logger and panic hook) and then calls [`boot`] once with an optional
//! config object.

mod console;
mod dom;
mod runtime;
mod storage;
mod timers;
mod widget;

pub use dom::{WebDocument, WebElement};
pub use storage::ChromeSettingsStore;
pub use timers::WebScheduler;
pub use widget::DotRenderer;

use crate::config::ReplaisConfig;
use crate::dom::Document;
use crate::mount::WidgetRenderer;
use crate::reply::reply_generator;
use crate::script::ContentScript;
use crate::timers::Scheduler;
use anyhow::{anyhow, Context};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

thread_local! {
    static SCRIPT: RefCell<Option<Rc<ContentScript<WebDocument>>>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::init(log::LevelFilter::Info);
}

/// Parse the optional boot config; `undefined`/`null` means defaults.
fn load_config(value: JsValue) -> anyhow::Result<ReplaisConfig> {
    if value.is_undefined() || value.is_null() {
        return Ok(ReplaisConfig::default());
    }
    let config: ReplaisConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| anyhow!(e.to_string()))
        .context("Failed to parse ReplAIs config")?;
    config.validate()?;
    Ok(config)
}

fn build(config: ReplaisConfig) -> anyhow::Result<Rc<ContentScript<WebDocument>>> {
    let window = web_sys::window().context("no window")?;
    let document = WebDocument::new(window.document().context("no document")?);
    log::info!("content script loaded on {}", document.location());

    let scheduler: Rc<dyn Scheduler> = Rc::new(WebScheduler::new(window.clone()));
    let generator = reply_generator(&config);
    let script = Rc::new(ContentScript::new(
        document,
        scheduler,
        Rc::new(ChromeSettingsStore),
        generator,
        config,
        |assistant| Rc::new(DotRenderer::new(assistant)) as Rc<dyn WidgetRenderer<WebElement>>,
    ));

    runtime::install(script.assistant().clone()).map_err(|e| anyhow!("{e:?}"))?;
    install_pagehide(&window, Rc::downgrade(&script)).map_err(|e| anyhow!("{e:?}"))?;
    Ok(script)
}

/// Tear the script down when the page goes away.
fn install_pagehide(window: &web_sys::Window, script: Weak<ContentScript<WebDocument>>) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Some(script) = script.upgrade() {
            script.teardown();
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    window.add_event_listener_with_callback("pagehide", callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// Start the content script. Returns whether an adapter handles this page.
/// Calling it again after a successful boot does nothing.
#[wasm_bindgen]
pub fn boot(config: JsValue) -> Result<bool, JsValue> {
    if SCRIPT.with(|slot| slot.borrow().is_some()) {
        log::warn!("boot called twice, ignoring");
        return Ok(false);
    }

    let script = load_config(config)
        .and_then(build)
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
    let started = script.start();
    SCRIPT.with(|slot| *slot.borrow_mut() = Some(script));
    Ok(started)
}

/// Stop every timer and remove the widget.
#[wasm_bindgen]
pub fn shutdown() {
    let script = SCRIPT.with(|slot| slot.borrow_mut().take());
    if let Some(script) = script {
        script.teardown();
    }
}
