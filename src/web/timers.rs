//! `Scheduler` over `window.setInterval` / `window.setTimeout`

use crate::timers::{Scheduler, TimerId};
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Window;

/// Returned when the browser refuses to schedule; clearing it is a no-op.
const INVALID_TIMER: TimerId = -1;

pub struct WebScheduler {
    window: Window,
    /// Interval closures stay alive until their interval is cleared.
    intervals: Rc<RefCell<HashMap<TimerId, Closure<dyn FnMut()>>>>,
}

impl WebScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            intervals: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl Scheduler for WebScheduler {
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId {
        let closure = Closure::wrap(callback);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            ) {
            Ok(id) => {
                self.intervals.borrow_mut().insert(id, closure);
                id
            }
            Err(e) => {
                log::error!("setInterval failed: {e:?}");
                INVALID_TIMER
            }
        }
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        let function = Closure::once_into_js(callback);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(function.unchecked_ref(), delay_ms as i32)
            .unwrap_or_else(|e| {
                log::error!("setTimeout failed: {e:?}");
                INVALID_TIMER
            })
    }

    fn clear(&self, id: TimerId) {
        if id == INVALID_TIMER {
            return;
        }
        self.window.clear_interval_with_handle(id);
        self.window.clear_timeout_with_handle(id);
        // Dropped after the borrow ends; the closure may be the caller.
        let closure = self.intervals.borrow_mut().remove(&id);
        drop(closure);
    }

    fn sleep(&self, delay_ms: u32) -> LocalBoxFuture<'static, ()> {
        let window = self.window.clone();
        Box::pin(async move {
            let promise = js_sys::Promise::new(&mut |resolve, _reject| {
                let _ = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay_ms as i32);
            });
            let _ = JsFuture::from(promise).await;
        })
    }
}
