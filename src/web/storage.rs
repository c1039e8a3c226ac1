//! `SettingsStore` over `chrome.storage.sync`

use crate::error::{ReplaisError, Result};
use crate::models::{UserSettings, SETTINGS_KEY};
use crate::settings::SettingsStore;
use async_trait::async_trait;
use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeSettingsStore;

fn js_error(value: JsValue) -> ReplaisError {
    ReplaisError::Settings(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// `chrome.storage.sync`, resolved on every call.
fn sync_area() -> Result<JsValue> {
    let chrome = Reflect::get(&js_sys::global(), &"chrome".into()).map_err(js_error)?;
    if chrome.is_undefined() {
        return Err(ReplaisError::Settings("chrome.storage is not available".to_string()));
    }
    let storage = Reflect::get(&chrome, &"storage".into()).map_err(js_error)?;
    Reflect::get(&storage, &"sync".into()).map_err(js_error)
}

/// Call `area[method](arg)` and await the returned promise.
async fn call(method: &str, arg: &JsValue) -> Result<JsValue> {
    let area = sync_area()?;
    let function: Function = Reflect::get(&area, &method.into())
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    let promise: Promise = function.call1(&area, arg).map_err(js_error)?.dyn_into().map_err(js_error)?;
    JsFuture::from(promise).await.map_err(js_error)
}

#[async_trait(?Send)]
impl SettingsStore for ChromeSettingsStore {
    async fn load(&self) -> Result<UserSettings> {
        let result = call("get", &SETTINGS_KEY.into()).await?;
        let stored = Reflect::get(&result, &SETTINGS_KEY.into()).map_err(js_error)?;
        if stored.is_undefined() || stored.is_null() {
            return Ok(UserSettings::default());
        }
        serde_wasm_bindgen::from_value(stored).map_err(|e| ReplaisError::Settings(e.to_string()))
    }

    async fn save(&self, settings: &UserSettings) -> Result<()> {
        let value = settings
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| ReplaisError::Settings(e.to_string()))?;
        let record = Object::new();
        Reflect::set(&record, &SETTINGS_KEY.into(), &value).map_err(js_error)?;
        call("set", &record.into()).await?;
        Ok(())
    }
}
