use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::app::SheetCityApp;
use crate::dataset::{Dataset, DatasetError};
use crate::highlight::HighlightState;
use crate::scene::{Scene, SceneEvent};
use crate::settings::SceneSettings;

/// Web entrypoint for the sheet city.
///
/// JS drives it as:
/// - `new WebHandle()`
/// - `await handle.start(canvas)`
/// - `await handle.load_url(url)` or `handle.load_json(text)`
/// - `handle.destroy()`
#[derive(Clone)]
#[wasm_bindgen]
pub struct WebHandle {
    runner: eframe::WebRunner,
    scene: Rc<RefCell<Scene>>,
}

#[wasm_bindgen]
impl WebHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        // Initialize logging if possible.
        eframe::WebLogger::init(log::LevelFilter::Info).ok();

        Self {
            runner: eframe::WebRunner::new(),
            scene: Rc::new(RefCell::new(Scene::default())),
        }
    }

    /// Replace the default tunables. Only effective before `start`.
    #[wasm_bindgen]
    pub fn configure(&self, settings_json: &str) -> Result<(), JsValue> {
        let settings = SceneSettings::from_json_str(settings_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        *self.scene.borrow_mut() = Scene::new(settings);
        Ok(())
    }

    /// Start the app on a given canvas.
    #[wasm_bindgen]
    pub async fn start(
        &self,
        canvas: web_sys::HtmlCanvasElement,
    ) -> Result<(), wasm_bindgen::JsValue> {
        let scene = self.scene.clone();

        self.runner
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(move |_cc| Ok(Box::new(SheetCityApp::new(scene.clone())))),
            )
            .await
    }

    /// Fetch and load the sheet dataset. Failures are logged and leave the
    /// scene loading.
    #[wasm_bindgen]
    pub async fn load_url(&self, url: String) {
        let event = match fetch_text(&url).await {
            Ok(json) => dataset_event(&json),
            Err(err) => SceneEvent::DatasetFailed(err),
        };
        self.scene.borrow_mut().handle(event);
    }

    #[wasm_bindgen]
    pub fn load_json(&self, json: &str) {
        self.scene.borrow_mut().handle(dataset_event(json));
    }

    #[wasm_bindgen]
    pub fn hover_tower(&self, name: String) {
        self.hover(HighlightState::Tower { name });
    }

    #[wasm_bindgen]
    pub fn hover_arc(&self, from: String, to: String) {
        self.hover(HighlightState::Arc { from, to });
    }

    #[wasm_bindgen]
    pub fn clear_hover(&self) {
        self.hover(HighlightState::None);
    }

    #[wasm_bindgen]
    pub fn tooltip(&self) -> Option<String> {
        self.scene.borrow().tooltip()
    }

    /// Current draw primitives as JSON, for a JS-side renderer.
    #[wasm_bindgen]
    pub fn frame_json(&self) -> Option<String> {
        let scene = self.scene.borrow();
        let frame = scene.frame()?;
        match serde_json::to_string(frame) {
            Ok(json) => Some(json),
            Err(err) => {
                log::error!("failed to serialize frame: {}", err);
                None
            }
        }
    }

    #[wasm_bindgen]
    pub fn trail_time(&self) -> u32 {
        self.scene.borrow().trail_time()
    }

    /// Cancels the scene timers and stops the runner.
    #[wasm_bindgen]
    pub fn destroy(&self) {
        self.scene.borrow_mut().handle(SceneEvent::Teardown);
        self.runner.destroy();
    }

    #[wasm_bindgen]
    pub fn has_panicked(&self) -> bool {
        self.runner.has_panicked()
    }
}

impl WebHandle {
    fn hover(&self, state: HighlightState) {
        self.scene.borrow_mut().handle(SceneEvent::Hover(state));
    }
}

fn dataset_event(json: &str) -> SceneEvent {
    match Dataset::from_json_str(json) {
        Ok(dataset) => SceneEvent::DatasetLoaded(dataset),
        Err(err) => SceneEvent::DatasetFailed(err),
    }
}

fn js_error(value: JsValue) -> DatasetError {
    DatasetError::Fetch(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

async fn fetch_text(url: &str) -> Result<String, DatasetError> {
    let window =
        web_sys::window().ok_or_else(|| DatasetError::Fetch("no window".to_string()))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    if !response.ok() {
        return Err(DatasetError::Fetch(format!(
            "{} returned status {}",
            url,
            response.status()
        )));
    }
    let text: js_sys::JsString = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    Ok(text.into())
}
