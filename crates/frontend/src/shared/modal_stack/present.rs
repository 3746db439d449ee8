//! Global present entry points for code outside the component tree.
//!
//! Rust callers use [`present_modal`]; scripts call `window.presentModal({...})`
//! (the name comes from `ModalStackConfig::global_function`). Both reach the
//! stack of the most recently mounted `ModalStackHost`.

use super::{ModalStackService, ModalView};
use modal_stack_core::{
    InstallToken, ModalDescriptor, ModalId, OverlayOptions, PresentError, PresenterSlot,
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::window;

static PRESENTER: Lazy<PresenterSlot<ModalView>> = Lazy::new(PresenterSlot::new);

thread_local! {
    static WINDOW_FUNCTIONS: RefCell<InstalledFunctions<js_sys::Function>> =
        RefCell::new(InstalledFunctions::default());
}

/// Present a modal on the currently mounted stack.
pub fn present_modal(descriptor: ModalDescriptor<ModalView>) -> Result<ModalId, PresentError> {
    PRESENTER.present(descriptor)
}

pub(super) fn install(svc: ModalStackService) -> InstallToken {
    PRESENTER.install(move |descriptor| svc.present(descriptor).map(|handle| handle.id()))
}

pub(super) fn uninstall(token: InstallToken) {
    if !PRESENTER.uninstall(token) {
        log::debug!("presenter already replaced by a newer stack");
    }
}

/// Descriptor accepted by the JS entry point.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsModalDescriptor {
    #[serde(default)]
    is_modal: bool,
    #[serde(default)]
    is_overlay: bool,
    #[serde(default)]
    overlay_options: Option<OverlayOptions>,
    /// Rendered as text.
    content: String,
    /// Extra class for the modal surface.
    #[serde(default)]
    class: Option<String>,
}

impl JsModalDescriptor {
    fn into_descriptor(self) -> ModalDescriptor<ModalView> {
        let mut view = ModalView::text(self.content);
        if let Some(class) = self.class {
            view = view.with_class(class);
        }
        ModalDescriptor {
            is_modal: self.is_modal,
            is_overlay: self.is_overlay,
            overlay_options: self.overlay_options,
            content: view,
        }
    }
}

fn present_from_js(value: JsValue) -> Result<ModalId, PresentError> {
    let descriptor: JsModalDescriptor = serde_wasm_bindgen::from_value(value)
        .map_err(|e| PresentError::InvalidDescriptor(e.to_string()))?;
    present_modal(descriptor.into_descriptor())
}

/// One JS function per global name, created on first use and reused by later mounts.
struct InstalledFunctions<F> {
    by_name: HashMap<String, F>,
}

impl<F> Default for InstalledFunctions<F> {
    fn default() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }
}

impl<F: Clone> InstalledFunctions<F> {
    fn function_for(&mut self, name: &str, create: impl FnOnce() -> F) -> F {
        self.by_name
            .entry(name.to_string())
            .or_insert_with(create)
            .clone()
    }
}

fn create_window_function() -> js_sys::Function {
    let closure = Closure::wrap(Box::new(move |value: JsValue| -> JsValue {
        match present_from_js(value) {
            Ok(id) => JsValue::from_f64(id.get() as f64),
            Err(err) => {
                log::warn!("presentModal failed: {}", err);
                wasm_bindgen::throw_str(&err.to_string())
            }
        }
    }) as Box<dyn Fn(JsValue) -> JsValue>);
    // Lives for the whole page lifetime; JS owns the closure from here on.
    closure.into_js_value().unchecked_into()
}

/// Assign `window[name]` on every mount, replacing whatever another script put there.
///
/// The JS function forwards to [`PRESENTER`], so it always reaches the latest
/// mounted stack.
pub(super) fn install_window_function(name: &str) {
    let Some(window) = window() else {
        return;
    };
    let function = WINDOW_FUNCTIONS
        .with(|functions| functions.borrow_mut().function_for(name, create_window_function));

    match js_sys::Reflect::set(&window, &JsValue::from_str(name), &function) {
        Ok(_) => log::debug!("installed window.{}", name),
        Err(err) => log::error!("failed to install window.{}: {:?}", name, err),
    }
}
