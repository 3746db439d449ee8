use modal_stack_core::{DocumentFlags, DocumentSurface, ModalStackConfig};
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement};

/// Writes the modal flags onto `document.documentElement`.
///
/// The root element is used instead of `body`: dismissable layers of other UI
/// libraries save and restore `body` pointer-events themselves and would
/// restore our lock value after a dismiss.
#[derive(Debug, Clone)]
pub struct WebDocumentSurface {
    lock_property: String,
    has_modal_attribute: String,
}

impl WebDocumentSurface {
    pub fn new(config: &ModalStackConfig) -> Self {
        Self {
            lock_property: config.lock_property.clone(),
            has_modal_attribute: config.has_modal_attribute.clone(),
        }
    }
}

impl DocumentSurface for WebDocumentSurface {
    fn apply(&mut self, flags: &DocumentFlags) {
        let root = match window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            Some(root) => root,
            None => return,
        };

        if let Some(html) = root.dyn_ref::<HtmlElement>() {
            if let Err(err) = html
                .style()
                .set_property(&self.lock_property, flags.lock.css_value())
            {
                log::warn!("failed to set {}: {:?}", self.lock_property, err);
            }
        }
        let _ = root.set_attribute(&self.has_modal_attribute, flags.has_modal_value());
    }
}
