pub mod app;
pub mod shared;

pub use modal_stack_core::{
    load_config, ModalDescriptor, ModalId, ModalStackConfig, OverlayOptions, PresentError,
};
pub use shared::modal_stack::{
    present_modal, ModalHandle, ModalStackHost, ModalStackProvider, ModalStackService, ModalView,
};

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen]
pub fn hydrate() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(app::App);
}

#[wasm_bindgen(start)]
pub fn start() {
    hydrate();
}
