use crate::shared::modal_stack::{
    present_modal, CloseGuard, ModalStackProvider, ModalStackService, ModalView,
};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use modal_stack_core::{ModalDescriptor, OverlayOptions};
use std::sync::Arc;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ModalStackProvider>
            <DemoPage />
        </ModalStackProvider>
    }
}

#[component]
fn DemoPage() -> impl IntoView {
    let svc = use_context::<ModalStackService>().expect("ModalStackService not provided in context");
    let depth = move || svc.len();

    let open_dialog = move |_| {
        let opened = svc.push(move |handle| {
            view! {
                <div class="modal-body">
                    <h3>"Dialog"</h3>
                    <p>"Blocking modal. Escape or the button closes it."</p>
                    <button on:click=move |_| open_popover(svc)>"Open popover"</button>
                    <button on:click=move |_| handle.close()>"Close"</button>
                </div>
            }
            .into_any()
        });
        if let Err(err) = opened {
            log::error!("failed to open dialog: {}", err);
        }
    };

    let open_guarded = move |_| {
        let confirmed = RwSignal::new(false);
        let guard: CloseGuard = Arc::new(move || confirmed.get_untracked());
        let opened = svc.push_with_frame_guard(None, Some("modal-guarded".into()), Some(guard), move |handle| {
            view! {
                <div class="modal-body">
                    <label>
                        <input
                            type="checkbox"
                            on:change=move |ev| confirmed.set(event_target_checked(&ev))
                        />
                        "Allow closing"
                    </label>
                    <button on:click=move |_| handle.close()>"Close"</button>
                </div>
            }
            .into_any()
        });
        if let Err(err) = opened {
            log::error!("failed to open dialog: {}", err);
        }
    };

    // Simulates a call site outside the component tree.
    let open_later = move |_| {
        spawn_local(async {
            TimeoutFuture::new(500).await;
            let descriptor = ModalDescriptor::new(ModalView::text("Opened from outside the tree".into()))
                .modal();
            if let Err(err) = present_modal(descriptor) {
                log::error!("present_modal failed: {}", err);
            }
        });
    };

    view! {
        <main class="demo-page">
            <p>"Open modals: " {depth}</p>
            <button on:click=open_dialog>"Open dialog"</button>
            <button on:click=open_guarded>"Open guarded dialog"</button>
            <button on:click=open_later>"Present in 0.5s"</button>
            <button on:click=move |_| svc.clear_deferred()>"Close all"</button>
        </main>
    }
}

fn open_popover(svc: ModalStackService) {
    let view = ModalView::new(|handle| {
        view! {
            <div class="popover-body">
                <p>"Non-modal overlay above the dialog."</p>
                <button on:click=move |_| handle.close()>"Dismiss"</button>
            </div>
        }
        .into_any()
    })
    .with_class("popover");
    let descriptor = ModalDescriptor::new(view)
        .overlay()
        .with_overlay_options(OverlayOptions::default().with_opacity(0.2));
    if let Err(err) = svc.present(descriptor) {
        log::error!("failed to open popover: {}", err);
    }
}
