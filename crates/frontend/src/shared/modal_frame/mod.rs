use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use crate::shared::modal_stack::TransitionHandler;
use modal_stack_core::EntryPhase;
use wasm_bindgen_futures::spawn_local;

/// Modal frame container (overlay + positioned surface) for one stack entry.
///
/// Only the overlay source of the stack dims its backdrop; other frames keep a
/// transparent overlay so exactly one dimming layer is visible.
#[component]
pub fn ModalFrame(
    /// Called when the modal should close (overlay click).
    on_close: Callback<()>,
    /// Called with the phase whose transition just finished.
    on_transition_end: TransitionHandler,
    /// Close when clicking on the overlay.
    #[prop(into)]
    close_on_overlay: Signal<bool>,
    /// z-index for overlay stacking.
    #[prop(into)]
    z_index: Signal<i32>,
    #[prop(into)]
    is_top: Signal<bool>,
    #[prop(into)]
    is_bottom: Signal<bool>,
    #[prop(into)]
    phase: Signal<EntryPhase>,
    /// Backdrop opacity when this frame is the overlay source.
    #[prop(into)]
    dim: Signal<Option<f32>>,
    /// The entry is a modal or overlay: its backdrop captures pointer events.
    blocking: bool,
    enter_ms: u32,
    exit_ms: u32,
    /// Extra class for the modal surface (`div.modal`).
    #[prop(optional)]
    modal_class: String,
    /// Extra style for the modal surface (`div.modal`).
    #[prop(optional)]
    modal_style: String,
    children: Children,
) -> impl IntoView {
    let overlay_mouse_down = RwSignal::new(false);

    // Transition timers: report completion of Entering / Exiting back to the stack.
    Effect::new(move |prev: Option<EntryPhase>| {
        let current = phase.get();
        if prev != Some(current) {
            let wait = match current {
                EntryPhase::Entering => Some(enter_ms),
                EntryPhase::Exiting => Some(exit_ms),
                EntryPhase::Present | EntryPhase::Removed => None,
            };
            if let Some(ms) = wait {
                let on_transition_end = on_transition_end.clone();
                spawn_local(async move {
                    TimeoutFuture::new(ms).await;
                    on_transition_end(current);
                });
            }
        }
        current
    });

    let is_direct_overlay_event = |ev: &ev::MouseEvent| -> bool {
        match (ev.target(), ev.current_target()) {
            (Some(t), Some(ct)) => t == ct,
            _ => false,
        }
    };

    // We only close if both press and release happened on the overlay itself.
    // This prevents closing when user selects text inside the modal and releases the mouse outside.
    let handle_overlay_mouse_down = move |ev: ev::MouseEvent| {
        overlay_mouse_down.set(is_direct_overlay_event(&ev));
    };

    let handle_overlay_click = move |ev: ev::MouseEvent| {
        let should_close = close_on_overlay.get_untracked()
            && overlay_mouse_down.get_untracked()
            && is_direct_overlay_event(&ev);
        overlay_mouse_down.set(false);
        if should_close {
            on_close.run(());
        }
    };

    let stop_propagation = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
    };

    view! {
        <div
            class=move || frame_class(phase.get(), is_top.get(), is_bottom.get())
            style=move || overlay_style(z_index.get(), dim.get(), blocking && phase.get().is_live())
            on:mousedown=handle_overlay_mouse_down
            on:click=handle_overlay_click
        >
            <div
                class=surface_class(&modal_class)
                style=surface_style(&modal_style)
                on:click=stop_propagation
            >
                {children()}
            </div>
        </div>
    }
}

fn frame_class(phase: EntryPhase, is_top: bool, is_bottom: bool) -> String {
    let mut class = format!("modal-overlay modal-{}", phase.as_str());
    if is_top {
        class.push_str(" modal-top");
    }
    if is_bottom {
        class.push_str(" modal-bottom");
    }
    class
}

fn overlay_style(z_index: i32, dim: Option<f32>, captures_pointer: bool) -> String {
    let background = match dim {
        Some(opacity) => format!("rgba(0, 0, 0, {opacity:.2})"),
        None => "transparent".to_string(),
    };
    let pointer_events = if captures_pointer { "auto" } else { "none" };
    format!("z-index: {z_index}; background: {background}; pointer-events: {pointer_events};")
}

fn surface_class(extra: &str) -> String {
    if extra.is_empty() {
        "modal".to_string()
    } else {
        format!("modal {extra}")
    }
}

fn surface_style(extra: &str) -> String {
    if extra.is_empty() {
        "position: relative; pointer-events: auto;".to_string()
    } else {
        format!("position: relative; pointer-events: auto; {extra}")
    }
}
