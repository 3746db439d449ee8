use super::{present, ModalHandle, ModalStackService, WebDocumentSurface};
use crate::shared::modal_frame::ModalFrame;
use leptos::ev;
use leptos::prelude::*;
use modal_stack_core::{EntryPhase, ModalStackConfig, RenderItem, SideEffectSync};

/// Provides a `ModalStackService` to `children` and mounts its host after them.
#[component]
pub fn ModalStackProvider(
    /// Stack configuration (default: embedded defaults).
    #[prop(optional)]
    config: Option<ModalStackConfig>,
    children: Children,
) -> impl IntoView {
    provide_context(ModalStackService::new(config.unwrap_or_default()));

    view! {
        {children()}
        <ModalStackHost />
    }
}

/// Renders the modal stack and keeps the document flags in sync with it.
///
/// Must be mounted exactly once per `ModalStackService`.
#[component]
pub fn ModalStackHost() -> impl IntoView {
    let svc = use_context::<ModalStackService>()
        .expect("ModalStackService not provided in context (use ModalStackProvider)");
    let config = svc.config();

    // Document lock + has-modal flag, written together, once per distinct value.
    let sync = StoredValue::new(SideEffectSync::new(WebDocumentSurface::new(&config)));
    Effect::new(move |_| {
        svc.presentation().with(|p| {
            sync.update_value(|s| {
                s.sync(p);
            });
        });
    });

    let token = present::install(svc);
    present::install_window_function(&config.global_function);

    let escape = config.close_on_escape.then(|| {
        // Global Escape handler: closes only the topmost modal.
        window_event_listener(ev::keydown, move |event| {
            if event.key() != "Escape" {
                return;
            }
            if let Some(id) = svc.top_live_id() {
                if svc.can_close(id) {
                    svc.dismiss_deferred(id);
                }
            }
        })
    });

    on_cleanup(move || {
        present::uninstall(token);
        if let Some(handle) = escape {
            handle.remove();
        }
        sync.try_update_value(|s| {
            s.release();
        });
    });

    let plan = Memo::new(move |_| svc.render_plan());

    view! {
        <For
            each=move || plan.get()
            key=|item: &RenderItem| item.id
            children=move |item: RenderItem| {
                let id = item.id;
                // Flags of a keyed entry change without remounting it.
                let current = move || plan.with(|p| p.iter().find(|i| i.id == id).cloned());
                let is_top = Signal::derive(move || current().map(|i| i.is_top).unwrap_or(false));
                let is_bottom = Signal::derive(move || current().map(|i| i.is_bottom).unwrap_or(false));
                let z_index = Signal::derive(move || current().map(|i| i.z_index).unwrap_or(item.z_index));
                let phase = Signal::derive(move || current().map(|i| i.phase).unwrap_or(EntryPhase::Removed));
                let dim = Signal::derive(move || {
                    current()
                        .filter(|i| i.is_overlay_source)
                        .map(|i| i.overlay_options.unwrap_or_default().clamped_opacity())
                });
                let close_on_overlay = Signal::derive(move || {
                    current()
                        .and_then(|i| i.overlay_options)
                        .map(|o| o.close_on_click)
                        .unwrap_or(true)
                });

                let on_close = Callback::new(move |_| {
                    if svc.can_close(id) {
                        svc.dismiss_deferred(id);
                    }
                });
                // Not owned by this row: the enter timer may fire after the row is gone.
                let on_transition_end = svc.transition_handler(id);

                let blocking = svc
                    .stack
                    .with_untracked(|s| s.get(id).map(|e| e.dims()).unwrap_or(false));
                let content = svc.view_of(id);
                let modal_style = content.as_ref().and_then(|v| v.modal_style.clone());
                let modal_class = content.as_ref().and_then(|v| v.modal_class.clone());
                let view = content.map(|v| (v.builder)(ModalHandle { id, svc }));

                view! {
                    <ModalFrame
                        on_close=on_close
                        on_transition_end=on_transition_end
                        close_on_overlay=close_on_overlay
                        z_index=z_index
                        is_top=is_top
                        is_bottom=is_bottom
                        phase=phase
                        dim=dim
                        blocking=blocking
                        enter_ms=config.enter_transition_ms
                        exit_ms=config.exit_transition_ms
                        modal_style=modal_style.unwrap_or_default()
                        modal_class=modal_class.unwrap_or_default()
                    >
                        {view}
                    </ModalFrame>
                }
            }
        />
    }
}
