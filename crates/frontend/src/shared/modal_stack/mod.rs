mod document;
mod host;
pub mod present;

pub use document::WebDocumentSurface;
pub use host::{ModalStackHost, ModalStackProvider};
pub use present::present_modal;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use modal_stack_core::{
    DerivedPresentation, EntryPhase, ModalDescriptor, ModalId, ModalStack, ModalStackConfig,
    PresentError, RenderItem,
};
use std::sync::Arc;
use wasm_bindgen_futures::spawn_local;

pub type ModalBuilder = Arc<dyn Fn(ModalHandle) -> AnyView + Send + Sync>;
pub type CloseGuard = Arc<dyn Fn() -> bool + Send + Sync>;
/// Receives the phase whose enter/exit transition just finished.
pub type TransitionHandler = Arc<dyn Fn(EntryPhase) + Send + Sync>;

/// Content payload of a stack entry: how to build the view plus frame overrides.
#[derive(Clone)]
pub struct ModalView {
    builder: ModalBuilder,
    modal_style: Option<String>,
    modal_class: Option<String>,
    can_close: Option<CloseGuard>,
}

impl ModalView {
    pub fn new<F>(builder: F) -> Self
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        Self {
            builder: Arc::new(builder),
            modal_style: None,
            modal_class: None,
            can_close: None,
        }
    }

    /// Plain text content, used for modals presented from JS.
    pub fn text(text: String) -> Self {
        Self::new(move |_| view! { <div class="modal-text">{text.clone()}</div> }.into_any())
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.modal_style = Some(style.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.modal_class = Some(class.into());
        self
    }

    /// If the guard returns false, overlay-click and Escape will NOT close the modal.
    pub fn with_close_guard(mut self, can_close: CloseGuard) -> Self {
        self.can_close = Some(can_close);
        self
    }

    fn allows_close(&self) -> bool {
        self.can_close.as_ref().map(|f| f()).unwrap_or(true)
    }
}

/// A handle returned by `ModalStackService::present`.
///
/// Can be cloned and used inside event handlers to close the modal.
#[derive(Clone, Copy)]
pub struct ModalHandle {
    id: ModalId,
    svc: ModalStackService,
}

impl ModalHandle {
    pub fn close(&self) {
        self.svc.dismiss_deferred(self.id);
    }

    pub fn id(&self) -> ModalId {
        self.id
    }
}

/// Reactive modal stack shared through context.
///
/// - Every mutation is a single signal update, so readers never see a half-applied change
/// - `presentation` is a memo: subscribers only rerun when the derived flags change by value
/// - Escape closes only the topmost modal (handled by `ModalStackHost`)
#[derive(Clone, Copy)]
pub struct ModalStackService {
    stack: RwSignal<ModalStack<ModalView>>,
    presentation: Memo<DerivedPresentation>,
    config: StoredValue<ModalStackConfig>,
}

impl ModalStackService {
    pub fn new(config: ModalStackConfig) -> Self {
        let stack = RwSignal::new(ModalStack::new(config.transition_mode()));
        let presentation = Memo::new(move |_| stack.with(|s| s.derive()));
        Self {
            stack,
            presentation,
            config: StoredValue::new(config),
        }
    }

    fn defer(&self, f: impl FnOnce(ModalStackService) + 'static) {
        let svc = *self;
        spawn_local(async move {
            // Defer to next tick to avoid "closure invoked ... after being dropped" when
            // a modal is removed synchronously during the originating DOM event dispatch.
            TimeoutFuture::new(0).await;
            f(svc);
        });
    }

    pub fn config(&self) -> ModalStackConfig {
        self.config.get_value()
    }

    pub fn presentation(&self) -> Memo<DerivedPresentation> {
        self.presentation
    }

    pub fn is_open(&self) -> bool {
        self.stack.with(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.stack.with(|s| s.len())
    }

    /// Read the current stack snapshot (tracked).
    pub fn with_stack<R>(&self, f: impl FnOnce(&ModalStack<ModalView>) -> R) -> R {
        self.stack.with(f)
    }

    pub fn render_plan(&self) -> Vec<RenderItem> {
        let base_z_index = self.config.with_value(|c| c.base_z_index);
        self.stack.with(|s| s.render_plan(base_z_index))
    }

    /// Push a new entry onto the stack.
    ///
    /// Fails with [`PresentError::Disposed`] once the owning provider is gone.
    pub fn present(
        &self,
        descriptor: ModalDescriptor<ModalView>,
    ) -> Result<ModalHandle, PresentError> {
        match self.stack.try_update(|s| s.present(descriptor)) {
            Some(id) => Ok(ModalHandle { id, svc: *self }),
            None => {
                log::error!("present on a disposed modal stack");
                Err(PresentError::Disposed)
            }
        }
    }

    /// Push a blocking modal with an overlay.
    ///
    /// `builder` receives a `ModalHandle` so the modal can close itself.
    pub fn push<F>(&self, builder: F) -> Result<ModalHandle, PresentError>
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        self.present(ModalDescriptor::new(ModalView::new(builder)).modal())
    }

    /// Push a blocking modal with style/class overrides for the modal surface.
    pub fn push_with_frame<F>(
        &self,
        modal_style: Option<String>,
        modal_class: Option<String>,
        builder: F,
    ) -> Result<ModalHandle, PresentError>
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        self.push_with_frame_guard(modal_style, modal_class, None, builder)
    }

    /// Push a blocking modal with style/class overrides AND a close guard.
    pub fn push_with_frame_guard<F>(
        &self,
        modal_style: Option<String>,
        modal_class: Option<String>,
        can_close: Option<CloseGuard>,
        builder: F,
    ) -> Result<ModalHandle, PresentError>
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        let view = ModalView {
            builder: Arc::new(builder),
            modal_style,
            modal_class,
            can_close,
        };
        self.present(ModalDescriptor::new(view).modal())
    }

    pub fn dismiss(&self, id: ModalId) {
        self.stack.try_update(|s| {
            s.dismiss(id);
        });
    }

    pub fn dismiss_deferred(&self, id: ModalId) {
        self.defer(move |svc| svc.dismiss(id));
    }

    pub fn pop(&self) {
        self.stack.try_update(|s| {
            s.pop();
        });
    }

    pub fn pop_deferred(&self) {
        self.defer(|svc| svc.pop());
    }

    pub fn clear(&self) {
        self.stack.try_update(|s| {
            s.clear();
        });
    }

    pub fn clear_deferred(&self) {
        self.defer(|svc| svc.clear());
    }

    /// Called by the frame when its enter or exit transition has finished.
    ///
    /// Late completions (entry gone, stack disposed) are ignored.
    pub fn transition_finished(&self, id: ModalId, phase: EntryPhase) {
        let finished = match phase {
            EntryPhase::Entering => self.stack.try_update(|s| s.finish_enter(id)),
            EntryPhase::Exiting => self.stack.try_update(|s| s.finish_exit(id)),
            EntryPhase::Present | EntryPhase::Removed => return,
        };
        if finished.is_none() {
            log::debug!("transition of {id} finished after the stack was disposed");
        }
    }

    /// Transition callback for the frame of `id`.
    ///
    /// Owned by nothing reactive, so a timer that outlives the frame can still call it.
    pub fn transition_handler(&self, id: ModalId) -> TransitionHandler {
        let svc = *self;
        Arc::new(move |phase| svc.transition_finished(id, phase))
    }

    /// Whether the close guard of `id` allows overlay-click / Escape dismissal.
    pub fn can_close(&self, id: ModalId) -> bool {
        self.stack
            .try_with_untracked(|s| {
                s.get(id)
                    .map(|e| e.phase.is_live() && e.content.allows_close())
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    fn top_live_id(&self) -> Option<ModalId> {
        self.stack
            .try_with_untracked(|s| s.top_live().map(|e| e.id))
            .flatten()
    }

    fn view_of(&self, id: ModalId) -> Option<ModalView> {
        self.stack
            .try_with_untracked(|s| s.get(id).map(|e| e.content.clone()))
            .flatten()
    }
}
