use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stack entry, generated by the store on `present`.
///
/// Stable for the entry's lifetime and never reused by the same store, so it
/// is safe to use as a rendering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModalId(u64);

impl ModalId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modal#{}", self.0)
    }
}

/// Backdrop configuration carried by whichever entry is the active overlay source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayOptions {
    /// Clicking the backdrop dismisses the overlay source entry.
    pub close_on_click: bool,
    /// Backdrop opacity, `0.0..=1.0`.
    pub opacity: f32,
    /// Extra class for the backdrop element.
    pub class: Option<String>,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            close_on_click: true,
            opacity: 0.45,
            class: None,
        }
    }
}

impl OverlayOptions {
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn close_on_click(mut self, close: bool) -> Self {
        self.close_on_click = close;
        self
    }

    /// Opacity clamped into the renderable range. NaN renders as fully transparent.
    pub fn clamped_opacity(&self) -> f32 {
        if self.opacity.is_nan() {
            0.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        }
    }
}

/// Everything a caller supplies when presenting a modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalDescriptor<C> {
    #[serde(default)]
    pub is_modal: bool,
    #[serde(default)]
    pub is_overlay: bool,
    #[serde(default)]
    pub overlay_options: Option<OverlayOptions>,
    pub content: C,
}

impl<C> ModalDescriptor<C> {
    /// A plain, non-blocking entry (popover) with no backdrop.
    pub fn new(content: C) -> Self {
        Self {
            is_modal: false,
            is_overlay: false,
            overlay_options: None,
            content,
        }
    }

    pub fn modal(mut self) -> Self {
        self.is_modal = true;
        self
    }

    pub fn overlay(mut self) -> Self {
        self.is_overlay = true;
        self
    }

    pub fn with_overlay_options(mut self, options: OverlayOptions) -> Self {
        self.overlay_options = Some(options);
        self
    }

    /// Replaces the payload, keeping the presentation flags.
    pub fn map_content<D>(self, f: impl FnOnce(C) -> D) -> ModalDescriptor<D> {
        ModalDescriptor {
            is_modal: self.is_modal,
            is_overlay: self.is_overlay,
            overlay_options: self.overlay_options,
            content: f(self.content),
        }
    }
}

/// Lifecycle of a single entry.
///
/// `Removed` is never stored: the store reports it for ids it no longer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPhase {
    Entering,
    Present,
    Exiting,
    Removed,
}

impl EntryPhase {
    /// Entries that still accept a dismiss.
    pub fn is_live(&self) -> bool {
        matches!(self, EntryPhase::Entering | EntryPhase::Present)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPhase::Entering => "entering",
            EntryPhase::Present => "present",
            EntryPhase::Exiting => "exiting",
            EntryPhase::Removed => "removed",
        }
    }
}

/// One item of the stack. Owned exclusively by the store.
#[derive(Debug, Clone)]
pub struct ModalEntry<C> {
    pub id: ModalId,
    pub is_modal: bool,
    pub is_overlay: bool,
    pub overlay_options: Option<OverlayOptions>,
    pub phase: EntryPhase,
    pub content: C,
}

impl<C> ModalEntry<C> {
    pub(crate) fn from_descriptor(id: ModalId, phase: EntryPhase, desc: ModalDescriptor<C>) -> Self {
        Self {
            id,
            is_modal: desc.is_modal,
            is_overlay: desc.is_overlay,
            overlay_options: desc.overlay_options,
            phase,
            content: desc.content,
        }
    }

    /// Contributes a dimming layer (explicit overlays and every modal do).
    pub fn dims(&self) -> bool {
        self.is_overlay || self.is_modal
    }
}
