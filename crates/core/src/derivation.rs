//! Presentation flags computed from the stack contents.
//!
//! Nothing here is cached: the flags are recomputed from the collection on
//! every change, so they can never drift from it.

use crate::entry::{ModalEntry, OverlayOptions};
use crate::side_effects::{DocumentFlags, InteractionLock};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedPresentation {
    /// Index of the last entry flagged `is_modal`.
    pub top_modal_index: Option<usize>,
    /// Index of the last entry that dims (`is_overlay || is_modal`).
    pub overlay_index: Option<usize>,
    /// Options of the entry at `overlay_index`.
    pub overlay_options: Option<OverlayOptions>,
    pub has_stack: bool,
    /// The last entry is itself a modal, not a non-modal item stacked above one.
    pub top_is_blocking: bool,
    pub len: usize,
}

impl DerivedPresentation {
    /// Page interaction is locked while a non-modal entry sits on top.
    pub fn interaction_lock(&self) -> InteractionLock {
        if self.has_stack && !self.top_is_blocking {
            InteractionLock::Locked
        } else {
            InteractionLock::Unlocked
        }
    }

    pub fn document_flags(&self) -> DocumentFlags {
        DocumentFlags {
            lock: self.interaction_lock(),
            has_modal: self.has_stack,
        }
    }
}

pub fn derive<C>(entries: &[ModalEntry<C>]) -> DerivedPresentation {
    let len = entries.len();
    let top_modal_index = entries.iter().rposition(|e| e.is_modal);
    let overlay_index = entries.iter().rposition(ModalEntry::dims);
    let overlay_options = overlay_index.and_then(|i| entries[i].overlay_options.clone());
    let has_stack = len > 0;

    DerivedPresentation {
        top_modal_index,
        overlay_index,
        overlay_options,
        has_stack,
        top_is_blocking: has_stack && top_modal_index == Some(len - 1),
        len,
    }
}
