//! Document-level side effects of the stack: the pointer interaction lock and
//! the "has open modal" flag.

use crate::derivation::DerivedPresentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionLock {
    Locked,
    #[default]
    Unlocked,
}

impl InteractionLock {
    /// Value for the CSS `pointer-events` property on the root element.
    pub fn css_value(&self) -> &'static str {
        match self {
            InteractionLock::Locked => "none",
            InteractionLock::Unlocked => "auto",
        }
    }
}

/// The pair of document attributes written together on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentFlags {
    pub lock: InteractionLock,
    pub has_modal: bool,
}

impl DocumentFlags {
    pub fn has_modal_value(&self) -> &'static str {
        if self.has_modal { "true" } else { "false" }
    }
}

/// Where document flags end up. Implementations must write both attributes in
/// a single `apply` call.
pub trait DocumentSurface {
    fn apply(&mut self, flags: &DocumentFlags);
}

/// Pushes derived flags to a [`DocumentSurface`], writing only when they change by value.
#[derive(Debug)]
pub struct SideEffectSync<S> {
    surface: S,
    last: Option<DocumentFlags>,
}

impl<S: DocumentSurface> SideEffectSync<S> {
    pub fn new(surface: S) -> Self {
        Self { surface, last: None }
    }

    /// Returns `true` when the surface was written.
    pub fn sync(&mut self, presentation: &DerivedPresentation) -> bool {
        self.apply_flags(presentation.document_flags())
    }

    /// Restores the default interaction state. Called when the owning host unmounts.
    pub fn release(&mut self) -> bool {
        self.apply_flags(DocumentFlags::default())
    }

    pub fn last_applied(&self) -> Option<DocumentFlags> {
        self.last
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn apply_flags(&mut self, flags: DocumentFlags) -> bool {
        if self.last == Some(flags) {
            return false;
        }
        log::trace!(
            "document flags: lock={} has_modal={}",
            flags.lock.css_value(),
            flags.has_modal
        );
        self.surface.apply(&flags);
        self.last = Some(flags);
        true
    }
}
