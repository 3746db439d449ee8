//! Process-wide entry point for presenting modals from code outside the UI tree.
//!
//! The slot holds at most one presenter. The most recently installed presenter
//! wins; uninstalling with a stale token leaves the current one in place.

use crate::entry::{ModalDescriptor, ModalId};
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PresentError {
    #[error("modal stack is not mounted")]
    NotInstalled,

    #[error("invalid modal descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("modal stack has been disposed")]
    Disposed,
}

pub type Presenter<C> =
    Arc<dyn Fn(ModalDescriptor<C>) -> Result<ModalId, PresentError> + Send + Sync>;

/// Identifies one `install` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallToken(u64);

struct Installed<C> {
    token: InstallToken,
    present: Presenter<C>,
}

struct SlotState<C> {
    current: Option<Installed<C>>,
    next_token: u64,
}

pub struct PresenterSlot<C> {
    state: RwLock<SlotState<C>>,
}

impl<C> Default for PresenterSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> PresenterSlot<C> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SlotState {
                current: None,
                next_token: 1,
            }),
        }
    }

    pub fn install<F>(&self, present: F) -> InstallToken
    where
        F: Fn(ModalDescriptor<C>) -> Result<ModalId, PresentError> + Send + Sync + 'static,
    {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let token = InstallToken(state.next_token);
        state.next_token += 1;
        if state.current.is_some() {
            log::debug!("presenter replaced by a newer stack");
        }
        state.current = Some(Installed {
            token,
            present: Arc::new(present),
        });
        token
    }

    /// Returns `false` when `token` no longer owns the slot.
    pub fn uninstall(&self, token: InstallToken) -> bool {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        match &state.current {
            Some(installed) if installed.token == token => {
                state.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.state
            .read()
            .map(|s| s.current.is_some())
            .unwrap_or_else(|e| e.into_inner().current.is_some())
    }

    pub fn present(&self, descriptor: ModalDescriptor<C>) -> Result<ModalId, PresentError> {
        // Clone out so the presenter runs without holding the lock; it may
        // trigger reactive updates that present again.
        let present = {
            let state = self.state.read().unwrap_or_else(|e| e.into_inner());
            state
                .current
                .as_ref()
                .map(|installed| Arc::clone(&installed.present))
        };
        let present = present.ok_or(PresentError::NotInstalled)?;
        present(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ModalStack, TransitionMode};
    use std::sync::Mutex;

    fn shared_stack() -> Arc<Mutex<ModalStack<&'static str>>> {
        Arc::new(Mutex::new(ModalStack::new(TransitionMode::Immediate)))
    }

    fn install_stack(
        slot: &PresenterSlot<&'static str>,
        stack: &Arc<Mutex<ModalStack<&'static str>>>,
    ) -> InstallToken {
        let stack = Arc::clone(stack);
        slot.install(move |desc| Ok(stack.lock().unwrap().present(desc)))
    }

    #[test]
    fn test_present_before_install() {
        let slot = PresenterSlot::<&'static str>::new();
        assert!(!slot.is_installed());
        assert_eq!(
            slot.present(ModalDescriptor::new("a")),
            Err(PresentError::NotInstalled)
        );
    }

    #[test]
    fn test_forwards_to_installed_stack() {
        let slot = PresenterSlot::new();
        let stack = shared_stack();
        install_stack(&slot, &stack);

        let id = slot.present(ModalDescriptor::new("a").modal()).unwrap();
        let stack = stack.lock().unwrap();
        assert!(stack.contains(id));
        assert!(stack.get(id).unwrap().is_modal);
    }

    #[test]
    fn test_last_install_wins() {
        let slot = PresenterSlot::new();
        let first = shared_stack();
        let second = shared_stack();
        let first_token = install_stack(&slot, &first);
        let second_token = install_stack(&slot, &second);

        slot.present(ModalDescriptor::new("x")).unwrap();
        assert!(first.lock().unwrap().is_empty());
        assert_eq!(second.lock().unwrap().len(), 1);

        // The older host unmounting must not detach the newer one.
        assert!(!slot.uninstall(first_token));
        assert!(slot.is_installed());
        assert!(slot.uninstall(second_token));
        assert!(!slot.is_installed());
    }

    #[test]
    fn test_presenter_errors_are_forwarded() {
        let slot = PresenterSlot::<&'static str>::new();
        slot.install(|_| Err(PresentError::Disposed));
        assert_eq!(
            slot.present(ModalDescriptor::new("a")),
            Err(PresentError::Disposed)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(PresentError::NotInstalled.to_string(), "modal stack is not mounted");
        assert_eq!(
            PresentError::InvalidDescriptor("missing field `content`".into()).to_string(),
            "invalid modal descriptor: missing field `content`"
        );
    }
}
