use crate::derivation::{derive, DerivedPresentation};
use crate::entry::{EntryPhase, ModalDescriptor, ModalEntry, ModalId};
use crate::render::{render_plan, RenderItem};

/// Whether entries go through enter/exit transitions before settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMode {
    /// `present` starts in `Entering`, `dismiss` moves to `Exiting`;
    /// the renderer reports completion with `finish_enter` / `finish_exit`.
    Animated,
    /// `present` starts in `Present`, `dismiss` removes at once.
    Immediate,
}

/// Ordered stack of modal entries. Later entries sit on top.
///
/// - Supports present/dismiss/pop/clear
/// - Dismissing an unknown or already exiting id is a no-op
/// - Exiting entries stay in the collection, and in the derived flags, until
///   `finish_exit` removes them
#[derive(Debug, Clone)]
pub struct ModalStack<C> {
    entries: Vec<ModalEntry<C>>,
    next_id: u64,
    mode: TransitionMode,
}

impl<C> Default for ModalStack<C> {
    fn default() -> Self {
        Self::new(TransitionMode::Animated)
    }
}

impl<C> ModalStack<C> {
    pub fn new(mode: TransitionMode) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            mode,
        }
    }

    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    /// Append a new entry to the top of the stack.
    pub fn present(&mut self, descriptor: ModalDescriptor<C>) -> ModalId {
        let id = ModalId::new(self.next_id);
        self.next_id += 1;

        let phase = match self.mode {
            TransitionMode::Animated => EntryPhase::Entering,
            TransitionMode::Immediate => EntryPhase::Present,
        };
        let entry = ModalEntry::from_descriptor(id, phase, descriptor);
        log::debug!(
            "present {id}: modal={} overlay={} depth={}",
            entry.is_modal,
            entry.is_overlay,
            self.entries.len() + 1
        );
        self.entries.push(entry);
        id
    }

    /// Dismiss the entry with `id`, wherever it sits in the stack.
    pub fn dismiss(&mut self, id: ModalId) -> bool {
        let Some(pos) = self.position(id) else {
            log::debug!("dismiss {id}: not in stack");
            return false;
        };
        if !self.entries[pos].phase.is_live() {
            log::debug!("dismiss {id}: already exiting");
            return false;
        }
        match self.mode {
            TransitionMode::Animated => {
                log::debug!("dismiss {id}: exiting");
                self.entries[pos].phase = EntryPhase::Exiting;
            }
            TransitionMode::Immediate => {
                log::debug!("dismiss {id}: removed");
                self.entries.remove(pos);
            }
        }
        true
    }

    /// Dismiss the topmost entry that is not already leaving.
    pub fn pop(&mut self) -> Option<ModalId> {
        let id = self.top_live()?.id;
        self.dismiss(id);
        Some(id)
    }

    /// Dismiss every live entry. Returns how many were dismissed.
    pub fn clear(&mut self) -> usize {
        let ids: Vec<ModalId> = self.live().map(|e| e.id).collect();
        ids.into_iter().filter(|id| self.dismiss(*id)).count()
    }

    /// Enter transition completed.
    pub fn finish_enter(&mut self, id: ModalId) -> bool {
        match self.get_mut(id) {
            Some(entry) if entry.phase == EntryPhase::Entering => {
                entry.phase = EntryPhase::Present;
                true
            }
            _ => false,
        }
    }

    /// Exit transition completed: physically remove the entry.
    ///
    /// Only exiting entries are removed, so a late completion can neither drop a
    /// live entry nor bring a removed one back.
    pub fn finish_exit(&mut self, id: ModalId) -> bool {
        match self.position(id) {
            Some(pos) if self.entries[pos].phase == EntryPhase::Exiting => {
                self.entries.remove(pos);
                log::debug!("removed {id}");
                true
            }
            _ => false,
        }
    }

    pub fn entries(&self) -> &[ModalEntry<C>] {
        &self.entries
    }

    /// Entries that have not been dismissed.
    pub fn live(&self) -> impl DoubleEndedIterator<Item = &ModalEntry<C>> {
        self.entries.iter().filter(|e| e.phase.is_live())
    }

    pub fn top_live(&self) -> Option<&ModalEntry<C>> {
        self.live().next_back()
    }

    pub fn get(&self, id: ModalId) -> Option<&ModalEntry<C>> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn phase(&self, id: ModalId) -> EntryPhase {
        self.get(id).map(|e| e.phase).unwrap_or(EntryPhase::Removed)
    }

    pub fn contains(&self, id: ModalId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn derive(&self) -> DerivedPresentation {
        derive(&self.entries)
    }

    pub fn render_plan(&self, base_z_index: i32) -> Vec<RenderItem> {
        render_plan(&self.entries, &self.derive(), base_z_index)
    }

    fn position(&self, id: ModalId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn get_mut(&mut self, id: ModalId) -> Option<&mut ModalEntry<C>> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::OverlayOptions;
    use crate::side_effects::InteractionLock;
    use proptest::prelude::*;

    fn animated() -> ModalStack<&'static str> {
        ModalStack::new(TransitionMode::Animated)
    }

    fn immediate() -> ModalStack<&'static str> {
        ModalStack::new(TransitionMode::Immediate)
    }

    #[test]
    fn test_present_generates_unique_ids() {
        let mut stack = immediate();
        let a = stack.present(ModalDescriptor::new("a"));
        let b = stack.present(ModalDescriptor::new("b"));
        stack.dismiss(b);
        let c = stack.present(ModalDescriptor::new("c"));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(stack.entries().iter().map(|e| e.content).collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn test_empty_stack_scenario() {
        let stack = immediate();
        let d = stack.derive();
        assert!(!d.has_stack);
        assert_eq!(d.interaction_lock(), InteractionLock::Unlocked);
        assert_eq!(d.overlay_options, None);
    }

    #[test]
    fn test_modal_then_overlay_scenario() {
        let mut stack = immediate();
        stack.present(ModalDescriptor::new("a").modal());
        let single = stack.derive();
        assert_eq!(single.top_modal_index, Some(0));
        assert_eq!(single.overlay_index, Some(0));
        assert_eq!(single.interaction_lock(), InteractionLock::Unlocked);

        let options = OverlayOptions::default().with_opacity(0.7);
        let b = stack.present(
            ModalDescriptor::new("b")
                .overlay()
                .with_overlay_options(options.clone()),
        );
        let stacked = stack.derive();
        assert_eq!(stacked.top_modal_index, Some(0));
        assert_eq!(stacked.overlay_index, Some(1));
        assert_eq!(stacked.overlay_options, Some(options));
        assert_eq!(stacked.interaction_lock(), InteractionLock::Locked);

        assert!(stack.dismiss(b));
        assert_eq!(stack.derive(), single);
    }

    #[test]
    fn test_dismiss_from_middle() {
        let mut stack = immediate();
        let a = stack.present(ModalDescriptor::new("a").modal());
        let b = stack.present(ModalDescriptor::new("b").modal());
        let c = stack.present(ModalDescriptor::new("c"));
        assert!(stack.dismiss(b));
        assert_eq!(stack.entries().iter().map(|e| e.id).collect::<Vec<_>>(), [a, c]);
        assert_eq!(stack.derive().top_modal_index, Some(0));
    }

    #[test]
    fn test_dismiss_unknown_is_noop() {
        let mut stack = immediate();
        stack.present(ModalDescriptor::new("a").modal());
        let before = stack.derive();
        assert!(!stack.dismiss(ModalId::new(99)));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.derive(), before);
    }

    #[test]
    fn test_double_dismiss_is_noop() {
        let mut stack = animated();
        let a = stack.present(ModalDescriptor::new("a").modal());
        assert!(stack.dismiss(a));
        assert!(!stack.dismiss(a));
        assert_eq!(stack.phase(a), EntryPhase::Exiting);
    }

    #[test]
    fn test_exiting_entry_counts_until_removed() {
        let mut stack = animated();
        stack.present(ModalDescriptor::new("a").modal());
        let b = stack.present(ModalDescriptor::new("b").overlay());
        stack.dismiss(b);

        let d = stack.derive();
        assert_eq!(d.overlay_index, Some(1));
        assert_eq!(d.interaction_lock(), InteractionLock::Locked);

        assert!(stack.finish_exit(b));
        assert_eq!(stack.derive().interaction_lock(), InteractionLock::Unlocked);
        assert_eq!(stack.phase(b), EntryPhase::Removed);
    }

    #[test]
    fn test_transition_state_machine() {
        let mut stack = animated();
        let a = stack.present(ModalDescriptor::new("a"));
        assert_eq!(stack.phase(a), EntryPhase::Entering);
        // Exit completion before dismiss must not remove a live entry.
        assert!(!stack.finish_exit(a));
        assert!(stack.finish_enter(a));
        assert!(!stack.finish_enter(a));
        assert_eq!(stack.phase(a), EntryPhase::Present);
        stack.dismiss(a);
        assert!(!stack.finish_enter(a));
        assert!(stack.finish_exit(a));
        assert!(!stack.finish_exit(a));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_dismiss_while_entering() {
        let mut stack = animated();
        let a = stack.present(ModalDescriptor::new("a"));
        assert!(stack.dismiss(a));
        // The enter timer firing late must not revive it.
        assert!(!stack.finish_enter(a));
        assert_eq!(stack.phase(a), EntryPhase::Exiting);
    }

    #[test]
    fn test_pop_skips_exiting_entries() {
        let mut stack = animated();
        let a = stack.present(ModalDescriptor::new("a"));
        let b = stack.present(ModalDescriptor::new("b"));
        assert_eq!(stack.pop(), Some(b));
        assert_eq!(stack.pop(), Some(a));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut stack = immediate();
        stack.present(ModalDescriptor::new("a"));
        stack.present(ModalDescriptor::new("b"));
        assert_eq!(stack.clear(), 2);
        assert!(stack.is_empty());

        let mut stack = animated();
        stack.present(ModalDescriptor::new("a"));
        let b = stack.present(ModalDescriptor::new("b"));
        stack.dismiss(b);
        assert_eq!(stack.clear(), 1);
        assert_eq!(stack.live().count(), 0);
        assert_eq!(stack.len(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Present { is_modal: bool, is_overlay: bool },
        Dismiss(u64),
        FinishExit(u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<bool>(), any::<bool>())
                .prop_map(|(is_modal, is_overlay)| Op::Present { is_modal, is_overlay }),
            (1u64..12).prop_map(Op::Dismiss),
            (1u64..12).prop_map(Op::FinishExit),
        ]
    }

    fn apply(stack: &mut ModalStack<()>, op: &Op) {
        match *op {
            Op::Present { is_modal, is_overlay } => {
                stack.present(ModalDescriptor {
                    is_modal,
                    is_overlay,
                    overlay_options: None,
                    content: (),
                });
            }
            Op::Dismiss(id) => {
                stack.dismiss(ModalId::new(id));
            }
            Op::FinishExit(id) => {
                stack.finish_exit(ModalId::new(id));
            }
        }
    }

    proptest! {
        #[test]
        fn overlay_is_never_below_top_modal(ops in proptest::collection::vec(op(), 0..40)) {
            let mut stack = ModalStack::new(TransitionMode::Animated);
            for op in &ops {
                apply(&mut stack, op);
                let d = stack.derive();
                if let (Some(overlay), Some(top)) = (d.overlay_index, d.top_modal_index) {
                    prop_assert!(overlay >= top);
                }
            }
        }

        #[test]
        fn present_then_dismiss_restores_presentation(
            ops in proptest::collection::vec(op(), 0..20),
            is_modal in any::<bool>(),
            is_overlay in any::<bool>(),
        ) {
            let mut stack = ModalStack::new(TransitionMode::Animated);
            for op in &ops {
                apply(&mut stack, op);
            }
            let before = stack.derive();
            let id = stack.present(ModalDescriptor { is_modal, is_overlay, overlay_options: None, content: () });
            prop_assert!(stack.dismiss(id));
            prop_assert!(stack.finish_exit(id));
            prop_assert_eq!(stack.derive(), before);
        }

        #[test]
        fn dismissing_unknown_id_changes_nothing(ops in proptest::collection::vec(op(), 0..20)) {
            let mut stack = ModalStack::new(TransitionMode::Immediate);
            for op in &ops {
                apply(&mut stack, op);
            }
            let len = stack.len();
            let before = stack.derive();
            prop_assert!(!stack.dismiss(ModalId::new(1_000)));
            prop_assert_eq!(stack.len(), len);
            prop_assert_eq!(stack.derive(), before);
        }

        #[test]
        fn unlocked_iff_empty_or_modal_on_top(ops in proptest::collection::vec(op(), 0..30)) {
            let mut stack = ModalStack::new(TransitionMode::Animated);
            for op in &ops {
                apply(&mut stack, op);
            }
            let expect_unlocked = stack.entries().last().map_or(true, |e| e.is_modal);
            prop_assert_eq!(
                stack.derive().interaction_lock() == InteractionLock::Unlocked,
                expect_unlocked
            );
        }
    }
}
