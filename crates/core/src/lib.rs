//! Modal stack state: ordering, derived presentation flags, document side
//! effects and the process-wide present entry point.
//!
//! This crate has no UI dependency; the Leptos integration lives in the
//! `modal_stack` crate.

pub mod config;
pub mod derivation;
pub mod entry;
pub mod presenter;
pub mod render;
pub mod side_effects;
pub mod store;

pub use config::{load_config, ModalStackConfig};
pub use derivation::{derive, DerivedPresentation};
pub use entry::{EntryPhase, ModalDescriptor, ModalEntry, ModalId, OverlayOptions};
pub use presenter::{InstallToken, PresentError, PresenterSlot};
pub use render::{render_plan, RenderItem};
pub use side_effects::{DocumentFlags, DocumentSurface, InteractionLock, SideEffectSync};
pub use store::{ModalStack, TransitionMode};
