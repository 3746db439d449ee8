use crate::derivation::DerivedPresentation;
use crate::entry::{EntryPhase, ModalEntry, ModalId, OverlayOptions};

/// Per-entry flags handed to the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub id: ModalId,
    pub index: usize,
    pub is_top: bool,
    pub is_bottom: bool,
    /// This entry draws the single dimming backdrop.
    pub is_overlay_source: bool,
    /// The globally resolved overlay options, identical for every item.
    pub overlay_options: Option<OverlayOptions>,
    pub phase: EntryPhase,
    pub z_index: i32,
}

/// Builds the ordered render list for a snapshot and the presentation derived from it.
pub fn render_plan<C>(
    entries: &[ModalEntry<C>],
    derived: &DerivedPresentation,
    base_z_index: i32,
) -> Vec<RenderItem> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| RenderItem {
            id: entry.id,
            index,
            is_top: derived.top_modal_index == Some(index),
            is_bottom: index == 0,
            is_overlay_source: derived.overlay_index == Some(index),
            overlay_options: derived.overlay_options.clone(),
            phase: entry.phase,
            z_index: base_z_index.saturating_add(i32::try_from(index).unwrap_or(i32::MAX)),
        })
        .collect()
}
