use crate::store::TransitionMode;
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ModalStackConfig {
    /// Name of the `window` function installed for external scripts.
    pub global_function: String,
    /// Style property on the root element that carries the interaction lock.
    pub lock_property: String,
    /// Root element attribute recording whether any modal is open.
    pub has_modal_attribute: String,
    /// z-index of the bottom entry; each entry above adds one.
    pub base_z_index: i32,
    pub enter_transition_ms: u32,
    pub exit_transition_ms: u32,
    /// Escape dismisses the topmost live entry.
    pub close_on_escape: bool,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
global_function = "presentModal"
lock_property = "pointer-events"
has_modal_attribute = "data-has-modal"
base_z_index = 1000
enter_transition_ms = 150
exit_transition_ms = 150
close_on_escape = true
"#;

impl Default for ModalStackConfig {
    fn default() -> Self {
        Self {
            global_function: "presentModal".to_string(),
            lock_property: "pointer-events".to_string(),
            has_modal_attribute: "data-has-modal".to_string(),
            base_z_index: 1000,
            enter_transition_ms: 150,
            exit_transition_ms: 150,
            close_on_escape: true,
        }
    }
}

impl ModalStackConfig {
    /// Without any transition duration there is nothing to wait for.
    pub fn transition_mode(&self) -> TransitionMode {
        if self.enter_transition_ms == 0 && self.exit_transition_ms == 0 {
            TransitionMode::Immediate
        } else {
            TransitionMode::Animated
        }
    }
}

/// Load configuration
///
/// `overrides` is a TOML document; keys it omits keep their default value.
pub fn load_config(overrides: Option<&str>) -> anyhow::Result<ModalStackConfig> {
    match overrides {
        Some(source) => {
            log::info!("Loading modal stack config from overrides");
            toml::from_str(source).context("parse modal stack config")
        }
        None => toml::from_str(DEFAULT_CONFIG).context("parse embedded modal stack config"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = load_config(None).unwrap();
        assert_eq!(config, ModalStackConfig::default());
        assert_eq!(config.transition_mode(), TransitionMode::Animated);
    }

    #[test]
    fn test_partial_overrides() {
        let config = load_config(Some("base_z_index = 50\nglobal_function = \"openDialog\"")).unwrap();
        assert_eq!(config.base_z_index, 50);
        assert_eq!(config.global_function, "openDialog");
        assert_eq!(config.lock_property, "pointer-events");
    }

    #[test]
    fn test_zero_durations_are_immediate() {
        let config =
            load_config(Some("enter_transition_ms = 0\nexit_transition_ms = 0")).unwrap();
        assert_eq!(config.transition_mode(), TransitionMode::Immediate);
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let err = load_config(Some("base_z_index = \"high\"")).unwrap_err();
        assert!(err.to_string().contains("parse modal stack config"));
    }
}
