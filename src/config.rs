//! Marker names and tunables for every behavior, loadable from YAML.
//!
//! Every field has a default matching the markup conventions the page
//! templates already use, so an absent or partial file is valid.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "PAGEWIRE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read page config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Whether `focus({ preventScroll: true })` is honoured by the host page.
    pub prevent_scroll_supported: bool,
    pub dialog: DialogConfig,
    pub widgets: WidgetConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            prevent_scroll_supported: true,
            dialog: DialogConfig::default(),
            widgets: WidgetConfig::default(),
        }
    }
}

impl PageConfig {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path)?;
                Self::from_yaml_str(&contents)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    pub open_attr: String,
    pub close_attr: String,
    pub dialog_attr: String,
    pub panel_attr: String,
    pub backdrop_close_attr: String,
    pub esc_close_attr: String,
    pub open_class: String,
    pub backdrop_class: String,
    pub lock_class: String,
    pub placeholder: String,
    pub base_z: u32,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            open_attr: "data-modal-target".into(),
            close_attr: "data-modal-close".into(),
            dialog_attr: "data-modal".into(),
            panel_attr: "data-modal-panel".into(),
            backdrop_close_attr: "data-modal-backdrop-close".into(),
            esc_close_attr: "data-modal-esc".into(),
            open_class: "is-open".into(),
            backdrop_class: "modal-backdrop".into(),
            lock_class: "is-scroll-locked".into(),
            placeholder: "modal-placeholder".into(),
            base_z: 3000,
        }
    }
}

impl DialogConfig {
    pub(crate) fn dialog_selector(&self) -> String {
        format!("[{}]", self.dialog_attr)
    }

    pub(crate) fn panel_selector(&self) -> String {
        format!("[{}]", self.panel_attr)
    }

    pub(crate) fn open_selector(&self) -> String {
        format!("[{}]", self.open_attr)
    }

    pub(crate) fn close_selector(&self) -> String {
        format!("[{}]", self.close_attr)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub edit_toggle: EditToggleConfig,
    pub clamp: ClampConfig,
    pub file_drop: FileDropConfig,
    pub range_sync: RangeSyncConfig,
    pub range_fill: RangeFillConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditToggleConfig {
    pub enabled: bool,
    pub panel: String,
    pub open_button: String,
    pub close_button: String,
    pub edit_class: String,
}

impl Default for EditToggleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            panel: ".api-edit-panel".into(),
            open_button: ".api-toggle-open".into(),
            close_button: ".api-toggle-close".into(),
            edit_class: "is-edit".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClampConfig {
    pub enabled: bool,
    pub item: String,
    pub text: String,
    pub button: String,
    pub expanded_class: String,
    pub max_lines: usize,
    /// Characters per rendered line for the default text measurer.
    pub columns: usize,
    pub expand_label: String,
    pub collapse_label: String,
}

impl Default for ClampConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            item: ".eval-answer".into(),
            text: ".eval-answer-text".into(),
            button: ".eval-answer-more".into(),
            expanded_class: "is-expanded".into(),
            max_lines: 7,
            columns: 80,
            expand_label: "+ 전체보기".into(),
            collapse_label: "접기".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDropConfig {
    pub enabled: bool,
    pub wrapper: String,
    pub input: String,
    pub name: String,
    pub size: String,
    pub remove: String,
    pub filled_class: String,
    pub drag_over_class: String,
    pub error_class: String,
}

impl Default for FileDropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            wrapper: "[data-file-uploader]".into(),
            input: "[data-form-file-input]".into(),
            name: "[data-form-file-name]".into(),
            size: "[data-form-file-size]".into(),
            remove: "[data-form-file-remove]".into(),
            filled_class: "is-filled".into(),
            drag_over_class: "is-dragover".into(),
            error_class: "is-error".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeSyncConfig {
    pub enabled: bool,
    pub field: String,
    pub number: String,
    pub range: String,
}

impl Default for RangeSyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            field: ".form-range-field".into(),
            number: ".js-range-number".into(),
            range: ".js-range-slider".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeFillConfig {
    pub enabled: bool,
    pub range: String,
    pub property: String,
}

impl Default for RangeFillConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            range: ".form-range".into(),
            property: "--fill".into(),
        }
    }
}
