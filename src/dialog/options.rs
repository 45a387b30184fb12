use kuchiki::NodeRef;

use crate::config::DialogConfig;
use crate::page::dom;

/// Per-dialog switches declared on the dialog root. Re-read on every use so
/// markup edits between opens take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogOptions {
    pub backdrop_close: bool,
    pub esc_close: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            backdrop_close: true,
            esc_close: true,
        }
    }
}

impl DialogOptions {
    pub fn read(element: &NodeRef, config: &DialogConfig) -> Self {
        Self {
            backdrop_close: enabled(element, &config.backdrop_close_attr),
            esc_close: enabled(element, &config.esc_close_attr),
        }
    }
}

// Only the literal string "false" disables an option.
fn enabled(element: &NodeRef, attr: &str) -> bool {
    dom::attr(element, attr).as_deref() != Some("false")
}
