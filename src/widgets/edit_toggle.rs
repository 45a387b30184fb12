//! Switches a list panel between read and edit mode.

use kuchiki::NodeRef;

use crate::config::EditToggleConfig;
use crate::page::{dom, Behavior, EventContext, Page, PageEvent};

pub struct EditToggle {
    config: EditToggleConfig,
}

impl EditToggle {
    pub fn new(config: EditToggleConfig) -> Self {
        Self { config }
    }

    fn toggle(&self, panel: &NodeRef, open: bool) {
        dom::toggle_class(panel, &self.config.edit_class, Some(open));
        if let Some(button) = dom::query(panel, &self.config.open_button) {
            dom::set_attr(&button, "aria-expanded", if open { "true" } else { "false" });
        }
    }
}

impl Behavior for EditToggle {
    fn name(&self) -> &'static str {
        "edit-toggle"
    }

    fn handle(&mut self, _page: &mut Page, event: &PageEvent, _cx: &mut EventContext) {
        let PageEvent::Click { target } = event else {
            return;
        };

        let (button, open) = if let Some(button) = dom::closest(target, &self.config.open_button) {
            (button, true)
        } else if let Some(button) = dom::closest(target, &self.config.close_button) {
            (button, false)
        } else {
            return;
        };

        if let Some(panel) = dom::closest(&button, &self.config.panel) {
            self.toggle(&panel, open);
        }
    }
}
