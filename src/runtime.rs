use kuchiki::NodeRef;
use tracing::{debug, trace, warn};

use crate::config::PageConfig;
use crate::dialog::{DialogManager, DialogTarget};
use crate::page::events::KEY_TAB;
use crate::page::{
    dom, Behavior, DispatchOutcome, DragKind, EventContext, FileInfo, KeyEvent, Page, PageEvent,
};
use crate::widgets;

/// Follow-up events emitted by listeners may themselves emit; stop runaway chains.
const MAX_EMIT_DEPTH: usize = 8;

/// A page with every behavior attached, driven through document-level events.
pub struct PageRuntime {
    page: Page,
    dialogs: DialogManager,
    widgets: Vec<Box<dyn Behavior>>,
}

impl PageRuntime {
    pub fn new(html: &str, config: &PageConfig) -> Self {
        let mut page = Page::parse(html);
        page.set_prevent_scroll_supported(config.prevent_scroll_supported);
        Self::from_parts(
            page,
            DialogManager::new(config.dialog.clone()),
            widgets::install(&config.widgets),
        )
    }

    pub fn from_parts(page: Page, dialogs: DialogManager, widgets: Vec<Box<dyn Behavior>>) -> Self {
        Self {
            page,
            dialogs,
            widgets,
        }
    }

    pub fn add_behavior(&mut self, behavior: Box<dyn Behavior>) {
        self.widgets.push(behavior);
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn dialogs(&self) -> &DialogManager {
        &self.dialogs
    }

    pub fn query(&self, selector: &str) -> Option<NodeRef> {
        self.page.query(selector)
    }

    pub fn open(&mut self, target: impl Into<DialogTarget>) {
        self.dialogs.open(&mut self.page, target);
    }

    pub fn close(&mut self, target: impl Into<DialogTarget>) {
        self.dialogs.close(&mut self.page, target);
    }

    pub fn close_top(&mut self) {
        self.dialogs.close_top(&mut self.page);
    }

    pub fn dispatch(&mut self, event: PageEvent) -> DispatchOutcome {
        self.dispatch_at_depth(event, 0)
    }

    fn dispatch_at_depth(&mut self, event: PageEvent, depth: usize) -> DispatchOutcome {
        let mut cx = EventContext::new();
        trace!(target = "runtime", event = event.name(), depth, "dispatch");

        self.dialogs.handle(&mut self.page, &event, &mut cx);
        for behavior in self.widgets.iter_mut() {
            behavior.handle(&mut self.page, &event, &mut cx);
        }

        if let PageEvent::KeyDown(key) = &event {
            if key.is(KEY_TAB) && !cx.default_prevented() {
                self.page.move_focus_sequential(key.shift);
            }
        }

        let outcome = cx.outcome();
        for follow_up in cx.take_emitted() {
            if depth + 1 >= MAX_EMIT_DEPTH {
                warn!(
                    target = "runtime",
                    event = follow_up.name(),
                    "dropping follow-up event past depth limit"
                );
                continue;
            }
            self.dispatch_at_depth(follow_up, depth + 1);
        }
        outcome
    }

    pub fn dom_content_loaded(&mut self) -> DispatchOutcome {
        self.dispatch(PageEvent::DomContentLoaded)
    }

    pub fn click(&mut self, selector: &str) -> DispatchOutcome {
        match self.page.query(selector) {
            Some(target) => self.click_node(target),
            None => {
                debug!(target = "runtime", selector, "click target not found");
                DispatchOutcome::default()
            }
        }
    }

    /// Presses and releases the pointer on `target`: focus moves first, then
    /// `click` is dispatched.
    pub fn click_node(&mut self, target: NodeRef) -> DispatchOutcome {
        self.page.focus_from_pointer(&target);
        self.dispatch(PageEvent::Click { target })
    }

    pub fn key_down(&mut self, key: &str, shift: bool) -> DispatchOutcome {
        self.dispatch(PageEvent::KeyDown(KeyEvent::new(key, shift)))
    }

    /// Sets the control's value, then fires `input` on it as typing would.
    pub fn input(&mut self, selector: &str, value: &str) -> DispatchOutcome {
        let Some(target) = self.page.query(selector) else {
            debug!(target = "runtime", selector, "input target not found");
            return DispatchOutcome::default();
        };
        self.page.set_value(&target, value);
        self.dispatch(PageEvent::Input { target })
    }

    /// Assigns the file list to an input, then fires `change` on it.
    pub fn change(&mut self, selector: &str, files: Vec<FileInfo>) -> DispatchOutcome {
        let Some(target) = self.page.query(selector) else {
            debug!(target = "runtime", selector, "change target not found");
            return DispatchOutcome::default();
        };
        self.page.set_files(&target, files);
        self.dispatch(PageEvent::Change { target })
    }

    pub fn drag(&mut self, kind: DragKind, selector: &str, files: Vec<FileInfo>) -> DispatchOutcome {
        let Some(target) = self.page.query(selector) else {
            debug!(target = "runtime", selector, "drag target not found");
            return DispatchOutcome::default();
        };
        self.dispatch(PageEvent::Drag {
            kind,
            target,
            files,
        })
    }

    pub fn focus(&mut self, selector: &str) -> bool {
        match self.page.query(selector) {
            Some(node) => self.page.focus_quietly(&node),
            None => false,
        }
    }

    pub fn active_element(&self) -> Option<NodeRef> {
        self.page.active_element()
    }

    pub fn active_description(&self) -> Option<String> {
        self.page.active_element().map(|node| dom::describe(&node))
    }

    /// Flushes deferred work (post-close focus moves).
    pub fn pump(&mut self) -> usize {
        self.page.pump()
    }

    pub fn scroll_locked(&self) -> bool {
        self.dialogs.scroll_locked(&self.page)
    }

    pub fn to_html(&self) -> String {
        self.page.to_html()
    }
}
