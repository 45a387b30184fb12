//! Modal dialog manager.
//!
//! Open dialogs live on a [`DialogStack`]; the top entry receives keyboard
//! routing and empty-overlay clicks. Each open session owns a backdrop, an
//! optional portal record, the opener reference, and the panel's saved
//! `tabindex`, all torn down again on close.

mod backdrop;
mod focus;
mod options;
mod portal;
mod scroll_lock;
mod stack;

use kuchiki::NodeRef;
use tracing::{debug, info};

use crate::config::DialogConfig;
use crate::page::events::{KEY_ESCAPE, KEY_TAB};
use crate::page::{dom, style, Behavior, EventContext, KeyEvent, Page, PageEvent};

pub use options::DialogOptions;
pub use scroll_lock::is_locked;
pub use stack::{z_for_level, DialogStack};

use stack::{OpenDialog, Session};

/// Either a direct node reference or a selector resolved at call time.
#[derive(Debug, Clone)]
pub enum DialogTarget {
    Selector(String),
    Node(NodeRef),
}

impl From<&str> for DialogTarget {
    fn from(selector: &str) -> Self {
        DialogTarget::Selector(selector.to_string())
    }
}

impl From<String> for DialogTarget {
    fn from(selector: String) -> Self {
        DialogTarget::Selector(selector)
    }
}

impl From<NodeRef> for DialogTarget {
    fn from(node: NodeRef) -> Self {
        DialogTarget::Node(node)
    }
}

impl From<&NodeRef> for DialogTarget {
    fn from(node: &NodeRef) -> Self {
        DialogTarget::Node(node.clone())
    }
}

pub struct DialogManager {
    config: DialogConfig,
    stack: DialogStack,
}

impl DialogManager {
    pub fn new(config: DialogConfig) -> Self {
        Self {
            config,
            stack: DialogStack::new(),
        }
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn stack(&self) -> &DialogStack {
        &self.stack
    }

    pub fn is_open(&self, element: &NodeRef) -> bool {
        self.stack.contains(element)
    }

    pub fn top(&self) -> Option<&NodeRef> {
        self.stack.top()
    }

    pub fn options(&self, element: &NodeRef) -> DialogOptions {
        DialogOptions::read(element, &self.config)
    }

    pub fn scroll_locked(&self, page: &Page) -> bool {
        scroll_lock::is_locked(page, &self.config.lock_class)
    }

    fn resolve(&self, page: &Page, target: DialogTarget) -> Option<NodeRef> {
        let node = match target {
            DialogTarget::Selector(selector) => page.query(&selector),
            DialogTarget::Node(node) => Some(node),
        }?;
        dom::is_element(&node).then_some(node)
    }

    fn panel_of(&self, element: &NodeRef) -> NodeRef {
        dom::query(element, &self.config.panel_selector()).unwrap_or_else(|| element.clone())
    }

    pub fn open(&mut self, page: &mut Page, target: impl Into<DialogTarget>) {
        let target = target.into();
        let Some(element) = self.resolve(page, target.clone()) else {
            debug!(target = "dialog", requested = ?target, "open target not found");
            return;
        };
        if self.stack.contains(&element) {
            return;
        }

        let panel = self.panel_of(&element);
        let Some(level) = self.stack.push(OpenDialog {
            element: element.clone(),
            panel: panel.clone(),
            session: Session::default(),
        }) else {
            return;
        };

        dom::add_class(&element, &self.config.open_class);
        dom::set_attr(&element, "aria-hidden", "false");

        let config = &self.config;
        let Some(entry) = self.stack.get_mut(&element) else {
            return;
        };
        entry.session.backdrop = backdrop::create(page, config);
        portal::relocate(page, &element, &mut entry.session.relocation, &config.placeholder);
        scroll_lock::acquire(page, &config.lock_class);
        stack::apply_level(entry, level, config.base_z);
        focus::capture_and_move_focus(page, &panel, &mut entry.session);

        info!(
            target = "dialog",
            dialog = %dom::describe(&element),
            level,
            "dialog opened"
        );
    }

    pub fn close(&mut self, page: &mut Page, target: impl Into<DialogTarget>) {
        let target = target.into();
        let Some(element) = self.resolve(page, target) else {
            return;
        };
        let Some(OpenDialog {
            element,
            panel,
            mut session,
        }) = self.stack.remove(&element)
        else {
            return;
        };

        dom::remove_class(&element, &self.config.open_class);
        dom::set_attr(&element, "aria-hidden", "true");
        style::remove_property(&element, "z-index");

        self.stack.restack(self.config.base_z);
        backdrop::remove(&mut session.backdrop);
        portal::restore(&element, &mut session.relocation);

        let next_panel = self.stack.top_entry().map(|entry| entry.panel.clone());
        focus::restore_and_return_focus(page, &panel, &mut session, next_panel.as_ref());
        scroll_lock::release(page, &self.config.lock_class, self.stack.is_empty());

        info!(
            target = "dialog",
            dialog = %dom::describe(&element),
            remaining = self.stack.len(),
            "dialog closed"
        );
    }

    pub fn close_top(&mut self, page: &mut Page) {
        if let Some(top) = self.stack.top().cloned() {
            self.close(page, top);
        }
    }

    fn route_click(&mut self, page: &mut Page, target: &NodeRef, cx: &mut EventContext) {
        if let Some(trigger) = dom::closest(target, &self.config.open_selector()) {
            if let Some(selector) =
                dom::attr(&trigger, &self.config.open_attr).filter(|s| !s.is_empty())
            {
                cx.prevent_default();
                self.open(page, selector);
            }
            return;
        }

        if let Some(closer) = dom::closest(target, &self.config.close_selector()) {
            if let Some(host) = dom::closest(&closer, &self.config.dialog_selector()) {
                cx.prevent_default();
                cx.stop_propagation();
                self.close(page, host);
            }
            return;
        }

        if dom::has_class(target, &self.config.backdrop_class) {
            let Some(owner) = self.stack.owner_of_backdrop(target).cloned() else {
                return;
            };
            if self.options(&owner).backdrop_close {
                self.close(page, owner);
            }
            return;
        }

        let Some(top) = self.stack.top_entry() else {
            return;
        };
        let inside_top =
            dom::closest(target, &self.config.dialog_selector()).as_ref() == Some(&top.element);
        let inside_panel = dom::contains(&top.panel, target);
        if inside_top && !inside_panel {
            let top = top.element.clone();
            if self.options(&top).backdrop_close {
                self.close(page, top);
            }
        }
    }

    fn route_key(&mut self, page: &mut Page, key: &KeyEvent, cx: &mut EventContext) {
        let Some(top) = self.stack.top_entry() else {
            return;
        };
        if key.is(KEY_ESCAPE) {
            let top = top.element.clone();
            if self.options(&top).esc_close {
                cx.prevent_default();
                self.close(page, top);
            }
        } else if key.is(KEY_TAB) {
            let panel = top.panel.clone();
            focus::trap(page, &panel, key, cx);
        }
    }
}

impl Behavior for DialogManager {
    fn name(&self) -> &'static str {
        "dialog"
    }

    fn handle(&mut self, page: &mut Page, event: &PageEvent, cx: &mut EventContext) {
        match event {
            PageEvent::Click { target } => self.route_click(page, target, cx),
            PageEvent::KeyDown(key) => self.route_key(page, key, cx),
            _ => {}
        }
    }
}
