//! In-memory page model: the parsed document plus the browser state the
//! behaviors depend on (active element, input file lists, deferred tasks).

pub mod dom;
pub mod events;
pub mod focus;
pub mod style;
pub mod tasks;

use std::rc::{Rc, Weak};

use kuchiki::traits::*;
use kuchiki::{Node, NodeRef};
use tracing::debug;

pub use events::{
    Behavior, DispatchOutcome, DragKind, EventContext, FileInfo, KeyEvent, PageEvent,
};
pub use focus::{FocusError, FocusOptions};
pub use tasks::{DeferredTask, FocusReason, TaskId, TaskQueue};

/// Upper bound on task ticks drained by a single [`Page::pump`].
const PUMP_TICK_LIMIT: usize = 64;

pub struct Page {
    document: NodeRef,
    active: Option<NodeRef>,
    files: Vec<(Weak<Node>, Vec<FileInfo>)>,
    tasks: TaskQueue,
    prevent_scroll_supported: bool,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: kuchiki::parse_html().one(html),
            active: None,
            files: Vec::new(),
            tasks: TaskQueue::new(),
            prevent_scroll_supported: true,
        }
    }

    pub fn set_prevent_scroll_supported(&mut self, supported: bool) {
        self.prevent_scroll_supported = supported;
    }

    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    pub fn root_element(&self) -> Option<NodeRef> {
        self.document.children().find(dom::is_element)
    }

    pub fn body(&self) -> Option<NodeRef> {
        dom::query(&self.document, "body")
    }

    pub fn query(&self, selector: &str) -> Option<NodeRef> {
        dom::query(&self.document, selector)
    }

    pub fn query_all(&self, selector: &str) -> Vec<NodeRef> {
        dom::query_all(&self.document, selector)
    }

    pub fn is_connected(&self, node: &NodeRef) -> bool {
        dom::contains(&self.document, node)
    }

    /// The focused element, if it is still part of the document.
    pub fn active_element(&self) -> Option<NodeRef> {
        self.active
            .as_ref()
            .filter(|node| self.is_connected(node))
            .cloned()
    }

    pub fn focus(&mut self, node: &NodeRef, options: FocusOptions) -> Result<(), FocusError> {
        if !self.is_connected(node) {
            return Err(FocusError::Detached);
        }
        if !focus::is_focusable(node) {
            return Err(FocusError::NotFocusable);
        }
        if options.prevent_scroll && !self.prevent_scroll_supported {
            return Err(FocusError::PreventScrollUnsupported);
        }
        self.active = Some(node.clone());
        Ok(())
    }

    /// Focuses without scrolling when the page allows it, otherwise plainly.
    /// Failures are logged and swallowed.
    pub fn focus_quietly(&mut self, node: &NodeRef) -> bool {
        let result = match self.focus(node, FocusOptions::preserving_scroll()) {
            Err(FocusError::PreventScrollUnsupported) => {
                self.focus(node, FocusOptions::default())
            }
            other => other,
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                debug!(target = "focus", node = %dom::describe(node), error = %err, "focus request ignored");
                false
            }
        }
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Focus change caused by pressing the pointer on `target`: the nearest
    /// focusable inclusive ancestor takes focus, otherwise focus is dropped.
    pub fn focus_from_pointer(&mut self, target: &NodeRef) {
        if !self.is_connected(target) {
            return;
        }
        match target.inclusive_ancestors().find(focus::is_focusable) {
            Some(node) => self.active = Some(node),
            None => self.blur(),
        }
    }

    /// Default action of an unprevented Tab key.
    pub fn move_focus_sequential(&mut self, backward: bool) {
        let current = self.active_element();
        if let Some(next) = focus::sequential_from(&self.document, current.as_ref(), backward) {
            self.active = Some(next);
        }
    }

    pub fn value(&self, node: &NodeRef) -> String {
        dom::attr(node, "value").unwrap_or_default()
    }

    pub fn set_value(&self, node: &NodeRef, value: &str) {
        dom::set_attr(node, "value", value);
    }

    pub fn files(&self, input: &NodeRef) -> Vec<FileInfo> {
        self.files
            .iter()
            .find(|(owner, _)| owner.upgrade().is_some_and(|rc| NodeRef(rc) == *input))
            .map(|(_, files)| files.clone())
            .unwrap_or_default()
    }

    pub fn set_files(&mut self, input: &NodeRef, files: Vec<FileInfo>) {
        self.files.retain(|(owner, _)| {
            owner
                .upgrade()
                .is_some_and(|rc| NodeRef(rc) != *input)
        });
        if !files.is_empty() {
            self.files.push((Rc::downgrade(&input.0), files));
        }
    }

    pub fn schedule(&mut self, task: DeferredTask) -> TaskId {
        self.tasks.schedule(task)
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// Runs deferred tasks tick by tick until the queue is empty. Returns the
    /// number of tasks executed.
    pub fn pump(&mut self) -> usize {
        let mut ran = 0;
        for _ in 0..PUMP_TICK_LIMIT {
            if self.tasks.is_empty() {
                break;
            }
            for scheduled in self.tasks.take_tick() {
                self.run_task(scheduled.id, scheduled.task);
                ran += 1;
            }
        }
        ran
    }

    fn run_task(&mut self, id: TaskId, task: DeferredTask) {
        match task {
            DeferredTask::Focus { node, reason } => {
                let focused = self.focus_quietly(&node);
                debug!(
                    target = "tasks",
                    task = id.get(),
                    ?reason,
                    node = %dom::describe(&node),
                    focused,
                    "deferred focus"
                );
            }
        }
    }

    pub fn to_html(&self) -> String {
        self.document.to_string()
    }
}
