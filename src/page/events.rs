use kuchiki::NodeRef;
use serde::{Deserialize, Serialize};

use super::Page;

pub const KEY_ESCAPE: &str = "Escape";
pub const KEY_TAB: &str = "Tab";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    Enter,
    Over,
    Leave,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, shift: bool) -> Self {
        Self {
            key: key.into(),
            shift,
        }
    }

    pub fn is(&self, key: &str) -> bool {
        self.key == key
    }
}

/// Events observed by document-level listeners.
#[derive(Debug, Clone)]
pub enum PageEvent {
    DomContentLoaded,
    Click {
        target: NodeRef,
    },
    KeyDown(KeyEvent),
    Input {
        target: NodeRef,
    },
    Change {
        target: NodeRef,
    },
    Drag {
        kind: DragKind,
        target: NodeRef,
        files: Vec<FileInfo>,
    },
}

impl PageEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PageEvent::DomContentLoaded => "DOMContentLoaded",
            PageEvent::Click { .. } => "click",
            PageEvent::KeyDown(_) => "keydown",
            PageEvent::Input { .. } => "input",
            PageEvent::Change { .. } => "change",
            PageEvent::Drag { kind, .. } => match kind {
                DragKind::Enter => "dragenter",
                DragKind::Over => "dragover",
                DragKind::Leave => "dragleave",
                DragKind::Drop => "drop",
            },
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

/// Per-dispatch state handed to every listener.
#[derive(Debug, Default)]
pub struct EventContext {
    outcome: DispatchOutcome,
    emitted: Vec<PageEvent>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.outcome.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.outcome.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.outcome.default_prevented
    }

    /// Queues a synthetic bubbling event, dispatched once the current one finishes.
    pub fn emit(&mut self, event: PageEvent) {
        self.emitted.push(event);
    }

    pub fn outcome(&self) -> DispatchOutcome {
        self.outcome
    }

    pub fn take_emitted(&mut self) -> Vec<PageEvent> {
        std::mem::take(&mut self.emitted)
    }
}

/// A set of delegated document-level listeners.
pub trait Behavior {
    fn name(&self) -> &'static str;

    fn handle(&mut self, page: &mut Page, event: &PageEvent, cx: &mut EventContext);
}
