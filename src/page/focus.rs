use kuchiki::NodeRef;
use thiserror::Error;

use super::dom;

/// Elements that take part in sequential (Tab) navigation.
pub const TABBABLE_SELECTOR: &str = concat!(
    "a[href], area[href], ",
    "button:not([disabled]), ",
    "select:not([disabled]), ",
    "textarea:not([disabled]), ",
    "input:not([disabled]):not([type=\"hidden\"]), ",
    "[tabindex]:not([tabindex=\"-1\"])"
);

const DISABLEABLE: &[&str] = &["button", "select", "textarea", "input"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FocusError {
    #[error("element is not connected to the document")]
    Detached,
    #[error("element cannot receive focus")]
    NotFocusable,
    #[error("scroll-preserving focus is not supported")]
    PreventScrollUnsupported,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusOptions {
    pub prevent_scroll: bool,
}

impl FocusOptions {
    pub fn preserving_scroll() -> Self {
        Self {
            prevent_scroll: true,
        }
    }
}

fn is_disabled(node: &NodeRef) -> bool {
    dom::tag_name(node)
        .map(|tag| DISABLEABLE.contains(&tag.as_str()) && dom::has_attr(node, "disabled"))
        .unwrap_or(false)
}

/// Whether `node` accepts programmatic focus. Any element with a `tabindex`
/// qualifies (including `-1`), as do the natively tabbable controls.
pub fn is_focusable(node: &NodeRef) -> bool {
    if !dom::is_element(node) || is_disabled(node) {
        return false;
    }
    if dom::has_attr(node, "tabindex") {
        return true;
    }
    dom::matches_str(node, TABBABLE_SELECTOR)
}

/// Tabbable descendants of `root` in tree order, computed fresh on every call.
pub fn tabbable_within(root: &NodeRef) -> Vec<NodeRef> {
    dom::query_all(root, TABBABLE_SELECTOR)
}

/// Next element in sequential navigation order, wrapping at either end.
pub fn sequential_target(
    candidates: &[NodeRef],
    current: Option<&NodeRef>,
    backward: bool,
) -> Option<NodeRef> {
    if candidates.is_empty() {
        return None;
    }
    let last = candidates.len() - 1;
    let position = current.and_then(|node| candidates.iter().position(|c| c == node));
    let index = match (position, backward) {
        (None, false) => 0,
        (None, true) => last,
        (Some(i), false) if i == last => 0,
        (Some(i), false) => i + 1,
        (Some(0), true) => last,
        (Some(i), true) => i - 1,
    };
    candidates.get(index).cloned()
}

/// Sequential navigation starting from wherever `current` sits in tree
/// order. `current` need not be tabbable itself (a panel focused with
/// `tabindex="-1"` hands Tab on to the control after it).
pub fn sequential_from(
    root: &NodeRef,
    current: Option<&NodeRef>,
    backward: bool,
) -> Option<NodeRef> {
    let candidates = tabbable_within(root);
    let current = match current {
        Some(node) if !candidates.contains(node) => node,
        other => return sequential_target(&candidates, other, backward),
    };
    if candidates.is_empty() {
        return None;
    }

    let mut preceding = 0;
    for node in root.descendants() {
        if &node == current {
            break;
        }
        if candidates.get(preceding) == Some(&node) {
            preceding += 1;
        }
    }
    let index = match (backward, preceding) {
        (false, i) if i < candidates.len() => i,
        (false, _) => 0,
        (true, 0) => candidates.len() - 1,
        (true, i) => i - 1,
    };
    candidates.get(index).cloned()
}
