//! Focus capture on open, Tab containment while on top, and focus routing
//! after close.

use std::rc::Rc;

use kuchiki::NodeRef;
use tracing::debug;

use super::stack::Session;
use crate::page::focus::{is_focusable, tabbable_within};
use crate::page::{dom, DeferredTask, EventContext, FocusReason, KeyEvent, Page};

pub(crate) fn capture_and_move_focus(page: &mut Page, panel: &NodeRef, session: &mut Session) {
    session.opener = page
        .active_element()
        .filter(is_focusable)
        .map(|node| Rc::downgrade(&node.0));

    session.saved_tabindex = dom::attr(panel, "tabindex");
    dom::set_attr(panel, "tabindex", "-1");
    page.focus_quietly(panel);
}

/// Keeps Tab navigation inside `panel`. Leaves the default action alone
/// unless focus would leave the panel.
pub(crate) fn trap(page: &mut Page, panel: &NodeRef, key: &KeyEvent, cx: &mut EventContext) {
    let focusables = tabbable_within(panel);
    let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
        return;
    };
    let active = page.active_element();

    let outside = active
        .as_ref()
        .map(|node| !dom::contains(panel, node))
        .unwrap_or(true);
    let target = if outside {
        Some(first)
    } else if key.shift && active.as_ref() == Some(first) {
        Some(last)
    } else if !key.shift && active.as_ref() == Some(last) {
        Some(first)
    } else {
        None
    };

    if let Some(target) = target {
        cx.prevent_default();
        let target = target.clone();
        page.focus_quietly(&target);
    }
}

/// Undoes the panel's `tabindex` override and schedules where focus goes next:
/// the new top panel if a dialog remains, otherwise the opener if it can
/// still take focus.
pub(crate) fn restore_and_return_focus(
    page: &mut Page,
    panel: &NodeRef,
    session: &mut Session,
    next_top_panel: Option<&NodeRef>,
) {
    match session.saved_tabindex.take() {
        Some(value) => dom::set_attr(panel, "tabindex", &value),
        None => dom::remove_attr(panel, "tabindex"),
    }

    let opener = session.opener.take().and_then(|weak| weak.upgrade()).map(NodeRef);

    if let Some(next) = next_top_panel {
        page.schedule(DeferredTask::Focus {
            node: next.clone(),
            reason: FocusReason::NextDialog,
        });
        return;
    }

    match opener {
        Some(opener) if is_focusable(&opener) => {
            page.schedule(DeferredTask::Focus {
                node: opener,
                reason: FocusReason::Opener,
            });
        }
        Some(opener) => {
            debug!(target = "focus", opener = %dom::describe(&opener), "opener no longer focusable");
        }
        None => {}
    }
}
