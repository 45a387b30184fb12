//! Moves dialog markup to `<body>` while open so ancestor styling cannot clip
//! or out-stack it, and puts it back exactly where it was on close.

use kuchiki::NodeRef;
use tracing::debug;

use crate::page::{dom, Page};

/// Where a relocated dialog came from.
#[derive(Debug)]
pub(crate) struct Relocation {
    pub placeholder: NodeRef,
    pub parent: NodeRef,
}

/// Moves `element` under `<body>`, leaving a comment placeholder behind.
/// No-op when already relocated, already a direct child of `<body>`,
/// detached from any parent, or an ancestor of `<body>` itself.
pub(crate) fn relocate(
    page: &Page,
    element: &NodeRef,
    record: &mut Option<Relocation>,
    placeholder_text: &str,
) {
    if record.is_some() {
        return;
    }
    let Some(body) = page.body() else {
        debug!(target = "portal", "document has no body; leaving dialog in place");
        return;
    };
    let Some(parent) = element.parent() else {
        return;
    };
    if parent == body {
        return;
    }
    if dom::contains(element, &body) {
        debug!(
            target = "portal",
            dialog = %dom::describe(element),
            "dialog encloses body; leaving it in place"
        );
        return;
    }

    let placeholder = NodeRef::new_comment(placeholder_text);
    element.insert_before(placeholder.clone());
    body.append(element.clone());
    debug!(
        target = "portal",
        dialog = %dom::describe(element),
        from = %dom::describe(&parent),
        "relocated dialog to body"
    );
    *record = Some(Relocation { placeholder, parent });
}

/// Reverses [`relocate`]. No-op without a record.
pub(crate) fn restore(element: &NodeRef, record: &mut Option<Relocation>) {
    let Some(Relocation { placeholder, parent }) = record.take() else {
        return;
    };
    if placeholder.parent().as_ref() == Some(&parent) {
        placeholder.insert_before(element.clone());
    } else {
        // Placeholder was moved or removed by other page code; fall back to the parent.
        parent.append(element.clone());
    }
    placeholder.detach();
    debug!(target = "portal", dialog = %dom::describe(element), "restored dialog");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relocate_and_restore_preserve_sibling_position() {
        let page = Page::parse(
            r#"<body><section id="host"><p id="before"></p><div id="d" data-modal></div><p id="after"></p></section></body>"#,
        );
        let dialog = page.query("#d").unwrap();
        let host = page.query("#host").unwrap();
        let body = page.body().unwrap();
        let mut record = None;

        relocate(&page, &dialog, &mut record, "modal-placeholder");
        assert_eq!(dialog.parent(), Some(body.clone()));
        assert!(page.to_html().contains("<!--modal-placeholder-->"));

        relocate(&page, &dialog, &mut record, "modal-placeholder");
        assert_eq!(page.to_html().matches("modal-placeholder").count(), 1);

        restore(&dialog, &mut record);
        assert!(record.is_none());
        assert_eq!(dialog.parent(), Some(host));
        let before = page.query("#before").unwrap();
        assert_eq!(dialog.previous_sibling(), Some(before));
        assert!(!page.to_html().contains("modal-placeholder"));

        restore(&dialog, &mut record);
        assert!(dialog.parent().is_some());
    }

    #[test]
    fn body_and_its_ancestors_are_never_moved() {
        let page = Page::parse(r#"<html><body><div id="d" data-modal></div></body></html>"#);
        let body = page.body().unwrap();
        let root = page.root_element().unwrap();

        for element in [body.clone(), root.clone()] {
            let mut record = None;
            relocate(&page, &element, &mut record, "modal-placeholder");
            assert!(record.is_none());
        }
        assert_eq!(body.parent(), Some(root));
        assert!(!page.to_html().contains("modal-placeholder"));
    }

    #[test]
    fn body_children_stay_put() {
        let page = Page::parse(r#"<body><div id="d" data-modal></div><p></p></body>"#);
        let dialog = page.query("#d").unwrap();
        let mut record = None;
        relocate(&page, &dialog, &mut record, "modal-placeholder");
        assert!(record.is_none());
        assert!(!page.to_html().contains("modal-placeholder"));
    }
}
