use kuchiki::NodeRef;
use tracing::debug;

use crate::config::DialogConfig;
use crate::page::{dom, Page};

/// Builds an open overlay and appends it to `<body>`. The owner link lives in
/// the dialog's session; [`super::stack::DialogStack::owner_of_backdrop`]
/// answers the reverse lookup.
pub(crate) fn create(page: &Page, config: &DialogConfig) -> Option<NodeRef> {
    let body = page.body()?;
    let backdrop = dom::new_element("div");
    dom::add_class(&backdrop, &config.backdrop_class);
    dom::add_class(&backdrop, &config.open_class);
    body.append(backdrop.clone());
    Some(backdrop)
}

pub(crate) fn remove(slot: &mut Option<NodeRef>) {
    if let Some(backdrop) = slot.take() {
        backdrop.detach();
        debug!(target = "dialog", "backdrop removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_appends_open_overlay() {
        let page = Page::parse("<body><main></main></body>");
        let config = DialogConfig::default();
        let backdrop = create(&page, &config).expect("backdrop");
        assert_eq!(backdrop.parent(), page.body());
        assert!(dom::has_class(&backdrop, "modal-backdrop"));
        assert!(dom::has_class(&backdrop, "is-open"));

        let mut slot = Some(backdrop);
        remove(&mut slot);
        remove(&mut slot);
        assert!(page.query(".modal-backdrop").is_none());
    }
}
