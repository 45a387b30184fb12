//! Page-wide scroll suppression. Lock state follows stack emptiness rather
//! than a counter, so unbalanced acquire/release calls cannot strand it.

use crate::page::{dom, Page};

pub(crate) fn acquire(page: &Page, lock_class: &str) {
    for node in page.root_element().into_iter().chain(page.body()) {
        dom::add_class(&node, lock_class);
    }
}

pub(crate) fn release(page: &Page, lock_class: &str, stack_empty: bool) {
    if !stack_empty {
        return;
    }
    for node in page.root_element().into_iter().chain(page.body()) {
        dom::remove_class(&node, lock_class);
    }
}

pub fn is_locked(page: &Page, lock_class: &str) -> bool {
    page.body()
        .map(|body| dom::has_class(&body, lock_class))
        .unwrap_or(false)
}
