use pagewire::page::{dom, style};
use pagewire::{PageConfig, PageRuntime};

const PAGE: &str = r##"<!DOCTYPE html>
<html><body>
<button id="open-a" data-modal-target="#dialog-a">Open A</button>
<button id="open-empty" data-modal-target="">Nothing</button>
<button id="stray-close" data-modal-close>Stray</button>
<section id="host"><p id="before">before</p><div id="dialog-a" data-modal aria-hidden="true"><div id="panel-a" data-modal-panel><button id="a-first">First</button><button id="open-b" data-modal-target="#dialog-b">Open B</button><button id="a-close" data-modal-close><span id="a-close-label">Close</span></button></div></div><p id="after">after</p></section>
<div id="dialog-b" data-modal data-modal-backdrop-close="false" data-modal-esc="false"><div id="panel-b" data-modal-panel tabindex="0"><a id="b-link" href="#x">link</a><button id="b-close" data-modal-close>Close B</button></div></div>
<aside id="host-c"><div id="dialog-c" data-modal><button id="c-btn">c</button></div></aside>
</body></html>"##;

fn runtime() -> PageRuntime {
    let mut runtime = PageRuntime::new(PAGE, &PageConfig::default());
    runtime.dom_content_loaded();
    runtime
}

fn node(runtime: &PageRuntime, selector: &str) -> kuchiki::NodeRef {
    runtime
        .query(selector)
        .unwrap_or_else(|| panic!("missing {selector}"))
}

fn z(runtime: &PageRuntime, selector: &str) -> Option<String> {
    style::property(&node(runtime, selector), "z-index")
}

fn backdrops(runtime: &PageRuntime) -> Vec<kuchiki::NodeRef> {
    runtime.page().query_all(".modal-backdrop")
}

fn assert_lock_matches_stack(runtime: &PageRuntime) {
    assert_eq!(
        runtime.scroll_locked(),
        !runtime.dialogs().stack().is_empty(),
        "scroll lock must track stack emptiness"
    );
}

#[test]
fn trigger_click_opens_relocates_and_focuses() {
    let mut runtime = runtime();
    assert!(runtime.focus("#open-a"));

    let outcome = runtime.click("#open-a");
    assert!(outcome.default_prevented, "trigger click suppresses default");

    let dialog = node(&runtime, "#dialog-a");
    let panel = node(&runtime, "#panel-a");
    assert!(runtime.dialogs().is_open(&dialog));
    assert!(dom::has_class(&dialog, "is-open"));
    assert_eq!(dom::attr(&dialog, "aria-hidden").as_deref(), Some("false"));
    assert_eq!(dialog.parent(), runtime.page().body());
    assert!(runtime.to_html().contains("<!--modal-placeholder-->"));

    let backdrops = backdrops(&runtime);
    assert_eq!(backdrops.len(), 1);
    assert!(dom::has_class(&backdrops[0], "is-open"));
    assert_eq!(style::property(&backdrops[0], "z-index").as_deref(), Some("3001"));
    assert_eq!(z(&runtime, "#dialog-a").as_deref(), Some("3002"));

    assert!(runtime.scroll_locked());
    let root = runtime.page().root_element().unwrap();
    assert!(dom::has_class(&root, "is-scroll-locked"));

    assert_eq!(runtime.active_element(), Some(panel.clone()));
    assert_eq!(dom::attr(&panel, "tabindex").as_deref(), Some("-1"));
}

#[test]
fn open_twice_keeps_one_entry_and_one_backdrop() {
    let mut runtime = runtime();
    runtime.open("#dialog-a");
    runtime.open("#dialog-a");
    let dialog = node(&runtime, "#dialog-a");
    runtime.open(&dialog);

    assert_eq!(runtime.dialogs().stack().len(), 1);
    assert_eq!(backdrops(&runtime).len(), 1);
    assert_eq!(runtime.to_html().matches("modal-placeholder").count(), 1);
}

#[test]
fn close_restores_position_and_returns_focus_to_opener() {
    let mut runtime = runtime();
    runtime.focus("#open-a");
    runtime.click("#open-a");

    let outcome = runtime.click("#a-close-label");
    assert!(outcome.default_prevented);
    assert!(outcome.propagation_stopped);

    let dialog = node(&runtime, "#dialog-a");
    let panel = node(&runtime, "#panel-a");
    assert!(!runtime.dialogs().is_open(&dialog));
    assert!(!dom::has_class(&dialog, "is-open"));
    assert_eq!(dom::attr(&dialog, "aria-hidden").as_deref(), Some("true"));
    assert!(z(&runtime, "#dialog-a").is_none());
    assert!(backdrops(&runtime).is_empty());
    assert!(!dom::has_attr(&panel, "tabindex"));
    assert!(!runtime.scroll_locked());

    assert_eq!(dialog.parent(), Some(node(&runtime, "#host")));
    assert_eq!(dialog.previous_sibling(), Some(node(&runtime, "#before")));
    assert_eq!(dialog.next_sibling(), Some(node(&runtime, "#after")));
    assert!(!runtime.to_html().contains("modal-placeholder"));

    // Focus moves only once the deferred task runs.
    assert_ne!(runtime.active_element(), Some(node(&runtime, "#open-a")));
    assert_eq!(runtime.page().tasks().len(), 1);
    assert_eq!(runtime.pump(), 1);
    assert_eq!(runtime.active_element(), Some(node(&runtime, "#open-a")));

    // Second close is a no-op.
    runtime.close("#dialog-a");
    assert!(runtime.page().tasks().is_empty());
    assert_eq!(dialog.parent(), Some(node(&runtime, "#host")));
}

#[test]
fn nested_close_returns_focus_down_the_stack_then_to_opener() {
    let mut runtime = runtime();
    runtime.focus("#open-a");
    runtime.click("#open-a");
    runtime.click("#open-b");

    let panel_a = node(&runtime, "#panel-a");
    let panel_b = node(&runtime, "#panel-b");
    assert_eq!(runtime.dialogs().stack().len(), 2);
    assert_eq!(z(&runtime, "#dialog-a").as_deref(), Some("3002"));
    assert_eq!(z(&runtime, "#dialog-b").as_deref(), Some("3004"));
    assert_eq!(dom::attr(&panel_b, "tabindex").as_deref(), Some("-1"));
    assert_eq!(runtime.active_element(), Some(panel_b.clone()));

    runtime.click("#b-close");
    assert_eq!(dom::attr(&panel_b, "tabindex").as_deref(), Some("0"));
    assert!(runtime.scroll_locked());
    runtime.pump();
    assert_eq!(runtime.active_element(), Some(panel_a));

    runtime.click("#a-close");
    runtime.pump();
    assert_eq!(runtime.active_element(), Some(node(&runtime, "#open-a")));
    assert!(!runtime.scroll_locked());
}

#[test]
fn non_top_close_restacks_remaining_dialogs() {
    let mut runtime = runtime();
    runtime.open("#dialog-a");
    runtime.open("#dialog-b");
    runtime.open("#dialog-c");
    assert_eq!(z(&runtime, "#dialog-c").as_deref(), Some("3006"));

    runtime.close("#dialog-b");

    let open: Vec<_> = runtime.dialogs().stack().elements().cloned().collect();
    assert_eq!(
        open,
        vec![node(&runtime, "#dialog-a"), node(&runtime, "#dialog-c")],
        "relative order of the survivors is unchanged"
    );
    assert!(!dom::has_class(&node(&runtime, "#dialog-b"), "is-open"));

    assert_eq!(z(&runtime, "#dialog-a").as_deref(), Some("3002"));
    assert_eq!(z(&runtime, "#dialog-c").as_deref(), Some("3004"));

    let remaining = backdrops(&runtime);
    assert_eq!(remaining.len(), 2);
    let mut backdrop_z: Vec<String> = remaining
        .iter()
        .filter_map(|b| style::property(b, "z-index"))
        .collect();
    backdrop_z.sort();
    assert_eq!(backdrop_z, vec!["3001", "3003"]);

    assert!(runtime.scroll_locked());
    runtime.pump();
    assert_eq!(runtime.active_element(), Some(node(&runtime, "#dialog-c")));
}

#[test]
fn z_order_is_monotonic_with_backdrop_directly_below() {
    let mut runtime = runtime();
    for selector in ["#dialog-a", "#dialog-b", "#dialog-c"] {
        runtime.open(selector);
    }

    let stack: Vec<_> = runtime.dialogs().stack().elements().cloned().collect();
    let mut previous = 0u32;
    for dialog in &stack {
        let dialog_z: u32 = style::property(dialog, "z-index").unwrap().parse().unwrap();
        assert!(dialog_z > previous);
        previous = dialog_z;

        let owned = backdrops(&runtime)
            .into_iter()
            .find(|b| runtime.dialogs().stack().owner_of_backdrop(b) == Some(dialog))
            .expect("each open dialog owns a backdrop");
        let backdrop_z: u32 = style::property(&owned, "z-index").unwrap().parse().unwrap();
        assert_eq!(backdrop_z + 1, dialog_z);
    }
}

#[test]
fn scroll_lock_tracks_stack_through_interleaved_sequence() {
    let mut runtime = runtime();
    assert_lock_matches_stack(&runtime);

    runtime.open("#dialog-a");
    assert_lock_matches_stack(&runtime);
    runtime.open("#dialog-c");
    assert_lock_matches_stack(&runtime);
    runtime.close("#dialog-a");
    assert_lock_matches_stack(&runtime);
    runtime.close("#dialog-a");
    assert_lock_matches_stack(&runtime);
    runtime.open("#dialog-b");
    runtime.close_top();
    assert_lock_matches_stack(&runtime);
    runtime.close_top();
    assert_lock_matches_stack(&runtime);
    runtime.close_top();
    assert_lock_matches_stack(&runtime);
    assert!(!runtime.scroll_locked());
}

#[test]
fn reopening_after_close_starts_a_fresh_session() {
    let mut runtime = runtime();
    runtime.open("#dialog-a");
    runtime.close("#dialog-a");
    runtime.open("#dialog-a");

    assert_eq!(runtime.dialogs().stack().len(), 1);
    assert_eq!(backdrops(&runtime).len(), 1);
    assert_eq!(runtime.to_html().matches("modal-placeholder").count(), 1);
    assert_eq!(z(&runtime, "#dialog-a").as_deref(), Some("3002"));
}

#[test]
fn missing_targets_are_ignored() {
    let mut runtime = runtime();
    runtime.open("#does-not-exist");
    runtime.close("#does-not-exist");
    runtime.close_top();
    runtime.open("p[");

    assert!(runtime.dialogs().stack().is_empty());
    assert!(!runtime.scroll_locked());

    let outcome = runtime.click("#open-empty");
    assert!(!outcome.default_prevented, "empty trigger value does nothing");
    let outcome = runtime.click("#stray-close");
    assert!(!outcome.default_prevented, "close trigger outside a dialog does nothing");
    assert!(runtime.dialogs().stack().is_empty());
}

#[test]
fn unfocused_page_schedules_no_focus_return() {
    let mut runtime = runtime();
    runtime.open("#dialog-c");
    runtime.close("#dialog-c");
    assert!(runtime.page().tasks().is_empty());
}

#[test]
fn panel_falls_back_to_dialog_root() {
    let mut runtime = runtime();
    runtime.open("#dialog-c");
    let dialog = node(&runtime, "#dialog-c");
    assert_eq!(runtime.active_element(), Some(dialog.clone()));
    assert_eq!(dom::attr(&dialog, "tabindex").as_deref(), Some("-1"));
    runtime.close("#dialog-c");
    assert!(!dom::has_attr(&dialog, "tabindex"));
    assert_eq!(dialog.parent(), Some(node(&runtime, "#host-c")));
}

#[test]
fn focus_without_scroll_preservation_still_lands_in_panel() {
    let config = PageConfig {
        prevent_scroll_supported: false,
        ..PageConfig::default()
    };
    let mut runtime = PageRuntime::new(PAGE, &config);
    runtime.open("#dialog-a");
    assert_eq!(runtime.active_element(), Some(node(&runtime, "#panel-a")));
}

#[test]
fn clicking_a_trigger_makes_it_the_focus_return_target() {
    let mut runtime = runtime();
    runtime.click("#open-a");
    assert_eq!(runtime.active_element(), Some(node(&runtime, "#panel-a")));

    runtime.click("#a-close-label");
    assert_eq!(
        runtime.active_element(),
        Some(node(&runtime, "#a-close")),
        "pressing the close button focuses it"
    );
    assert_eq!(runtime.pump(), 1);
    assert_eq!(runtime.active_element(), Some(node(&runtime, "#open-a")));
}

#[test]
fn body_and_document_root_targets_leave_the_tree_intact() {
    let mut runtime = runtime();
    let body = runtime.page().body().unwrap();
    let root = runtime.page().root_element().unwrap();

    runtime.open("body");
    assert!(runtime.dialogs().is_open(&body));
    assert_eq!(body.parent(), Some(root.clone()));
    assert!(!runtime.to_html().contains("modal-placeholder"));
    runtime.close("body");
    assert!(runtime.dialogs().stack().is_empty());

    runtime.open("html");
    assert_eq!(root.parent(), Some(runtime.page().document().clone()));
    runtime.close("html");

    assert!(runtime.dialogs().stack().is_empty());
    assert!(!runtime.scroll_locked());
    assert!(backdrops(&runtime).is_empty());
    let html = runtime.to_html();
    assert!(html.contains("dialog-a"));
    assert!(!html.contains("modal-placeholder"));
}

#[test]
fn oversized_z_base_saturates() {
    let config = PageConfig::from_yaml_str("dialog:\n  base_z: 4294967295\n").unwrap();
    let mut runtime = PageRuntime::new(PAGE, &config);
    runtime.open("#dialog-a");
    runtime.open("#dialog-c");

    assert_eq!(z(&runtime, "#dialog-a").as_deref(), Some("4294967295"));
    assert_eq!(z(&runtime, "#dialog-c").as_deref(), Some("4294967295"));
    let backdrop_z: Vec<_> = backdrops(&runtime)
        .iter()
        .filter_map(|b| style::property(b, "z-index"))
        .collect();
    assert_eq!(backdrop_z, vec!["4294967294", "4294967294"]);
}
