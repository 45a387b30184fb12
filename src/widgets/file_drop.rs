//! File input decorator: shows the chosen file's name and size, supports
//! drag and drop onto the wrapper, and resets on remove.

use kuchiki::NodeRef;
use tracing::debug;

use crate::config::FileDropConfig;
use crate::page::{dom, Behavior, DragKind, EventContext, FileInfo, Page, PageEvent};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size in base 1024 with at most two decimals, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return String::from("0 Bytes");
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

struct Wired {
    wrapper: NodeRef,
    input: NodeRef,
}

pub struct FileDrop {
    config: FileDropConfig,
    wired: Vec<Wired>,
}

impl FileDrop {
    pub fn new(config: FileDropConfig) -> Self {
        Self {
            config,
            wired: Vec::new(),
        }
    }

    fn wire_drag_targets(&mut self, page: &Page) {
        for wrapper in page.query_all(&self.config.wrapper) {
            let Some(input) = dom::query(&wrapper, &self.config.input) else {
                continue;
            };
            if !self.wired.iter().any(|wired| wired.wrapper == wrapper) {
                self.wired.push(Wired { wrapper, input });
            }
        }
        debug!(target = "widgets", wrappers = self.wired.len(), "file drop wired");
    }

    fn show_file(&self, wrapper: &NodeRef, file: &FileInfo) {
        if let Some(name) = dom::query(wrapper, &self.config.name) {
            dom::set_text(&name, &file.name);
        }
        if let Some(size) = dom::query(wrapper, &self.config.size) {
            dom::set_text(&size, &format_file_size(file.size));
        }
        dom::add_class(wrapper, &self.config.filled_class);
        dom::remove_class(wrapper, &self.config.drag_over_class);
    }

    fn reset(&self, page: &mut Page, wrapper: &NodeRef) {
        if let Some(input) = dom::query(wrapper, &self.config.input) {
            page.set_files(&input, Vec::new());
            page.set_value(&input, "");
        }
        for selector in [&self.config.name, &self.config.size] {
            if let Some(node) = dom::query(wrapper, selector) {
                dom::set_text(&node, "");
            }
        }
        dom::remove_class(wrapper, &self.config.filled_class);
        dom::remove_class(wrapper, &self.config.error_class);
    }

    fn on_change(&self, page: &Page, target: &NodeRef) {
        if !dom::matches_str(target, &self.config.input) {
            return;
        }
        let Some(wrapper) = dom::closest(target, &self.config.wrapper) else {
            return;
        };
        // Only the first file is shown; a cancelled picker leaves the UI as is.
        if let Some(file) = page.files(target).first() {
            self.show_file(&wrapper, file);
        }
    }

    fn on_drag(
        &self,
        page: &mut Page,
        kind: DragKind,
        target: &NodeRef,
        files: &[FileInfo],
        cx: &mut EventContext,
    ) {
        let Some(wired) = self
            .wired
            .iter()
            .find(|wired| dom::contains(&wired.wrapper, target))
        else {
            return;
        };
        cx.prevent_default();
        cx.stop_propagation();

        let wrapper = &wired.wrapper;
        match kind {
            DragKind::Enter | DragKind::Over => {
                if !dom::has_class(wrapper, &self.config.filled_class) {
                    dom::add_class(wrapper, &self.config.drag_over_class);
                }
            }
            DragKind::Leave => dom::remove_class(wrapper, &self.config.drag_over_class),
            DragKind::Drop => {
                dom::remove_class(wrapper, &self.config.drag_over_class);
                if !files.is_empty() {
                    page.set_files(&wired.input, files.to_vec());
                    cx.emit(PageEvent::Change {
                        target: wired.input.clone(),
                    });
                }
            }
        }
    }
}

impl Behavior for FileDrop {
    fn name(&self) -> &'static str {
        "file-drop"
    }

    fn handle(&mut self, page: &mut Page, event: &PageEvent, cx: &mut EventContext) {
        match event {
            PageEvent::DomContentLoaded => self.wire_drag_targets(page),
            PageEvent::Change { target } => self.on_change(page, target),
            PageEvent::Click { target } => {
                let Some(button) = dom::closest(target, &self.config.remove) else {
                    return;
                };
                if let Some(wrapper) = dom::closest(&button, &self.config.wrapper) {
                    self.reset(page, &wrapper);
                }
            }
            PageEvent::Drag {
                kind,
                target,
                files,
            } => self.on_drag(page, *kind, target, files, cx),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes_like_the_upload_ui() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}
