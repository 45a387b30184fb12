//! Line-clamped answers with a show-all / collapse button.
//!
//! Overflow is decided once at load. Only items whose text exceeds
//! `max_lines` get a visible button; the rest stay clamped-by-CSS and inert.

use kuchiki::NodeRef;
use tracing::debug;

use crate::config::ClampConfig;
use crate::page::{dom, Behavior, EventContext, Page, PageEvent};

/// Rendered line count of a text block. Real layout is out of reach here, so
/// callers can plug in whatever measurement they have.
pub trait TextMeasure {
    fn line_count(&self, text: &NodeRef) -> usize;
}

/// Wraps each source line at a fixed character width.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMeasure {
    pub columns: usize,
}

impl TextMeasure for ColumnMeasure {
    fn line_count(&self, text: &NodeRef) -> usize {
        let columns = self.columns.max(1);
        let contents = text.text_contents();
        contents
            .trim()
            .lines()
            .map(|line| {
                let chars = line.trim().chars().count();
                chars.div_ceil(columns).max(1)
            })
            .sum()
    }
}

struct ArmedItem {
    item: NodeRef,
    button: NodeRef,
}

pub struct LineClamp {
    config: ClampConfig,
    measure: Box<dyn TextMeasure>,
    armed: Vec<ArmedItem>,
}

impl LineClamp {
    pub fn new(config: ClampConfig) -> Self {
        let measure = ColumnMeasure {
            columns: config.columns,
        };
        Self::with_measure(config, Box::new(measure))
    }

    pub fn with_measure(config: ClampConfig, measure: Box<dyn TextMeasure>) -> Self {
        Self {
            config,
            measure,
            armed: Vec::new(),
        }
    }

    fn init(&mut self, page: &Page) {
        for item in page.query_all(&self.config.item) {
            let (Some(text), Some(button)) = (
                dom::query(&item, &self.config.text),
                dom::query(&item, &self.config.button),
            ) else {
                continue;
            };
            if self.armed.iter().any(|armed| armed.item == item) {
                continue;
            }

            let lines = self.measure.line_count(&text);
            if lines <= self.config.max_lines {
                continue;
            }

            dom::remove_attr(&button, "hidden");
            debug!(target = "widgets", item = %dom::describe(&item), lines, "clamp armed");
            self.armed.push(ArmedItem { item, button });
        }
    }

    fn toggle(&self, armed: &ArmedItem) {
        let expanded = dom::toggle_class(&armed.item, &self.config.expanded_class, None);
        let label = if expanded {
            &self.config.collapse_label
        } else {
            &self.config.expand_label
        };
        dom::set_text(&armed.button, label);
        dom::set_attr(
            &armed.button,
            "aria-expanded",
            if expanded { "true" } else { "false" },
        );
    }
}

impl Behavior for LineClamp {
    fn name(&self) -> &'static str {
        "line-clamp"
    }

    fn handle(&mut self, page: &mut Page, event: &PageEvent, _cx: &mut EventContext) {
        match event {
            PageEvent::DomContentLoaded => self.init(page),
            PageEvent::Click { target } => {
                if let Some(armed) = self
                    .armed
                    .iter()
                    .find(|armed| dom::contains(&armed.button, target))
                {
                    self.toggle(armed);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchiki::traits::*;

    #[test]
    fn column_measure_wraps_long_lines() {
        let doc = kuchiki::parse_html().one("<p id=\"t\">abcdefghij\nxy\n</p>");
        let text = dom::query(&doc, "#t").unwrap();
        assert_eq!(ColumnMeasure { columns: 4 }.line_count(&text), 4);
        assert_eq!(ColumnMeasure { columns: 80 }.line_count(&text), 2);
    }
}
