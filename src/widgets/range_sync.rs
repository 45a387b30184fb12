//! Keeps a number input and a range slider in the same field in step.

use kuchiki::NodeRef;

use crate::config::RangeSyncConfig;
use crate::page::{dom, Behavior, EventContext, Page, PageEvent};

const DEFAULT_MIN: f64 = 0.0;
const DEFAULT_MAX: f64 = 100.0;

/// Numeric value of an input string; anything unparsable reads as zero.
pub fn to_number(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() || value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

pub(crate) fn bound(node: &NodeRef, name: &str, default: f64) -> f64 {
    dom::attr(node, name)
        .filter(|value| !value.trim().is_empty())
        .map(|value| to_number(&value))
        .unwrap_or(default)
}

pub(crate) fn format_number(value: f64) -> String {
    format!("{value}")
}

struct Pair {
    number: NodeRef,
    range: NodeRef,
}

pub struct RangeSync {
    config: RangeSyncConfig,
}

impl RangeSync {
    pub fn new(config: RangeSyncConfig) -> Self {
        Self { config }
    }

    fn pair(&self, field: &NodeRef) -> Option<Pair> {
        let number = dom::query(field, &self.config.number)
            .or_else(|| dom::query(field, "input[type=\"number\"]"))?;
        let range = dom::query(field, &self.config.range)
            .or_else(|| dom::query(field, "input[type=\"range\"]"))?;
        Some(Pair { number, range })
    }

    fn sync_from_range(&self, page: &Page, pair: &Pair) {
        let value = page.value(&pair.range);
        page.set_value(&pair.number, &value);
    }

    fn sync_from_number(&self, page: &Page, pair: &Pair, cx: &mut EventContext) {
        let min = bound(&pair.range, "min", DEFAULT_MIN);
        let max = bound(&pair.range, "max", DEFAULT_MAX);
        let value = clamp(to_number(&page.value(&pair.number)), min, max);
        let formatted = format_number(value);

        page.set_value(&pair.number, &formatted);
        page.set_value(&pair.range, &formatted);
        cx.emit(PageEvent::Input {
            target: pair.range.clone(),
        });
    }

    fn init_field(&self, page: &Page, field: &NodeRef, cx: &mut EventContext) {
        let Some(pair) = self.pair(field) else {
            return;
        };

        if !page.value(&pair.range).is_empty() {
            self.sync_from_range(page, &pair);
        } else if !page.value(&pair.number).is_empty() {
            self.sync_from_number(page, &pair, cx);
        } else {
            let min = dom::attr(&pair.range, "min")
                .filter(|min| !min.is_empty())
                .unwrap_or_else(|| String::from("0"));
            page.set_value(&pair.range, &min);
            page.set_value(&pair.number, &min);
            cx.emit(PageEvent::Input {
                target: pair.range.clone(),
            });
        }
    }
}

impl Behavior for RangeSync {
    fn name(&self) -> &'static str {
        "range-sync"
    }

    fn handle(&mut self, page: &mut Page, event: &PageEvent, cx: &mut EventContext) {
        match event {
            PageEvent::DomContentLoaded => {
                for field in page.query_all(&self.config.field) {
                    self.init_field(page, &field, cx);
                }
            }
            PageEvent::Input { target } => {
                let Some(field) = dom::closest(target, &self.config.field) else {
                    return;
                };
                let Some(pair) = self.pair(&field) else {
                    return;
                };
                if target == &pair.range {
                    self.sync_from_range(page, &pair);
                } else if target == &pair.number {
                    self.sync_from_number(page, &pair, cx);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_parse_leniently() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number(" 42 "), 42.0);
        assert_eq!(to_number("abc"), 0.0);
        assert_eq!(to_number("2.5"), 2.5);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(150.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(-3.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(f64::NAN, 5.0, 10.0), 5.0);
        assert_eq!(format_number(40.0), "40");
        assert_eq!(format_number(2.5), "2.5");
    }
}
