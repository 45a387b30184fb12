use kuchiki::NodeRef;

use super::range_sync::{bound, format_number};
use crate::config::RangeFillConfig;
use crate::page::{dom, style, Behavior, EventContext, Page, PageEvent};

/// Filled share of the track, 0-100. Equal bounds count as empty.
pub fn fill_percent(min: f64, max: f64, value: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    let pct = (value - min) * 100.0 / (max - min);
    pct.clamp(0.0, 100.0)
}

/// Paints the track fill of range inputs through a CSS custom property.
pub struct RangeFill {
    config: RangeFillConfig,
}

impl RangeFill {
    pub fn new(config: RangeFillConfig) -> Self {
        Self { config }
    }

    fn apply(&self, range: &NodeRef) {
        let pct = fill_percent(
            bound(range, "min", 0.0),
            bound(range, "max", 100.0),
            bound(range, "value", 0.0),
        );
        style::set_property(range, &self.config.property, &format!("{}%", format_number(pct)));
    }
}

impl Behavior for RangeFill {
    fn name(&self) -> &'static str {
        "range-fill"
    }

    fn handle(&mut self, page: &mut Page, event: &PageEvent, _cx: &mut EventContext) {
        match event {
            PageEvent::DomContentLoaded => {
                for range in page.query_all(&self.config.range) {
                    self.apply(&range);
                }
            }
            PageEvent::Input { target } if dom::matches_str(target, &self.config.range) => {
                self.apply(target);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        assert_eq!(fill_percent(0.0, 100.0, 25.0), 25.0);
        assert_eq!(fill_percent(10.0, 20.0, 30.0), 100.0);
        assert_eq!(fill_percent(10.0, 20.0, 0.0), 0.0);
        assert_eq!(fill_percent(5.0, 5.0, 5.0), 0.0);
    }
}
