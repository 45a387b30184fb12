//! Independent page widgets. They share the delegated-listener convention with
//! the dialog manager but never interact with it.

pub mod clamp;
pub mod edit_toggle;
pub mod file_drop;
pub mod range_fill;
pub mod range_sync;

use crate::config::WidgetConfig;
use crate::page::Behavior;

pub use clamp::{ColumnMeasure, LineClamp, TextMeasure};
pub use edit_toggle::EditToggle;
pub use file_drop::{format_file_size, FileDrop};
pub use range_fill::RangeFill;
pub use range_sync::RangeSync;

/// Every enabled widget, in a fixed registration order.
pub fn install(config: &WidgetConfig) -> Vec<Box<dyn Behavior>> {
    let mut behaviors: Vec<Box<dyn Behavior>> = Vec::new();
    if config.edit_toggle.enabled {
        behaviors.push(Box::new(EditToggle::new(config.edit_toggle.clone())));
    }
    if config.clamp.enabled {
        behaviors.push(Box::new(LineClamp::new(config.clamp.clone())));
    }
    if config.file_drop.enabled {
        behaviors.push(Box::new(FileDrop::new(config.file_drop.clone())));
    }
    if config.range_sync.enabled {
        behaviors.push(Box::new(RangeSync::new(config.range_sync.clone())));
    }
    if config.range_fill.enabled {
        behaviors.push(Box::new(RangeFill::new(config.range_fill.clone())));
    }
    behaviors
}
