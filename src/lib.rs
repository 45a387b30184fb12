// Library exports for the driver binary and tests

pub mod config;
pub mod dialog;
pub mod page;
pub mod runtime;
pub mod scenario;
pub mod widgets;

// Re-export commonly used types for tests
pub use config::PageConfig;
pub use dialog::{DialogManager, DialogOptions, DialogTarget};
pub use page::{Behavior, DispatchOutcome, DragKind, FileInfo, Page, PageEvent};
pub use runtime::PageRuntime;
pub use scenario::{Scenario, ScenarioReport, ScenarioStep};
