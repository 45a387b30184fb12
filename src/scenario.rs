//! Scripted interaction runs for the command-line driver.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::page::{dom, DragKind, FileInfo};
use crate::runtime::PageRuntime;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Click {
        selector: String,
    },
    Key {
        key: String,
        #[serde(default)]
        shift: bool,
    },
    Focus {
        selector: String,
    },
    Input {
        selector: String,
        value: String,
    },
    Change {
        selector: String,
        #[serde(default)]
        files: Vec<FileInfo>,
    },
    Drag {
        kind: DragKind,
        selector: String,
        #[serde(default)]
        files: Vec<FileInfo>,
    },
    Open {
        target: String,
    },
    Close {
        target: String,
    },
    CloseTop,
    Pump,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ScenarioError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub steps_run: usize,
    pub open_dialogs: Vec<String>,
    pub scroll_locked: bool,
    pub active_element: Option<String>,
    pub html: String,
}

impl ScenarioReport {
    pub fn capture(runtime: &PageRuntime, steps_run: usize) -> Self {
        Self {
            steps_run,
            open_dialogs: runtime
                .dialogs()
                .stack()
                .elements()
                .map(dom::describe)
                .collect(),
            scroll_locked: runtime.scroll_locked(),
            active_element: runtime.active_description(),
            html: runtime.to_html(),
        }
    }
}

fn run_step(runtime: &mut PageRuntime, step: &ScenarioStep) {
    match step {
        ScenarioStep::Click { selector } => {
            runtime.click(selector);
        }
        ScenarioStep::Key { key, shift } => {
            runtime.key_down(key, *shift);
        }
        ScenarioStep::Focus { selector } => {
            runtime.focus(selector);
        }
        ScenarioStep::Input { selector, value } => {
            runtime.input(selector, value);
        }
        ScenarioStep::Change { selector, files } => {
            runtime.change(selector, files.clone());
        }
        ScenarioStep::Drag {
            kind,
            selector,
            files,
        } => {
            runtime.drag(*kind, selector, files.clone());
        }
        ScenarioStep::Open { target } => runtime.open(target.as_str()),
        ScenarioStep::Close { target } => runtime.close(target.as_str()),
        ScenarioStep::CloseTop => runtime.close_top(),
        ScenarioStep::Pump => {}
    }
}

/// Runs every step, flushing deferred work after each one, and reports the
/// final page state.
pub fn run(runtime: &mut PageRuntime, scenario: &Scenario) -> ScenarioReport {
    for (index, step) in scenario.steps.iter().enumerate() {
        run_step(runtime, step);
        let deferred = runtime.pump();
        info!(target = "scenario", step = index + 1, ?step, deferred, "step complete");
    }
    ScenarioReport::capture(runtime, scenario.steps.len())
}
