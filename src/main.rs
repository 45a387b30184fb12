use std::path::PathBuf;

use anyhow::{Context, Result};
use pagewire::{PageConfig, PageRuntime, Scenario};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: pagewire <page.html> [scenario.yaml] [--json]";

fn main() {
    let subscriber_result = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if subscriber_result.is_err() {
        // tracing was already initialised; continue silently
    }

    if let Err(err) = run() {
        eprintln!("pagewire: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut json = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let page_path = positional.next().context(USAGE)?;
    let scenario_path = positional.next();

    let config = PageConfig::from_env().context("failed to load page config")?;
    let html = std::fs::read_to_string(&page_path)
        .with_context(|| format!("failed to read {}", page_path.display()))?;
    let scenario = match scenario_path {
        Some(path) => Scenario::load(&path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => Scenario::default(),
    };

    let mut runtime = PageRuntime::new(&html, &config);
    runtime.dom_content_loaded();
    runtime.pump();

    let report = pagewire::scenario::run(&mut runtime, &scenario);
    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{rendered}");
    } else {
        println!("{}", report.html);
    }
    Ok(())
}
