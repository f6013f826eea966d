//! Scripted replay of user interactions against a mounted discovery view.
//!
//! Each step is applied in order and the derived view is printed as one JSON
//! line, so a script doubles as a readable trace of the coordinator.

use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use guestapp_core::{AppConfig, ContentStore};
use guestapp_discover::{
    Breakpoint, BreakpointWatcher, DiscoveryView, DismissThresholds, DragOutcome, DragRelease,
    Event, Segment, SheetState, ViewSnapshot,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub(crate) enum ScriptStep {
    Select { id: String },
    Segment { segment: Segment },
    Dismiss,
    Drag { sheet: SheetState },
    Resize { width: u32 },
    Release { offset_y: f64, velocity_y: f64 },
}

#[derive(Debug, Serialize)]
pub(crate) struct StepReport {
    pub step: usize,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag: Option<DragOutcome>,
    pub view: ViewSnapshot,
}

/// Parse a script file; `.yaml`/`.yml` as YAML, anything else as JSON.
pub(crate) fn read_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let steps = if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("invalid script {}", path.display()))?
    } else {
        serde_json::from_str(&raw).with_context(|| format!("invalid script {}", path.display()))?
    };
    Ok(steps)
}

/// Mount a view, replay `steps`, and return one report per step. Report 0 is
/// the freshly mounted view.
pub(crate) fn replay(
    content: Rc<ContentStore>,
    breakpoint: Breakpoint,
    thresholds: DismissThresholds,
    width: Option<u32>,
    steps: &[ScriptStep],
) -> Vec<StepReport> {
    let watcher = BreakpointWatcher::new(breakpoint, width);
    let view = DiscoveryView::mount(content, &watcher, thresholds);

    let mut reports = Vec::with_capacity(steps.len() + 1);
    reports.push(StepReport {
        step: 0,
        changed: false,
        drag: None,
        view: view.snapshot(),
    });

    for (index, step) in steps.iter().enumerate() {
        let before = view.state();
        let mut drag = None;
        match step {
            ScriptStep::Select { id } => {
                view.dispatch(&Event::SelectMarker(id.clone()));
            }
            ScriptStep::Segment { segment } => {
                view.dispatch(&Event::ChangeSegment(*segment));
            }
            ScriptStep::Dismiss => {
                view.dispatch(&Event::DismissOverlay);
            }
            ScriptStep::Drag { sheet } => {
                view.dispatch(&Event::DragSheet(*sheet));
            }
            ScriptStep::Resize { width } => {
                watcher.set_width(*width);
            }
            ScriptStep::Release {
                offset_y,
                velocity_y,
            } => {
                drag = Some(view.release_overlay_drag(DragRelease {
                    offset_y: *offset_y,
                    velocity_y: *velocity_y,
                }));
            }
        }
        reports.push(StepReport {
            step: index + 1,
            changed: view.state() != before,
            drag,
            view: view.snapshot(),
        });
    }

    view.unmount();
    reports
}

/// Replay a script file and print each report as a JSON line.
///
/// # Errors
///
/// Returns an error if the script cannot be read or parsed.
pub(crate) fn run_simulate(
    config: &AppConfig,
    content: ContentStore,
    width: Option<u32>,
    script: &Path,
) -> anyhow::Result<()> {
    let steps = read_script(script)?;
    tracing::info!(steps = steps.len(), ?width, "replaying script");

    let reports = replay(
        Rc::new(content),
        Breakpoint::new(config.desktop_min_width_px),
        DismissThresholds::from_config(config),
        width,
        &steps,
    );
    for report in &reports {
        println!("{}", serde_json::to_string(report)?);
    }
    Ok(())
}

#[cfg(test)]
#[path = "simulate_test.rs"]
mod tests;
