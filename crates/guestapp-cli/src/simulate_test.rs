use guestapp_core::{Category, Coordinates, Location};
use guestapp_discover::ViewportMode;

use super::*;

fn location(id: &str, category: Category) -> Location {
    Location {
        id: id.to_string(),
        name: format!("Place {id}"),
        category,
        description: String::new(),
        address: String::new(),
        coordinates: Coordinates {
            latitude: 40.62,
            longitude: 14.48,
        },
    }
}

fn content() -> Rc<ContentStore> {
    let loaded = ContentStore::from_parts(
        vec![
            location("beach-1", Category::Beach),
            location("food-1", Category::Restaurant),
            location("food-2", Category::Restaurant),
            location("club-1", Category::Nightlife),
        ],
        Vec::new(),
    );
    assert!(loaded.issues.is_empty());
    Rc::new(loaded.store)
}

fn run(width: Option<u32>, steps: &[ScriptStep]) -> Vec<StepReport> {
    replay(
        content(),
        Breakpoint::default(),
        DismissThresholds::default(),
        width,
        steps,
    )
}

#[test]
fn parses_json_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.json");
    std::fs::write(
        &path,
        r#"[
            {"step": "select", "id": "food-1"},
            {"step": "segment", "segment": "beach"},
            {"step": "dismiss"},
            {"step": "drag", "sheet": "expanded"},
            {"step": "resize", "width": 1024},
            {"step": "release", "offset_y": 80.0, "velocity_y": 0.0}
        ]"#,
    )
    .unwrap();

    let steps = read_script(&path).unwrap();
    assert_eq!(
        steps,
        vec![
            ScriptStep::Select {
                id: "food-1".to_string()
            },
            ScriptStep::Segment {
                segment: Segment::Only(Category::Beach)
            },
            ScriptStep::Dismiss,
            ScriptStep::Drag {
                sheet: SheetState::Expanded
            },
            ScriptStep::Resize { width: 1024 },
            ScriptStep::Release {
                offset_y: 80.0,
                velocity_y: 0.0
            },
        ]
    );
}

#[test]
fn parses_yaml_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.yaml");
    std::fs::write(
        &path,
        "- step: segment\n  segment: all\n- step: select\n  id: club-1\n",
    )
    .unwrap();

    let steps = read_script(&path).unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(
        steps[0],
        ScriptStep::Segment {
            segment: Segment::All
        }
    );
}

#[test]
fn rejects_unknown_segment_in_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.json");
    std::fs::write(&path, r#"[{"step": "segment", "segment": "spa"}]"#).unwrap();
    assert!(read_script(&path).is_err());
}

#[test]
fn first_report_is_mounted_view() {
    let reports = run(None, &[]);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].step, 0);
    assert_eq!(reports[0].view.state.viewport_mode, ViewportMode::Mobile);
    assert_eq!(reports[0].view.map_markers.len(), 4);
}

#[test]
fn select_then_resize_closes_overlay() {
    let reports = run(
        Some(390),
        &[
            ScriptStep::Select {
                id: "food-2".to_string(),
            },
            ScriptStep::Resize { width: 1200 },
        ],
    );
    assert!(reports[1].changed);
    assert_eq!(reports[1].view.overlay.as_deref(), Some("food-2"));
    assert_eq!(reports[1].view.map_markers, ["food-2"]);

    assert!(reports[2].changed);
    assert_eq!(reports[2].view.overlay, None);
    assert_eq!(reports[2].view.state.viewport_mode, ViewportMode::Desktop);
}

#[test]
fn unknown_marker_is_reported_unchanged() {
    let reports = run(
        Some(390),
        &[ScriptStep::Select {
            id: "missing".to_string(),
        }],
    );
    assert!(!reports[1].changed);
    assert_eq!(reports[1].view, reports[0].view);
}

#[test]
fn release_reports_drag_outcome() {
    let reports = run(
        Some(390),
        &[
            ScriptStep::Select {
                id: "beach-1".to_string(),
            },
            ScriptStep::Release {
                offset_y: 10.0,
                velocity_y: 50.0,
            },
            ScriptStep::Release {
                offset_y: 10.0,
                velocity_y: 900.0,
            },
        ],
    );
    assert_eq!(reports[2].drag, Some(DragOutcome::SpringBack));
    assert!(!reports[2].changed);
    assert_eq!(reports[3].drag, Some(DragOutcome::Dismiss));
    assert!(reports[3].changed);
    assert_eq!(reports[3].view.state.sheet_state, SheetState::Expanded);
    assert_eq!(reports[0].drag, None);
}

#[test]
fn segment_step_filters_markers() {
    let reports = run(
        Some(390),
        &[ScriptStep::Segment {
            segment: Segment::Only(Category::Restaurant),
        }],
    );
    assert_eq!(reports[1].view.filtered, ["food-1", "food-2"]);
    assert_eq!(reports[1].view.map_markers, ["food-1", "food-2"]);
}

#[test]
fn report_serializes_as_json_line() {
    let reports = run(Some(390), &[ScriptStep::Dismiss]);
    let line = serde_json::to_string(&reports[1]).unwrap();
    assert!(!line.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["step"], 1);
    assert_eq!(value["changed"], false);
    assert!(value.get("drag").is_none());
    assert_eq!(value["view"]["state"]["viewportMode"], "mobile");
}
