//! End-to-end behavior of a mounted discovery view driven by a width-fed
//! viewport watcher.

use std::rc::Rc;

use guestapp_core::{Category, ContentStore};
use guestapp_discover::{
    Breakpoint, BreakpointWatcher, DiscoveryView, DismissThresholds, DragOutcome, DragRelease,
    Event, MapsProvider, Segment, SheetState, ViewportMode,
};
use serde_json::json;

fn content() -> Rc<ContentStore> {
    let locations = vec![
        json!({ "id": "loc-1", "name": "Spiaggia Grande", "category": "beach",
                "description": "Main beach", "address": "Positano",
                "latitude": 40.6277, "longitude": 14.4853 }),
        json!({ "id": "loc-2", "name": "Da Vincenzo", "category": "restaurant",
                "description": "Trattoria", "address": "Via Pasitea 172",
                "latitude": 40.6291, "longitude": 14.4832 }),
        json!({ "id": "loc-3", "name": "Music on the Rocks", "category": "nightlife",
                "description": "Club in a cave", "address": "Via Grotte dell'Incanto",
                "latitude": 40.6272, "longitude": 14.4868 }),
        json!({ "id": "loc-4", "name": "Path of the Gods", "category": "activity",
                "description": "Cliffside hike", "address": "Bomerano",
                "latitude": 40.6336, "longitude": 14.5246 }),
        json!({ "id": "loc-5", "name": "Aquarium Bar", "category": "aquarium",
                "description": "Should be rejected", "address": "Nowhere",
                "latitude": 40.0, "longitude": 14.0 }),
    ];
    let details = json!({
        "loc-2": {
            "rating": 4.7, "reviewCount": 2310, "priceRange": "€€€",
            "cuisine": "Seafood", "distance": "8 min walk",
            "hours": { "open": "12:00", "close": "23:00" }
        }
    });
    let serde_json::Value::Object(details) = details else {
        unreachable!()
    };
    let loaded = ContentStore::from_values(locations, details);
    assert_eq!(loaded.issues.len(), 1, "aquarium record should be rejected");
    Rc::new(loaded.store)
}

fn mount(width: Option<u32>) -> (BreakpointWatcher, DiscoveryView) {
    let watcher = BreakpointWatcher::new(Breakpoint::default(), width);
    let view = DiscoveryView::mount(content(), &watcher, DismissThresholds::default());
    (watcher, view)
}

fn select(id: &str) -> Event {
    Event::SelectMarker(id.to_string())
}

#[test]
fn mount_reads_mode_synchronously() {
    let (_watcher, view) = mount(Some(1440));
    let state = view.state();
    assert_eq!(state.viewport_mode, ViewportMode::Desktop);
    assert_eq!(state.sheet_state, SheetState::Expanded);
}

#[test]
fn mount_without_width_defaults_to_mobile() {
    let (_watcher, view) = mount(None);
    assert_eq!(view.state().viewport_mode, ViewportMode::Mobile);
    assert_eq!(view.state().sheet_state, SheetState::Collapsed);
}

#[test]
fn rejected_category_never_reaches_the_view() {
    let (_watcher, view) = mount(Some(375));
    let snapshot = view.snapshot();
    assert_eq!(snapshot.filtered, ["loc-1", "loc-2", "loc-3", "loc-4"]);
    assert!(!view.dispatch(&select("loc-5")));
    view.with_coordinator(|c| {
        let sheet = c.list_sheet_props();
        assert_eq!(sheet.groups.total(), 4);
        assert_eq!(sheet.all_markers.len(), 4);
    });
}

#[test]
fn resize_across_breakpoint_closes_overlay() {
    let (watcher, view) = mount(Some(375));
    view.dispatch(&select("loc-2"));
    assert_eq!(view.snapshot().overlay.as_deref(), Some("loc-2"));
    assert_eq!(view.snapshot().map_markers, ["loc-2"]);

    watcher.set_width(1024);
    let snapshot = view.snapshot();
    assert_eq!(snapshot.state.viewport_mode, ViewportMode::Desktop);
    assert!(!snapshot.state.overlay_visible);
    assert_eq!(snapshot.state.sheet_state, SheetState::Expanded);
    assert_eq!(snapshot.overlay, None);
    assert_eq!(snapshot.map_markers.len(), 4);
    assert_eq!(snapshot.state.active_marker_id.as_deref(), Some("loc-2"));
}

#[test]
fn resize_within_same_mode_changes_nothing() {
    let (watcher, view) = mount(Some(375));
    view.dispatch(&select("loc-1"));
    let before = view.snapshot();
    watcher.set_width(700);
    assert_eq!(view.snapshot(), before);
}

#[test]
fn unmount_releases_viewport_subscription() {
    let (watcher, view) = mount(Some(375));
    assert_eq!(watcher.subscriber_count(), 1);
    assert!(view.is_subscribed());
    view.unmount();
    assert_eq!(watcher.subscriber_count(), 0);
    assert!(watcher.set_width(1200));
}

#[test]
fn dropping_view_releases_viewport_subscription() {
    let (watcher, view) = mount(Some(375));
    drop(view);
    assert_eq!(watcher.subscriber_count(), 0);
}

#[test]
fn overlay_props_carry_detail_and_directions() {
    let (_watcher, view) = mount(Some(390));
    view.dispatch(&select("loc-2"));
    view.with_coordinator(|c| {
        let overlay = c.overlay_props();
        assert!(overlay.is_open);
        assert_eq!(overlay.marker.map(|m| m.id.as_str()), Some("loc-2"));
        assert_eq!(overlay.detail.map(|d| d.review_count), Some(2310));
        assert_eq!(
            overlay.directions_url(MapsProvider::Google).as_deref(),
            Some("https://www.google.com/maps/dir/?api=1&destination=40.6291,14.4832")
        );

        let map = c.map_props();
        assert!(map.focus_single_marker);
        assert_eq!(map.selected_id, Some("loc-2"));
        assert_eq!(map.markers.len(), 1);
    });
}

#[test]
fn overlay_props_without_detail_still_mount() {
    let (_watcher, view) = mount(Some(390));
    view.dispatch(&select("loc-4"));
    view.with_coordinator(|c| {
        let overlay = c.overlay_props();
        assert!(overlay.is_open);
        assert!(overlay.detail.is_none());
    });
}

#[test]
fn desktop_has_no_overlay_marker() {
    let (_watcher, view) = mount(Some(1280));
    view.dispatch(&select("loc-3"));
    view.with_coordinator(|c| {
        let overlay = c.overlay_props();
        assert!(overlay.marker.is_none());
        assert!(!overlay.is_open);
        assert!(c.list_sheet_props().is_desktop_layout);
        assert_eq!(
            c.list_sheet_props().active_marker.map(|m| m.id.as_str()),
            Some("loc-3")
        );
    });
}

#[test]
fn short_drag_springs_back_without_state_change() {
    let (_watcher, view) = mount(Some(390));
    view.dispatch(&select("loc-1"));
    let before = view.state();
    let outcome = view.release_overlay_drag(DragRelease {
        offset_y: 20.0,
        velocity_y: 120.0,
    });
    assert_eq!(outcome, DragOutcome::SpringBack);
    assert_eq!(view.state(), before);
}

#[test]
fn long_drag_dismisses_and_expands_sheet() {
    let (_watcher, view) = mount(Some(390));
    view.dispatch(&select("loc-1"));
    let outcome = view.release_overlay_drag(DragRelease {
        offset_y: 140.0,
        velocity_y: 0.0,
    });
    assert_eq!(outcome, DragOutcome::Dismiss);
    let state = view.state();
    assert_eq!(state.active_marker_id, None);
    assert!(!state.overlay_visible);
    assert_eq!(state.sheet_state, SheetState::Expanded);
}

#[test]
fn custom_thresholds_are_respected() {
    let watcher = BreakpointWatcher::new(Breakpoint::default(), Some(390));
    let view = DiscoveryView::mount(
        content(),
        &watcher,
        DismissThresholds {
            offset_px: 200.0,
            velocity: 1000.0,
        },
    );
    view.dispatch(&select("loc-1"));
    let outcome = view.release_overlay_drag(DragRelease {
        offset_y: 140.0,
        velocity_y: 500.0,
    });
    assert_eq!(outcome, DragOutcome::SpringBack);
    assert!(view.state().overlay_visible);
}

#[test]
fn segment_change_through_view_clears_selection() {
    let (_watcher, view) = mount(Some(390));
    view.dispatch(&select("loc-2"));
    view.dispatch(&Event::ChangeSegment(Segment::Only(Category::Beach)));
    let snapshot = view.snapshot();
    assert_eq!(snapshot.state.active_marker_id, None);
    assert!(!snapshot.state.overlay_visible);
    assert_eq!(snapshot.filtered, ["loc-1"]);
}

#[test]
fn list_sheet_counts_use_unfiltered_set() {
    let (_watcher, view) = mount(Some(390));
    view.dispatch(&Event::ChangeSegment(Segment::Only(Category::Nightlife)));
    view.with_coordinator(|c| {
        let sheet = c.list_sheet_props();
        assert_eq!(sheet.segment, Segment::Only(Category::Nightlife));
        assert_eq!(sheet.segment_counts[0], (Segment::All, 4));
        assert_eq!(sheet.groups.count(Category::Beach), 1);
    });
}
