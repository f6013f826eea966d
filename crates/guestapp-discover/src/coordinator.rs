//! Selection and overlay coordination for the discovery view.
//!
//! All view state changes go through [`step`], a single transition function
//! over [`DiscoveryState`]. Map markers, overlay visibility and list-sheet
//! inputs are derived from the state on demand and never stored.

use std::rc::Rc;

use guestapp_core::{ContentStore, Location};
use serde::{Deserialize, Serialize};

use crate::filter::{self, Segment};
use crate::viewport::ViewportMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetState {
    Collapsed,
    Expanded,
}

impl SheetState {
    /// Resting sheet state for a layout: always expanded beside the map on
    /// desktop, collapsed under it on mobile.
    #[must_use]
    pub fn resting(mode: ViewportMode) -> Self {
        match mode {
            ViewportMode::Desktop => SheetState::Expanded,
            ViewportMode::Mobile => SheetState::Collapsed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryState {
    pub segment: Segment,
    pub viewport_mode: ViewportMode,
    pub sheet_state: SheetState,
    pub active_marker_id: Option<String>,
    /// Only ever `true` on mobile.
    pub overlay_visible: bool,
}

impl DiscoveryState {
    #[must_use]
    pub fn initial(mode: ViewportMode) -> Self {
        Self {
            segment: Segment::All,
            viewport_mode: mode,
            sheet_state: SheetState::resting(mode),
            active_marker_id: None,
            overlay_visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Event {
    SelectMarker(String),
    ChangeSegment(Segment),
    DismissOverlay,
    DragSheet(SheetState),
    ViewportModeChanged(ViewportMode),
}

/// Why an event left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// `SelectMarker` for an id outside the filtered set or unknown to the store.
    NotInFilteredSet,
    /// `DismissOverlay` with nothing selected.
    NothingSelected,
    /// `DragSheet` on desktop, where the sheet is pinned open.
    SheetPinned,
    /// `ViewportModeChanged` to the mode already in effect.
    ModeUnchanged,
}

impl std::fmt::Display for Ignored {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Ignored::NotInFilteredSet => "marker not in filtered set",
            Ignored::NothingSelected => "no active marker",
            Ignored::SheetPinned => "sheet is pinned on desktop",
            Ignored::ModeUnchanged => "viewport mode unchanged",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: DiscoveryState,
    pub ignored: Option<Ignored>,
}

fn in_filtered_set(content: &ContentStore, segment: Segment, id: &str) -> bool {
    content
        .get(id)
        .is_some_and(|location| segment.matches(location.category))
}

/// Re-establish the state invariants against `content`: an active marker that
/// no longer resolves inside the filtered set is cleared together with the
/// overlay, and the overlay never survives outside the mobile layout.
#[must_use]
pub fn reconcile(mut state: DiscoveryState, content: &ContentStore) -> DiscoveryState {
    let dangling = state
        .active_marker_id
        .as_deref()
        .is_some_and(|id| !in_filtered_set(content, state.segment, id));
    if dangling {
        state.active_marker_id = None;
    }
    if state.active_marker_id.is_none() || state.viewport_mode != ViewportMode::Mobile {
        state.overlay_visible = false;
    }
    state
}

/// Apply one event. Events whose precondition fails leave the state as is
/// and report why.
#[must_use]
pub fn step(state: DiscoveryState, event: &Event, content: &ContentStore) -> Step {
    let mut next = reconcile(state, content);
    let mut ignored = None;

    match event {
        Event::SelectMarker(id) => {
            if in_filtered_set(content, next.segment, id) {
                next.active_marker_id = Some(id.clone());
                if next.viewport_mode == ViewportMode::Mobile {
                    next.overlay_visible = true;
                    next.sheet_state = SheetState::Collapsed;
                }
            } else {
                ignored = Some(Ignored::NotInFilteredSet);
            }
        }
        Event::ChangeSegment(segment) => {
            next.segment = *segment;
            next = reconcile(next, content);
        }
        Event::DismissOverlay => {
            if next.active_marker_id.is_some() {
                next.active_marker_id = None;
                next.overlay_visible = false;
                if next.viewport_mode == ViewportMode::Mobile {
                    next.sheet_state = SheetState::Expanded;
                }
            } else {
                ignored = Some(Ignored::NothingSelected);
            }
        }
        Event::DragSheet(sheet) => {
            if next.viewport_mode == ViewportMode::Mobile {
                next.sheet_state = *sheet;
            } else {
                ignored = Some(Ignored::SheetPinned);
            }
        }
        Event::ViewportModeChanged(mode) => {
            if *mode == next.viewport_mode {
                ignored = Some(Ignored::ModeUnchanged);
            } else {
                next.viewport_mode = *mode;
                next.sheet_state = SheetState::resting(*mode);
                next.overlay_visible = false;
            }
        }
    }

    Step {
        state: next,
        ignored,
    }
}

/// [`step`] without the diagnostics.
#[must_use]
pub fn apply(state: DiscoveryState, event: &Event, content: &ContentStore) -> DiscoveryState {
    step(state, event, content).state
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

#[must_use]
pub fn filtered_locations<'a>(state: &DiscoveryState, content: &'a ContentStore) -> Vec<&'a Location> {
    filter::filter(content.locations(), state.segment)
}

/// The selected location, if it still resolves inside the filtered set.
#[must_use]
pub fn active_location<'a>(state: &DiscoveryState, content: &'a ContentStore) -> Option<&'a Location> {
    let id = state.active_marker_id.as_deref()?;
    content
        .get(id)
        .filter(|location| state.segment.matches(location.category))
}

/// Whether the overlay is on screen: mobile, something selected, and shown.
#[must_use]
pub fn overlay_rendered(state: &DiscoveryState, content: &ContentStore) -> bool {
    state.viewport_mode == ViewportMode::Mobile
        && state.overlay_visible
        && active_location(state, content).is_some()
}

/// Markers handed to the map. While the mobile overlay covers the list the
/// map narrows to the single selected pin.
#[must_use]
pub fn map_markers<'a>(state: &DiscoveryState, content: &'a ContentStore) -> Vec<&'a Location> {
    if overlay_rendered(state, content) {
        if let Some(location) = active_location(state, content) {
            return vec![location];
        }
    }
    filtered_locations(state, content)
}

/// Owns the discovery state for one mounted view.
#[derive(Debug, Clone)]
pub struct Coordinator {
    content: Rc<ContentStore>,
    state: DiscoveryState,
}

impl Coordinator {
    #[must_use]
    pub fn new(content: Rc<ContentStore>, mode: ViewportMode) -> Self {
        Self {
            content,
            state: DiscoveryState::initial(mode),
        }
    }

    #[must_use]
    pub fn state(&self) -> &DiscoveryState {
        &self.state
    }

    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    /// Run one event through the transition table. Returns whether the state
    /// changed.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        let Step { state, ignored } = step(self.state.clone(), event, &self.content);

        if let Some(reason) = ignored {
            tracing::debug!(?event, %reason, "discovery event ignored");
        }

        if state == self.state {
            return false;
        }

        if let Event::ViewportModeChanged(mode) = event {
            tracing::info!(%mode, overlay_closed = self.state.overlay_visible, "discovery layout switched");
        }
        tracing::debug!(?event, from = ?self.state, to = ?state, "discovery transition");
        self.state = state;
        true
    }

    #[must_use]
    pub fn filtered_locations(&self) -> Vec<&Location> {
        filtered_locations(&self.state, &self.content)
    }

    #[must_use]
    pub fn active_location(&self) -> Option<&Location> {
        active_location(&self.state, &self.content)
    }

    #[must_use]
    pub fn overlay_rendered(&self) -> bool {
        overlay_rendered(&self.state, &self.content)
    }

    #[must_use]
    pub fn map_markers(&self) -> Vec<&Location> {
        map_markers(&self.state, &self.content)
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
