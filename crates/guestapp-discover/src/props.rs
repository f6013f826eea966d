//! Inputs handed to the map surface, list sheet and detail overlay.

use guestapp_core::{Location, LocationDetail};
use serde::Serialize;

use crate::coordinator::{Coordinator, DiscoveryState, SheetState};
use crate::directions::{directions_url, MapsProvider};
use crate::filter::{group_by_category, segment_counts, CategoryGroups, Segment};
use crate::viewport::ViewportMode;

#[derive(Debug, Clone)]
pub struct MapSurfaceProps<'a> {
    pub markers: Vec<&'a Location>,
    pub selected_id: Option<&'a str>,
    /// Camera should frame the single selected pin.
    pub focus_single_marker: bool,
}

#[derive(Debug, Clone)]
pub struct ListSheetProps<'a> {
    /// Every location, bucketed by category.
    pub groups: CategoryGroups<'a>,
    pub sheet_state: SheetState,
    pub segment: Segment,
    pub all_markers: &'a [Location],
    pub segment_counts: Vec<(Segment, usize)>,
    pub active_marker: Option<&'a Location>,
    pub is_desktop_layout: bool,
}

#[derive(Debug, Clone)]
pub struct OverlayProps<'a> {
    /// The overlay is mounted for this marker on mobile, open or not.
    pub marker: Option<&'a Location>,
    pub detail: Option<&'a LocationDetail>,
    pub is_open: bool,
}

impl OverlayProps<'_> {
    #[must_use]
    pub fn directions_url(&self, provider: MapsProvider) -> Option<String> {
        self.marker.map(|marker| directions_url(marker, provider))
    }
}

impl Coordinator {
    #[must_use]
    pub fn map_props(&self) -> MapSurfaceProps<'_> {
        MapSurfaceProps {
            markers: self.map_markers(),
            selected_id: self.state().active_marker_id.as_deref(),
            focus_single_marker: self.overlay_rendered(),
        }
    }

    #[must_use]
    pub fn list_sheet_props(&self) -> ListSheetProps<'_> {
        let all = self.content().locations();
        ListSheetProps {
            groups: group_by_category(all),
            sheet_state: self.state().sheet_state,
            segment: self.state().segment,
            all_markers: all,
            segment_counts: segment_counts(all),
            active_marker: self.active_location(),
            is_desktop_layout: self.state().viewport_mode == ViewportMode::Desktop,
        }
    }

    #[must_use]
    pub fn overlay_props(&self) -> OverlayProps<'_> {
        let marker = match self.state().viewport_mode {
            ViewportMode::Mobile => self.active_location(),
            ViewportMode::Desktop => None,
        };
        OverlayProps {
            marker,
            detail: marker.and_then(|m| self.content().detail(&m.id)),
            is_open: self.overlay_rendered(),
        }
    }

    /// Owned summary of everything derived from the current state.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            state: self.state().clone(),
            filtered: ids(self.filtered_locations()),
            map_markers: ids(self.map_markers()),
            focus_single_marker: self.overlay_rendered(),
            overlay: self
                .overlay_props()
                .marker
                .filter(|_| self.overlay_rendered())
                .map(|m| m.id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub state: DiscoveryState,
    pub filtered: Vec<String>,
    pub map_markers: Vec<String>,
    pub focus_single_marker: bool,
    /// Id of the location whose overlay is on screen.
    pub overlay: Option<String>,
}

fn ids(locations: Vec<&Location>) -> Vec<String> {
    locations.into_iter().map(|l| l.id.clone()).collect()
}
