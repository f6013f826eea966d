//! Discovery view coordination: the map, the list sheet and the mobile
//! detail overlay kept consistent through one transition function.

pub mod coordinator;
pub mod directions;
pub mod filter;
pub mod overlay;
pub mod props;
pub mod view;
pub mod viewport;

pub use coordinator::{apply, step, Coordinator, DiscoveryState, Event, Ignored, SheetState};
pub use directions::{directions_url, MapsProvider};
pub use filter::{filter, group_by_category, CategoryGroups, Segment};
pub use overlay::{
    present, resolve_drag, DismissThresholds, DragOutcome, DragRelease, OverlayPresentation,
};
pub use props::{ListSheetProps, MapSurfaceProps, OverlayProps, ViewSnapshot};
pub use view::DiscoveryView;
pub use viewport::{Breakpoint, BreakpointWatcher, Subscription, ViewportMode, ViewportWatcher};
