//! A mounted discovery view: the coordinator plus its viewport subscription.

use std::cell::RefCell;
use std::rc::Rc;

use guestapp_core::ContentStore;

use crate::coordinator::{Coordinator, DiscoveryState, Event};
use crate::overlay::{resolve_drag, DismissThresholds, DragOutcome, DragRelease};
use crate::props::ViewSnapshot;
use crate::viewport::{initial_mode, Subscription, ViewportWatcher};

/// Owns the coordinator for the lifetime of one mount. Dropping the view (or
/// calling [`DiscoveryView::unmount`]) releases the viewport subscription.
pub struct DiscoveryView {
    coordinator: Rc<RefCell<Coordinator>>,
    subscription: Option<Subscription>,
    thresholds: DismissThresholds,
}

impl DiscoveryView {
    pub fn mount(
        content: Rc<ContentStore>,
        watcher: &dyn ViewportWatcher,
        thresholds: DismissThresholds,
    ) -> Self {
        let mode = initial_mode(watcher);
        let coordinator = Rc::new(RefCell::new(Coordinator::new(content, mode)));

        let weak = Rc::downgrade(&coordinator);
        let subscription = watcher.subscribe(Box::new(move |mode| {
            let Some(coordinator) = weak.upgrade() else {
                return;
            };
            match coordinator.try_borrow_mut() {
                Ok(mut coordinator) => {
                    coordinator.dispatch(&Event::ViewportModeChanged(mode));
                }
                Err(_) => tracing::warn!(%mode, "coordinator busy, dropped viewport change"),
            };
        }));

        tracing::debug!(%mode, "discovery view mounted");
        Self {
            coordinator,
            subscription: Some(subscription),
            thresholds,
        }
    }

    /// Returns whether the state changed.
    pub fn dispatch(&self, event: &Event) -> bool {
        self.coordinator.borrow_mut().dispatch(event)
    }

    #[must_use]
    pub fn state(&self) -> DiscoveryState {
        self.coordinator.borrow().state().clone()
    }

    /// Read derived props while the coordinator is borrowed.
    pub fn with_coordinator<R>(&self, f: impl FnOnce(&Coordinator) -> R) -> R {
        f(&self.coordinator.borrow())
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.coordinator.borrow().snapshot()
    }

    /// Finish a drag on the overlay. Only a release past either threshold
    /// dismisses; anything else leaves the state untouched.
    pub fn release_overlay_drag(&self, release: DragRelease) -> DragOutcome {
        if !self.coordinator.borrow().overlay_rendered() {
            return DragOutcome::SpringBack;
        }
        let outcome = resolve_drag(release, self.thresholds);
        if outcome == DragOutcome::Dismiss {
            self.dispatch(&Event::DismissOverlay);
        }
        outcome
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn unmount(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        tracing::debug!("discovery view unmounted");
    }
}

impl std::fmt::Debug for DiscoveryView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryView")
            .field("state", &self.coordinator.borrow().state())
            .field("subscribed", &self.subscription.is_some())
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}
