//! Mobile/desktop layout detection across a single width breakpoint.
//!
//! The watcher is an injected service: whoever owns the discovery view asks
//! it for the current mode once at mount and holds a [`Subscription`] for the
//! lifetime of the view. Dropping the subscription releases the listener.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportMode {
    Mobile,
    Desktop,
}

impl std::fmt::Display for ViewportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewportMode::Mobile => write!(f, "mobile"),
            ViewportMode::Desktop => write!(f, "desktop"),
        }
    }
}

/// Widths at or above `desktop_min_width_px` are desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    desktop_min_width_px: u32,
}

impl Breakpoint {
    pub const DEFAULT_DESKTOP_MIN_WIDTH_PX: u32 = 768;

    #[must_use]
    pub fn new(desktop_min_width_px: u32) -> Self {
        Self {
            desktop_min_width_px,
        }
    }

    #[must_use]
    pub fn desktop_min_width_px(self) -> u32 {
        self.desktop_min_width_px
    }

    #[must_use]
    pub fn classify(self, width_px: u32) -> ViewportMode {
        if width_px >= self.desktop_min_width_px {
            ViewportMode::Desktop
        } else {
            ViewportMode::Mobile
        }
    }
}

impl Default for Breakpoint {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DESKTOP_MIN_WIDTH_PX)
    }
}

pub type ModeCallback = Box<dyn FnMut(ViewportMode)>;

/// Handle for a registered mode listener. The listener is removed when the
/// handle is dropped or [`Subscription::unsubscribe`] is called.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

pub trait ViewportWatcher {
    /// The mode right now, or `None` when the environment cannot tell.
    fn current_mode(&self) -> Option<ViewportMode>;

    /// Register a listener called once per breakpoint crossing.
    fn subscribe(&self, callback: ModeCallback) -> Subscription;
}

/// Mode to use at mount. An environment that cannot report a width gets the
/// mobile layout.
pub fn initial_mode(watcher: &dyn ViewportWatcher) -> ViewportMode {
    watcher.current_mode().unwrap_or_else(|| {
        tracing::warn!("viewport mode unavailable at mount, defaulting to mobile");
        ViewportMode::Mobile
    })
}

type SharedCallback = Rc<RefCell<dyn FnMut(ViewportMode)>>;

struct WatcherInner {
    breakpoint: Breakpoint,
    mode: Option<ViewportMode>,
    next_id: u64,
    listeners: Vec<(u64, SharedCallback)>,
}

/// A watcher fed with raw viewport widths.
#[derive(Clone)]
pub struct BreakpointWatcher {
    inner: Rc<RefCell<WatcherInner>>,
}

impl BreakpointWatcher {
    /// `initial_width_px = None` models an environment with no width
    /// information; [`ViewportWatcher::current_mode`] then returns `None`
    /// until the first [`BreakpointWatcher::set_width`].
    #[must_use]
    pub fn new(breakpoint: Breakpoint, initial_width_px: Option<u32>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(WatcherInner {
                breakpoint,
                mode: initial_width_px.map(|w| breakpoint.classify(w)),
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Feed a new width. Listeners run only when the mode actually changes;
    /// returns whether it did.
    pub fn set_width(&self, width_px: u32) -> bool {
        let (mode, listeners) = {
            let mut inner = self.inner.borrow_mut();
            let mode = inner.breakpoint.classify(width_px);
            if inner.mode == Some(mode) {
                return false;
            }
            inner.mode = Some(mode);
            let listeners = inner
                .listeners
                .iter()
                .map(|(id, cb)| (*id, Rc::clone(cb)))
                .collect::<Vec<_>>();
            (mode, listeners)
        };

        tracing::debug!(width_px, %mode, listeners = listeners.len(), "viewport crossed breakpoint");

        for (id, callback) in listeners {
            // A listener removed by an earlier callback in this round is skipped.
            let still_registered = self.inner.borrow().listeners.iter().any(|(i, _)| *i == id);
            if !still_registered {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(mode),
                Err(_) => tracing::warn!(id, "skipping re-entrant viewport listener"),
            }
        }
        true
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    #[must_use]
    pub fn breakpoint(&self) -> Breakpoint {
        self.inner.borrow().breakpoint
    }
}

impl ViewportWatcher for BreakpointWatcher {
    fn current_mode(&self) -> Option<ViewportMode> {
        self.inner.borrow().mode
    }

    fn subscribe(&self, callback: ModeCallback) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let callback: SharedCallback = Rc::new(RefCell::new(callback));
            inner.listeners.push((id, callback));
            id
        };

        let weak: Weak<RefCell<WatcherInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(i, _)| *i != id);
            }
        })
    }
}
