use std::time::{Duration, Instant};

pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.1;
pub const DEFAULT_VISIBILITY_DELAY: Duration = Duration::from_millis(100);

/// One-shot "first seen by the user" detector.
///
/// Fed with element intersection ratios and page visibility changes, it fires
/// once both the element and the page are visible. Intersection changes only
/// take effect after `delay` without further changes; page visibility applies
/// on the next poll. After firing it is detached and ignores all input.
#[derive(Debug, Clone)]
pub struct FirstVisibleObserver {
    threshold: f64,
    delay: Duration,
    element_visible: bool,
    pending: Option<(bool, Instant)>,
    page_visible: bool,
    fired: bool,
}

impl Default for FirstVisibleObserver {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD, DEFAULT_VISIBILITY_DELAY)
    }
}

impl FirstVisibleObserver {
    pub fn new(threshold: f64, delay: Duration) -> Self {
        Self {
            threshold,
            delay,
            element_visible: false,
            pending: None,
            page_visible: true,
            fired: false,
        }
    }

    pub fn is_detached(&self) -> bool {
        self.fired
    }

    fn above_threshold(&self, ratio: f64) -> bool {
        if self.threshold > 0.0 {
            ratio >= self.threshold
        } else {
            ratio > 0.0
        }
    }

    /// Records the element's visible ratio at `now`; restarts the debounce.
    pub fn intersection(&mut self, ratio: f64, now: Instant) {
        if self.fired {
            return;
        }
        let visible = self.above_threshold(ratio);
        self.pending = Some((visible, now + self.delay));
    }

    pub fn page_visibility(&mut self, visible: bool) {
        if !self.fired {
            self.page_visible = visible;
        }
    }

    /// Returns `true` exactly once: the first poll at which the settled element
    /// state and the page are both visible.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.fired {
            return false;
        }
        if let Some((visible, deadline)) = self.pending
            && now >= deadline
        {
            self.element_visible = visible;
            self.pending = None;
        }
        if self.element_visible && self.page_visible {
            self.fired = true;
            self.pending = None;
            return true;
        }
        false
    }
}
